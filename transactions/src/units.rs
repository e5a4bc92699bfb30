//! Scaling operator-entered amounts into the chain's base integer unit.
//!
//! One token is 10^18 base units. Amounts are first rounded to whole "nano"
//! units (10^9 per token) and then scaled by a further 10^9, so anything below
//! one nano-token is rounded away.

use shardblast_types::BaseAmount;

use crate::error::TransactionError;

/// Nano units per token.
pub const UNIT: f64 = 1_000_000_000.0;
/// Base units per nano unit.
pub const UNIT_SCALE: u128 = 1_000_000_000;

/// `round(amount * UNIT) * UNIT_SCALE`.
pub fn amount_to_base(amount: f64) -> Result<BaseAmount, TransactionError> {
    if !amount.is_finite() {
        return Err(TransactionError::InvalidAmount {
            amount,
            reason: "not a finite number".into(),
        });
    }
    if amount < 0.0 {
        return Err(TransactionError::InvalidAmount {
            amount,
            reason: "negative".into(),
        });
    }
    let nano = (amount * UNIT).round();
    if nano >= u128::MAX as f64 {
        return Err(TransactionError::InvalidAmount {
            amount,
            reason: "too large".into(),
        });
    }
    BaseAmount::new(nano as u128)
        .checked_mul(UNIT_SCALE)
        .ok_or_else(|| TransactionError::InvalidAmount {
            amount,
            reason: "too large".into(),
        })
}

/// Gas price given in nano units, scaled into base units.
pub fn gas_price_to_base(nano: u64) -> BaseAmount {
    BaseAmount::new(nano as u128 * UNIT_SCALE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_token_is_ten_to_the_eighteen() {
        assert_eq!(
            amount_to_base(1.0).unwrap().raw(),
            1_000_000_000_000_000_000
        );
    }

    #[test]
    fn fractions_round_to_nearest_nano() {
        assert_eq!(amount_to_base(0.5).unwrap().raw(), 500_000_000_000_000_000);
        // 1.4 nano rounds down, 1.6 nano rounds up
        assert_eq!(amount_to_base(1.4e-9).unwrap().raw(), UNIT_SCALE);
        assert_eq!(amount_to_base(1.6e-9).unwrap().raw(), 2 * UNIT_SCALE);
    }

    #[test]
    fn zero_is_allowed() {
        assert!(amount_to_base(0.0).unwrap().is_zero());
    }

    #[test]
    fn rejects_negative_and_nan() {
        assert!(amount_to_base(-1.0).is_err());
        assert!(amount_to_base(f64::NAN).is_err());
        assert!(amount_to_base(f64::INFINITY).is_err());
    }

    #[test]
    fn gas_price_scaling() {
        assert_eq!(gas_price_to_base(1).raw(), 1_000_000_000);
    }
}
