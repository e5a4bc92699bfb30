//! Intrinsic gas: the minimum cost of a transaction before execution.

use crate::error::TransactionError;

/// Base cost of a plain value transfer.
pub const TX_GAS: u64 = 21_000;
/// Base cost of a contract-creation transaction.
pub const TX_GAS_CONTRACT_CREATION: u64 = 53_000;
/// Per-byte surcharge for zero payload bytes.
pub const TX_DATA_ZERO_GAS: u64 = 4;
/// Per-byte surcharge for non-zero payload bytes.
pub const TX_DATA_NON_ZERO_GAS: u64 = 68;

/// Compute the intrinsic gas of a transaction carrying `payload`.
///
/// An empty payload costs exactly the base; each payload byte adds a surcharge
/// depending on whether it is zero. Overflowing `u64` is an error, and so is a
/// zero result, which can only come from a broken cost table.
pub fn intrinsic_gas(payload: &[u8], contract_creation: bool) -> Result<u64, TransactionError> {
    let base = if contract_creation {
        TX_GAS_CONTRACT_CREATION
    } else {
        TX_GAS
    };

    let non_zero = payload.iter().filter(|b| **b != 0).count() as u64;
    let zero = payload.len() as u64 - non_zero;

    let gas = non_zero
        .checked_mul(TX_DATA_NON_ZERO_GAS)
        .and_then(|g| g.checked_add(base))
        .and_then(|g| zero.checked_mul(TX_DATA_ZERO_GAS).and_then(|z| g.checked_add(z)))
        .ok_or_else(|| TransactionError::InvalidGas("intrinsic gas overflows u64".into()))?;

    if gas == 0 {
        return Err(TransactionError::InvalidGas(
            "calculated gas is 0".into(),
        ));
    }
    Ok(gas)
}
