//! The unsigned transaction draft.

use serde::{Deserialize, Serialize};
use shardblast_types::{Address, BaseAmount, ShardId};

use crate::error::TransactionError;

/// A fully parameterized transaction awaiting a signature.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDraft {
    pub nonce: u64,
    pub gas_limit: u64,
    pub receiver: Address,
    pub from_shard: ShardId,
    pub to_shard: ShardId,
    pub amount: BaseAmount,
    pub gas_price: BaseAmount,
    pub payload: Vec<u8>,
}

impl TransactionDraft {
    /// Canonical bytes that get signed.
    pub fn signing_bytes(&self) -> Result<Vec<u8>, TransactionError> {
        Ok(bincode::serialize(self)?)
    }

    /// Upper bound on the fee this draft can spend.
    pub fn max_fee(&self) -> Option<BaseAmount> {
        self.gas_price.checked_mul(self.gas_limit as u128)
    }
}
