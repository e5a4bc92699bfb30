//! The per-transaction send request.

use std::sync::Arc;

use crate::{Address, ShardId};

/// Everything needed to build one value-transfer transaction.
///
/// One instance per dispatched transaction, never mutated after construction.
/// The payload is shared between all requests of a run, hence the `Arc`.
#[derive(Clone, Debug, PartialEq)]
pub struct SendRequest {
    pub sender: Address,
    pub sender_shard: ShardId,
    /// Raw receiver string as loaded from the receiver file. Validated by the
    /// transaction builder so a bad line fails its own task only.
    pub receiver: String,
    pub receiver_shard: ShardId,
    /// Amount in decimal token units, as entered by the operator.
    pub amount: f64,
    /// Gas price in "nano" units, as entered by the operator.
    pub gas_price: u64,
    pub nonce: u64,
    pub payload: Option<Arc<[u8]>>,
}

impl SendRequest {
    /// Payload bytes, empty when none was configured.
    pub fn payload_bytes(&self) -> &[u8] {
        self.payload.as_deref().unwrap_or(&[])
    }

    pub fn is_cross_shard(&self) -> bool {
        self.sender_shard != self.receiver_shard
    }
}
