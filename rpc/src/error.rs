//! RPC client error types.

use shardblast_types::ShardId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("node returned HTTP {0}")]
    Http(u16),

    #[error("node error {code}: {message}")]
    Node { code: i64, message: String },

    #[error("invalid response to {method}: {reason}")]
    InvalidResponse { method: String, reason: String },

    #[error("shard {0} not found in sharding structure")]
    ShardNotFound(ShardId),
}

impl RpcError {
    pub(crate) fn invalid(method: &str, reason: impl Into<String>) -> Self {
        RpcError::InvalidResponse {
            method: method.to_string(),
            reason: reason.into(),
        }
    }
}
