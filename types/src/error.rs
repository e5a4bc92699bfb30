//! Errors raised while constructing fundamental types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid address: {0:?}")]
    InvalidAddress(String),

    #[error("invalid chain id: {0}")]
    InvalidChain(String),

    #[error("invalid shard id: {0}")]
    InvalidShard(String),

    #[error("invalid hex: {0}")]
    InvalidHex(String),
}
