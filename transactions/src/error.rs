use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("invalid gas: {0}")]
    InvalidGas(String),

    #[error("invalid amount {amount}: {reason}")]
    InvalidAmount { amount: f64, reason: String },

    #[error("invalid receiver: {0}")]
    InvalidReceiver(#[from] shardblast_types::TypesError),

    #[error("encoding error: {0}")]
    Encoding(String),
}

impl From<bincode::Error> for TransactionError {
    fn from(e: bincode::Error) -> Self {
        TransactionError::Encoding(e.to_string())
    }
}
