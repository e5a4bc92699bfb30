use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("key error: {0}")]
    Key(String),

    #[error("no keystore for {address} in {dir}")]
    KeystoreNotFound { address: String, dir: String },

    #[error("keystore I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid keystore: {0}")]
    Format(String),

    #[error("signing error: {0}")]
    Signing(String),
}

impl From<shardblast_transactions::TransactionError> for WalletError {
    fn from(e: shardblast_transactions::TransactionError) -> Self {
        WalletError::Signing(e.to_string())
    }
}
