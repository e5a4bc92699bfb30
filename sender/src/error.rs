use shardblast_rpc::RpcError;
use shardblast_transactions::TransactionError;
use shardblast_types::TypesError;
use shardblast_wallet::WalletError;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SenderError {
    #[error("config error: {0}")]
    Config(String),

    #[error("network error: {0}")]
    Network(RpcError),

    #[error("signing error: {0}")]
    Signing(String),

    #[error("invalid gas: {0}")]
    InvalidGas(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("no receivers found; add at least one address to {}", .0.display())]
    NoReceivers(PathBuf),

    #[error("cannot pick from an empty list")]
    EmptyInput,

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SenderError {
    /// Whether this error stems from operator input rather than the network
    /// or a single transaction. Such errors abort before any dispatch.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SenderError::Config(_) | SenderError::InvalidInput(_) | SenderError::NoReceivers(_)
        )
    }
}

impl From<RpcError> for SenderError {
    fn from(e: RpcError) -> Self {
        match e {
            RpcError::ShardNotFound(_) => SenderError::Config(e.to_string()),
            other => SenderError::Network(other),
        }
    }
}

impl From<TransactionError> for SenderError {
    fn from(e: TransactionError) -> Self {
        match e {
            TransactionError::InvalidGas(msg) => SenderError::InvalidGas(msg),
            TransactionError::Encoding(msg) => SenderError::Signing(msg),
            other => SenderError::InvalidInput(other.to_string()),
        }
    }
}

impl From<WalletError> for SenderError {
    fn from(e: WalletError) -> Self {
        match e {
            WalletError::KeystoreNotFound { .. } => SenderError::Config(e.to_string()),
            other => SenderError::Signing(other.to_string()),
        }
    }
}

impl From<TypesError> for SenderError {
    fn from(e: TypesError) -> Self {
        SenderError::InvalidInput(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shardblast_types::ShardId;

    #[test]
    fn missing_shard_is_configuration() {
        let err = SenderError::from(RpcError::ShardNotFound(ShardId(3)));
        assert!(matches!(err, SenderError::Config(_)));
        assert!(err.is_configuration());
    }

    #[test]
    fn transport_failure_is_network() {
        let err = SenderError::from(RpcError::Transport("refused".into()));
        assert!(matches!(err, SenderError::Network(_)));
        assert!(!err.is_configuration());
    }

    #[test]
    fn gas_errors_keep_their_class() {
        let err = SenderError::from(TransactionError::InvalidGas("overflow".into()));
        assert!(matches!(err, SenderError::InvalidGas(_)));
    }

    #[test]
    fn bad_receiver_is_invalid_input() {
        let err = SenderError::from(TransactionError::InvalidReceiver(
            TypesError::InvalidAddress("".into()),
        ));
        assert!(matches!(err, SenderError::InvalidInput(_)));
    }
}
