//! Sender configuration with TOML file support.

use serde::{Deserialize, Serialize};
use shardblast_types::{Address, ChainId, ShardId};
use shardblast_utils::LogFormat;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::SenderError;

/// Configuration for one bulk-send run.
///
/// Can be loaded from a TOML file via [`SenderConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SenderConfig {
    /// Node endpoint used for API calls.
    #[serde(default = "default_node")]
    pub node: String,

    /// Sending account; its keystore must exist in `keystore_dir`.
    #[serde(default)]
    pub from: Option<Address>,

    /// Shard the sender's funds live on.
    #[serde(default)]
    pub from_shard: ShardId,

    /// Keystore passphrase. Never written back out.
    #[serde(default, skip_serializing)]
    pub passphrase: String,

    /// Destination shard for every transaction.
    #[serde(default)]
    pub to_shard: ShardId,

    /// Tokens sent per transaction.
    #[serde(default = "default_amount")]
    pub amount: f64,

    /// Gas price in nano units.
    #[serde(default = "default_gas_price")]
    pub gas_price: u64,

    /// Total number of transactions to send.
    #[serde(default = "default_tx_count")]
    pub tx_count: usize,

    /// Maximum number of transactions in flight at once.
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,

    /// Keep counting locally instead of re-reading the nonce between pools.
    #[serde(default)]
    pub disable_nonce_refresh: bool,

    /// Newline-delimited receiver address file.
    #[serde(default = "default_receivers")]
    pub receivers: PathBuf,

    /// Optional payload attached to every transaction. A missing file means no payload.
    #[serde(default = "default_tx_data")]
    pub tx_data: PathBuf,

    /// Explicit starting nonce; queried from the node when unset.
    #[serde(default)]
    pub nonce: Option<String>,

    /// Chain the transactions are signed for.
    #[serde(default)]
    pub chain: ChainId,

    /// Directory holding keystore files.
    #[serde(default = "default_keystore_dir")]
    pub keystore_dir: PathBuf,

    /// Seconds to poll for each receipt after broadcast (0 = don't wait).
    #[serde(default)]
    pub confirmation_wait_secs: u64,

    /// Upper bound on building, signing and broadcasting one transaction, in
    /// seconds (0 = unbounded). The confirmation wait is not included.
    #[serde(default = "default_task_timeout_secs")]
    pub task_timeout_secs: u64,

    /// Drop blank lines from the receiver file instead of sending to them.
    #[serde(default)]
    pub skip_blank_receivers: bool,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_node() -> String {
    "https://api.s0.pga.hmny.io".to_string()
}

fn default_amount() -> f64 {
    1.0
}

fn default_gas_price() -> u64 {
    1
}

fn default_tx_count() -> usize {
    1000
}

fn default_pool_size() -> usize {
    100
}

fn default_receivers() -> PathBuf {
    PathBuf::from("./data/receivers.txt")
}

fn default_tx_data() -> PathBuf {
    PathBuf::from("./data/tx_data.txt")
}

fn default_keystore_dir() -> PathBuf {
    PathBuf::from("./keystore")
}

fn default_task_timeout_secs() -> u64 {
    60
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl SenderConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, SenderError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| SenderError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, SenderError> {
        toml::from_str(s).map_err(|e| SenderError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).expect("SenderConfig is always serializable to TOML")
    }

    /// Check the rules that must hold before anything is sent.
    pub fn validate(&self) -> Result<(), SenderError> {
        if self.node.trim().is_empty() {
            return Err(SenderError::Config(
                "you need to specify a node to use for the API calls".into(),
            ));
        }
        self.sender()?;
        if self.tx_count == 0 {
            return Err(SenderError::Config("tx_count must be at least 1".into()));
        }
        if self.pool_size == 0 {
            return Err(SenderError::Config("pool_size must be at least 1".into()));
        }
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(SenderError::Config(format!(
                "amount must be a non-negative number, got {}",
                self.amount
            )));
        }
        Ok(())
    }

    /// The sending account.
    pub fn sender(&self) -> Result<&Address, SenderError> {
        self.from
            .as_ref()
            .ok_or_else(|| SenderError::Config("you need to specify the sender address".into()))
    }

    /// Per-send time limit, `None` when disabled.
    pub fn task_timeout(&self) -> Option<Duration> {
        (self.task_timeout_secs > 0).then(|| Duration::from_secs(self.task_timeout_secs))
    }

    /// Receipt polling budget, `None` when confirmations are not awaited.
    pub fn confirmation_wait(&self) -> Option<Duration> {
        (self.confirmation_wait_secs > 0).then(|| Duration::from_secs(self.confirmation_wait_secs))
    }
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self {
            node: default_node(),
            from: None,
            from_shard: ShardId::default(),
            passphrase: String::new(),
            to_shard: ShardId::default(),
            amount: default_amount(),
            gas_price: default_gas_price(),
            tx_count: default_tx_count(),
            pool_size: default_pool_size(),
            disable_nonce_refresh: false,
            receivers: default_receivers(),
            tx_data: default_tx_data(),
            nonce: None,
            chain: ChainId::default(),
            keystore_dir: default_keystore_dir(),
            confirmation_wait_secs: 0,
            task_timeout_secs: default_task_timeout_secs(),
            skip_blank_receivers: false,
            log_level: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}
