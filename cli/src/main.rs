//! shardblast: bulk transaction sender for sharded chains.

use anyhow::{bail, Context};
use clap::Parser;
use shardblast_crypto::{derive_address, generate_keypair, keypair_from_seed};
use shardblast_rpc::{fetch_balances, resolve_shard_endpoint, HttpMessenger};
use shardblast_sender::{execute, SenderConfig, SenderError};
use shardblast_types::{Address, ChainId, ShardId};
use shardblast_utils::{init_tracing, LogFormat};
use shardblast_wallet::{create_keystore, KdfParams, KeystoreSigner};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "shardblast", version, about = "Bulk transaction sender for sharded chains")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, global = true, env = "SHARDBLAST_CONFIG")]
    config: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, global = true, env = "SHARDBLAST_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, global = true, env = "SHARDBLAST_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Subcommand.
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Send transactions in concurrent pools.
    Send(SendArgs),

    /// Print the balance of an address on every shard, as JSON.
    Balance {
        /// Address to look up (defaults to the configured sender).
        address: Option<Address>,

        /// Node endpoint.
        #[arg(long, env = "SHARDBLAST_NODE")]
        node: Option<String>,
    },

    /// Manage keystores.
    Keystore {
        #[command(subcommand)]
        action: KeystoreAction,
    },
}

#[derive(clap::Subcommand)]
enum KeystoreAction {
    /// Create a new encrypted keystore and print its address.
    New {
        /// Directory to write the keystore to.
        #[arg(long, env = "SHARDBLAST_KEYSTORE_DIR")]
        dir: Option<PathBuf>,

        /// Passphrase protecting the keystore.
        #[arg(long, env = "SHARDBLAST_PASSPHRASE", hide_env_values = true, default_value = "")]
        passphrase: String,

        /// 32-byte hex seed for a reproducible key (random when omitted).
        #[arg(long)]
        seed: Option<String>,

        /// Use cheap key-derivation parameters (throwaway test accounts only).
        #[arg(long)]
        light_kdf: bool,
    },
}

#[derive(clap::Args)]
struct SendArgs {
    /// Node endpoint used for API calls.
    #[arg(long, env = "SHARDBLAST_NODE")]
    node: Option<String>,

    /// Address to send from (its keystore must exist in the keystore dir).
    #[arg(long, env = "SHARDBLAST_FROM")]
    from: Option<Address>,

    /// Shard to send from.
    #[arg(long)]
    from_shard: Option<u32>,

    /// Passphrase for unlocking the keystore.
    #[arg(long, env = "SHARDBLAST_PASSPHRASE", hide_env_values = true)]
    passphrase: Option<String>,

    /// Shard to send to.
    #[arg(long)]
    to_shard: Option<u32>,

    /// Tokens to send per transaction.
    #[arg(long)]
    amount: Option<f64>,

    /// Gas price in nano units.
    #[arg(long)]
    gas_price: Option<u64>,

    /// Total number of transactions.
    #[arg(long)]
    tx_count: Option<usize>,

    /// Transactions sent simultaneously.
    #[arg(long = "tx-pool-size")]
    pool_size: Option<usize>,

    /// Never re-read the nonce from the network between pools.
    #[arg(long)]
    disable_nonce_refresh: bool,

    /// Receiver address file.
    #[arg(long)]
    receivers: Option<PathBuf>,

    /// Payload file attached to every transaction.
    #[arg(long)]
    tx_data: Option<PathBuf>,

    /// Starting nonce (queried from the network when omitted).
    #[arg(long)]
    nonce: Option<String>,

    /// Chain to sign for: "mainnet", "testnet", "devnet" or a numeric id.
    #[arg(long, env = "SHARDBLAST_CHAIN")]
    chain: Option<ChainId>,

    /// Directory holding keystore files.
    #[arg(long, env = "SHARDBLAST_KEYSTORE_DIR")]
    keystore_dir: Option<PathBuf>,

    /// Seconds to wait for each receipt (0 = don't wait).
    #[arg(long)]
    confirmation_wait: Option<u64>,

    /// Seconds before building, signing and broadcasting one transaction is
    /// abandoned (0 = never). Does not include the confirmation wait.
    #[arg(long)]
    task_timeout: Option<u64>,

    /// Drop blank lines from the receiver file.
    #[arg(long)]
    skip_blank_receivers: bool,
}

impl SendArgs {
    /// Overlay the flags that were given on `base`.
    fn apply(self, base: SenderConfig) -> SenderConfig {
        SenderConfig {
            node: self.node.unwrap_or(base.node),
            from: self.from.or(base.from),
            from_shard: self.from_shard.map(ShardId).unwrap_or(base.from_shard),
            passphrase: self.passphrase.unwrap_or(base.passphrase),
            to_shard: self.to_shard.map(ShardId).unwrap_or(base.to_shard),
            amount: self.amount.unwrap_or(base.amount),
            gas_price: self.gas_price.unwrap_or(base.gas_price),
            tx_count: self.tx_count.unwrap_or(base.tx_count),
            pool_size: self.pool_size.unwrap_or(base.pool_size),
            disable_nonce_refresh: self.disable_nonce_refresh || base.disable_nonce_refresh,
            receivers: self.receivers.unwrap_or(base.receivers),
            tx_data: self.tx_data.unwrap_or(base.tx_data),
            nonce: self.nonce.or(base.nonce),
            chain: self.chain.unwrap_or(base.chain),
            keystore_dir: self.keystore_dir.unwrap_or(base.keystore_dir),
            confirmation_wait_secs: self.confirmation_wait.unwrap_or(base.confirmation_wait_secs),
            task_timeout_secs: self.task_timeout.unwrap_or(base.task_timeout_secs),
            skip_blank_receivers: self.skip_blank_receivers || base.skip_blank_receivers,
            ..base
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(ref path) => SenderConfig::from_toml_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SenderConfig::default(),
    };
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    init_tracing(&config.log_level, config.log_format);
    if let Some(ref path) = cli.config {
        tracing::info!("Loaded config from {}", path.display());
    }

    match cli.command {
        Command::Send(args) => send(args.apply(config)).await,
        Command::Balance { address, node } => {
            let address = match address.or(config.from) {
                Some(address) => address,
                None => bail!("you need to specify an address"),
            };
            let node = node.unwrap_or(config.node);
            let balances = fetch_balances(&node, &address)
                .await
                .with_context(|| format!("querying balances via {node}"))?;
            println!("{}", serde_json::to_string_pretty(&balances)?);
            Ok(())
        }
        Command::Keystore { action } => match action {
            KeystoreAction::New {
                dir,
                passphrase,
                seed,
                light_kdf,
            } => {
                let keys = match seed {
                    Some(seed) => {
                        let bytes: [u8; 32] = hex::decode(seed.trim_start_matches("0x"))
                            .context("seed is not valid hex")?
                            .try_into()
                            .map_err(|v: Vec<u8>| {
                                anyhow::anyhow!("seed must be 32 bytes, got {}", v.len())
                            })?;
                        keypair_from_seed(&bytes)
                    }
                    None => generate_keypair(),
                };
                let kdf = if light_kdf {
                    KdfParams::light()
                } else {
                    KdfParams::default()
                };
                let dir = dir.unwrap_or(config.keystore_dir);
                let path = create_keystore(&dir, &keys, &passphrase, kdf)?;
                println!("{}", derive_address(&keys.public));
                println!("{}", path.display());
                Ok(())
            }
        },
    }
}

async fn send(config: SenderConfig) -> anyhow::Result<()> {
    config.validate()?;
    let sender = config.sender()?.clone();

    let discovery = HttpMessenger::new(&config.node)?;
    let endpoint = resolve_shard_endpoint(&discovery, &config.node, config.from_shard)
        .await
        .map_err(SenderError::from)
        .with_context(|| format!("finding the endpoint for shard {}", config.from_shard))?;
    tracing::info!(shard = %config.from_shard, %endpoint, "using node endpoint");
    let rpc = Arc::new(HttpMessenger::new(endpoint)?);

    let signer = KeystoreSigner::unlock(&config.keystore_dir, &sender, &config.passphrase)
        .map_err(SenderError::from)
        .context("unlocking the sender keystore")?;

    let report = execute(&config, rpc, Arc::new(signer)).await?;
    println!("{}", report.summary);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_override_file_config() {
        let cli = Cli::try_parse_from([
            "shardblast",
            "send",
            "--from",
            "one1flag",
            "--tx-count",
            "5",
            "--tx-pool-size",
            "2",
            "--chain",
            "testnet",
        ])
        .unwrap();
        let Command::Send(args) = cli.command else {
            panic!("expected send");
        };
        let base = SenderConfig {
            amount: 3.0,
            tx_count: 1000,
            ..Default::default()
        };
        let config = args.apply(base);
        assert_eq!(config.from.unwrap().as_str(), "one1flag");
        assert_eq!(config.tx_count, 5);
        assert_eq!(config.pool_size, 2);
        assert_eq!(config.chain, ChainId::Testnet);
        assert_eq!(config.amount, 3.0);
    }

    #[test]
    fn keystore_new_parses() {
        let cli = Cli::try_parse_from(["shardblast", "keystore", "new", "--light-kdf"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Keystore {
                action: KeystoreAction::New { light_kdf: true, .. }
            }
        ));
    }
}
