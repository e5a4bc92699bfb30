//! Account balance lookups in base units.

use serde::Serialize;
use serde_json::Value;
use shardblast_types::{Address, BaseAmount};

use crate::client::HttpMessenger;
use crate::error::RpcError;
use crate::node::NodeRpc;
use crate::shards::is_ip_endpoint;

/// Balance held on one shard.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ShardBalance {
    pub shard: u32,
    /// Base units, as a decimal string so JSON consumers keep full precision.
    pub amount: String,
}

/// Decode a balance reply (`0x` hex, decimal string, or number).
pub fn parse_balance(value: &Value) -> Option<BaseAmount> {
    match value {
        Value::String(s) => match s.strip_prefix("0x") {
            Some("") => Some(BaseAmount::ZERO),
            Some(hex) => u128::from_str_radix(hex, 16).ok().map(BaseAmount::new),
            None => s.parse().ok().map(BaseAmount::new),
        },
        Value::Number(n) => n.as_u64().map(|v| BaseAmount::new(v as u128)),
        _ => None,
    }
}

/// Balances of `address` on every shard reachable from `node`.
///
/// For an IP endpoint only that node is asked, and its metadata names the
/// shard. Otherwise every shard in the sharding structure is asked; shards that
/// fail to answer are skipped.
pub async fn fetch_balances(node: &str, address: &Address) -> Result<Vec<ShardBalance>, RpcError> {
    let messenger = HttpMessenger::new(node)?;

    if is_ip_endpoint(node) {
        let amount = messenger.balance(address).await?;
        let meta = messenger.node_metadata().await?;
        return Ok(vec![ShardBalance {
            shard: meta.shard_id,
            amount: amount.to_string(),
        }]);
    }

    let mut balances = Vec::new();
    for shard in messenger.sharding_structure().await? {
        let shard_messenger = HttpMessenger::new(&shard.http)?;
        match shard_messenger.balance(address).await {
            Ok(amount) => balances.push(ShardBalance {
                shard: shard.shard_id,
                amount: amount.to_string(),
            }),
            Err(e) => tracing::debug!(endpoint = %shard.http, "balance query failed: {e}"),
        }
    }
    Ok(balances)
}
