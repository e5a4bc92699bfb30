//! The network call capability and typed helpers built on it.

use serde::Deserialize;
use serde_json::{json, Value};
use shardblast_types::{Address, BaseAmount, ReceiptRef};
use std::future::Future;

use crate::balance::parse_balance;
use crate::error::RpcError;
use crate::method;

/// One shard's endpoints, as reported by the sharding structure.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ShardEndpoint {
    #[serde(rename = "shardID")]
    pub shard_id: u32,
    pub http: String,
    #[serde(default)]
    pub ws: String,
    #[serde(default)]
    pub current: bool,
}

/// Subset of the node metadata reply.
#[derive(Clone, Debug, Deserialize)]
pub struct NodeMetadata {
    #[serde(rename = "shard-id")]
    pub shard_id: u32,
    #[serde(default)]
    pub network: String,
    #[serde(default)]
    pub version: String,
}

/// A JSON-RPC endpoint.
///
/// Only [`call`](Self::call) is required. The remaining methods decode the
/// replies of the specific methods the sender consumes.
pub trait NodeRpc: Send + Sync {
    /// Invoke `method` with positional `params`, returning the `result` value.
    fn call(
        &self,
        method: &str,
        params: Value,
    ) -> impl Future<Output = Result<Value, RpcError>> + Send;

    /// The next nonce the network expects from `address`.
    fn next_nonce(&self, address: &Address) -> impl Future<Output = Result<u64, RpcError>> + Send {
        async move {
            let reply = self
                .call(method::GET_NEXT_NONCE, json!([address.as_str(), method::LATEST]))
                .await?;
            parse_quantity(&reply).ok_or_else(|| {
                RpcError::invalid(method::GET_NEXT_NONCE, format!("not a quantity: {reply}"))
            })
        }
    }

    /// Submit a `0x`-prefixed raw transaction.
    fn send_raw_transaction(
        &self,
        raw_hex: &str,
    ) -> impl Future<Output = Result<ReceiptRef, RpcError>> + Send {
        async move {
            let reply = self
                .call(method::SEND_RAW_TRANSACTION, json!([raw_hex]))
                .await?;
            match reply.as_str() {
                Some(hash) if !hash.is_empty() => Ok(ReceiptRef::new(hash)),
                _ => Err(RpcError::invalid(
                    method::SEND_RAW_TRANSACTION,
                    format!("expected a transaction hash, got {reply}"),
                )),
            }
        }
    }

    /// The receipt for `receipt`, or `None` while it is not yet available.
    fn transaction_receipt(
        &self,
        receipt: &ReceiptRef,
    ) -> impl Future<Output = Result<Option<Value>, RpcError>> + Send {
        async move {
            let reply = self
                .call(method::GET_TRANSACTION_RECEIPT, json!([receipt.as_str()]))
                .await?;
            Ok((!reply.is_null()).then_some(reply))
        }
    }

    /// Balance of `address` in base units.
    fn balance(&self, address: &Address) -> impl Future<Output = Result<BaseAmount, RpcError>> + Send {
        async move {
            let reply = self
                .call(method::GET_BALANCE, json!([address.as_str(), method::LATEST]))
                .await?;
            parse_balance(&reply)
                .ok_or_else(|| RpcError::invalid(method::GET_BALANCE, format!("not a balance: {reply}")))
        }
    }

    fn node_metadata(&self) -> impl Future<Output = Result<NodeMetadata, RpcError>> + Send {
        async move {
            let reply = self.call(method::GET_NODE_METADATA, json!([])).await?;
            serde_json::from_value(reply)
                .map_err(|e| RpcError::invalid(method::GET_NODE_METADATA, e.to_string()))
        }
    }

    fn sharding_structure(
        &self,
    ) -> impl Future<Output = Result<Vec<ShardEndpoint>, RpcError>> + Send {
        async move {
            let reply = self.call(method::GET_SHARDING_STRUCTURE, json!([])).await?;
            serde_json::from_value(reply)
                .map_err(|e| RpcError::invalid(method::GET_SHARDING_STRUCTURE, e.to_string()))
        }
    }
}

/// Decode a JSON quantity: a number, a `0x` hex string, or a decimal string.
pub fn parse_quantity(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => match s.strip_prefix("0x") {
            Some(hex) if !hex.is_empty() => u64::from_str_radix(hex, 16).ok(),
            Some(_) => None,
            None => s.parse().ok(),
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantity_forms() {
        assert_eq!(parse_quantity(&json!(42)), Some(42));
        assert_eq!(parse_quantity(&json!("0x2a")), Some(42));
        assert_eq!(parse_quantity(&json!("42")), Some(42));
        assert_eq!(parse_quantity(&json!("0x")), None);
        assert_eq!(parse_quantity(&json!(-1)), None);
        assert_eq!(parse_quantity(&json!(null)), None);
    }

    #[test]
    fn sharding_structure_decodes() {
        let reply = json!([
            {"current": true, "http": "https://api.s0.example", "shardID": 0, "ws": "wss://ws.s0.example"},
            {"current": false, "http": "https://api.s1.example", "shardID": 1}
        ]);
        let shards: Vec<ShardEndpoint> = serde_json::from_value(reply).unwrap();
        assert_eq!(shards.len(), 2);
        assert_eq!(shards[1].shard_id, 1);
        assert_eq!(shards[1].http, "https://api.s1.example");
        assert!(shards[1].ws.is_empty());
    }

    #[test]
    fn node_metadata_decodes() {
        let meta: NodeMetadata =
            serde_json::from_value(json!({"shard-id": 3, "network": "devnet"})).unwrap();
        assert_eq!(meta.shard_id, 3);
        assert_eq!(meta.network, "devnet");
    }
}
