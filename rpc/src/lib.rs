//! JSON-RPC client side of shardblast.
//!
//! - [`NodeRpc`]: the network call capability, with typed helpers for the
//!   handful of methods the sender needs
//! - [`HttpMessenger`]: the `reqwest`-backed implementation
//! - Shard endpoint resolution and balance lookups

pub mod balance;
pub mod client;
pub mod error;
pub mod method;
pub mod node;
pub mod shards;

pub use balance::{fetch_balances, parse_balance, ShardBalance};
pub use client::HttpMessenger;
pub use error::RpcError;
pub use node::{parse_quantity, NodeMetadata, NodeRpc, ShardEndpoint};
pub use shards::{is_ip_endpoint, resolve_shard_endpoint};
