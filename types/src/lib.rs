//! Fundamental types for shardblast.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! addresses, shard and chain identifiers, key material, hashes, and the per-transaction
//! send request.

pub mod address;
pub mod amount;
pub mod chain;
pub mod error;
pub mod hash;
pub mod keys;
pub mod request;
pub mod shard;

pub use address::Address;
pub use amount::BaseAmount;
pub use chain::ChainId;
pub use error::TypesError;
pub use hash::{ReceiptRef, TxHash};
pub use keys::{KeyPair, PrivateKey, PublicKey, Signature};
pub use request::SendRequest;
pub use shard::ShardId;
