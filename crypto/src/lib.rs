//! Cryptographic primitives for shardblast.
//!
//! - **Ed25519** for signing transaction drafts
//! - **Blake2b** for hashing signed transactions and deriving account ids
//! - Address derivation for keystores created by this tool

pub mod address;
pub mod hash;
pub mod keys;
pub mod sign;

pub use address::derive_address;
pub use hash::{blake2b_256, hash_transaction};
pub use keys::{generate_keypair, keypair_from_private, keypair_from_seed};
pub use sign::{sign_in_domain, verify_in_domain};
