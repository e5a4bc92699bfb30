//! Nullable infrastructure for deterministic testing.
//!
//! Inspired by the "A-frame architecture" pattern from RsNano.
//! The node and the signing key are abstracted behind traits (`NodeRpc`,
//! `TxSigner`). This crate provides test-friendly implementations that:
//! - Return deterministic values
//! - Can be scripted to fail, stall, or confirm late
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod rpc;
pub mod signer;

pub use rpc::NullRpc;
pub use signer::NullSigner;
