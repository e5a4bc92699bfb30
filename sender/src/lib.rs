//! Bulk transaction sending for a sharded chain.
//!
//! A run sends `tx_count` value transfers from one account to randomly picked
//! receivers, `pool_size` at a time:
//!
//! - [`receivers`]: the receiver list and random selection
//! - [`nonce`]: starting nonce and the dispatcher-owned counter
//! - [`broadcaster`]: build, sign, submit and optionally confirm one transaction
//! - [`scheduler`]: pools, nonce assignment, barriers and refreshes
//! - [`runner`]: a complete run from a [`SenderConfig`]

pub mod broadcaster;
pub mod config;
pub mod error;
pub mod nonce;
pub mod receivers;
pub mod runner;
pub mod scheduler;

pub use broadcaster::{await_confirmation, Broadcaster, Confirmation, SendOutcome};
pub use config::SenderConfig;
pub use error::SenderError;
pub use nonce::{resolve_nonce, NonceCounter, Refresh};
pub use receivers::{load_receivers, pick_random, ReceiverSource};
pub use runner::{execute, load_payload, log_balance};
pub use scheduler::{
    DispatchOptions, DispatchPlan, DispatchState, Dispatcher, RequestTemplate, RunReport,
    RunSummary, SendAttempt,
};
