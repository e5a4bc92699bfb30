//! Value-transfer transactions for shardblast.
//!
//! - **gas**: intrinsic gas from payload size
//! - **units**: scaling operator-entered amounts into base units
//! - **draft**: the unsigned transaction
//! - **builder**: `SendRequest` → `TransactionDraft`
//! - **signed**: the signed transaction and its raw submission encoding

pub mod builder;
pub mod draft;
pub mod error;
pub mod gas;
pub mod signed;
pub mod units;

pub use builder::build;
pub use draft::TransactionDraft;
pub use error::TransactionError;
pub use gas::intrinsic_gas;
pub use signed::SignedTransaction;
