//! Sending-account wallet for shardblast.
//!
//! - Argon2id + AES-256-GCM encrypted keystore files, looked up by address
//! - The [`TxSigner`] capability used by the dispatcher, and its keystore-backed
//!   implementation

pub mod error;
pub mod keystore;
pub mod signer;

pub use error::WalletError;
pub use keystore::{
    create_keystore, decrypt_keystore, encrypt_keystore, find_keystore, load_keystore,
    save_keystore, unlock_keystore, KdfParams, KeystoreFile,
};
pub use signer::{KeystoreSigner, TxSigner};
