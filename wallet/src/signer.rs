//! The signing capability handed to the dispatcher.

use shardblast_crypto::derive_address;
use shardblast_transactions::{SignedTransaction, TransactionDraft};
use shardblast_types::{Address, ChainId, KeyPair};
use std::path::Path;

use crate::error::WalletError;
use crate::keystore::unlock_keystore;

/// Signs transaction drafts on behalf of one account.
///
/// Shared across every concurrent send task, so implementations must be safe
/// to call from many tasks at once.
pub trait TxSigner: Send + Sync {
    /// The account whose key signs.
    fn address(&self) -> &Address;

    /// Sign `draft` for `chain`.
    fn sign(
        &self,
        draft: TransactionDraft,
        chain: ChainId,
    ) -> Result<SignedTransaction, WalletError>;
}

/// A signer holding a key decrypted from the keystore.
///
/// Ed25519 signing only reads the key, so no lock is needed.
pub struct KeystoreSigner {
    keys: KeyPair,
    address: Address,
}

impl KeystoreSigner {
    pub fn from_keys(keys: KeyPair) -> Self {
        let address = derive_address(&keys.public);
        Self { keys, address }
    }

    /// Find the keystore for `address` in `dir` and decrypt it.
    pub fn unlock(dir: &Path, address: &Address, passphrase: &str) -> Result<Self, WalletError> {
        let keys = unlock_keystore(dir, address, passphrase)?;
        tracing::info!(%address, "keystore unlocked");
        Ok(Self::from_keys(keys))
    }
}

impl TxSigner for KeystoreSigner {
    fn address(&self) -> &Address {
        &self.address
    }

    fn sign(
        &self,
        draft: TransactionDraft,
        chain: ChainId,
    ) -> Result<SignedTransaction, WalletError> {
        Ok(SignedTransaction::sign(draft, chain, &self.keys)?)
    }
}
