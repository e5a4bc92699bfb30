//! Nullable signer: a fixed key that can be told to fail.

use shardblast_crypto::{derive_address, keypair_from_seed};
use shardblast_transactions::{SignedTransaction, TransactionDraft};
use shardblast_types::{Address, ChainId, KeyPair, PublicKey};
use shardblast_wallet::{TxSigner, WalletError};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// A signer with a deterministic key and scripted failures.
pub struct NullSigner {
    keys: KeyPair,
    address: Address,
    failing: Mutex<HashSet<u64>>,
    signed: AtomicUsize,
}

impl NullSigner {
    pub fn new() -> Self {
        Self::from_seed([1u8; 32])
    }

    pub fn from_seed(seed: [u8; 32]) -> Self {
        let keys = keypair_from_seed(&seed);
        let address = derive_address(&keys.public);
        Self {
            keys,
            address,
            failing: Mutex::new(HashSet::new()),
            signed: AtomicUsize::new(0),
        }
    }

    /// Refuse to sign drafts carrying `nonce`.
    pub fn fail_for(&self, nonce: u64) {
        self.failing
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(nonce);
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.keys.public
    }

    /// Number of drafts signed successfully.
    pub fn signed_count(&self) -> usize {
        self.signed.load(Ordering::SeqCst)
    }
}

impl Default for NullSigner {
    fn default() -> Self {
        Self::new()
    }
}

impl TxSigner for NullSigner {
    fn address(&self) -> &Address {
        &self.address
    }

    fn sign(
        &self,
        draft: TransactionDraft,
        chain: ChainId,
    ) -> Result<SignedTransaction, WalletError> {
        let refused = self
            .failing
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .contains(&draft.nonce);
        if refused {
            return Err(WalletError::Signing(format!(
                "signer refused nonce {}",
                draft.nonce
            )));
        }
        let signed = SignedTransaction::sign(draft, chain, &self.keys)?;
        self.signed.fetch_add(1, Ordering::SeqCst);
        Ok(signed)
    }
}
