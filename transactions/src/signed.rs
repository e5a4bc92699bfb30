//! Signed transactions and their raw submission encoding.

use serde::{Deserialize, Serialize};
use shardblast_crypto::{hash_transaction, sign_in_domain, verify_in_domain};
use shardblast_types::{ChainId, KeyPair, PublicKey, Signature, TxHash};

use crate::draft::TransactionDraft;
use crate::error::TransactionError;

/// A draft plus the signature that authorizes it on one chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    pub draft: TransactionDraft,
    pub chain_id: u64,
    pub public_key: PublicKey,
    pub signature: Signature,
}

fn chain_domain(chain_id: u64) -> [u8; 8] {
    chain_id.to_be_bytes()
}

impl SignedTransaction {
    /// Sign `draft` for `chain` with `keys`.
    pub fn sign(
        draft: TransactionDraft,
        chain: ChainId,
        keys: &KeyPair,
    ) -> Result<Self, TransactionError> {
        let chain_id = chain.value();
        let message = draft.signing_bytes()?;
        let signature = sign_in_domain(&chain_domain(chain_id), &message, &keys.private);
        Ok(Self {
            draft,
            chain_id,
            public_key: keys.public.clone(),
            signature,
        })
    }

    /// Check the signature against the embedded public key.
    pub fn verify(&self) -> bool {
        match self.draft.signing_bytes() {
            Ok(message) => verify_in_domain(
                &chain_domain(self.chain_id),
                &message,
                &self.signature,
                &self.public_key,
            ),
            Err(_) => false,
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, TransactionError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, TransactionError> {
        Ok(bincode::deserialize(bytes)?)
    }

    /// `0x`-prefixed hex of [`encode`](Self::encode), the form nodes accept.
    pub fn to_raw_hex(&self) -> Result<String, TransactionError> {
        Ok(format!("0x{}", hex::encode(self.encode()?)))
    }

    pub fn from_raw_hex(raw: &str) -> Result<Self, TransactionError> {
        let bytes = hex::decode(raw.trim_start_matches("0x"))
            .map_err(|e| TransactionError::Encoding(e.to_string()))?;
        Self::decode(&bytes)
    }

    /// Local digest of the encoded transaction.
    pub fn hash(&self) -> Result<TxHash, TransactionError> {
        Ok(hash_transaction(&self.encode()?))
    }
}
