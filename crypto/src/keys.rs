//! Ed25519 key generation and import for sending accounts.

use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;
use shardblast_types::{KeyPair, PrivateKey, PublicKey};

fn keypair_from_signing_key(signing_key: &SigningKey) -> KeyPair {
    KeyPair {
        public: PublicKey(signing_key.verifying_key().to_bytes()),
        private: PrivateKey(signing_key.to_bytes()),
    }
}

/// Generate a new key pair from the operating system's secure random source.
pub fn generate_keypair() -> KeyPair {
    keypair_from_signing_key(&SigningKey::generate(&mut OsRng))
}

/// Derive the public key from a private key.
pub fn public_from_private(private: &PrivateKey) -> PublicKey {
    PublicKey(SigningKey::from_bytes(&private.0).verifying_key().to_bytes())
}

/// Reconstruct a full key pair from a private key (e.g. after keystore decryption).
pub fn keypair_from_private(private: PrivateKey) -> KeyPair {
    let public = public_from_private(&private);
    KeyPair { public, private }
}

/// Derive a key pair from a 32-byte seed.
///
/// Used for reproducible test accounts (`keystore new --seed`).
pub fn keypair_from_seed(seed: &[u8; 32]) -> KeyPair {
    keypair_from_signing_key(&SigningKey::from_bytes(seed))
}
