//! Ed25519 signing and verification of encoded transaction drafts.
//!
//! Drafts are signed over a Blake2b-256 digest of `domain || message`, where the
//! domain carries the chain id. A signature for one chain never verifies on another.

use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};
use shardblast_types::{PrivateKey, PublicKey, Signature};

use crate::hash::blake2b_256_multi;

/// Sign a raw message with a private key.
pub fn sign_message(message: &[u8], private_key: &PrivateKey) -> Signature {
    let sig = SigningKey::from_bytes(&private_key.0).sign(message);
    Signature(sig.to_bytes())
}

/// Verify a signature over a raw message.
///
/// Returns `false` for malformed public keys as well as bad signatures.
pub fn verify_signature(message: &[u8], signature: &Signature, public_key: &PublicKey) -> bool {
    let Ok(verifying_key) = VerifyingKey::from_bytes(&public_key.0) else {
        return false;
    };
    let dalek_sig = ed25519_dalek::Signature::from_bytes(&signature.0);
    verifying_key.verify(message, &dalek_sig).is_ok()
}

/// Sign `message` bound to `domain`.
pub fn sign_in_domain(domain: &[u8], message: &[u8], private_key: &PrivateKey) -> Signature {
    sign_message(&blake2b_256_multi(&[domain, message]), private_key)
}

/// Verify a signature produced by [`sign_in_domain`].
pub fn verify_in_domain(
    domain: &[u8],
    message: &[u8],
    signature: &Signature,
    public_key: &PublicKey,
) -> bool {
    verify_signature(&blake2b_256_multi(&[domain, message]), signature, public_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{generate_keypair, keypair_from_seed};

    #[test]
    fn sign_and_verify() {
        let kp = generate_keypair();
        let sig = sign_message(b"draft bytes", &kp.private);
        assert!(verify_signature(b"draft bytes", &sig, &kp.public));
        assert!(!verify_signature(b"other bytes", &sig, &kp.public));
    }

    #[test]
    fn signatures_are_deterministic() {
        let kp = keypair_from_seed(&[99u8; 32]);
        assert_eq!(
            sign_message(b"x", &kp.private),
            sign_message(b"x", &kp.private)
        );
    }

    #[test]
    fn domain_separation() {
        let kp = generate_keypair();
        let sig = sign_in_domain(b"chain-1", b"draft", &kp.private);
        assert!(verify_in_domain(b"chain-1", b"draft", &sig, &kp.public));
        assert!(!verify_in_domain(b"chain-2", b"draft", &sig, &kp.public));
    }

    #[test]
    fn invalid_public_key() {
        let kp = generate_keypair();
        let sig = sign_message(b"test", &kp.private);
        assert!(!verify_signature(b"test", &sig, &PublicKey([0xFF; 32])));
    }
}
