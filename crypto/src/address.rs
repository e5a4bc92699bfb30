//! Account address derivation from public keys.
//!
//! Address format: `one1` + base32(account_id, 32 chars) + base32(checksum, 8 chars)
//!
//! - account id: last 20 bytes of Blake2b-256(public_key)
//! - checksum: first 5 bytes of Blake2b-256(account_id)
//! - alphabet: the bech32 data alphabet, so addresses look familiar to operators.
//!
//! Only keystores created by this tool use these addresses. Receiver addresses
//! are passed through to the node untouched.

use shardblast_types::{Address, PublicKey};

/// Base32 alphabet (bech32 data characters).
const BASE32_ALPHABET: &[u8; 32] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";

/// Human-readable prefix.
const HRP: &str = "one";
/// Account id length in bytes.
const ACCOUNT_ID_LEN: usize = 20;
/// 160 bits → 32 base32 characters.
const ACCOUNT_CHARS: usize = 32;
/// 40 bits → 8 base32 characters.
const CHECKSUM_CHARS: usize = 8;

fn encode_base32(bytes: &[u8]) -> String {
    let num_chars = (bytes.len() * 8).div_ceil(5);
    let mut result = String::with_capacity(num_chars);

    let mut buffer: u64 = 0;
    let mut bits_in_buffer = 0;

    for &byte in bytes {
        buffer = (buffer << 8) | byte as u64;
        bits_in_buffer += 8;
        while bits_in_buffer >= 5 {
            bits_in_buffer -= 5;
            let idx = ((buffer >> bits_in_buffer) & 0x1F) as usize;
            result.push(BASE32_ALPHABET[idx] as char);
        }
    }
    if bits_in_buffer > 0 {
        let idx = ((buffer << (5 - bits_in_buffer)) & 0x1F) as usize;
        result.push(BASE32_ALPHABET[idx] as char);
    }

    result
}

/// The 20-byte account id behind an address.
fn account_id(public_key: &PublicKey) -> [u8; ACCOUNT_ID_LEN] {
    let digest = crate::blake2b_256(public_key.as_bytes());
    let mut id = [0u8; ACCOUNT_ID_LEN];
    id.copy_from_slice(&digest[32 - ACCOUNT_ID_LEN..]);
    id
}

/// Derive a `one1`-prefixed address from a public key.
pub fn derive_address(public_key: &PublicKey) -> Address {
    let id = account_id(public_key);
    let checksum = crate::blake2b_256(&id);
    let raw = format!(
        "{HRP}1{}{}",
        encode_base32(&id),
        encode_base32(&checksum[..5])
    );
    Address::parse(&raw).expect("base32 alphabet never yields whitespace")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{generate_keypair, keypair_from_seed};

    #[test]
    fn derived_address_shape() {
        let kp = generate_keypair();
        let addr = derive_address(&kp.public);
        assert!(addr.as_str().starts_with("one1"));
        assert_eq!(addr.as_str().len(), 4 + ACCOUNT_CHARS + CHECKSUM_CHARS);
        assert!(addr.as_str()[4..]
            .bytes()
            .all(|c| BASE32_ALPHABET.contains(&c)));
    }

    #[test]
    fn derive_is_deterministic() {
        let kp = keypair_from_seed(&[7u8; 32]);
        assert_eq!(derive_address(&kp.public), derive_address(&kp.public));
    }

    #[test]
    fn distinct_keys_give_distinct_addresses() {
        let a = derive_address(&keypair_from_seed(&[1u8; 32]).public);
        let b = derive_address(&keypair_from_seed(&[2u8; 32]).public);
        assert_ne!(a, b);
    }

    #[test]
    fn encodes_known_bytes() {
        assert_eq!(encode_base32(&[0u8; 5]), "qqqqqqqq");
        assert_eq!(encode_base32(&[0xFF]), "lu");
    }
}
