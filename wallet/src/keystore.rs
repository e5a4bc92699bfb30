//! Argon2id encrypted keystore for the sending account's Ed25519 key.
//!
//! Encrypts a 32-byte secret key with a passphrase:
//! 1. Argon2id derives a 32-byte encryption key from the passphrase + random salt
//! 2. AES-256-GCM encrypts the secret key with a random nonce
//! 3. The result is stored as `<address>.json` in the keystore directory, with all
//!    parameters needed for decryption and the address it unlocks

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use shardblast_crypto::{derive_address, keypair_from_private};
use shardblast_types::{Address, KeyPair, PrivateKey};
use std::path::{Path, PathBuf};
use zeroize::Zeroizing;

use crate::error::WalletError;

const KEYSTORE_VERSION: u32 = 1;
const ARGON2_OUTPUT_LEN: usize = 32;
const SALT_LEN: usize = 32;
/// AES-GCM nonce length in bytes (96 bits).
const NONCE_LEN: usize = 12;

/// The keystore file, serializable to/from JSON.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KeystoreFile {
    pub version: u32,
    /// Address of the account this file unlocks.
    pub address: Address,
    pub crypto: KeystoreCrypto,
}

/// All encryption parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KeystoreCrypto {
    pub cipher: String,
    pub kdf: String,
    pub kdf_params: KdfParams,
    /// Hex-encoded salt.
    pub salt: String,
    /// Hex-encoded nonce.
    pub nonce: String,
    /// Hex-encoded ciphertext.
    pub ciphertext: String,
}

/// KDF parameters for Argon2id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    /// Memory cost in KiB.
    pub memory: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for KdfParams {
    /// 64 MB memory, 3 iterations, 1 lane.
    fn default() -> Self {
        Self {
            memory: 65536,
            iterations: 3,
            parallelism: 1,
        }
    }
}

impl KdfParams {
    /// Cheap parameters for throwaway test accounts.
    pub fn light() -> Self {
        Self {
            memory: 1024,
            iterations: 1,
            parallelism: 1,
        }
    }
}

/// Encrypt a 32-byte secret key with a passphrase.
pub fn encrypt_keystore(
    keys: &KeyPair,
    passphrase: &str,
    kdf_params: KdfParams,
) -> Result<KeystoreFile, WalletError> {
    let mut rng = rand::thread_rng();

    let mut salt = [0u8; SALT_LEN];
    rng.fill_bytes(&mut salt);

    let mut nonce_bytes = [0u8; NONCE_LEN];
    rng.fill_bytes(&mut nonce_bytes);

    let derived_key = derive_key(passphrase, &salt, kdf_params)?;
    let cipher = Aes256Gcm::new_from_slice(&derived_key[..])
        .map_err(|e| WalletError::Key(format!("AES key init failed: {e}")))?;

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce_bytes), &keys.private.0[..])
        .map_err(|e| WalletError::Key(format!("encryption failed: {e}")))?;

    Ok(KeystoreFile {
        version: KEYSTORE_VERSION,
        address: derive_address(&keys.public),
        crypto: KeystoreCrypto {
            cipher: "aes-256-gcm".to_string(),
            kdf: "argon2id".to_string(),
            kdf_params,
            salt: hex::encode(salt),
            nonce: hex::encode(nonce_bytes),
            ciphertext: hex::encode(ciphertext),
        },
    })
}

/// Decrypt a keystore with the given passphrase, returning the key pair.
///
/// The decrypted key must derive the address recorded in the file.
pub fn decrypt_keystore(keystore: &KeystoreFile, passphrase: &str) -> Result<KeyPair, WalletError> {
    if keystore.version != KEYSTORE_VERSION {
        return Err(WalletError::Format(format!(
            "unsupported keystore version: {}",
            keystore.version
        )));
    }

    let salt = decode_field("salt", &keystore.crypto.salt)?;
    let nonce_bytes = decode_field("nonce", &keystore.crypto.nonce)?;
    let ciphertext = decode_field("ciphertext", &keystore.crypto.ciphertext)?;

    if nonce_bytes.len() != NONCE_LEN {
        return Err(WalletError::Format(format!(
            "invalid nonce length: expected {NONCE_LEN}, got {}",
            nonce_bytes.len()
        )));
    }

    let derived_key = derive_key(passphrase, &salt, keystore.crypto.kdf_params)?;
    let cipher = Aes256Gcm::new_from_slice(&derived_key[..])
        .map_err(|e| WalletError::Key(format!("AES key init failed: {e}")))?;

    let plaintext = Zeroizing::new(
        cipher
            .decrypt(Nonce::from_slice(&nonce_bytes), ciphertext.as_slice())
            .map_err(|_| {
                WalletError::Key("decryption failed: wrong passphrase or corrupted data".into())
            })?,
    );

    let secret: [u8; 32] = plaintext.as_slice().try_into().map_err(|_| {
        WalletError::Format(format!(
            "decrypted key has wrong length: expected 32, got {}",
            plaintext.len()
        ))
    })?;

    let keys = keypair_from_private(PrivateKey(secret));
    let derived = derive_address(&keys.public);
    if derived != keystore.address {
        return Err(WalletError::Key(format!(
            "keystore is labelled {} but holds the key for {}",
            keystore.address, derived
        )));
    }
    Ok(keys)
}

/// Path of the keystore file for `address` inside `dir`.
pub fn keystore_path(dir: &Path, address: &Address) -> PathBuf {
    dir.join(format!("{address}.json"))
}

/// Save a keystore to a JSON file.
pub fn save_keystore(keystore: &KeystoreFile, path: &Path) -> Result<(), WalletError> {
    let json = serde_json::to_string_pretty(keystore)
        .map_err(|e| WalletError::Format(format!("JSON serialization failed: {e}")))?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Load a keystore from a JSON file.
pub fn load_keystore(path: &Path) -> Result<KeystoreFile, WalletError> {
    let json = std::fs::read_to_string(path)?;
    serde_json::from_str(&json)
        .map_err(|e| WalletError::Format(format!("{}: {e}", path.display())))
}

/// Encrypt `keys` and write them to `dir`, returning the file path.
pub fn create_keystore(
    dir: &Path,
    keys: &KeyPair,
    passphrase: &str,
    kdf_params: KdfParams,
) -> Result<PathBuf, WalletError> {
    std::fs::create_dir_all(dir)?;
    let keystore = encrypt_keystore(keys, passphrase, kdf_params)?;
    let path = keystore_path(dir, &keystore.address);
    save_keystore(&keystore, &path)?;
    tracing::info!(address = %keystore.address, path = %path.display(), "keystore created");
    Ok(path)
}

/// Find the keystore for `address` in `dir`.
///
/// Tries `<address>.json` first, then scans every `*.json` file for a matching
/// `address` field. Unreadable or foreign JSON files are skipped.
pub fn find_keystore(dir: &Path, address: &Address) -> Result<KeystoreFile, WalletError> {
    let direct = keystore_path(dir, address);
    if direct.is_file() {
        return load_keystore(&direct);
    }

    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        match load_keystore(&path) {
            Ok(ks) if &ks.address == address => return Ok(ks),
            Ok(_) => {}
            Err(e) => tracing::debug!(path = %path.display(), "skipping file: {e}"),
        }
    }

    Err(WalletError::KeystoreNotFound {
        address: address.to_string(),
        dir: dir.display().to_string(),
    })
}

/// Find and decrypt the keystore for `address`.
pub fn unlock_keystore(
    dir: &Path,
    address: &Address,
    passphrase: &str,
) -> Result<KeyPair, WalletError> {
    let keystore = find_keystore(dir, address)?;
    decrypt_keystore(&keystore, passphrase)
}

fn derive_key(
    passphrase: &str,
    salt: &[u8],
    kdf: KdfParams,
) -> Result<Zeroizing<[u8; 32]>, WalletError> {
    let params = Params::new(
        kdf.memory,
        kdf.iterations,
        kdf.parallelism,
        Some(ARGON2_OUTPUT_LEN),
    )
    .map_err(|e| WalletError::Key(format!("Argon2 params error: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut output = Zeroizing::new([0u8; 32]);
    argon2
        .hash_password_into(passphrase.as_bytes(), salt, output.as_mut_slice())
        .map_err(|e| WalletError::Key(format!("Argon2 hashing failed: {e}")))?;

    Ok(output)
}

fn decode_field(name: &str, value: &str) -> Result<Vec<u8>, WalletError> {
    hex::decode(value).map_err(|e| WalletError::Format(format!("invalid {name} hex: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shardblast_crypto::keypair_from_seed;

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let keys = keypair_from_seed(&[42u8; 32]);
        let keystore = encrypt_keystore(&keys, "test-passphrase", KdfParams::light()).unwrap();
        let unlocked = decrypt_keystore(&keystore, "test-passphrase").unwrap();
        assert_eq!(unlocked.public, keys.public);
        assert_eq!(keystore.address, derive_address(&keys.public));
    }

    #[test]
    fn wrong_passphrase_fails() {
        let keys = keypair_from_seed(&[42u8; 32]);
        let keystore = encrypt_keystore(&keys, "correct", KdfParams::light()).unwrap();
        assert!(matches!(
            decrypt_keystore(&keystore, "wrong"),
            Err(WalletError::Key(_))
        ));
    }

    #[test]
    fn default_kdf_params_are_recorded() {
        let keys = keypair_from_seed(&[0u8; 32]);
        let keystore = encrypt_keystore(&keys, "pass", KdfParams::default()).unwrap();
        assert_eq!(keystore.crypto.cipher, "aes-256-gcm");
        assert_eq!(keystore.crypto.kdf, "argon2id");
        assert_eq!(keystore.crypto.kdf_params.memory, 65536);
        assert_eq!(keystore.crypto.kdf_params.iterations, 3);
    }

    #[test]
    fn mislabelled_keystore_is_rejected() {
        let keys = keypair_from_seed(&[1u8; 32]);
        let mut keystore = encrypt_keystore(&keys, "pass", KdfParams::light()).unwrap();
        keystore.address = derive_address(&keypair_from_seed(&[2u8; 32]).public);
        assert!(decrypt_keystore(&keystore, "pass").is_err());
    }

    #[test]
    fn unsupported_version_rejected() {
        let keys = keypair_from_seed(&[0u8; 32]);
        let mut keystore = encrypt_keystore(&keys, "pass", KdfParams::light()).unwrap();
        keystore.version = 99;
        assert!(matches!(
            decrypt_keystore(&keystore, "pass"),
            Err(WalletError::Format(_))
        ));
    }

    #[test]
    fn create_then_unlock_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        let keys = keypair_from_seed(&[5u8; 32]);
        let path = create_keystore(dir.path(), &keys, "pw", KdfParams::light()).unwrap();
        assert!(path.is_file());

        let address = derive_address(&keys.public);
        let unlocked = unlock_keystore(dir.path(), &address, "pw").unwrap();
        assert_eq!(unlocked.public, keys.public);
    }

    #[test]
    fn find_scans_renamed_files() {
        let dir = tempfile::tempdir().unwrap();
        let keys = keypair_from_seed(&[6u8; 32]);
        let keystore = encrypt_keystore(&keys, "pw", KdfParams::light()).unwrap();
        save_keystore(&keystore, &dir.path().join("UTC--renamed.json")).unwrap();
        std::fs::write(dir.path().join("garbage.json"), "not json").unwrap();

        let found = find_keystore(dir.path(), &keystore.address).unwrap();
        assert_eq!(found.address, keystore.address);
    }

    #[test]
    fn missing_account_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let address = Address::parse("one1nobody").unwrap();
        assert!(matches!(
            find_keystore(dir.path(), &address),
            Err(WalletError::KeystoreNotFound { .. })
        ));
    }
}
