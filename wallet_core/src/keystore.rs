//! Argon2id encrypted keystore for Ed25519 private keys.
//!
//! Encrypts a 32-byte Ed25519 secret key with a user-chosen password:
//! 1. Argon2id derives a 32-byte encryption key from the password + random salt
//! 2. AES-256-GCM encrypts the secret key with a random nonce
//! 3. The result is stored as a JSON file with all parameters for future decryption
//!
//! The address and public key are stored in clear so accounts can be listed
//! without a password.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use argon2::{Algorithm, Argon2, Params, Version};
use poc_crypto::{derive_address, public_from_private};
use poc_types::{Address, KeyPair, PrivateKey, PublicKey};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::path::Path;
use zeroize::Zeroizing;

use crate::error::WalletError;

pub const KEYSTORE_VERSION: u32 = 1;

const ARGON2_OUTPUT_LEN: usize = 32;
const SALT_LEN: usize = 32;
/// AES-GCM nonce length in bytes (96 bits).
const NONCE_LEN: usize = 12;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KeystoreFile {
    pub version: u32,
    pub address: Address,
    /// Hex-encoded Ed25519 public key.
    pub public_key: String,
    pub crypto: KeystoreCrypto,
}

impl KeystoreFile {
    pub fn public_key(&self) -> Result<PublicKey, WalletError> {
        hex::decode(&self.public_key)
            .ok()
            .and_then(|bytes| PublicKey::from_slice(&bytes))
            .ok_or_else(|| WalletError::Key("invalid public key hex".into()))
    }
}

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

/// Argon2id cost parameters. Defaults: 64 MiB memory, 3 iterations, 1 lane.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KdfParams {
    /// Memory cost in KiB.
    pub memory: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory: 65536,
            iterations: 3,
            parallelism: 1,
        }
    }
}

/// Encrypt a key pair's secret with a password using Argon2id + AES-256-GCM.
pub fn encrypt_keystore(
    keypair: &KeyPair,
    password: &str,
    kdf: &KdfParams,
) -> Result<KeystoreFile, WalletError> {
    let mut rng = rand::thread_rng();

    let mut salt = [0u8; SALT_LEN];
    rng.fill_bytes(&mut salt);

    let mut nonce_bytes = [0u8; NONCE_LEN];
    rng.fill_bytes(&mut nonce_bytes);

    let derived_key = derive_key(password, &salt, kdf)?;
    let cipher = Aes256Gcm::new_from_slice(&*derived_key)
        .map_err(|e| WalletError::Key(format!("AES key init failed: {e}")))?;

    let nonce = Nonce::from_slice(&nonce_bytes);
    let ciphertext = cipher
        .encrypt(nonce, &keypair.private.0[..])
        .map_err(|e| WalletError::Key(format!("encryption failed: {e}")))?;

    Ok(KeystoreFile {
        version: KEYSTORE_VERSION,
        address: derive_address(&keypair.public),
        public_key: hex::encode(keypair.public.as_bytes()),
        crypto: KeystoreCrypto {
            cipher: "aes-256-gcm".to_string(),
            kdf: "argon2id".to_string(),
            kdf_params: kdf.clone(),
            salt: hex::encode(salt),
            nonce: hex::encode(nonce_bytes),
            ciphertext: hex::encode(ciphertext),
        },
    })
}

/// Decrypt a keystore file with the given password.
///
/// An authentication failure is reported as [`WalletError::InvalidPassword`].
pub fn decrypt_keystore(
    keystore: &KeystoreFile,
    password: &str,
) -> Result<PrivateKey, WalletError> {
    if keystore.version != KEYSTORE_VERSION {
        return Err(WalletError::Key(format!(
            "unsupported keystore version: {}",
            keystore.version
        )));
    }

    let salt = hex::decode(&keystore.crypto.salt)
        .map_err(|e| WalletError::Key(format!("invalid salt hex: {e}")))?;
    let nonce_bytes = hex::decode(&keystore.crypto.nonce)
        .map_err(|e| WalletError::Key(format!("invalid nonce hex: {e}")))?;
    let ciphertext = hex::decode(&keystore.crypto.ciphertext)
        .map_err(|e| WalletError::Key(format!("invalid ciphertext hex: {e}")))?;

    if nonce_bytes.len() != NONCE_LEN {
        return Err(WalletError::Key(format!(
            "invalid nonce length: expected {}, got {}",
            NONCE_LEN,
            nonce_bytes.len()
        )));
    }

    let derived_key = derive_key(password, &salt, &keystore.crypto.kdf_params)?;
    let cipher = Aes256Gcm::new_from_slice(&*derived_key)
        .map_err(|e| WalletError::Key(format!("AES key init failed: {e}")))?;

    let nonce = Nonce::from_slice(&nonce_bytes);
    let plaintext = Zeroizing::new(
        cipher
            .decrypt(nonce, ciphertext.as_slice())
            .map_err(|_| WalletError::InvalidPassword)?,
    );

    if plaintext.len() != 32 {
        return Err(WalletError::Key(format!(
            "decrypted key has wrong length: expected 32, got {}",
            plaintext.len()
        )));
    }

    let mut secret = PrivateKey([0u8; 32]);
    secret.0.copy_from_slice(&plaintext);

    if public_from_private(&secret) != keystore.public_key()? {
        return Err(WalletError::Key(
            "decrypted key does not match the stored public key".into(),
        ));
    }
    Ok(secret)
}

pub fn save_keystore(keystore: &KeystoreFile, path: &Path) -> Result<(), WalletError> {
    let json = serde_json::to_string_pretty(keystore)?;
    std::fs::write(path, json)?;
    Ok(())
}

pub fn load_keystore(path: &Path) -> Result<KeystoreFile, WalletError> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

fn derive_key(
    password: &str,
    salt: &[u8],
    kdf: &KdfParams,
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
        .hash_password_into(password.as_bytes(), salt, &mut *output)
        .map_err(|e| WalletError::Key(format!("Argon2 hashing failed: {e}")))?;

    Ok(output)
}
