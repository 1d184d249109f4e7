//! [`AccountService`] backed by a directory of keystore files.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use poc_crypto::{generate_keypair, keypair_from_private, sign_message};
use poc_transactions::TxSignature;
use poc_types::{Address, PrivateKey, TxHash};
use tracing::{debug, warn};

use crate::account::{Account, AccountService};
use crate::keystore::{
    decrypt_keystore, encrypt_keystore, load_keystore, save_keystore, KdfParams, KeystoreFile,
};
use crate::WalletError;

/// One `<address>.json` keystore per account under `dir`.
pub struct KeystoreAccounts {
    dir: PathBuf,
    kdf: KdfParams,
    keystores: RwLock<HashMap<Address, KeystoreFile>>,
}

impl KeystoreAccounts {
    /// Load every readable keystore in `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>, kdf: KdfParams) -> Result<Self, WalletError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;

        let mut keystores = HashMap::new();
        for entry in std::fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            match load_keystore(&path) {
                Ok(keystore) => {
                    keystores.insert(keystore.address.clone(), keystore);
                }
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable keystore"),
            }
        }
        debug!(dir = %dir.display(), accounts = keystores.len(), "keystore directory loaded");

        Ok(Self {
            dir,
            kdf,
            keystores: RwLock::new(keystores),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Generate a fresh key pair and persist it under `password`.
    pub fn create(&self, password: &str) -> Result<Account, WalletError> {
        self.store(encrypt_keystore(&generate_keypair(), password, &self.kdf)?)
    }

    /// Persist an existing private key under `password`.
    pub fn import(&self, private: PrivateKey, password: &str) -> Result<Account, WalletError> {
        self.store(encrypt_keystore(&keypair_from_private(private), password, &self.kdf)?)
    }

    pub fn accounts(&self) -> Vec<Address> {
        let mut addresses: Vec<_> = self.read_keystores().keys().cloned().collect();
        addresses.sort();
        addresses
    }

    fn store(&self, keystore: KeystoreFile) -> Result<Account, WalletError> {
        let account = Account {
            address: keystore.address.clone(),
            public_key: keystore.public_key()?,
        };
        save_keystore(&keystore, &self.dir.join(format!("{}.json", account.address)))?;
        self.keystores
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(account.address.clone(), keystore);
        debug!(address = %account.address, "account stored");
        Ok(account)
    }

    fn read_keystores(&self) -> std::sync::RwLockReadGuard<'_, HashMap<Address, KeystoreFile>> {
        self.keystores
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn keystore(&self, address: &Address) -> Option<KeystoreFile> {
        self.read_keystores().get(address).cloned()
    }

    fn unlock(&self, account: &Account, password: &str) -> Result<PrivateKey, WalletError> {
        let keystore = self
            .keystore(&account.address)
            .ok_or_else(|| WalletError::AccountNotFound(account.address.clone()))?;
        decrypt_keystore(&keystore, password)
    }
}

impl AccountService for KeystoreAccounts {
    fn get_account(&self, address: &Address) -> Option<Account> {
        let keystore = self.keystore(address)?;
        let public_key = keystore.public_key().ok()?;
        Some(Account {
            address: keystore.address,
            public_key,
        })
    }

    fn validate_password(&self, account: &Account, password: &str) -> bool {
        self.unlock(account, password).is_ok()
    }

    fn sign(
        &self,
        hash: &TxHash,
        account: &Account,
        password: &str,
    ) -> Result<TxSignature, WalletError> {
        let private = self.unlock(account, password).map_err(|e| match e {
            WalletError::InvalidPassword => WalletError::InvalidPassword,
            other => WalletError::KeyUnavailable(other.to_string()),
        })?;
        Ok(TxSignature {
            public_key: account.public_key.clone(),
            signature: sign_message(hash.as_bytes(), &private),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use poc_crypto::{keypair_from_seed, verify_signature};

    fn fast_kdf() -> KdfParams {
        KdfParams {
            memory: 64,
            iterations: 1,
            parallelism: 1,
        }
    }

    #[test]
    fn created_account_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let account = {
            let accounts = KeystoreAccounts::open(dir.path(), fast_kdf()).unwrap();
            accounts.create("pw").unwrap()
        };

        let reopened = KeystoreAccounts::open(dir.path(), fast_kdf()).unwrap();
        assert_eq!(reopened.get_account(&account.address), Some(account.clone()));
        assert_eq!(reopened.accounts(), vec![account.address]);
    }

    #[test]
    fn password_validation() {
        let dir = tempfile::tempdir().unwrap();
        let accounts = KeystoreAccounts::open(dir.path(), fast_kdf()).unwrap();
        let account = accounts.create("right").unwrap();
        assert!(accounts.validate_password(&account, "right"));
        assert!(!accounts.validate_password(&account, "wrong"));
    }

    #[test]
    fn sign_produces_verifiable_signature() {
        let dir = tempfile::tempdir().unwrap();
        let accounts = KeystoreAccounts::open(dir.path(), fast_kdf()).unwrap();
        let kp = keypair_from_seed(&[4u8; 32]);
        let account = accounts.import(PrivateKey(kp.private.0), "pw").unwrap();
        assert_eq!(account.public_key, kp.public);

        let hash = TxHash::new([8u8; 32]);
        let sig = accounts.sign(&hash, &account, "pw").unwrap();
        assert!(verify_signature(hash.as_bytes(), &sig.signature, &sig.public_key));
    }

    #[test]
    fn sign_with_wrong_password_fails() {
        let dir = tempfile::tempdir().unwrap();
        let accounts = KeystoreAccounts::open(dir.path(), fast_kdf()).unwrap();
        let account = accounts.create("pw").unwrap();
        assert!(matches!(
            accounts.sign(&TxHash::ZERO, &account, "nope"),
            Err(WalletError::InvalidPassword)
        ));
    }

    #[test]
    fn unknown_account_key_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let accounts = KeystoreAccounts::open(dir.path(), fast_kdf()).unwrap();
        let stranger = Account {
            address: Address::parse("poc_stranger").unwrap(),
            public_key: keypair_from_seed(&[1u8; 32]).public,
        };
        assert!(accounts.get_account(&stranger.address).is_none());
        assert!(matches!(
            accounts.sign(&TxHash::ZERO, &stranger, "pw"),
            Err(WalletError::KeyUnavailable(_))
        ));
    }

    #[test]
    fn non_json_files_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), "hello").unwrap();
        std::fs::write(dir.path().join("broken.json"), "{").unwrap();
        let accounts = KeystoreAccounts::open(dir.path(), fast_kdf()).unwrap();
        assert!(accounts.accounts().is_empty());
    }
}
