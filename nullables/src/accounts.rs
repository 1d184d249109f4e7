//! Nullable account service: in-memory keys and passwords.

use poc_crypto::{derive_address, keypair_from_seed, sign_message};
use poc_transactions::TxSignature;
use poc_types::{Address, KeyPair, TxHash};
use poc_wallet_core::{Account, AccountService, WalletError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

struct Entry {
    keypair: KeyPair,
    password: String,
}

#[derive(Default)]
pub struct NullAccounts {
    entries: Mutex<HashMap<Address, Entry>>,
    key_unavailable: AtomicBool,
    sign_requests: AtomicUsize,
}

impl NullAccounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an account whose key is derived from `seed`.
    pub fn add(&self, seed: u8, password: &str) -> Account {
        let keypair = keypair_from_seed(&[seed; 32]);
        let account = Account {
            address: derive_address(&keypair.public),
            public_key: keypair.public.clone(),
        };
        self.entries.lock().unwrap().insert(
            account.address.clone(),
            Entry {
                keypair,
                password: password.to_string(),
            },
        );
        account
    }

    /// Make every subsequent `sign` call fail with `KeyUnavailable`.
    pub fn set_key_unavailable(&self, unavailable: bool) {
        self.key_unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn sign_requests(&self) -> usize {
        self.sign_requests.load(Ordering::SeqCst)
    }
}

impl AccountService for NullAccounts {
    fn get_account(&self, address: &Address) -> Option<Account> {
        self.entries.lock().unwrap().get(address).map(|entry| Account {
            address: address.clone(),
            public_key: entry.keypair.public.clone(),
        })
    }

    fn validate_password(&self, account: &Account, password: &str) -> bool {
        self.entries
            .lock()
            .unwrap()
            .get(&account.address)
            .is_some_and(|entry| entry.password == password)
    }

    fn sign(
        &self,
        hash: &TxHash,
        account: &Account,
        password: &str,
    ) -> Result<TxSignature, WalletError> {
        self.sign_requests.fetch_add(1, Ordering::SeqCst);
        if self.key_unavailable.load(Ordering::SeqCst) {
            return Err(WalletError::KeyUnavailable("key store offline".into()));
        }
        let entries = self.entries.lock().unwrap();
        let entry = entries
            .get(&account.address)
            .ok_or_else(|| WalletError::AccountNotFound(account.address.clone()))?;
        if entry.password != password {
            return Err(WalletError::InvalidPassword);
        }
        Ok(TxSignature {
            public_key: entry.keypair.public.clone(),
            signature: sign_message(hash.as_bytes(), &entry.keypair.private),
        })
    }
}
