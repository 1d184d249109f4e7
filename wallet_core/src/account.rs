//! The account collaborator: lookup, password checks and signing.

use std::sync::Arc;

use poc_transactions::TxSignature;
use poc_types::{Address, PublicKey, TxHash};
use serde::{Deserialize, Serialize};

use crate::WalletError;

/// A locally known account. Holds no secret material.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub address: Address,
    pub public_key: PublicKey,
}

pub trait AccountService: Send + Sync {
    fn get_account(&self, address: &Address) -> Option<Account>;

    fn validate_password(&self, account: &Account, password: &str) -> bool;

    /// Sign a transaction hash with the account's key.
    ///
    /// Fails with [`WalletError::InvalidPassword`] or [`WalletError::KeyUnavailable`].
    fn sign(
        &self,
        hash: &TxHash,
        account: &Account,
        password: &str,
    ) -> Result<TxSignature, WalletError>;
}

impl<T: AccountService + ?Sized> AccountService for Arc<T> {
    fn get_account(&self, address: &Address) -> Option<Account> {
        (**self).get_account(address)
    }

    fn validate_password(&self, account: &Account, password: &str) -> bool {
        (**self).validate_password(account, password)
    }

    fn sign(
        &self,
        hash: &TxHash,
        account: &Account,
        password: &str,
    ) -> Result<TxSignature, WalletError> {
        (**self).sign(hash, account, password)
    }
}
