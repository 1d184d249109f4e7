//! The ledger as seen from the consensus core.
//!
//! Balance accounting, lock bookkeeping and transaction persistence all live
//! behind this trait. Implementations must be safe to share across threads:
//! concurrent callers may request locks and unlocks at the same time.

use std::sync::Arc;

use poc_transactions::{LockTransaction, SignedTransaction, UnlockTransaction};
use poc_types::{Address, Na, TxHash};

use crate::LedgerError;

pub trait LedgerService: Send + Sync {
    /// Reserve `amount` of `address`'s spendable balance.
    ///
    /// Fails with [`LedgerError::InsufficientFunds`] when the balance cannot cover it.
    fn create_lock_tx(
        &self,
        address: &Address,
        password: &str,
        amount: Na,
    ) -> Result<LockTransaction, LedgerError>;

    /// Release a lock. Each lock can be released once; a second request fails
    /// with [`LedgerError::AlreadyUnlocked`] even when both arrive concurrently.
    fn create_unlock_tx(&self, lock: &LockTransaction) -> Result<UnlockTransaction, LedgerError>;

    /// Reverse an unlock whose exit transaction was never published: the
    /// funds go back under the lock and the lock can be released again.
    ///
    /// Fails with [`LedgerError::LockStillHeld`] if the lock is not released.
    fn cancel_unlock(&self, unlock: &UnlockTransaction) -> Result<(), LedgerError>;

    fn cache_tx(&self, tx: SignedTransaction) -> Result<(), LedgerError>;

    fn get_transaction(&self, hash: &TxHash) -> Result<Option<SignedTransaction>, LedgerError>;

    /// Height of the best known block, used by the fee schedule.
    fn best_height(&self) -> u64;
}

impl<T: LedgerService + ?Sized> LedgerService for Arc<T> {
    fn create_lock_tx(
        &self,
        address: &Address,
        password: &str,
        amount: Na,
    ) -> Result<LockTransaction, LedgerError> {
        (**self).create_lock_tx(address, password, amount)
    }

    fn create_unlock_tx(&self, lock: &LockTransaction) -> Result<UnlockTransaction, LedgerError> {
        (**self).create_unlock_tx(lock)
    }

    fn cancel_unlock(&self, unlock: &UnlockTransaction) -> Result<(), LedgerError> {
        (**self).cancel_unlock(unlock)
    }

    fn cache_tx(&self, tx: SignedTransaction) -> Result<(), LedgerError> {
        (**self).cache_tx(tx)
    }

    fn get_transaction(&self, hash: &TxHash) -> Result<Option<SignedTransaction>, LedgerError> {
        (**self).get_transaction(hash)
    }

    fn best_height(&self) -> u64 {
        (**self).best_height()
    }
}
