//! Nullable ledger: balances, locks and the transaction cache in memory.
//!
//! All lock bookkeeping happens under one mutex, so two concurrent unlocks of
//! the same lock resolve to exactly one success.

use poc_ledger::{LedgerError, LedgerService};
use poc_transactions::{LockTransaction, SignedTransaction, UnlockTransaction};
use poc_types::{Address, Na, Timestamp, TxHash};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Default)]
struct LedgerState {
    balances: HashMap<Address, Na>,
    locks: HashMap<TxHash, LockTransaction>,
    unlocked: HashSet<TxHash>,
    transactions: HashMap<TxHash, SignedTransaction>,
    next_nonce: u64,
}

pub struct NullLedger {
    state: Mutex<LedgerState>,
    best_height: AtomicU64,
    now: AtomicU64,
    lock_requests: AtomicUsize,
    unlock_requests: AtomicUsize,
}

impl NullLedger {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(LedgerState::default()),
            best_height: AtomicU64::new(0),
            now: AtomicU64::new(1_700_000_000),
            lock_requests: AtomicUsize::new(0),
            unlock_requests: AtomicUsize::new(0),
        }
    }

    pub fn with_balance(self, address: &Address, amount: Na) -> Self {
        self.set_balance(address, amount);
        self
    }

    pub fn set_balance(&self, address: &Address, amount: Na) {
        self.state
            .lock()
            .unwrap()
            .balances
            .insert(address.clone(), amount);
    }

    /// Spendable (unlocked) balance.
    pub fn balance(&self, address: &Address) -> Na {
        self.state
            .lock()
            .unwrap()
            .balances
            .get(address)
            .copied()
            .unwrap_or(Na::ZERO)
    }

    pub fn set_best_height(&self, height: u64) {
        self.best_height.store(height, Ordering::SeqCst);
    }

    /// Timestamp stamped on lock and unlock sub-transactions.
    pub fn set_time(&self, secs: u64) {
        self.now.store(secs, Ordering::SeqCst);
    }

    pub fn lock_requests(&self) -> usize {
        self.lock_requests.load(Ordering::SeqCst)
    }

    pub fn unlock_requests(&self) -> usize {
        self.unlock_requests.load(Ordering::SeqCst)
    }

    pub fn cached_count(&self) -> usize {
        self.state.lock().unwrap().transactions.len()
    }

    pub fn is_unlocked(&self, lock_hash: &TxHash) -> bool {
        self.state.lock().unwrap().unlocked.contains(lock_hash)
    }

    fn time(&self) -> Timestamp {
        Timestamp::new(self.now.load(Ordering::SeqCst))
    }
}

impl Default for NullLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerService for NullLedger {
    fn create_lock_tx(
        &self,
        address: &Address,
        _password: &str,
        amount: Na,
    ) -> Result<LockTransaction, LedgerError> {
        self.lock_requests.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().unwrap();

        let available = *state
            .balances
            .get(address)
            .ok_or_else(|| LedgerError::AccountNotFound(address.clone()))?;
        let remaining = available
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientFunds {
                needed: amount,
                available,
            })?;

        state.next_nonce += 1;
        let lock = LockTransaction::new(address.clone(), amount, self.time(), state.next_nonce)?;
        state.balances.insert(address.clone(), remaining);
        state.locks.insert(*lock.hash(), lock.clone());
        Ok(lock)
    }

    fn create_unlock_tx(&self, lock: &LockTransaction) -> Result<UnlockTransaction, LedgerError> {
        self.unlock_requests.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().unwrap();

        if !state.locks.contains_key(lock.hash()) {
            return Err(LedgerError::LockNotFound(*lock.hash()));
        }
        if state.unlocked.contains(lock.hash()) {
            return Err(LedgerError::AlreadyUnlocked(*lock.hash()));
        }

        let unlock = UnlockTransaction::for_lock(lock, self.time())?;
        state.unlocked.insert(*lock.hash());
        let balance = state.balances.entry(lock.address().clone()).or_insert(Na::ZERO);
        *balance = balance.saturating_add(lock.amount());
        Ok(unlock)
    }

    fn cancel_unlock(&self, unlock: &UnlockTransaction) -> Result<(), LedgerError> {
        let mut state = self.state.lock().unwrap();
        let lock_hash = *unlock.lock_hash();

        if !state.locks.contains_key(&lock_hash) {
            return Err(LedgerError::LockNotFound(lock_hash));
        }
        if !state.unlocked.contains(&lock_hash) {
            return Err(LedgerError::LockStillHeld(lock_hash));
        }

        let available = state
            .balances
            .get(unlock.address())
            .copied()
            .unwrap_or(Na::ZERO);
        let remaining = available
            .checked_sub(unlock.amount())
            .ok_or(LedgerError::InsufficientFunds {
                needed: unlock.amount(),
                available,
            })?;
        state.balances.insert(unlock.address().clone(), remaining);
        state.unlocked.remove(&lock_hash);
        Ok(())
    }

    fn cache_tx(&self, tx: SignedTransaction) -> Result<(), LedgerError> {
        let mut state = self.state.lock().unwrap();
        if state.transactions.contains_key(tx.hash()) {
            return Err(LedgerError::DuplicateTransaction(*tx.hash()));
        }
        state.transactions.insert(*tx.hash(), tx);
        Ok(())
    }

    fn get_transaction(&self, hash: &TxHash) -> Result<Option<SignedTransaction>, LedgerError> {
        Ok(self.state.lock().unwrap().transactions.get(hash).cloned())
    }

    fn best_height(&self) -> u64 {
        self.best_height.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Address {
        Address::parse("poc_alice").unwrap()
    }

    #[test]
    fn lock_deducts_and_unlock_restores() {
        let ledger = NullLedger::new().with_balance(&alice(), Na::new(100));
        let lock = ledger.create_lock_tx(&alice(), "pw", Na::new(60)).unwrap();
        assert_eq!(ledger.balance(&alice()), Na::new(40));

        let unlock = ledger.create_unlock_tx(&lock).unwrap();
        assert_eq!(unlock.amount(), Na::new(60));
        assert_eq!(ledger.balance(&alice()), Na::new(100));
        assert!(ledger.is_unlocked(lock.hash()));
    }

    #[test]
    fn overdraw_reports_balance() {
        let ledger = NullLedger::new().with_balance(&alice(), Na::new(10));
        match ledger.create_lock_tx(&alice(), "pw", Na::new(11)) {
            Err(LedgerError::InsufficientFunds { needed, available }) => {
                assert_eq!(needed, Na::new(11));
                assert_eq!(available, Na::new(10));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(ledger.balance(&alice()), Na::new(10));
    }

    #[test]
    fn second_unlock_is_refused() {
        let ledger = NullLedger::new().with_balance(&alice(), Na::new(10));
        let lock = ledger.create_lock_tx(&alice(), "pw", Na::new(10)).unwrap();
        ledger.create_unlock_tx(&lock).unwrap();
        assert!(matches!(
            ledger.create_unlock_tx(&lock),
            Err(LedgerError::AlreadyUnlocked(_))
        ));
        assert_eq!(ledger.unlock_requests(), 2);
    }

    #[test]
    fn cancelled_unlock_restores_the_lock() {
        let ledger = NullLedger::new().with_balance(&alice(), Na::new(50));
        let lock = ledger.create_lock_tx(&alice(), "pw", Na::new(30)).unwrap();
        let unlock = ledger.create_unlock_tx(&lock).unwrap();

        ledger.cancel_unlock(&unlock).unwrap();
        assert!(!ledger.is_unlocked(lock.hash()));
        assert_eq!(ledger.balance(&alice()), Na::new(20));

        ledger.create_unlock_tx(&lock).unwrap();
        assert_eq!(ledger.balance(&alice()), Na::new(50));
    }

    #[test]
    fn cancel_requires_a_released_lock() {
        let ledger = NullLedger::new().with_balance(&alice(), Na::new(50));
        let lock = ledger.create_lock_tx(&alice(), "pw", Na::new(30)).unwrap();
        let unlock = UnlockTransaction::for_lock(&lock, Timestamp::new(5)).unwrap();
        assert!(matches!(
            ledger.cancel_unlock(&unlock),
            Err(LedgerError::LockStillHeld(_))
        ));
    }

    #[test]
    fn cancel_fails_when_released_funds_were_spent() {
        let ledger = NullLedger::new().with_balance(&alice(), Na::new(30));
        let lock = ledger.create_lock_tx(&alice(), "pw", Na::new(30)).unwrap();
        let unlock = ledger.create_unlock_tx(&lock).unwrap();
        ledger.set_balance(&alice(), Na::new(10));
        assert!(matches!(
            ledger.cancel_unlock(&unlock),
            Err(LedgerError::InsufficientFunds { .. })
        ));
        assert!(ledger.is_unlocked(lock.hash()));
    }

    #[test]
    fn foreign_lock_is_not_found() {
        let ledger = NullLedger::new();
        let lock = LockTransaction::new(alice(), Na::new(1), Timestamp::new(1), 99).unwrap();
        assert!(matches!(
            ledger.create_unlock_tx(&lock),
            Err(LedgerError::LockNotFound(_))
        ));
    }

    #[test]
    fn locks_get_distinct_hashes() {
        let ledger = NullLedger::new().with_balance(&alice(), Na::new(10));
        let a = ledger.create_lock_tx(&alice(), "pw", Na::new(1)).unwrap();
        let b = ledger.create_lock_tx(&alice(), "pw", Na::new(1)).unwrap();
        assert_ne!(a.hash(), b.hash());
    }
}
