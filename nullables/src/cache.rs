//! Nullable consensus account cache.

use poc_ledger::ConsensusCache;
use poc_transactions::ConsensusAccount;
use std::sync::Mutex;

#[derive(Default)]
pub struct NullConsensusCache {
    accounts: Mutex<Vec<ConsensusAccount>>,
}

impl NullConsensusCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_accounts(accounts: impl IntoIterator<Item = ConsensusAccount>) -> Self {
        Self {
            accounts: Mutex::new(accounts.into_iter().collect()),
        }
    }

    pub fn insert(&self, account: ConsensusAccount) {
        self.accounts.lock().unwrap().push(account);
    }
}

impl ConsensusCache for NullConsensusCache {
    fn all_accounts(&self) -> Vec<ConsensusAccount> {
        self.accounts.lock().unwrap().clone()
    }
}
