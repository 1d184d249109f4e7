//! Read side of the consensus account registry.

use std::sync::Arc;

use poc_transactions::ConsensusAccount;
use poc_types::Address;

/// Snapshot access to every known agent and delegation.
///
/// Population is up to the implementation (typically fed from confirmed
/// blocks); the consensus core only reads.
pub trait ConsensusCache: Send + Sync {
    fn all_accounts(&self) -> Vec<ConsensusAccount>;

    fn accounts_of(&self, address: &Address) -> Vec<ConsensusAccount> {
        self.all_accounts()
            .into_iter()
            .filter(|account| &account.address == address)
            .collect()
    }

    fn accounts_for_agent(&self, agent_address: &str) -> Vec<ConsensusAccount> {
        self.all_accounts()
            .into_iter()
            .filter(|account| account.extend.agent_address() == agent_address)
            .collect()
    }
}

impl<T: ConsensusCache + ?Sized> ConsensusCache for Arc<T> {
    fn all_accounts(&self) -> Vec<ConsensusAccount> {
        (**self).all_accounts()
    }

    fn accounts_of(&self, address: &Address) -> Vec<ConsensusAccount> {
        (**self).accounts_of(address)
    }

    fn accounts_for_agent(&self, agent_address: &str) -> Vec<ConsensusAccount> {
        (**self).accounts_for_agent(agent_address)
    }
}
