//! Read-only views over the consensus account registry.

use poc_transactions::{ConsensusAccount, ConsensusExtend};
use poc_types::{Address, Na};
use serde::{Deserialize, Serialize};

/// Filter for [`list_consensus_accounts`](crate::ConsensusService::list_consensus_accounts).
/// An absent field matches anything.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryConsensusAccountParam {
    pub address: Option<Address>,
    pub agent_address: Option<String>,
}

impl QueryConsensusAccountParam {
    pub fn by_address(address: Address) -> Self {
        Self {
            address: Some(address),
            agent_address: None,
        }
    }

    pub fn by_agent(agent_address: impl Into<String>) -> Self {
        Self {
            address: None,
            agent_address: Some(agent_address.into()),
        }
    }

    pub fn matches(&self, account: &ConsensusAccount) -> bool {
        let address_ok = self
            .address
            .as_ref()
            .map_or(true, |address| &account.address == address);
        let agent_ok = self
            .agent_address
            .as_deref()
            .map_or(true, |agent| account.extend.agent_address() == agent);
        address_ok && agent_ok
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsensusRole {
    #[default]
    None,
    Agent,
    Delegator,
    AgentAndDelegator,
}

/// Aggregate consensus position of one address.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusStatusInfo {
    pub address: Address,
    pub role: ConsensusRole,
    /// Deposit locked by this address's agent registration.
    pub agent_deposit: Na,
    /// Sum of this address's delegations to agents.
    pub delegated_total: Na,
    pub delegation_count: usize,
    pub total_staked: Na,
}

impl ConsensusStatusInfo {
    /// Fold every account belonging to `address`; others are ignored.
    pub fn aggregate<'a>(
        address: &Address,
        accounts: impl IntoIterator<Item = &'a ConsensusAccount>,
    ) -> Self {
        let mut agent_deposit = Na::ZERO;
        let mut delegated_total = Na::ZERO;
        let mut delegation_count = 0;
        let mut is_agent = false;

        for account in accounts.into_iter().filter(|a| &a.address == address) {
            match &account.extend {
                ConsensusExtend::Agent(agent) => {
                    is_agent = true;
                    agent_deposit = agent_deposit.saturating_add(agent.deposit);
                }
                ConsensusExtend::Delegate(delegate) => {
                    delegation_count += 1;
                    delegated_total = delegated_total.saturating_add(delegate.deposit);
                }
            }
        }

        let role = match (is_agent, delegation_count > 0) {
            (false, false) => ConsensusRole::None,
            (true, false) => ConsensusRole::Agent,
            (false, true) => ConsensusRole::Delegator,
            (true, true) => ConsensusRole::AgentAndDelegator,
        };

        Self {
            address: address.clone(),
            role,
            agent_deposit,
            delegated_total,
            delegation_count,
            total_staked: agent_deposit.saturating_add(delegated_total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use poc_transactions::{Agent, Delegate};

    fn addr(s: &str) -> Address {
        Address::parse(s).unwrap()
    }

    fn registry() -> Vec<ConsensusAccount> {
        let alice_agent = Agent::new(Na::new(1_000), "poc_alice_packer", 0.1, "");
        vec![
            ConsensusAccount::agent(addr("poc_alice"), alice_agent),
            ConsensusAccount::delegate(
                addr("poc_alice"),
                Delegate::new("poc_bob_packer", Na::new(50)),
            ),
            ConsensusAccount::delegate(
                addr("poc_carol"),
                Delegate::new("poc_alice_packer", Na::new(70)),
            ),
            ConsensusAccount::delegate(
                addr("poc_carol"),
                Delegate::new("poc_bob_packer", Na::new(30)),
            ),
        ]
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = QueryConsensusAccountParam::default();
        assert!(registry().iter().all(|a| filter.matches(a)));
    }

    #[test]
    fn filters_combine() {
        let filter = QueryConsensusAccountParam {
            address: Some(addr("poc_carol")),
            agent_address: Some("poc_bob_packer".into()),
        };
        let hits: Vec<_> = registry().into_iter().filter(|a| filter.matches(a)).collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].extend.deposit(), Na::new(30));
    }

    #[test]
    fn agent_filter_covers_agents_and_their_delegators() {
        let filter = QueryConsensusAccountParam::by_agent("poc_alice_packer");
        assert_eq!(registry().iter().filter(|a| filter.matches(a)).count(), 2);
    }

    #[test]
    fn status_of_agent_that_also_delegates() {
        let status = ConsensusStatusInfo::aggregate(&addr("poc_alice"), &registry());
        assert_eq!(status.role, ConsensusRole::AgentAndDelegator);
        assert_eq!(status.agent_deposit, Na::new(1_000));
        assert_eq!(status.delegated_total, Na::new(50));
        assert_eq!(status.total_staked, Na::new(1_050));
    }

    #[test]
    fn status_of_pure_delegator() {
        let status = ConsensusStatusInfo::aggregate(&addr("poc_carol"), &registry());
        assert_eq!(status.role, ConsensusRole::Delegator);
        assert_eq!(status.delegation_count, 2);
        assert_eq!(status.total_staked, Na::new(100));
    }

    #[test]
    fn unknown_address_has_no_role() {
        let status = ConsensusStatusInfo::aggregate(&addr("poc_dave"), &registry());
        assert_eq!(status.role, ConsensusRole::None);
        assert_eq!(status.total_staked, Na::ZERO);
    }
}
