//! Wires the consensus service to the node's own account store.

use std::sync::Arc;

use poc_consensus::ConsensusService;
use poc_ledger::{ConsensusCache, LedgerService};
use poc_messages::EventService;
use poc_types::{Clock, SystemClock};
use poc_wallet_core::KeystoreAccounts;
use tracing::info;

use crate::config::NodeConfig;
use crate::NodeError;

/// The orchestrator as the node runs it: keystore-backed accounts, the
/// caller's ledger, event bus and cache.
pub type NodeConsensusService<L, E, C> = ConsensusService<Arc<KeystoreAccounts>, L, E, C>;

/// A configured node.
///
/// Owns the account store opened from `config.keystore_dir`. Ledger, event
/// bus and consensus cache are supplied by the host when the consensus
/// service is built.
pub struct PocNode {
    config: NodeConfig,
    accounts: Arc<KeystoreAccounts>,
    clock: Arc<dyn Clock>,
}

impl PocNode {
    /// Open the keystore directory named by `config`, using the wall clock.
    pub fn open(config: NodeConfig) -> Result<Self, NodeError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: NodeConfig, clock: Arc<dyn Clock>) -> Result<Self, NodeError> {
        let accounts = KeystoreAccounts::open(&config.keystore_dir, config.kdf.clone())?;
        info!(
            keystore_dir = %config.keystore_dir.display(),
            accounts = accounts.accounts().len(),
            "node opened"
        );
        Ok(Self {
            config,
            accounts: Arc::new(accounts),
            clock,
        })
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn accounts(&self) -> &Arc<KeystoreAccounts> {
        &self.accounts
    }

    /// Build a consensus service over the node's accounts and the given
    /// collaborators. Services built from the same node share one account
    /// store.
    pub fn consensus_service<L, E, C>(
        &self,
        ledger: L,
        events: E,
        cache: C,
    ) -> NodeConsensusService<L, E, C>
    where
        L: LedgerService,
        E: EventService,
        C: ConsensusCache,
    {
        ConsensusService::new(
            Arc::clone(&self.accounts),
            ledger,
            events,
            cache,
            Arc::clone(&self.clock),
            self.config.params.clone(),
        )
    }
}
