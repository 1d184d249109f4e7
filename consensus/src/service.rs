//! The membership protocol orchestrator.
//!
//! Every mutating operation follows the same pipeline:
//!
//! 1. resolve the account, validate parameters, validate the password
//! 2. request a lock (or unlock) sub-transaction from the ledger
//! 3. seal: encode the unsigned transaction and hash it
//! 4. sign the hash
//! 5. cache the signed transaction in the ledger, then broadcast it
//!
//! Nothing reaches the ledger before step 1 has fully passed, and nothing is
//! cached or broadcast unless it is signed. A failure after step 2 hands the
//! lock or unlock back to the ledger before the error is returned.

use std::sync::Arc;

use poc_ledger::{ConsensusCache, LedgerService};
use poc_messages::{ConsensusEvent, EventService};
use poc_transactions::validation::{validate_agent, validate_delegation};
use poc_transactions::{
    Agent, ConsensusAccount, Delegate, ExitConsensusData, JoinConsensusData, LockTransaction,
    RegisterAgentData, TxData, UnlockTransaction, UnsignedTransaction,
};
use poc_types::{Address, Clock, ConsensusParams, Na, TxHash};
use poc_wallet_core::{Account, AccountService};
use tracing::{debug, error, info, warn};

use crate::error::ConsensusError;
use crate::fee::{delegate_fee, transaction_fee};
use crate::params::JoinConsensusParams;
use crate::query::{ConsensusStatusInfo, QueryConsensusAccountParam};
use crate::spans;

/// Holds only its collaborators and immutable parameters, so concurrent
/// callers never observe each other's partial state.
pub struct ConsensusService<A, L, E, C> {
    accounts: A,
    ledger: L,
    events: E,
    cache: C,
    clock: Arc<dyn Clock>,
    params: ConsensusParams,
}

impl<A, L, E, C> ConsensusService<A, L, E, C>
where
    A: AccountService,
    L: LedgerService,
    E: EventService,
    C: ConsensusCache,
{
    pub fn new(
        accounts: A,
        ledger: L,
        events: E,
        cache: C,
        clock: Arc<dyn Clock>,
        params: ConsensusParams,
    ) -> Self {
        Self {
            accounts,
            ledger,
            events,
            cache,
            clock,
            params,
        }
    }

    pub fn params(&self) -> &ConsensusParams {
        &self.params
    }

    /// Register `address` as a block-producer candidate, locking `agent.deposit`.
    pub fn register_agent(
        &self,
        address: &Address,
        password: &str,
        agent: Agent,
    ) -> Result<TxHash, ConsensusError> {
        let _span = spans::register_agent_span(address.as_str()).entered();
        let account = self.resolve_account(address)?;
        self.check_agent(&agent)?;
        self.check_password(&account, password)?;
        self.submit_registration(&account, password, agent)
    }

    /// Delegate `amount` from `address` to the agent at `agent_address`.
    pub fn join_consensus(
        &self,
        address: &Address,
        password: &str,
        amount: Na,
        agent_address: &str,
    ) -> Result<TxHash, ConsensusError> {
        let _span = spans::join_consensus_span(address.as_str(), agent_address).entered();
        let account = self.resolve_account(address)?;
        let delegate = Delegate::new(agent_address, amount);
        self.check_delegation(&delegate)?;
        self.check_password(&account, password)?;
        self.submit_join(&account, password, delegate)
    }

    /// Withdraw the stake locked by the join transaction `join_tx_hash`.
    pub fn exit_consensus(
        &self,
        join_tx_hash: &TxHash,
        password: &str,
    ) -> Result<TxHash, ConsensusError> {
        let _span = spans::exit_consensus_span(&join_tx_hash.to_string()).entered();

        let join_tx = self.ledger.get_transaction(join_tx_hash)?.ok_or_else(|| {
            warn!(join_tx = %join_tx_hash, "exit references unknown join transaction");
            ConsensusError::TransactionNotFound(*join_tx_hash)
        })?;
        let join = match join_tx.data() {
            TxData::JoinConsensus(join) => join,
            _ => {
                warn!(
                    join_tx = %join_tx_hash,
                    tx_type = ?join_tx.tx_type(),
                    "exit references a non-join transaction"
                );
                return Err(ConsensusError::InvalidParameters(format!(
                    "{join_tx_hash} is not a join transaction"
                )));
            }
        };

        let account = self.resolve_account(&join.account.address)?;
        self.check_password(&account, password)?;

        let unlock = self.ledger.create_unlock_tx(&join.lock).map_err(|e| {
            warn!(lock = %join.lock.hash(), error = %e, "unlock refused");
            ConsensusError::from(e)
        })?;
        debug!(unlock = %unlock.hash(), amount = %unlock.amount(), "unlock obtained");

        let data = TxData::ExitConsensus(ExitConsensusData {
            address: account.address.clone(),
            join_tx_hash: *join_tx_hash,
            unlock: unlock.clone(),
        });
        let hash = self.publish_unlocked(&account, password, data, &unlock)?;
        info!(hash = %hash, join_tx = %join_tx_hash, "left consensus");
        Ok(hash)
    }

    /// Generic entry point taking string parameters.
    ///
    /// A request carrying `commissionRate` registers an agent; any other
    /// request joins an existing agent.
    pub fn join_the_consensus(
        &self,
        address: &Address,
        password: &str,
        params: &JoinConsensusParams,
    ) -> Result<TxHash, ConsensusError> {
        let account = self.resolve_account(address)?;
        if params.len() < 2 {
            warn!(address = %address, given = params.len(), "too few consensus parameters");
            return Err(ConsensusError::InvalidParameters(
                "at least a deposit and an agent address are required".into(),
            ));
        }

        let deposit = parse_deposit(params)?;
        let agent_address = required(params, JoinConsensusParams::AGENT_ADDRESS)?;

        if params.is_agent_registration() {
            let _span = spans::register_agent_span(address.as_str()).entered();
            let rate = required(params, JoinConsensusParams::COMMISSION_RATE)?;
            let commission_rate = rate.trim().parse::<f64>().map_err(|_| {
                ConsensusError::InvalidParameters(format!(
                    "commission rate {rate:?} is not a number"
                ))
            })?;
            let introduction = params
                .get(JoinConsensusParams::INTRODUCTION)
                .unwrap_or_default();
            let agent = Agent::new(deposit, agent_address, commission_rate, introduction);
            self.check_agent(&agent)?;
            self.check_password(&account, password)?;
            self.submit_registration(&account, password, agent)
        } else {
            let _span = spans::join_consensus_span(address.as_str(), agent_address).entered();
            let delegate = Delegate::new(agent_address, deposit);
            self.check_delegation(&delegate)?;
            self.check_password(&account, password)?;
            self.submit_join(&account, password, delegate)
        }
    }

    pub fn list_consensus_accounts(
        &self,
        query: &QueryConsensusAccountParam,
    ) -> Vec<ConsensusAccount> {
        let _span = spans::query_span("list_accounts").entered();
        let candidates = match (&query.address, &query.agent_address) {
            (Some(address), _) => self.cache.accounts_of(address),
            (None, Some(agent)) => self.cache.accounts_for_agent(agent),
            (None, None) => self.cache.all_accounts(),
        };
        let accounts: Vec<_> = candidates.into_iter().filter(|a| query.matches(a)).collect();
        debug!(found = accounts.len(), "consensus accounts listed");
        accounts
    }

    pub fn get_consensus_status(&self, address: &Address) -> ConsensusStatusInfo {
        let _span = spans::query_span("status").entered();
        ConsensusStatusInfo::aggregate(address, &self.cache.accounts_of(address))
    }

    /// Fee for a transaction built now, at the ledger's best height.
    pub fn transaction_fee(&self) -> Na {
        transaction_fee(self.ledger.best_height(), &self.params)
    }

    pub fn delegate_fee(&self) -> f64 {
        delegate_fee(self.ledger.best_height(), &self.params)
    }

    fn resolve_account(&self, address: &Address) -> Result<Account, ConsensusError> {
        self.accounts.get_account(address).ok_or_else(|| {
            warn!(address = %address, "unknown account");
            ConsensusError::AccountNotFound(address.clone())
        })
    }

    fn check_password(&self, account: &Account, password: &str) -> Result<(), ConsensusError> {
        if self.accounts.validate_password(account, password) {
            Ok(())
        } else {
            warn!(address = %account.address, "password rejected");
            Err(ConsensusError::InvalidPassword)
        }
    }

    fn check_agent(&self, agent: &Agent) -> Result<(), ConsensusError> {
        validate_agent(agent, &self.params).map_err(|e| {
            warn!(error = %e, "agent parameters rejected");
            ConsensusError::InvalidParameters(e.to_string())
        })
    }

    fn check_delegation(&self, delegate: &Delegate) -> Result<(), ConsensusError> {
        validate_delegation(delegate, &self.params).map_err(|e| {
            warn!(error = %e, "delegation parameters rejected");
            ConsensusError::InvalidParameters(e.to_string())
        })
    }

    fn submit_registration(
        &self,
        account: &Account,
        password: &str,
        agent: Agent,
    ) -> Result<TxHash, ConsensusError> {
        let lock = self.request_lock(account, password, agent.deposit)?;
        let data = TxData::RegisterAgent(RegisterAgentData {
            address: account.address.clone(),
            agent,
            lock: lock.clone(),
        });
        let hash = self.publish_locked(account, password, data, &lock)?;
        info!(hash = %hash, deposit = %lock.amount(), "agent registered");
        Ok(hash)
    }

    fn submit_join(
        &self,
        account: &Account,
        password: &str,
        delegate: Delegate,
    ) -> Result<TxHash, ConsensusError> {
        let lock = self.request_lock(account, password, delegate.deposit)?;
        let agent = delegate.delegate_address.clone();
        let data = TxData::JoinConsensus(JoinConsensusData::new(
            account.address.clone(),
            delegate,
            lock.clone(),
        ));
        let hash = self.publish_locked(account, password, data, &lock)?;
        info!(hash = %hash, agent = %agent, deposit = %lock.amount(), "joined consensus");
        Ok(hash)
    }

    fn request_lock(
        &self,
        account: &Account,
        password: &str,
        amount: Na,
    ) -> Result<LockTransaction, ConsensusError> {
        let lock = self
            .ledger
            .create_lock_tx(&account.address, password, amount)
            .map_err(|e| {
                warn!(address = %account.address, amount = %amount, error = %e, "lock refused");
                ConsensusError::from(e)
            })?;
        debug!(lock = %lock.hash(), amount = %amount, "lock obtained");
        Ok(lock)
    }

    /// Publish a transaction that holds `lock`, releasing the lock if publishing fails.
    fn publish_locked(
        &self,
        account: &Account,
        password: &str,
        data: TxData,
        lock: &LockTransaction,
    ) -> Result<TxHash, ConsensusError> {
        self.seal_sign_publish(account, password, data).inspect_err(|_| {
            match self.ledger.create_unlock_tx(lock) {
                Ok(_) => debug!(lock = %lock.hash(), "lock released after failure"),
                Err(e) => {
                    warn!(lock = %lock.hash(), error = %e, "could not release lock after failure")
                }
            }
        })
    }

    /// Publish a transaction that holds `unlock`, re-locking the funds if publishing fails.
    fn publish_unlocked(
        &self,
        account: &Account,
        password: &str,
        data: TxData,
        unlock: &UnlockTransaction,
    ) -> Result<TxHash, ConsensusError> {
        self.seal_sign_publish(account, password, data).inspect_err(|_| {
            match self.ledger.cancel_unlock(unlock) {
                Ok(()) => debug!(lock = %unlock.lock_hash(), "unlock cancelled after failure"),
                Err(e) => warn!(
                    lock = %unlock.lock_hash(),
                    error = %e,
                    "could not cancel unlock after failure"
                ),
            }
        })
    }

    fn seal_sign_publish(
        &self,
        account: &Account,
        password: &str,
        data: TxData,
    ) -> Result<TxHash, ConsensusError> {
        let unsigned = UnsignedTransaction::new(self.clock.now(), self.transaction_fee(), data);
        let sealed = unsigned.seal().map_err(|e| {
            error!(error = %e, "failed to encode transaction for hashing");
            ConsensusError::HashComputation(e)
        })?;
        debug!(hash = %sealed.hash(), "transaction sealed");

        let signature = self.accounts.sign(sealed.hash(), account, password)?;
        let tx = sealed.into_signed(signature);
        let hash = *tx.hash();

        self.ledger.cache_tx(tx.clone())?;
        let event = ConsensusEvent::from_transaction(tx);
        debug!(hash = %hash, event = event.name(), "broadcasting");
        self.events.broadcast_and_cache(event);
        Ok(hash)
    }
}

fn required<'p>(params: &'p JoinConsensusParams, key: &str) -> Result<&'p str, ConsensusError> {
    params
        .get(key)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| ConsensusError::InvalidParameters(format!("missing parameter {key}")))
}

fn parse_deposit(params: &JoinConsensusParams) -> Result<Na, ConsensusError> {
    let raw = required(params, JoinConsensusParams::DEPOSIT)?;
    Na::parse_coins(raw).map_err(|e| ConsensusError::InvalidParameters(format!("deposit: {e}")))
}
