//! Consensus entities and the staking transactions that carry them.
//!
//! Transaction types:
//! - **RegisterAgent**: an account becomes a block-producer candidate, locking its deposit
//! - **JoinConsensus**: an account delegates stake to an agent, locking the stake
//! - **ExitConsensus**: an account withdraws a prior join, unlocking its stake

pub mod account;
pub mod agent;
pub mod error;
pub mod lock;
pub mod staking;
pub mod validation;

pub use account::{ConsensusAccount, ConsensusExtend, Delegate};
pub use agent::{Agent, AgentStatus, RoundState};
pub use error::TransactionError;
pub use lock::{LockTransaction, UnlockTransaction};
pub use staking::{
    ExitConsensusData, JoinConsensusData, RegisterAgentData, SealedTransaction, SignedTransaction,
    TxData, TxSignature, TxType, UnsignedTransaction,
};
pub use validation::validate_staking_tx;
