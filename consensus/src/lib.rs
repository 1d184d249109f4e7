//! Consensus membership: how accounts enter and leave the staking pool.
//!
//! ## Module overview
//!
//! - [`service`]: the orchestrator. Registers agents, joins and exits
//!   delegations by building, hashing, signing, caching and broadcasting
//!   staking transactions.
//! - [`query`]: filters and aggregate status over the consensus account cache.
//! - [`fee`]: the height-based fee schedule.
//! - [`params`]: the string-keyed parameter map accepted by
//!   [`ConsensusService::join_the_consensus`].
//! - [`spans`]: tracing spans shared by the operations.
//! - [`error`]: consensus error types.

pub mod error;
pub mod fee;
pub mod params;
pub mod query;
pub mod service;
pub mod spans;

pub use error::ConsensusError;
pub use fee::{delegate_fee, transaction_fee};
pub use params::JoinConsensusParams;
pub use query::{ConsensusRole, ConsensusStatusInfo, QueryConsensusAccountParam};
pub use service::ConsensusService;
