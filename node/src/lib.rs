//! Consensus node host: configuration, logging and service wiring.
//!
//! The node owns what is local to one operator (the keystore directory,
//! the log sink and the consensus parameters) and hands them to
//! [`poc_consensus::ConsensusService`] together with the ledger, event bus
//! and consensus cache it is embedded with.

pub mod config;
pub mod error;
pub mod logging;
pub mod node;

pub use config::NodeConfig;
pub use error::NodeError;
pub use logging::{init_logging, LogFormat};
pub use node::{NodeConsensusService, PocNode};
