//! Ledger-side collaborators of the consensus membership core.
//!
//! The consensus core never touches balances directly. It asks the ledger for
//! lock and unlock sub-transactions, hands finished staking transactions back
//! for local caching, and reads consensus accounts from a [`ConsensusCache`].

pub mod cache;
pub mod error;
pub mod service;

pub use cache::ConsensusCache;
pub use error::LedgerError;
pub use service::LedgerService;
