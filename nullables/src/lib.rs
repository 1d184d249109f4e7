//! Nullable infrastructure for deterministic testing.
//!
//! Every collaborator of the consensus core (accounts, ledger, event bus,
//! consensus cache, clock) has an in-memory implementation here that:
//! - Returns deterministic values
//! - Can be controlled programmatically
//! - Never touches the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod accounts;
pub mod cache;
pub mod clock;
pub mod events;
pub mod ledger;

pub use accounts::NullAccounts;
pub use cache::NullConsensusCache;
pub use clock::NullClock;
pub use events::NullEventBus;
pub use ledger::NullLedger;
