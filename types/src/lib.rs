//! Fundamental types for the PoC consensus membership core.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! addresses, hashes, amounts, keys, timestamps and consensus parameters.

pub mod address;
pub mod amount;
pub mod error;
pub mod hash;
pub mod keys;
pub mod params;
pub mod time;

pub use address::Address;
pub use amount::{Na, NA_PER_COIN};
pub use error::TypesError;
pub use hash::TxHash;
pub use keys::{KeyPair, PrivateKey, PublicKey, Signature};
pub use params::ConsensusParams;
pub use time::{Clock, SystemClock, Timestamp};
