//! Consensus membership parameters.

use crate::amount::{Na, NA_PER_COIN};
use serde::{Deserialize, Serialize};

/// Parameters governing agent registration, delegation and fees.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsensusParams {
    /// Base transaction fee in Na, charged in full during the first year.
    pub transaction_fee: Na,

    /// Number of blocks in one fee period (roughly a year at 10s blocks).
    pub blocks_per_year: u64,

    /// Commission rate charged to delegators when none is negotiated.
    pub default_commission_rate: f64,

    /// Smallest deposit accepted for an agent registration.
    pub min_agent_deposit: Na,

    /// Smallest stake accepted for a delegation join.
    pub min_delegate_deposit: Na,

    /// Upper bound on an agent introduction, in UTF-8 bytes.
    pub max_introduction_len: usize,
}

impl ConsensusParams {
    pub const BLOCK_INTERVAL_SECS: u64 = 10;

    pub fn mainnet() -> Self {
        Self {
            transaction_fee: Na::new(NA_PER_COIN / 100), // 0.01 coin
            blocks_per_year: 365 * 24 * 3600 / Self::BLOCK_INTERVAL_SECS,
            default_commission_rate: 0.1,
            min_agent_deposit: Na::new(20_000 * NA_PER_COIN),
            min_delegate_deposit: Na::new(2_000 * NA_PER_COIN),
            max_introduction_len: 1024,
        }
    }

    /// Parameters with no deposit floors, for local networks and tests.
    pub fn dev() -> Self {
        Self {
            min_agent_deposit: Na::new(1),
            min_delegate_deposit: Na::new(1),
            ..Self::mainnet()
        }
    }
}

impl Default for ConsensusParams {
    fn default() -> Self {
        Self::mainnet()
    }
}
