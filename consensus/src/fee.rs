//! Fee schedule.

use poc_types::{ConsensusParams, Na};

/// Base fee divided by the number of elapsed block-years plus one.
///
/// Integer arithmetic on Na throughout; non-increasing in `block_height`.
pub fn transaction_fee(block_height: u64, params: &ConsensusParams) -> Na {
    let years = block_height / params.blocks_per_year.max(1);
    params.transaction_fee.div(years.saturating_add(1))
}

/// Commission charged to delegators. Currently the configured default at every height.
pub fn delegate_fee(_block_height: u64, params: &ConsensusParams) -> f64 {
    params.default_commission_rate
}
