//! Span constructors for the membership operations.
//!
//! Every operation runs inside one of these so its log lines share the
//! same `address` or `join_tx` field.

use tracing::{info_span, Span};

/// Span covering one agent registration by `address`.
pub fn register_agent_span(address: &str) -> Span {
    info_span!("register_agent", address = %address)
}

/// Span covering a delegation from `address` to the agent at `agent`.
pub fn join_consensus_span(address: &str, agent: &str) -> Span {
    info_span!("join_consensus", address = %address, agent = %agent)
}

/// Span covering the withdrawal of the join transaction `join_tx`.
pub fn exit_consensus_span(join_tx: &str) -> Span {
    info_span!("exit_consensus", join_tx = %join_tx)
}

/// Span covering a read against the consensus account cache.
pub fn query_span(kind: &'static str) -> Span {
    info_span!("consensus_query", kind)
}
