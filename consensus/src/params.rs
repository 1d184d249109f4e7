//! String-keyed parameters for the generic join entry point.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Parameters as they arrive from a wallet or RPC call.
///
/// Recognised keys: `deposit` (decimal coins), `agentAddress`,
/// `commissionRate` (present only for agent registration) and `introduction`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JoinConsensusParams(BTreeMap<String, String>);

impl JoinConsensusParams {
    pub const DEPOSIT: &'static str = "deposit";
    pub const AGENT_ADDRESS: &'static str = "agentAddress";
    pub const COMMISSION_RATE: &'static str = "commissionRate";
    pub const INTRODUCTION: &'static str = "introduction";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Agent registration requests are the ones that name a commission rate.
    pub fn is_agent_registration(&self) -> bool {
        self.0.contains_key(Self::COMMISSION_RATE)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for JoinConsensusParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
