//! Node configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use poc_types::ConsensusParams;
use poc_wallet_core::KdfParams;

use crate::logging::LogFormat;
use crate::NodeError;

/// Configuration for a consensus node.
///
/// Can be loaded from a TOML file via [`NodeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). Every field has a default, so an
/// empty file is a valid configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Fee schedule and deposit limits.
    #[serde(default)]
    pub params: ConsensusParams,

    /// Directory holding one encrypted keystore file per account.
    #[serde(default = "default_keystore_dir")]
    pub keystore_dir: PathBuf,

    /// Argon2id cost used when creating new keystores.
    #[serde(default)]
    pub kdf: KdfParams,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_keystore_dir() -> PathBuf {
    PathBuf::from("./poc_keystore")
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, NodeError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| NodeError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, NodeError> {
        toml::to_string_pretty(self).map_err(|e| NodeError::Config(e.to_string()))
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            params: ConsensusParams::default(),
            keystore_dir: default_keystore_dir(),
            kdf: KdfParams::default(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }
}
