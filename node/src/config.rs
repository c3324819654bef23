//! Node configuration with TOML file support.

use serde::{Deserialize, Serialize};

use tally_types::NetworkId;

use crate::NodeError;

/// Configuration for a tally node.
///
/// Can be loaded from a TOML file via [`NodeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). Protocol parameters come from
/// the network's genesis, not from here; `base_difficulty` only overrides
/// the admission bar for local/dev setups.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Which network this node participates in.
    #[serde(default = "default_network")]
    pub network: NetworkId,

    /// Override of the network's base difficulty (leading zero bits).
    #[serde(default)]
    pub base_difficulty: Option<u32>,

    /// Maximum number of transactions held in the pending pool.
    #[serde(default = "default_max_pool_size")]
    pub max_pool_size: usize,

    /// Reward credited to the producer account per mined block.
    #[serde(default = "default_mining_reward")]
    pub mining_reward: u64,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_network() -> NetworkId {
    NetworkId::Dev
}

fn default_max_pool_size() -> usize {
    4096
}

fn default_mining_reward() -> u64 {
    50
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, NodeError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| NodeError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).expect("NodeConfig is always serializable to TOML")
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            network: default_network(),
            base_difficulty: None,
            max_pool_size: default_max_pool_size(),
            mining_reward: default_mining_reward(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}
