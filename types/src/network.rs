//! Network identifier.

use serde::{Deserialize, Serialize};

/// Identifies which tally network a participant belongs to.
///
/// Each network has its own deterministic genesis block and initial
/// protocol parameters, so chains from different networks never link.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NetworkId {
    /// The production network.
    Live,
    /// The public test network.
    Test,
    /// Local development network.
    Dev,
}

impl NetworkId {
    /// Human-readable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Test => "test",
            Self::Dev => "dev",
        }
    }
}
