//! Protocol parameters shared by every participant.

use serde::{Deserialize, Serialize};

/// Tunable protocol parameters.
///
/// These are fixed per network at genesis; the difficulty adjuster may move
/// the *effective* difficulty above `base_difficulty` under load, but every
/// block records the difficulty it was actually mined at.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProtocolParams {
    /// Base admission difficulty: required leading zero bits of a block hash.
    pub base_difficulty: u32,

    /// Maximum number of transactions drained into one candidate block.
    pub max_block_transactions: usize,

    /// Target seconds between blocks, used by the difficulty adjuster.
    pub target_block_interval_secs: u64,

    /// Number of recent block timestamps the difficulty adjuster tracks.
    pub difficulty_window: usize,

    /// Stake fraction (basis points) that approvals must *strictly exceed*
    /// for proof-of-stake validation. 5000 = more than half.
    pub quorum_threshold_bps: u32,
}

impl ProtocolParams {
    /// Production defaults.
    pub fn tally_defaults() -> Self {
        Self {
            base_difficulty: 16,
            max_block_transactions: 256,
            target_block_interval_secs: 30,
            difficulty_window: 32,
            quorum_threshold_bps: 5000,
        }
    }
}

impl Default for ProtocolParams {
    fn default() -> Self {
        Self::tally_defaults()
    }
}
