//! Genesis block creation — the first block on each network.
//!
//! The genesis block has `previous_hash: BlockHash::ZERO` (no predecessor)
//! and carries no transactions. Each `NetworkId` gets a distinct timestamp
//! and initial parameters, so every network has a unique, deterministic
//! genesis hash. Sealing uses the sequential nonce search: the lowest
//! satisfying nonce is the same on every participant.

use crate::block::Block;
use tally_types::{BlockHash, NetworkId, ProtocolParams, Timestamp};
use tally_work::mine_sequential;

/// Return the initial protocol params for a network.
pub fn initial_params(network: &NetworkId) -> ProtocolParams {
    match network {
        NetworkId::Live => ProtocolParams::tally_defaults(),
        NetworkId::Test => {
            let mut params = ProtocolParams::tally_defaults();
            // Test network lowers the admission bar for faster iteration.
            params.base_difficulty = 8;
            params.target_block_interval_secs = 10;
            params
        }
        NetworkId::Dev => {
            let mut params = ProtocolParams::tally_defaults();
            // Dev network makes mining near-free.
            params.base_difficulty = 1;
            params.target_block_interval_secs = 1;
            params.max_block_transactions = 64;
            params
        }
    }
}

/// Create the genesis block for a network.
pub fn create_genesis_block(network: NetworkId) -> Block {
    let params = initial_params(&network);
    let mut block = Block::new(
        0,
        Vec::new(),
        BlockHash::ZERO,
        params.base_difficulty,
        genesis_timestamp(&network),
    );
    let nonce = mine_sequential(&block.premine_digest(), params.base_difficulty);
    block.seal(nonce.0);
    block
}

/// Return the deterministic genesis block hash for a network.
///
/// Useful for hardcoding known genesis hashes for bootstrapping.
pub fn genesis_hash(network: NetworkId) -> BlockHash {
    create_genesis_block(network).hash
}

/// Genesis timestamp per network.
fn genesis_timestamp(network: &NetworkId) -> Timestamp {
    match network {
        // Live: 2026-01-01 00:00:00 UTC
        NetworkId::Live => Timestamp::new(1_767_225_600),
        // Test: 2025-06-01 00:00:00 UTC
        NetworkId::Test => Timestamp::new(1_748_736_000),
        // Dev: epoch 0
        NetworkId::Dev => Timestamp::new(0),
    }
}
