//! The hash-linked chain — linkage enforcement, validation, fork adoption.

use serde::{Deserialize, Serialize};

use crate::block::Block;
use crate::error::ChainError;

/// An ordered, hash-linked sequence of blocks rooted at a genesis block.
///
/// The chain is the sole owner of its blocks: the only mutation path is
/// [`Chain::append`], and committed blocks are never edited or removed.
/// Replacement happens only wholesale, through [`Chain::adopt_if_better`],
/// when a competing valid chain carries strictly more accumulated work.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chain {
    blocks: Vec<Block>,
}

impl Chain {
    /// Start a chain from a sealed genesis block.
    pub fn new(genesis: Block) -> Self {
        Self {
            blocks: vec![genesis],
        }
    }

    /// Reassemble a chain received from another participant.
    ///
    /// No integrity checks run here — a received chain is untrusted until
    /// [`Chain::validate`] passes (adoption via [`Chain::adopt_if_better`]
    /// validates internally). Returns `None` for an empty block list.
    pub fn from_blocks(blocks: Vec<Block>) -> Option<Self> {
        if blocks.is_empty() {
            return None;
        }
        Some(Self { blocks })
    }

    /// The most recently appended block.
    pub fn tip(&self) -> &Block {
        self.blocks.last().expect("chain always contains genesis")
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn get(&self, index: u64) -> Option<&Block> {
        self.blocks.get(index as usize)
    }

    /// All blocks in chain order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Run every append-time check against a candidate without mutating.
    ///
    /// Fails with [`ChainError::Linkage`] when the candidate's
    /// `previous_hash`/index does not extend the tip, with
    /// [`ChainError::DifficultyNotMet`] when the recomputed hash misses the
    /// block's stated target, and with [`ChainError::ChainInvalid`] when the
    /// stored hashes do not match the block's contents.
    pub fn check_candidate(&self, block: &Block) -> Result<(), ChainError> {
        let tip = self.tip();
        if block.header.previous_hash != tip.hash || block.index != tip.index + 1 {
            return Err(ChainError::Linkage { index: block.index });
        }
        verify_block(block)
    }

    /// Append a candidate block to the tip.
    ///
    /// Runs [`Chain::check_candidate`]; the chain is unaffected on any
    /// failure.
    pub fn append(&mut self, block: Block) -> Result<(), ChainError> {
        self.check_candidate(&block)?;
        self.blocks.push(block);
        Ok(())
    }

    /// Re-derive every integrity check over the whole chain.
    ///
    /// Any participant can run this independently: hashes are recomputed
    /// from stated contents (never trusted), linkage and index monotonicity
    /// are checked pairwise, and every block must satisfy its own stated
    /// difficulty target. A chain failing any check is rejected wholesale.
    pub fn validate(&self) -> Result<(), ChainError> {
        let genesis = &self.blocks[0];
        if genesis.index != 0 {
            return Err(ChainError::ChainInvalid {
                index: genesis.index,
                reason: "genesis index must be 0".into(),
            });
        }
        if !genesis.header.previous_hash.is_zero() {
            return Err(ChainError::ChainInvalid {
                index: 0,
                reason: "genesis previous_hash must be zero".into(),
            });
        }

        for (i, block) in self.blocks.iter().enumerate() {
            if block.index != i as u64 {
                return Err(ChainError::ChainInvalid {
                    index: block.index,
                    reason: format!("index {} out of sequence at position {i}", block.index),
                });
            }
            if i > 0 {
                let prev = &self.blocks[i - 1];
                if block.header.previous_hash != prev.hash {
                    return Err(ChainError::ChainInvalid {
                        index: block.index,
                        reason: "previous-hash linkage broken".into(),
                    });
                }
            }
            verify_block(block)?;
        }
        Ok(())
    }

    /// Whether the whole chain passes [`Chain::validate`].
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Accumulated admission work: Σ 2^difficulty over all blocks.
    pub fn total_work(&self) -> u128 {
        self.blocks
            .iter()
            .map(|b| {
                1u128
                    .checked_shl(b.header.difficulty)
                    .unwrap_or(u128::MAX)
            })
            .fold(0u128, |acc, w| acc.saturating_add(w))
    }

    /// Adopt `other` when it shares our genesis, is valid, and carries
    /// strictly more accumulated work. Equal work keeps the incumbent
    /// (first seen). Returns whether adoption occurred.
    pub fn adopt_if_better(&mut self, other: Chain) -> bool {
        if other.blocks[0].hash != self.blocks[0].hash {
            return false;
        }
        if !other.is_valid() {
            return false;
        }
        if other.total_work() > self.total_work() {
            *self = other;
            true
        } else {
            false
        }
    }
}

/// Verify one block's internal integrity: per-transaction hashes, the block
/// hash itself, and the difficulty target.
fn verify_block(block: &Block) -> Result<(), ChainError> {
    for tx in &block.transactions {
        if tx.hash != tx.compute_hash() {
            return Err(ChainError::ChainInvalid {
                index: block.index,
                reason: format!("transaction {} hash does not match its contents", tx.hash),
            });
        }
    }
    if block.hash != block.compute_hash() {
        return Err(ChainError::ChainInvalid {
            index: block.index,
            reason: "block hash does not match its contents".into(),
        });
    }
    if !block.meets_target() {
        return Err(ChainError::DifficultyNotMet {
            index: block.index,
            difficulty: block.header.difficulty,
        });
    }
    Ok(())
}
