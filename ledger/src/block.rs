//! Blocks — ordered, hash-sealed batches of transactions.

use serde::{Deserialize, Serialize};

use crate::transaction::Transaction;
use tally_crypto::blake2b_256_multi;
use tally_types::{BlockHash, Timestamp};
use tally_work::{meets_difficulty, seal_hash};

/// Block linkage and admission metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    /// Hash of the predecessor block; [`BlockHash::ZERO`] for genesis.
    pub previous_hash: BlockHash,
    pub timestamp: Timestamp,
    /// Required leading zero bits of the sealed hash.
    pub difficulty: u32,
    /// Free integer varied during mining.
    pub nonce: u64,
}

/// An ordered batch of transactions plus linkage metadata.
///
/// A block is mutable only during mining (the nonce search); once appended
/// to a chain it is owned by the chain and never changes again. The stored
/// `hash` must equal `compute_hash()` at all times after construction —
/// [`Block::seal`] keeps the two in step when the nonce moves.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub header: BlockHeader,
    /// Transaction order matters: balances replay in this order.
    pub transactions: Vec<Transaction>,
    pub hash: BlockHash,
}

impl Block {
    /// Construct an unsealed candidate with nonce 0.
    ///
    /// The initial hash is computed but will not generally satisfy the
    /// difficulty target; mining is required before a chain accepts it.
    pub fn new(
        index: u64,
        transactions: Vec<Transaction>,
        previous_hash: BlockHash,
        difficulty: u32,
        timestamp: Timestamp,
    ) -> Self {
        let mut block = Self {
            index,
            header: BlockHeader {
                previous_hash,
                timestamp,
                difficulty,
                nonce: 0,
            },
            transactions,
            hash: BlockHash::ZERO,
        };
        block.hash = block.compute_hash();
        block
    }

    /// Hash of the ordered transaction batch.
    pub fn body_root(&self) -> BlockHash {
        let parts: Vec<&[u8]> = self
            .transactions
            .iter()
            .map(|tx| tx.hash.as_bytes().as_slice())
            .collect();
        BlockHash::new(blake2b_256_multi(&parts))
    }

    /// Digest over everything except the nonce — the mining input.
    pub fn premine_digest(&self) -> BlockHash {
        BlockHash::new(blake2b_256_multi(&[
            &self.index.to_be_bytes(),
            self.header.previous_hash.as_bytes(),
            &self.header.timestamp.as_secs().to_be_bytes(),
            &self.header.difficulty.to_be_bytes(),
            self.body_root().as_bytes(),
        ]))
    }

    /// Recompute this block's hash from its contents.
    pub fn compute_hash(&self) -> BlockHash {
        seal_hash(&self.premine_digest(), self.header.nonce)
    }

    /// Set the nonce and recompute the hash.
    pub fn seal(&mut self, nonce: u64) {
        self.header.nonce = nonce;
        self.hash = self.compute_hash();
    }

    /// Whether the stored hash satisfies the stated difficulty target.
    pub fn meets_target(&self) -> bool {
        meets_difficulty(&self.hash, self.header.difficulty)
    }

    /// Whether this is the first block of a chain.
    pub fn is_genesis(&self) -> bool {
        self.index == 0 && self.header.previous_hash.is_zero()
    }
}
