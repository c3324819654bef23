//! Work-based policy: the sealed hash is the proof.

use crate::participant::Participant;
use crate::strategy::ConsensusStrategy;
use tally_ledger::Block;
use tally_types::AccountId;

/// Proof-of-work consensus.
///
/// Selection is a no-op — whichever participant finds a valid nonce first
/// wins the slot. Validation re-derives the admission check from scratch:
/// stored hashes are recomputed from contents and the difficulty target is
/// re-checked, so no approval gathering is needed.
pub struct ProofOfWork;

impl ConsensusStrategy for ProofOfWork {
    fn select_candidate<'a>(
        &self,
        _participants: &'a [Participant],
        _seed: &[u8],
    ) -> Option<&'a Participant> {
        None
    }

    fn validate(
        &self,
        block: &Block,
        _validators: &[Participant],
        _approvals: &[AccountId],
    ) -> bool {
        block.transactions.iter().all(|tx| tx.hash == tx.compute_hash())
            && block.hash == block.compute_hash()
            && block.meets_target()
    }

    fn name(&self) -> &'static str {
        "proof-of-work"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_types::{AccountId, Amount, BlockHash, Timestamp};
    use tally_work::mine_sequential;

    fn mined_block(difficulty: u32) -> Block {
        let mut block = Block::new(
            1,
            Vec::new(),
            BlockHash::new([3; 32]),
            difficulty,
            Timestamp::new(1_000),
        );
        let nonce = mine_sequential(&block.premine_digest(), difficulty);
        block.seal(nonce.0);
        block
    }

    #[test]
    fn select_candidate_has_no_opinion() {
        let strategy = ProofOfWork;
        let participants = vec![Participant::new(AccountId::new("p1"), Amount::new(10))];
        assert!(strategy.select_candidate(&participants, b"seed").is_none());
    }

    #[test]
    fn validates_properly_mined_block() {
        let strategy = ProofOfWork;
        let block = mined_block(6);
        assert!(strategy.validate(&block, &[], &[]));
    }

    #[test]
    fn rejects_block_missing_its_target() {
        let strategy = ProofOfWork;
        let mut block = mined_block(6);
        // Re-seal with a nonce that misses the target.
        let mut nonce = block.header.nonce;
        loop {
            nonce = nonce.wrapping_add(1);
            block.seal(nonce);
            if !block.meets_target() {
                break;
            }
        }
        assert!(!strategy.validate(&block, &[], &[]));
    }

    #[test]
    fn rejects_tampered_block() {
        let strategy = ProofOfWork;
        let mut block = mined_block(6);
        block.index = 7; // contents no longer match the stored hash
        assert!(!strategy.validate(&block, &[], &[]));
    }
}
