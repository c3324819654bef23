//! Stake-based policy: weighted selection and weighted quorum.

use crate::participant::Participant;
use crate::strategy::ConsensusStrategy;
use tally_crypto::blake2b_256;
use tally_ledger::Block;
use tally_types::AccountId;

/// Proof-of-stake consensus.
///
/// Selection draws a participant with probability proportional to declared
/// stake, from a seed-derived value any node can re-derive — the same seed
/// and participant list always select the same producer. Validation
/// requires approvals from validators carrying strictly more than the
/// quorum fraction of total stake.
pub struct ProofOfStake {
    /// Basis points of total stake that approvals must strictly exceed.
    quorum_threshold_bps: u32,
}

impl ProofOfStake {
    /// Majority quorum: approvals must exceed half the total stake.
    pub fn new() -> Self {
        Self {
            quorum_threshold_bps: 5_000,
        }
    }

    pub fn with_quorum_bps(quorum_threshold_bps: u32) -> Self {
        Self {
            quorum_threshold_bps,
        }
    }

    fn total_stake(participants: &[Participant]) -> u128 {
        participants
            .iter()
            .fold(0u128, |acc, p| acc.saturating_add(p.stake.raw()))
    }
}

impl Default for ProofOfStake {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsensusStrategy for ProofOfStake {
    fn select_candidate<'a>(
        &self,
        participants: &'a [Participant],
        seed: &[u8],
    ) -> Option<&'a Participant> {
        let total = Self::total_stake(participants);
        if total == 0 {
            return None;
        }

        let digest = blake2b_256(seed);
        let draw_bytes: [u8; 16] = digest[..16].try_into().expect("digest is 32 bytes");
        let draw = u128::from_be_bytes(draw_bytes) % total;

        let mut cumulative = 0u128;
        for participant in participants {
            cumulative = cumulative.saturating_add(participant.stake.raw());
            if draw < cumulative {
                return Some(participant);
            }
        }
        participants.last()
    }

    fn validate(
        &self,
        _block: &Block,
        validators: &[Participant],
        approvals: &[AccountId],
    ) -> bool {
        let total = Self::total_stake(validators);
        if total == 0 {
            return false;
        }

        // Each validator counts once, however often it appears in approvals.
        let approved: u128 = validators
            .iter()
            .filter(|v| approvals.contains(&v.id))
            .fold(0u128, |acc, v| acc.saturating_add(v.stake.raw()));

        approved.saturating_mul(10_000) > total.saturating_mul(self.quorum_threshold_bps as u128)
    }

    fn name(&self) -> &'static str {
        "proof-of-stake"
    }
}
