//! The pluggable consensus capability.

use crate::participant::Participant;
use tally_ledger::Block;
use tally_types::AccountId;

/// Capability set every consensus policy must implement.
///
/// Implementations must be deterministic: the same inputs must give the
/// same answer on every participant, since each one re-derives both
/// selection and validation independently.
pub trait ConsensusStrategy: Send + Sync {
    /// Choose which participant may produce the next block.
    ///
    /// `seed` is shared context (typically the current tip hash) so that
    /// every participant derives the same choice. Returns `None` when the
    /// policy has no opinion — under proof-of-work, whoever seals a valid
    /// block first wins.
    fn select_candidate<'a>(
        &self,
        participants: &'a [Participant],
        seed: &[u8],
    ) -> Option<&'a Participant>;

    /// Whether `block` is acceptable given the validator set and the
    /// approvals gathered so far. Each validator counts at most once,
    /// however many times it appears in `approvals`.
    fn validate(
        &self,
        block: &Block,
        validators: &[Participant],
        approvals: &[AccountId],
    ) -> bool;

    /// Policy name, for diagnostics.
    fn name(&self) -> &'static str;
}
