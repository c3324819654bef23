//! Nonce search (multi-threaded CPU, cooperatively cancellable).

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use rayon::prelude::*;

use crate::target::meets_difficulty;
use crate::{WorkError, WorkNonce};
use tally_crypto::blake2b_256_multi;
use tally_types::BlockHash;

/// Nonces checked per thread between cancellation checks.
const BATCH_SIZE: u64 = 4096;

/// Compute the sealed hash for a pre-mining digest and a candidate nonce.
///
/// The digest covers everything in the block except the nonce, so the hot
/// loop re-hashes a constant 40-byte input instead of the whole block.
pub fn seal_hash(digest: &BlockHash, nonce: u64) -> BlockHash {
    BlockHash::new(blake2b_256_multi(&[digest.as_bytes(), &nonce.to_be_bytes()]))
}

/// Search for a nonce whose sealed hash meets `difficulty`.
///
/// Splits the nonce space across all available CPU cores via rayon; the
/// first thread to find a valid nonce signals the others to stop. The
/// search aborts with [`WorkError::Cancelled`] as soon as `cancel` is set —
/// checked once per batch, so cancellation latency is bounded.
pub fn mine(
    digest: &BlockHash,
    difficulty: u32,
    cancel: &AtomicBool,
) -> Result<WorkNonce, WorkError> {
    if difficulty == 0 {
        return Ok(WorkNonce(0));
    }

    let found = AtomicU64::new(u64::MAX);
    let num_threads = rayon::current_num_threads().max(1);

    (0..num_threads).into_par_iter().for_each(|thread_id| {
        let mut nonce = thread_id as u64;
        let stride = num_threads as u64;

        loop {
            if found.load(Ordering::Relaxed) != u64::MAX || cancel.load(Ordering::Relaxed) {
                return;
            }

            let end = nonce.saturating_add(BATCH_SIZE * stride);
            while nonce < end {
                if meets_difficulty(&seal_hash(digest, nonce), difficulty) {
                    found.store(nonce, Ordering::Relaxed);
                    return;
                }
                nonce = nonce.wrapping_add(stride);
            }
        }
    });

    let result = found.load(Ordering::Relaxed);
    if result == u64::MAX {
        Err(WorkError::Cancelled)
    } else {
        Ok(WorkNonce(result))
    }
}

/// Deterministic single-threaded search: lowest satisfying nonce wins.
///
/// Used where the result must be identical on every participant (genesis
/// sealing) and in tests. Not cancellable; keep the difficulty small.
pub fn mine_sequential(digest: &BlockHash, difficulty: u32) -> WorkNonce {
    let mut nonce = 0u64;
    loop {
        if meets_difficulty(&seal_hash(digest, nonce), difficulty) {
            return WorkNonce(nonce);
        }
        nonce = nonce.wrapping_add(1);
    }
}
