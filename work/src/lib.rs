//! Proof-of-work admission control.
//!
//! A block earns admission by finding a nonce whose sealed hash clears the
//! block's stated difficulty target. The search is CPU-bound and unbounded
//! but probabilistically converging: expected cost doubles per difficulty
//! bit. The search must be interruptible so a participant can abandon work
//! the moment a competing valid block arrives.

pub mod difficulty;
pub mod error;
pub mod miner;
pub mod target;

pub use difficulty::DifficultyAdjuster;
pub use error::WorkError;
pub use miner::{mine, mine_sequential, seal_hash};
pub use target::{leading_zero_bits, meets_difficulty};

/// The result of a successful nonce search.
#[derive(Clone, Copy, Debug)]
pub struct WorkNonce(pub u64);
