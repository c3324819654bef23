//! Submission-time and chain-level error types.
//!
//! Everything here is recoverable by rejection at the boundary where it is
//! detected: a bad transaction never enters the pool, a bad block never
//! enters the chain, and an invalid chain is replaced wholesale.

use thiserror::Error;

/// Malformed transaction input, rejected at submission.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TxError {
    #[error("invalid amount: transfers must move a non-zero value")]
    InvalidAmount,

    #[error("invalid address: {0:?}")]
    InvalidAddress(String),
}

/// Malformed or unearned block, rejected at append; or tampering detected
/// during whole-chain validation.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ChainError {
    #[error("linkage error: block {index} does not extend the chain tip")]
    Linkage { index: u64 },

    #[error("difficulty not met: block {index} hash misses its target of {difficulty} leading zero bits")]
    DifficultyNotMet { index: u64, difficulty: u32 },

    #[error("chain invalid at block {index}: {reason}")]
    ChainInvalid { index: u64, reason: String },
}
