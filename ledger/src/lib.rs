//! The tally ledger — an append-only, hash-linked chain of transaction
//! batches with proof-of-work admission control.
//!
//! ## Module overview
//!
//! - [`transaction`] — value-transfer records, validated at construction.
//! - [`block`] — ordered transaction batches sealed by a nonce search.
//! - [`chain`] — linkage, validation, and fork adoption.
//! - [`genesis`] — deterministic per-network first blocks.
//! - [`balances`] — account balances derived by replay.
//! - [`error`] — submission and chain error types.

pub mod balances;
pub mod block;
pub mod chain;
pub mod error;
pub mod genesis;
pub mod transaction;

pub use balances::{balance_of, Balances};
pub use block::{Block, BlockHeader};
pub use chain::Chain;
pub use error::{ChainError, TxError};
pub use genesis::{create_genesis_block, genesis_hash, initial_params};
pub use transaction::Transaction;
