//! Fundamental types for the tally ledger.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: account identifiers, hashes, amounts, timestamps, signatures,
//! network ids, and protocol parameters.

pub mod account;
pub mod amount;
pub mod hash;
pub mod network;
pub mod params;
pub mod signature;
pub mod time;

pub use account::AccountId;
pub use amount::Amount;
pub use hash::{BlockHash, TxHash};
pub use network::NetworkId;
pub use params::ProtocolParams;
pub use signature::Signature;
pub use time::Timestamp;
