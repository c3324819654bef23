//! Hashing primitives and the signature-verification seam.
//!
//! Every participant must use the same hash function for chain-validity
//! agreement to be meaningful; this crate is that single shared definition.

pub mod hash;
pub mod verify;

pub use hash::{blake2b_256, blake2b_256_multi};
pub use verify::{NoopVerifier, SignatureVerifier};
