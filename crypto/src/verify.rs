//! Pluggable signature verification.
//!
//! Transactions carry an opaque [`Signature`] field that this core never
//! interprets. Verification against a real scheme (Ed25519, ECDSA) is an
//! external collaborator plugged in through [`SignatureVerifier`].

use tally_types::{AccountId, Signature};

/// Capability for verifying a signature over a message, claimed by a signer.
pub trait SignatureVerifier: Send + Sync {
    /// Whether `signature` is a valid signature of `message` by `signer`.
    fn verify(&self, signer: &AccountId, message: &[u8], signature: &Signature) -> bool;

    /// Implementation name, for diagnostics.
    fn name(&self) -> &str;
}

/// Accepts every signature. The in-tree default while no real scheme is
/// wired in; participants that need authenticity must supply their own
/// implementation.
pub struct NoopVerifier;

impl SignatureVerifier for NoopVerifier {
    fn verify(&self, _signer: &AccountId, _message: &[u8], _signature: &Signature) -> bool {
        true
    }

    fn name(&self) -> &str {
        "noop"
    }
}
