//! Value-transfer records.

use serde::{Deserialize, Serialize};

use crate::error::TxError;
use tally_crypto::blake2b_256_multi;
use tally_types::{AccountId, Amount, Signature, Timestamp, TxHash};

/// Separator between variable-length fields in the hash preimage.
const FIELD_SEP: [u8; 1] = [0x1f];

/// A single value transfer. Immutable once created.
///
/// A missing sender denotes a minted reward transaction, which only
/// credits. Reward construction is reserved for block producers; ordinary
/// submitters go through [`Transaction::new`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub sender: Option<AccountId>,
    pub receiver: AccountId,
    pub amount: Amount,
    pub timestamp: Timestamp,
    /// Opaque signature bytes; verification is a pluggable capability.
    pub signature: Signature,
    /// Content hash over (sender, receiver, amount, timestamp).
    pub hash: TxHash,
}

impl Transaction {
    /// Create a transfer from `sender` to `receiver`.
    ///
    /// Fails with [`TxError::InvalidAmount`] on a zero amount (negative
    /// amounts are unrepresentable) and [`TxError::InvalidAddress`] when
    /// either party's identifier is empty.
    pub fn new(
        sender: AccountId,
        receiver: AccountId,
        amount: Amount,
        timestamp: Timestamp,
    ) -> Result<Self, TxError> {
        if amount.is_zero() {
            return Err(TxError::InvalidAmount);
        }
        if !sender.is_valid() {
            return Err(TxError::InvalidAddress(sender.as_str().to_string()));
        }
        if !receiver.is_valid() {
            return Err(TxError::InvalidAddress(receiver.as_str().to_string()));
        }
        Ok(Self::build(Some(sender), receiver, amount, timestamp))
    }

    /// Create a minted reward transaction (no sender; only credits).
    pub fn reward(
        receiver: AccountId,
        amount: Amount,
        timestamp: Timestamp,
    ) -> Result<Self, TxError> {
        if amount.is_zero() {
            return Err(TxError::InvalidAmount);
        }
        if !receiver.is_valid() {
            return Err(TxError::InvalidAddress(receiver.as_str().to_string()));
        }
        Ok(Self::build(None, receiver, amount, timestamp))
    }

    fn build(
        sender: Option<AccountId>,
        receiver: AccountId,
        amount: Amount,
        timestamp: Timestamp,
    ) -> Self {
        let mut tx = Self {
            sender,
            receiver,
            amount,
            timestamp,
            signature: Signature::ZERO,
            hash: TxHash::ZERO,
        };
        tx.hash = tx.compute_hash();
        tx
    }

    /// Attach a signature. The signature covers the hash; it is not part of
    /// the hash preimage.
    pub fn with_signature(mut self, signature: Signature) -> Self {
        self.signature = signature;
        self
    }

    /// Whether this is a minted reward (no sender).
    pub fn is_reward(&self) -> bool {
        self.sender.is_none()
    }

    /// Recompute the canonical content hash of this transaction.
    pub fn compute_hash(&self) -> TxHash {
        let sender_bytes: &[u8] = self
            .sender
            .as_ref()
            .map(|s| s.as_str().as_bytes())
            .unwrap_or(b"");
        TxHash::new(blake2b_256_multi(&[
            sender_bytes,
            &FIELD_SEP,
            self.receiver.as_str().as_bytes(),
            &FIELD_SEP,
            &self.amount.raw().to_be_bytes(),
            &self.timestamp.as_secs().to_be_bytes(),
        ]))
    }
}
