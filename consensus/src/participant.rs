//! Participant identity and declared stake.

use serde::{Deserialize, Serialize};

use tally_types::{AccountId, Amount};

/// A participant eligible to produce or validate blocks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: AccountId,
    /// Declared stake; weighs selection and quorum under proof-of-stake.
    /// Ignored by proof-of-work.
    pub stake: Amount,
}

impl Participant {
    pub fn new(id: AccountId, stake: Amount) -> Self {
        Self { id, stake }
    }
}
