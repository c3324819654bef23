//! Derived account balances.
//!
//! Balances are never stored independently: they are a pure function of the
//! chain, rebuilt by full replay or advanced incrementally block by block.
//! Both routes must produce identical results for any chain (a tested
//! property). Overdraw is a submission-time concern; replay does not
//! re-check it, and a debit beyond the available balance saturates at zero.

use std::collections::HashMap;

use crate::block::Block;
use crate::chain::Chain;
use crate::transaction::Transaction;
use tally_types::{AccountId, Amount};

/// Account balances derived by replaying transactions in chain order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Balances {
    accounts: HashMap<AccountId, Amount>,
}

impl Balances {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild balances by replaying every transaction in chain order.
    pub fn replay(chain: &Chain) -> Self {
        let mut balances = Self::new();
        for block in chain.blocks() {
            balances.apply_block(block);
        }
        balances
    }

    /// Apply one block's transactions in order (incremental update).
    pub fn apply_block(&mut self, block: &Block) {
        for tx in &block.transactions {
            self.apply_transaction(tx);
        }
    }

    /// Debit the sender (absent for rewards) and credit the receiver.
    pub fn apply_transaction(&mut self, tx: &Transaction) {
        if let Some(sender) = &tx.sender {
            let entry = self.accounts.entry(sender.clone()).or_insert(Amount::ZERO);
            *entry = entry.saturating_sub(tx.amount);
        }
        let entry = self
            .accounts
            .entry(tx.receiver.clone())
            .or_insert(Amount::ZERO);
        *entry = entry.saturating_add(tx.amount);
    }

    /// Current balance of an account (zero when never seen).
    pub fn balance_of(&self, account: &AccountId) -> Amount {
        self.accounts
            .get(account)
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    /// Number of accounts that have appeared in any transaction.
    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }
}

/// Replay `chain` from genesis and return `account`'s balance.
pub fn balance_of(chain: &Chain, account: &AccountId) -> Amount {
    Balances::replay(chain).balance_of(account)
}
