//! Pending transaction pool.
//!
//! Transactions wait here between submission and inclusion in a block.
//! Access is safe under concurrent submission and a single concurrent
//! drain. Drained transactions that do not make it into an accepted block
//! must be handed back via [`PendingPool::restore`] — no transaction is
//! silently lost on a failed mining attempt.

use std::collections::VecDeque;
use std::sync::Mutex;

use tally_ledger::{Balances, Transaction};
use tally_types::Amount;

use crate::error::NodeError;

/// Mutable multiset of transactions awaiting inclusion.
pub struct PendingPool {
    inner: Mutex<VecDeque<Transaction>>,
    max_capacity: usize,
}

impl PendingPool {
    pub fn new(max_capacity: usize) -> Self {
        Self {
            inner: Mutex::new(VecDeque::new()),
            max_capacity,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<Transaction>> {
        self.inner.lock().expect("pending pool lock poisoned")
    }

    /// Submit a transaction for later inclusion.
    ///
    /// The overdraw gate lives here, at submission time: the sender must
    /// cover the amount out of its confirmed balance plus whatever is
    /// already pending for it (credits minus debits). Replay never
    /// re-checks this — block inclusion implies prior validation. Reward
    /// transactions only credit and skip the gate.
    pub fn submit(&self, tx: Transaction, balances: &Balances) -> Result<(), NodeError> {
        let mut queue = self.lock();
        if queue.len() >= self.max_capacity {
            return Err(NodeError::PoolFull);
        }

        if let Some(sender) = &tx.sender {
            let pending_in = queue
                .iter()
                .filter(|t| &t.receiver == sender)
                .fold(Amount::ZERO, |acc, t| acc.saturating_add(t.amount));
            let pending_out = queue
                .iter()
                .filter(|t| t.sender.as_ref() == Some(sender))
                .fold(Amount::ZERO, |acc, t| acc.saturating_add(t.amount));
            let available = balances
                .balance_of(sender)
                .saturating_add(pending_in)
                .saturating_sub(pending_out);

            if tx.amount > available {
                return Err(NodeError::InsufficientFunds {
                    account: sender.clone(),
                    needed: tx.amount,
                });
            }
        }

        queue.push_back(tx);
        Ok(())
    }

    /// Drain up to `max` transactions, oldest first, for a candidate block.
    pub fn drain(&self, max: usize) -> Vec<Transaction> {
        let mut queue = self.lock();
        let n = max.min(queue.len());
        queue.drain(..n).collect()
    }

    /// Return drained transactions to the front of the pool, preserving
    /// their original order.
    pub fn restore(&self, txs: Vec<Transaction>) {
        let mut queue = self.lock();
        for tx in txs.into_iter().rev() {
            queue.push_front(tx);
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_types::{AccountId, Timestamp};

    fn account(name: &str) -> AccountId {
        AccountId::new(name)
    }

    fn transfer(from: &str, to: &str, amount: u128) -> Transaction {
        Transaction::new(
            account(from),
            account(to),
            Amount::new(amount),
            Timestamp::new(1_000),
        )
        .unwrap()
    }

    fn mint(to: &str, amount: u128) -> Transaction {
        Transaction::reward(account(to), Amount::new(amount), Timestamp::new(1_000)).unwrap()
    }

    #[test]
    fn rewards_bypass_the_overdraw_gate() {
        let pool = PendingPool::new(16);
        pool.submit(mint("alice", 100), &Balances::new()).unwrap();
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn overdraw_rejected_at_submission() {
        let pool = PendingPool::new(16);
        let err = pool
            .submit(transfer("alice", "bob", 10), &Balances::new())
            .unwrap_err();
        assert!(matches!(err, NodeError::InsufficientFunds { .. }));
        assert!(pool.is_empty());
    }

    #[test]
    fn pending_credits_count_toward_cover() {
        let pool = PendingPool::new(16);
        let balances = Balances::new();

        // Alice has nothing confirmed, but a pending mint covers the spend.
        pool.submit(mint("alice", 100), &balances).unwrap();
        pool.submit(transfer("alice", "bob", 10), &balances).unwrap();
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn pending_debits_reduce_cover() {
        let pool = PendingPool::new(16);
        let balances = Balances::new();

        pool.submit(mint("alice", 100), &balances).unwrap();
        pool.submit(transfer("alice", "bob", 80), &balances).unwrap();
        let err = pool
            .submit(transfer("alice", "carol", 30), &balances)
            .unwrap_err();
        assert!(matches!(err, NodeError::InsufficientFunds { .. }));
    }

    #[test]
    fn capacity_is_enforced() {
        let pool = PendingPool::new(2);
        let balances = Balances::new();
        pool.submit(mint("a", 1), &balances).unwrap();
        pool.submit(mint("b", 1), &balances).unwrap();
        let err = pool.submit(mint("c", 1), &balances).unwrap_err();
        assert!(matches!(err, NodeError::PoolFull));
    }

    #[test]
    fn drain_takes_oldest_first() {
        let pool = PendingPool::new(16);
        let balances = Balances::new();
        pool.submit(mint("a", 1), &balances).unwrap();
        pool.submit(mint("b", 2), &balances).unwrap();
        pool.submit(mint("c", 3), &balances).unwrap();

        let drained = pool.drain(2);
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].receiver, account("a"));
        assert_eq!(drained[1].receiver, account("b"));
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn restore_preserves_order() {
        let pool = PendingPool::new(16);
        let balances = Balances::new();
        pool.submit(mint("a", 1), &balances).unwrap();
        pool.submit(mint("b", 2), &balances).unwrap();
        pool.submit(mint("c", 3), &balances).unwrap();

        let drained = pool.drain(2);
        pool.restore(drained);

        let all = pool.drain(16);
        let receivers: Vec<&str> = all.iter().map(|t| t.receiver.as_str()).collect();
        assert_eq!(receivers, vec!["a", "b", "c"]);
    }

    #[test]
    fn concurrent_submission_is_safe() {
        use std::sync::Arc;

        let pool = Arc::new(PendingPool::new(1024));
        let mut handles = Vec::new();
        for thread_id in 0..8 {
            let pool = Arc::clone(&pool);
            handles.push(std::thread::spawn(move || {
                let balances = Balances::new();
                for i in 0..32 {
                    let name = format!("acct-{thread_id}-{i}");
                    pool.submit(mint(&name, 1), &balances).unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(pool.len(), 8 * 32);
    }
}
