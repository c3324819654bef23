//! The local participant — chain ownership, mining orchestration, fork
//! resolution.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tally_consensus::{ConsensusStrategy, Participant, ProofOfWork};
use tally_crypto::{NoopVerifier, SignatureVerifier};
use tally_ledger::{create_genesis_block, initial_params, Balances, Block, Chain, Transaction};
use tally_types::{AccountId, Amount, BlockHash, ProtocolParams, Timestamp};
use tally_work::DifficultyAdjuster;

use crate::config::NodeConfig;
use crate::error::NodeError;
use crate::miner::MiningWorker;
use crate::pending_pool::PendingPool;

/// A single tally participant.
///
/// The node is the sole owner of its [`Chain`]; the chain is mutated only
/// through append and whole-chain adoption, both atomic with respect to
/// concurrent readers. Multi-participant agreement happens purely by
/// exchanging complete blocks ([`Node::receive_block`]) or whole chains
/// ([`Node::receive_chain`]), compared structurally.
pub struct Node {
    config: NodeConfig,
    params: ProtocolParams,
    strategy: Box<dyn ConsensusStrategy>,
    verifier: Box<dyn SignatureVerifier>,
    chain: RwLock<Chain>,
    balances: RwLock<Balances>,
    pool: PendingPool,
    validators: RwLock<Vec<Participant>>,
    adjuster: Mutex<DifficultyAdjuster>,
    /// Cancellation flag of the in-flight local search, when one exists.
    mining_cancel: Mutex<Option<Arc<AtomicBool>>>,
}

impl Node {
    /// Create a node with the default work-based consensus policy.
    pub fn new(config: NodeConfig) -> Self {
        Self::with_strategy(config, Box::new(ProofOfWork))
    }

    /// Create a node with an explicit consensus policy.
    pub fn with_strategy(config: NodeConfig, strategy: Box<dyn ConsensusStrategy>) -> Self {
        let params = initial_params(&config.network);
        let genesis = create_genesis_block(config.network);
        let base = config.base_difficulty.unwrap_or(params.base_difficulty);

        let mut adjuster = DifficultyAdjuster::new(
            base,
            params.target_block_interval_secs,
            params.difficulty_window,
        );
        adjuster.record_block(genesis.header.timestamp.as_secs());

        let chain = Chain::new(genesis);
        let balances = Balances::replay(&chain);
        let pool = PendingPool::new(config.max_pool_size);

        tracing::info!(
            network = config.network.as_str(),
            strategy = strategy.name(),
            "node initialized"
        );

        Self {
            config,
            params,
            strategy,
            verifier: Box::new(NoopVerifier),
            chain: RwLock::new(chain),
            balances: RwLock::new(balances),
            pool,
            validators: RwLock::new(Vec::new()),
            adjuster: Mutex::new(adjuster),
            mining_cancel: Mutex::new(None),
        }
    }

    /// Plug in a real signature-verification scheme. The default accepts
    /// everything; signature cryptography is an external collaborator.
    pub fn with_verifier(mut self, verifier: Box<dyn SignatureVerifier>) -> Self {
        self.verifier = verifier;
        self
    }

    // ── Lock helpers ────────────────────────────────────────────────────

    fn read_chain(&self) -> RwLockReadGuard<'_, Chain> {
        self.chain.read().expect("chain lock poisoned")
    }

    fn write_chain(&self) -> RwLockWriteGuard<'_, Chain> {
        self.chain.write().expect("chain lock poisoned")
    }

    fn read_balances(&self) -> RwLockReadGuard<'_, Balances> {
        self.balances.read().expect("balances lock poisoned")
    }

    fn write_balances(&self) -> RwLockWriteGuard<'_, Balances> {
        self.balances.write().expect("balances lock poisoned")
    }

    fn lock_adjuster(&self) -> MutexGuard<'_, DifficultyAdjuster> {
        self.adjuster.lock().expect("difficulty adjuster lock poisoned")
    }

    fn lock_mining(&self) -> MutexGuard<'_, Option<Arc<AtomicBool>>> {
        self.mining_cancel.lock().expect("mining flag lock poisoned")
    }

    // ── Submission ──────────────────────────────────────────────────────

    /// Submit a transaction to the pending pool.
    ///
    /// The sender's signature is checked through the pluggable verifier;
    /// rewards carry no sender and skip the check.
    pub fn submit_transaction(&self, tx: Transaction) -> Result<(), NodeError> {
        if let Some(sender) = &tx.sender {
            if !self
                .verifier
                .verify(sender, tx.hash.as_bytes(), &tx.signature)
            {
                return Err(NodeError::SignatureInvalid);
            }
        }
        let balances = self.read_balances();
        self.pool.submit(tx, &balances)
    }

    pub fn pending_len(&self) -> usize {
        self.pool.len()
    }

    // ── Mining ──────────────────────────────────────────────────────────

    /// Effective admission difficulty for the next candidate.
    pub fn current_difficulty(&self) -> u32 {
        self.lock_adjuster().current_difficulty()
    }

    /// Drain the pool into a candidate block, seal it on the mining
    /// worker, and append the result.
    ///
    /// When `reward_account` is set, a minted reward of the configured
    /// amount joins the candidate. Rewards are ordered ahead of transfers
    /// so replayed credits precede the spends they fund. On any failure —
    /// cancellation included — the drained transactions return to the
    /// pool; only the synthesized reward is discarded.
    pub fn mine_block(&self, reward_account: Option<AccountId>) -> Result<BlockHash, NodeError> {
        let drained = self.pool.drain(self.params.max_block_transactions);
        let mut txs = drained.clone();
        if let Some(account) = reward_account {
            if self.config.mining_reward > 0 {
                txs.push(Transaction::reward(
                    account,
                    Amount::new(u128::from(self.config.mining_reward)),
                    Timestamp::now(),
                )?);
            }
        }
        if txs.is_empty() {
            return Err(NodeError::NothingToMine);
        }
        txs.sort_by_key(|tx| !tx.is_reward());

        let candidate = {
            let chain = self.read_chain();
            let tip = chain.tip();
            Block::new(
                tip.index + 1,
                txs,
                tip.hash,
                self.current_difficulty(),
                Timestamp::now(),
            )
        };

        tracing::debug!(
            index = candidate.index,
            difficulty = candidate.header.difficulty,
            transactions = candidate.transactions.len(),
            "starting nonce search"
        );

        let worker = MiningWorker::spawn(candidate);
        *self.lock_mining() = Some(worker.cancel_flag());
        let mined = worker.join();
        *self.lock_mining() = None;

        let sealed = match mined {
            Ok(block) => block,
            Err(err) => {
                tracing::info!("nonce search abandoned");
                self.pool.restore(drained);
                return Err(err.into());
            }
        };

        match self.commit_block(sealed) {
            Ok(hash) => {
                tracing::info!(block = %hash, "mined and appended block");
                Ok(hash)
            }
            Err(err) => {
                // A competing block won the slot while we were sealing.
                self.pool.restore(drained);
                Err(err)
            }
        }
    }

    /// Cooperatively abort the in-flight nonce search, if any.
    pub fn cancel_mining(&self) {
        if let Some(flag) = self.lock_mining().as_ref() {
            flag.store(true, Ordering::Relaxed);
        }
    }

    /// Expose the active search's cancel flag (e.g. to wire into a
    /// shutdown controller). `None` when no search is running.
    pub fn mining_cancel_flag(&self) -> Option<Arc<AtomicBool>> {
        self.lock_mining().clone()
    }

    // ── Block intake ────────────────────────────────────────────────────

    /// Accept a complete candidate block from another participant.
    ///
    /// Structural admission runs first — linkage, recomputed hashes, the
    /// difficulty target — then the consensus policy's agreement gate
    /// (`approvals` carry the confirming validators for quorum policies;
    /// work-based validation ignores them). Acceptance cancels any local
    /// search for the same slot. A competing block for an already-filled
    /// slot fails the linkage check: first seen wins.
    pub fn receive_block(
        &self,
        block: Block,
        approvals: &[AccountId],
    ) -> Result<BlockHash, NodeError> {
        {
            let chain = self.read_chain();
            chain.check_candidate(&block)?;
        }

        {
            let validators = self.validators.read().expect("validators lock poisoned");
            if !self.strategy.validate(&block, &validators, approvals) {
                return Err(NodeError::ConsensusRejected {
                    strategy: self.strategy.name().to_string(),
                });
            }
        }

        self.cancel_mining();
        let hash = self.commit_block(block)?;
        tracing::info!(block = %hash, "accepted block from peer");
        Ok(hash)
    }

    /// Append a checked block and advance the derived state in step.
    fn commit_block(&self, block: Block) -> Result<BlockHash, NodeError> {
        let hash = block.hash;
        let timestamp = block.header.timestamp.as_secs();

        // Both guards stay held until the end: readers never observe a
        // partially-applied block.
        let mut chain = self.write_chain();
        let mut balances = self.write_balances();
        chain.append(block.clone())?;
        balances.apply_block(&block);
        self.lock_adjuster().record_block(timestamp);
        Ok(hash)
    }

    /// Consider a complete competing chain for adoption.
    ///
    /// Adopts when the competitor shares our genesis, is valid, and
    /// carries strictly more accumulated work; balances are then rebuilt
    /// by full replay and any local search is abandoned. Returns whether
    /// adoption occurred.
    pub fn receive_chain(&self, other: Chain) -> bool {
        let timestamps: Vec<u64> = {
            let mut chain = self.write_chain();
            let mut balances = self.write_balances();
            if !chain.adopt_if_better(other) {
                return false;
            }
            *balances = Balances::replay(&chain);
            chain
                .blocks()
                .iter()
                .map(|b| b.header.timestamp.as_secs())
                .collect()
        };

        self.cancel_mining();

        let base = self
            .config
            .base_difficulty
            .unwrap_or(self.params.base_difficulty);
        let mut adjuster = self.lock_adjuster();
        *adjuster = DifficultyAdjuster::new(
            base,
            self.params.target_block_interval_secs,
            self.params.difficulty_window,
        );
        for timestamp in timestamps {
            adjuster.record_block(timestamp);
        }

        tracing::info!("adopted competing chain with greater total work");
        true
    }

    // ── Consensus ───────────────────────────────────────────────────────

    /// Replace the validator set used by the consensus policy.
    pub fn set_validators(&self, validators: Vec<Participant>) {
        *self.validators.write().expect("validators lock poisoned") = validators;
    }

    /// Ask the consensus policy which participant should produce the next
    /// block, seeded by the current tip so every node derives the same
    /// answer. `None` under policies with no opinion (proof-of-work).
    pub fn select_producer(&self) -> Option<AccountId> {
        let seed = *self.read_chain().tip().hash.as_bytes();
        let validators = self.validators.read().expect("validators lock poisoned");
        self.strategy
            .select_candidate(&validators, &seed)
            .map(|p| p.id.clone())
    }

    pub fn strategy_name(&self) -> &str {
        self.strategy.name()
    }

    // ── Queries ─────────────────────────────────────────────────────────

    /// Current balance of an account (incrementally maintained).
    pub fn balance_of(&self, account: &AccountId) -> Amount {
        self.read_balances().balance_of(account)
    }

    /// Independently re-derive the whole chain's integrity.
    pub fn is_valid(&self) -> bool {
        self.read_chain().is_valid()
    }

    pub fn chain_len(&self) -> usize {
        self.read_chain().len()
    }

    pub fn tip_hash(&self) -> BlockHash {
        self.read_chain().tip().hash
    }

    /// A structural copy of the chain, for exchange with other
    /// participants.
    pub fn snapshot(&self) -> Chain {
        self.read_chain().clone()
    }

    pub fn params(&self) -> &ProtocolParams {
        &self.params
    }
}
