use thiserror::Error;

use tally_types::{AccountId, Amount};

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("chain error: {0}")]
    Chain(#[from] tally_ledger::ChainError),

    #[error("transaction error: {0}")]
    Transaction(#[from] tally_ledger::TxError),

    #[error("work error: {0}")]
    Work(#[from] tally_work::WorkError),

    #[error("block rejected by {strategy} consensus")]
    ConsensusRejected { strategy: String },

    #[error("transaction signature is invalid")]
    SignatureInvalid,

    #[error("insufficient funds: {account} cannot cover {needed}")]
    InsufficientFunds { account: AccountId, needed: Amount },

    #[error("pending pool is full")]
    PoolFull,

    #[error("no transactions to mine")]
    NothingToMine,

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
