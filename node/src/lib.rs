//! Tally participant node.
//!
//! The node is the local coordinator that:
//! - Accepts transaction submissions into the pending pool
//! - Drains the pool into candidate blocks and mines them on a worker
//! - Appends blocks atomically and keeps derived balances in step
//! - Abandons in-flight mining when a competing block is accepted
//! - Resolves forks by adopting whichever valid chain carries more work
//!
//! Participants exchange complete blocks or whole chains and compare them
//! structurally; there is no shared mutable state between processes.

pub mod config;
pub mod error;
pub mod logging;
pub mod miner;
pub mod node;
pub mod pending_pool;
pub mod shutdown;

pub use config::NodeConfig;
pub use error::NodeError;
pub use logging::{init_logging, LogFormat};
pub use miner::MiningWorker;
pub use node::Node;
pub use pending_pool::PendingPool;
pub use shutdown::ShutdownController;
