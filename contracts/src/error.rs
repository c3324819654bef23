//! Executor error types — rejected before any state mutation.

use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ExecError {
    #[error("unknown function: {0:?}")]
    UnknownFunction(String),

    #[error("invalid args: {0}")]
    InvalidArgs(String),
}
