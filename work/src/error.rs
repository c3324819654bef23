use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkError {
    #[error("nonce search cancelled")]
    Cancelled,
}
