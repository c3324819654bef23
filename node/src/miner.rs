//! Mining worker — the nonce search on a dedicated thread.
//!
//! Mining is the only long-running CPU-bound operation in the node and
//! runs separately from the validation/append path. Cancellation is
//! cooperative: raising the shared flag makes the search abort at its next
//! batch boundary.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

use tally_ledger::Block;
use tally_work::{mine, WorkError};

/// Handle to an in-flight nonce search.
pub struct MiningWorker {
    cancel: Arc<AtomicBool>,
    rx: mpsc::Receiver<Result<Block, WorkError>>,
    handle: thread::JoinHandle<()>,
}

impl MiningWorker {
    /// Start sealing `block` on a dedicated thread.
    pub fn spawn(mut block: Block) -> Self {
        let cancel = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancel);
        let (tx, rx) = mpsc::channel();

        let handle = thread::spawn(move || {
            let digest = block.premine_digest();
            let result = mine(&digest, block.header.difficulty, &flag).map(|nonce| {
                block.seal(nonce.0);
                block
            });
            let _ = tx.send(result);
        });

        Self { cancel, rx, handle }
    }

    /// The shared cancellation flag for this search.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Abandon the search.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    /// Non-blocking poll for a finished search.
    pub fn try_result(&self) -> Option<Result<Block, WorkError>> {
        self.rx.try_recv().ok()
    }

    /// Block until the search finishes with a sealed block or cancellation.
    pub fn join(self) -> Result<Block, WorkError> {
        let result = self.rx.recv().unwrap_or(Err(WorkError::Cancelled));
        let _ = self.handle.join();
        result
    }
}
