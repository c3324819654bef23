//! Graceful shutdown controller for the tally node.
//!
//! Listens for SIGINT/SIGTERM and broadcasts a shutdown signal to all
//! subsystems via a `tokio::sync::broadcast` channel. The in-flight nonce
//! search is not async — [`ShutdownController::notify_flag`] bridges the
//! broadcast into the miner's cooperative cancellation flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::signal;
use tokio::sync::broadcast;

/// Coordinates graceful shutdown across node subsystems.
///
/// Subsystems call [`ShutdownController::subscribe`] to get a receiver,
/// then `select!` on it alongside their main loop.
pub struct ShutdownController {
    tx: broadcast::Sender<()>,
}

impl ShutdownController {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Get a receiver that will be notified on shutdown.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Trigger shutdown programmatically.
    pub fn shutdown(&self) {
        let _ = self.tx.send(());
    }

    /// Raise `flag` when shutdown fires — the bridge into the mining
    /// worker's cancellation check.
    pub fn notify_flag(&self, flag: Arc<AtomicBool>) {
        let mut rx = self.subscribe();
        tokio::spawn(async move {
            if rx.recv().await.is_ok() {
                flag.store(true, Ordering::Relaxed);
            }
        });
    }

    /// Wait for SIGTERM or SIGINT, then trigger shutdown.
    pub async fn wait_for_signal(&self) {
        let ctrl_c = signal::ctrl_c();

        #[cfg(unix)]
        let terminate = async {
            signal::unix::signal(signal::unix::SignalKind::terminate())
                .expect("failed to install SIGTERM handler")
                .recv()
                .await;
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => { tracing::info!("received SIGINT, shutting down"); }
            _ = terminate => { tracing::info!("received SIGTERM, shutting down"); }
        }

        self.shutdown();
    }
}

impl Default for ShutdownController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn programmatic_shutdown_notifies_subscribers() {
        let controller = ShutdownController::new();
        let mut rx = controller.subscribe();
        controller.shutdown();
        assert!(rx.recv().await.is_ok());
    }

    #[tokio::test]
    async fn shutdown_raises_linked_flag() {
        let controller = ShutdownController::new();
        let flag = Arc::new(AtomicBool::new(false));
        controller.notify_flag(Arc::clone(&flag));

        // Let the bridge task register its receiver before firing.
        tokio::task::yield_now().await;
        controller.shutdown();

        for _ in 0..100 {
            if flag.load(Ordering::Relaxed) {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(1)).await;
        }
        panic!("cancellation flag was never raised");
    }
}
