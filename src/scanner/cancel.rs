//! Scan-wide cancellation.
//!
//! A [`CancelHandle`] flips a `watch` channel once; every [`CancelSignal`]
//! clone observes it. Probes select against the signal, so a cancelled
//! probe drops its socket and slot immediately.

use std::sync::Arc;
use tokio::sync::watch;

/// Triggers cancellation of a running scan.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

/// Observes cancellation requests.
#[derive(Debug, Clone)]
pub struct CancelSignal {
    rx: watch::Receiver<bool>,
}

impl CancelSignal {
    /// A signal that never fires.
    pub fn never() -> Self {
        let (_tx, rx) = watch::channel(false);
        Self { rx }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once cancellation has been requested. Pends forever if every
    /// handle is dropped without cancelling.
    pub async fn cancelled(&mut self) {
        let fired = self.rx.wait_for(|cancelled| *cancelled).await.is_ok();
        if !fired {
            std::future::pending::<()>().await;
        }
    }
}

/// Create a connected handle and signal.
pub fn cancel_pair() -> (CancelHandle, CancelSignal) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx: Arc::new(tx) }, CancelSignal { rx })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn test_cancel_wakes_all_clones() {
        let (handle, signal) = cancel_pair();
        let mut a = signal.clone();
        let mut b = signal;

        assert!(!a.is_cancelled());
        handle.cancel();

        timeout(Duration::from_secs(1), a.cancelled()).await.unwrap();
        timeout(Duration::from_secs(1), b.cancelled()).await.unwrap();
        assert!(b.is_cancelled());
    }

    #[tokio::test]
    async fn test_never_does_not_fire() {
        let mut signal = CancelSignal::never();
        assert!(timeout(Duration::from_millis(50), signal.cancelled())
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_dropped_handle_does_not_fire() {
        let (handle, mut signal) = cancel_pair();
        drop(handle);
        assert!(timeout(Duration::from_millis(50), signal.cancelled())
            .await
            .is_err());
    }
}
