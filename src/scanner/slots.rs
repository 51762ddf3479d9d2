//! Concurrency slots and the drain barrier.
//!
//! A scan-local counting semaphore caps the number of probes in flight. A
//! [`Slot`] is an owned permit: it is released exactly once, when it is
//! dropped, on whichever path the probe holding it takes.

use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::{debug, trace};

/// Slot acquisition failed because the underlying semaphore was closed.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("concurrency slots are closed")]
pub struct SlotsClosed;

/// Permission to have one probe in flight.
#[derive(Debug)]
pub struct Slot {
    _permit: OwnedSemaphorePermit,
}

/// A counting pool sized to the concurrency limit of one scan.
#[derive(Debug, Clone)]
pub struct ConcurrencySlots {
    semaphore: Arc<Semaphore>,
    limit: u32,
}

impl ConcurrencySlots {
    /// Create a pool of `limit` slots. `limit` must be at least 1.
    pub fn new(limit: u32) -> Self {
        let limit = limit.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(limit as usize)),
            limit,
        }
    }

    /// Configured number of slots.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of slots currently free.
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Number of slots currently held.
    pub fn in_use(&self) -> usize {
        self.limit as usize - self.available()
    }

    /// Wait for a free slot. There is no timeout: peers release slots as
    /// their probes finish.
    pub async fn acquire(&self) -> Result<Slot, SlotsClosed> {
        let permit = Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .map_err(|_| SlotsClosed)?;
        trace!(in_use = self.in_use(), "slot acquired");
        Ok(Slot { _permit: permit })
    }

    /// Block until every slot is free again, i.e. every launched probe has
    /// dropped its slot. The slots are returned to the pool afterwards.
    ///
    /// The pool never closes its semaphore, so this cannot fail and a scan
    /// always keeps the results it already produced.
    pub async fn drain(&self) {
        match self.semaphore.acquire_many(self.limit).await {
            Ok(all) => {
                drop(all);
                trace!(limit = self.limit, "slots drained");
            }
            Err(_) => debug!("slot semaphore closed, nothing to drain"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;
    use tokio_test::{assert_pending, assert_ready_ok, task};

    #[tokio::test]
    async fn test_acquire_and_release() {
        let slots = ConcurrencySlots::new(2);
        assert_eq!(slots.available(), 2);

        let a = slots.acquire().await.unwrap();
        let b = slots.acquire().await.unwrap();
        assert_eq!(slots.in_use(), 2);

        // Full pool: the next acquire must wait until a slot is dropped.
        let mut waiting = task::spawn(slots.acquire());
        assert_pending!(waiting.poll());

        drop(a);
        assert!(waiting.is_woken());
        let c = assert_ready_ok!(waiting.poll());
        assert_eq!(slots.in_use(), 2);

        drop(b);
        drop(c);
        assert_eq!(slots.in_use(), 0);
    }

    #[tokio::test]
    async fn test_drain_waits_for_outstanding_slots() {
        let slots = ConcurrencySlots::new(3);
        let held = slots.acquire().await.unwrap();

        let releaser = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            drop(held);
        });

        timeout(Duration::from_secs(2), slots.drain())
            .await
            .unwrap();
        releaser.await.unwrap();
        assert_eq!(slots.in_use(), 0);
        assert_eq!(slots.available(), 3);
    }

    #[tokio::test]
    async fn test_drain_with_no_outstanding_probes() {
        let slots = ConcurrencySlots::new(50);
        slots.drain().await;
        assert_eq!(slots.available(), 50);
    }

    #[tokio::test]
    async fn test_pool_is_reusable_after_drain() {
        let slots = ConcurrencySlots::new(2);
        let held = slots.acquire().await.unwrap();
        drop(held);
        slots.drain().await;

        let a = slots.acquire().await.unwrap();
        let b = slots.acquire().await.unwrap();
        assert_eq!(slots.in_use(), 2);
        drop((a, b));
    }

    #[test]
    fn test_zero_limit_is_clamped() {
        assert_eq!(ConcurrencySlots::new(0).limit(), 1);
    }
}
