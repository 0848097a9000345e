//! Broadcast primitive released by every reload.

use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::futures::Notified;
use tokio::sync::Notify;

/// A pure event that wakes every task currently waiting on it.
///
/// There is no latch: a fire with nobody waiting is lost, and a waiter
/// registered afterwards blocks until the next fire.
#[derive(Debug, Default)]
pub struct ReloadSignal {
    notify: Notify,
    fires: AtomicU64,
}

impl ReloadSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Future resolving on the next [`fire`](Self::fire).
    ///
    /// The waiter is registered when this is called, not when the future is
    /// first polled, so a fire between the two is still observed.
    pub fn wait(&self) -> Notified<'_> {
        self.notify.notified()
    }

    /// Wake all registered waiters.
    pub fn fire(&self) {
        self.fires.fetch_add(1, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    /// Number of fires since creation.
    pub fn fire_count(&self) -> u64 {
        self.fires.load(Ordering::SeqCst)
    }
}
