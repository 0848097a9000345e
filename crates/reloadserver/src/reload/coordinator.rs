//! Debounced reload scheduling.

use crate::reload::ReloadSignal;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::futures::Notified;
use tokio::task::JoinHandle;
use tracing::{info, trace};

/// The single outstanding debounce timer, if any.
///
/// Every reschedule or forced reload bumps `generation`. A timer task only
/// fires when the generation it was spawned with is still current, so a
/// timer that wakes up after being replaced is a no-op even if `abort` came
/// too late to stop it.
#[derive(Debug, Default)]
struct DebounceTimer {
    generation: u64,
    pending: Option<JoinHandle<()>>,
}

impl DebounceTimer {
    /// Invalidate and cancel whatever timer is pending, returning the new generation.
    fn invalidate(&mut self) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
        self.generation
    }
}

/// Turns bursts of file changes into single reloads.
///
/// `notify_change` is called from the watcher thread and `force_reload`
/// from request handlers; both take the same lock, so rescheduling,
/// cancellation and expiry are totally ordered.
#[derive(Debug)]
pub struct ReloadCoordinator {
    signal: ReloadSignal,
    debounce: Duration,
    timer: Mutex<DebounceTimer>,
    runtime: Handle,
}

impl ReloadCoordinator {
    /// Create a coordinator whose timers run on `runtime`.
    pub fn new(debounce: Duration, runtime: Handle) -> Arc<Self> {
        Arc::new(Self {
            signal: ReloadSignal::new(),
            debounce,
            timer: Mutex::new(DebounceTimer::default()),
            runtime,
        })
    }

    /// Record a qualifying change and (re)start the debounce window.
    pub fn notify_change(self: &Arc<Self>) {
        let mut timer = self.timer.lock();
        let generation = timer.invalidate();

        let coordinator = Arc::clone(self);
        let delay = self.debounce;
        timer.pending = Some(self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            coordinator.expire(generation);
        }));
    }

    /// Reload all clients now, dropping any pending debounce.
    pub fn force_reload(&self) {
        let fires = {
            let mut timer = self.timer.lock();
            timer.invalidate();
            self.signal.fire();
            self.signal.fire_count()
        };
        info!("Reload triggered by request (#{})", fires);
    }

    /// Future resolving on the next reload.
    pub fn wait_for_next(&self) -> Notified<'_> {
        self.signal.wait()
    }

    /// Number of reloads fired so far.
    pub fn reload_count(&self) -> u64 {
        self.signal.fire_count()
    }

    /// Debounce interval this coordinator was built with.
    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    fn expire(&self, generation: u64) {
        let fires = {
            let mut timer = self.timer.lock();
            if timer.generation != generation {
                None
            } else {
                timer.pending = None;
                self.signal.fire();
                Some(self.signal.fire_count())
            }
        };

        match fires {
            Some(fires) => info!("Files changed, reloading clients (#{})", fires),
            None => trace!("Stale debounce timer (generation {}) ignored", generation),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{sleep, timeout};

    fn coordinator(ms: u64) -> Arc<ReloadCoordinator> {
        ReloadCoordinator::new(Duration::from_millis(ms), Handle::current())
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_fires_once_after_quiet_period() {
        let coordinator = coordinator(500);

        for _ in 0..5 {
            coordinator.notify_change();
            sleep(Duration::from_millis(100)).await;
        }
        // Last change at t=400, now t=500
        assert_eq!(coordinator.reload_count(), 0);

        sleep(Duration::from_millis(399)).await;
        assert_eq!(coordinator.reload_count(), 0);

        sleep(Duration::from_millis(2)).await;
        assert_eq!(coordinator.reload_count(), 1);

        sleep(Duration::from_secs(5)).await;
        assert_eq!(coordinator.reload_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_bursts_fire_separately() {
        let coordinator = coordinator(50);

        coordinator.notify_change();
        sleep(Duration::from_millis(100)).await;
        coordinator.notify_change();
        coordinator.notify_change();
        sleep(Duration::from_millis(100)).await;

        assert_eq!(coordinator.reload_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_force_reload_bypasses_and_cancels_debounce() {
        let coordinator = coordinator(500);

        coordinator.notify_change();
        sleep(Duration::from_millis(100)).await;
        coordinator.force_reload();
        assert_eq!(coordinator.reload_count(), 1);

        // The pending timer must not fire a second reload
        sleep(Duration::from_secs(2)).await;
        assert_eq!(coordinator.reload_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_waiters_released_by_debounced_change() {
        let coordinator = coordinator(20);
        let waiter = coordinator.wait_for_next();

        coordinator.notify_change();
        assert!(timeout(Duration::from_secs(1), waiter).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_generation_is_ignored() {
        let coordinator = coordinator(500);
        coordinator.notify_change();
        coordinator.notify_change();

        coordinator.expire(1);
        assert_eq!(coordinator.reload_count(), 0);

        coordinator.expire(2);
        assert_eq!(coordinator.reload_count(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_notify_and_force() {
        let coordinator = coordinator(10);

        let mut handles = Vec::new();
        for i in 0..4 {
            let coordinator = Arc::clone(&coordinator);
            handles.push(std::thread::spawn(move || {
                for _ in 0..200 {
                    if i == 0 {
                        coordinator.force_reload();
                    } else {
                        coordinator.notify_change();
                    }
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        sleep(Duration::from_millis(200)).await;
        let settled = coordinator.reload_count();
        // Every forced reload fires; debounced changes add at most one each
        assert!(settled >= 200, "count = {}", settled);
        assert!(settled <= 800, "count = {}", settled);

        sleep(Duration::from_millis(200)).await;
        assert_eq!(coordinator.reload_count(), settled);
    }
}
