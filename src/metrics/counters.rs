use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters written concurrently by virtual users and the scheduler.
#[derive(Debug, Default)]
pub struct RunCounters {
    iterations_started: AtomicU64,
    live_vus: AtomicU64,
}

impl RunCounters {
    pub fn iteration_started(&self) {
        self.iterations_started.fetch_add(1, Ordering::Relaxed);
    }

    #[must_use]
    pub fn iterations_started(&self) -> u64 {
        self.iterations_started.load(Ordering::Relaxed)
    }

    /// Virtual-user tasks that have been spawned and not yet exited.
    #[must_use]
    pub fn live_vus(&self) -> u64 {
        self.live_vus.load(Ordering::Acquire)
    }
}

/// Counts one live virtual user until dropped.
///
/// Acquired by the scheduler before spawning so the count is visible
/// immediately, then moved into the task so it drops when the task exits.
#[derive(Debug)]
pub struct LiveGuard {
    counters: Arc<RunCounters>,
}

impl LiveGuard {
    #[must_use]
    pub fn acquire(counters: &Arc<RunCounters>) -> Self {
        counters.live_vus.fetch_add(1, Ordering::AcqRel);
        Self {
            counters: Arc::clone(counters),
        }
    }
}

impl Drop for LiveGuard {
    fn drop(&mut self) {
        let live = &self.counters.live_vus;
        loop {
            let current = live.load(Ordering::Acquire);
            let Some(next) = current.checked_sub(1) else {
                break;
            };
            if live
                .compare_exchange(current, next, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                break;
            }
        }
    }
}
