use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::metrics::LiveGuard;
use crate::vu::{FIRST_VU_ID, VirtualUser, VuContext};

/// A spawned virtual user: its id, its stop signal and its task.
#[derive(Debug)]
pub struct VuHandle {
    id: u64,
    stop: watch::Sender<bool>,
    task: JoinHandle<u64>,
}

impl VuHandle {
    #[cfg(test)]
    pub(crate) const fn id(&self) -> u64 {
        self.id
    }

    fn signal_stop(&self) {
        self.stop.send_replace(true);
    }

    async fn join(self) -> u64 {
        match self.task.await {
            Ok(iterations) => iterations,
            Err(err) => {
                warn!(vu = self.id, "Virtual user task failed: {}", err);
                0
            }
        }
    }
}

/// Live virtual users, plus the ones told to stop that have not exited yet.
///
/// Ids start at 1 and are never reused. Retirement takes the most recently
/// spawned user first.
pub struct VuPool {
    active: Vec<VuHandle>,
    retiring: Vec<VuHandle>,
    next_id: u64,
    peak: u64,
    context: Arc<VuContext>,
}

impl VuPool {
    #[must_use]
    pub const fn new(context: Arc<VuContext>) -> Self {
        Self {
            active: Vec::new(),
            retiring: Vec::new(),
            next_id: FIRST_VU_ID,
            peak: 0,
            context,
        }
    }

    /// Handles that have not been told to stop.
    #[must_use]
    pub fn active(&self) -> u64 {
        u64::try_from(self.active.len()).unwrap_or(u64::MAX)
    }

    #[cfg(test)]
    pub(crate) fn retiring(&self) -> u64 {
        u64::try_from(self.retiring.len()).unwrap_or(u64::MAX)
    }

    /// Highest number of active handles seen so far.
    #[must_use]
    pub const fn peak(&self) -> u64 {
        self.peak
    }

    #[cfg(test)]
    pub(crate) fn active_ids(&self) -> Vec<u64> {
        self.active.iter().map(VuHandle::id).collect()
    }

    /// Spawn or retire users until exactly `desired` are active.
    pub fn scale_to(&mut self, desired: u64) {
        let active = self.active();
        if desired > active {
            for _ in 0..desired.saturating_sub(active) {
                self.spawn_one();
            }
            debug!(from = active, to = desired, "Scaled up virtual users.");
        } else if desired < active {
            for _ in 0..active.saturating_sub(desired) {
                self.retire_one();
            }
            debug!(from = active, to = desired, "Scaled down virtual users.");
        }
        self.peak = self.peak.max(self.active());
    }

    fn spawn_one(&mut self) {
        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);

        let (stop, stop_rx) = watch::channel(false);
        let live = LiveGuard::acquire(&self.context.counters);
        let user = VirtualUser::new(id, Arc::clone(&self.context));
        let task = tokio::spawn(async move {
            let iterations = user.run(stop_rx).await;
            drop(live);
            iterations
        });
        self.active.push(VuHandle { id, stop, task });
    }

    fn retire_one(&mut self) {
        if let Some(handle) = self.active.pop() {
            handle.signal_stop();
            self.retiring.push(handle);
        }
    }

    /// Join retired users whose task already exited.
    pub async fn reap(&mut self) -> u64 {
        let (finished, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.retiring)
            .into_iter()
            .partition(|handle| handle.task.is_finished());
        self.retiring = pending;
        let mut iterations: u64 = 0;
        for handle in finished {
            iterations = iterations.saturating_add(handle.join().await);
        }
        iterations
    }

    /// Stop every user and wait for all of them to exit.
    pub async fn drain(&mut self) -> u64 {
        self.scale_to(0);
        let mut iterations: u64 = 0;
        for handle in std::mem::take(&mut self.retiring) {
            iterations = iterations.saturating_add(handle.join().await);
        }
        iterations
    }
}
