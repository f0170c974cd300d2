//! Converges the live virtual-user population to the staged target.
//!
//! A single control task samples `StagePlan::desired_concurrency` once per
//! tick and spawns or retires users to match. Stage changes follow the run
//! clock only, never iteration counts.
mod pool;


use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast::error::RecvError;
use tokio::time::{MissedTickBehavior, interval_at, sleep_until};
use tracing::{debug, info};

use crate::domain::{RunClock, StagePlan};
use crate::metrics::VuSample;
use crate::shutdown::ShutdownReceiver;
use crate::vu::VuContext;

pub use pool::{VuHandle, VuPool};

/// What the control loop observed over one run.
#[derive(Debug, Clone, Default)]
pub struct ScheduleReport {
    pub timeline: Vec<VuSample>,
    pub peak_vus: u64,
    pub interrupted: bool,
    pub elapsed: Duration,
    /// Iterations completed by users joined by the scheduler.
    pub iterations_joined: u64,
}

pub struct StageScheduler {
    plan: StagePlan,
    tick: Duration,
}

impl StageScheduler {
    #[must_use]
    pub const fn new(plan: StagePlan, tick: Duration) -> Self {
        Self { plan, tick }
    }

    /// Drive the stages to completion, or until a shutdown message arrives,
    /// then stop every user and wait for all of them to exit.
    pub async fn run(
        &self,
        context: Arc<VuContext>,
        clock: RunClock,
        shutdown: &mut ShutdownReceiver,
    ) -> ScheduleReport {
        let counters = Arc::clone(&context.counters);
        let mut pool = VuPool::new(context);
        let mut report = ScheduleReport::default();
        let total = self.plan.total_duration();
        let end = clock.at(total);

        let mut ticker = interval_at(clock.started_at(), self.tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut shutdown_open = true;
        let mut current_stage = None;

        info!(
            stages = self.plan.stages().len(),
            peak_vus = self.plan.peak_target(),
            duration_ms = total.as_millis(),
            "Starting stages."
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                () = sleep_until(end) => break,
                received = shutdown.recv(), if shutdown_open => match received {
                    Ok(()) | Err(RecvError::Lagged(_)) => {
                        info!("Shutdown requested; stopping virtual users.");
                        report.interrupted = true;
                        break;
                    }
                    Err(RecvError::Closed) => {
                        shutdown_open = false;
                        continue;
                    }
                },
            }

            let elapsed = clock.elapsed();
            if elapsed >= total {
                break;
            }

            let stage = self.plan.stage_index_at(elapsed);
            if stage != current_stage {
                if let Some(index) = stage {
                    debug!(stage = index, "Entering stage.");
                }
                current_stage = stage;
            }

            let desired = self.plan.desired_concurrency(elapsed);
            pool.scale_to(desired);
            report.iterations_joined = report
                .iterations_joined
                .saturating_add(pool.reap().await);
            report.timeline.push(VuSample {
                elapsed_ms: millis(elapsed),
                desired,
                live: counters.live_vus(),
            });
        }

        report.iterations_joined = report.iterations_joined.saturating_add(pool.drain().await);
        report.elapsed = clock.elapsed();
        report.peak_vus = pool.peak();
        report.timeline.push(VuSample {
            elapsed_ms: millis(report.elapsed),
            desired: 0,
            live: counters.live_vus(),
        });
        info!(
            elapsed_ms = report.elapsed.as_millis(),
            interrupted = report.interrupted,
            "All virtual users stopped."
        );
        report
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
