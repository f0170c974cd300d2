//! The virtual user: one sequential loop of request, check, record, pace.
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, sleep};
use tracing::{debug, info};

use crate::args::PayloadKind;
use crate::checks::CheckEvaluator;
use crate::http::{Payload, RequestIssuer};
use crate::metrics::{IterationResult, Outcome, RunCounters};


/// Id of the first virtual user spawned in a run.
pub const FIRST_VU_ID: u64 = 1;

/// What the first-iteration diagnostic line reports.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub port: String,
    pub kind: PayloadKind,
}

/// Immutable context every virtual user is spawned with.
pub struct VuContext {
    pub issuer: Arc<dyn RequestIssuer>,
    pub payload: Payload,
    pub checks: CheckEvaluator,
    pub pace: Duration,
    pub results: mpsc::Sender<IterationResult>,
    pub counters: Arc<RunCounters>,
    pub diagnostic: Diagnostic,
}

/// The diagnostic line for `(vu_id, iteration)`, if this is the very first
/// iteration of the first virtual user.
#[must_use]
pub fn diagnostic_line(vu_id: u64, iteration: u64, diagnostic: &Diagnostic) -> Option<String> {
    (vu_id == FIRST_VU_ID && iteration == 0).then(|| {
        format!(
            "Testing Port {} using {} payload",
            diagnostic.port,
            diagnostic.kind.label()
        )
    })
}

pub struct VirtualUser {
    id: u64,
    context: Arc<VuContext>,
}

impl VirtualUser {
    #[must_use]
    pub const fn new(id: u64, context: Arc<VuContext>) -> Self {
        Self { id, context }
    }

    /// Iterate until `stop` is set (or its sender is dropped).
    ///
    /// `stop` is only honored between iterations: an in-flight request always
    /// completes and is recorded. The pacing sleep ends early on stop.
    /// Returns the number of completed iterations.
    pub async fn run(self, mut stop: watch::Receiver<bool>) -> u64 {
        let mut iteration: u64 = 0;
        loop {
            if *stop.borrow() {
                break;
            }

            self.context.counters.iteration_started();
            let result = self.iterate(iteration).await;
            if self.context.results.send(result).await.is_err() {
                debug!(vu = self.id, "Result channel closed; stopping.");
                break;
            }

            if let Some(line) = diagnostic_line(self.id, iteration, &self.context.diagnostic) {
                info!("{}", line);
            }
            iteration = iteration.saturating_add(1);

            tokio::select! {
                () = sleep(self.context.pace) => {}
                _ = stop.wait_for(|stopped| *stopped) => break,
            }
        }
        debug!(vu = self.id, iterations = iteration, "Virtual user stopped.");
        iteration
    }

    async fn iterate(&self, iteration: u64) -> IterationResult {
        let start = Instant::now();
        let (outcome, latency, bytes_sent, bytes_received) =
            match self.context.issuer.send(&self.context.payload).await {
                Ok(response) => (
                    Outcome::Status(response.status),
                    response.latency,
                    response.bytes_sent,
                    response.bytes_received,
                ),
                Err(err) => {
                    debug!(vu = self.id, iteration, "Request failed: {}", err);
                    (Outcome::Failed(err), start.elapsed(), 0, 0)
                }
            };
        let checks = self.context.checks.evaluate(&outcome);
        IterationResult {
            vu_id: self.id,
            iteration,
            outcome,
            latency,
            bytes_sent,
            bytes_received,
            checks,
        }
    }
}
