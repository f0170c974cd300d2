use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::error::NetworkError;

use super::histogram::LatencyHistogram;
use super::summary::CheckTally;
use super::types::{IterationResult, Outcome};

/// Running totals owned by the aggregator task.
#[derive(Debug)]
pub struct Tally {
    pub iterations_completed: u64,
    pub checks: BTreeMap<String, CheckTally>,
    pub status_codes: BTreeMap<u16, u64>,
    pub network_errors: BTreeMap<NetworkError, u64>,
    pub latency: Option<LatencyHistogram>,
    pub bytes_sent: u64,
    pub bytes_received: u64,
}

impl Tally {
    /// Empty tally with one zeroed entry per known check name.
    #[must_use]
    pub fn new(check_names: &[Arc<str>]) -> Self {
        let checks = check_names
            .iter()
            .map(|name| (name.to_string(), CheckTally::default()))
            .collect();
        let latency = match LatencyHistogram::new() {
            Ok(histogram) => Some(histogram),
            Err(err) => {
                warn!("Latency percentiles disabled: {}", err);
                None
            }
        };
        Self {
            iterations_completed: 0,
            checks,
            status_codes: BTreeMap::new(),
            network_errors: BTreeMap::new(),
            latency,
            bytes_sent: 0,
            bytes_received: 0,
        }
    }

    pub fn consume(&mut self, result: &IterationResult) {
        self.iterations_completed = self.iterations_completed.saturating_add(1);
        match result.outcome {
            Outcome::Status(status) => {
                let count = self.status_codes.entry(status).or_insert(0);
                *count = count.saturating_add(1);
            }
            Outcome::Failed(kind) => {
                let count = self.network_errors.entry(kind).or_insert(0);
                *count = count.saturating_add(1);
            }
        }
        for check in &result.checks {
            if let Some(tally) = self.checks.get_mut(check.name.as_ref()) {
                tally.record(check.passed);
            } else {
                self.checks
                    .entry(check.name.to_string())
                    .or_default()
                    .record(check.passed);
            }
        }
        if let Some(latency) = self.latency.as_mut()
            && let Err(err) = latency.record(result.latency)
        {
            warn!("{}", err);
        }
        self.bytes_sent = self.bytes_sent.saturating_add(result.bytes_sent);
        self.bytes_received = self.bytes_received.saturating_add(result.bytes_received);
    }
}

/// Spawn the single task that owns all per-iteration aggregation.
///
/// The task ends, returning its tally, once every sender has been dropped.
#[must_use]
pub fn spawn_aggregator(
    mut results_rx: mpsc::Receiver<IterationResult>,
    check_names: &[Arc<str>],
) -> JoinHandle<Tally> {
    let mut tally = Tally::new(check_names);
    tokio::spawn(async move {
        while let Some(result) = results_rx.recv().await {
            tally.consume(&result);
        }
        tally
    })
}
