use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;

use super::aggregator::Tally;
use super::types::VuSample;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CheckTally {
    pub passed: u64,
    pub failed: u64,
}

impl CheckTally {
    pub fn record(&mut self, passed: bool) {
        if passed {
            self.passed = self.passed.saturating_add(1);
        } else {
            self.failed = self.failed.saturating_add(1);
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LatencySummary {
    pub min_us: u64,
    pub avg_us: u64,
    pub p50_us: u64,
    pub p90_us: u64,
    pub p95_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}

/// Aggregate view of a finished run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub elapsed_ms: u64,
    pub interrupted: bool,
    pub stages: usize,
    pub iterations_started: u64,
    pub iterations_completed: u64,
    /// Iterations reported by virtual-user tasks as they were joined.
    pub iterations_joined: u64,
    pub peak_vus: u64,
    pub live_vus_at_exit: u64,
    pub checks: BTreeMap<String, CheckTally>,
    pub status_codes: BTreeMap<u16, u64>,
    pub network_errors: BTreeMap<String, u64>,
    pub latency: LatencySummary,
    pub bytes_sent: u64,
    pub bytes_received: u64,
    pub timeline: Vec<VuSample>,
}

/// Scheduler-side facts merged into the summary.
#[derive(Debug, Clone, Default)]
pub struct RunFacts {
    pub elapsed: Duration,
    pub interrupted: bool,
    pub stages: usize,
    pub iterations_started: u64,
    pub iterations_joined: u64,
    pub peak_vus: u64,
    pub live_vus_at_exit: u64,
    pub timeline: Vec<VuSample>,
}

impl RunSummary {
    #[must_use]
    pub fn from_parts(tally: Tally, facts: RunFacts) -> Self {
        let latency = tally
            .latency
            .as_ref()
            .map(|hist| LatencySummary {
                min_us: hist.min_us(),
                avg_us: hist.avg_us(),
                p50_us: hist.quantile_us(0.5),
                p90_us: hist.quantile_us(0.9),
                p95_us: hist.quantile_us(0.95),
                p99_us: hist.quantile_us(0.99),
                max_us: hist.max_us(),
            })
            .unwrap_or_default();
        let network_errors = tally
            .network_errors
            .iter()
            .map(|(kind, count)| (kind.as_str().to_owned(), *count))
            .collect();
        Self {
            elapsed_ms: u64::try_from(facts.elapsed.as_millis()).unwrap_or(u64::MAX),
            interrupted: facts.interrupted,
            stages: facts.stages,
            iterations_started: facts.iterations_started,
            iterations_completed: tally.iterations_completed,
            iterations_joined: facts.iterations_joined,
            peak_vus: facts.peak_vus,
            live_vus_at_exit: facts.live_vus_at_exit,
            checks: tally.checks,
            status_codes: tally.status_codes,
            network_errors,
            latency,
            bytes_sent: tally.bytes_sent,
            bytes_received: tally.bytes_received,
            timeline: facts.timeline,
        }
    }

    #[must_use]
    pub fn checks_passed(&self, name: &str) -> u64 {
        self.checks.get(name).map_or(0, |tally| tally.passed)
    }

    #[must_use]
    pub fn checks_failed(&self, name: &str) -> u64 {
        self.checks.get(name).map_or(0, |tally| tally.failed)
    }

    #[must_use]
    pub fn network_error_total(&self) -> u64 {
        self.network_errors
            .values()
            .fold(0u64, |acc, count| acc.saturating_add(*count))
    }

    /// Completed iterations that got a 2xx response, in hundredths of a percent.
    #[must_use]
    pub fn success_rate_x100(&self) -> u64 {
        let ok = self
            .status_codes
            .iter()
            .filter(|(status, _)| (200..300).contains(*status))
            .fold(0u64, |acc, (_, count)| acc.saturating_add(*count));
        ok.saturating_mul(10_000)
            .checked_div(self.iterations_completed)
            .unwrap_or(0)
    }
}
