use std::time::Duration;

use serde::Serialize;

use crate::checks::CheckResult;
use crate::error::NetworkError;

/// What one request produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The target answered with this status.
    Status(u16),
    /// No response: transport failure.
    Failed(NetworkError),
}

impl Outcome {
    #[must_use]
    pub const fn status(self) -> Option<u16> {
        match self {
            Outcome::Status(status) => Some(status),
            Outcome::Failed(_) => None,
        }
    }
}

/// One completed iteration, consumed by the aggregator and then dropped.
#[derive(Debug, Clone)]
pub struct IterationResult {
    pub vu_id: u64,
    pub iteration: u64,
    pub outcome: Outcome,
    pub latency: Duration,
    pub bytes_sent: u64,
    pub bytes_received: u64,
    pub checks: Vec<CheckResult>,
}

/// Concurrency observed at one control-loop tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VuSample {
    pub elapsed_ms: u64,
    pub desired: u64,
    pub live: u64,
}
