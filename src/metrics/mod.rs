//! Iteration results, shared counters, and run aggregation.
mod aggregator;
mod counters;
mod histogram;
mod summary;
mod types;


pub use aggregator::{Tally, spawn_aggregator};
pub use counters::{LiveGuard, RunCounters};
pub use histogram::LatencyHistogram;
pub use summary::{CheckTally, LatencySummary, RunFacts, RunSummary};
pub use types::{IterationResult, Outcome, VuSample};
