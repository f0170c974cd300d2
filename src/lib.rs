//! Staged virtual-user load generator.
//!
//! A scheduler ramps a population of virtual users through timed stages.
//! Each user repeatedly POSTs one payload to the target, checks the
//! response status, and paces itself. Results are aggregated into a single
//! run summary. The `loadstage` binary is the primary interface; library
//! APIs may evolve with it.
pub mod app;
pub mod args;
pub mod checks;
pub mod config;
pub mod domain;
pub mod entry;
pub mod error;
pub mod http;
mod logger;
pub mod metrics;
pub mod scheduler;
pub mod shutdown;
pub mod vu;

#[cfg(test)]
mod test_support;
