mod controller;
mod export;
pub(crate) mod summary;

#[cfg(test)]
mod tests;

pub use controller::{RunSpec, Workload, run_load, run_with_issuer};
pub(crate) use export::export_summary_json;
pub(crate) use summary::print_summary;
