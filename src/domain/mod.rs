//! Run-time domain model: stages, stage plans, and the run clock.
mod clock;
mod stage;


pub use clock::RunClock;
pub use stage::{Stage, StagePlan};
