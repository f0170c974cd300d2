use std::time::Duration;

use serde::Serialize;

use crate::error::ConfigError;

/// One window of the run: concurrency moves from the previous stage's target
/// to `target` over `duration`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stage {
    #[serde(rename = "duration_ms", serialize_with = "serialize_millis")]
    pub duration: Duration,
    pub target: u64,
}

impl Stage {
    #[must_use]
    pub const fn new(duration: Duration, target: u64) -> Self {
        Self { duration, target }
    }
}

/// Validated, ordered stage list.
///
/// Stage windows are additive: stage `n` covers
/// `[sum(d_0..d_n), sum(d_0..d_n) + d_n)` of the run clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagePlan {
    stages: Vec<Stage>,
    total: Duration,
}

impl StagePlan {
    /// Build a plan from an ordered stage list.
    ///
    /// # Errors
    ///
    /// Returns an error when the list is empty or the summed duration
    /// overflows.
    pub fn new(stages: Vec<Stage>) -> Result<Self, ConfigError> {
        if stages.is_empty() {
            return Err(ConfigError::StagesEmpty);
        }
        let mut total = Duration::ZERO;
        for stage in &stages {
            total = total
                .checked_add(stage.duration)
                .ok_or(ConfigError::StagesTooLong)?;
        }
        Ok(Self { stages, total })
    }

    #[must_use]
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    #[must_use]
    pub const fn total_duration(&self) -> Duration {
        self.total
    }

    /// Target virtual-user count at `elapsed` into the run.
    ///
    /// Within a stage the count is interpolated linearly from the previous
    /// stage's target (0 before the first stage) and truncated toward that
    /// previous target. A zero-length stage is an instant jump. At or past
    /// the end of the last stage the result is 0.
    #[must_use]
    pub fn desired_concurrency(&self, elapsed: Duration) -> u64 {
        let mut stage_start = Duration::ZERO;
        let mut previous_target = 0u64;
        for stage in &self.stages {
            let stage_end = stage_start.saturating_add(stage.duration);
            if elapsed < stage_end {
                let into_stage = elapsed.saturating_sub(stage_start);
                return interpolate(previous_target, stage.target, into_stage, stage.duration);
            }
            stage_start = stage_end;
            previous_target = stage.target;
        }
        0
    }

    /// Index of the stage whose window contains `elapsed`.
    #[must_use]
    pub fn stage_index_at(&self, elapsed: Duration) -> Option<usize> {
        let mut stage_end = Duration::ZERO;
        for (index, stage) in self.stages.iter().enumerate() {
            stage_end = stage_end.saturating_add(stage.duration);
            if elapsed < stage_end {
                return Some(index);
            }
        }
        None
    }

    /// Largest target any stage asks for.
    #[must_use]
    pub fn peak_target(&self) -> u64 {
        self.stages
            .iter()
            .map(|stage| stage.target)
            .max()
            .unwrap_or(0)
    }
}

fn interpolate(start: u64, target: u64, elapsed: Duration, duration: Duration) -> u64 {
    let total_ms = duration.as_millis().max(1);
    let elapsed_ms = elapsed.as_millis().min(total_ms);

    let start_i128 = i128::from(start);
    let delta = i128::from(target).saturating_sub(start_i128);
    let elapsed_i128 = i128::try_from(elapsed_ms).unwrap_or(i128::MAX);
    let total_i128 = i128::try_from(total_ms).unwrap_or(i128::MAX);

    let step = delta
        .saturating_mul(elapsed_i128)
        .checked_div(total_i128)
        .unwrap_or(0);
    let value = start_i128.saturating_add(step);
    if value < 0 {
        0
    } else {
        u64::try_from(value).unwrap_or(u64::MAX)
    }
}

fn serialize_millis<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
}
