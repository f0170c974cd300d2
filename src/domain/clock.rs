use std::time::Duration;

use tokio::time::Instant;

/// Monotonic elapsed time since the run started.
///
/// Backed by `tokio::time::Instant` so a paused test runtime drives it.
#[derive(Debug, Clone, Copy)]
pub struct RunClock {
    started: Instant,
}

impl RunClock {
    #[must_use]
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    #[must_use]
    pub const fn started_at(&self) -> Instant {
        self.started
    }

    /// Instant at which `offset` has elapsed, saturating far in the future.
    #[must_use]
    pub fn at(&self, offset: Duration) -> Instant {
        self.started
            .checked_add(offset)
            .unwrap_or_else(|| far_future(self.started))
    }
}

/// Roughly 30 years.
const FAR_FUTURE: Duration = Duration::from_secs(946_080_000);

fn far_future(from: Instant) -> Instant {
    from.checked_add(FAR_FUTURE).unwrap_or(from)
}
