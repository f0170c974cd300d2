use std::time::Duration;

use hdrhistogram::Histogram;

/// Latency histogram in microseconds.
#[derive(Debug)]
pub struct LatencyHistogram {
    hist: Histogram<u64>,
    sum_us: u128,
}

impl LatencyHistogram {
    /// Create a new latency histogram.
    ///
    /// # Errors
    ///
    /// Returns an error if the histogram cannot be created.
    pub fn new() -> Result<Self, String> {
        let hist = Histogram::<u64>::new(3)
            .map_err(|err| format!("Failed to create histogram: {}", err))?;
        Ok(Self { hist, sum_us: 0 })
    }

    /// Record one latency sample.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be recorded.
    pub fn record(&mut self, latency: Duration) -> Result<(), String> {
        let micros = u64::try_from(latency.as_micros()).unwrap_or(u64::MAX).max(1);
        self.hist
            .record(micros)
            .map_err(|err| format!("Failed to record latency: {}", err))?;
        self.sum_us = self.sum_us.saturating_add(u128::from(micros));
        Ok(())
    }

    #[must_use]
    pub fn count(&self) -> u64 {
        self.hist.len()
    }

    #[must_use]
    pub fn min_us(&self) -> u64 {
        if self.count() == 0 { 0 } else { self.hist.min() }
    }

    #[must_use]
    pub fn max_us(&self) -> u64 {
        self.hist.max()
    }

    #[must_use]
    pub fn avg_us(&self) -> u64 {
        self.sum_us
            .checked_div(u128::from(self.count()))
            .and_then(|avg| u64::try_from(avg).ok())
            .unwrap_or(0)
    }

    #[must_use]
    pub fn quantile_us(&self, quantile: f64) -> u64 {
        if self.count() == 0 {
            return 0;
        }
        self.hist.value_at_quantile(quantile)
    }
}
