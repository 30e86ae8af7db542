use std::time::Duration;

use crate::error::ValidationError;

use super::estimator::RankEstimator;
use super::types::LatencyStats;

const P50: f64 = 0.50;
const P90: f64 = 0.90;
const P95: f64 = 0.95;
const P99: f64 = 0.99;

/// Running latency totals plus a rank estimator for percentiles.
///
/// `min`, `max`, `total` and `count` are exact. Mean and percentiles are
/// derived on [`LatencySummary::finalize`].
#[derive(Debug, Clone)]
pub struct LatencySummary {
    total: Duration,
    min: Duration,
    max: Duration,
    count: u64,
    has_sample: bool,
    estimator: RankEstimator,
}

impl LatencySummary {
    /// Create an empty summary with an estimator of the given precision.
    ///
    /// # Errors
    ///
    /// Returns an error when the estimator cannot be created.
    pub fn new(precision: u8) -> Result<Self, ValidationError> {
        Ok(Self::with_estimator(RankEstimator::new(precision)?))
    }

    #[must_use]
    pub const fn with_estimator(estimator: RankEstimator) -> Self {
        Self {
            total: Duration::ZERO,
            min: Duration::ZERO,
            max: Duration::ZERO,
            count: 0,
            has_sample: false,
            estimator,
        }
    }

    pub fn add(&mut self, latency: Duration) {
        self.total = self.total.saturating_add(latency);
        if latency > self.max {
            self.max = latency;
        }
        // A zero latency is a real observation, so "unset" is tracked separately.
        if !self.has_sample || latency < self.min {
            self.min = latency;
        }
        self.has_sample = true;
        self.count = self.count.saturating_add(1);
        self.estimator.add(duration_nanos(latency));
    }

    #[must_use]
    pub const fn count(&self) -> u64 {
        self.count
    }

    /// Derive mean and percentiles from the samples seen so far.
    ///
    /// Percentiles are clamped to the exact `[min, max]` range so bucket
    /// rounding never reports a p99 above the observed maximum.
    #[must_use]
    pub fn finalize(&self) -> LatencyStats {
        let mean = if self.count == 0 {
            Duration::ZERO
        } else {
            let nanos = self
                .total
                .as_nanos()
                .checked_div(u128::from(self.count))
                .unwrap_or(0);
            Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
        };

        LatencyStats {
            total: self.total,
            mean,
            p50: self.quantile(P50),
            p90: self.quantile(P90),
            p95: self.quantile(P95),
            p99: self.quantile(P99),
            max: self.max,
            min: self.min,
            count: self.count,
        }
    }

    fn quantile(&self, quantile: f64) -> Duration {
        Duration::from_nanos(self.estimator.query(quantile)).clamp(self.min, self.max)
    }
}

fn duration_nanos(value: Duration) -> u64 {
    u64::try_from(value.as_nanos()).unwrap_or(u64::MAX)
}
