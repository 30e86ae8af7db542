use std::time::Duration;

use crate::error::ValidationError;

/// Fixed offered load: `frequency` invocations every `period`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rate {
    pub frequency: usize,
    pub period: Duration,
}

impl Rate {
    #[must_use]
    pub const fn new(frequency: usize, period: Duration) -> Self {
        Self { frequency, period }
    }

    #[must_use]
    pub const fn per_second(frequency: usize) -> Self {
        Self::new(frequency, Duration::from_secs(1))
    }

    /// Checks `frequency >= 1` and `period > 0`.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub const fn validate(&self) -> Result<(), ValidationError> {
        if self.frequency == 0 {
            return Err(ValidationError::RateFrequencyZero);
        }
        if self.period.is_zero() {
            return Err(ValidationError::RatePeriodZero);
        }
        Ok(())
    }

    /// Number of ticks fired over `duration`: `ceil(duration / period)`.
    #[must_use]
    pub fn ticks_for(&self, duration: Duration) -> u64 {
        let period = self.period.as_nanos();
        if period == 0 {
            return 0;
        }
        let ticks = duration
            .as_nanos()
            .saturating_add(period.saturating_sub(1))
            .checked_div(period)
            .unwrap_or(0);
        u64::try_from(ticks).unwrap_or(u64::MAX)
    }

    /// Invocations offered over `duration`.
    #[must_use]
    pub fn invocations_for(&self, duration: Duration) -> u64 {
        let frequency = u64::try_from(self.frequency).unwrap_or(u64::MAX);
        self.ticks_for(duration).saturating_mul(frequency)
    }
}
