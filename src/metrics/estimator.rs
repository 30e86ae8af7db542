use hdrhistogram::Histogram;

use crate::error::ValidationError;

/// Significant decimal digits kept by default.
pub const DEFAULT_PRECISION: u8 = 3;
/// Highest precision the histogram backend supports.
const MAX_PRECISION: u8 = 5;

/// Accept `precision` when the histogram backend supports it.
///
/// # Errors
///
/// Returns an error when `precision` is outside `1..=5`.
pub const fn check_precision(precision: u8) -> Result<u8, ValidationError> {
    if precision == 0 || precision > MAX_PRECISION {
        return Err(ValidationError::InvalidPrecision { value: precision });
    }
    Ok(precision)
}

/// Streaming rank estimator over non-negative integer samples.
///
/// Backed by an auto-resizing HDR histogram. Memory grows with the logarithm
/// of the largest sample seen, never with the number of samples, so skewed or
/// heavy-tailed streams stay bounded.
///
/// Accuracy: for a precision of `d` digits, `query(q)` returns a value within
/// a relative error of `10^-d` of the sample whose rank is `ceil(q * count)`.
/// The default of 3 digits keeps the error under 0.1%.
#[derive(Debug, Clone)]
pub struct RankEstimator {
    hist: Histogram<u64>,
}

impl RankEstimator {
    /// Create an empty estimator keeping `precision` significant digits.
    ///
    /// # Errors
    ///
    /// Returns an error when `precision` is outside `1..=5` or the histogram
    /// cannot be allocated.
    pub fn new(precision: u8) -> Result<Self, ValidationError> {
        check_precision(precision)?;
        let hist =
            Histogram::<u64>::new(precision).map_err(|err| ValidationError::EstimatorCreation {
                message: err.to_string(),
            })?;
        Ok(Self { hist })
    }

    /// Ingest one sample.
    ///
    /// The histogram grows to cover `sample`; only a value it cannot grow to
    /// is clamped to the current top bucket.
    pub fn add(&mut self, sample: u64) {
        if self.hist.record(sample).is_err() {
            self.hist.saturating_record(sample);
        }
    }

    /// Approximate value at `quantile` (clamped to `[0, 1]`).
    ///
    /// Returns `0` when no sample has been added yet.
    #[must_use]
    pub fn query(&self, quantile: f64) -> u64 {
        if self.hist.is_empty() {
            return 0;
        }
        let quantile = if quantile.is_nan() {
            0.0
        } else {
            quantile.clamp(0.0, 1.0)
        };
        let value = self.hist.value_at_quantile(quantile);
        self.hist.median_equivalent(value)
    }

    #[must_use]
    pub fn count(&self) -> u64 {
        self.hist.len()
    }

    #[must_use]
    pub fn precision(&self) -> u8 {
        self.hist.sigfig()
    }
}
