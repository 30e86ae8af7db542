//! Outcome aggregation, latency summaries, and the rank estimator behind
//! the reported percentiles.
mod aggregator;
mod estimator;
mod latency;
mod types;


pub use aggregator::MetricsAggregator;
pub use estimator::{DEFAULT_PRECISION, RankEstimator, check_precision};
pub use latency::LatencySummary;
pub use types::{LatencyStats, Metrics, Outcome, Status};
