use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::{Serialize, Serializer};

/// Result class of one unit of work.
///
/// `Code` carries a protocol status (HTTP-style); it counts as a success only
/// inside the conventional `200..300` band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Status {
    Success,
    Failure,
    Code(u16),
}

impl Status {
    #[must_use]
    pub const fn from_success(success: bool) -> Self {
        if success {
            Status::Success
        } else {
            Status::Failure
        }
    }

    #[must_use]
    pub const fn is_success(self) -> bool {
        match self {
            Status::Success => true,
            Status::Failure => false,
            Status::Code(code) => code >= 200 && code < 300,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Success => f.write_str("success"),
            Status::Failure => f.write_str("failure"),
            Status::Code(code) => write!(f, "{}", code),
        }
    }
}

impl Serialize for Status {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// One observation of a unit of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub label: String,
    pub latency: Duration,
    pub status: Status,
    pub error: Option<String>,
}

impl Outcome {
    #[must_use]
    pub fn new(label: impl Into<String>, status: Status, latency: Duration) -> Self {
        Self {
            label: label.into(),
            latency,
            status,
            error: None,
        }
    }

    #[must_use]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

/// Finalized latency figures for one label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LatencyStats {
    /// Sum of all latencies.
    #[serde(serialize_with = "as_nanos")]
    pub total: Duration,
    #[serde(serialize_with = "as_nanos")]
    pub mean: Duration,
    #[serde(rename = "50th", serialize_with = "as_nanos")]
    pub p50: Duration,
    #[serde(rename = "90th", serialize_with = "as_nanos")]
    pub p90: Duration,
    #[serde(rename = "95th", serialize_with = "as_nanos")]
    pub p95: Duration,
    #[serde(rename = "99th", serialize_with = "as_nanos")]
    pub p99: Duration,
    #[serde(serialize_with = "as_nanos")]
    pub max: Duration,
    #[serde(serialize_with = "as_nanos")]
    pub min: Duration,
    pub count: u64,
}

/// Finalized, read-only summary of every outcome recorded under one label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    /// Latencies over every outcome.
    pub latencies: LatencyStats,
    /// Latencies over successful outcomes only.
    pub latencies_success: LatencyStats,
    pub requests: u64,
    pub successes: u64,
    /// `successes / requests`, or 0 when nothing was recorded.
    #[serde(rename = "success")]
    pub success_ratio: f64,
    pub status_codes: BTreeMap<Status, u64>,
    /// Distinct error messages in first-seen order.
    pub errors: Vec<String>,
}

impl Metrics {
    #[must_use]
    pub const fn failures(&self) -> u64 {
        self.requests.saturating_sub(self.successes)
    }
}

fn as_nanos<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u64(u64::try_from(value.as_nanos()).unwrap_or(u64::MAX))
}
