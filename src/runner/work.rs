use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::metrics::{MetricsAggregator, Outcome, Status};
use crate::shutdown::CancelToken;

/// Handle a work invocation uses to report outcomes.
#[derive(Debug, Clone)]
pub struct Recorder {
    aggregator: Arc<MetricsAggregator>,
}

impl Recorder {
    pub(crate) const fn new(aggregator: Arc<MetricsAggregator>) -> Self {
        Self { aggregator }
    }

    pub fn record(
        &self,
        label: impl Into<String>,
        status: Status,
        latency: Duration,
        error: Option<String>,
    ) {
        self.aggregator.record_outcome(Outcome {
            label: label.into(),
            latency,
            status,
            error,
        });
    }

    pub fn record_outcome(&self, outcome: Outcome) {
        self.aggregator.record_outcome(outcome);
    }
}

/// Everything one fired slot receives.
#[derive(Debug, Clone)]
pub struct WorkContext {
    /// Fires when the caller cancels the run.
    pub cancel: CancelToken,
    pub recorder: Recorder,
    /// Zero-based index of the slot across the whole run.
    pub slot: u64,
}

/// A unit of work fired once per scheduled slot.
///
/// Implementations perform zero or more operations and report each one
/// through `ctx.recorder`. Errors belong in the recorded outcomes; the
/// scheduler never inspects them.
#[async_trait]
pub trait Work: Send + Sync + 'static {
    async fn execute(&self, ctx: WorkContext);
}

#[async_trait]
impl<TFn, TFut> Work for TFn
where
    TFn: Fn(WorkContext) -> TFut + Send + Sync + 'static,
    TFut: Future<Output = ()> + Send + 'static,
{
    async fn execute(&self, ctx: WorkContext) {
        (self)(ctx).await;
    }
}
