//! Rate-controlled execution of user work.
//!
//! [`Runner`] pairs a single-use scheduler with the aggregator that work
//! invocations report into. Start it once, then read [`Runner::summaries`] as
//! many times as needed.
mod rate;
mod scheduler;
mod work;


use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::error::ValidationError;
use crate::metrics::{DEFAULT_PRECISION, Metrics, MetricsAggregator};
use crate::shutdown::CancelToken;

pub use rate::Rate;
pub use scheduler::{RunStats, SchedulerState};
pub use work::{Recorder, Work, WorkContext};

use scheduler::Scheduler;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunnerOptions {
    /// Significant digits kept by the latency estimators.
    pub precision: u8,
    /// Cap on concurrently running invocations. `None` keeps generation
    /// fully open-loop.
    pub max_in_flight: Option<NonZeroUsize>,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            max_in_flight: None,
        }
    }
}

#[derive(Debug)]
pub struct Runner {
    aggregator: Arc<MetricsAggregator>,
    scheduler: Scheduler,
}

impl Runner {
    /// Runner with default options.
    ///
    /// # Errors
    ///
    /// Never fails with the default precision; the signature matches
    /// [`Runner::with_options`].
    pub fn new() -> Result<Self, ValidationError> {
        Self::with_options(RunnerOptions::default())
    }

    /// # Errors
    ///
    /// Returns an error when `options.precision` is out of range.
    pub fn with_options(options: RunnerOptions) -> Result<Self, ValidationError> {
        Ok(Self {
            aggregator: Arc::new(MetricsAggregator::new(options.precision)?),
            scheduler: Scheduler::new(options.max_in_flight),
        })
    }

    /// Run `work` at `rate` for `duration`, returning once every launched
    /// invocation has finished.
    ///
    /// Cancelling `cancel` stops new ticks immediately; running invocations
    /// see the same token and are still awaited.
    ///
    /// # Errors
    ///
    /// Returns a validation error without launching anything when `rate` or
    /// `duration` is invalid, or when this runner has already been started.
    pub async fn start<TWork>(
        &self,
        rate: Rate,
        duration: Duration,
        cancel: &CancelToken,
        work: TWork,
    ) -> Result<RunStats, ValidationError>
    where
        TWork: Work,
    {
        let recorder = self.recorder();
        self.scheduler
            .run(rate, duration, cancel, &recorder, work)
            .await
    }

    /// Per-label metrics recorded so far. Callable during and after a run.
    #[must_use]
    pub fn summaries(&self) -> BTreeMap<String, Metrics> {
        self.aggregator.finalize()
    }

    /// Recorder feeding this runner's aggregator, for outcomes produced
    /// outside scheduled work.
    #[must_use]
    pub fn recorder(&self) -> Recorder {
        Recorder::new(Arc::clone(&self.aggregator))
    }

    #[must_use]
    pub fn state(&self) -> SchedulerState {
        self.scheduler.state()
    }

    #[must_use]
    pub fn subscribe_state(&self) -> watch::Receiver<SchedulerState> {
        self.scheduler.subscribe()
    }
}
