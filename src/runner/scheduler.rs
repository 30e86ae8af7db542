use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, watch};
use tokio::task::{JoinError, JoinSet};
use tokio::time::{Instant, MissedTickBehavior, interval, sleep};
use tracing::{debug, info, warn};

use crate::error::ValidationError;
use crate::shutdown::CancelToken;

use super::rate::Rate;
use super::work::{Recorder, Work, WorkContext};

/// Lifecycle of a scheduler. `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
    Draining,
    Stopped,
}

/// Dispatch counters for one finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub ticks: u64,
    /// Invocations spawned.
    pub launched: u64,
    /// Slots dropped because the in-flight cap was reached.
    pub skipped: u64,
    /// Invocations that panicked instead of returning.
    pub panicked: u64,
    /// Wall-clock time from start until the last invocation returned.
    pub elapsed: Duration,
    /// Whether the run drained because the caller cancelled.
    pub cancelled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DrainReason {
    DurationElapsed,
    Cancelled,
}

impl fmt::Display for DrainReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrainReason::DurationElapsed => f.write_str("duration elapsed"),
            DrainReason::Cancelled => f.write_str("cancelled"),
        }
    }
}

/// Open-loop dispatcher.
///
/// Every tick launches `rate.frequency` invocations without waiting for
/// earlier ones, so offered load stays at `frequency / period` no matter how
/// slow the target is. In-flight work therefore grows without bound against
/// a degraded target unless `max_in_flight` is set, in which case slots over
/// the cap are skipped (and counted) rather than delayed.
#[derive(Debug)]
pub(crate) struct Scheduler {
    state: watch::Sender<SchedulerState>,
    max_in_flight: Option<NonZeroUsize>,
}

impl Scheduler {
    pub(crate) fn new(max_in_flight: Option<NonZeroUsize>) -> Self {
        let (state, _rx) = watch::channel(SchedulerState::Idle);
        Self {
            state,
            max_in_flight,
        }
    }

    pub(crate) fn state(&self) -> SchedulerState {
        *self.state.borrow()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<SchedulerState> {
        self.state.subscribe()
    }

    /// Drive `work` at `rate` until `duration` elapses or `cancel` fires, then
    /// wait for every launched invocation.
    ///
    /// # Errors
    ///
    /// Returns a validation error, before launching anything, when the rate or
    /// duration is invalid or the scheduler already ran.
    pub(crate) async fn run<TWork>(
        &self,
        rate: Rate,
        duration: Duration,
        cancel: &CancelToken,
        recorder: &Recorder,
        work: TWork,
    ) -> Result<RunStats, ValidationError>
    where
        TWork: Work,
    {
        rate.validate()?;
        if duration.is_zero() {
            return Err(ValidationError::RunDurationZero);
        }
        let started = self.state.send_if_modified(|state| {
            if *state == SchedulerState::Idle {
                *state = SchedulerState::Running;
                true
            } else {
                false
            }
        });
        if !started {
            return Err(ValidationError::AlreadyStarted);
        }

        info!(
            "Starting load test with {} requests per {:?} for {:?} (~{} invocations)",
            rate.frequency,
            rate.period,
            duration,
            rate.invocations_for(duration)
        );

        let work = Arc::new(work);
        let limiter = self
            .max_in_flight
            .map(|limit| Arc::new(Semaphore::new(limit.get())));
        let started_at = Instant::now();
        let mut stats = RunStats::default();
        let mut guard = DispatchGuard {
            state: &self.state,
            tasks: JoinSet::new(),
        };
        let tasks = &mut guard.tasks;
        let mut next_slot: u64 = 0;

        let deadline = sleep(duration);
        tokio::pin!(deadline);
        let cancelled = cancel.cancelled();
        tokio::pin!(cancelled);
        let mut ticker = interval(rate.period);
        // Missed ticks fire back to back so the offered total stays exact.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);

        let reason = loop {
            tokio::select! {
                biased;
                () = &mut cancelled => break DrainReason::Cancelled,
                () = &mut deadline => break DrainReason::DurationElapsed,
                _ = ticker.tick() => {
                    stats.ticks = stats.ticks.saturating_add(1);
                    for _ in 0..rate.frequency {
                        let permit = match limiter.as_ref() {
                            Some(limiter) => match Arc::clone(limiter).try_acquire_owned() {
                                Ok(permit) => Some(permit),
                                Err(_) => {
                                    stats.skipped = stats.skipped.saturating_add(1);
                                    if stats.skipped == 1 {
                                        warn!("In-flight cap reached; skipping slots until invocations finish.");
                                    }
                                    continue;
                                }
                            },
                            None => None,
                        };
                        let ctx = WorkContext {
                            cancel: cancel.clone(),
                            recorder: recorder.clone(),
                            slot: next_slot,
                        };
                        next_slot = next_slot.saturating_add(1);
                        let work = Arc::clone(&work);
                        tasks.spawn(async move {
                            let _permit = permit;
                            work.execute(ctx).await;
                        });
                        stats.launched = stats.launched.saturating_add(1);
                    }
                },
                Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                    reap(joined, &mut stats);
                },
            }
        };

        self.state.send_replace(SchedulerState::Draining);
        info!(
            "Stopping load test ({}), waiting for {} in-flight invocations to finish...",
            reason,
            tasks.len()
        );
        while let Some(joined) = tasks.join_next().await {
            reap(joined, &mut stats);
        }

        stats.elapsed = started_at.elapsed();
        stats.cancelled = reason == DrainReason::Cancelled;
        drop(guard);
        info!(
            "Load test finished: {} invocations over {} ticks in {:?}",
            stats.launched, stats.ticks, stats.elapsed
        );
        if stats.skipped > 0 {
            warn!("{} slots were skipped by the in-flight cap.", stats.skipped);
        }
        Ok(stats)
    }
}

/// Owns the launched invocations for the duration of a run.
///
/// Dropping it marks the scheduler `Stopped`. When the caller drops the run
/// future before the drain finished, remaining invocations are detached so
/// they still complete and record.
struct DispatchGuard<'state> {
    state: &'state watch::Sender<SchedulerState>,
    tasks: JoinSet<()>,
}

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        if !self.tasks.is_empty() {
            warn!(
                "Run abandoned before draining; detaching {} in-flight invocations.",
                self.tasks.len()
            );
            self.tasks.detach_all();
        }
        self.state.send_if_modified(|state| {
            if *state == SchedulerState::Stopped {
                false
            } else {
                *state = SchedulerState::Stopped;
                true
            }
        });
    }
}

fn reap(joined: Result<(), JoinError>, stats: &mut RunStats) {
    if let Err(err) = joined {
        if err.is_panic() {
            stats.panicked = stats.panicked.saturating_add(1);
            warn!("Work invocation panicked: {}", err);
        } else {
            debug!("Work invocation did not complete: {}", err);
        }
    }
}
