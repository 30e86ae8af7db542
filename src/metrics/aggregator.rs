use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::Duration;

use crate::error::ValidationError;

use super::latency::LatencySummary;
use super::types::{Metrics, Outcome, Status};

type LabelSlot = Arc<Mutex<LabelAccumulator>>;

/// Per-label outcome aggregation shared by every worker invocation of a run.
///
/// The label map sits behind one `RwLock` that is write-locked only when a new
/// label is inserted; each label then has its own `Mutex`, so workers recording
/// different labels never contend. `finalize` locks labels one at a time: every
/// returned [`Metrics`] is internally consistent, and the whole map reflects
/// what was recorded up to the moment each label was read.
#[derive(Debug)]
pub struct MetricsAggregator {
    labels: RwLock<HashMap<String, LabelSlot>>,
    template: LabelAccumulator,
}

impl MetricsAggregator {
    /// Create an empty aggregator whose estimators keep `precision` digits.
    ///
    /// # Errors
    ///
    /// Returns an error when the estimator precision is invalid.
    pub fn new(precision: u8) -> Result<Self, ValidationError> {
        Ok(Self {
            labels: RwLock::new(HashMap::new()),
            template: LabelAccumulator::new(precision)?,
        })
    }

    /// Fold one outcome into its label, creating the label on first sight.
    pub fn record_outcome(&self, outcome: Outcome) {
        let Outcome {
            label,
            latency,
            status,
            error,
        } = outcome;
        let slot = self.slot(label);
        lock_slot(&slot).consume(latency, status, error);
    }

    /// Snapshot every label into finalized metrics.
    ///
    /// Safe to call while recording is still in progress; it never changes
    /// what later calls observe.
    #[must_use]
    pub fn finalize(&self) -> BTreeMap<String, Metrics> {
        let labels = self.labels.read().unwrap_or_else(PoisonError::into_inner);
        labels
            .iter()
            .map(|(label, slot)| (label.clone(), lock_slot(slot).finalize()))
            .collect()
    }

    #[must_use]
    pub fn label_count(&self) -> usize {
        self.labels
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn slot(&self, label: String) -> LabelSlot {
        if let Some(slot) = self
            .labels
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&label)
        {
            return Arc::clone(slot);
        }

        // Racing first inserts resolve here: whoever takes the write lock
        // second finds the entry already present.
        let mut labels = self.labels.write().unwrap_or_else(PoisonError::into_inner);
        let slot = labels
            .entry(label)
            .or_insert_with(|| Arc::new(Mutex::new(self.template.clone())));
        Arc::clone(slot)
    }
}

fn lock_slot(slot: &LabelSlot) -> MutexGuard<'_, LabelAccumulator> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Clone)]
struct LabelAccumulator {
    requests: u64,
    successes: u64,
    status_codes: BTreeMap<Status, u64>,
    errors: Vec<String>,
    seen_errors: HashSet<String>,
    latencies: LatencySummary,
    latencies_success: LatencySummary,
}

impl LabelAccumulator {
    fn new(precision: u8) -> Result<Self, ValidationError> {
        Ok(Self {
            requests: 0,
            successes: 0,
            status_codes: BTreeMap::new(),
            errors: Vec::new(),
            seen_errors: HashSet::new(),
            latencies: LatencySummary::new(precision)?,
            latencies_success: LatencySummary::new(precision)?,
        })
    }

    fn consume(&mut self, latency: Duration, status: Status, error: Option<String>) {
        self.requests = self.requests.saturating_add(1);
        let count = self.status_codes.entry(status).or_insert(0);
        *count = count.saturating_add(1);

        self.latencies.add(latency);
        if status.is_success() {
            self.successes = self.successes.saturating_add(1);
            self.latencies_success.add(latency);
        }

        if let Some(error) = error.filter(|message| !message.is_empty())
            && !self.seen_errors.contains(&error)
        {
            self.seen_errors.insert(error.clone());
            self.errors.push(error);
        }
    }

    fn finalize(&self) -> Metrics {
        Metrics {
            latencies: self.latencies.finalize(),
            latencies_success: self.latencies_success.finalize(),
            requests: self.requests,
            successes: self.successes,
            success_ratio: ratio(self.successes, self.requests),
            status_codes: self.status_codes.clone(),
            errors: self.errors.clone(),
        }
    }
}

#[expect(
    clippy::float_arithmetic,
    reason = "Success ratio is reported as a fraction"
)]
fn ratio(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64
}
