//! Per-epoch record of simulated time and mean field value.

use tarn_core::StepId;

/// One history entry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EpochRecord {
    /// Step index; `StepId(0)` is the initial field.
    pub step: StepId,
    /// Simulated time.
    pub time: f64,
    /// Mean field value.
    pub mean: f64,
}

/// Append-only `(step, time, mean)` series.
#[derive(Clone, Debug, Default)]
pub struct History {
    records: Vec<EpochRecord>,
}

impl History {
    /// An empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty history with room for `capacity` records.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
        }
    }

    /// Append a record.
    pub fn record(&mut self, step: StepId, time: f64, mean: f64) {
        self.records.push(EpochRecord { step, time, mean });
    }

    /// All records in step order.
    pub fn records(&self) -> &[EpochRecord] {
        &self.records
    }

    /// The most recent record.
    pub fn last(&self) -> Option<&EpochRecord> {
        self.records.last()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no records have been taken.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Simulated times, in record order.
    pub fn times(&self) -> impl Iterator<Item = f64> + '_ {
        self.records.iter().map(|r| r.time)
    }

    /// Mean values, in record order.
    pub fn means(&self) -> impl Iterator<Item = f64> + '_ {
        self.records.iter().map(|r| r.mean)
    }
}
