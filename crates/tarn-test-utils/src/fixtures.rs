//! Reusable observer and source fixtures.
//!
//! - [`RecordingObserver`] keeps an owned copy of every snapshot it sees.
//! - [`CountingSource`] counts how often the rate was evaluated.
//! - [`PoisonSource`] turns every rate into NaN from a given time on.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tarn_engine::{Observer, OwnedSnapshot, Snapshot};
use tarn_stencil::SourceTerm;

/// Records owned snapshots into shared storage.
///
/// The observer is moved into the driver; keep the [`Recording`] handle
/// returned by [`new()`](Self::new) to inspect what it saw.
#[derive(Debug)]
pub struct RecordingObserver {
    sink: Arc<Mutex<RecordingInner>>,
}

#[derive(Debug, Default)]
struct RecordingInner {
    snapshots: Vec<OwnedSnapshot>,
    finished: usize,
}

/// Read side of a [`RecordingObserver`].
#[derive(Clone, Debug)]
pub struct Recording {
    sink: Arc<Mutex<RecordingInner>>,
}

impl RecordingObserver {
    pub fn new() -> (Self, Recording) {
        let sink = Arc::new(Mutex::new(RecordingInner::default()));
        (
            Self {
                sink: Arc::clone(&sink),
            },
            Recording { sink },
        )
    }
}

impl Observer for RecordingObserver {
    fn observe(&mut self, snapshot: &Snapshot<'_>) {
        if let Ok(mut inner) = self.sink.lock() {
            inner.snapshots.push(snapshot.to_owned_snapshot());
        }
    }

    fn finish(&mut self) {
        if let Ok(mut inner) = self.sink.lock() {
            inner.finished += 1;
        }
    }
}

impl Recording {
    fn inner(&self) -> MutexGuard<'_, RecordingInner> {
        self.sink.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Every snapshot seen so far, in notification order.
    pub fn snapshots(&self) -> Vec<OwnedSnapshot> {
        self.inner().snapshots.clone()
    }

    /// Step indices of the recorded snapshots.
    pub fn steps(&self) -> Vec<u64> {
        self.inner().snapshots.iter().map(|s| s.step.0).collect()
    }

    /// How many times `finish()` was called.
    pub fn finished(&self) -> usize {
        self.inner().finished
    }
}

/// Wraps a source and counts rate evaluations.
///
/// Useful for checking how many stages an integrator runs per step.
#[derive(Debug)]
pub struct CountingSource<S> {
    inner: S,
    calls: Arc<AtomicUsize>,
}

impl<S: SourceTerm> CountingSource<S> {
    /// The wrapped source and a shared call counter.
    pub fn new(inner: S) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                inner,
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }
}

impl<S: SourceTerm> SourceTerm for CountingSource<S> {
    fn rate(&self, value: f64, time: f64) -> f64 {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.inner.rate(value, time)
    }
}

/// Returns zero before `from_time` and NaN from then on.
///
/// Drives a run into numerical divergence at a predictable step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PoisonSource {
    pub from_time: f64,
}

impl SourceTerm for PoisonSource {
    fn rate(&self, _value: f64, time: f64) -> f64 {
        if time >= self.from_time {
            f64::NAN
        } else {
            0.0
        }
    }
}
