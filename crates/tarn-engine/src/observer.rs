//! Output collaborators and the snapshots they receive.
//!
//! An [`Observer`] is notified with a borrowed [`Snapshot`] every N steps.
//! Observers that need to keep data past the call copy it out, for example
//! into an [`OwnedSnapshot`]. [`ChannelObserver`] does exactly that and
//! forwards the copy to another thread.

use crossbeam_channel::{Receiver, Sender, TrySendError};
use tarn_core::{CellCoord, FieldSnapshot, StepId};
use tarn_grid::{Grid, Lattice};

// ── Snapshot ───────────────────────────────────────────────────────

/// Read-only view of the field at one step.
///
/// Borrows the driver's front grid, so it cannot outlive the
/// notification call.
#[derive(Clone, Copy, Debug)]
pub struct Snapshot<'a> {
    grid: &'a Grid,
    step: StepId,
    time: f64,
}

impl<'a> Snapshot<'a> {
    pub(crate) fn new(grid: &'a Grid, step: StepId, time: f64) -> Self {
        Self { grid, step, time }
    }

    /// Grid geometry.
    pub fn lattice(&self) -> &'a Lattice {
        self.grid.lattice()
    }

    /// Value at a multi-index.
    pub fn get(&self, coord: &[usize]) -> Option<f64> {
        self.grid.get(coord)
    }

    /// Copy into an owned snapshot.
    pub fn to_owned_snapshot(&self) -> OwnedSnapshot {
        OwnedSnapshot {
            step: self.step,
            time: self.time,
            shape: self.grid.lattice().shape(),
            values: self.grid.values().to_vec(),
        }
    }
}

impl FieldSnapshot for Snapshot<'_> {
    fn values(&self) -> &[f64] {
        self.grid.values()
    }

    fn time(&self) -> f64 {
        self.time
    }

    fn step(&self) -> StepId {
        self.step
    }
}

/// A snapshot that owns a copy of the field.
#[derive(Clone, Debug, PartialEq)]
pub struct OwnedSnapshot {
    /// Step index.
    pub step: StepId,
    /// Simulated time.
    pub time: f64,
    /// Per-axis cell counts.
    pub shape: CellCoord,
    /// Field values in layout order (x fastest).
    pub values: Vec<f64>,
}

impl FieldSnapshot for OwnedSnapshot {
    fn values(&self) -> &[f64] {
        &self.values
    }

    fn time(&self) -> f64 {
        self.time
    }

    fn step(&self) -> StepId {
        self.step
    }
}

// ── Observer ───────────────────────────────────────────────────────

/// Receives snapshots from the driver.
///
/// Observers run on the driver's thread between steps and cannot fail the
/// run.
pub trait Observer: Send {
    /// Called with the field at a notification step.
    fn observe(&mut self, snapshot: &Snapshot<'_>);

    /// Called once when the run reaches its final step.
    fn finish(&mut self) {}
}

/// An observer backed by a closure. Built by [`observer_fn`].
pub struct FnObserver<F>(F);

impl<F> std::fmt::Debug for FnObserver<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FnObserver")
    }
}

/// Wrap a closure as an [`Observer`].
///
/// ```
/// use tarn_core::FieldSnapshot;
/// use tarn_engine::observer_fn;
///
/// let mut means = Vec::new();
/// let _obs = observer_fn(move |snap| means.push(snap.mean()));
/// ```
pub fn observer_fn<F>(f: F) -> FnObserver<F>
where
    F: FnMut(&Snapshot<'_>) + Send,
{
    FnObserver(f)
}

impl<F> Observer for FnObserver<F>
where
    F: FnMut(&Snapshot<'_>) + Send,
{
    fn observe(&mut self, snapshot: &Snapshot<'_>) {
        (self.0)(snapshot)
    }
}

// ── ChannelObserver ────────────────────────────────────────────────

/// Forwards owned snapshots over a crossbeam channel.
///
/// With a bounded channel a full queue drops the snapshot rather than
/// stall the simulation; [`dropped()`](Self::dropped) counts those. A
/// disconnected receiver is ignored the same way.
#[derive(Debug)]
pub struct ChannelObserver {
    tx: Sender<OwnedSnapshot>,
    dropped: u64,
}

impl ChannelObserver {
    /// An observer and the receiving end of an unbounded channel.
    pub fn unbounded() -> (Self, Receiver<OwnedSnapshot>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (Self { tx, dropped: 0 }, rx)
    }

    /// An observer and the receiving end of a channel holding at most
    /// `capacity` snapshots.
    pub fn bounded(capacity: usize) -> (Self, Receiver<OwnedSnapshot>) {
        let (tx, rx) = crossbeam_channel::bounded(capacity);
        (Self { tx, dropped: 0 }, rx)
    }

    /// Snapshots that could not be delivered.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl Observer for ChannelObserver {
    fn observe(&mut self, snapshot: &Snapshot<'_>) {
        match self.tx.try_send(snapshot.to_owned_snapshot()) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) | Err(TrySendError::Disconnected(_)) => {
                self.dropped += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tarn_core::{Dimension, Topology};

    fn grid() -> Grid {
        let l = Lattice::uniform(Dimension::D2, 2, 1.0, Topology::Periodic).unwrap();
        Grid::from_values(l, vec![1.0, 2.0, 3.0, 6.0]).unwrap()
    }

    #[test]
    fn snapshot_exposes_field() {
        let g = grid();
        let snap = Snapshot::new(&g, StepId(3), 0.3);
        assert_eq!(snap.step(), StepId(3));
        assert_eq!(snap.time(), 0.3);
        assert_eq!(snap.get(&[1, 1]), Some(6.0));
        assert!((snap.mean() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn owned_copy_matches() {
        let g = grid();
        let owned = Snapshot::new(&g, StepId(1), 0.1).to_owned_snapshot();
        assert_eq!(owned.values, g.values());
        assert_eq!(owned.shape.as_slice(), &[2, 2]);
        assert_eq!(owned.step(), StepId(1));
    }

    #[test]
    fn closure_observer() {
        let g = grid();
        let mut seen = Vec::new();
        {
            let mut obs = observer_fn(|s| seen.push(s.step()));
            obs.observe(&Snapshot::new(&g, StepId(5), 0.5));
        }
        assert_eq!(seen, vec![StepId(5)]);
    }

    #[test]
    fn channel_observer_forwards() {
        let g = grid();
        let (mut obs, rx) = ChannelObserver::unbounded();
        obs.observe(&Snapshot::new(&g, StepId(2), 0.2));
        let got = rx.try_recv().unwrap();
        assert_eq!(got.step, StepId(2));
        assert_eq!(obs.dropped(), 0);
    }

    #[test]
    fn bounded_channel_drops_when_full() {
        let g = grid();
        let (mut obs, rx) = ChannelObserver::bounded(1);
        obs.observe(&Snapshot::new(&g, StepId(1), 0.1));
        obs.observe(&Snapshot::new(&g, StepId(2), 0.2));
        assert_eq!(obs.dropped(), 1);
        assert_eq!(rx.try_recv().unwrap().step, StepId(1));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn disconnected_receiver_is_not_fatal() {
        let g = grid();
        let (mut obs, rx) = ChannelObserver::unbounded();
        drop(rx);
        obs.observe(&Snapshot::new(&g, StepId(1), 0.1));
        assert_eq!(obs.dropped(), 1);
    }
}
