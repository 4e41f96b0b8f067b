//! Strongly-typed identifiers and the [`CellCoord`] type alias.

use smallvec::SmallVec;
use std::fmt;

/// Monotonically increasing step counter.
///
/// `StepId(0)` is the initial state produced by the field generator;
/// each successful integrator step advances it by one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StepId(pub u64);

impl StepId {
    /// The step after this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for StepId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// A multi-index into a structured grid, one entry per active axis.
///
/// Uses `SmallVec<[usize; 3]>` so coordinates for 1D, 2D and 3D grids
/// never touch the heap. Entry 0 is the x index, entry 1 is y, entry 2 is z.
pub type CellCoord = SmallVec<[usize; 3]>;
