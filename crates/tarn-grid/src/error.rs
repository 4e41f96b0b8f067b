//! Error types for grid access.

use std::fmt;
use tarn_core::CellCoord;

/// Errors arising from indexing or replacing grid storage.
///
/// Construction problems are reported as [`tarn_core::ConfigError`];
/// these cover access to an already-built grid.
#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    /// A multi-index is outside the grid or has the wrong rank.
    CoordOutOfBounds {
        /// The offending coordinate.
        coord: CellCoord,
        /// Per-axis cell counts of the grid.
        shape: CellCoord,
    },
    /// A value buffer does not match the grid's cell count.
    LengthMismatch {
        /// The grid's cell count.
        expected: usize,
        /// The supplied buffer length.
        actual: usize,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CoordOutOfBounds { coord, shape } => {
                write!(
                    f,
                    "coordinate {:?} out of bounds for shape {:?}",
                    coord.as_slice(),
                    shape.as_slice()
                )
            }
            Self::LengthMismatch { expected, actual } => {
                write!(f, "buffer has {actual} values, grid has {expected} cells")
            }
        }
    }
}

impl std::error::Error for GridError {}
