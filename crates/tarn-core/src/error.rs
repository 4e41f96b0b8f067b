//! Error types for the Tarn field simulator.
//!
//! Two families, split by when they can occur:
//!
//! - [`ConfigError`]: the *InvalidConfiguration* family. Detected eagerly
//!   while building a grid, boundary set, initial field or driver, and never
//!   raised once stepping has started.
//! - [`StepError`]: raised by the integrator. *NumericalDivergence* is
//!   fatal; *SimulationComplete* is a terminal-state signal rather than a
//!   fault.

use std::error::Error;
use std::fmt;

use crate::geometry::{Axis, Dimension, GridEdge};
use crate::id::{CellCoord, StepId};

/// Invalid configuration detected before any stepping occurs.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// The number of per-axis specs does not match the grid dimension.
    AxisCountMismatch {
        /// Requested dimension.
        dimension: Dimension,
        /// Number of axis specs supplied.
        axes: usize,
    },
    /// An axis was given zero cells.
    InvalidCellCount {
        /// The offending axis.
        axis: Axis,
        /// The configured cell count.
        cells: usize,
    },
    /// An axis spacing is zero, negative, NaN or infinite.
    InvalidSpacing {
        /// The offending axis.
        axis: Axis,
        /// The configured spacing.
        spacing: f64,
    },
    /// The product of per-axis cell counts does not fit in `usize`.
    CellCountOverflow,
    /// A bounded edge has no boundary condition.
    MissingBoundary {
        /// The edge lacking a spec.
        edge: GridEdge,
    },
    /// A boundary condition was given for an edge that is not a boundary
    /// (periodic axis, or an axis the grid does not have).
    UnexpectedBoundary {
        /// The edge carrying the stray spec.
        edge: GridEdge,
    },
    /// A boundary parameter is NaN or infinite.
    InvalidBoundaryParameter {
        /// The edge whose parameter is invalid.
        edge: GridEdge,
        /// The configured value.
        value: f64,
    },
    /// A seed index lies outside the grid or has the wrong rank.
    SeedOutOfRange {
        /// The requested seed coordinate.
        coord: CellCoord,
        /// Per-axis cell counts of the grid.
        shape: CellCoord,
    },
    /// Initial-condition parameters are inconsistent.
    InvalidInitialCondition {
        /// Description of the problem.
        reason: String,
    },
    /// The time step is zero, negative, NaN or infinite.
    InvalidTimeStep {
        /// The configured dt.
        dt: f64,
    },
    /// The step count or end time cannot produce a run.
    InvalidRunLength {
        /// Description of the problem.
        reason: String,
    },
    /// A named equation coefficient is NaN, infinite or negative.
    InvalidCoefficient {
        /// Coefficient name.
        name: &'static str,
        /// The configured value.
        value: f64,
    },
    /// An observer was registered with a zero interval.
    InvalidObserverInterval {
        /// Observer name.
        name: String,
    },
    /// History recording was configured with a zero interval.
    InvalidHistoryInterval,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AxisCountMismatch { dimension, axes } => {
                write!(f, "{dimension} grid needs {} axis specs, got {axes}", dimension.ndim())
            }
            Self::InvalidCellCount { axis, cells } => {
                write!(f, "axis {axis} must have at least one cell, got {cells}")
            }
            Self::InvalidSpacing { axis, spacing } => {
                write!(f, "axis {axis} spacing must be finite and positive, got {spacing}")
            }
            Self::CellCountOverflow => write!(f, "total cell count overflows usize"),
            Self::MissingBoundary { edge } => {
                write!(f, "bounded edge {edge} has no boundary condition")
            }
            Self::UnexpectedBoundary { edge } => {
                write!(f, "edge {edge} is not a boundary but has a boundary condition")
            }
            Self::InvalidBoundaryParameter { edge, value } => {
                write!(f, "boundary parameter on edge {edge} must be finite, got {value}")
            }
            Self::SeedOutOfRange { coord, shape } => {
                write!(f, "seed index {:?} outside grid of shape {:?}", coord.as_slice(), shape.as_slice())
            }
            Self::InvalidInitialCondition { reason } => {
                write!(f, "invalid initial condition: {reason}")
            }
            Self::InvalidTimeStep { dt } => {
                write!(f, "dt must be finite and positive, got {dt}")
            }
            Self::InvalidRunLength { reason } => write!(f, "invalid run length: {reason}"),
            Self::InvalidCoefficient { name, value } => {
                write!(f, "coefficient '{name}' must be finite and >= 0, got {value}")
            }
            Self::InvalidObserverInterval { name } => {
                write!(f, "observer '{name}' interval must be at least 1")
            }
            Self::InvalidHistoryInterval => write!(f, "history interval must be at least 1"),
        }
    }
}

impl Error for ConfigError {}

/// Errors from the integrator during `step()`.
#[derive(Clone, Debug, PartialEq)]
pub enum StepError {
    /// A NaN or infinite value appeared in the candidate field. The step
    /// was not committed.
    NumericalDivergence {
        /// The step that failed (the step index it would have produced).
        step: StepId,
        /// Multi-index of the first non-finite cell in layout order.
        cell: CellCoord,
        /// The offending value.
        value: f64,
    },
    /// The configured run length has been reached.
    SimulationComplete {
        /// Total steps taken by the run.
        steps: u64,
    },
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NumericalDivergence { step, cell, value } => {
                write!(f, "numerical divergence at step {step}, cell {:?}: {value}", cell.as_slice())
            }
            Self::SimulationComplete { steps } => {
                write!(f, "simulation complete after {steps} steps")
            }
        }
    }
}

impl Error for StepError {}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn config_error_display_mentions_edge() {
        let err = ConfigError::MissingBoundary { edge: GridEdge::Uy };
        assert!(err.to_string().contains("uy"));
    }

    #[test]
    fn axis_mismatch_display() {
        let err = ConfigError::AxisCountMismatch {
            dimension: Dimension::D3,
            axes: 2,
        };
        assert_eq!(err.to_string(), "3d grid needs 3 axis specs, got 2");
    }

    #[test]
    fn divergence_display_includes_location() {
        let err = StepError::NumericalDivergence {
            step: StepId(7),
            cell: smallvec![2, 3],
            value: f64::NAN,
        };
        let msg = err.to_string();
        assert!(msg.contains("step 7"));
        assert!(msg.contains("[2, 3]"));
        assert!(msg.contains("NaN"));
    }

    #[test]
    fn simulation_complete_display() {
        let err = StepError::SimulationComplete { steps: 10 };
        assert_eq!(err.to_string(), "simulation complete after 10 steps");
    }
}
