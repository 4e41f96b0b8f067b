//! Core abstraction traits for reading simulation output.

use crate::id::StepId;

/// Read-only access to a field snapshot.
///
/// This decouples output collaborators (writers, plotters, statistics)
/// from the engine's buffer ownership: an observer only ever sees
/// `&dyn FieldSnapshot`, never the grid it was taken from.
pub trait FieldSnapshot {
    /// Field values in flat layout order (x fastest).
    fn values(&self) -> &[f64];

    /// Simulated time of this snapshot.
    fn time(&self) -> f64;

    /// Step index of this snapshot (`StepId(0)` is the initial field).
    fn step(&self) -> StepId;

    /// Arithmetic mean of all cell values.
    fn mean(&self) -> f64 {
        let values = self.values();
        if values.is_empty() {
            return 0.0;
        }
        values.iter().sum::<f64>() / values.len() as f64
    }
}
