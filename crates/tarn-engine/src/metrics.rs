//! Per-step performance and field metrics.
//!
//! [`StepMetrics`] captures timing and summary statistics for a single
//! step. The driver refreshes it after every successful step.

use tarn_core::StepId;

/// Timing and field statistics collected during a single step.
///
/// Durations are in microseconds.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepMetrics {
    /// The step these metrics describe.
    pub step: StepId,
    /// Simulated time after the step.
    pub time: f64,
    /// Wall-clock time for the whole step, in microseconds.
    pub total_us: u64,
    /// Wall-clock time spent notifying observers, in microseconds.
    pub observer_us: u64,
    /// Number of full-grid rate evaluations (1 for Euler, 4 for RK4).
    pub stage_evaluations: u32,
    /// Number of cells updated.
    pub cells: usize,
    /// Mean field value after the step.
    pub mean: f64,
    /// Smallest field value after the step.
    pub min: f64,
    /// Largest field value after the step.
    pub max: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = StepMetrics::default();
        assert_eq!(m.step, StepId(0));
        assert_eq!(m.total_us, 0);
        assert_eq!(m.observer_us, 0);
        assert_eq!(m.stage_evaluations, 0);
        assert_eq!(m.cells, 0);
        assert_eq!(m.mean, 0.0);
    }
}
