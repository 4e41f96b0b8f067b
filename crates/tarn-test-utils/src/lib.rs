//! Test utilities and fixtures for Tarn development.
//!
//! Provides ready-made [`SimulationConfig`] builders for the standard test
//! geometries, a [`MockSnapshot`] implementing [`FieldSnapshot`], and the
//! observer and source fixtures in [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use tarn_core::{Dimension, FieldSnapshot, GridEdge, StepId};
use tarn_engine::{IntegrationConfig, IntegrationMethod, RunLength, SimulationConfig};
use tarn_grid::AxisSpec;
use tarn_init::InitialCondition;
use tarn_stencil::{BoundaryCondition, BoundarySpecs};

/// Integration parameters for a fixed step count.
pub fn integration(method: IntegrationMethod, dt: f64, steps: u64) -> IntegrationConfig {
    IntegrationConfig {
        method,
        dt,
        run_length: RunLength::Steps(steps),
    }
}

/// A bounded 1D line of `cells` cells with spacing 1 and the same
/// condition on both ends.
pub fn line_config(
    cells: usize,
    condition: BoundaryCondition,
    integration: IntegrationConfig,
) -> SimulationConfig {
    let mut cfg = SimulationConfig::new(
        Dimension::D1,
        vec![AxisSpec::bounded(cells, 1.0)],
        integration,
    );
    cfg.boundaries = BoundarySpecs::new()
        .with(GridEdge::Lx, condition)
        .with(GridEdge::Ux, condition);
    cfg
}

/// A fully bounded grid of the given dimension with `cells` cells and
/// spacing 1 per axis, every edge carrying `condition`.
pub fn box_config(
    dimension: Dimension,
    cells: usize,
    condition: BoundaryCondition,
    integration: IntegrationConfig,
) -> SimulationConfig {
    let axes = vec![AxisSpec::bounded(cells, 1.0); dimension.ndim()];
    let mut cfg = SimulationConfig::new(dimension, axes, integration);
    let mut specs = BoundarySpecs::new();
    for &edge in dimension.edges() {
        specs.set(edge, condition);
    }
    cfg.boundaries = specs;
    cfg
}

/// A fully periodic grid. Needs no boundary conditions.
pub fn periodic_config(
    dimension: Dimension,
    cells: usize,
    spacing: f64,
    integration: IntegrationConfig,
) -> SimulationConfig {
    let axes = vec![AxisSpec::periodic(cells, spacing); dimension.ndim()];
    SimulationConfig::new(dimension, axes, integration)
}

/// A single periodic cell. The Laplacian vanishes identically, so the
/// field obeys the pointwise ODE `du/dt = S(u, t)`.
pub fn ode_config(initial: f64, integration: IntegrationConfig) -> SimulationConfig {
    let mut cfg = periodic_config(Dimension::D1, 1, 1.0, integration);
    cfg.initial = InitialCondition::Constant(initial);
    cfg
}

/// Mock implementation of [`FieldSnapshot`].
///
/// Backed by a plain `Vec<f64>` with configurable step and time.
#[derive(Clone, Debug, PartialEq)]
pub struct MockSnapshot {
    values: Vec<f64>,
    step: StepId,
    time: f64,
}

impl MockSnapshot {
    pub fn new(values: Vec<f64>) -> Self {
        Self {
            values,
            step: StepId(0),
            time: 0.0,
        }
    }

    pub fn at(mut self, step: u64, time: f64) -> Self {
        self.step = StepId(step);
        self.time = time;
        self
    }
}

impl FieldSnapshot for MockSnapshot {
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
