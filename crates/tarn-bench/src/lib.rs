//! Benchmark profiles for the Tarn field simulator.
//!
//! Provides pre-built [`SimulationConfig`] profiles for benchmarking:
//!
//! - [`reference_profile`]: 100x100 grid (10K cells) with mixed edges
//! - [`stress_profile`]: 316x316 grid (~100K cells) for stress testing
//! - [`volume_profile`]: 48x48x48 periodic box (~110K cells)

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use tarn_core::{Dimension, GridEdge};
use tarn_engine::{IntegrationConfig, IntegrationMethod, RunLength, SimulationConfig, MAX_STEPS};
use tarn_grid::AxisSpec;
use tarn_init::InitialCondition;
use tarn_stencil::{BoundaryCondition, BoundarySpecs, Parallelism};

/// Diffusion coefficient shared by all profiles.
pub const DIFFUSION: f64 = 0.1;

/// Time step shared by all profiles. Well inside the explicit limit
/// `h² / (2 ndim D)` for `h = 1`.
pub const DT: f64 = 0.1;

fn endless(method: IntegrationMethod) -> IntegrationConfig {
    IntegrationConfig {
        method,
        dt: DT,
        run_length: RunLength::Steps(MAX_STEPS),
    }
}

fn square(
    cells: usize,
    method: IntegrationMethod,
    parallelism: Parallelism,
    seed: u64,
) -> SimulationConfig {
    let mut config = SimulationConfig::new(
        Dimension::D2,
        vec![AxisSpec::bounded(cells, 1.0); 2],
        endless(method),
    );
    config.boundaries = BoundarySpecs::new()
        .with(GridEdge::Lx, BoundaryCondition::FixedValue(0.0))
        .with(GridEdge::Ux, BoundaryCondition::FixedValue(0.0))
        .with(GridEdge::Ly, BoundaryCondition::FixedFlux(0.5))
        .with(GridEdge::Uy, BoundaryCondition::Floating);
    config.initial = InitialCondition::RandomUniform { min: 0.0, max: 1.0 };
    config.diffusion = DIFFUSION;
    config.seed = seed;
    config.parallelism = parallelism;
    config.record_history = false;
    config
}

/// Build a reference benchmark profile: 100x100 grid (10K cells).
///
/// Fixed value in x, fixed flux below and floating above in y. The run
/// length is effectively unbounded so benches can keep stepping.
pub fn reference_profile(
    seed: u64,
    method: IntegrationMethod,
    parallelism: Parallelism,
) -> SimulationConfig {
    square(100, method, parallelism, seed)
}

/// Build a stress benchmark profile: 316x316 grid (~100K cells).
///
/// Same edges as [`reference_profile`] at 10x the cell count.
pub fn stress_profile(
    seed: u64,
    method: IntegrationMethod,
    parallelism: Parallelism,
) -> SimulationConfig {
    square(316, method, parallelism, seed)
}

/// Build a 3D periodic profile: 48³ cells with a Gaussian initial field.
pub fn volume_profile(
    seed: u64,
    method: IntegrationMethod,
    parallelism: Parallelism,
) -> SimulationConfig {
    let mut config = SimulationConfig::new(
        Dimension::D3,
        vec![AxisSpec::periodic(48, 1.0); 3],
        endless(method),
    );
    config.initial = InitialCondition::RandomGaussian {
        mean: 0.0,
        std_dev: 1.0,
    };
    config.diffusion = DIFFUSION;
    config.seed = seed;
    config.parallelism = parallelism;
    config.record_history = false;
    config
}
