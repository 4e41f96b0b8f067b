//! Tarn: a grid-based numerical field simulator.
//!
//! Tarn integrates `∂u/∂t = D ∇²u + S(u, t)` on a regular 1D, 2D or 3D
//! grid with explicit Euler or fourth-order Runge-Kutta steps. Each axis is
//! bounded or periodic; bounded edges carry a floating, fixed-value or
//! fixed-flux condition.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Tarn sub-crates. For most users, adding `tarn` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use tarn::prelude::*;
//!
//! // A 2D plate, periodic in x, held at 1 below and 0 above.
//! let mut config = SimulationConfig::new(
//!     Dimension::D2,
//!     vec![AxisSpec::periodic(16, 1.0), AxisSpec::bounded(8, 1.0)],
//!     IntegrationConfig {
//!         method: IntegrationMethod::RungeKutta,
//!         dt: 0.1,
//!         run_length: RunLength::EndTime(5.0),
//!     },
//! );
//! config.boundaries = BoundarySpecs::new()
//!     .with(GridEdge::Ly, BoundaryCondition::FixedValue(1.0))
//!     .with(GridEdge::Uy, BoundaryCondition::FixedValue(0.0));
//! config.initial = InitialCondition::RandomUniform { min: 0.0, max: 0.1 };
//! config.seed = 42;
//!
//! let mut driver = SimulationDriver::new(config).unwrap();
//! let (observer, snapshots) = ChannelObserver::unbounded();
//! driver.add_observer("every_10", 10, observer).unwrap();
//!
//! let report = driver.run().unwrap();
//! assert_eq!(report.stop, StopReason::Completed);
//! assert_eq!(driver.current_step(), StepId(50));
//! assert_eq!(snapshots.try_iter().count(), 6);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the
//! prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `tarn-core` | Geometry enums, step IDs, errors, snapshot trait |
//! | [`grid`] | `tarn-grid` | Lattice geometry and the field grid |
//! | [`stencil`] | `tarn-stencil` | Boundary conditions, Laplacian, sources, field equation |
//! | [`init`] | `tarn-init` | Initial conditions and field generators |
//! | [`engine`] | `tarn-engine` | Time steppers, integrator, driver, observers |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, IDs and errors (`tarn-core`).
///
/// Contains the geometry vocabulary ([`types::Dimension`],
/// [`types::GridEdge`], [`types::Topology`]), the error enums and the
/// [`types::FieldSnapshot`] trait.
pub use tarn_core as types;

/// Grid geometry and storage (`tarn-grid`).
///
/// [`grid::Lattice`] resolves neighbours and layout; [`grid::Grid`] pairs a
/// lattice with its field values.
pub use tarn_grid as grid;

/// Spatial discretisation (`tarn-stencil`).
///
/// Boundary conditions and their enforcer, the [`stencil::Laplacian`],
/// source terms and the [`stencil::FieldEquation`] that combines them.
pub use tarn_stencil as stencil;

/// Initial-field generation (`tarn-init`).
pub use tarn_init as init;

/// Time integration and the simulation driver (`tarn-engine`).
pub use tarn_engine as engine;

/// Common imports for typical Tarn usage.
///
/// ```rust
/// use tarn::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use tarn_core::{
        Axis, CellCoord, Dimension, Direction, FieldSnapshot, GridEdge, StepId, Topology,
    };

    // Errors
    pub use tarn_core::{ConfigError, StepError};

    // Grid
    pub use tarn_grid::{AxisSpec, Grid, Lattice};

    // Stencil
    pub use tarn_stencil::{
        BoundaryCondition, BoundarySpecs, LinearSource, Parallelism, QuadraticSource, SourceTerm,
    };

    // Initial fields
    pub use tarn_init::InitialCondition;

    // Engine
    pub use tarn_engine::{
        observer_fn, CancelToken, ChannelObserver, IntegrationConfig, IntegrationMethod,
        IntegratorState, Observer, OwnedSnapshot, RunLength, RunReport, SimulationConfig,
        SimulationDriver, Snapshot, StepMetrics, StopReason,
    };
}
