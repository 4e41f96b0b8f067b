//! Time integration and simulation driver for the Tarn field simulator.
//!
//! Provides [`SimulationDriver`], which turns a [`SimulationConfig`] into a
//! running simulation: it builds the lattice, fills the initial field,
//! and steps an [`Integrator`] (Euler or classical RK4) until the run
//! length is reached, handing [`Snapshot`]s to registered observers.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cancel;
pub mod config;
pub mod driver;
pub mod history;
pub mod integrator;
pub mod metrics;
pub mod observer;
pub mod state;
pub mod stepper;

pub use cancel::CancelToken;
pub use config::{IntegrationConfig, IntegrationMethod, RunLength, SimulationConfig, MAX_STEPS};
pub use driver::{RunReport, SimulationDriver, StopReason};
pub use history::{EpochRecord, History};
pub use integrator::{Integrator, IntegratorState};
pub use metrics::StepMetrics;
pub use observer::{observer_fn, ChannelObserver, FnObserver, Observer, OwnedSnapshot, Snapshot};
pub use state::SimulationState;
pub use stepper::{EulerStepper, RungeKuttaStepper, TimeStepper};
