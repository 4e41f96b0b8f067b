//! Simulation configuration and validation.
//!
//! [`SimulationConfig`] is the builder input for
//! [`SimulationDriver`](crate::SimulationDriver).
//! [`validate()`](SimulationConfig::validate) runs every setup check the
//! driver runs, so a config that validates never fails construction.

use std::fmt;

use tarn_core::{ConfigError, Dimension};
use tarn_grid::{AxisSpec, Lattice};
use tarn_init::InitialCondition;
use tarn_stencil::{BoundaryEnforcer, BoundarySpecs, Parallelism, SourceTerm};

/// Largest step count a run may target. Keeps `step * dt` exact in the
/// integer part of an `f64` mantissa.
pub const MAX_STEPS: u64 = 1 << 52;

/// Slack, in steps, when converting an end time to a step count, so that
/// `1.1 / 0.1 = 11.000000000000002` still yields 11 steps.
const END_TIME_TOLERANCE: f64 = 1e-9;

// ── IntegrationMethod ──────────────────────────────────────────────

/// Explicit time-integration scheme.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum IntegrationMethod {
    /// Forward Euler, first order, one rate evaluation per step.
    #[default]
    Euler,
    /// Classical fourth-order Runge-Kutta, four rate evaluations per step.
    RungeKutta,
}

impl fmt::Display for IntegrationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Euler => write!(f, "euler"),
            Self::RungeKutta => write!(f, "runge_kutta"),
        }
    }
}

// ── RunLength ──────────────────────────────────────────────────────

/// How long a run lasts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RunLength {
    /// A fixed number of steps.
    Steps(u64),
    /// Step until simulated time reaches this value. The final step may
    /// overshoot by less than one `dt`.
    EndTime(f64),
}

impl RunLength {
    /// Resolve to a step count for time step `dt`.
    ///
    /// `dt` must already be finite and positive.
    pub fn total_steps(&self, dt: f64) -> Result<u64, ConfigError> {
        match *self {
            Self::Steps(0) => Err(ConfigError::InvalidRunLength {
                reason: "step count must be at least 1".to_string(),
            }),
            Self::Steps(n) if n > MAX_STEPS => Err(ConfigError::InvalidRunLength {
                reason: format!("step count {n} exceeds {MAX_STEPS}"),
            }),
            Self::Steps(n) => Ok(n),
            Self::EndTime(t) => {
                if !t.is_finite() || t <= 0.0 {
                    return Err(ConfigError::InvalidRunLength {
                        reason: format!("end time must be finite and positive, got {t}"),
                    });
                }
                let ratio = t / dt;
                if !(ratio <= MAX_STEPS as f64) {
                    return Err(ConfigError::InvalidRunLength {
                        reason: format!("end time {t} needs more than {MAX_STEPS} steps of {dt}"),
                    });
                }
                let mut steps = ratio.ceil();
                if steps - ratio > 1.0 - END_TIME_TOLERANCE {
                    steps -= 1.0;
                }
                Ok(steps.max(1.0) as u64)
            }
        }
    }
}

impl fmt::Display for RunLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Steps(n) => write!(f, "{n} steps"),
            Self::EndTime(t) => write!(f, "until t={t}"),
        }
    }
}

// ── IntegrationConfig ──────────────────────────────────────────────

/// Time-stepping parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntegrationConfig {
    /// Integration scheme. Default: Euler.
    pub method: IntegrationMethod,
    /// Time step. Must be finite and positive.
    pub dt: f64,
    /// Total run length.
    pub run_length: RunLength,
}

impl IntegrationConfig {
    /// Validate `dt` and resolve the run length to a step count.
    pub fn total_steps(&self) -> Result<u64, ConfigError> {
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(ConfigError::InvalidTimeStep { dt: self.dt });
        }
        self.run_length.total_steps(self.dt)
    }
}

// ── SimulationConfig ───────────────────────────────────────────────

/// Complete configuration for a [`SimulationDriver`](crate::SimulationDriver).
///
/// All fields are public; [`new()`](Self::new) fills in defaults for
/// everything except the grid geometry, boundaries and run length.
pub struct SimulationConfig {
    /// Grid dimension.
    pub dimension: Dimension,
    /// One spec per active axis, x first.
    pub axes: Vec<AxisSpec>,
    /// Boundary condition per bounded edge.
    pub boundaries: BoundarySpecs,
    /// Initial field. Default: constant 0.
    pub initial: InitialCondition,
    /// Time stepping.
    pub integration: IntegrationConfig,
    /// Diffusion coefficient `D`. Default: 1.0.
    pub diffusion: f64,
    /// Source term `S(u, t)`. Default: none.
    pub source: Option<Box<dyn SourceTerm>>,
    /// Seed for the initial-field generator.
    pub seed: u64,
    /// Rate-evaluation threading. Default: serial.
    pub parallelism: Parallelism,
    /// Record `(step, time, mean)` into the driver's history. Default: true.
    ///
    /// The history holds one entry per recorded step and is never
    /// truncated, so long runs should raise `history_interval` or turn
    /// recording off.
    pub record_history: bool,
    /// Record every N-th step (plus the initial and final ones). Must be
    /// at least 1. Default: 1.
    pub history_interval: u64,
}

impl fmt::Debug for SimulationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulationConfig")
            .field("dimension", &self.dimension)
            .field("axes", &self.axes)
            .field("boundaries", &self.boundaries)
            .field("initial", &self.initial)
            .field("integration", &self.integration)
            .field("diffusion", &self.diffusion)
            .field("source", &self.source.as_ref().map(|_| "<dyn SourceTerm>"))
            .field("seed", &self.seed)
            .field("parallelism", &self.parallelism)
            .field("record_history", &self.record_history)
            .field("history_interval", &self.history_interval)
            .finish()
    }
}

impl SimulationConfig {
    /// A config with default physics over the given geometry.
    ///
    /// Boundaries start empty, which only validates for fully periodic
    /// grids.
    pub fn new(dimension: Dimension, axes: Vec<AxisSpec>, integration: IntegrationConfig) -> Self {
        Self {
            dimension,
            axes,
            boundaries: BoundarySpecs::new(),
            initial: InitialCondition::default(),
            integration,
            diffusion: 1.0,
            source: None,
            seed: 0,
            parallelism: Parallelism::Serial,
            record_history: true,
            history_interval: 1,
        }
    }

    /// Build the lattice described by `dimension` and `axes`.
    pub fn lattice(&self) -> Result<Lattice, ConfigError> {
        Lattice::new(self.dimension, &self.axes)
    }

    /// Validate all setup invariants.
    ///
    /// Checks run in the order the driver builds things: geometry,
    /// boundaries, initial condition, coefficients, time stepping,
    /// history sampling.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 1. Geometry.
        let lattice = self.lattice()?;
        // 2. Boundary specs match the bounded edges exactly.
        BoundaryEnforcer::new(&lattice, &self.boundaries)?;
        // 3. Initial condition parameters and seed index.
        self.initial.validate(&lattice)?;
        // 4. Diffusion coefficient.
        if !self.diffusion.is_finite() || self.diffusion < 0.0 {
            return Err(ConfigError::InvalidCoefficient {
                name: "diffusion",
                value: self.diffusion,
            });
        }
        // 5. dt and run length.
        self.integration.total_steps()?;
        // 6. History sampling.
        if self.history_interval == 0 {
            return Err(ConfigError::InvalidHistoryInterval);
        }
        Ok(())
    }
}
