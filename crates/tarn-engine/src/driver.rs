//! The simulation driver.
//!
//! [`SimulationDriver`] is the primary user-facing API. It builds the grid,
//! runs the initial-field generator, and owns the time loop: each
//! [`step()`](SimulationDriver::step) advances the integrator once,
//! records history, and notifies observers whose interval is due.
//!
//! # Ownership model
//!
//! `SimulationDriver` is [`Send`] but all mutating methods take
//! `&mut self`, and [`snapshot()`](SimulationDriver::snapshot) borrows from
//! `self`. A caller cannot step while holding a snapshot; the borrow
//! checker enforces this at compile time.

use std::fmt;
use std::time::Instant;

use indexmap::IndexMap;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use tarn_core::{ConfigError, StepError, StepId};
use tarn_grid::{Grid, Lattice};
use tarn_stencil::{BoundaryEnforcer, FieldEquation, Laplacian, Parallelism};

use crate::cancel::CancelToken;
use crate::config::{IntegrationMethod, SimulationConfig};
use crate::history::History;
use crate::integrator::{Integrator, IntegratorState};
use crate::metrics::StepMetrics;
use crate::observer::{Observer, Snapshot};
use crate::state::SimulationState;

// Compile-time assertion: SimulationDriver is Send.
const _: () = {
    #[allow(dead_code)]
    fn assert_send<T: Send>() {}
    #[allow(dead_code)]
    fn check() {
        assert_send::<SimulationDriver>();
    }
};

/// History entries reserved up front; longer runs grow the buffer.
const HISTORY_PREALLOC: u64 = 1 << 16;

// ── RunReport ──────────────────────────────────────────────────────

/// Why a [`run()`](SimulationDriver::run) or
/// [`run_steps()`](SimulationDriver::run_steps) call returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// The configured run length was reached.
    Completed,
    /// The cancel token was set.
    Cancelled,
    /// The requested segment length was reached before completion.
    SegmentEnd,
}

/// Outcome of a successful run call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunReport {
    /// Steps taken by this call.
    pub steps: u64,
    /// Step index after the call.
    pub final_step: StepId,
    /// Simulated time after the call.
    pub time: f64,
    /// Why the call returned.
    pub stop: StopReason,
}

// ── SimulationDriver ───────────────────────────────────────────────

struct ObserverSlot {
    observer: Box<dyn Observer>,
    interval: u64,
}

/// Owns the simulation state and runs the time loop.
///
/// # Example
///
/// ```
/// use tarn_core::{Dimension, FieldSnapshot, GridEdge};
/// use tarn_engine::{IntegrationConfig, IntegrationMethod, RunLength, SimulationConfig, SimulationDriver};
/// use tarn_grid::AxisSpec;
/// use tarn_init::InitialCondition;
/// use tarn_stencil::{BoundaryCondition, BoundarySpecs};
///
/// let mut config = SimulationConfig::new(
///     Dimension::D1,
///     vec![AxisSpec::bounded(5, 1.0)],
///     IntegrationConfig {
///         method: IntegrationMethod::Euler,
///         dt: 0.1,
///         run_length: RunLength::Steps(1),
///     },
/// );
/// config.boundaries = BoundarySpecs::new()
///     .with(GridEdge::Lx, BoundaryCondition::FixedValue(0.0))
///     .with(GridEdge::Ux, BoundaryCondition::FixedValue(0.0));
/// config.initial = InitialCondition::Constant(1.0);
///
/// let mut driver = SimulationDriver::new(config).unwrap();
/// driver.step().unwrap();
/// let values = driver.snapshot().values().to_vec();
/// assert!((values[0] - 0.9).abs() < 1e-12);
/// assert_eq!(values[2], 1.0);
/// ```
pub struct SimulationDriver {
    state: SimulationState,
    equation: FieldEquation,
    integrator: Integrator,
    parallelism: Parallelism,
    observers: IndexMap<String, ObserverSlot>,
    history: Option<History>,
    history_interval: u64,
    cancel: CancelToken,
    last_metrics: StepMetrics,
    initial_notified: bool,
}

impl fmt::Debug for SimulationDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulationDriver")
            .field("step", &self.state.step())
            .field("time", &self.state.time())
            .field("integrator", &self.integrator)
            .field("equation", &self.equation)
            .field("observers", &self.observers.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl SimulationDriver {
    /// Validate `config`, build the grid and fill the initial field.
    ///
    /// Consumes the config. On success the driver sits at step 0 with the
    /// integrator idle.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let lattice = config.lattice()?;
        let enforcer = BoundaryEnforcer::new(&lattice, &config.boundaries)?;
        let mut builder = FieldEquation::builder()
            .operator(Laplacian::new(&lattice, enforcer))
            .diffusion(config.diffusion);
        if let Some(source) = config.source {
            builder = builder.boxed_source(source);
        }
        let equation = builder
            .build()
            .map_err(|_| ConfigError::InvalidCoefficient {
                name: "diffusion",
                value: config.diffusion,
            })?;

        let generator = config.initial.compile(&lattice)?;
        let mut grid = Grid::new(lattice);
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        generator.fill(&mut grid, &mut rng)?;

        let integration = config.integration;
        let total_steps = integration.total_steps()?;
        let cells = grid.lattice().cell_count();
        let integrator = Integrator::new(integration.method.stepper(cells), total_steps);

        info!(
            dimension = %config.dimension,
            shape = ?grid.lattice().shape().as_slice(),
            method = %integration.method,
            dt = integration.dt,
            run_length = %integration.run_length,
            steps = total_steps,
            diffusion = config.diffusion,
            initial = %config.initial,
            generator = generator.name(),
            seed = config.seed,
            "simulation configured"
        );

        let history = config.record_history.then(|| {
            let recorded = total_steps / config.history_interval + 2;
            let mut h = History::with_capacity(recorded.min(HISTORY_PREALLOC) as usize);
            h.record(StepId(0), 0.0, grid.mean());
            h
        });

        Ok(Self {
            state: SimulationState::new(grid, integration.dt),
            equation,
            integrator,
            parallelism: config.parallelism,
            observers: IndexMap::new(),
            history,
            history_interval: config.history_interval,
            cancel: CancelToken::new(),
            last_metrics: StepMetrics::default(),
            initial_notified: false,
        })
    }

    // ── Observers ──────────────────────────────────────────────────

    /// Register an observer notified every `interval` steps.
    ///
    /// The observer also sees the initial field (step 0) on the first
    /// step and the final field when the run completes. Registering under
    /// an existing name replaces that observer.
    pub fn add_observer(
        &mut self,
        name: impl Into<String>,
        interval: u64,
        observer: impl Observer + 'static,
    ) -> Result<(), ConfigError> {
        let name = name.into();
        if interval == 0 {
            return Err(ConfigError::InvalidObserverInterval { name });
        }
        debug!(observer = %name, interval, "observer registered");
        self.observers.insert(
            name,
            ObserverSlot {
                observer: Box::new(observer),
                interval,
            },
        );
        Ok(())
    }

    /// Unregister an observer, returning it.
    pub fn remove_observer(&mut self, name: &str) -> Option<Box<dyn Observer>> {
        self.observers.shift_remove(name).map(|slot| slot.observer)
    }

    /// Registered observer names in registration order.
    pub fn observer_names(&self) -> impl Iterator<Item = &str> {
        self.observers.keys().map(String::as_str)
    }

    fn notify(&mut self, force: bool) {
        let step = self.state.step();
        let snapshot = Snapshot::new(self.state.grid(), step, self.state.time());
        for slot in self.observers.values_mut() {
            if force || step.0 % slot.interval == 0 {
                slot.observer.observe(&snapshot);
            }
        }
    }

    // ── Stepping ───────────────────────────────────────────────────

    /// Advance one step.
    ///
    /// # Errors
    ///
    /// - [`StepError::SimulationComplete`] once the run length has been
    ///   reached. The field is unchanged.
    /// - [`StepError::NumericalDivergence`] if the step produced a NaN or
    ///   infinity. The field stays at the last good step and every later
    ///   call returns the same error.
    pub fn step(&mut self) -> Result<StepMetrics, StepError> {
        let start = Instant::now();
        if !self.initial_notified && !self.integrator.state().is_terminal() {
            self.notify(true);
            self.initial_notified = true;
        }

        if let Err(err) = self
            .integrator
            .step(&mut self.state, &self.equation, self.parallelism)
        {
            if let StepError::NumericalDivergence { .. } = err {
                warn!(error = %err, "numerical divergence");
            }
            return Err(err);
        }

        let step = self.state.step();
        let time = self.state.time();
        let mean = self.state.grid().mean();
        let done = self.integrator.state() == IntegratorState::Done;
        if let Some(history) = &mut self.history {
            if done || step.0 % self.history_interval == 0 {
                history.record(step, time, mean);
            }
        }

        let observer_start = Instant::now();
        self.notify(done);
        if done {
            for slot in self.observers.values_mut() {
                slot.observer.finish();
            }
        }
        let observer_us = observer_start.elapsed().as_micros() as u64;

        let (min, max) = self.state.grid().min_max();
        let metrics = StepMetrics {
            step,
            time,
            total_us: start.elapsed().as_micros() as u64,
            observer_us,
            stage_evaluations: self.integrator.stages(),
            cells: self.state.lattice().cell_count(),
            mean,
            min,
            max,
        };
        debug!(step = step.0, time, mean, "step complete");
        if done {
            info!(steps = step.0, time, mean, "simulation complete");
        }
        self.last_metrics = metrics.clone();
        Ok(metrics)
    }

    /// Run until the configured run length is reached or the cancel
    /// token is set.
    ///
    /// # Errors
    ///
    /// As [`step()`](Self::step). Calling `run()` on a completed driver
    /// returns [`StepError::SimulationComplete`].
    pub fn run(&mut self) -> Result<RunReport, StepError> {
        self.drive(u64::MAX)
    }

    /// Advance at most `steps` more steps, so a run can be split into
    /// segments. Stops early on completion or cancellation.
    pub fn run_steps(&mut self, steps: u64) -> Result<RunReport, StepError> {
        self.drive(steps)
    }

    fn drive(&mut self, limit: u64) -> Result<RunReport, StepError> {
        if let Some(err) = self.integrator.terminal_error() {
            return Err(err);
        }
        let mut taken = 0;
        let stop = loop {
            if self.integrator.state() == IntegratorState::Done {
                break StopReason::Completed;
            }
            if taken >= limit {
                break StopReason::SegmentEnd;
            }
            if self.cancel.is_cancelled() {
                info!(step = self.state.step().0, "run cancelled");
                break StopReason::Cancelled;
            }
            self.step()?;
            taken += 1;
        };
        Ok(RunReport {
            steps: taken,
            final_step: self.state.step(),
            time: self.state.time(),
            stop,
        })
    }

    // ── Accessors ──────────────────────────────────────────────────

    /// Read-only view of the current field.
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot::new(self.state.grid(), self.state.step(), self.state.time())
    }

    /// The current field.
    pub fn grid(&self) -> &Grid {
        self.state.grid()
    }

    /// Grid geometry.
    pub fn lattice(&self) -> &Lattice {
        self.state.lattice()
    }

    /// Steps completed so far.
    pub fn current_step(&self) -> StepId {
        self.state.step()
    }

    /// Simulated time.
    pub fn time(&self) -> f64 {
        self.state.time()
    }

    /// Integrator lifecycle state.
    pub fn integrator_state(&self) -> IntegratorState {
        self.integrator.state()
    }

    /// The integration scheme.
    pub fn method(&self) -> IntegrationMethod {
        self.integrator.method()
    }

    /// Step count at which the run completes.
    pub fn total_steps(&self) -> u64 {
        self.integrator.total_steps()
    }

    /// The field equation being integrated.
    pub fn equation(&self) -> &FieldEquation {
        &self.equation
    }

    /// Recorded `(step, time, mean)` series, if history is enabled.
    pub fn history(&self) -> Option<&History> {
        self.history.as_ref()
    }

    /// Metrics from the most recent successful step.
    pub fn last_metrics(&self) -> &StepMetrics {
        &self.last_metrics
    }

    /// A handle that stops [`run()`](Self::run) between steps.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }
}
