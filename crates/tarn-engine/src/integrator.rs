//! The integrator state machine.
//!
//! ```text
//!            step()              target reached
//!   Idle ────────────▶ Stepping ────────────────▶ Done
//!                         │
//!                         │ non-finite value
//!                         ▼
//!                      Diverged
//! ```
//!
//! `Done` and `Diverged` are terminal. Every request in `Done` fails with
//! [`StepError::SimulationComplete`]; every request in `Diverged` repeats
//! the first [`StepError::NumericalDivergence`]. Neither touches the
//! field.

use std::fmt;

use tarn_core::StepError;
use tarn_stencil::{FieldEquation, Parallelism};

use crate::config::IntegrationMethod;
use crate::state::SimulationState;
use crate::stepper::TimeStepper;

/// Lifecycle state of an [`Integrator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IntegratorState {
    /// No step requested yet.
    Idle,
    /// At least one step taken, target not reached.
    Stepping,
    /// The configured step count has been reached.
    Done,
    /// A step produced a non-finite value.
    Diverged,
}

impl IntegratorState {
    /// Whether no further steps can succeed.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Diverged)
    }
}

impl fmt::Display for IntegratorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Stepping => write!(f, "stepping"),
            Self::Done => write!(f, "done"),
            Self::Diverged => write!(f, "diverged"),
        }
    }
}

/// Advances a [`SimulationState`] one step at a time up to a fixed step
/// count.
pub struct Integrator {
    stepper: Box<dyn TimeStepper>,
    state: IntegratorState,
    total_steps: u64,
    failure: Option<StepError>,
}

impl fmt::Debug for Integrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Integrator")
            .field("method", &self.stepper.method())
            .field("state", &self.state)
            .field("total_steps", &self.total_steps)
            .finish()
    }
}

impl Integrator {
    /// An idle integrator that will take `total_steps` steps.
    pub fn new(stepper: Box<dyn TimeStepper>, total_steps: u64) -> Self {
        Self {
            stepper,
            state: IntegratorState::Idle,
            total_steps,
            failure: None,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> IntegratorState {
        self.state
    }

    /// The integration scheme.
    pub fn method(&self) -> IntegrationMethod {
        self.stepper.method()
    }

    /// Rate evaluations per step.
    pub fn stages(&self) -> u32 {
        self.stepper.stages()
    }

    /// Step count at which the run completes.
    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }

    /// The error every further request will return, if the integrator is
    /// in a terminal state.
    pub fn terminal_error(&self) -> Option<StepError> {
        match self.state {
            IntegratorState::Done => Some(StepError::SimulationComplete {
                steps: self.total_steps,
            }),
            IntegratorState::Diverged => self.failure.clone(),
            IntegratorState::Idle | IntegratorState::Stepping => None,
        }
    }

    /// Take one step.
    ///
    /// On success the state's step counter has advanced by one and the
    /// new field is authoritative.
    ///
    /// # Errors
    ///
    /// - [`StepError::SimulationComplete`] if the target step count was
    ///   already reached.
    /// - [`StepError::NumericalDivergence`] if the candidate field holds a
    ///   NaN or infinity. The state is left exactly as before the call.
    pub fn step(
        &mut self,
        state: &mut SimulationState,
        equation: &FieldEquation,
        parallelism: Parallelism,
    ) -> Result<(), StepError> {
        if let Some(err) = self.terminal_error() {
            return Err(err);
        }
        self.state = IntegratorState::Stepping;
        if state.step().0 >= self.total_steps {
            self.state = IntegratorState::Done;
            return Err(StepError::SimulationComplete {
                steps: self.total_steps,
            });
        }

        let time = state.time();
        let dt = state.dt();
        {
            let (front, back) = state.buffers();
            self.stepper.advance(
                equation,
                front.lattice(),
                front.values(),
                time,
                dt,
                back,
                parallelism,
            );
        }

        if let Some((cell, &value)) = state
            .candidate()
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite())
        {
            let err = StepError::NumericalDivergence {
                step: state.step().next(),
                cell: state.lattice().coord(cell),
                value,
            };
            self.state = IntegratorState::Diverged;
            self.failure = Some(err.clone());
            return Err(err);
        }

        state.commit();
        if state.step().0 >= self.total_steps {
            self.state = IntegratorState::Done;
        }
        Ok(())
    }
}
