//! Explicit time steppers.
//!
//! A [`TimeStepper`] maps `u(t)` to a candidate `u(t + dt)` using a
//! [`FieldEquation`] for the rate `f(u, t)`. Stage buffers are allocated
//! once at construction and reused every step.

use rayon::prelude::*;
use tarn_grid::Lattice;
use tarn_stencil::{FieldEquation, Parallelism, PARALLEL_MIN_CELLS};

use crate::config::IntegrationMethod;

/// One explicit integration scheme.
pub trait TimeStepper: Send {
    /// The scheme this stepper implements.
    fn method(&self) -> IntegrationMethod;

    /// Full-grid rate evaluations per step.
    fn stages(&self) -> u32;

    /// Write the candidate `u(time + dt)` into `next`.
    ///
    /// `current` is never modified. `next` is fully overwritten.
    fn advance(
        &mut self,
        equation: &FieldEquation,
        lattice: &Lattice,
        current: &[f64],
        time: f64,
        dt: f64,
        next: &mut [f64],
        parallelism: Parallelism,
    );
}

impl IntegrationMethod {
    /// Build the stepper for this method over `cells` cells.
    pub fn stepper(self, cells: usize) -> Box<dyn TimeStepper> {
        match self {
            Self::Euler => Box::new(EulerStepper),
            Self::RungeKutta => Box::new(RungeKuttaStepper::new(cells)),
        }
    }
}

/// Elementwise `out[i] = f(i, out[i])`, split across rayon when asked.
fn for_each_cell<F>(out: &mut [f64], parallelism: Parallelism, f: F)
where
    F: Fn(usize, &mut f64) + Sync + Send,
{
    match parallelism {
        Parallelism::Threaded if out.len() >= PARALLEL_MIN_CELLS => {
            out.par_iter_mut().enumerate().for_each(|(i, o)| f(i, o));
        }
        _ => out.iter_mut().enumerate().for_each(|(i, o)| f(i, o)),
    }
}

// ── Euler ──────────────────────────────────────────────────────────

/// Forward Euler: `u' = u + dt f(u, t)`.
///
/// The rate is evaluated straight into `next` and then combined in place,
/// so no extra buffer is needed.
#[derive(Clone, Copy, Debug, Default)]
pub struct EulerStepper;

impl TimeStepper for EulerStepper {
    fn method(&self) -> IntegrationMethod {
        IntegrationMethod::Euler
    }

    fn stages(&self) -> u32 {
        1
    }

    fn advance(
        &mut self,
        equation: &FieldEquation,
        lattice: &Lattice,
        current: &[f64],
        time: f64,
        dt: f64,
        next: &mut [f64],
        parallelism: Parallelism,
    ) {
        equation.evaluate_into(lattice, current, time, next, parallelism);
        for_each_cell(next, parallelism, |i, v| *v = current[i] + dt * *v);
    }
}

// ── Runge-Kutta ────────────────────────────────────────────────────

/// Classical fourth-order Runge-Kutta.
///
/// ```text
/// k1 = f(u, t)
/// k2 = f(u + dt/2 k1, t + dt/2)
/// k3 = f(u + dt/2 k2, t + dt/2)
/// k4 = f(u + dt k3,   t + dt)
/// u' = u + dt/6 (k1 + 2 k2 + 2 k3 + k4)
/// ```
///
/// Every stage has its own rate buffer; the intermediate field shares one
/// scratch buffer. Buffers are resized if a step sees a different cell
/// count than the stepper was built for.
#[derive(Clone, Debug)]
pub struct RungeKuttaStepper {
    k: [Vec<f64>; 4],
    stage: Vec<f64>,
}

impl RungeKuttaStepper {
    /// Allocate stage buffers for `cells` cells.
    pub fn new(cells: usize) -> Self {
        Self {
            k: std::array::from_fn(|_| vec![0.0; cells]),
            stage: vec![0.0; cells],
        }
    }

    /// Number of cells the buffers are currently sized for.
    pub fn cells(&self) -> usize {
        self.stage.len()
    }

    fn fit(&mut self, cells: usize) {
        if self.cells() != cells {
            for k in &mut self.k {
                k.resize(cells, 0.0);
            }
            self.stage.resize(cells, 0.0);
        }
    }
}

impl TimeStepper for RungeKuttaStepper {
    fn method(&self) -> IntegrationMethod {
        IntegrationMethod::RungeKutta
    }

    fn stages(&self) -> u32 {
        4
    }

    fn advance(
        &mut self,
        equation: &FieldEquation,
        lattice: &Lattice,
        current: &[f64],
        time: f64,
        dt: f64,
        next: &mut [f64],
        parallelism: Parallelism,
    ) {
        self.fit(current.len());
        let half = 0.5 * dt;
        let [k1, k2, k3, k4] = &mut self.k;
        let stage = &mut self.stage;

        equation.evaluate_into(lattice, current, time, k1, parallelism);

        for_each_cell(stage, parallelism, |i, s| *s = current[i] + half * k1[i]);
        equation.evaluate_into(lattice, stage, time + half, k2, parallelism);

        for_each_cell(stage, parallelism, |i, s| *s = current[i] + half * k2[i]);
        equation.evaluate_into(lattice, stage, time + half, k3, parallelism);

        for_each_cell(stage, parallelism, |i, s| *s = current[i] + dt * k3[i]);
        equation.evaluate_into(lattice, stage, time + dt, k4, parallelism);

        let sixth = dt / 6.0;
        for_each_cell(next, parallelism, |i, v| {
            *v = current[i] + sixth * (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tarn_core::{Dimension, Topology};
    use tarn_stencil::{BoundaryEnforcer, BoundarySpecs, Laplacian, LinearSource};

    /// Single periodic cell: the Laplacian vanishes and only the source acts.
    fn ode(rate: f64) -> (Lattice, FieldEquation) {
        let l = Lattice::uniform(Dimension::D1, 1, 1.0, Topology::Periodic).unwrap();
        let enforcer = BoundaryEnforcer::new(&l, &BoundarySpecs::new()).unwrap();
        let eq = FieldEquation::builder()
            .operator(Laplacian::new(&l, enforcer))
            .source(LinearSource { rate })
            .build()
            .unwrap();
        (l, eq)
    }

    fn integrate(stepper: &mut dyn TimeStepper, dt: f64, steps: usize) -> f64 {
        let (l, eq) = ode(1.0);
        let mut u = vec![1.0];
        let mut next = vec![0.0];
        for n in 0..steps {
            stepper.advance(&eq, &l, &u, n as f64 * dt, dt, &mut next, Parallelism::Serial);
            std::mem::swap(&mut u, &mut next);
        }
        u[0]
    }

    #[test]
    fn euler_single_step() {
        let (l, eq) = ode(2.0);
        let mut next = vec![0.0];
        EulerStepper.advance(&eq, &l, &[1.0], 0.0, 0.1, &mut next, Parallelism::Serial);
        assert!((next[0] - 1.2).abs() < 1e-15);
    }

    #[test]
    fn rk4_single_step_matches_taylor() {
        // For du/dt = u, one RK4 step is the 4th-order Taylor polynomial.
        let (l, eq) = ode(1.0);
        let mut next = vec![0.0];
        let dt = 0.1f64;
        RungeKuttaStepper::new(1).advance(&eq, &l, &[1.0], 0.0, dt, &mut next, Parallelism::Serial);
        let taylor = 1.0 + dt + dt.powi(2) / 2.0 + dt.powi(3) / 6.0 + dt.powi(4) / 24.0;
        assert!((next[0] - taylor).abs() < 1e-14);
    }

    #[test]
    fn euler_is_first_order() {
        let exact = 1.0f64.exp();
        let coarse = (integrate(&mut EulerStepper, 0.1, 10) - exact).abs();
        let fine = (integrate(&mut EulerStepper, 0.05, 20) - exact).abs();
        let ratio = coarse / fine;
        assert!((1.8..2.2).contains(&ratio), "ratio {ratio}");
    }

    #[test]
    fn rk4_is_fourth_order() {
        let exact = 1.0f64.exp();
        let coarse = (integrate(&mut RungeKuttaStepper::new(1), 0.1, 10) - exact).abs();
        let fine = (integrate(&mut RungeKuttaStepper::new(1), 0.05, 20) - exact).abs();
        let ratio = coarse / fine;
        assert!((14.0..18.0).contains(&ratio), "ratio {ratio}");
    }

    #[test]
    fn current_is_not_modified() {
        let (l, eq) = ode(-1.0);
        let current = vec![3.0];
        let mut next = vec![0.0];
        RungeKuttaStepper::new(1).advance(&eq, &l, &current, 0.0, 0.5, &mut next, Parallelism::Serial);
        assert_eq!(current, vec![3.0]);
        assert!(next[0] < 3.0);
    }

    #[test]
    fn rk4_grows_undersized_buffers() {
        let l = Lattice::uniform(Dimension::D1, 4, 1.0, Topology::Periodic).unwrap();
        let enforcer = BoundaryEnforcer::new(&l, &BoundarySpecs::new()).unwrap();
        let eq = FieldEquation::builder()
            .operator(Laplacian::new(&l, enforcer))
            .source(LinearSource { rate: 0.5 })
            .build()
            .unwrap();
        let current = [1.0, 2.0, 3.0, 4.0];

        let mut sized = RungeKuttaStepper::new(4);
        let mut expected = [0.0; 4];
        sized.advance(&eq, &l, &current, 0.0, 0.1, &mut expected, Parallelism::Serial);

        let mut small = RungeKuttaStepper::new(1);
        let mut next = [0.0; 4];
        small.advance(&eq, &l, &current, 0.0, 0.1, &mut next, Parallelism::Serial);
        assert_eq!(small.cells(), 4);
        assert_eq!(next, expected);
    }

    #[test]
    fn method_reports_stages() {
        assert_eq!(IntegrationMethod::Euler.stepper(4).stages(), 1);
        let rk = IntegrationMethod::RungeKutta.stepper(4);
        assert_eq!(rk.stages(), 4);
        assert_eq!(rk.method(), IntegrationMethod::RungeKutta);
    }
}
