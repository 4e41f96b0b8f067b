//! Double-buffered simulation state.

use tarn_core::StepId;
use tarn_grid::{Grid, Lattice};

/// The authoritative field plus a back buffer of the same shape.
///
/// Steppers write the candidate field into the back buffer; only a fully
/// successful step swaps it in. A failed step leaves the front grid,
/// step index and time exactly as they were.
#[derive(Clone, Debug)]
pub struct SimulationState {
    front: Grid,
    back: Grid,
    step: StepId,
    dt: f64,
}

impl SimulationState {
    /// Wrap an initialised grid at step 0.
    pub fn new(grid: Grid, dt: f64) -> Self {
        let back = Grid::new(grid.lattice().clone());
        Self {
            front: grid,
            back,
            step: StepId(0),
            dt,
        }
    }

    /// The current field.
    pub fn grid(&self) -> &Grid {
        &self.front
    }

    /// Grid geometry.
    pub fn lattice(&self) -> &Lattice {
        self.front.lattice()
    }

    /// Steps completed so far.
    pub fn step(&self) -> StepId {
        self.step
    }

    /// The time step.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Simulated time, computed as `step * dt` so it does not drift.
    pub fn time(&self) -> f64 {
        self.step.0 as f64 * self.dt
    }

    /// Borrow the front grid for reading and the back buffer for writing.
    pub(crate) fn buffers(&mut self) -> (&Grid, &mut [f64]) {
        (&self.front, self.back.values_mut())
    }

    /// The candidate field written by the last stepper call.
    pub(crate) fn candidate(&self) -> &[f64] {
        self.back.values()
    }

    /// Promote the back buffer and advance the step counter.
    pub(crate) fn commit(&mut self) {
        std::mem::swap(&mut self.front, &mut self.back);
        self.step = self.step.next();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tarn_core::{Dimension, Topology};

    fn state() -> SimulationState {
        let lattice = Lattice::uniform(Dimension::D1, 3, 1.0, Topology::Periodic).unwrap();
        let grid = Grid::from_values(lattice, vec![1.0, 2.0, 3.0]).unwrap();
        SimulationState::new(grid, 0.25)
    }

    #[test]
    fn starts_at_step_zero() {
        let s = state();
        assert_eq!(s.step(), StepId(0));
        assert_eq!(s.time(), 0.0);
        assert_eq!(s.grid().values(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn commit_swaps_and_advances() {
        let mut s = state();
        {
            let (front, back) = s.buffers();
            for (b, f) in back.iter_mut().zip(front.values()) {
                *b = f * 10.0;
            }
        }
        assert_eq!(s.grid().values(), &[1.0, 2.0, 3.0]);
        s.commit();
        assert_eq!(s.grid().values(), &[10.0, 20.0, 30.0]);
        assert_eq!(s.step(), StepId(1));
        assert_eq!(s.time(), 0.25);
    }

    #[test]
    fn time_is_exact_multiple_of_dt() {
        let lattice = Lattice::uniform(Dimension::D1, 1, 1.0, Topology::Periodic).unwrap();
        let mut s = SimulationState::new(Grid::new(lattice), 0.1);
        for _ in 0..10 {
            s.commit();
        }
        assert_eq!(s.time(), 10.0 * 0.1);
    }
}
