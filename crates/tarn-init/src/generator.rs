//! Field generators compiled from an [`InitialCondition`](crate::InitialCondition).

use std::fmt;

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tarn_core::ConfigError;
use tarn_grid::Grid;

/// A strategy that writes every cell of a grid exactly once.
pub trait FieldGenerator: Send + Sync + fmt::Debug {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Overwrite all of `values`. Random strategies draw one sample per
    /// cell in layout order.
    fn fill(&self, values: &mut [f64], rng: &mut ChaCha8Rng);
}

/// Independent draws from `[min, max)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UniformGenerator {
    /// Inclusive lower bound.
    pub min: f64,
    /// Exclusive upper bound. Must exceed `min`.
    pub max: f64,
}

impl FieldGenerator for UniformGenerator {
    fn name(&self) -> &'static str {
        "random_uniform"
    }

    fn fill(&self, values: &mut [f64], rng: &mut ChaCha8Rng) {
        for v in values.iter_mut() {
            *v = rng.random_range(self.min..self.max);
        }
    }
}

/// Independent normal draws via the Box-Muller transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GaussianGenerator {
    /// Distribution mean.
    pub mean: f64,
    /// Standard deviation.
    pub std_dev: f64,
}

impl GaussianGenerator {
    /// One standard normal sample. Avoids the `rand_distr` dependency.
    fn box_muller(rng: &mut ChaCha8Rng) -> f64 {
        let u1: f64 = rng.random::<f64>().max(1e-300); // avoid ln(0)
        let u2: f64 = rng.random();
        (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
    }
}

impl FieldGenerator for GaussianGenerator {
    fn name(&self) -> &'static str {
        "random_gaussian"
    }

    fn fill(&self, values: &mut [f64], rng: &mut ChaCha8Rng) {
        for v in values.iter_mut() {
            *v = self.mean + self.std_dev * Self::box_muller(rng);
        }
    }
}

/// The same value everywhere.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstantGenerator {
    /// The value.
    pub value: f64,
}

impl FieldGenerator for ConstantGenerator {
    fn name(&self) -> &'static str {
        "constant_value"
    }

    fn fill(&self, values: &mut [f64], _rng: &mut ChaCha8Rng) {
        values.fill(self.value);
    }
}

/// A background with one seeded cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SeedGenerator {
    /// Flat index of the seeded cell.
    pub cell: usize,
    /// Value at the seeded cell.
    pub value: f64,
    /// Value everywhere else.
    pub background: f64,
}

impl FieldGenerator for SeedGenerator {
    fn name(&self) -> &'static str {
        "single_seed"
    }

    fn fill(&self, values: &mut [f64], _rng: &mut ChaCha8Rng) {
        values.fill(self.background);
        if let Some(v) = values.get_mut(self.cell) {
            *v = self.value;
        }
    }
}

/// A validated initial condition bound to one lattice size.
///
/// Built by [`InitialCondition::compile`](crate::InitialCondition::compile).
#[derive(Debug)]
pub struct InitialFieldGenerator {
    strategy: Box<dyn FieldGenerator>,
    cell_count: usize,
}

impl InitialFieldGenerator {
    /// Wrap a strategy for grids of `cell_count` cells.
    pub fn new(strategy: Box<dyn FieldGenerator>, cell_count: usize) -> Self {
        Self {
            strategy,
            cell_count,
        }
    }

    /// Name of the underlying strategy.
    pub fn name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Overwrite every cell of `grid`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidInitialCondition`] if `grid` does not have the
    /// cell count this generator was compiled for. The grid is untouched.
    pub fn fill(&self, grid: &mut Grid, rng: &mut ChaCha8Rng) -> Result<(), ConfigError> {
        let cells = grid.lattice().cell_count();
        if cells != self.cell_count {
            return Err(ConfigError::InvalidInitialCondition {
                reason: format!(
                    "generator compiled for {} cells, grid has {cells}",
                    self.cell_count
                ),
            });
        }
        self.strategy.fill(grid.values_mut(), rng);
        Ok(())
    }
}
