//! Initial-condition specifications and their validation.

use std::fmt;

use tarn_core::{CellCoord, ConfigError};
use tarn_grid::Lattice;

use crate::generator::{
    ConstantGenerator, FieldGenerator, GaussianGenerator, InitialFieldGenerator, SeedGenerator,
    UniformGenerator,
};

/// How the field is populated before the first step.
#[derive(Clone, Debug, PartialEq)]
pub enum InitialCondition {
    /// Each cell drawn independently from `[min, max)`.
    RandomUniform {
        /// Inclusive lower bound.
        min: f64,
        /// Exclusive upper bound.
        max: f64,
    },
    /// Each cell drawn independently from `Normal(mean, std_dev)`.
    RandomGaussian {
        /// Distribution mean.
        mean: f64,
        /// Standard deviation; zero gives a constant field.
        std_dev: f64,
    },
    /// Every cell holds the same value.
    Constant(f64),
    /// `background` everywhere except one cell holding `value`.
    SingleSeed {
        /// Multi-index of the seeded cell.
        index: CellCoord,
        /// Value at the seeded cell.
        value: f64,
        /// Value everywhere else.
        background: f64,
    },
}

impl Default for InitialCondition {
    fn default() -> Self {
        Self::Constant(0.0)
    }
}

impl fmt::Display for InitialCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RandomUniform { min, max } => write!(f, "uniform[{min}, {max})"),
            Self::RandomGaussian { mean, std_dev } => write!(f, "gaussian({mean}, {std_dev})"),
            Self::Constant(v) => write!(f, "constant({v})"),
            Self::SingleSeed {
                index,
                value,
                background,
            } => write!(f, "seed({value} at {:?} on {background})", index.as_slice()),
        }
    }
}

fn finite(name: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidInitialCondition {
            reason: format!("{name} must be finite, got {value}"),
        })
    }
}

impl InitialCondition {
    /// Validate against `lattice` without building a generator.
    pub fn validate(&self, lattice: &Lattice) -> Result<(), ConfigError> {
        self.compile(lattice).map(|_| ())
    }

    /// Validate against `lattice` and compile into a generator.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidInitialCondition`] for non-finite
    ///   parameters, `min >= max`, or a negative standard deviation.
    /// - [`ConfigError::SeedOutOfRange`] if the seed index has the wrong
    ///   rank or lies outside the grid.
    pub fn compile(&self, lattice: &Lattice) -> Result<InitialFieldGenerator, ConfigError> {
        let strategy: Box<dyn FieldGenerator> = match *self {
            Self::RandomUniform { min, max } => {
                finite("min", min)?;
                finite("max", max)?;
                if min >= max {
                    return Err(ConfigError::InvalidInitialCondition {
                        reason: format!("uniform range needs min < max, got [{min}, {max})"),
                    });
                }
                if !(max - min).is_finite() {
                    return Err(ConfigError::InvalidInitialCondition {
                        reason: format!("uniform range [{min}, {max}) is too wide"),
                    });
                }
                Box::new(UniformGenerator { min, max })
            }
            Self::RandomGaussian { mean, std_dev } => {
                finite("mean", mean)?;
                finite("std_dev", std_dev)?;
                if std_dev < 0.0 {
                    return Err(ConfigError::InvalidInitialCondition {
                        reason: format!("std_dev must be >= 0, got {std_dev}"),
                    });
                }
                Box::new(GaussianGenerator { mean, std_dev })
            }
            Self::Constant(value) => {
                finite("constant", value)?;
                Box::new(ConstantGenerator { value })
            }
            Self::SingleSeed {
                ref index,
                value,
                background,
            } => {
                finite("seed value", value)?;
                finite("background", background)?;
                let cell = lattice
                    .linear_index(index)
                    .ok_or_else(|| ConfigError::SeedOutOfRange {
                        coord: index.clone(),
                        shape: lattice.shape(),
                    })?;
                Box::new(SeedGenerator {
                    cell,
                    value,
                    background,
                })
            }
        };
        Ok(InitialFieldGenerator::new(strategy, lattice.cell_count()))
    }
}
