//! Initial field generators for the Tarn field simulator.
//!
//! An [`InitialCondition`] is validated against a lattice once, producing an
//! [`InitialFieldGenerator`] that fills a [`Grid`](tarn_grid::Grid) from an
//! explicitly passed ChaCha8 generator. Identical seeds give bit-identical
//! fields.
//!
//! ```
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//! use tarn_core::{Dimension, Topology};
//! use tarn_grid::{Grid, Lattice};
//! use tarn_init::InitialCondition;
//!
//! let lattice = Lattice::uniform(Dimension::D2, 16, 1.0, Topology::Periodic).unwrap();
//! let generator = InitialCondition::RandomUniform { min: 0.0, max: 1.0 }
//!     .compile(&lattice)
//!     .unwrap();
//!
//! let mut grid = Grid::new(lattice);
//! generator.fill(&mut grid, &mut ChaCha8Rng::seed_from_u64(7)).unwrap();
//! assert!(grid.values().iter().all(|v| (0.0..1.0).contains(v)));
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod condition;
pub mod generator;

pub use condition::InitialCondition;
pub use generator::{
    ConstantGenerator, FieldGenerator, GaussianGenerator, InitialFieldGenerator, SeedGenerator,
    UniformGenerator,
};
