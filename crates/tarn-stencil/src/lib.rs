//! Boundary conditions, stencil operators and source terms for the Tarn
//! field simulator.
//!
//! # Rate evaluation
//!
//! A [`FieldEquation`] computes `f(u, t) = D ∇²u + S(u, t)` for every
//! cell:
//!
//! 1. [`Laplacian`]: central differences over the lattice neighbours.
//!    Accesses that leave a bounded edge go to the [`BoundaryEnforcer`].
//! 2. [`SourceTerm`]: a pointwise reaction term (none by default).
//!
//! Evaluation reads one buffer and writes another, so it can run for any
//! integrator stage, serially or across the rayon pool.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod boundary;
pub mod equation;
pub mod operator;
pub mod source;

pub use boundary::{BoundaryCondition, BoundaryEnforcer, BoundarySpecs};
pub use equation::{FieldEquation, FieldEquationBuilder, Parallelism, PARALLEL_MIN_CELLS};
pub use operator::{Laplacian, SpatialOperator};
pub use source::{LinearSource, NoSource, QuadraticSource, SourceTerm};
