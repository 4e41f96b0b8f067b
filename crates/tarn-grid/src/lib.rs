//! Structured lattices and field storage for the Tarn field simulator.
//!
//! [`Lattice`] describes the geometry of a 1D, 2D or 3D grid: per-axis cell
//! counts, spacing and topology, with neighbour resolution that either wraps
//! (periodic axes) or reports the edge being crossed (bounded axes).
//! [`Grid`] pairs a lattice with one `f64` value per cell.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod grid;
pub mod lattice;

pub use error::GridError;
pub use grid::Grid;
pub use lattice::{AxisSpec, Lattice, Neighbor};
