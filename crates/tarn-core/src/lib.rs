//! Core types and traits for the Tarn field simulator.
//!
//! This is the leaf crate with no internal dependencies. It defines the
//! vocabulary used throughout the Tarn workspace: geometry enums (axes,
//! edges, topology), step identifiers, error types, and the read-only
//! snapshot trait handed to output collaborators.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod geometry;
pub mod id;
pub mod traits;

pub use error::{ConfigError, StepError};
pub use geometry::{Axis, Dimension, Direction, GridEdge, Topology, EDGE_COUNT, MAX_AXES};
pub use id::{CellCoord, StepId};
pub use traits::FieldSnapshot;
