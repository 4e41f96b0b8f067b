//! Spatial operators evaluated cell by cell.

use crate::boundary::BoundaryEnforcer;
use tarn_core::{Axis, Direction, MAX_AXES};
use tarn_grid::{Lattice, Neighbor};

/// A pure stencil-based spatial derivative.
///
/// Implementations read `field` only and return the derivative at `cell`.
/// They never mutate the grid, so they can run for any stage buffer and
/// from several threads at once.
pub trait SpatialOperator: Send + Sync {
    /// Human-readable name for logs.
    fn name(&self) -> &str;

    /// Derivative at flat index `cell`. `field.len()` must equal
    /// `lattice.cell_count()`.
    fn derivative(&self, lattice: &Lattice, field: &[f64], cell: usize) -> f64;
}

/// Second-order central-difference Laplacian.
///
/// Uses the 3-point stencil in 1D, 5-point in 2D and 7-point in 3D:
///
/// ```text
/// ∇²u[i] = Σ_axis (u[i-1] + u[i+1] - 2 u[i]) / h_axis²
/// ```
///
/// Accesses that leave a bounded edge take their value from the
/// [`BoundaryEnforcer`].
///
/// # Examples
///
/// ```
/// use tarn_core::{Dimension, Topology};
/// use tarn_grid::Lattice;
/// use tarn_stencil::{BoundaryCondition, BoundaryEnforcer, BoundarySpecs, Laplacian, SpatialOperator};
///
/// let lattice = Lattice::uniform(Dimension::D1, 3, 1.0, Topology::Bounded).unwrap();
/// let specs = BoundarySpecs::uniform(&lattice, BoundaryCondition::FixedValue(0.0));
/// let op = Laplacian::new(&lattice, BoundaryEnforcer::new(&lattice, &specs).unwrap());
///
/// let field = [1.0, 1.0, 1.0];
/// assert_eq!(op.derivative(&lattice, &field, 0), -1.0);
/// assert_eq!(op.derivative(&lattice, &field, 1), 0.0);
/// ```
#[derive(Clone, Debug)]
pub struct Laplacian {
    enforcer: BoundaryEnforcer,
    inv_h2: [f64; MAX_AXES],
}

impl Laplacian {
    /// Build a Laplacian for `lattice` with the given edge handling.
    pub fn new(lattice: &Lattice, enforcer: BoundaryEnforcer) -> Self {
        let mut inv_h2 = [0.0; MAX_AXES];
        for &axis in lattice.dimension().axes() {
            let h = lattice.spacing(axis);
            inv_h2[axis.index()] = 1.0 / (h * h);
        }
        Self { enforcer, inv_h2 }
    }

    /// The boundary enforcer consulted at bounded edges.
    pub fn enforcer(&self) -> &BoundaryEnforcer {
        &self.enforcer
    }

    /// Number of stencil points for `lattice` (3, 5 or 7).
    pub fn stencil_points(lattice: &Lattice) -> usize {
        2 * lattice.ndim() + 1
    }

    #[inline]
    fn sample(&self, lattice: &Lattice, field: &[f64], cell: usize, axis: Axis, dir: Direction) -> f64 {
        match lattice.neighbor_flat(cell, axis, dir) {
            Neighbor::Cell(j) => field[j],
            Neighbor::OffGrid(edge) => self.enforcer.resolve_ghost(field, cell, edge),
        }
    }
}

impl SpatialOperator for Laplacian {
    fn name(&self) -> &str {
        "laplacian"
    }

    fn derivative(&self, lattice: &Lattice, field: &[f64], cell: usize) -> f64 {
        let u = field[cell];
        let mut acc = 0.0;
        for &axis in lattice.dimension().axes() {
            let lo = self.sample(lattice, field, cell, axis, Direction::Lower);
            let hi = self.sample(lattice, field, cell, axis, Direction::Upper);
            acc += (lo + hi - 2.0 * u) * self.inv_h2[axis.index()];
        }
        acc
    }
}
