//! Structured lattice geometry: shape, spacing, per-axis topology and
//! neighbour resolution.

use smallvec::SmallVec;
use tarn_core::{Axis, CellCoord, ConfigError, Dimension, Direction, GridEdge, Topology, MAX_AXES};

/// Configuration of one grid axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisSpec {
    /// Number of cells along the axis. Must be at least 1.
    pub cells: usize,
    /// Physical distance between adjacent cell centres. Must be finite and
    /// positive.
    pub spacing: f64,
    /// Whether the axis has edges or wraps around.
    pub topology: Topology,
}

impl AxisSpec {
    /// A bounded axis.
    pub fn bounded(cells: usize, spacing: f64) -> Self {
        Self {
            cells,
            spacing,
            topology: Topology::Bounded,
        }
    }

    /// A periodic axis.
    pub fn periodic(cells: usize, spacing: f64) -> Self {
        Self {
            cells,
            spacing,
            topology: Topology::Periodic,
        }
    }
}

/// Result of stepping one cell along an axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Neighbor {
    /// The neighbour is on the grid at this flat index.
    Cell(usize),
    /// The step leaves a bounded axis through this edge. Callers must not
    /// index further and should ask the boundary enforcer for a ghost value.
    OffGrid(GridEdge),
}

/// Geometry of a structured 1D, 2D or 3D grid.
///
/// Cells are stored in a flat layout with x varying fastest:
/// `index = x + nx * (y + ny * z)`. Axes beyond the grid dimension are
/// carried internally as single-cell periodic axes so per-axis arrays keep
/// a fixed size, but they are never exposed through [`shape`](Self::shape)
/// or [`boundary_edges`](Self::boundary_edges).
///
/// # Examples
///
/// ```
/// use tarn_core::{Axis, Dimension, Direction, GridEdge};
/// use tarn_grid::{AxisSpec, Lattice, Neighbor};
///
/// let lattice = Lattice::new(
///     Dimension::D2,
///     &[AxisSpec::bounded(4, 1.0), AxisSpec::periodic(3, 0.5)],
/// )
/// .unwrap();
/// assert_eq!(lattice.cell_count(), 12);
///
/// // Bounded x: stepping left from x=0 leaves the grid.
/// assert_eq!(
///     lattice.neighbor(&[0, 1], Axis::X, Direction::Lower),
///     Some(Neighbor::OffGrid(GridEdge::Lx)),
/// );
/// // Periodic y: stepping down from y=0 wraps to y=2.
/// assert_eq!(
///     lattice.neighbor(&[0, 0], Axis::Y, Direction::Lower),
///     Some(Neighbor::Cell(8)),
/// );
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Lattice {
    dimension: Dimension,
    shape: [usize; MAX_AXES],
    spacing: [f64; MAX_AXES],
    topology: [Topology; MAX_AXES],
    strides: [usize; MAX_AXES],
    cell_count: usize,
}

impl Lattice {
    /// Build a lattice from one [`AxisSpec`] per active axis (x, then y,
    /// then z).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the number of specs does not match
    /// `dimension`, an axis has zero cells, a spacing is not finite and
    /// positive, or the total cell count overflows.
    pub fn new(dimension: Dimension, axes: &[AxisSpec]) -> Result<Self, ConfigError> {
        if axes.len() != dimension.ndim() {
            return Err(ConfigError::AxisCountMismatch {
                dimension,
                axes: axes.len(),
            });
        }

        let mut shape = [1usize; MAX_AXES];
        let mut spacing = [1.0f64; MAX_AXES];
        let mut topology = [Topology::Periodic; MAX_AXES];
        for (axis, spec) in dimension.axes().iter().zip(axes) {
            if spec.cells == 0 {
                return Err(ConfigError::InvalidCellCount {
                    axis: *axis,
                    cells: spec.cells,
                });
            }
            if !spec.spacing.is_finite() || spec.spacing <= 0.0 {
                return Err(ConfigError::InvalidSpacing {
                    axis: *axis,
                    spacing: spec.spacing,
                });
            }
            let a = axis.index();
            shape[a] = spec.cells;
            spacing[a] = spec.spacing;
            topology[a] = spec.topology;
        }

        let mut strides = [1usize; MAX_AXES];
        let mut cell_count = 1usize;
        for a in 0..MAX_AXES {
            strides[a] = cell_count;
            cell_count = cell_count
                .checked_mul(shape[a])
                .ok_or(ConfigError::CellCountOverflow)?;
        }

        Ok(Self {
            dimension,
            shape,
            spacing,
            topology,
            strides,
            cell_count,
        })
    }

    /// Build a lattice with the same cell count, spacing and topology on
    /// every active axis.
    pub fn uniform(
        dimension: Dimension,
        cells: usize,
        spacing: f64,
        topology: Topology,
    ) -> Result<Self, ConfigError> {
        let spec = AxisSpec {
            cells,
            spacing,
            topology,
        };
        let axes: SmallVec<[AxisSpec; MAX_AXES]> = (0..dimension.ndim()).map(|_| spec).collect();
        Self::new(dimension, &axes)
    }

    /// Grid dimension.
    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    /// Number of active axes.
    pub fn ndim(&self) -> usize {
        self.dimension.ndim()
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.cell_count
    }

    /// Per-axis cell counts of the active axes.
    pub fn shape(&self) -> CellCoord {
        self.shape[..self.ndim()].iter().copied().collect()
    }

    /// Cell count along `axis` (1 for inactive axes).
    pub fn extent(&self, axis: Axis) -> usize {
        self.shape[axis.index()]
    }

    /// Spacing along `axis`.
    pub fn spacing(&self, axis: Axis) -> f64 {
        self.spacing[axis.index()]
    }

    /// Topology of `axis`.
    pub fn topology(&self, axis: Axis) -> Topology {
        self.topology[axis.index()]
    }

    /// Whether `axis` is one of the grid's active axes.
    pub fn is_active(&self, axis: Axis) -> bool {
        axis.index() < self.ndim()
    }

    /// `true` if `edge` belongs to an active, bounded axis.
    pub fn is_boundary(&self, edge: GridEdge) -> bool {
        let axis = edge.axis();
        self.is_active(axis) && self.topology(axis) == Topology::Bounded
    }

    /// The edges that need boundary conditions, in lx, ux, ly, ... order.
    pub fn boundary_edges(&self) -> impl Iterator<Item = GridEdge> + '_ {
        self.dimension
            .edges()
            .iter()
            .copied()
            .filter(|&edge| self.is_boundary(edge))
    }

    /// Flat index of a multi-index, or `None` if it is out of range or has
    /// the wrong rank.
    pub fn linear_index(&self, coord: &[usize]) -> Option<usize> {
        if coord.len() != self.ndim() {
            return None;
        }
        let mut index = 0;
        for (a, &c) in coord.iter().enumerate() {
            if c >= self.shape[a] {
                return None;
            }
            index += c * self.strides[a];
        }
        Some(index)
    }

    /// Multi-index of a flat index. The caller must pass
    /// `index < cell_count()`.
    pub fn coord(&self, index: usize) -> CellCoord {
        (0..self.ndim())
            .map(|a| (index / self.strides[a]) % self.shape[a])
            .collect()
    }

    /// Position of flat `index` along `axis`.
    #[inline]
    pub fn position(&self, index: usize, axis: Axis) -> usize {
        let a = axis.index();
        (index / self.strides[a]) % self.shape[a]
    }

    /// Resolve the neighbour of a multi-index one step along `axis`.
    ///
    /// Returns `None` if `coord` is not a valid cell or `axis` is not
    /// active.
    pub fn neighbor(&self, coord: &[usize], axis: Axis, direction: Direction) -> Option<Neighbor> {
        if !self.is_active(axis) {
            return None;
        }
        let index = self.linear_index(coord)?;
        Some(self.neighbor_flat(index, axis, direction))
    }

    /// Flat-index variant of [`neighbor`](Self::neighbor) for stencil hot
    /// loops. `index` must be a valid cell.
    #[inline]
    pub fn neighbor_flat(&self, index: usize, axis: Axis, direction: Direction) -> Neighbor {
        let a = axis.index();
        let n = self.shape[a];
        let stride = self.strides[a];
        let pos = (index / stride) % n;
        let periodic = self.topology[a] == Topology::Periodic;
        match direction {
            Direction::Lower => {
                if pos > 0 {
                    Neighbor::Cell(index - stride)
                } else if periodic {
                    Neighbor::Cell(index + (n - 1) * stride)
                } else {
                    Neighbor::OffGrid(axis.edge(direction))
                }
            }
            Direction::Upper => {
                if pos + 1 < n {
                    Neighbor::Cell(index + stride)
                } else if periodic {
                    Neighbor::Cell(index - (n - 1) * stride)
                } else {
                    Neighbor::OffGrid(axis.edge(direction))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use smallvec::smallvec;

    fn line(cells: usize, topology: Topology) -> Lattice {
        Lattice::uniform(Dimension::D1, cells, 1.0, topology).unwrap()
    }

    // ── Construction ────────────────────────────────────────────

    #[test]
    fn rejects_axis_count_mismatch() {
        let result = Lattice::new(Dimension::D2, &[AxisSpec::bounded(4, 1.0)]);
        assert!(matches!(
            result,
            Err(ConfigError::AxisCountMismatch { axes: 1, .. })
        ));
    }

    #[test]
    fn rejects_zero_cells() {
        let result = Lattice::new(
            Dimension::D2,
            &[AxisSpec::bounded(4, 1.0), AxisSpec::bounded(0, 1.0)],
        );
        assert_eq!(
            result,
            Err(ConfigError::InvalidCellCount {
                axis: Axis::Y,
                cells: 0
            })
        );
    }

    #[test]
    fn rejects_bad_spacing() {
        for spacing in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let result = Lattice::new(Dimension::D1, &[AxisSpec::bounded(4, spacing)]);
            assert!(
                matches!(result, Err(ConfigError::InvalidSpacing { axis: Axis::X, .. })),
                "spacing {spacing} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_overflowing_cell_count() {
        let big = AxisSpec::bounded(usize::MAX / 2, 1.0);
        let result = Lattice::new(Dimension::D2, &[big, big]);
        assert_eq!(result, Err(ConfigError::CellCountOverflow));
    }

    #[test]
    fn cell_count_is_product_of_extents() {
        let l = Lattice::new(
            Dimension::D3,
            &[
                AxisSpec::bounded(4, 1.0),
                AxisSpec::bounded(3, 1.0),
                AxisSpec::periodic(2, 1.0),
            ],
        )
        .unwrap();
        assert_eq!(l.cell_count(), 24);
        assert_eq!(l.shape().as_slice(), &[4, 3, 2]);
    }

    // ── Indexing ────────────────────────────────────────────────

    #[test]
    fn linear_index_is_x_fastest() {
        let l = Lattice::uniform(Dimension::D3, 3, 1.0, Topology::Bounded).unwrap();
        assert_eq!(l.linear_index(&[1, 0, 0]), Some(1));
        assert_eq!(l.linear_index(&[0, 1, 0]), Some(3));
        assert_eq!(l.linear_index(&[0, 0, 1]), Some(9));
        assert_eq!(l.linear_index(&[2, 2, 2]), Some(26));
    }

    #[test]
    fn linear_index_rejects_out_of_range_and_wrong_rank() {
        let l = Lattice::uniform(Dimension::D2, 3, 1.0, Topology::Bounded).unwrap();
        assert_eq!(l.linear_index(&[3, 0]), None);
        assert_eq!(l.linear_index(&[0]), None);
        assert_eq!(l.linear_index(&[0, 0, 0]), None);
    }

    #[test]
    fn coord_inverts_linear_index() {
        let l = Lattice::new(
            Dimension::D3,
            &[
                AxisSpec::bounded(4, 1.0),
                AxisSpec::bounded(3, 1.0),
                AxisSpec::bounded(2, 1.0),
            ],
        )
        .unwrap();
        for i in 0..l.cell_count() {
            let c = l.coord(i);
            assert_eq!(l.linear_index(&c), Some(i));
        }
        let expected: CellCoord = smallvec![1, 2, 1];
        assert_eq!(l.coord(1 + 4 * 2 + 12), expected);
    }

    // ── Neighbours ──────────────────────────────────────────────

    #[test]
    fn bounded_line_edges_are_off_grid() {
        let l = line(5, Topology::Bounded);
        assert_eq!(
            l.neighbor(&[0], Axis::X, Direction::Lower),
            Some(Neighbor::OffGrid(GridEdge::Lx))
        );
        assert_eq!(
            l.neighbor(&[4], Axis::X, Direction::Upper),
            Some(Neighbor::OffGrid(GridEdge::Ux))
        );
        assert_eq!(
            l.neighbor(&[2], Axis::X, Direction::Lower),
            Some(Neighbor::Cell(1))
        );
    }

    #[test]
    fn periodic_line_wraps() {
        let l = line(5, Topology::Periodic);
        assert_eq!(l.neighbor(&[0], Axis::X, Direction::Lower), Some(Neighbor::Cell(4)));
        assert_eq!(l.neighbor(&[4], Axis::X, Direction::Upper), Some(Neighbor::Cell(0)));
    }

    #[test]
    fn single_cell_periodic_is_its_own_neighbour() {
        let l = line(1, Topology::Periodic);
        for dir in Direction::BOTH {
            assert_eq!(l.neighbor_flat(0, Axis::X, dir), Neighbor::Cell(0));
        }
    }

    #[test]
    fn single_cell_bounded_has_two_edges() {
        let l = line(1, Topology::Bounded);
        assert_eq!(
            l.neighbor_flat(0, Axis::X, Direction::Lower),
            Neighbor::OffGrid(GridEdge::Lx)
        );
        assert_eq!(
            l.neighbor_flat(0, Axis::X, Direction::Upper),
            Neighbor::OffGrid(GridEdge::Ux)
        );
    }

    #[test]
    fn inactive_axis_neighbour_is_none() {
        let l = line(5, Topology::Bounded);
        assert_eq!(l.neighbor(&[2], Axis::Y, Direction::Upper), None);
    }

    #[test]
    fn mixed_topology_cylinder() {
        // x bounded, y periodic.
        let l = Lattice::new(
            Dimension::D2,
            &[AxisSpec::bounded(3, 1.0), AxisSpec::periodic(4, 1.0)],
        )
        .unwrap();
        let edges: Vec<GridEdge> = l.boundary_edges().collect();
        assert_eq!(edges, vec![GridEdge::Lx, GridEdge::Ux]);
        // (1, 3) upper y wraps to (1, 0) = 1.
        assert_eq!(l.neighbor(&[1, 3], Axis::Y, Direction::Upper), Some(Neighbor::Cell(1)));
    }

    #[test]
    fn boundary_edges_exclude_inactive_axes() {
        let l = Lattice::uniform(Dimension::D2, 3, 1.0, Topology::Bounded).unwrap();
        let edges: Vec<GridEdge> = l.boundary_edges().collect();
        assert_eq!(edges, vec![GridEdge::Lx, GridEdge::Ux, GridEdge::Ly, GridEdge::Uy]);
        assert!(!l.is_boundary(GridEdge::Lz));
    }

    // ── Property tests ──────────────────────────────────────────

    fn arb_topology() -> impl Strategy<Value = Topology> {
        prop_oneof![Just(Topology::Bounded), Just(Topology::Periodic)]
    }

    proptest! {
        #[test]
        fn neighbours_are_symmetric(
            nx in 1usize..7,
            ny in 1usize..7,
            nz in 1usize..5,
            tx in arb_topology(),
            ty in arb_topology(),
            tz in arb_topology(),
        ) {
            let l = Lattice::new(
                Dimension::D3,
                &[
                    AxisSpec { cells: nx, spacing: 1.0, topology: tx },
                    AxisSpec { cells: ny, spacing: 1.0, topology: ty },
                    AxisSpec { cells: nz, spacing: 1.0, topology: tz },
                ],
            ).unwrap();
            for i in 0..l.cell_count() {
                for &axis in l.dimension().axes() {
                    if let Neighbor::Cell(j) = l.neighbor_flat(i, axis, Direction::Upper) {
                        prop_assert_eq!(l.neighbor_flat(j, axis, Direction::Lower), Neighbor::Cell(i));
                    }
                }
            }
        }

        #[test]
        fn neighbours_stay_in_range(
            n in 1usize..10,
            topology in arb_topology(),
        ) {
            let l = Lattice::uniform(Dimension::D2, n, 0.5, topology).unwrap();
            for i in 0..l.cell_count() {
                for &axis in l.dimension().axes() {
                    for dir in Direction::BOTH {
                        match l.neighbor_flat(i, axis, dir) {
                            Neighbor::Cell(j) => prop_assert!(j < l.cell_count()),
                            Neighbor::OffGrid(edge) => {
                                prop_assert_eq!(topology, Topology::Bounded);
                                prop_assert_eq!(edge.axis(), axis);
                                prop_assert_eq!(edge.direction(), dir);
                            }
                        }
                    }
                }
            }
        }
    }
}
