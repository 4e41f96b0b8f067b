//! Field storage: a [`Lattice`] plus one `f64` per cell.

use crate::error::GridError;
use crate::lattice::{Lattice, Neighbor};
use tarn_core::{Axis, Direction};

/// A scalar field over a structured lattice.
///
/// The value buffer always holds exactly `lattice.cell_count()` entries in
/// flat layout order (x fastest).
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    lattice: Lattice,
    values: Vec<f64>,
}

impl Grid {
    /// A zero-filled grid over `lattice`.
    pub fn new(lattice: Lattice) -> Self {
        let values = vec![0.0; lattice.cell_count()];
        Self { lattice, values }
    }

    /// A grid over `lattice` with the given values.
    pub fn from_values(lattice: Lattice, values: Vec<f64>) -> Result<Self, GridError> {
        if values.len() != lattice.cell_count() {
            return Err(GridError::LengthMismatch {
                expected: lattice.cell_count(),
                actual: values.len(),
            });
        }
        Ok(Self { lattice, values })
    }

    /// The grid's geometry.
    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    /// Value at a multi-index, or `None` if it is out of bounds.
    pub fn get(&self, coord: &[usize]) -> Option<f64> {
        self.lattice.linear_index(coord).map(|i| self.values[i])
    }

    /// Overwrite the value at a multi-index.
    pub fn set(&mut self, coord: &[usize], value: f64) -> Result<(), GridError> {
        let i = self
            .lattice
            .linear_index(coord)
            .ok_or_else(|| GridError::CoordOutOfBounds {
                coord: coord.iter().copied().collect(),
                shape: self.lattice.shape(),
            })?;
        self.values[i] = value;
        Ok(())
    }

    /// Resolve a neighbour. See [`Lattice::neighbor`].
    pub fn neighbor(&self, coord: &[usize], axis: Axis, direction: Direction) -> Option<Neighbor> {
        self.lattice.neighbor(coord, axis, direction)
    }

    /// All values in flat layout order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Mutable access to all values. The length cannot change through a
    /// slice, so the buffer invariant holds.
    pub fn values_mut(&mut self) -> &mut [f64] {
        &mut self.values
    }

    /// Set every cell to `value`.
    pub fn fill(&mut self, value: f64) {
        self.values.fill(value);
    }

    /// Arithmetic mean over all cells.
    pub fn mean(&self) -> f64 {
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }

    /// Smallest and largest value. NaN cells are skipped.
    pub fn min_max(&self) -> (f64, f64) {
        self.values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }

    /// Swap the value buffer with `other` in O(1).
    ///
    /// Used for double buffering: the caller computes the next field into
    /// `other`, then swaps it in. On a length mismatch nothing is swapped.
    pub fn swap_values(&mut self, other: &mut Vec<f64>) -> Result<(), GridError> {
        if other.len() != self.values.len() {
            return Err(GridError::LengthMismatch {
                expected: self.values.len(),
                actual: other.len(),
            });
        }
        std::mem::swap(&mut self.values, other);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::AxisSpec;
    use tarn_core::{Dimension, GridEdge, Topology};

    fn plane() -> Grid {
        let lattice = Lattice::new(
            Dimension::D2,
            &[AxisSpec::bounded(3, 1.0), AxisSpec::bounded(2, 1.0)],
        )
        .unwrap();
        Grid::new(lattice)
    }

    #[test]
    fn new_grid_is_zeroed() {
        let g = plane();
        assert_eq!(g.values().len(), 6);
        assert!(g.values().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn set_then_get() {
        let mut g = plane();
        g.set(&[2, 1], 4.5).unwrap();
        assert_eq!(g.get(&[2, 1]), Some(4.5));
        assert_eq!(g.values()[5], 4.5);
    }

    #[test]
    fn set_out_of_bounds_fails_without_mutation() {
        let mut g = plane();
        let err = g.set(&[3, 0], 1.0).unwrap_err();
        assert!(matches!(err, GridError::CoordOutOfBounds { .. }));
        assert!(err.to_string().contains("[3, 0]"));
        assert!(g.values().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn get_wrong_rank_is_none() {
        let g = plane();
        assert_eq!(g.get(&[0]), None);
    }

    #[test]
    fn from_values_checks_length() {
        let lattice = Lattice::uniform(Dimension::D1, 4, 1.0, Topology::Periodic).unwrap();
        let err = Grid::from_values(lattice.clone(), vec![1.0; 3]).unwrap_err();
        assert_eq!(
            err,
            GridError::LengthMismatch {
                expected: 4,
                actual: 3
            }
        );
        assert!(Grid::from_values(lattice, vec![1.0; 4]).is_ok());
    }

    #[test]
    fn mean_and_min_max() {
        let lattice = Lattice::uniform(Dimension::D1, 4, 1.0, Topology::Bounded).unwrap();
        let g = Grid::from_values(lattice, vec![1.0, -2.0, 3.0, 6.0]).unwrap();
        assert!((g.mean() - 2.0).abs() < 1e-12);
        assert_eq!(g.min_max(), (-2.0, 6.0));
    }

    #[test]
    fn swap_values_exchanges_buffers() {
        let mut g = plane();
        let mut back = vec![7.0; 6];
        g.swap_values(&mut back).unwrap();
        assert!(g.values().iter().all(|&v| v == 7.0));
        assert!(back.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn swap_values_rejects_wrong_length() {
        let mut g = plane();
        let mut back = vec![7.0; 5];
        assert!(g.swap_values(&mut back).is_err());
        assert!(g.values().iter().all(|&v| v == 0.0));
        assert_eq!(back.len(), 5);
    }

    #[test]
    fn neighbor_delegates_to_lattice() {
        let g = plane();
        assert_eq!(
            g.neighbor(&[0, 0], Axis::Y, Direction::Lower),
            Some(Neighbor::OffGrid(GridEdge::Ly))
        );
    }
}
