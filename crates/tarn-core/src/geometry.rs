//! Geometry vocabulary shared by every Tarn crate.
//!
//! Dimensions, axes, stencil directions, per-axis topology and the named
//! grid edges. All of these are small `Copy` enums with stable `index()`
//! values so that per-axis and per-edge configuration can live in
//! fixed-size arrays instead of maps.

use std::fmt;

/// Maximum number of spatial axes supported by a grid.
pub const MAX_AXES: usize = 3;

/// Number of named grid edges (two per axis).
pub const EDGE_COUNT: usize = 2 * MAX_AXES;

/// Dimensionality of the simulation domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dimension {
    /// A line of cells.
    D1,
    /// A rectangular sheet of cells.
    D2,
    /// A rectangular block of cells.
    D3,
}

impl Dimension {
    /// Number of active axes.
    pub fn ndim(self) -> usize {
        match self {
            Self::D1 => 1,
            Self::D2 => 2,
            Self::D3 => 3,
        }
    }

    /// The active axes, in x, y, z order.
    pub fn axes(self) -> &'static [Axis] {
        &Axis::ALL[..self.ndim()]
    }

    /// The edges of every active axis, in lx, ux, ly, uy, lz, uz order.
    pub fn edges(self) -> &'static [GridEdge] {
        &GridEdge::ALL[..2 * self.ndim()]
    }

    /// Dimension with `ndim` axes, if supported.
    pub fn from_ndim(ndim: usize) -> Option<Self> {
        match ndim {
            1 => Some(Self::D1),
            2 => Some(Self::D2),
            3 => Some(Self::D3),
            _ => None,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d", self.ndim())
    }
}

/// A spatial axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    /// First axis; varies fastest in the flat layout.
    X,
    /// Second axis.
    Y,
    /// Third axis; varies slowest in the flat layout.
    Z,
}

impl Axis {
    /// All axes in layout order.
    pub const ALL: [Axis; MAX_AXES] = [Axis::X, Axis::Y, Axis::Z];

    /// Position of this axis in per-axis arrays.
    pub fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }

    /// The edge this axis exits through when stepping in `direction`.
    pub fn edge(self, direction: Direction) -> GridEdge {
        match (self, direction) {
            (Self::X, Direction::Lower) => GridEdge::Lx,
            (Self::X, Direction::Upper) => GridEdge::Ux,
            (Self::Y, Direction::Lower) => GridEdge::Ly,
            (Self::Y, Direction::Upper) => GridEdge::Uy,
            (Self::Z, Direction::Lower) => GridEdge::Lz,
            (Self::Z, Direction::Upper) => GridEdge::Uz,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
        };
        f.write_str(name)
    }
}

/// Direction of a one-cell stencil step along an axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards index 0.
    Lower,
    /// Towards index `extent - 1`.
    Upper,
}

impl Direction {
    /// Both directions, lower first.
    pub const BOTH: [Direction; 2] = [Direction::Lower, Direction::Upper];
}

/// Topology of a single axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Topology {
    /// The axis has two true edges; off-grid stencil reads are resolved
    /// by the boundary enforcer.
    #[default]
    Bounded,
    /// The axis wraps around; its edges are not boundaries.
    Periodic,
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bounded => f.write_str("bounded"),
            Self::Periodic => f.write_str("periodic"),
        }
    }
}

/// A named edge of the grid: lower/upper face of each axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GridEdge {
    /// Lower x edge (x index 0).
    Lx,
    /// Upper x edge.
    Ux,
    /// Lower y edge.
    Ly,
    /// Upper y edge.
    Uy,
    /// Lower z edge.
    Lz,
    /// Upper z edge.
    Uz,
}

impl GridEdge {
    /// All edges in per-edge array order.
    pub const ALL: [GridEdge; EDGE_COUNT] = [
        GridEdge::Lx,
        GridEdge::Ux,
        GridEdge::Ly,
        GridEdge::Uy,
        GridEdge::Lz,
        GridEdge::Uz,
    ];

    /// Position of this edge in per-edge arrays.
    pub fn index(self) -> usize {
        match self {
            Self::Lx => 0,
            Self::Ux => 1,
            Self::Ly => 2,
            Self::Uy => 3,
            Self::Lz => 4,
            Self::Uz => 5,
        }
    }

    /// The axis this edge terminates.
    pub fn axis(self) -> Axis {
        match self {
            Self::Lx | Self::Ux => Axis::X,
            Self::Ly | Self::Uy => Axis::Y,
            Self::Lz | Self::Uz => Axis::Z,
        }
    }

    /// Which end of the axis this edge sits on.
    pub fn direction(self) -> Direction {
        match self {
            Self::Lx | Self::Ly | Self::Lz => Direction::Lower,
            Self::Ux | Self::Uy | Self::Uz => Direction::Upper,
        }
    }

    /// `true` for lx, ly, lz.
    pub fn is_lower(self) -> bool {
        self.direction() == Direction::Lower
    }
}

impl fmt::Display for GridEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Lx => "lx",
            Self::Ux => "ux",
            Self::Ly => "ly",
            Self::Uy => "uy",
            Self::Lz => "lz",
            Self::Uz => "uz",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimension_axes_and_edges() {
        assert_eq!(Dimension::D1.axes(), &[Axis::X]);
        assert_eq!(Dimension::D2.edges(), &[GridEdge::Lx, GridEdge::Ux, GridEdge::Ly, GridEdge::Uy]);
        assert_eq!(Dimension::D3.edges().len(), 6);
        assert_eq!(Dimension::from_ndim(2), Some(Dimension::D2));
        assert_eq!(Dimension::from_ndim(4), None);
    }

    #[test]
    fn edge_axis_direction_round_trip() {
        for edge in GridEdge::ALL {
            assert_eq!(edge.axis().edge(edge.direction()), edge);
            assert_eq!(GridEdge::ALL[edge.index()], edge);
        }
    }

    #[test]
    fn lower_edges_are_even_indices() {
        for edge in GridEdge::ALL {
            assert_eq!(edge.is_lower(), edge.index() % 2 == 0, "{edge}");
        }
    }

    #[test]
    fn display_names() {
        assert_eq!(GridEdge::Uy.to_string(), "uy");
        assert_eq!(Axis::Z.to_string(), "z");
        assert_eq!(Dimension::D3.to_string(), "3d");
        assert_eq!(Topology::Periodic.to_string(), "periodic");
    }
}
