//! Boundary conditions on bounded grid edges.
//!
//! A [`BoundarySpecs`] table holds at most one [`BoundaryCondition`] per
//! [`GridEdge`]. [`BoundaryEnforcer::new`] validates the table against a
//! [`Lattice`] and compiles each condition into a ghost rule with the
//! edge spacing already folded in, so stencils pay a single match per
//! off-grid access.

use tarn_core::{ConfigError, GridEdge, EDGE_COUNT};
use tarn_grid::{Lattice, Neighbor};

/// What happens one cell beyond a bounded edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BoundaryCondition {
    /// Zero gradient: the ghost mirrors the interior value.
    Floating,
    /// Dirichlet: the ghost holds this constant.
    FixedValue(f64),
    /// Neumann: the gradient along the positive axis direction across the
    /// edge equals this value.
    FixedFlux(f64),
}

impl BoundaryCondition {
    fn parameter(self) -> Option<f64> {
        match self {
            Self::Floating => None,
            Self::FixedValue(v) | Self::FixedFlux(v) => Some(v),
        }
    }
}

/// Per-edge boundary condition table.
///
/// # Examples
///
/// ```
/// use tarn_core::GridEdge;
/// use tarn_stencil::{BoundaryCondition, BoundarySpecs};
///
/// let specs = BoundarySpecs::new()
///     .with(GridEdge::Lx, BoundaryCondition::FixedValue(1.0))
///     .with(GridEdge::Ux, BoundaryCondition::Floating);
/// assert_eq!(specs.get(GridEdge::Lx), Some(BoundaryCondition::FixedValue(1.0)));
/// assert_eq!(specs.get(GridEdge::Ly), None);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoundarySpecs {
    edges: [Option<BoundaryCondition>; EDGE_COUNT],
}

impl BoundarySpecs {
    /// An empty table. Valid as-is only for fully periodic grids.
    pub fn new() -> Self {
        Self::default()
    }

    /// The same condition on every boundary edge of `lattice`.
    pub fn uniform(lattice: &Lattice, condition: BoundaryCondition) -> Self {
        let mut specs = Self::new();
        for edge in lattice.boundary_edges() {
            specs.set(edge, condition);
        }
        specs
    }

    /// Set the condition on `edge`, replacing any previous one.
    pub fn set(&mut self, edge: GridEdge, condition: BoundaryCondition) {
        self.edges[edge.index()] = Some(condition);
    }

    /// Remove the condition on `edge`.
    pub fn clear(&mut self, edge: GridEdge) {
        self.edges[edge.index()] = None;
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, edge: GridEdge, condition: BoundaryCondition) -> Self {
        self.set(edge, condition);
        self
    }

    /// The condition on `edge`, if any.
    pub fn get(&self, edge: GridEdge) -> Option<BoundaryCondition> {
        self.edges[edge.index()]
    }
}

/// Compiled ghost-value rule for one edge.
#[derive(Clone, Copy, Debug, PartialEq)]
enum GhostRule {
    Mirror,
    Value(f64),
    /// Interior value plus a signed offset (`±flux * h`).
    Offset(f64),
}

/// Supplies ghost values for stencil accesses that leave a bounded edge.
///
/// Ghosts are computed from the current field on every call; nothing is
/// cached between stages or steps.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundaryEnforcer {
    conditions: [Option<BoundaryCondition>; EDGE_COUNT],
    rules: [Option<GhostRule>; EDGE_COUNT],
    spacing: [f64; EDGE_COUNT],
}

impl BoundaryEnforcer {
    /// Validate `specs` against `lattice` and compile the ghost rules.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingBoundary`] if a bounded edge has no spec.
    /// - [`ConfigError::UnexpectedBoundary`] if a periodic edge, or an edge
    ///   of an axis the grid does not have, carries a spec.
    /// - [`ConfigError::InvalidBoundaryParameter`] for a non-finite value
    ///   or flux.
    pub fn new(lattice: &Lattice, specs: &BoundarySpecs) -> Result<Self, ConfigError> {
        let mut rules = [None; EDGE_COUNT];
        let mut spacing = [1.0; EDGE_COUNT];
        for edge in GridEdge::ALL {
            let spec = specs.get(edge);
            if !lattice.is_boundary(edge) {
                if spec.is_some() {
                    return Err(ConfigError::UnexpectedBoundary { edge });
                }
                continue;
            }
            let condition = spec.ok_or(ConfigError::MissingBoundary { edge })?;
            if let Some(value) = condition.parameter() {
                if !value.is_finite() {
                    return Err(ConfigError::InvalidBoundaryParameter { edge, value });
                }
            }
            let h = lattice.spacing(edge.axis());
            spacing[edge.index()] = h;
            rules[edge.index()] = Some(match condition {
                BoundaryCondition::Floating => GhostRule::Mirror,
                BoundaryCondition::FixedValue(v) => GhostRule::Value(v),
                BoundaryCondition::FixedFlux(q) if edge.is_lower() => GhostRule::Offset(-q * h),
                BoundaryCondition::FixedFlux(q) => GhostRule::Offset(q * h),
            });
        }
        Ok(Self {
            conditions: specs.edges,
            rules,
            spacing,
        })
    }

    /// The configured condition on `edge`, or `None` for non-boundary edges.
    pub fn condition(&self, edge: GridEdge) -> Option<BoundaryCondition> {
        self.conditions[edge.index()]
    }

    /// Value of the ghost cell one spacing beyond `interior` across `edge`.
    ///
    /// `interior` is the flat index of the cell adjacent to the edge. Edges
    /// without a compiled rule mirror the interior value; the stencil never
    /// reaches them because periodic axes wrap before leaving the grid.
    #[inline]
    pub fn resolve_ghost(&self, field: &[f64], interior: usize, edge: GridEdge) -> f64 {
        let u = field[interior];
        match self.rules[edge.index()] {
            Some(GhostRule::Value(v)) => v,
            Some(GhostRule::Offset(d)) => u + d,
            Some(GhostRule::Mirror) | None => u,
        }
    }

    /// One-sided discrete gradient across `edge` at `interior`, taken along
    /// the positive axis direction: `(upper - lower) / h`.
    ///
    /// Returns `None` if `edge` is not a boundary edge of `lattice` or
    /// `interior` does not sit on it.
    pub fn edge_gradient(
        &self,
        lattice: &Lattice,
        field: &[f64],
        interior: usize,
        edge: GridEdge,
    ) -> Option<f64> {
        self.rules[edge.index()]?;
        if interior >= lattice.cell_count() {
            return None;
        }
        match lattice.neighbor_flat(interior, edge.axis(), edge.direction()) {
            Neighbor::OffGrid(e) if e == edge => {}
            _ => return None,
        }
        let ghost = self.resolve_ghost(field, interior, edge);
        let h = self.spacing[edge.index()];
        let u = field[interior];
        Some(if edge.is_lower() {
            (u - ghost) / h
        } else {
            (ghost - u) / h
        })
    }
}
