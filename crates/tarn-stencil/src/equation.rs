//! The field equation `du/dt = D ∇²u + S(u, t)` and its rate evaluation.

use std::fmt;

use rayon::prelude::*;
use tarn_grid::Lattice;

use crate::operator::SpatialOperator;
use crate::source::{NoSource, SourceTerm};

/// Below this many cells a threaded evaluation runs serially; the rayon
/// fork/join cost dominates on small grids.
pub const PARALLEL_MIN_CELLS: usize = 4096;

/// How a rate evaluation spreads over cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Parallelism {
    /// One thread, cells in layout order.
    #[default]
    Serial,
    /// Cells split across the rayon global pool when the grid has at least
    /// [`PARALLEL_MIN_CELLS`] cells.
    Threaded,
}

/// Right-hand side of the field equation.
///
/// Each evaluation reads one input buffer and writes a separate output
/// buffer. Cells are independent, so the threaded path produces exactly the
/// same values as the serial one.
///
/// # Construction
///
/// ```
/// use tarn_core::{Dimension, Topology};
/// use tarn_grid::Lattice;
/// use tarn_stencil::{BoundaryEnforcer, BoundarySpecs, FieldEquation, Laplacian, LinearSource};
///
/// let lattice = Lattice::uniform(Dimension::D2, 8, 1.0, Topology::Periodic).unwrap();
/// let enforcer = BoundaryEnforcer::new(&lattice, &BoundarySpecs::new()).unwrap();
/// let eq = FieldEquation::builder()
///     .operator(Laplacian::new(&lattice, enforcer))
///     .diffusion(0.1)
///     .source(LinearSource { rate: -1.0 })
///     .build()
///     .unwrap();
/// assert_eq!(eq.diffusion(), 0.1);
/// ```
pub struct FieldEquation {
    diffusion: f64,
    operator: Box<dyn SpatialOperator>,
    source: Box<dyn SourceTerm>,
}

impl fmt::Debug for FieldEquation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldEquation")
            .field("diffusion", &self.diffusion)
            .field("operator", &self.operator.name())
            .finish_non_exhaustive()
    }
}

impl FieldEquation {
    /// Create a new builder.
    pub fn builder() -> FieldEquationBuilder {
        FieldEquationBuilder {
            diffusion: 1.0,
            operator: None,
            source: None,
        }
    }

    /// Diffusion coefficient `D`.
    pub fn diffusion(&self) -> f64 {
        self.diffusion
    }

    /// The spatial operator.
    pub fn operator(&self) -> &dyn SpatialOperator {
        self.operator.as_ref()
    }

    /// Rate of change at one cell.
    #[inline]
    pub fn rate_at(&self, lattice: &Lattice, field: &[f64], cell: usize, time: f64) -> f64 {
        let spatial = if self.diffusion == 0.0 {
            0.0
        } else {
            self.diffusion * self.operator.derivative(lattice, field, cell)
        };
        spatial + self.source.rate(field[cell], time)
    }

    /// Evaluate `f(field, time)` into `out`, one value per cell.
    ///
    /// `field` and `out` must both hold `lattice.cell_count()` values.
    pub fn evaluate_into(
        &self,
        lattice: &Lattice,
        field: &[f64],
        time: f64,
        out: &mut [f64],
        parallelism: Parallelism,
    ) {
        debug_assert_eq!(field.len(), lattice.cell_count());
        debug_assert_eq!(out.len(), field.len());
        match parallelism {
            Parallelism::Threaded if out.len() >= PARALLEL_MIN_CELLS => {
                out.par_iter_mut().enumerate().for_each(|(i, o)| {
                    *o = self.rate_at(lattice, field, i, time);
                });
            }
            _ => {
                for (i, o) in out.iter_mut().enumerate() {
                    *o = self.rate_at(lattice, field, i, time);
                }
            }
        }
    }
}

/// Builder for [`FieldEquation`].
///
/// Required: `operator`. Defaults: diffusion 1.0, no source.
pub struct FieldEquationBuilder {
    diffusion: f64,
    operator: Option<Box<dyn SpatialOperator>>,
    source: Option<Box<dyn SourceTerm>>,
}

impl FieldEquationBuilder {
    /// Set the spatial operator.
    pub fn operator(mut self, operator: impl SpatialOperator + 'static) -> Self {
        self.operator = Some(Box::new(operator));
        self
    }

    /// Set an already boxed spatial operator.
    pub fn boxed_operator(mut self, operator: Box<dyn SpatialOperator>) -> Self {
        self.operator = Some(operator);
        self
    }

    /// Set the diffusion coefficient `D`.
    pub fn diffusion(mut self, diffusion: f64) -> Self {
        self.diffusion = diffusion;
        self
    }

    /// Set the source term.
    pub fn source(mut self, source: impl SourceTerm + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Set an already boxed source term.
    pub fn boxed_source(mut self, source: Box<dyn SourceTerm>) -> Self {
        self.source = Some(source);
        self
    }

    /// Build the equation, validating parameters.
    pub fn build(self) -> Result<FieldEquation, String> {
        let operator = self
            .operator
            .ok_or_else(|| "operator is required".to_string())?;
        if !(self.diffusion >= 0.0) || !self.diffusion.is_finite() {
            return Err(format!(
                "diffusion must be finite and >= 0, got {}",
                self.diffusion
            ));
        }
        Ok(FieldEquation {
            diffusion: self.diffusion,
            operator,
            source: self.source.unwrap_or_else(|| Box::new(NoSource)),
        })
    }
}
