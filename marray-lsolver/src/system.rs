use std::fmt;

use marray_core::{DenseMatrix, MarrayError, Matrix};

use crate::algorithms::{
    check_system_dims,
    gaussian::{back_substitute, eliminate_with, EliminationMetadata},
    PivotStrategy,
};

/// A square linear system `a x = b` with a single right-hand column.
///
/// Owns both matrices. [`LinearSystem::eliminate`] transforms them in place
/// into row-echelon form.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearSystem {
    a: DenseMatrix,
    b: DenseMatrix,
}

impl LinearSystem {
    pub fn new(a: DenseMatrix, b: DenseMatrix) -> Result<Self, MarrayError> {
        check_system_dims(&a, &b)?;
        Ok(Self { a, b })
    }

    pub fn a(&self) -> &DenseMatrix {
        &self.a
    }

    pub fn b(&self) -> &DenseMatrix {
        &self.b
    }

    /// Number of equations (and unknowns).
    pub fn size(&self) -> usize {
        self.a.rows()
    }

    pub fn into_parts(self) -> (DenseMatrix, DenseMatrix) {
        (self.a, self.b)
    }

    /// Runs pivoted elimination on the owned matrices.
    /// A failure leaves the system partially eliminated.
    pub fn eliminate(&mut self, strategy: PivotStrategy) -> Result<EliminationMetadata, MarrayError> {
        eliminate_with(&mut self.a, &mut self.b, strategy)
    }

    /// Back-substitutes an already eliminated system.
    pub fn back_substitute(&self) -> Result<DenseMatrix, MarrayError> {
        back_substitute(&self.a, &self.b)
    }

    /// Eliminates and back-substitutes, consuming the system.
    pub fn solve(mut self, strategy: PivotStrategy) -> Result<DenseMatrix, MarrayError> {
        self.eliminate(strategy)?;
        self.back_substitute()
    }
}

/// One equation per line: the coefficients, a bar, then the right-hand side.
impl fmt::Display for LinearSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.size() {
            if let Some(row) = self.a.row(r) {
                for value in row {
                    write!(f, "{:.6}\t", value)?;
                }
            }
            writeln!(f, "|\t{:.6}", self.b[(r, 0)])?;
        }
        Ok(())
    }
}
