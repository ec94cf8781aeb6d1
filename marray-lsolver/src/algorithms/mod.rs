use marray_core::{MarrayError, Matrix}; // Use error and matrix trait from marray_core

pub struct SolveResult<M, Meta> {
    pub x: M,           // Solution vector
    pub metadata: Meta, // Metadata about the solve process
}

// --- Algorithm Trait Definition ---
/// Trait representing a specific linear system solving algorithm.
/// Generic over the Matrix type it supports.
pub trait SolveAlgorithm<M: Matrix> {
    type Metadata: std::fmt::Debug;

    /// Solves the linear system Ax = b for x.
    ///
    /// # Arguments
    ///
    /// * `a` - The square coefficient matrix A.
    /// * `b` - The right-hand side column vector b.
    ///
    /// # Returns
    ///
    /// A `Result` containing the solution vector x or a `MarrayError`.
    /// The caller's `a` and `b` are left untouched.
    fn solve(&self, a: &M, b: &M) -> Result<SolveResult<M, Self::Metadata>, MarrayError>;

    // Helper for input validation, can be called by implementations.
    fn validate_inputs(&self, a: &M, b: &M) -> Result<(), MarrayError> {
        check_system_dims(a, b)
    }
}

/// Checks that `a` is square and `b` is a column vector with as many rows.
pub(crate) fn check_system_dims<A: Matrix, B: Matrix>(a: &A, b: &B) -> Result<(), MarrayError> {
    let (rows, cols) = a.dims();
    if !a.is_square() {
        return Err(MarrayError::DimensionMismatch(format!(
            "Matrix A must be square (dims: {}x{})",
            rows, cols
        )));
    }
    if rows != b.rows() {
        return Err(MarrayError::DimensionMismatch(format!(
            "Matrix A rows ({}) must match RHS vector b rows ({})",
            rows,
            b.rows()
        )));
    }
    if b.cols() != 1 {
        return Err(MarrayError::DimensionMismatch(format!(
            "RHS b must have exactly one column (dims: {}x{})",
            b.rows(),
            b.cols()
        )));
    }
    Ok(())
}

// --- Algorithm Implementations ---

pub mod gaussian; // Pivoted Gaussian elimination + back substitution

// --- Algorithm Struct Definitions ---
// Define structs that represent specific algorithms and hold their parameters.

/// Rule for choosing the pivot row of a column during elimination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PivotStrategy {
    /// Largest raw nonzero value; a negative entry never displaces a
    /// smaller positive one. Ties keep the first row.
    #[default]
    LargestValue,
    /// Largest nonzero absolute value (classic partial pivoting).
    LargestMagnitude,
}

/// Gaussian elimination with row pivoting followed by back substitution.
#[derive(Debug, Clone, Default)]
pub struct GaussianElimination {
    pub pivoting: PivotStrategy,
}

impl GaussianElimination {
    /// Creates a new instance with the default pivot strategy.
    pub fn new() -> Self {
        Self::default()
    }
    /// Creates a new instance with the given pivot strategy.
    pub fn with_params(pivoting: PivotStrategy) -> Self {
        Self { pivoting }
    }
}
