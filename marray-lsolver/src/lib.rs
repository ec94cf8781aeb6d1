//! `marray-lsolver`: A linear equation solver library for dense matrices.
//!
//! This library solves square systems of linear equations of the form Ax = b
//! by pivoted Gaussian elimination followed by back substitution.

// Core modules
pub mod algorithms;
pub mod system;

pub use algorithms::gaussian::{
    back_substitute, eliminate, eliminate_with, find_pivot_row, solve, EliminationMetadata,
};
pub use algorithms::{GaussianElimination, PivotStrategy, SolveAlgorithm, SolveResult};
pub use system::LinearSystem;

// Re-export from marray_core
pub use marray_core::{
    close, close_all, product, DenseMatrix, ElementMask, MarrayError, Matrix, Tolerance,
};
