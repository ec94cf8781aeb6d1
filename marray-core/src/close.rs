//! Approximate equality under combined relative and absolute tolerances.
//!
//! The second operand is always the reference value: an entry passes when
//! `|a - b| <= atol + rtol * |b|`, so the test is not symmetric in `a` and `b`.

use num_traits::Float;

use crate::{
    error::{MarrayError, Result},
    matrix::DenseMatrix,
    traits::Matrix,
};

pub const DEFAULT_RTOL: f64 = 1e-05;
pub const DEFAULT_ATOL: f64 = 1e-08;

/// Checks whether `a` lies within tolerance of the reference `b`.
pub fn is_close<T: Float>(a: T, b: T, rtol: T, atol: T) -> bool {
    (a - b).abs() <= atol + rtol * b.abs()
}

/// Computes the unit roundoff of `T` by halving until `1 + eps == 1`.
pub fn machine_epsilon<T: Float>() -> T {
    let one = T::one();
    let two = one + one;
    let mut eps = one;
    while one + eps != one {
        eps = eps / two;
    }
    eps * two
}

/// Elementwise result of a tolerance comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementMask {
    rows: usize,
    cols: usize,
    data: Vec<bool>,
}

impl ElementMask {
    pub fn get(&self, row: usize, col: usize) -> Option<bool> {
        if row < self.rows && col < self.cols {
            self.data.get(row * self.cols + col).copied()
        } else {
            None
        }
    }

    pub fn data(&self) -> &[bool] {
        &self.data
    }

    /// True when every entry passed.
    pub fn all(&self) -> bool {
        self.data.iter().all(|&v| v)
    }

    /// Number of entries that passed.
    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&v| v).count()
    }
}

impl Matrix for ElementMask {
    fn dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }
}

/// Elementwise tolerance comparison of `a` against the reference `b`.
pub fn close(a: &DenseMatrix, b: &DenseMatrix, rtol: f64, atol: f64) -> Result<ElementMask> {
    if !a.same_shape(b) {
        return Err(MarrayError::shape_mismatch("close", a.dims(), b.dims()));
    }
    let (rows, cols) = a.dims();
    let mut data = Vec::new();
    data.try_reserve_exact(a.len())
        .map_err(|_| MarrayError::AllocationFailure { rows, cols })?;
    data.extend(
        a.data()
            .iter()
            .zip(b.data())
            .map(|(&x, &y)| is_close(x, y, rtol, atol)),
    );
    Ok(ElementMask { rows, cols, data })
}

/// Returns true when every entry of `a` is within tolerance of `b`.
/// Matrices of different shapes are never close.
pub fn close_all(a: &DenseMatrix, b: &DenseMatrix, rtol: f64, atol: f64) -> bool {
    a.same_shape(b)
        && a.data()
            .iter()
            .zip(b.data())
            .all(|(&x, &y)| is_close(x, y, rtol, atol))
}

/// Tolerance pair used by comparisons.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    pub rtol: f64,
    pub atol: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            rtol: DEFAULT_RTOL,
            atol: DEFAULT_ATOL,
        }
    }
}

impl Tolerance {
    /// Creates a tolerance with the conventional defaults.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(rtol: f64, atol: f64) -> Self {
        Self { rtol, atol }
    }

    pub fn close(&self, a: &DenseMatrix, b: &DenseMatrix) -> Result<ElementMask> {
        close(a, b, self.rtol, self.atol)
    }

    pub fn close_all(&self, a: &DenseMatrix, b: &DenseMatrix) -> bool {
        close_all(a, b, self.rtol, self.atol)
    }
}
