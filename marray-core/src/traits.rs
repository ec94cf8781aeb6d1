use std::fmt::Debug;

/// Generic trait representing a rectangular grid of values.
/// Implemented by the dense `f64` matrix and by the boolean masks
/// produced by tolerance comparison.
pub trait Matrix: Debug {
    /// Returns the dimensions of the matrix as (rows, columns).
    fn dims(&self) -> (usize, usize);

    /// Returns the number of rows.
    fn rows(&self) -> usize {
        self.dims().0
    }

    /// Returns the number of columns.
    fn cols(&self) -> usize {
        self.dims().1
    }

    /// Checks if the matrix is square.
    fn is_square(&self) -> bool {
        let (rows, cols) = self.dims();
        rows == cols
    }

    /// Total number of stored elements.
    fn len(&self) -> usize {
        let (rows, cols) = self.dims();
        rows * cols
    }

    /// True when either dimension is zero.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks whether two grids have identical dimensions.
    fn same_shape<M: Matrix + ?Sized>(&self, other: &M) -> bool {
        self.dims() == other.dims()
    }
}
