use std::fmt;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::error::{MarrayError, Result};
use crate::traits::Matrix;

/// Represents a dense `f64` matrix stored in row-major order on the CPU.
///
/// The buffer always holds exactly `rows * cols` values. Zero-sized
/// dimensions are allowed so that empty partitions (e.g. the `1x0` row
/// segment at the end of back substitution) are ordinary values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDenseMatrix")]
pub struct DenseMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>, // Data stored row-major: data[row * cols + col]
}

// Unchecked wire form, validated through `DenseMatrix::new`.
#[derive(Deserialize)]
struct RawDenseMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl TryFrom<RawDenseMatrix> for DenseMatrix {
    type Error = MarrayError;

    fn try_from(raw: RawDenseMatrix) -> Result<Self> {
        Self::new(raw.rows, raw.cols, raw.data)
    }
}

/// Reserves a zeroed buffer for a `rows x cols` matrix, reporting
/// size overflow or allocator refusal instead of aborting.
fn zeroed_buffer(rows: usize, cols: usize) -> Result<Vec<f64>> {
    let len = rows
        .checked_mul(cols)
        .ok_or(MarrayError::AllocationFailure { rows, cols })?;
    let mut data = Vec::new();
    data.try_reserve_exact(len)
        .map_err(|_| MarrayError::AllocationFailure { rows, cols })?;
    data.resize(len, 0.0);
    Ok(data)
}

impl DenseMatrix {
    /// Creates a new DenseMatrix from raw data, dimensions, assuming row-major order.
    pub fn new(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        if rows.checked_mul(cols) != Some(data.len()) {
            return Err(MarrayError::DimensionMismatch(format!(
                "Data length ({}) does not match dimensions ({}x{})",
                data.len(),
                rows,
                cols
            )));
        }
        Ok(Self { rows, cols, data })
    }

    /// Creates a new DenseMatrix filled with zeros.
    pub fn zeros(rows: usize, cols: usize) -> Result<Self> {
        Ok(Self {
            rows,
            cols,
            data: zeroed_buffer(rows, cols)?,
        })
    }

    /// Creates an `n x n` matrix with ones on the diagonal.
    pub fn identity(n: usize) -> Result<Self> {
        let mut m = Self::zeros(n, n)?;
        for i in 0..n {
            m.data[i * n + i] = 1.0;
        }
        Ok(m)
    }

    /// Builds a matrix from a slice of equally long rows.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        let cols = rows.first().map_or(0, |row| row.as_ref().len());
        let mut m = Self::zeros(rows.len(), cols)?;
        for (r, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(MarrayError::DimensionMismatch(format!(
                    "Row {} has {} values, expected {}",
                    r,
                    row.len(),
                    cols
                )));
            }
            m.data[r * cols..(r + 1) * cols].copy_from_slice(row);
        }
        Ok(m)
    }

    /// Creates an `n x 1` column vector.
    pub fn column_vector(values: &[f64]) -> Result<Self> {
        let mut m = Self::zeros(values.len(), 1)?;
        m.data.copy_from_slice(values);
        Ok(m)
    }

    /// Copies the matrix into a freshly allocated buffer.
    ///
    /// Unlike `clone`, an allocation failure is reported as
    /// `MarrayError::AllocationFailure`.
    pub fn copy(&self) -> Result<Self> {
        let mut m = Self::zeros(self.rows, self.cols)?;
        m.data.copy_from_slice(&self.data);
        Ok(m)
    }

    /// Returns a slice view of the underlying data vector.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Returns a mutable slice view of the underlying data vector.
    pub fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Gets the element at the specified row and column (immutable).
    /// Returns None if indices are out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<&f64> {
        if row < self.rows && col < self.cols {
            self.data.get(row * self.cols + col)
        } else {
            None
        }
    }

    /// Gets the element at the specified row and column (mutable).
    /// Returns None if indices are out of bounds.
    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut f64> {
        if row < self.rows && col < self.cols {
            self.data.get_mut(row * self.cols + col)
        } else {
            None
        }
    }

    pub fn row(&self, row: usize) -> Option<&[f64]> {
        (row < self.rows).then(|| &self.data[row * self.cols..(row + 1) * self.cols])
    }

    /// Exchanges two rows in place.
    pub fn swap_rows(&mut self, first: usize, second: usize) -> Result<()> {
        if first >= self.rows || second >= self.rows {
            return Err(MarrayError::RangeError(format!(
                "Cannot swap rows {} and {} of a matrix with {} rows",
                first, second, self.rows
            )));
        }
        if first == second {
            return Ok(());
        }
        let (lo, hi) = (first.min(second), first.max(second));
        let cols = self.cols;
        let (head, tail) = self.data.split_at_mut(hi * cols);
        head[lo * cols..(lo + 1) * cols].swap_with_slice(&mut tail[..cols]);
        Ok(())
    }

    #[inline]
    pub(crate) fn offset(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }
}

impl Index<(usize, usize)> for DenseMatrix {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        assert!(
            row < self.rows && col < self.cols,
            "index ({}, {}) out of bounds for {}x{} matrix",
            row,
            col,
            self.rows,
            self.cols
        );
        &self.data[self.offset(row, col)]
    }
}

impl IndexMut<(usize, usize)> for DenseMatrix {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f64 {
        assert!(
            row < self.rows && col < self.cols,
            "index ({}, {}) out of bounds for {}x{} matrix",
            row,
            col,
            self.rows,
            self.cols
        );
        let offset = self.offset(row, col);
        &mut self.data[offset]
    }
}

/// Tab-separated rows with six decimals, one line per row.
impl fmt::Display for DenseMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.cols == 0 {
            return Ok(());
        }
        for row in self.data.chunks(self.cols) {
            for value in row {
                write!(f, "{:.6}\t", value)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

// Implement the generic Matrix trait
impl Matrix for DenseMatrix {
    fn dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    // rows(), cols(), is_square() are provided by default impls in the trait
}

#[cfg(test)]
mod tests {
    use crate::{DenseMatrix, Matrix, MarrayError};

    #[test]
    fn test_dense_matrix_new_checks_length() {
        let m = DenseMatrix::new(2, 3, vec![1.0; 6]).unwrap();
        assert_eq!(m.dims(), (2, 3));

        match DenseMatrix::new(2, 3, vec![1.0; 5]) {
            Err(MarrayError::DimensionMismatch(msg)) => assert!(msg.contains("Data length")),
            other => panic!("Expected DimensionMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_zeros_and_identity() {
        let z = DenseMatrix::zeros(3, 2).unwrap();
        assert_eq!(z.dims(), (3, 2));
        assert!(z.data().iter().all(|&v| v == 0.0));

        let id = DenseMatrix::identity(3).unwrap();
        for r in 0..3 {
            for c in 0..3 {
                assert_eq!(id[(r, c)], if r == c { 1.0 } else { 0.0 });
            }
        }
    }

    #[test]
    fn test_zeros_reports_allocation_failure() {
        let huge = 1usize << 40;
        assert_eq!(
            DenseMatrix::zeros(huge, huge),
            Err(MarrayError::AllocationFailure {
                rows: huge,
                cols: huge
            })
        );
        // Element count fits in usize but the byte size does not.
        let rows = 1usize << 31;
        assert!(matches!(
            DenseMatrix::zeros(rows, rows),
            Err(MarrayError::AllocationFailure { .. })
        ));
    }

    #[test]
    fn test_from_rows() {
        let m = DenseMatrix::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
        assert_eq!(m.dims(), (2, 3));
        assert_eq!(m.data(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(m.row(1), Some(&[4.0, 5.0, 6.0][..]));
        assert_eq!(m.row(2), None);

        let ragged = DenseMatrix::from_rows(&[vec![1.0, 2.0], vec![3.0]]);
        assert!(matches!(ragged, Err(MarrayError::DimensionMismatch(_))));
    }

    #[test]
    fn test_get_out_of_bounds() {
        let mut m = DenseMatrix::zeros(2, 2).unwrap();
        *m.get_mut(1, 0).unwrap() = 7.0;
        assert_eq!(m.get(1, 0), Some(&7.0));
        assert_eq!(m.get(2, 0), None);
        assert_eq!(m.get(0, 2), None);
        assert!(m.get_mut(0, 5).is_none());
    }

    #[test]
    fn test_copy_is_independent() {
        let original = DenseMatrix::from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
        let mut copy = original.copy().unwrap();
        copy[(0, 0)] = 99.0;
        assert_eq!(original[(0, 0)], 1.0);
        assert_eq!(copy[(0, 0)], 99.0);
    }

    #[test]
    fn test_swap_rows() {
        let mut m = DenseMatrix::from_rows(&[[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]).unwrap();
        m.swap_rows(2, 0).unwrap();
        assert_eq!(m.data(), &[5.0, 6.0, 3.0, 4.0, 1.0, 2.0]);
        m.swap_rows(1, 1).unwrap();
        assert_eq!(m.row(1), Some(&[3.0, 4.0][..]));
        assert!(matches!(m.swap_rows(0, 3), Err(MarrayError::RangeError(_))));
    }

    #[test]
    fn test_display() {
        let m = DenseMatrix::from_rows(&[[1.0, 2.5], [-3.0, 0.0]]).unwrap();
        assert_eq!(
            m.to_string(),
            "1.000000\t2.500000\t\n-3.000000\t0.000000\t\n"
        );
    }

    #[test]
    fn test_serde_round_trip_and_validation() {
        let m = DenseMatrix::from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
        let json = serde_json::to_string(&m).unwrap();
        let back: DenseMatrix = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);

        let bad = r#"{"rows":2,"cols":2,"data":[1.0,2.0,3.0]}"#;
        assert!(serde_json::from_str::<DenseMatrix>(bad).is_err());
    }
}
