//! Rectangular sub-blocks of a dense matrix.
//!
//! Partitions are materialized as independent copies: writing to an
//! extracted block never affects its source, and vice versa.

use std::ops::Range;

use crate::{
    error::{MarrayError, Result},
    matrix::DenseMatrix,
    traits::Matrix,
};

/// The four blocks of a matrix bisected at `rows / 2` and `cols / 2`.
///
/// For odd dimensions the lower/right blocks absorb the extra row/column.
#[derive(Debug, Clone, PartialEq)]
pub struct Quadrants {
    pub q11: DenseMatrix,
    pub q12: DenseMatrix,
    pub q21: DenseMatrix,
    pub q22: DenseMatrix,
}

fn check_range(axis: &str, range: &Range<usize>, len: usize) -> Result<()> {
    if range.start > range.end || range.end > len {
        return Err(MarrayError::RangeError(format!(
            "{} range {}..{} is invalid for a dimension of {}",
            axis, range.start, range.end, len
        )));
    }
    Ok(())
}

impl DenseMatrix {
    /// Copies the block spanning `rows` x `cols` into a new matrix.
    pub fn get_partition(&self, rows: Range<usize>, cols: Range<usize>) -> Result<Self> {
        check_range("Row", &rows, self.rows())?;
        check_range("Column", &cols, self.cols())?;

        let width = cols.len();
        let mut block = Self::zeros(rows.len(), width)?;
        if width == 0 {
            return Ok(block);
        }
        for (dst, src_row) in block.data_mut().chunks_mut(width).zip(rows) {
            let start = self.offset(src_row, cols.start);
            dst.copy_from_slice(&self.data()[start..start + width]);
        }
        Ok(block)
    }

    /// Writes `block` into `self` with its top-left corner at
    /// (`row_offset`, `col_offset`). The block must fit entirely.
    pub fn apply_partition(
        &mut self,
        block: &DenseMatrix,
        row_offset: usize,
        col_offset: usize,
    ) -> Result<()> {
        let row_end = row_offset.checked_add(block.rows());
        let col_end = col_offset.checked_add(block.cols());
        let fits = matches!((row_end, col_end), (Some(r), Some(c)) if r <= self.rows() && c <= self.cols());
        if !fits {
            return Err(MarrayError::RangeError(format!(
                "{}x{} block at offset ({}, {}) does not fit into a {}x{} matrix",
                block.rows(),
                block.cols(),
                row_offset,
                col_offset,
                self.rows(),
                self.cols()
            )));
        }

        let width = block.cols();
        if width == 0 {
            return Ok(());
        }
        for (i, src) in block.data().chunks(width).enumerate() {
            let start = self.offset(row_offset + i, col_offset);
            self.data_mut()[start..start + width].copy_from_slice(src);
        }
        Ok(())
    }

    /// Splits the matrix into four quadrants.
    pub fn get_quadrants(&self) -> Result<Quadrants> {
        let (rows, cols) = self.dims();
        let (h, w) = (rows / 2, cols / 2);
        Ok(Quadrants {
            q11: self.get_partition(0..h, 0..w)?,
            q12: self.get_partition(0..h, w..cols)?,
            q21: self.get_partition(h..rows, 0..w)?,
            q22: self.get_partition(h..rows, w..cols)?,
        })
    }

    /// Reassembles four quadrants into `self` at the bisection offsets
    /// of `self`'s own dimensions.
    ///
    /// The blocks must tile `self` exactly. Shapes are checked before any
    /// write, so on error `self` is unchanged.
    pub fn from_quadrants(&mut self, quadrants: &Quadrants) -> Result<()> {
        let (rows, cols) = self.dims();
        let (h, w) = (rows / 2, cols / 2);
        let expected = [
            ("q11", &quadrants.q11, (h, w)),
            ("q12", &quadrants.q12, (h, cols - w)),
            ("q21", &quadrants.q21, (rows - h, w)),
            ("q22", &quadrants.q22, (rows - h, cols - w)),
        ];
        for (name, block, dims) in expected {
            if block.dims() != dims {
                return Err(MarrayError::RangeError(format!(
                    "Quadrant {} is {}x{}, expected {}x{} for a {}x{} matrix",
                    name,
                    block.rows(),
                    block.cols(),
                    dims.0,
                    dims.1,
                    rows,
                    cols
                )));
            }
        }

        self.apply_partition(&quadrants.q11, 0, 0)?;
        self.apply_partition(&quadrants.q12, 0, w)?;
        self.apply_partition(&quadrants.q21, h, 0)?;
        self.apply_partition(&quadrants.q22, h, w)?;
        Ok(())
    }
}
