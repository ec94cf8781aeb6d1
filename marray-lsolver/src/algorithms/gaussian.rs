use log::{debug, warn};
use marray_core::{product, DenseMatrix, MarrayError, Matrix};

use super::{check_system_dims, GaussianElimination, PivotStrategy, SolveAlgorithm, SolveResult};

#[derive(Debug, Clone, PartialEq)]
pub struct EliminationMetadata {
    /// Number of row exchanges performed.
    pub row_swaps: usize,
    /// Pivot value used for each column, in column order.
    pub pivots: Vec<f64>,
}

impl SolveAlgorithm<DenseMatrix> for GaussianElimination {
    type Metadata = EliminationMetadata;

    fn solve(
        &self,
        a: &DenseMatrix,
        b: &DenseMatrix,
    ) -> Result<SolveResult<DenseMatrix, Self::Metadata>, MarrayError> {
        self.validate_inputs(a, b)?;
        debug!(
            "Solving {}x{} system with {:?} pivoting",
            a.rows(),
            a.cols(),
            self.pivoting
        );

        // Elimination is destructive; work on copies so the caller keeps A and b.
        let mut u = a.copy()?;
        let mut y = b.copy()?;

        let metadata = eliminate_with(&mut u, &mut y, self.pivoting).map_err(|e| {
            warn!("Gaussian elimination failed: {}", e);
            e
        })?;
        let x = back_substitute(&u, &y).map_err(|e| {
            warn!("Back substitution failed: {}", e);
            e
        })?;

        Ok(SolveResult { x, metadata })
    }
}

/// Finds the pivot row for column `col`, scanning rows `col..` of `a`.
///
/// Zero entries are never selected. Returns `None` when every remaining
/// entry of the column is zero, or when `col` is not a column of `a`.
pub fn find_pivot_row(a: &DenseMatrix, col: usize, strategy: PivotStrategy) -> Option<usize> {
    if col >= a.cols() {
        return None;
    }
    let key = |v: f64| match strategy {
        PivotStrategy::LargestValue => v,
        PivotStrategy::LargestMagnitude => v.abs(),
    };

    let mut best: Option<(usize, f64)> = None;
    for row in col..a.rows() {
        let value = a[(row, col)];
        if value == 0.0 {
            continue;
        }
        match best {
            Some((_, current)) if key(value) <= key(current) => {}
            _ => best = Some((row, value)),
        }
    }
    best.map(|(row, _)| row)
}

/// Reduces the system (`a`, `b`) to row-echelon form in place using the
/// default pivot strategy.
///
/// On failure `a` and `b` are left partially eliminated; copy them first if
/// the originals are still needed.
pub fn eliminate(a: &mut DenseMatrix, b: &mut DenseMatrix) -> Result<EliminationMetadata, MarrayError> {
    eliminate_with(a, b, PivotStrategy::default())
}

/// Like [`eliminate`], with an explicit pivot strategy.
pub fn eliminate_with(
    a: &mut DenseMatrix,
    b: &mut DenseMatrix,
    strategy: PivotStrategy,
) -> Result<EliminationMetadata, MarrayError> {
    check_system_dims(&*a, &*b)?;
    let n = a.rows();
    let mut metadata = EliminationMetadata {
        row_swaps: 0,
        pivots: Vec::with_capacity(n),
    };

    for i in 0..n {
        let pivot_row =
            find_pivot_row(a, i, strategy).ok_or(MarrayError::SingularMatrix { column: i })?;
        if pivot_row != i {
            debug!("Column {}: swapping rows {} and {}", i, i, pivot_row);
            a.swap_rows(i, pivot_row)?;
            b.swap_rows(i, pivot_row)?;
            metadata.row_swaps += 1;
        }

        let pivot = a[(i, i)];
        metadata.pivots.push(pivot);
        let rhs_pivot = b[(i, 0)];

        let coeffs = a.data_mut();
        let rhs = b.data_mut();
        for row in i + 1..n {
            let entry = coeffs[row * n + i];
            if entry == 0.0 {
                continue;
            }
            let factor = entry / pivot;
            for col in i..n {
                coeffs[row * n + col] -= factor * coeffs[i * n + col];
            }
            rhs[row] -= factor * rhs_pivot;
        }
    }

    Ok(metadata)
}

/// Solves the upper-triangular system `u x = b` from the last row up.
///
/// Each row's dot product `u[i, i+1..] . x[i+1..]` is taken by partitioning
/// the row segment and the solved tail of `x` and multiplying them. For the
/// last row both partitions are empty and the product is the `1x1` zero.
/// Neither input is modified.
pub fn back_substitute(u: &DenseMatrix, b: &DenseMatrix) -> Result<DenseMatrix, MarrayError> {
    check_system_dims(u, b)?;
    let n = u.rows();
    let mut x = DenseMatrix::zeros(n, 1)?;

    for i in (0..n).rev() {
        let diagonal = u[(i, i)];
        if diagonal == 0.0 {
            return Err(MarrayError::SingularMatrix { column: i });
        }
        let row_segment = u.get_partition(i..i + 1, i + 1..n)?;
        let solved = x.get_partition(i + 1..n, 0..1)?;
        let dot = product(&row_segment, &solved)?;
        x[(i, 0)] = (b[(i, 0)] - dot[(0, 0)]) / diagonal;
    }

    Ok(x)
}

/// Solves `a x = b` for a square, full-rank `a` and a single right-hand column.
///
/// The inputs are copied before elimination, so they are never modified.
pub fn solve(a: &DenseMatrix, b: &DenseMatrix) -> Result<DenseMatrix, MarrayError> {
    GaussianElimination::default()
        .solve(a, b)
        .map(|result| result.x)
}
