//! Matrix product engine.
//!
//! [`product`] picks one [`ProductStrategy`] per call: the seven-multiplication
//! block recurrence for square, even-dimensioned operands of equal size, or the
//! general triple loop otherwise. Each of the seven sub-products goes back
//! through [`product`], so the recurrence keeps halving while the blocks stay
//! even and drops to the general loop once they turn odd.

use crate::{
    error::{MarrayError, Result},
    matrix::DenseMatrix,
    partition::Quadrants,
    traits::Matrix,
};

/// Smallest dimension for which the block recurrence is used.
pub const MIN_RECURSIVE_DIM: usize = 2;

/// How a single product call is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductStrategy {
    /// Triple-loop accumulation, O(rows * cols * inner).
    General,
    /// Quadrant split with seven recursive sub-products.
    Recursive,
}

impl ProductStrategy {
    /// Selects the strategy for multiplying `a` by `b`.
    pub fn select(a: &DenseMatrix, b: &DenseMatrix) -> Self {
        let n = a.rows();
        if a.is_square() && a.same_shape(b) && n >= MIN_RECURSIVE_DIM && n % 2 == 0 {
            ProductStrategy::Recursive
        } else {
            ProductStrategy::General
        }
    }
}

fn check_inner_dims(a: &DenseMatrix, b: &DenseMatrix) -> Result<()> {
    if a.cols() != b.rows() {
        return Err(MarrayError::DimensionMismatch(format!(
            "Cannot multiply {}x{} by {}x{}: inner dimensions differ",
            a.rows(),
            a.cols(),
            b.rows(),
            b.cols()
        )));
    }
    Ok(())
}

/// Computes `a * b`.
///
/// An empty inner dimension yields a zero matrix of shape
/// `a.rows() x b.cols()`; in particular a `1x0` row times a `0x1` column is
/// the `1x1` zero matrix, which back substitution relies on for its last row.
pub fn product(a: &DenseMatrix, b: &DenseMatrix) -> Result<DenseMatrix> {
    check_inner_dims(a, b)?;
    match ProductStrategy::select(a, b) {
        ProductStrategy::General => product_general(a, b),
        ProductStrategy::Recursive => product_recursive(a, b),
    }
}

/// Computes `a * b` with the triple loop, regardless of shape.
pub fn product_general(a: &DenseMatrix, b: &DenseMatrix) -> Result<DenseMatrix> {
    check_inner_dims(a, b)?;
    let (rows, inner) = a.dims();
    let cols = b.cols();
    let mut result = DenseMatrix::zeros(rows, cols)?;

    let lhs = a.data();
    let rhs = b.data();
    let out = result.data_mut();
    for i in 0..rows {
        let row = &lhs[i * inner..(i + 1) * inner];
        for j in 0..cols {
            let mut acc = 0.0;
            for (k, &v) in row.iter().enumerate() {
                acc += v * rhs[k * cols + j];
            }
            out[i * cols + j] = acc;
        }
    }
    Ok(result)
}

/// Computes `a * b` with the seven-multiplication block recurrence.
///
/// Both operands must be square, of equal even dimension. Sub-products
/// recurse through [`product`]. Any failure aborts the whole call and every
/// intermediate block is dropped on the way out.
pub fn product_recursive(a: &DenseMatrix, b: &DenseMatrix) -> Result<DenseMatrix> {
    if ProductStrategy::select(a, b) != ProductStrategy::Recursive {
        return Err(MarrayError::DimensionMismatch(format!(
            "Recursive product needs equal square operands of even size, got {}x{} and {}x{}",
            a.rows(),
            a.cols(),
            b.rows(),
            b.cols()
        )));
    }
    let n = a.rows();
    log::trace!("Recursive product on {}x{} operands", n, n);

    let [m1, m2, m3, m4, m5, m6, m7] = {
        let Quadrants {
            q11: a11,
            q12: a12,
            q21: a21,
            q22: a22,
        } = a.get_quadrants()?;
        let Quadrants {
            q11: b11,
            q12: b12,
            q21: b21,
            q22: b22,
        } = b.get_quadrants()?;

        [
            product(&a11.add(&a22)?, &b11.add(&b22)?)?,
            product(&a21.add(&a22)?, &b11)?,
            product(&a11, &b12.sub(&b22)?)?,
            product(&a22, &b21.sub(&b11)?)?,
            product(&a11.add(&a12)?, &b22)?,
            product(&a21.sub(&a11)?, &b11.add(&b12)?)?,
            product(&a12.sub(&a22)?, &b21.add(&b22)?)?,
        ]
    };

    let mut c11 = m1.add(&m4)?;
    c11.sub_assign(&m5)?;
    c11.add_assign(&m7)?;

    let c12 = m3.add(&m5)?;
    let c21 = m2.add(&m4)?;

    let mut c22 = m1.sub(&m2)?;
    c22.add_assign(&m3)?;
    c22.add_assign(&m6)?;

    let mut result = DenseMatrix::zeros(n, n)?;
    result.from_quadrants(&Quadrants {
        q11: c11,
        q12: c12,
        q21: c21,
        q22: c22,
    })?;
    Ok(result)
}

impl DenseMatrix {
    /// Matrix product `self * rhs`. See [`product`].
    pub fn product(&self, rhs: &DenseMatrix) -> Result<DenseMatrix> {
        product(self, rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::close::{close_all, DEFAULT_ATOL, DEFAULT_RTOL};

    fn random_matrix(rng: &mut fastrand::Rng, rows: usize, cols: usize) -> DenseMatrix {
        let data = (0..rows * cols).map(|_| rng.f64() * 2.0 - 1.0).collect();
        DenseMatrix::new(rows, cols, data).unwrap()
    }

    #[test]
    fn test_strategy_selection() {
        let even = DenseMatrix::zeros(4, 4).unwrap();
        let odd = DenseMatrix::zeros(3, 3).unwrap();
        let rect = DenseMatrix::zeros(4, 2).unwrap();
        let one = DenseMatrix::zeros(1, 1).unwrap();
        let empty = DenseMatrix::zeros(0, 0).unwrap();
        assert_eq!(ProductStrategy::select(&even, &even), ProductStrategy::Recursive);
        assert_eq!(ProductStrategy::select(&odd, &odd), ProductStrategy::General);
        assert_eq!(ProductStrategy::select(&rect, &rect), ProductStrategy::General);
        assert_eq!(ProductStrategy::select(&one, &one), ProductStrategy::General);
        assert_eq!(ProductStrategy::select(&empty, &empty), ProductStrategy::General);
    }

    #[test]
    fn test_general_product_small() {
        let a = DenseMatrix::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
        let b = DenseMatrix::from_rows(&[[7.0, 8.0], [9.0, 10.0], [11.0, 12.0]]).unwrap();
        let c = product(&a, &b).unwrap();
        assert_eq!(c.dims(), (2, 2));
        assert_eq!(c.data(), &[58.0, 64.0, 139.0, 154.0]);
    }

    #[test]
    fn test_dimension_mismatch() {
        let a = DenseMatrix::zeros(3, 5).unwrap();
        let c = DenseMatrix::zeros(4, 4).unwrap();
        assert!(matches!(
            product(&a, &c),
            Err(MarrayError::DimensionMismatch(_))
        ));
        assert!(matches!(
            product_general(&a, &c),
            Err(MarrayError::DimensionMismatch(_))
        ));
        assert!(matches!(
            product_recursive(&a, &a),
            Err(MarrayError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_recursive_matches_general() {
        let mut rng = fastrand::Rng::with_seed(42);
        // 6 recurses once then falls back on 3x3 blocks; 16 recurses to 1x1.
        for n in [2, 4, 6, 8, 12, 16] {
            let a = random_matrix(&mut rng, n, n);
            let b = random_matrix(&mut rng, n, n);
            let fast = product_recursive(&a, &b).unwrap();
            let slow = product_general(&a, &b).unwrap();
            assert!(
                close_all(&fast, &slow, DEFAULT_RTOL, DEFAULT_ATOL),
                "recursive and general products disagree for n = {}",
                n
            );
        }
    }

    #[test]
    fn test_rectangular_product_matches_reference() {
        let mut rng = fastrand::Rng::with_seed(3);
        let a = random_matrix(&mut rng, 3, 5);
        let b = random_matrix(&mut rng, 5, 3);
        let c = product(&a, &b).unwrap();
        for i in 0..3 {
            for j in 0..3 {
                let expected: f64 = (0..5).map(|k| a[(i, k)] * b[(k, j)]).sum();
                approx::assert_relative_eq!(c[(i, j)], expected, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_identity_law() {
        let mut rng = fastrand::Rng::with_seed(11);
        for n in [1, 3, 4, 10] {
            let a = random_matrix(&mut rng, n, n);
            let id = DenseMatrix::identity(n).unwrap();
            let c = product(&a, &id).unwrap();
            assert!(close_all(&c, &a, DEFAULT_RTOL, DEFAULT_ATOL));
        }
    }

    #[test]
    fn test_block_matrix_times_identity_is_exact() {
        let upper = DenseMatrix::from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
        let lower = DenseMatrix::from_rows(&[[5.0, 6.0], [7.0, 8.0]]).unwrap();
        let mut a = DenseMatrix::zeros(4, 4).unwrap();
        a.apply_partition(&upper, 0, 0).unwrap();
        a.apply_partition(&lower, 0, 2).unwrap();
        a.apply_partition(&lower, 2, 0).unwrap();
        a.apply_partition(&upper, 2, 2).unwrap();

        let id = DenseMatrix::identity(4).unwrap();
        assert_eq!(ProductStrategy::select(&a, &id), ProductStrategy::Recursive);
        assert_eq!(product(&a, &id).unwrap(), a);
    }

    #[test]
    fn test_empty_inner_dimension() {
        let row = DenseMatrix::zeros(1, 0).unwrap();
        let col = DenseMatrix::zeros(0, 1).unwrap();
        let dot = product(&row, &col).unwrap();
        assert_eq!(dot.dims(), (1, 1));
        assert_eq!(dot[(0, 0)], 0.0);

        let wide = DenseMatrix::zeros(0, 3).unwrap();
        let tall = DenseMatrix::zeros(2, 0).unwrap();
        let c = product(&tall, &wide).unwrap();
        assert_eq!(c.dims(), (2, 3));
        assert!(c.data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_product_propagates_allocation_failure() {
        let huge = 1usize << 31;
        let a = DenseMatrix::zeros(huge, 0).unwrap();
        let b = DenseMatrix::zeros(0, huge).unwrap();
        assert!(matches!(
            product(&a, &b),
            Err(MarrayError::AllocationFailure { .. })
        ));
    }

    #[test]
    fn test_product_does_not_alias_inputs() {
        let a = DenseMatrix::from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
        let mut c = a.product(&a).unwrap();
        c[(0, 0)] = 0.0;
        assert_eq!(a[(0, 0)], 1.0);
        assert_eq!(a.product(&a).unwrap().data(), &[7.0, 10.0, 15.0, 22.0]);
    }
}
