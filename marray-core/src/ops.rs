// This module contains the elementwise arithmetic on dense matrices.
// Every binary operation comes in an allocating form returning a fresh matrix
// and an in-place `*_assign` form mutating the receiver. Shape checks run
// before any element is touched, so a failed in-place call leaves the
// receiver unchanged.

use crate::{
    error::{MarrayError, Result},
    matrix::DenseMatrix,
    traits::Matrix,
};

// --- Internal helpers ---

fn check_same_shape(op: &str, a: &DenseMatrix, b: &DenseMatrix) -> Result<()> {
    if !a.same_shape(b) {
        return Err(MarrayError::shape_mismatch(op, a.dims(), b.dims()));
    }
    Ok(())
}

/// Writes `f(lhs_i, rhs_i)` into every element of `lhs`.
fn zip_assign(lhs: &mut DenseMatrix, rhs: &DenseMatrix, f: impl Fn(f64, f64) -> f64) {
    for (l, &r) in lhs.data_mut().iter_mut().zip(rhs.data()) {
        *l = f(*l, r);
    }
}

fn map_assign(m: &mut DenseMatrix, f: impl Fn(f64) -> f64) {
    for v in m.data_mut() {
        *v = f(*v);
    }
}

// --- Public operations ---

impl DenseMatrix {
    /// Returns the transposed matrix.
    pub fn transpose(&self) -> Result<Self> {
        let (rows, cols) = self.dims();
        let mut t = Self::zeros(cols, rows)?;
        let src = self.data();
        let dst = t.data_mut();
        for i in 0..cols {
            for j in 0..rows {
                dst[i * rows + j] = src[j * cols + i];
            }
        }
        Ok(t)
    }

    /// Adds `value` to every element in place.
    pub fn add_scalar_assign(&mut self, value: f64) {
        map_assign(self, |v| v + value);
    }

    /// Returns a copy with `value` added to every element.
    pub fn add_scalar(&self, value: f64) -> Result<Self> {
        let mut result = self.copy()?;
        result.add_scalar_assign(value);
        Ok(result)
    }

    /// Multiplies every element by `factor` in place.
    pub fn scale_assign(&mut self, factor: f64) {
        map_assign(self, |v| v * factor);
    }

    /// Returns a copy with every element multiplied by `factor`.
    pub fn scale(&self, factor: f64) -> Result<Self> {
        let mut result = self.copy()?;
        result.scale_assign(factor);
        Ok(result)
    }

    /// Elementwise `self += other`.
    pub fn add_assign(&mut self, other: &DenseMatrix) -> Result<()> {
        check_same_shape("add", self, other)?;
        zip_assign(self, other, |a, b| a + b);
        Ok(())
    }

    /// Elementwise `self + other` into a new matrix.
    pub fn add(&self, other: &DenseMatrix) -> Result<Self> {
        check_same_shape("add", self, other)?;
        let mut result = self.copy()?;
        zip_assign(&mut result, other, |a, b| a + b);
        Ok(result)
    }

    /// Elementwise `self -= other`.
    pub fn sub_assign(&mut self, other: &DenseMatrix) -> Result<()> {
        check_same_shape("sub", self, other)?;
        zip_assign(self, other, |a, b| a - b);
        Ok(())
    }

    /// Elementwise `self - other` into a new matrix.
    pub fn sub(&self, other: &DenseMatrix) -> Result<Self> {
        check_same_shape("sub", self, other)?;
        let mut result = self.copy()?;
        zip_assign(&mut result, other, |a, b| a - b);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use crate::{DenseMatrix, MarrayError, Matrix};

    fn sample() -> DenseMatrix {
        DenseMatrix::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap()
    }

    #[test]
    fn test_transpose() {
        let t = sample().transpose().unwrap();
        assert_eq!(t.dims(), (3, 2));
        assert_eq!(t.data(), &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
    }

    #[test]
    fn test_transpose_round_trip_is_exact() {
        let mut rng = fastrand::Rng::with_seed(7);
        let data: Vec<f64> = (0..35).map(|_| rng.f64() * 100.0 - 50.0).collect();
        let m = DenseMatrix::new(5, 7, data).unwrap();
        assert_eq!(m.transpose().unwrap().transpose().unwrap(), m);
    }

    #[test]
    fn test_scalar_ops() {
        let m = sample();
        let shifted = m.add_scalar(1.5).unwrap();
        assert_eq!(shifted.data(), &[2.5, 3.5, 4.5, 5.5, 6.5, 7.5]);
        // Allocating form leaves the input alone.
        assert_eq!(m, sample());

        let scaled = m.scale(-2.0).unwrap();
        assert_eq!(scaled.data(), &[-2.0, -4.0, -6.0, -8.0, -10.0, -12.0]);
        assert_eq!(m, sample());

        let mut n = sample();
        n.scale_assign(0.5);
        n.add_scalar_assign(-0.5);
        assert_eq!(n.data(), &[0.0, 0.5, 1.0, 1.5, 2.0, 2.5]);
    }

    #[test]
    fn test_add_and_sub() {
        let a = sample();
        let b = DenseMatrix::new(2, 3, vec![1.0; 6]).unwrap();
        assert_eq!(a.add(&b).unwrap().data(), &[2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        assert_eq!(a.sub(&b).unwrap().data(), &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);

        let mut c = a.clone();
        c.add_assign(&b).unwrap();
        c.sub_assign(&a).unwrap();
        assert_eq!(c, b);
    }

    #[test]
    fn test_shape_mismatch_is_rejected() {
        let a = sample();
        let b = DenseMatrix::zeros(3, 2).unwrap();
        assert!(matches!(a.add(&b), Err(MarrayError::DimensionMismatch(_))));
        assert!(matches!(a.sub(&b), Err(MarrayError::DimensionMismatch(_))));

        let mut c = sample();
        assert!(matches!(
            c.add_assign(&b),
            Err(MarrayError::DimensionMismatch(_))
        ));
        assert!(matches!(
            c.sub_assign(&b),
            Err(MarrayError::DimensionMismatch(_))
        ));
        // In-place forms must not touch the receiver on failure.
        assert_eq!(c, sample());
    }
}
