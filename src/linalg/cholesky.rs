use tracing::debug;

use crate::linalg::{require_rows, require_square, LinalgError};
use crate::traits::FloatScalar;
use crate::Matrix;

/// Cholesky decomposition `A = L * Lᵗ` of a symmetric positive definite
/// matrix.
///
/// Construction only requires a square matrix. Symmetry and positivity are
/// checked while factoring and exposed through [`is_spd`](Self::is_spd);
/// [`solve`](Self::solve), [`det`](Self::det), [`ln_det`](Self::ln_det) and
/// [`inverse`](Self::inverse) fail with [`LinalgError::NotPositiveDefinite`]
/// when the check did not pass.
///
/// # Example
///
/// ```
/// use jupiter_linalg::Matrix;
///
/// let a = Matrix::from_rows(2, 2, &[4.0_f64, 2.0, 2.0, 3.0]);
/// let chol = a.cholesky().unwrap();
/// assert!(chol.is_spd());
///
/// let l = chol.l();
/// assert!((l[(0, 0)] - 2.0).abs() < 1e-12);
/// assert!((l[(1, 0)] - 1.0).abs() < 1e-12);
/// assert!((l[(1, 1)] - 2.0_f64.sqrt()).abs() < 1e-12);
///
/// let x = chol.solve(&Matrix::from_rows(2, 1, &[2.0, 1.0])).unwrap();
/// assert!((x[(0, 0)] - 0.5).abs() < 1e-12);
/// assert!(x[(1, 0)].abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct CholeskyDecomposition<T> {
    l: Matrix<T>,
    spd: bool,
}

impl<T: FloatScalar> CholeskyDecomposition<T> {
    /// Factor `a`. Fails with [`LinalgError::NotSquare`] for a rectangular
    /// input; reads both triangles to check symmetry.
    pub fn new(a: &Matrix<T>) -> Result<Self, LinalgError> {
        require_square(a)?;
        let n = a.nrows();
        let mut l = Matrix::zeros(n, n);
        let mut spd = true;

        for j in 0..n {
            let mut d = T::zero();
            for k in 0..j {
                let mut s = T::zero();
                for i in 0..k {
                    s = s + l[(k, i)] * l[(j, i)];
                }
                s = (a[(j, k)] - s) / l[(k, k)];
                l[(j, k)] = s;
                d = d + s * s;
                spd = spd && a[(k, j)] == a[(j, k)];
            }
            d = a[(j, j)] - d;
            spd = spd && d > T::zero();
            l[(j, j)] = d.max(T::zero()).sqrt();
        }

        debug!(n, spd, "Cholesky factorization complete");
        Ok(Self { l, spd })
    }

    /// `true` if the input was symmetric and positive definite.
    pub fn is_spd(&self) -> bool {
        self.spd
    }

    /// Lower-triangular factor.
    pub fn l(&self) -> Matrix<T> {
        self.l.clone()
    }

    fn require_spd(&self, op: &'static str) -> Result<(), LinalgError> {
        if self.spd {
            Ok(())
        } else {
            debug!(op, "Cholesky refused: matrix is not symmetric positive definite");
            Err(LinalgError::NotPositiveDefinite)
        }
    }

    /// Solve `A * X = B` by forward substitution with `L` and back
    /// substitution with `Lᵗ`.
    pub fn solve(&self, b: &Matrix<T>) -> Result<Matrix<T>, LinalgError> {
        let n = self.l.nrows();
        require_rows(b, n)?;
        self.require_spd("solve")?;

        let nx = b.ncols();
        let mut x = b.clone();
        let l = &self.l;

        // L * Y = B
        for k in 0..n {
            for j in 0..nx {
                let mut v = x[(k, j)];
                for i in 0..k {
                    v = v - x[(i, j)] * l[(k, i)];
                }
                x[(k, j)] = v / l[(k, k)];
            }
        }
        // Lᵗ * X = Y
        for k in (0..n).rev() {
            for j in 0..nx {
                let mut v = x[(k, j)];
                for i in (k + 1)..n {
                    v = v - x[(i, j)] * l[(i, k)];
                }
                x[(k, j)] = v / l[(k, k)];
            }
        }
        Ok(x)
    }

    /// Determinant, `(prod L[i][i])²`.
    pub fn det(&self) -> Result<T, LinalgError> {
        self.require_spd("det")?;
        let p = (0..self.l.nrows()).fold(T::one(), |acc, i| acc * self.l[(i, i)]);
        Ok(p * p)
    }

    /// Natural log of the determinant, `2 * sum ln L[i][i]`. Stays finite
    /// where [`det`](Self::det) would overflow.
    pub fn ln_det(&self) -> Result<T, LinalgError> {
        self.require_spd("ln_det")?;
        let s = (0..self.l.nrows()).fold(T::zero(), |acc, i| acc + self.l[(i, i)].ln());
        Ok(T::two() * s)
    }

    /// Matrix inverse, `solve(I)`.
    pub fn inverse(&self) -> Result<Matrix<T>, LinalgError> {
        self.solve(&Matrix::eye(self.l.nrows()))
    }
}

impl<T: FloatScalar> Matrix<T> {
    /// Cholesky decomposition. Requires a square matrix.
    pub fn cholesky(&self) -> Result<CholeskyDecomposition<T>, LinalgError> {
        CholeskyDecomposition::new(self)
    }
}
