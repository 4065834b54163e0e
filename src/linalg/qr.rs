use tracing::debug;

use crate::linalg::{hypot, require_rows, LinalgError};
use crate::traits::FloatScalar;
use crate::Matrix;

/// Householder QR decomposition of an `m x n` matrix with `m >= n`.
///
/// `A = Q * R` with `Q` (`m x n`) having orthonormal columns and `R`
/// (`n x n`) upper triangular. The reflections are stored packed below the
/// diagonal; the diagonal of `R` is kept separately.
///
/// Rank deficiency does not stop the factorization. Check
/// [`is_full_rank`](Self::is_full_rank), or let [`solve`](Self::solve)
/// report [`LinalgError::RankDeficient`].
///
/// # Example
///
/// ```
/// use jupiter_linalg::Matrix;
///
/// // Least-squares line through (1, 1), (2, 2), (3, 2).
/// let a = Matrix::from_rows(3, 2, &[1.0_f64, 1.0, 1.0, 2.0, 1.0, 3.0]);
/// let b = Matrix::from_rows(3, 1, &[1.0, 2.0, 2.0]);
/// let x = a.qr().unwrap().solve(&b).unwrap();
/// assert!((x[(0, 0)] - 2.0 / 3.0).abs() < 1e-12);
/// assert!((x[(1, 0)] - 0.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct QrDecomposition<T> {
    qr: Matrix<T>,
    r_diag: Vec<T>,
}

impl<T: FloatScalar> QrDecomposition<T> {
    /// Factor `a`. Fails with [`LinalgError::NotTall`] if `a` has fewer
    /// rows than columns.
    pub fn new(a: &Matrix<T>) -> Result<Self, LinalgError> {
        let (m, n) = a.shape();
        if m < n {
            return Err(LinalgError::NotTall { rows: m, cols: n });
        }
        let mut qr = a.clone();
        let mut r_diag = vec![T::zero(); n];

        for k in 0..n {
            let mut nrm = T::zero();
            for i in k..m {
                nrm = hypot(nrm, qr[(i, k)]);
            }

            if nrm != T::zero() {
                if qr[(k, k)] < T::zero() {
                    nrm = -nrm;
                }
                for i in k..m {
                    qr[(i, k)] = qr[(i, k)] / nrm;
                }
                qr[(k, k)] = qr[(k, k)] + T::one();

                for j in (k + 1)..n {
                    let mut s = T::zero();
                    for i in k..m {
                        s = s + qr[(i, k)] * qr[(i, j)];
                    }
                    s = -s / qr[(k, k)];
                    for i in k..m {
                        qr[(i, j)] = qr[(i, j)] + s * qr[(i, k)];
                    }
                }
            }
            r_diag[k] = -nrm;
        }

        let out = Self { qr, r_diag };
        debug!(
            rows = m,
            cols = n,
            full_rank = out.is_full_rank(),
            "QR factorization complete"
        );
        Ok(out)
    }

    /// `true` if `R` has no zero on its diagonal.
    pub fn is_full_rank(&self) -> bool {
        self.r_diag.iter().all(|&d| d != T::zero())
    }

    /// Lower-trapezoidal matrix whose columns are the Householder vectors.
    pub fn householder(&self) -> Matrix<T> {
        let (m, n) = self.qr.shape();
        Matrix::from_fn(m, n, |i, j| if i >= j { self.qr[(i, j)] } else { T::zero() })
    }

    /// Upper-triangular factor, `n x n`.
    pub fn r(&self) -> Matrix<T> {
        let n = self.qr.ncols();
        Matrix::from_fn(n, n, |i, j| {
            if i < j {
                self.qr[(i, j)]
            } else if i == j {
                self.r_diag[i]
            } else {
                T::zero()
            }
        })
    }

    /// Orthonormal factor, `m x n` (economy size).
    pub fn q(&self) -> Matrix<T> {
        let (m, n) = self.qr.shape();
        let mut q = Matrix::eye_rect(m, n);
        for k in (0..n).rev() {
            let v0 = self.qr[(k, k)];
            if v0 == T::zero() {
                continue;
            }
            for j in k..n {
                let mut s = T::zero();
                for i in k..m {
                    s = s + self.qr[(i, k)] * q[(i, j)];
                }
                s = -s / v0;
                for i in k..m {
                    q[(i, j)] = q[(i, j)] + s * self.qr[(i, k)];
                }
            }
        }
        q
    }

    /// Least-squares solution of `A * X = B`, minimizing `||A X - B||`.
    ///
    /// Fails with [`LinalgError::RowMismatch`] if `B` has the wrong number of
    /// rows and [`LinalgError::RankDeficient`] if `A` is rank deficient.
    pub fn solve(&self, b: &Matrix<T>) -> Result<Matrix<T>, LinalgError> {
        let (m, n) = self.qr.shape();
        require_rows(b, m)?;
        if !self.is_full_rank() {
            debug!(rows = m, cols = n, "QR solve refused: matrix is rank deficient");
            return Err(LinalgError::RankDeficient);
        }

        let nx = b.ncols();
        let mut x = b.clone();

        // Y = Qᵗ * B
        for k in 0..n {
            let v0 = self.qr[(k, k)];
            for j in 0..nx {
                let mut s = T::zero();
                for i in k..m {
                    s = s + self.qr[(i, k)] * x[(i, j)];
                }
                s = -s / v0;
                for i in k..m {
                    x[(i, j)] = x[(i, j)] + s * self.qr[(i, k)];
                }
            }
        }
        // R * X = Y
        for k in (0..n).rev() {
            for j in 0..nx {
                x[(k, j)] = x[(k, j)] / self.r_diag[k];
            }
            for i in 0..k {
                let f = self.qr[(i, k)];
                for j in 0..nx {
                    x[(i, j)] = x[(i, j)] - x[(k, j)] * f;
                }
            }
        }
        Ok(x.submatrix_range(0..n, 0..nx))
    }
}

impl<T: FloatScalar> Matrix<T> {
    /// Householder QR decomposition. Requires `nrows >= ncols`.
    pub fn qr(&self) -> Result<QrDecomposition<T>, LinalgError> {
        QrDecomposition::new(self)
    }
}
