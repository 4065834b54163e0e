use tracing::debug;

use crate::linalg::{require_rows, require_square, LinalgError};
use crate::traits::FloatScalar;
use crate::Matrix;

/// LU decomposition with partial pivoting of an `m x n` matrix.
///
/// With `k = min(m, n)`, produces a unit lower-trapezoidal `L` (`m x k`), an
/// upper-trapezoidal `U` (`k x n`) and a row permutation `piv` such that
/// `A[piv, :] = L * U`.
///
/// The factorization never fails: a zero pivot is recorded and the matrix
/// reported as singular by [`is_nonsingular`](Self::is_nonsingular), after
/// which [`solve`](Self::solve) refuses with [`LinalgError::Singular`].
///
/// # Example
///
/// ```
/// use jupiter_linalg::Matrix;
///
/// let a = Matrix::from_rows(2, 2, &[2.0_f64, 1.0, 5.0, 3.0]);
/// let lu = a.lu();
///
/// let b = Matrix::from_rows(2, 1, &[4.0, 11.0]);
/// let x = lu.solve(&b).unwrap();
/// assert!((x[(0, 0)] - 1.0).abs() < 1e-12);
/// assert!((x[(1, 0)] - 2.0).abs() < 1e-12);
///
/// assert!((lu.det().unwrap() - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct LuDecomposition<T> {
    /// Packed factors: strict lower part is L (unit diagonal implied),
    /// upper part is U.
    lu: Matrix<T>,
    piv: Vec<usize>,
    even: bool,
}

impl<T: FloatScalar> LuDecomposition<T> {
    /// Factor `a`. The input is copied; later changes to `a` have no effect.
    ///
    /// Left-looking (Crout/Doolittle dot-product) elimination: each column is
    /// updated from the already factored columns, then pivoted on its
    /// largest remaining entry.
    pub fn new(a: &Matrix<T>) -> Self {
        let (m, n) = a.shape();
        let mut lu = a.clone();
        let mut piv: Vec<usize> = (0..m).collect();
        let mut even = true;
        let mut col = vec![T::zero(); m];

        for j in 0..n {
            for (i, c) in col.iter_mut().enumerate() {
                *c = lu[(i, j)];
            }

            for i in 0..m {
                let kmax = i.min(j);
                let row = lu.row_slice(i);
                let mut s = T::zero();
                for k in 0..kmax {
                    s = s + row[k] * col[k];
                }
                col[i] = col[i] - s;
                lu[(i, j)] = col[i];
            }

            let mut p = j;
            for i in (j + 1)..m {
                if col[i].abs() > col[p].abs() {
                    p = i;
                }
            }
            if p != j {
                lu.swap_rows(p, j);
                piv.swap(p, j);
                even = !even;
            }

            if j < m {
                let pivot = lu[(j, j)];
                if pivot != T::zero() {
                    for i in (j + 1)..m {
                        lu[(i, j)] = lu[(i, j)] / pivot;
                    }
                }
            }
        }

        let out = Self { lu, piv, even };
        debug!(
            rows = m,
            cols = n,
            nonsingular = out.is_nonsingular(),
            "LU factorization complete"
        );
        out
    }

    fn k(&self) -> usize {
        self.lu.nrows().min(self.lu.ncols())
    }

    /// `true` if no diagonal entry of `U` is exactly zero.
    pub fn is_nonsingular(&self) -> bool {
        (0..self.k()).all(|j| self.lu[(j, j)] != T::zero())
    }

    /// Unit lower-trapezoidal factor, `m x min(m, n)`.
    pub fn l(&self) -> Matrix<T> {
        let m = self.lu.nrows();
        let k = self.k();
        Matrix::from_fn(m, k, |i, j| {
            if i > j {
                self.lu[(i, j)]
            } else if i == j {
                T::one()
            } else {
                T::zero()
            }
        })
    }

    /// Upper-trapezoidal factor, `min(m, n) x n`.
    pub fn u(&self) -> Matrix<T> {
        let n = self.lu.ncols();
        let k = self.k();
        Matrix::from_fn(k, n, |i, j| if i <= j { self.lu[(i, j)] } else { T::zero() })
    }

    /// Row permutation: row `i` of `L * U` is row `pivot()[i]` of `A`.
    pub fn pivot(&self) -> Vec<usize> {
        self.piv.clone()
    }

    /// [`pivot`](Self::pivot) as floating-point values.
    pub fn pivot_f(&self) -> Vec<T> {
        self.piv.iter().map(|&p| T::lit(p as f64)).collect()
    }

    /// Determinant. Requires a square matrix.
    pub fn det(&self) -> Result<T, LinalgError> {
        require_square(&self.lu)?;
        let mut d = if self.even { T::one() } else { -T::one() };
        for j in 0..self.lu.ncols() {
            d = d * self.lu[(j, j)];
        }
        Ok(d)
    }

    /// Solve `A * X = B` for `X`, one column of `X` per column of `B`.
    ///
    /// Fails with [`LinalgError::NotSquare`] for a rectangular `A`,
    /// [`LinalgError::RowMismatch`] if `B` has the wrong number of rows and
    /// [`LinalgError::Singular`] if `A` is singular.
    pub fn solve(&self, b: &Matrix<T>) -> Result<Matrix<T>, LinalgError> {
        require_square(&self.lu)?;
        let n = self.lu.ncols();
        require_rows(b, n)?;
        if !self.is_nonsingular() {
            debug!(n, "LU solve refused: matrix is singular");
            return Err(LinalgError::Singular);
        }

        let nx = b.ncols();
        let all_cols: Vec<usize> = (0..nx).collect();
        let mut x = b.submatrix(&self.piv, &all_cols);

        // L * Y = B[piv, :]
        for k in 0..n {
            for i in (k + 1)..n {
                let f = self.lu[(i, k)];
                for j in 0..nx {
                    x[(i, j)] = x[(i, j)] - x[(k, j)] * f;
                }
            }
        }
        // U * X = Y
        for k in (0..n).rev() {
            let d = self.lu[(k, k)];
            for j in 0..nx {
                x[(k, j)] = x[(k, j)] / d;
            }
            for i in 0..k {
                let f = self.lu[(i, k)];
                for j in 0..nx {
                    x[(i, j)] = x[(i, j)] - x[(k, j)] * f;
                }
            }
        }
        Ok(x)
    }

    /// Matrix inverse, `solve(I)`.
    pub fn inverse(&self) -> Result<Matrix<T>, LinalgError> {
        self.solve(&Matrix::eye(self.lu.nrows()))
    }
}

/// Convenience methods backed by LU.
impl<T: FloatScalar> Matrix<T> {
    /// LU decomposition with partial pivoting.
    pub fn lu(&self) -> LuDecomposition<T> {
        LuDecomposition::new(self)
    }

    /// Determinant via LU. Requires a square matrix.
    ///
    /// ```
    /// use jupiter_linalg::Matrix;
    /// let a = Matrix::from_rows(2, 2, &[4.0_f64, 3.0, 6.0, 3.0]);
    /// assert!((a.det().unwrap() - (-6.0)).abs() < 1e-12);
    /// ```
    pub fn det(&self) -> Result<T, LinalgError> {
        self.lu().det()
    }

    /// Solve `A * X = B`: LU for square `A`, QR least squares otherwise.
    ///
    /// ```
    /// use jupiter_linalg::Matrix;
    /// let a = Matrix::from_rows(3, 3, &[
    ///     2.0_f64, 1.0, -1.0,
    ///     -3.0, -1.0, 2.0,
    ///     -2.0, 1.0, 2.0,
    /// ]);
    /// let b = Matrix::from_rows(3, 1, &[8.0, -11.0, -3.0]);
    /// let x = a.solve(&b).unwrap();
    /// assert!((x[(0, 0)] - 2.0).abs() < 1e-12);
    /// assert!((x[(1, 0)] - 3.0).abs() < 1e-12);
    /// assert!((x[(2, 0)] + 1.0).abs() < 1e-12);
    /// ```
    pub fn solve(&self, b: &Matrix<T>) -> Result<Matrix<T>, LinalgError> {
        if self.is_square() {
            self.lu().solve(b)
        } else {
            self.qr()?.solve(b)
        }
    }

    /// Solve `X * A = B`, i.e. `Aᵗ * Xᵗ = Bᵗ`.
    pub fn solve_transpose(&self, b: &Matrix<T>) -> Result<Matrix<T>, LinalgError> {
        Ok(self.transpose().solve(&b.transpose())?.transpose())
    }

    /// Inverse for square `A`, least-squares pseudo-inverse for tall `A`.
    ///
    /// ```
    /// use jupiter_linalg::Matrix;
    /// let a = Matrix::from_rows(2, 2, &[4.0_f64, 7.0, 2.0, 6.0]);
    /// let id = &a * &a.inverse().unwrap();
    /// assert!((id[(0, 0)] - 1.0).abs() < 1e-12);
    /// assert!(id[(0, 1)].abs() < 1e-12);
    /// ```
    pub fn inverse(&self) -> Result<Matrix<T>, LinalgError> {
        self.solve(&Matrix::eye(self.nrows()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linalg::{assert_matrix_near, is_near_identity};

    const TOL: f64 = 1e-12;

    fn assert_near(a: f64, b: f64, tol: f64, msg: &str) {
        assert!((a - b).abs() < tol, "{}: {} vs {} (diff {})", msg, a, b, (a - b).abs());
    }

    fn permuted(a: &Matrix<f64>, piv: &[usize]) -> Matrix<f64> {
        let cols: Vec<usize> = (0..a.ncols()).collect();
        a.submatrix(piv, &cols)
    }

    #[test]
    fn lu_solve_2x2() {
        // 3x + 2y = 7
        // x + 4y = 9
        let a = Matrix::from_rows(2, 2, &[3.0, 2.0, 1.0, 4.0]);
        let b = Matrix::from_rows(2, 1, &[7.0, 9.0]);
        let x = a.lu().solve(&b).unwrap();
        assert_near(x[(0, 0)], 1.0, TOL, "x0");
        assert_near(x[(1, 0)], 2.0, TOL, "x1");
    }

    #[test]
    fn reconstruct_square() {
        let a = Matrix::from_rows(
            4,
            4,
            &[
                1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 2.0, 6.0, 4.0, 1.0, 3.0, 1.0, 9.0, 2.0,
            ],
        );
        let lu = a.lu();
        let l = lu.l();
        let u = lu.u();
        assert_matrix_near(&(&l * &u), &permuted(&a, &lu.pivot()), TOL, "LU");
        for i in 0..4 {
            assert_eq!(l[(i, i)], 1.0);
            for j in 0..i {
                assert_eq!(u[(i, j)], 0.0);
            }
        }
    }

    #[test]
    fn pivots_on_largest_entry() {
        let a: Matrix<f64> = Matrix::from_rows(3, 3, &[1.0, 2.0, 3.0, 7.0, 1.0, 1.0, 2.0, 5.0, 1.0]);
        let lu = a.lu();
        assert_eq!(lu.pivot()[0], 1);
        for i in 1..3 {
            for j in 0..i {
                assert!(lu.l()[(i, j)].abs() <= 1.0);
            }
        }
        let pf = lu.pivot_f();
        assert_eq!(pf.len(), 3);
        assert_eq!(pf[0], 1.0);
    }

    #[test]
    fn determinant() {
        let a = Matrix::from_rows(2, 2, &[4.0, 3.0, 6.0, 3.0]);
        assert_near(a.lu().det().unwrap(), -6.0, TOL, "det");

        let b = Matrix::from_rows(3, 3, &[6.0, 1.0, 1.0, 4.0, -2.0, 5.0, 2.0, 8.0, 7.0]);
        assert_near(b.det().unwrap(), -306.0, 1e-10, "det 3x3");
    }

    #[test]
    fn det_requires_square() {
        let a = Matrix::<f64>::zeros(3, 2);
        assert_eq!(
            a.lu().det().unwrap_err(),
            LinalgError::NotSquare { rows: 3, cols: 2 }
        );
    }

    #[test]
    fn singular_is_reported_at_solve() {
        let a = Matrix::from_rows(2, 2, &[1.0, 2.0, 2.0, 4.0]);
        let lu = a.lu();
        assert!(!lu.is_nonsingular());
        assert_eq!(lu.det().unwrap(), 0.0);
        let b = Matrix::from_rows(2, 1, &[1.0, 2.0]);
        assert_eq!(lu.solve(&b).unwrap_err(), LinalgError::Singular);
        assert_eq!(lu.inverse().unwrap_err(), LinalgError::Singular);
    }

    #[test]
    fn solve_row_mismatch() {
        let lu = Matrix::<f64>::eye(3).lu();
        let b = Matrix::zeros(2, 1);
        assert_eq!(
            lu.solve(&b).unwrap_err(),
            LinalgError::RowMismatch { expected: 3, got: 2 }
        );
    }

    #[test]
    fn solve_multiple_right_hand_sides() {
        let a = Matrix::from_rows(3, 3, &[1.0, 2.0, 3.0, 0.0, 1.0, 4.0, 5.0, 6.0, 0.0]);
        let b = Matrix::from_rows(3, 2, &[1.0, 0.0, 2.0, 1.0, 3.0, -1.0]);
        let x = a.solve(&b).unwrap();
        assert_matrix_near(&(&a * &x), &b, 1e-10, "AX");
    }

    #[test]
    fn inverse_3x3() {
        let a = Matrix::from_rows(3, 3, &[1.0, 2.0, 3.0, 0.0, 1.0, 4.0, 5.0, 6.0, 0.0]);
        let inv = a.inverse().unwrap();
        assert!(is_near_identity(&(&a * &inv), 1e-10));
    }

    #[test]
    fn tall_rectangular_factors() {
        let a = Matrix::from_rows(3, 2, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let lu = a.lu();
        assert_eq!(lu.l().shape(), (3, 2));
        assert_eq!(lu.u().shape(), (2, 2));
        assert!(lu.is_nonsingular());
        assert_matrix_near(&(&lu.l() * &lu.u()), &permuted(&a, &lu.pivot()), TOL, "LU");
        assert!(matches!(lu.solve(&Matrix::zeros(3, 1)), Err(LinalgError::NotSquare { .. })));
    }

    #[test]
    fn wide_rectangular_factors() {
        let a = Matrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let lu = a.lu();
        assert_eq!(lu.l().shape(), (2, 2));
        assert_eq!(lu.u().shape(), (2, 3));
        assert_matrix_near(&(&lu.l() * &lu.u()), &permuted(&a, &lu.pivot()), TOL, "LU");
    }

    #[test]
    fn copy_in_at_construction() {
        let mut a = Matrix::from_rows(2, 2, &[2.0, 1.0, 1.0, 3.0]);
        let lu = a.lu();
        a[(0, 0)] = 100.0;
        assert_near(lu.det().unwrap(), 5.0, TOL, "det unaffected");
    }

    #[test]
    fn getters_are_idempotent() {
        let a = Matrix::from_rows(2, 2, &[2.0, 1.0, 1.0, 3.0]);
        let lu = a.lu();
        assert_eq!(lu.l(), lu.l());
        assert_eq!(lu.u(), lu.u());
        assert_eq!(lu.pivot(), lu.pivot());
    }

    #[test]
    fn empty_matrix() {
        let lu = Matrix::<f64>::zeros(0, 0).lu();
        assert!(lu.is_nonsingular());
        assert_eq!(lu.det().unwrap(), 1.0);
        assert_eq!(lu.solve(&Matrix::zeros(0, 2)).unwrap().shape(), (0, 2));
    }

    #[test]
    fn solve_transpose() {
        let a = Matrix::from_rows(2, 2, &[2.0, 1.0, 1.0, 3.0]);
        let b = Matrix::from_rows(1, 2, &[3.0, 4.0]);
        let x = a.solve_transpose(&b).unwrap();
        assert_matrix_near(&(&x * &a), &b, TOL, "XA");
    }

    #[test]
    fn f32_elements() {
        let a = Matrix::from_rows(2, 2, &[3.0_f32, 2.0, 1.0, 4.0]);
        let x = a.solve(&Matrix::from_rows(2, 1, &[7.0, 9.0])).unwrap();
        assert!((x[(0, 0)] - 1.0).abs() < 1e-5);
        assert!((x[(1, 0)] - 2.0).abs() < 1e-5);
    }
}
