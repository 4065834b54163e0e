use core::ops::Range;

use crate::traits::Scalar;

use super::Matrix;

impl<T: Scalar> Matrix<T> {
    /// Transpose.
    ///
    /// ```
    /// use jupiter_linalg::Matrix;
    /// let m = Matrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    /// let t = m.transpose();
    /// assert_eq!(t.shape(), (3, 2));
    /// assert_eq!(t[(2, 1)], 6.0);
    /// ```
    pub fn transpose(&self) -> Self {
        let (m, n) = (self.nrows, self.ncols);
        let mut data = Vec::with_capacity(m * n);
        for j in 0..n {
            for i in 0..m {
                data.push(self.data[i * n + j]);
            }
        }
        Matrix {
            data,
            nrows: n,
            ncols: m,
        }
    }

    /// Extract the submatrix at the given row and column index lists.
    ///
    /// Indices may repeat and appear in any order, which is how the LU
    /// factorization applies its row permutation.
    ///
    /// ```
    /// use jupiter_linalg::Matrix;
    /// let m = Matrix::from_rows(3, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
    /// let s = m.submatrix(&[2, 0], &[1, 2]);
    /// assert_eq!(s.as_slice(), &[8.0, 9.0, 2.0, 3.0]);
    /// ```
    pub fn submatrix(&self, rows: &[usize], cols: &[usize]) -> Self {
        let mut data = Vec::with_capacity(rows.len() * cols.len());
        for &i in rows {
            assert!(i < self.nrows, "row index {} out of bounds for {} rows", i, self.nrows);
            for &j in cols {
                assert!(j < self.ncols, "column index {} out of bounds for {} columns", j, self.ncols);
                data.push(self.data[i * self.ncols + j]);
            }
        }
        Matrix {
            data,
            nrows: rows.len(),
            ncols: cols.len(),
        }
    }

    /// Extract the contiguous block `rows x cols`.
    pub fn submatrix_range(&self, rows: Range<usize>, cols: Range<usize>) -> Self {
        assert!(rows.end <= self.nrows && rows.start <= rows.end, "row range out of bounds");
        assert!(cols.end <= self.ncols && cols.start <= cols.end, "column range out of bounds");
        let mut data = Vec::with_capacity(rows.len() * cols.len());
        for i in rows.clone() {
            data.extend_from_slice(&self.row_slice(i)[cols.clone()]);
        }
        Matrix {
            data,
            nrows: rows.len(),
            ncols: cols.len(),
        }
    }

    /// Exact elementwise symmetry test. Non-square matrices are never symmetric.
    pub fn is_symmetric(&self) -> bool {
        if !self.is_square() {
            return false;
        }
        let n = self.nrows;
        for i in 0..n {
            for j in 0..i {
                if self.data[i * n + j] != self.data[j * n + i] {
                    return false;
                }
            }
        }
        true
    }

    /// Sum of diagonal elements.
    ///
    /// ```
    /// use jupiter_linalg::Matrix;
    /// let m = Matrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
    /// assert_eq!(m.trace(), 5.0);
    /// ```
    pub fn trace(&self) -> T {
        let n = self.nrows.min(self.ncols);
        let mut sum = T::zero();
        for i in 0..n {
            sum = sum + self[(i, i)];
        }
        sum
    }

    /// Copy of the main diagonal.
    pub fn diag(&self) -> Vec<T> {
        let n = self.nrows.min(self.ncols);
        (0..n).map(|i| self[(i, i)]).collect()
    }

    /// Square diagonal matrix with `values` on the diagonal.
    ///
    /// ```
    /// use jupiter_linalg::Matrix;
    /// let m = Matrix::from_diag(&[2.0, 3.0]);
    /// assert_eq!(m[(0, 0)], 2.0);
    /// assert_eq!(m[(1, 1)], 3.0);
    /// assert_eq!(m[(0, 1)], 0.0);
    /// ```
    pub fn from_diag(values: &[T]) -> Self {
        let n = values.len();
        let mut m = Self::zeros(n, n);
        for (i, &v) in values.iter().enumerate() {
            m[(i, i)] = v;
        }
        m
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transpose_twice_is_identity() {
        let m = Matrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(m.transpose().transpose(), m);
    }

    #[test]
    fn submatrix_permutes_rows() {
        let m = Matrix::from_rows(3, 2, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let p = m.submatrix(&[2, 0, 1], &[0, 1]);
        assert_eq!(p.as_slice(), &[5.0, 6.0, 1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    #[should_panic(expected = "row index")]
    fn submatrix_out_of_bounds() {
        let m = Matrix::<f64>::eye(2);
        let _ = m.submatrix(&[2], &[0]);
    }

    #[test]
    fn submatrix_range() {
        let m = Matrix::from_fn(4, 4, |i, j| (i * 4 + j) as f64);
        let s = m.submatrix_range(1..3, 2..4);
        assert_eq!(s.as_slice(), &[6.0, 7.0, 10.0, 11.0]);
    }

    #[test]
    fn symmetry() {
        let s = Matrix::from_rows(2, 2, &[1.0, 2.0, 2.0, 5.0]);
        assert!(s.is_symmetric());
        let ns = Matrix::from_rows(2, 2, &[1.0, 2.0, 2.000001, 5.0]);
        assert!(!ns.is_symmetric());
        let rect = Matrix::<f64>::zeros(2, 3);
        assert!(!rect.is_symmetric());
    }

    #[test]
    fn trace_and_diag() {
        let m = Matrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(m.trace(), 6.0);
        assert_eq!(m.diag(), vec![1.0, 5.0]);
        assert_eq!(Matrix::from_diag(&m.diag()).shape(), (2, 2));
    }
}
