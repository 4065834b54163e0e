use crate::linalg::hypot;
use crate::traits::FloatScalar;

use super::Matrix;

impl<T: FloatScalar> Matrix<T> {
    /// One norm (maximum absolute column sum).
    ///
    /// ```
    /// use jupiter_linalg::Matrix;
    /// let m = Matrix::from_rows(2, 2, &[1.0_f64, -2.0, 3.0, 4.0]);
    /// assert_eq!(m.norm1(), 6.0);
    /// ```
    pub fn norm1(&self) -> T {
        let mut max = T::zero();
        for j in 0..self.ncols {
            let mut col_sum = T::zero();
            for i in 0..self.nrows {
                col_sum = col_sum + self[(i, j)].abs();
            }
            if col_sum > max {
                max = col_sum;
            }
        }
        max
    }

    /// Infinity norm (maximum absolute row sum).
    ///
    /// ```
    /// use jupiter_linalg::Matrix;
    /// let m = Matrix::from_rows(2, 2, &[1.0_f64, -2.0, 3.0, 4.0]);
    /// assert_eq!(m.norm_inf(), 7.0);
    /// ```
    pub fn norm_inf(&self) -> T {
        let mut max = T::zero();
        for i in 0..self.nrows {
            let row_sum = self
                .row_slice(i)
                .iter()
                .fold(T::zero(), |acc, &x| acc + x.abs());
            if row_sum > max {
                max = row_sum;
            }
        }
        max
    }

    /// Frobenius norm, accumulated with [`hypot`] so that large entries do
    /// not overflow the sum of squares.
    ///
    /// ```
    /// use jupiter_linalg::Matrix;
    /// let m = Matrix::from_rows(2, 2, &[3.0_f64, 0.0, 0.0, 4.0]);
    /// assert!((m.norm_frobenius() - 5.0).abs() < 1e-12);
    /// ```
    pub fn norm_frobenius(&self) -> T {
        self.data.iter().fold(T::zero(), |acc, &x| hypot(acc, x))
    }

    /// Largest absolute element.
    pub fn max_abs(&self) -> T {
        self.data
            .iter()
            .fold(T::zero(), |acc, &x| if x.abs() > acc { x.abs() } else { acc })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-12;

    #[test]
    fn norms_of_rectangular() {
        let m = Matrix::from_rows(2, 3, &[1.0_f64, -2.0, 3.0, -4.0, 5.0, -6.0]);
        assert_eq!(m.norm1(), 9.0);
        assert_eq!(m.norm_inf(), 15.0);
        assert_eq!(m.max_abs(), 6.0);
        assert!((m.norm_frobenius() - 91.0_f64.sqrt()).abs() < TOL);
    }

    #[test]
    fn frobenius_does_not_overflow() {
        let big = 1e200_f64;
        let m = Matrix::from_rows(1, 2, &[3.0 * big, 4.0 * big]);
        let n = m.norm_frobenius();
        assert!(n.is_finite());
        assert!((n / big - 5.0).abs() < TOL);
    }

    #[test]
    fn empty_norms_are_zero() {
        let m = Matrix::<f64>::zeros(0, 0);
        assert_eq!(m.norm1(), 0.0);
        assert_eq!(m.norm_inf(), 0.0);
        assert_eq!(m.norm_frobenius(), 0.0);
        assert_eq!(m.max_abs(), 0.0);
    }
}
