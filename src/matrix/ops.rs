use core::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use crate::traits::Scalar;

use super::Matrix;

fn assert_same_shape<T>(lhs: &Matrix<T>, rhs: &Matrix<T>, op: &str) {
    assert_eq!(
        (lhs.nrows, lhs.ncols),
        (rhs.nrows, rhs.ncols),
        "dimension mismatch: {}x{} {} {}x{}",
        lhs.nrows,
        lhs.ncols,
        op,
        rhs.nrows,
        rhs.ncols,
    );
}

impl<T: Scalar> Matrix<T> {
    /// Multiply every element by `factor`.
    pub fn scale(&self, factor: T) -> Self {
        Matrix {
            data: self.data.iter().map(|&x| x * factor).collect(),
            nrows: self.nrows,
            ncols: self.ncols,
        }
    }

    /// Matrix product `self * rhs`.
    ///
    /// Panics if `self.ncols() != rhs.nrows()`.
    ///
    /// ```
    /// use jupiter_linalg::Matrix;
    /// let a = Matrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    /// let b = Matrix::from_rows(3, 1, &[1.0, 0.0, -1.0]);
    /// assert_eq!(a.matmul(&b).as_slice(), &[-2.0, -2.0]);
    /// ```
    pub fn matmul(&self, rhs: &Matrix<T>) -> Matrix<T> {
        assert_eq!(
            self.ncols, rhs.nrows,
            "dimension mismatch: {}x{} * {}x{}",
            self.nrows, self.ncols, rhs.nrows, rhs.ncols,
        );
        let (m, k, n) = (self.nrows, self.ncols, rhs.ncols);
        let mut out = Matrix::zeros(m, n);
        for i in 0..m {
            let a_row = &self.data[i * k..(i + 1) * k];
            let out_row = &mut out.data[i * n..(i + 1) * n];
            for (p, &a_ip) in a_row.iter().enumerate() {
                let b_row = &rhs.data[p * n..(p + 1) * n];
                for (o, &b) in out_row.iter_mut().zip(b_row) {
                    *o = *o + a_ip * b;
                }
            }
        }
        out
    }

    fn zip_with(&self, rhs: &Matrix<T>, f: impl Fn(T, T) -> T) -> Matrix<T> {
        Matrix {
            data: self
                .data
                .iter()
                .zip(rhs.data.iter())
                .map(|(&a, &b)| f(a, b))
                .collect(),
            nrows: self.nrows,
            ncols: self.ncols,
        }
    }
}

// ── Element-wise addition ───────────────────────────────────────────

impl<T: Scalar> Add<&Matrix<T>> for &Matrix<T> {
    type Output = Matrix<T>;

    fn add(self, rhs: &Matrix<T>) -> Matrix<T> {
        assert_same_shape(self, rhs, "+");
        self.zip_with(rhs, |a, b| a + b)
    }
}

impl<T: Scalar> Add for Matrix<T> {
    type Output = Matrix<T>;

    fn add(self, rhs: Matrix<T>) -> Matrix<T> {
        &self + &rhs
    }
}

impl<T: Scalar> Add<&Matrix<T>> for Matrix<T> {
    type Output = Matrix<T>;

    fn add(self, rhs: &Matrix<T>) -> Matrix<T> {
        &self + rhs
    }
}

impl<T: Scalar> AddAssign<&Matrix<T>> for Matrix<T> {
    fn add_assign(&mut self, rhs: &Matrix<T>) {
        assert_same_shape(self, rhs, "+=");
        for (a, &b) in self.data.iter_mut().zip(rhs.data.iter()) {
            *a = *a + b;
        }
    }
}

// ── Element-wise subtraction ────────────────────────────────────────

impl<T: Scalar> Sub<&Matrix<T>> for &Matrix<T> {
    type Output = Matrix<T>;

    fn sub(self, rhs: &Matrix<T>) -> Matrix<T> {
        assert_same_shape(self, rhs, "-");
        self.zip_with(rhs, |a, b| a - b)
    }
}

impl<T: Scalar> Sub for Matrix<T> {
    type Output = Matrix<T>;

    fn sub(self, rhs: Matrix<T>) -> Matrix<T> {
        &self - &rhs
    }
}

impl<T: Scalar> Sub<&Matrix<T>> for Matrix<T> {
    type Output = Matrix<T>;

    fn sub(self, rhs: &Matrix<T>) -> Matrix<T> {
        &self - rhs
    }
}

impl<T: Scalar> SubAssign<&Matrix<T>> for Matrix<T> {
    fn sub_assign(&mut self, rhs: &Matrix<T>) {
        assert_same_shape(self, rhs, "-=");
        for (a, &b) in self.data.iter_mut().zip(rhs.data.iter()) {
            *a = *a - b;
        }
    }
}

// ── Negation ────────────────────────────────────────────────────────

impl<T: Scalar + Neg<Output = T>> Neg for &Matrix<T> {
    type Output = Matrix<T>;

    fn neg(self) -> Matrix<T> {
        Matrix {
            data: self.data.iter().map(|&x| -x).collect(),
            nrows: self.nrows,
            ncols: self.ncols,
        }
    }
}

impl<T: Scalar + Neg<Output = T>> Neg for Matrix<T> {
    type Output = Matrix<T>;

    fn neg(self) -> Matrix<T> {
        -&self
    }
}

// ── Matrix product ──────────────────────────────────────────────────

impl<T: Scalar> Mul<&Matrix<T>> for &Matrix<T> {
    type Output = Matrix<T>;

    fn mul(self, rhs: &Matrix<T>) -> Matrix<T> {
        self.matmul(rhs)
    }
}

impl<T: Scalar> Mul for Matrix<T> {
    type Output = Matrix<T>;

    fn mul(self, rhs: Matrix<T>) -> Matrix<T> {
        self.matmul(&rhs)
    }
}

impl<T: Scalar> Mul<&Matrix<T>> for Matrix<T> {
    type Output = Matrix<T>;

    fn mul(self, rhs: &Matrix<T>) -> Matrix<T> {
        self.matmul(rhs)
    }
}

impl<T: Scalar> Mul<Matrix<T>> for &Matrix<T> {
    type Output = Matrix<T>;

    fn mul(self, rhs: Matrix<T>) -> Matrix<T> {
        self.matmul(&rhs)
    }
}

// ── Scalar product ──────────────────────────────────────────────────

impl<T: Scalar> Mul<T> for &Matrix<T> {
    type Output = Matrix<T>;

    fn mul(self, rhs: T) -> Matrix<T> {
        self.scale(rhs)
    }
}

impl<T: Scalar> Mul<T> for Matrix<T> {
    type Output = Matrix<T>;

    fn mul(self, rhs: T) -> Matrix<T> {
        self.scale(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_sub() {
        let a = Matrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let b = Matrix::from_rows(2, 2, &[4.0, 3.0, 2.0, 1.0]);
        assert_eq!((&a + &b).as_slice(), &[5.0, 5.0, 5.0, 5.0]);
        assert_eq!((&a - &b).as_slice(), &[-3.0, -1.0, 1.0, 3.0]);

        let mut c = a.clone();
        c += &b;
        c -= &b;
        assert_eq!(c, a);
    }

    #[test]
    #[should_panic(expected = "dimension mismatch")]
    fn add_shape_mismatch() {
        let a = Matrix::<f64>::zeros(2, 2);
        let b = Matrix::<f64>::zeros(2, 3);
        let _ = &a + &b;
    }

    #[test]
    fn matmul_propagates_nan_through_zero() {
        let a = Matrix::from_rows(1, 2, &[0.0, 1.0]);
        let b = Matrix::from_rows(2, 1, &[f64::NAN, 2.0]);
        assert!((&a * &b)[(0, 0)].is_nan());

        let b = Matrix::from_rows(2, 1, &[f64::INFINITY, 2.0]);
        assert!((&a * &b)[(0, 0)].is_nan());
    }

    #[test]
    fn matmul_rectangular() {
        let a = Matrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let b = Matrix::from_rows(3, 2, &[7.0, 8.0, 9.0, 10.0, 11.0, 12.0]);
        let c = &a * &b;
        assert_eq!(c.shape(), (2, 2));
        assert_eq!(c.as_slice(), &[58.0, 64.0, 139.0, 154.0]);
    }

    #[test]
    #[should_panic(expected = "dimension mismatch")]
    fn matmul_shape_mismatch() {
        let a = Matrix::<f64>::zeros(2, 3);
        let _ = &a * &a;
    }

    #[test]
    fn matmul_identity() {
        let a = Matrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(&a * &Matrix::eye(2), a);
        assert_eq!(Matrix::eye(2) * a.clone(), a);
    }

    #[test]
    fn negate_and_scale() {
        let a = Matrix::from_rows(1, 3, &[1.0, -2.0, 3.0]);
        assert_eq!((-&a).as_slice(), &[-1.0, 2.0, -3.0]);
        assert_eq!((&a * 2.0).as_slice(), &[2.0, -4.0, 6.0]);
    }

    #[test]
    fn integer_elements() {
        let a = Matrix::from_rows(2, 2, &[1_i64, 2, 3, 4]);
        assert_eq!((&a * &a).as_slice(), &[7, 10, 15, 22]);
    }
}
