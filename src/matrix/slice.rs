use crate::traits::Scalar;

use super::Matrix;

impl<T> Matrix<T> {
    /// View the entire matrix as a flat slice in row-major order.
    ///
    /// ```
    /// use jupiter_linalg::Matrix;
    /// let m = Matrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
    /// assert_eq!(m.as_slice(), &[1.0, 2.0, 3.0, 4.0]);
    /// ```
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// View the entire matrix as a mutable flat slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// View row `i` as a slice.
    ///
    /// ```
    /// use jupiter_linalg::Matrix;
    /// let m = Matrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    /// assert_eq!(m.row_slice(0), &[1.0, 2.0, 3.0]);
    /// assert_eq!(m.row_slice(1), &[4.0, 5.0, 6.0]);
    /// ```
    #[inline]
    pub fn row_slice(&self, i: usize) -> &[T] {
        let start = i * self.ncols;
        &self.data[start..start + self.ncols]
    }

    /// View row `i` as a mutable slice.
    #[inline]
    pub fn row_slice_mut(&mut self, i: usize) -> &mut [T] {
        let start = i * self.ncols;
        let end = start + self.ncols;
        &mut self.data[start..end]
    }

    /// Iterate over all elements in row-major order.
    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Iterate mutably over all elements in row-major order.
    #[inline]
    pub fn iter_mut(&mut self) -> core::slice::IterMut<'_, T> {
        self.data.iter_mut()
    }

    /// Swap rows `a` and `b` in place.
    pub fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        let n = self.ncols;
        for j in 0..n {
            self.data.swap(a * n + j, b * n + j);
        }
    }
}

impl<T: Scalar> Matrix<T> {
    /// Copy of the row-major buffer.
    #[inline]
    pub fn to_vec(&self) -> Vec<T> {
        self.data.clone()
    }

    /// Copy of column `j`.
    ///
    /// ```
    /// use jupiter_linalg::Matrix;
    /// let m = Matrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
    /// assert_eq!(m.column(1), vec![2.0, 4.0]);
    /// ```
    pub fn column(&self, j: usize) -> Vec<T> {
        assert!(j < self.ncols, "column {} out of bounds for {} columns", j, self.ncols);
        (0..self.nrows).map(|i| self.data[i * self.ncols + j]).collect()
    }
}

impl<'a, T> IntoIterator for &'a Matrix<T> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_slice_mut() {
        let mut m = Matrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        m.row_slice_mut(1)[0] = 30.0;
        assert_eq!(m[(1, 0)], 30.0);
    }

    #[test]
    fn swap_rows() {
        let mut m = Matrix::from_rows(3, 2, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        m.swap_rows(0, 2);
        assert_eq!(m.as_slice(), &[5.0, 6.0, 3.0, 4.0, 1.0, 2.0]);
        m.swap_rows(1, 1);
        assert_eq!(m.row_slice(1), &[3.0, 4.0]);
    }

    #[test]
    fn column_copy() {
        let m = Matrix::from_rows(3, 2, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(m.column(0), vec![1.0, 3.0, 5.0]);
    }

    #[test]
    fn iterate_by_reference() {
        let m = Matrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let sum: f64 = (&m).into_iter().sum();
        assert_eq!(sum, 10.0);
    }
}
