mod norm;
mod ops;
mod slice;
mod square;

use core::ops::{Index, IndexMut};

use crate::linalg::LinalgError;
use crate::traits::Scalar;

/// Dense, heap-allocated matrix with runtime dimensions.
///
/// Row-major `Vec<T>` storage: element `(i, j)` lives at linear index
/// `i * ncols + j`. This is the value type every decomposition consumes and
/// produces.
///
/// # Examples
///
/// ```
/// use jupiter_linalg::Matrix;
///
/// let a = Matrix::from_rows(2, 2, &[1.0_f64, 2.0, 3.0, 4.0]);
/// assert_eq!(a[(0, 1)], 2.0);
/// assert_eq!(a.nrows(), 2);
/// assert_eq!(a.ncols(), 2);
///
/// let b = Matrix::<f64>::eye(3);
/// assert_eq!(b[(0, 0)], 1.0);
/// assert_eq!(b[(0, 1)], 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Matrix<T> {
    data: Vec<T>,
    nrows: usize,
    ncols: usize,
}

// ── Constructors ────────────────────────────────────────────────────

impl<T: Scalar> Matrix<T> {
    /// Create an `nrows x ncols` matrix of zeros.
    ///
    /// ```
    /// use jupiter_linalg::Matrix;
    /// let m = Matrix::<f64>::zeros(2, 3);
    /// assert_eq!(m.nrows(), 2);
    /// assert_eq!(m.ncols(), 3);
    /// assert_eq!(m[(1, 2)], 0.0);
    /// ```
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self {
            data: vec![T::zero(); nrows * ncols],
            nrows,
            ncols,
        }
    }

    /// Create a matrix filled with a given value.
    pub fn fill(nrows: usize, ncols: usize, value: T) -> Self {
        Self {
            data: vec![value; nrows * ncols],
            nrows,
            ncols,
        }
    }

    /// Create an `n x n` identity matrix.
    pub fn eye(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m[(i, i)] = T::one();
        }
        m
    }

    /// Create an `nrows x ncols` matrix with ones on the main diagonal.
    ///
    /// This is the thin identity the QR orthonormal factor is built from.
    ///
    /// ```
    /// use jupiter_linalg::Matrix;
    /// let m = Matrix::<f64>::eye_rect(3, 2);
    /// assert_eq!(m.as_slice(), &[1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
    /// ```
    pub fn eye_rect(nrows: usize, ncols: usize) -> Self {
        let mut m = Self::zeros(nrows, ncols);
        for i in 0..nrows.min(ncols) {
            m[(i, i)] = T::one();
        }
        m
    }

    /// Create a matrix from a flat row-major slice.
    ///
    /// Panics if `row_major.len() != nrows * ncols`.
    ///
    /// ```
    /// use jupiter_linalg::Matrix;
    /// let m = Matrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    /// assert_eq!(m[(0, 2)], 3.0);
    /// assert_eq!(m[(1, 0)], 4.0);
    /// ```
    pub fn from_rows(nrows: usize, ncols: usize, row_major: &[T]) -> Self {
        assert_eq!(
            row_major.len(),
            nrows * ncols,
            "slice length {} does not match {}x{} matrix",
            row_major.len(),
            nrows,
            ncols,
        );
        Self {
            data: row_major.to_vec(),
            nrows,
            ncols,
        }
    }

    /// Create a matrix from an owned row-major `Vec<T>`.
    ///
    /// Panics if `data.len() != nrows * ncols`.
    pub fn from_vec(nrows: usize, ncols: usize, data: Vec<T>) -> Self {
        assert_eq!(
            data.len(),
            nrows * ncols,
            "vec length {} does not match {}x{} matrix",
            data.len(),
            nrows,
            ncols,
        );
        Self { data, nrows, ncols }
    }

    /// Create a matrix from a two-dimensional array, one `Vec` per row.
    ///
    /// Returns [`LinalgError::RaggedRows`] if the rows differ in length.
    ///
    /// ```
    /// use jupiter_linalg::Matrix;
    /// let m = Matrix::from_nested(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
    /// assert_eq!(m[(1, 0)], 3.0);
    ///
    /// assert!(Matrix::from_nested(&[vec![1.0, 2.0], vec![3.0]]).is_err());
    /// ```
    pub fn from_nested(rows: &[Vec<T>]) -> Result<Self, LinalgError> {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(nrows * ncols);
        for (row, values) in rows.iter().enumerate() {
            if values.len() != ncols {
                return Err(LinalgError::RaggedRows {
                    row,
                    expected: ncols,
                    got: values.len(),
                });
            }
            data.extend_from_slice(values);
        }
        Ok(Self { data, nrows, ncols })
    }

    /// Copy the matrix out as a two-dimensional array, one `Vec` per row.
    pub fn to_nested(&self) -> Vec<Vec<T>> {
        (0..self.nrows).map(|i| self.row_slice(i).to_vec()).collect()
    }
}

impl<T> Matrix<T> {
    /// Number of rows.
    #[inline]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Number of columns.
    #[inline]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// `(nrows, ncols)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    /// Whether the matrix is square.
    #[inline]
    pub fn is_square(&self) -> bool {
        self.nrows == self.ncols
    }

    /// Whether the matrix has no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Create a matrix by calling `f(row, col)` for each element.
    ///
    /// ```
    /// use jupiter_linalg::Matrix;
    /// let m = Matrix::from_fn(3, 3, |i, j| if i == j { 1.0_f64 } else { 0.0 });
    /// assert_eq!(m[(0, 0)], 1.0);
    /// assert_eq!(m[(0, 1)], 0.0);
    /// ```
    pub fn from_fn(nrows: usize, ncols: usize, f: impl Fn(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(nrows * ncols);
        for i in 0..nrows {
            for j in 0..ncols {
                data.push(f(i, j));
            }
        }
        Self { data, nrows, ncols }
    }

    /// Element at `(row, col)`, or `None` if out of bounds.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row < self.nrows && col < self.ncols {
            self.data.get(row * self.ncols + col)
        } else {
            None
        }
    }

    /// Consume the matrix, returning the row-major buffer.
    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

// ── Index ───────────────────────────────────────────────────────────

impl<T> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &T {
        debug_assert!(row < self.nrows && col < self.ncols, "index ({row}, {col}) out of bounds");
        &self.data[row * self.ncols + col]
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix<T> {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        debug_assert!(row < self.nrows && col < self.ncols, "index ({row}, {col}) out of bounds");
        &mut self.data[row * self.ncols + col]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeros() {
        let m = Matrix::<f64>::zeros(3, 4);
        assert_eq!(m.nrows(), 3);
        assert_eq!(m.ncols(), 4);
        assert!(m.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn eye() {
        let m = Matrix::<f64>::eye(3);
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_eq!(m[(i, j)], expected);
            }
        }
    }

    #[test]
    fn eye_rect_is_thin_identity() {
        let m = Matrix::<f64>::eye_rect(3, 2);
        assert_eq!(m.as_slice(), &[1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn from_rows_is_row_major() {
        let m = Matrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(m[(0, 0)], 1.0);
        assert_eq!(m[(0, 2)], 3.0);
        assert_eq!(m[(1, 0)], 4.0);
        assert_eq!(m[(1, 2)], 6.0);
    }

    #[test]
    #[should_panic(expected = "slice length")]
    fn from_rows_wrong_length() {
        let _ = Matrix::from_rows(2, 2, &[1.0, 2.0, 3.0]);
    }

    #[test]
    #[should_panic(expected = "vec length")]
    fn from_vec_wrong_length() {
        let _ = Matrix::from_vec(2, 2, vec![1.0]);
    }

    #[test]
    fn nested_round_trip() {
        let rows = vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]];
        let m = Matrix::from_nested(&rows).unwrap();
        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m.to_nested(), rows);
    }

    #[test]
    fn nested_ragged_rows() {
        let err = Matrix::from_nested(&[vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0]]).unwrap_err();
        assert_eq!(
            err,
            LinalgError::RaggedRows {
                row: 2,
                expected: 2,
                got: 1
            }
        );
    }

    #[test]
    fn nested_empty() {
        let m = Matrix::<f64>::from_nested(&[]).unwrap();
        assert!(m.is_empty());
        assert_eq!(m.shape(), (0, 0));
    }

    #[test]
    fn from_fn() {
        let m = Matrix::from_fn(3, 3, |i, j| (i * 3 + j) as f64);
        assert_eq!(m.as_slice(), &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
    }

    #[test]
    fn get_checks_bounds() {
        let m = Matrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(m.get(1, 1), Some(&4.0));
        assert_eq!(m.get(2, 0), None);
        assert_eq!(m.get(0, 2), None);
    }

    #[test]
    fn index_mut() {
        let mut m = Matrix::<f64>::zeros(2, 2);
        m[(0, 1)] = 5.0;
        assert_eq!(m[(0, 1)], 5.0);
        assert_eq!(m.as_slice(), &[0.0, 5.0, 0.0, 0.0]);
    }

    #[test]
    fn clone_is_deep() {
        let a = Matrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let mut b = a.clone();
        b[(0, 0)] = 9.0;
        assert_eq!(a[(0, 0)], 1.0);
    }
}
