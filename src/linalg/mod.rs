//! Dense matrix decompositions.
//!
//! Every decomposition is computed eagerly, once, in its constructor, on a
//! private copy of the input. Queries afterwards are pure.
//!
//! | Type | Factorization | Input |
//! |---|---|---|
//! | [`LuDecomposition`] | `A[piv, :] = L U` | any `m x n` |
//! | [`QrDecomposition`] | `A = Q R` | `m >= n` |
//! | [`CholeskyDecomposition`] | `A = L Lᵗ` | square |
//! | [`EigenvalueDecomposition`] | `A V = V D` | square |
//! | [`SingularValueDecomposition`] | `A = U Σ Vᵗ` | any `m x n` |

pub(crate) mod cholesky;
pub(crate) mod eigen;
pub(crate) mod hessenberg;
pub(crate) mod hypot;
pub(crate) mod lu;
pub(crate) mod qr;
pub(crate) mod schur;
pub(crate) mod svd;
pub(crate) mod symmetric_eigen;

pub use cholesky::CholeskyDecomposition;
pub use eigen::EigenvalueDecomposition;
pub use hypot::hypot;
pub use lu::LuDecomposition;
pub use qr::QrDecomposition;
pub use svd::SingularValueDecomposition;

use crate::Matrix;

/// Errors from linear algebra operations.
///
/// Returned by decomposition constructors, `solve` and the derived queries
/// that need a feasible factorization. Use [`LinalgError::kind`] to tell
/// shape mistakes from numerically infeasible input.
///
/// ```
/// use jupiter_linalg::Matrix;
/// use jupiter_linalg::linalg::{ErrorKind, LinalgError};
///
/// let singular = Matrix::from_rows(2, 2, &[1.0_f64, 2.0, 2.0, 4.0]);
/// let err = singular.solve(&Matrix::eye(2)).unwrap_err();
/// assert_eq!(err, LinalgError::Singular);
/// assert_eq!(err.kind(), ErrorKind::Infeasible);
///
/// let wide = Matrix::<f64>::zeros(2, 3);
/// assert_eq!(wide.cholesky().unwrap_err().kind(), ErrorKind::Structural);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LinalgError {
    /// Operation needs a square matrix.
    #[error("matrix must be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },
    /// QR needs at least as many rows as columns.
    #[error("matrix must have rows >= cols, got {rows}x{cols}")]
    NotTall { rows: usize, cols: usize },
    /// Right-hand side row count differs from the factored matrix.
    #[error("row dimensions must agree: expected {expected}, got {got}")]
    RowMismatch { expected: usize, got: usize },
    /// Nested rows of unequal length.
    #[error("row {row} has length {got}, expected {expected}")]
    RaggedRows { row: usize, expected: usize, got: usize },
    /// Matrix is singular.
    #[error("matrix is singular")]
    Singular,
    /// Matrix is rank deficient.
    #[error("matrix is rank deficient")]
    RankDeficient,
    /// Matrix is not symmetric positive definite.
    #[error("matrix is not symmetric positive definite")]
    NotPositiveDefinite,
    /// Input to an iterative decomposition contains NaN or infinity.
    #[error("matrix contains non-finite entries")]
    NonFinite,
    /// Iterative algorithm did not converge within the iteration budget.
    #[error("{algorithm} did not converge within {iterations} iterations")]
    ConvergenceFailure {
        algorithm: &'static str,
        iterations: usize,
    },
}

/// Broad category of a [`LinalgError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Input has the wrong shape for the operation.
    Structural,
    /// Shape is fine but the matrix is singular, rank deficient, not SPD or
    /// holds non-finite entries.
    Infeasible,
    /// An iterative decomposition hit its iteration cap.
    NonConvergence,
}

impl LinalgError {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            LinalgError::NotSquare { .. }
            | LinalgError::NotTall { .. }
            | LinalgError::RowMismatch { .. }
            | LinalgError::RaggedRows { .. } => ErrorKind::Structural,
            LinalgError::Singular
            | LinalgError::RankDeficient
            | LinalgError::NotPositiveDefinite
            | LinalgError::NonFinite => ErrorKind::Infeasible,
            LinalgError::ConvergenceFailure { .. } => ErrorKind::NonConvergence,
        }
    }
}

pub(crate) fn require_square<T>(a: &Matrix<T>) -> Result<(), LinalgError> {
    if a.is_square() {
        Ok(())
    } else {
        Err(LinalgError::NotSquare {
            rows: a.nrows(),
            cols: a.ncols(),
        })
    }
}

pub(crate) fn require_rows<T>(b: &Matrix<T>, expected: usize) -> Result<(), LinalgError> {
    if b.nrows() == expected {
        Ok(())
    } else {
        Err(LinalgError::RowMismatch {
            expected,
            got: b.nrows(),
        })
    }
}

/// Reject NaN or infinite entries before an iteration that could only
/// exhaust its sweep limit on them.
pub(crate) fn require_finite<T: crate::traits::FloatScalar>(
    a: &Matrix<T>,
) -> Result<(), LinalgError> {
    if a.iter().all(|x| x.is_finite()) {
        Ok(())
    } else {
        tracing::debug!(rows = a.nrows(), cols = a.ncols(), "non-finite input refused");
        Err(LinalgError::NonFinite)
    }
}

/// Log and build the error for an iteration that hit its sweep limit.
pub(crate) fn not_converged(algorithm: &'static str, iterations: usize) -> LinalgError {
    tracing::warn!(algorithm, iterations, "iteration limit reached without convergence");
    LinalgError::ConvergenceFailure {
        algorithm,
        iterations,
    }
}

/// `true` if every entry is within `tol` of the identity.
#[cfg(test)]
pub(crate) fn is_near_identity<T: crate::traits::FloatScalar>(m: &Matrix<T>, tol: T) -> bool {
    let (r, c) = m.shape();
    (0..r).all(|i| {
        (0..c).all(|j| {
            let expected = if i == j { T::one() } else { T::zero() };
            (m[(i, j)] - expected).abs() <= tol
        })
    })
}

#[cfg(test)]
pub(crate) fn assert_matrix_near(a: &Matrix<f64>, b: &Matrix<f64>, tol: f64, what: &str) {
    assert_eq!(a.shape(), b.shape(), "{}: shape mismatch", what);
    for i in 0..a.nrows() {
        for j in 0..a.ncols() {
            assert!(
                (a[(i, j)] - b[(i, j)]).abs() < tol,
                "{}[({},{})]: {} vs {}",
                what,
                i,
                j,
                a[(i, j)],
                b[(i, j)]
            );
        }
    }
}
