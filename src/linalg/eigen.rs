use tracing::debug;

use crate::config::ConvergenceConfig;
use crate::linalg::hessenberg::orthes;
use crate::linalg::schur::hqr2;
use crate::linalg::symmetric_eigen::{tql2, tred2};
use crate::linalg::{require_finite, require_square, LinalgError};
use crate::traits::FloatScalar;
use crate::Matrix;

/// Eigenvalues and eigenvectors of a real square matrix.
///
/// If `A` is symmetric, `A = V * D * Vᵗ` with `V` orthogonal and `D`
/// diagonal, eigenvalues ascending. Otherwise `A * V = V * D` where `D` is
/// block diagonal: real eigenvalues sit on the diagonal, and each complex
/// pair `λ ± iμ` forms a `[[λ, μ], [-μ, λ]]` block. `V` may be badly
/// conditioned or singular for defective matrices.
///
/// Symmetry is tested exactly, element by element.
///
/// # Example
///
/// ```
/// use jupiter_linalg::Matrix;
///
/// let a = Matrix::from_rows(2, 2, &[2.0_f64, 1.0, 1.0, 2.0]);
/// let eig = a.eig().unwrap();
/// assert!(eig.is_symmetric());
///
/// let d = eig.real_eigenvalues();
/// assert!((d[0] - 1.0).abs() < 1e-12);
/// assert!((d[1] - 3.0).abs() < 1e-12);
///
/// // A = V D Vᵗ
/// let v = eig.v();
/// let r = &(&v * &eig.d()) * &v.transpose();
/// assert!((r[(0, 1)] - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct EigenvalueDecomposition<T> {
    symmetric: bool,
    d: Vec<T>,
    e: Vec<T>,
    v: Matrix<T>,
}

impl<T: FloatScalar> EigenvalueDecomposition<T> {
    /// Decompose `a` with the default iteration limit.
    pub fn new(a: &Matrix<T>) -> Result<Self, LinalgError> {
        Self::with_config(a, &ConvergenceConfig::default())
    }

    /// Decompose `a`, spending at most `config.max_iterations` QR sweeps on
    /// each eigenvalue.
    ///
    /// Fails with [`LinalgError::NotSquare`] for a rectangular input,
    /// [`LinalgError::NonFinite`] if `a` holds NaN or infinity, and
    /// [`LinalgError::ConvergenceFailure`] if the iteration limit is hit.
    pub fn with_config(a: &Matrix<T>, config: &ConvergenceConfig) -> Result<Self, LinalgError> {
        require_square(a)?;
        require_finite(a)?;
        let n = a.nrows();
        let mut d = vec![T::zero(); n];
        let mut e = vec![T::zero(); n];
        let symmetric = a.is_symmetric();

        let v = if symmetric {
            let mut v = a.clone();
            tred2(&mut v, &mut d, &mut e);
            tql2(&mut v, &mut d, &mut e, config.max_iterations)?;
            v
        } else {
            let mut h = a.clone();
            let mut v = Matrix::zeros(n, n);
            orthes(&mut h, &mut v);
            hqr2(&mut h, &mut v, &mut d, &mut e, config.max_iterations)?;
            v
        };

        debug!(n, symmetric, "eigenvalue decomposition complete");
        Ok(Self { symmetric, d, e, v })
    }

    /// `true` if the symmetric path was taken.
    pub fn is_symmetric(&self) -> bool {
        self.symmetric
    }

    /// Eigenvector matrix. Columns of a complex pair hold the real and
    /// imaginary parts of the eigenvector for `λ + iμ`.
    pub fn v(&self) -> Matrix<T> {
        self.v.clone()
    }

    /// Real parts of the eigenvalues.
    pub fn real_eigenvalues(&self) -> &[T] {
        &self.d
    }

    /// Imaginary parts of the eigenvalues. All zero for symmetric input.
    pub fn imag_eigenvalues(&self) -> &[T] {
        &self.e
    }

    /// Block diagonal eigenvalue matrix.
    pub fn d(&self) -> Matrix<T> {
        let n = self.d.len();
        let mut out = Matrix::from_diag(&self.d);
        for i in 0..n {
            if self.e[i] > T::zero() {
                out[(i, i + 1)] = self.e[i];
            } else if self.e[i] < T::zero() {
                out[(i, i - 1)] = self.e[i];
            }
        }
        out
    }

    /// Eigenvalues as complex numbers.
    #[cfg(feature = "complex")]
    pub fn eigenvalues(&self) -> Vec<num_complex::Complex<T>> {
        self.d
            .iter()
            .zip(self.e.iter())
            .map(|(&re, &im)| num_complex::Complex::new(re, im))
            .collect()
    }
}

impl<T: FloatScalar> Matrix<T> {
    /// Eigenvalue decomposition. Requires a square matrix.
    pub fn eig(&self) -> Result<EigenvalueDecomposition<T>, LinalgError> {
        EigenvalueDecomposition::new(self)
    }
}
