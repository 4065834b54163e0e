//! # jupiter-linalg
//!
//! Dense linear-algebra decompositions over a row-major, heap-allocated
//! matrix: LU, QR, Cholesky, eigenvalue and singular value. Generic over
//! `f32` and `f64`.
//!
//! ## Quick start
//!
//! ```
//! use jupiter_linalg::Matrix;
//!
//! // Solve a linear system AX = B
//! let a = Matrix::from_rows(3, 3, &[
//!     2.0_f64, 1.0, -1.0,
//!     -3.0, -1.0, 2.0,
//!     -2.0, 1.0, 2.0,
//! ]);
//! let b = Matrix::from_rows(3, 1, &[8.0, -11.0, -3.0]);
//! let x = a.solve(&b).unwrap(); // x = [2, 3, -1]
//! assert!((x[(1, 0)] - 3.0).abs() < 1e-12);
//!
//! // Symmetric eigenproblem
//! let s = Matrix::from_rows(2, 2, &[2.0_f64, 1.0, 1.0, 2.0]);
//! let eig = s.eig().unwrap();
//! assert!((eig.real_eigenvalues()[1] - 3.0).abs() < 1e-12);
//!
//! // Singular values
//! let svd = a.svd().unwrap();
//! assert!(svd.cond() > 1.0);
//! ```
//!
//! ## Modules
//!
//! - [`matrix`]: `Matrix<T>` with runtime dimensions and `Vec<T>` row-major
//!   storage. Construction, indexing, transpose, submatrix extraction,
//!   arithmetic and norms.
//!
//! - [`linalg`]: The decompositions and the error type:
//!   - [`LuDecomposition`]: partial pivoting, any shape. `solve`, `det`, `inverse`.
//!   - [`QrDecomposition`]: Householder, `rows >= cols`. Least-squares `solve`.
//!   - [`CholeskyDecomposition`]: `A = L Lᵗ` for symmetric positive definite `A`.
//!   - [`EigenvalueDecomposition`]: symmetric (tridiagonal QL) and general
//!     (Hessenberg + real Schur) paths.
//!   - [`SingularValueDecomposition`]: Golub–Kahan bidiagonalization with
//!     implicit-shift QR.
//!
//!   Convenience methods on `Matrix`: `a.lu()`, `a.qr()`, `a.cholesky()`,
//!   `a.eig()`, `a.svd()`, `a.solve(&b)`, `a.inverse()`, `a.det()`,
//!   `a.rank()`, `a.cond()`, `a.norm2()`.
//!
//! - [`config`]: [`ConvergenceConfig`], the iteration limit for the
//!   eigenvalue and singular value iterations.
//!
//! - [`traits`]: Element trait hierarchy:
//!   - [`Scalar`]: all matrix elements (`Copy + PartialEq + Debug + Zero + One + Num`)
//!   - [`FloatScalar`]: real floats (`Scalar + Float`), used by decompositions and norms
//!
//! ## Errors
//!
//! Fallible operations return [`LinalgError`]. Wrong shapes are reported as
//! [`ErrorKind::Structural`]; singular, rank-deficient or indefinite input as
//! [`ErrorKind::Infeasible`]; an exhausted iteration limit as
//! [`ErrorKind::NonConvergence`]. LU, QR and Cholesky construct successfully
//! for any correctly shaped input and report infeasibility through
//! `is_nonsingular` / `is_full_rank` / `is_spd` and at `solve` time.
//!
//! ## Logging
//!
//! Diagnostics are emitted as [`tracing`] events: `debug` when a
//! factorization completes or a solve is refused, `warn` when an iteration
//! limit is reached. Install any subscriber to see them.
//!
//! ## Cargo features
//!
//! | Feature   | Default | Description |
//! |-----------|---------|-------------|
//! | `complex` | no      | `EigenvalueDecomposition::eigenvalues()` as `Complex<T>` via `num-complex` |
//! | `serde`   | no      | `Serialize` / `Deserialize` for `Matrix<T>` |
//! | `all`     | no      | All features |

pub mod config;
pub mod linalg;
pub mod matrix;
pub mod traits;

pub use config::ConvergenceConfig;
pub use linalg::{
    CholeskyDecomposition, EigenvalueDecomposition, ErrorKind, LinalgError, LuDecomposition,
    QrDecomposition, SingularValueDecomposition,
};
pub use matrix::Matrix;
pub use traits::{FloatScalar, Scalar};

#[cfg(feature = "complex")]
pub use num_complex::Complex;
