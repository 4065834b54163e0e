//! Iteration limits for the QR-iteration based decompositions.
//!
//! LU, QR and Cholesky are direct methods and need no configuration. The
//! eigenvalue (`tql2` / `hqr2`) and singular value iterations converge one
//! value at a time; [`ConvergenceConfig`] bounds how many sweeps each value
//! may take before the decomposition gives up with
//! [`LinalgError::ConvergenceFailure`](crate::linalg::LinalgError::ConvergenceFailure).

/// Default number of QR sweeps allowed per eigenvalue or singular value.
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Convergence settings for [`EigenvalueDecomposition`](crate::linalg::EigenvalueDecomposition)
/// and [`SingularValueDecomposition`](crate::linalg::SingularValueDecomposition).
///
/// ```
/// use jupiter_linalg::{ConvergenceConfig, Matrix};
/// use jupiter_linalg::linalg::SingularValueDecomposition;
///
/// let config = ConvergenceConfig::default().with_max_iterations(500);
/// let a = Matrix::from_rows(2, 2, &[3.0_f64, 2.0, 2.0, 3.0]);
/// let svd = SingularValueDecomposition::with_config(&a, &config).unwrap();
/// assert!((svd.norm2() - 5.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvergenceConfig {
    /// Maximum number of sweeps spent on a single eigenvalue or singular
    /// value. The counter resets every time a value converges.
    pub max_iterations: usize,
}

impl ConvergenceConfig {
    /// Replace the per-value sweep limit.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

impl Default for ConvergenceConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}
