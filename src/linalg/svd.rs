use tracing::debug;

use crate::config::ConvergenceConfig;
use crate::linalg::{hypot, not_converged, require_finite, LinalgError};
use crate::traits::FloatScalar;
use crate::Matrix;

/// Singular value decomposition `A = U * diag(σ) * Vᵗ` of an `m x n` matrix.
///
/// With `k = min(m, n)`: `U` is `m x k`, `V` is `n x k`, both with
/// orthonormal columns, and `σ` holds `k` non-negative singular values in
/// descending order. Wide matrices are decomposed through their transpose.
///
/// # Example
///
/// ```
/// use jupiter_linalg::Matrix;
///
/// let a = Matrix::from_rows(3, 2, &[3.0_f64, 0.0, 0.0, 4.0, 0.0, 0.0]);
/// let svd = a.svd().unwrap();
/// assert_eq!(svd.singular_values().len(), 2);
/// assert!((svd.norm2() - 4.0).abs() < 1e-12);
/// assert!((svd.cond() - 4.0 / 3.0).abs() < 1e-12);
/// assert_eq!(svd.rank(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct SingularValueDecomposition<T> {
    u: Matrix<T>,
    v: Matrix<T>,
    s: Vec<T>,
    m: usize,
    n: usize,
}

impl<T: FloatScalar> SingularValueDecomposition<T> {
    /// Decompose `a` with the default iteration limit.
    pub fn new(a: &Matrix<T>) -> Result<Self, LinalgError> {
        Self::with_config(a, &ConvergenceConfig::default())
    }

    /// Decompose `a`, spending at most `config.max_iterations` QR sweeps on
    /// each singular value.
    ///
    /// Fails with [`LinalgError::NonFinite`] if `a` holds NaN or infinity
    /// and [`LinalgError::ConvergenceFailure`] if the iteration limit is hit.
    pub fn with_config(a: &Matrix<T>, config: &ConvergenceConfig) -> Result<Self, LinalgError> {
        require_finite(a)?;
        let (m, n) = a.shape();
        let out = if m >= n {
            let (u, s, v) = golub_kahan(a.clone(), config.max_iterations)?;
            Self { u, v, s, m, n }
        } else {
            let (u, s, v) = golub_kahan(a.transpose(), config.max_iterations)?;
            Self { u: v, v: u, s, m, n }
        };
        debug!(rows = m, cols = n, "singular value decomposition complete");
        Ok(out)
    }

    /// Left singular vectors, `m x min(m, n)`.
    pub fn u(&self) -> Matrix<T> {
        self.u.clone()
    }

    /// Right singular vectors, `n x min(m, n)`.
    pub fn v(&self) -> Matrix<T> {
        self.v.clone()
    }

    /// Singular values, descending.
    pub fn singular_values(&self) -> &[T] {
        &self.s
    }

    /// Diagonal matrix of singular values.
    pub fn s(&self) -> Matrix<T> {
        Matrix::from_diag(&self.s)
    }

    /// Two norm, the largest singular value. Zero for an empty matrix.
    pub fn norm2(&self) -> T {
        self.s.first().copied().unwrap_or_else(T::zero)
    }

    /// Two-norm condition number, `σ_max / σ_min`.
    ///
    /// Infinite if the smallest singular value is zero, one for an empty
    /// matrix.
    pub fn cond(&self) -> T {
        match (self.s.first(), self.s.last()) {
            (Some(&max), Some(&min)) => {
                if min == T::zero() {
                    T::infinity()
                } else {
                    max / min
                }
            }
            _ => T::one(),
        }
    }

    /// Effective numerical rank: singular values above
    /// `max(m, n) * σ_max * eps`.
    pub fn rank(&self) -> usize {
        let tol = T::lit(self.m.max(self.n) as f64) * self.norm2() * T::epsilon();
        self.s.iter().filter(|&&x| x > tol).count()
    }
}

/// Bidiagonalize `a` (`m >= n`) by Householder reflections, then diagonalize
/// with shifted QR sweeps. Returns `(U, σ, V)`.
#[allow(clippy::type_complexity)]
fn golub_kahan<T: FloatScalar>(
    mut a: Matrix<T>,
    max_iterations: usize,
) -> Result<(Matrix<T>, Vec<T>, Matrix<T>), LinalgError> {
    let (m, n) = a.shape();
    debug_assert!(m >= n);
    if n == 0 {
        return Ok((Matrix::zeros(m, 0), Vec::new(), Matrix::zeros(0, 0)));
    }

    let nu = n;
    let mut s = vec![T::zero(); n];
    let mut u = Matrix::zeros(m, nu);
    let mut v = Matrix::zeros(n, n);
    let mut e = vec![T::zero(); n];
    let mut work = vec![T::zero(); m];

    // Reduce A to bidiagonal form, storing the diagonal in s and the
    // super-diagonal in e.
    let nct = (m - 1).min(n);
    let nrt = if n >= 2 { (n - 2).min(m) } else { 0 };
    for k in 0..nct.max(nrt) {
        if k < nct {
            // Column transformation: zero A[k+1.., k].
            s[k] = T::zero();
            for i in k..m {
                s[k] = hypot(s[k], a[(i, k)]);
            }
            if s[k] != T::zero() {
                if a[(k, k)] < T::zero() {
                    s[k] = -s[k];
                }
                for i in k..m {
                    a[(i, k)] = a[(i, k)] / s[k];
                }
                a[(k, k)] = a[(k, k)] + T::one();
            }
            s[k] = -s[k];
        }
        for j in (k + 1)..n {
            if k < nct && s[k] != T::zero() {
                let mut t = T::zero();
                for i in k..m {
                    t = t + a[(i, k)] * a[(i, j)];
                }
                t = -t / a[(k, k)];
                for i in k..m {
                    a[(i, j)] = a[(i, j)] + t * a[(i, k)];
                }
            }
            // Row k of A feeds the next row transformation.
            e[j] = a[(k, j)];
        }
        if k < nct {
            for i in k..m {
                u[(i, k)] = a[(i, k)];
            }
        }
        if k < nrt {
            // Row transformation: zero e[k+2..].
            e[k] = T::zero();
            for i in (k + 1)..n {
                e[k] = hypot(e[k], e[i]);
            }
            if e[k] != T::zero() {
                if e[k + 1] < T::zero() {
                    e[k] = -e[k];
                }
                for i in (k + 1)..n {
                    e[i] = e[i] / e[k];
                }
                e[k + 1] = e[k + 1] + T::one();
            }
            e[k] = -e[k];
            if k + 1 < m && e[k] != T::zero() {
                for w in work[(k + 1)..m].iter_mut() {
                    *w = T::zero();
                }
                for j in (k + 1)..n {
                    for i in (k + 1)..m {
                        work[i] = work[i] + e[j] * a[(i, j)];
                    }
                }
                for j in (k + 1)..n {
                    let t = -e[j] / e[k + 1];
                    for i in (k + 1)..m {
                        a[(i, j)] = a[(i, j)] + t * work[i];
                    }
                }
            }
            for i in (k + 1)..n {
                v[(i, k)] = e[i];
            }
        }
    }

    // Final bidiagonal matrix of order p.
    let mut p = n.min(m + 1);
    if nct < n {
        s[nct] = a[(nct, nct)];
    }
    if m < p {
        s[p - 1] = T::zero();
    }
    if nrt + 1 < p {
        e[nrt] = a[(nrt, p - 1)];
    }
    e[p - 1] = T::zero();

    // Generate U.
    for j in nct..nu {
        for i in 0..m {
            u[(i, j)] = T::zero();
        }
        u[(j, j)] = T::one();
    }
    for k in (0..nct).rev() {
        if s[k] != T::zero() {
            for j in (k + 1)..nu {
                let mut t = T::zero();
                for i in k..m {
                    t = t + u[(i, k)] * u[(i, j)];
                }
                t = -t / u[(k, k)];
                for i in k..m {
                    u[(i, j)] = u[(i, j)] + t * u[(i, k)];
                }
            }
            for i in k..m {
                u[(i, k)] = -u[(i, k)];
            }
            u[(k, k)] = T::one() + u[(k, k)];
            for i in 0..k {
                u[(i, k)] = T::zero();
            }
        } else {
            for i in 0..m {
                u[(i, k)] = T::zero();
            }
            u[(k, k)] = T::one();
        }
    }

    // Generate V.
    for k in (0..n).rev() {
        if k < nrt && e[k] != T::zero() {
            for j in (k + 1)..nu {
                let mut t = T::zero();
                for i in (k + 1)..n {
                    t = t + v[(i, k)] * v[(i, j)];
                }
                t = -t / v[(k + 1, k)];
                for i in (k + 1)..n {
                    v[(i, j)] = v[(i, j)] + t * v[(i, k)];
                }
            }
        }
        for i in 0..n {
            v[(i, k)] = T::zero();
        }
        v[(k, k)] = T::one();
    }

    // Main iteration loop for the singular values.
    let eps = T::epsilon();
    let tiny = T::tiny();
    let pp = p - 1;
    let mut iter = 0;
    while p > 0 {
        // Find the trailing unreduced block s[lo..p]. lo == p - 1 means
        // s[p-1] has converged.
        let mut lo = p - 1;
        while lo > 0 {
            let k = lo - 1;
            if e[k].abs() <= tiny + eps * (s[k].abs() + s[k + 1].abs()) {
                e[k] = T::zero();
                break;
            }
            lo -= 1;
        }

        if lo == p - 1 {
            // Convergence: make s[k] non-negative, then bubble it down
            // among the values already converged.
            let mut k = lo;
            if s[k] <= T::zero() {
                s[k] = if s[k] < T::zero() { -s[k] } else { T::zero() };
                for i in 0..n {
                    v[(i, k)] = -v[(i, k)];
                }
            }
            while k < pp && s[k] < s[k + 1] {
                s.swap(k, k + 1);
                for i in 0..n {
                    let t = v[(i, k + 1)];
                    v[(i, k + 1)] = v[(i, k)];
                    v[(i, k)] = t;
                }
                for i in 0..m {
                    let t = u[(i, k + 1)];
                    u[(i, k + 1)] = u[(i, k)];
                    u[(i, k)] = t;
                }
                k += 1;
            }
            iter = 0;
            p -= 1;
            continue;
        }

        // Look for a negligible singular value inside the block.
        let mut split = None;
        for ks in (lo..p).rev() {
            let mut t = e[ks].abs();
            if ks != lo {
                t = t + e[ks - 1].abs();
            }
            if s[ks].abs() <= tiny + eps * t {
                s[ks] = T::zero();
                split = Some(ks);
                break;
            }
        }

        match split {
            Some(ks) if ks == p - 1 => {
                // Deflate a negligible s[p-1].
                let k = lo;
                let mut f = e[p - 2];
                e[p - 2] = T::zero();
                for j in (k..(p - 1)).rev() {
                    let t = hypot(s[j], f);
                    let cs = s[j] / t;
                    let sn = f / t;
                    s[j] = t;
                    if j != k {
                        f = -sn * e[j - 1];
                        e[j - 1] = cs * e[j - 1];
                    }
                    for i in 0..n {
                        let t = cs * v[(i, j)] + sn * v[(i, p - 1)];
                        v[(i, p - 1)] = -sn * v[(i, j)] + cs * v[(i, p - 1)];
                        v[(i, j)] = t;
                    }
                }
            }
            Some(ks) => {
                // Split at a negligible s[ks].
                let k = ks + 1;
                let mut f = e[k - 1];
                e[k - 1] = T::zero();
                for j in k..p {
                    let t = hypot(s[j], f);
                    let cs = s[j] / t;
                    let sn = f / t;
                    s[j] = t;
                    f = -sn * e[j];
                    e[j] = cs * e[j];
                    for i in 0..m {
                        let t = cs * u[(i, j)] + sn * u[(i, k - 1)];
                        u[(i, k - 1)] = -sn * u[(i, j)] + cs * u[(i, k - 1)];
                        u[(i, j)] = t;
                    }
                }
            }
            None => {
                // One shifted QR sweep over s[lo..p].
                if iter >= max_iterations {
                    return Err(not_converged("svd", max_iterations));
                }
                let k = lo;

                let scale = s[p - 1]
                    .abs()
                    .max(s[p - 2].abs())
                    .max(e[p - 2].abs())
                    .max(s[k].abs())
                    .max(e[k].abs());
                let sp = s[p - 1] / scale;
                let spm1 = s[p - 2] / scale;
                let epm1 = e[p - 2] / scale;
                let sk = s[k] / scale;
                let ek = e[k] / scale;
                let b = ((spm1 + sp) * (spm1 - sp) + epm1 * epm1) / T::two();
                let c = (sp * epm1) * (sp * epm1);
                let mut shift = T::zero();
                if b != T::zero() || c != T::zero() {
                    shift = (b * b + c).sqrt();
                    if b < T::zero() {
                        shift = -shift;
                    }
                    shift = c / (b + shift);
                }
                let mut f = (sk + sp) * (sk - sp) + shift;
                let mut g = sk * ek;

                // Chase zeros.
                for j in k..(p - 1) {
                    let mut t = hypot(f, g);
                    let mut cs = f / t;
                    let mut sn = g / t;
                    if j != k {
                        e[j - 1] = t;
                    }
                    f = cs * s[j] + sn * e[j];
                    e[j] = cs * e[j] - sn * s[j];
                    g = sn * s[j + 1];
                    s[j + 1] = cs * s[j + 1];
                    for i in 0..n {
                        t = cs * v[(i, j)] + sn * v[(i, j + 1)];
                        v[(i, j + 1)] = -sn * v[(i, j)] + cs * v[(i, j + 1)];
                        v[(i, j)] = t;
                    }
                    t = hypot(f, g);
                    cs = f / t;
                    sn = g / t;
                    s[j] = t;
                    f = cs * e[j] + sn * s[j + 1];
                    s[j + 1] = -sn * e[j] + cs * s[j + 1];
                    g = sn * e[j + 1];
                    e[j + 1] = cs * e[j + 1];
                    if j < m - 1 {
                        for i in 0..m {
                            t = cs * u[(i, j)] + sn * u[(i, j + 1)];
                            u[(i, j + 1)] = -sn * u[(i, j)] + cs * u[(i, j + 1)];
                            u[(i, j)] = t;
                        }
                    }
                }
                e[p - 2] = f;
                iter += 1;
            }
        }
    }

    Ok((u, s, v))
}

impl<T: FloatScalar> Matrix<T> {
    /// Singular value decomposition.
    pub fn svd(&self) -> Result<SingularValueDecomposition<T>, LinalgError> {
        SingularValueDecomposition::new(self)
    }

    /// Two norm (largest singular value).
    pub fn norm2(&self) -> Result<T, LinalgError> {
        Ok(self.svd()?.norm2())
    }

    /// Two-norm condition number.
    ///
    /// ```
    /// use jupiter_linalg::Matrix;
    /// let a = Matrix::from_rows(2, 2, &[2.0_f64, 0.0, 0.0, 0.5]);
    /// assert!((a.cond().unwrap() - 4.0).abs() < 1e-12);
    /// ```
    pub fn cond(&self) -> Result<T, LinalgError> {
        Ok(self.svd()?.cond())
    }

    /// Effective numerical rank.
    ///
    /// ```
    /// use jupiter_linalg::Matrix;
    /// let a = Matrix::from_rows(3, 3, &[1.0_f64, 2.0, 3.0, 2.0, 4.0, 6.0, 1.0, 0.0, 1.0]);
    /// assert_eq!(a.rank().unwrap(), 2);
    /// ```
    pub fn rank(&self) -> Result<usize, LinalgError> {
        Ok(self.svd()?.rank())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linalg::{assert_matrix_near, is_near_identity};

    const TOL: f64 = 1e-10;

    fn assert_near(a: f64, b: f64, tol: f64, msg: &str) {
        assert!((a - b).abs() < tol, "{}: {} vs {} (diff {})", msg, a, b, (a - b).abs());
    }

    fn check_svd(a: &Matrix<f64>) {
        let (m, n) = a.shape();
        let k = m.min(n);
        let svd = a.svd().unwrap();
        let u = svd.u();
        let v = svd.v();
        assert_eq!(u.shape(), (m, k));
        assert_eq!(v.shape(), (n, k));
        assert_eq!(svd.singular_values().len(), k);

        let r = &(&u * &svd.s()) * &v.transpose();
        assert_matrix_near(&r, a, TOL, "UΣVᵗ");
        assert!(is_near_identity(&(&u.transpose() * &u), TOL), "UᵗU");
        assert!(is_near_identity(&(&v.transpose() * &v), TOL), "VᵗV");

        let s = svd.singular_values();
        for (i, w) in s.windows(2).enumerate() {
            assert!(w[0] >= w[1], "σ[{}] < σ[{}]: {:?}", i, i + 1, s);
        }
        assert!(s.iter().all(|&x| x >= 0.0));
    }

    #[test]
    fn square() {
        check_svd(&Matrix::from_rows(3, 3, &[2.0, 0.0, 1.0, -1.0, 3.0, 2.0, 4.0, 1.0, -2.0]));
    }

    #[test]
    fn tall() {
        check_svd(&Matrix::from_rows(
            4,
            3,
            &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 10.0, -1.0, 0.0, 2.0],
        ));
    }

    #[test]
    fn wide() {
        check_svd(&Matrix::from_rows(2, 4, &[1.0, 2.0, 3.0, 4.0, -2.0, 0.0, 1.0, 5.0]));
    }

    #[test]
    fn single_row_and_column() {
        check_svd(&Matrix::from_rows(1, 3, &[3.0, 0.0, -4.0]));
        check_svd(&Matrix::from_rows(3, 1, &[3.0, 0.0, -4.0]));
        let svd = Matrix::from_rows(1, 1, &[-2.0]).svd().unwrap();
        assert_eq!(svd.singular_values(), &[2.0]);
    }

    #[test]
    fn rank_deficient() {
        let a = Matrix::from_rows(3, 3, &[1.0, 2.0, 3.0, 2.0, 4.0, 6.0, 1.0, 0.0, 1.0]);
        check_svd(&a);
        let svd = a.svd().unwrap();
        assert_eq!(svd.rank(), 2);
        assert!(svd.singular_values()[2] < 1e-12);
    }

    #[test]
    fn rotation_is_perfectly_conditioned() {
        let theta: f64 = 0.3;
        let (c, s) = (theta.cos(), theta.sin());
        let a = Matrix::from_rows(2, 2, &[c, -s, s, c]);
        let svd = a.svd().unwrap();
        for &x in svd.singular_values() {
            assert_near(x, 1.0, TOL, "σ");
        }
        assert_near(svd.cond(), 1.0, TOL, "cond");
        assert_near(svd.norm2(), 1.0, TOL, "norm2");
    }

    #[test]
    fn zero_matrix() {
        let a = Matrix::<f64>::zeros(3, 2);
        let svd = a.svd().unwrap();
        assert_eq!(svd.singular_values(), &[0.0, 0.0]);
        assert_eq!(svd.rank(), 0);
        assert!(svd.cond().is_infinite());
        check_svd(&a);
    }

    #[test]
    fn empty() {
        let svd = Matrix::<f64>::zeros(0, 3).svd().unwrap();
        assert!(svd.singular_values().is_empty());
        assert_eq!(svd.u().shape(), (0, 0));
        assert_eq!(svd.v().shape(), (3, 0));
        assert_eq!(svd.norm2(), 0.0);
        assert_eq!(svd.cond(), 1.0);
        assert_eq!(svd.rank(), 0);
    }

    #[test]
    fn iteration_limit() {
        let a = Matrix::from_rows(3, 3, &[2.0, 0.0, 1.0, -1.0, 3.0, 2.0, 4.0, 1.0, -2.0]);
        let config = ConvergenceConfig::default().with_max_iterations(0);
        assert_eq!(
            SingularValueDecomposition::with_config(&a, &config).unwrap_err(),
            LinalgError::ConvergenceFailure {
                algorithm: "svd",
                iterations: 0
            }
        );
    }

    #[test]
    fn matches_eigenvalues_of_gram_matrix() {
        let a: Matrix<f64> = Matrix::from_rows(3, 2, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let svd = a.svd().unwrap();
        let gram = &a.transpose() * &a;
        let eig = gram.eig().unwrap();
        let lambdas = eig.real_eigenvalues();
        // Ascending eigenvalues vs descending singular values.
        assert_near(svd.singular_values()[0].powi(2), lambdas[1], 1e-9, "σ0²");
        assert_near(svd.singular_values()[1].powi(2), lambdas[0], 1e-9, "σ1²");
    }

    #[test]
    fn f32_elements() {
        let a = Matrix::from_rows(2, 2, &[3.0_f32, 0.0, 0.0, -4.0]);
        let svd = a.svd().unwrap();
        assert!((svd.singular_values()[0] - 4.0).abs() < 1e-5);
        assert!((svd.singular_values()[1] - 3.0).abs() < 1e-5);
    }

    #[test]
    fn copy_in_at_construction() {
        let orig = Matrix::from_rows(3, 2, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let mut a = orig.clone();
        let svd = a.svd().unwrap();
        let s_before = svd.singular_values().to_vec();
        a[(0, 0)] = 100.0;
        a[(2, 1)] = -50.0;
        assert_eq!(svd.singular_values(), s_before.as_slice());
        let r = &(&svd.u() * &svd.s()) * &svd.v().transpose();
        assert_matrix_near(&r, &orig, TOL, "UΣVᵗ");
    }

    #[test]
    fn getters_are_idempotent() {
        let svd = Matrix::from_rows(2, 3, &[1.0, -2.0, 0.5, 3.0, 1.0, -1.0])
            .svd()
            .unwrap();
        assert_eq!(svd.u(), svd.u());
        assert_eq!(svd.v(), svd.v());
        assert_eq!(svd.s(), svd.s());
        assert_eq!(svd.singular_values(), svd.singular_values());
        assert_eq!(svd.rank(), svd.rank());
    }

    #[test]
    fn non_finite_input_is_refused() {
        let a = Matrix::from_rows(2, 3, &[1.0, 2.0, f64::NAN, 0.0, 1.0, 1.0]);
        assert_eq!(a.svd().unwrap_err(), LinalgError::NonFinite);
        let b = Matrix::from_rows(2, 2, &[f64::NEG_INFINITY, 0.0, 0.0, 1.0]);
        assert_eq!(b.rank().unwrap_err(), LinalgError::NonFinite);
    }
}
