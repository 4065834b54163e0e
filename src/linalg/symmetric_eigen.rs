use crate::linalg::{hypot, not_converged, LinalgError};
use crate::traits::FloatScalar;
use crate::Matrix;

/// Householder tridiagonalization of a symmetric matrix.
///
/// On entry `v` holds the symmetric input. On return `v` holds the
/// orthogonal transform, `d` the diagonal and `e[1..n]` the sub-diagonal of
/// the tridiagonal matrix (`e[0] = 0`).
pub(crate) fn tred2<T: FloatScalar>(v: &mut Matrix<T>, d: &mut [T], e: &mut [T]) {
    let n = v.nrows();
    if n == 0 {
        return;
    }

    for j in 0..n {
        d[j] = v[(n - 1, j)];
    }

    for i in (1..n).rev() {
        // Scale to avoid under/overflow.
        let mut scale = T::zero();
        let mut h = T::zero();
        for dk in &d[..i] {
            scale = scale + dk.abs();
        }

        if scale == T::zero() {
            e[i] = d[i - 1];
            for j in 0..i {
                d[j] = v[(i - 1, j)];
                v[(i, j)] = T::zero();
                v[(j, i)] = T::zero();
            }
        } else {
            // Generate Householder vector.
            for dk in d[..i].iter_mut() {
                *dk = *dk / scale;
                h = h + *dk * *dk;
            }
            let mut f = d[i - 1];
            let mut g = h.sqrt();
            if f > T::zero() {
                g = -g;
            }
            e[i] = scale * g;
            h = h - f * g;
            d[i - 1] = f - g;
            for ej in e[..i].iter_mut() {
                *ej = T::zero();
            }

            // Apply similarity transformation to remaining columns.
            for j in 0..i {
                f = d[j];
                v[(j, i)] = f;
                g = e[j] + v[(j, j)] * f;
                for k in (j + 1)..i {
                    g = g + v[(k, j)] * d[k];
                    e[k] = e[k] + v[(k, j)] * f;
                }
                e[j] = g;
            }
            f = T::zero();
            for j in 0..i {
                e[j] = e[j] / h;
                f = f + e[j] * d[j];
            }
            let hh = f / (h + h);
            for j in 0..i {
                e[j] = e[j] - hh * d[j];
            }
            for j in 0..i {
                f = d[j];
                g = e[j];
                for k in j..i {
                    v[(k, j)] = v[(k, j)] - (f * e[k] + g * d[k]);
                }
                d[j] = v[(i - 1, j)];
                v[(i, j)] = T::zero();
            }
        }
        d[i] = h;
    }

    // Accumulate transformations.
    for i in 0..(n - 1) {
        v[(n - 1, i)] = v[(i, i)];
        v[(i, i)] = T::one();
        let h = d[i + 1];
        if h != T::zero() {
            for k in 0..=i {
                d[k] = v[(k, i + 1)] / h;
            }
            for j in 0..=i {
                let mut g = T::zero();
                for k in 0..=i {
                    g = g + v[(k, i + 1)] * v[(k, j)];
                }
                for k in 0..=i {
                    v[(k, j)] = v[(k, j)] - g * d[k];
                }
            }
        }
        for k in 0..=i {
            v[(k, i + 1)] = T::zero();
        }
    }
    for j in 0..n {
        d[j] = v[(n - 1, j)];
        v[(n - 1, j)] = T::zero();
    }
    v[(n - 1, n - 1)] = T::one();
    e[0] = T::zero();
}

/// Implicit QL iteration on the tridiagonal matrix produced by [`tred2`].
///
/// On return `d` holds the eigenvalues in ascending order and the columns of
/// `v` the matching eigenvectors. At most `max_iterations` sweeps are spent
/// on each eigenvalue.
pub(crate) fn tql2<T: FloatScalar>(
    v: &mut Matrix<T>,
    d: &mut [T],
    e: &mut [T],
    max_iterations: usize,
) -> Result<(), LinalgError> {
    let n = v.nrows();
    if n == 0 {
        return Ok(());
    }

    for i in 1..n {
        e[i - 1] = e[i];
    }
    e[n - 1] = T::zero();

    let mut f = T::zero();
    let mut tst1 = T::zero();
    let eps = T::epsilon();

    for l in 0..n {
        // Find small sub-diagonal element.
        tst1 = tst1.max(d[l].abs() + e[l].abs());
        let mut m = l;
        while m < n - 1 && e[m].abs() > eps * tst1 {
            m += 1;
        }

        // If m == l, d[l] is already an eigenvalue; otherwise iterate.
        if m > l {
            let mut iter = 0;
            loop {
                if iter >= max_iterations {
                    return Err(not_converged("tql2", max_iterations));
                }
                iter += 1;

                // Compute implicit shift.
                let mut g = d[l];
                let mut p = (d[l + 1] - g) / (T::two() * e[l]);
                let mut r = hypot(p, T::one());
                if p < T::zero() {
                    r = -r;
                }
                d[l] = e[l] / (p + r);
                d[l + 1] = e[l] * (p + r);
                let dl1 = d[l + 1];
                let mut h = g - d[l];
                for di in d[(l + 2)..n].iter_mut() {
                    *di = *di - h;
                }
                f = f + h;

                // Implicit QL transformation.
                p = d[m];
                let mut c = T::one();
                let mut c2 = c;
                let mut c3 = c;
                let el1 = e[l + 1];
                let mut s = T::zero();
                let mut s2 = T::zero();
                for i in (l..m).rev() {
                    c3 = c2;
                    c2 = c;
                    s2 = s;
                    g = c * e[i];
                    h = c * p;
                    r = hypot(p, e[i]);
                    e[i + 1] = s * r;
                    s = e[i] / r;
                    c = p / r;
                    p = c * d[i] - s * g;
                    d[i + 1] = h + s * (c * g + s * d[i]);

                    // Accumulate transformation.
                    for k in 0..n {
                        h = v[(k, i + 1)];
                        v[(k, i + 1)] = s * v[(k, i)] + c * h;
                        v[(k, i)] = c * v[(k, i)] - s * h;
                    }
                }
                p = -s * s2 * c3 * el1 * e[l] / dl1;
                e[l] = s * p;
                d[l] = c * p;

                // Check for convergence.
                if e[l].abs() <= eps * tst1 {
                    break;
                }
            }
        }
        d[l] = d[l] + f;
        e[l] = T::zero();
    }

    // Sort eigenvalues and corresponding vectors.
    for i in 0..(n - 1) {
        let mut k = i;
        let mut p = d[i];
        for (j, &dj) in d.iter().enumerate().skip(i + 1) {
            if dj < p {
                k = j;
                p = dj;
            }
        }
        if k != i {
            d[k] = d[i];
            d[i] = p;
            for row in 0..n {
                let tmp = v[(row, i)];
                v[(row, i)] = v[(row, k)];
                v[(row, k)] = tmp;
            }
        }
    }
    Ok(())
}
