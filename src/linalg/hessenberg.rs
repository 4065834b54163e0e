use crate::traits::FloatScalar;
use crate::Matrix;

/// Reduce a square matrix to upper Hessenberg form by orthogonal similarity
/// transforms (Householder reflections).
///
/// On entry `h` holds the input. On return `h` is upper Hessenberg and `v`
/// holds the accumulated orthogonal transform, so that `Vᵗ A V = H`.
pub(crate) fn orthes<T: FloatScalar>(h: &mut Matrix<T>, v: &mut Matrix<T>) {
    let n = h.nrows();
    *v = Matrix::eye(n);
    if n < 3 {
        return;
    }
    let high = n - 1;
    let mut ort = vec![T::zero(); n];

    for m in 1..high {
        // Scale column.
        let mut scale = T::zero();
        for i in m..=high {
            scale = scale + h[(i, m - 1)].abs();
        }
        if scale == T::zero() {
            continue;
        }

        // Compute Householder transformation.
        let mut hh = T::zero();
        for i in (m..=high).rev() {
            ort[i] = h[(i, m - 1)] / scale;
            hh = hh + ort[i] * ort[i];
        }
        let mut g = hh.sqrt();
        if ort[m] > T::zero() {
            g = -g;
        }
        hh = hh - ort[m] * g;
        ort[m] = ort[m] - g;

        // Apply Householder similarity transformation
        // H = (I - u uᵗ / h) H (I - u uᵗ / h)
        for j in m..n {
            let mut f = T::zero();
            for i in (m..=high).rev() {
                f = f + ort[i] * h[(i, j)];
            }
            f = f / hh;
            for i in m..=high {
                h[(i, j)] = h[(i, j)] - f * ort[i];
            }
        }
        for i in 0..=high {
            let mut f = T::zero();
            for j in (m..=high).rev() {
                f = f + ort[j] * h[(i, j)];
            }
            f = f / hh;
            for j in m..=high {
                h[(i, j)] = h[(i, j)] - f * ort[j];
            }
        }
        ort[m] = scale * ort[m];
        h[(m, m - 1)] = scale * g;
    }

    // Accumulate transformations.
    for m in (1..high).rev() {
        let hm = h[(m, m - 1)];
        if hm == T::zero() {
            continue;
        }
        for i in (m + 1)..=high {
            ort[i] = h[(i, m - 1)];
        }
        for j in m..=high {
            let mut g = T::zero();
            for i in m..=high {
                g = g + ort[i] * v[(i, j)];
            }
            // Double division avoids possible underflow.
            g = (g / ort[m]) / hm;
            for i in m..=high {
                v[(i, j)] = v[(i, j)] + g * ort[i];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linalg::{assert_matrix_near, is_near_identity};

    const TOL: f64 = 1e-10;

    fn check_reduction(orig: &Matrix<f64>) {
        let n = orig.nrows();
        let mut h = orig.clone();
        let mut v = Matrix::zeros(0, 0);
        orthes(&mut h, &mut v);

        // The part of h below the sub-diagonal still holds reflector data;
        // Vᵗ A V must match the Hessenberg part.
        let hess = Matrix::from_fn(n, n, |i, j| if i <= j + 1 { h[(i, j)] } else { 0.0 });
        let vtav = &(&v.transpose() * orig) * &v;
        assert_matrix_near(&vtav, &hess, TOL, "VᵗAV");
        assert!(is_near_identity(&(&v.transpose() * &v), TOL));
    }

    #[test]
    fn hessenberg_3x3() {
        check_reduction(&Matrix::from_rows(
            3,
            3,
            &[4.0, 1.0, -2.0, 1.0, 2.0, 0.0, -2.0, 0.0, 3.0],
        ));
    }

    #[test]
    fn hessenberg_4x4() {
        check_reduction(&Matrix::from_fn(4, 4, |i, j| (i * 4 + j + 1) as f64));
    }

    #[test]
    fn hessenberg_5x5_nonsymmetric() {
        check_reduction(&Matrix::from_rows(
            5,
            5,
            &[
                1.0, -3.0, 2.0, 0.5, 4.0, 2.0, 1.0, -1.0, 3.0, 0.0, -4.0, 2.0, 5.0, 1.0, 1.0, 0.0,
                3.0, -2.0, 2.0, -1.0, 1.5, 1.0, 0.0, -3.0, 2.0,
            ],
        ));
    }

    #[test]
    fn small_matrices_are_already_hessenberg() {
        let orig = Matrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let mut h = orig.clone();
        let mut v = Matrix::zeros(0, 0);
        orthes(&mut h, &mut v);
        assert_eq!(h, orig);
        assert_eq!(v, Matrix::eye(2));
    }
}
