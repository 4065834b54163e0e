use crate::traits::FloatScalar;

/// `sqrt(a² + b²)` without intermediate overflow or destructive underflow.
///
/// Scales by the larger magnitude before squaring, so the result is finite
/// whenever the true value is representable. Used for every 2-norm the
/// decompositions compute.
///
/// ```
/// use jupiter_linalg::linalg::hypot;
/// assert_eq!(hypot(3.0_f64, 4.0), 5.0);
/// assert_eq!(hypot(0.0_f64, 0.0), 0.0);
/// assert!(hypot(3e300_f64, 4e300).is_finite());
/// ```
#[inline]
pub fn hypot<T: FloatScalar>(a: T, b: T) -> T {
    let (aa, ab) = (a.abs(), b.abs());
    if aa > ab {
        let r = b / a;
        aa * (T::one() + r * r).sqrt()
    } else if b != T::zero() {
        let r = a / b;
        ab * (T::one() + r * r).sqrt()
    } else {
        T::zero()
    }
}
