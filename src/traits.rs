use core::fmt::Debug;
use num_traits::{Float, Num, One, Zero};

/// Trait for types that can be used as matrix elements.
///
/// Blanket-implemented for all types satisfying the bounds.
/// Covers `f32`, `f64`, and all integer types.
pub trait Scalar: Copy + PartialEq + Debug + Zero + One + Num {}

impl<T: Copy + PartialEq + Debug + Zero + One + Num> Scalar for T {}

/// Trait for floating-point matrix elements.
///
/// Required by the decompositions and norms, which need `sqrt`, `abs`,
/// `epsilon` and friends. Implemented for `f32` and `f64`.
pub trait FloatScalar: Scalar + Float {
    /// Convert an `f64` constant into `Self`.
    ///
    /// Used for the handful of literal constants the iterative algorithms
    /// need (`0.5`, `0.75`, ...). Lossy for `f32`.
    fn lit(x: f64) -> Self;

    /// `2`, the most common literal.
    #[inline]
    fn two() -> Self {
        Self::one() + Self::one()
    }

    /// Smallest magnitude treated as distinguishable from zero when the
    /// SVD tests for negligible entries (`2^-966` for `f64`).
    #[inline]
    fn tiny() -> Self {
        Self::min_positive_value() / Self::epsilon() * Self::lit(16.0)
    }
}

macro_rules! impl_float_scalar {
    ($($t:ty),*) => {
        $(
            impl FloatScalar for $t {
                #[inline]
                fn lit(x: f64) -> $t {
                    x as $t
                }
            }
        )*
    };
}

impl_float_scalar!(f32, f64);
