use num_traits::{Num, NumCast, One, Zero};

/// Numeric element type the filtering engines operate on.
///
/// The trait bundles the per-type numeric facilities the engines and the
/// kernel adapter need: a widened accumulation type so integer filtering
/// does not overflow mid-sum, the floating/fixed-point distinction, and the
/// "suggested norm" — the value representing 1.0 for fixed-point kernels.
pub trait Element:
    Copy + Default + PartialOrd + Send + Sync + NumCast + Zero + One + 'static
{
    /// Widened type used for accumulation and intermediate arithmetic.
    type Acc: Copy + Num + PartialOrd;

    /// Whether this is a floating-point type.
    const IS_FLOAT: bool;

    /// The value representing 1.0 for fixed-point kernel coefficients.
    ///
    /// Floating-point types report 1; kernel values for them are stored
    /// denormalized.
    fn suggested_norm() -> Self;

    /// Widen a value into the accumulation type.
    fn to_acc(self) -> Self::Acc;

    /// Narrow an accumulated value back, saturating for integer types.
    fn from_acc(acc: Self::Acc) -> Self;
}

impl Element for u8 {
    type Acc = i32;

    const IS_FLOAT: bool = false;

    fn suggested_norm() -> Self {
        255
    }

    fn to_acc(self) -> i32 {
        self as i32
    }

    fn from_acc(acc: i32) -> Self {
        acc.clamp(0, 255) as u8
    }
}

impl Element for i32 {
    type Acc = i64;

    const IS_FLOAT: bool = false;

    fn suggested_norm() -> Self {
        65536
    }

    fn to_acc(self) -> i64 {
        self as i64
    }

    fn from_acc(acc: i64) -> Self {
        acc.clamp(i32::MIN as i64, i32::MAX as i64) as i32
    }
}

impl Element for f32 {
    type Acc = f32;

    const IS_FLOAT: bool = true;

    fn suggested_norm() -> Self {
        1.0
    }

    fn to_acc(self) -> f32 {
        self
    }

    fn from_acc(acc: f32) -> Self {
        acc
    }
}

impl Element for f64 {
    type Acc = f64;

    const IS_FLOAT: bool = true;

    fn suggested_norm() -> Self {
        1.0
    }

    fn to_acc(self) -> f64 {
        self
    }

    fn from_acc(acc: f64) -> Self {
        acc
    }
}
