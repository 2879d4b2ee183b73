//! Reconciles polymorphically-typed kernels with the element type an
//! engine is instantiated for.
//!
//! Callers that configure engines through a non-generic surface hand in an
//! [`AnyKernel`]: a closed tagged variant over the supported kernel shapes
//! and element types. Resolution moves the payload out without a copy when
//! the element type already matches, and otherwise converts the
//! coefficients with norm-aware rescaling:
//!
//! - float source → fixed-point target: values are scaled by the target's
//!   suggested norm before rounding, preserving sub-unity magnitudes;
//! - fixed-point source → float target: values are denormalized (divided
//!   by the source norm) and the adapted norm becomes 1;
//! - otherwise values and norm are cast directly.

use crate::element::Element;
use crate::error::FilterError;
use crate::kernel::{Kernel1d, Kernel2d, SeparableKernel};

/// A 1-D kernel of any supported element type.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyKernel1d {
    /// Byte coefficients.
    U8(Kernel1d<u8>),
    /// Integer coefficients.
    I32(Kernel1d<i32>),
    /// Single-precision coefficients.
    F32(Kernel1d<f32>),
    /// Double-precision coefficients.
    F64(Kernel1d<f64>),
}

/// A dense 2-D kernel of any supported element type.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyKernel2d {
    /// Byte coefficients.
    U8(Kernel2d<u8>),
    /// Integer coefficients.
    I32(Kernel2d<i32>),
    /// Single-precision coefficients.
    F32(Kernel2d<f32>),
    /// Double-precision coefficients.
    F64(Kernel2d<f64>),
}

/// A separable kernel of any supported element type.
#[derive(Debug, Clone, PartialEq)]
pub enum AnySeparableKernel {
    /// Byte coefficients.
    U8(SeparableKernel<u8>),
    /// Integer coefficients.
    I32(SeparableKernel<i32>),
    /// Single-precision coefficients.
    F32(SeparableKernel<f32>),
    /// Double-precision coefficients.
    F64(SeparableKernel<f64>),
}

/// A kernel of any supported shape and element type.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyKernel {
    /// A 1-D kernel.
    OneD(AnyKernel1d),
    /// A dense 2-D kernel.
    TwoD(AnyKernel2d),
    /// A separable kernel.
    Separable(AnySeparableKernel),
}

impl AnyKernel {
    fn shape_name(&self) -> &'static str {
        match self {
            AnyKernel::OneD(_) => "1-d",
            AnyKernel::TwoD(_) => "2-d",
            AnyKernel::Separable(_) => "separable",
        }
    }
}

/// Element types that can take ownership of their matching [`AnyKernel`]
/// variant, enabling copy-free resolution.
pub trait KernelElement: Element {
    /// Move a 1-D kernel out of `any` when the element type matches,
    /// returning `any` unchanged otherwise.
    fn try_take_1d(any: AnyKernel1d) -> Result<Kernel1d<Self>, AnyKernel1d>;

    /// Move a dense 2-D kernel out of `any` when the element type matches.
    fn try_take_2d(any: AnyKernel2d) -> Result<Kernel2d<Self>, AnyKernel2d>;

    /// Move a separable kernel out of `any` when the element type matches.
    fn try_take_separable(
        any: AnySeparableKernel,
    ) -> Result<SeparableKernel<Self>, AnySeparableKernel>;
}

macro_rules! impl_kernel_element {
    ($t:ty, $variant:ident) => {
        impl KernelElement for $t {
            fn try_take_1d(any: AnyKernel1d) -> Result<Kernel1d<Self>, AnyKernel1d> {
                match any {
                    AnyKernel1d::$variant(k) => Ok(k),
                    other => Err(other),
                }
            }

            fn try_take_2d(any: AnyKernel2d) -> Result<Kernel2d<Self>, AnyKernel2d> {
                match any {
                    AnyKernel2d::$variant(k) => Ok(k),
                    other => Err(other),
                }
            }

            fn try_take_separable(
                any: AnySeparableKernel,
            ) -> Result<SeparableKernel<Self>, AnySeparableKernel> {
                match any {
                    AnySeparableKernel::$variant(k) => Ok(k),
                    other => Err(other),
                }
            }
        }
    };
}

impl_kernel_element!(u8, U8);
impl_kernel_element!(i32, I32);
impl_kernel_element!(f32, F32);
impl_kernel_element!(f64, F64);

fn to_f64<S: Element>(v: S) -> Result<f64, FilterError> {
    num_traits::cast(v).ok_or(FilterError::KernelCast)
}

fn from_f64<T: Element>(v: f64) -> Result<T, FilterError> {
    let v = if T::IS_FLOAT { v } else { v.round() };
    num_traits::cast(v).ok_or(FilterError::KernelCast)
}

fn convert_values<S: Element, T: Element>(
    values: &[S],
    norm: S,
) -> Result<(Vec<T>, T), FilterError> {
    if S::IS_FLOAT && !T::IS_FLOAT {
        let scale = to_f64(T::suggested_norm())?;
        let data = values
            .iter()
            .map(|&v| from_f64(to_f64(v)? * scale))
            .collect::<Result<Vec<T>, _>>()?;
        Ok((data, T::suggested_norm()))
    } else if !S::IS_FLOAT && T::IS_FLOAT {
        let norm = to_f64(norm)?;
        let data = values
            .iter()
            .map(|&v| from_f64(to_f64(v)? / norm))
            .collect::<Result<Vec<T>, _>>()?;
        Ok((data, T::one()))
    } else {
        let data = values
            .iter()
            .map(|&v| from_f64(to_f64(v)?))
            .collect::<Result<Vec<T>, _>>()?;
        Ok((data, from_f64(to_f64(norm)?)?))
    }
}

fn convert_1d<S: Element, T: Element>(k: &Kernel1d<S>) -> Result<Kernel1d<T>, FilterError> {
    let (data, norm) = convert_values::<S, T>(k.as_slice(), k.norm())?;
    Kernel1d::new(data, k.offset(), norm)
}

fn convert_2d<S: Element, T: Element>(k: &Kernel2d<S>) -> Result<Kernel2d<T>, FilterError> {
    let (data, norm) = convert_values::<S, T>(k.as_slice(), k.norm())?;
    Kernel2d::new(k.rows(), k.cols(), data, k.offset(), norm)
}

fn convert_separable<S: Element, T: Element>(
    k: &SeparableKernel<S>,
) -> Result<SeparableKernel<T>, FilterError> {
    let mut pairs = k.pairs().iter();
    // non-empty by construction
    let (row, col) = pairs.next().ok_or(FilterError::EmptyKernel)?;
    let mut out = SeparableKernel::new(convert_1d(row)?, convert_1d(col)?);
    for (row, col) in pairs {
        out.push_pair(convert_1d(row)?, convert_1d(col)?);
    }
    Ok(out)
}

/// Resolve a 1-D kernel variant to element type `T`.
pub fn resolve_1d<T: KernelElement>(any: AnyKernel1d) -> Result<Kernel1d<T>, FilterError> {
    match T::try_take_1d(any) {
        Ok(k) => Ok(k),
        Err(any) => match any {
            AnyKernel1d::U8(k) => convert_1d(&k),
            AnyKernel1d::I32(k) => convert_1d(&k),
            AnyKernel1d::F32(k) => convert_1d(&k),
            AnyKernel1d::F64(k) => convert_1d(&k),
        },
    }
}

/// Resolve a dense 2-D kernel variant to element type `T`.
pub fn resolve_2d<T: KernelElement>(any: AnyKernel2d) -> Result<Kernel2d<T>, FilterError> {
    match T::try_take_2d(any) {
        Ok(k) => Ok(k),
        Err(any) => match any {
            AnyKernel2d::U8(k) => convert_2d(&k),
            AnyKernel2d::I32(k) => convert_2d(&k),
            AnyKernel2d::F32(k) => convert_2d(&k),
            AnyKernel2d::F64(k) => convert_2d(&k),
        },
    }
}

/// Resolve a separable kernel variant to element type `T`.
pub fn resolve_separable<T: KernelElement>(
    any: AnySeparableKernel,
) -> Result<SeparableKernel<T>, FilterError> {
    match T::try_take_separable(any) {
        Ok(k) => Ok(k),
        Err(any) => match any {
            AnySeparableKernel::U8(k) => convert_separable(&k),
            AnySeparableKernel::I32(k) => convert_separable(&k),
            AnySeparableKernel::F32(k) => convert_separable(&k),
            AnySeparableKernel::F64(k) => convert_separable(&k),
        },
    }
}

/// Resolve an [`AnyKernel`] expected to be 1-D.
///
/// # Errors
///
/// A 2-D or separable kernel is a shape mismatch.
pub fn resolve_kernel_1d<T: KernelElement>(any: AnyKernel) -> Result<Kernel1d<T>, FilterError> {
    match any {
        AnyKernel::OneD(k) => resolve_1d(k),
        other => Err(FilterError::KernelShapeMismatch("1-d", other.shape_name())),
    }
}

/// Resolve an [`AnyKernel`] expected to be dense 2-D.
///
/// # Errors
///
/// A 1-D or separable kernel is a shape mismatch.
pub fn resolve_kernel_2d<T: KernelElement>(any: AnyKernel) -> Result<Kernel2d<T>, FilterError> {
    match any {
        AnyKernel::TwoD(k) => resolve_2d(k),
        other => Err(FilterError::KernelShapeMismatch("2-d", other.shape_name())),
    }
}

/// Resolve an [`AnyKernel`] expected to be separable.
///
/// # Errors
///
/// A 1-D or dense 2-D kernel is a shape mismatch.
pub fn resolve_kernel_separable<T: KernelElement>(
    any: AnyKernel,
) -> Result<SeparableKernel<T>, FilterError> {
    match any {
        AnyKernel::Separable(k) => resolve_separable(k),
        other => Err(FilterError::KernelShapeMismatch(
            "separable",
            other.shape_name(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_type_moves_through() -> Result<(), FilterError> {
        let k = Kernel1d::new(vec![1.0f32, 2.0, 1.0], 1, 1.0)?;
        let resolved: Kernel1d<f32> = resolve_1d(AnyKernel1d::F32(k.clone()))?;
        assert_eq!(resolved, k);
        Ok(())
    }

    #[test]
    fn float_to_fixed_scales_by_suggested_norm() -> Result<(), FilterError> {
        let k = Kernel1d::new(vec![0.25f32, 0.5, 0.25], 1, 1.0)?;
        let resolved: Kernel1d<u8> = resolve_1d(AnyKernel1d::F32(k))?;
        // 0.25 * 255 = 63.75 → 64 after rounding
        assert_eq!(resolved.as_slice(), &[64, 128, 64]);
        assert_eq!(resolved.norm(), 255);
        Ok(())
    }

    #[test]
    fn fixed_to_float_denormalizes() -> Result<(), FilterError> {
        let k = Kernel1d::new(vec![64u8, 128, 64], 1, 255)?;
        let resolved: Kernel1d<f32> = resolve_1d(AnyKernel1d::U8(k))?;
        assert_eq!(resolved.norm(), 1.0);
        assert!((resolved.at(0) - 128.0 / 255.0).abs() < 1e-6);
        assert!((resolved.at(-1) - 64.0 / 255.0).abs() < 1e-6);
        Ok(())
    }

    #[test]
    fn fixed_to_fixed_casts_values_and_norm() -> Result<(), FilterError> {
        let k = Kernel1d::new(vec![1u8, 2, 1], 1, 4)?;
        let resolved: Kernel1d<i32> = resolve_1d(AnyKernel1d::U8(k))?;
        assert_eq!(resolved.as_slice(), &[1, 2, 1]);
        assert_eq!(resolved.norm(), 4);
        Ok(())
    }

    #[test]
    fn shape_mismatch_is_reported() -> Result<(), FilterError> {
        let k = Kernel1d::new(vec![1.0f32], 0, 1.0)?;
        let any = AnyKernel::OneD(AnyKernel1d::F32(k));
        assert!(matches!(
            resolve_kernel_2d::<f32>(any),
            Err(FilterError::KernelShapeMismatch("2-d", "1-d"))
        ));
        Ok(())
    }

    #[test]
    fn separable_conversion_preserves_pairs() -> Result<(), FilterError> {
        let row = Kernel1d::new(vec![1u8, 2, 1], 1, 4)?;
        let sep = SeparableKernel::new(row.clone(), row);
        let resolved: SeparableKernel<f32> = resolve_separable(AnySeparableKernel::U8(sep))?;
        assert_eq!(resolved.num_pairs(), 1);
        let (r, c) = &resolved.pairs()[0];
        assert_eq!(r.norm(), 1.0);
        assert_eq!(c.norm(), 1.0);
        assert!((r.at(0) - 0.5).abs() < 1e-6);
        Ok(())
    }
}
