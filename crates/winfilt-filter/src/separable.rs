use std::marker::PhantomData;

use num_traits::{One, Zero};
use winfilt_array::Array2;

use crate::accumulator::Accumulator;
use crate::adapter::{resolve_kernel_separable, AnyKernel, KernelElement};
use crate::boundary::Boundary;
use crate::conv1d::Filter1d;
use crate::element::Element;
use crate::error::FilterError;
use crate::kernel::{Kernel1d, SeparableKernel};

/// 2-D filter engine for separable kernels.
///
/// Each (row, column) kernel pair runs as two 1-D passes — along the rows
/// into an intermediate buffer, then down the columns — and the per-pair
/// results are summed elementwise. With a single pair the column pass
/// writes straight into the destination. A size-1 kernel with zero offset
/// degenerates to a scalar multiply and skips the windowed traversal.
pub struct SeparableFilter2d<T: Element, A: Accumulator<T>> {
    kernel: SeparableKernel<T>,
    _acc: PhantomData<A>,
}

impl<T: Element, A: Accumulator<T>> SeparableFilter2d<T, A> {
    /// Create an engine from an already-typed separable kernel.
    pub fn new(kernel: SeparableKernel<T>) -> Self {
        Self {
            kernel,
            _acc: PhantomData,
        }
    }

    /// Create an engine by resolving a polymorphic kernel.
    ///
    /// # Errors
    ///
    /// Fails when the kernel is not separable or cannot be adapted.
    pub fn from_any(any: AnyKernel) -> Result<Self, FilterError>
    where
        T: KernelElement,
    {
        Ok(Self::new(resolve_kernel_separable(any)?))
    }

    /// Replace the kernel, re-running adaptation.
    ///
    /// # Errors
    ///
    /// Fails when the kernel is not separable or cannot be adapted.
    pub fn set_kernel(&mut self, any: AnyKernel) -> Result<(), FilterError>
    where
        T: KernelElement,
    {
        self.kernel = resolve_kernel_separable(any)?;
        Ok(())
    }

    /// The resolved kernel.
    pub fn kernel(&self) -> &SeparableKernel<T> {
        &self.kernel
    }

    /// Filter `src` into `dst`.
    ///
    /// An empty source is a no-op.
    ///
    /// # Errors
    ///
    /// Fails when source and destination shapes disagree.
    pub fn apply(
        &self,
        src: &Array2<T>,
        dst: &mut Array2<T>,
        boundary: Boundary,
    ) -> Result<(), FilterError> {
        if src.rows() != dst.rows() || src.cols() != dst.cols() {
            return Err(FilterError::ShapeMismatch(
                src.rows(),
                src.cols(),
                dst.rows(),
                dst.cols(),
            ));
        }
        if src.is_empty() {
            return Ok(());
        }

        let pairs = self.kernel.num_pairs();
        log::debug!("separable filtering with {pairs} pair(s)");

        let mut temp = Array2::from_val(src.rows(), src.cols(), T::default());
        let mut pair_out = if pairs > 1 {
            Some(Array2::from_val(src.rows(), src.cols(), T::default()))
        } else {
            None
        };

        for (p, (row_kernel, col_kernel)) in self.kernel.pairs().iter().enumerate() {
            // horizontal pass into the intermediate buffer
            if is_unit(row_kernel) {
                scale(src.as_slice(), temp.as_slice_mut(), row_kernel);
            } else {
                let mut pass = Filter1d::<T, A>::new(row_kernel.clone());
                pass.apply_rows(src, &mut temp, boundary)?;
            }

            // vertical pass, straight to dst when a sum is not needed
            let target = match (&mut pair_out, p) {
                (None, _) | (Some(_), 0) => &mut *dst,
                (Some(buf), _) => buf,
            };
            if is_unit(col_kernel) {
                scale(temp.as_slice(), target.as_slice_mut(), col_kernel);
            } else {
                let mut pass = Filter1d::<T, A>::new(col_kernel.clone());
                pass.apply_cols(&temp, target, boundary)?;
            }

            if p > 0 {
                if let Some(buf) = &pair_out {
                    accumulate_into(dst, buf);
                }
            }
        }
        Ok(())
    }
}

fn is_unit<T: Element>(kernel: &Kernel1d<T>) -> bool {
    kernel.len() == 1 && kernel.offset() == 0
}

/// Scalar-multiply fast path for degenerate size-1 kernels.
fn scale<T: Element>(src: &[T], dst: &mut [T], kernel: &Kernel1d<T>) {
    let k = kernel.at(0).to_acc();
    let norm = kernel.norm().to_acc();
    let norm = if norm == T::Acc::zero() {
        T::Acc::one()
    } else {
        norm
    };
    for (d, &s) in dst.iter_mut().zip(src.iter()) {
        *d = T::from_acc(k * s.to_acc() / norm);
    }
}

/// Elementwise sum of a per-pair result into the destination.
fn accumulate_into<T: Element>(dst: &mut Array2<T>, add: &Array2<T>) {
    for (d, &a) in dst.as_slice_mut().iter_mut().zip(add.as_slice().iter()) {
        *d = T::from_acc(d.to_acc() + a.to_acc());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accumulator::Convolution;

    #[test]
    fn single_pair_box() -> Result<(), FilterError> {
        let k = Kernel1d::new(vec![1.0f32, 1.0, 1.0], 1, 1.0)?;
        let filter =
            SeparableFilter2d::<f32, Convolution<f32>>::new(SeparableKernel::new(k.clone(), k));

        let mut src = Array2::from_val(5, 5, 0.0f32);
        src.as_slice_mut()[12] = 1.0;
        let mut dst = Array2::from_val(5, 5, 0.0f32);
        filter.apply(&src, &mut dst, Boundary::Zero)?;

        #[rustfmt::skip]
        assert_eq!(dst.as_slice(), &[
            0.0, 0.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 1.0, 1.0, 0.0,
            0.0, 1.0, 1.0, 1.0, 0.0,
            0.0, 1.0, 1.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 0.0, 0.0,
        ]);
        assert_eq!(dst.as_slice().iter().sum::<f32>(), 9.0);
        Ok(())
    }

    #[test]
    fn unit_kernels_scale() -> Result<(), FilterError> {
        let k = Kernel1d::new(vec![2.0f32], 0, 1.0)?;
        let filter =
            SeparableFilter2d::<f32, Convolution<f32>>::new(SeparableKernel::new(k.clone(), k));

        let src = Array2::from_val(3, 4, 1.5f32);
        let mut dst = Array2::from_val(3, 4, 0.0f32);
        filter.apply(&src, &mut dst, Boundary::Zero)?;
        // both passes multiply by 2
        assert!(dst.as_slice().iter().all(|&v| v == 6.0));
        Ok(())
    }

    #[test]
    fn two_pairs_sum() -> Result<(), FilterError> {
        // each pair puts a single off-center 1-tap, so their sum is two taps
        let a = Kernel1d::new(vec![1.0f32, 0.0, 0.0], 1, 1.0)?;
        let b = Kernel1d::new(vec![0.0f32, 0.0, 1.0], 1, 1.0)?;
        let mut sep = SeparableKernel::new(a.clone(), a);
        sep.push_pair(b.clone(), b);
        let filter = SeparableFilter2d::<f32, Convolution<f32>>::new(sep);

        let mut src = Array2::from_val(5, 5, 0.0f32);
        src.as_slice_mut()[12] = 1.0;
        let mut dst = Array2::from_val(5, 5, 0.0f32);
        filter.apply(&src, &mut dst, Boundary::Zero)?;

        // dense equivalent has taps at (-1, -1) and (1, 1)
        assert_eq!(dst.get(1, 1), Some(&1.0));
        assert_eq!(dst.get(3, 3), Some(&1.0));
        assert_eq!(dst.as_slice().iter().sum::<f32>(), 2.0);
        Ok(())
    }

    #[test]
    fn shape_mismatch_is_an_error() -> Result<(), FilterError> {
        let k = Kernel1d::new(vec![1.0f32], 0, 1.0)?;
        let filter = SeparableFilter2d::<f32, Convolution<f32>>::new(SeparableKernel::new(
            k.clone(),
            k,
        ));
        let src = Array2::from_val(3, 3, 0.0f32);
        let mut dst = Array2::from_val(3, 4, 0.0f32);
        assert!(matches!(
            filter.apply(&src, &mut dst, Boundary::Zero),
            Err(FilterError::ShapeMismatch(3, 3, 3, 4))
        ));
        Ok(())
    }
}
