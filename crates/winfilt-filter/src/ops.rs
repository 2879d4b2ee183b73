//! Convenience wrappers wiring the kernel generators into the engines.

use winfilt_array::Array2;

use crate::accumulator::{Convolution, Dilation, Erosion};
use crate::adapter::{AnyKernel, AnySeparableKernel, KernelElement};
use crate::boundary::Boundary;
use crate::conv2d::Filter2d;
use crate::element::Element;
use crate::error::FilterError;
use crate::kernel::{Kernel2d, SeparableKernel};
use crate::kernels;
use crate::separable::SeparableFilter2d;

/// Blur with a separable box kernel of the given side length.
///
/// # Errors
///
/// Fails when `size` is zero or the shapes disagree.
pub fn box_filter<T: KernelElement>(
    src: &Array2<T>,
    dst: &mut Array2<T>,
    size: usize,
    boundary: Boundary,
) -> Result<(), FilterError> {
    let k = kernels::box_kernel_1d(size)?;
    let filter = SeparableFilter2d::<T, Convolution<T>>::from_any(AnyKernel::Separable(
        AnySeparableKernel::F32(SeparableKernel::new(k.clone(), k)),
    ))?;
    filter.apply(src, dst, boundary)
}

/// Blur with a separable gaussian kernel.
///
/// # Errors
///
/// Fails when `size` is zero or the shapes disagree.
pub fn gaussian_filter<T: KernelElement>(
    src: &Array2<T>,
    dst: &mut Array2<T>,
    size: usize,
    sigma: f32,
    boundary: Boundary,
) -> Result<(), FilterError> {
    let k = kernels::gaussian_kernel_1d(size, sigma)?;
    let filter = SeparableFilter2d::<T, Convolution<T>>::from_any(AnyKernel::Separable(
        AnySeparableKernel::F32(SeparableKernel::new(k.clone(), k)),
    ))?;
    filter.apply(src, dst, boundary)
}

/// Compute central-difference gradients along both axes.
///
/// # Errors
///
/// Fails when the shapes disagree.
pub fn gradient_filter<T: KernelElement>(
    src: &Array2<T>,
    dx: &mut Array2<T>,
    dy: &mut Array2<T>,
    boundary: Boundary,
) -> Result<(), FilterError> {
    let grad = kernels::gradient_kernel_1d()?;
    let unit = kernels::unit_kernel_1d()?;

    let horizontal = SeparableFilter2d::<T, Convolution<T>>::from_any(AnyKernel::Separable(
        AnySeparableKernel::F32(SeparableKernel::new(grad.clone(), unit.clone())),
    ))?;
    horizontal.apply(src, dx, boundary)?;

    let vertical = SeparableFilter2d::<T, Convolution<T>>::from_any(AnyKernel::Separable(
        AnySeparableKernel::F32(SeparableKernel::new(unit, grad)),
    ))?;
    vertical.apply(src, dy, boundary)
}

fn flat_kernel<T: Element>(rows: usize, cols: usize) -> Result<Kernel2d<T>, FilterError> {
    Kernel2d::new(
        rows,
        cols,
        vec![T::zero(); rows * cols],
        (rows / 2, cols / 2),
        T::one(),
    )
}

/// Grayscale dilation with a flat structuring element.
///
/// # Errors
///
/// Fails when the structuring element is empty or the shapes disagree.
pub fn dilate<T: Element>(
    src: &Array2<T>,
    dst: &mut Array2<T>,
    shape: kernels::StructuringShape,
    size: (usize, usize),
    boundary: Boundary,
) -> Result<(), FilterError> {
    let mut filter = Filter2d::<T, Dilation<T>>::new(flat_kernel(size.0, size.1)?);
    filter.set_mask(kernels::structuring_mask(shape, size.0, size.1));
    filter.apply_masked(src, dst, boundary)
}

/// Grayscale erosion with a flat structuring element.
///
/// # Errors
///
/// Fails when the structuring element is empty or the shapes disagree.
pub fn erode<T: Element>(
    src: &Array2<T>,
    dst: &mut Array2<T>,
    shape: kernels::StructuringShape,
    size: (usize, usize),
    boundary: Boundary,
) -> Result<(), FilterError> {
    let mut filter = Filter2d::<T, Erosion<T>>::new(flat_kernel(size.0, size.1)?);
    filter.set_mask(kernels::structuring_mask(shape, size.0, size.1));
    filter.apply_masked(src, dst, boundary)
}
