//! Small kernel and structuring-element generators for the convenience
//! ops and for tests. Full-blown kernel generation (derivative banks,
//! wavelet tables) lives with the callers, not in this core.

use winfilt_array::Array2;

use crate::error::FilterError;
use crate::kernel::Kernel1d;

/// Create a normalized 1-D box kernel centered at `size / 2`.
///
/// # Errors
///
/// Fails when `size` is zero.
pub fn box_kernel_1d(size: usize) -> Result<Kernel1d<f32>, FilterError> {
    if size == 0 {
        return Err(FilterError::EmptyKernel);
    }
    Kernel1d::new(vec![1.0 / size as f32; size], size / 2, 1.0)
}

/// Create a normalized 1-D gaussian kernel.
///
/// # Errors
///
/// Fails when `size` is zero.
pub fn gaussian_kernel_1d(size: usize, sigma: f32) -> Result<Kernel1d<f32>, FilterError> {
    if size == 0 {
        return Err(FilterError::EmptyKernel);
    }
    let sigma = sigma.max(f32::EPSILON);
    let mean = (size - 1) as f32 / 2.0;
    let sigma_sq = sigma * sigma;

    let mut kernel = Vec::with_capacity(size);
    for i in 0..size {
        let x = i as f32 - mean;
        kernel.push((-(x * x) / (2.0 * sigma_sq)).exp());
    }

    let sum = kernel.iter().sum::<f32>();
    kernel.iter_mut().for_each(|k| *k /= sum);

    Kernel1d::new(kernel, size / 2, 1.0)
}

/// Create the central-difference gradient kernel, an antisymmetric
/// 3-tap kernel computing `(src[x + 1] - src[x - 1]) / 2`.
pub fn gradient_kernel_1d() -> Result<Kernel1d<f32>, FilterError> {
    Kernel1d::new(vec![0.5, 0.0, -0.5], 1, 1.0)
}

/// The identity kernel: size 1, zero offset, value 1.
pub fn unit_kernel_1d() -> Result<Kernel1d<f32>, FilterError> {
    Kernel1d::new(vec![1.0], 0, 1.0)
}

/// Shapes for flat structuring elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuringShape {
    /// Full rectangle.
    Rect,
    /// Center row and column only.
    Cross,
    /// Inscribed ellipse.
    Ellipse,
}

/// Create a byte mask for a flat structuring element of the given shape.
pub fn structuring_mask(shape: StructuringShape, rows: usize, cols: usize) -> Array2<u8> {
    let cy = rows / 2;
    let cx = cols / 2;
    let mut mask = Array2::from_val(rows, cols, 0u8);

    for r in 0..rows {
        for c in 0..cols {
            let active = match shape {
                StructuringShape::Rect => true,
                StructuringShape::Cross => r == cy || c == cx,
                StructuringShape::Ellipse => {
                    let dy = (r as f64 - cy as f64) / (rows as f64 / 2.0);
                    let dx = (c as f64 - cx as f64) / (cols as f64 / 2.0);
                    dx * dx + dy * dy <= 1.0
                }
            };
            if active {
                mask.as_slice_mut()[r * cols + c] = 1;
            }
        }
    }

    mask
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::KernelType;

    #[test]
    fn box_kernel_is_symmetric_and_normalized() -> Result<(), FilterError> {
        let k = box_kernel_1d(3)?;
        assert_eq!(k.classify(), KernelType::Symmetric);
        assert!((k.as_slice().iter().sum::<f32>() - 1.0).abs() < 1e-6);

        assert!(matches!(box_kernel_1d(0), Err(FilterError::EmptyKernel)));
        Ok(())
    }

    #[test]
    fn gaussian_kernel_sums_to_one() -> Result<(), FilterError> {
        let k = gaussian_kernel_1d(5, 0.8)?;
        assert_eq!(k.len(), 5);
        assert_eq!(k.offset(), 2);
        assert!((k.as_slice().iter().sum::<f32>() - 1.0).abs() < 1e-6);
        assert_eq!(k.classify(), KernelType::Symmetric);
        Ok(())
    }

    #[test]
    fn gradient_kernel_is_antisymmetric() -> Result<(), FilterError> {
        assert_eq!(gradient_kernel_1d()?.classify(), KernelType::Antisymmetric);
        Ok(())
    }

    #[test]
    fn cross_mask_3x3() {
        let mask = structuring_mask(StructuringShape::Cross, 3, 3);
        #[rustfmt::skip]
        assert_eq!(mask.as_slice(), &[
            0, 1, 0,
            1, 1, 1,
            0, 1, 0,
        ]);
    }

    #[test]
    fn rect_mask_is_full() {
        let mask = structuring_mask(StructuringShape::Rect, 2, 4);
        assert!(mask.as_slice().iter().all(|&v| v == 1));
    }
}
