use winfilt_array::Array2;

use crate::accumulator::Accumulator;
use crate::adapter::{resolve_kernel_2d, AnyKernel, KernelElement};
use crate::boundary::{resolve_index, Boundary, Resolved};
use crate::element::Element;
use crate::error::FilterError;
use crate::kernel::Kernel2d;

/// The complement of the interior block, enumerated explicitly so each
/// zone runs its own loop with exactly one synthesis rule per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    TopLeft,
    Top,
    TopRight,
    Left,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
}

const BORDER_REGIONS: [Region; 8] = [
    Region::TopLeft,
    Region::Top,
    Region::TopRight,
    Region::Left,
    Region::Right,
    Region::BottomLeft,
    Region::Bottom,
    Region::BottomRight,
];

/// Output ranges of one border region, given the interior block
/// `[rb, re] × [cb, ce]` inside an `nrows × ncols` domain.
fn region_ranges(
    region: Region,
    rb: isize,
    re: isize,
    cb: isize,
    ce: isize,
    nrows: isize,
    ncols: isize,
) -> (std::ops::Range<isize>, std::ops::Range<isize>) {
    let (top, mid, bottom) = (0..rb, rb..re + 1, re + 1..nrows);
    let (left, center, right) = (0..cb, cb..ce + 1, ce + 1..ncols);
    match region {
        Region::TopLeft => (top, left),
        Region::Top => (top, center),
        Region::TopRight => (top, right),
        Region::Left => (mid, left),
        Region::Right => (mid, right),
        Region::BottomLeft => (bottom, left),
        Region::Bottom => (bottom, center),
        Region::BottomRight => (bottom, right),
    }
}

/// An active tap of a mask-restricted kernel: kernel indices and value.
type MaskTap<T> = (isize, isize, T);

/// 2-D windowed filter engine for dense and mask-restricted kernels.
///
/// Dense mode splits the output domain into the maximal interior rectangle
/// — where the whole kernel footprint stays in bounds — plus eight border
/// regions (four edges, four corners) whose loops apply the boundary
/// policy per axis. Masked mode reuses the same decomposition but iterates
/// only the active taps of a byte mask aligned with the kernel footprint.
pub struct Filter2d<T: Element, A: Accumulator<T>> {
    kernel: Kernel2d<T>,
    mask: Option<Array2<u8>>,
    acc: A,
}

impl<T: Element, A: Accumulator<T>> Filter2d<T, A> {
    /// Create an engine from an already-typed dense kernel.
    pub fn new(kernel: Kernel2d<T>) -> Self {
        let mut acc = A::default();
        acc.set_norm(kernel.norm());
        Self {
            kernel,
            mask: None,
            acc,
        }
    }

    /// Create an engine by resolving a polymorphic kernel.
    ///
    /// # Errors
    ///
    /// Fails when the kernel is not dense 2-D or cannot be adapted.
    pub fn from_any(any: AnyKernel) -> Result<Self, FilterError>
    where
        T: KernelElement,
    {
        Ok(Self::new(resolve_kernel_2d(any)?))
    }

    /// Replace the kernel, re-running adaptation.
    ///
    /// # Errors
    ///
    /// Fails when the kernel is not dense 2-D or cannot be adapted.
    pub fn set_kernel(&mut self, any: AnyKernel) -> Result<(), FilterError>
    where
        T: KernelElement,
    {
        let kernel = resolve_kernel_2d(any)?;
        self.acc.set_norm(kernel.norm());
        self.kernel = kernel;
        Ok(())
    }

    /// The resolved kernel.
    pub fn kernel(&self) -> &Kernel2d<T> {
        &self.kernel
    }

    /// Set the byte mask restricting the kernel support; non-zero entries
    /// are active. Validated against the kernel footprint on
    /// [`apply_masked`](Self::apply_masked).
    pub fn set_mask(&mut self, mask: Array2<u8>) {
        self.mask = Some(mask);
    }

    /// The configured mask, if any.
    pub fn mask(&self) -> Option<&Array2<u8>> {
        self.mask.as_ref()
    }

    /// The accumulator, e.g. to read back a matching score after
    /// [`evaluate_at`](Self::evaluate_at).
    pub fn accumulator(&self) -> &A {
        &self.acc
    }

    /// The accumulator, mutable.
    pub fn accumulator_mut(&mut self) -> &mut A {
        &mut self.acc
    }

    /// Filter `src` into `dst` with the dense kernel.
    ///
    /// An empty source is a no-op. Under [`Boundary::NoBoundary`] the
    /// border output positions are left untouched.
    ///
    /// # Errors
    ///
    /// Fails when source and destination shapes disagree.
    pub fn apply(
        &mut self,
        src: &Array2<T>,
        dst: &mut Array2<T>,
        boundary: Boundary,
    ) -> Result<(), FilterError> {
        self.check_shapes(src, dst)?;
        if src.is_empty() {
            return Ok(());
        }
        if self.kernel.rows() > src.rows() || self.kernel.cols() > src.cols() {
            log::debug!(
                "kernel ({}x{}) exceeds source ({}x{}): per-tap checked path",
                self.kernel.rows(),
                self.kernel.cols(),
                src.rows(),
                src.cols()
            );
            self.apply_checked(src, dst, boundary);
            return Ok(());
        }

        self.interior_dense(src, dst);
        if boundary == Boundary::NoBoundary {
            return Ok(());
        }
        let (rb, re, cb, ce) = self.interior_block(src);
        for region in BORDER_REGIONS {
            let (rows, cols) = region_ranges(
                region,
                rb,
                re,
                cb,
                ce,
                src.rows() as isize,
                src.cols() as isize,
            );
            for r in rows {
                for c in cols.clone() {
                    if let Some(v) = self.sample_checked(src, r, c, boundary) {
                        dst.as_slice_mut()[r as usize * src.cols() + c as usize] = v;
                    }
                }
            }
        }
        Ok(())
    }

    /// Filter in place, buffering a copy of the input first.
    pub fn apply_in_place(
        &mut self,
        data: &mut Array2<T>,
        boundary: Boundary,
    ) -> Result<(), FilterError> {
        let src = data.clone();
        self.apply(&src, data, boundary)
    }

    /// Filter `src` into `dst` with the kernel restricted to the active
    /// entries of the configured mask.
    ///
    /// # Errors
    ///
    /// Fails when no mask is set, when the mask shape disagrees with the
    /// kernel footprint (checked before any traversal), or when source and
    /// destination shapes disagree.
    pub fn apply_masked(
        &mut self,
        src: &Array2<T>,
        dst: &mut Array2<T>,
        boundary: Boundary,
    ) -> Result<(), FilterError> {
        self.check_shapes(src, dst)?;
        let taps = self.mask_taps()?;
        if src.is_empty() {
            return Ok(());
        }
        if self.kernel.rows() > src.rows() || self.kernel.cols() > src.cols() {
            log::debug!(
                "masked kernel ({}x{}) exceeds source ({}x{}): per-tap checked path",
                self.kernel.rows(),
                self.kernel.cols(),
                src.rows(),
                src.cols()
            );
            for r in 0..src.rows() as isize {
                for c in 0..src.cols() as isize {
                    if let Some(v) = self.sample_checked_masked(src, r, c, boundary, &taps) {
                        dst.as_slice_mut()[r as usize * src.cols() + c as usize] = v;
                    }
                }
            }
            return Ok(());
        }

        self.interior_masked(src, dst, &taps);
        if boundary == Boundary::NoBoundary {
            return Ok(());
        }
        let (rb, re, cb, ce) = self.interior_block(src);
        for region in BORDER_REGIONS {
            let (rows, cols) = region_ranges(
                region,
                rb,
                re,
                cb,
                ce,
                src.rows() as isize,
                src.cols() as isize,
            );
            for r in rows {
                for c in cols.clone() {
                    if let Some(v) = self.sample_checked_masked(src, r, c, boundary, &taps) {
                        dst.as_slice_mut()[r as usize * src.cols() + c as usize] = v;
                    }
                }
            }
        }
        Ok(())
    }

    /// Evaluate one output position with every tap individually resolved,
    /// leaving the accumulated statistics readable through
    /// [`accumulator`](Self::accumulator).
    ///
    /// Returns `Ok(None)` when [`Boundary::NoBoundary`] skips the
    /// position.
    ///
    /// # Errors
    ///
    /// Fails when the position lies outside the source array.
    pub fn evaluate_at(
        &mut self,
        src: &Array2<T>,
        pos: (usize, usize),
        boundary: Boundary,
    ) -> Result<Option<T>, FilterError> {
        if pos.0 >= src.rows() || pos.1 >= src.cols() {
            return Err(FilterError::PositionOutOfBounds(
                pos.0,
                pos.1,
                src.rows(),
                src.cols(),
            ));
        }
        Ok(self.sample_checked(src, pos.0 as isize, pos.1 as isize, boundary))
    }

    fn check_shapes(&self, src: &Array2<T>, dst: &Array2<T>) -> Result<(), FilterError> {
        if src.rows() != dst.rows() || src.cols() != dst.cols() {
            return Err(FilterError::ShapeMismatch(
                src.rows(),
                src.cols(),
                dst.rows(),
                dst.cols(),
            ));
        }
        Ok(())
    }

    /// Interior block `[rb, re] × [cb, ce]`: the maximal rectangle whose
    /// kernel footprint never leaves the source.
    fn interior_block(&self, src: &Array2<T>) -> (isize, isize, isize, isize) {
        let rb = self.kernel.last_row();
        let re = src.rows() as isize - 1 + self.kernel.first_row();
        let cb = self.kernel.last_col();
        let ce = src.cols() as isize - 1 + self.kernel.first_col();
        (rb, re, cb, ce)
    }

    /// Validate the mask against the kernel footprint and derive the
    /// active tap list.
    fn mask_taps(&self) -> Result<Vec<MaskTap<T>>, FilterError> {
        let mask = self.mask.as_ref().ok_or(FilterError::MissingMask)?;
        if mask.rows() != self.kernel.rows() || mask.cols() != self.kernel.cols() {
            return Err(FilterError::MaskSizeMismatch(
                mask.rows(),
                mask.cols(),
                self.kernel.rows(),
                self.kernel.cols(),
            ));
        }
        let (off_r, off_c) = self.kernel.offset();
        let mut taps = Vec::new();
        for mr in 0..mask.rows() {
            for mc in 0..mask.cols() {
                if mask.as_slice()[mr * mask.cols() + mc] != 0 {
                    let i = mr as isize - off_r as isize;
                    let j = mc as isize - off_c as isize;
                    taps.push((i, j, self.kernel.at(i, j)));
                }
            }
        }
        Ok(taps)
    }

    fn interior_dense(&mut self, src: &Array2<T>, dst: &mut Array2<T>) {
        let (rb, re, cb, ce) = self.interior_block(src);
        let ncols = src.cols();
        let data = src.as_slice();
        let out = dst.as_slice_mut();
        let (fr, lr) = (self.kernel.first_row(), self.kernel.last_row());
        let (fc, lc) = (self.kernel.first_col(), self.kernel.last_col());

        for r in rb..=re {
            for c in cb..=ce {
                self.acc.reset();
                for i in fr..=lr {
                    let row_base = (r - i) as usize * ncols;
                    for j in fc..=lc {
                        self.acc
                            .accumulate(self.kernel.at(i, j), data[row_base + (c - j) as usize]);
                    }
                }
                out[r as usize * ncols + c as usize] = self.acc.result();
            }
        }
    }

    fn interior_masked(&mut self, src: &Array2<T>, dst: &mut Array2<T>, taps: &[MaskTap<T>]) {
        let (rb, re, cb, ce) = self.interior_block(src);
        let ncols = src.cols();
        let data = src.as_slice();
        let out = dst.as_slice_mut();

        for r in rb..=re {
            for c in cb..=ce {
                self.acc.reset();
                for &(i, j, k) in taps {
                    self.acc
                        .accumulate(k, data[(r - i) as usize * ncols + (c - j) as usize]);
                }
                out[r as usize * ncols + c as usize] = self.acc.result();
            }
        }
    }

    /// Robust per-tap path for kernels exceeding the source in either
    /// dimension.
    fn apply_checked(&mut self, src: &Array2<T>, dst: &mut Array2<T>, boundary: Boundary) {
        for r in 0..src.rows() as isize {
            for c in 0..src.cols() as isize {
                if let Some(v) = self.sample_checked(src, r, c, boundary) {
                    dst.as_slice_mut()[r as usize * src.cols() + c as usize] = v;
                }
            }
        }
    }

    /// Evaluate one output sample, resolving each axis of every tap
    /// independently; corner positions combine both axes' synthesis.
    fn sample_checked(
        &mut self,
        src: &Array2<T>,
        r: isize,
        c: isize,
        boundary: Boundary,
    ) -> Option<T> {
        self.acc.reset();
        let data = src.as_slice();
        let ncols = src.cols();
        let (fr, lr) = (self.kernel.first_row(), self.kernel.last_row());
        let (fc, lc) = (self.kernel.first_col(), self.kernel.last_col());
        for i in fr..=lr {
            let row = resolve_index(r - i, src.rows(), boundary);
            for j in fc..=lc {
                let col = resolve_index(c - j, ncols, boundary);
                match (row, col) {
                    (Resolved::Inside(y), Resolved::Inside(x)) => {
                        self.acc.accumulate(self.kernel.at(i, j), data[y * ncols + x]);
                    }
                    (Resolved::Skip, _) | (_, Resolved::Skip) => return None,
                    _ => self.acc.accumulate(self.kernel.at(i, j), T::zero()),
                }
            }
        }
        Some(self.acc.result())
    }

    fn sample_checked_masked(
        &mut self,
        src: &Array2<T>,
        r: isize,
        c: isize,
        boundary: Boundary,
        taps: &[MaskTap<T>],
    ) -> Option<T> {
        self.acc.reset();
        let data = src.as_slice();
        let ncols = src.cols();
        for &(i, j, k) in taps {
            let row = resolve_index(r - i, src.rows(), boundary);
            let col = resolve_index(c - j, ncols, boundary);
            match (row, col) {
                (Resolved::Inside(y), Resolved::Inside(x)) => {
                    self.acc.accumulate(k, data[y * ncols + x]);
                }
                (Resolved::Skip, _) | (_, Resolved::Skip) => return None,
                _ => self.acc.accumulate(k, T::zero()),
            }
        }
        Some(self.acc.result())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accumulator::Convolution;

    fn ones3x3(norm: i32) -> Kernel2d<i32> {
        Kernel2d::new(3, 3, vec![1; 9], (1, 1), norm).unwrap()
    }

    #[test]
    fn dense_impulse_response() -> Result<(), FilterError> {
        let mut filter = Filter2d::<i32, Convolution<i32>>::new(ones3x3(1));

        let mut src = Array2::from_val(5, 5, 0);
        src.as_slice_mut()[12] = 1;
        let mut dst = Array2::from_val(5, 5, 0);
        filter.apply(&src, &mut dst, Boundary::Zero)?;

        #[rustfmt::skip]
        assert_eq!(dst.as_slice(), &[
            0, 0, 0, 0, 0,
            0, 1, 1, 1, 0,
            0, 1, 1, 1, 0,
            0, 1, 1, 1, 0,
            0, 0, 0, 0, 0,
        ]);
        Ok(())
    }

    #[test]
    fn dense_border_synthesis() -> Result<(), FilterError> {
        let mut filter = Filter2d::<i32, Convolution<i32>>::new(ones3x3(1));

        #[rustfmt::skip]
        let src = Array2::new(3, 3, vec![
            1, 2, 3,
            4, 5, 6,
            7, 8, 9,
        ])?;
        let mut dst = Array2::from_val(3, 3, 0);

        filter.apply(&src, &mut dst, Boundary::Zero)?;
        // corner (0,0) sums the 2x2 in-domain patch, center sums all
        assert_eq!(dst.get(0, 0), Some(&12));
        assert_eq!(dst.get(1, 1), Some(&45));
        assert_eq!(dst.get(2, 2), Some(&28));

        filter.apply(&src, &mut dst, Boundary::Periodic)?;
        // fully periodic: every 3x3 window sums the whole array
        assert!(dst.as_slice().iter().all(|&v| v == 45));
        Ok(())
    }

    #[test]
    fn dense_no_boundary_leaves_ring() -> Result<(), FilterError> {
        let mut filter = Filter2d::<i32, Convolution<i32>>::new(ones3x3(1));
        let src = Array2::from_val(4, 4, 1);
        let mut dst = Array2::from_val(4, 4, -7);
        filter.apply(&src, &mut dst, Boundary::NoBoundary)?;

        for r in 0..4 {
            for c in 0..4 {
                let expected = if (1..3).contains(&r) && (1..3).contains(&c) {
                    9
                } else {
                    -7
                };
                assert_eq!(dst.get(r, c), Some(&expected), "at ({r}, {c})");
            }
        }
        Ok(())
    }

    #[test]
    fn oversized_kernel_falls_back() -> Result<(), FilterError> {
        let kernel = Kernel2d::new(5, 5, vec![1; 25], (2, 2), 1)?;
        let mut filter = Filter2d::<i32, Convolution<i32>>::new(kernel);
        let src = Array2::from_val(3, 3, 2);
        let mut dst = Array2::from_val(3, 3, 0);
        filter.apply(&src, &mut dst, Boundary::Constant)?;
        // clamping a uniform array keeps every window sum at 25 * 2
        assert!(dst.as_slice().iter().all(|&v| v == 50));
        Ok(())
    }

    #[test]
    fn masked_four_neighborhood() -> Result<(), FilterError> {
        let mut filter = Filter2d::<i32, Convolution<i32>>::new(ones3x3(1));
        #[rustfmt::skip]
        filter.set_mask(Array2::new(3, 3, vec![
            0, 1, 0,
            1, 0, 1,
            0, 1, 0,
        ])?);

        let src = Array2::from_val(5, 5, 7);
        let mut dst = Array2::from_val(5, 5, 0);
        filter.apply_masked(&src, &mut dst, Boundary::Constant)?;

        // uniform input: exactly the 4 active neighbors contribute
        assert!(dst.as_slice().iter().all(|&v| v == 28));
        Ok(())
    }

    #[test]
    fn mask_shape_mismatch_is_rejected_before_writing() -> Result<(), FilterError> {
        let mut filter = Filter2d::<i32, Convolution<i32>>::new(ones3x3(1));
        filter.set_mask(Array2::from_val(2, 3, 1));

        let src = Array2::from_val(4, 4, 1);
        let mut dst = Array2::from_val(4, 4, -1);
        let err = filter.apply_masked(&src, &mut dst, Boundary::Zero);
        assert!(matches!(err, Err(FilterError::MaskSizeMismatch(2, 3, 3, 3))));
        // destination untouched
        assert!(dst.as_slice().iter().all(|&v| v == -1));
        Ok(())
    }

    #[test]
    fn missing_mask_is_an_error() -> Result<(), FilterError> {
        let mut filter = Filter2d::<i32, Convolution<i32>>::new(ones3x3(1));
        let src = Array2::from_val(4, 4, 1);
        let mut dst = Array2::from_val(4, 4, 0);
        assert!(matches!(
            filter.apply_masked(&src, &mut dst, Boundary::Zero),
            Err(FilterError::MissingMask)
        ));
        Ok(())
    }

    #[test]
    fn evaluate_at_matches_apply() -> Result<(), FilterError> {
        let mut filter = Filter2d::<i32, Convolution<i32>>::new(ones3x3(1));
        #[rustfmt::skip]
        let src = Array2::new(3, 3, vec![
            1, 2, 3,
            4, 5, 6,
            7, 8, 9,
        ])?;
        let mut dst = Array2::from_val(3, 3, 0);
        filter.apply(&src, &mut dst, Boundary::Mirror)?;

        for r in 0..3 {
            for c in 0..3 {
                let v = filter.evaluate_at(&src, (r, c), Boundary::Mirror)?;
                assert_eq!(v, dst.get(r, c).copied());
            }
        }

        assert!(matches!(
            filter.evaluate_at(&src, (3, 0), Boundary::Mirror),
            Err(FilterError::PositionOutOfBounds(3, 0, 3, 3))
        ));
        Ok(())
    }

    #[test]
    fn in_place_matches_out_of_place() -> Result<(), FilterError> {
        let mut filter = Filter2d::<i32, Convolution<i32>>::new(ones3x3(1));
        #[rustfmt::skip]
        let src = Array2::new(3, 3, vec![
            1, 2, 3,
            4, 5, 6,
            7, 8, 9,
        ])?;

        let mut expected = Array2::from_val(3, 3, 0);
        filter.apply(&src, &mut expected, Boundary::Mirror)?;

        let mut data = src.clone();
        filter.apply_in_place(&mut data, Boundary::Mirror)?;
        assert_eq!(data, expected);
        Ok(())
    }

    #[test]
    fn empty_source_is_noop() -> Result<(), FilterError> {
        let mut filter = Filter2d::<i32, Convolution<i32>>::new(ones3x3(1));
        let src = Array2::from_val(0, 0, 0);
        let mut dst = Array2::from_val(0, 0, 0);
        filter.apply(&src, &mut dst, Boundary::Zero)?;
        filter.set_mask(Array2::from_val(3, 3, 1));
        filter.apply_masked(&src, &mut dst, Boundary::Zero)?;
        Ok(())
    }
}
