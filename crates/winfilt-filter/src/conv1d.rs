use winfilt_array::Array2;

use crate::accumulator::Accumulator;
use crate::adapter::{resolve_kernel_1d, AnyKernel, KernelElement};
use crate::boundary::{resolve_index, Boundary, Resolved};
use crate::element::Element;
use crate::error::FilterError;
use crate::kernel::{Kernel1d, KernelType};

/// Read access to one line of samples, by slice or by strided column view.
///
/// This is the seam that lets the column-wise pass transpose the access
/// pattern without materializing a transposed copy.
pub(crate) trait Line<T> {
    fn len(&self) -> usize;
    fn at(&self, i: usize) -> T;
}

/// Write access to one line of samples.
pub(crate) trait LineMut<T> {
    fn set(&mut self, i: usize, v: T);
}

impl<T: Copy> Line<T> for &[T] {
    fn len(&self) -> usize {
        (**self).len()
    }

    fn at(&self, i: usize) -> T {
        self[i]
    }
}

impl<T: Copy> LineMut<T> for &mut [T] {
    fn set(&mut self, i: usize, v: T) {
        self[i] = v;
    }
}

/// One column of a row-major array.
pub(crate) struct ColumnRef<'a, T> {
    data: &'a [T],
    cols: usize,
    col: usize,
}

impl<T: Copy> Line<T> for ColumnRef<'_, T> {
    fn len(&self) -> usize {
        self.data.len() / self.cols
    }

    fn at(&self, i: usize) -> T {
        self.data[i * self.cols + self.col]
    }
}

/// One column of a row-major array, mutable.
pub(crate) struct ColumnMut<'a, T> {
    data: &'a mut [T],
    cols: usize,
    col: usize,
}

impl<T: Copy> LineMut<T> for ColumnMut<'_, T> {
    fn set(&mut self, i: usize, v: T) {
        self.data[i * self.cols + self.col] = v;
    }
}

/// 1-D windowed filter engine.
///
/// Owns the resolved kernel, its cached symmetry classification and the
/// accumulator instance. Each `apply` splits the output domain into the
/// maximal interior block — where every kernel tap stays in bounds and the
/// inner loop needs no checks — and two border zones resolved through the
/// boundary policy. The engine computes true convolution,
/// `dst[x] = Σᵢ k[i] · src[x − i]`; other combining rules come from the
/// accumulator.
pub struct Filter1d<T: Element, A: Accumulator<T>> {
    kernel: Kernel1d<T>,
    kind: KernelType,
    acc: A,
}

impl<T: Element, A: Accumulator<T>> Filter1d<T, A> {
    /// Create an engine from an already-typed kernel.
    pub fn new(kernel: Kernel1d<T>) -> Self {
        let kind = kernel.classify();
        let mut acc = A::default();
        acc.set_norm(kernel.norm());
        Self { kernel, kind, acc }
    }

    /// Create an engine by resolving a polymorphic kernel.
    ///
    /// # Errors
    ///
    /// Fails when the kernel is not 1-D or its values cannot be adapted.
    pub fn from_any(any: AnyKernel) -> Result<Self, FilterError>
    where
        T: KernelElement,
    {
        Ok(Self::new(resolve_kernel_1d(any)?))
    }

    /// Replace the kernel, re-running adaptation and classification.
    ///
    /// # Errors
    ///
    /// Fails when the kernel is not 1-D or its values cannot be adapted.
    pub fn set_kernel(&mut self, any: AnyKernel) -> Result<(), FilterError>
    where
        T: KernelElement,
    {
        let kernel = resolve_kernel_1d(any)?;
        self.kind = kernel.classify();
        self.acc.set_norm(kernel.norm());
        self.kernel = kernel;
        Ok(())
    }

    /// The resolved kernel.
    pub fn kernel(&self) -> &Kernel1d<T> {
        &self.kernel
    }

    /// The cached symmetry classification.
    pub fn kernel_type(&self) -> KernelType {
        self.kind
    }

    /// The accumulator, e.g. to read back gathered statistics.
    pub fn accumulator(&self) -> &A {
        &self.acc
    }

    /// The accumulator, mutable.
    pub fn accumulator_mut(&mut self) -> &mut A {
        &mut self.acc
    }

    /// Filter `src` into `dst`.
    ///
    /// An empty source is a no-op. Under [`Boundary::NoBoundary`] the
    /// border output positions are left untouched.
    ///
    /// # Errors
    ///
    /// Fails when source and destination lengths disagree.
    pub fn apply(&mut self, src: &[T], dst: &mut [T], boundary: Boundary) -> Result<(), FilterError> {
        if src.len() != dst.len() {
            return Err(FilterError::LengthMismatch(src.len(), dst.len()));
        }
        if src.is_empty() {
            return Ok(());
        }
        if self.kernel.len() > src.len() {
            log::debug!(
                "kernel ({}) longer than source ({}): per-tap checked path",
                self.kernel.len(),
                src.len()
            );
        }
        let mut dst = dst;
        self.apply_line(&src, &mut dst, boundary);
        Ok(())
    }

    /// Filter in place, buffering a copy of the input first.
    pub fn apply_in_place(&mut self, data: &mut [T], boundary: Boundary) -> Result<(), FilterError> {
        let src = data.to_vec();
        self.apply(&src, data, boundary)
    }

    /// Filter every row of `src` independently into `dst`.
    ///
    /// # Errors
    ///
    /// Fails when source and destination shapes disagree.
    pub fn apply_rows(
        &mut self,
        src: &Array2<T>,
        dst: &mut Array2<T>,
        boundary: Boundary,
    ) -> Result<(), FilterError> {
        self.check_shapes(src, dst)?;
        for r in 0..src.rows() {
            let src_row = src.row(r)?;
            let mut dst_row = dst.row_mut(r)?;
            self.apply_line(&src_row, &mut dst_row, boundary);
        }
        Ok(())
    }

    /// Filter every column of `src` independently into `dst`.
    ///
    /// The column pass transposes the access pattern, not the memory
    /// layout; no transposed copy is made.
    ///
    /// # Errors
    ///
    /// Fails when source and destination shapes disagree.
    pub fn apply_cols(
        &mut self,
        src: &Array2<T>,
        dst: &mut Array2<T>,
        boundary: Boundary,
    ) -> Result<(), FilterError> {
        self.check_shapes(src, dst)?;
        let cols = src.cols();
        for c in 0..cols {
            let src_col = ColumnRef {
                data: src.as_slice(),
                cols,
                col: c,
            };
            let mut dst_col = ColumnMut {
                data: dst.as_slice_mut(),
                cols,
                col: c,
            };
            self.apply_line(&src_col, &mut dst_col, boundary);
        }
        Ok(())
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

    pub(crate) fn apply_line<S: Line<T>, D: LineMut<T>>(
        &mut self,
        src: &S,
        dst: &mut D,
        boundary: Boundary,
    ) {
        let n = src.len();
        if n == 0 {
            return;
        }
        if self.kernel.len() > n {
            self.apply_checked_line(src, dst, boundary);
            return;
        }

        let first = self.kernel.first();
        let last = self.kernel.last();
        // interior block: every tap of src[x - i] stays inside [0, n)
        let begin = last;
        let end = n as isize - 1 + first;

        match self.kind {
            KernelType::Symmetric => {
                for x in begin..=end {
                    self.acc.reset();
                    for i in 1..=last {
                        self.acc.accumulate_sym(
                            self.kernel.at(i),
                            src.at((x - i) as usize),
                            src.at((x + i) as usize),
                        );
                    }
                    self.acc.accumulate(self.kernel.at(0), src.at(x as usize));
                    dst.set(x as usize, self.acc.result());
                }
            }
            KernelType::Antisymmetric => {
                for x in begin..=end {
                    self.acc.reset();
                    for i in 1..=last {
                        self.acc.accumulate_antisym(
                            self.kernel.at(i),
                            src.at((x - i) as usize),
                            src.at((x + i) as usize),
                        );
                    }
                    self.acc.accumulate_zero(src.at(x as usize));
                    dst.set(x as usize, self.acc.result());
                }
            }
            KernelType::Default => {
                for x in begin..=end {
                    self.acc.reset();
                    for i in first..=last {
                        self.acc
                            .accumulate(self.kernel.at(i), src.at((x - i) as usize));
                    }
                    dst.set(x as usize, self.acc.result());
                }
            }
        }

        if boundary == Boundary::NoBoundary {
            return;
        }
        for x in 0..begin {
            if let Some(v) = self.sample_checked(src, x, boundary) {
                dst.set(x as usize, v);
            }
        }
        for x in (end + 1)..n as isize {
            if let Some(v) = self.sample_checked(src, x, boundary) {
                dst.set(x as usize, v);
            }
        }
    }

    /// Robust per-tap path for kernels wider than the source.
    fn apply_checked_line<S: Line<T>, D: LineMut<T>>(
        &mut self,
        src: &S,
        dst: &mut D,
        boundary: Boundary,
    ) {
        for x in 0..src.len() {
            if let Some(v) = self.sample_checked(src, x as isize, boundary) {
                dst.set(x, v);
            }
        }
    }

    /// Evaluate one output sample with every tap individually resolved.
    ///
    /// Returns `None` when the boundary policy skips the position.
    fn sample_checked<S: Line<T>>(&mut self, src: &S, x: isize, boundary: Boundary) -> Option<T> {
        self.acc.reset();
        for i in self.kernel.first()..=self.kernel.last() {
            match resolve_index(x - i, src.len(), boundary) {
                Resolved::Inside(idx) => self.acc.accumulate(self.kernel.at(i), src.at(idx)),
                Resolved::Zero => self.acc.accumulate(self.kernel.at(i), T::zero()),
                Resolved::Skip => return None,
            }
        }
        Some(self.acc.result())
    }
}
