use num_traits::Zero;

use crate::element::Element;
use crate::error::FilterError;
use winfilt_array::ArrayError;

/// Value-symmetry classification of a 1-D kernel.
///
/// Derived once per kernel and cached by the engines; the symmetric and
/// antisymmetric classes enable an accumulation path that pairs the two
/// mirror-image taps into a single call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelType {
    /// No exploitable symmetry; every tap is accumulated individually.
    Default,
    /// Centered index range with `k[i] == k[-i]`.
    Symmetric,
    /// Centered index range with `k[i] == -k[-i]` and a zero center tap.
    Antisymmetric,
}

/// A 1-D filter kernel: coefficients over the index range
/// `[-offset, len - 1 - offset]`, plus the fixed-point norm.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel1d<T> {
    data: Vec<T>,
    offset: usize,
    norm: T,
}

impl<T: Element> Kernel1d<T> {
    /// Create a kernel from its coefficients, center offset and norm.
    ///
    /// `offset` is the position of the logical center inside `data`, so the
    /// kernel covers the index range `[-offset, data.len() - 1 - offset]`.
    ///
    /// # Errors
    ///
    /// Fails on an empty coefficient list or an offset outside of it.
    pub fn new(data: Vec<T>, offset: usize, norm: T) -> Result<Self, FilterError> {
        if data.is_empty() {
            return Err(FilterError::EmptyKernel);
        }
        if offset >= data.len() {
            return Err(FilterError::InvalidOffset(offset, data.len()));
        }
        Ok(Self { data, offset, norm })
    }

    /// Number of coefficients.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false; kernels are non-empty by construction.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Index of the logical center inside the coefficient list.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The fixed-point norm (the value representing 1.0).
    pub fn norm(&self) -> T {
        self.norm
    }

    /// First kernel index (≤ 0).
    pub fn first(&self) -> isize {
        -(self.offset as isize)
    }

    /// Last kernel index (≥ 0 when the offset is inside the kernel).
    pub fn last(&self) -> isize {
        self.data.len() as isize - 1 - self.offset as isize
    }

    /// Coefficient at kernel index `i` in `[first, last]`.
    pub fn at(&self, i: isize) -> T {
        self.data[(i + self.offset as isize) as usize]
    }

    /// The raw coefficient slice.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Classify the kernel's value symmetry.
    ///
    /// Symmetric requires a centered index range and `k[i] == k[-i]`;
    /// antisymmetric additionally negates across the center and has a
    /// numerically zero center tap. Size-1 kernels classify as symmetric.
    pub fn classify(&self) -> KernelType {
        let last = self.last();
        if self.first() != -last {
            return KernelType::Default;
        }
        let mut symmetric = true;
        let mut antisymmetric = true;
        for i in 1..=last {
            let pos = self.at(i).to_acc();
            let neg = self.at(-i).to_acc();
            if pos != neg {
                symmetric = false;
            }
            if neg != T::Acc::zero() - pos {
                antisymmetric = false;
            }
        }
        if symmetric {
            KernelType::Symmetric
        } else if antisymmetric && self.at(0).to_acc() == T::Acc::zero() {
            KernelType::Antisymmetric
        } else {
            KernelType::Default
        }
    }
}

/// A dense 2-D filter kernel with a row-major coefficient grid, a 2-D
/// center offset and a fixed-point norm.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel2d<T> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
    offset: (usize, usize),
    norm: T,
}

impl<T: Element> Kernel2d<T> {
    /// Create a dense kernel from its shape, row-major coefficients,
    /// center offset `(row, col)` and norm.
    ///
    /// # Errors
    ///
    /// Fails on an empty grid, a data length not matching the shape, or an
    /// offset outside the grid.
    pub fn new(
        rows: usize,
        cols: usize,
        data: Vec<T>,
        offset: (usize, usize),
        norm: T,
    ) -> Result<Self, FilterError> {
        if rows == 0 || cols == 0 {
            return Err(FilterError::EmptyKernel);
        }
        if data.len() != rows * cols {
            return Err(ArrayError::InvalidDataLength(data.len(), rows * cols).into());
        }
        if offset.0 >= rows {
            return Err(FilterError::InvalidOffset(offset.0, rows));
        }
        if offset.1 >= cols {
            return Err(FilterError::InvalidOffset(offset.1, cols));
        }
        Ok(Self {
            data,
            rows,
            cols,
            offset,
            norm,
        })
    }

    /// Number of kernel rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of kernel columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The 2-D center offset `(row, col)`.
    pub fn offset(&self) -> (usize, usize) {
        self.offset
    }

    /// The fixed-point norm.
    pub fn norm(&self) -> T {
        self.norm
    }

    /// First row index (≤ 0).
    pub fn first_row(&self) -> isize {
        -(self.offset.0 as isize)
    }

    /// Last row index.
    pub fn last_row(&self) -> isize {
        self.rows as isize - 1 - self.offset.0 as isize
    }

    /// First column index (≤ 0).
    pub fn first_col(&self) -> isize {
        -(self.offset.1 as isize)
    }

    /// Last column index.
    pub fn last_col(&self) -> isize {
        self.cols as isize - 1 - self.offset.1 as isize
    }

    /// Coefficient at kernel index `(i, j)`.
    pub fn at(&self, i: isize, j: isize) -> T {
        let r = (i + self.offset.0 as isize) as usize;
        let c = (j + self.offset.1 as isize) as usize;
        self.data[r * self.cols + c]
    }

    /// The raw row-major coefficient slice.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}

/// A separable kernel: an ordered list of (row kernel, column kernel)
/// pairs whose outer products sum to the represented dense kernel.
///
/// Row kernels run along the columns of a row (horizontal pass); column
/// kernels run down the rows (vertical pass). The pair lists stay
/// equal-length by construction.
#[derive(Debug, Clone, PartialEq)]
pub struct SeparableKernel<T> {
    pairs: Vec<(Kernel1d<T>, Kernel1d<T>)>,
}

impl<T: Element> SeparableKernel<T> {
    /// Create a separable kernel from its first (row, column) pair.
    pub fn new(row: Kernel1d<T>, col: Kernel1d<T>) -> Self {
        Self {
            pairs: vec![(row, col)],
        }
    }

    /// Append another (row, column) pair.
    pub fn push_pair(&mut self, row: Kernel1d<T>, col: Kernel1d<T>) {
        self.pairs.push((row, col));
    }

    /// Number of (row, column) pairs.
    pub fn num_pairs(&self) -> usize {
        self.pairs.len()
    }

    /// The (row, column) kernel pairs.
    pub fn pairs(&self) -> &[(Kernel1d<T>, Kernel1d<T>)] {
        &self.pairs
    }

    /// Expand into the equivalent dense kernel, the sum of the pairs'
    /// outer products over the union of their footprints.
    ///
    /// # Errors
    ///
    /// Fails when the pairs disagree in norm; the dense norm is the
    /// product of the shared row and column norms.
    pub fn to_dense(&self) -> Result<Kernel2d<T>, FilterError> {
        let (first_row, first_col) = self.pairs.iter().fold((0, 0), |(fr, fc), (row, col)| {
            (fr.min(col.first()), fc.min(row.first()))
        });
        let (last_row, last_col) = self.pairs.iter().fold((0, 0), |(lr, lc), (row, col)| {
            (lr.max(col.last()), lc.max(row.last()))
        });

        let (row_norm, col_norm) = (self.pairs[0].0.norm(), self.pairs[0].1.norm());
        for (row, col) in &self.pairs {
            if row.norm().to_acc() != row_norm.to_acc() || col.norm().to_acc() != col_norm.to_acc()
            {
                return Err(FilterError::PairNormMismatch);
            }
        }

        let rows = (last_row - first_row + 1) as usize;
        let cols = (last_col - first_col + 1) as usize;
        let mut data = vec![T::Acc::zero(); rows * cols];

        for (row, col) in &self.pairs {
            for i in col.first()..=col.last() {
                for j in row.first()..=row.last() {
                    let r = (i - first_row) as usize;
                    let c = (j - first_col) as usize;
                    data[r * cols + c] =
                        data[r * cols + c] + col.at(i).to_acc() * row.at(j).to_acc();
                }
            }
        }

        Kernel2d::new(
            rows,
            cols,
            data.into_iter().map(T::from_acc).collect(),
            ((-first_row) as usize, (-first_col) as usize),
            T::from_acc(row_norm.to_acc() * col_norm.to_acc()),
        )
    }
}
