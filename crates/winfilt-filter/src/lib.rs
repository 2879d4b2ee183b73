#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// accumulator strategies: the pluggable combining rules.
pub mod accumulator;

/// kernel adapter: resolve polymorphically-typed kernels.
pub mod adapter;

/// border extension policies.
pub mod boundary;

/// 1-D windowed filter engine.
pub mod conv1d;

/// 2-D windowed filter engine, dense and masked modes.
pub mod conv2d;

/// numeric element trait.
pub mod element;

/// error types for the filtering engines.
pub mod error;

/// kernel representations and classification.
pub mod kernel;

/// kernel and structuring-element generators.
pub mod kernels;

/// convenience filtering ops.
pub mod ops;

/// separable 2-D filter engine.
pub mod separable;

pub use crate::accumulator::{Accumulator, Convolution, Dilation, Erosion, SquaredError};
pub use crate::adapter::{
    resolve_kernel_1d, resolve_kernel_2d, resolve_kernel_separable, AnyKernel, AnyKernel1d,
    AnyKernel2d, AnySeparableKernel, KernelElement,
};
pub use crate::boundary::{resolve_index, Boundary, Resolved};
pub use crate::conv1d::Filter1d;
pub use crate::conv2d::Filter2d;
pub use crate::element::Element;
pub use crate::error::FilterError;
pub use crate::kernel::{Kernel1d, Kernel2d, KernelType, SeparableKernel};
pub use crate::separable::SeparableFilter2d;
