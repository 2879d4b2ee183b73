#![deny(missing_docs)]
//! Array types consumed by the winfilt filtering engines.

/// Row-major 2-D array representation.
pub mod array;

/// Error types for the array module.
pub mod error;

pub use crate::array::Array2;
pub use crate::error::ArrayError;
