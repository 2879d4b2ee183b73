use winfilt_array::ArrayError;

/// An error type for the filtering engines.
#[derive(thiserror::Error, Debug)]
pub enum FilterError {
    /// Error from the underlying array abstraction.
    #[error(transparent)]
    Array(#[from] ArrayError),

    /// Error when a kernel holds no coefficients.
    #[error("Kernel must hold at least one coefficient")]
    EmptyKernel,

    /// Error when the kernel offset lies outside the kernel.
    #[error("Kernel offset ({0}) outside the kernel of length {1}")]
    InvalidOffset(usize, usize),

    /// Error when source and destination lengths disagree.
    #[error("Source length ({0}) does not match destination length ({1})")]
    LengthMismatch(usize, usize),

    /// Error when source and destination shapes disagree.
    #[error("Source shape ({0}x{1}) does not match destination shape ({2}x{3})")]
    ShapeMismatch(usize, usize, usize, usize),

    /// Error when a kernel of the wrong shape is handed to an engine.
    #[error("Expected a {0} kernel, got a {1} kernel")]
    KernelShapeMismatch(&'static str, &'static str),

    /// Error when the mask shape does not match the kernel footprint.
    #[error("Mask shape ({0}x{1}) does not match kernel shape ({2}x{3})")]
    MaskSizeMismatch(usize, usize, usize, usize),

    /// Error when no mask is configured for a masked-mode call.
    #[error("Masked filtering requested but no mask is set")]
    MissingMask,

    /// Error when a kernel value is not representable in the target
    /// element type.
    #[error("Kernel value not representable in the target element type")]
    KernelCast,

    /// Error when separable kernel pairs disagree in norm.
    #[error("Separable kernel pairs disagree in norm")]
    PairNormMismatch,

    /// Error when an evaluation position lies outside the source array.
    #[error("Position ({0}, {1}) outside the source array ({2}x{3})")]
    PositionOutOfBounds(usize, usize, usize, usize),
}
