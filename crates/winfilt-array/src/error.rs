/// An error type for the array module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ArrayError {
    /// Error when the data length does not match the array shape.
    #[error("Data length ({0}) does not match the array shape ({1})")]
    InvalidDataLength(usize, usize),

    /// Error when a value cannot be represented in the target element type.
    #[error("Failed to cast array element")]
    CastError,

    /// Error when a row index is out of bounds.
    #[error("Row index ({0}) out of bounds for {1} rows")]
    RowOutOfBounds(usize, usize),
}
