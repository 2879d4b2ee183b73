use crate::error::ArrayError;

/// A row-major 2-D array with contiguous storage.
///
/// This is the narrow array abstraction the filtering engines consume: rows
/// and columns, slice access to the backing storage, and per-row views.
///
/// # Examples
///
/// ```
/// use winfilt_array::Array2;
///
/// let array = Array2::<u8>::new(2, 3, vec![1, 2, 3, 4, 5, 6]).unwrap();
///
/// assert_eq!(array.rows(), 2);
/// assert_eq!(array.cols(), 3);
/// assert_eq!(array.row(1).unwrap(), &[4, 5, 6]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Array2<T> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
}

impl<T> Array2<T> {
    /// Create a new array from its shape and row-major data.
    ///
    /// # Errors
    ///
    /// If the data length does not match `rows * cols`, an error is returned.
    pub fn new(rows: usize, cols: usize, data: Vec<T>) -> Result<Self, ArrayError> {
        if data.len() != rows * cols {
            return Err(ArrayError::InvalidDataLength(data.len(), rows * cols));
        }
        Ok(Self { data, rows, cols })
    }

    /// Create a new array with the given shape, filled with `val`.
    pub fn from_val(rows: usize, cols: usize, val: T) -> Self
    where
        T: Clone,
    {
        Self {
            data: vec![val; rows * cols],
            rows,
            cols,
        }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the array holds no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The backing row-major slice.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// The backing row-major slice, mutable.
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Get a reference to the element at `(row, col)`, if inside the array.
    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row < self.rows && col < self.cols {
            self.data.get(row * self.cols + col)
        } else {
            None
        }
    }

    /// View of one row.
    ///
    /// # Errors
    ///
    /// If the row index is out of bounds, an error is returned.
    pub fn row(&self, row: usize) -> Result<&[T], ArrayError> {
        if row >= self.rows {
            return Err(ArrayError::RowOutOfBounds(row, self.rows));
        }
        Ok(&self.data[row * self.cols..(row + 1) * self.cols])
    }

    /// Mutable view of one row.
    ///
    /// # Errors
    ///
    /// If the row index is out of bounds, an error is returned.
    pub fn row_mut(&mut self, row: usize) -> Result<&mut [T], ArrayError> {
        if row >= self.rows {
            return Err(ArrayError::RowOutOfBounds(row, self.rows));
        }
        Ok(&mut self.data[row * self.cols..(row + 1) * self.cols])
    }

    /// Consume the array and return its row-major data.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Cast the elements to a different type.
    ///
    /// # Errors
    ///
    /// If any value is not representable in the target type, an error is
    /// returned.
    pub fn cast<U>(&self) -> Result<Array2<U>, ArrayError>
    where
        T: num_traits::NumCast + Copy,
        U: num_traits::NumCast,
    {
        let casted = self
            .data
            .iter()
            .map(|&x| U::from(x).ok_or(ArrayError::CastError))
            .collect::<Result<Vec<U>, ArrayError>>()?;

        Array2::new(self.rows, self.cols, casted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_checks_length() {
        let bad = Array2::<u8>::new(2, 2, vec![0; 3]);
        assert_eq!(bad, Err(ArrayError::InvalidDataLength(3, 4)));

        let ok = Array2::<u8>::new(2, 2, vec![0; 4]);
        assert!(ok.is_ok());
    }

    #[test]
    fn rows_and_access() -> Result<(), ArrayError> {
        let array = Array2::new(2, 3, vec![1, 2, 3, 4, 5, 6])?;
        assert_eq!(array.row(0)?, &[1, 2, 3]);
        assert_eq!(array.row(1)?, &[4, 5, 6]);
        assert_eq!(array.get(1, 2), Some(&6));
        assert_eq!(array.get(2, 0), None);
        assert_eq!(array.get(0, 3), None);
        assert!(array.row(2).is_err());
        Ok(())
    }

    #[test]
    fn cast_round_trips() -> Result<(), ArrayError> {
        let array = Array2::new(1, 3, vec![1u8, 2, 3])?;
        let floats = array.cast::<f32>()?;
        assert_eq!(floats.as_slice(), &[1.0, 2.0, 3.0]);
        Ok(())
    }

    #[test]
    fn empty_array() {
        let array = Array2::<f32>::from_val(0, 0, 0.0);
        assert!(array.is_empty());
        assert_eq!(array.len(), 0);
    }
}
