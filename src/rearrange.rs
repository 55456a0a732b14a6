//! Reinterpreting an array's dimensions over its linear buffer.

use crate::array::Array;
use crate::dimension::total_size;
use crate::error::{NdError, Result};

/// Gives `array` new dimensions describing the same number of elements.
/// Elements keep their linear positions.
///
/// The result has a fresh dimension table: views taken from the array
/// before reshaping keep their old layout.
///
/// # Examples
/// ```
/// use ndview::{reshape, Array};
///
/// let a = Array::from_vec((0..6).collect::<Vec<i32>>(), &[2, 3]).unwrap();
/// let b = reshape(a, &[3, 2]).unwrap();
/// assert_eq!(b.tuple_at(&[2, 0]).unwrap(), 4);
/// ```
///
/// # Errors
///
/// Returns [`NdError::SizeMismatch`] if `dims` describes a different
/// element count.
pub fn reshape<T>(array: Array<T>, dims: &[usize]) -> Result<Array<T>> {
    let expected = total_size(dims);
    if expected != array.len() {
        return Err(NdError::size_mismatch(expected, array.len()));
    }
    Ok(array.relabel(dims))
}

/// Reinterprets `array` as one-dimensional.
pub fn flatten<T>(array: Array<T>) -> Array<T> {
    let len = array.len();
    array.relabel(&[len])
}
