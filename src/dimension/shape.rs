//! Index arithmetic shared by spans, indexers and views.

use crate::error::{NdError, Result};

/// Returns the number of elements described by `dims`.
pub fn total_size(dims: &[usize]) -> usize {
    dims.iter().product()
}

/// Counts a negative `index` from the end of a dimension of length `size`.
pub fn add_if_negative(index: isize, size: usize) -> isize {
    if index < 0 {
        index + size as isize
    } else {
        index
    }
}

/// Like [`add_if_negative`], but zero also counts from the end, so `0` used
/// as a range end means "one past the last position".
pub fn add_if_non_positive(index: isize, size: usize) -> isize {
    if index <= 0 {
        index + size as isize
    } else {
        index
    }
}

/// Resolves a possibly negative scalar index against a dimension and checks
/// that it lands inside `[0, size)`.
///
/// # Errors
///
/// Returns [`NdError::IndexOutOfBounds`] if the resolved index is outside
/// the dimension.
pub fn resolve_index(index: isize, size: usize, level: usize) -> Result<usize> {
    let resolved = add_if_negative(index, size);
    if resolved < 0 || resolved as usize >= size {
        return Err(NdError::index_out_of_bounds(index, size, level));
    }
    Ok(resolved as usize)
}
