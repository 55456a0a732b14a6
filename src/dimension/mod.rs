//! Dimension tables and index resolution.
//!
//! A [`DimTable`] is the ordered list of base dimension sizes of an owning
//! array. Besides describing the layout it doubles as an identity token:
//! every view derived from an array carries a handle to the same table, so
//! two operands alias the same array exactly when their tables are the same
//! allocation.

use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

pub mod shape;

pub use shape::{add_if_negative, add_if_non_positive, resolve_index, total_size};

/// Shared, immutable table of base dimension sizes.
#[derive(Clone)]
pub struct DimTable {
    dims: Rc<[usize]>,
}

impl DimTable {
    /// Creates a fresh table. The result has a new identity, distinct from
    /// every other table, even one with equal contents.
    pub fn new(dims: &[usize]) -> Self {
        Self {
            dims: Rc::from(dims),
        }
    }

    /// Returns the number of base dimensions.
    pub fn depth(&self) -> usize {
        self.dims.len()
    }

    /// Returns the product of all base dimensions.
    pub fn total_size(&self) -> usize {
        total_size(&self.dims)
    }

    /// Returns the base dimensions as a slice.
    pub fn as_slice(&self) -> &[usize] {
        &self.dims
    }

    /// Returns `true` if both handles refer to the same table allocation,
    /// i.e. both operands were derived from the same array buffer.
    pub fn same_table(&self, other: &DimTable) -> bool {
        Rc::ptr_eq(&self.dims, &other.dims)
    }

    /// Product of the base dimensions in `levels`, used as the element
    /// stride of the level just before `levels.start`.
    pub fn span_product(&self, levels: std::ops::Range<usize>) -> usize {
        self.dims[levels].iter().product()
    }
}

impl Deref for DimTable {
    type Target = [usize];

    fn deref(&self) -> &Self::Target {
        &self.dims
    }
}

impl fmt::Debug for DimTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DimTable").field(&&*self.dims).finish()
    }
}
