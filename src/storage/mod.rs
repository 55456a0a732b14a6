//! Backing store for array data.
//!
//! The view engine never allocates or reallocates element storage on its
//! own; it reads and writes through a [`SharedStorage`] handle and asks the
//! backing store to resize only when an owning array changes its shape.

mod cpu;

pub use cpu::CpuStorage;

use crate::error::{NdError, Result};
use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

/// A trait for growable, contiguous element stores.
pub trait Storage<T> {
    /// Returns the number of elements in the storage.
    fn len(&self) -> usize;

    /// Returns `true` if the storage contains no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a slice containing the entire storage.
    fn as_slice(&self) -> &[T];

    /// Returns a mutable slice containing the entire storage.
    fn as_mut_slice(&mut self) -> &mut [T];

    /// Resizes the storage to hold exactly `len` elements. New slots are
    /// default-initialized.
    fn resize(&mut self, len: usize)
    where
        T: Clone + Default;

    /// Creates a new storage from a vector.
    fn from_vec(data: Vec<T>) -> Self
    where
        Self: Sized;

    /// Consumes the storage and returns its elements.
    fn into_vec(self) -> Vec<T>
    where
        Self: Sized;
}

/// A reference-counted, single-threaded handle to a [`CpuStorage`].
///
/// Arrays and every view derived from them hold clones of the same handle.
/// The buffer is released when the last handle is dropped.
#[derive(Debug)]
pub struct SharedStorage<T> {
    inner: Rc<RefCell<CpuStorage<T>>>,
}

impl<T> Clone for SharedStorage<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> SharedStorage<T> {
    /// Wraps a vector into a new shared buffer.
    pub fn from_vec(data: Vec<T>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(CpuStorage::from_vec(data))),
        }
    }

    /// Returns the current number of elements in the buffer.
    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    /// Returns `true` if the buffer holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if both handles point at the same buffer.
    pub fn same_buffer(&self, other: &SharedStorage<T>) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Borrows the whole buffer for reading.
    ///
    /// # Panics
    ///
    /// Panics if the buffer is currently borrowed for writing.
    pub fn read(&self) -> Ref<'_, [T]> {
        Ref::map(self.inner.borrow(), |s| s.as_slice())
    }

    /// Borrows the whole buffer for writing.
    ///
    /// # Panics
    ///
    /// Panics if the buffer is currently borrowed.
    pub fn write(&self) -> RefMut<'_, [T]> {
        RefMut::map(self.inner.borrow_mut(), |s| s.as_mut_slice())
    }

    /// Resizes the underlying buffer in place.
    pub fn resize(&self, len: usize)
    where
        T: Clone + Default,
    {
        self.inner.borrow_mut().resize(len);
    }

    /// Takes the elements out of the buffer if this is the only handle,
    /// otherwise clones them.
    pub fn into_vec(self) -> Vec<T>
    where
        T: Clone,
    {
        match Rc::try_unwrap(self.inner) {
            Ok(cell) => cell.into_inner().into_vec(),
            Err(shared) => {
                let data = shared.borrow().as_slice().to_vec();
                data
            }
        }
    }
}

/// Converts a signed storage position into a slice index, checking it
/// against the buffer length.
///
/// # Errors
///
/// Returns [`NdError::StorageOutOfBounds`] if `position` does not address an
/// element of a buffer of length `len`.
pub fn checked_slot(position: isize, len: usize) -> Result<usize> {
    if position < 0 || position as usize >= len {
        return Err(NdError::StorageOutOfBounds { position, len });
    }
    Ok(position as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_handles() {
        let storage = SharedStorage::from_vec(vec![1, 2, 3]);
        let alias = storage.clone();
        assert!(storage.same_buffer(&alias));
        alias.write()[1] = 20;
        assert_eq!(&*storage.read(), &[1, 20, 3]);

        let other = SharedStorage::from_vec(vec![1, 20, 3]);
        assert!(!storage.same_buffer(&other));
    }

    #[test]
    fn test_resize_and_into_vec() {
        let storage = SharedStorage::from_vec(vec![1u8, 2]);
        storage.resize(4);
        assert_eq!(storage.len(), 4);
        let alias = storage.clone();
        assert_eq!(storage.into_vec(), vec![1, 2, 0, 0]);
        assert_eq!(alias.into_vec(), vec![1, 2, 0, 0]);
    }

    #[test]
    fn test_checked_slot() {
        assert_eq!(checked_slot(2, 3).unwrap(), 2);
        assert!(checked_slot(3, 3).is_err());
        assert!(checked_slot(-1, 3).is_err());
    }
}
