//! CPU storage backend implementation.

use super::Storage;

/// CPU storage using a simple `Vec`.
#[derive(Debug, Clone, Default)]
pub struct CpuStorage<T> {
    data: Vec<T>,
}

impl<T> Storage<T> for CpuStorage<T> {
    fn len(&self) -> usize {
        self.data.len()
    }

    fn as_slice(&self) -> &[T] {
        &self.data
    }

    fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    fn resize(&mut self, len: usize)
    where
        T: Clone + Default,
    {
        self.data.resize(len, T::default());
    }

    fn from_vec(data: Vec<T>) -> Self {
        Self { data }
    }

    fn into_vec(self) -> Vec<T> {
        self.data
    }
}
