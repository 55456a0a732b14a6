//! The owning n-dimensional array.

use std::fmt;

use num_traits::Zero;

use crate::dimension::{resolve_index, total_size, DimTable};
use crate::error::{NdError, Result};
use crate::iter::{Cursor, Elements, OffsetIter, StridedCursor, SubViews};
use crate::range::ElementSource;
use crate::storage::{checked_slot, SharedStorage};
use crate::view::{derive, Indexer, Span, View, ViewBase, ViewKind, Viewable};

/// A dense, row-major n-dimensional array.
///
/// `Array` owns its buffer through a shared handle: views derived from it
/// hold clones of the handle and of the dimension table, so they stay
/// usable while the array is alive and write straight into its elements.
/// Cloning an array copies the elements into a fresh buffer with a fresh
/// identity.
///
/// # Examples
/// ```
/// use ndview::{spans, Array};
///
/// let a = Array::from_vec((0..20).collect(), &[4, 5]).unwrap();
/// let rows = a.vpart(&spans![1..3]).unwrap();
/// assert_eq!(rows.shape(), &[2, 5]);
/// assert_eq!(rows.to_vec(), (5..15).collect::<Vec<i32>>());
/// ```
pub struct Array<T> {
    storage: SharedStorage<T>,
    dims: DimTable,
}

impl<T> Array<T> {
    /// Creates an array with default-initialized elements.
    pub fn new(dims: &[usize]) -> Self
    where
        T: Clone + Default,
    {
        Self::full(dims, T::default())
    }

    /// Creates an array filled with zeros.
    pub fn zeros(dims: &[usize]) -> Self
    where
        T: Zero + Clone,
    {
        Self::full(dims, T::zero())
    }

    /// Creates an array with every element set to `value`.
    pub fn full(dims: &[usize], value: T) -> Self
    where
        T: Clone,
    {
        Self {
            storage: SharedStorage::from_vec(vec![value; total_size(dims)]),
            dims: DimTable::new(dims),
        }
    }

    /// Creates an array over a row-major vector.
    ///
    /// # Errors
    ///
    /// Returns [`NdError::SizeMismatch`] if the dimensions do not describe
    /// exactly `data.len()` elements.
    pub fn from_vec(data: Vec<T>, dims: &[usize]) -> Result<Self> {
        let expected = total_size(dims);
        if data.len() != expected {
            return Err(NdError::size_mismatch(expected, data.len()));
        }
        Ok(Self {
            storage: SharedStorage::from_vec(data),
            dims: DimTable::new(dims),
        })
    }

    /// Creates a one-dimensional array over `data`.
    pub fn from_linear(data: Vec<T>) -> Self {
        let dims = [data.len()];
        Self {
            storage: SharedStorage::from_vec(data),
            dims: DimTable::new(&dims),
        }
    }

    /// Materializes a view (or another array) into a fresh array of the
    /// same shape.
    ///
    /// # Errors
    ///
    /// Returns [`NdError::StorageOutOfBounds`] if the view no longer fits
    /// its buffer.
    pub fn from_view<V>(view: &V) -> Result<Self>
    where
        V: Viewable<T> + ?Sized,
        T: Clone,
    {
        let data = view.storage().read();
        let elements = view
            .offsets()
            .map(|offset| checked_slot(offset, data.len()).map(|slot| data[slot].clone()))
            .collect::<Result<Vec<T>>>()?;
        Ok(Self {
            storage: SharedStorage::from_vec(elements),
            dims: DimTable::new(view.shape()),
        })
    }

    /// Evaluates a lazily generated sequence into an array of shape `dims`.
    ///
    /// # Errors
    ///
    /// Returns [`NdError::SizeMismatch`] if the sequence length differs
    /// from the element count of `dims`.
    pub fn from_source<S>(source: &S, dims: &[usize]) -> Result<Self>
    where
        S: ElementSource<T> + ?Sized,
        T: Clone + Default,
    {
        let expected = total_size(dims);
        if source.len() != expected {
            return Err(NdError::size_mismatch(expected, source.len()));
        }
        let mut data = vec![T::default(); expected];
        source.copy_to(&mut data);
        Self::from_vec(data, dims)
    }

    pub fn depth(&self) -> usize {
        self.dims.depth()
    }

    /// Extent of base dimension `level`.
    ///
    /// # Panics
    ///
    /// Panics if `level >= self.depth()`.
    pub fn dimension(&self, level: usize) -> usize {
        self.dims[level]
    }

    pub fn shape(&self) -> &[usize] {
        &self.dims
    }

    pub fn len(&self) -> usize {
        self.dims.total_size()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dim_table(&self) -> &DimTable {
        &self.dims
    }

    pub fn storage(&self) -> &SharedStorage<T> {
        &self.storage
    }

    /// Copies the elements out in row-major order.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.storage.read().to_vec()
    }

    /// Consumes the array, returning its elements without copying when no
    /// view still shares the buffer.
    pub fn into_vec(self) -> Vec<T>
    where
        T: Clone,
    {
        self.storage.into_vec()
    }

    /// Row-major position of `indices`, negative indices counting from the
    /// end of their dimension.
    ///
    /// # Errors
    ///
    /// Returns [`NdError::DimensionMismatch`] for a wrong index count and
    /// [`NdError::IndexOutOfBounds`] for an index outside its dimension.
    pub fn position(&self, indices: &[isize]) -> Result<usize> {
        if indices.len() != self.depth() {
            return Err(NdError::dimension_mismatch(self.depth(), indices.len()));
        }
        indices
            .iter()
            .zip(self.dims.iter())
            .enumerate()
            .try_fold(0, |pos, (level, (&index, &dim))| {
                Ok(pos * dim + resolve_index(index, dim, level)?)
            })
    }

    fn position_unchecked(&self, indices: &[isize]) -> usize {
        nd_assert!(
            indices.len() == self.depth(),
            "expected {} indices, got {}",
            self.depth(),
            indices.len()
        );
        indices
            .iter()
            .zip(self.dims.iter())
            .fold(0, |pos, (&index, &dim)| {
                let i = if index < 0 { index + dim as isize } else { index };
                nd_assert!(
                    i >= 0 && (i as usize) < dim,
                    "index {} out of bounds for dimension of size {}",
                    index,
                    dim
                );
                pos * dim + i as usize
            })
    }

    pub fn tuple_at(&self, indices: &[isize]) -> Result<T>
    where
        T: Clone,
    {
        let position = self.position(indices)?;
        Ok(self.storage.read()[position].clone())
    }

    pub fn tuple_at_unchecked(&self, indices: &[isize]) -> T
    where
        T: Clone,
    {
        self.storage.read()[self.position_unchecked(indices)].clone()
    }

    pub fn set(&self, indices: &[isize], value: T) -> Result<()> {
        let position = self.position(indices)?;
        self.storage.write()[position] = value;
        Ok(())
    }

    pub fn set_unchecked(&self, indices: &[isize], value: T) {
        let position = self.position_unchecked(indices);
        self.storage.write()[position] = value;
    }

    /// Applies `f` to the element at `indices` in place.
    pub fn update<F>(&self, indices: &[isize], f: F) -> Result<()>
    where
        F: FnOnce(&mut T),
    {
        let position = self.position(indices)?;
        f(&mut self.storage.write()[position]);
        Ok(())
    }

    /// A simple view over the whole array.
    pub fn view(&self) -> View<T> {
        View::from_base(ViewBase::whole(self.storage.clone(), self.dims.clone()))
    }

    /// Derives a view by applying one span per dimension, outermost first.
    /// Missing trailing spans take the whole dimension.
    ///
    /// # Errors
    ///
    /// See [`derive`].
    pub fn vpart(&self, spans: &[Span]) -> Result<View<T>> {
        let indexers = vec![Indexer::All; self.depth()];
        derive(self.storage.clone(), 0, self.dims.clone(), &indexers, spans)
    }

    /// Iterates over the sub-arrays spanning the dimensions from `level` on.
    ///
    /// # Errors
    ///
    /// Returns [`NdError::InvalidLevel`] unless `0 < level < depth`.
    pub fn subviews(&self, level: usize) -> Result<SubViews<T>> {
        ViewBase::whole(self.storage.clone(), self.dims.clone()).subviews(level)
    }

    pub fn offsets(&self) -> OffsetIter<'_, T> {
        OffsetIter::new(None, Cursor::Strided(StridedCursor::new(0, 1)), self.len())
    }

    /// Iterates over copies of the elements in row-major order.
    pub fn elements(&self) -> Elements<'_, T>
    where
        T: Clone,
    {
        Elements::new(self.offsets(), self.storage.read())
    }

    /// Calls `f` on every element in row-major order.
    ///
    /// # Panics
    ///
    /// The buffer stays borrowed for reading while `f` runs, so writing to
    /// the array from inside `f`, directly or through a view, panics.
    pub fn traverse<F>(&self, f: F)
    where
        F: FnMut(&T),
    {
        self.storage.read().iter().for_each(f);
    }

    /// # Panics
    ///
    /// Panics if `f` accesses the array's buffer through another handle.
    pub fn traverse_mut<F>(&self, f: F)
    where
        F: FnMut(&mut T),
    {
        self.storage.write().iter_mut().for_each(f);
    }

    pub fn fill(&self, value: T)
    where
        T: Clone,
    {
        self.storage.write().fill(value);
    }

    /// Changes the dimensions, keeping the depth. The buffer grows or
    /// shrinks in place (new slots are default-initialized) and elements
    /// keep their linear positions.
    ///
    /// The array gets a fresh dimension table, so views derived before the
    /// resize no longer count as aliasing it; using them afterwards is a
    /// caller error that element access reports as
    /// [`NdError::StorageOutOfBounds`] once they fall outside the buffer.
    ///
    /// # Errors
    ///
    /// Returns [`NdError::DimensionMismatch`] if `dims` has a different
    /// depth.
    pub fn resize(&mut self, dims: &[usize]) -> Result<()>
    where
        T: Clone + Default,
    {
        if dims.len() != self.depth() {
            return Err(NdError::dimension_mismatch(self.depth(), dims.len()));
        }
        self.storage.resize(total_size(dims));
        self.dims = DimTable::new(dims);
        Ok(())
    }

    /// Replaces the dimension table without touching the buffer.
    pub(crate) fn relabel(self, dims: &[usize]) -> Self {
        Self {
            storage: self.storage,
            dims: DimTable::new(dims),
        }
    }
}

impl<T: Clone> Clone for Array<T> {
    fn clone(&self) -> Self {
        Self {
            storage: SharedStorage::from_vec(self.to_vec()),
            dims: DimTable::new(&self.dims),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Array<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Array")
            .field("shape", &self.shape())
            .field("data", &&*self.storage.read())
            .finish()
    }
}

impl<T: PartialEq> PartialEq for Array<T> {
    fn eq(&self, other: &Self) -> bool {
        self.shape() == other.shape() && *self.storage.read() == *other.storage.read()
    }
}

impl<T> Viewable<T> for Array<T> {
    fn kind(&self) -> ViewKind {
        ViewKind::Array
    }

    fn storage(&self) -> &SharedStorage<T> {
        &self.storage
    }

    fn dim_table(&self) -> &DimTable {
        &self.dims
    }

    fn shape(&self) -> &[usize] {
        &self.dims
    }

    fn base_offset(&self) -> isize {
        0
    }

    fn stride(&self) -> isize {
        1
    }

    fn offsets(&self) -> OffsetIter<'_, T> {
        Array::offsets(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::REVERSED;

    fn counting(dims: &[usize]) -> Array<i32> {
        let len = total_size(dims) as i32;
        Array::from_vec((0..len).collect(), dims).unwrap()
    }

    #[test]
    fn test_constructors() {
        let a: Array<f64> = Array::zeros(&[2, 3]);
        assert_eq!(a.shape(), &[2, 3]);
        assert_eq!(a.len(), 6);
        assert!(a.elements().all(|x| x == 0.0));

        let b = Array::full(&[4], 'x');
        assert_eq!(b.to_vec(), vec!['x'; 4]);

        let c: Array<u8> = Array::new(&[3, 0]);
        assert!(c.is_empty());

        assert_eq!(
            Array::from_vec(vec![1, 2, 3], &[2, 2]).unwrap_err(),
            NdError::size_mismatch(4, 3)
        );
    }

    #[test]
    fn test_element_access() {
        let a = counting(&[3, 4]);
        assert_eq!(a.tuple_at(&[1, 2]).unwrap(), 6);
        assert_eq!(a.tuple_at(&[-1, -1]).unwrap(), 11);
        assert_eq!(a.tuple_at_unchecked(&[2, 0]), 8);
        assert_eq!(
            a.tuple_at(&[3, 0]).unwrap_err(),
            NdError::index_out_of_bounds(3, 3, 0)
        );
        assert_eq!(a.tuple_at(&[0]).unwrap_err(), NdError::dimension_mismatch(2, 1));

        a.set(&[0, -1], 100).unwrap();
        a.update(&[0, 3], |x| *x += 1).unwrap();
        a.set_unchecked(&[2, 3], -5);
        assert_eq!(a.tuple_at(&[0, 3]).unwrap(), 101);
        assert_eq!(a.tuple_at(&[2, 3]).unwrap(), -5);
    }

    #[test]
    fn test_from_view_copies() {
        let a = counting(&[3, 4]);
        let reversed = a.vpart(&[Span::all(), REVERSED]).unwrap();
        let b = Array::from_view(&reversed).unwrap();
        assert_eq!(b.shape(), &[3, 4]);
        assert_eq!(b.to_vec(), vec![3, 2, 1, 0, 7, 6, 5, 4, 11, 10, 9, 8]);
        assert!(!b.dim_table().same_table(a.dim_table()));

        b.set(&[0, 0], 42).unwrap();
        assert_eq!(a.tuple_at(&[0, 3]).unwrap(), 3);
    }

    #[test]
    fn test_clone_is_deep() {
        let a = counting(&[2, 2]);
        let b = a.clone();
        assert_eq!(a, b);
        b.fill(0);
        assert_ne!(a, b);
        assert!(!a.dim_table().same_table(b.dim_table()));
    }

    #[test]
    fn test_traverse_in_row_major_order() {
        let a = counting(&[2, 3]);
        let mut seen = Vec::new();
        a.traverse(|&x| seen.push(x));
        assert_eq!(seen, vec![0, 1, 2, 3, 4, 5]);
        a.traverse_mut(|x| *x *= 2);
        assert_eq!(a.to_vec(), vec![0, 2, 4, 6, 8, 10]);
    }

    #[test]
    #[should_panic(expected = "already borrowed")]
    fn test_traverse_blocks_writes_through_views() {
        let a = counting(&[2, 3]);
        let row = a.vpart(&[Span::scalar(0)]).unwrap();
        a.traverse(|_| {
            let _ = row.set(&[0], 9);
        });
    }

    #[test]
    fn test_resize_keeps_depth() {
        let mut a = counting(&[2, 3]);
        let before = a.dim_table().clone();
        a.resize(&[3, 3]).unwrap();
        assert_eq!(a.len(), 9);
        assert_eq!(a.to_vec()[..6], [0, 1, 2, 3, 4, 5]);
        assert_eq!(a.tuple_at(&[2, 2]).unwrap(), 0);
        assert!(!before.same_table(a.dim_table()));
        assert_eq!(a.resize(&[9]).unwrap_err(), NdError::dimension_mismatch(2, 1));
    }

    #[test]
    fn test_whole_view() {
        let a = counting(&[2, 3]);
        let v = a.view();
        assert_eq!(v.kind(), ViewKind::Simple);
        assert_eq!(v.to_vec(), a.to_vec());
        assert_eq!(Viewable::kind(&a), ViewKind::Array);
    }
}
