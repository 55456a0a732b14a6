//! State and algorithms shared by every view family.

use std::fmt;
use std::rc::Rc;

use tracing::trace;

use crate::dimension::{add_if_negative, resolve_index, DimTable};
use crate::error::{NdError, Result};
use crate::iter::{Cursor, Elements, OdometerCursor, OffsetIter, StridedCursor, SubViews};
use crate::storage::{checked_slot, SharedStorage};
use crate::view::classify::{classify, classify_prefix, LevelTable, ViewKind};
use crate::view::indexer::{collapse, Indexer};
use crate::view::span::Span;
use crate::view::View;

/// Derives a view from a buffer, its dimension table and a current indexer
/// tuple by applying `spans` to the non-scalar levels, outermost first.
///
/// Levels without a span are taken whole. Every level, scalar or not,
/// scales the accumulated offset by its base dimension, so the offset
/// contributed by each collapsed indexer lands in element units. The result
/// shares the buffer and the dimension table.
///
/// # Arguments
///
/// * `storage` - The buffer the view reads and writes.
/// * `base_offset` - Storage offset of the view being sliced.
/// * `dims` - The owning array's dimension table.
/// * `indexers` - One indexer per base dimension.
/// * `spans` - At most one span per non-scalar level.
///
/// # Errors
///
/// Returns [`NdError::TooManySpans`] if there are more spans than levels,
/// any error raised while resolving a span, and [`NdError::ZeroDepth`] if
/// every level ends up consumed by a scalar span.
pub fn derive<T>(
    storage: SharedStorage<T>,
    base_offset: isize,
    dims: DimTable,
    indexers: &[Indexer],
    spans: &[Span],
) -> Result<View<T>> {
    nd_assert!(
        indexers.len() == dims.depth(),
        "indexer tuple does not match the dimension table"
    );
    let depth = indexers.iter().filter(|indexer| !indexer.is_scalar()).count();
    if spans.len() > depth {
        return Err(NdError::TooManySpans {
            spans: spans.len(),
            depth,
        });
    }

    let all = Span::All;
    let mut requested = spans.iter();
    let mut level = 0;
    let mut offset: isize = 0;
    let mut derived = Vec::with_capacity(indexers.len());
    for (indexer, &dim) in indexers.iter().zip(dims.iter()) {
        offset *= dim as isize;
        if indexer.is_scalar() {
            derived.push(Indexer::Scalar);
            continue;
        }
        let span = requested.next().unwrap_or(&all);
        let (contributed, collapsed) = collapse(dim, indexer, span, level)?;
        offset += contributed;
        derived.push(collapsed);
        level += 1;
    }

    let base = ViewBase::new(storage, dims, derived.into(), base_offset + offset);
    if base.depth() == 0 {
        return Err(NdError::ZeroDepth);
    }
    trace!(
        kind = ?base.kind(),
        offset = base.base_offset(),
        stride = base.stride(),
        shape = ?base.shape(),
        "derived view"
    );
    Ok(View::from_base(base))
}

/// The descriptor every view family wraps: a buffer handle, the owning
/// array's dimension table, one indexer per base dimension, and the
/// storage offset and stride the indexers are relative to.
pub struct ViewBase<T> {
    storage: SharedStorage<T>,
    dims: DimTable,
    indexers: Rc<[Indexer]>,
    table: Rc<LevelTable>,
    shape: Rc<[usize]>,
    kind: ViewKind,
    base_offset: isize,
    base_stride: isize,
}

impl<T> Clone for ViewBase<T> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            dims: self.dims.clone(),
            indexers: Rc::clone(&self.indexers),
            table: Rc::clone(&self.table),
            shape: Rc::clone(&self.shape),
            kind: self.kind,
            base_offset: self.base_offset,
            base_stride: self.base_stride,
        }
    }
}

impl<T> fmt::Debug for ViewBase<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewBase")
            .field("kind", &self.kind)
            .field("dims", &self.dims)
            .field("indexers", &self.indexers)
            .field("base_offset", &self.base_offset)
            .field("base_stride", &self.base_stride)
            .finish()
    }
}

impl<T> ViewBase<T> {
    /// Builds a descriptor and precomputes its level table, shape, family
    /// and base stride (the product of the base dimensions below the
    /// innermost non-scalar level).
    pub(crate) fn new(
        storage: SharedStorage<T>,
        dims: DimTable,
        indexers: Rc<[Indexer]>,
        base_offset: isize,
    ) -> Self {
        let table = LevelTable::new(&indexers);
        let shape: Rc<[usize]> = table
            .as_slice()
            .iter()
            .map(|&base_level| indexers[base_level].size(dims[base_level]))
            .collect();
        let base_stride = dims.span_product(table.stride_depth()..dims.depth()) as isize;
        let kind = classify(&indexers);
        Self {
            storage,
            dims,
            indexers,
            table: Rc::new(table),
            shape,
            kind,
            base_offset,
            base_stride,
        }
    }

    /// The identity view over a whole array.
    pub(crate) fn whole(storage: SharedStorage<T>, dims: DimTable) -> Self {
        let indexers: Rc<[Indexer]> = vec![Indexer::All; dims.depth()].into();
        Self::new(storage, dims, indexers, 0)
    }

    /// A copy of this descriptor anchored at another storage offset.
    pub(crate) fn with_offset(&self, base_offset: isize) -> Self {
        Self {
            base_offset,
            ..self.clone()
        }
    }

    /// Number of levels (non-scalar indexers).
    pub fn depth(&self) -> usize {
        self.shape.len()
    }

    /// Extent of the given level.
    ///
    /// # Panics
    ///
    /// Panics if `level >= self.depth()`.
    pub fn dimension(&self, level: usize) -> usize {
        self.shape[level]
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of elements visible through the view.
    pub fn len(&self) -> usize {
        self.shape.iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> ViewKind {
        self.kind
    }

    pub fn base_offset(&self) -> isize {
        self.base_offset
    }

    pub fn base_stride(&self) -> isize {
        self.base_stride
    }

    /// Distance in storage between consecutive elements.
    ///
    /// Only meaningful for simple and regular views; an irregular view
    /// reports its base stride.
    pub fn stride(&self) -> isize {
        match self.kind {
            ViewKind::Simple | ViewKind::Array => 1,
            ViewKind::Regular if self.depth() == 1 => {
                self.base_stride * self.indexers[self.table.first()].step()
            }
            _ => self.base_stride,
        }
    }

    pub fn dim_table(&self) -> &DimTable {
        &self.dims
    }

    pub fn indexers(&self) -> &[Indexer] {
        &self.indexers
    }

    pub fn level_table(&self) -> &LevelTable {
        &self.table
    }

    pub fn storage(&self) -> &SharedStorage<T> {
        &self.storage
    }

    /// Storage position of the element at `indices`, with negative indices
    /// counting from the end of their level.
    ///
    /// # Errors
    ///
    /// Returns [`NdError::DimensionMismatch`] if the index count differs
    /// from the depth and [`NdError::IndexOutOfBounds`] for an index outside
    /// its level.
    pub fn position(&self, indices: &[isize]) -> Result<isize> {
        if indices.len() != self.depth() {
            return Err(NdError::dimension_mismatch(self.depth(), indices.len()));
        }
        let mut pos = 0;
        let mut level = 0;
        for base_level in self.table.first()..self.table.stride_depth() {
            let dim = self.dims[base_level];
            let indexer = &self.indexers[base_level];
            pos *= dim as isize;
            if !indexer.is_scalar() {
                let i = resolve_index(indices[level], indexer.size(dim), level)?;
                pos += indexer.get(i);
                level += 1;
            }
        }
        Ok(self.base_offset + pos * self.base_stride)
    }

    /// Like [`position`](Self::position), with the index checks reduced to
    /// contract assertions.
    pub fn position_unchecked(&self, indices: &[isize]) -> isize {
        nd_assert!(
            indices.len() == self.depth(),
            "expected {} indices, got {}",
            self.depth(),
            indices.len()
        );
        let mut pos = 0;
        let mut level = 0;
        for base_level in self.table.first()..self.table.stride_depth() {
            let dim = self.dims[base_level];
            let indexer = &self.indexers[base_level];
            pos *= dim as isize;
            if !indexer.is_scalar() {
                let size = indexer.size(dim);
                let i = add_if_negative(indices[level], size);
                nd_assert!(
                    i >= 0 && (i as usize) < size,
                    "index {} out of bounds for level {} of size {}",
                    indices[level],
                    level,
                    size
                );
                pos += indexer.get(i as usize);
                level += 1;
            }
        }
        self.base_offset + pos * self.base_stride
    }

    /// Storage position for an in-range multi-index, as produced by an
    /// odometer over the view's shape.
    pub(crate) fn position_of(&self, indices: &[isize]) -> isize {
        let mut pos = 0;
        let mut level = 0;
        for base_level in self.table.first()..self.table.stride_depth() {
            let indexer = &self.indexers[base_level];
            pos *= self.dims[base_level] as isize;
            if !indexer.is_scalar() {
                pos += indexer.get(indices[level] as usize);
                level += 1;
            }
        }
        self.base_offset + pos * self.base_stride
    }

    /// Storage displacement of the sub-view at `outer`, an in-range index
    /// over the first `outer.len()` levels, relative to the base offset.
    pub(crate) fn prefix_offset(&self, outer: &[isize]) -> isize {
        let last = self.table.base_level(outer.len() - 1);
        let mut pos = 0;
        let mut level = 0;
        for base_level in self.table.first()..=last {
            let indexer = &self.indexers[base_level];
            pos *= self.dims[base_level] as isize;
            if !indexer.is_scalar() {
                pos += indexer.get(outer[level] as usize);
                level += 1;
            }
        }
        pos * self.dims.span_product(last + 1..self.dims.depth()) as isize
    }

    /// Returns a copy of the element at `indices`.
    ///
    /// # Errors
    ///
    /// Returns an error for a bad index, or
    /// [`NdError::StorageOutOfBounds`] if the position no longer addresses
    /// the buffer (the owning array was shrunk).
    pub fn tuple_at(&self, indices: &[isize]) -> Result<T>
    where
        T: Clone,
    {
        let position = self.position(indices)?;
        let data = self.storage.read();
        let slot = checked_slot(position, data.len())?;
        Ok(data[slot].clone())
    }

    /// # Panics
    ///
    /// Panics if the position falls outside the buffer.
    pub fn tuple_at_unchecked(&self, indices: &[isize]) -> T
    where
        T: Clone,
    {
        let position = self.position_unchecked(indices);
        self.storage.read()[position as usize].clone()
    }

    /// Overwrites the element at `indices`.
    pub fn set(&self, indices: &[isize], value: T) -> Result<()> {
        self.update(indices, |slot| *slot = value)
    }

    /// # Panics
    ///
    /// Panics if the position falls outside the buffer.
    pub fn set_unchecked(&self, indices: &[isize], value: T) {
        let position = self.position_unchecked(indices);
        self.storage.write()[position as usize] = value;
    }

    /// Applies `f` to the element at `indices` in place.
    pub fn update<F>(&self, indices: &[isize], f: F) -> Result<()>
    where
        F: FnOnce(&mut T),
    {
        let position = self.position(indices)?;
        let mut data = self.storage.write();
        let slot = checked_slot(position, data.len())?;
        f(&mut data[slot]);
        Ok(())
    }

    /// Derives a view of this view.
    ///
    /// Spans apply to this view's levels, outermost first; missing trailing
    /// spans take the whole level.
    ///
    /// # Examples
    /// ```
    /// use ndview::{spans, Array};
    ///
    /// let a = Array::from_vec((0..20).collect(), &[4, 5]).unwrap();
    /// let rows = a.vpart(&spans![1..3]).unwrap();
    /// let column = rows.vpart(&spans![.., 2]).unwrap();
    /// assert_eq!(column.to_vec(), vec![7, 12]);
    /// ```
    pub fn vpart(&self, spans: &[Span]) -> Result<View<T>> {
        derive(
            self.storage.clone(),
            self.base_offset,
            self.dims.clone(),
            &self.indexers,
            spans,
        )
    }

    /// Calls `f` with the storage offset of every element, in row-major
    /// order, by walking the indexer tuple depth first.
    pub(crate) fn visit_offsets<F>(&self, f: &mut F)
    where
        F: FnMut(isize),
    {
        self.visit_from(self.table.first(), 0, f);
    }

    fn visit_from<F>(&self, base_level: usize, pos: isize, f: &mut F)
    where
        F: FnMut(isize),
    {
        if base_level == self.table.stride_depth() {
            f(self.base_offset + pos * self.base_stride);
            return;
        }
        let dim = self.dims[base_level];
        let indexer = &self.indexers[base_level];
        let pos = pos * dim as isize;
        if indexer.is_scalar() {
            self.visit_from(base_level + 1, pos, f);
        } else {
            for i in 0..indexer.size(dim) {
                self.visit_from(base_level + 1, pos + indexer.get(i), f);
            }
        }
    }

    /// Walks the elements in row-major order.
    ///
    /// # Errors
    ///
    /// Returns [`NdError::StorageOutOfBounds`] at the first element that no
    /// longer addresses the buffer; `f` has seen every element before it.
    ///
    /// # Panics
    ///
    /// The buffer stays borrowed for reading while `f` runs, so writing to
    /// it from inside `f`, through any handle, panics.
    pub fn traverse<F>(&self, mut f: F) -> Result<()>
    where
        F: FnMut(&T),
    {
        let data = self.storage.read();
        let mut outcome = Ok(());
        let mut visit = |offset: isize| {
            if outcome.is_err() {
                return;
            }
            match checked_slot(offset, data.len()) {
                Ok(slot) => f(&data[slot]),
                Err(err) => outcome = Err(err),
            }
        };
        match self.element_begin() {
            Cursor::Strided(begin) => {
                let mut cursor = begin;
                for _ in 0..self.len() {
                    visit(cursor.offset());
                    cursor.increment();
                }
            }
            Cursor::Odometer(_) => self.visit_offsets(&mut visit),
        }
        outcome
    }

    /// Like [`traverse`](Self::traverse), with mutable access.
    ///
    /// # Panics
    ///
    /// The buffer stays borrowed for writing while `f` runs, so any other
    /// access to it from inside `f` panics.
    pub fn traverse_mut<F>(&self, mut f: F) -> Result<()>
    where
        F: FnMut(&mut T),
    {
        let mut data = self.storage.write();
        let len = data.len();
        let mut outcome = Ok(());
        let mut visit = |offset: isize| {
            if outcome.is_err() {
                return;
            }
            match checked_slot(offset, len) {
                Ok(slot) => f(&mut data[slot]),
                Err(err) => outcome = Err(err),
            }
        };
        match self.element_begin() {
            Cursor::Strided(begin) => {
                let mut cursor = begin;
                for _ in 0..self.len() {
                    visit(cursor.offset());
                    cursor.increment();
                }
            }
            Cursor::Odometer(_) => self.visit_offsets(&mut visit),
        }
        outcome
    }

    /// Copies the visible elements out, in row-major order.
    ///
    /// # Panics
    ///
    /// Panics if the view no longer fits the buffer.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.elements().collect()
    }

    /// Assigns `value` to every visible element.
    pub fn fill(&self, value: T) -> Result<()>
    where
        T: Clone,
    {
        self.traverse_mut(|slot| *slot = value.clone())
    }

    /// Cursor at the first element: strided for simple and regular views,
    /// an odometer over the shape otherwise.
    pub fn element_begin(&self) -> Cursor {
        match self.kind {
            ViewKind::Simple | ViewKind::Regular | ViewKind::Array => {
                Cursor::Strided(StridedCursor::new(self.base_offset, self.stride()))
            }
            ViewKind::Scalar | ViewKind::Irregular => {
                Cursor::Odometer(OdometerCursor::new(Rc::clone(&self.shape)))
            }
        }
    }

    /// Cursor one past the last element.
    pub fn element_end(&self) -> Cursor {
        let mut end = self.element_begin();
        end.advance(self.len() as isize);
        end
    }

    /// Iterates over the storage offsets of the elements.
    pub fn offsets(&self) -> OffsetIter<'_, T> {
        OffsetIter::new(Some(self), self.element_begin(), self.len())
    }

    /// Iterates over copies of the elements, holding a read borrow of the
    /// buffer until dropped.
    pub fn elements(&self) -> Elements<'_, T>
    where
        T: Clone,
    {
        Elements::new(self.offsets(), self.storage.read())
    }

    /// Number of sub-views found at `level`: the product of the extents of
    /// the levels above it.
    fn subview_count(&self, level: usize) -> usize {
        self.shape[..level].iter().product()
    }

    fn check_subview_level(&self, level: usize) -> Result<()> {
        if level == 0 || level >= self.depth() {
            return Err(NdError::InvalidLevel {
                level,
                depth: self.depth(),
            });
        }
        Ok(())
    }

    /// Cursor at the first sub-view at `level`.
    ///
    /// The prefix of the indexer tuple down to the last level above `level`
    /// is classified with its tail consumed. A regular prefix yields a
    /// strided cursor whose stride is the step of that last indexer times
    /// the element count below it; anything else an odometer over the
    /// outer levels.
    ///
    /// # Errors
    ///
    /// Returns [`NdError::InvalidLevel`] unless `0 < level < depth`.
    pub fn subview_begin(&self, level: usize) -> Result<Cursor> {
        self.check_subview_level(level)?;
        let last = self.table.base_level(level - 1);
        let cursor = match classify_prefix(&self.indexers, last) {
            ViewKind::Regular => {
                let below = self.dims.span_product(last + 1..self.dims.depth()) as isize;
                let stride = self.indexers[last].step() * below;
                Cursor::Strided(StridedCursor::new(self.base_offset, stride))
            }
            _ => Cursor::Odometer(OdometerCursor::new(self.shape[..level].into())),
        };
        Ok(cursor)
    }

    /// Cursor one past the last sub-view at `level`.
    pub fn subview_end(&self, level: usize) -> Result<Cursor> {
        let mut end = self.subview_begin(level)?;
        end.advance(self.subview_count(level) as isize);
        Ok(end)
    }

    /// Iterates over the sub-views spanning the levels from `level` on,
    /// one per index over the levels above it.
    ///
    /// # Examples
    /// ```
    /// use ndview::Array;
    ///
    /// let a = Array::from_vec((0..6).collect(), &[2, 3]).unwrap();
    /// let rows: Vec<Vec<i32>> = a.subviews(1).unwrap().map(|row| row.to_vec()).collect();
    /// assert_eq!(rows, vec![vec![0, 1, 2], vec![3, 4, 5]]);
    /// ```
    pub fn subviews(&self, level: usize) -> Result<SubViews<T>> {
        let begin = self.subview_begin(level)?;
        Ok(SubViews::new(
            self.clone(),
            self.subview_template(level),
            begin,
            self.subview_count(level),
        ))
    }

    /// The sub-view descriptor for `level`, anchored at offset 0: the
    /// levels above it become scalar.
    fn subview_template(&self, level: usize) -> ViewBase<T> {
        let last = self.table.base_level(level - 1);
        let indexers: Rc<[Indexer]> = self
            .indexers
            .iter()
            .enumerate()
            .map(|(base_level, indexer)| {
                if base_level <= last {
                    Indexer::Scalar
                } else {
                    indexer.clone()
                }
            })
            .collect();
        ViewBase::new(self.storage.clone(), self.dims.clone(), indexers, 0)
    }
}
