use std::cell::Ref;
use std::iter::FusedIterator;

use crate::iter::cursor::Cursor;
use crate::view::ViewBase;

/// Iterator over the storage offsets of a view's elements, in row-major
/// order.
///
/// Holds a front and a back cursor; odometer positions are translated to
/// storage offsets through the view's indexers.
pub struct OffsetIter<'a, T> {
    base: Option<&'a ViewBase<T>>,
    front: Cursor,
    back: Cursor,
    remaining: usize,
}

impl<'a, T> OffsetIter<'a, T> {
    /// Creates an iterator over `len` positions starting at `begin`.
    ///
    /// `base` may only be `None` for a strided cursor.
    pub(crate) fn new(base: Option<&'a ViewBase<T>>, begin: Cursor, len: usize) -> Self {
        nd_assert!(
            base.is_some() || matches!(begin, Cursor::Strided(_)),
            "odometer iteration needs a view to resolve positions"
        );
        let mut back = begin.clone();
        back.advance(len as isize);
        Self {
            base,
            front: begin,
            back,
            remaining: len,
        }
    }

    fn offset_at(&self, cursor: &Cursor) -> isize {
        match cursor {
            Cursor::Strided(c) => c.offset(),
            Cursor::Odometer(c) => self.base.map_or(0, |base| base.position_of(c.indices())),
        }
    }
}

impl<T> Iterator for OffsetIter<'_, T> {
    type Item = isize;

    fn next(&mut self) -> Option<isize> {
        if self.remaining == 0 {
            return None;
        }
        let offset = self.offset_at(&self.front);
        self.front.increment();
        self.remaining -= 1;
        Some(offset)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }

    fn nth(&mut self, n: usize) -> Option<isize> {
        if n >= self.remaining {
            self.front = self.back.clone();
            self.remaining = 0;
            return None;
        }
        self.front.advance(n as isize);
        self.remaining -= n;
        self.next()
    }
}

impl<T> DoubleEndedIterator for OffsetIter<'_, T> {
    fn next_back(&mut self) -> Option<isize> {
        if self.remaining == 0 {
            return None;
        }
        self.back.decrement();
        self.remaining -= 1;
        Some(self.offset_at(&self.back))
    }
}

impl<T> ExactSizeIterator for OffsetIter<'_, T> {}

impl<T> FusedIterator for OffsetIter<'_, T> {}

/// Iterator over copies of a view's elements.
///
/// Keeps the buffer borrowed for reading while alive, so writing through
/// another handle to the same buffer panics until it is dropped.
pub struct Elements<'a, T> {
    offsets: OffsetIter<'a, T>,
    data: Ref<'a, [T]>,
}

impl<'a, T> Elements<'a, T> {
    pub(crate) fn new(offsets: OffsetIter<'a, T>, data: Ref<'a, [T]>) -> Self {
        Self { offsets, data }
    }
}

impl<T: Clone> Iterator for Elements<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let offset = self.offsets.next()?;
        Some(self.data[offset as usize].clone())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.offsets.size_hint()
    }

    fn nth(&mut self, n: usize) -> Option<T> {
        let offset = self.offsets.nth(n)?;
        Some(self.data[offset as usize].clone())
    }
}

impl<T: Clone> DoubleEndedIterator for Elements<'_, T> {
    fn next_back(&mut self) -> Option<T> {
        let offset = self.offsets.next_back()?;
        Some(self.data[offset as usize].clone())
    }
}

impl<T: Clone> ExactSizeIterator for Elements<'_, T> {}

impl<T: Clone> FusedIterator for Elements<'_, T> {}

#[cfg(test)]
mod tests {
    use crate::dimension::DimTable;
    use crate::iter::cursor::StridedCursor;
    use crate::storage::SharedStorage;
    use crate::view::{Span, ViewBase, REVERSED};

    use super::*;

    fn base(dims: &[usize]) -> ViewBase<i32> {
        let len: usize = dims.iter().product();
        ViewBase::whole(
            SharedStorage::from_vec((0..len as i32).collect()),
            DimTable::new(dims),
        )
    }

    #[test]
    fn test_strided_offsets_without_view() {
        let offsets: OffsetIter<'_, i32> =
            OffsetIter::new(None, Cursor::Strided(StridedCursor::new(3, 2)), 4);
        assert_eq!(offsets.len(), 4);
        assert_eq!(offsets.collect::<Vec<_>>(), vec![3, 5, 7, 9]);
    }

    #[test]
    fn test_both_ends_meet() {
        let view = base(&[3, 4]).vpart(&[REVERSED, Span::regular(0, 0, 2)]).unwrap();
        let mut offsets = view.offsets();
        assert_eq!(offsets.next(), Some(8));
        assert_eq!(offsets.next_back(), Some(2));
        assert_eq!(offsets.len(), 4);
        assert_eq!(offsets.collect::<Vec<_>>(), vec![10, 4, 6, 0]);
    }

    #[test]
    fn test_nth_skips_ahead() {
        let view = base(&[2, 3, 4]).vpart(&[Span::all(), Span::irregular(vec![2, 0])]).unwrap();
        let mut elements = view.elements();
        assert_eq!(elements.nth(5), Some(1));
        assert_eq!(elements.next(), Some(2));
        assert_eq!(elements.nth(10), None);
        assert_eq!(elements.next(), None);
    }

    #[test]
    fn test_reverse_elements() {
        let view = base(&[5]).vpart(&[Span::regular(1, 0, 2)]).unwrap();
        assert_eq!(view.elements().rev().collect::<Vec<_>>(), vec![3, 1]);
    }

    #[test]
    fn test_empty_view() {
        let view = base(&[3, 4]).vpart(&[Span::simple(1, 1)]).unwrap();
        assert_eq!(view.elements().count(), 0);
        assert_eq!(view.offsets().next_back(), None);
    }
}
