use std::iter::FusedIterator;

use crate::iter::cursor::Cursor;
use crate::view::{View, ViewBase};

/// Iterator over the sub-views found at one level of a view.
///
/// Each item is a view of the levels from that level on, anchored at one
/// index over the levels above it, in row-major order.
pub struct SubViews<T> {
    parent: ViewBase<T>,
    template: ViewBase<T>,
    front: Cursor,
    back: Cursor,
    remaining: usize,
}

impl<T> SubViews<T> {
    pub(crate) fn new(
        parent: ViewBase<T>,
        template: ViewBase<T>,
        begin: Cursor,
        count: usize,
    ) -> Self {
        let mut back = begin.clone();
        back.advance(count as isize);
        Self {
            parent,
            template,
            front: begin,
            back,
            remaining: count,
        }
    }

    fn subview_at(&self, cursor: &Cursor) -> View<T> {
        let offset = match cursor {
            Cursor::Strided(c) => c.offset(),
            Cursor::Odometer(c) => self.parent.base_offset() + self.parent.prefix_offset(c.indices()),
        };
        View::from_base(self.template.with_offset(offset))
    }
}

impl<T> Iterator for SubViews<T> {
    type Item = View<T>;

    fn next(&mut self) -> Option<View<T>> {
        if self.remaining == 0 {
            return None;
        }
        let view = self.subview_at(&self.front);
        self.front.increment();
        self.remaining -= 1;
        Some(view)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }

    fn nth(&mut self, n: usize) -> Option<View<T>> {
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

impl<T> DoubleEndedIterator for SubViews<T> {
    fn next_back(&mut self) -> Option<View<T>> {
        if self.remaining == 0 {
            return None;
        }
        self.back.decrement();
        self.remaining -= 1;
        Some(self.subview_at(&self.back))
    }
}

impl<T> ExactSizeIterator for SubViews<T> {}

impl<T> FusedIterator for SubViews<T> {}

#[cfg(test)]
mod tests {
    use crate::array::Array;
    use crate::view::{Span, ViewKind};

    #[test]
    fn test_subviews_are_lazy_and_sized() {
        let array = Array::from_vec((0..24).collect::<Vec<i32>>(), &[2, 3, 4]).unwrap();
        let mut rows = array.subviews(2).unwrap();
        assert_eq!(rows.len(), 6);
        let third = rows.nth(2).unwrap();
        assert_eq!(third.kind(), ViewKind::Simple);
        assert_eq!(third.to_vec(), vec![8, 9, 10, 11]);
        assert_eq!(rows.next_back().unwrap().to_vec(), vec![20, 21, 22, 23]);
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_columns_of_a_column_slice() {
        let array = Array::from_vec((0..12).collect::<Vec<i32>>(), &[3, 4]).unwrap();
        let view = array
            .vpart(&[Span::irregular(vec![2, 0]), Span::regular(3, 0, -2)])
            .unwrap();
        let rows: Vec<Vec<i32>> = view.subviews(1).unwrap().map(|row| row.to_vec()).collect();
        assert_eq!(rows, vec![vec![11, 9], vec![3, 1]]);
    }
}
