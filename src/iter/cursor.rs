//! Random-access positions inside a view.
//!
//! Contiguous and fixed-stride views are walked with a [`StridedCursor`],
//! a storage offset plus a constant stride, so every operation is O(1).
//! Irregular views are walked with an [`OdometerCursor`], a vector of
//! per-level indices that carries and borrows like an odometer: single steps
//! are amortized O(1), arbitrary jumps, distances and comparisons are
//! O(depth).

use std::cmp::Ordering;
use std::rc::Rc;

/// A storage offset that moves by a fixed stride.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StridedCursor {
    offset: isize,
    stride: isize,
}

impl StridedCursor {
    pub fn new(offset: isize, stride: isize) -> Self {
        Self { offset, stride }
    }

    /// Returns the storage offset the cursor points at.
    pub fn offset(&self) -> isize {
        self.offset
    }

    pub fn stride(&self) -> isize {
        self.stride
    }

    pub fn increment(&mut self) {
        self.offset += self.stride;
    }

    pub fn decrement(&mut self) {
        self.offset -= self.stride;
    }

    /// Moves the cursor by `n` positions (backwards for negative `n`).
    pub fn advance(&mut self, n: isize) {
        self.offset += n * self.stride;
    }

    /// Returns `n` such that advancing `other` by `n` gives `self`.
    pub fn distance(&self, other: &StridedCursor) -> isize {
        nd_assert!(self.stride == other.stride, "cursors walk different strides");
        if self.stride == 0 {
            return 0;
        }
        (self.offset - other.offset) / self.stride
    }
}

impl PartialOrd for StridedCursor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for StridedCursor {
    /// Orders by walking order, so a negative stride reverses the offset
    /// comparison.
    fn cmp(&self, other: &Self) -> Ordering {
        let by_offset = self.offset.cmp(&other.offset);
        if self.stride < 0 {
            by_offset.reverse()
        } else {
            by_offset
        }
    }
}

/// A multi-index over a shape, advanced in row-major order.
///
/// The outermost index is never wrapped, so the past-the-end position of a
/// shape `[d0, d1, ...]` is `[d0, 0, ...]`.
#[derive(Debug, Clone)]
pub struct OdometerCursor {
    indices: Vec<isize>,
    dims: Rc<[usize]>,
}

impl OdometerCursor {
    /// Creates a cursor at the first position of `dims`.
    pub fn new(dims: Rc<[usize]>) -> Self {
        Self {
            indices: vec![0; dims.len()],
            dims,
        }
    }

    /// Creates a cursor at the given position.
    pub fn at(dims: Rc<[usize]>, indices: Vec<isize>) -> Self {
        nd_assert!(indices.len() == dims.len(), "index count does not match the shape");
        Self { indices, dims }
    }

    pub fn indices(&self) -> &[isize] {
        &self.indices
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    pub fn increment(&mut self) {
        self.add(1);
    }

    pub fn decrement(&mut self) {
        self.add(-1);
    }

    /// Moves the cursor by `n` positions (backwards for negative `n`).
    pub fn advance(&mut self, n: isize) {
        self.add(n);
    }

    /// Adds `delta` at the innermost level and propagates carries (or
    /// borrows) outwards. Each level keeps the remainder and hands the
    /// quotient to the level above; the outermost level absorbs whatever is
    /// left.
    fn add(&mut self, delta: isize) {
        let Some(mut level) = self.indices.len().checked_sub(1) else {
            return;
        };
        let mut carry = delta;
        while carry != 0 {
            if level == 0 {
                self.indices[0] += carry;
                return;
            }
            let dim = self.dims[level] as isize;
            if dim == 0 {
                return;
            }
            let total = self.indices[level] + carry;
            self.indices[level] = total.rem_euclid(dim);
            carry = total.div_euclid(dim);
            level -= 1;
        }
    }

    /// Returns the row-major rank of the current position.
    pub fn flat_index(&self) -> isize {
        self.indices
            .iter()
            .zip(self.dims.iter())
            .fold(0, |flat, (&index, &dim)| flat * dim as isize + index)
    }

    /// Returns `n` such that advancing `other` by `n` gives `self`.
    pub fn distance(&self, other: &OdometerCursor) -> isize {
        self.flat_index() - other.flat_index()
    }
}

impl PartialEq for OdometerCursor {
    fn eq(&self, other: &Self) -> bool {
        self.indices == other.indices
    }
}

impl Eq for OdometerCursor {}

impl PartialOrd for OdometerCursor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OdometerCursor {
    /// Lexicographic over the index vector, which is row-major order.
    fn cmp(&self, other: &Self) -> Ordering {
        self.indices.cmp(&other.indices)
    }
}

/// Either cursor strategy, chosen by the view family being walked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cursor {
    Strided(StridedCursor),
    Odometer(OdometerCursor),
}

impl Cursor {
    pub fn increment(&mut self) {
        match self {
            Cursor::Strided(c) => c.increment(),
            Cursor::Odometer(c) => c.increment(),
        }
    }

    pub fn decrement(&mut self) {
        match self {
            Cursor::Strided(c) => c.decrement(),
            Cursor::Odometer(c) => c.decrement(),
        }
    }

    pub fn advance(&mut self, n: isize) {
        match self {
            Cursor::Strided(c) => c.advance(n),
            Cursor::Odometer(c) => c.advance(n),
        }
    }

    /// Returns `n` such that advancing `other` by `n` gives `self`.
    ///
    /// # Panics
    ///
    /// Panics if the cursors use different strategies.
    pub fn distance(&self, other: &Cursor) -> isize {
        match (self, other) {
            (Cursor::Strided(a), Cursor::Strided(b)) => a.distance(b),
            (Cursor::Odometer(a), Cursor::Odometer(b)) => a.distance(b),
            _ => panic!("cannot measure the distance between cursors of different kinds"),
        }
    }
}

impl PartialOrd for Cursor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Cursor::Strided(a), Cursor::Strided(b)) => Some(a.cmp(b)),
            (Cursor::Odometer(a), Cursor::Odometer(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn odometer(dims: &[usize]) -> OdometerCursor {
        OdometerCursor::new(Rc::from(dims))
    }

    #[test]
    fn test_strided_arithmetic() {
        let mut cursor = StridedCursor::new(10, -2);
        let begin = cursor;
        cursor.increment();
        assert_eq!(cursor.offset(), 8);
        cursor.advance(3);
        assert_eq!(cursor.offset(), 2);
        assert_eq!(cursor.distance(&begin), 4);
        assert!(begin < cursor);
        cursor.advance(-4);
        assert_eq!(cursor, begin);
    }

    #[test]
    fn test_odometer_single_steps() {
        let mut cursor = odometer(&[2, 3]);
        let mut seen = Vec::new();
        for _ in 0..6 {
            seen.push(cursor.indices().to_vec());
            cursor.increment();
        }
        assert_eq!(
            seen,
            vec![
                vec![0, 0],
                vec![0, 1],
                vec![0, 2],
                vec![1, 0],
                vec![1, 1],
                vec![1, 2]
            ]
        );
        assert_eq!(cursor.indices(), &[2, 0]);
        cursor.decrement();
        assert_eq!(cursor.indices(), &[1, 2]);
    }

    #[test]
    fn test_odometer_multi_carry() {
        let mut cursor = odometer(&[4, 3, 5]);
        cursor.advance(37);
        assert_eq!(cursor.indices(), &[2, 1, 2]);
        assert_eq!(cursor.flat_index(), 37);
        cursor.advance(-23);
        assert_eq!(cursor.flat_index(), 14);
        assert_eq!(cursor.indices(), &[0, 2, 4]);
        cursor.advance(-14);
        assert_eq!(cursor.indices(), &[0, 0, 0]);
    }

    #[test]
    fn test_odometer_borrow_across_levels() {
        let mut cursor = OdometerCursor::at(Rc::from(&[3usize, 3][..]), vec![2, 2]);
        cursor.advance(-7);
        assert_eq!(cursor.indices(), &[0, 1]);
    }

    #[test]
    fn test_odometer_ordering_and_distance() {
        let dims: Rc<[usize]> = Rc::from(&[3usize, 4][..]);
        let a = OdometerCursor::at(dims.clone(), vec![1, 3]);
        let b = OdometerCursor::at(dims, vec![2, 0]);
        assert!(a < b);
        assert_eq!(b.distance(&a), 1);
        assert_eq!(a.distance(&b), -1);
    }

    #[test]
    fn test_cursor_mixed_kinds_are_unordered() {
        let strided = Cursor::Strided(StridedCursor::new(0, 1));
        let odometer = Cursor::Odometer(odometer(&[2]));
        assert_eq!(strided.partial_cmp(&odometer), None);
    }
}
