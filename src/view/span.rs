//! Per-dimension slicing requests.
//!
//! A [`Span`] is what a caller asks for on one dimension: everything, a
//! single position, a half-open range (optionally strided) or an explicit
//! list of positions. Spans carry no storage information; they are resolved
//! against a concrete dimension length with [`Span::resolve`].
//!
//! Negative integers count from the end. As a range end, `0` denotes the
//! position after the last element, so `Span::simple(-2, 0)` takes the last
//! two positions. For a negative step, `-1` as a range start denotes the
//! last position and `-1` as a range end denotes the position before the
//! first, which makes `Span::regular(-1, -1, -1)` a full reversal.

use std::ops::{Range, RangeFrom, RangeFull, RangeTo};

use crate::dimension::{add_if_negative, add_if_non_positive, resolve_index};
use crate::error::{NdError, Result};

/// A slicing request for one dimension.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Span {
    /// Take the whole dimension.
    All,
    /// Take one position; the dimension disappears from the result.
    Scalar(isize),
    /// Take `[first, last)`.
    Simple { first: isize, last: isize },
    /// Take `[first, last)` stepping by `step` (which may be negative).
    Regular { first: isize, last: isize, step: isize },
    /// Take the listed positions, in order.
    Irregular(Vec<isize>),
}

/// Takes the whole dimension.
pub const ALL: Span = Span::All;

/// Takes the whole dimension in reverse order.
pub const REVERSED: Span = Span::Regular {
    first: -1,
    last: -1,
    step: -1,
};

/// A span resolved against a dimension of known length.
///
/// All positions are expressed in the coordinates of the dimension the span
/// was resolved against, after negative-index wraparound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    All,
    Scalar(usize),
    Simple { first: usize, len: usize },
    Regular { first: isize, step: isize, len: usize },
    List(Vec<usize>),
}

impl Span {
    /// Creates a span that takes the whole dimension.
    pub fn all() -> Self {
        Span::All
    }

    /// Creates a span that takes a single position.
    pub fn scalar(index: isize) -> Self {
        Span::Scalar(index)
    }

    /// Creates a half-open range `[first, last)`.
    pub fn simple(first: isize, last: isize) -> Self {
        Span::Simple { first, last }
    }

    /// Creates the range `[0, last)`.
    pub fn to(last: isize) -> Self {
        Span::Simple { first: 0, last }
    }

    /// Creates a strided range `[first, last)` with the given step.
    ///
    /// The step is validated when the span is resolved, so a zero step is
    /// reported as [`NdError::InvalidStep`] at that point.
    pub fn regular(first: isize, last: isize, step: isize) -> Self {
        Span::Regular { first, last, step }
    }

    /// Creates a span that takes the listed positions.
    pub fn irregular(indices: impl Into<Vec<isize>>) -> Self {
        Span::Irregular(indices.into())
    }

    /// Returns `true` for a scalar span.
    pub fn is_scalar(&self) -> bool {
        matches!(self, Span::Scalar(_))
    }

    /// Resolves the span against a dimension of length `size`.
    ///
    /// # Arguments
    ///
    /// * `size` - The length of the dimension being sliced.
    /// * `level` - The level being sliced, reported in errors.
    ///
    /// # Errors
    ///
    /// Returns [`NdError::IndexOutOfBounds`] for a scalar or list entry
    /// outside the dimension, [`NdError::InvalidRange`] for range bounds
    /// outside the dimension or `first > last`, and [`NdError::InvalidStep`]
    /// for a zero step or a step pointing away from `last`.
    pub fn resolve(&self, size: usize, level: usize) -> Result<Resolved> {
        match self {
            Span::All => Ok(Resolved::All),
            Span::Scalar(index) => resolve_index(*index, size, level).map(Resolved::Scalar),
            Span::Simple { first, last } => {
                let f = add_if_negative(*first, size);
                let l = add_if_non_positive(*last, size);
                let n = size as isize;
                if f < 0 || f > n || l < 0 || l > n || f > l {
                    return Err(NdError::invalid_range(*first, *last, size));
                }
                Ok(Resolved::Simple {
                    first: f as usize,
                    len: (l - f) as usize,
                })
            }
            Span::Regular { first, last, step } => {
                let (f, l) = regular_bounds(*first, *last, *step, size)?;
                let len = l.abs_diff(f).div_ceil(step.unsigned_abs());
                Ok(Resolved::Regular {
                    first: f,
                    step: *step,
                    len,
                })
            }
            Span::Irregular(indices) => indices
                .iter()
                .map(|&i| resolve_index(i, size, level))
                .collect::<Result<Vec<_>>>()
                .map(Resolved::List),
        }
    }

    /// Returns the number of positions this span selects from a dimension
    /// of length `size`, or `None` for a scalar span.
    ///
    /// # Errors
    ///
    /// Returns an error if the span does not fit the dimension.
    pub fn len(&self, size: usize) -> Result<Option<usize>> {
        Ok(match self.resolve(size, 0)? {
            Resolved::All => Some(size),
            Resolved::Scalar(_) => None,
            Resolved::Simple { len, .. } | Resolved::Regular { len, .. } => Some(len),
            Resolved::List(list) => Some(list.len()),
        })
    }

    /// Resolved start position: where the walk begins.
    ///
    /// # Errors
    ///
    /// Returns an error if the span does not fit the dimension.
    pub fn first(&self, size: usize) -> Result<isize> {
        self.bounds(size).map(|(first, _)| first)
    }

    /// Resolved end position: one step past the last position taken (for
    /// a negative step, one position before it).
    ///
    /// # Errors
    ///
    /// Returns an error if the span does not fit the dimension.
    pub fn last(&self, size: usize) -> Result<isize> {
        self.bounds(size).map(|(_, last)| last)
    }

    fn bounds(&self, size: usize) -> Result<(isize, isize)> {
        match self {
            Span::Regular { first, last, step } => regular_bounds(*first, *last, *step, size),
            _ => Ok(match self.resolve(size, 0)? {
                Resolved::All => (0, size as isize),
                Resolved::Scalar(i) => (i as isize, i as isize + 1),
                Resolved::Simple { first, len } => (first as isize, (first + len) as isize),
                Resolved::Regular { first, step, len } => (first, first + len as isize * step),
                Resolved::List(list) => match (list.first(), list.last()) {
                    (Some(&first), Some(&last)) => (first as isize, last as isize + 1),
                    _ => (0, 0),
                },
            }),
        }
    }
}

/// Resolves the bounds of a strided range, direction-aware.
fn regular_bounds(first: isize, last: isize, step: isize, size: usize) -> Result<(isize, isize)> {
    if step == 0 {
        return Err(NdError::invalid_step(first, last, step));
    }
    let n = size as isize;
    if step > 0 {
        let f = add_if_negative(first, size);
        let l = add_if_non_positive(last, size);
        if f < 0 || f > n || l < 0 || l > n {
            return Err(NdError::invalid_range(first, last, size));
        }
        if f > l {
            return Err(NdError::invalid_step(first, last, step));
        }
        Ok((f, l))
    } else {
        let (Some(first_after), Some(last_after)) = (first.checked_add(1), last.checked_add(1))
        else {
            return Err(NdError::invalid_range(first, last, size));
        };
        let f = add_if_non_positive(first_after, size) - 1;
        let l = add_if_negative(last_after, size) - 1;
        if f < -1 || f >= n || l < -1 || l >= n {
            return Err(NdError::invalid_range(first, last, size));
        }
        if f < l {
            return Err(NdError::invalid_step(first, last, step));
        }
        Ok((f, l))
    }
}

impl Default for Span {
    fn default() -> Self {
        Self::all()
    }
}

impl From<RangeFull> for Span {
    fn from(_: RangeFull) -> Self {
        Self::all()
    }
}

macro_rules! impl_span_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Span {
                fn from(index: $t) -> Self {
                    Span::Scalar(index as isize)
                }
            }

            impl From<Range<$t>> for Span {
                fn from(range: Range<$t>) -> Self {
                    from_rust_range(range.start as isize, range.end as isize)
                }
            }

            impl From<RangeFrom<$t>> for Span {
                fn from(range: RangeFrom<$t>) -> Self {
                    Span::simple(range.start as isize, 0)
                }
            }

            impl From<RangeTo<$t>> for Span {
                fn from(range: RangeTo<$t>) -> Self {
                    from_rust_range(0, range.end as isize)
                }
            }

            impl From<Vec<$t>> for Span {
                fn from(indices: Vec<$t>) -> Self {
                    Span::Irregular(indices.into_iter().map(|i| i as isize).collect())
                }
            }

            impl From<&[$t]> for Span {
                fn from(indices: &[$t]) -> Self {
                    Span::Irregular(indices.iter().map(|&i| i as isize).collect())
                }
            }
        )*
    };
}

/// A Rust range is half-open with no end-of-dimension encoding, so an end
/// of `0` means an empty range rather than "up to the end".
fn from_rust_range(start: isize, end: isize) -> Span {
    match (start, end) {
        (0, 0) => Span::Irregular(Vec::new()),
        (start, 0) => Span::simple(start, start),
        (start, end) => Span::simple(start, end),
    }
}

impl_span_from_int!(isize, i32, i64, usize);
