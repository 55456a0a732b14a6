//! Resolved per-dimension access patterns.
//!
//! An [`Indexer`] records which positions of one base dimension are visible
//! through a view. Positions are relative to the view's base offset: the
//! start of a contiguous or strided run is folded into the base offset when
//! the view is derived, so `Simple` and `Regular` only keep a length (and a
//! step), while `Irregular` keeps the explicit relative positions.
//!
//! | indexer     | derived from           | stored as        |
//! |-------------|------------------------|------------------|
//! | `Scalar`    | a single index         | nothing          |
//! | `All`       | the whole dimension    | nothing          |
//! | `Simple`    | `[i, j)`               | length           |
//! | `Regular`   | `[i, j)` step `k`      | length, step     |
//! | `Irregular` | `{i1, i2, ...}`        | position list    |

use std::rc::Rc;

use crate::dimension::resolve_index;
use crate::error::Result;
use crate::view::span::{Resolved, Span};

/// A resolved access pattern over one base dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Indexer {
    /// The dimension was consumed by a scalar span.
    Scalar,
    /// Identity over `[0, base_size)`.
    All,
    /// A contiguous run of `size` positions.
    Simple { size: usize },
    /// `size` positions, `step` apart.
    Regular { size: usize, step: isize },
    /// Explicit positions, relative to the view's base offset.
    Irregular(Rc<[isize]>),
}

/// The family of an [`Indexer`], without its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexerKind {
    Scalar,
    All,
    Simple,
    Regular,
    Irregular,
}

impl Indexer {
    /// Returns the family of this indexer.
    pub fn kind(&self) -> IndexerKind {
        match self {
            Indexer::Scalar => IndexerKind::Scalar,
            Indexer::All => IndexerKind::All,
            Indexer::Simple { .. } => IndexerKind::Simple,
            Indexer::Regular { .. } => IndexerKind::Regular,
            Indexer::Irregular(_) => IndexerKind::Irregular,
        }
    }

    /// Returns `true` if the dimension was consumed by a scalar span.
    pub fn is_scalar(&self) -> bool {
        matches!(self, Indexer::Scalar)
    }

    /// Returns the number of visible positions, given the length of the
    /// base dimension. A consumed dimension counts as one position.
    pub fn size(&self, base_size: usize) -> usize {
        match self {
            Indexer::Scalar => 1,
            Indexer::All => base_size,
            Indexer::Simple { size } | Indexer::Regular { size, .. } => *size,
            Indexer::Irregular(list) => list.len(),
        }
    }

    /// Returns the distance between consecutive positions. Only meaningful
    /// for the contiguous and strided families.
    pub fn step(&self) -> isize {
        match self {
            Indexer::Regular { step, .. } => *step,
            _ => 1,
        }
    }

    /// Returns the relative base position of the `i`-th visible position
    /// without checking `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i` is outside an irregular position list.
    pub fn get(&self, i: usize) -> isize {
        match self {
            Indexer::Scalar => 0,
            Indexer::All | Indexer::Simple { .. } => i as isize,
            Indexer::Regular { step, .. } => i as isize * step,
            Indexer::Irregular(list) => list[i],
        }
    }

    /// Returns the relative base position of the `i`-th visible position.
    ///
    /// # Errors
    ///
    /// Returns [`NdError::IndexOutOfBounds`](crate::error::NdError) if `i`
    /// is not a visible position.
    pub fn at(&self, i: usize, base_size: usize, level: usize) -> Result<isize> {
        let i = resolve_index(i as isize, self.size(base_size), level)?;
        Ok(self.get(i))
    }
}

/// Applies `span` to the visible positions of `indexer`.
///
/// Returns the offset (in positions of the base dimension) to fold into the
/// view's base offset, together with the new indexer:
///
/// * `All` keeps the indexer and contributes no offset.
/// * A scalar consumes the dimension and contributes its position.
/// * A simple range keeps the indexer's family, narrowing `All` to `Simple`.
/// * A strided range yields `Regular` with the combined step, except over an
///   irregular indexer, where the positions are materialized.
/// * A list always yields `Irregular`.
///
/// # Arguments
///
/// * `base_size` - The length of the base dimension.
/// * `indexer` - The current access pattern; must not be `Scalar`.
/// * `span` - The requested slice, interpreted over the visible positions.
/// * `level` - The base level being collapsed, reported in errors.
///
/// # Errors
///
/// Returns an error if `span` does not fit the visible positions.
pub fn collapse(
    base_size: usize,
    indexer: &Indexer,
    span: &Span,
    level: usize,
) -> Result<(isize, Indexer)> {
    nd_assert!(!indexer.is_scalar(), "cannot collapse a consumed dimension");
    let size = indexer.size(base_size);

    let collapsed = match span.resolve(size, level)? {
        Resolved::All => (0, indexer.clone()),
        Resolved::Scalar(pos) => (indexer.get(pos), Indexer::Scalar),
        Resolved::Simple { first, len } => match indexer {
            Indexer::Irregular(list) => (0, Indexer::Irregular(list[first..first + len].into())),
            Indexer::Regular { step, .. } => (
                first as isize * step,
                Indexer::Regular {
                    size: len,
                    step: *step,
                },
            ),
            _ => (first as isize, Indexer::Simple { size: len }),
        },
        Resolved::Regular { first, step, len } => match indexer {
            Indexer::Irregular(list) => {
                let positions: Vec<isize> = (0..len as isize)
                    .map(|k| list[(first + k * step) as usize])
                    .collect();
                (0, Indexer::Irregular(positions.into()))
            }
            _ => {
                // A run of at most one position never walks its step.
                let combined = if len > 1 {
                    step * indexer.step()
                } else {
                    step.signum() * indexer.step().signum()
                };
                (
                    first * indexer.step(),
                    Indexer::Regular {
                        size: len,
                        step: combined,
                    },
                )
            }
        },
        Resolved::List(list) => {
            let positions: Vec<isize> = list.iter().map(|&p| indexer.get(p)).collect();
            (0, Indexer::Irregular(positions.into()))
        }
    };
    Ok(collapsed)
}
