//! Views over array storage.
//!
//! A view is a descriptor over an owning array's buffer: it shares the
//! buffer and the dimension table, and records one [`Indexer`] per base
//! dimension together with a base offset and a base stride. Views are
//! derived from arrays (or from other views) by applying one [`Span`] per
//! level, and are classified into three families at derivation time:
//!
//! * [`SimpleView`]: elements are contiguous.
//! * [`RegularView`]: elements are a fixed stride apart.
//! * [`IrregularView`]: elements need per-level lookups.
//!
//! Deriving a view never copies elements. Writing through a view writes
//! the owning array.

use std::fmt;
use std::ops::Deref;

use crate::dimension::DimTable;
use crate::iter::OffsetIter;
use crate::storage::SharedStorage;

mod base;
pub mod classify;
mod family;
pub mod indexer;
pub mod span;

pub use base::{derive, ViewBase};
pub use classify::{classify, classify_prefix, LevelTable, ViewKind};
pub use family::{IrregularView, RegularView, SimpleView};
pub use indexer::{collapse, Indexer, IndexerKind};
pub use span::{Resolved, Span, ALL, REVERSED};

/// Anything that exposes elements of a shared buffer in row-major order:
/// owning arrays and views of every family.
pub trait Viewable<T> {
    /// The family, or [`ViewKind::Array`] for an owning array.
    fn kind(&self) -> ViewKind;

    fn storage(&self) -> &SharedStorage<T>;

    /// The owning array's dimension table, which identifies the array.
    fn dim_table(&self) -> &DimTable;

    fn shape(&self) -> &[usize];

    fn len(&self) -> usize {
        self.shape().iter().product()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Storage position of the first element.
    fn base_offset(&self) -> isize;

    /// Distance between consecutive elements; meaningful for arrays,
    /// simple and regular views only.
    fn stride(&self) -> isize;

    /// Storage positions of the elements, in row-major order.
    fn offsets(&self) -> OffsetIter<'_, T>;
}

/// A view of any family.
pub enum View<T> {
    Simple(SimpleView<T>),
    Regular(RegularView<T>),
    Irregular(IrregularView<T>),
}

impl<T> View<T> {
    /// Wraps a descriptor into the family its indexers classify as.
    pub(crate) fn from_base(base: ViewBase<T>) -> Self {
        match base.kind() {
            ViewKind::Simple => View::Simple(SimpleView::new(base)),
            ViewKind::Regular => View::Regular(RegularView::new(base)),
            ViewKind::Scalar | ViewKind::Irregular | ViewKind::Array => {
                View::Irregular(IrregularView::new(base))
            }
        }
    }

    /// Returns the shared descriptor.
    pub fn base(&self) -> &ViewBase<T> {
        match self {
            View::Simple(view) => view.base(),
            View::Regular(view) => view.base(),
            View::Irregular(view) => view.base(),
        }
    }

    pub fn into_base(self) -> ViewBase<T> {
        match self {
            View::Simple(view) => view.into_base(),
            View::Regular(view) => view.into_base(),
            View::Irregular(view) => view.into_base(),
        }
    }

    pub fn as_simple(&self) -> Option<&SimpleView<T>> {
        match self {
            View::Simple(view) => Some(view),
            _ => None,
        }
    }

    pub fn as_regular(&self) -> Option<&RegularView<T>> {
        match self {
            View::Regular(view) => Some(view),
            _ => None,
        }
    }

    pub fn as_irregular(&self) -> Option<&IrregularView<T>> {
        match self {
            View::Irregular(view) => Some(view),
            _ => None,
        }
    }
}

impl<T> Clone for View<T> {
    fn clone(&self) -> Self {
        match self {
            View::Simple(view) => View::Simple(view.clone()),
            View::Regular(view) => View::Regular(view.clone()),
            View::Irregular(view) => View::Irregular(view.clone()),
        }
    }
}

impl<T> fmt::Debug for View<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Simple(view) => fmt::Debug::fmt(view, f),
            View::Regular(view) => fmt::Debug::fmt(view, f),
            View::Irregular(view) => fmt::Debug::fmt(view, f),
        }
    }
}

impl<T> Deref for View<T> {
    type Target = ViewBase<T>;

    fn deref(&self) -> &ViewBase<T> {
        self.base()
    }
}

impl<T> Viewable<T> for ViewBase<T> {
    fn kind(&self) -> ViewKind {
        ViewBase::kind(self)
    }

    fn storage(&self) -> &SharedStorage<T> {
        ViewBase::storage(self)
    }

    fn dim_table(&self) -> &DimTable {
        ViewBase::dim_table(self)
    }

    fn shape(&self) -> &[usize] {
        ViewBase::shape(self)
    }

    fn base_offset(&self) -> isize {
        ViewBase::base_offset(self)
    }

    fn stride(&self) -> isize {
        ViewBase::stride(self)
    }

    fn offsets(&self) -> OffsetIter<'_, T> {
        ViewBase::offsets(self)
    }
}

impl<T> Viewable<T> for View<T> {
    fn kind(&self) -> ViewKind {
        self.base().kind()
    }

    fn storage(&self) -> &SharedStorage<T> {
        self.base().storage()
    }

    fn dim_table(&self) -> &DimTable {
        self.base().dim_table()
    }

    fn shape(&self) -> &[usize] {
        self.base().shape()
    }

    fn base_offset(&self) -> isize {
        self.base().base_offset()
    }

    fn stride(&self) -> isize {
        self.base().stride()
    }

    fn offsets(&self) -> OffsetIter<'_, T> {
        self.base().offsets()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::Array;

    #[test]
    fn test_family_dispatch() {
        let array = Array::from_vec((0..20).collect::<Vec<i32>>(), &[4, 5]).unwrap();

        let rows = array.vpart(&[Span::simple(1, 3), Span::all()]).unwrap();
        assert!(rows.as_simple().is_some());

        let column = array.vpart(&[Span::all(), Span::scalar(0)]).unwrap();
        assert!(column.as_regular().is_some());

        let picked = array.vpart(&[Span::irregular(vec![3, 0])]).unwrap();
        assert!(picked.as_irregular().is_some());
        assert_eq!(Viewable::kind(&picked), ViewKind::Irregular);
    }

    #[test]
    fn test_views_share_the_buffer() {
        let array = Array::from_vec(vec![0; 6], &[2, 3]).unwrap();
        let row = array.vpart(&[Span::scalar(1)]).unwrap();
        row.fill(7).unwrap();
        assert_eq!(array.to_vec(), vec![0, 0, 0, 7, 7, 7]);
        assert!(row.dim_table().same_table(array.dim_table()));
        assert_eq!(Viewable::len(&row), 3);
    }
}
