//! # ndview
//!
//! Zero-copy, multi-dimensional views over dense row-major arrays.
//!
//! An [`Array`] owns a buffer and a table of dimension sizes. Applying one
//! [`Span`] per dimension with [`Array::vpart`] yields a [`View`] that
//! shares the buffer: single positions drop a dimension, ranges (with or
//! without a step, possibly negative) narrow it and index lists pick
//! positions in any order. Views can be sliced again; each derivation
//! folds the new spans into the existing per-dimension
//! [`Indexer`](view::Indexer)s, so a view is never more than one level of
//! indirection away from the buffer.
//!
//! Views are classified when derived. Contiguous and fixed-stride views
//! are walked with O(1) strided cursors; all other views with an odometer
//! over their shape. [`data_copy`] moves elements between any two arrays
//! or views, staging the copy when the operands may overlap.
//!
//! ## Example
//!
//! ```
//! use ndview::{data_copy, span, spans, Array, ViewKind};
//!
//! let a = Array::from_vec((0..20).collect::<Vec<i32>>(), &[4, 5]).unwrap();
//!
//! let rows = a.vpart(&spans![1..3]).unwrap();
//! assert_eq!(rows.kind(), ViewKind::Simple);
//! assert_eq!(rows.shape(), &[2, 5]);
//!
//! let mirrored = a.vpart(&[span!(), span!(-1, -1, -1)]).unwrap();
//! assert_eq!(mirrored.subviews(1).unwrap().next().unwrap().to_vec(), vec![4, 3, 2, 1, 0]);
//!
//! let b = Array::zeros(&[4, 5]);
//! data_copy(&mirrored, &b).unwrap();
//! assert_eq!(b.tuple_at(&[3, 0]).unwrap(), 19);
//! ```
//!
//! ## Checked and unchecked access
//!
//! Element accessors return [`Result`](error::Result). Each has an
//! `_unchecked` twin whose index checks are assertions, active in debug
//! builds and with the `strict-checks` feature, and compiled out
//! otherwise. Storage access stays bounds-checked either way.

#[macro_use]
mod macros;

pub mod array;
pub mod copy;
pub mod dimension;
pub mod error;
pub mod iter;
pub mod range;
pub mod rearrange;
pub mod storage;
pub mod view;

pub use array::Array;
pub use copy::{copy_from_source, data_copy, plan_copy, CopyPlan};
pub use dimension::DimTable;
pub use error::{NdError, Result};
pub use range::{range, range_step, vrange, vrange_step, ElementSource, RangeView};
pub use rearrange::{flatten, reshape};
pub use view::{
    IrregularView, RegularView, SimpleView, Span, View, ViewBase, ViewKind, Viewable, ALL,
    REVERSED,
};
