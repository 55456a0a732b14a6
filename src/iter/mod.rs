//! Cursors and iterators over views.
//!
//! Element iteration and sub-view iteration share the same two cursor
//! strategies; see [`cursor`] for their cost model.

pub mod cursor;
mod elements;
mod subviews;

pub use cursor::{Cursor, OdometerCursor, StridedCursor};
pub use elements::{Elements, OffsetIter};
pub use subviews::SubViews;
