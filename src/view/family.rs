//! The three view families.
//!
//! Each family wraps a [`ViewBase`] and dereferences to it; the wrapper
//! records, in the type, which access strategy the indexers admit.

use std::fmt;
use std::ops::Deref;

use crate::dimension::DimTable;
use crate::iter::OffsetIter;
use crate::storage::SharedStorage;
use crate::view::{ViewBase, ViewKind, Viewable};

macro_rules! view_family {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        pub struct $name<T> {
            base: ViewBase<T>,
        }

        impl<T> $name<T> {
            pub(crate) fn new(base: ViewBase<T>) -> Self {
                Self { base }
            }

            /// Returns the shared descriptor.
            pub fn base(&self) -> &ViewBase<T> {
                &self.base
            }

            pub fn into_base(self) -> ViewBase<T> {
                self.base
            }
        }

        impl<T> Clone for $name<T> {
            fn clone(&self) -> Self {
                Self {
                    base: self.base.clone(),
                }
            }
        }

        impl<T> fmt::Debug for $name<T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($name)).field(&self.base).finish()
            }
        }

        impl<T> Deref for $name<T> {
            type Target = ViewBase<T>;

            fn deref(&self) -> &ViewBase<T> {
                &self.base
            }
        }

        impl<T> Viewable<T> for $name<T> {
            fn kind(&self) -> ViewKind {
                self.base.kind()
            }

            fn storage(&self) -> &SharedStorage<T> {
                self.base.storage()
            }

            fn dim_table(&self) -> &DimTable {
                self.base.dim_table()
            }

            fn shape(&self) -> &[usize] {
                self.base.shape()
            }

            fn base_offset(&self) -> isize {
                self.base.base_offset()
            }

            fn stride(&self) -> isize {
                self.base.stride()
            }

            fn offsets(&self) -> OffsetIter<'_, T> {
                self.base.offsets()
            }
        }
    };
}

view_family!(
    /// A view whose elements are contiguous in the buffer.
    SimpleView
);

view_family!(
    /// A view whose elements are a fixed stride apart in the buffer.
    RegularView
);

view_family!(
    /// A view whose elements are located through per-level lookups.
    IrregularView
);

#[cfg(test)]
mod tests {
    use crate::array::Array;
    use crate::view::{Span, View, ViewKind, Viewable, REVERSED};

    #[test]
    fn test_families_wrap_matching_kinds() {
        let array = Array::from_vec((0..20).collect::<Vec<i32>>(), &[4, 5]).unwrap();
        match array.vpart(&[Span::simple(1, 3)]).unwrap() {
            View::Simple(view) => {
                assert_eq!(Viewable::kind(&view), ViewKind::Simple);
                assert_eq!(Viewable::base_offset(&view), 5);
            }
            other => panic!("expected a simple view, got {:?}", other.kind()),
        }
        match array.vpart(&[Span::all(), Span::scalar(-1)]).unwrap() {
            View::Regular(view) => assert_eq!(Viewable::stride(&view), 5),
            other => panic!("expected a regular view, got {:?}", other.kind()),
        }
        match array.vpart(&[Span::all(), REVERSED]).unwrap() {
            View::Irregular(view) => assert_eq!(Viewable::shape(&view), &[4, 5]),
            other => panic!("expected an irregular view, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_family_offsets_follow_the_base() {
        let array = Array::from_vec((0..10).collect::<Vec<i32>>(), &[10]).unwrap();
        match array.vpart(&[REVERSED]).unwrap() {
            View::Regular(view) => {
                let offsets: Vec<isize> = Viewable::offsets(&view).collect();
                assert_eq!(offsets, (0..10).rev().collect::<Vec<isize>>());
                assert_eq!(view.clone().into_base().base_offset(), 9);
            }
            other => panic!("expected a regular view, got {:?}", other.kind()),
        }
    }
}
