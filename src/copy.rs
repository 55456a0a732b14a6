//! Element-wise copy between arrays and views that may share a buffer.
//!
//! Before copying, the operands are compared for aliasing. Copies between
//! different buffers, and between strided runs whose storage extents are
//! disjoint, go element by element; any other copy inside one buffer is
//! staged through a temporary vector so that every source element is read
//! before any destination element is written.

use tracing::debug;

use crate::error::{NdError, Result};
use crate::range::ElementSource;
use crate::storage::checked_slot;
use crate::view::{ViewKind, Viewable};

/// How [`data_copy`] moves the elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CopyPlan {
    /// Element by element, reading the source while writing the
    /// destination.
    Direct,
    /// Through a temporary buffer holding the whole source.
    Staged,
    /// Nothing to do: the destination is the source.
    Noop,
}

/// Inclusive range of storage positions touched by `len` elements starting
/// at `offset`, `stride` apart; `None` when there are no elements.
fn storage_extent(offset: isize, stride: isize, len: usize) -> Option<(isize, isize)> {
    if len == 0 {
        return None;
    }
    let last = offset + (len as isize - 1) * stride;
    Some((offset.min(last), offset.max(last)))
}

fn is_strided(kind: ViewKind) -> bool {
    matches!(kind, ViewKind::Simple | ViewKind::Regular)
}

/// Decides how to copy `src` onto `dst` without reading a source element
/// after it was overwritten.
///
/// 1. Operands with different dimension tables come from different arrays
///    and are copied directly. A shared buffer under different tables
///    means one operand outlived a resize of its array; that copy is
///    staged.
/// 2. An array copied onto itself is a no-op.
/// 3. Any other pair involving an irregular view or a whole array is
///    staged.
/// 4. Two simple or regular views are copied directly when their storage
///    extents are disjoint, staged otherwise.
///
/// The decision may stage copies that would have been safe, never the
/// reverse.
pub fn plan_copy<T, S, D>(src: &S, dst: &D) -> CopyPlan
where
    S: Viewable<T> + ?Sized,
    D: Viewable<T> + ?Sized,
{
    if !src.dim_table().same_table(dst.dim_table()) {
        if src.storage().same_buffer(dst.storage()) {
            return CopyPlan::Staged;
        }
        return CopyPlan::Direct;
    }
    let (src_kind, dst_kind) = (src.kind(), dst.kind());
    if src_kind == ViewKind::Array && dst_kind == ViewKind::Array {
        return CopyPlan::Noop;
    }
    if !is_strided(src_kind) || !is_strided(dst_kind) {
        return CopyPlan::Staged;
    }
    let src_extent = storage_extent(src.base_offset(), src.stride(), src.len());
    let dst_extent = storage_extent(dst.base_offset(), dst.stride(), dst.len());
    match (src_extent, dst_extent) {
        (Some((src_low, src_high)), Some((dst_low, dst_high))) => {
            if src_high < dst_low || dst_high < src_low {
                CopyPlan::Direct
            } else {
                CopyPlan::Staged
            }
        }
        _ => CopyPlan::Direct,
    }
}

/// Assigns every element of `src` to the element at the same row-major
/// position of `dst`.
///
/// The result is the same as if the whole source had been read before
/// anything was written, even when the operands overlap in one buffer.
///
/// # Examples
/// ```
/// use ndview::{data_copy, spans, Array};
///
/// let a = Array::from_vec((0..8).collect::<Vec<i32>>(), &[8]).unwrap();
/// let evens = a.vpart(&spans![ndview::span!(0, 0, 2)]).unwrap();
/// let head = a.vpart(&spans![0..4]).unwrap();
/// data_copy(&head, &evens).unwrap();
/// assert_eq!(a.to_vec(), vec![0, 1, 1, 3, 2, 5, 3, 7]);
/// ```
///
/// # Errors
///
/// Returns [`NdError::ShapeMismatch`] if the shapes differ and
/// [`NdError::StorageOutOfBounds`] if either operand no longer fits its
/// buffer.
pub fn data_copy<T, S, D>(src: &S, dst: &D) -> Result<()>
where
    T: Clone,
    S: Viewable<T> + ?Sized,
    D: Viewable<T> + ?Sized,
{
    if src.shape() != dst.shape() {
        return Err(NdError::shape_mismatch(
            src.shape().to_vec(),
            dst.shape().to_vec(),
        ));
    }
    if src.is_empty() {
        return Ok(());
    }
    let plan = plan_copy(src, dst);
    debug!(
        ?plan,
        src_kind = ?src.kind(),
        dst_kind = ?dst.kind(),
        len = src.len(),
        "copying elements"
    );
    match plan {
        CopyPlan::Noop => Ok(()),
        CopyPlan::Direct => copy_direct(src, dst),
        CopyPlan::Staged => copy_staged(src, dst),
    }
}

fn copy_direct<T, S, D>(src: &S, dst: &D) -> Result<()>
where
    T: Clone,
    S: Viewable<T> + ?Sized,
    D: Viewable<T> + ?Sized,
{
    if src.storage().same_buffer(dst.storage()) {
        let mut data = dst.storage().write();
        let len = data.len();
        for (from, to) in src.offsets().zip(dst.offsets()) {
            let from = checked_slot(from, len)?;
            let to = checked_slot(to, len)?;
            data[to] = data[from].clone();
        }
        return Ok(());
    }
    let source = src.storage().read();
    let mut target = dst.storage().write();
    for (from, to) in src.offsets().zip(dst.offsets()) {
        let from = checked_slot(from, source.len())?;
        let to = checked_slot(to, target.len())?;
        target[to] = source[from].clone();
    }
    Ok(())
}

fn copy_staged<T, S, D>(src: &S, dst: &D) -> Result<()>
where
    T: Clone,
    S: Viewable<T> + ?Sized,
    D: Viewable<T> + ?Sized,
{
    let staged = {
        let source = src.storage().read();
        src.offsets()
            .map(|from| checked_slot(from, source.len()).map(|slot| source[slot].clone()))
            .collect::<Result<Vec<T>>>()?
    };
    write_all(dst, staged)
}

/// Writes `values` to the elements of `dst`, in row-major order.
fn write_all<T, D>(dst: &D, values: impl IntoIterator<Item = T>) -> Result<()>
where
    D: Viewable<T> + ?Sized,
{
    let mut target = dst.storage().write();
    let len = target.len();
    for (value, to) in values.into_iter().zip(dst.offsets()) {
        target[checked_slot(to, len)?] = value;
    }
    Ok(())
}

/// Evaluates `source` into the elements of `dst`, in row-major order.
///
/// # Errors
///
/// Returns [`NdError::SizeMismatch`] if the source length differs from the
/// element count of `dst`.
pub fn copy_from_source<T, E, D>(source: &E, dst: &D) -> Result<()>
where
    E: ElementSource<T> + ?Sized,
    D: Viewable<T> + ?Sized,
{
    if source.len() != dst.len() {
        return Err(NdError::size_mismatch(dst.len(), source.len()));
    }
    debug!(len = source.len(), dst_kind = ?dst.kind(), "evaluating source into view");
    write_all(dst, (0..source.len()).map(|i| source.at(i)))
}
