//! End-to-end behavior of arrays, views and copies on small fixed inputs.

use ndview::{
    copy_from_source, data_copy, flatten, plan_copy, range, reshape, span, spans, vrange, Array,
    CopyPlan, NdError, Span, ViewKind, REVERSED,
};

fn counting(dims: &[usize]) -> Array<i32> {
    let len: usize = dims.iter().product();
    Array::from_vec((0..len as i32).collect(), dims).unwrap()
}

#[test]
fn test_row_range_is_simple() {
    let a = counting(&[4, 5]);
    let rows = a.vpart(&[span!(1, 3), span!()]).unwrap();
    assert_eq!(rows.kind(), ViewKind::Simple);
    assert_eq!(rows.shape(), &[2, 5]);
    assert_eq!(rows.to_vec(), (5..15).collect::<Vec<_>>());
}

#[test]
fn test_reversed_columns() {
    let a = counting(&[4, 5]);
    let mirrored = a.vpart(&[span!(), REVERSED]).unwrap();
    // A reversed last level after a full level needs per-level lookups.
    assert_eq!(mirrored.kind(), ViewKind::Irregular);
    assert_eq!(mirrored.shape(), &[4, 5]);
    let first_row = mirrored.subviews(1).unwrap().next().unwrap();
    assert_eq!(first_row.kind(), ViewKind::Regular);
    assert_eq!(first_row.to_vec(), vec![4, 3, 2, 1, 0]);
    assert_eq!(mirrored.tuple_at(&[3, 0]).unwrap(), 19);
}

#[test]
fn test_reversed_vector_is_regular() {
    let a = counting(&[5]);
    let reversed = a.vpart(&[REVERSED]).unwrap();
    assert_eq!(reversed.kind(), ViewKind::Regular);
    assert_eq!(reversed.stride(), -1);
    assert_eq!(reversed.to_vec(), vec![4, 3, 2, 1, 0]);
}

#[test]
fn test_negative_index_wraparound() {
    let a = counting(&[4, 5]);
    let last_column = a.vpart(&spans![.., -1]).unwrap();
    assert_eq!(last_column.to_vec(), vec![4, 9, 14, 19]);

    let tail = a.vpart(&[span!(-2, 0)]).unwrap();
    assert_eq!(tail.shape(), &[2, 5]);
    assert_eq!(tail.tuple_at(&[0, 0]).unwrap(), 10);
    assert_eq!(tail.tuple_at(&[-1, -1]).unwrap(), 19);
}

#[test]
fn test_interleaved_copy_within_one_array() {
    let a = counting(&[8]);
    let evens = a.vpart(&[span!(0, 0, 2)]).unwrap();
    let odds = a.vpart(&[span!(1, 0, 2)]).unwrap();
    assert_eq!(evens.kind(), ViewKind::Regular);
    assert_eq!(plan_copy(&evens, &odds), CopyPlan::Staged);
    data_copy(&evens, &odds).unwrap();
    assert_eq!(a.to_vec(), vec![0, 0, 2, 2, 4, 4, 6, 6]);
}

#[test]
fn test_shifted_copy_reads_original_values() {
    let a = counting(&[8]);
    let body = a.vpart(&[span!(0, 7)]).unwrap();
    let shifted = a.vpart(&[span!(1, 8)]).unwrap();
    data_copy(&body, &shifted).unwrap();
    assert_eq!(a.to_vec(), vec![0, 0, 1, 2, 3, 4, 5, 6]);
}

#[test]
fn test_nested_views_compose() {
    let a = counting(&[4, 6]);
    let block = a.vpart(&[span!(1, 4), span!(0, 0, 2)]).unwrap();
    assert_eq!(block.shape(), &[3, 3]);
    let corner = block.vpart(&[REVERSED, span!([2, 0])]).unwrap();
    assert_eq!(corner.shape(), &[3, 2]);
    assert_eq!(corner.to_vec(), vec![22, 18, 16, 12, 10, 6]);

    let picked = corner.vpart(&spans![1]).unwrap();
    assert_eq!(picked.to_vec(), vec![16, 12]);
}

#[test]
fn test_writes_through_views_reach_the_array() {
    let a = Array::<i32>::zeros(&[3, 3]);
    let diagonal_ish = a.vpart(&[span!([0, 2]), span!(0, 0, 2)]).unwrap();
    diagonal_ish.fill(1).unwrap();
    assert_eq!(a.to_vec(), vec![1, 0, 1, 0, 0, 0, 1, 0, 1]);
    diagonal_ish.update(&[1, 1], |x| *x = 9).unwrap();
    assert_eq!(a.tuple_at(&[2, 2]).unwrap(), 9);
}

#[test]
fn test_make_array_from_view() {
    let a = counting(&[3, 4]);
    let view = a.vpart(&[REVERSED, span!(1, 3)]).unwrap();
    let copy = Array::from_view(&view).unwrap();
    assert_eq!(copy.shape(), view.shape());
    assert_eq!(copy.to_vec(), view.to_vec());
    a.fill(0);
    assert_eq!(copy.to_vec(), vec![9, 10, 5, 6, 1, 2]);
}

#[test]
fn test_errors_are_reported() {
    let a = counting(&[4, 5]);
    assert!(matches!(
        a.vpart(&[span!(5)]).unwrap_err(),
        NdError::InvalidRange { .. }
    ));
    assert!(matches!(
        a.vpart(&[span!(0, 3, -1)]).unwrap_err(),
        NdError::InvalidStep { .. }
    ));
    assert!(matches!(
        a.vpart(&[Span::scalar(4), Span::scalar(0), Span::all()]).unwrap_err(),
        NdError::TooManySpans { .. }
    ));
    assert_eq!(
        a.vpart(&[Span::scalar(1), Span::scalar(2)]).unwrap_err(),
        NdError::ZeroDepth
    );
    let view = a.view();
    assert!(matches!(
        view.tuple_at(&[0, 5]).unwrap_err(),
        NdError::IndexOutOfBounds { index: 5, size: 5, level: 1 }
    ));
    assert!(matches!(
        data_copy(&a, &counting(&[5, 4])).unwrap_err(),
        NdError::ShapeMismatch { .. }
    ));
}

#[test]
fn test_sources_feed_views() {
    let a = Array::<i64>::zeros(&[2, 4]);
    let odd_columns = a.vpart(&[span!(), span!(1, 0, 2)]).unwrap();
    copy_from_source(&vrange(10, 14), &odd_columns).unwrap();
    assert_eq!(a.to_vec(), vec![0, 10, 0, 11, 0, 12, 0, 13]);

    let b = Array::from_source(&vrange(0.0, 3.0), &[3]).unwrap();
    assert_eq!(b.to_vec(), vec![0.0, 1.0, 2.0]);
}

#[test]
fn test_reshape_then_view() {
    let a = reshape(range(0, 12), &[3, 4]).unwrap();
    let column = a.vpart(&spans![.., 1]).unwrap();
    assert_eq!(column.to_vec(), vec![1, 5, 9]);
    let flat = flatten(a);
    assert_eq!(flat.vpart(&[span!(-3, 0)]).unwrap().to_vec(), vec![9, 10, 11]);
}
