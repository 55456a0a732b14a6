//! Lazily evaluated arithmetic sequences.
//!
//! A [`RangeView`] produces `first, first + step, first + 2 * step, ...`
//! without storing anything. It feeds arrays and views through the
//! [`ElementSource`] interface.

use num_traits::{Num, NumCast};

use crate::array::Array;
use crate::error::{NdError, Result};

/// A producer of a finite sequence of elements that can be evaluated on
/// demand.
pub trait ElementSource<T> {
    /// Number of elements produced.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The `i`-th element.
    ///
    /// # Panics
    ///
    /// May panic if `i >= self.len()`.
    fn at(&self, i: usize) -> T;

    /// Writes the first `dst.len()` elements into `dst`.
    fn copy_to(&self, dst: &mut [T]) {
        nd_assert!(dst.len() <= self.len(), "destination longer than the source");
        for (i, slot) in dst.iter_mut().enumerate() {
            *slot = self.at(i);
        }
    }
}

impl<T: Clone> ElementSource<T> for [T] {
    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    fn at(&self, i: usize) -> T {
        self[i].clone()
    }

    fn copy_to(&self, dst: &mut [T]) {
        dst.clone_from_slice(&self[..dst.len()]);
    }
}

impl<T: Clone> ElementSource<T> for Vec<T> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn at(&self, i: usize) -> T {
        self[i].clone()
    }

    fn copy_to(&self, dst: &mut [T]) {
        self.as_slice().copy_to(dst);
    }
}

/// An arithmetic sequence over a numeric type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeView<T> {
    first: T,
    step: T,
    len: usize,
}

impl<T> RangeView<T>
where
    T: Num + NumCast + Copy + PartialOrd,
{
    pub fn first(&self) -> T {
        self.first
    }

    pub fn step(&self) -> T {
        self.step
    }

    /// Iterates over the values.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = T> + ExactSizeIterator + '_ {
        (0..self.len).map(move |i| self.at(i))
    }

    /// Evaluates the sequence into a one-dimensional array.
    pub fn to_array(&self) -> Array<T>
    where
        T: Default,
    {
        let mut data = vec![T::default(); self.len];
        self.copy_to(&mut data);
        Array::from_linear(data)
    }
}

impl<T> ElementSource<T> for RangeView<T>
where
    T: Num + NumCast + Copy + PartialOrd,
{
    fn len(&self) -> usize {
        self.len
    }

    fn at(&self, i: usize) -> T {
        nd_assert!(i < self.len, "index {} outside a range of {} values", i, self.len);
        if is_integral::<T>() {
            // `step * i` alone may overflow `T` even though the value fits.
            let value = (self.first.to_i128(), self.step.to_i128());
            if let (Some(first), Some(step)) = value {
                let exact = (i as i128)
                    .checked_mul(step)
                    .and_then(|offset| offset.checked_add(first))
                    .and_then(|value| <T as NumCast>::from(value));
                if let Some(exact) = exact {
                    return exact;
                }
            }
        }
        match <T as NumCast>::from(i) {
            Some(i) => self.first + self.step * i,
            None => self.first,
        }
    }
}

/// `true` for integer types, where `1 / 2` truncates to zero.
fn is_integral<T: Num>() -> bool {
    T::one() / (T::one() + T::one()) == T::zero()
}

/// Number of values `first + k * step` strictly before `last`: the
/// quotient `(last - first) / step` rounded up, or zero when `last` lies
/// behind `first`.
///
/// Integer bounds are measured in `i128`, so the distance between the
/// extremes of a type does not overflow. A length beyond `usize` yields an
/// empty sequence.
fn sequence_len<T>(first: T, last: T, step: T) -> usize
where
    T: Num + NumCast + Copy + PartialOrd,
{
    let zero = T::zero();
    if (step > zero && last <= first) || (step < zero && last >= first) {
        return 0;
    }
    if is_integral::<T>() {
        let (Some(first), Some(last), Some(step)) =
            (first.to_i128(), last.to_i128(), step.to_i128())
        else {
            return 0;
        };
        return last
            .checked_sub(first)
            .map(|diff| diff.unsigned_abs().div_ceil(step.unsigned_abs()))
            .and_then(|len| usize::try_from(len).ok())
            .unwrap_or(0);
    }
    let diff = last - first;
    let quotient = diff / step;
    let Some(whole) = quotient.to_usize() else {
        return 0;
    };
    match <T as NumCast>::from(whole) {
        Some(taken) if taken * step != diff => whole + 1,
        _ => whole,
    }
}

/// The sequence `first, first + 1, ...` up to, excluding, `last`.
///
/// # Examples
/// ```
/// use ndview::{vrange, ElementSource};
///
/// let r = vrange(2, 6);
/// assert_eq!(r.len(), 4);
/// assert_eq!(r.at(3), 5);
/// ```
pub fn vrange<T>(first: T, last: T) -> RangeView<T>
where
    T: Num + NumCast + Copy + PartialOrd,
{
    let step = T::one();
    RangeView {
        first,
        step,
        len: sequence_len(first, last, step),
    }
}

/// The sequence `first, first + step, ...` up to, excluding, `last`.
///
/// # Errors
///
/// Returns [`NdError::InvalidStep`] for a zero step.
pub fn vrange_step<T>(first: T, last: T, step: T) -> Result<RangeView<T>>
where
    T: Num + NumCast + Copy + PartialOrd,
{
    if step == T::zero() {
        return Err(NdError::invalid_step(
            first.to_isize().unwrap_or_default(),
            last.to_isize().unwrap_or_default(),
            0,
        ));
    }
    Ok(RangeView {
        first,
        step,
        len: sequence_len(first, last, step),
    })
}

/// Evaluates [`vrange`] into a one-dimensional array.
pub fn range<T>(first: T, last: T) -> Array<T>
where
    T: Num + NumCast + Copy + PartialOrd + Default,
{
    vrange(first, last).to_array()
}

/// Evaluates [`vrange_step`] into a one-dimensional array.
pub fn range_step<T>(first: T, last: T, step: T) -> Result<Array<T>>
where
    T: Num + NumCast + Copy + PartialOrd + Default,
{
    Ok(vrange_step(first, last, step)?.to_array())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_integer_lengths() {
        assert_eq!(vrange(0, 5).len(), 5);
        assert_eq!(vrange(5, 0).len(), 0);
        assert_eq!(vrange(20u32, 10).len(), 0);
        assert_eq!(vrange_step(0, 5, 2).unwrap().len(), 3);
        assert_eq!(vrange_step(0, 6, 2).unwrap().len(), 3);
        assert_eq!(vrange_step(5, 0, -2).unwrap().len(), 3);
        assert_eq!(vrange_step(0, 5, -1).unwrap().len(), 0);
        assert!(vrange_step(0, 5, 0).is_err());
    }

    #[test]
    fn test_extreme_integer_bounds() {
        let wide = vrange(i32::MIN, i32::MAX);
        assert_eq!(wide.len(), u32::MAX as usize);
        assert_eq!(wide.at(wide.len() - 1), i32::MAX - 1);

        let bytes = vrange(i8::MIN, i8::MAX);
        assert_eq!(bytes.len(), 255);
        assert_eq!(bytes.iter().last(), Some(126));

        let long = vrange_step(i64::MIN, i64::MAX, i64::MAX).unwrap();
        assert_eq!(long.len(), 3);
        assert_eq!(long.iter().collect::<Vec<_>>(), vec![i64::MIN, -1, i64::MAX - 1]);

        assert_eq!(range_step(0i8, 127, 100).unwrap().to_vec(), vec![0, 100]);
    }

    #[test]
    fn test_float_lengths() {
        assert_eq!(vrange(0.0, 2.5).len(), 3);
        assert_eq!(vrange_step(0.0, 1.0, 0.25).unwrap().len(), 4);
        assert_eq!(vrange_step(1.0, 0.0, -0.3).unwrap().len(), 4);
    }

    #[test]
    fn test_values() {
        let r = vrange_step(1.0, 0.0, -0.3).unwrap();
        let values: Vec<f64> = r.iter().collect();
        let expected = [1.0, 0.7, 0.4, 0.1];
        for (value, expected) in values.iter().zip(expected) {
            assert_relative_eq!(*value, expected, epsilon = 1e-12);
        }
        assert_eq!(vrange(-2, 2).iter().rev().collect::<Vec<_>>(), vec![1, 0, -1, -2]);
    }

    #[test]
    fn test_copy_to_prefix() {
        let mut dst = [0u32; 3];
        vrange(10u32, 20).copy_to(&mut dst);
        assert_eq!(dst, [10, 11, 12]);
    }

    #[test]
    fn test_range_arrays() {
        let a = range(0, 4);
        assert_eq!(a.shape(), &[4]);
        assert_eq!(a.to_vec(), vec![0, 1, 2, 3]);
        let b = range_step(0.0f32, 1.0, 0.5).unwrap();
        assert_eq!(b.to_vec(), vec![0.0, 0.5]);
        assert!(range(3, 3).is_empty());
    }

    #[test]
    fn test_slices_are_sources() {
        let data = vec![4, 5, 6];
        assert_eq!(ElementSource::len(&data), 3);
        assert_eq!(data.at(1), 5);
    }
}
