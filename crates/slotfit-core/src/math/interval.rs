// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use num_traits::PrimInt;
use std::ops::RangeInclusive;

/// A closed interval `[start, end]` over an integer timeline.
///
/// Both bounds are part of the interval. A closed interval can never be
/// empty: the shortest interval `[t, t]` covers exactly one unit.
///
/// # Invariants
/// `start` must always be less than or equal to `end`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClosedInterval<T>
where
    T: PrimInt,
{
    start: T,
    end: T,
}

impl<T> ClosedInterval<T>
where
    T: PrimInt,
{
    /// Creates a new `ClosedInterval`.
    ///
    /// # Panics
    ///
    /// Panics if `start > end`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use slotfit_core::math::interval::ClosedInterval;
    ///
    /// let iv = ClosedInterval::new(0, 9);
    /// assert_eq!(iv.len(), 10);
    /// ```
    #[inline]
    pub fn new(start: T, end: T) -> Self {
        assert!(
            start <= end,
            "Invalid interval: start must be less than or equal to end"
        );
        Self { start, end }
    }

    /// Creates a new `ClosedInterval` if the inputs are valid.
    ///
    /// Returns `None` if `start > end`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use slotfit_core::math::interval::ClosedInterval;
    ///
    /// assert!(ClosedInterval::try_new(0, 10).is_some());
    /// assert!(ClosedInterval::try_new(5, 5).is_some());
    /// assert!(ClosedInterval::try_new(10, 0).is_none());
    /// ```
    #[inline]
    pub fn try_new(start: T, end: T) -> Option<Self> {
        if start <= end {
            Some(Self { start, end })
        } else {
            None
        }
    }

    /// Creates a new `ClosedInterval` without checking the invariant in release builds.
    ///
    /// The caller must ensure `start <= end`; a `debug_assert!` catches
    /// violations during development.
    #[inline]
    pub fn new_unchecked(start: T, end: T) -> Self {
        debug_assert!(
            start <= end,
            "Invalid interval: start must be less than or equal to end"
        );
        Self { start, end }
    }

    /// Returns the inclusive start bound of the interval.
    #[inline]
    pub const fn start(&self) -> T {
        self.start
    }

    /// Returns the inclusive end bound of the interval.
    #[inline]
    pub const fn end(&self) -> T {
        self.end
    }

    /// Returns `end - start`, or `None` if the difference is not representable in `T`.
    ///
    /// The span is one less than the number of covered units. It only fails to
    /// exist for intervals stretching across (nearly) the whole range of a signed type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use slotfit_core::math::interval::ClosedInterval;
    ///
    /// assert_eq!(ClosedInterval::new(10, 19).span(), Some(9));
    /// assert_eq!(ClosedInterval::new(i8::MIN, i8::MAX).span(), None);
    /// ```
    #[inline]
    pub fn span(&self) -> Option<T> {
        self.end.checked_sub(&self.start)
    }

    /// Returns the number of units covered by the interval, or `None` on overflow.
    #[inline]
    pub fn checked_len(&self) -> Option<T> {
        self.span().and_then(|s| s.checked_add(&T::one()))
    }

    /// Returns the number of units covered by the interval (`end - start + 1`).
    ///
    /// # Panics
    ///
    /// Panics if the length is not representable in `T`. Use
    /// [`ClosedInterval::checked_len`] for intervals that may cover the whole range of `T`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use slotfit_core::math::interval::ClosedInterval;
    ///
    /// assert_eq!(ClosedInterval::new(16, 20).len(), 5);
    /// assert_eq!(ClosedInterval::new(7, 7).len(), 1);
    /// ```
    #[inline]
    pub fn len(&self) -> T {
        match self.checked_len() {
            Some(len) => len,
            None => panic!("called `ClosedInterval::len` on an interval whose length overflows"),
        }
    }

    /// Returns `true` if a block of `length` units fits inside the interval.
    ///
    /// Non-positive lengths never fit. Intervals whose length overflows `T`
    /// accept every positive length.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use slotfit_core::math::interval::ClosedInterval;
    ///
    /// let gap = ClosedInterval::new(0, 19);
    /// assert!(gap.fits(20));
    /// assert!(!gap.fits(21));
    /// assert!(!gap.fits(0));
    /// ```
    #[inline]
    pub fn fits(&self, length: T) -> bool {
        if length < T::one() {
            return false;
        }
        match self.span() {
            Some(span) => span >= length - T::one(),
            None => true,
        }
    }

    /// Splits off the first `length` units of the interval.
    ///
    /// Returns the consumed head `[start, start + length - 1]` together with the
    /// remaining tail `[start + length, end]`, or `None` for the tail when the
    /// head consumed the interval completely. Returns `None` if the block does
    /// not fit (see [`ClosedInterval::fits`]).
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use slotfit_core::math::interval::ClosedInterval;
    ///
    /// let gap = ClosedInterval::new(40, 59);
    /// let (head, tail) = gap.split_front(10).unwrap();
    /// assert_eq!(head, ClosedInterval::new(40, 49));
    /// assert_eq!(tail, Some(ClosedInterval::new(50, 59)));
    ///
    /// let (head, tail) = ClosedInterval::new(0, 4).split_front(5).unwrap();
    /// assert_eq!(head, ClosedInterval::new(0, 4));
    /// assert_eq!(tail, None);
    /// ```
    #[inline]
    pub fn split_front(&self, length: T) -> Option<(Self, Option<Self>)> {
        if !self.fits(length) {
            return None;
        }

        // `fits` guarantees `start + length - 1 <= end`, so neither step overflows.
        let head_end = self.start + (length - T::one());
        let head = Self::new_unchecked(self.start, head_end);
        let tail = if head_end < self.end {
            Some(Self::new_unchecked(head_end + T::one(), self.end))
        } else {
            None
        };
        Some((head, tail))
    }

    /// Returns `true` if the two closed intervals share at least one point.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use slotfit_core::math::interval::ClosedInterval;
    ///
    /// let a = ClosedInterval::new(0, 10);
    /// assert!(a.intersects(ClosedInterval::new(10, 20)));
    /// assert!(!a.intersects(ClosedInterval::new(11, 20)));
    /// ```
    #[inline]
    pub fn intersects(&self, other: Self) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Returns `true` if `other` lies completely within `self`.
    #[inline]
    pub fn contains_interval(&self, other: Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Converts the interval into an `(start, end)` pair.
    #[inline]
    pub const fn into_pair(self) -> (T, T) {
        (self.start, self.end)
    }
}

impl<T> std::fmt::Debug for ClosedInterval<T>
where
    T: PrimInt + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}, {:?}]", self.start, self.end)
    }
}

impl<T> std::fmt::Display for ClosedInterval<T>
where
    T: PrimInt + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

impl<T> From<ClosedInterval<T>> for (T, T)
where
    T: PrimInt,
{
    #[inline]
    fn from(iv: ClosedInterval<T>) -> Self {
        iv.into_pair()
    }
}

impl<T> From<ClosedInterval<T>> for RangeInclusive<T>
where
    T: PrimInt,
{
    #[inline]
    fn from(iv: ClosedInterval<T>) -> Self {
        iv.start..=iv.end
    }
}

impl<T> TryFrom<RangeInclusive<T>> for ClosedInterval<T>
where
    T: PrimInt,
{
    type Error = RangeInclusive<T>;

    /// Fails (returning the range) when the range is empty.
    #[inline]
    fn try_from(range: RangeInclusive<T>) -> Result<Self, Self::Error> {
        let (start, end) = (*range.start(), *range.end());
        Self::try_new(start, end).ok_or(range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type IntegerType = i64;

    fn iv(s: IntegerType, e: IntegerType) -> ClosedInterval<IntegerType> {
        ClosedInterval::new(s, e)
    }

    #[test]
    fn test_construction_valid() {
        let iv = iv(10, 20);
        assert_eq!(iv.start(), 10);
        assert_eq!(iv.end(), 20);
        assert_eq!(iv.len(), 11);
    }

    #[test]
    fn test_single_point_interval_has_length_one() {
        let iv = iv(7, 7);
        assert_eq!(iv.len(), 1);
        assert_eq!(iv.span(), Some(0));
        assert!(iv.fits(1));
        assert!(!iv.fits(2));
    }

    #[test]
    fn test_try_new() {
        assert!(ClosedInterval::try_new(5, 10).is_some());
        assert!(ClosedInterval::try_new(5, 5).is_some());
        assert!(ClosedInterval::try_new(10, 5).is_none());
    }

    #[test]
    #[should_panic(expected = "Invalid interval")]
    fn test_new_panic() {
        ClosedInterval::new(10, 5);
    }

    #[test]
    fn test_len_overflow_is_reported_by_checked_len() {
        let full = ClosedInterval::new(i8::MIN, i8::MAX);
        assert_eq!(full.span(), None);
        assert_eq!(full.checked_len(), None);
        assert!(full.fits(i8::MAX));

        let almost = ClosedInterval::new(0i8, i8::MAX);
        assert_eq!(almost.span(), Some(i8::MAX));
        assert_eq!(almost.checked_len(), None);
        assert!(almost.fits(i8::MAX));
    }

    #[test]
    #[should_panic(expected = "overflows")]
    fn test_len_panics_on_overflow() {
        ClosedInterval::new(0u8, u8::MAX).len();
    }

    #[test]
    fn test_fits_boundaries() {
        let gap = iv(0, 19);
        assert!(gap.fits(1));
        assert!(gap.fits(20));
        assert!(!gap.fits(21));
        assert!(!gap.fits(0));
        assert!(!gap.fits(-3));
    }

    #[test]
    fn test_split_front_partial_and_flush() {
        let gap = iv(16, 20);
        let (head, tail) = gap.split_front(3).unwrap();
        assert_eq!(head, iv(16, 18));
        assert_eq!(tail, Some(iv(19, 20)));

        let (head, tail) = gap.split_front(5).unwrap();
        assert_eq!(head, gap);
        assert_eq!(tail, None);

        assert!(gap.split_front(6).is_none());
    }

    #[test]
    fn test_split_front_at_type_maximum() {
        let gap = ClosedInterval::new(i64::MAX - 4, i64::MAX);
        let (head, tail) = gap.split_front(5).unwrap();
        assert_eq!(head, gap);
        assert_eq!(tail, None);
    }

    #[test]
    fn test_intersects_closed_bounds() {
        let a = iv(0, 10);
        assert!(a.intersects(iv(-5, 0)));
        assert!(a.intersects(iv(2, 8)));
        assert!(a.intersects(iv(10, 15)));
        assert!(!a.intersects(iv(11, 15)));
        assert!(!a.intersects(iv(-5, -1)));
    }

    #[test]
    fn test_contains() {
        let a = iv(0, 10);
        assert!(a.contains_interval(iv(0, 10)));
        assert!(a.contains_interval(iv(3, 4)));
        assert!(!a.contains_interval(iv(3, 11)));
    }

    #[test]
    fn test_conversions() {
        let pair: (IntegerType, IntegerType) = iv(3, 8).into();
        assert_eq!(pair, (3, 8));

        let range: RangeInclusive<IntegerType> = iv(3, 8).into();
        assert_eq!(range, 3..=8);

        assert_eq!(ClosedInterval::try_from(3..=8), Ok(iv(3, 8)));
        assert!(ClosedInterval::<IntegerType>::try_from(8..=3).is_err());
    }

    #[test]
    fn test_display_and_debug() {
        assert_eq!(format!("{}", iv(1, 2)), "[1, 2]");
        assert_eq!(format!("{:?}", iv(-1, 2)), "[-1, 2]");
    }
}
