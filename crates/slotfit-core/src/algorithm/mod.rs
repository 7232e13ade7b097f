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

use crate::math::interval::ClosedInterval;
use num_traits::PrimInt;

/// Checks whether the given intervals are sorted ascending by start.
///
/// Overlaps are allowed; only the order of the start bounds is checked.
#[inline(always)]
pub fn is_sorted_by_start<T>(intervals: &[ClosedInterval<T>]) -> bool
where
    T: PrimInt,
{
    intervals.windows(2).all(|w| w[0].start() <= w[1].start())
}

/// Checks whether the given intervals are pairwise disjoint and sorted by start.
///
/// Adjacent intervals such as `[0, 4]` and `[5, 9]` count as disjoint.
#[inline(always)]
pub fn are_disjoint_and_sorted<T>(intervals: &[ClosedInterval<T>]) -> bool
where
    T: PrimInt,
{
    intervals.windows(2).all(|w| w[0].end() < w[1].start())
}

#[cfg(test)]
mod tests {
    use super::*;

    type IntegerType = i64;

    fn iv(s: IntegerType, e: IntegerType) -> ClosedInterval<IntegerType> {
        ClosedInterval::new(s, e)
    }

    #[test]
    fn test_empty_and_single_are_sorted_and_disjoint() {
        let empty: Vec<ClosedInterval<IntegerType>> = vec![];
        assert!(is_sorted_by_start(&empty));
        assert!(are_disjoint_and_sorted(&empty));

        let single = vec![iv(0, 10)];
        assert!(is_sorted_by_start(&single));
        assert!(are_disjoint_and_sorted(&single));
    }

    #[test]
    fn test_overlapping_sorted_is_not_disjoint() {
        let v = vec![iv(0, 10), iv(5, 15)];
        assert!(is_sorted_by_start(&v));
        assert!(!are_disjoint_and_sorted(&v));
    }

    #[test]
    fn test_touching_closed_bounds_overlap() {
        // [0, 10] and [10, 20] share the point 10.
        let v = vec![iv(0, 10), iv(10, 20)];
        assert!(!are_disjoint_and_sorted(&v));

        let v = vec![iv(0, 9), iv(10, 20)];
        assert!(are_disjoint_and_sorted(&v));
    }

    #[test]
    fn test_unsorted() {
        let v = vec![iv(10, 20), iv(0, 5)];
        assert!(!is_sorted_by_start(&v));
        assert!(!are_disjoint_and_sorted(&v));
    }
}
