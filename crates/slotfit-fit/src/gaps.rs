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
use slotfit_core::{
    algorithm::{are_disjoint_and_sorted, is_sorted_by_start},
    math::interval::ClosedInterval,
};

/// Returns the free gaps of `[left_bound, right_bound]` not covered by `busy`.
///
/// `busy` must be sorted by start. Overlapping, nested or adjacent busy
/// intervals are tolerated: the sweep cursor only moves forward, so they
/// simply shrink or remove a gap. Busy time outside the window is ignored and
/// every emitted gap lies inside the window.
///
/// # Examples
///
/// ```rust
/// # use slotfit_fit::gaps::extract_gaps;
/// # use slotfit_core::math::interval::ClosedInterval;
/// let busy = [ClosedInterval::new(20, 39)];
/// assert_eq!(
///     extract_gaps(&busy, 0, 59),
///     vec![ClosedInterval::new(0, 19), ClosedInterval::new(40, 59)]
/// );
/// ```
pub fn extract_gaps<T>(
    busy: &[ClosedInterval<T>],
    left_bound: T,
    right_bound: T,
) -> Vec<ClosedInterval<T>>
where
    T: PrimInt,
{
    debug_assert!(
        left_bound <= right_bound,
        "called extract_gaps with an inverted window"
    );
    debug_assert!(
        is_sorted_by_start(busy),
        "called extract_gaps with unsorted busy intervals"
    );

    let mut gaps = Vec::with_capacity(busy.len() + 1);
    let mut cursor = left_bound;
    let mut timeline_exhausted = false;

    for interval in busy {
        if cursor > right_bound {
            break;
        }
        if cursor < interval.start() {
            // cursor < start, so start - 1 cannot underflow.
            let end = (interval.start() - T::one()).min(right_bound);
            gaps.push(ClosedInterval::new_unchecked(cursor, end));
        }
        match interval.end().checked_add(&T::one()) {
            Some(next) => cursor = cursor.max(next),
            // Busy until the end of the representable timeline.
            None => {
                timeline_exhausted = true;
                break;
            }
        }
    }

    if !timeline_exhausted && cursor <= right_bound {
        gaps.push(ClosedInterval::new_unchecked(cursor, right_bound));
    }
    debug_assert!(
        are_disjoint_and_sorted(&gaps),
        "extract_gaps produced overlapping or unordered gaps"
    );
    gaps
}
