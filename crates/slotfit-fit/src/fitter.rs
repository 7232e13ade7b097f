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
use slotfit_core::math::interval::ClosedInterval;

/// Places durations into free gaps in a fixed order, left to right.
///
/// Each duration goes into the first gap at or after the cursor with enough
/// room, taking the front of that gap. The cursor never moves back, so a later
/// duration is never placed left of an earlier one. The gap template is kept
/// intact; every attempt works on a private scratch copy.
#[derive(Debug, Clone)]
pub struct OrderedFitter<T>
where
    T: PrimInt,
{
    gaps: Vec<ClosedInterval<T>>,
    scratch: Vec<ClosedInterval<T>>,
}

impl<T> OrderedFitter<T>
where
    T: PrimInt,
{
    #[inline]
    pub fn new(gaps: Vec<ClosedInterval<T>>) -> Self {
        let scratch = Vec::with_capacity(gaps.len());
        Self { gaps, scratch }
    }

    #[inline]
    pub fn gaps(&self) -> &[ClosedInterval<T>] {
        &self.gaps
    }

    /// Attempts to place `order`, writing one interval per duration into `out`.
    ///
    /// Returns `false` as soon as a duration cannot be placed; `out` then holds
    /// a partial result the caller must discard.
    pub fn fit_into<I>(&mut self, order: I, out: &mut Vec<ClosedInterval<T>>) -> bool
    where
        I: IntoIterator<Item = T>,
    {
        out.clear();
        self.scratch.clear();
        self.scratch.extend_from_slice(&self.gaps);

        let mut cursor = 0;
        for duration in order {
            loop {
                let Some(gap) = self.scratch.get(cursor) else {
                    return false;
                };
                match gap.split_front(duration) {
                    Some((head, tail)) => {
                        out.push(head);
                        match tail {
                            Some(rest) => self.scratch[cursor] = rest,
                            None => cursor += 1,
                        }
                        break;
                    }
                    None => cursor += 1,
                }
            }
        }
        true
    }

    /// Attempts to place `order`, returning intervals parallel to it.
    pub fn fit(&mut self, order: &[T]) -> Option<Vec<ClosedInterval<T>>> {
        let mut out = Vec::with_capacity(order.len());
        self.fit_into(order.iter().copied(), &mut out).then_some(out)
    }
}

/// One-shot form of [`OrderedFitter::fit`].
pub fn fit<T>(order: &[T], gaps: &[ClosedInterval<T>]) -> Option<Vec<ClosedInterval<T>>>
where
    T: PrimInt,
{
    OrderedFitter::new(gaps.to_vec()).fit(order)
}

#[cfg(test)]
mod tests {
    use super::*;

    type IntegerType = i64;

    fn iv(s: IntegerType, e: IntegerType) -> ClosedInterval<IntegerType> {
        ClosedInterval::new(s, e)
    }

    #[test]
    fn test_fills_single_gap_front_to_back() {
        assert_eq!(
            fit(&[30, 40], &[iv(0, 99)]),
            Some(vec![iv(0, 29), iv(30, 69)])
        );
    }

    #[test]
    fn test_exact_fit_is_flush() {
        assert_eq!(fit(&[20], &[iv(40, 59)]), Some(vec![iv(40, 59)]));
        assert_eq!(fit(&[1], &[iv(5, 5)]), Some(vec![iv(5, 5)]));
    }

    #[test]
    fn test_skips_gaps_that_are_too_small() {
        assert_eq!(
            fit(&[10, 3], &[iv(0, 4), iv(10, 29)]),
            Some(vec![iv(10, 19), iv(20, 22)])
        );
    }

    #[test]
    fn test_cursor_never_moves_back() {
        // 3 would fit in [0, 4], but the cursor already moved past it.
        assert_eq!(fit(&[10, 3], &[iv(0, 4), iv(10, 19)]), None);
        assert_eq!(
            fit(&[3, 10], &[iv(0, 4), iv(10, 19)]),
            Some(vec![iv(0, 2), iv(10, 19)])
        );
    }

    #[test]
    fn test_fails_when_gaps_run_out() {
        assert_eq!(fit(&[10, 10, 10], &[iv(0, 19)]), None);
        assert_eq!(fit(&[1], &[]), None);
    }

    #[test]
    fn test_empty_order_always_fits() {
        assert_eq!(fit::<IntegerType>(&[], &[]), Some(vec![]));
    }

    #[test]
    fn test_template_survives_attempts() {
        let mut fitter = OrderedFitter::new(vec![iv(0, 9)]);
        assert_eq!(fitter.fit(&[10]), Some(vec![iv(0, 9)]));
        assert_eq!(fitter.fit(&[10]), Some(vec![iv(0, 9)]));
        assert_eq!(fitter.gaps(), &[iv(0, 9)]);
    }

    #[test]
    fn test_fit_into_reuses_output_buffer() {
        let mut fitter = OrderedFitter::new(vec![iv(0, 9), iv(20, 29)]);
        let mut out = Vec::new();
        assert!(fitter.fit_into([5, 5, 5], &mut out));
        assert_eq!(out, vec![iv(0, 4), iv(5, 9), iv(20, 24)]);
        assert!(!fitter.fit_into([11], &mut out));
        assert!(fitter.fit_into([2], &mut out));
        assert_eq!(out, vec![iv(0, 1)]);
    }
}
