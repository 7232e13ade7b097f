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

//! # Scheduler Numeric Trait
//!
//! A single alias for the integer capabilities the scheduler needs, so that
//! generic signatures across the search and solver crates stay short.
//!
//! Signed types are required. Timelines may start before zero (offsets
//! relative to some anchor), and a negative duration must be a reportable
//! contract violation rather than an unrepresentable value.

use num_traits::{PrimInt, Signed};
use std::hash::Hash;

/// A trait alias for numeric types usable as time points and durations.
/// These are the signed integer types `i8`, `i16`, `i32`, `i64`, `i128` and `isize`;
/// unsigned types are rejected at compile time through the `Signed` bound.
pub trait SchedulerNumeric:
    PrimInt + Signed + std::fmt::Debug + std::fmt::Display + Send + Sync + Hash + 'static
{
}

impl<T> SchedulerNumeric for T where
    T: PrimInt + Signed + std::fmt::Debug + std::fmt::Display + Send + Sync + Hash + 'static
{
}

#[cfg(test)]
mod tests {
    use super::SchedulerNumeric;

    fn assert_numeric<T: SchedulerNumeric>() {}

    #[test]
    fn test_signed_primitives_are_scheduler_numeric() {
        assert_numeric::<i8>();
        assert_numeric::<i16>();
        assert_numeric::<i32>();
        assert_numeric::<i64>();
        assert_numeric::<i128>();
        assert_numeric::<isize>();
    }
}
