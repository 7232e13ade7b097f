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

//! Wall-clock helpers for single-day scheduling.
//!
//! The scheduler itself only knows integers. Callers planning a day usually
//! think in `HH:MM` and in minutes since midnight, and have blocks (sleep,
//! late events) that cross midnight. The scheduler rejects such wrap-around
//! ranges, so they have to be split into bounded pieces first; this module
//! provides that split together with a small clock-time type.

use num_traits::PrimInt;
use slotfit_core::math::interval::ClosedInterval;
use std::str::FromStr;

/// Number of minutes in a day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// A time of day with minute resolution, `00:00` to `23:59`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct ClockTime {
    minutes: u32,
}

/// Failure to interpret an `HH:MM` string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClockTimeError {
    #[error("expected a time formatted as HH:MM, got '{0}'")]
    Malformed(String),

    #[error("time {hours:02}:{minutes:02} is outside 00:00-23:59")]
    OutOfRange { hours: u32, minutes: u32 },
}

impl ClockTime {
    /// Midnight, `00:00`.
    pub const MIDNIGHT: Self = Self { minutes: 0 };

    /// Creates a clock time from hours and minutes.
    pub fn new(hours: u32, minutes: u32) -> Result<Self, ClockTimeError> {
        if hours >= 24 || minutes >= 60 {
            return Err(ClockTimeError::OutOfRange { hours, minutes });
        }
        Ok(Self {
            minutes: hours * 60 + minutes,
        })
    }

    /// Creates a clock time from minutes since midnight, or `None` past `23:59`.
    #[inline]
    pub fn from_minutes(minutes: u32) -> Option<Self> {
        (minutes < MINUTES_PER_DAY).then_some(Self { minutes })
    }

    /// Minutes since midnight.
    #[inline]
    pub const fn minutes(&self) -> u32 {
        self.minutes
    }

    #[inline]
    pub const fn hour(&self) -> u32 {
        self.minutes / 60
    }

    #[inline]
    pub const fn minute(&self) -> u32 {
        self.minutes % 60
    }
}

impl FromStr for ClockTime {
    type Err = ClockTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ClockTimeError::Malformed(s.to_string());
        let (h, m) = s.trim().split_once(':').ok_or_else(malformed)?;
        if h.is_empty() || m.len() != 2 {
            return Err(malformed());
        }
        let hours = h.parse::<u32>().map_err(|_| malformed())?;
        let minutes = m.parse::<u32>().map_err(|_| malformed())?;
        Self::new(hours, minutes)
    }
}

impl std::fmt::Display for ClockTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// Splits a range on a cyclic timeline of `period` units into bounded intervals.
///
/// A range with `start <= end` is returned as is. A range with `start > end`
/// wraps past the end of the period and becomes `[start, period - 1]` followed
/// by `[0, end]`. Returns `None` if either bound lies outside `[0, period)`.
///
/// # Examples
///
/// ```rust
/// # use slotfit_model::day::split_wrapping;
/// # use slotfit_core::math::interval::ClosedInterval;
///
/// // Sleep from 23:00 to 06:59.
/// let parts = split_wrapping(23 * 60, 7 * 60 - 1, 24 * 60).unwrap();
/// assert_eq!(
///     parts,
///     vec![ClosedInterval::new(1380, 1439), ClosedInterval::new(0, 419)]
/// );
/// ```
pub fn split_wrapping<T>(start: T, end: T, period: T) -> Option<Vec<ClosedInterval<T>>>
where
    T: PrimInt,
{
    let in_period = |t: T| t >= T::zero() && t < period;
    if !in_period(start) || !in_period(end) {
        return None;
    }

    if start <= end {
        return Some(vec![ClosedInterval::new_unchecked(start, end)]);
    }

    Some(vec![
        ClosedInterval::new_unchecked(start, period - T::one()),
        ClosedInterval::new_unchecked(T::zero(), end),
    ])
}

/// Converts a busy block given in clock times into minute intervals on one day.
///
/// `start` and `end` are both inclusive; a block whose end lies before its
/// start crosses midnight and is split in two.
pub fn clock_block(start: ClockTime, end: ClockTime) -> Vec<ClosedInterval<i64>> {
    // Both bounds are below MINUTES_PER_DAY, so the split cannot fail.
    split_wrapping(
        i64::from(start.minutes()),
        i64::from(end.minutes()),
        i64::from(MINUTES_PER_DAY),
    )
    .unwrap_or_default()
}
