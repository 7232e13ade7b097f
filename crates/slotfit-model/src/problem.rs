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

use crate::index::TaskIndex;
use num_traits::PrimInt;
use slotfit_core::math::interval::ClosedInterval;

/// Estimated size of the exhaustive search space.
///
/// The exhaustive scheduler tries every ordering of every subset of the
/// tasks, i.e. $\sum_{k=0}^{N} \frac{N!}{(N-k)!}$ ordered fit attempts for
/// $N$ tasks. That number leaves `u64` behind at $N = 20$, so it is stored in
/// **logarithmic space** ($\log_{10}$).
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, PartialOrd)]
pub struct Complexity {
    log_val: f64,
}

impl Complexity {
    /// Calculates the complexity for a given number of tasks.
    pub fn new(num_tasks: usize) -> Self {
        let log10_add = |a: f64, b: f64| -> f64 {
            let max = a.max(b);
            let min = a.min(b);
            max + (1.0 + 10.0_f64.powf(min - max)).log10()
        };

        // Level k holds the N!/(N-k)! orderings of k tasks; level 0 is the empty ordering.
        let mut level_log = 0.0;
        let mut total_log = 0.0;
        for k in 1..=num_tasks {
            let remaining = (num_tasks - k + 1) as f64;
            level_log += remaining.log10();
            total_log = log10_add(total_log, level_log);
        }

        Complexity { log_val: total_log }
    }

    /// Returns the percentage of the search space covered by `attempts` fit attempts.
    ///
    /// Spaces beyond $10^{15}$ report `0.0`; such searches never finish anyway.
    pub fn coverage(&self, attempts: u64) -> Option<f64> {
        if self.log_val > 15.0 {
            return Some(0.0);
        }

        let total_size = 10.0_f64.powf(self.log_val);
        if total_size == 0.0 {
            return None;
        }

        Some((attempts as f64 / total_size) * 100.0)
    }

    /// Returns the order of magnitude, e.g. `6` for $9.86 \times 10^{6}$.
    #[inline]
    pub fn exponent(&self) -> u64 {
        self.log_val.floor() as u64
    }

    /// Returns the coefficient, e.g. `9.86` for $9.86 \times 10^{6}$.
    #[inline]
    pub fn mantissa(&self) -> f64 {
        10.0_f64.powf(self.log_val - self.log_val.floor())
    }

    /// Returns the raw log10 value.
    #[inline]
    pub fn raw(&self) -> f64 {
        self.log_val
    }
}

impl std::fmt::Display for Complexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} × 10^{}", self.mantissa(), self.exponent())
    }
}

impl std::fmt::Debug for Complexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Complexity(log10={:.4})", self.log_val)
    }
}

/// Contract violations detected while building a [`Problem`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProblemError<T>
where
    T: std::fmt::Debug + std::fmt::Display,
{
    /// The bounding window has `left_bound > right_bound`.
    #[error("invalid window: left bound {left} is greater than right bound {right}")]
    InvalidWindow { left: T, right: T },

    /// A busy interval has `start > end`.
    #[error("invalid busy interval #{index}: start {start} is greater than end {end}")]
    InvalidBusyInterval { index: usize, start: T, end: T },

    /// A task duration is zero or negative.
    #[error("{task} has non-positive duration {duration}")]
    NonPositiveDuration { task: TaskIndex, duration: T },
}

/// An immutable, validated scheduling problem.
///
/// - `durations[task]`: the contiguous length task `task` needs.
/// - `busy`: committed intervals, sorted ascending by start. They may overlap.
/// - `window`: the bounding window `[left_bound, right_bound]` every placement must lie in.
///
/// Construction goes through [`ProblemBuilder`] (or [`Problem::new`]), which
/// rejects every contract violation up front.
#[derive(Clone, PartialEq, Eq)]
pub struct Problem<T>
where
    T: PrimInt,
{
    durations: Vec<T>,
    busy: Vec<ClosedInterval<T>>,
    window: ClosedInterval<T>,
}

impl<T> Problem<T>
where
    T: PrimInt + std::fmt::Debug + std::fmt::Display,
{
    /// Validates raw inputs and builds a problem in one call.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use slotfit_model::problem::Problem;
    ///
    /// let problem = Problem::new(&[30, 10], &[(20, 39)], 0, 59).unwrap();
    /// assert_eq!(problem.num_tasks(), 2);
    /// assert_eq!(problem.busy_intervals().len(), 1);
    ///
    /// assert!(Problem::new(&[30], &[], 10, 0).is_err());
    /// ```
    pub fn new(
        durations: &[T],
        busy: &[(T, T)],
        left_bound: T,
        right_bound: T,
    ) -> Result<Self, ProblemError<T>> {
        let mut builder = ProblemBuilder::new(left_bound, right_bound);
        builder.add_tasks(durations.iter().copied());
        builder.add_busy_intervals(busy.iter().copied());
        builder.build()
    }
}

impl<T> Problem<T>
where
    T: PrimInt,
{
    /// Returns the number of tasks.
    #[inline]
    pub fn num_tasks(&self) -> usize {
        self.durations.len()
    }

    /// Returns `true` if there are no tasks to place.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }

    /// Returns all durations, indexed by `TaskIndex`.
    #[inline]
    pub fn durations(&self) -> &[T] {
        &self.durations
    }

    /// Returns the duration of a specific task.
    ///
    /// # Panics
    ///
    /// Panics if `task_index` is out of bounds.
    #[inline]
    pub fn duration(&self, task_index: TaskIndex) -> T {
        let index = task_index.get();
        debug_assert!(
            index < self.num_tasks(),
            "called `Problem::duration` with task index out of bounds: the len is {} but the index is {}",
            self.num_tasks(),
            index
        );

        self.durations[index]
    }

    /// Returns the busy intervals, sorted ascending by start.
    #[inline]
    pub fn busy_intervals(&self) -> &[ClosedInterval<T>] {
        &self.busy
    }

    /// Returns the bounding window.
    #[inline]
    pub fn window(&self) -> ClosedInterval<T> {
        self.window
    }

    /// Returns the inclusive left bound of the window.
    #[inline]
    pub fn left_bound(&self) -> T {
        self.window.start()
    }

    /// Returns the inclusive right bound of the window.
    #[inline]
    pub fn right_bound(&self) -> T {
        self.window.end()
    }

    /// Returns the size of the exhaustive search space for this problem.
    #[inline]
    pub fn complexity(&self) -> Complexity {
        Complexity::new(self.num_tasks())
    }
}

impl<T> std::fmt::Debug for Problem<T>
where
    T: PrimInt + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Problem")
            .field("durations", &self.durations)
            .field("busy", &self.busy)
            .field("window", &self.window)
            .finish()
    }
}

impl<T> std::fmt::Display for Problem<T>
where
    T: PrimInt + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Problem(tasks: {}, busy: {}, window: {})",
            self.durations.len(),
            self.busy.len(),
            self.window
        )
    }
}

/// Mutable builder for [`Problem`].
///
/// Inputs are recorded as given; validation happens in [`ProblemBuilder::build`]
/// so that the first contract violation can be reported with its position.
#[derive(Clone, Debug)]
pub struct ProblemBuilder<T> {
    left_bound: T,
    right_bound: T,
    durations: Vec<T>,
    busy: Vec<(T, T)>,
}

impl<T> ProblemBuilder<T>
where
    T: PrimInt + std::fmt::Debug + std::fmt::Display,
{
    /// Creates a builder for the window `[left_bound, right_bound]`.
    #[inline]
    pub fn new(left_bound: T, right_bound: T) -> Self {
        Self {
            left_bound,
            right_bound,
            durations: Vec::new(),
            busy: Vec::new(),
        }
    }

    /// Returns the number of tasks added so far.
    #[inline]
    pub fn num_tasks(&self) -> usize {
        self.durations.len()
    }

    /// Appends a task and returns its index.
    #[inline]
    pub fn add_task(&mut self, duration: T) -> TaskIndex {
        self.durations.push(duration);
        TaskIndex::new(self.durations.len() - 1)
    }

    /// Appends several tasks in order.
    pub fn add_tasks<I>(&mut self, durations: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
    {
        self.durations.extend(durations);
        self
    }

    /// Records a busy interval `[start, end]`.
    #[inline]
    pub fn add_busy_interval(&mut self, start: T, end: T) -> &mut Self {
        self.busy.push((start, end));
        self
    }

    /// Records several busy intervals.
    pub fn add_busy_intervals<I>(&mut self, intervals: I) -> &mut Self
    where
        I: IntoIterator<Item = (T, T)>,
    {
        self.busy.extend(intervals);
        self
    }

    /// Validates the inputs and builds the problem.
    ///
    /// Busy intervals are sorted ascending by start (ties by end); the order
    /// the caller supplied them in does not matter.
    pub fn build(self) -> Result<Problem<T>, ProblemError<T>> {
        let window = ClosedInterval::try_new(self.left_bound, self.right_bound).ok_or(
            ProblemError::InvalidWindow {
                left: self.left_bound,
                right: self.right_bound,
            },
        )?;

        if let Some((task, &duration)) = self
            .durations
            .iter()
            .enumerate()
            .find(|(_, d)| **d <= T::zero())
        {
            return Err(ProblemError::NonPositiveDuration {
                task: TaskIndex::new(task),
                duration,
            });
        }

        let mut busy = self
            .busy
            .iter()
            .enumerate()
            .map(|(index, &(start, end))| {
                ClosedInterval::try_new(start, end).ok_or(ProblemError::InvalidBusyInterval {
                    index,
                    start,
                    end,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        busy.sort_unstable();

        Ok(Problem {
            durations: self.durations,
            busy,
            window,
        })
    }
}
