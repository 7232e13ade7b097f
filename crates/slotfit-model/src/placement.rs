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

use crate::{index::TaskIndex, problem::Problem};
use fixedbitset::FixedBitSet;
use num_traits::PrimInt;
use slotfit_core::math::interval::ClosedInterval;

/// The scheduler's answer: which tasks were placed, and where.
///
/// This struct uses a Structure of Arrays (SoA) layout. Entry `i` pairs
/// `tasks[i]` with `intervals[i]`, and the entries are ordered by ascending
/// task index, i.e. in the original relative order of the chosen subset.
/// `intervals()` alone therefore is the plain "list of intervals aligned to
/// the surviving tasks" answer, while `tasks()` says exactly which tasks
/// survived (no diffing by duration value needed).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Placement<T>
where
    T: PrimInt,
{
    tasks: Vec<TaskIndex>,
    intervals: Vec<ClosedInterval<T>>,
}

/// A broken placement invariant, as reported by [`Placement::verify`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlacementViolation<T>
where
    T: PrimInt + std::fmt::Debug + std::fmt::Display,
{
    /// A task index does not exist in the problem.
    #[error("{task} does not exist in a problem with {num_tasks} tasks")]
    UnknownTask { task: TaskIndex, num_tasks: usize },

    /// Task indices are not strictly increasing.
    #[error("{task} is out of order or placed twice")]
    UnorderedTasks { task: TaskIndex },

    /// An interval's length differs from the task's duration.
    #[error("{task} occupies {interval} but needs {expected} units")]
    LengthMismatch {
        task: TaskIndex,
        interval: ClosedInterval<T>,
        expected: T,
    },

    /// An interval leaves the bounding window.
    #[error("{task} at {interval} lies outside the window {window}")]
    OutsideWindow {
        task: TaskIndex,
        interval: ClosedInterval<T>,
        window: ClosedInterval<T>,
    },

    /// An interval overlaps a busy interval.
    #[error("{task} at {interval} overlaps busy interval {busy}")]
    OverlapsBusy {
        task: TaskIndex,
        interval: ClosedInterval<T>,
        busy: ClosedInterval<T>,
    },

    /// Two placed intervals overlap each other.
    #[error("{first} and {second} overlap")]
    OverlapsTask { first: TaskIndex, second: TaskIndex },
}

impl<T> Default for Placement<T>
where
    T: PrimInt,
{
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> Placement<T>
where
    T: PrimInt,
{
    /// Constructs a new `Placement`.
    ///
    /// # Panics
    ///
    /// Panics if `tasks` and `intervals` have different lengths.
    pub fn new(tasks: Vec<TaskIndex>, intervals: Vec<ClosedInterval<T>>) -> Self {
        assert_eq!(
            tasks.len(),
            intervals.len(),
            "called Placement::new with inconsistent vector lengths: tasks.len() = {}, intervals.len() = {}",
            tasks.len(),
            intervals.len()
        );
        debug_assert!(
            tasks.windows(2).all(|w| w[0] < w[1]),
            "called Placement::new with task indices that are not strictly increasing"
        );

        Self { tasks, intervals }
    }

    /// The placement that schedules nothing.
    #[inline]
    pub const fn empty() -> Self {
        Self {
            tasks: Vec::new(),
            intervals: Vec::new(),
        }
    }

    /// Returns the number of placed tasks.
    #[inline]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns `true` if nothing was placed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Returns the placed tasks in ascending order.
    #[inline]
    pub fn tasks(&self) -> &[TaskIndex] {
        &self.tasks
    }

    /// Returns the placed intervals, aligned with [`Placement::tasks`].
    #[inline]
    pub fn intervals(&self) -> &[ClosedInterval<T>] {
        &self.intervals
    }

    /// Consumes the placement, returning only the intervals.
    #[inline]
    pub fn into_intervals(self) -> Vec<ClosedInterval<T>> {
        self.intervals
    }

    /// Iterates over `(task, interval)` pairs in ascending task order.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (TaskIndex, ClosedInterval<T>)> + '_ {
        self.tasks.iter().copied().zip(self.intervals.iter().copied())
    }

    /// Returns the interval assigned to `task`, or `None` if it was dropped.
    #[inline]
    pub fn interval_for_task(&self, task: TaskIndex) -> Option<ClosedInterval<T>> {
        self.tasks
            .binary_search(&task)
            .ok()
            .map(|pos| self.intervals[pos])
    }

    /// Returns a bitset with one bit per task of the problem; set bits were placed.
    pub fn selection_mask(&self, num_tasks: usize) -> FixedBitSet {
        let mut mask = FixedBitSet::with_capacity(num_tasks);
        for task in &self.tasks {
            mask.insert(task.get());
        }
        mask
    }

    /// Returns the tasks of a `num_tasks`-task problem that were not placed.
    pub fn dropped_tasks(&self, num_tasks: usize) -> Vec<TaskIndex> {
        let mask = self.selection_mask(num_tasks);
        mask.zeroes().map(TaskIndex::new).collect()
    }
}

impl<T> Placement<T>
where
    T: PrimInt + std::fmt::Debug + std::fmt::Display,
{
    /// Checks every placement invariant against `problem`.
    ///
    /// Returns the first violation found: unknown or unordered task indices,
    /// a length that differs from the task's duration, an interval outside the
    /// window, an overlap with a busy interval, or an overlap between two
    /// placed intervals.
    pub fn verify(&self, problem: &Problem<T>) -> Result<(), PlacementViolation<T>> {
        let window = problem.window();

        for (pos, (task, interval)) in self.iter().enumerate() {
            if task.get() >= problem.num_tasks() {
                return Err(PlacementViolation::UnknownTask {
                    task,
                    num_tasks: problem.num_tasks(),
                });
            }
            if pos > 0 && self.tasks[pos - 1] >= task {
                return Err(PlacementViolation::UnorderedTasks { task });
            }

            let expected = problem.duration(task);
            if interval.checked_len() != Some(expected) {
                return Err(PlacementViolation::LengthMismatch {
                    task,
                    interval,
                    expected,
                });
            }

            if !window.contains_interval(interval) {
                return Err(PlacementViolation::OutsideWindow {
                    task,
                    interval,
                    window,
                });
            }

            // Busy intervals are sorted by start, so nothing past `interval.end()` can overlap.
            if let Some(&busy) = problem
                .busy_intervals()
                .iter()
                .take_while(|b| b.start() <= interval.end())
                .find(|b| b.intersects(interval))
            {
                return Err(PlacementViolation::OverlapsBusy {
                    task,
                    interval,
                    busy,
                });
            }
        }

        let mut by_start: Vec<(TaskIndex, ClosedInterval<T>)> = self.iter().collect();
        by_start.sort_unstable_by_key(|(_, iv)| *iv);
        if let Some(w) = by_start.windows(2).find(|w| w[0].1.intersects(w[1].1)) {
            return Err(PlacementViolation::OverlapsTask {
                first: w[0].0,
                second: w[1].0,
            });
        }

        Ok(())
    }
}

impl<T> std::fmt::Display for Placement<T>
where
    T: PrimInt + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Placement Summary")?;
        writeln!(f, "   Placed Tasks: {}", self.len())?;
        writeln!(f)?;

        if self.is_empty() {
            writeln!(f, "   (No tasks placed)")?;
            return Ok(());
        }

        writeln!(f, "   {:<10} | {:<10} | {:<10}", "Task", "Start", "End")?;
        writeln!(f, "   {:-<10}-+-{:-<10}-+-{:-<10}", "", "", "")?;
        for (task, interval) in self.iter() {
            writeln!(
                f,
                "   {:<10} | {:<10} | {:<10}",
                task.get(),
                interval.start(),
                interval.end()
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type IntegerType = i64;

    fn ti(i: usize) -> TaskIndex {
        TaskIndex::new(i)
    }

    fn iv(s: IntegerType, e: IntegerType) -> ClosedInterval<IntegerType> {
        ClosedInterval::new(s, e)
    }

    fn problem(
        durations: &[IntegerType],
        busy: &[(IntegerType, IntegerType)],
        left: IntegerType,
        right: IntegerType,
    ) -> Problem<IntegerType> {
        Problem::new(durations, busy, left, right).unwrap()
    }

    #[test]
    fn test_new_and_basic_accessors() {
        let p = Placement::new(vec![ti(0), ti(2)], vec![iv(0, 9), iv(20, 24)]);
        assert_eq!(p.len(), 2);
        assert!(!p.is_empty());
        assert_eq!(p.tasks(), &[ti(0), ti(2)]);
        assert_eq!(p.intervals(), &[iv(0, 9), iv(20, 24)]);
        assert_eq!(p.interval_for_task(ti(2)), Some(iv(20, 24)));
        assert_eq!(p.interval_for_task(ti(1)), None);
        assert_eq!(p.clone().into_intervals(), vec![iv(0, 9), iv(20, 24)]);
    }

    #[test]
    #[should_panic(expected = "called Placement::new with inconsistent vector lengths")]
    fn test_new_panics_on_length_mismatch() {
        let _ = Placement::new(vec![ti(0), ti(1)], vec![iv(0, 1)]);
    }

    #[test]
    fn test_empty_placement() {
        let p = Placement::<IntegerType>::empty();
        assert!(p.is_empty());
        assert_eq!(p, Placement::default());
        assert_eq!(p.dropped_tasks(3), vec![ti(0), ti(1), ti(2)]);
    }

    #[test]
    fn test_selection_mask_and_dropped_tasks() {
        let p = Placement::new(vec![ti(1), ti(3)], vec![iv(0, 4), iv(10, 14)]);
        let mask = p.selection_mask(4);
        assert!(!mask.contains(0));
        assert!(mask.contains(1));
        assert!(!mask.contains(2));
        assert!(mask.contains(3));
        assert_eq!(p.dropped_tasks(4), vec![ti(0), ti(2)]);
    }

    #[test]
    fn test_verify_accepts_valid_placement() {
        let pr = problem(&[30, 10], &[(20, 39)], 0, 59);
        let p = Placement::new(vec![ti(1)], vec![iv(0, 9)]);
        assert_eq!(p.verify(&pr), Ok(()));
    }

    #[test]
    fn test_verify_flush_gap_is_valid() {
        let pr = problem(&[5], &[(0, 10), (5, 15)], 0, 20);
        let p = Placement::new(vec![ti(0)], vec![iv(16, 20)]);
        assert_eq!(p.verify(&pr), Ok(()));
    }

    #[test]
    fn test_verify_rejects_length_mismatch() {
        let pr = problem(&[10], &[], 0, 59);
        let p = Placement::new(vec![ti(0)], vec![iv(0, 10)]);
        assert_eq!(
            p.verify(&pr),
            Err(PlacementViolation::LengthMismatch {
                task: ti(0),
                interval: iv(0, 10),
                expected: 10
            })
        );
    }

    #[test]
    fn test_verify_rejects_outside_window() {
        let pr = problem(&[10], &[], 0, 59);
        let p = Placement::new(vec![ti(0)], vec![iv(55, 64)]);
        assert!(matches!(
            p.verify(&pr),
            Err(PlacementViolation::OutsideWindow { .. })
        ));
    }

    #[test]
    fn test_verify_rejects_busy_overlap_on_shared_endpoint() {
        let pr = problem(&[10], &[(20, 39)], 0, 59);
        let p = Placement::new(vec![ti(0)], vec![iv(11, 20)]);
        assert_eq!(
            p.verify(&pr),
            Err(PlacementViolation::OverlapsBusy {
                task: ti(0),
                interval: iv(11, 20),
                busy: iv(20, 39)
            })
        );
    }

    #[test]
    fn test_verify_rejects_task_overlap() {
        let pr = problem(&[10, 10], &[], 0, 59);
        let p = Placement::new(vec![ti(0), ti(1)], vec![iv(5, 14), iv(0, 9)]);
        assert_eq!(
            p.verify(&pr),
            Err(PlacementViolation::OverlapsTask {
                first: ti(1),
                second: ti(0)
            })
        );
    }

    #[test]
    fn test_verify_rejects_unknown_task() {
        let pr = problem(&[10], &[], 0, 59);
        let p = Placement::new(vec![ti(3)], vec![iv(0, 9)]);
        assert!(matches!(
            p.verify(&pr),
            Err(PlacementViolation::UnknownTask { num_tasks: 1, .. })
        ));
    }

    #[test]
    fn test_display_formatting() {
        let p = Placement::new(vec![ti(0), ti(1)], vec![iv(0, 29), iv(30, 69)]);
        let displayed = format!("{}", p);

        let mut expected = String::new();
        expected.push_str("Placement Summary\n");
        expected.push_str("   Placed Tasks: 2\n");
        expected.push('\n');
        expected.push_str("   Task       | Start      | End       \n");
        expected.push_str("   -----------+------------+-----------\n");
        expected.push_str("   0          | 0          | 29        \n");
        expected.push_str("   1          | 30         | 69        \n");

        assert_eq!(displayed, expected);
    }

    #[test]
    fn test_display_empty() {
        let displayed = format!("{}", Placement::<IntegerType>::empty());
        assert!(displayed.contains("(No tasks placed)"));
    }
}
