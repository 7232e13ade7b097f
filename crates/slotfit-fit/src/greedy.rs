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

//! # Best-Fit Greedy
//!
//! Places tasks smallest duration first, each into the free gap whose
//! remaining room is the smallest that still fits it (leftmost on ties), at
//! the front of that gap. Runs in `O(n log n + (n + g) log g)`.
//!
//! This is a heuristic. It places every task whenever it reports `Maximal`,
//! and it places nothing only when no task fits anywhere, but in between it
//! can fall short of the exhaustive optimum: with two gaps of length 5 and
//! durations `[2, 2, 3, 3]` it packs both 2s into one gap and places three
//! tasks, while all four fit.

use crate::gaps::extract_gaps;
use slotfit_core::math::interval::ClosedInterval;
use slotfit_model::{index::TaskIndex, placement::Placement};
use slotfit_search::{
    monitor::search_monitor::{SearchCommand, SearchMonitor},
    num::SchedulerNumeric,
    result::SchedulerOutcome,
    stats::SearchStatisticsBuilder,
    strategy::{SchedulingStrategy, StrategyContext},
};
use std::{
    collections::BTreeSet,
    sync::atomic::AtomicU64,
    time::Instant,
};
use tracing::{debug, instrument, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BestFitGreedy;

impl BestFitGreedy {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

/// Free gaps keyed by remaining span (`end - start`), then position.
///
/// Spans that do not fit `T` saturate at `T::max_value()`; every duration
/// still compares correctly against them.
struct GapIndex<T>
where
    T: SchedulerNumeric,
{
    gaps: Vec<ClosedInterval<T>>,
    by_span: BTreeSet<(T, usize)>,
}

impl<T> GapIndex<T>
where
    T: SchedulerNumeric,
{
    fn new(gaps: Vec<ClosedInterval<T>>) -> Self {
        let by_span = gaps
            .iter()
            .enumerate()
            .map(|(i, g)| (Self::span(g), i))
            .collect();
        Self { gaps, by_span }
    }

    #[inline]
    fn span(gap: &ClosedInterval<T>) -> T {
        gap.span().unwrap_or_else(T::max_value)
    }

    /// Takes `duration` from the front of the tightest gap that fits it.
    fn take(&mut self, duration: T) -> Option<ClosedInterval<T>> {
        let min_span = duration - T::one();
        let &(span, index) = self.by_span.range((min_span, 0)..).next()?;
        self.by_span.remove(&(span, index));

        let (head, tail) = self.gaps[index].split_front(duration)?;
        if let Some(rest) = tail {
            self.gaps[index] = rest;
            self.by_span.insert((Self::span(&rest), index));
        }
        Some(head)
    }
}

impl<T> SchedulingStrategy<T> for BestFitGreedy
where
    T: SchedulerNumeric,
{
    fn name(&self) -> &str {
        "BestFitGreedy"
    }

    #[instrument(level = "debug", skip_all, fields(tasks = context.problem.num_tasks()))]
    fn solve(&self, context: StrategyContext<'_, T>) -> SchedulerOutcome<T> {
        let StrategyContext {
            problem,
            limits,
            monitor: observer,
        } = context;
        let start = Instant::now();
        let n = problem.num_tasks();

        observer.on_enter_search(problem);
        let steps = AtomicU64::new(0);
        let mut monitor = limits.monitor::<T>(start, &steps);
        monitor.on_enter_search(problem);

        let gaps = extract_gaps(
            problem.busy_intervals(),
            problem.left_bound(),
            problem.right_bound(),
        );
        let mut index = GapIndex::new(gaps);

        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by_key(|&i| (problem.durations()[i], i));

        let mut placed: Vec<(TaskIndex, ClosedInterval<T>)> = Vec::with_capacity(n);
        let mut attempts = 0u64;
        let mut abort_reason = None;

        for i in order {
            monitor.on_step();
            observer.on_step();
            let command = match monitor.search_command() {
                SearchCommand::Continue => observer.search_command(),
                terminate => terminate,
            };
            if let SearchCommand::Terminate(reason) = command {
                abort_reason = Some(reason);
                break;
            }
            attempts += 1;

            match index.take(problem.durations()[i]) {
                Some(interval) => placed.push((TaskIndex::new(i), interval)),
                // Durations only grow from here on.
                None => break,
            }
        }

        placed.sort_unstable_by_key(|&(task, _)| task.get());
        let (tasks, intervals) = placed.into_iter().unzip();
        let placement = Placement::new(tasks, intervals);
        if !placement.is_empty() {
            observer.on_placement_found(&placement);
        }
        monitor.on_exit_search();
        observer.on_exit_search();

        let statistics = SearchStatisticsBuilder::new()
            .fit_attempts(attempts)
            .improvements(u64::from(!placement.is_empty()))
            .solve_duration(start.elapsed())
            .build();

        match abort_reason {
            Some(reason) => {
                warn!(%reason, placed = placement.len(), "best-fit greedy abandoned");
                SchedulerOutcome::aborted(placement, reason, statistics)
            }
            None => {
                debug!(placed = placement.len(), "best-fit greedy finished");
                SchedulerOutcome::heuristic(placement, n, statistics)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exhaustive::ExhaustiveSearch;
    use slotfit_model::problem::Problem;
    use slotfit_search::{
        monitor::search_monitor::NoOpMonitor,
        result::{SchedulerResult, TerminationReason},
        strategy::SearchLimits,
    };

    type IntegerType = i64;

    fn iv(s: IntegerType, e: IntegerType) -> ClosedInterval<IntegerType> {
        ClosedInterval::new(s, e)
    }

    fn run<S>(strategy: &S, problem: &Problem<IntegerType>) -> SchedulerOutcome<IntegerType>
    where
        S: SchedulingStrategy<IntegerType>,
    {
        let mut observer = NoOpMonitor;
        strategy.solve(StrategyContext::new(problem, SearchLimits::none(), &mut observer))
    }

    #[test]
    fn test_places_all_when_everything_fits() {
        let problem = Problem::new(&[40, 30], &[], 0, 99).unwrap();
        let outcome = run(&BestFitGreedy, &problem);
        assert!(outcome.is_maximal());
        let placement = outcome.into_placement().unwrap();
        assert_eq!(placement.intervals(), &[iv(30, 69), iv(0, 29)]);
        placement.verify(&problem).unwrap();
    }

    #[test]
    fn test_prefers_tightest_gap() {
        // Gaps [0, 9] and [20, 24]; the 5 goes into the tighter second gap.
        let problem = Problem::new(&[5, 10], &[(10, 19)], 0, 24).unwrap();
        let placement = run(&BestFitGreedy, &problem).into_placement().unwrap();
        assert_eq!(placement.intervals(), &[iv(20, 24), iv(0, 9)]);
    }

    #[test]
    fn test_ties_go_to_leftmost_gap() {
        let problem = Problem::new(&[3], &[(5, 9)], 0, 14).unwrap();
        let placement = run(&BestFitGreedy, &problem).into_placement().unwrap();
        assert_eq!(placement.intervals(), &[iv(0, 2)]);
    }

    #[test]
    fn test_partial_placement_is_heuristic() {
        let problem = Problem::new(&[30, 10], &[(20, 39)], 0, 59).unwrap();
        let outcome = run(&BestFitGreedy, &problem);
        assert_eq!(outcome.reason, TerminationReason::HeuristicCompleted);
        let placement = outcome.into_placement().unwrap();
        assert_eq!(placement.tasks(), &[TaskIndex::new(1)]);
        assert_eq!(placement.intervals(), &[iv(0, 9)]);
    }

    #[test]
    fn test_nothing_fits_is_no_fit() {
        let problem = Problem::new(&[8, 9], &[(3, 3)], 0, 9).unwrap();
        assert_eq!(run(&BestFitGreedy, &problem).result, SchedulerResult::NoFit);

        let empty = Problem::<IntegerType>::new(&[], &[], 0, 9).unwrap();
        assert_eq!(run(&BestFitGreedy, &empty).result, SchedulerResult::NoFit);
    }

    #[test]
    fn test_falls_short_of_exhaustive_optimum() {
        let problem = Problem::new(&[2, 2, 3, 3], &[(5, 5)], 0, 10).unwrap();
        let greedy = run(&BestFitGreedy, &problem).into_placement().unwrap();
        let exact = run(&ExhaustiveSearch::new(), &problem)
            .into_placement()
            .unwrap();
        assert_eq!(greedy.len(), 3);
        assert_eq!(exact.len(), 4);
        greedy.verify(&problem).unwrap();
    }

    #[test]
    fn test_handles_full_numeric_range() {
        let problem =
            Problem::new(&[IntegerType::MAX], &[], IntegerType::MIN, IntegerType::MAX).unwrap();
        let placement = run(&BestFitGreedy, &problem).into_placement().unwrap();
        assert_eq!(
            placement.intervals(),
            &[iv(IntegerType::MIN, IntegerType::MIN + (IntegerType::MAX - 1))]
        );
    }
}
