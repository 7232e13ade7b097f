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

//! # Exhaustive Subset Search
//!
//! Visits every subset mask `0 .. 2^n` in ascending order and, for each
//! subset, every ordering until one fits. A subset replaces the incumbent only
//! if it places strictly more tasks, so among the maximal subsets the one with
//! the lowest mask wins. That tie-break is an artifact of enumeration order,
//! not a scheduling preference.
//!
//! Worst case `O(2^n · n!)` ordered fit attempts; only small task counts are
//! tractable, and budgets are enforced through the search limits.
//!
//! With `prune_dominated` enabled, subsets with no more tasks than the
//! incumbent are skipped. Such a subset can never replace the incumbent, so
//! pruning changes the work done but never the result. Skipping jumps
//! straight to the next large enough mask: every mask the loop stops at
//! costs at least one fit attempt, so the limit monitors are polled no
//! matter how much of the mask range is dominated.

use crate::{
    MAX_EXHAUSTIVE_TASKS,
    gaps::extract_gaps,
    subset::{SubsetFit, SubsetFitter, first_mask_with_at_least},
};
use slotfit_model::{placement::Placement, problem::Problem};
use slotfit_search::{
    monitor::search_monitor::{SearchCommand, SearchMonitor},
    num::SchedulerNumeric,
    result::SchedulerOutcome,
    stats::SearchStatisticsBuilder,
    strategy::{SchedulingStrategy, StrategyContext},
};
use std::{sync::atomic::AtomicU64, time::Instant};
use tracing::{debug, instrument, trace, warn};

/// Sequential exhaustive search over subsets and orderings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExhaustiveSearch {
    prune_dominated: bool,
}

impl Default for ExhaustiveSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl ExhaustiveSearch {
    /// Creates a search with dominated-subset pruning enabled.
    #[inline]
    pub fn new() -> Self {
        Self {
            prune_dominated: true,
        }
    }

    #[inline]
    pub fn with_prune_dominated(mut self, prune_dominated: bool) -> Self {
        self.prune_dominated = prune_dominated;
        self
    }

    #[inline]
    pub fn prune_dominated(&self) -> bool {
        self.prune_dominated
    }
}

impl<T> SchedulingStrategy<T> for ExhaustiveSearch
where
    T: SchedulerNumeric,
{
    fn name(&self) -> &str {
        "ExhaustiveSearch"
    }

    fn max_tasks(&self) -> Option<usize> {
        Some(MAX_EXHAUSTIVE_TASKS)
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

        if n == 0 {
            observer.on_exit_search();
            let statistics = SearchStatisticsBuilder::new()
                .solve_duration(start.elapsed())
                .build();
            return SchedulerOutcome::no_fit(statistics);
        }
        if n > MAX_EXHAUSTIVE_TASKS {
            observer.on_exit_search();
            warn!(
                tasks = n,
                limit = MAX_EXHAUSTIVE_TASKS,
                "too many tasks to enumerate subsets"
            );
            let statistics = SearchStatisticsBuilder::new()
                .solve_duration(start.elapsed())
                .build();
            return SchedulerOutcome::aborted(
                Placement::empty(),
                format!("{n} tasks exceed the enumeration limit of {MAX_EXHAUSTIVE_TASKS}"),
                statistics,
            );
        }

        let gaps = extract_gaps(
            problem.busy_intervals(),
            problem.left_bound(),
            problem.right_bound(),
        );
        debug!(
            gaps = gaps.len(),
            prune = self.prune_dominated,
            "starting exhaustive search"
        );

        let steps = AtomicU64::new(0);
        let mut monitor = limits.monitor::<T>(start, &steps);
        monitor.add_monitor(ForwardingMonitor(observer));
        monitor.on_enter_search(problem);

        let mut fitter = SubsetFitter::new(problem.durations(), gaps);
        let mut best = Placement::empty();
        let mut subsets_pruned = 0u64;
        let mut improvements = 0u64;
        let mut abort_reason = None;

        let end = 1u64 << n;
        // Mask 0 is the empty subset and is never tried.
        let mut subsets_examined = 1u64;
        let mut from = 1u64;
        loop {
            let min_tasks = if self.prune_dominated {
                best.len() as u32 + 1
            } else {
                1
            };
            let Some(mask) = first_mask_with_at_least(from, min_tasks, end) else {
                subsets_examined += end - from;
                subsets_pruned += end - from;
                break;
            };
            subsets_examined += mask - from + 1;
            subsets_pruned += mask - from;
            from = mask + 1;

            match fitter.try_subset(mask, &mut monitor) {
                SubsetFit::Fits(placement) => {
                    if placement.len() > best.len() {
                        trace!(mask, placed = placement.len(), "new incumbent");
                        monitor.on_placement_found(&placement);
                        improvements += 1;
                        best = placement;
                        if best.len() == n {
                            break;
                        }
                    }
                }
                SubsetFit::NoOrderingFits => {}
                SubsetFit::Aborted(reason) => {
                    abort_reason = Some(reason);
                    break;
                }
            }
        }

        monitor.on_exit_search();

        let statistics = SearchStatisticsBuilder::new()
            .subsets_examined(subsets_examined)
            .subsets_pruned(subsets_pruned)
            .fit_attempts(fitter.attempts())
            .improvements(improvements)
            .solve_duration(start.elapsed())
            .build();

        match abort_reason {
            Some(reason) => {
                warn!(%reason, placed = best.len(), "exhaustive search abandoned");
                SchedulerOutcome::aborted(best, reason, statistics)
            }
            None => {
                debug!(
                    placed = best.len(),
                    attempts = statistics.fit_attempts,
                    "exhaustive search finished"
                );
                SchedulerOutcome::exhausted(best, statistics)
            }
        }
    }
}

/// Lets the caller's observer ride inside the limits composite.
///
/// Enter is not forwarded; the strategy enters the observer itself before any
/// early return.
struct ForwardingMonitor<'a, T>(&'a mut dyn SearchMonitor<T>)
where
    T: SchedulerNumeric;

impl<'a, T> SearchMonitor<T> for ForwardingMonitor<'a, T>
where
    T: SchedulerNumeric,
{
    fn name(&self) -> &str {
        self.0.name()
    }

    fn on_enter_search(&mut self, _problem: &Problem<T>) {}

    fn on_exit_search(&mut self) {
        self.0.on_exit_search();
    }

    fn on_placement_found(&mut self, placement: &Placement<T>) {
        self.0.on_placement_found(placement);
    }

    fn on_step(&mut self) {
        self.0.on_step();
    }

    fn search_command(&self) -> SearchCommand {
        self.0.search_command()
    }
}
