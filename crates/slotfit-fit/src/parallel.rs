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

//! # Parallel Exhaustive Search
//!
//! Spreads the subset masks of the exhaustive search over a rayon pool. The
//! mask range is cut into at most `2^MAX_BLOCK_BITS` contiguous blocks, and a
//! worker walks its block in ascending order, jumping over masks that cannot
//! beat the incumbent. Every worker owns a `SubsetFitter` (its own gap
//! scratch) and its own limit monitors; the deadline and the step counter are
//! shared, so the budgets are global rather than per worker.
//!
//! Results do not depend on scheduling. Candidates meet in a
//! `SharedIncumbent`, which prefers more tasks and then the lower mask, and a
//! subset is only pruned once the incumbent provably beats it. A search that
//! runs to completion therefore returns exactly what `ExhaustiveSearch`
//! returns. Each subset still stops at its first fitting ordering.
//!
//! The caller's observer stays on the calling thread. While the workers run,
//! that thread relays their attempts to it in batches through `on_steps`
//! and honors its termination commands.

use crate::{
    MAX_EXHAUSTIVE_TASKS,
    gaps::extract_gaps,
    subset::{SubsetFit, SubsetFitter, first_mask_with_at_least},
};
use rayon::prelude::*;
use slotfit_model::{placement::Placement, problem::Problem};
use slotfit_search::{
    incumbent::SharedIncumbent,
    monitor::search_monitor::{SearchCommand, SearchMonitor},
    num::SchedulerNumeric,
    result::SchedulerOutcome,
    stats::SearchStatisticsBuilder,
    strategy::{SchedulingStrategy, StrategyContext},
};
use std::{
    sync::{
        OnceLock,
        atomic::{AtomicBool, AtomicU64, Ordering},
        mpsc::{self, RecvTimeoutError},
    },
    time::{Duration, Instant},
};
use tracing::{debug, instrument, trace, warn};

/// The mask range is split into at most `2^10` blocks.
const MAX_BLOCK_BITS: u32 = 10;

/// How often the calling thread relays progress to the observer.
const PROGRESS_POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParallelExhaustiveSearch {
    prune_dominated: bool,
    num_threads: Option<usize>,
}

impl Default for ParallelExhaustiveSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl ParallelExhaustiveSearch {
    /// Creates a search on the global rayon pool with pruning enabled.
    #[inline]
    pub fn new() -> Self {
        Self {
            prune_dominated: true,
            num_threads: None,
        }
    }

    #[inline]
    pub fn with_prune_dominated(mut self, prune_dominated: bool) -> Self {
        self.prune_dominated = prune_dominated;
        self
    }

    /// Runs the search on a dedicated pool of `num_threads` workers.
    #[inline]
    pub fn with_num_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = Some(num_threads);
        self
    }

    #[inline]
    pub fn num_threads(&self) -> Option<usize> {
        self.num_threads
    }

    fn build_pool(&self) -> Option<rayon::ThreadPool> {
        let threads = self.num_threads?;
        match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
            Ok(pool) => Some(pool),
            Err(e) => {
                warn!(error = %e, threads, "failed to build thread pool; using the global pool");
                None
            }
        }
    }
}

/// Counters shared by all workers.
#[derive(Debug, Default)]
struct SharedCounters {
    subsets_examined: AtomicU64,
    subsets_pruned: AtomicU64,
    fit_attempts: AtomicU64,
    improvements: AtomicU64,
    /// Attempts started, charged before each attempt and relayed to the observer.
    steps_taken: AtomicU64,
}

/// Stop signal and reason, shared by the workers and the relaying thread.
#[derive(Debug, Default)]
struct StopSignal {
    raised: AtomicBool,
    reason: OnceLock<String>,
}

impl StopSignal {
    #[inline]
    fn is_raised(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }

    // The first reason wins; later callers stop for the same cause.
    fn raise(&self, reason: String) {
        let _ = self.reason.set(reason);
        self.raised.store(true, Ordering::Release);
    }

    fn reason(&self) -> String {
        self.reason
            .get()
            .cloned()
            .unwrap_or_else(|| "search stopped".to_string())
    }
}

/// Next mask in `from..end` that might still replace the incumbent.
fn next_candidate<T>(
    incumbent: &SharedIncumbent<T>,
    mut from: u64,
    end: u64,
    prune: bool,
) -> Option<u64>
where
    T: SchedulerNumeric,
{
    if !prune {
        return first_mask_with_at_least(from, 1, end);
    }
    loop {
        let min_tasks = incumbent.best_count().max(1) as u32;
        let mask = first_mask_with_at_least(from, min_tasks, end)?;
        let tasks = mask.count_ones();
        if incumbent.might_improve(tasks as usize, mask) {
            return Some(mask);
        }
        // Beaten by the incumbent, and so is every later mask of this size.
        from = first_mask_with_at_least(mask + 1, tasks + 1, end)?;
    }
}

/// Links a worker to the calling thread: charges its attempts to the relayed
/// step counter and stops it once the shared stop signal is raised.
struct WorkerRelay<'a> {
    steps_taken: &'a AtomicU64,
    stop: &'a StopSignal,
}

impl<'a, T> SearchMonitor<T> for WorkerRelay<'a>
where
    T: SchedulerNumeric,
{
    fn name(&self) -> &str {
        "WorkerRelay"
    }

    fn on_enter_search(&mut self, _problem: &Problem<T>) {}
    fn on_exit_search(&mut self) {}
    fn on_placement_found(&mut self, _placement: &Placement<T>) {}

    #[inline(always)]
    fn on_step(&mut self) {
        self.steps_taken.fetch_add(1, Ordering::Relaxed);
    }

    fn search_command(&self) -> SearchCommand {
        match self.stop.is_raised() {
            true => SearchCommand::Terminate(self.stop.reason()),
            false => SearchCommand::Continue,
        }
    }
}

/// Runs `search` on `scope` and relays progress to `observer` until it ends.
fn relay_progress<'scope, T, F>(
    scope: &rayon::Scope<'scope>,
    search: F,
    steps_taken: &AtomicU64,
    stop: &StopSignal,
    observer: &mut dyn SearchMonitor<T>,
) where
    T: SchedulerNumeric,
    F: FnOnce() + Send + 'scope,
{
    let (done_tx, done_rx) = mpsc::channel::<()>();
    scope.spawn(move |_| {
        search();
        let _ = done_tx.send(());
    });

    let mut relayed = 0u64;
    loop {
        // A dropped sender means the search panicked; the scope re-raises it.
        let finished = !matches!(
            done_rx.recv_timeout(PROGRESS_POLL_INTERVAL),
            Err(RecvTimeoutError::Timeout)
        );
        let taken = steps_taken.load(Ordering::Relaxed);
        observer.on_steps(taken - relayed);
        relayed = taken;
        if finished {
            break;
        }
        if let SearchCommand::Terminate(reason) = observer.search_command() {
            stop.raise(reason);
        }
    }
}

impl<T> SchedulingStrategy<T> for ParallelExhaustiveSearch
where
    T: SchedulerNumeric,
{
    fn name(&self) -> &str {
        "ParallelExhaustiveSearch"
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

        let pool = self.build_pool();
        let used_threads = pool
            .as_ref()
            .map_or_else(rayon::current_num_threads, |p| p.current_num_threads());
        let block_bits = (n as u32).saturating_sub(MAX_BLOCK_BITS);
        let blocks = 1u64 << (n as u32 - block_bits);
        debug!(
            gaps = gaps.len(),
            threads = used_threads,
            blocks,
            prune = self.prune_dominated,
            "starting parallel exhaustive search"
        );

        let durations = problem.durations();
        let incumbent = SharedIncumbent::<T>::new();
        let counters = SharedCounters::default();
        let steps = AtomicU64::new(0);
        let stop = StopSignal::default();
        let prune = self.prune_dominated;

        let search = || {
            (0..blocks).into_par_iter().for_each_init(
                || {
                    let mut monitor = limits.monitor::<T>(start, &steps);
                    monitor.add_monitor(WorkerRelay {
                        steps_taken: &counters.steps_taken,
                        stop: &stop,
                    });
                    monitor.on_enter_search(problem);
                    (SubsetFitter::new(durations, gaps.clone()), monitor)
                },
                |(fitter, monitor), block| {
                    let first = block << block_bits;
                    let end = first + (1u64 << block_bits);
                    let mut from = first;
                    let mut covered_to = end;
                    let mut tried = 0u64;

                    loop {
                        if stop.is_raised() || incumbent.best_count() == n {
                            covered_to = from;
                            break;
                        }
                        let Some(mask) = next_candidate(&incumbent, from, end, prune) else {
                            break;
                        };
                        from = mask + 1;
                        tried += 1;

                        let before = fitter.attempts();
                        let fit = fitter.try_subset(mask, monitor);
                        counters
                            .fit_attempts
                            .fetch_add(fitter.attempts() - before, Ordering::Relaxed);

                        match fit {
                            SubsetFit::Fits(placement) => {
                                if incumbent.try_install(mask, &placement) {
                                    trace!(mask, placed = placement.len(), "new incumbent");
                                    counters.improvements.fetch_add(1, Ordering::Relaxed);
                                }
                            }
                            SubsetFit::NoOrderingFits => {}
                            SubsetFit::Aborted(reason) => {
                                stop.raise(reason);
                                covered_to = from;
                                break;
                            }
                        }
                    }

                    let covered = covered_to - first;
                    let empty_mask = u64::from(first == 0 && covered > 0);
                    counters
                        .subsets_examined
                        .fetch_add(covered, Ordering::Relaxed);
                    counters
                        .subsets_pruned
                        .fetch_add(covered - tried - empty_mask, Ordering::Relaxed);
                },
            )
        };

        match &pool {
            Some(pool) => pool.in_place_scope(|scope| {
                relay_progress(scope, search, &counters.steps_taken, &stop, &mut *observer)
            }),
            // Already on a rayon worker: blocking it to relay could starve the pool.
            None if rayon::current_thread_index().is_some() => {
                search();
                observer.on_steps(counters.steps_taken.load(Ordering::Relaxed));
            }
            None => rayon::in_place_scope(|scope| {
                relay_progress(scope, search, &counters.steps_taken, &stop, &mut *observer)
            }),
        }

        let best = incumbent.into_inner().unwrap_or_default();
        if !best.is_empty() {
            observer.on_placement_found(&best);
        }
        observer.on_exit_search();

        let statistics = SearchStatisticsBuilder::new()
            .subsets_examined(counters.subsets_examined.into_inner())
            .subsets_pruned(counters.subsets_pruned.into_inner())
            .fit_attempts(counters.fit_attempts.into_inner())
            .improvements(counters.improvements.into_inner())
            .used_threads(used_threads)
            .solve_duration(start.elapsed())
            .build();

        match stop.reason.into_inner() {
            Some(reason) => {
                warn!(%reason, placed = best.len(), "parallel exhaustive search abandoned");
                SchedulerOutcome::aborted(best, reason, statistics)
            }
            None => {
                debug!(
                    placed = best.len(),
                    attempts = statistics.fit_attempts,
                    "parallel exhaustive search finished"
                );
                SchedulerOutcome::exhausted(best, statistics)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exhaustive::ExhaustiveSearch;
    use slotfit_core::math::interval::ClosedInterval;
    use slotfit_search::{
        monitor::search_monitor::NoOpMonitor,
        result::{SchedulerResult, TerminationReason},
        strategy::SearchLimits,
    };

    /// Counts relayed steps and optionally asks the search to stop.
    #[derive(Default)]
    struct StepCounter {
        steps: u64,
        placements: u64,
        stop: Option<&'static str>,
    }

    impl SearchMonitor<IntegerType> for StepCounter {
        fn name(&self) -> &str {
            "StepCounter"
        }
        fn on_enter_search(&mut self, _problem: &Problem<IntegerType>) {}
        fn on_exit_search(&mut self) {}
        fn on_placement_found(&mut self, _placement: &Placement<IntegerType>) {
            self.placements += 1;
        }
        fn on_step(&mut self) {
            self.steps += 1;
        }
        fn search_command(&self) -> SearchCommand {
            match self.stop {
                Some(reason) => SearchCommand::Terminate(reason.to_string()),
                None => SearchCommand::Continue,
            }
        }
    }

    type IntegerType = i64;

    fn iv(s: IntegerType, e: IntegerType) -> ClosedInterval<IntegerType> {
        ClosedInterval::new(s, e)
    }

    fn run<S>(
        strategy: &S,
        problem: &Problem<IntegerType>,
        limits: SearchLimits<'_>,
    ) -> SchedulerOutcome<IntegerType>
    where
        S: SchedulingStrategy<IntegerType>,
    {
        let mut observer = NoOpMonitor;
        strategy.solve(StrategyContext::new(problem, limits, &mut observer))
    }

    #[test]
    fn test_scenarios_match_sequential() {
        let problems = [
            Problem::new(&[30, 40], &[], 0, 99).unwrap(),
            Problem::new(&[30, 10], &[(20, 39)], 0, 59).unwrap(),
            Problem::new(&[10, 10, 10], &[], 0, 19).unwrap(),
            Problem::new(&[5], &[(0, 10), (5, 15)], 0, 20).unwrap(),
            Problem::new(&[3, 3, 3, 3, 4, 4], &[(4, 6), (12, 12)], 0, 19).unwrap(),
        ];
        let parallel = ParallelExhaustiveSearch::new().with_num_threads(4);
        for problem in &problems {
            let expected = run(&ExhaustiveSearch::new(), problem, SearchLimits::none());
            let actual = run(&parallel, problem, SearchLimits::none());
            assert_eq!(actual.result, expected.result, "problem {problem}");
            assert_eq!(actual.statistics.used_threads, 4);
        }
    }

    #[test]
    fn test_tie_break_prefers_lowest_mask_without_pruning() {
        // Every pair fits; the lowest mask is {0, 1}.
        let problem = Problem::new(&[5, 5, 5, 5], &[], 0, 9).unwrap();
        let parallel = ParallelExhaustiveSearch::new()
            .with_prune_dominated(false)
            .with_num_threads(3);
        let placement = run(&parallel, &problem, SearchLimits::none())
            .into_placement()
            .unwrap();
        assert_eq!(placement.selection_mask(4).ones().collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(placement.intervals(), &[iv(0, 4), iv(5, 9)]);
    }

    #[test]
    fn test_no_tasks_is_no_fit() {
        let problem = Problem::<IntegerType>::new(&[], &[(0, 3)], 0, 10).unwrap();
        let outcome = run(&ParallelExhaustiveSearch::new(), &problem, SearchLimits::none());
        assert_eq!(outcome.result, SchedulerResult::NoFit);
    }

    #[test]
    fn test_step_budget_is_global() {
        let problem = Problem::new(&[10; 8], &[], 0, 9).unwrap();
        let outcome = run(
            &ParallelExhaustiveSearch::new().with_num_threads(2),
            &problem,
            SearchLimits::none().with_step_limit(5),
        );
        assert_eq!(
            outcome.reason,
            TerminationReason::Aborted("step budget exhausted".to_string())
        );
        assert!(!outcome.is_no_fit());
        // Each worker may be one attempt past the shared counter when it stops.
        assert!(outcome.statistics.fit_attempts <= 5 + 2);
    }

    #[test]
    fn test_time_limit_stops_search_across_dominated_masks() {
        let problem = Problem::new(&[1; 30], &[], 0, 28).unwrap();
        let started = Instant::now();
        let outcome = run(
            &ParallelExhaustiveSearch::new().with_num_threads(4),
            &problem,
            SearchLimits::none().with_time_limit(Duration::from_millis(50)),
        );
        let elapsed = started.elapsed();

        assert!(elapsed < Duration::from_secs(5), "overran: {elapsed:?}");
        assert_eq!(
            outcome.reason,
            TerminationReason::Aborted("time limit reached".to_string())
        );
        assert_eq!(outcome.placement().map(|p| p.len()), Some(29));
    }

    #[test]
    fn test_observer_receives_every_attempt() {
        let problem = Problem::new(&[3, 3, 3, 3, 4, 4], &[(4, 6), (12, 12)], 0, 19).unwrap();
        let mut observer = StepCounter::default();
        let outcome = ParallelExhaustiveSearch::new()
            .with_num_threads(3)
            .solve(StrategyContext::new(&problem, SearchLimits::none(), &mut observer));

        assert!(!outcome.is_aborted());
        assert_eq!(observer.steps, outcome.statistics.fit_attempts);
        assert_eq!(observer.placements, 1);
    }

    #[test]
    fn test_observer_can_stop_the_workers() {
        // Without a limit the 30-task subset would be permuted for ages.
        let problem = Problem::new(&[1; 30], &[], 0, 28).unwrap();
        let mut observer = StepCounter {
            stop: Some("caller gave up"),
            ..StepCounter::default()
        };
        let started = Instant::now();
        let outcome = ParallelExhaustiveSearch::new()
            .with_num_threads(2)
            .solve(StrategyContext::new(&problem, SearchLimits::none(), &mut observer));

        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(
            outcome.reason,
            TerminationReason::Aborted("caller gave up".to_string())
        );
        assert!(observer.steps > 0);
    }
}
