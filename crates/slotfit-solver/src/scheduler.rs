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

//! # Scheduler
//!
//! Entry point that validates inputs, picks a strategy, wires the search
//! limits and observers, and reports the outcome.
//!
//! ```rust
//! use slotfit_solver::scheduler::SchedulerBuilder;
//! use slotfit_model::problem::Problem;
//! use std::time::Duration;
//!
//! let problem = Problem::new(&[30, 10], &[(20, 39)], 0, 59).unwrap();
//! let mut scheduler = SchedulerBuilder::<i64>::new()
//!     .with_time_limit(Duration::from_secs(1))
//!     .build();
//! let outcome = scheduler.schedule(&problem).unwrap();
//! assert_eq!(outcome.placement().map(|p| p.len()), Some(1));
//! ```

use crate::{
    config::{SchedulerConfig, StrategyKind},
    error::{ConfigError, ScheduleError},
};
use slotfit_core::math::interval::ClosedInterval;
use slotfit_fit::{
    exhaustive::ExhaustiveSearch, greedy::BestFitGreedy, parallel::ParallelExhaustiveSearch,
};
use slotfit_model::problem::Problem;
use slotfit_search::{
    monitor::{composite::CompositeMonitor, log::LogMonitor, search_monitor::SearchMonitor},
    num::SchedulerNumeric,
    result::{SchedulerOutcome, TerminationReason},
    strategy::{SchedulingStrategy, SearchLimits, StrategyContext},
};
use std::{sync::atomic::AtomicBool, time::Duration};
use tracing::{debug, instrument, warn};

/// Clock check mask of the progress log monitor (every 4,096 attempts).
const LOG_CLOCK_CHECK_MASK: u64 = 0xFFF;

pub struct Scheduler<'a, T>
where
    T: SchedulerNumeric,
{
    strategy: Box<dyn SchedulingStrategy<T> + 'a>,
    limits: SearchLimits<'a>,
    observer: CompositeMonitor<'a, T>,
}

impl<'a, T> std::fmt::Debug for Scheduler<'a, T>
where
    T: SchedulerNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("strategy", &self.strategy.name())
            .field("limits", &self.limits)
            .field("observer", &self.observer)
            .finish()
    }
}

impl<'a, T> Scheduler<'a, T>
where
    T: SchedulerNumeric,
{
    #[inline]
    pub fn strategy_name(&self) -> &str {
        self.strategy.name()
    }

    #[inline]
    pub fn limits(&self) -> &SearchLimits<'a> {
        &self.limits
    }

    /// Searches for a placement of as many tasks of `problem` as possible.
    ///
    /// Budget exhaustion is not an error here: the outcome then carries
    /// `TerminationReason::Aborted` and whatever was placed so far.
    #[instrument(
        level = "debug",
        skip_all,
        fields(strategy = self.strategy.name(), tasks = problem.num_tasks())
    )]
    pub fn schedule(
        &mut self,
        problem: &Problem<T>,
    ) -> Result<SchedulerOutcome<T>, ScheduleError<T>> {
        if let Some(limit) = self.strategy.max_tasks() {
            if problem.num_tasks() > limit {
                return Err(ScheduleError::TooManyTasks {
                    tasks: problem.num_tasks(),
                    limit,
                });
            }
        }

        let context = StrategyContext::new(problem, self.limits, &mut self.observer);
        let outcome = self.strategy.solve(context);
        debug!(result = %outcome.result, reason = %outcome.reason, "schedule finished");
        Ok(outcome)
    }

    /// Validates raw inputs and returns the placed intervals.
    ///
    /// Intervals belong to the placed tasks in input order; nothing fitting is
    /// an empty vector. A search stopped by a limit is `ScheduleError::Abandoned`,
    /// never an empty vector.
    pub fn schedule_intervals(
        &mut self,
        durations: &[T],
        busy: &[(T, T)],
        left_bound: T,
        right_bound: T,
    ) -> Result<Vec<ClosedInterval<T>>, ScheduleError<T>> {
        let problem = Problem::new(durations, busy, left_bound, right_bound)?;
        let outcome = self.schedule(&problem)?;
        if let TerminationReason::Aborted(reason) = outcome.reason {
            warn!(%reason, "schedule abandoned");
            return Err(ScheduleError::Abandoned { reason });
        }
        Ok(outcome
            .into_placement()
            .map(|p| p.into_intervals())
            .unwrap_or_default())
    }
}

/// Places as many `durations` as possible into `[left_bound, right_bound]`
/// around the `busy` intervals, using an unlimited exhaustive search.
///
/// Returns one interval per placed duration, in input order of the placed
/// durations; an empty vector when nothing fits.
///
/// `T` must be a signed integer (`i16`, `i32`, `i64` and so on; see
/// [`SchedulerNumeric`]). Unsigned minute counts such as `u16` or `u32` are
/// not accepted and should be converted to a signed type of sufficient width
/// first, e.g. `i64::from(minutes)`.
///
/// ```compile_fail
/// use slotfit_solver::schedule;
///
/// let _ = schedule::<u32>(&[5], &[], 0, 20);
/// ```
///
/// ```rust
/// use slotfit_solver::schedule;
/// use slotfit_core::math::interval::ClosedInterval;
///
/// let placed = schedule(&[5], &[(0, 10), (5, 15)], 0, 20).unwrap();
/// assert_eq!(placed, vec![ClosedInterval::new(16, 20)]);
/// ```
pub fn schedule<T>(
    durations: &[T],
    busy: &[(T, T)],
    left_bound: T,
    right_bound: T,
) -> Result<Vec<ClosedInterval<T>>, ScheduleError<T>>
where
    T: SchedulerNumeric,
{
    SchedulerBuilder::new()
        .build()
        .schedule_intervals(durations, busy, left_bound, right_bound)
}

/// Builder for `Scheduler`.
pub struct SchedulerBuilder<'a, T>
where
    T: SchedulerNumeric,
{
    strategy: Option<Box<dyn SchedulingStrategy<T> + 'a>>,
    limits: SearchLimits<'a>,
    log_interval: Option<Duration>,
    monitors: Vec<Box<dyn SearchMonitor<T> + 'a>>,
}

impl<'a, T> Default for SchedulerBuilder<'a, T>
where
    T: SchedulerNumeric,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> SchedulerBuilder<'a, T>
where
    T: SchedulerNumeric,
{
    /// A builder for an unlimited, pruned exhaustive search.
    #[inline]
    pub fn new() -> Self {
        Self {
            strategy: None,
            limits: SearchLimits::none(),
            log_interval: None,
            monitors: Vec::new(),
        }
    }

    /// A builder configured from `config`, which is validated first.
    pub fn from_config(config: &SchedulerConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut builder = Self::new().with_strategy_boxed(strategy_for(config));
        if let Some(limit) = config.time_limit() {
            builder = builder.with_time_limit(limit);
        }
        if let Some(limit) = config.step_limit {
            builder = builder.with_step_limit(limit);
        }
        if let Some(interval) = config.log_interval() {
            builder = builder.with_log_interval(interval);
        }
        Ok(builder)
    }

    pub fn with_strategy<S>(self, strategy: S) -> Self
    where
        S: SchedulingStrategy<T> + 'a,
    {
        self.with_strategy_boxed(Box::new(strategy))
    }

    pub fn with_strategy_boxed(mut self, strategy: Box<dyn SchedulingStrategy<T> + 'a>) -> Self {
        self.strategy = Some(strategy);
        self
    }

    #[inline]
    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.limits = self.limits.with_time_limit(time_limit);
        self
    }

    /// Limits the number of ordered fit attempts per search.
    #[inline]
    pub fn with_step_limit(mut self, step_limit: u64) -> Self {
        self.limits = self.limits.with_step_limit(step_limit);
        self
    }

    /// Stops the search once `flag` becomes `true`.
    #[inline]
    pub fn with_interrupt(mut self, flag: &'a AtomicBool) -> Self {
        self.limits = self.limits.with_interrupt(flag);
        self
    }

    /// Logs search progress through `tracing` every `interval`.
    #[inline]
    pub fn with_log_interval(mut self, interval: Duration) -> Self {
        self.log_interval = Some(interval);
        self
    }

    /// Adds an observer notified of search events.
    pub fn add_monitor<M>(mut self, monitor: M) -> Self
    where
        M: SearchMonitor<T> + 'a,
    {
        self.monitors.push(Box::new(monitor));
        self
    }

    pub fn build(self) -> Scheduler<'a, T> {
        let mut observer: CompositeMonitor<'a, T> = self.monitors.into_iter().collect();
        if let Some(interval) = self.log_interval {
            observer.add_monitor(LogMonitor::new(interval, LOG_CLOCK_CHECK_MASK));
        }
        Scheduler {
            strategy: self
                .strategy
                .unwrap_or_else(|| Box::new(ExhaustiveSearch::new())),
            limits: self.limits,
            observer,
        }
    }
}

fn strategy_for<'a, T>(config: &SchedulerConfig) -> Box<dyn SchedulingStrategy<T> + 'a>
where
    T: SchedulerNumeric,
{
    match config.strategy {
        StrategyKind::Exhaustive => {
            Box::new(ExhaustiveSearch::new().with_prune_dominated(config.prune_dominated))
        }
        StrategyKind::ParallelExhaustive => {
            let search =
                ParallelExhaustiveSearch::new().with_prune_dominated(config.prune_dominated);
            Box::new(match config.threads {
                Some(threads) => search.with_num_threads(threads),
                None => search,
            })
        }
        StrategyKind::BestFit => Box::new(BestFitGreedy::new()),
    }
}
