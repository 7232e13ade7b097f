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

//! # Scheduling Strategies
//!
//! A strategy turns a validated `Problem` into a `SchedulerOutcome`. The
//! caller hands it a `StrategyContext`: the problem, the budgets that may stop
//! the search, and an observer monitor.
//!
//! Budgets are passed as `SearchLimits` rather than as a ready-made monitor
//! because a parallel strategy needs one monitor per worker. Every worker
//! builds its own from the same limits, sharing a single deadline and a single
//! step counter.

use crate::{
    monitor::{
        composite::CompositeMonitor, interrupt::InterruptMonitor,
        search_monitor::SearchMonitor, step_limit::StepLimitMonitor,
        time_limit::TimeLimitMonitor,
    },
    num::SchedulerNumeric,
    result::SchedulerOutcome,
};
use slotfit_model::problem::Problem;
use std::{
    sync::atomic::{AtomicBool, AtomicU64},
    time::{Duration, Instant},
};

/// Budgets that stop a search early.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchLimits<'a> {
    time_limit: Option<Duration>,
    step_limit: Option<u64>,
    interrupt: Option<&'a AtomicBool>,
}

impl<'a> SearchLimits<'a> {
    /// No limits: the search runs to completion.
    #[inline]
    pub fn none() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = Some(time_limit);
        self
    }

    /// Limits the total number of ordered fit attempts.
    #[inline]
    pub fn with_step_limit(mut self, step_limit: u64) -> Self {
        self.step_limit = Some(step_limit);
        self
    }

    #[inline]
    pub fn with_interrupt(mut self, flag: &'a AtomicBool) -> Self {
        self.interrupt = Some(flag);
        self
    }

    #[inline]
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    #[inline]
    pub fn step_limit(&self) -> Option<u64> {
        self.step_limit
    }

    #[inline]
    pub fn is_unlimited(&self) -> bool {
        self.time_limit.is_none() && self.step_limit.is_none() && self.interrupt.is_none()
    }

    /// Builds the monitor enforcing these limits.
    ///
    /// The deadline is measured from `start` and `steps` is charged by every
    /// monitor built over it, so monitors built for several workers enforce
    /// one shared budget.
    pub fn monitor<'b, T>(&self, start: Instant, steps: &'b AtomicU64) -> CompositeMonitor<'b, T>
    where
        'a: 'b,
        T: SchedulerNumeric,
    {
        let mut composite = CompositeMonitor::with_capacity(3);
        if let Some(limit) = self.time_limit {
            composite.add_monitor(TimeLimitMonitor::starting_at(start, limit));
        }
        if let Some(limit) = self.step_limit {
            composite.add_monitor(StepLimitMonitor::new(steps, limit));
        }
        if let Some(flag) = self.interrupt {
            composite.add_monitor(InterruptMonitor::new(flag));
        }
        composite
    }
}

/// Everything a strategy needs for one search.
pub struct StrategyContext<'a, T>
where
    T: SchedulerNumeric,
{
    pub problem: &'a Problem<T>,
    pub limits: SearchLimits<'a>,
    /// Observer driven from the calling thread. Strategies also honor its
    /// termination commands; a parallel strategy polls it while relaying
    /// worker steps through `on_steps`.
    pub monitor: &'a mut dyn SearchMonitor<T>,
}

impl<'a, T> StrategyContext<'a, T>
where
    T: SchedulerNumeric,
{
    #[inline]
    pub fn new(
        problem: &'a Problem<T>,
        limits: SearchLimits<'a>,
        monitor: &'a mut dyn SearchMonitor<T>,
    ) -> Self {
        Self {
            problem,
            limits,
            monitor,
        }
    }
}

impl<'a, T> std::fmt::Debug for StrategyContext<'a, T>
where
    T: SchedulerNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyContext")
            .field("problem", self.problem)
            .field("limits", &self.limits)
            .field("monitor", &self.monitor.name())
            .finish()
    }
}

/// An algorithm that places as many tasks of a problem as it can.
pub trait SchedulingStrategy<T>: Send + Sync
where
    T: SchedulerNumeric,
{
    fn name(&self) -> &str;

    /// Largest task count the strategy accepts, `None` if unbounded.
    fn max_tasks(&self) -> Option<usize> {
        None
    }

    /// Runs the search. Limits stop it with `TerminationReason::Aborted`.
    fn solve(&self, context: StrategyContext<'_, T>) -> SchedulerOutcome<T>;
}

impl<T> std::fmt::Debug for dyn SchedulingStrategy<T>
where
    T: SchedulerNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SchedulingStrategy({})", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::search_monitor::SearchCommand;
    use std::sync::atomic::Ordering;

    type IntegerType = i64;

    #[test]
    fn test_unlimited_builds_empty_monitor() {
        let steps = AtomicU64::new(0);
        let limits = SearchLimits::none();
        assert!(limits.is_unlimited());
        let monitor = limits.monitor::<IntegerType>(Instant::now(), &steps);
        assert!(monitor.is_empty());
        assert_eq!(monitor.search_command(), SearchCommand::Continue);
    }

    #[test]
    fn test_limits_build_one_monitor_each() {
        let flag = AtomicBool::new(false);
        let steps = AtomicU64::new(0);
        let limits = SearchLimits::none()
            .with_time_limit(Duration::from_secs(60))
            .with_step_limit(10)
            .with_interrupt(&flag);
        assert_eq!(limits.time_limit(), Some(Duration::from_secs(60)));
        assert_eq!(limits.step_limit(), Some(10));

        let monitor = limits.monitor::<IntegerType>(Instant::now(), &steps);
        assert_eq!(monitor.len(), 3);
        assert_eq!(monitor.search_command(), SearchCommand::Continue);

        flag.store(true, Ordering::Relaxed);
        assert!(matches!(monitor.search_command(), SearchCommand::Terminate(_)));
    }

    #[test]
    fn test_worker_monitors_share_the_step_budget() {
        let steps = AtomicU64::new(0);
        let limits = SearchLimits::none().with_step_limit(1);
        let start = Instant::now();
        let mut a = limits.monitor::<IntegerType>(start, &steps);
        let mut b = limits.monitor::<IntegerType>(start, &steps);

        a.on_step();
        assert_eq!(b.search_command(), SearchCommand::Continue);
        b.on_step();
        assert!(matches!(a.search_command(), SearchCommand::Terminate(_)));
    }
}
