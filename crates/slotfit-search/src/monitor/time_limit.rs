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

//! # Time Limit Monitor
//!
//! Bounds a fit search by wall-clock time. Reading `Instant::now` on every
//! fit attempt would dominate the sweep, so the clock is consulted only on
//! attempts whose counter has all `poll_mask` bits clear. With the default
//! mask of `0x3FF` that is once per 1,024 attempts.
//!
//! ```rust
//! use slotfit_search::monitor::time_limit::TimeLimitMonitor;
//! use slotfit_search::monitor::search_monitor::{SearchMonitor, SearchCommand};
//! use std::time::Duration;
//!
//! let mut budget = TimeLimitMonitor::<i64>::new(Duration::from_millis(250));
//! budget.on_step();
//! if let SearchCommand::Terminate(reason) = budget.search_command() {
//!     println!("stopping: {reason}");
//! }
//! ```

use crate::{
    monitor::search_monitor::{SearchCommand, SearchMonitor},
    num::SchedulerNumeric,
};
use slotfit_model::{placement::Placement, problem::Problem};
use std::{
    marker::PhantomData,
    time::{Duration, Instant},
};

/// Where the budget is measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClockAnchor {
    /// Restarted by every `on_enter_search`.
    PerSearch,
    /// Fixed at construction and shared with sibling workers.
    Fixed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeLimitMonitor<T> {
    budget: Duration,
    started: Instant,
    anchor: ClockAnchor,
    poll_mask: u64,
    attempts: u64,
    _numeric: PhantomData<T>,
}

impl<T> TimeLimitMonitor<T> {
    const DEFAULT_POLL_MASK: u64 = 0x3FF;

    /// Budget measured from the moment the search is entered.
    #[inline]
    pub fn new(budget: Duration) -> Self {
        Self::with_poll_mask(budget, Self::DEFAULT_POLL_MASK)
    }

    /// Like [`TimeLimitMonitor::new`] but polling the clock whenever
    /// `attempts & poll_mask == 0`. A mask of zero polls on every call.
    #[inline]
    pub fn with_poll_mask(budget: Duration, poll_mask: u64) -> Self {
        Self {
            budget,
            started: Instant::now(),
            anchor: ClockAnchor::PerSearch,
            poll_mask,
            attempts: 0,
            _numeric: PhantomData,
        }
    }

    /// Budget measured from `started`, which survives `on_enter_search`.
    /// Workers of one parallel search build their monitors from the same
    /// instant so they share a single deadline.
    #[inline]
    pub fn starting_at(started: Instant, budget: Duration) -> Self {
        Self {
            anchor: ClockAnchor::Fixed,
            started,
            ..Self::new(budget)
        }
    }

    #[inline(always)]
    fn due_for_poll(&self) -> bool {
        self.attempts & self.poll_mask == 0
    }
}

impl<T> SearchMonitor<T> for TimeLimitMonitor<T>
where
    T: SchedulerNumeric,
{
    fn name(&self) -> &str {
        "TimeLimitMonitor"
    }

    fn on_enter_search(&mut self, _problem: &Problem<T>) {
        if self.anchor == ClockAnchor::PerSearch {
            self.started = Instant::now();
        }
        self.attempts = 0;
    }

    fn on_exit_search(&mut self) {}

    fn on_placement_found(&mut self, _placement: &Placement<T>) {}

    #[inline(always)]
    fn on_step(&mut self) {
        self.attempts = self.attempts.wrapping_add(1);
    }

    #[inline(always)]
    fn search_command(&self) -> SearchCommand {
        if self.due_for_poll() && self.started.elapsed() >= self.budget {
            SearchCommand::Terminate("time limit reached".to_string())
        } else {
            SearchCommand::Continue
        }
    }
}
