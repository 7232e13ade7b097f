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

use crate::{
    monitor::search_monitor::{SearchCommand, SearchMonitor},
    num::SchedulerNumeric,
};
use slotfit_model::{placement::Placement, problem::Problem};
use std::sync::atomic::{AtomicU64, Ordering};

/// Stops the search once a number of fit attempts has been spent.
///
/// The counter is borrowed rather than owned, so every worker of a parallel
/// search can hold its own monitor while charging one global budget.
#[derive(Debug, Clone)]
pub struct StepLimitMonitor<'a, T> {
    steps: &'a AtomicU64,
    step_limit: u64,
    _phantom: std::marker::PhantomData<T>,
}

impl<'a, T> StepLimitMonitor<'a, T> {
    #[inline]
    pub fn new(steps: &'a AtomicU64, step_limit: u64) -> Self {
        Self {
            steps,
            step_limit,
            _phantom: std::marker::PhantomData,
        }
    }

    /// Steps charged so far by every monitor sharing the counter.
    #[inline]
    pub fn steps(&self) -> u64 {
        self.steps.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn step_limit(&self) -> u64 {
        self.step_limit
    }
}

impl<'a, T> SearchMonitor<T> for StepLimitMonitor<'a, T>
where
    T: SchedulerNumeric,
{
    fn name(&self) -> &str {
        "StepLimitMonitor"
    }

    fn on_enter_search(&mut self, _problem: &Problem<T>) {}
    fn on_exit_search(&mut self) {}
    fn on_placement_found(&mut self, _placement: &Placement<T>) {}

    #[inline(always)]
    fn on_step(&mut self) {
        self.steps.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    fn search_command(&self) -> SearchCommand {
        if self.steps.load(Ordering::Relaxed) > self.step_limit {
            SearchCommand::Terminate("step budget exhausted".to_string())
        } else {
            SearchCommand::Continue
        }
    }
}
