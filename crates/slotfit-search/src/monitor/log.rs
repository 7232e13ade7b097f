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
use slotfit_model::{
    placement::Placement,
    problem::{Complexity, Problem},
};
use std::time::{Duration, Instant};
use tracing::info;

/// Emits periodic progress lines through `tracing` while a search runs.
///
/// The clock is read only when `(steps & clock_check_mask) == 0`; a line is
/// logged when at least `log_interval` has passed since the previous one.
/// Never terminates the search.
#[derive(Debug, Clone)]
pub struct LogMonitor<T> {
    start_time: Instant,
    last_log_time: Instant,
    log_interval: Duration,
    clock_check_mask: u64,
    steps: u64,
    lines_logged: u64,
    complexity: Option<Complexity>,
    best_count: Option<usize>,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> LogMonitor<T> {
    pub fn new(log_interval: Duration, clock_check_mask: u64) -> Self {
        let now = Instant::now();
        Self {
            start_time: now,
            last_log_time: now,
            log_interval,
            clock_check_mask,
            steps: 0,
            lines_logged: 0,
            complexity: None,
            best_count: None,
            _phantom: std::marker::PhantomData,
        }
    }

    /// Number of progress lines emitted since the search was entered.
    #[inline]
    pub fn lines_logged(&self) -> u64 {
        self.lines_logged
    }

    #[inline]
    pub fn best_count(&self) -> Option<usize> {
        self.best_count
    }

    fn log_line(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.start_time).as_secs_f32();
        let coverage = self
            .complexity
            .and_then(|c| c.coverage(self.steps))
            .map(|c| format!("{:.4}%", c))
            .unwrap_or_else(|| "-".to_string());
        let best = self
            .best_count
            .map(|b| b.to_string())
            .unwrap_or_else(|| "none".to_string());

        info!(
            elapsed = %format!("{:.1}s", elapsed),
            steps = self.steps,
            best = %best,
            coverage = %coverage,
            "search progress"
        );

        self.last_log_time = now;
        self.lines_logged += 1;
    }
}

impl<T> Default for LogMonitor<T> {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), 4095)
    }
}

impl<T> std::fmt::Display for LogMonitor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "LogMonitor(log_interval: {}ms, clock_check_mask: {})",
            self.log_interval.as_millis(),
            self.clock_check_mask
        )
    }
}

impl<T> SearchMonitor<T> for LogMonitor<T>
where
    T: SchedulerNumeric,
{
    fn name(&self) -> &str {
        "LogMonitor"
    }

    fn on_enter_search(&mut self, problem: &Problem<T>) {
        self.start_time = Instant::now();
        self.last_log_time = self.start_time;
        self.steps = 0;
        self.lines_logged = 0;
        self.best_count = None;

        let complexity = problem.complexity();
        self.complexity = Some(complexity);
        info!(
            tasks = problem.num_tasks(),
            busy = problem.busy_intervals().len(),
            window = %problem.window(),
            attempts = %complexity,
            "search started"
        );
    }

    fn on_exit_search(&mut self) {
        info!(
            elapsed = %format!("{:.3}s", self.start_time.elapsed().as_secs_f64()),
            steps = self.steps,
            best = self.best_count.unwrap_or(0),
            "search finished"
        );
    }

    fn on_placement_found(&mut self, placement: &Placement<T>) {
        self.best_count = Some(placement.len());
    }

    #[inline(always)]
    fn on_step(&mut self) {
        self.steps = self.steps.wrapping_add(1);
        if (self.steps & self.clock_check_mask) == 0
            && self.last_log_time.elapsed() >= self.log_interval
        {
            self.log_line();
        }
    }

    fn on_steps(&mut self, count: u64) {
        if count == 0 {
            return;
        }
        self.steps = self.steps.wrapping_add(count);
        if self.last_log_time.elapsed() >= self.log_interval {
            self.log_line();
        }
    }

    fn search_command(&self) -> SearchCommand {
        SearchCommand::Continue
    }
}
