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
use std::{
    marker::PhantomData,
    sync::atomic::{AtomicBool, Ordering},
};

/// Cancels a fit search when a caller-owned flag is raised.
///
/// The flag is only read, never reset. One flag may be shared by every
/// worker of a parallel search, so raising it stops all of them at their
/// next poll.
#[derive(Debug, Clone)]
pub struct InterruptMonitor<'a, T> {
    flag: &'a AtomicBool,
    _numeric: PhantomData<T>,
}

impl<'a, T> InterruptMonitor<'a, T> {
    #[inline]
    pub fn new(flag: &'a AtomicBool) -> Self {
        Self {
            flag,
            _numeric: PhantomData,
        }
    }

    /// Whether cancellation has been requested.
    #[inline]
    pub fn is_raised(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

impl<'a, T> SearchMonitor<T> for InterruptMonitor<'a, T>
where
    T: SchedulerNumeric,
{
    fn name(&self) -> &str {
        "InterruptMonitor"
    }

    fn on_enter_search(&mut self, _problem: &Problem<T>) {}
    fn on_exit_search(&mut self) {}
    fn on_placement_found(&mut self, _placement: &Placement<T>) {}
    fn on_step(&mut self) {}

    fn search_command(&self) -> SearchCommand {
        match self.is_raised() {
            true => SearchCommand::Terminate("interrupt signal received".to_string()),
            false => SearchCommand::Continue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::InterruptMonitor;
    use crate::monitor::{
        composite::CompositeMonitor,
        search_monitor::{SearchCommand, SearchMonitor},
    };
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn test_lowered_flag_lets_search_continue() {
        let flag = AtomicBool::new(false);
        let monitor = InterruptMonitor::<i64>::new(&flag);
        assert!(!monitor.is_raised());
        assert_eq!(monitor.search_command(), SearchCommand::Continue);
    }

    #[test]
    fn test_raising_flag_cancels_every_sharing_monitor() {
        let flag = AtomicBool::new(false);
        let first = InterruptMonitor::<i64>::new(&flag);
        let second = first.clone();
        assert_eq!(second.search_command(), SearchCommand::Continue);

        flag.store(true, Ordering::Relaxed);

        let expected = SearchCommand::Terminate("interrupt signal received".to_string());
        assert_eq!(first.search_command(), expected);
        assert_eq!(second.search_command(), expected);
    }

    #[test]
    fn test_raised_flag_terminates_through_composite() {
        let flag = AtomicBool::new(true);
        let mut composite = CompositeMonitor::<i64>::new();
        composite.add_monitor(InterruptMonitor::new(&flag));
        assert!(matches!(
            composite.search_command(),
            SearchCommand::Terminate(_)
        ));
    }
}
