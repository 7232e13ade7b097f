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

use crate::{num::SchedulerNumeric, stats::SearchStatistics};
use slotfit_model::placement::Placement;

/// What a search established about the problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulerResult<T>
where
    T: SchedulerNumeric,
{
    /// A placement of the largest possible number of tasks.
    Maximal(Placement<T>),
    /// A valid placement whose maximality was not established.
    Feasible(Placement<T>),
    /// Not a single task fits into the window. Also the answer for zero tasks.
    NoFit,
    /// The search stopped before placing anything and before proving that
    /// nothing fits.
    Unknown,
}

impl<T> std::fmt::Display for SchedulerResult<T>
where
    T: SchedulerNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchedulerResult::Maximal(p) => write!(f, "Maximal(placed={})", p.len()),
            SchedulerResult::Feasible(p) => write!(f, "Feasible(placed={})", p.len()),
            SchedulerResult::NoFit => write!(f, "NoFit"),
            SchedulerResult::Unknown => write!(f, "Unknown"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationReason {
    /// Every candidate was examined, so the placement is maximal.
    MaximalityProven,
    /// Every candidate was examined and none fit.
    NoFitProven,
    /// A heuristic ran to completion without proving maximality.
    HeuristicCompleted,
    /// A monitor stopped the search (time, step budget, interrupt).
    Aborted(String),
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationReason::MaximalityProven => write!(f, "Maximality Proven"),
            TerminationReason::NoFitProven => write!(f, "No Fit Proven"),
            TerminationReason::HeuristicCompleted => write!(f, "Heuristic Completed"),
            TerminationReason::Aborted(reason) => write!(f, "Aborted: {}", reason),
        }
    }
}

/// Result, termination reason and statistics of one search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerOutcome<T>
where
    T: SchedulerNumeric,
{
    pub result: SchedulerResult<T>,
    pub reason: TerminationReason,
    pub statistics: SearchStatistics,
}

impl<T> SchedulerOutcome<T>
where
    T: SchedulerNumeric,
{
    #[inline]
    pub fn new(
        result: SchedulerResult<T>,
        reason: TerminationReason,
        statistics: SearchStatistics,
    ) -> Self {
        Self {
            result,
            reason,
            statistics,
        }
    }

    /// An exhaustive search ran to completion. An empty best placement means
    /// nothing fits.
    pub fn exhausted(best: Placement<T>, statistics: SearchStatistics) -> Self {
        if best.is_empty() {
            Self::no_fit(statistics)
        } else {
            Self::new(
                SchedulerResult::Maximal(best),
                TerminationReason::MaximalityProven,
                statistics,
            )
        }
    }

    #[inline]
    pub fn no_fit(statistics: SearchStatistics) -> Self {
        Self::new(
            SchedulerResult::NoFit,
            TerminationReason::NoFitProven,
            statistics,
        )
    }

    /// A monitor stopped the search. Whatever was found is kept as feasible;
    /// an empty incumbent is reported as `Unknown`, never as `NoFit`.
    pub fn aborted(best: Placement<T>, reason: String, statistics: SearchStatistics) -> Self {
        let result = if best.is_empty() {
            SchedulerResult::Unknown
        } else {
            SchedulerResult::Feasible(best)
        };
        Self::new(result, TerminationReason::Aborted(reason), statistics)
    }

    /// A heuristic finished. Placing every task is maximal and placing none
    /// proves that no task fits anywhere; anything else is merely feasible.
    pub fn heuristic(best: Placement<T>, num_tasks: usize, statistics: SearchStatistics) -> Self {
        if best.is_empty() {
            Self::no_fit(statistics)
        } else if best.len() == num_tasks {
            Self::new(
                SchedulerResult::Maximal(best),
                TerminationReason::MaximalityProven,
                statistics,
            )
        } else {
            Self::new(
                SchedulerResult::Feasible(best),
                TerminationReason::HeuristicCompleted,
                statistics,
            )
        }
    }

    #[inline]
    pub fn is_maximal(&self) -> bool {
        matches!(self.result, SchedulerResult::Maximal(_))
    }

    #[inline]
    pub fn is_feasible(&self) -> bool {
        matches!(self.result, SchedulerResult::Feasible(_))
    }

    #[inline]
    pub fn is_no_fit(&self) -> bool {
        matches!(self.result, SchedulerResult::NoFit)
    }

    #[inline]
    pub fn is_aborted(&self) -> bool {
        matches!(self.reason, TerminationReason::Aborted(_))
    }

    #[inline]
    pub fn placement(&self) -> Option<&Placement<T>> {
        match &self.result {
            SchedulerResult::Maximal(p) | SchedulerResult::Feasible(p) => Some(p),
            SchedulerResult::NoFit | SchedulerResult::Unknown => None,
        }
    }

    #[inline]
    pub fn into_placement(self) -> Option<Placement<T>> {
        match self.result {
            SchedulerResult::Maximal(p) | SchedulerResult::Feasible(p) => Some(p),
            SchedulerResult::NoFit | SchedulerResult::Unknown => None,
        }
    }
}

impl<T> std::fmt::Display for SchedulerOutcome<T>
where
    T: SchedulerNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Result: {}", self.result)?;
        writeln!(f, "Reason: {}", self.reason)?;
        write!(f, "{}", self.statistics)
    }
}
