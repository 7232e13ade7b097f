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

use crate::{fitter::OrderedFitter, permutation::next_permutation};
use slotfit_core::math::interval::ClosedInterval;
use slotfit_model::{index::TaskIndex, placement::Placement};
use slotfit_search::{
    monitor::search_monitor::{SearchCommand, SearchMonitor},
    num::SchedulerNumeric,
};
use smallvec::SmallVec;

/// Smallest mask in `from..end` selecting at least `min_tasks` tasks.
///
/// Setting the lowest clear bit of a mask yields the smallest larger mask
/// with one more task, so at most `min_tasks` steps are needed no matter how
/// many masks are skipped. Searches use this to jump over runs of subsets
/// too small to beat the incumbent instead of visiting them one by one.
pub fn first_mask_with_at_least(from: u64, min_tasks: u32, end: u64) -> Option<u64> {
    let mut mask = from;
    while mask < end {
        if mask.count_ones() >= min_tasks {
            return Some(mask);
        }
        mask |= mask + 1;
    }
    None
}

/// Outcome of trying the orderings of one subset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubsetFit<T>
where
    T: SchedulerNumeric,
{
    /// Some ordering fits; intervals are in the subset's index order.
    Fits(Placement<T>),
    /// Every ordering was tried and none fits.
    NoOrderingFits,
    /// A monitor stopped the attempts.
    Aborted(String),
}

/// Tries every ordering of a subset until one fits.
///
/// Orderings are visited in lexicographic order of subset positions, identity
/// first, and the first ordering that fits wins. Buffers are reused across
/// subsets, so one instance serves a whole search (or one worker of it).
#[derive(Debug, Clone)]
pub struct SubsetFitter<'a, T>
where
    T: SchedulerNumeric,
{
    durations: &'a [T],
    fitter: OrderedFitter<T>,
    members: SmallVec<[usize; 16]>,
    order: SmallVec<[usize; 16]>,
    out: Vec<ClosedInterval<T>>,
    attempts: u64,
}

impl<'a, T> SubsetFitter<'a, T>
where
    T: SchedulerNumeric,
{
    pub fn new(durations: &'a [T], gaps: Vec<ClosedInterval<T>>) -> Self {
        Self {
            durations,
            fitter: OrderedFitter::new(gaps),
            members: SmallVec::new(),
            order: SmallVec::new(),
            out: Vec::with_capacity(durations.len()),
            attempts: 0,
        }
    }

    /// Ordered fit attempts performed so far.
    #[inline]
    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    /// Tries the subset selected by `mask`, consulting `monitor` before every
    /// ordered fit attempt.
    pub fn try_subset(&mut self, mask: u64, monitor: &mut dyn SearchMonitor<T>) -> SubsetFit<T> {
        debug_assert!(
            self.durations.len() >= 64 || mask >> self.durations.len() == 0,
            "called SubsetFitter::try_subset with a mask selecting unknown tasks"
        );

        self.members.clear();
        self.members
            .extend((0..self.durations.len()).filter(|&i| mask & (1u64 << i) != 0));
        self.order.clear();
        self.order.extend(0..self.members.len());

        loop {
            monitor.on_step();
            if let SearchCommand::Terminate(reason) = monitor.search_command() {
                return SubsetFit::Aborted(reason);
            }
            self.attempts += 1;

            let durations = self.durations;
            let members = &self.members;
            let order = self.order.iter().map(|&pos| durations[members[pos]]);
            if self.fitter.fit_into(order, &mut self.out) {
                return SubsetFit::Fits(self.remap());
            }

            if !next_permutation(&mut self.order) {
                return SubsetFit::NoOrderingFits;
            }
        }
    }

    // `out[j]` belongs to subset position `order[j]`; restore subset order.
    fn remap(&self) -> Placement<T> {
        let mut intervals: SmallVec<[ClosedInterval<T>; 16]> = self.out.iter().copied().collect();
        for (&pos, &interval) in self.order.iter().zip(&self.out) {
            intervals[pos] = interval;
        }
        let tasks = self.members.iter().map(|&i| TaskIndex::new(i)).collect();
        Placement::new(tasks, intervals.into_vec())
    }
}
