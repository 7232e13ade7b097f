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

//! # Shared Incumbent
//!
//! Holds the best placement found by concurrent workers of an exhaustive
//! search. Candidates are ordered by the number of placed tasks (more is
//! better) and then by subset mask (lower is better). That order is total, so
//! the installed placement at the end of a search does not depend on how the
//! work was scheduled across threads: it is exactly the placement a sequential
//! search visiting masks in ascending order would keep.
//!
//! The placed-task count is mirrored in an atomic for lock-free pruning
//! checks; the mutex-protected pair is the source of truth.
//!
//! ```rust
//! use slotfit_search::incumbent::SharedIncumbent;
//! use slotfit_model::{index::TaskIndex, placement::Placement};
//! use slotfit_core::math::interval::ClosedInterval;
//!
//! let inc: SharedIncumbent<i64> = SharedIncumbent::new();
//! let candidate = Placement::new(vec![TaskIndex::new(0)], vec![ClosedInterval::new(0, 3)]);
//! assert!(inc.try_install(0b1, &candidate));
//! assert_eq!(inc.best_count(), 1);
//! ```

use num_traits::PrimInt;
use slotfit_model::placement::Placement;
use std::sync::{
    Mutex, MutexGuard, PoisonError,
    atomic::{AtomicUsize, Ordering},
};

#[derive(Debug)]
struct Installed<T>
where
    T: PrimInt,
{
    mask: u64,
    placement: Placement<T>,
}

#[derive(Debug)]
pub struct SharedIncumbent<T>
where
    T: PrimInt,
{
    /// Placed-task count of the incumbent, `0` while nothing is installed.
    best_count: AtomicUsize,
    installed: Mutex<Option<Installed<T>>>,
}

impl<T> Default for SharedIncumbent<T>
where
    T: PrimInt,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Display for SharedIncumbent<T>
where
    T: PrimInt,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Incumbent(best_count: {})", self.best_count())
    }
}

impl<T> SharedIncumbent<T>
where
    T: PrimInt,
{
    #[inline]
    pub fn new() -> Self {
        Self {
            best_count: AtomicUsize::new(0),
            installed: Mutex::new(None),
        }
    }

    // A worker that panicked mid-search cannot leave the pair half-written,
    // so a poisoned lock still holds a consistent incumbent.
    #[inline]
    fn lock(&self) -> MutexGuard<'_, Option<Installed<T>>> {
        self.installed.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the number of tasks placed by the incumbent.
    #[inline]
    pub fn best_count(&self) -> usize {
        self.best_count.load(Ordering::Acquire)
    }

    /// Returns `true` if a subset of `count` tasks with the given mask could
    /// still replace the incumbent.
    ///
    /// A `false` answer is final: the incumbent only ever improves.
    pub fn might_improve(&self, count: usize, mask: u64) -> bool {
        let best = self.best_count();
        if count != best {
            return count > best;
        }
        match self.lock().as_ref() {
            Some(current) => count > current.placement.len() || mask < current.mask,
            None => count > 0,
        }
    }

    /// Installs `candidate` if it places more tasks than the incumbent, or as
    /// many tasks from a lower subset mask. Empty placements are never
    /// installed. Returns `true` if the candidate was installed.
    pub fn try_install(&self, mask: u64, candidate: &Placement<T>) -> bool {
        let count = candidate.len();
        if count == 0 || count < self.best_count() {
            return false;
        }

        let mut guard = self.lock();
        if let Some(current) = guard.as_ref() {
            let current_count = current.placement.len();
            if count < current_count || (count == current_count && mask >= current.mask) {
                return false;
            }
        }

        *guard = Some(Installed {
            mask,
            placement: candidate.clone(),
        });
        self.best_count.store(count, Ordering::Release);
        true
    }

    /// Consumes the holder and returns the incumbent placement, if any.
    pub fn into_inner(self) -> Option<Placement<T>> {
        self.installed
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .map(|i| i.placement)
    }
}
