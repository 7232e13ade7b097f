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

//! # Slotfit Fit
//!
//! The fitting algorithms: turning busy intervals into free gaps, placing a
//! fixed ordering of durations into those gaps, and the strategies that search
//! for the largest subset of tasks that can be placed.
//!
//! ## Modules
//!
//! - `gaps`: complement of the busy intervals within the window.
//! - `fitter`: ordered first-fit with a monotonic gap cursor.
//! - `permutation`: lexicographic permutation stepping.
//! - `subset`: tries every ordering of one subset until one fits.
//! - `exhaustive`: sequential search over every subset mask.
//! - `parallel`: the same search spread over a rayon pool, with identical results.
//! - `greedy`: best-fit heuristic, smallest duration into the tightest gap.

pub mod exhaustive;
pub mod fitter;
pub mod gaps;
pub mod greedy;
pub mod parallel;
pub mod permutation;
pub mod subset;

/// Largest task count the mask-based strategies can enumerate.
pub const MAX_EXHAUSTIVE_TASKS: usize = 63;
