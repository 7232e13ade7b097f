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

//! # Slotfit Search
//!
//! Search infrastructure shared by every scheduling strategy: the numeric
//! bound, lifecycle monitors that observe and stop a search, the strategy
//! interface, the incumbent holder used by parallel searches, and the outcome
//! and statistics types a search reports.
//!
//! ## Modules
//!
//! - `num`: `SchedulerNumeric`, the integer bound used throughout the search.
//! - `monitor`: `SearchMonitor` trait and monitors (composite, time limit,
//!   step budget, interrupt, tracing log).
//! - `strategy`: `SchedulingStrategy` trait and `StrategyContext`.
//! - `incumbent`: `SharedIncumbent`, a deterministic best-placement holder for
//!   concurrent searches.
//! - `result`: `SchedulerResult`, `TerminationReason`, `SchedulerOutcome`.
//! - `stats`: `SearchStatistics` and its builder.

pub mod incumbent;
pub mod monitor;
pub mod num;
pub mod result;
pub mod stats;
pub mod strategy;
