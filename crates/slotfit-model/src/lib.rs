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

//! # Slotfit Model
//!
//! The domain model of the slotfit day scheduler: what the caller asks for
//! (a [`problem::Problem`]) and what the scheduler answers with (a
//! [`placement::Placement`]).
//!
//! ## Architecture
//!
//! * **`index`**: `TaskIndex`, the strongly typed position of a duration in the caller's task list.
//! * **`problem`**: The validated, immutable `Problem` and its `ProblemBuilder`, plus the
//!   search-space `Complexity` estimate.
//! * **`placement`**: The scheduler output. Every placed interval is paired with the
//!   `TaskIndex` it belongs to, so callers never have to diff durations by value.
//! * **`day`**: Wall-clock helpers for callers working on a 24h day (`HH:MM` parsing and
//!   splitting ranges that cross midnight).
//!
//! ## Design Philosophy
//!
//! 1.  **Fail-Fast**: Contract violations (inverted window, inverted busy interval,
//!     non-positive duration) are rejected by the builder, so the search never sees them.
//! 2.  **Identity by position**: Durations carry no names. The only identity is the index.

pub mod day;
pub mod index;
pub mod placement;
pub mod problem;
