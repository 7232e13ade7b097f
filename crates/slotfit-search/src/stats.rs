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

/// Statistics collected while a strategy searches.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchStatistics {
    /// Subset masks visited, including pruned ones.
    pub subsets_examined: u64,
    /// Subsets skipped because they could not beat the incumbent.
    pub subsets_pruned: u64,
    /// Ordered fit attempts performed.
    pub fit_attempts: u64,
    /// Number of times a strictly better placement was installed.
    pub improvements: u64,
    pub used_threads: usize,
    pub solve_duration: std::time::Duration,
}

impl std::fmt::Display for SearchStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Search Statistics:")?;
        writeln!(f, "  Subsets Examined: {}", self.subsets_examined)?;
        writeln!(f, "  Subsets Pruned: {}", self.subsets_pruned)?;
        writeln!(f, "  Fit Attempts: {}", self.fit_attempts)?;
        writeln!(f, "  Improvements: {}", self.improvements)?;
        writeln!(f, "  Used Threads: {}", self.used_threads)?;
        writeln!(
            f,
            "  Solve Duration (secs): {:.3}",
            self.solve_duration.as_secs_f64()
        )
    }
}

/// Builder for `SearchStatistics`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchStatisticsBuilder {
    subsets_examined: u64,
    subsets_pruned: u64,
    fit_attempts: u64,
    improvements: u64,
    used_threads: usize,
    solve_duration: std::time::Duration,
}

impl Default for SearchStatisticsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchStatisticsBuilder {
    #[inline]
    pub fn new() -> Self {
        Self {
            subsets_examined: 0,
            subsets_pruned: 0,
            fit_attempts: 0,
            improvements: 0,
            used_threads: 1,
            solve_duration: std::time::Duration::ZERO,
        }
    }

    #[inline]
    pub fn subsets_examined(mut self, subsets_examined: u64) -> Self {
        self.subsets_examined = subsets_examined;
        self
    }

    #[inline]
    pub fn subsets_pruned(mut self, subsets_pruned: u64) -> Self {
        self.subsets_pruned = subsets_pruned;
        self
    }

    #[inline]
    pub fn fit_attempts(mut self, fit_attempts: u64) -> Self {
        self.fit_attempts = fit_attempts;
        self
    }

    #[inline]
    pub fn improvements(mut self, improvements: u64) -> Self {
        self.improvements = improvements;
        self
    }

    #[inline]
    pub fn used_threads(mut self, used_threads: usize) -> Self {
        self.used_threads = used_threads;
        self
    }

    #[inline]
    pub fn solve_duration(mut self, solve_duration: std::time::Duration) -> Self {
        self.solve_duration = solve_duration;
        self
    }

    #[inline]
    pub fn build(self) -> SearchStatistics {
        SearchStatistics {
            subsets_examined: self.subsets_examined,
            subsets_pruned: self.subsets_pruned,
            fit_attempts: self.fit_attempts,
            improvements: self.improvements,
            used_threads: self.used_threads,
            solve_duration: self.solve_duration,
        }
    }
}
