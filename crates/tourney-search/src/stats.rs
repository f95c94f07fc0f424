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

use std::time::Duration;

/// Statistics of a complete solve.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SolverStatistics {
    /// Number of improving or tying solutions accepted during the solve.
    pub solutions_found: u64,
    /// Number of worker threads.
    pub used_threads: usize,
    /// Number of search nodes explored over all workers.
    pub nodes_explored: u64,
    /// Number of subtrees cut by the lower bound over all workers.
    pub nodes_pruned: u64,
    /// Wall-clock duration of the solve.
    pub solve_duration: Duration,
}

impl std::fmt::Display for SolverStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solver Statistics:")?;
        writeln!(f, "  Solutions Found: {}", self.solutions_found)?;
        writeln!(f, "  Used Threads: {}", self.used_threads)?;
        writeln!(f, "  Nodes Explored: {}", self.nodes_explored)?;
        writeln!(f, "  Nodes Pruned: {}", self.nodes_pruned)?;
        writeln!(
            f,
            "  Solve Duration (secs): {:.3}",
            self.solve_duration.as_secs_f64()
        )
    }
}

/// Builder for `SolverStatistics`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverStatisticsBuilder {
    statistics: SolverStatistics,
}

impl Default for SolverStatisticsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverStatisticsBuilder {
    #[inline]
    pub fn new() -> Self {
        Self {
            statistics: SolverStatistics {
                used_threads: 1,
                ..SolverStatistics::default()
            },
        }
    }

    #[inline]
    pub fn solutions_found(mut self, solutions_found: u64) -> Self {
        self.statistics.solutions_found = solutions_found;
        self
    }

    #[inline]
    pub fn used_threads(mut self, used_threads: usize) -> Self {
        self.statistics.used_threads = used_threads;
        self
    }

    #[inline]
    pub fn nodes_explored(mut self, nodes_explored: u64) -> Self {
        self.statistics.nodes_explored = nodes_explored;
        self
    }

    #[inline]
    pub fn nodes_pruned(mut self, nodes_pruned: u64) -> Self {
        self.statistics.nodes_pruned = nodes_pruned;
        self
    }

    #[inline]
    pub fn solve_duration(mut self, solve_duration: Duration) -> Self {
        self.statistics.solve_duration = solve_duration;
        self
    }

    #[inline]
    pub fn build(self) -> SolverStatistics {
        self.statistics
    }
}

#[cfg(test)]
mod tests {
    use super::{SolverStatistics, SolverStatisticsBuilder};
    use std::time::Duration;

    #[test]
    fn test_builder_sets_all_fields() {
        let stats = SolverStatisticsBuilder::new()
            .solutions_found(3)
            .used_threads(8)
            .nodes_explored(1_000)
            .nodes_pruned(250)
            .solve_duration(Duration::from_millis(1234))
            .build();

        assert_eq!(stats.solutions_found, 3);
        assert_eq!(stats.used_threads, 8);
        assert_eq!(stats.nodes_explored, 1_000);
        assert_eq!(stats.nodes_pruned, 250);
        assert_eq!(stats.solve_duration, Duration::from_millis(1234));
    }

    #[test]
    fn test_builder_defaults_to_one_thread() {
        assert_eq!(SolverStatisticsBuilder::default().build().used_threads, 1);
    }

    #[test]
    fn test_display_formats_all_fields() {
        let stats = SolverStatistics {
            solutions_found: 2,
            used_threads: 4,
            nodes_explored: 99,
            nodes_pruned: 7,
            solve_duration: Duration::from_millis(1234),
        };

        let rendered = format!("{}", stats);
        assert!(rendered.contains("Solver Statistics:"));
        assert!(rendered.contains("Solutions Found: 2"));
        assert!(rendered.contains("Used Threads: 4"));
        assert!(rendered.contains("Nodes Explored: 99"));
        assert!(rendered.contains("Nodes Pruned: 7"));
        assert!(rendered.contains("Solve Duration (secs): 1.234"));
    }
}
