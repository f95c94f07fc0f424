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

use num_traits::Zero;
use std::time::Duration;
use tourney_core::num::SaturatingAddVal;

/// Statistics collected by a single branch-and-bound run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BnbSolverStatistics<T> {
    /// Total nodes visited, including the root.
    pub nodes_explored: u64,
    /// Total steps of the session loop.
    pub steps: u64,
    /// Total returns to a parent node.
    pub backtracks: u64,
    /// Total decisions taken from the stack.
    pub decisions_generated: u64,
    /// The deepest level reached in the tree.
    pub max_depth: u64,
    /// Number of times a date was completed.
    pub dates_completed: u64,
    /// Pruned because no extension satisfied the constraints.
    pub prunings_infeasible: u64,
    /// Pruned because the bound could not beat the incumbent.
    pub prunings_bound: u64,
    /// Solutions accepted by this run.
    pub solutions_found: u64,
    /// Total time spent in the run.
    pub time_total: Duration,
    /// Lower bound at the root node.
    pub root_lower_bound: T,
}

impl<T> Default for BnbSolverStatistics<T>
where
    T: Zero,
{
    fn default() -> Self {
        Self {
            nodes_explored: 0,
            steps: 0,
            backtracks: 0,
            decisions_generated: 0,
            max_depth: 0,
            dates_completed: 0,
            prunings_infeasible: 0,
            prunings_bound: 0,
            solutions_found: 0,
            time_total: Duration::ZERO,
            root_lower_bound: T::zero(),
        }
    }
}

impl<T> BnbSolverStatistics<T> {
    #[inline]
    pub fn on_node_explored(&mut self) {
        self.nodes_explored = self.nodes_explored.saturating_add_val(1);
    }

    #[inline]
    pub fn on_step(&mut self) {
        self.steps = self.steps.saturating_add_val(1);
    }

    #[inline]
    pub fn on_backtrack(&mut self) {
        self.backtracks = self.backtracks.saturating_add_val(1);
    }

    #[inline]
    pub fn on_solution_found(&mut self) {
        self.solutions_found = self.solutions_found.saturating_add_val(1);
    }

    #[inline]
    pub fn on_depth_update(&mut self, depth: u64) {
        self.max_depth = self.max_depth.max(depth);
    }

    #[inline]
    pub fn on_decision_generated(&mut self) {
        self.decisions_generated = self.decisions_generated.saturating_add_val(1);
    }

    #[inline]
    pub fn on_date_completed(&mut self) {
        self.dates_completed = self.dates_completed.saturating_add_val(1);
    }

    #[inline]
    pub fn on_pruning_infeasible(&mut self) {
        self.prunings_infeasible = self.prunings_infeasible.saturating_add_val(1);
    }

    /// Records a pruning event caused by the cost bound, local or shared.
    #[inline]
    pub fn on_pruning_bound(&mut self) {
        self.prunings_bound = self.prunings_bound.saturating_add_val(1);
    }

    #[inline]
    pub fn set_total_time(&mut self, duration: Duration) {
        self.time_total = duration;
    }

    #[inline]
    pub fn set_root_lower_bound(&mut self, bound: T) {
        self.root_lower_bound = bound;
    }

    /// Total number of pruned subtrees.
    #[inline]
    pub fn prunings(&self) -> u64 {
        self.prunings_bound.saturating_add_val(self.prunings_infeasible)
    }
}

impl<T> std::fmt::Display for BnbSolverStatistics<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Tourney-BnB Solver Statistics:")?;
        writeln!(f, "  Nodes explored:       {}", self.nodes_explored)?;
        writeln!(f, "  Steps:                {}", self.steps)?;
        writeln!(f, "  Backtracks:           {}", self.backtracks)?;
        writeln!(f, "  Max depth reached:    {}", self.max_depth)?;
        writeln!(f, "  Dates completed:      {}", self.dates_completed)?;
        writeln!(f, "  Decisions generated:  {}", self.decisions_generated)?;
        writeln!(f, "  Prunings (infeasible):{}", self.prunings_infeasible)?;
        writeln!(f, "  Prunings (bound):     {}", self.prunings_bound)?;
        writeln!(f, "  Solutions found:      {}", self.solutions_found)?;
        writeln!(f, "  Root Lower Bound:     {}", self.root_lower_bound)?;
        writeln!(f, "  Total time:           {:.2?}", self.time_total)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::BnbSolverStatistics;

    #[test]
    fn test_counters_and_display() {
        let mut stats = BnbSolverStatistics::<i64>::default();
        stats.on_node_explored();
        stats.on_node_explored();
        stats.on_backtrack();
        stats.on_pruning_bound();
        stats.on_pruning_infeasible();
        stats.on_depth_update(4);
        stats.on_depth_update(2);
        stats.set_root_lower_bound(12);

        assert_eq!(stats.nodes_explored, 2);
        assert_eq!(stats.backtracks, 1);
        assert_eq!(stats.max_depth, 4);
        assert_eq!(stats.prunings(), 2);

        let rendered = format!("{}", stats);
        assert!(rendered.contains("Nodes explored:       2"));
        assert!(rendered.contains("Root Lower Bound:     12"));
    }

    #[test]
    fn test_counters_saturate() {
        let mut stats = BnbSolverStatistics::<i64> {
            nodes_explored: u64::MAX,
            ..Default::default()
        };
        stats.on_node_explored();
        assert_eq!(stats.nodes_explored, u64::MAX);
    }
}
