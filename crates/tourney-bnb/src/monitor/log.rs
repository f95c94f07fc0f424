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
    branching::decision::Decision, monitor::tree_search_monitor::TreeSearchMonitor,
    state::SearchState, stats::BnbSolverStatistics,
};
use tourney_model::{instance::TournamentInstance, solution::Solution};
use tourney_search::num::SolverNumeric;
use std::time::{Duration, Instant};

/// Reports search progress through the `log` facade at `info` level.
///
/// The clock is only read when `nodes_explored & clock_check_mask == 0`.
#[derive(Debug, Clone)]
pub struct LogTreeSearchMonitor<T> {
    start_time: Instant,
    last_log_time: Instant,
    log_interval: Duration,
    clock_check_mask: u64,
    best_cost: Option<T>,
}

impl<T> LogTreeSearchMonitor<T>
where
    T: SolverNumeric,
{
    pub fn new(log_interval: Duration, clock_check_mask: u64) -> Self {
        let now = Instant::now();
        Self {
            start_time: now,
            last_log_time: now,
            log_interval,
            clock_check_mask,
            best_cost: None,
        }
    }

    #[inline]
    pub fn best_cost(&self) -> Option<T> {
        self.best_cost
    }

    fn log_line(&mut self, state: &SearchState<T>, stats: &BnbSolverStatistics<T>) {
        let now = Instant::now();
        let best = self
            .best_cost
            .map_or_else(|| "inf".to_owned(), |c| c.to_string());
        log::info!(
            "{:>8.1}s | nodes {:>12} | cells {:>4}/{:<4} | best {:>10} | current {:>10} | backtracks {:>10} | pruned {:>10}",
            now.duration_since(self.start_time).as_secs_f32(),
            stats.nodes_explored,
            state.num_assigned_cells(),
            state.num_dates() * state.num_teams(),
            best,
            state.current_cost(),
            stats.backtracks,
            stats.prunings(),
        );
        self.last_log_time = now;
    }
}

impl<T> Default for LogTreeSearchMonitor<T>
where
    T: SolverNumeric,
{
    fn default() -> Self {
        Self::new(Duration::from_secs(1), 4095)
    }
}

impl<T> std::fmt::Display for LogTreeSearchMonitor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "LogTreeSearchMonitor(log_interval: {}ms, clock_check_mask: {})",
            self.log_interval.as_millis(),
            self.clock_check_mask
        )
    }
}

impl<T> TreeSearchMonitor<T> for LogTreeSearchMonitor<T>
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "LogTreeSearchMonitor"
    }

    fn on_enter_search(
        &mut self,
        instance: &TournamentInstance<T>,
        _statistics: &BnbSolverStatistics<T>,
    ) {
        self.start_time = Instant::now();
        self.last_log_time = self.start_time;
        self.best_cost = None;
        log::info!(
            "search started: {} teams, {} dates, stands {}..={}",
            instance.num_teams(),
            instance.num_dates(),
            instance.min_stand(),
            instance.max_stand()
        );
    }

    fn on_descend(
        &mut self,
        state: &SearchState<T>,
        _decision: Decision<T>,
        statistics: &BnbSolverStatistics<T>,
    ) {
        if (statistics.nodes_explored & self.clock_check_mask) == 0
            && self.last_log_time.elapsed() >= self.log_interval
        {
            self.log_line(state, statistics);
        }
    }

    fn on_solution_found(&mut self, solution: &Solution<T>, statistics: &BnbSolverStatistics<T>) {
        let cost = solution.total_cost();
        if self.best_cost.is_none_or(|best| cost < best) {
            log::info!(
                "{:>8.1}s | new best cost {} after {} nodes",
                self.start_time.elapsed().as_secs_f32(),
                cost,
                statistics.nodes_explored
            );
        }
        self.best_cost = Some(self.best_cost.map_or(cost, |best| best.min(cost)));
    }

    fn on_exit_search(&mut self, statistics: &BnbSolverStatistics<T>) {
        log::info!(
            "search finished after {:.3}s: {} nodes, {} solutions",
            self.start_time.elapsed().as_secs_f32(),
            statistics.nodes_explored,
            statistics.solutions_found
        );
    }
}
