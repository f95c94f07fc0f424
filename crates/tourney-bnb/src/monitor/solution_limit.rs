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

//! Solution-count stop condition.
//!
//! `SolutionLimitMonitor` counts accepted solutions in an `AtomicU64` that
//! may be shared by several searches, and asks the search to stop once the
//! count reaches the limit. Sharing the counter lets a portfolio enforce one
//! limit across all of its workers.

use crate::{
    monitor::tree_search_monitor::TreeSearchMonitor, state::SearchState,
    stats::BnbSolverStatistics,
};
use std::sync::atomic::{AtomicU64, Ordering};
use tourney_model::{instance::TournamentInstance, solution::Solution};
use tourney_search::{command::SearchCommand, num::SolverNumeric};

#[derive(Debug, Clone, Copy)]
pub struct SolutionLimitMonitor<'a> {
    counter: &'a AtomicU64,
    limit: u64,
}

impl<'a> SolutionLimitMonitor<'a> {
    #[inline]
    pub fn new(counter: &'a AtomicU64, limit: u64) -> Self {
        Self { counter, limit }
    }

    #[inline]
    pub fn limit(&self) -> u64 {
        self.limit
    }

    #[inline]
    fn is_reached(&self) -> bool {
        self.counter.load(Ordering::Relaxed) >= self.limit
    }
}

impl<T> TreeSearchMonitor<T> for SolutionLimitMonitor<'_>
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "SolutionLimitMonitor"
    }

    fn on_enter_search(
        &mut self,
        _instance: &TournamentInstance<T>,
        _statistics: &BnbSolverStatistics<T>,
    ) {
    }

    fn search_command(
        &mut self,
        _state: &SearchState<T>,
        _statistics: &BnbSolverStatistics<T>,
    ) -> SearchCommand {
        if self.is_reached() {
            SearchCommand::Terminate(format!("solution limit of {} reached", self.limit))
        } else {
            SearchCommand::Continue
        }
    }

    fn on_solution_found(&mut self, _solution: &Solution<T>, _statistics: &BnbSolverStatistics<T>) {
        self.counter.fetch_add(1, Ordering::Relaxed);
    }
}
