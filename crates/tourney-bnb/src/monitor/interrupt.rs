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
    monitor::tree_search_monitor::TreeSearchMonitor, state::SearchState,
    stats::BnbSolverStatistics,
};
use std::sync::atomic::{AtomicBool, Ordering};
use tourney_model::instance::TournamentInstance;
use tourney_search::{command::SearchCommand, num::SolverNumeric};

/// Terminates the search once a shared stop flag is raised.
#[derive(Debug, Clone, Copy)]
pub struct InterruptMonitor<'a> {
    stop: &'a AtomicBool,
}

impl<'a> InterruptMonitor<'a> {
    #[inline]
    pub fn new(stop: &'a AtomicBool) -> Self {
        Self { stop }
    }
}

impl<T> TreeSearchMonitor<T> for InterruptMonitor<'_>
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "InterruptMonitor"
    }

    fn on_enter_search(
        &mut self,
        _instance: &TournamentInstance<T>,
        _statistics: &BnbSolverStatistics<T>,
    ) {
    }

    #[inline]
    fn search_command(
        &mut self,
        _state: &SearchState<T>,
        _statistics: &BnbSolverStatistics<T>,
    ) -> SearchCommand {
        if self.stop.load(Ordering::Relaxed) {
            SearchCommand::Terminate("Interrupt signal received".to_owned())
        } else {
            SearchCommand::Continue
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_follows_flag() {
        let stop = AtomicBool::new(false);
        let mut monitor = InterruptMonitor::new(&stop);
        let state = SearchState::<i64>::new(2);
        let stats = BnbSolverStatistics::default();

        assert_eq!(
            monitor.search_command(&state, &stats),
            SearchCommand::Continue
        );
        stop.store(true, Ordering::Relaxed);
        assert_eq!(
            monitor.search_command(&state, &stats),
            SearchCommand::Terminate("Interrupt signal received".to_owned())
        );
    }
}
