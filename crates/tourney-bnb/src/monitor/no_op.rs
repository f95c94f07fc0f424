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

use crate::{monitor::tree_search_monitor::TreeSearchMonitor, stats::BnbSolverStatistics};
use tourney_model::instance::TournamentInstance;
use tourney_search::num::SolverNumeric;

/// A monitor that ignores every event and never stops the search.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct NoOperationMonitor;

impl NoOperationMonitor {
    #[inline(always)]
    pub fn new() -> Self {
        Self
    }
}

impl<T> TreeSearchMonitor<T> for NoOperationMonitor
where
    T: SolverNumeric,
{
    #[inline(always)]
    fn name(&self) -> &str {
        "NoOperationMonitor"
    }

    #[inline(always)]
    fn on_enter_search(
        &mut self,
        _instance: &TournamentInstance<T>,
        _statistics: &BnbSolverStatistics<T>,
    ) {
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::SearchState;
    use tourney_search::command::SearchCommand;

    #[test]
    fn test_always_continues() {
        let mut monitor = NoOperationMonitor::new();
        let state = SearchState::<i64>::new(4);
        let stats = BnbSolverStatistics::<i64>::default();
        assert_eq!(
            TreeSearchMonitor::<i64>::search_command(&mut monitor, &state, &stats),
            SearchCommand::Continue
        );
        assert_eq!(TreeSearchMonitor::<i64>::name(&monitor), "NoOperationMonitor");
    }
}
