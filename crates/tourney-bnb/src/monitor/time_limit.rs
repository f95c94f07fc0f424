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
use tourney_model::instance::TournamentInstance;
use tourney_search::{command::SearchCommand, num::SolverNumeric};
use std::time::{Duration, Instant};

/// Terminates the search once a wall-clock budget is spent.
///
/// The budget is either relative to the start of the search (`new`) or an
/// absolute deadline shared by several searches (`with_deadline`). The clock
/// is read on every poll whose counter satisfies `polls & mask == 0`,
/// including the first one.
#[derive(Debug, Clone)]
pub struct TimeLimitMonitor {
    time_limit: Option<Duration>,
    deadline: Option<Instant>,
    clock_check_mask: u64,
    polls: u64,
}

impl TimeLimitMonitor {
    pub const DEFAULT_CLOCK_CHECK_MASK: u64 = 0x3F;

    /// Limits every search to `time_limit`, counted from `on_enter_search`.
    pub fn new(time_limit: Duration) -> Self {
        Self {
            time_limit: Some(time_limit),
            deadline: None,
            clock_check_mask: Self::DEFAULT_CLOCK_CHECK_MASK,
            polls: 0,
        }
    }

    /// Stops every search at the absolute instant `deadline`.
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            time_limit: None,
            deadline: Some(deadline),
            clock_check_mask: Self::DEFAULT_CLOCK_CHECK_MASK,
            polls: 0,
        }
    }

    /// Sets how often the clock is read; `0` reads it on every poll.
    pub fn with_clock_check_mask(mut self, clock_check_mask: u64) -> Self {
        self.clock_check_mask = clock_check_mask;
        self
    }

    #[inline]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}

impl std::fmt::Display for TimeLimitMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.time_limit {
            Some(limit) => write!(f, "TimeLimitMonitor(limit: {}ms)", limit.as_millis()),
            None => write!(f, "TimeLimitMonitor(deadline)"),
        }
    }
}

impl<T> TreeSearchMonitor<T> for TimeLimitMonitor
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "TimeLimitMonitor"
    }

    fn on_enter_search(
        &mut self,
        _instance: &TournamentInstance<T>,
        _statistics: &BnbSolverStatistics<T>,
    ) {
        self.polls = 0;
        if let Some(limit) = self.time_limit {
            // An unrepresentable deadline means no deadline.
            self.deadline = Instant::now().checked_add(limit);
        }
    }

    fn search_command(
        &mut self,
        _state: &SearchState<T>,
        _statistics: &BnbSolverStatistics<T>,
    ) -> SearchCommand {
        let polls = self.polls;
        self.polls = self.polls.wrapping_add(1);
        if polls & self.clock_check_mask != 0 {
            return SearchCommand::Continue;
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => {
                SearchCommand::Terminate("time limit exceeded".to_owned())
            }
            _ => SearchCommand::Continue,
        }
    }
}
