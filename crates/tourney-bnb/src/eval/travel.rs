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

//! Exact incremental travel cost.
//!
//! Assigning a cell on date `i` fixes the venue of both teams of the game on
//! that date, which in turn fixes the leg each of them travels from date
//! `i - 1` (or from home on the first date). On the last date the leg back
//! home is fixed as well. Summing these increments over a complete calendar
//! yields exactly `tourney_model::travel::total_cost`.

use crate::{eval::evaluator::ObjectiveEvaluator, state::SearchState};
use tourney_model::{
    fixture::Fixture,
    index::{DateIndex, TeamIndex},
    instance::TournamentInstance,
    travel::leg_cost,
};
use tourney_search::num::SolverNumeric;

/// Returns the travel cost that `team` playing `fixture` on `date` adds for
/// both teams of the game.
pub fn fixture_cost_delta<T>(
    instance: &TournamentInstance<T>,
    state: &SearchState<T>,
    date: DateIndex,
    team: TeamIndex,
    fixture: Fixture,
) -> T
where
    T: SolverNumeric,
{
    let is_last_date = date.get() + 1 == instance.num_dates();
    let mut delta = T::zero();
    for (t, f) in [(team, fixture), (fixture.opponent(), fixture.mirrored(team))] {
        let previous = state.previous_fixture(date, t);
        delta = delta.saturating_add_val(leg_cost(instance, t, previous, Some(f)));
        if is_last_date {
            delta = delta.saturating_add_val(leg_cost(instance, t, Some(f), None));
        }
    }
    delta
}

/// Prices fixtures exactly and estimates the remaining cost as zero.
///
/// This is the plain depth-first bound: a branch is pruned once its
/// accumulated travel alone reaches the incumbent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TravelCostEvaluator;

impl TravelCostEvaluator {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl<T> ObjectiveEvaluator<T> for TravelCostEvaluator
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "TravelCostEvaluator"
    }

    #[inline]
    fn evaluate_fixture(
        &mut self,
        instance: &TournamentInstance<T>,
        state: &SearchState<T>,
        date: DateIndex,
        team: TeamIndex,
        fixture: Fixture,
    ) -> T {
        fixture_cost_delta(instance, state, date, team, fixture)
    }

    #[inline]
    fn estimate_remaining_cost(
        &mut self,
        _instance: &TournamentInstance<T>,
        _state: &SearchState<T>,
    ) -> Option<T> {
        Some(T::zero())
    }
}
