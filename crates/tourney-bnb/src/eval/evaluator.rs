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

use crate::state::SearchState;
use tourney_model::{
    fixture::Fixture,
    index::{DateIndex, TeamIndex},
    instance::TournamentInstance,
};
use tourney_search::num::SolverNumeric;

/// A strategy for pricing fixtures and bounding the cost still to come.
///
/// `ObjectiveEvaluator` decouples the solver from the bound it uses. The
/// solver calls:
/// - `prepare` once per solve, before anything else,
/// - `evaluate_fixture` to price a candidate cell together with its mirror,
/// - `lower_bound` to bound the total cost of any completion of the state.
///
/// `None` from `estimate_remaining_cost` marks a state that cannot be
/// completed.
pub trait ObjectiveEvaluator<T>
where
    T: SolverNumeric,
{
    fn name(&self) -> &str;

    /// Precomputes instance-dependent tables.
    fn prepare(&mut self, _instance: &TournamentInstance<T>) {}

    /// Returns the cost that assigning `fixture` to `team` on `date` adds,
    /// counting both teams of the game.
    ///
    /// # Panics
    ///
    /// Panics if `date` or `team` lie outside the instance.
    fn evaluate_fixture(
        &mut self,
        instance: &TournamentInstance<T>,
        state: &SearchState<T>,
        date: DateIndex,
        team: TeamIndex,
        fixture: Fixture,
    ) -> T;

    /// Estimates the cost still to come, without the accumulated cost of the
    /// state. Must never overestimate.
    fn estimate_remaining_cost(
        &mut self,
        instance: &TournamentInstance<T>,
        state: &SearchState<T>,
    ) -> Option<T>;

    /// Returns `g + h`: the accumulated cost plus the estimate.
    fn lower_bound(
        &mut self,
        instance: &TournamentInstance<T>,
        state: &SearchState<T>,
    ) -> Option<T> {
        let h = self.estimate_remaining_cost(instance, state)?;
        Some(state.current_cost().saturating_add_val(h))
    }
}

impl<T> std::fmt::Debug for dyn ObjectiveEvaluator<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ObjectiveEvaluator({})", self.name())
    }
}

impl<T> std::fmt::Display for dyn ObjectiveEvaluator<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ObjectiveEvaluator({})", self.name())
    }
}
