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
    constraints::{ConstraintSet, Rejection},
    eval::evaluator::ObjectiveEvaluator,
    state::SearchState,
};
use std::iter::FusedIterator;
use tourney_model::{
    fixture::Fixture,
    index::{DateIndex, TeamIndex},
    instance::TournamentInstance,
};
use tourney_search::num::SolverNumeric;

/// A decision to let `team` play `fixture` on `date`, along with the travel
/// cost it adds for both teams of the game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Decision<T> {
    cost_delta: T,
    date: DateIndex,
    team: TeamIndex,
    fixture: Fixture,
}

impl<T> std::fmt::Display for Decision<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Decision(date: {}, team: {}, fixture: {}, cost_delta: {})",
            self.date.get() + 1,
            self.team.get() + 1,
            self.fixture.to_signed(),
            self.cost_delta
        )
    }
}

impl<T: Ord> Ord for Decision<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.date
            .cmp(&other.date)
            .then(self.team.cmp(&other.team))
            .then(self.fixture.cmp(&other.fixture))
            .then(self.cost_delta.cmp(&other.cost_delta))
    }
}

impl<T: Ord> PartialOrd for Decision<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Decision<T> {
    /// Creates a decision with a known cost delta. No feasibility check is
    /// performed; use `try_new` for candidates.
    #[inline]
    pub const fn new(cost_delta: T, date: DateIndex, team: TeamIndex, fixture: Fixture) -> Self {
        Self {
            cost_delta,
            date,
            team,
            fixture,
        }
    }

    #[inline(always)]
    pub const fn date(&self) -> DateIndex {
        self.date
    }

    #[inline(always)]
    pub const fn team(&self) -> TeamIndex {
        self.team
    }

    #[inline(always)]
    pub const fn fixture(&self) -> Fixture {
        self.fixture
    }

    #[inline(always)]
    pub fn cost_delta(&self) -> T
    where
        T: Copy,
    {
        self.cost_delta
    }
}

impl<T> Decision<T>
where
    T: SolverNumeric,
{
    /// Checks `fixture` for `team` on `date` against `constraints` and, if it
    /// is admissible, prices it with `evaluator`.
    #[inline]
    pub fn try_new<E>(
        date: DateIndex,
        team: TeamIndex,
        fixture: Fixture,
        instance: &TournamentInstance<T>,
        constraints: &ConstraintSet,
        state: &SearchState<T>,
        evaluator: &mut E,
    ) -> Result<Self, Rejection>
    where
        E: ObjectiveEvaluator<T>,
    {
        constraints.check(state, date, team, fixture)?;
        let cost_delta = evaluator.evaluate_fixture(instance, state, date, team, fixture);
        Ok(Self::new(cost_delta, date, team, fixture))
    }
}

/// Generates the candidate decisions for the next empty cell of a state.
pub trait DecisionBuilder<T, E>
where
    T: SolverNumeric,
    E: ObjectiveEvaluator<T>,
{
    type DecisionIterator<'a>: Iterator<Item = Decision<T>> + FusedIterator + 'a
    where
        Self: 'a,
        T: 'a,
        E: 'a;

    fn name(&self) -> &str;

    /// Returns the admissible decisions for `state.next_cell()`, in the
    /// order they should be explored. Empty if the state is complete.
    fn next_decision<'a>(
        &'a mut self,
        evaluator: &'a mut E,
        instance: &'a TournamentInstance<T>,
        constraints: &'a ConstraintSet,
        state: &'a SearchState<T>,
    ) -> Self::DecisionIterator<'a>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::travel::TravelCostEvaluator;
    use tourney_model::{instance::TournamentInstanceBuilder, validation::StreakBoundaryPolicy};

    type IntegerType = i64;

    fn ti(i: usize) -> TeamIndex {
        TeamIndex::new(i)
    }

    #[test]
    fn test_try_new_prices_admissible_fixture() {
        let mut b = TournamentInstanceBuilder::<IntegerType>::new(2);
        b.set_stand_bounds(1, 2);
        b.set_row(ti(0), &[1, 10]);
        b.set_row(ti(1), &[20, 2]);
        let inst = b.build().unwrap();
        let cs = ConstraintSet::new(&inst, StreakBoundaryPolicy::Strict);
        let state = SearchState::new(2);
        let mut eval = TravelCostEvaluator;

        let d = Decision::try_new(
            DateIndex::new(0),
            ti(0),
            Fixture::away(ti(1)),
            &inst,
            &cs,
            &state,
            &mut eval,
        )
        .unwrap();
        // Team 0 travels to 1 (10), team 1 stays home (2).
        assert_eq!(d.cost_delta(), 12);
        assert_eq!(d.fixture(), Fixture::away(ti(1)));
        assert_eq!(d.to_string(), "Decision(date: 1, team: 1, fixture: -2, cost_delta: 12)");

        assert_eq!(
            Decision::try_new(
                DateIndex::new(0),
                ti(0),
                Fixture::away(ti(0)),
                &inst,
                &cs,
                &state,
                &mut eval,
            ),
            Err(Rejection::SelfMatch)
        );
    }

    #[test]
    fn test_ordering_is_by_cell_then_fixture() {
        let a = Decision::new(9 as IntegerType, DateIndex::new(0), ti(0), Fixture::home(ti(1)));
        let b = Decision::new(1 as IntegerType, DateIndex::new(0), ti(0), Fixture::away(ti(1)));
        let c = Decision::new(0 as IntegerType, DateIndex::new(1), ti(0), Fixture::home(ti(1)));
        assert!(a < b);
        assert!(b < c);
    }
}
