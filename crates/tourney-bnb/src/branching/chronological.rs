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
    branching::decision::{Decision, DecisionBuilder},
    constraints::ConstraintSet,
    eval::evaluator::ObjectiveEvaluator,
    state::SearchState,
};
use std::iter::FusedIterator;
use tourney_model::{
    fixture::{Fixture, Venue},
    index::{DateIndex, TeamIndex},
    instance::TournamentInstance,
};
use tourney_search::num::SolverNumeric;

/// A decision builder that tries the opponents of the next empty cell in
/// index order, hosting before visiting.
///
/// Decisions are produced lazily: a candidate is checked and priced only when
/// the solver asks for it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ChronologicalBuilder;

impl ChronologicalBuilder {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl<T, E> DecisionBuilder<T, E> for ChronologicalBuilder
where
    T: SolverNumeric,
    E: ObjectiveEvaluator<T>,
{
    type DecisionIterator<'a>
        = ChronologicalIter<'a, T, E>
    where
        T: 'a,
        E: 'a,
        Self: 'a;

    fn name(&self) -> &str {
        "ChronologicalBuilder"
    }

    fn next_decision<'a>(
        &'a mut self,
        evaluator: &'a mut E,
        instance: &'a TournamentInstance<T>,
        constraints: &'a ConstraintSet,
        state: &'a SearchState<T>,
    ) -> Self::DecisionIterator<'a> {
        ChronologicalIter {
            cell: state.next_cell(),
            candidate: 0,
            instance,
            constraints,
            state,
            evaluator,
        }
    }
}

/// Iterator over the admissible fixtures of one cell, in
/// `(opponent, home-then-away)` order.
#[derive(Debug)]
pub struct ChronologicalIter<'a, T, E> {
    cell: Option<(DateIndex, TeamIndex)>,
    /// `2 * opponent + venue`, with home as `0`.
    candidate: usize,
    instance: &'a TournamentInstance<T>,
    constraints: &'a ConstraintSet,
    state: &'a SearchState<T>,
    evaluator: &'a mut E,
}

impl<T, E> Iterator for ChronologicalIter<'_, T, E>
where
    T: SolverNumeric,
    E: ObjectiveEvaluator<T>,
{
    type Item = Decision<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let (date, team) = self.cell?;
        let end = 2 * self.instance.num_teams();

        while self.candidate < end {
            let opponent = TeamIndex::new(self.candidate / 2);
            let venue = if self.candidate % 2 == 0 {
                Venue::Home
            } else {
                Venue::Away
            };
            self.candidate += 1;

            if opponent == team {
                continue;
            }

            if let Ok(decision) = Decision::try_new(
                date,
                team,
                Fixture::new(opponent, venue),
                self.instance,
                self.constraints,
                self.state,
                self.evaluator,
            ) {
                return Some(decision);
            }
        }

        self.cell = None;
        None
    }
}

impl<T, E> FusedIterator for ChronologicalIter<'_, T, E>
where
    T: SolverNumeric,
    E: ObjectiveEvaluator<T>,
{
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

    fn instance() -> TournamentInstance<IntegerType> {
        let mut b = TournamentInstanceBuilder::new(4);
        b.set_stand_bounds(1, 3);
        for t in 0..4 {
            b.set_row(ti(t), &[1, 1, 1, 1]);
        }
        b.build().unwrap()
    }

    #[test]
    fn test_root_order_is_opponent_then_home_first() {
        let inst = instance();
        let cs = ConstraintSet::new(&inst, StreakBoundaryPolicy::Strict);
        let state = SearchState::new(4);
        let mut eval = TravelCostEvaluator;
        let mut builder = ChronologicalBuilder::new();

        let fixtures: Vec<Fixture> = builder
            .next_decision(&mut eval, &inst, &cs, &state)
            .map(|d| d.fixture())
            .collect();
        assert_eq!(
            fixtures,
            vec![
                Fixture::home(ti(1)),
                Fixture::away(ti(1)),
                Fixture::home(ti(2)),
                Fixture::away(ti(2)),
                Fixture::home(ti(3)),
                Fixture::away(ti(3)),
            ]
        );
    }

    #[test]
    fn test_targets_lowest_unpaired_team_and_skips_busy() {
        let inst = instance();
        let cs = ConstraintSet::new(&inst, StreakBoundaryPolicy::Strict);
        let mut state = SearchState::new(4);
        state
            .assign(DateIndex::new(0), ti(0), Fixture::home(ti(2)))
            .unwrap();
        let mut eval = TravelCostEvaluator;
        let mut builder = ChronologicalBuilder::new();

        let decisions: Vec<Decision<IntegerType>> = builder
            .next_decision(&mut eval, &inst, &cs, &state)
            .collect();
        assert_eq!(decisions.len(), 2);
        assert!(decisions.iter().all(|d| d.team() == ti(1)));
        assert_eq!(decisions[0].fixture(), Fixture::home(ti(3)));
        assert_eq!(decisions[1].fixture(), Fixture::away(ti(3)));
    }

    #[test]
    fn test_iterator_is_fused_and_empty_when_complete() {
        let mut b = TournamentInstanceBuilder::<IntegerType>::new(2);
        b.set_stand_bounds(1, 2);
        b.set_row(ti(0), &[1, 1]);
        b.set_row(ti(1), &[1, 1]);
        let inst = b.build().unwrap();
        let cs = ConstraintSet::new(&inst, StreakBoundaryPolicy::Strict);
        let mut state = SearchState::new(2);
        state
            .assign(DateIndex::new(0), ti(0), Fixture::home(ti(1)))
            .unwrap();
        state
            .assign(DateIndex::new(1), ti(0), Fixture::away(ti(1)))
            .unwrap();
        let mut eval = TravelCostEvaluator;
        let mut builder = ChronologicalBuilder::new();

        let mut iter = builder.next_decision(&mut eval, &inst, &cs, &state);
        assert!(iter.next().is_none());
        assert!(iter.next().is_none());
    }
}
