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
use smallvec::SmallVec;
use std::iter::FusedIterator;
use tourney_model::{
    fixture::{Fixture, Venue},
    instance::TournamentInstance,
};
use tourney_search::num::SolverNumeric;

/// Inline capacity of the candidate buffer: `2(n - 1)` fixtures for up to 17
/// teams before spilling to the heap.
const INLINE_CANDIDATES: usize = 32;

/// A decision builder that explores the cheapest fixtures first.
///
/// Instead of the index order, this builder:
/// 1. generates every admissible fixture of the next empty cell, priced,
/// 2. sorts them by cost delta, keeping index order among equal costs.
///
/// Cheap moves early tend to find a good incumbent quickly, which makes the
/// bound prune more of the remaining tree.
#[derive(Debug, Clone, Default)]
pub struct NearestVenueBuilder<T> {
    candidates: SmallVec<[Decision<T>; INLINE_CANDIDATES]>,
}

impl<T> NearestVenueBuilder<T> {
    #[inline]
    pub fn new() -> Self {
        Self {
            candidates: SmallVec::new(),
        }
    }

    /// Creates a builder whose buffer holds all candidates of `num_teams`
    /// teams without reallocating.
    #[inline]
    pub fn preallocated(num_teams: usize) -> Self {
        Self {
            candidates: SmallVec::with_capacity(2 * num_teams.saturating_sub(1)),
        }
    }
}

impl<T, E> DecisionBuilder<T, E> for NearestVenueBuilder<T>
where
    T: SolverNumeric,
    E: ObjectiveEvaluator<T>,
{
    type DecisionIterator<'a>
        = NearestVenueIter<'a, T>
    where
        T: 'a,
        E: 'a,
        Self: 'a;

    fn name(&self) -> &str {
        "NearestVenueBuilder"
    }

    fn next_decision<'a>(
        &'a mut self,
        evaluator: &'a mut E,
        instance: &'a TournamentInstance<T>,
        constraints: &'a ConstraintSet,
        state: &'a SearchState<T>,
    ) -> Self::DecisionIterator<'a> {
        self.candidates.clear();

        if let Some((date, team)) = state.next_cell() {
            for opponent in instance.teams().filter(|&k| k != team) {
                for venue in [Venue::Home, Venue::Away] {
                    if let Ok(decision) = Decision::try_new(
                        date,
                        team,
                        Fixture::new(opponent, venue),
                        instance,
                        constraints,
                        state,
                        evaluator,
                    ) {
                        self.candidates.push(decision);
                    }
                }
            }
        }

        // Stable: equal costs keep the index order they were generated in.
        self.candidates.sort_by_key(|d| d.cost_delta());

        NearestVenueIter {
            iter: self.candidates.iter(),
        }
    }
}

/// A lightweight iterator over the sorted candidate buffer.
#[derive(Debug)]
pub struct NearestVenueIter<'a, T> {
    iter: std::slice::Iter<'a, Decision<T>>,
}

impl<T> Iterator for NearestVenueIter<'_, T>
where
    T: Copy,
{
    type Item = Decision<T>;

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().copied()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<T> FusedIterator for NearestVenueIter<'_, T> where T: Copy {}
