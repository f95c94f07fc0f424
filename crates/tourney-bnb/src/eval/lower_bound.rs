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

//! Lower bound from minimal incoming legs.
//!
//! Every game a team still has to play is reached by exactly one leg, and
//! every team still has to travel home after its last game. The cheapest
//! conceivable leg into each of those venues, summed over all teams, never
//! exceeds what any completion of the calendar costs:
//!
//! - into an away game at `k`: `min(d[t][k], min_{j ∉ {t, k}} d[j][k])`,
//!   coming from home or from another away game,
//! - into a home game: `min_j d[t][j]`, coming from home (`j = t`) or from an
//!   away game at `j`,
//! - back home after the last game: the same row minimum.
//!
//! The tables are built once per instance in `prepare`.

use crate::{
    eval::{evaluator::ObjectiveEvaluator, travel::fixture_cost_delta},
    state::SearchState,
};
use tourney_model::{
    fixture::Fixture,
    index::{DateIndex, TeamIndex},
    instance::TournamentInstance,
};
use tourney_search::num::SolverNumeric;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TravelLowerBoundEvaluator<T> {
    num_teams: usize,
    /// Row-major `away_floor[t * n + k]`.
    away_floor: Vec<T>,
    home_floor: Vec<T>,
}

impl<T> TravelLowerBoundEvaluator<T>
where
    T: SolverNumeric,
{
    #[inline]
    pub fn new() -> Self {
        Self {
            num_teams: 0,
            away_floor: Vec::new(),
            home_floor: Vec::new(),
        }
    }

    /// Creates an evaluator with its tables already built for `instance`.
    pub fn for_instance(instance: &TournamentInstance<T>) -> Self {
        let mut evaluator = Self::new();
        evaluator.build_tables(instance);
        evaluator
    }

    fn build_tables(&mut self, instance: &TournamentInstance<T>) {
        let n = instance.num_teams();
        self.num_teams = n;

        self.home_floor.clear();
        self.home_floor.extend(
            instance
                .teams()
                .map(|t| instance.row(t).iter().copied().min().unwrap_or_else(T::zero)),
        );

        self.away_floor.clear();
        self.away_floor.reserve(n * n);
        for t in instance.teams() {
            for k in instance.teams() {
                let floor = instance
                    .teams()
                    .filter(|&j| j != k)
                    .map(|j| instance.distance(j, k))
                    .min()
                    .map_or(instance.distance(t, k), |m| m.min(instance.distance(t, k)));
                self.away_floor.push(floor);
            }
        }
    }

    #[inline]
    fn away_floor(&self, team: TeamIndex, venue: TeamIndex) -> T {
        self.away_floor[team.get() * self.num_teams + venue.get()]
    }

    #[inline]
    fn home_floor(&self, team: TeamIndex) -> T {
        self.home_floor[team.get()]
    }
}

impl<T> ObjectiveEvaluator<T> for TravelLowerBoundEvaluator<T>
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "TravelLowerBoundEvaluator"
    }

    fn prepare(&mut self, instance: &TournamentInstance<T>) {
        self.build_tables(instance);
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

    fn estimate_remaining_cost(
        &mut self,
        instance: &TournamentInstance<T>,
        state: &SearchState<T>,
    ) -> Option<T> {
        if self.num_teams != instance.num_teams() {
            self.build_tables(instance);
        }

        let mut estimate = T::zero();
        for t in instance.teams() {
            for k in state.pending_visits(t) {
                estimate = estimate.saturating_add_val(self.away_floor(t, k));
            }

            let home_games = state.remaining_home(t);
            let remaining = home_games + state.remaining_away(t);
            if remaining > 0 {
                // Incoming legs of the home games plus the return leg.
                let legs = T::from_usize(home_games + 1)?;
                let legs_cost = self
                    .home_floor(t)
                    .checked_mul(&legs)
                    .unwrap_or_else(T::max_value);
                estimate = estimate.saturating_add_val(legs_cost);
            }
        }
        Some(estimate)
    }
}
