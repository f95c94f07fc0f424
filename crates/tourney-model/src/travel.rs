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

//! Travel cost of a calendar.
//!
//! Every team starts and ends the season at home. Between two consecutive
//! dates a team moves from the venue of its first game to the venue of its
//! second one:
//!
//! | from \ to | home `t`   | away at `b` |
//! |-----------|------------|-------------|
//! | home `t`  | `d[t][t]`  | `d[t][b]`   |
//! | away `a`  | `d[t][a]`  | `d[a][b]`   |
//!
//! The cost of team `t` is the leg from home to its first venue, the legs
//! between consecutive dates, and the leg from its last venue back home. The
//! total cost sums over all teams. "Outside the season" behaves exactly like
//! a home game, so the first and last legs use the same table.

use crate::{
    calendar::Calendar,
    fixture::{Fixture, Venue},
    index::TeamIndex,
    instance::TournamentInstance,
};
use num_traits::{PrimInt, Signed};

/// Returns the cost for `team` of moving from `from` to `to`. `None` stands
/// for the time before the first or after the last date.
#[inline]
pub fn leg_cost<T>(
    instance: &TournamentInstance<T>,
    team: TeamIndex,
    from: Option<Fixture>,
    to: Option<Fixture>,
) -> T
where
    T: PrimInt + Signed,
{
    let away_at = |fixture: Option<Fixture>| match fixture {
        Some(f) if f.venue() == Venue::Away => Some(f.opponent()),
        _ => None,
    };

    match (away_at(from), away_at(to)) {
        (Some(a), Some(b)) => instance.distance(a, b),
        (Some(a), None) => instance.distance(team, a),
        (None, Some(b)) => instance.distance(team, b),
        (None, None) => instance.home_cost(team),
    }
}

/// Returns the travel cost of `team` over the whole calendar.
///
/// # Panics
///
/// Panics if the calendar and the instance disagree on the number of teams.
pub fn team_cost<T>(instance: &TournamentInstance<T>, calendar: &Calendar, team: TeamIndex) -> T
where
    T: PrimInt + Signed,
{
    assert_eq!(
        instance.num_teams(),
        calendar.num_teams(),
        "called `travel::team_cost` with a calendar of {} teams for an instance of {} teams",
        calendar.num_teams(),
        instance.num_teams()
    );

    let mut previous = None;
    let mut cost = T::zero();
    for fixture in calendar.team_fixtures(team) {
        cost = cost.saturating_add(leg_cost(instance, team, previous, Some(fixture)));
        previous = Some(fixture);
    }
    cost.saturating_add(leg_cost(instance, team, previous, None))
}

/// Returns the total travel cost of all teams.
pub fn total_cost<T>(instance: &TournamentInstance<T>, calendar: &Calendar) -> T
where
    T: PrimInt + Signed,
{
    instance
        .teams()
        .map(|team| team_cost(instance, calendar, team))
        .fold(T::zero(), |acc, c| acc.saturating_add(c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::TournamentInstanceBuilder;

    type IntegerType = i64;

    fn ti(i: usize) -> TeamIndex {
        TeamIndex::new(i)
    }

    fn instance(n: usize, rows: &[&[IntegerType]]) -> TournamentInstance<IntegerType> {
        let mut b = TournamentInstanceBuilder::new(n);
        b.set_stand_bounds(1, 3);
        for (t, row) in rows.iter().enumerate() {
            b.set_row(ti(t), row);
        }
        b.build().unwrap()
    }

    #[test]
    fn test_leg_cost_table() {
        let inst = instance(
            4,
            &[&[1, 2, 3, 4], &[5, 6, 7, 8], &[9, 10, 11, 12], &[13, 14, 15, 16]],
        );
        let t = ti(0);
        // away(2) -> away(3) uses d[2][3]
        assert_eq!(
            leg_cost(&inst, t, Some(Fixture::away(ti(1))), Some(Fixture::away(ti(2)))),
            7
        );
        // away(2) -> home uses d[t][2]
        assert_eq!(
            leg_cost(&inst, t, Some(Fixture::away(ti(1))), Some(Fixture::home(ti(3)))),
            2
        );
        // home -> away(3) uses d[t][3]
        assert_eq!(
            leg_cost(&inst, t, Some(Fixture::home(ti(1))), Some(Fixture::away(ti(2)))),
            3
        );
        // home -> home uses d[t][t]
        assert_eq!(
            leg_cost(&inst, t, Some(Fixture::home(ti(1))), Some(Fixture::home(ti(2)))),
            1
        );
        // outside counts as home on both ends
        assert_eq!(leg_cost(&inst, t, None, Some(Fixture::away(ti(3)))), 4);
        assert_eq!(leg_cost(&inst, t, Some(Fixture::away(ti(3))), None), 4);
        assert_eq!(leg_cost(&inst, t, None, None), 1);
    }

    #[test]
    fn test_two_team_costs() {
        // d = [[1, 10], [20, 2]]
        let inst = instance(2, &[&[1, 10], &[20, 2]]);
        // Team 0 at home first, then away at team 1.
        let calendar = Calendar::from_signed_rows(2, &[vec![2, -1], vec![-2, 1]]).unwrap();
        // Team 0: start->home 1, home->away(1) 10, away(1)->end 10 = 21
        assert_eq!(team_cost(&inst, &calendar, ti(0)), 21);
        // Team 1: start->away(0) 20, away(0)->home 20, home->end 2 = 42
        assert_eq!(team_cost(&inst, &calendar, ti(1)), 42);
        assert_eq!(total_cost(&inst, &calendar), 63);

        let mirrored = Calendar::from_signed_rows(2, &[vec![-2, 1], vec![2, -1]]).unwrap();
        // Team 0: 10 + 10 + 1 = 21, team 1: 2 + 20 + 20 = 42
        assert_eq!(total_cost(&inst, &mirrored), 63);
    }

    #[test]
    fn test_unit_matrix_cost_counts_legs() {
        // With every distance 1, each team pays one unit per leg: 2(n-1) + 1.
        let inst = instance(2, &[&[1, 1], &[1, 1]]);
        let calendar = Calendar::from_signed_rows(2, &[vec![2, -1], vec![-2, 1]]).unwrap();
        assert_eq!(total_cost(&inst, &calendar), 2 * 3);
    }
}
