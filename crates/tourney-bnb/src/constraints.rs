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

//! Incremental feasibility checks.
//!
//! `ConstraintSet::check` decides in constant time whether a single cell
//! assignment, together with the mirrored cell of the opponent, keeps the
//! partial calendar extendable. It covers:
//!
//! - range, self-play and opponent availability on the date,
//! - the remaining-pairing bookkeeping (each ordered pairing once),
//! - no immediate repeat of the previous date's opponent (`n >= 4`),
//! - stand length at most `max_stand`,
//! - stand length at least `min_stand` for a stand being closed, subject to
//!   the boundary policy,
//! - look-aheads: the new stand can still reach `min_stand` with the games
//!   left, and the games left of each venue fit into runs of `max_stand`.
//!
//! Every rejection names its cause so monitors and statistics can tell them
//! apart. The checks are necessary conditions only; the complete calendar is
//! validated again with `tourney_model::validation`.

use crate::{fixed::FixedFixture, state::SearchState};
use num_traits::{PrimInt, Signed};
use tourney_model::{
    fixture::{Fixture, Venue},
    index::{DateIndex, TeamIndex},
    instance::TournamentInstance,
    validation::StreakBoundaryPolicy,
};

/// Why an assignment was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// The date, team or opponent lies outside the instance.
    OutOfRange,
    /// The team would play itself.
    SelfMatch,
    /// The opponent already plays on this date.
    OpponentBusy,
    /// This ordered pairing has already been played.
    AlreadyPlayed,
    /// A pinned fixture demands something else for one of the two cells.
    Pinned,
    /// The team met the same opponent on the previous date.
    ImmediateRepeat,
    /// The stand of `team` would exceed `max_stand`.
    StandTooLong { team: TeamIndex },
    /// The stand of `team` that ends here is shorter than `min_stand`.
    StandTooShort { team: TeamIndex },
    /// The stand of `team` can no longer reach `min_stand`.
    MinimumUnreachable { team: TeamIndex },
    /// The games `team` has left cannot be split into stands of at most
    /// `max_stand`.
    RunCapacity { team: TeamIndex },
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfRange => write!(f, "index out of range"),
            Self::SelfMatch => write!(f, "team would play itself"),
            Self::OpponentBusy => write!(f, "opponent already plays on this date"),
            Self::AlreadyPlayed => write!(f, "pairing already played"),
            Self::Pinned => write!(f, "conflicts with a fixed fixture"),
            Self::ImmediateRepeat => write!(f, "same opponent as on the previous date"),
            Self::StandTooLong { team } => {
                write!(f, "stand of team {} would be too long", team.get() + 1)
            }
            Self::StandTooShort { team } => {
                write!(f, "stand of team {} would end too short", team.get() + 1)
            }
            Self::MinimumUnreachable { team } => write!(
                f,
                "stand of team {} can no longer reach the minimum length",
                team.get() + 1
            ),
            Self::RunCapacity { team } => write!(
                f,
                "remaining games of team {} do not fit into bounded stands",
                team.get() + 1
            ),
        }
    }
}

impl std::error::Error for Rejection {}

/// The calendar rules of one instance, together with the pinned cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintSet {
    num_teams: usize,
    num_dates: usize,
    min_stand: usize,
    max_stand: usize,
    policy: StreakBoundaryPolicy,
    pinned: Vec<Option<Fixture>>,
}

impl ConstraintSet {
    pub fn new<T>(instance: &TournamentInstance<T>, policy: StreakBoundaryPolicy) -> Self
    where
        T: PrimInt + Signed,
    {
        let num_teams = instance.num_teams();
        let num_dates = instance.num_dates();
        Self {
            num_teams,
            num_dates,
            min_stand: instance.min_stand(),
            max_stand: instance.max_stand(),
            policy,
            pinned: vec![None; num_teams * num_dates],
        }
    }

    #[inline]
    pub fn policy(&self) -> StreakBoundaryPolicy {
        self.policy
    }

    #[inline]
    pub fn num_pinned_cells(&self) -> usize {
        self.pinned.iter().filter(|p| p.is_some()).count()
    }

    /// Returns the pinned fixture of `team` on `date`, if any.
    #[inline]
    pub fn pinned(&self, date: DateIndex, team: TeamIndex) -> Option<Fixture> {
        self.pinned[date.get() * self.num_teams + team.get()]
    }

    /// Pins `fixed` and its mirror. Fails if either cell is out of range or
    /// already pinned to something else.
    pub fn pin(&mut self, fixed: &FixedFixture) -> Result<(), Rejection> {
        let opponent = fixed.fixture.opponent();
        if fixed.date.get() >= self.num_dates
            || fixed.team.get() >= self.num_teams
            || opponent.get() >= self.num_teams
        {
            return Err(Rejection::OutOfRange);
        }
        if opponent == fixed.team {
            return Err(Rejection::SelfMatch);
        }

        let mirror = fixed.mirrored();
        for pin in [*fixed, mirror] {
            if self
                .pinned(pin.date, pin.team)
                .is_some_and(|existing| existing != pin.fixture)
            {
                return Err(Rejection::Pinned);
            }
        }
        for pin in [*fixed, mirror] {
            self.pinned[pin.date.get() * self.num_teams + pin.team.get()] = Some(pin.fixture);
        }
        Ok(())
    }

    /// Removes all pins.
    #[inline]
    pub fn clear_pins(&mut self) {
        self.pinned.fill(None);
    }

    /// Checks whether `team` may play `fixture` on `date` given the partial
    /// calendar in `state`. `team` must be unassigned on `date`.
    pub fn check<T>(
        &self,
        state: &SearchState<T>,
        date: DateIndex,
        team: TeamIndex,
        fixture: Fixture,
    ) -> Result<(), Rejection> {
        let opponent = fixture.opponent();
        if date.get() >= self.num_dates
            || team.get() >= self.num_teams
            || opponent.get() >= self.num_teams
        {
            return Err(Rejection::OutOfRange);
        }
        if opponent == team {
            return Err(Rejection::SelfMatch);
        }
        if state.is_assigned(date, opponent) {
            return Err(Rejection::OpponentBusy);
        }

        let open = match fixture.venue() {
            Venue::Home => state.can_host(team, opponent),
            Venue::Away => state.can_visit(team, opponent),
        };
        if !open {
            return Err(Rejection::AlreadyPlayed);
        }

        let mirror = fixture.mirrored(team);
        if self.pinned(date, team).is_some_and(|p| p != fixture)
            || self.pinned(date, opponent).is_some_and(|p| p != mirror)
        {
            return Err(Rejection::Pinned);
        }

        // Repeats are symmetric, checking one side is enough.
        if self.num_teams >= 4
            && state
                .previous_fixture(date, team)
                .is_some_and(|prev| prev.opponent() == opponent)
        {
            return Err(Rejection::ImmediateRepeat);
        }

        self.check_stand(state, date, team, fixture.venue())?;
        self.check_stand(state, date, opponent, mirror.venue())
    }

    /// Checks the stand of `team` after it plays at `venue` on `date`.
    fn check_stand<T>(
        &self,
        state: &SearchState<T>,
        date: DateIndex,
        team: TeamIndex,
        venue: Venue,
    ) -> Result<(), Rejection> {
        let stand = state.stand(team);

        if stand.venue() == Some(venue) {
            if stand.length() + 1 > self.max_stand {
                return Err(Rejection::StandTooLong { team });
            }
        } else if stand.venue().is_some()
            && stand.length() < self.min_stand
            && self
                .policy
                .applies_to(stand.start(), stand.length(), self.num_dates)
        {
            return Err(Rejection::StandTooShort { team });
        }

        let next = stand.extended(venue, date.get());
        let same_left = state.remaining(team, venue) - 1;
        let other_left = state.remaining(team, venue.flip());

        if next.length() < self.min_stand {
            let needed = self.min_stand - next.length();
            let reachable = match self.policy {
                StreakBoundaryPolicy::Strict => same_left >= needed,
                StreakBoundaryPolicy::ExemptBoundaries => {
                    next.start() == 0 || same_left >= needed || other_left == 0
                }
            };
            if !reachable {
                return Err(Rejection::MinimumUnreachable { team });
            }
        }

        // The current stand absorbs up to `max - length` more games of its
        // venue, every other run up to `max`.
        let max = self.max_stand;
        let same_room = (max - next.length()).saturating_add(other_left.saturating_mul(max));
        let other_room = same_left.saturating_add(1).saturating_mul(max);
        if same_left > same_room || other_left > other_room {
            return Err(Rejection::RunCapacity { team });
        }

        Ok(())
    }
}

impl std::fmt::Display for ConstraintSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ConstraintSet(teams: {}, stands: {}..={}, boundaries: {}, pinned cells: {})",
            self.num_teams,
            self.min_stand,
            self.max_stand,
            self.policy,
            self.num_pinned_cells()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tourney_model::instance::TournamentInstanceBuilder;

    type IntegerType = i64;

    fn ti(i: usize) -> TeamIndex {
        TeamIndex::new(i)
    }

    fn di(i: usize) -> DateIndex {
        DateIndex::new(i)
    }

    fn instance(n: usize, min: usize, max: usize) -> TournamentInstance<IntegerType> {
        let mut b = TournamentInstanceBuilder::new(n);
        b.set_stand_bounds(min, max);
        for t in 0..n {
            b.set_row(ti(t), &vec![1; n]);
        }
        b.build().unwrap()
    }

    #[test]
    fn test_narrow_cost_type() {
        let mut b = TournamentInstanceBuilder::<i32>::new(2);
        b.set_stand_bounds(1, 2);
        b.set_row(ti(0), &[0, 5]);
        b.set_row(ti(1), &[7, 0]);
        let inst = b.build().unwrap();
        let cs = ConstraintSet::new(&inst, StreakBoundaryPolicy::Strict);
        let mut state = SearchState::<i32>::new(2);

        assert_eq!(cs.check(&state, di(0), ti(0), Fixture::home(ti(1))), Ok(()));
        state.assign(di(0), ti(0), Fixture::home(ti(1))).unwrap();
        assert_eq!(
            cs.check(&state, di(1), ti(0), Fixture::home(ti(1))),
            Err(Rejection::AlreadyPlayed)
        );
        assert_eq!(cs.check(&state, di(1), ti(0), Fixture::away(ti(1))), Ok(()));
    }

    #[test]
    fn test_basic_rejections() {
        let inst = instance(4, 1, 3);
        let cs = ConstraintSet::new(&inst, StreakBoundaryPolicy::Strict);
        let mut state = SearchState::<IntegerType>::new(4);

        assert_eq!(
            cs.check(&state, di(0), ti(0), Fixture::home(ti(0))),
            Err(Rejection::SelfMatch)
        );
        assert_eq!(
            cs.check(&state, di(0), ti(0), Fixture::home(ti(4))),
            Err(Rejection::OutOfRange)
        );
        assert_eq!(cs.check(&state, di(0), ti(0), Fixture::home(ti(1))), Ok(()));

        state.assign(di(0), ti(0), Fixture::home(ti(1))).unwrap();
        assert_eq!(
            cs.check(&state, di(0), ti(2), Fixture::away(ti(1))),
            Err(Rejection::OpponentBusy)
        );
        state.assign(di(0), ti(2), Fixture::home(ti(3))).unwrap();

        // Next date: 0 hosted 1 already, and meeting 1 again is a repeat.
        assert_eq!(
            cs.check(&state, di(1), ti(0), Fixture::home(ti(1))),
            Err(Rejection::AlreadyPlayed)
        );
        assert_eq!(
            cs.check(&state, di(1), ti(0), Fixture::away(ti(1))),
            Err(Rejection::ImmediateRepeat)
        );
        assert_eq!(cs.check(&state, di(1), ti(0), Fixture::away(ti(2))), Ok(()));
    }

    #[test]
    fn test_two_teams_may_repeat() {
        let inst = instance(2, 1, 3);
        let cs = ConstraintSet::new(&inst, StreakBoundaryPolicy::Strict);
        let mut state = SearchState::<IntegerType>::new(2);
        state.assign(di(0), ti(0), Fixture::home(ti(1))).unwrap();
        assert_eq!(cs.check(&state, di(1), ti(0), Fixture::away(ti(1))), Ok(()));
    }

    #[test]
    fn test_stand_bounds() {
        // n = 4, max = 2.
        let inst = instance(4, 1, 2);
        let cs = ConstraintSet::new(&inst, StreakBoundaryPolicy::Strict);
        let mut state = SearchState::<IntegerType>::new(4);
        state.assign(di(0), ti(0), Fixture::home(ti(1))).unwrap();
        state.assign(di(0), ti(2), Fixture::home(ti(3))).unwrap();
        state.assign(di(1), ti(0), Fixture::home(ti(2))).unwrap();
        state.assign(di(1), ti(1), Fixture::home(ti(3))).unwrap();

        // Team 0 has two home games in a row, a third is too many.
        assert_eq!(
            cs.check(&state, di(2), ti(0), Fixture::home(ti(3))),
            Err(Rejection::StandTooLong { team: ti(0) })
        );
        // Team 3 has two away games in a row.
        assert_eq!(
            cs.check(&state, di(2), ti(3), Fixture::away(ti(0))),
            Err(Rejection::StandTooLong { team: ti(3) })
        );
    }

    #[test]
    fn test_minimum_stand_strict_rejects_two_team_instance() {
        // n = 2 with min = 5: no stand can ever be long enough.
        let inst = instance(2, 5, 6);
        let cs = ConstraintSet::new(&inst, StreakBoundaryPolicy::Strict);
        let state = SearchState::<IntegerType>::new(2);
        assert_eq!(
            cs.check(&state, di(0), ti(0), Fixture::home(ti(1))),
            Err(Rejection::MinimumUnreachable { team: ti(0) })
        );
        assert_eq!(
            cs.check(&state, di(0), ti(0), Fixture::away(ti(1))),
            Err(Rejection::MinimumUnreachable { team: ti(0) })
        );

        let exempt = ConstraintSet::new(&inst, StreakBoundaryPolicy::ExemptBoundaries);
        assert_eq!(
            exempt.check(&state, di(0), ti(0), Fixture::home(ti(1))),
            Ok(())
        );
    }

    #[test]
    fn test_short_stand_cannot_be_closed() {
        let inst = instance(4, 2, 3);
        let cs = ConstraintSet::new(&inst, StreakBoundaryPolicy::Strict);
        let mut state = SearchState::<IntegerType>::new(4);
        state.assign(di(0), ti(0), Fixture::home(ti(1))).unwrap();
        state.assign(di(0), ti(2), Fixture::home(ti(3))).unwrap();

        // Team 0 has a home stand of one, switching to away closes it.
        assert_eq!(
            cs.check(&state, di(1), ti(0), Fixture::away(ti(2))),
            Err(Rejection::StandTooShort { team: ti(0) })
        );
        assert_eq!(cs.check(&state, di(1), ti(0), Fixture::home(ti(3))), Ok(()));
    }

    #[test]
    fn test_pins() {
        let inst = instance(4, 1, 3);
        let mut cs = ConstraintSet::new(&inst, StreakBoundaryPolicy::Strict);
        let pin = FixedFixture::new(di(0), ti(0), Fixture::away(ti(2)));
        cs.pin(&pin).unwrap();
        assert_eq!(cs.num_pinned_cells(), 2);
        assert_eq!(cs.pinned(di(0), ti(2)), Some(Fixture::home(ti(0))));
        cs.pin(&pin.mirrored()).unwrap();
        assert_eq!(
            cs.pin(&FixedFixture::new(di(0), ti(0), Fixture::home(ti(2)))),
            Err(Rejection::Pinned)
        );
        assert_eq!(
            cs.pin(&FixedFixture::new(di(6), ti(0), Fixture::home(ti(2)))),
            Err(Rejection::OutOfRange)
        );

        let state = SearchState::<IntegerType>::new(4);
        assert_eq!(
            cs.check(&state, di(0), ti(0), Fixture::home(ti(1))),
            Err(Rejection::Pinned)
        );
        assert_eq!(
            cs.check(&state, di(0), ti(1), Fixture::home(ti(2))),
            Err(Rejection::Pinned)
        );
        assert_eq!(cs.check(&state, di(0), ti(0), Fixture::away(ti(2))), Ok(()));

        cs.clear_pins();
        assert_eq!(cs.num_pinned_cells(), 0);
    }
}
