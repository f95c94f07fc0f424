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

//! Search state of a single solve.
//!
//! `SearchState` holds the partially filled calendar together with the
//! bookkeeping the incremental constraint check relies on:
//!
//! - per team the opponents it still has to host and to visit, as bitsets and
//!   as counters,
//! - per team the current stand (venue, length and first date),
//! - per date the number of home teams and of assigned cells,
//! - the accumulated travel cost of the assigned cells.
//!
//! Cells are filled date by date, so the stand of a team always describes the
//! dates before the one currently being filled. Assignments always come in
//! pairs: `assign` writes a cell and its mirror at once. Undoing goes through
//! `unassign`, which the trail calls with the stands it saved.

use fixedbitset::FixedBitSet;
use num_traits::{PrimInt, Signed, Zero};
use tourney_model::{
    calendar::Calendar,
    fixture::{Fixture, Venue},
    index::{DateIndex, TeamIndex},
    solution::Solution,
    validation::ConstraintViolation,
};

/// The current run of consecutive home or away dates of a team.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Stand {
    venue: Option<Venue>,
    length: usize,
    start: usize,
}

impl Stand {
    /// The stand of a team that has not played yet.
    pub const EMPTY: Stand = Stand {
        venue: None,
        length: 0,
        start: 0,
    };

    #[inline]
    pub const fn new(venue: Venue, length: usize, start: usize) -> Self {
        Self {
            venue: Some(venue),
            length,
            start,
        }
    }

    #[inline]
    pub const fn venue(&self) -> Option<Venue> {
        self.venue
    }

    #[inline]
    pub const fn length(&self) -> usize {
        self.length
    }

    /// First date of the stand.
    #[inline]
    pub const fn start(&self) -> usize {
        self.start
    }

    /// Returns the stand after playing at `venue` on `date`.
    #[inline]
    pub fn extended(self, venue: Venue, date: usize) -> Self {
        match self.venue {
            Some(current) if current == venue => Self::new(venue, self.length + 1, self.start),
            _ => Self::new(venue, 1, date),
        }
    }
}

impl std::fmt::Display for Stand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.venue {
            Some(venue) => write!(
                f,
                "Stand({} x{} from date {})",
                venue, self.length, self.start
            ),
            None => write!(f, "Stand(empty)"),
        }
    }
}

/// A broken bookkeeping invariant. Any of these means the search itself is
/// defective, never that the instance is infeasible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchInconsistency {
    /// A remaining-game counter would drop below zero.
    RemainingUnderflow { team: TeamIndex, venue: Venue },
    /// A completed date does not have exactly `n/2` home teams.
    Unbalanced { date: DateIndex, home: usize },
    /// The state claims to be complete but has an empty cell.
    IncompleteLeaf,
    /// A completed calendar failed the full validation.
    InvalidLeaf(ConstraintViolation),
    /// The accumulated cost differs from the recomputed cost of the calendar.
    CostMismatch { accumulated: i64, recomputed: i64 },
}

impl std::fmt::Display for SearchInconsistency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RemainingUnderflow { team, venue } => write!(
                f,
                "team {} has no {} game left to assign",
                team.get() + 1,
                venue
            ),
            Self::Unbalanced { date, home } => write!(
                f,
                "date {} completed with {} home teams",
                date.get() + 1,
                home
            ),
            Self::IncompleteLeaf => write!(f, "complete state has an empty cell"),
            Self::InvalidLeaf(violation) => {
                write!(f, "completed calendar is invalid: {}", violation)
            }
            Self::CostMismatch {
                accumulated,
                recomputed,
            } => write!(
                f,
                "accumulated cost {} differs from recomputed cost {}",
                accumulated, recomputed
            ),
        }
    }
}

impl std::error::Error for SearchInconsistency {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidLeaf(violation) => Some(violation),
            _ => None,
        }
    }
}

/// The partially filled calendar and its bookkeeping.
#[derive(Debug, Clone)]
pub struct SearchState<T> {
    cells: Vec<Option<Fixture>>,
    to_host: Vec<FixedBitSet>,
    to_visit: Vec<FixedBitSet>,
    remaining_home: Vec<usize>,
    remaining_away: Vec<usize>,
    stands: Vec<Stand>,
    home_counts: Vec<usize>,
    assigned_per_date: Vec<usize>,
    current_cost: T,
    num_teams: usize,
    num_dates: usize,
    num_assigned: usize,
}

impl<T> SearchState<T> {
    /// Creates the empty state for `num_teams` teams.
    pub fn new(num_teams: usize) -> Self
    where
        T: Zero,
    {
        let num_dates = 2 * num_teams.saturating_sub(1);
        let opponents = |team: usize| {
            let mut set = FixedBitSet::with_capacity(num_teams);
            set.insert_range(..);
            set.set(team, false);
            set
        };

        Self {
            cells: vec![None; num_dates * num_teams],
            to_host: (0..num_teams).map(opponents).collect(),
            to_visit: (0..num_teams).map(opponents).collect(),
            remaining_home: vec![num_teams.saturating_sub(1); num_teams],
            remaining_away: vec![num_teams.saturating_sub(1); num_teams],
            stands: vec![Stand::EMPTY; num_teams],
            home_counts: vec![0; num_dates],
            assigned_per_date: vec![0; num_dates],
            current_cost: T::zero(),
            num_teams,
            num_dates,
            num_assigned: 0,
        }
    }

    #[inline]
    pub fn num_teams(&self) -> usize {
        self.num_teams
    }

    #[inline]
    pub fn num_dates(&self) -> usize {
        self.num_dates
    }

    /// Number of filled cells. Always even.
    #[inline]
    pub fn num_assigned_cells(&self) -> usize {
        self.num_assigned
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.num_assigned == self.cells.len()
    }

    /// Returns `true` if every started date is completely filled.
    #[inline]
    pub fn is_at_date_boundary(&self) -> bool {
        self.num_teams == 0 || self.num_assigned % self.num_teams == 0
    }

    #[inline]
    pub fn current_cost(&self) -> T
    where
        T: Copy,
    {
        self.current_cost
    }

    #[inline]
    pub fn set_current_cost(&mut self, cost: T) {
        self.current_cost = cost;
    }

    #[inline]
    fn cell_index(&self, date: DateIndex, team: TeamIndex) -> usize {
        debug_assert!(
            date.get() < self.num_dates,
            "called `SearchState::cell_index` with date index out of bounds: the len is {} but the index is {}",
            self.num_dates,
            date.get()
        );
        debug_assert!(
            team.get() < self.num_teams,
            "called `SearchState::cell_index` with team index out of bounds: the len is {} but the index is {}",
            self.num_teams,
            team.get()
        );
        date.get() * self.num_teams + team.get()
    }

    /// Returns the fixture of `team` on `date`, if assigned.
    #[inline]
    pub fn fixture(&self, date: DateIndex, team: TeamIndex) -> Option<Fixture> {
        self.cells[self.cell_index(date, team)]
    }

    #[inline]
    pub fn is_assigned(&self, date: DateIndex, team: TeamIndex) -> bool {
        self.fixture(date, team).is_some()
    }

    /// Returns the fixture of `team` on the date before `date`. `None` on
    /// the first date.
    #[inline]
    pub fn previous_fixture(&self, date: DateIndex, team: TeamIndex) -> Option<Fixture> {
        date.checked_prev().and_then(|prev| self.fixture(prev, team))
    }

    /// Returns the cell the search fills next: the lowest unpaired team on
    /// the first incomplete date.
    pub fn next_cell(&self) -> Option<(DateIndex, TeamIndex)> {
        if self.is_complete() {
            return None;
        }
        let date = DateIndex::new(self.num_assigned / self.num_teams);
        let start = date.get() * self.num_teams;
        self.cells[start..start + self.num_teams]
            .iter()
            .position(Option::is_none)
            .map(|team| (date, TeamIndex::new(team)))
    }

    #[inline]
    pub fn stand(&self, team: TeamIndex) -> Stand {
        self.stands[team.get()]
    }

    /// Number of home games `team` still has to play.
    #[inline]
    pub fn remaining_home(&self, team: TeamIndex) -> usize {
        self.remaining_home[team.get()]
    }

    /// Number of away games `team` still has to play.
    #[inline]
    pub fn remaining_away(&self, team: TeamIndex) -> usize {
        self.remaining_away[team.get()]
    }

    #[inline]
    pub fn remaining(&self, team: TeamIndex, venue: Venue) -> usize {
        match venue {
            Venue::Home => self.remaining_home(team),
            Venue::Away => self.remaining_away(team),
        }
    }

    /// Returns `true` if `team` has yet to host `opponent`.
    #[inline]
    pub fn can_host(&self, team: TeamIndex, opponent: TeamIndex) -> bool {
        self.to_host[team.get()].contains(opponent.get())
    }

    /// Returns `true` if `team` has yet to visit `opponent`.
    #[inline]
    pub fn can_visit(&self, team: TeamIndex, opponent: TeamIndex) -> bool {
        self.to_visit[team.get()].contains(opponent.get())
    }

    /// Iterates over the opponents `team` has yet to visit.
    #[inline]
    pub fn pending_visits(&self, team: TeamIndex) -> impl Iterator<Item = TeamIndex> + '_ {
        self.to_visit[team.get()].ones().map(TeamIndex::new)
    }

    /// Iterates over the opponents `team` has yet to host.
    #[inline]
    pub fn pending_hosts(&self, team: TeamIndex) -> impl Iterator<Item = TeamIndex> + '_ {
        self.to_host[team.get()].ones().map(TeamIndex::new)
    }

    /// Number of home teams assigned on `date`.
    #[inline]
    pub fn home_count(&self, date: DateIndex) -> usize {
        self.home_counts[date.get()]
    }

    #[inline]
    pub fn is_date_complete(&self, date: DateIndex) -> bool {
        self.assigned_per_date[date.get()] == self.num_teams
    }

    /// Writes `fixture` for `team` on `date` and the mirrored fixture for the
    /// opponent, and updates the bookkeeping of both teams. The cost is left
    /// to the caller.
    ///
    /// Fails without touching the state if either team has no game of the
    /// required venue left.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if either cell is already assigned.
    pub fn assign(
        &mut self,
        date: DateIndex,
        team: TeamIndex,
        fixture: Fixture,
    ) -> Result<(), SearchInconsistency> {
        let opponent = fixture.opponent();
        let mirror = fixture.mirrored(team);
        debug_assert!(
            !self.is_assigned(date, team) && !self.is_assigned(date, opponent),
            "called `SearchState::assign` with an occupied cell on {}: {} or {}",
            date,
            team,
            opponent
        );

        for (t, venue) in [(team, fixture.venue()), (opponent, mirror.venue())] {
            if self.remaining(t, venue) == 0 {
                return Err(SearchInconsistency::RemainingUnderflow { team: t, venue });
            }
        }

        let (d, n) = (date.get(), self.num_teams);
        self.cells[d * n + team.get()] = Some(fixture);
        self.cells[d * n + opponent.get()] = Some(mirror);

        let (host, visitor) = match fixture.venue() {
            Venue::Home => (team, opponent),
            Venue::Away => (opponent, team),
        };
        self.to_host[host.get()].set(visitor.get(), false);
        self.to_visit[visitor.get()].set(host.get(), false);
        self.remaining_home[host.get()] -= 1;
        self.remaining_away[visitor.get()] -= 1;

        self.stands[host.get()] = self.stands[host.get()].extended(Venue::Home, d);
        self.stands[visitor.get()] = self.stands[visitor.get()].extended(Venue::Away, d);

        self.home_counts[d] += 1;
        self.assigned_per_date[d] += 2;
        self.num_assigned += 2;
        Ok(())
    }

    /// Reverts an `assign` of `fixture` for `team` on `date`, restoring the
    /// given stands of both teams.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if the cell does not hold `fixture`.
    pub fn unassign(
        &mut self,
        date: DateIndex,
        team: TeamIndex,
        fixture: Fixture,
        team_stand: Stand,
        opponent_stand: Stand,
    ) {
        debug_assert_eq!(
            self.fixture(date, team),
            Some(fixture),
            "called `SearchState::unassign` for a fixture that is not assigned"
        );

        let opponent = fixture.opponent();
        let (d, n) = (date.get(), self.num_teams);
        self.cells[d * n + team.get()] = None;
        self.cells[d * n + opponent.get()] = None;

        let (host, visitor) = match fixture.venue() {
            Venue::Home => (team, opponent),
            Venue::Away => (opponent, team),
        };
        self.to_host[host.get()].insert(visitor.get());
        self.to_visit[visitor.get()].insert(host.get());
        self.remaining_home[host.get()] += 1;
        self.remaining_away[visitor.get()] += 1;

        self.stands[team.get()] = team_stand;
        self.stands[opponent.get()] = opponent_stand;

        self.home_counts[d] -= 1;
        self.assigned_per_date[d] -= 2;
        self.num_assigned -= 2;
    }

    /// Returns the calendar if every cell is assigned.
    pub fn to_calendar(&self) -> Option<Calendar> {
        let fixtures = self.cells.iter().copied().collect::<Option<Vec<_>>>()?;
        Calendar::new(self.num_teams, fixtures).ok()
    }

    /// Returns the solution of a complete state, priced at the accumulated
    /// cost.
    pub fn to_solution(&self) -> Option<Solution<T>>
    where
        T: PrimInt + Signed,
    {
        self.to_calendar()
            .map(|calendar| Solution::new(self.current_cost, calendar))
    }
}

impl<T> std::fmt::Display for SearchState<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SearchState(teams: {}, dates: {}, assigned cells: {}, cost: {})",
            self.num_teams, self.num_dates, self.num_assigned, self.current_cost
        )
    }
}
