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

//! Tournament instances.
//!
//! A `TournamentInstance<T>` holds everything the scheduler needs to know
//! about a double round-robin: the number of teams `n`, the bounds on
//! consecutive home or away games (`min_stand` and `max_stand`) and the
//! `n × n` travel distance matrix. Distances are stored row-major in a single
//! vector; `d[t][t]` is the cost for team `t` of staying home between two
//! home games.
//!
//! Instances are immutable. They are assembled with a
//! `TournamentInstanceBuilder`, which validates the parameters on `build`.

use crate::index::TeamIndex;
use num_traits::{PrimInt, Signed};

/// Reasons for rejecting an instance on `TournamentInstanceBuilder::build`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstanceError {
    /// The number of teams is zero.
    NoTeams,
    /// A round-robin needs an even number of teams.
    OddTeamCount(usize),
    /// `min_stand` is zero.
    NonPositiveMinStand,
    /// `max_stand` is zero.
    NonPositiveMaxStand,
    /// `min_stand` must be strictly smaller than `max_stand`.
    MinNotBelowMax { min_stand: usize, max_stand: usize },
    /// A distance entry is negative.
    NegativeDistance { from: TeamIndex, to: TeamIndex },
}

impl std::fmt::Display for InstanceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoTeams => write!(f, "the number of teams must be positive"),
            Self::OddTeamCount(n) => write!(f, "the number of teams must be even, got {}", n),
            Self::NonPositiveMinStand => write!(f, "the minimum stand length must be positive"),
            Self::NonPositiveMaxStand => write!(f, "the maximum stand length must be positive"),
            Self::MinNotBelowMax {
                min_stand,
                max_stand,
            } => write!(
                f,
                "the minimum stand length ({}) must be smaller than the maximum ({})",
                min_stand, max_stand
            ),
            Self::NegativeDistance { from, to } => write!(
                f,
                "distance from team {} to team {} is negative",
                from.get() + 1,
                to.get() + 1
            ),
        }
    }
}

impl std::error::Error for InstanceError {}

/// An immutable double round-robin instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TournamentInstance<T> {
    num_teams: usize,
    min_stand: usize,
    max_stand: usize,
    distances: Vec<T>,
}

impl<T> TournamentInstance<T>
where
    T: PrimInt + Signed,
{
    /// Returns the number of teams `n`.
    #[inline]
    pub fn num_teams(&self) -> usize {
        self.num_teams
    }

    /// Returns the number of dates, `2(n - 1)`.
    #[inline]
    pub fn num_dates(&self) -> usize {
        2 * (self.num_teams - 1)
    }

    /// Returns the number of games each team hosts, which equals the number
    /// of games it plays away.
    #[inline]
    pub fn games_per_venue(&self) -> usize {
        self.num_teams - 1
    }

    /// Returns the minimum length of a home or away stand.
    #[inline]
    pub fn min_stand(&self) -> usize {
        self.min_stand
    }

    /// Returns the maximum length of a home or away stand.
    #[inline]
    pub fn max_stand(&self) -> usize {
        self.max_stand
    }

    /// Returns the travel distance from `from` to `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is not within `0..num_teams()`.
    #[inline]
    pub fn distance(&self, from: TeamIndex, to: TeamIndex) -> T {
        assert!(
            from.get() < self.num_teams && to.get() < self.num_teams,
            "called `TournamentInstance::distance` with team index out of bounds: the len is {} but the indices are {} and {}",
            self.num_teams,
            from.get(),
            to.get()
        );
        self.distances[from.get() * self.num_teams + to.get()]
    }

    /// Returns the cost for `team` of staying home between two home games.
    #[inline]
    pub fn home_cost(&self, team: TeamIndex) -> T {
        self.distance(team, team)
    }

    /// Returns the distance row of `team`.
    #[inline]
    pub fn row(&self, team: TeamIndex) -> &[T] {
        let start = team.get() * self.num_teams;
        &self.distances[start..start + self.num_teams]
    }

    /// Returns the row-major distance matrix.
    #[inline]
    pub fn distances(&self) -> &[T] {
        &self.distances
    }

    /// Iterates over all team indices.
    #[inline]
    pub fn teams(&self) -> impl DoubleEndedIterator<Item = TeamIndex> + ExactSizeIterator {
        TeamIndex::range(self.num_teams)
    }
}

impl<T> std::fmt::Display for TournamentInstance<T>
where
    T: PrimInt + Signed,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TournamentInstance(teams: {}, dates: {}, stands: {}..={})",
            self.num_teams,
            self.num_dates(),
            self.min_stand,
            self.max_stand
        )
    }
}

/// Mutable builder for `TournamentInstance`.
///
/// Distances default to zero and stand bounds to `1..=2`.
#[derive(Clone, Debug)]
pub struct TournamentInstanceBuilder<T> {
    num_teams: usize,
    min_stand: usize,
    max_stand: usize,
    distances: Vec<T>,
}

impl<T> TournamentInstanceBuilder<T>
where
    T: PrimInt + Signed,
{
    pub fn new(num_teams: usize) -> Self {
        Self {
            num_teams,
            min_stand: 1,
            max_stand: 2,
            distances: vec![T::zero(); num_teams.saturating_mul(num_teams)],
        }
    }

    #[inline]
    pub fn num_teams(&self) -> usize {
        self.num_teams
    }

    /// Sets the minimum and maximum stand lengths.
    #[inline]
    pub fn set_stand_bounds(&mut self, min_stand: usize, max_stand: usize) -> &mut Self {
        self.min_stand = min_stand;
        self.max_stand = max_stand;
        self
    }

    /// Sets the distance from `from` to `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is not within `0..num_teams()`.
    #[inline]
    pub fn set_distance(&mut self, from: TeamIndex, to: TeamIndex, distance: T) -> &mut Self {
        assert!(
            from.get() < self.num_teams && to.get() < self.num_teams,
            "called `TournamentInstanceBuilder::set_distance` with team index out of bounds: the len is {} but the indices are {} and {}",
            self.num_teams,
            from.get(),
            to.get()
        );
        self.distances[from.get() * self.num_teams + to.get()] = distance;
        self
    }

    /// Sets the whole distance row of `team`.
    ///
    /// # Panics
    ///
    /// Panics if `team` is out of bounds or `row` is shorter than `num_teams()`.
    pub fn set_row(&mut self, team: TeamIndex, row: &[T]) -> &mut Self {
        assert!(
            row.len() >= self.num_teams,
            "called `TournamentInstanceBuilder::set_row` with a short row: expected {} entries but got {}",
            self.num_teams,
            row.len()
        );
        for (to, &distance) in row.iter().take(self.num_teams).enumerate() {
            self.set_distance(team, TeamIndex::new(to), distance);
        }
        self
    }

    /// Validates the parameters and builds the instance.
    pub fn build(self) -> Result<TournamentInstance<T>, InstanceError> {
        if self.num_teams == 0 {
            return Err(InstanceError::NoTeams);
        }
        if self.num_teams % 2 != 0 {
            return Err(InstanceError::OddTeamCount(self.num_teams));
        }
        if self.min_stand == 0 {
            return Err(InstanceError::NonPositiveMinStand);
        }
        if self.max_stand == 0 {
            return Err(InstanceError::NonPositiveMaxStand);
        }
        if self.min_stand >= self.max_stand {
            return Err(InstanceError::MinNotBelowMax {
                min_stand: self.min_stand,
                max_stand: self.max_stand,
            });
        }
        if let Some(position) = self.distances.iter().position(|d| d.is_negative()) {
            return Err(InstanceError::NegativeDistance {
                from: TeamIndex::new(position / self.num_teams),
                to: TeamIndex::new(position % self.num_teams),
            });
        }

        Ok(TournamentInstance {
            num_teams: self.num_teams,
            min_stand: self.min_stand,
            max_stand: self.max_stand,
            distances: self.distances,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type IntegerType = i64;

    fn ti(i: usize) -> TeamIndex {
        TeamIndex::new(i)
    }

    #[test]
    fn test_build_valid_instance() {
        let mut builder = TournamentInstanceBuilder::<IntegerType>::new(4);
        builder.set_stand_bounds(1, 3);
        builder.set_distance(ti(0), ti(1), 7).set_distance(ti(3), ti(3), 2);
        let instance = builder.build().unwrap();

        assert_eq!(instance.num_teams(), 4);
        assert_eq!(instance.num_dates(), 6);
        assert_eq!(instance.games_per_venue(), 3);
        assert_eq!(instance.min_stand(), 1);
        assert_eq!(instance.max_stand(), 3);
        assert_eq!(instance.distance(ti(0), ti(1)), 7);
        assert_eq!(instance.distance(ti(1), ti(0)), 0);
        assert_eq!(instance.home_cost(ti(3)), 2);
        assert_eq!(instance.row(ti(0)), &[0, 7, 0, 0]);
        assert_eq!(instance.teams().len(), 4);
        assert_eq!(
            format!("{}", instance),
            "TournamentInstance(teams: 4, dates: 6, stands: 1..=3)"
        );
    }

    #[test]
    fn test_rejects_bad_team_counts() {
        let b = TournamentInstanceBuilder::<IntegerType>::new(0);
        assert_eq!(b.build(), Err(InstanceError::NoTeams));
        let b = TournamentInstanceBuilder::<IntegerType>::new(3);
        assert_eq!(b.build(), Err(InstanceError::OddTeamCount(3)));
    }

    #[test]
    fn test_rejects_bad_stand_bounds() {
        let mut b = TournamentInstanceBuilder::<IntegerType>::new(2);
        b.set_stand_bounds(0, 2);
        assert_eq!(b.build(), Err(InstanceError::NonPositiveMinStand));

        let mut b = TournamentInstanceBuilder::<IntegerType>::new(2);
        b.set_stand_bounds(1, 0);
        assert_eq!(b.build(), Err(InstanceError::NonPositiveMaxStand));

        let mut b = TournamentInstanceBuilder::<IntegerType>::new(2);
        b.set_stand_bounds(3, 3);
        assert_eq!(
            b.build(),
            Err(InstanceError::MinNotBelowMax {
                min_stand: 3,
                max_stand: 3
            })
        );
    }

    #[test]
    fn test_rejects_negative_distance() {
        let mut b = TournamentInstanceBuilder::<IntegerType>::new(2);
        b.set_row(ti(1), &[4, -1]);
        assert_eq!(
            b.build(),
            Err(InstanceError::NegativeDistance {
                from: ti(1),
                to: ti(1)
            })
        );
    }

    #[test]
    #[should_panic(expected = "team index out of bounds")]
    fn test_set_distance_out_of_bounds_panics() {
        let mut b = TournamentInstanceBuilder::<IntegerType>::new(2);
        b.set_distance(ti(2), ti(0), 1);
    }
}
