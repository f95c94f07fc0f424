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

//! The calendar matrix.
//!
//! A `Calendar` has one row per date and one column per team. Cell
//! `(date, team)` is the `Fixture` that team plays on that date. Rows are
//! stored back to back in a single vector (date-major). The shape is fixed by
//! the number of teams: `2(n - 1)` dates times `n` teams.
//!
//! Constructing a calendar only checks its shape and that every cell decodes
//! to a valid fixture. Whether it is a legal double round-robin is decided by
//! `validation::validate`.

use crate::{
    fixture::Fixture,
    index::{DateIndex, TeamIndex},
};

/// Errors raised while assembling a calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    /// The number of teams is zero or odd.
    InvalidTeamCount(usize),
    /// The number of rows does not equal `2(n - 1)`.
    WrongDateCount { expected: usize, found: usize },
    /// A row does not have exactly `n` cells.
    RaggedRow {
        date: DateIndex,
        expected: usize,
        found: usize,
    },
    /// A cell is zero or refers to a team above `n`.
    CellOutOfRange {
        date: DateIndex,
        team: TeamIndex,
        value: i64,
    },
}

impl std::fmt::Display for CalendarError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTeamCount(n) => {
                write!(f, "a calendar needs a positive, even team count, got {}", n)
            }
            Self::WrongDateCount { expected, found } => {
                write!(f, "expected {} dates but found {}", expected, found)
            }
            Self::RaggedRow {
                date,
                expected,
                found,
            } => write!(
                f,
                "date {} has {} cells but {} were expected",
                date.get() + 1,
                found,
                expected
            ),
            Self::CellOutOfRange { date, team, value } => write!(
                f,
                "cell {} at date {} for team {} is not a valid opponent",
                value,
                date.get() + 1,
                team.get() + 1
            ),
        }
    }
}

impl std::error::Error for CalendarError {}

/// A complete `dates × teams` matrix of fixtures.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Calendar {
    num_teams: usize,
    fixtures: Vec<Fixture>,
}

impl Calendar {
    /// Creates a calendar from date-major fixtures.
    pub fn new(num_teams: usize, fixtures: Vec<Fixture>) -> Result<Self, CalendarError> {
        if num_teams == 0 || num_teams % 2 != 0 {
            return Err(CalendarError::InvalidTeamCount(num_teams));
        }
        let expected_dates = 2 * (num_teams - 1);
        if fixtures.len() != expected_dates * num_teams {
            return Err(CalendarError::WrongDateCount {
                expected: expected_dates,
                found: fixtures.len() / num_teams,
            });
        }
        Ok(Self {
            num_teams,
            fixtures,
        })
    }

    /// Decodes a calendar from rows of signed, 1-based team numbers.
    pub fn from_signed_rows<R>(num_teams: usize, rows: &[R]) -> Result<Self, CalendarError>
    where
        R: AsRef<[i64]>,
    {
        if num_teams == 0 || num_teams % 2 != 0 {
            return Err(CalendarError::InvalidTeamCount(num_teams));
        }
        let expected_dates = 2 * (num_teams - 1);
        if rows.len() != expected_dates {
            return Err(CalendarError::WrongDateCount {
                expected: expected_dates,
                found: rows.len(),
            });
        }

        let mut fixtures = Vec::with_capacity(expected_dates * num_teams);
        for (d, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let date = DateIndex::new(d);
            if row.len() != num_teams {
                return Err(CalendarError::RaggedRow {
                    date,
                    expected: num_teams,
                    found: row.len(),
                });
            }
            for (t, &value) in row.iter().enumerate() {
                let fixture = Fixture::from_signed(value, num_teams).ok_or(
                    CalendarError::CellOutOfRange {
                        date,
                        team: TeamIndex::new(t),
                        value,
                    },
                )?;
                fixtures.push(fixture);
            }
        }

        Self::new(num_teams, fixtures)
    }

    #[inline]
    pub fn num_teams(&self) -> usize {
        self.num_teams
    }

    #[inline]
    pub fn num_dates(&self) -> usize {
        self.fixtures.len() / self.num_teams
    }

    /// Returns the fixture of `team` on `date`.
    ///
    /// # Panics
    ///
    /// Panics if `date` or `team` is out of bounds.
    #[inline]
    pub fn fixture(&self, date: DateIndex, team: TeamIndex) -> Fixture {
        assert!(
            date.get() < self.num_dates() && team.get() < self.num_teams,
            "called `Calendar::fixture` with index out of bounds: the shape is {}x{} but the cell is ({}, {})",
            self.num_dates(),
            self.num_teams,
            date.get(),
            team.get()
        );
        self.fixtures[date.get() * self.num_teams + team.get()]
    }

    /// Returns the fixtures of all teams on `date`.
    #[inline]
    pub fn row(&self, date: DateIndex) -> &[Fixture] {
        let start = date.get() * self.num_teams;
        &self.fixtures[start..start + self.num_teams]
    }

    /// Iterates over the rows in date order.
    #[inline]
    pub fn rows(&self) -> std::slice::ChunksExact<'_, Fixture> {
        self.fixtures.chunks_exact(self.num_teams)
    }

    /// Iterates over the fixtures of `team` in date order.
    #[inline]
    pub fn team_fixtures(&self, team: TeamIndex) -> impl Iterator<Item = Fixture> + '_ {
        self.rows().map(move |row| row[team.get()])
    }

    /// Returns all fixtures in date-major order.
    #[inline]
    pub fn fixtures(&self) -> &[Fixture] {
        &self.fixtures
    }

    /// Encodes the calendar as rows of signed, 1-based team numbers.
    pub fn to_signed_rows(&self) -> Vec<Vec<i64>> {
        self.rows()
            .map(|row| row.iter().map(Fixture::to_signed).collect())
            .collect()
    }
}

impl std::fmt::Display for Calendar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", crate::format::CalendarText::new(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn di(i: usize) -> DateIndex {
        DateIndex::new(i)
    }

    fn ti(i: usize) -> TeamIndex {
        TeamIndex::new(i)
    }

    #[test]
    fn test_from_signed_rows_round_trip() {
        let rows = vec![vec![2, -1], vec![-2, 1]];
        let calendar = Calendar::from_signed_rows(2, &rows).unwrap();
        assert_eq!(calendar.num_teams(), 2);
        assert_eq!(calendar.num_dates(), 2);
        assert_eq!(calendar.fixture(di(0), ti(0)), Fixture::home(ti(1)));
        assert_eq!(calendar.fixture(di(1), ti(1)), Fixture::home(ti(0)));
        assert_eq!(calendar.to_signed_rows(), rows);
        assert_eq!(
            calendar.team_fixtures(ti(0)).collect::<Vec<_>>(),
            vec![Fixture::home(ti(1)), Fixture::away(ti(1))]
        );
    }

    #[test]
    fn test_rejects_wrong_shapes() {
        assert_eq!(
            Calendar::from_signed_rows::<Vec<i64>>(3, &[]),
            Err(CalendarError::InvalidTeamCount(3))
        );
        assert_eq!(
            Calendar::from_signed_rows(2, &[vec![2, -1]]),
            Err(CalendarError::WrongDateCount {
                expected: 2,
                found: 1
            })
        );
        assert_eq!(
            Calendar::from_signed_rows(2, &[vec![2, -1], vec![1]]),
            Err(CalendarError::RaggedRow {
                date: di(1),
                expected: 2,
                found: 1
            })
        );
        assert_eq!(
            Calendar::new(2, vec![Fixture::home(ti(1))]),
            Err(CalendarError::WrongDateCount {
                expected: 2,
                found: 0
            })
        );
    }

    #[test]
    fn test_rejects_out_of_range_cells() {
        let err = Calendar::from_signed_rows(2, &[vec![2, 0], vec![-2, 1]]).unwrap_err();
        assert_eq!(
            err,
            CalendarError::CellOutOfRange {
                date: di(0),
                team: ti(1),
                value: 0
            }
        );
        assert!(format!("{}", err).contains("date 1 for team 2"));
    }
}
