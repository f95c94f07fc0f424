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

use crate::{calendar::Calendar, fixture::Fixture, index::{DateIndex, TeamIndex}};
use num_traits::{PrimInt, Signed};

/// A complete calendar together with its total travel cost.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Solution<T> {
    total_cost: T,
    calendar: Calendar,
}

impl<T> Solution<T>
where
    T: PrimInt + Signed,
{
    #[inline]
    pub fn new(total_cost: T, calendar: Calendar) -> Self {
        Self {
            total_cost,
            calendar,
        }
    }

    /// Returns the total travel cost of all teams.
    #[inline]
    pub fn total_cost(&self) -> T {
        self.total_cost
    }

    #[inline]
    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    #[inline]
    pub fn into_calendar(self) -> Calendar {
        self.calendar
    }

    #[inline]
    pub fn num_teams(&self) -> usize {
        self.calendar.num_teams()
    }

    #[inline]
    pub fn num_dates(&self) -> usize {
        self.calendar.num_dates()
    }

    /// Returns the fixture of `team` on `date`.
    #[inline]
    pub fn fixture(&self, date: DateIndex, team: TeamIndex) -> Fixture {
        self.calendar.fixture(date, team)
    }
}

impl<T> std::fmt::Display for Solution<T>
where
    T: PrimInt + Signed + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", crate::format::SolutionText::new(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let calendar = Calendar::from_signed_rows(2, &[vec![-2, 1], vec![2, -1]]).unwrap();
        let solution = Solution::new(12i64, calendar.clone());
        assert_eq!(solution.total_cost(), 12);
        assert_eq!(solution.num_teams(), 2);
        assert_eq!(solution.num_dates(), 2);
        assert_eq!(
            solution.fixture(DateIndex::new(0), TeamIndex::new(0)),
            Fixture::away(TeamIndex::new(1))
        );
        assert_eq!(solution.calendar(), &calendar);
        assert_eq!(solution.into_calendar(), calendar);
    }
}
