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

//! Fixed fixtures
//!
//! `FixedFixture` pins one calendar cell before the search starts. The mirror
//! cell of the opponent is implied. Pins express known fixtures (a derby on
//! the opening date, a venue that is unavailable) and are the mechanism the
//! parallel search uses to split the tree at its root.
//!
//! Ordering
//! - Total order: by `date`, then `team`, then `fixture`.

use tourney_model::{
    fixture::Fixture,
    index::{DateIndex, TeamIndex},
};

/// A fixture that must appear in every calendar the search produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FixedFixture {
    pub date: DateIndex,
    pub team: TeamIndex,
    pub fixture: Fixture,
}

impl FixedFixture {
    #[inline]
    pub const fn new(date: DateIndex, team: TeamIndex, fixture: Fixture) -> Self {
        Self {
            date,
            team,
            fixture,
        }
    }

    /// Returns the same pin seen from the opponent's cell.
    #[inline]
    pub const fn mirrored(&self) -> Self {
        Self {
            date: self.date,
            team: self.fixture.opponent(),
            fixture: self.fixture.mirrored(self.team),
        }
    }
}

impl std::fmt::Display for FixedFixture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "FixedFixture(date: {}, team: {}, fixture: {})",
            self.date.get() + 1,
            self.team.get() + 1,
            self.fixture.to_signed()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mirrored_swaps_perspective() {
        let pin = FixedFixture::new(
            DateIndex::new(2),
            TeamIndex::new(0),
            Fixture::away(TeamIndex::new(3)),
        );
        let mirror = pin.mirrored();
        assert_eq!(mirror.date, DateIndex::new(2));
        assert_eq!(mirror.team, TeamIndex::new(3));
        assert_eq!(mirror.fixture, Fixture::home(TeamIndex::new(0)));
        assert_eq!(mirror.mirrored(), pin);
    }

    #[test]
    fn test_display_is_one_based_and_signed() {
        let pin = FixedFixture::new(
            DateIndex::new(0),
            TeamIndex::new(1),
            Fixture::away(TeamIndex::new(2)),
        );
        assert_eq!(pin.to_string(), "FixedFixture(date: 1, team: 2, fixture: -3)");
    }
}
