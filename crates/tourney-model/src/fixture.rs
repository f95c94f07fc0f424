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

//! A single calendar cell.
//!
//! On every date each team either hosts an opponent or travels to one. The
//! text format encodes this as a signed, 1-based team number: `+k` hosts team
//! `k`, `-k` travels to team `k`. `Fixture` is the typed form of that cell and
//! converts losslessly in both directions.

use crate::index::TeamIndex;

/// Where a team plays on a given date.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Venue {
    Home,
    Away,
}

impl Venue {
    /// Returns the venue seen from the opponent's side.
    #[inline(always)]
    pub const fn flip(self) -> Self {
        match self {
            Venue::Home => Venue::Away,
            Venue::Away => Venue::Home,
        }
    }

    #[inline(always)]
    pub const fn is_home(self) -> bool {
        matches!(self, Venue::Home)
    }

    #[inline(always)]
    pub const fn is_away(self) -> bool {
        matches!(self, Venue::Away)
    }
}

impl std::fmt::Display for Venue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Venue::Home => write!(f, "home"),
            Venue::Away => write!(f, "away"),
        }
    }
}

/// The opponent and venue of one team on one date.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Fixture {
    opponent: TeamIndex,
    venue: Venue,
}

impl Fixture {
    #[inline(always)]
    pub const fn new(opponent: TeamIndex, venue: Venue) -> Self {
        Self { opponent, venue }
    }

    /// The team hosts `opponent`.
    #[inline(always)]
    pub const fn home(opponent: TeamIndex) -> Self {
        Self::new(opponent, Venue::Home)
    }

    /// The team travels to `opponent`.
    #[inline(always)]
    pub const fn away(opponent: TeamIndex) -> Self {
        Self::new(opponent, Venue::Away)
    }

    #[inline(always)]
    pub const fn opponent(&self) -> TeamIndex {
        self.opponent
    }

    #[inline(always)]
    pub const fn venue(&self) -> Venue {
        self.venue
    }

    #[inline(always)]
    pub const fn is_home(&self) -> bool {
        self.venue.is_home()
    }

    #[inline(always)]
    pub const fn is_away(&self) -> bool {
        self.venue.is_away()
    }

    /// Returns the fixture the opponent plays on the same date, given that
    /// `team` is the one playing `self`.
    #[inline(always)]
    pub const fn mirrored(&self, team: TeamIndex) -> Self {
        Self::new(team, self.venue.flip())
    }

    /// Returns the team whose venue hosts this game, given that `team` is the
    /// one playing `self`.
    #[inline(always)]
    pub const fn location(&self, team: TeamIndex) -> TeamIndex {
        match self.venue {
            Venue::Home => team,
            Venue::Away => self.opponent,
        }
    }

    /// Encodes the fixture as a signed, 1-based team number.
    #[inline]
    pub fn to_signed(&self) -> i64 {
        let k = self.opponent.get() as i64 + 1;
        match self.venue {
            Venue::Home => k,
            Venue::Away => -k,
        }
    }

    /// Decodes a signed, 1-based team number. Returns `None` for `0` and for
    /// team numbers above `num_teams`.
    #[inline]
    pub fn from_signed(value: i64, num_teams: usize) -> Option<Self> {
        let magnitude = usize::try_from(value.unsigned_abs()).ok()?;
        if magnitude == 0 || magnitude > num_teams {
            return None;
        }
        let opponent = TeamIndex::new(magnitude - 1);
        Some(if value > 0 {
            Self::home(opponent)
        } else {
            Self::away(opponent)
        })
    }
}

impl std::fmt::Display for Fixture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_signed())
    }
}
