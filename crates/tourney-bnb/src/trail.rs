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

use crate::state::{SearchInconsistency, SearchState, Stand};
use tourney_model::{
    fixture::Fixture,
    index::{DateIndex, TeamIndex},
};

/// A record of a single pair assignment applied to the search state.
///
/// `TrailEntry` captures what `SearchState::assign` cannot derive on its own
/// when undoing: the stands of both teams and the cost before the assignment.
/// Bitsets, counters and cells are restored from the fixture itself.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TrailEntry<T> {
    old_cost: T,
    old_team_stand: Stand,
    old_opponent_stand: Stand,
    date: DateIndex,
    team: TeamIndex,
    fixture: Fixture,
}

impl<T> TrailEntry<T>
where
    T: Copy,
{
    /// Returns the accumulated cost before the assignment.
    #[inline]
    pub fn old_cost(&self) -> T {
        self.old_cost
    }

    #[inline]
    pub fn date(&self) -> DateIndex {
        self.date
    }

    #[inline]
    pub fn team(&self) -> TeamIndex {
        self.team
    }

    #[inline]
    pub fn fixture(&self) -> Fixture {
        self.fixture
    }
}

impl<T> std::fmt::Display for TrailEntry<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TrailEntry(date: {}, team: {}, fixture: {}, old_cost: {})",
            self.date.get(),
            self.team.get(),
            self.fixture,
            self.old_cost
        )
    }
}

/// A linear undo log with frame markers for backtracking.
///
/// Typical usage:
/// 1. Call `push_frame` before expanding a decision level,
/// 2. call `apply_assignment` for the decision taken on that level,
/// 3. on prune or exhaustion, call `backtrack` to restore the state to the
///    start of the frame.
#[derive(Debug, Clone)]
pub struct SearchTrail<T> {
    entries: Vec<TrailEntry<T>>,
    /// `frames[i]` is the index in `entries` where depth `i` began.
    frames: Vec<usize>,
}

impl<T> Default for SearchTrail<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SearchTrail<T> {
    #[inline]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            frames: Vec::new(),
        }
    }

    /// Creates a trail with room for a complete calendar of `num_teams` teams.
    #[inline]
    pub fn preallocated(num_teams: usize) -> Self {
        let depth = Self::max_depth(num_teams);
        Self {
            entries: Vec::with_capacity(depth),
            frames: Vec::with_capacity(depth + 1),
        }
    }

    /// Ensures the trail can hold a complete calendar of `num_teams` teams
    /// without reallocating.
    pub fn ensure_capacity(&mut self, num_teams: usize) {
        let depth = Self::max_depth(num_teams);
        if self.entries.capacity() < depth {
            self.entries.reserve(depth - self.entries.len());
        }
        if self.frames.capacity() < depth + 1 {
            self.frames.reserve(depth + 1 - self.frames.len());
        }
    }

    /// One pair per level: `n/2` pairs on each of `2(n - 1)` dates.
    #[inline]
    fn max_depth(num_teams: usize) -> usize {
        num_teams * num_teams.saturating_sub(1)
    }

    #[inline]
    pub fn num_entries(&self) -> usize {
        self.entries.len()
    }

    /// Returns the current depth of the trail.
    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Marks the start of a new decision level.
    #[inline]
    pub fn push_frame(&mut self) {
        self.frames.push(self.entries.len());
    }

    /// Assigns `fixture` to `team` on `date` (and the mirror to its
    /// opponent), sets the accumulated cost to `new_cost`, and records how to
    /// undo both.
    ///
    /// On error nothing is recorded and the state is left untouched.
    pub fn apply_assignment(
        &mut self,
        state: &mut SearchState<T>,
        date: DateIndex,
        team: TeamIndex,
        fixture: Fixture,
        new_cost: T,
    ) -> Result<(), SearchInconsistency>
    where
        T: Copy,
    {
        let entry = TrailEntry {
            old_cost: state.current_cost(),
            old_team_stand: state.stand(team),
            old_opponent_stand: state.stand(fixture.opponent()),
            date,
            team,
            fixture,
        };

        state.assign(date, team, fixture)?;
        state.set_current_cost(new_cost);
        self.entries.push(entry);
        Ok(())
    }

    /// Undoes every assignment of the current frame and pops it.
    pub fn backtrack(&mut self, state: &mut SearchState<T>)
    where
        T: Copy,
    {
        let Some(start) = self.frames.pop() else {
            return;
        };

        while self.entries.len() > start {
            if let Some(entry) = self.entries.pop() {
                Self::undo_entry(state, entry);
            }
        }
    }

    /// Undoes every assignment across all frames.
    pub fn clear(&mut self, state: &mut SearchState<T>)
    where
        T: Copy,
    {
        while let Some(entry) = self.entries.pop() {
            Self::undo_entry(state, entry);
        }
        self.frames.clear();
    }

    /// Resets the trail markers without undoing any state changes.
    #[inline]
    pub fn reset(&mut self) {
        self.entries.clear();
        self.frames.clear();
    }

    #[inline]
    fn undo_entry(state: &mut SearchState<T>, entry: TrailEntry<T>)
    where
        T: Copy,
    {
        state.unassign(
            entry.date,
            entry.team,
            entry.fixture,
            entry.old_team_stand,
            entry.old_opponent_stand,
        );
        state.set_current_cost(entry.old_cost);
    }

    #[inline]
    pub fn iter_entries(&self) -> std::slice::Iter<'_, TrailEntry<T>> {
        self.entries.iter()
    }
}

impl<T> std::fmt::Display for SearchTrail<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SearchTrail(entries: {}, frames: {})",
            self.entries.len(),
            self.frames.len()
        )
    }
}
