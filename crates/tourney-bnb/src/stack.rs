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

use crate::branching::decision::Decision;
use tourney_core::num::SaturatingAddVal;

/// A frame-structured LIFO stack of pending decisions.
///
/// `SearchStack` stores all enqueued decisions linearly and uses a `frames`
/// index stack to mark decision-level boundaries. Popping a frame truncates
/// `entries` back to the recorded start index.
#[derive(Clone, Debug)]
pub struct SearchStack<T> {
    entries: Vec<Decision<T>>,
    /// `frames[i]` is the index in `entries` where depth `i` began.
    frames: Vec<usize>,
}

impl<T> Default for SearchStack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SearchStack<T> {
    #[inline]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            frames: Vec::new(),
        }
    }

    /// Creates a stack sized for `num_teams` teams: at most `2(n - 1)`
    /// candidates per level over `n(n - 1)` levels.
    #[inline]
    pub fn preallocated(num_teams: usize) -> Self {
        let (entry_capacity, frame_capacity) = Self::capacities(num_teams);
        Self {
            entries: Vec::with_capacity(entry_capacity),
            frames: Vec::with_capacity(frame_capacity),
        }
    }

    #[inline]
    pub fn ensure_capacity(&mut self, num_teams: usize) {
        let (entry_capacity, frame_capacity) = Self::capacities(num_teams);
        if self.entries.capacity() < entry_capacity {
            self.entries.reserve(entry_capacity - self.entries.len());
        }
        if self.frames.capacity() < frame_capacity {
            self.frames.reserve(frame_capacity - self.frames.len());
        }
    }

    #[inline]
    fn capacities(num_teams: usize) -> (usize, usize) {
        let depth = num_teams.saturating_mul(num_teams.saturating_sub(1));
        let per_level = 2 * num_teams.saturating_sub(1);
        (depth.saturating_mul(per_level), depth.saturating_add_val(1))
    }

    #[inline]
    pub fn num_entries(&self) -> usize {
        self.entries.len()
    }

    /// Returns the current search depth.
    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Returns `true` if there are no frames tracked (search exhausted).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Marks the start of a new decision level.
    #[inline]
    pub fn push_frame(&mut self) {
        self.frames.push(self.entries.len());
    }

    /// Pops the current frame, dropping its remaining decisions.
    #[inline]
    pub fn pop_frame(&mut self) -> Option<()> {
        let start = self.frames.pop()?;
        self.entries.truncate(start);
        Some(())
    }

    #[inline]
    pub fn push(&mut self, decision: Decision<T>) {
        self.entries.push(decision);
    }

    /// Enqueues `iter` so that the first decision it yields is popped first.
    /// Returns the number of decisions added.
    #[inline]
    pub fn extend_ordered<I>(&mut self, iter: I) -> usize
    where
        I: IntoIterator<Item = Decision<T>>,
    {
        let start = self.entries.len();
        self.entries.extend(iter);
        self.entries[start..].reverse();
        self.entries.len() - start
    }

    /// Pops the next decision (LIFO).
    #[inline]
    pub fn pop(&mut self) -> Option<Decision<T>> {
        self.entries.pop()
    }

    /// Clears all entries and frames, keeping the allocations.
    #[inline]
    pub fn reset(&mut self) {
        self.entries.clear();
        self.frames.clear();
    }

    #[inline]
    pub fn is_current_level_empty(&self) -> bool {
        match self.frames.last() {
            Some(&start) => self.entries.len() == start,
            None => true,
        }
    }

    /// Returns the pending decisions of the current frame.
    #[inline]
    pub fn current_frame_entries(&self) -> &[Decision<T>] {
        match self.frames.last() {
            Some(&start) => &self.entries[start..],
            None => &[],
        }
    }
}

impl<T> std::fmt::Display for SearchStack<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SearchStack(entries: {}, frames: {})",
            self.entries.len(),
            self.frames.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tourney_model::{
        fixture::Fixture,
        index::{DateIndex, TeamIndex},
    };

    type IntegerType = i64;

    fn d(team: usize, opponent: usize) -> Decision<IntegerType> {
        Decision::new(
            0,
            DateIndex::new(0),
            TeamIndex::new(team),
            Fixture::home(TeamIndex::new(opponent)),
        )
    }

    #[test]
    fn test_new_and_preallocated_basic_props() {
        let s = SearchStack::<IntegerType>::new();
        assert_eq!(s.num_entries(), 0);
        assert_eq!(s.depth(), 0);
        assert!(s.is_empty());
        assert!(s.is_current_level_empty());
        assert_eq!(s.current_frame_entries(), &[]);

        let s2 = SearchStack::<IntegerType>::preallocated(4);
        assert!(s2.entries.capacity() >= 12 * 6);
        assert!(s2.frames.capacity() >= 13);
        assert_eq!(format!("{}", s2), "SearchStack(entries: 0, frames: 0)");
    }

    #[test]
    fn test_extend_ordered_pops_in_iteration_order() {
        let mut s = SearchStack::new();
        s.push_frame();
        assert_eq!(s.extend_ordered([d(0, 1), d(0, 2), d(0, 3)]), 3);
        assert_eq!(s.current_frame_entries().len(), 3);

        assert_eq!(s.pop(), Some(d(0, 1)));
        assert_eq!(s.pop(), Some(d(0, 2)));
        assert_eq!(s.pop(), Some(d(0, 3)));
        assert!(s.is_current_level_empty());
    }

    #[test]
    fn test_pop_frame_discards_pending_level() {
        let mut s = SearchStack::new();
        s.push_frame();
        s.push(d(0, 1));
        s.push_frame();
        s.extend_ordered([d(2, 3), d(2, 1)]);
        assert_eq!(s.depth(), 2);
        assert_eq!(s.num_entries(), 3);

        assert!(s.pop_frame().is_some());
        assert_eq!(s.depth(), 1);
        assert_eq!(s.current_frame_entries(), &[d(0, 1)]);
        assert!(s.pop_frame().is_some());
        assert!(s.pop_frame().is_none());
        assert!(s.is_empty());
    }

    #[test]
    fn test_reset_keeps_capacity() {
        let mut s = SearchStack::preallocated(4);
        let cap = s.entries.capacity();
        s.push_frame();
        s.push(d(0, 1));
        s.reset();
        assert!(s.is_empty());
        assert_eq!(s.num_entries(), 0);
        assert_eq!(s.entries.capacity(), cap);
    }
}
