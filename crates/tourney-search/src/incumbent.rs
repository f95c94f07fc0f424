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

//! # Shared Incumbent
//!
//! The best solutions found so far, shared between search workers. A fast
//! atomic upper bound lets workers prune without locking, while the solution
//! set itself lives behind a `Mutex` and is the source of truth.
//!
//! In optimal-only search the set holds at most one calendar and only strict
//! improvements are accepted. In all-optimal search, calendars tying the
//! current best cost are appended to the set, and an improvement replaces the
//! whole set.
//!
//! ```rust
//! use tourney_search::incumbent::{IncumbentUpdate, SharedIncumbent};
//! use tourney_model::{calendar::Calendar, solution::Solution};
//!
//! let incumbent: SharedIncumbent<i64> = SharedIncumbent::new();
//! let calendar = Calendar::from_signed_rows(2, &[vec![2, -1], vec![-2, 1]]).unwrap();
//! let candidate = Solution::new(63, calendar);
//!
//! assert_eq!(incumbent.offer(&candidate, false), IncumbentUpdate::Improved);
//! assert_eq!(incumbent.upper_bound(), 63);
//! ```

use num_traits::{PrimInt, Signed};
use std::sync::{
    Mutex, PoisonError,
    atomic::{AtomicI64, Ordering},
};
use tourney_model::solution::Solution;

/// What happened to an offered candidate.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum IncumbentUpdate {
    /// The candidate is strictly better and replaced the set.
    Improved,
    /// The candidate ties the best cost and was added to the set.
    Tied,
    /// The candidate was not stored.
    Rejected,
}

impl IncumbentUpdate {
    #[inline]
    pub fn is_accepted(self) -> bool {
        !matches!(self, IncumbentUpdate::Rejected)
    }
}

/// A concurrent holder for the best solutions found during search.
///
/// The upper bound is read and written with `Ordering::Relaxed`. It only
/// serves to skip work early; every decision that changes the set is taken
/// again under the lock. `i64::MAX` stands for "no solution yet".
#[derive(Debug)]
pub struct SharedIncumbent<T> {
    upper_bound: AtomicI64,
    solutions: Mutex<Vec<Solution<T>>>,
}

impl<T> Default for SharedIncumbent<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Display for SharedIncumbent<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Incumbent(upper_bound: {})", self.upper_bound())
    }
}

impl<T> SharedIncumbent<T> {
    #[inline]
    pub fn new() -> Self {
        SharedIncumbent {
            upper_bound: AtomicI64::new(i64::MAX),
            solutions: Mutex::new(Vec::new()),
        }
    }

    /// Returns the best known cost, or `i64::MAX` if there is none.
    #[inline]
    pub fn upper_bound(&self) -> i64 {
        self.upper_bound.load(Ordering::Relaxed)
    }

    /// Returns the best known cost converted to `T`. Fails while no solution
    /// is installed and `T` cannot hold `i64::MAX`.
    #[inline]
    pub fn upper_bound_as(&self) -> Result<T, <T as TryFrom<i64>>::Error>
    where
        T: TryFrom<i64>,
    {
        T::try_from(self.upper_bound())
    }

    #[inline]
    pub fn has_solution(&self) -> bool {
        self.upper_bound() != i64::MAX
    }

    /// Returns the first best solution, if any.
    pub fn snapshot(&self) -> Option<Solution<T>>
    where
        T: Clone,
    {
        let guard = self.solutions.lock().unwrap_or_else(PoisonError::into_inner);
        guard.first().cloned()
    }

    /// Returns all solutions of the best cost in discovery order.
    pub fn snapshot_all(&self) -> Vec<Solution<T>>
    where
        T: Clone,
    {
        let guard = self.solutions.lock().unwrap_or_else(PoisonError::into_inner);
        guard.clone()
    }

    /// Installs `candidate` if it is strictly better than the incumbent.
    #[inline]
    pub fn try_install(&self, candidate: &Solution<T>) -> bool
    where
        T: PrimInt + Signed + Into<i64>,
    {
        self.offer(candidate, false) == IncumbentUpdate::Improved
    }

    /// Offers `candidate` to the incumbent. With `keep_ties`, a candidate of
    /// equal cost that is not yet stored is added to the set.
    pub fn offer(&self, candidate: &Solution<T>, keep_ties: bool) -> IncumbentUpdate
    where
        T: PrimInt + Signed + Into<i64>,
    {
        let objective: i64 = candidate.total_cost().into();
        let hint = self.upper_bound();
        if objective > hint || (objective == hint && !keep_ties) {
            return IncumbentUpdate::Rejected;
        }

        let mut guard = self.solutions.lock().unwrap_or_else(PoisonError::into_inner);
        // Another worker may have changed the set while we waited.
        let current = guard.first().map(|s| s.total_cost().into());
        match current {
            Some(best) if objective > best => IncumbentUpdate::Rejected,
            Some(best) if objective == best => {
                if !keep_ties || guard.iter().any(|s| s.calendar() == candidate.calendar()) {
                    IncumbentUpdate::Rejected
                } else {
                    guard.push(candidate.clone());
                    IncumbentUpdate::Tied
                }
            }
            _ => {
                guard.clear();
                guard.push(candidate.clone());
                self.upper_bound.store(objective, Ordering::Relaxed);
                IncumbentUpdate::Improved
            }
        }
    }

    /// Consumes the incumbent and returns its solutions.
    pub fn into_solutions(self) -> Vec<Solution<T>> {
        self.solutions
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
