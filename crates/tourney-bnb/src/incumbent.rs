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

//! Incumbent management for branch-and-bound
//!
//! Declares `IncumbentStore<T>`, a minimal interface to read and tighten the
//! best known cost (upper bound) and to publish new solutions during search.
//! This abstracts over local (single search) and shared (portfolio) use.
//!
//! Implementations
//! - `NoSharedIncumbent<T>`: local only. `initial_upper_bound = T::MAX`,
//!   `tighten(x) = x`, and `on_solution_found` is a no-op.
//! - `SharedIncumbentAdapter<'a, T>`: wraps
//!   `tourney_search::incumbent::SharedIncumbent<T>`; the bounds mirror the
//!   shared value and `on_solution_found` offers the calendar to the set.

use std::marker::PhantomData;
use tourney_model::solution::Solution;
use tourney_search::{incumbent::SharedIncumbent, num::SolverNumeric};

/// Access to the best known cost while a search runs.
pub trait IncumbentStore<T>
where
    T: SolverNumeric,
{
    /// Returns the upper bound the search starts with.
    fn initial_upper_bound(&self) -> T;
    /// Combines the local best cost with whatever the store knows.
    fn tighten(&self, current_local_best: T) -> T;
    /// Publishes a solution. With `keep_ties`, solutions equal to the best
    /// cost are kept as well.
    fn on_solution_found(&self, solution: &Solution<T>, keep_ties: bool);
}

/// An incumbent store that shares nothing. Use this for isolated solves.
#[repr(transparent)]
pub struct NoSharedIncumbent<T>(PhantomData<T>);

impl<T> Default for NoSharedIncumbent<T>
where
    T: SolverNumeric,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> NoSharedIncumbent<T>
where
    T: SolverNumeric,
{
    #[inline(always)]
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> IncumbentStore<T> for NoSharedIncumbent<T>
where
    T: SolverNumeric,
{
    #[inline(always)]
    fn initial_upper_bound(&self) -> T {
        T::max_value()
    }

    #[inline(always)]
    fn tighten(&self, current_local_best: T) -> T {
        current_local_best
    }

    #[inline(always)]
    fn on_solution_found(&self, _: &Solution<T>, _: bool) {}
}

/// An incumbent store backed by a `SharedIncumbent`.
#[repr(transparent)]
#[derive(Debug, Clone)]
pub struct SharedIncumbentAdapter<'a, T> {
    inner: &'a SharedIncumbent<T>,
}

impl<'a, T> SharedIncumbentAdapter<'a, T> {
    #[inline(always)]
    pub fn new(inner: &'a SharedIncumbent<T>) -> Self {
        Self { inner }
    }
}

impl<T> SharedIncumbentAdapter<'_, T>
where
    T: SolverNumeric,
{
    /// The shared bound in `T`; a bound `T` cannot hold means "none yet".
    #[inline(always)]
    fn shared_bound(&self) -> T {
        self.inner.upper_bound_as().unwrap_or_else(|_| T::max_value())
    }
}

impl<T> IncumbentStore<T> for SharedIncumbentAdapter<'_, T>
where
    T: SolverNumeric,
{
    #[inline(always)]
    fn initial_upper_bound(&self) -> T {
        self.shared_bound()
    }

    #[inline(always)]
    fn tighten(&self, current_local_best: T) -> T {
        self.shared_bound().min(current_local_best)
    }

    #[inline(always)]
    fn on_solution_found(&self, solution: &Solution<T>, keep_ties: bool) {
        self.inner.offer(solution, keep_ties);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tourney_model::calendar::Calendar;

    type IntegerType = i64;

    fn solution(cost: IntegerType, rows: &[Vec<i64>]) -> Solution<IntegerType> {
        Solution::new(cost, Calendar::from_signed_rows(2, rows).unwrap())
    }

    #[test]
    fn test_no_shared_incumbent() {
        let store: NoSharedIncumbent<IntegerType> = NoSharedIncumbent::new();
        assert_eq!(store.initial_upper_bound(), IntegerType::MAX);
        for val in [0, 1, 42, IntegerType::MAX - 1] {
            assert_eq!(store.tighten(val), val);
        }
    }

    #[test]
    fn test_shared_adapter_reads_and_publishes() {
        let shared = SharedIncumbent::<IntegerType>::new();
        let adapter = SharedIncumbentAdapter::new(&shared);
        assert_eq!(adapter.initial_upper_bound(), IntegerType::MAX);

        adapter.on_solution_found(&solution(63, &[vec![2, -1], vec![-2, 1]]), false);
        assert_eq!(shared.upper_bound(), 63);
        assert_eq!(adapter.initial_upper_bound(), 63);
        assert_eq!(adapter.tighten(100), 63);
        assert_eq!(adapter.tighten(50), 50);

        adapter.on_solution_found(&solution(63, &[vec![-2, 1], vec![2, -1]]), true);
        assert_eq!(shared.snapshot_all().len(), 2);
    }

    #[test]
    fn test_narrow_type_without_solution_is_unbounded() {
        let shared = SharedIncumbent::<i32>::new();
        let adapter = SharedIncumbentAdapter::new(&shared);
        assert_eq!(adapter.initial_upper_bound(), i32::MAX);
        assert_eq!(adapter.tighten(7), 7);
    }
}
