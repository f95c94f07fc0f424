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

//! Interface between the solver facade and its parallel search workers.
//!
//! Every worker gets a `PortfolioSolverContext` borrowing the state shared by
//! the whole solve: the instance, the incumbent, the stop flag, and the global
//! solution counter. Workers report back through `PortfolioSolverResult`.

use crate::{
    incumbent::SharedIncumbent,
    result::{SolverResult, TerminationReason},
};
use num_traits::{PrimInt, Signed};
use std::{
    sync::atomic::{AtomicBool, AtomicU64},
    time::Instant,
};
use tourney_model::{instance::TournamentInstance, solution::Solution};

/// Limits every worker of a solve observes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchLimits {
    /// Wall-clock instant after which the search stops.
    pub deadline: Option<Instant>,
    /// Number of accepted solutions after which the search stops.
    pub solution_limit: Option<u64>,
}

impl SearchLimits {
    #[inline]
    pub fn unlimited() -> Self {
        Self::default()
    }
}

pub struct PortfolioSolverContext<'a, T> {
    pub instance: &'a TournamentInstance<T>,
    pub incumbent: &'a SharedIncumbent<T>,
    pub stop: &'a AtomicBool,
    pub solutions_found: &'a AtomicU64,
    pub limits: SearchLimits,
}

impl<'a, T> PortfolioSolverContext<'a, T> {
    #[inline(always)]
    pub fn new(
        instance: &'a TournamentInstance<T>,
        incumbent: &'a SharedIncumbent<T>,
        stop: &'a AtomicBool,
        solutions_found: &'a AtomicU64,
        limits: SearchLimits,
    ) -> Self {
        Self {
            instance,
            incumbent,
            stop,
            solutions_found,
            limits,
        }
    }
}

impl<T> std::fmt::Debug for PortfolioSolverContext<'_, T>
where
    T: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortfolioSolverContext")
            .field("instance", &self.instance)
            .field("incumbent", &self.incumbent)
            .field("stop", &self.stop)
            .field("solutions_found", &self.solutions_found)
            .field("limits", &self.limits)
            .finish()
    }
}

impl<T> std::fmt::Display for PortfolioSolverContext<'_, T>
where
    T: PrimInt + Signed + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PortfolioSolverContext(instance: {}, incumbent: {})",
            self.instance, self.incumbent
        )
    }
}

/// What a single worker reports. The solutions themselves live in the
/// shared incumbent; `result` carries the worker's own best, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortfolioSolverResult<T> {
    result: SolverResult<T>,
    termination_reason: TerminationReason,
    nodes_explored: u64,
    nodes_pruned: u64,
}

impl<T> PortfolioSolverResult<T> {
    #[inline]
    pub fn optimal(solution: Option<Solution<T>>) -> Self {
        let (result, termination_reason) = match solution {
            Some(sol) => (SolverResult::Optimal(sol), TerminationReason::OptimalityProven),
            None => (SolverResult::Infeasible, TerminationReason::InfeasibilityProven),
        };
        Self {
            result,
            termination_reason,
            nodes_explored: 0,
            nodes_pruned: 0,
        }
    }

    #[inline]
    pub fn aborted<R>(solution: Option<Solution<T>>, reason: R) -> Self
    where
        R: Into<String>,
    {
        let result = match solution {
            Some(sol) => SolverResult::Feasible(sol),
            None => SolverResult::Unknown,
        };
        Self {
            result,
            termination_reason: TerminationReason::Aborted(reason.into()),
            nodes_explored: 0,
            nodes_pruned: 0,
        }
    }

    #[inline]
    pub fn inconsistent<R>(reason: R) -> Self
    where
        R: Into<String>,
    {
        Self {
            result: SolverResult::Unknown,
            termination_reason: TerminationReason::InternalInconsistency(reason.into()),
            nodes_explored: 0,
            nodes_pruned: 0,
        }
    }

    #[inline]
    pub fn with_node_counts(mut self, explored: u64, pruned: u64) -> Self {
        self.nodes_explored = explored;
        self.nodes_pruned = pruned;
        self
    }

    #[inline]
    pub fn result(&self) -> &SolverResult<T> {
        &self.result
    }

    #[inline]
    pub fn termination_reason(&self) -> &TerminationReason {
        &self.termination_reason
    }

    #[inline]
    pub fn nodes_explored(&self) -> u64 {
        self.nodes_explored
    }

    #[inline]
    pub fn nodes_pruned(&self) -> u64 {
        self.nodes_pruned
    }
}

impl<T> std::fmt::Display for PortfolioSolverResult<T>
where
    T: PrimInt + Signed + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PortfolioSolverResult(result: {}, termination_reason: {})",
            self.result, self.termination_reason
        )
    }
}

/// A search worker the solver facade can run on its own thread.
pub trait PortfolioSolver<T>: Send
where
    T: PrimInt + Signed,
{
    fn solve(&mut self, context: PortfolioSolverContext<'_, T>) -> PortfolioSolverResult<T>;
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use tourney_model::calendar::Calendar;

    type IntegerType = i64;

    #[test]
    fn test_worker_results() {
        let r = PortfolioSolverResult::<IntegerType>::optimal(None);
        assert_eq!(r.result(), &SolverResult::Infeasible);
        assert_eq!(r.termination_reason(), &TerminationReason::InfeasibilityProven);

        let calendar = Calendar::from_signed_rows(2, &[vec![2, -1], vec![-2, 1]]).unwrap();
        let r = PortfolioSolverResult::aborted(Some(Solution::new(63 as IntegerType, calendar)), "stop")
            .with_node_counts(10, 4);
        assert!(matches!(r.result(), SolverResult::Feasible(_)));
        assert_eq!(r.nodes_explored(), 10);
        assert_eq!(r.nodes_pruned(), 4);

        let r = PortfolioSolverResult::<IntegerType>::aborted(None, "stop");
        assert_eq!(r.result(), &SolverResult::Unknown);
    }
}
