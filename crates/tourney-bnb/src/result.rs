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

use crate::stats::BnbSolverStatistics;
use tourney_model::solution::Solution;
use tourney_search::{
    portfolio::PortfolioSolverResult,
    result::{SolverResult, TerminationReason},
};

/// Outcome of a single branch-and-bound solve.
///
/// `solutions` holds every calendar the search kept, best cost first; in
/// optimal-only mode that is at most one. `result` mirrors the first of them.
#[derive(Debug, Clone)]
pub struct BnbSolverOutcome<T> {
    result: SolverResult<T>,
    termination_reason: TerminationReason,
    solutions: Vec<Solution<T>>,
    statistics: BnbSolverStatistics<T>,
}

impl<T> BnbSolverOutcome<T>
where
    T: Clone,
{
    /// The search space was exhausted. No solutions means infeasible.
    #[inline]
    pub fn optimal(solutions: Vec<Solution<T>>, statistics: BnbSolverStatistics<T>) -> Self {
        match solutions.first() {
            Some(best) => Self {
                result: SolverResult::Optimal(best.clone()),
                termination_reason: TerminationReason::OptimalityProven,
                solutions,
                statistics,
            },
            None => Self::infeasible(statistics),
        }
    }

    #[inline]
    pub fn infeasible(statistics: BnbSolverStatistics<T>) -> Self {
        Self {
            result: SolverResult::Infeasible,
            termination_reason: TerminationReason::InfeasibilityProven,
            solutions: Vec::new(),
            statistics,
        }
    }

    #[inline]
    pub fn aborted<R>(
        solutions: Vec<Solution<T>>,
        reason: R,
        statistics: BnbSolverStatistics<T>,
    ) -> Self
    where
        R: Into<String>,
    {
        let result = match solutions.first() {
            Some(best) => SolverResult::Feasible(best.clone()),
            None => SolverResult::Unknown,
        };
        Self {
            result,
            termination_reason: TerminationReason::Aborted(reason.into()),
            solutions,
            statistics,
        }
    }

    /// The search caught itself in a contradiction; nothing it found is
    /// trusted.
    #[inline]
    pub fn inconsistent<R>(reason: R, statistics: BnbSolverStatistics<T>) -> Self
    where
        R: Into<String>,
    {
        Self {
            result: SolverResult::Unknown,
            termination_reason: TerminationReason::InternalInconsistency(reason.into()),
            solutions: Vec::new(),
            statistics,
        }
    }
}

impl<T> BnbSolverOutcome<T> {
    #[inline]
    pub fn result(&self) -> &SolverResult<T> {
        &self.result
    }

    #[inline]
    pub fn termination_reason(&self) -> &TerminationReason {
        &self.termination_reason
    }

    #[inline]
    pub fn solutions(&self) -> &[Solution<T>] {
        &self.solutions
    }

    #[inline]
    pub fn into_solutions(self) -> Vec<Solution<T>> {
        self.solutions
    }

    #[inline]
    pub fn statistics(&self) -> &BnbSolverStatistics<T> {
        &self.statistics
    }
}

impl<T> std::fmt::Display for BnbSolverOutcome<T>
where
    T: num_traits::PrimInt + num_traits::Signed + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BnbSolverOutcome(result: {}, termination_reason: {}, solutions: {})",
            self.result,
            self.termination_reason,
            self.solutions.len()
        )
    }
}

impl<T> From<BnbSolverOutcome<T>> for PortfolioSolverResult<T> {
    fn from(val: BnbSolverOutcome<T>) -> Self {
        let explored = val.statistics.nodes_explored;
        let pruned = val.statistics.prunings();
        let mut solutions = val.solutions.into_iter();
        let result = match val.termination_reason {
            TerminationReason::OptimalityProven | TerminationReason::InfeasibilityProven => {
                PortfolioSolverResult::optimal(solutions.next())
            }
            TerminationReason::Aborted(reason) => {
                PortfolioSolverResult::aborted(solutions.next(), reason)
            }
            TerminationReason::InternalInconsistency(reason) => {
                PortfolioSolverResult::inconsistent(reason)
            }
        };
        result.with_node_counts(explored, pruned)
    }
}
