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

use crate::stats::SolverStatistics;
use num_traits::{PrimInt, Signed};
use tourney_model::solution::Solution;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverResult<T> {
    /// No calendar satisfies all rules.
    Infeasible,
    /// The solution is proven to have minimal cost.
    Optimal(Solution<T>),
    /// The solution is valid, but the search stopped before proving it optimal.
    Feasible(Solution<T>),
    /// The search stopped without a solution and without proving infeasibility.
    Unknown,
}

impl<T> SolverResult<T> {
    #[inline]
    pub fn solution(&self) -> Option<&Solution<T>> {
        match self {
            SolverResult::Optimal(s) | SolverResult::Feasible(s) => Some(s),
            _ => None,
        }
    }
}

impl<T> std::fmt::Display for SolverResult<T>
where
    T: PrimInt + Signed + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverResult::Infeasible => write!(f, "Infeasible"),
            SolverResult::Optimal(solution) => {
                write!(f, "Optimal(total_cost={})", solution.total_cost())
            }
            SolverResult::Feasible(solution) => {
                write!(f, "Feasible(total_cost={})", solution.total_cost())
            }
            SolverResult::Unknown => write!(f, "Unknown"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationReason {
    /// The search space was exhausted with at least one solution.
    OptimalityProven,
    /// The search space was exhausted without a solution.
    InfeasibilityProven,
    /// A limit or a cancellation request stopped the search.
    Aborted(String),
    /// A completed calendar failed the independent validation, or the search
    /// state became inconsistent. Always a defect.
    InternalInconsistency(String),
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationReason::OptimalityProven => write!(f, "Optimality Proven"),
            TerminationReason::InfeasibilityProven => write!(f, "Infeasibility Proven"),
            TerminationReason::Aborted(reason) => write!(f, "Aborted: {}", reason),
            TerminationReason::InternalInconsistency(reason) => {
                write!(f, "Internal Inconsistency: {}", reason)
            }
        }
    }
}

/// Result of a complete solve.
///
/// `solutions` holds every calendar of the best cost found, in discovery
/// order. It has at most one element unless the search ran in all-optimal
/// mode. When `result` carries a solution it is the first of `solutions`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverOutcome<T> {
    pub result: SolverResult<T>,
    pub reason: TerminationReason,
    pub solutions: Vec<Solution<T>>,
    pub statistics: SolverStatistics,
}

impl<T> SolverOutcome<T>
where
    T: PrimInt + Signed,
{
    #[inline]
    pub fn new(
        result: SolverResult<T>,
        reason: TerminationReason,
        solutions: Vec<Solution<T>>,
        statistics: SolverStatistics,
    ) -> Self {
        Self {
            result,
            reason,
            solutions,
            statistics,
        }
    }

    /// Derives the result from the solutions found and how the search ended.
    pub fn from_solutions(
        solutions: Vec<Solution<T>>,
        reason: TerminationReason,
        statistics: SolverStatistics,
    ) -> Self {
        let result = match (&reason, solutions.first()) {
            (TerminationReason::InternalInconsistency(_), _) => SolverResult::Unknown,
            (TerminationReason::OptimalityProven, Some(best)) => SolverResult::Optimal(best.clone()),
            (TerminationReason::OptimalityProven, None) => SolverResult::Infeasible,
            (TerminationReason::InfeasibilityProven, _) => SolverResult::Infeasible,
            (TerminationReason::Aborted(_), Some(best)) => SolverResult::Feasible(best.clone()),
            (TerminationReason::Aborted(_), None) => SolverResult::Unknown,
        };
        let reason = match (reason, result.solution()) {
            (TerminationReason::OptimalityProven, None) => TerminationReason::InfeasibilityProven,
            (reason, _) => reason,
        };
        Self::new(result, reason, solutions, statistics)
    }

    #[inline]
    pub fn is_optimal(&self) -> bool {
        matches!(self.result, SolverResult::Optimal(_))
    }

    #[inline]
    pub fn is_feasible(&self) -> bool {
        matches!(self.result, SolverResult::Feasible(_))
    }

    #[inline]
    pub fn is_infeasible(&self) -> bool {
        matches!(self.result, SolverResult::Infeasible)
    }

    #[inline]
    pub fn has_solution(&self) -> bool {
        self.result.solution().is_some()
    }

    #[inline]
    pub fn solution(&self) -> Option<&Solution<T>> {
        self.result.solution()
    }
}

impl<T> std::fmt::Display for SolverOutcome<T>
where
    T: PrimInt + Signed + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SolverOutcome(result: {}, reason: {}, solutions: {})",
            self.result,
            self.reason,
            self.solutions.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tourney_model::calendar::Calendar;

    type IntegerType = i64;

    fn solution(cost: IntegerType) -> Solution<IntegerType> {
        let calendar = Calendar::from_signed_rows(2, &[vec![2, -1], vec![-2, 1]]).unwrap();
        Solution::new(cost, calendar)
    }

    #[test]
    fn test_exhausted_search_with_solution_is_optimal() {
        let outcome = SolverOutcome::from_solutions(
            vec![solution(63)],
            TerminationReason::OptimalityProven,
            SolverStatistics::default(),
        );
        assert!(outcome.is_optimal());
        assert_eq!(outcome.solution().map(|s| s.total_cost()), Some(63));
    }

    #[test]
    fn test_exhausted_search_without_solution_is_infeasible() {
        let outcome = SolverOutcome::<IntegerType>::from_solutions(
            Vec::new(),
            TerminationReason::OptimalityProven,
            SolverStatistics::default(),
        );
        assert!(outcome.is_infeasible());
        assert_eq!(outcome.reason, TerminationReason::InfeasibilityProven);
    }

    #[test]
    fn test_aborted_search_is_feasible_or_unknown() {
        let outcome = SolverOutcome::from_solutions(
            vec![solution(70)],
            TerminationReason::Aborted("time limit".to_owned()),
            SolverStatistics::default(),
        );
        assert!(outcome.is_feasible());

        let outcome = SolverOutcome::<IntegerType>::from_solutions(
            Vec::new(),
            TerminationReason::Aborted("time limit".to_owned()),
            SolverStatistics::default(),
        );
        assert_eq!(outcome.result, SolverResult::Unknown);
    }

    #[test]
    fn test_inconsistency_hides_solutions() {
        let outcome = SolverOutcome::from_solutions(
            vec![solution(63)],
            TerminationReason::InternalInconsistency("bad leaf".to_owned()),
            SolverStatistics::default(),
        );
        assert!(!outcome.has_solution());
        assert_eq!(
            format!("{}", outcome.reason),
            "Internal Inconsistency: bad leaf"
        );
    }
}
