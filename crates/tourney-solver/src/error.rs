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

//! Errors reported by the solver facade.
//!
//! Every failure a caller of `Solver` can observe maps to one `TourneyError`
//! variant, and every variant to an `ErrorKind` with a stable string code and
//! process exit code. Infeasible and cancelled outcomes are errors here so
//! that they can never be mistaken for a found calendar.

use crate::gate::Busy;
use num_traits::{PrimInt, Signed};
use tourney_model::loading::ParseError;
use tourney_search::result::{SolverOutcome, TerminationReason};

/// Stable classification of a `TourneyError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Parse,
    Infeasible,
    Cancelled,
    InternalInconsistency,
    Busy,
}

impl ErrorKind {
    /// Machine readable code, stable across releases.
    pub const fn code(self) -> &'static str {
        match self {
            ErrorKind::Parse => "parse_error",
            ErrorKind::Infeasible => "infeasible",
            ErrorKind::Cancelled => "cancelled",
            ErrorKind::InternalInconsistency => "internal_inconsistency",
            ErrorKind::Busy => "busy",
        }
    }

    /// Exit code of the `tourney` binary.
    pub const fn exit_code(self) -> u8 {
        match self {
            ErrorKind::Parse => 1,
            ErrorKind::Infeasible => 2,
            ErrorKind::Cancelled => 3,
            ErrorKind::InternalInconsistency => 4,
            ErrorKind::Busy => 5,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug)]
pub enum TourneyError {
    /// The instance text was rejected.
    Parse(ParseError),
    /// The search proved that no calendar satisfies the constraints.
    Infeasible,
    /// The search was stopped before it could prove anything.
    Cancelled { reason: String },
    /// The search detected a contradiction in its own bookkeeping.
    InternalInconsistency { reason: String },
    /// Another solve is in flight.
    Busy(Busy),
}

impl TourneyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TourneyError::Parse(_) => ErrorKind::Parse,
            TourneyError::Infeasible => ErrorKind::Infeasible,
            TourneyError::Cancelled { .. } => ErrorKind::Cancelled,
            TourneyError::InternalInconsistency { .. } => ErrorKind::InternalInconsistency,
            TourneyError::Busy(_) => ErrorKind::Busy,
        }
    }

    /// Classifies an outcome. `None` means optimality was proven.
    pub fn from_outcome<T>(outcome: &SolverOutcome<T>) -> Option<Self>
    where
        T: PrimInt + Signed,
    {
        match &outcome.reason {
            TerminationReason::OptimalityProven => None,
            TerminationReason::InfeasibilityProven => Some(TourneyError::Infeasible),
            TerminationReason::Aborted(reason) => Some(TourneyError::Cancelled {
                reason: reason.clone(),
            }),
            TerminationReason::InternalInconsistency(reason) => {
                Some(TourneyError::InternalInconsistency {
                    reason: reason.clone(),
                })
            }
        }
    }
}

impl std::fmt::Display for TourneyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TourneyError::Parse(e) => write!(f, "invalid instance: {}", e),
            TourneyError::Infeasible => write!(f, "no calendar satisfies the constraints"),
            TourneyError::Cancelled { reason } => write!(f, "search cancelled: {}", reason),
            TourneyError::InternalInconsistency { reason } => {
                write!(f, "internal inconsistency: {}", reason)
            }
            TourneyError::Busy(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for TourneyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TourneyError::Parse(e) => Some(e),
            TourneyError::Busy(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParseError> for TourneyError {
    fn from(e: ParseError) -> Self {
        TourneyError::Parse(e)
    }
}

impl From<Busy> for TourneyError {
    fn from(e: Busy) -> Self {
        TourneyError::Busy(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tourney_model::calendar::Calendar;
    use tourney_model::solution::Solution;
    use tourney_search::stats::SolverStatistics;

    type IntegerType = i64;

    #[test]
    fn test_codes_are_distinct() {
        let kinds = [
            ErrorKind::Parse,
            ErrorKind::Infeasible,
            ErrorKind::Cancelled,
            ErrorKind::InternalInconsistency,
            ErrorKind::Busy,
        ];
        for (i, a) in kinds.iter().enumerate() {
            for b in &kinds[i + 1..] {
                assert_ne!(a.code(), b.code());
                assert_ne!(a.exit_code(), b.exit_code());
            }
        }
        assert_eq!(ErrorKind::Infeasible.to_string(), "infeasible");
    }

    #[test]
    fn test_from_outcome() {
        let calendar = Calendar::from_signed_rows(2, &[vec![2, -1], vec![-2, 1]]).unwrap();
        let optimal = SolverOutcome::<IntegerType>::from_solutions(
            vec![Solution::new(6, calendar)],
            TerminationReason::OptimalityProven,
            SolverStatistics::default(),
        );
        assert!(TourneyError::from_outcome(&optimal).is_none());

        let infeasible = SolverOutcome::<IntegerType>::from_solutions(
            Vec::new(),
            TerminationReason::OptimalityProven,
            SolverStatistics::default(),
        );
        assert_eq!(
            TourneyError::from_outcome(&infeasible).map(|e| e.kind()),
            Some(ErrorKind::Infeasible)
        );

        let cancelled = SolverOutcome::<IntegerType>::from_solutions(
            Vec::new(),
            TerminationReason::Aborted("time limit exceeded".to_owned()),
            SolverStatistics::default(),
        );
        let error = TourneyError::from_outcome(&cancelled).unwrap();
        assert_eq!(error.kind(), ErrorKind::Cancelled);
        assert_eq!(error.to_string(), "search cancelled: time limit exceeded");
    }
}
