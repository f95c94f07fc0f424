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

//! Parallel search over root partitions.
//!
//! The tree is split at its first cell: team 0 on the first date plays one
//! of the other teams, at home or away. `RootPartitions` hands these
//! `2(n - 1)` subtrees out through an atomic counter, and every
//! `BnbPortfolioSolver` worker solves the subtrees it claims with the
//! partition pinned as a fixed fixture. Workers share nothing but the
//! incumbent, the stop flag and the solution counter of the context.

use crate::{
    bnb::BnbSolver,
    branching::decision::DecisionBuilder,
    eval::evaluator::ObjectiveEvaluator,
    fixed::FixedFixture,
    monitor::{
        composite::CompositeTreeSearchMonitor, interrupt::InterruptMonitor,
        log::LogTreeSearchMonitor, solution_limit::SolutionLimitMonitor,
        time_limit::TimeLimitMonitor,
    },
};
use std::sync::atomic::{AtomicUsize, Ordering};
use tourney_model::{
    fixture::Fixture,
    index::{DateIndex, TeamIndex},
    solution::Solution,
};
use tourney_search::{
    mode::SearchMode,
    num::SolverNumeric,
    portfolio::{PortfolioSolver, PortfolioSolverContext, PortfolioSolverResult},
    result::TerminationReason,
};

/// The root subtrees of a solve and a cursor over them.
#[derive(Debug)]
pub struct RootPartitions {
    partitions: Vec<FixedFixture>,
    next: AtomicUsize,
}

impl RootPartitions {
    /// Splits on the first cell of team 0: hosting team 1, visiting team 1,
    /// hosting team 2, and so on.
    pub fn for_teams(num_teams: usize) -> Self {
        let first = TeamIndex::new(0);
        let partitions = (1..num_teams)
            .map(TeamIndex::new)
            .flat_map(|opponent| [Fixture::home(opponent), Fixture::away(opponent)])
            .map(|fixture| FixedFixture::new(DateIndex::new(0), first, fixture))
            .collect();
        Self {
            partitions,
            next: AtomicUsize::new(0),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.partitions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }

    /// Claims the next unexplored partition, if any is left.
    #[inline]
    pub fn claim(&self) -> Option<FixedFixture> {
        let index = self.next.fetch_add(1, Ordering::Relaxed);
        self.partitions.get(index).copied()
    }
}

/// A worker that repeatedly claims a root partition and solves it.
pub struct BnbPortfolioSolver<'p, T, B, E>
where
    T: SolverNumeric,
    B: DecisionBuilder<T, E>,
    E: ObjectiveEvaluator<T>,
{
    inner: BnbSolver<T>,
    decision_builder: B,
    evaluator: E,
    partitions: &'p RootPartitions,
    log_progress: bool,
}

impl<'p, T, B, E> BnbPortfolioSolver<'p, T, B, E>
where
    T: SolverNumeric,
    B: DecisionBuilder<T, E>,
    E: ObjectiveEvaluator<T>,
{
    #[inline]
    pub fn new(
        inner: BnbSolver<T>,
        decision_builder: B,
        evaluator: E,
        partitions: &'p RootPartitions,
    ) -> Self {
        Self {
            inner,
            decision_builder,
            evaluator,
            partitions,
            log_progress: false,
        }
    }

    /// Adds a `LogTreeSearchMonitor` to every sub-solve.
    #[inline]
    pub fn with_progress_log(mut self, enabled: bool) -> Self {
        self.log_progress = enabled;
        self
    }

    #[inline]
    pub fn inner(&self) -> &BnbSolver<T> {
        &self.inner
    }

    #[inline]
    pub fn mode(&self) -> SearchMode {
        self.inner.mode()
    }
}

impl<T, B, E> PortfolioSolver<T> for BnbPortfolioSolver<'_, T, B, E>
where
    T: SolverNumeric,
    B: DecisionBuilder<T, E> + Send,
    E: ObjectiveEvaluator<T> + Send,
{
    fn solve(&mut self, context: PortfolioSolverContext<'_, T>) -> PortfolioSolverResult<T> {
        let mut explored = 0u64;
        let mut pruned = 0u64;
        let mut best: Option<Solution<T>> = None;

        while let Some(partition) = self.partitions.claim() {
            let mut monitor = CompositeTreeSearchMonitor::with_capacity(4);
            monitor.add_monitor(InterruptMonitor::new(context.stop));
            if let Some(deadline) = context.limits.deadline {
                monitor.add_monitor(TimeLimitMonitor::with_deadline(deadline));
            }
            // Also counts solutions when no limit is set.
            let limit = context.limits.solution_limit.unwrap_or(u64::MAX);
            monitor.add_monitor(SolutionLimitMonitor::new(context.solutions_found, limit));
            if self.log_progress {
                monitor.add_monitor(LogTreeSearchMonitor::default());
            }

            log::debug!("{} claimed {}", self.name(), partition);
            let outcome = self.inner.solve_with_fixed_and_incumbent(
                context.instance,
                &mut self.decision_builder,
                &mut self.evaluator,
                monitor,
                &[partition],
                context.incumbent,
            );
            explored = explored.saturating_add(outcome.statistics().nodes_explored);
            pruned = pruned.saturating_add(outcome.statistics().prunings());

            let reason = outcome.termination_reason().clone();
            let local = outcome.into_solutions().into_iter().next();
            if local
                .as_ref()
                .is_some_and(|s| best.as_ref().is_none_or(|b| s.total_cost() < b.total_cost()))
            {
                best = local;
            }

            match reason {
                TerminationReason::InternalInconsistency(msg) => {
                    context.stop.store(true, Ordering::Relaxed);
                    return PortfolioSolverResult::inconsistent(msg)
                        .with_node_counts(explored, pruned);
                }
                TerminationReason::Aborted(msg) => {
                    // The other workers cannot finish the tree either.
                    context.stop.store(true, Ordering::Relaxed);
                    return PortfolioSolverResult::aborted(best, msg)
                        .with_node_counts(explored, pruned);
                }
                TerminationReason::OptimalityProven | TerminationReason::InfeasibilityProven => {}
            }
        }

        PortfolioSolverResult::optimal(best).with_node_counts(explored, pruned)
    }

    fn name(&self) -> &str {
        "BnbPortfolioSolver"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        branching::nearest::NearestVenueBuilder, eval::lower_bound::TravelLowerBoundEvaluator,
        monitor::no_op::NoOperationMonitor,
    };
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use std::sync::atomic::{AtomicBool, AtomicU64};
    use tourney_model::instance::{TournamentInstance, TournamentInstanceBuilder};
    use tourney_search::{
        incumbent::SharedIncumbent, portfolio::SearchLimits, result::SolverResult,
    };

    type IntegerType = i64;

    fn random_instance(seed: u64) -> TournamentInstance<IntegerType> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut b = TournamentInstanceBuilder::new(4);
        b.set_stand_bounds(1, 3);
        for t in 0..4 {
            let row = (0..4)
                .map(|_| rng.gen_range(0..40))
                .collect::<Vec<IntegerType>>();
            b.set_row(TeamIndex::new(t), &row);
        }
        b.build().unwrap()
    }

    #[test]
    fn test_partitions_cover_first_cell() {
        let partitions = RootPartitions::for_teams(4);
        assert_eq!(partitions.len(), 6);
        let claimed = std::iter::from_fn(|| partitions.claim()).collect::<Vec<_>>();
        assert_eq!(claimed.len(), 6);
        assert_eq!(claimed[0].fixture, Fixture::home(TeamIndex::new(1)));
        assert_eq!(claimed[1].fixture, Fixture::away(TeamIndex::new(1)));
        assert!(claimed.iter().all(|p| p.team.get() == 0 && p.date.get() == 0));
        assert_eq!(partitions.claim(), None);
    }

    #[test]
    fn test_worker_matches_sequential_solve() {
        let instance = random_instance(21);
        let sequential = BnbSolver::new().solve(
            &instance,
            &mut NearestVenueBuilder::new(),
            &mut TravelLowerBoundEvaluator::new(),
            NoOperationMonitor::new(),
        );

        let partitions = RootPartitions::for_teams(4);
        let incumbent = SharedIncumbent::new();
        let stop = AtomicBool::new(false);
        let counter = AtomicU64::new(0);
        let mut worker = BnbPortfolioSolver::new(
            BnbSolver::new(),
            NearestVenueBuilder::new(),
            TravelLowerBoundEvaluator::new(),
            &partitions,
        );
        let result = worker.solve(PortfolioSolverContext::new(
            &instance,
            &incumbent,
            &stop,
            &counter,
            SearchLimits::unlimited(),
        ));

        assert_eq!(
            result.termination_reason(),
            &TerminationReason::OptimalityProven
        );
        assert!(matches!(result.result(), SolverResult::Optimal(_)));
        assert_eq!(
            incumbent.upper_bound(),
            sequential.result().solution().unwrap().total_cost()
        );
        assert!(result.nodes_explored() > 0);
    }

    #[test]
    fn test_raised_stop_flag_aborts() {
        let instance = random_instance(2);
        let partitions = RootPartitions::for_teams(4);
        let incumbent = SharedIncumbent::new();
        let stop = AtomicBool::new(true);
        let counter = AtomicU64::new(0);
        let mut worker = BnbPortfolioSolver::new(
            BnbSolver::new(),
            NearestVenueBuilder::new(),
            TravelLowerBoundEvaluator::new(),
            &partitions,
        );
        let result = worker.solve(PortfolioSolverContext::new(
            &instance,
            &incumbent,
            &stop,
            &counter,
            SearchLimits::unlimited(),
        ));
        assert_eq!(
            result.termination_reason(),
            &TerminationReason::Aborted("Interrupt signal received".to_owned())
        );
        assert!(!incumbent.has_solution());
    }
}
