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

//! # Tournament Solver
//!
//! Configures and runs the branch-and-bound search for one instance.
//!
//! ## Execution
//!
//! - With one thread the whole tree is searched by a single `BnbSolver`.
//! - With more threads the tree is split at its first cell into
//!   `RootPartitions`, and scoped `BnbPortfolioSolver` workers claim
//!   partitions until none are left. Workers share the incumbent, the stop
//!   flag and the solution counter, nothing else.
//!
//! Every search observes the same limits: an optional wall-clock deadline,
//! an optional solution limit and the interrupt flag raised by
//! `Solver::interrupt`. All of them are checked at date boundaries only.
//!
//! ## Outcome
//!
//! Worker results are merged into a single `SolverOutcome`. Any internal
//! inconsistency wins, then the first abort reason; otherwise the tree was
//! exhausted and the incumbent holds the optimum (or nothing, in which case
//! the instance is infeasible).
//!
//! ## Usage
//!
//! ```rust
//! use tourney_model::instance::TournamentInstanceBuilder;
//! use tourney_solver::solver::SolverBuilder;
//!
//! let mut builder = TournamentInstanceBuilder::<i64>::new(2);
//! builder.set_stand_bounds(1, 2);
//! let instance = builder.build().unwrap();
//!
//! let solver = SolverBuilder::new().with_threads(1).build();
//! let outcome = solver.solve(&instance).unwrap();
//! assert!(outcome.is_optimal());
//! ```

use crate::{error::TourneyError, gate::SolveGate};
use std::{
    sync::atomic::{AtomicBool, AtomicU64, Ordering},
    time::{Duration, Instant},
};
use tourney_bnb::{
    bnb::BnbSolver,
    branching::{chronological::ChronologicalBuilder, nearest::NearestVenueBuilder},
    eval::lower_bound::TravelLowerBoundEvaluator,
    monitor::{
        composite::CompositeTreeSearchMonitor, interrupt::InterruptMonitor,
        log::LogTreeSearchMonitor, solution_limit::SolutionLimitMonitor,
        time_limit::TimeLimitMonitor,
    },
    portfolio::{BnbPortfolioSolver, RootPartitions},
};
use tourney_model::{instance::TournamentInstance, validation::StreakBoundaryPolicy};
use tourney_search::{
    incumbent::SharedIncumbent,
    mode::SearchMode,
    num::SolverNumeric,
    portfolio::{PortfolioSolver, PortfolioSolverContext, PortfolioSolverResult, SearchLimits},
    result::{SolverOutcome, TerminationReason},
    stats::{SolverStatistics, SolverStatisticsBuilder},
};

/// Order in which the candidates of a cell are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ValueOrdering {
    /// Opponents by index, home before away.
    Chronological,
    /// Cheapest incremental travel first.
    #[default]
    Nearest,
}

impl std::fmt::Display for ValueOrdering {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueOrdering::Chronological => write!(f, "chronological"),
            ValueOrdering::Nearest => write!(f, "nearest"),
        }
    }
}

/// Settings of a `Solver`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverConfig {
    pub mode: SearchMode,
    pub time_limit: Option<Duration>,
    /// Number of worker threads, at least one.
    pub threads: usize,
    pub solution_limit: Option<u64>,
    pub ordering: ValueOrdering,
    pub streak_policy: StreakBoundaryPolicy,
    /// Attach a `LogTreeSearchMonitor` to every search.
    pub progress_log: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            mode: SearchMode::default(),
            time_limit: None,
            threads: 1,
            solution_limit: None,
            ordering: ValueOrdering::default(),
            streak_policy: StreakBoundaryPolicy::default(),
            progress_log: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SolverBuilder {
    config: SolverConfig,
}

impl SolverBuilder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_mode(mut self, mode: SearchMode) -> Self {
        self.config.mode = mode;
        self
    }

    #[inline]
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.config.time_limit = Some(limit);
        self
    }

    /// Zero is treated as one.
    #[inline]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.config.threads = threads.max(1);
        self
    }

    #[inline]
    pub fn with_solution_limit(mut self, limit: u64) -> Self {
        self.config.solution_limit = Some(limit);
        self
    }

    #[inline]
    pub fn with_ordering(mut self, ordering: ValueOrdering) -> Self {
        self.config.ordering = ordering;
        self
    }

    #[inline]
    pub fn with_streak_policy(mut self, policy: StreakBoundaryPolicy) -> Self {
        self.config.streak_policy = policy;
        self
    }

    #[inline]
    pub fn with_progress_log(mut self, enabled: bool) -> Self {
        self.config.progress_log = enabled;
        self
    }

    #[inline]
    pub fn build(self) -> Solver {
        Solver::with_config(self.config)
    }
}

/// Runs searches with a fixed configuration, one at a time.
///
/// `Solver` is `Sync`: one thread may call `solve` while another calls
/// `interrupt`. A second concurrent `solve` fails with `TourneyError::Busy`.
#[derive(Debug)]
pub struct Solver {
    config: SolverConfig,
    gate: SolveGate,
    stop: AtomicBool,
}

/// Lowers the stop flag when the solve holding it returns or unwinds.
struct LowerOnDrop<'a>(&'a AtomicBool);

impl Drop for LowerOnDrop<'_> {
    #[inline]
    fn drop(&mut self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

impl Default for Solver {
    fn default() -> Self {
        Self::with_config(SolverConfig::default())
    }
}

impl Solver {
    #[inline]
    pub fn with_config(mut config: SolverConfig) -> Self {
        config.threads = config.threads.max(1);
        Self {
            config,
            gate: SolveGate::new(),
            stop: AtomicBool::new(false),
        }
    }

    #[inline]
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    #[inline]
    pub fn gate(&self) -> &SolveGate {
        &self.gate
    }

    /// Asks the running solve to stop at its next date boundary.
    ///
    /// The request stays raised until a solve finishes. Calling this before
    /// `solve` makes that solve abort at its first date boundary, and the
    /// flag is lowered again when it returns.
    #[inline]
    pub fn interrupt(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    /// Searches `instance` for an optimal calendar.
    ///
    /// The only error is `TourneyError::Busy`. Infeasible, cancelled and
    /// inconsistent searches are reported through the outcome, see
    /// `TourneyError::from_outcome`.
    pub fn solve<T>(&self, instance: &TournamentInstance<T>) -> Result<SolverOutcome<T>, TourneyError>
    where
        T: SolverNumeric,
    {
        let _guard = self.gate.try_acquire()?;
        // Dropped before `_guard`, so the flag is down once the gate reopens.
        let _lower_stop = LowerOnDrop(&self.stop);

        let start_time = Instant::now();
        let limits = SearchLimits {
            deadline: self
                .config
                .time_limit
                .and_then(|limit| start_time.checked_add(limit)),
            solution_limit: self.config.solution_limit,
        };
        let incumbent = SharedIncumbent::new();
        let solutions_found = AtomicU64::new(0);

        log::info!(
            "solving {} teams (mode: {}, ordering: {}, streaks: {}, threads: {})",
            instance.num_teams(),
            self.config.mode,
            self.config.ordering,
            self.config.streak_policy,
            self.config.threads
        );

        let (results, used_threads) = if self.config.threads == 1 {
            let result = self.run_sequential(instance, &incumbent, &solutions_found, limits);
            (vec![result], 1)
        } else {
            self.run_partitioned(instance, &incumbent, &solutions_found, limits)
        };

        let statistics = Self::build_statistics(
            &results,
            solutions_found.load(Ordering::Relaxed),
            used_threads,
            start_time.elapsed(),
        );
        let outcome = SolverOutcome::from_solutions(
            incumbent.into_solutions(),
            Self::merge_reason(&results),
            statistics,
        );

        log::info!("{}", outcome);
        Ok(outcome)
    }

    fn run_sequential<T>(
        &self,
        instance: &TournamentInstance<T>,
        incumbent: &SharedIncumbent<T>,
        solutions_found: &AtomicU64,
        limits: SearchLimits,
    ) -> PortfolioSolverResult<T>
    where
        T: SolverNumeric,
    {
        let num_teams = instance.num_teams();
        let mut solver = BnbSolver::preallocated(num_teams)
            .with_mode(self.config.mode)
            .with_streak_policy(self.config.streak_policy);
        let mut evaluator = TravelLowerBoundEvaluator::new();
        let monitor = self.build_monitor(solutions_found, limits);

        let outcome = match self.config.ordering {
            ValueOrdering::Chronological => solver.solve_with_incumbent(
                instance,
                &mut ChronologicalBuilder::new(),
                &mut evaluator,
                monitor,
                incumbent,
            ),
            ValueOrdering::Nearest => solver.solve_with_incumbent(
                instance,
                &mut NearestVenueBuilder::preallocated(num_teams),
                &mut evaluator,
                monitor,
                incumbent,
            ),
        };
        log::debug!("{}", outcome.statistics());
        outcome.into()
    }

    fn run_partitioned<T>(
        &self,
        instance: &TournamentInstance<T>,
        incumbent: &SharedIncumbent<T>,
        solutions_found: &AtomicU64,
        limits: SearchLimits,
    ) -> (Vec<PortfolioSolverResult<T>>, usize)
    where
        T: SolverNumeric,
    {
        let partitions = RootPartitions::for_teams(instance.num_teams());
        let num_workers = self.config.threads.min(partitions.len()).max(1);
        let stop = &self.stop;

        let results = std::thread::scope(|scope| {
            let handles = (0..num_workers)
                .map(|_| {
                    let mut worker = self.build_worker(instance.num_teams(), &partitions);
                    scope.spawn(move || {
                        let context = PortfolioSolverContext::new(
                            instance,
                            incumbent,
                            stop,
                            solutions_found,
                            limits,
                        );
                        worker.solve(context)
                    })
                })
                .collect::<Vec<_>>();

            handles
                .into_iter()
                .map(|handle| {
                    handle.join().unwrap_or_else(|_| {
                        stop.store(true, Ordering::Relaxed);
                        PortfolioSolverResult::inconsistent("worker thread panicked")
                    })
                })
                .collect::<Vec<_>>()
        });

        (results, num_workers)
    }

    fn build_worker<'p, T>(
        &self,
        num_teams: usize,
        partitions: &'p RootPartitions,
    ) -> Box<dyn PortfolioSolver<T> + 'p>
    where
        T: SolverNumeric,
    {
        let inner = BnbSolver::preallocated(num_teams)
            .with_mode(self.config.mode)
            .with_streak_policy(self.config.streak_policy);
        let evaluator = TravelLowerBoundEvaluator::new();
        match self.config.ordering {
            ValueOrdering::Chronological => Box::new(
                BnbPortfolioSolver::new(inner, ChronologicalBuilder::new(), evaluator, partitions)
                    .with_progress_log(self.config.progress_log),
            ),
            ValueOrdering::Nearest => Box::new(
                BnbPortfolioSolver::new(
                    inner,
                    NearestVenueBuilder::preallocated(num_teams),
                    evaluator,
                    partitions,
                )
                .with_progress_log(self.config.progress_log),
            ),
        }
    }

    fn build_monitor<'a, T>(
        &'a self,
        solutions_found: &'a AtomicU64,
        limits: SearchLimits,
    ) -> CompositeTreeSearchMonitor<'a, T>
    where
        T: SolverNumeric,
    {
        let mut monitor = CompositeTreeSearchMonitor::with_capacity(4);
        monitor.add_monitor(InterruptMonitor::new(&self.stop));
        if let Some(deadline) = limits.deadline {
            monitor.add_monitor(TimeLimitMonitor::with_deadline(deadline));
        }
        monitor.add_monitor(SolutionLimitMonitor::new(
            solutions_found,
            limits.solution_limit.unwrap_or(u64::MAX),
        ));
        if self.config.progress_log {
            monitor.add_monitor(LogTreeSearchMonitor::default());
        }
        monitor
    }

    fn merge_reason<T>(results: &[PortfolioSolverResult<T>]) -> TerminationReason
    where
        T: SolverNumeric,
    {
        let inconsistency = results.iter().find_map(|r| match r.termination_reason() {
            TerminationReason::InternalInconsistency(msg) => Some(msg.clone()),
            _ => None,
        });
        if let Some(msg) = inconsistency {
            return TerminationReason::InternalInconsistency(msg);
        }

        let abort = results.iter().find_map(|r| match r.termination_reason() {
            TerminationReason::Aborted(msg) => Some(msg.clone()),
            _ => None,
        });
        match abort {
            Some(msg) => TerminationReason::Aborted(msg),
            None => TerminationReason::OptimalityProven,
        }
    }

    fn build_statistics<T>(
        results: &[PortfolioSolverResult<T>],
        solutions_found: u64,
        used_threads: usize,
        solve_duration: Duration,
    ) -> SolverStatistics
    where
        T: SolverNumeric,
    {
        let nodes_explored = results
            .iter()
            .fold(0u64, |acc, r| acc.saturating_add(r.nodes_explored()));
        let nodes_pruned = results
            .iter()
            .fold(0u64, |acc, r| acc.saturating_add(r.nodes_pruned()));
        SolverStatisticsBuilder::new()
            .solutions_found(solutions_found)
            .used_threads(used_threads)
            .nodes_explored(nodes_explored)
            .nodes_pruned(nodes_pruned)
            .solve_duration(solve_duration)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use tourney_model::{
        index::TeamIndex, instance::TournamentInstanceBuilder, travel, validation,
    };
    use tourney_search::result::SolverResult;

    type IntegerType = i64;

    fn random_instance(num_teams: usize, seed: u64) -> TournamentInstance<IntegerType> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut builder = TournamentInstanceBuilder::new(num_teams);
        builder.set_stand_bounds(1, 3);
        for t in 0..num_teams {
            let row = (0..num_teams)
                .map(|u| if u == t { 0 } else { rng.gen_range(1..50) })
                .collect::<Vec<IntegerType>>();
            builder.set_row(TeamIndex::new(t), &row);
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_builder_sets_config() {
        let solver = SolverBuilder::new()
            .with_mode(SearchMode::AllOptimal)
            .with_time_limit(Duration::from_secs(3))
            .with_threads(0)
            .with_solution_limit(7)
            .with_ordering(ValueOrdering::Chronological)
            .with_streak_policy(StreakBoundaryPolicy::ExemptBoundaries)
            .build();
        let config = solver.config();
        assert_eq!(config.mode, SearchMode::AllOptimal);
        assert_eq!(config.time_limit, Some(Duration::from_secs(3)));
        assert_eq!(config.threads, 1);
        assert_eq!(config.solution_limit, Some(7));
        assert_eq!(config.ordering, ValueOrdering::Chronological);
        assert_eq!(config.streak_policy, StreakBoundaryPolicy::ExemptBoundaries);
        assert!(!config.progress_log);
    }

    #[test]
    fn test_sequential_solution_is_valid() {
        let instance = random_instance(4, 5);
        let outcome = SolverBuilder::new().build().solve(&instance).unwrap();
        assert!(outcome.is_optimal());
        assert_eq!(outcome.reason, TerminationReason::OptimalityProven);

        let solution = outcome.solution().unwrap();
        assert!(
            validation::validate(&instance, solution.calendar(), StreakBoundaryPolicy::Strict)
                .is_ok()
        );
        assert_eq!(
            travel::total_cost(&instance, solution.calendar()),
            solution.total_cost()
        );
        assert_eq!(outcome.statistics.used_threads, 1);
        assert!(outcome.statistics.nodes_explored > 0);
        assert!(outcome.statistics.solutions_found >= 1);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        for seed in 0..3 {
            let instance = random_instance(4, seed);
            let sequential = SolverBuilder::new().build().solve(&instance).unwrap();
            let parallel = SolverBuilder::new()
                .with_threads(3)
                .build()
                .solve(&instance)
                .unwrap();
            assert!(parallel.is_optimal());
            assert_eq!(parallel.statistics.used_threads, 3);
            assert_eq!(
                sequential.solution().unwrap().total_cost(),
                parallel.solution().unwrap().total_cost()
            );
        }
    }

    #[test]
    fn test_orderings_agree() {
        let instance = random_instance(4, 11);
        let nearest = SolverBuilder::new()
            .with_ordering(ValueOrdering::Nearest)
            .build()
            .solve(&instance)
            .unwrap();
        let chronological = SolverBuilder::new()
            .with_ordering(ValueOrdering::Chronological)
            .build()
            .solve(&instance)
            .unwrap();
        assert_eq!(
            nearest.solution().unwrap().total_cost(),
            chronological.solution().unwrap().total_cost()
        );
    }

    #[test]
    fn test_infeasible_instance() {
        let mut builder = TournamentInstanceBuilder::<IntegerType>::new(2);
        builder.set_stand_bounds(5, 6);
        let instance = builder.build().unwrap();

        for threads in [1, 2] {
            let outcome = SolverBuilder::new()
                .with_threads(threads)
                .build()
                .solve(&instance)
                .unwrap();
            assert!(outcome.is_infeasible());
            assert_eq!(outcome.reason, TerminationReason::InfeasibilityProven);
            assert_eq!(
                TourneyError::from_outcome(&outcome).map(|e| e.kind()),
                Some(ErrorKind::Infeasible)
            );
        }
    }

    #[test]
    fn test_all_optimal_collects_ties() {
        let mut builder = TournamentInstanceBuilder::<IntegerType>::new(2);
        builder.set_stand_bounds(1, 2);
        builder.set_row(TeamIndex::new(0), &[1, 10]);
        builder.set_row(TeamIndex::new(1), &[20, 2]);
        let instance = builder.build().unwrap();

        let outcome = SolverBuilder::new()
            .with_mode(SearchMode::AllOptimal)
            .with_threads(2)
            .build()
            .solve(&instance)
            .unwrap();
        assert!(outcome.is_optimal());
        assert_eq!(outcome.solutions.len(), 2);
        assert!(outcome.solutions.iter().all(|s| s.total_cost() == 63));
        assert_ne!(
            outcome.solutions[0].calendar(),
            outcome.solutions[1].calendar()
        );
    }

    #[test]
    fn test_solution_limit_cancels() {
        let instance = random_instance(4, 3);
        let outcome = SolverBuilder::new()
            .with_ordering(ValueOrdering::Chronological)
            .with_solution_limit(1)
            .build()
            .solve(&instance)
            .unwrap();
        assert!(matches!(
            outcome.reason,
            TerminationReason::Aborted(_) | TerminationReason::OptimalityProven
        ));
        assert!(outcome.has_solution());
        assert!(outcome.statistics.solutions_found >= 1);
    }

    #[test]
    fn test_zero_time_limit_is_cancelled() {
        let instance = random_instance(4, 8);
        let outcome = SolverBuilder::new()
            .with_time_limit(Duration::ZERO)
            .build()
            .solve(&instance)
            .unwrap();
        assert_eq!(
            outcome.reason,
            TerminationReason::Aborted("time limit exceeded".to_owned())
        );
        assert!(matches!(outcome.result, SolverResult::Unknown));
        assert_eq!(
            TourneyError::from_outcome(&outcome).map(|e| e.kind()),
            Some(ErrorKind::Cancelled)
        );
    }

    #[test]
    fn test_busy_while_gate_is_held() {
        let instance = random_instance(4, 1);
        let solver = SolverBuilder::new().build();
        let guard = solver.gate().try_acquire().unwrap();
        let error = solver.solve(&instance).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Busy);
        drop(guard);
        assert!(solver.solve(&instance).is_ok());
    }

    #[test]
    fn test_interrupt_before_solve_aborts_that_solve() {
        for threads in [1, 3] {
            let instance = random_instance(4, 4);
            let solver = SolverBuilder::new().with_threads(threads).build();
            solver.interrupt();

            let interrupted = solver.solve(&instance).unwrap();
            assert_eq!(
                interrupted.reason,
                TerminationReason::Aborted("Interrupt signal received".to_owned()),
                "threads {}",
                threads
            );
            assert!(!interrupted.is_optimal());
            assert_eq!(
                TourneyError::from_outcome(&interrupted).map(|e| e.kind()),
                Some(ErrorKind::Cancelled)
            );

            // The finished solve lowered the flag.
            let next = solver.solve(&instance).unwrap();
            assert!(next.is_optimal(), "threads {}", threads);
        }
    }

    #[test]
    fn test_interrupt_from_other_thread_is_not_lost() {
        let instance = random_instance(4, 5);
        let solver = SolverBuilder::new().build();
        std::thread::scope(|scope| {
            scope.spawn(|| solver.interrupt()).join().unwrap();
        });
        let outcome = solver.solve(&instance).unwrap();
        assert!(matches!(outcome.reason, TerminationReason::Aborted(_)));
        assert!(solver.solve(&instance).unwrap().is_optimal());
    }

    #[test]
    fn test_busy_solve_keeps_pending_interrupt() {
        let instance = random_instance(4, 6);
        let solver = SolverBuilder::new().build();
        let guard = solver.gate().try_acquire().unwrap();
        solver.interrupt();
        assert_eq!(solver.solve(&instance).unwrap_err().kind(), ErrorKind::Busy);
        drop(guard);

        let outcome = solver.solve(&instance).unwrap();
        assert!(matches!(outcome.reason, TerminationReason::Aborted(_)));
    }
}
