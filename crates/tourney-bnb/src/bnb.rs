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

//! Branch-and-bound solver for double round-robin calendars.
//!
//! `BnbSolver` is a stateful search engine that fills the calendar cell by
//! cell, date by date, and prunes every branch whose bound cannot beat the
//! incumbent. It keeps its trail and decision stack between solves so that
//! repeated solves do not reallocate, and accepts fixed fixtures and a shared
//! incumbent for parallel use.
//!
//! A search session object encapsulates per-run state, statistics and
//! timing. Every leaf is re-validated against the full calendar rules and
//! re-priced from scratch; any disagreement with the incremental bookkeeping
//! ends the search with `TerminationReason::InternalInconsistency` instead of
//! reporting a wrong calendar.

use crate::{
    branching::decision::{Decision, DecisionBuilder},
    constraints::ConstraintSet,
    eval::evaluator::ObjectiveEvaluator,
    fixed::FixedFixture,
    incumbent::{IncumbentStore, NoSharedIncumbent, SharedIncumbentAdapter},
    monitor::tree_search_monitor::{PruneReason, TreeSearchMonitor},
    result::BnbSolverOutcome,
    stack::SearchStack,
    state::{SearchInconsistency, SearchState},
    stats::BnbSolverStatistics,
    trail::SearchTrail,
};
use tourney_model::{
    instance::TournamentInstance, solution::Solution, travel, validation,
    validation::StreakBoundaryPolicy,
};
use tourney_search::{
    command::SearchCommand, incumbent::SharedIncumbent, mode::SearchMode, num::SolverNumeric,
    result::TerminationReason,
};

/// A depth-first branch-and-bound solver for the travel scheduling problem.
///
/// This is only the execution engine: the order in which candidates are
/// tried is up to a `DecisionBuilder`, and the pricing of fixtures and the
/// bound are up to an `ObjectiveEvaluator`.
#[derive(Clone, Debug)]
pub struct BnbSolver<T> {
    trail: SearchTrail<T>,
    stack: SearchStack<T>,
    mode: SearchMode,
    policy: StreakBoundaryPolicy,
}

impl<T> Default for BnbSolver<T>
where
    T: SolverNumeric,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> BnbSolver<T>
where
    T: SolverNumeric,
{
    /// Creates a solver in optimal-only mode with the strict stand policy.
    #[inline]
    pub fn new() -> Self {
        Self {
            trail: SearchTrail::new(),
            stack: SearchStack::new(),
            mode: SearchMode::default(),
            policy: StreakBoundaryPolicy::default(),
        }
    }

    /// Creates a solver with storage preallocated for `num_teams` teams.
    ///
    /// # Note
    ///
    /// Every solve ensures sufficient capacity anyway; preallocating only
    /// moves the allocations to construction time.
    #[inline]
    pub fn preallocated(num_teams: usize) -> Self {
        Self {
            trail: SearchTrail::preallocated(num_teams),
            stack: SearchStack::preallocated(num_teams),
            mode: SearchMode::default(),
            policy: StreakBoundaryPolicy::default(),
        }
    }

    #[inline]
    pub fn with_mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }

    #[inline]
    pub fn with_streak_policy(mut self, policy: StreakBoundaryPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[inline]
    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    #[inline]
    pub fn streak_policy(&self) -> StreakBoundaryPolicy {
        self.policy
    }

    /// Solves `instance` on its own, without a shared incumbent.
    #[inline]
    pub fn solve<B, E, S>(
        &mut self,
        instance: &TournamentInstance<T>,
        builder: &mut B,
        evaluator: &mut E,
        monitor: S,
    ) -> BnbSolverOutcome<T>
    where
        B: DecisionBuilder<T, E>,
        E: ObjectiveEvaluator<T>,
        S: TreeSearchMonitor<T>,
    {
        let backing = NoSharedIncumbent::new();
        self.solve_internal(instance, &[], builder, evaluator, monitor, backing)
    }

    /// Solves `instance`, pruning against and publishing to `incumbent`.
    #[inline]
    pub fn solve_with_incumbent<B, E, S>(
        &mut self,
        instance: &TournamentInstance<T>,
        builder: &mut B,
        evaluator: &mut E,
        monitor: S,
        incumbent: &SharedIncumbent<T>,
    ) -> BnbSolverOutcome<T>
    where
        B: DecisionBuilder<T, E>,
        E: ObjectiveEvaluator<T>,
        S: TreeSearchMonitor<T>,
    {
        let backing = SharedIncumbentAdapter::new(incumbent);
        self.solve_internal(instance, &[], builder, evaluator, monitor, backing)
    }

    /// Solves `instance` restricted to calendars containing every fixture
    /// in `fixed`.
    #[inline]
    pub fn solve_with_fixed<B, E, S>(
        &mut self,
        instance: &TournamentInstance<T>,
        builder: &mut B,
        evaluator: &mut E,
        monitor: S,
        fixed: &[FixedFixture],
    ) -> BnbSolverOutcome<T>
    where
        B: DecisionBuilder<T, E>,
        E: ObjectiveEvaluator<T>,
        S: TreeSearchMonitor<T>,
    {
        let backing = NoSharedIncumbent::new();
        self.solve_internal(instance, fixed, builder, evaluator, monitor, backing)
    }

    /// Solves `instance` restricted to calendars containing every fixture
    /// in `fixed`, sharing bounds and solutions through `incumbent`.
    #[inline]
    pub fn solve_with_fixed_and_incumbent<B, E, S>(
        &mut self,
        instance: &TournamentInstance<T>,
        builder: &mut B,
        evaluator: &mut E,
        monitor: S,
        fixed: &[FixedFixture],
        incumbent: &SharedIncumbent<T>,
    ) -> BnbSolverOutcome<T>
    where
        B: DecisionBuilder<T, E>,
        E: ObjectiveEvaluator<T>,
        S: TreeSearchMonitor<T>,
    {
        let backing = SharedIncumbentAdapter::new(incumbent);
        self.solve_internal(instance, fixed, builder, evaluator, monitor, backing)
    }

    #[inline(always)]
    fn solve_internal<B, E, S, I>(
        &mut self,
        instance: &TournamentInstance<T>,
        fixed: &[FixedFixture],
        builder: &mut B,
        evaluator: &mut E,
        mut monitor: S,
        backing: I,
    ) -> BnbSolverOutcome<T>
    where
        B: DecisionBuilder<T, E>,
        E: ObjectiveEvaluator<T>,
        S: TreeSearchMonitor<T>,
        I: IncumbentStore<T>,
    {
        let session = BnbSolverSearchSession::new(
            self,
            instance,
            fixed,
            builder,
            evaluator,
            &mut monitor,
            backing,
        );
        let res = session.run();
        self.reset();
        res
    }

    /// Clears the trail and the stack, keeping their allocations.
    #[inline]
    fn reset(&mut self) {
        self.trail.reset();
        self.stack.reset();
    }
}

impl<T> std::fmt::Display for BnbSolver<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BnbSolver(mode: {}, streak_policy: {})",
            self.mode, self.policy
        )
    }
}

/// The state and logic of a single search run.
struct BnbSolverSearchSession<'a, T, B, E, S, I>
where
    T: SolverNumeric,
    I: IncumbentStore<T>,
{
    solver: &'a mut BnbSolver<T>,
    instance: &'a TournamentInstance<T>,
    fixed: &'a [FixedFixture],
    builder: &'a mut B,
    evaluator: &'a mut E,
    monitor: &'a mut S,
    incumbent: I,
    constraints: ConstraintSet,
    state: SearchState<T>,
    best_cost: T,
    solutions: Vec<Solution<T>>,
    stats: BnbSolverStatistics<T>,
    start_time: std::time::Instant,
}

impl<T, B, E, S, I> std::fmt::Debug for BnbSolverSearchSession<'_, T, B, E, S, I>
where
    T: SolverNumeric,
    I: IncumbentStore<T>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchSession")
            .field("state", &self.state)
            .field("best_cost", &self.best_cost)
            .field("solutions", &self.solutions.len())
            .field("stats", &self.stats)
            .finish()
    }
}

impl<'a, T, B, E, S, I> BnbSolverSearchSession<'a, T, B, E, S, I>
where
    T: SolverNumeric,
    B: DecisionBuilder<T, E>,
    E: ObjectiveEvaluator<T>,
    S: TreeSearchMonitor<T>,
    I: IncumbentStore<T>,
{
    #[inline]
    fn new(
        solver: &'a mut BnbSolver<T>,
        instance: &'a TournamentInstance<T>,
        fixed: &'a [FixedFixture],
        builder: &'a mut B,
        evaluator: &'a mut E,
        monitor: &'a mut S,
        incumbent: I,
    ) -> Self {
        let best_cost = incumbent.initial_upper_bound();
        let constraints = ConstraintSet::new(instance, solver.policy);

        Self {
            solver,
            instance,
            fixed,
            builder,
            evaluator,
            monitor,
            incumbent,
            constraints,
            state: SearchState::new(instance.num_teams()),
            best_cost,
            solutions: Vec::new(),
            stats: BnbSolverStatistics::default(),
            start_time: std::time::Instant::now(),
        }
    }

    fn run(mut self) -> BnbSolverOutcome<T> {
        self.monitor.on_enter_search(self.instance, &self.stats);
        log::debug!(
            "{} started with {} and {} ({} fixed fixtures)",
            self.solver,
            self.builder.name(),
            self.evaluator.name(),
            self.fixed.len()
        );

        let termination_reason = match self.initialize() {
            Ok(true) => self.search(),
            Ok(false) => TerminationReason::InfeasibilityProven,
            Err(e) => TerminationReason::InternalInconsistency(e.to_string()),
        };

        self.stats.set_total_time(self.start_time.elapsed());
        self.monitor.on_exit_search(&self.stats);
        log::debug!(
            "search finished: {} after {} nodes, {} solutions kept",
            termination_reason,
            self.stats.nodes_explored,
            self.solutions.len()
        );
        self.finalize_result(termination_reason)
    }

    /// The main loop. Returns once the tree is exhausted, a monitor asks to
    /// stop, or the bookkeeping is found inconsistent.
    fn search(&mut self) -> TerminationReason {
        loop {
            self.best_cost = self.incumbent.tighten(self.best_cost);
            self.monitor.on_step(&self.state, &self.stats);
            self.stats.on_step();

            // Only stop between dates.
            if self.state.is_at_date_boundary() {
                if let SearchCommand::Terminate(msg) =
                    self.monitor.search_command(&self.state, &self.stats)
                {
                    return TerminationReason::Aborted(msg);
                }
            }

            if self.solver.stack.is_current_level_empty() {
                if self.solver.stack.depth() <= 1 {
                    return if self.solutions.is_empty() {
                        TerminationReason::InfeasibilityProven
                    } else {
                        TerminationReason::OptimalityProven
                    };
                }
                self.backtrack_step();
                continue;
            }

            if let Err(e) = self.process_next_decision() {
                return TerminationReason::InternalInconsistency(e.to_string());
            }
        }
    }

    fn finalize_result(self, reason: TerminationReason) -> BnbSolverOutcome<T> {
        match reason {
            TerminationReason::OptimalityProven => {
                BnbSolverOutcome::optimal(self.solutions, self.stats)
            }
            TerminationReason::InfeasibilityProven => BnbSolverOutcome::infeasible(self.stats),
            TerminationReason::Aborted(msg) => {
                BnbSolverOutcome::aborted(self.solutions, msg, self.stats)
            }
            TerminationReason::InternalInconsistency(msg) => {
                BnbSolverOutcome::inconsistent(msg, self.stats)
            }
        }
    }

    /// Pins the fixed fixtures, pushes the root frame and enqueues the root
    /// decisions. Returns `Ok(false)` if the root is already infeasible.
    fn initialize(&mut self) -> Result<bool, SearchInconsistency> {
        let n = self.instance.num_teams();
        self.solver.trail.ensure_capacity(n);
        self.solver.stack.ensure_capacity(n);
        self.evaluator.prepare(self.instance);

        for fixed in self.fixed {
            if let Err(rejection) = self.constraints.pin(fixed) {
                log::debug!("cannot pin {}: {}", fixed, rejection);
                return Ok(false);
            }
        }

        // Root frame. Must exist before any decision is pushed.
        self.solver.trail.push_frame();
        self.solver.stack.push_frame();
        self.stats.on_node_explored();

        let Some(estimate) = self
            .evaluator
            .estimate_remaining_cost(self.instance, &self.state)
        else {
            self.stats.on_pruning_infeasible();
            self.monitor
                .on_prune(&self.state, PruneReason::Infeasible, &self.stats);
            return Ok(false);
        };
        let root_bound = self.state.current_cost().saturating_add_val(estimate);
        self.stats.set_root_lower_bound(root_bound);
        self.monitor
            .on_lower_bound_computed(&self.state, root_bound, estimate, &self.stats);

        self.enqueue_decisions();
        Ok(true)
    }

    #[inline]
    fn backtrack_step(&mut self) {
        self.stats.on_backtrack();
        self.monitor.on_backtrack(&self.state, &self.stats);

        self.solver.trail.backtrack(&mut self.state);
        self.solver.stack.pop_frame();
    }

    #[inline(always)]
    fn process_next_decision(&mut self) -> Result<(), SearchInconsistency> {
        let Some(decision) = self.solver.stack.pop() else {
            return Ok(());
        };
        self.stats.on_decision_generated();

        let new_cost = self
            .state
            .current_cost()
            .saturating_add_val(decision.cost_delta());
        if self.solver.mode.is_dominated(new_cost, self.best_cost) {
            self.stats.on_pruning_bound();
            self.monitor
                .on_prune(&self.state, PruneReason::BoundDominated, &self.stats);
            return Ok(());
        }

        self.descend(decision, new_cost)
    }

    /// Applies `decision` in a new frame and expands the resulting node.
    fn descend(&mut self, decision: Decision<T>, new_cost: T) -> Result<(), SearchInconsistency> {
        let date = decision.date();
        self.solver.trail.push_frame();
        if let Err(e) = self.solver.trail.apply_assignment(
            &mut self.state,
            date,
            decision.team(),
            decision.fixture(),
            new_cost,
        ) {
            self.solver.trail.backtrack(&mut self.state);
            return Err(e);
        }
        self.solver.stack.push_frame();

        self.stats.on_node_explored();
        self.stats.on_depth_update(self.solver.stack.depth() as u64);
        self.monitor.on_descend(&self.state, decision, &self.stats);

        if self.state.is_date_complete(date) {
            self.stats.on_date_completed();
            let home = self.state.home_count(date);
            if 2 * home != self.instance.num_teams() {
                return Err(SearchInconsistency::Unbalanced { date, home });
            }
        }

        if self.state.is_complete() {
            return self.handle_complete_solution();
        }

        self.expand();
        Ok(())
    }

    /// Bounds the current node and, unless it is pruned, enqueues its
    /// children. A pruned node keeps an empty frame, which the main loop
    /// backtracks on its next step.
    fn expand(&mut self) {
        let Some(estimate) = self
            .evaluator
            .estimate_remaining_cost(self.instance, &self.state)
        else {
            self.stats.on_pruning_infeasible();
            self.monitor
                .on_prune(&self.state, PruneReason::Infeasible, &self.stats);
            return;
        };

        let node_lower_bound = self.state.current_cost().saturating_add_val(estimate);
        self.monitor
            .on_lower_bound_computed(&self.state, node_lower_bound, estimate, &self.stats);

        if self.solver.mode.is_dominated(node_lower_bound, self.best_cost) {
            self.stats.on_pruning_bound();
            self.monitor
                .on_prune(&self.state, PruneReason::BoundDominated, &self.stats);
            return;
        }

        self.enqueue_decisions();
    }

    #[inline]
    fn enqueue_decisions(&mut self) {
        let decisions = self.builder.next_decision(
            self.evaluator,
            self.instance,
            &self.constraints,
            &self.state,
        );
        let added = self.solver.stack.extend_ordered(decisions);

        if added == 0 {
            self.stats.on_pruning_infeasible();
            self.monitor
                .on_prune(&self.state, PruneReason::Infeasible, &self.stats);
        }
        self.monitor
            .on_decisions_enqueued(&self.state, added, &self.stats);
    }

    /// Checks the complete calendar independently and records it.
    fn handle_complete_solution(&mut self) -> Result<(), SearchInconsistency> {
        let calendar = self
            .state
            .to_calendar()
            .ok_or(SearchInconsistency::IncompleteLeaf)?;
        validation::validate(self.instance, &calendar, self.solver.policy)
            .map_err(SearchInconsistency::InvalidLeaf)?;

        let accumulated = self.state.current_cost();
        let recomputed = travel::total_cost(self.instance, &calendar);
        if accumulated != recomputed {
            return Err(SearchInconsistency::CostMismatch {
                accumulated: accumulated.into(),
                recomputed: recomputed.into(),
            });
        }

        if self.solver.mode.is_dominated(accumulated, self.best_cost) {
            self.stats.on_pruning_bound();
            self.monitor
                .on_prune(&self.state, PruneReason::BoundDominated, &self.stats);
            return Ok(());
        }

        if self
            .solutions
            .first()
            .is_some_and(|best| best.total_cost() > accumulated)
        {
            self.solutions.clear();
        }
        self.best_cost = self.best_cost.min(accumulated);

        let solution = Solution::new(accumulated, calendar);
        self.incumbent
            .on_solution_found(&solution, self.solver.mode.keeps_ties());
        self.stats.on_solution_found();
        self.monitor.on_solution_found(&solution, &self.stats);
        log::debug!(
            "solution with cost {} after {} nodes",
            accumulated,
            self.stats.nodes_explored
        );
        self.solutions.push(solution);
        Ok(())
    }
}
