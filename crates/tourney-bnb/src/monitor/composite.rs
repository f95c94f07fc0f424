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

//! Runs several monitors as one.
//!
//! The solver holds a single `TreeSearchMonitor`; the solver facade stacks
//! the interrupt flag, the time and solution limits and the progress log in a
//! `CompositeTreeSearchMonitor`. Children see every event in the order they
//! were added. When asked for a command, the first child that wants to stop
//! wins and the children after it are not consulted, so its message is the
//! one reported.

use crate::{
    branching::decision::Decision,
    monitor::tree_search_monitor::{PruneReason, TreeSearchMonitor},
    state::SearchState,
    stats::BnbSolverStatistics,
};
use tourney_model::{instance::TournamentInstance, solution::Solution};
use tourney_search::{command::SearchCommand, num::SolverNumeric};

type BoxedMonitor<'a, T> = Box<dyn TreeSearchMonitor<T> + 'a>;

/// Ordered stack of monitors driven by one search.
pub struct CompositeTreeSearchMonitor<'a, T>
where
    T: SolverNumeric,
{
    children: Vec<BoxedMonitor<'a, T>>,
}

impl<T> Default for CompositeTreeSearchMonitor<'_, T>
where
    T: SolverNumeric,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> CompositeTreeSearchMonitor<'a, T>
where
    T: SolverNumeric,
{
    #[inline]
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            children: Vec::with_capacity(capacity),
        }
    }

    /// Appends `monitor`; it is consulted after every monitor added before it.
    #[inline]
    pub fn add_monitor<M>(&mut self, monitor: M)
    where
        M: TreeSearchMonitor<T> + 'a,
    {
        self.children.push(Box::new(monitor));
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.children.iter().map(|child| child.name())
    }
}

impl<T> TreeSearchMonitor<T> for CompositeTreeSearchMonitor<'_, T>
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "CompositeTreeSearchMonitor"
    }

    fn on_enter_search(
        &mut self,
        instance: &TournamentInstance<T>,
        statistics: &BnbSolverStatistics<T>,
    ) {
        self.children
            .iter_mut()
            .for_each(|child| child.on_enter_search(instance, statistics));
    }

    fn on_exit_search(&mut self, statistics: &BnbSolverStatistics<T>) {
        self.children
            .iter_mut()
            .for_each(|child| child.on_exit_search(statistics));
    }

    #[inline]
    fn search_command(
        &mut self,
        state: &SearchState<T>,
        statistics: &BnbSolverStatistics<T>,
    ) -> SearchCommand {
        self.children
            .iter_mut()
            .map(|child| child.search_command(state, statistics))
            .find(SearchCommand::is_terminate)
            .unwrap_or(SearchCommand::Continue)
    }

    #[inline]
    fn on_step(&mut self, state: &SearchState<T>, statistics: &BnbSolverStatistics<T>) {
        self.children
            .iter_mut()
            .for_each(|child| child.on_step(state, statistics));
    }

    #[inline]
    fn on_lower_bound_computed(
        &mut self,
        state: &SearchState<T>,
        lower_bound: T,
        estimated_remaining: T,
        statistics: &BnbSolverStatistics<T>,
    ) {
        for child in &mut self.children {
            child.on_lower_bound_computed(state, lower_bound, estimated_remaining, statistics);
        }
    }

    #[inline]
    fn on_prune(
        &mut self,
        state: &SearchState<T>,
        reason: PruneReason,
        statistics: &BnbSolverStatistics<T>,
    ) {
        for child in &mut self.children {
            child.on_prune(state, reason, statistics);
        }
    }

    #[inline]
    fn on_decisions_enqueued(
        &mut self,
        state: &SearchState<T>,
        count: usize,
        statistics: &BnbSolverStatistics<T>,
    ) {
        for child in &mut self.children {
            child.on_decisions_enqueued(state, count, statistics);
        }
    }

    #[inline]
    fn on_descend(
        &mut self,
        state: &SearchState<T>,
        decision: Decision<T>,
        statistics: &BnbSolverStatistics<T>,
    ) {
        for child in &mut self.children {
            child.on_descend(state, decision, statistics);
        }
    }

    #[inline]
    fn on_backtrack(&mut self, state: &SearchState<T>, statistics: &BnbSolverStatistics<T>) {
        for child in &mut self.children {
            child.on_backtrack(state, statistics);
        }
    }

    fn on_solution_found(&mut self, solution: &Solution<T>, statistics: &BnbSolverStatistics<T>) {
        for child in &mut self.children {
            child.on_solution_found(solution, statistics);
        }
    }
}

impl<T> std::fmt::Debug for CompositeTreeSearchMonitor<'_, T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl<T> std::fmt::Display for CompositeTreeSearchMonitor<'_, T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names = self.names().collect::<Vec<_>>();
        write!(f, "CompositeTreeSearchMonitor({})", names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tourney_model::instance::TournamentInstanceBuilder;

    type IntegerType = i64;

    struct Recorder<'a> {
        label: &'static str,
        stop: bool,
        log: &'a std::cell::RefCell<Vec<&'static str>>,
    }

    impl TreeSearchMonitor<IntegerType> for Recorder<'_> {
        fn name(&self) -> &str {
            self.label
        }

        fn on_enter_search(
            &mut self,
            _instance: &TournamentInstance<IntegerType>,
            _statistics: &BnbSolverStatistics<IntegerType>,
        ) {
            self.log.borrow_mut().push(self.label);
        }

        fn search_command(
            &mut self,
            _state: &SearchState<IntegerType>,
            _statistics: &BnbSolverStatistics<IntegerType>,
        ) -> SearchCommand {
            self.log.borrow_mut().push(self.label);
            if self.stop {
                SearchCommand::Terminate(self.label.to_owned())
            } else {
                SearchCommand::Continue
            }
        }
    }

    #[test]
    fn test_fan_out_and_short_circuit() {
        let log = std::cell::RefCell::new(Vec::new());
        let mut composite = CompositeTreeSearchMonitor::<IntegerType>::new();
        composite.add_monitor(Recorder {
            label: "a",
            stop: false,
            log: &log,
        });
        composite.add_monitor(Recorder {
            label: "b",
            stop: true,
            log: &log,
        });
        composite.add_monitor(Recorder {
            label: "c",
            stop: true,
            log: &log,
        });
        assert_eq!(composite.len(), 3);

        let instance = TournamentInstanceBuilder::<IntegerType>::new(2)
            .build()
            .unwrap();
        let stats = BnbSolverStatistics::default();
        composite.on_enter_search(&instance, &stats);
        assert_eq!(*log.borrow(), vec!["a", "b", "c"]);

        log.borrow_mut().clear();
        let state = SearchState::new(2);
        let cmd = composite.search_command(&state, &stats);
        assert_eq!(cmd, SearchCommand::Terminate("b".to_owned()));
        assert_eq!(*log.borrow(), vec!["a", "b"]);
        assert_eq!(
            composite.to_string(),
            "CompositeTreeSearchMonitor(a, b, c)"
        );
        assert_eq!(format!("{:?}", composite), r#"["a", "b", "c"]"#);
    }

    #[test]
    fn test_empty_composite_continues() {
        let mut composite = CompositeTreeSearchMonitor::<IntegerType>::default();
        assert!(composite.is_empty());
        let state = SearchState::new(2);
        let stats = BnbSolverStatistics::default();
        assert_eq!(
            composite.search_command(&state, &stats),
            SearchCommand::Continue
        );
    }
}
