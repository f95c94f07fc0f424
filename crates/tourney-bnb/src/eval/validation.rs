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

//! Admissibility checks for objective evaluators. A calendar known to be
//! complete is replayed cell by cell in the order the solver fills it; after
//! every step the evaluator's lower bound must stay at or below the true
//! total cost of the calendar, and the accumulated fixture prices must end
//! exactly at that total. A violation means the evaluator would prune the
//! branch leading to this calendar, which can cost optimality.
//!
//! These routines are meant for diagnostics during development and tests;
//! they only prove the property along the replayed calendar.

use crate::{eval::evaluator::ObjectiveEvaluator, state::SearchState};
use tourney_model::{calendar::Calendar, instance::TournamentInstance, travel::total_cost};
use tourney_search::num::SolverNumeric;

/// The first point at which an evaluator failed along a calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissibilityFailure<T> {
    /// The lower bound after `assigned_cells` cells exceeds the total.
    Overestimate {
        assigned_cells: usize,
        bound: T,
        total: T,
    },
    /// The estimate claims the state cannot be completed.
    Infeasible { assigned_cells: usize },
    /// The fixture prices do not add up to the total.
    PriceMismatch { accumulated: T, total: T },
    /// The calendar could not be replayed on this instance.
    Replay,
}

/// Replays `calendar` and reports the first admissibility failure of
/// `evaluator`, if any.
pub fn check_admissible_along<T, E>(
    evaluator: &mut E,
    instance: &TournamentInstance<T>,
    calendar: &Calendar,
) -> Result<(), AdmissibilityFailure<T>>
where
    T: SolverNumeric,
    E: ObjectiveEvaluator<T>,
{
    if calendar.num_teams() != instance.num_teams() {
        return Err(AdmissibilityFailure::Replay);
    }

    evaluator.prepare(instance);
    let total = total_cost(instance, calendar);
    let mut state = SearchState::<T>::new(instance.num_teams());

    loop {
        let assigned_cells = state.num_assigned_cells();
        let bound = evaluator
            .lower_bound(instance, &state)
            .ok_or(AdmissibilityFailure::Infeasible { assigned_cells })?;
        if bound > total {
            return Err(AdmissibilityFailure::Overestimate {
                assigned_cells,
                bound,
                total,
            });
        }

        let Some((date, team)) = state.next_cell() else {
            break;
        };
        let fixture = calendar.fixture(date, team);
        let delta = evaluator.evaluate_fixture(instance, &state, date, team, fixture);
        let cost = state.current_cost().saturating_add_val(delta);
        state
            .assign(date, team, fixture)
            .map_err(|_| AdmissibilityFailure::Replay)?;
        state.set_current_cost(cost);
    }

    if state.current_cost() != total {
        return Err(AdmissibilityFailure::PriceMismatch {
            accumulated: state.current_cost(),
            total,
        });
    }
    Ok(())
}

/// Returns `true` if `evaluator` stays admissible and exact along `calendar`.
#[inline]
pub fn is_admissible_along<T, E>(
    evaluator: &mut E,
    instance: &TournamentInstance<T>,
    calendar: &Calendar,
) -> bool
where
    T: SolverNumeric,
    E: ObjectiveEvaluator<T>,
{
    check_admissible_along(evaluator, instance, calendar).is_ok()
}
