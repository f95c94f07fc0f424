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

//! Four-team cross-check against exhaustive enumeration. Every double
//! round-robin calendar is judged by the validator and priced by the travel
//! model; the solver must report the same optimum and the same optimal set.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHashSet;
use tourney_model::{
    calendar::Calendar,
    index::TeamIndex,
    instance::{TournamentInstance, TournamentInstanceBuilder},
    travel,
    validation::{self, ConstraintViolation, StreakBoundaryPolicy},
};
use tourney_search::{mode::SearchMode, result::TerminationReason};
use tourney_solver::solver::SolverBuilder;

type IntegerType = i64;
type SignedRows = Vec<Vec<i64>>;

const NUM_TEAMS: usize = 4;
const NUM_DATES: usize = 2 * (NUM_TEAMS - 1);

/// The three perfect matchings of four teams.
const MATCHINGS: [[(usize, usize); 2]; 3] =
    [[(0, 1), (2, 3)], [(0, 2), (1, 3)], [(0, 3), (1, 2)]];

const STAND_BOUNDS: [(usize, usize); 5] = [(1, 2), (1, 3), (2, 3), (2, 4), (1, 5)];

const POLICIES: [StreakBoundaryPolicy; 2] = [
    StreakBoundaryPolicy::Strict,
    StreakBoundaryPolicy::ExemptBoundaries,
];

/// The twelve possible dates as `(home, away)` pairs: a matching and an
/// orientation for each of its two games.
fn date_options() -> Vec<[(usize, usize); 2]> {
    let mut options = Vec::with_capacity(12);
    for [(a, b), (c, d)] in MATCHINGS {
        for flip in 0..4u8 {
            let first = if flip & 1 == 0 { (a, b) } else { (b, a) };
            let second = if flip & 2 == 0 { (c, d) } else { (d, c) };
            options.push([first, second]);
        }
    }
    options
}

fn signed_row(games: &[(usize, usize); 2]) -> Vec<i64> {
    let mut row = vec![0; NUM_TEAMS];
    for &(home, away) in games {
        row[home] = away as i64 + 1;
        row[away] = -(home as i64 + 1);
    }
    row
}

/// Every sequence of six dates in which each ordered pairing occurs once.
/// Sequences repeating a pairing are cut at the first repeat.
fn all_calendars() -> Vec<Calendar> {
    fn extend(
        options: &[[(usize, usize); 2]],
        used: &mut [[bool; NUM_TEAMS]; NUM_TEAMS],
        prefix: &mut SignedRows,
        calendars: &mut Vec<Calendar>,
    ) {
        if prefix.len() == NUM_DATES {
            calendars.push(Calendar::from_signed_rows(NUM_TEAMS, prefix).unwrap());
            return;
        }
        for games in options {
            if games.iter().any(|&(home, away)| used[home][away]) {
                continue;
            }
            for &(home, away) in games {
                used[home][away] = true;
            }
            prefix.push(signed_row(games));
            extend(options, used, prefix, calendars);
            prefix.pop();
            for &(home, away) in games {
                used[home][away] = false;
            }
        }
    }

    let options = date_options();
    let mut calendars = Vec::new();
    extend(
        &options,
        &mut [[false; NUM_TEAMS]; NUM_TEAMS],
        &mut Vec::with_capacity(NUM_DATES),
        &mut calendars,
    );
    calendars
}

/// Small distances so that ties, and with them several optimal calendars,
/// are common.
fn random_instance(
    min_stand: usize,
    max_stand: usize,
    seed: u64,
) -> TournamentInstance<IntegerType> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut builder = TournamentInstanceBuilder::new(NUM_TEAMS);
    builder.set_stand_bounds(min_stand, max_stand);
    for t in 0..NUM_TEAMS {
        let row = (0..NUM_TEAMS)
            .map(|u| if u == t { 0 } else { rng.gen_range(1..4) })
            .collect::<Vec<IntegerType>>();
        builder.set_row(TeamIndex::new(t), &row);
    }
    builder.build().unwrap()
}

fn unit_instance(min_stand: usize, max_stand: usize) -> TournamentInstance<IntegerType> {
    let mut builder = TournamentInstanceBuilder::new(NUM_TEAMS);
    builder.set_stand_bounds(min_stand, max_stand);
    for t in 0..NUM_TEAMS {
        let row = (0..NUM_TEAMS)
            .map(|u| IntegerType::from(u != t))
            .collect::<Vec<_>>();
        builder.set_row(TeamIndex::new(t), &row);
    }
    builder.build().unwrap()
}

/// Cheapest cost among the valid calendars and every calendar reaching it.
fn enumerate_optimum(
    instance: &TournamentInstance<IntegerType>,
    calendars: &[Calendar],
    policy: StreakBoundaryPolicy,
) -> Option<(IntegerType, FxHashSet<SignedRows>)> {
    let mut best: Option<(IntegerType, FxHashSet<SignedRows>)> = None;
    for calendar in calendars {
        if validation::validate(instance, calendar, policy).is_err() {
            continue;
        }
        let cost = travel::total_cost(instance, calendar);
        if best.as_ref().is_none_or(|(best_cost, _)| cost < *best_cost) {
            best = Some((cost, FxHashSet::default()));
        }
        if let Some((best_cost, optimal)) = &mut best {
            if cost == *best_cost {
                optimal.insert(calendar.to_signed_rows());
            }
        }
    }
    best
}

fn assert_solver_agrees(
    instance: &TournamentInstance<IntegerType>,
    calendars: &[Calendar],
    policy: StreakBoundaryPolicy,
    threads: usize,
    label: &str,
) -> Option<IntegerType> {
    let expected = enumerate_optimum(instance, calendars, policy);
    let outcome = SolverBuilder::new()
        .with_mode(SearchMode::AllOptimal)
        .with_streak_policy(policy)
        .with_threads(threads)
        .build()
        .solve(instance)
        .unwrap();

    match expected {
        None => {
            assert!(outcome.is_infeasible(), "{}", label);
            assert_eq!(outcome.reason, TerminationReason::InfeasibilityProven, "{}", label);
            assert!(outcome.solutions.is_empty(), "{}", label);
            None
        }
        Some((cost, optimal)) => {
            assert!(outcome.is_optimal(), "{}", label);
            assert_eq!(outcome.reason, TerminationReason::OptimalityProven, "{}", label);
            assert!(
                outcome.solutions.iter().all(|s| s.total_cost() == cost),
                "{}: expected cost {}",
                label,
                cost
            );
            let found = outcome
                .solutions
                .iter()
                .map(|s| s.calendar().to_signed_rows())
                .collect::<FxHashSet<_>>();
            assert_eq!(found.len(), outcome.solutions.len(), "{}: duplicates", label);
            assert_eq!(found, optimal, "{}", label);
            Some(cost)
        }
    }
}

#[test]
fn test_enumeration_covers_every_double_round_robin() {
    // Each matching fills two dates with opposite orientations:
    // 6! / (2! 2! 2!) orders times 4^3 orientations.
    let calendars = all_calendars();
    assert_eq!(calendars.len(), 90 * 64);
    let distinct = calendars
        .iter()
        .map(Calendar::to_signed_rows)
        .collect::<FxHashSet<_>>();
    assert_eq!(distinct.len(), calendars.len());

    // With the loosest stand bounds only back-to-back meetings are rejected.
    let instance = unit_instance(1, 5);
    let mut accepted = 0;
    for calendar in &calendars {
        let found =
            validation::violations(&instance, calendar, StreakBoundaryPolicy::ExemptBoundaries);
        assert!(
            found
                .iter()
                .all(|v| matches!(v, ConstraintViolation::ImmediateRepeat { .. })),
            "{:?}",
            found
        );
        if found.is_empty() {
            accepted += 1;
        }
    }
    assert!(accepted > 0);
}

#[test]
fn test_random_instances_match_enumeration() {
    let calendars = all_calendars();
    for (min_stand, max_stand) in STAND_BOUNDS {
        for seed in 0..3 {
            let instance = random_instance(min_stand, max_stand, seed);
            for policy in POLICIES {
                for threads in [1, 3] {
                    let label = format!(
                        "stands {}..={} seed {} {} threads {}",
                        min_stand, max_stand, seed, policy, threads
                    );
                    assert_solver_agrees(&instance, &calendars, policy, threads, &label);
                }
            }
        }
    }
}

#[test]
fn test_unit_distances_match_enumeration() {
    let calendars = all_calendars();
    for (min_stand, max_stand) in STAND_BOUNDS {
        let instance = unit_instance(min_stand, max_stand);
        for policy in POLICIES {
            for threads in [1, 3] {
                let label = format!(
                    "unit stands {}..={} {} threads {}",
                    min_stand, max_stand, policy, threads
                );
                let cost = assert_solver_agrees(&instance, &calendars, policy, threads, &label);
                if (min_stand, max_stand, policy) == (1, 3, StreakBoundaryPolicy::Strict) {
                    assert_eq!(cost, Some(17));
                }
            }
        }
    }
}
