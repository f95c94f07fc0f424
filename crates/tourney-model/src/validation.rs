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

//! Full validation of a complete calendar.
//!
//! `validate` re-derives every rule of a double round-robin from the calendar
//! alone and reports the first violation it encounters; `violations` keeps
//! going and collects all of them. Nothing here shares code with the search,
//! which makes the validator usable as an independent check of solver output.
//!
//! Rules, in the order they are checked:
//!
//! 1. every cell names another team (`SelfMatch`), and the opponent's cell on
//!    the same date names this team with the opposite venue (`Asymmetric`);
//! 2. every ordered (host, visitor) pair occurs exactly once
//!    (`DuplicatePairing`, `MissingPairing`);
//! 3. no team meets the same opponent on two consecutive dates
//!    (`ImmediateRepeat`), which only applies from four teams on;
//! 4. every date has as many home as away entries (`Unbalanced`);
//! 5. no window of `max_stand + 1` consecutive dates holds more than
//!    `max_stand` home or away entries of a team (`StandTooLong`);
//! 6. every stand is at least `min_stand` long (`StandTooShort`), subject to
//!    the `StreakBoundaryPolicy`.

use crate::{
    calendar::Calendar,
    fixture::Venue,
    index::{DateIndex, TeamIndex},
    instance::TournamentInstance,
};
use fixedbitset::FixedBitSet;
use num_traits::{PrimInt, Signed};
use std::ops::ControlFlow;

/// Whether the first and last stand of each team must satisfy the minimum
/// stand length.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum StreakBoundaryPolicy {
    /// Every stand, including the opening and closing one, is at least
    /// `min_stand` long.
    #[default]
    Strict,
    /// The opening and closing stand of each team may be shorter than
    /// `min_stand`.
    ExemptBoundaries,
}

impl StreakBoundaryPolicy {
    /// Returns `true` if a stand starting at `start` with `length` dates out
    /// of `num_dates` must satisfy the minimum length.
    #[inline]
    pub fn applies_to(self, start: usize, length: usize, num_dates: usize) -> bool {
        match self {
            StreakBoundaryPolicy::Strict => true,
            StreakBoundaryPolicy::ExemptBoundaries => start != 0 && start + length != num_dates,
        }
    }
}

impl std::fmt::Display for StreakBoundaryPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StreakBoundaryPolicy::Strict => write!(f, "strict"),
            StreakBoundaryPolicy::ExemptBoundaries => write!(f, "exempt"),
        }
    }
}

/// A broken calendar rule. Dates and teams are reported 1-based in
/// `Display`, matching the text format.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ConstraintViolation {
    /// The calendar was built for a different number of teams.
    ShapeMismatch {
        instance_teams: usize,
        calendar_teams: usize,
    },
    /// A team is scheduled against itself.
    SelfMatch { date: DateIndex, team: TeamIndex },
    /// The opponent's cell does not mirror this cell.
    Asymmetric {
        date: DateIndex,
        team: TeamIndex,
        opponent: TeamIndex,
    },
    /// `host` receives `visitor` more than once.
    DuplicatePairing {
        host: TeamIndex,
        visitor: TeamIndex,
        date: DateIndex,
    },
    /// `host` never receives `visitor`.
    MissingPairing { host: TeamIndex, visitor: TeamIndex },
    /// A team meets the same opponent on `date` and the date after it.
    ImmediateRepeat {
        date: DateIndex,
        team: TeamIndex,
        opponent: TeamIndex,
    },
    /// The number of home entries on `date` differs from `n / 2`.
    Unbalanced { date: DateIndex, home: usize },
    /// The window starting at `window_start` holds `count` entries of the
    /// same venue, more than `max_stand` allows.
    StandTooLong {
        team: TeamIndex,
        venue: Venue,
        window_start: DateIndex,
        count: usize,
    },
    /// A stand is shorter than `min_stand`.
    StandTooShort {
        team: TeamIndex,
        venue: Venue,
        start: DateIndex,
        length: usize,
    },
}

impl std::fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ShapeMismatch {
                instance_teams,
                calendar_teams,
            } => write!(
                f,
                "calendar has {} teams but the instance has {}",
                calendar_teams, instance_teams
            ),
            Self::SelfMatch { date, team } => write!(
                f,
                "team {} plays itself on date {}",
                team.get() + 1,
                date.get() + 1
            ),
            Self::Asymmetric {
                date,
                team,
                opponent,
            } => write!(
                f,
                "team {} meets team {} on date {} but the opponent's entry does not match",
                team.get() + 1,
                opponent.get() + 1,
                date.get() + 1
            ),
            Self::DuplicatePairing {
                host,
                visitor,
                date,
            } => write!(
                f,
                "team {} hosts team {} again on date {}",
                host.get() + 1,
                visitor.get() + 1,
                date.get() + 1
            ),
            Self::MissingPairing { host, visitor } => write!(
                f,
                "team {} never hosts team {}",
                host.get() + 1,
                visitor.get() + 1
            ),
            Self::ImmediateRepeat {
                date,
                team,
                opponent,
            } => write!(
                f,
                "team {} meets team {} on dates {} and {}",
                team.get() + 1,
                opponent.get() + 1,
                date.get() + 1,
                date.get() + 2
            ),
            Self::Unbalanced { date, home } => write!(
                f,
                "date {} has {} home entries",
                date.get() + 1,
                home
            ),
            Self::StandTooLong {
                team,
                venue,
                window_start,
                count,
            } => write!(
                f,
                "team {} plays {} {} times in the window starting at date {}",
                team.get() + 1,
                venue,
                count,
                window_start.get() + 1
            ),
            Self::StandTooShort {
                team,
                venue,
                start,
                length,
            } => write!(
                f,
                "team {} has a {} stand of length {} starting at date {}",
                team.get() + 1,
                venue,
                length,
                start.get() + 1
            ),
        }
    }
}

impl std::error::Error for ConstraintViolation {}

/// Checks all calendar rules and returns the first violation.
pub fn validate<T>(
    instance: &TournamentInstance<T>,
    calendar: &Calendar,
    policy: StreakBoundaryPolicy,
) -> Result<(), ConstraintViolation>
where
    T: PrimInt + Signed,
{
    let mut first = None;
    let _ = check(instance, calendar, policy, &mut |violation| {
        first = Some(violation);
        ControlFlow::Break(())
    });
    match first {
        Some(violation) => Err(violation),
        None => Ok(()),
    }
}

/// Checks all calendar rules and returns every violation found.
pub fn violations<T>(
    instance: &TournamentInstance<T>,
    calendar: &Calendar,
    policy: StreakBoundaryPolicy,
) -> Vec<ConstraintViolation>
where
    T: PrimInt + Signed,
{
    let mut all = Vec::new();
    let _ = check(instance, calendar, policy, &mut |violation| {
        all.push(violation);
        ControlFlow::Continue(())
    });
    all
}

fn check<T, F>(
    instance: &TournamentInstance<T>,
    calendar: &Calendar,
    policy: StreakBoundaryPolicy,
    sink: &mut F,
) -> ControlFlow<()>
where
    T: PrimInt + Signed,
    F: FnMut(ConstraintViolation) -> ControlFlow<()>,
{
    let n = instance.num_teams();
    if calendar.num_teams() != n {
        return sink(ConstraintViolation::ShapeMismatch {
            instance_teams: n,
            calendar_teams: calendar.num_teams(),
        });
    }

    check_symmetry(calendar, sink)?;
    check_completeness(calendar, sink)?;
    check_repeats(calendar, sink)?;
    check_balance(calendar, sink)?;
    check_stand_windows(instance, calendar, sink)?;
    check_minimum_stands(instance, calendar, policy, sink)
}

fn check_symmetry<F>(calendar: &Calendar, sink: &mut F) -> ControlFlow<()>
where
    F: FnMut(ConstraintViolation) -> ControlFlow<()>,
{
    for (d, row) in calendar.rows().enumerate() {
        let date = DateIndex::new(d);
        for (t, fixture) in row.iter().enumerate() {
            let team = TeamIndex::new(t);
            let opponent = fixture.opponent();
            if opponent == team {
                sink(ConstraintViolation::SelfMatch { date, team })?;
                continue;
            }
            if row[opponent.get()] != fixture.mirrored(team) {
                sink(ConstraintViolation::Asymmetric {
                    date,
                    team,
                    opponent,
                })?;
            }
        }
    }
    ControlFlow::Continue(())
}

fn check_completeness<F>(calendar: &Calendar, sink: &mut F) -> ControlFlow<()>
where
    F: FnMut(ConstraintViolation) -> ControlFlow<()>,
{
    let n = calendar.num_teams();
    let mut hosted = FixedBitSet::with_capacity(n * n);
    for (d, row) in calendar.rows().enumerate() {
        for (t, fixture) in row.iter().enumerate() {
            if !fixture.is_home() || fixture.opponent().get() == t {
                continue;
            }
            let pair = t * n + fixture.opponent().get();
            if hosted.put(pair) {
                sink(ConstraintViolation::DuplicatePairing {
                    host: TeamIndex::new(t),
                    visitor: fixture.opponent(),
                    date: DateIndex::new(d),
                })?;
            }
        }
    }
    for host in TeamIndex::range(n) {
        for visitor in TeamIndex::range(n) {
            if host != visitor && !hosted.contains(host.get() * n + visitor.get()) {
                sink(ConstraintViolation::MissingPairing { host, visitor })?;
            }
        }
    }
    ControlFlow::Continue(())
}

fn check_repeats<F>(calendar: &Calendar, sink: &mut F) -> ControlFlow<()>
where
    F: FnMut(ConstraintViolation) -> ControlFlow<()>,
{
    // With two teams the only opponent necessarily comes back.
    if calendar.num_teams() < 4 {
        return ControlFlow::Continue(());
    }
    let rows: Vec<_> = calendar.rows().collect();
    for (d, pair) in rows.windows(2).enumerate() {
        for (t, (today, tomorrow)) in pair[0].iter().zip(pair[1].iter()).enumerate() {
            if today.opponent() == tomorrow.opponent() {
                sink(ConstraintViolation::ImmediateRepeat {
                    date: DateIndex::new(d),
                    team: TeamIndex::new(t),
                    opponent: today.opponent(),
                })?;
            }
        }
    }
    ControlFlow::Continue(())
}

fn check_balance<F>(calendar: &Calendar, sink: &mut F) -> ControlFlow<()>
where
    F: FnMut(ConstraintViolation) -> ControlFlow<()>,
{
    let half = calendar.num_teams() / 2;
    for (d, row) in calendar.rows().enumerate() {
        let home = row.iter().filter(|f| f.is_home()).count();
        if home != half {
            sink(ConstraintViolation::Unbalanced {
                date: DateIndex::new(d),
                home,
            })?;
        }
    }
    ControlFlow::Continue(())
}

fn check_stand_windows<T, F>(
    instance: &TournamentInstance<T>,
    calendar: &Calendar,
    sink: &mut F,
) -> ControlFlow<()>
where
    T: PrimInt + Signed,
    F: FnMut(ConstraintViolation) -> ControlFlow<()>,
{
    let max = instance.max_stand();
    let num_dates = calendar.num_dates();
    if num_dates <= max {
        return ControlFlow::Continue(());
    }
    for team in instance.teams() {
        let venues: Vec<Venue> = calendar.team_fixtures(team).map(|f| f.venue()).collect();
        for (start, window) in venues.windows(max + 1).enumerate() {
            let home = window.iter().filter(|v| v.is_home()).count();
            let away = window.len() - home;
            for (venue, count) in [(Venue::Home, home), (Venue::Away, away)] {
                if count > max {
                    sink(ConstraintViolation::StandTooLong {
                        team,
                        venue,
                        window_start: DateIndex::new(start),
                        count,
                    })?;
                }
            }
        }
    }
    ControlFlow::Continue(())
}

fn check_minimum_stands<T, F>(
    instance: &TournamentInstance<T>,
    calendar: &Calendar,
    policy: StreakBoundaryPolicy,
    sink: &mut F,
) -> ControlFlow<()>
where
    T: PrimInt + Signed,
    F: FnMut(ConstraintViolation) -> ControlFlow<()>,
{
    let min = instance.min_stand();
    let num_dates = calendar.num_dates();
    for team in instance.teams() {
        let venues: Vec<Venue> = calendar.team_fixtures(team).map(|f| f.venue()).collect();
        for (start, length, venue) in stands(&venues) {
            if length < min && policy.applies_to(start, length, num_dates) {
                sink(ConstraintViolation::StandTooShort {
                    team,
                    venue,
                    start: DateIndex::new(start),
                    length,
                })?;
            }
        }
    }
    ControlFlow::Continue(())
}

/// Splits a venue sequence into maximal runs `(start, length, venue)`.
fn stands(venues: &[Venue]) -> Vec<(usize, usize, Venue)> {
    let mut runs = Vec::new();
    let mut start = 0;
    for i in 1..=venues.len() {
        if i == venues.len() || venues[i] != venues[start] {
            runs.push((start, i - start, venues[start]));
            start = i;
        }
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::TournamentInstanceBuilder;

    type IntegerType = i64;

    fn instance(n: usize, min: usize, max: usize) -> TournamentInstance<IntegerType> {
        let mut b = TournamentInstanceBuilder::new(n);
        b.set_stand_bounds(min, max);
        b.build().unwrap()
    }

    fn calendar(n: usize, rows: &[&[i64]]) -> Calendar {
        let rows: Vec<Vec<i64>> = rows.iter().map(|r| r.to_vec()).collect();
        Calendar::from_signed_rows(n, &rows).unwrap()
    }

    // A valid 4-team calendar with min 1, max 3.
    //        t1  t2  t3  t4
    // d1:    +2  -1  +4  -3
    // d2:    -3  +4  +1  -2
    // d3:    +4  -3  +2  -1
    // d4:    -2  +1  -4  +3
    // d5:    +3  -4  -1  +2
    // d6:    -4  +3  -2  +1
    fn four_team_calendar() -> Calendar {
        calendar(
            4,
            &[
                &[2, -1, 4, -3],
                &[-3, 4, 1, -2],
                &[4, -3, 2, -1],
                &[-2, 1, -4, 3],
                &[3, -4, -1, 2],
                &[-4, 3, -2, 1],
            ],
        )
    }

    #[test]
    fn test_valid_four_team_calendar() {
        let inst = instance(4, 1, 3);
        let cal = four_team_calendar();
        assert_eq!(
            validate(&inst, &cal, StreakBoundaryPolicy::Strict),
            Ok(())
        );
        assert!(violations(&inst, &cal, StreakBoundaryPolicy::Strict).is_empty());
    }

    #[test]
    fn test_two_team_calendar_allows_repeat() {
        let inst = instance(2, 1, 2);
        let cal = calendar(2, &[&[2, -1], &[-2, 1]]);
        assert_eq!(validate(&inst, &cal, StreakBoundaryPolicy::Strict), Ok(()));
    }

    #[test]
    fn test_shape_mismatch() {
        let inst = instance(4, 1, 3);
        let cal = calendar(2, &[&[2, -1], &[-2, 1]]);
        assert_eq!(
            validate(&inst, &cal, StreakBoundaryPolicy::Strict),
            Err(ConstraintViolation::ShapeMismatch {
                instance_teams: 4,
                calendar_teams: 2
            })
        );
    }

    #[test]
    fn test_self_match_and_asymmetry() {
        let inst = instance(2, 1, 2);
        let cal = calendar(2, &[&[1, -1], &[-2, 1]]);
        let all = violations(&inst, &cal, StreakBoundaryPolicy::Strict);
        assert_eq!(
            all[0],
            ConstraintViolation::SelfMatch {
                date: DateIndex::new(0),
                team: TeamIndex::new(0)
            }
        );
        assert!(all.contains(&ConstraintViolation::Asymmetric {
            date: DateIndex::new(0),
            team: TeamIndex::new(1),
            opponent: TeamIndex::new(0)
        }));
    }

    #[test]
    fn test_duplicate_and_missing_pairing() {
        let inst = instance(2, 1, 2);
        // Team 1 hosts team 2 twice; team 2 never hosts team 1.
        let cal = calendar(2, &[&[2, -1], &[2, -1]]);
        let all = violations(&inst, &cal, StreakBoundaryPolicy::ExemptBoundaries);
        assert!(all.contains(&ConstraintViolation::DuplicatePairing {
            host: TeamIndex::new(0),
            visitor: TeamIndex::new(1),
            date: DateIndex::new(1)
        }));
        assert!(all.contains(&ConstraintViolation::MissingPairing {
            host: TeamIndex::new(1),
            visitor: TeamIndex::new(0)
        }));
    }

    #[test]
    fn test_immediate_repeat_detected_for_four_teams() {
        let inst = instance(4, 1, 3);
        // Dates 1 and 2 pair the same teams with swapped venues.
        let cal = calendar(
            4,
            &[
                &[2, -1, 4, -3],
                &[-2, 1, -4, 3],
                &[3, 4, -1, -2],
                &[-3, -4, 1, 2],
                &[4, -3, 2, -1],
                &[-4, 3, -2, 1],
            ],
        );
        let err = validate(&inst, &cal, StreakBoundaryPolicy::Strict).unwrap_err();
        assert_eq!(
            err,
            ConstraintViolation::ImmediateRepeat {
                date: DateIndex::new(0),
                team: TeamIndex::new(0),
                opponent: TeamIndex::new(1)
            }
        );
    }

    #[test]
    fn test_stand_window_and_minimum_stand() {
        // Team 1 home on dates 1..3 then away: with max 2 the first window
        // holds three home games.
        let inst = instance(4, 1, 2);
        let cal = calendar(
            4,
            &[
                &[2, -1, 4, -3],
                &[3, 4, -1, -2],
                &[4, -3, 2, -1],
                &[-2, 1, -4, 3],
                &[-3, -4, 1, 2],
                &[-4, 3, -2, 1],
            ],
        );
        let all = violations(&inst, &cal, StreakBoundaryPolicy::Strict);
        assert!(all.contains(&ConstraintViolation::StandTooLong {
            team: TeamIndex::new(0),
            venue: Venue::Home,
            window_start: DateIndex::new(0),
            count: 3
        }));

        // With min 2 the single away date of team 3 on date 2 is too short.
        let inst = instance(4, 2, 3);
        let all = violations(&inst, &cal, StreakBoundaryPolicy::Strict);
        assert!(all.contains(&ConstraintViolation::StandTooShort {
            team: TeamIndex::new(2),
            venue: Venue::Away,
            start: DateIndex::new(1),
            length: 1
        }));
    }

    #[test]
    fn test_boundary_policy_exempts_first_and_last_stand() {
        // Two teams, min 2: each team has two stands of length 1.
        let inst = instance(2, 2, 3);
        let cal = calendar(2, &[&[2, -1], &[-2, 1]]);
        assert!(matches!(
            validate(&inst, &cal, StreakBoundaryPolicy::Strict),
            Err(ConstraintViolation::StandTooShort { .. })
        ));
        assert_eq!(
            validate(&inst, &cal, StreakBoundaryPolicy::ExemptBoundaries),
            Ok(())
        );
    }

    #[test]
    fn test_random_single_cell_corruption_is_always_caught() {
        use rand::{Rng, SeedableRng};
        use rand_chacha::ChaCha8Rng;

        let inst = instance(4, 1, 3);
        let valid = four_team_calendar();
        let mut rng = ChaCha8Rng::seed_from_u64(0x7EA4);

        for _ in 0..200 {
            let mut fixtures = valid.fixtures().to_vec();
            let cell = rng.gen_range(0..fixtures.len());
            let team = TeamIndex::new(cell % 4);
            let original = fixtures[cell];
            let replacement = loop {
                let opponent = TeamIndex::new(rng.gen_range(0..4));
                let venue = if rng.gen_bool(0.5) { Venue::Home } else { Venue::Away };
                let candidate = crate::fixture::Fixture::new(opponent, venue);
                if candidate != original && opponent != team {
                    break candidate;
                }
            };
            fixtures[cell] = replacement;
            let corrupted = Calendar::new(4, fixtures).unwrap();
            assert!(
                validate(&inst, &corrupted, StreakBoundaryPolicy::Strict).is_err(),
                "corrupting cell {} to {} went unnoticed",
                cell,
                replacement
            );
        }
    }

    #[test]
    fn test_display_is_one_based() {
        let v = ConstraintViolation::Unbalanced {
            date: DateIndex::new(0),
            home: 3,
        };
        assert_eq!(format!("{}", v), "date 1 has 3 home entries");
        assert_eq!(format!("{}", StreakBoundaryPolicy::Strict), "strict");
    }

    #[test]
    fn test_stands_split() {
        use Venue::*;
        assert_eq!(
            stands(&[Home, Home, Away, Home]),
            vec![(0, 2, Home), (2, 1, Away), (3, 1, Home)]
        );
        assert!(stands(&[]).is_empty());
    }
}
