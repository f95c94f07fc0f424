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

//! Command line front end: reads an instance file, solves it and prints the
//! calendar with its total cost.

use clap::{Parser, ValueEnum};
use std::{path::PathBuf, process::ExitCode, time::Duration};
use tourney_model::{format::render_solution, loading::InstanceLoader, validation::StreakBoundaryPolicy};
use tourney_search::{mode::SearchMode, result::SolverOutcome};
use tourney_solver::{
    error::TourneyError,
    solver::{SolverBuilder, ValueOrdering},
};

type Cost = i64;

#[derive(Parser, Debug)]
#[command(name = "tourney")]
#[command(about = "Minimum-travel double round-robin calendars", long_about = None)]
struct Args {
    /// Instance file
    file: PathBuf,

    /// Report every optimal calendar instead of one
    #[arg(long)]
    all_optimal: bool,

    /// Stop after this many seconds
    #[arg(long, value_name = "SECS", value_parser = parse_seconds)]
    time_limit: Option<Duration>,

    /// Number of search threads
    #[arg(long, value_name = "N", default_value_t = 1)]
    threads: usize,

    /// Stop after this many accepted calendars
    #[arg(long, value_name = "N")]
    solution_limit: Option<u64>,

    /// Order in which the candidates of a cell are tried
    #[arg(long, value_enum, default_value_t = OrderingArg::Nearest)]
    ordering: OrderingArg,

    /// Whether the first and last stand must respect the minimum length
    #[arg(long, value_enum, default_value_t = BoundaryArg::Strict)]
    boundary_streaks: BoundaryArg,

    /// Print search statistics to stderr
    #[arg(long)]
    stats: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OrderingArg {
    Chronological,
    Nearest,
}

impl From<OrderingArg> for ValueOrdering {
    fn from(arg: OrderingArg) -> Self {
        match arg {
            OrderingArg::Chronological => ValueOrdering::Chronological,
            OrderingArg::Nearest => ValueOrdering::Nearest,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum BoundaryArg {
    Strict,
    Exempt,
}

impl From<BoundaryArg> for StreakBoundaryPolicy {
    fn from(arg: BoundaryArg) -> Self {
        match arg {
            BoundaryArg::Strict => StreakBoundaryPolicy::Strict,
            BoundaryArg::Exempt => StreakBoundaryPolicy::ExemptBoundaries,
        }
    }
}

fn parse_seconds(text: &str) -> Result<Duration, String> {
    let seconds = text
        .parse::<f64>()
        .map_err(|e| format!("'{}' is not a number: {}", text, e))?;
    Duration::try_from_secs_f64(seconds).map_err(|e| format!("invalid duration '{}': {}", text, e))
}

fn print_solutions(outcome: &SolverOutcome<Cost>) {
    let mut solutions = outcome.solutions.iter().peekable();
    while let Some(solution) = solutions.next() {
        println!("{}", render_solution(solution));
        if solutions.peek().is_some() {
            println!();
        }
    }
}

fn report(error: &TourneyError) -> ExitCode {
    let kind = error.kind();
    eprintln!("error[{}]: {}", kind.code(), error);
    ExitCode::from(kind.exit_code())
}

fn main() -> ExitCode {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("warn"));
    let args = Args::parse();

    let instance = match InstanceLoader::<Cost>::new().from_path(&args.file) {
        Ok(instance) => instance,
        Err(e) => return report(&TourneyError::from(e)),
    };

    let mode = if args.all_optimal {
        SearchMode::AllOptimal
    } else {
        SearchMode::OptimalOnly
    };
    let mut builder = SolverBuilder::new()
        .with_mode(mode)
        .with_threads(args.threads)
        .with_ordering(args.ordering.into())
        .with_streak_policy(args.boundary_streaks.into())
        .with_progress_log(log::log_enabled!(log::Level::Info));
    if let Some(limit) = args.time_limit {
        builder = builder.with_time_limit(limit);
    }
    if let Some(limit) = args.solution_limit {
        builder = builder.with_solution_limit(limit);
    }

    let outcome = match builder.build().solve(&instance) {
        Ok(outcome) => outcome,
        Err(e) => return report(&e),
    };

    if args.stats {
        eprintln!("{}", outcome.statistics);
    }

    // A cancelled search still prints the best calendar it has seen.
    print_solutions(&outcome);
    match TourneyError::from_outcome(&outcome) {
        None => ExitCode::SUCCESS,
        Some(e) => report(&e),
    }
}
