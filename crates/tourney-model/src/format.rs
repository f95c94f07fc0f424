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

//! Text output of calendars and solutions, and the matching reader.
//!
//! A calendar is written as a bracketed array with one row per date, every
//! cell followed by a comma:
//!
//! ```raw
//! [| 2, -1,
//! | -2, 1,
//! |]
//! ```
//!
//! A solution adds a header and the total cost:
//!
//! ```raw
//! calendar:
//! [| 2, -1,
//! | -2, 1,
//! |]
//!
//! total cost: 63
//! ```
//!
//! `SolutionReader` parses exactly this layout back, so rendering and reading
//! reconstructs the identical calendar and cost.

use crate::{
    calendar::{Calendar, CalendarError},
    solution::Solution,
};
use num_traits::{PrimInt, Signed};
use std::{fmt::Write, marker::PhantomData, str::FromStr};

const CALENDAR_HEADER: &str = "calendar:";
const COST_HEADER: &str = "total cost:";

/// `Display` adapter rendering a calendar as a bracketed array.
#[derive(Clone, Copy, Debug)]
pub struct CalendarText<'a> {
    calendar: &'a Calendar,
}

impl<'a> CalendarText<'a> {
    #[inline]
    pub fn new(calendar: &'a Calendar) -> Self {
        Self { calendar }
    }
}

impl std::fmt::Display for CalendarText<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_char('[')?;
        for row in self.calendar.rows() {
            f.write_char('|')?;
            for fixture in row {
                write!(f, " {},", fixture.to_signed())?;
            }
            f.write_char('\n')?;
        }
        f.write_str("|]")
    }
}

/// `Display` adapter rendering a solution with its header and total cost.
#[derive(Clone, Copy, Debug)]
pub struct SolutionText<'a, T> {
    solution: &'a Solution<T>,
}

impl<'a, T> SolutionText<'a, T> {
    #[inline]
    pub fn new(solution: &'a Solution<T>) -> Self {
        Self { solution }
    }
}

impl<T> std::fmt::Display for SolutionText<'_, T>
where
    T: PrimInt + Signed + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", CALENDAR_HEADER)?;
        writeln!(f, "{}", CalendarText::new(self.solution.calendar()))?;
        writeln!(f)?;
        write!(f, "{} {}", COST_HEADER, self.solution.total_cost())
    }
}

/// Renders a calendar as a bracketed array.
#[inline]
pub fn render_calendar(calendar: &Calendar) -> String {
    CalendarText::new(calendar).to_string()
}

/// Renders a solution with its header and total cost.
#[inline]
pub fn render_solution<T>(solution: &Solution<T>) -> String
where
    T: PrimInt + Signed + std::fmt::Display,
{
    SolutionText::new(solution).to_string()
}

/// Errors raised while reading rendered output back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// No `calendar:` line.
    MissingCalendarHeader,
    /// The array does not start with `[`.
    MissingArrayStart { line: usize },
    /// The input ends before the closing `|]`.
    UnterminatedArray,
    /// A row does not start with `|`.
    MalformedRow { line: usize },
    /// A cell is not an integer.
    InvalidCell { line: usize, token: String },
    /// No `total cost:` line after the array.
    MissingCost,
    /// The total cost is not an integer.
    InvalidCost { line: usize, text: String },
    /// The rows do not form a calendar.
    Calendar(CalendarError),
}

impl std::fmt::Display for FormatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingCalendarHeader => write!(f, "missing '{}' line", CALENDAR_HEADER),
            Self::MissingArrayStart { line } => write!(f, "line {}: expected '['", line),
            Self::UnterminatedArray => write!(f, "calendar array is not closed by '|]'"),
            Self::MalformedRow { line } => write!(f, "line {}: row must start with '|'", line),
            Self::InvalidCell { line, token } => {
                write!(f, "line {}: '{}' is not an integer", line, token)
            }
            Self::MissingCost => write!(f, "missing '{}' line", COST_HEADER),
            Self::InvalidCost { line, text } => {
                write!(f, "line {}: '{}' is not a valid total cost", line, text)
            }
            Self::Calendar(e) => write!(f, "invalid calendar: {e}"),
        }
    }
}

impl std::error::Error for FormatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Calendar(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CalendarError> for FormatError {
    fn from(e: CalendarError) -> Self {
        Self::Calendar(e)
    }
}

/// Reads calendars and solutions in the rendered layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolutionReader<T> {
    _phantom: PhantomData<T>,
}

impl<T> SolutionReader<T>
where
    T: PrimInt + Signed + FromStr,
{
    #[inline]
    pub fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }

    /// Parses a rendered solution.
    pub fn parse(&self, text: &str) -> Result<Solution<T>, FormatError> {
        let mut lines = text.lines().enumerate().map(|(i, l)| (i + 1, l.trim()));

        lines
            .by_ref()
            .find(|(_, l)| *l == CALENDAR_HEADER)
            .ok_or(FormatError::MissingCalendarHeader)?;

        let calendar = read_array(&mut lines)?;

        let (line, rest) = lines
            .find_map(|(i, l)| l.strip_prefix(COST_HEADER).map(|rest| (i, rest.trim())))
            .ok_or(FormatError::MissingCost)?;
        let total_cost = rest.parse::<T>().map_err(|_| FormatError::InvalidCost {
            line,
            text: rest.to_owned(),
        })?;

        Ok(Solution::new(total_cost, calendar))
    }

    /// Parses a bare rendered calendar.
    pub fn parse_calendar(&self, text: &str) -> Result<Calendar, FormatError> {
        let mut lines = text.lines().enumerate().map(|(i, l)| (i + 1, l.trim()));
        read_array(&mut lines)
    }
}

/// Reads the bracketed array from `lines`, skipping blank lines before it.
fn read_array<'a, I>(lines: &mut I) -> Result<Calendar, FormatError>
where
    I: Iterator<Item = (usize, &'a str)>,
{
    let (first_line, first) = lines
        .find(|(_, l)| !l.is_empty())
        .ok_or(FormatError::UnterminatedArray)?;
    let mut current = first
        .strip_prefix('[')
        .ok_or(FormatError::MissingArrayStart { line: first_line })?;
    let mut line = first_line;

    let mut rows: Vec<Vec<i64>> = Vec::new();
    loop {
        if current == "|]" {
            break;
        }
        let body = current
            .strip_prefix('|')
            .ok_or(FormatError::MalformedRow { line })?;
        let row = body
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(|token| {
                token.parse::<i64>().map_err(|_| FormatError::InvalidCell {
                    line,
                    token: token.to_owned(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(row);

        let (next_line, next) = lines.next().ok_or(FormatError::UnterminatedArray)?;
        line = next_line;
        current = next;
    }

    let num_teams = rows.first().map_or(0, Vec::len);
    Ok(Calendar::from_signed_rows(num_teams, &rows)?)
}
