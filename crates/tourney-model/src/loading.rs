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

//! Instance loader for the double round-robin text format.
//!
//! The format is line oriented:
//!
//! ```raw
//! n          number of teams (even, positive)
//! min        minimum stand length (positive)
//! max        maximum stand length (positive, greater than min)
//! d_1_1 d_1_2 ... d_1_n
//! ...
//! d_n_1 d_n_2 ... d_n_n
//! ```
//!
//! Lines are trimmed and blank lines are skipped. A `#` starts a comment that
//! runs to the end of the line. Each of the three header lines holds exactly
//! one non-negative integer. Distance rows need at least `n` whitespace
//! separated, non-negative integers; tokens past the `n`-th are ignored, as
//! are lines after the last distance row.
//!
//! Loading stops at the first problem. Every error names the 1-based line in
//! the source and, for distance tokens, the 1-based token position on that
//! line, so a user can go straight to the offending spot.

use crate::{
    index::TeamIndex,
    instance::{InstanceError, TournamentInstance, TournamentInstanceBuilder},
};
use num_traits::{PrimInt, Signed};
use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    marker::PhantomData,
    path::Path,
    str::FromStr,
};

/// The three header values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderField {
    NumTeams,
    MinStand,
    MaxStand,
}

impl std::fmt::Display for HeaderField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HeaderField::NumTeams => write!(f, "number of teams"),
            HeaderField::MinStand => write!(f, "minimum stand length"),
            HeaderField::MaxStand => write!(f, "maximum stand length"),
        }
    }
}

/// The error type for loading an instance.
#[derive(Debug)]
pub enum ParseError {
    /// An I/O error occurred while reading the input stream.
    Io(std::io::Error),
    /// The input holds no non-blank line.
    Empty,
    /// Fewer than `3 + n` non-blank lines.
    MissingLines { expected: usize, found: usize },
    /// A header line is not a single non-negative integer.
    InvalidHeader {
        field: HeaderField,
        line: usize,
        text: String,
    },
    /// The number of teams is odd.
    OddTeamCount { line: usize, value: usize },
    /// A header value that must be positive is zero.
    NonPositive { field: HeaderField, line: usize },
    /// `min` is not smaller than `max`.
    MinNotBelowMax { line: usize, min: usize, max: usize },
    /// A distance token is not an integer.
    InvalidToken {
        line: usize,
        column: usize,
        token: String,
    },
    /// A distance token is negative.
    NegativeValue {
        line: usize,
        column: usize,
        token: String,
    },
    /// A distance row has fewer than `n` tokens.
    ShortRow {
        line: usize,
        team: TeamIndex,
        expected: usize,
        found: usize,
    },
    /// The parsed values were rejected by the instance builder.
    Instance(InstanceError),
}

impl ParseError {
    /// Returns the 1-based source line the error refers to, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::InvalidHeader { line, .. }
            | Self::OddTeamCount { line, .. }
            | Self::NonPositive { line, .. }
            | Self::MinNotBelowMax { line, .. }
            | Self::InvalidToken { line, .. }
            | Self::NegativeValue { line, .. }
            | Self::ShortRow { line, .. } => Some(*line),
            Self::Io(_) | Self::Empty | Self::MissingLines { .. } | Self::Instance(_) => None,
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Empty => write!(f, "input is empty"),
            Self::MissingLines { expected, found } => write!(
                f,
                "expected at least {} non-blank lines but found {}",
                expected, found
            ),
            Self::InvalidHeader { field, line, text } => write!(
                f,
                "line {}: {} must be a single non-negative integer, got '{}'",
                line, field, text
            ),
            Self::OddTeamCount { line, value } => write!(
                f,
                "line {}: number of teams must be even, got {}",
                line, value
            ),
            Self::NonPositive { field, line } => {
                write!(f, "line {}: {} must be positive", line, field)
            }
            Self::MinNotBelowMax { line, min, max } => write!(
                f,
                "line {}: minimum stand length {} must be smaller than maximum {}",
                line, min, max
            ),
            Self::InvalidToken {
                line,
                column,
                token,
            } => write!(
                f,
                "line {}, token {}: '{}' is not an integer",
                line, column, token
            ),
            Self::NegativeValue {
                line,
                column,
                token,
            } => write!(
                f,
                "line {}, token {}: distance {} is negative",
                line, column, token
            ),
            Self::ShortRow {
                line,
                team,
                expected,
                found,
            } => write!(
                f,
                "line {}: distance row of team {} has {} values but {} are required",
                line,
                team.get() + 1,
                found,
                expected
            ),
            Self::Instance(e) => write!(f, "invalid instance: {e}"),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Instance(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ParseError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<InstanceError> for ParseError {
    fn from(e: InstanceError) -> Self {
        Self::Instance(e)
    }
}

/// Loads `TournamentInstance`s from text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstanceLoader<T> {
    _phantom: PhantomData<T>,
}

impl<T> Default for InstanceLoader<T> {
    fn default() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<T> InstanceLoader<T>
where
    T: PrimInt + Signed + FromStr,
{
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads an instance from a type implementing `BufRead`.
    pub fn from_bufread<R: BufRead>(&self, rdr: R) -> Result<TournamentInstance<T>, ParseError> {
        let lines = SourceLines::read(rdr)?;
        if lines.is_empty() {
            return Err(ParseError::Empty);
        }

        let num_teams = lines.header(0, HeaderField::NumTeams)?;
        let expected = num_teams.saturating_add(3);
        if lines.len() < expected {
            return Err(ParseError::MissingLines {
                expected,
                found: lines.len(),
            });
        }
        let min_stand = lines.header(1, HeaderField::MinStand)?;
        let max_stand = lines.header(2, HeaderField::MaxStand)?;

        if num_teams == 0 {
            return Err(ParseError::NonPositive {
                field: HeaderField::NumTeams,
                line: lines.number(0),
            });
        }
        if num_teams % 2 != 0 {
            return Err(ParseError::OddTeamCount {
                line: lines.number(0),
                value: num_teams,
            });
        }
        if min_stand == 0 {
            return Err(ParseError::NonPositive {
                field: HeaderField::MinStand,
                line: lines.number(1),
            });
        }
        if max_stand == 0 {
            return Err(ParseError::NonPositive {
                field: HeaderField::MaxStand,
                line: lines.number(2),
            });
        }
        if min_stand >= max_stand {
            return Err(ParseError::MinNotBelowMax {
                line: lines.number(2),
                min: min_stand,
                max: max_stand,
            });
        }

        let mut builder = TournamentInstanceBuilder::new(num_teams);
        builder.set_stand_bounds(min_stand, max_stand);

        let mut row = Vec::with_capacity(num_teams);
        for team in TeamIndex::range(num_teams) {
            let index = 3 + team.get();
            let line = lines.number(index);
            row.clear();

            for (position, token) in lines.text(index).split_whitespace().take(num_teams).enumerate() {
                let column = position + 1;
                let value: T = token.parse().map_err(|_| ParseError::InvalidToken {
                    line,
                    column,
                    token: token.to_owned(),
                })?;
                if value.is_negative() {
                    return Err(ParseError::NegativeValue {
                        line,
                        column,
                        token: token.to_owned(),
                    });
                }
                row.push(value);
            }

            if row.len() < num_teams {
                return Err(ParseError::ShortRow {
                    line,
                    team,
                    expected: num_teams,
                    found: row.len(),
                });
            }
            builder.set_row(team, &row);
        }

        Ok(builder.build()?)
    }

    /// Loads an instance from a file path.
    #[inline]
    pub fn from_path<P: AsRef<Path>>(&self, path: P) -> Result<TournamentInstance<T>, ParseError> {
        let file = File::open(path)?;
        self.from_bufread(BufReader::new(file))
    }

    /// Loads an instance from a generic reader.
    #[inline]
    pub fn from_reader<R: Read>(&self, r: R) -> Result<TournamentInstance<T>, ParseError> {
        self.from_bufread(BufReader::new(r))
    }

    /// Loads an instance from a string slice.
    #[inline]
    pub fn from_str(&self, s: &str) -> Result<TournamentInstance<T>, ParseError> {
        self.from_reader(s.as_bytes())
    }
}

/// The non-blank lines of the input with comments removed, together with
/// their 1-based line numbers in the source.
struct SourceLines {
    lines: Vec<(usize, String)>,
}

impl SourceLines {
    fn read<R: BufRead>(rdr: R) -> Result<Self, ParseError> {
        let mut lines = Vec::new();
        for (index, line) in rdr.lines().enumerate() {
            let line = line?;
            let content = match line.find('#') {
                Some(pos) => &line[..pos],
                None => line.as_str(),
            };
            let content = content.trim();
            if !content.is_empty() {
                lines.push((index + 1, content.to_owned()));
            }
        }
        Ok(Self { lines })
    }

    #[inline]
    fn len(&self) -> usize {
        self.lines.len()
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[inline]
    fn number(&self, index: usize) -> usize {
        self.lines[index].0
    }

    #[inline]
    fn text(&self, index: usize) -> &str {
        &self.lines[index].1
    }

    /// Parses the header line at `index` as a single non-negative integer.
    fn header(&self, index: usize, field: HeaderField) -> Result<usize, ParseError> {
        let text = self.text(index);
        let invalid = || ParseError::InvalidHeader {
            field,
            line: self.number(index),
            text: text.to_owned(),
        };

        let mut tokens = text.split_whitespace();
        let value = tokens.next().ok_or_else(invalid)?;
        if tokens.next().is_some() {
            return Err(invalid());
        }
        value.parse::<usize>().map_err(|_| invalid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type IntegerType = i64;

    fn load(s: &str) -> Result<TournamentInstance<IntegerType>, ParseError> {
        InstanceLoader::new().from_str(s)
    }

    const SMALL_INSTANCE: &str = r#"
        4           # teams
        1           # min stand
        3           # max stand
        0 1 2 3
        1 0 4 5

        2 4 0 6     extra tokens are ignored
        3 5 6 0
    "#;

    #[test]
    fn test_loads_small_instance() {
        let inst = load(SMALL_INSTANCE).expect("failed to load");
        assert_eq!(inst.num_teams(), 4);
        assert_eq!(inst.min_stand(), 1);
        assert_eq!(inst.max_stand(), 3);
        assert_eq!(inst.distance(TeamIndex::new(1), TeamIndex::new(3)), 5);
        assert_eq!(inst.row(TeamIndex::new(2)), &[2, 4, 0, 6]);
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(load(""), Err(ParseError::Empty)));
        assert!(matches!(load("  \n # only a comment\n"), Err(ParseError::Empty)));
    }

    #[test]
    fn test_missing_lines() {
        assert!(matches!(
            load("4\n1\n0"),
            Err(ParseError::MissingLines {
                expected: 7,
                found: 3
            })
        ));
    }

    #[test]
    fn test_zero_max_is_rejected() {
        let err = load("4\n1\n0\n0 1 1 1\n1 0 1 1\n1 1 0 1\n1 1 1 0").unwrap_err();
        assert!(matches!(
            err,
            ParseError::NonPositive {
                field: HeaderField::MaxStand,
                line: 3
            }
        ));
        assert_eq!(err.line(), Some(3));
    }

    #[test]
    fn test_invalid_header() {
        let err = load("four\n1\n2\n0 0\n0 0").unwrap_err();
        assert!(matches!(
            err,
            ParseError::InvalidHeader {
                field: HeaderField::NumTeams,
                line: 1,
                ..
            }
        ));
        assert!(matches!(
            load("2\n-1\n2\n0 0\n0 0"),
            Err(ParseError::InvalidHeader {
                field: HeaderField::MinStand,
                ..
            })
        ));
        assert!(matches!(
            load("2\n1 2\n3\n0 0\n0 0"),
            Err(ParseError::InvalidHeader {
                field: HeaderField::MinStand,
                ..
            })
        ));
    }

    #[test]
    fn test_header_constraints() {
        assert!(matches!(
            load("3\n1\n2\n0 0 0\n0 0 0\n0 0 0"),
            Err(ParseError::OddTeamCount { line: 1, value: 3 })
        ));
        assert!(matches!(
            load("0\n1\n2"),
            Err(ParseError::NonPositive {
                field: HeaderField::NumTeams,
                ..
            })
        ));
        assert!(matches!(
            load("2\n0\n2\n0 0\n0 0"),
            Err(ParseError::NonPositive {
                field: HeaderField::MinStand,
                ..
            })
        ));
        assert!(matches!(
            load("2\n2\n2\n0 0\n0 0"),
            Err(ParseError::MinNotBelowMax { min: 2, max: 2, .. })
        ));
    }

    #[test]
    fn test_row_errors_carry_position() {
        let err = load("2\n1\n2\n0 x\n0 0").unwrap_err();
        match err {
            ParseError::InvalidToken {
                line,
                column,
                token,
            } => {
                assert_eq!((line, column), (4, 2));
                assert_eq!(token, "x");
            }
            other => panic!("expected InvalidToken, got {other:?}"),
        }

        assert!(matches!(
            load("2\n1\n2\n0 1\n-3 0"),
            Err(ParseError::NegativeValue {
                line: 5,
                column: 1,
                ..
            })
        ));

        let err = load("2\n1\n2\n0 1\n\n\n7").unwrap_err();
        assert!(matches!(
            err,
            ParseError::ShortRow {
                line: 7,
                expected: 2,
                found: 1,
                ..
            }
        ));
        assert!(format!("{}", err).contains("team 2"));
    }

    #[test]
    fn test_from_reader_and_missing_path() {
        let inst = InstanceLoader::<IntegerType>::new()
            .from_reader("2\n1\n2\n1 2\n3 4\n".as_bytes())
            .unwrap();
        assert_eq!(inst.distance(TeamIndex::new(1), TeamIndex::new(0)), 3);

        let err = InstanceLoader::<IntegerType>::new()
            .from_path("/definitely/not/here.txt")
            .unwrap_err();
        assert!(matches!(err, ParseError::Io(_)));
    }
}
