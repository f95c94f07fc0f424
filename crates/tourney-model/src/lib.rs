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

//! # Tourney Model
//!
//! The domain model of a double round-robin with travel costs. `n` teams
//! meet every other team twice, once at each venue, over `2(n - 1)` dates.
//! Consecutive home or away games (stands) are bounded by a minimum and a
//! maximum length, and the goal is to minimize the total distance travelled.
//!
//! ## Modules
//!
//! * **`index`**: typed `TeamIndex` and `DateIndex`.
//! * **`instance`**: the immutable `TournamentInstance` and its builder.
//! * **`fixture`**: one calendar cell, with the signed 1-based encoding.
//! * **`calendar`**: the `dates × teams` matrix of fixtures.
//! * **`solution`**: a calendar together with its total cost.
//! * **`travel`**: the cost rule, per leg, per team and in total.
//! * **`validation`**: an independent check of all calendar rules.
//! * **`loading`**: the text instance loader.
//! * **`format`**: text rendering of calendars and solutions, and its reader.

pub mod calendar;
pub mod fixture;
pub mod format;
pub mod index;
pub mod instance;
pub mod loading;
pub mod solution;
pub mod travel;
pub mod validation;
