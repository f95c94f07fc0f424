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

//! Evaluation utilities for travel scheduling
//!
//! Provides the incremental travel cost of a fixture and the lower bounds
//! used by the branch-and-bound solver.
//!
//! Admissibility requirement:
//! - Every `ObjectiveEvaluator` must be admissible: the estimate of the
//!   remaining cost never exceeds the cost any completion of the partial
//!   calendar actually adds. Pruning relies on this for optimality. Use
//!   `validation::is_admissible_along` to sanity-check custom evaluators on
//!   known calendars.
//!
//! Submodules:
//! - `evaluator`: the `ObjectiveEvaluator` trait.
//! - `travel`: the exact incremental travel cost, with a zero estimate.
//! - `lower_bound`: minimal incoming legs of every unplayed game.
//! - `validation`: admissibility checks by replaying a complete calendar.

pub mod evaluator;
pub mod lower_bound;
pub mod travel;
pub mod validation;
