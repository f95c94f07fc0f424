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

//! # Tourney Branch-and-Bound
//!
//! The exact search engine for double round-robin calendars. Cells are
//! filled date by date, and within a date for the lowest team not yet paired.
//! Every trial commits the symmetric cell of the opponent at the same time.
//!
//! ## Modules
//!
//! * **`bnb`**: `BnbSolver` and its search session loop.
//! * **`state`**: the mutable `SearchState` of a single solve.
//! * **`trail`**: undo log that restores the state on backtrack.
//! * **`stack`**: frame-structured stack of pending decisions.
//! * **`constraints`**: the incremental feasibility check.
//! * **`fixed`**: fixtures pinned before the search starts.
//! * **`branching`**: decisions and the builders that order them.
//! * **`eval`**: objective evaluators (incremental cost and lower bounds).
//! * **`monitor`**: observers that log progress or stop the search.
//! * **`incumbent`**: local or shared storage of the best known cost.
//! * **`portfolio`**: the parallel worker that searches root partitions.
//! * **`result`** / **`stats`**: the outcome of a solve.

pub mod bnb;
pub mod branching;
pub mod constraints;
pub mod eval;
pub mod fixed;
pub mod incumbent;
pub mod monitor;
pub mod portfolio;
pub mod result;
pub mod stack;
pub mod state;
pub mod stats;
pub mod trail;
