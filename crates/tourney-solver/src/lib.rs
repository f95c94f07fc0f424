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

//! # Tourney Solver
//!
//! High-level entry point for scheduling a double round-robin. This crate
//! wires the branch-and-bound engine to a configuration, runs it on one or
//! several threads, and reports the outcome or a structured error.
//!
//! ## Modules
//!
//! - `solver`: `SolverBuilder`/`SolverConfig` and the `Solver` that runs the
//!   search sequentially or over root partitions in parallel.
//! - `gate`: `SolveGate`, which admits one solve at a time.
//! - `error`: `TourneyError` and its stable `ErrorKind` codes.

pub mod error;
pub mod gate;
pub mod solver;
