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

//! # Solver Numeric Trait
//!
//! Collects the integer capabilities the search needs from a cost type into a
//! single bound: primitive signed arithmetic, lossless conversion to `i64`
//! for the atomic incumbent bound, by-value saturating arithmetic from
//! `tourney_core`, and thread safety for parallel workers.

use std::{hash::Hash, str::FromStr};
use tourney_core::num::{SaturatingAddVal, SaturatingSubVal};
use num_traits::{FromPrimitive, PrimInt, Signed};

/// Numeric types usable as travel costs. In practice these are `i8`, `i16`,
/// `i32` and `i64`.
pub trait SolverNumeric:
    PrimInt
    + Signed
    + FromPrimitive
    + Into<i64>
    + TryFrom<i64>
    + FromStr
    + Hash
    + std::fmt::Debug
    + std::fmt::Display
    + SaturatingAddVal
    + SaturatingSubVal
    + Send
    + Sync
    + 'static
{
}

impl<T> SolverNumeric for T where
    T: PrimInt
        + Signed
        + FromPrimitive
        + Into<i64>
        + TryFrom<i64>
        + FromStr
        + Hash
        + std::fmt::Debug
        + std::fmt::Display
        + SaturatingAddVal
        + SaturatingSubVal
        + Send
        + Sync
        + 'static
{
}
