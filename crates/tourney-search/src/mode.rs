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

/// Which solutions a search reports.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum SearchMode {
    /// Stop improving once a single optimal calendar is proven.
    #[default]
    OptimalOnly,
    /// Report every calendar of minimal cost.
    AllOptimal,
}

impl SearchMode {
    /// Returns `true` if a node with lower bound `bound` cannot lead to a
    /// reportable solution given the best known cost `best`.
    #[inline(always)]
    pub fn is_dominated<T: PartialOrd>(self, bound: T, best: T) -> bool {
        match self {
            SearchMode::OptimalOnly => bound >= best,
            SearchMode::AllOptimal => bound > best,
        }
    }

    #[inline(always)]
    pub fn keeps_ties(self) -> bool {
        matches!(self, SearchMode::AllOptimal)
    }
}

impl std::fmt::Display for SearchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchMode::OptimalOnly => write!(f, "optimal-only"),
            SearchMode::AllOptimal => write!(f, "all-optimal"),
        }
    }
}
