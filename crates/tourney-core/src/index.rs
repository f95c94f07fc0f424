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

//! # Strongly Typed Indices
//!
//! Phantom-typed wrappers around `usize`. A calendar is addressed by a date
//! and a team at the same time, and swapping the two compiles happily when
//! both are plain integers. `TypedIndex<T>` carries a tag type that names the
//! index space and compiles down to a transparent `usize`.
//!
//! ```rust
//! use tourney_core::index::{TypedIndex, TypedIndexTag};
//!
//! #[derive(Clone, Copy)]
//! struct TeamTag;
//! impl TypedIndexTag for TeamTag { const NAME: &'static str = "TeamIndex"; }
//!
//! type TeamIndex = TypedIndex<TeamTag>;
//! let t = TeamIndex::new(3);
//! assert_eq!(t.get(), 3);
//! assert_eq!(format!("{}", t), "TeamIndex(3)");
//! ```

/// Names an index space for `Debug` and `Display`.
pub trait TypedIndexTag: Clone {
    const NAME: &'static str;
}

/// A `usize` index tagged with the index space it belongs to.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypedIndex<T> {
    index: usize,
    _marker: std::marker::PhantomData<T>,
}

impl<T> TypedIndex<T> {
    /// Creates a new index.
    #[inline(always)]
    pub const fn new(index: usize) -> Self {
        Self {
            index,
            _marker: std::marker::PhantomData,
        }
    }

    /// Returns the underlying `usize`.
    #[inline(always)]
    pub const fn get(&self) -> usize {
        self.index
    }

    #[inline(always)]
    pub const fn is_zero(&self) -> bool {
        self.index == 0
    }

    /// Returns the index one position earlier, or `None` at zero.
    #[inline]
    pub const fn checked_prev(&self) -> Option<Self> {
        match self.index.checked_sub(1) {
            Some(index) => Some(Self::new(index)),
            None => None,
        }
    }

    /// Returns the index one position later.
    #[inline]
    pub const fn next(&self) -> Self {
        Self::new(self.index + 1)
    }

    /// Iterates over all indices in `0..len`.
    #[inline]
    pub fn range(len: usize) -> impl DoubleEndedIterator<Item = Self> + ExactSizeIterator {
        (0..len).map(Self::new)
    }
}

impl<T> std::fmt::Debug for TypedIndex<T>
where
    T: TypedIndexTag,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", T::NAME, self.index)
    }
}

impl<T> std::fmt::Display for TypedIndex<T>
where
    T: TypedIndexTag,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", T::NAME, self.index)
    }
}

impl<T> From<usize> for TypedIndex<T> {
    #[inline(always)]
    fn from(index: usize) -> Self {
        Self::new(index)
    }
}

impl<T> From<TypedIndex<T>> for usize {
    #[inline(always)]
    fn from(index: TypedIndex<T>) -> Self {
        index.index
    }
}

impl<T> std::ops::Add<usize> for TypedIndex<T> {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: usize) -> Self::Output {
        Self::new(self.index + rhs)
    }
}

impl<T> std::ops::Sub<usize> for TypedIndex<T> {
    type Output = Self;

    #[inline(always)]
    fn sub(self, rhs: usize) -> Self::Output {
        Self::new(self.index - rhs)
    }
}

impl<T> std::ops::AddAssign<usize> for TypedIndex<T> {
    #[inline(always)]
    fn add_assign(&mut self, rhs: usize) {
        self.index += rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
    struct DateTag;

    impl TypedIndexTag for DateTag {
        const NAME: &'static str = "DateIndex";
    }

    type DateIndex = TypedIndex<DateTag>;

    #[test]
    fn test_new_get_and_display() {
        let d = DateIndex::new(4);
        assert_eq!(d.get(), 4);
        assert_eq!(format!("{}", d), "DateIndex(4)");
        assert_eq!(format!("{:?}", d), "DateIndex(4)");
        assert!(DateIndex::new(0).is_zero());
        assert!(!d.is_zero());
    }

    #[test]
    fn test_prev_and_next() {
        assert_eq!(DateIndex::new(0).checked_prev(), None);
        assert_eq!(DateIndex::new(3).checked_prev(), Some(DateIndex::new(2)));
        assert_eq!(DateIndex::new(3).next(), DateIndex::new(4));
    }

    #[test]
    fn test_arithmetic_with_usize() {
        let mut d = DateIndex::new(2);
        assert_eq!(d + 3, DateIndex::new(5));
        assert_eq!(d - 2, DateIndex::new(0));
        d += 1;
        assert_eq!(d.get(), 3);
    }

    #[test]
    fn test_range_and_conversions() {
        let all: Vec<usize> = DateIndex::range(3).map(usize::from).collect();
        assert_eq!(all, vec![0, 1, 2]);
        assert_eq!(DateIndex::range(3).rev().next(), Some(DateIndex::from(2)));
        assert_eq!(DateIndex::range(0).len(), 0);
    }
}
