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

//! By-value saturating arithmetic.
//!
//! `num_traits::Saturating` and the inherent `saturating_add` share a method
//! name, which makes calls on generic cost types ambiguous as soon as both are
//! in scope. These traits expose the same operation under a distinct name.

use core::ops::{Add, Sub};

macro_rules! saturating_impl_val {
    ($trait_name:ident, $method:ident, $src_method:ident, $($t:ty),*) => {
        $(
            impl $trait_name for $t {
                #[inline(always)]
                fn $method(self, v: Self) -> Self {
                    <$t>::$src_method(self, v)
                }
            }
        )*
    };
}

/// Saturating addition by value.
///
/// ```rust
/// # use tourney_core::num::SaturatingAddVal;
/// assert_eq!(250u8.saturating_add_val(10), 255);
/// assert_eq!(i64::MAX.saturating_add_val(1), i64::MAX);
/// ```
pub trait SaturatingAddVal: Sized + Add<Self, Output = Self> {
    fn saturating_add_val(self, v: Self) -> Self;
}

/// Saturating subtraction by value.
///
/// ```rust
/// # use tourney_core::num::SaturatingSubVal;
/// assert_eq!(5u8.saturating_sub_val(10), 0);
/// assert_eq!(i8::MIN.saturating_sub_val(1), i8::MIN);
/// ```
pub trait SaturatingSubVal: Sized + Sub<Self, Output = Self> {
    fn saturating_sub_val(self, v: Self) -> Self;
}

saturating_impl_val!(
    SaturatingAddVal,
    saturating_add_val,
    saturating_add,
    u8,
    u16,
    u32,
    u64,
    usize,
    i8,
    i16,
    i32,
    i64,
    isize
);

saturating_impl_val!(
    SaturatingSubVal,
    saturating_sub_val,
    saturating_sub,
    u8,
    u16,
    u32,
    u64,
    usize,
    i8,
    i16,
    i32,
    i64,
    isize
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_clamps_at_bounds() {
        assert_eq!(u64::MAX.saturating_add_val(1), u64::MAX);
        assert_eq!((-120i8).saturating_add_val(-20), i8::MIN);
        assert_eq!(3i32.saturating_add_val(4), 7);
    }

    #[test]
    fn test_sub_clamps_at_bounds() {
        assert_eq!(0usize.saturating_sub_val(1), 0);
        assert_eq!(120i8.saturating_sub_val(-20), i8::MAX);
        assert_eq!(10i64.saturating_sub_val(4), 6);
    }
}
