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

//! One solve at a time.
//!
//! A `SolveGate` is a non-blocking admission flag. `try_acquire` either hands
//! out a `SolveGuard`, which reopens the gate when dropped, or fails with
//! `Busy` while another guard is alive.

use std::sync::atomic::{AtomicBool, Ordering};

/// Returned by `SolveGate::try_acquire` while a solve is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Busy;

impl std::fmt::Display for Busy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "another solve is already in progress")
    }
}

impl std::error::Error for Busy {}

#[derive(Debug, Default)]
pub struct SolveGate {
    busy: AtomicBool,
}

impl SolveGate {
    #[inline]
    pub const fn new() -> Self {
        Self {
            busy: AtomicBool::new(false),
        }
    }

    /// Takes the gate if it is open.
    #[inline]
    pub fn try_acquire(&self) -> Result<SolveGuard<'_>, Busy> {
        self.busy
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .map(|_| SolveGuard { gate: self })
            .map_err(|_| Busy)
    }

    #[inline]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Relaxed)
    }
}

/// Holds the gate closed until dropped.
#[derive(Debug)]
#[must_use = "the gate reopens as soon as the guard is dropped"]
pub struct SolveGuard<'a> {
    gate: &'a SolveGate,
}

impl Drop for SolveGuard<'_> {
    fn drop(&mut self) {
        self.gate.busy.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_is_busy() {
        let gate = SolveGate::new();
        let guard = gate.try_acquire().unwrap();
        assert!(gate.is_busy());
        assert_eq!(gate.try_acquire().unwrap_err(), Busy);
        drop(guard);
        assert!(!gate.is_busy());
        assert!(gate.try_acquire().is_ok());
    }

    #[test]
    fn test_only_one_thread_wins() {
        let gate = SolveGate::new();
        let barrier = std::sync::Barrier::new(8);
        let winners = std::sync::atomic::AtomicUsize::new(0);
        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    barrier.wait();
                    if let Ok(guard) = gate.try_acquire() {
                        winners.fetch_add(1, Ordering::Relaxed);
                        // Hold until every thread has tried.
                        barrier.wait();
                        drop(guard);
                    } else {
                        barrier.wait();
                    }
                });
            }
        });
        assert_eq!(winners.load(Ordering::Relaxed), 1);
    }
}
