// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Wheel-encoder tick accumulator.
//!
//! Each wheel encoder raises one edge interrupt per tick. The interrupt handlers call
//! [`EncoderAccumulator::on_left_edge`] / [`EncoderAccumulator::on_right_edge`]; the navigation
//! loop reads both counters together through [`EncoderAccumulator::snapshot`].
//!
//! Both counters live in a single critical-section cell, so a snapshot can never observe the left
//! count from before an edge and the right count from after it.
//!
//! ```ignore
//! static ENCODERS: EncoderAccumulator = EncoderAccumulator::new();
//!
//! #[interrupt]
//! fn EXTI0() {
//!     ENCODERS.on_left_edge();
//! }
//! ```

use core::cell::Cell;

use critical_section::Mutex;

/// Tick counts of both wheels at one instant.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct EncoderCounts {
    pub left: u32,
    pub right: u32,
}

impl EncoderCounts {
    pub const ZERO: Self = Self { left: 0, right: 0 };

    pub const fn new(left: u32, right: u32) -> Self {
        Self { left, right }
    }

    /// Combined travel of both wheels.
    #[inline]
    pub fn sum(&self) -> u32 {
        self.left.wrapping_add(self.right)
    }

    /// Signed divergence, positive when the left wheel is ahead.
    #[inline]
    pub fn diff(&self) -> i32 {
        self.left.wrapping_sub(self.right) as i32
    }

    /// Per-wheel ticks elapsed since `earlier`.
    #[inline]
    pub fn since(&self, earlier: EncoderCounts) -> EncoderCounts {
        EncoderCounts {
            left: self.left.wrapping_sub(earlier.left),
            right: self.right.wrapping_sub(earlier.right),
        }
    }
}

/// Anything the navigator can read wheel ticks from.
pub trait EncoderSource {
    /// Read both counters as one consistent pair.
    fn snapshot(&self) -> EncoderCounts;
}

/// Interrupt-fed tick counters for the left and right wheels.
pub struct EncoderAccumulator {
    counts: Mutex<Cell<EncoderCounts>>,
}

impl EncoderAccumulator {
    pub const fn new() -> Self {
        Self {
            counts: Mutex::new(Cell::new(EncoderCounts::ZERO)),
        }
    }

    /// Count one tick of the left wheel. Call from the left edge interrupt only.
    #[inline]
    pub fn on_left_edge(&self) {
        critical_section::with(|cs| {
            let cell = self.counts.borrow(cs);
            let mut c = cell.get();
            c.left = c.left.wrapping_add(1);
            cell.set(c);
        });
    }

    /// Count one tick of the right wheel. Call from the right edge interrupt only.
    #[inline]
    pub fn on_right_edge(&self) {
        critical_section::with(|cs| {
            let cell = self.counts.borrow(cs);
            let mut c = cell.get();
            c.right = c.right.wrapping_add(1);
            cell.set(c);
        });
    }

    /// Torn-free read of both counters.
    #[inline]
    pub fn snapshot(&self) -> EncoderCounts {
        critical_section::with(|cs| self.counts.borrow(cs).get())
    }
}

impl Default for EncoderAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl EncoderSource for EncoderAccumulator {
    #[inline]
    fn snapshot(&self) -> EncoderCounts {
        EncoderAccumulator::snapshot(self)
    }
}

impl<T: EncoderSource + ?Sized> EncoderSource for &T {
    #[inline]
    fn snapshot(&self) -> EncoderCounts {
        (**self).snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn edges_count_per_wheel() {
        let enc = EncoderAccumulator::new();
        enc.on_left_edge();
        enc.on_left_edge();
        enc.on_right_edge();
        assert_eq!(enc.snapshot(), EncoderCounts::new(2, 1));
        assert_eq!(enc.snapshot().sum(), 3);
        assert_eq!(enc.snapshot().diff(), 1);
    }

    #[test]
    fn diff_is_signed() {
        let c = EncoderCounts::new(10, 14);
        assert_eq!(c.diff(), -4);
        assert_eq!(c.since(EncoderCounts::new(4, 4)), EncoderCounts::new(6, 10));
    }

    #[test]
    fn interleaved_snapshots_account_for_every_edge() {
        let enc = EncoderAccumulator::new();
        let mut last = enc.snapshot();
        let mut seen_left = 0u32;
        let mut seen_right = 0u32;

        for i in 0..1000u32 {
            if i % 3 != 0 {
                enc.on_left_edge();
            }
            if i % 2 == 0 {
                enc.on_right_edge();
            }
            if i % 7 == 0 {
                let now = enc.snapshot();
                let d = now.since(last);
                seen_left += d.left;
                seen_right += d.right;
                last = now;
            }
        }
        let d = enc.snapshot().since(last);
        seen_left += d.left;
        seen_right += d.right;

        assert_eq!(seen_left, 666);
        assert_eq!(seen_right, 500);
    }

    #[test]
    fn concurrent_edges_are_never_lost() {
        static ENC: EncoderAccumulator = EncoderAccumulator::new();
        const EDGES: u32 = 20_000;

        thread::scope(|s| {
            s.spawn(|| {
                for _ in 0..EDGES {
                    ENC.on_left_edge();
                }
            });
            s.spawn(|| {
                for _ in 0..EDGES {
                    ENC.on_right_edge();
                }
            });
            s.spawn(|| {
                let mut prev = ENC.snapshot();
                loop {
                    let now = ENC.snapshot();
                    assert!(now.left >= prev.left && now.right >= prev.right);
                    prev = now;
                    if now.left == EDGES && now.right == EDGES {
                        break;
                    }
                }
            });
        });

        assert_eq!(ENC.snapshot(), EncoderCounts::new(EDGES, EDGES));
    }
}
