// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Proportional drift correction for straight driving.
//!
//! Works in `no_std` and does not allocate memory.

/// Throttle pair for the left and right wheels.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Correction {
    pub left: u8,
    pub right: u8,
}

/// P controller on the wheel divergence `left - right`.
///
/// Holds the last divergence it acted on, so a steady divergence produces exactly one correction.
pub struct Differential {
    /// Throttle steps per tick of divergence
    gain: i32,

    /// Output clamp
    low: u8,
    high: u8,

    /// Divergence the current throttle pair was computed for
    applied: i32,
}

impl Differential {
    /// Create a controller driving at `high`, never commanding below `low`.
    pub fn new(gain: i32, low: u8, high: u8) -> Self {
        Self {
            gain,
            low: low.min(high),
            high,
            applied: 0,
        }
    }

    /// Forget history. Call after commanding both wheels at the high throttle.
    pub fn reset(&mut self) {
        self.applied = 0;
    }

    /// Divergence last acted on.
    #[inline]
    pub fn applied(&self) -> i32 {
        self.applied
    }

    /// Update with the current divergence.
    ///
    /// Returns the new throttle pair if `diff` differs from the last value acted on, `None`
    /// otherwise. A wheel that is ahead is slowed, the other is held at the high throttle.
    pub fn update(&mut self, diff: i32) -> Option<Correction> {
        if diff == self.applied {
            return None;
        }
        self.applied = diff;

        let delta = self.gain as i64 * diff as i64;
        Some(Correction {
            left: self.clamp(self.high as i64 - delta),
            right: self.clamp(self.high as i64 + delta),
        })
    }

    fn clamp(&self, v: i64) -> u8 {
        v.clamp(self.low as i64, self.high as i64) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_divergence_needs_no_correction() {
        let mut d = Differential::new(1, 200, 255);
        assert_eq!(d.update(0), None);
        assert_eq!(d.update(0), None);
    }

    #[test]
    fn left_ahead_slows_left() {
        let mut d = Differential::new(2, 200, 255);
        assert_eq!(
            d.update(5),
            Some(Correction {
                left: 245,
                right: 255
            })
        );
        // Same divergence again: nothing new to send.
        assert_eq!(d.update(5), None);
    }

    #[test]
    fn right_ahead_slows_right_and_clamps() {
        let mut d = Differential::new(1, 200, 255);
        assert_eq!(
            d.update(-100),
            Some(Correction {
                left: 255,
                right: 200
            })
        );
    }

    #[test]
    fn returning_to_zero_restores_high() {
        let mut d = Differential::new(1, 200, 255);
        d.update(3);
        assert_eq!(
            d.update(0),
            Some(Correction {
                left: 255,
                right: 255
            })
        );
    }

    #[test]
    fn huge_gain_does_not_overflow() {
        let mut d = Differential::new(i32::MAX, 0, 255);
        assert_eq!(
            d.update(i32::MIN),
            Some(Correction {
                left: 255,
                right: 0
            })
        );
    }
}
