// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Built-in tracks. The firmware runs [`ACTIVE`], chosen by cargo feature.

use super::checkpoint::{Checkpoint, Direction};

/// Four 500-tick sides with right-angle turns between them.
pub static SQUARE: [Checkpoint; 5] = [
    Checkpoint::new(500, 0).with_radius(20),
    Checkpoint::new(500, 90).with_radius(20),
    Checkpoint::new(500, 90).with_radius(20),
    Checkpoint::new(500, 90).with_radius(20),
    Checkpoint::SENTINEL,
];

/// Three pairs of alternating right and left quarter turns.
pub static ZIGZAG: [Checkpoint; 7] = [
    Checkpoint::new(100, 90).with_radius(20),
    Checkpoint::new(100, -90).with_radius(20),
    Checkpoint::new(100, 90).with_radius(20),
    Checkpoint::new(100, -90).with_radius(20),
    Checkpoint::new(100, 90).with_radius(20),
    Checkpoint::new(100, -90).with_radius(20),
    Checkpoint::SENTINEL,
];

/// One straight run.
pub static STRAIGHT: [Checkpoint; 2] = [
    Checkpoint::new(1200, 0).with_radius(20),
    Checkpoint::SENTINEL,
];

/// Spin in place, calibrated for one full revolution.
pub static SPIN: [Checkpoint; 2] = [
    Checkpoint::with_direction(0, 563, Direction::Right),
    Checkpoint::SENTINEL,
];

#[cfg(feature = "spin-track")]
pub static ACTIVE: &[Checkpoint] = &SPIN;

#[cfg(all(feature = "straight-track", not(feature = "spin-track")))]
pub static ACTIVE: &[Checkpoint] = &STRAIGHT;

#[cfg(all(
    feature = "zigzag-track",
    not(any(feature = "spin-track", feature = "straight-track"))
))]
pub static ACTIVE: &[Checkpoint] = &ZIGZAG;

#[cfg(not(any(
    feature = "zigzag-track",
    feature = "spin-track",
    feature = "straight-track"
)))]
pub static ACTIVE: &[Checkpoint] = &SQUARE;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::Track;

    #[test]
    fn tables_are_sentinel_terminated() {
        for t in [&SQUARE[..], &ZIGZAG[..], &STRAIGHT[..], &SPIN[..], ACTIVE] {
            assert!(t.last().unwrap().is_sentinel());
        }
    }

    #[test]
    fn leg_counts() {
        assert_eq!(Track::new(&SQUARE).len(), 4);
        assert_eq!(Track::new(&ZIGZAG).len(), 6);
        assert_eq!(Track::new(&STRAIGHT).len(), 1);
        assert_eq!(Track::new(&SPIN).len(), 1);
        assert_eq!(SPIN[0].direction(), Direction::Right);
    }

    #[test]
    fn zigzag_alternates_quarter_turns() {
        for (i, cp) in Track::new(&ZIGZAG).legs().enumerate() {
            let expected = if i % 2 == 0 { 90 } else { -90 };
            assert_eq!(cp.angle, expected);
            assert_eq!(cp.distance, 100);
            assert_eq!(cp.radius, 20);
        }
    }
}
