// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Encoder re-baselining after an in-place turn.
//!
//! A turn advances both wheel counters without moving the rover forward. Before the following
//! drive, the navigator restores a baseline so those ticks do not count as travel or as drift.
//! The counters themselves belong to the edge interrupts; the baseline is a software offset
//! subtracted from every raw snapshot.

use crate::sensors::EncoderCounts;

/// How the baseline is restored once a turn completes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum RebaselinePolicy {
    /// Both wheels read half of the combined count from before the turn.
    #[default]
    PreTurn,
    /// Both wheels read half of the combined count after the turn.
    HalfSum,
    /// Leave the baseline untouched; turn ticks count as travel.
    Keep,
}

impl RebaselinePolicy {
    /// Compute the new offset.
    ///
    /// `raw` is the hardware snapshot now, `offset` the current baseline and `turn_start_sum` the
    /// effective combined count when the turn began.
    pub fn apply(
        self,
        raw: EncoderCounts,
        offset: EncoderCounts,
        turn_start_sum: u32,
    ) -> EncoderCounts {
        let each = match self {
            RebaselinePolicy::Keep => return offset,
            RebaselinePolicy::PreTurn => turn_start_sum / 2,
            RebaselinePolicy::HalfSum => raw.since(offset).sum() / 2,
        };
        EncoderCounts::new(raw.left.wrapping_sub(each), raw.right.wrapping_sub(each))
    }
}
