// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Tracks
//!
//! - [`checkpoint`] - Checkpoint and track types.
//! - [`tracks`] - Built-in track tables.

pub mod checkpoint;
pub mod tracks;

pub use checkpoint::{Checkpoint, Direction, Track};
pub use tracks::ACTIVE;
