// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Control Algorithms
//!
//! Closed-loop navigation on top of the wheel encoders and the command link.
//!
//! ## Modules
//!
//! - [`differential`] - Proportional drift correction between the two wheels.
//! - [`rebaseline`] - Encoder baseline policies applied after a turn.
//! - [`navigator`] - Checkpoint state machine: turn, drive, brake.

pub mod differential;
pub mod navigator;
pub mod rebaseline;

pub use differential::{Correction, Differential};
pub use navigator::{turn_ticks, NavError, NavigationState, Navigator, Phase};
pub use rebaseline::RebaselinePolicy;
