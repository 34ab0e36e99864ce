// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Inter-board Command Protocol
//!
//! - [`messages`] - Command codes and the two-byte frame format.
//! - [`parser`] - Frame parser used by the motor-driver board.
//! - [`link`] - Retrying command link used by the master.

pub mod link;
pub mod messages;
pub mod parser;

pub use link::{CommandLink, LinkError, LinkStats, RetryPolicy};
pub use messages::{Command, Frame, FrameError};
pub use parser::Parser;
