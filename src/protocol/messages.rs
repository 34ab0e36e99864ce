// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Command vocabulary shared by the master and the motor-driver board.
//!
//! Every command is a single two-byte frame `[code, value]`, where `value` is an 8-bit throttle.

use thiserror::Error;

/// Length of a command frame on the wire.
pub const FRAME_LEN: usize = 2;

// Command codes
pub const MSG_FORWARD_LEFT: u8 = 1;
pub const MSG_FORWARD_RIGHT: u8 = 2;
pub const MSG_BRAKE: u8 = 3;
pub const MSG_REVERSE_LEFT: u8 = 4;
pub const MSG_REVERSE_RIGHT: u8 = 5;
pub const MSG_FORWARD: u8 = 6;
pub const MSG_TURN_RIGHT: u8 = 7;
pub const MSG_TURN_LEFT: u8 = 8;
pub const MSG_REVERSE: u8 = 9;

/// Motor commands understood by the motor-driver board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ForwardLeft,
    ForwardRight,
    Brake,
    ReverseLeft,
    ReverseRight,
    Forward,
    TurnRight,
    TurnLeft,
    Reverse,
}

impl Command {
    /// Wire code of this command.
    pub const fn code(self) -> u8 {
        match self {
            Command::ForwardLeft => MSG_FORWARD_LEFT,
            Command::ForwardRight => MSG_FORWARD_RIGHT,
            Command::Brake => MSG_BRAKE,
            Command::ReverseLeft => MSG_REVERSE_LEFT,
            Command::ReverseRight => MSG_REVERSE_RIGHT,
            Command::Forward => MSG_FORWARD,
            Command::TurnRight => MSG_TURN_RIGHT,
            Command::TurnLeft => MSG_TURN_LEFT,
            Command::Reverse => MSG_REVERSE,
        }
    }

    /// Look up a command by its wire code.
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            MSG_FORWARD_LEFT => Some(Command::ForwardLeft),
            MSG_FORWARD_RIGHT => Some(Command::ForwardRight),
            MSG_BRAKE => Some(Command::Brake),
            MSG_REVERSE_LEFT => Some(Command::ReverseLeft),
            MSG_REVERSE_RIGHT => Some(Command::ReverseRight),
            MSG_FORWARD => Some(Command::Forward),
            MSG_TURN_RIGHT => Some(Command::TurnRight),
            MSG_TURN_LEFT => Some(Command::TurnLeft),
            MSG_REVERSE => Some(Command::Reverse),
            _ => None,
        }
    }
}

/// A command together with its throttle value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub command: Command,
    pub value: u8,
}

/// Reasons a received payload is not a valid frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("expected a 2-byte frame, got {0} bytes")]
    BadLength(usize),
    #[error("unknown command code {0:#04x}")]
    UnknownCode(u8),
}

impl Frame {
    pub const fn new(command: Command, value: u8) -> Self {
        Self { command, value }
    }

    /// Encode into wire bytes.
    #[inline]
    pub const fn to_bytes(self) -> [u8; FRAME_LEN] {
        [self.command.code(), self.value]
    }

    /// Decode one complete payload. The payload must be exactly one frame long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FrameError> {
        match *bytes {
            [code, value] => Command::from_code(code)
                .map(|command| Self { command, value })
                .ok_or(FrameError::UnknownCode(code)),
            _ => Err(FrameError::BadLength(bytes.len())),
        }
    }
}
