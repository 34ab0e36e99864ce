// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Frame parser for the motor-driver side of the command bus.
//!
//! The I²C target hands over one byte at a time as it is clocked in, and signals the end of each
//! write transaction (STOP or repeated START). A transaction carries exactly one frame; anything
//! else is discarded when the transaction ends.

use crate::protocol::messages::*;

enum State {
    WaitCode,
    WaitValue { code: u8 },
    Complete,
    /// Too many bytes in this transaction, drop everything until it ends.
    Overrun,
}

pub struct Parser {
    state: State,
    frame: Option<Frame>,
    dropped: u32,
}

impl Parser {
    pub const fn new() -> Self {
        Self {
            state: State::WaitCode,
            frame: None,
            dropped: 0,
        }
    }

    /// Process a single received byte.
    pub fn push(&mut self, byte: u8) {
        self.state = match self.state {
            State::WaitCode => State::WaitValue { code: byte },
            State::WaitValue { code } => {
                self.frame = Frame::from_bytes(&[code, byte]).ok();
                State::Complete
            }
            State::Complete | State::Overrun => {
                self.frame = None;
                State::Overrun
            }
        };
    }

    /// Close the current transaction. Returns `Some(Frame)` if it carried exactly one valid
    /// frame.
    pub fn end_transaction(&mut self) -> Option<Frame> {
        let complete = matches!(self.state, State::Complete);
        let frame = self.frame.take();
        self.state = State::WaitCode;

        if complete && frame.is_some() {
            frame
        } else {
            self.dropped = self.dropped.wrapping_add(1);
            None
        }
    }

    /// Number of transactions discarded as malformed.
    #[inline]
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}
