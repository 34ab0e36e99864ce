// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Dual H-bridge motor driver for the slave board.
//!
//! Each wheel motor hangs off an H-bridge with two PWM inputs:
//!
//! | Drive   | IN1 | IN2 |
//! | ------- | --- | --- |
//! | Forward | x   | 0   |
//! | Reverse | 0   | x   |
//! | Brake   | x   | x   |
//! | Coast   | 0   | 0   |
//!
//! [`MotorDriver::apply`] maps a received [`Frame`] onto both bridges. The 8-bit throttle is
//! scaled onto the full PWM duty range.

use embedded_hal::PwmPin;
use log::debug;

use crate::protocol::{Command, Frame};

/// Scale an 8-bit throttle onto `0..=max_duty`.
#[inline]
pub fn scale_duty(throttle: u8, max_duty: u16) -> u16 {
    (throttle as u32 * max_duty as u32 / u8::MAX as u32) as u16
}

/// One H-bridge driven by two PWM inputs.
pub struct HBridge<IN1, IN2> {
    in1: IN1,
    in2: IN2,
}

impl<IN1, IN2> HBridge<IN1, IN2>
where
    IN1: PwmPin<Duty = u16>,
    IN2: PwmPin<Duty = u16>,
{
    /// Take both inputs, enable them and leave the motor coasting.
    pub fn new(mut in1: IN1, mut in2: IN2) -> Self {
        in1.set_duty(0);
        in2.set_duty(0);
        in1.enable();
        in2.enable();
        Self { in1, in2 }
    }

    fn set(&mut self, a: u8, b: u8) {
        // Both inputs are assumed to share a timer, hence the same resolution.
        let max = self.in1.get_max_duty();
        self.in1.set_duty(scale_duty(a, max));
        self.in2.set_duty(scale_duty(b, max));
    }

    #[inline]
    pub fn forward(&mut self, throttle: u8) {
        self.set(throttle, 0);
    }

    #[inline]
    pub fn reverse(&mut self, throttle: u8) {
        self.set(0, throttle);
    }

    /// Short the motor terminals with strength `magnitude`.
    #[inline]
    pub fn brake(&mut self, magnitude: u8) {
        self.set(magnitude, magnitude);
    }

    #[inline]
    pub fn coast(&mut self) {
        self.set(0, 0);
    }

    /// Current `(IN1, IN2)` duties.
    pub fn duties(&self) -> (u16, u16) {
        (self.in1.get_duty(), self.in2.get_duty())
    }

    pub fn free(self) -> (IN1, IN2) {
        (self.in1, self.in2)
    }
}

/// Left and right wheel H-bridges behind the command protocol.
pub struct MotorDriver<L1, L2, R1, R2> {
    left: HBridge<L1, L2>,
    right: HBridge<R1, R2>,
    applied: u32,
}

impl<L1, L2, R1, R2> MotorDriver<L1, L2, R1, R2>
where
    L1: PwmPin<Duty = u16>,
    L2: PwmPin<Duty = u16>,
    R1: PwmPin<Duty = u16>,
    R2: PwmPin<Duty = u16>,
{
    pub fn new(left: HBridge<L1, L2>, right: HBridge<R1, R2>) -> Self {
        Self {
            left,
            right,
            applied: 0,
        }
    }

    /// Drive the motors as `frame` commands.
    pub fn apply(&mut self, frame: Frame) {
        let x = frame.value;
        debug!("apply {:?} {}", frame.command, x);

        match frame.command {
            Command::ForwardLeft => self.left.forward(x),
            Command::ForwardRight => self.right.forward(x),
            Command::ReverseLeft => self.left.reverse(x),
            Command::ReverseRight => self.right.reverse(x),
            Command::Brake => {
                self.left.brake(x);
                self.right.brake(x);
            }
            Command::Forward => {
                self.left.forward(x);
                self.right.forward(x);
            }
            Command::Reverse => {
                self.left.reverse(x);
                self.right.reverse(x);
            }
            Command::TurnRight => {
                self.left.forward(x);
                self.right.reverse(x);
            }
            Command::TurnLeft => {
                self.left.reverse(x);
                self.right.forward(x);
            }
        }

        self.applied = self.applied.wrapping_add(1);
    }

    /// Let both wheels coast.
    pub fn stop(&mut self) {
        self.left.coast();
        self.right.coast();
    }

    /// Number of frames applied since start-up.
    #[inline]
    pub fn applied(&self) -> u32 {
        self.applied
    }

    pub fn left(&self) -> &HBridge<L1, L2> {
        &self.left
    }

    pub fn right(&self) -> &HBridge<R1, R2> {
        &self.right
    }
}
