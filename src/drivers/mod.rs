// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Device-Specific Drivers
//!
//! This module contains device-specific drivers that sit above the raw `hw/` layer and below the
//! application logic. They are written against `embedded-hal` PWM pins, so they build and test on
//! the host as well.
//!
//! ## Existing drivers
//!
//! - [`led`] – Status LEDs
//! - [`motor_driver`] – Dual H-bridge wheel driver behind the command protocol (slave board)
//! - [`servo`] – Range-finder scanning servo (master board)

pub mod led;
pub mod motor_driver;
pub mod servo;

pub use led::Led;
pub use motor_driver::{HBridge, MotorDriver};
pub use servo::{Servo, ServoSweep};
