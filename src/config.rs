// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Tunable constants for the rover.
//!
//! Everything that used to be a magic number in the navigation loop lives here. Values that a test
//! or a different chassis may want to change at runtime are collected in [`NavConfig`].

use crate::control::RebaselinePolicy;

/// I²C address of the motor-driver board.
pub const MOTOR_DRIVER_ADDR: u8 = 0x5A;

/// Delay before the master starts the run, so the slave is up and the rover is set down.
pub const STARTUP_DELAY_MS: u32 = 4000;

/// Throttle used while driving straight.
pub const HIGH_THROTTLE: u8 = 255;
/// Lowest throttle the drift correction may command on either wheel.
pub const LOW_THROTTLE: u8 = 200;
/// Throttle used while turning in place.
pub const TURN_THROTTLE: u8 = 255;
/// Magnitude sent with `BRAKE`.
pub const BRAKE_MAGNITUDE: u8 = 255;
/// Settle time after braking.
pub const BRAKE_TIME_MS: u32 = 500;

/// Proportional gain of the drift correction (throttle steps per tick of divergence).
pub const CORRECTION_GAIN: i32 = 1;

/// Encoder ticks per wheel per degree of in-place rotation, in hundredths.
/// 39 -> 0.39 ticks/degree.
pub const TICKS_PER_DEGREE_CENTI: u32 = 39;

/// Motor-driver PWM frequency.
pub const MOTOR_PWM_HZ: u32 = 20_000;
/// Duty steps per motor PWM cycle.
pub const MOTOR_PWM_STEPS: u16 = 800;

/// Scanning servo PWM frequency.
pub const SERVO_HZ: u32 = 50;
/// Scanning servo: timer counts per 20 ms servo period.
pub const SERVO_PERIOD_COUNTS: u16 = 40000;
/// Scanning servo: number of periods between sweeps.
pub const SERVO_TURN_PERIODS: u16 = 30;
/// Scanning servo: pulse at the start of the sweep (timer counts).
pub const SERVO_START: u16 = 2500;
/// Scanning servo: pulse at the end of the sweep (timer counts).
pub const SERVO_END: u16 = 5000;

/// Runtime configuration of the navigation controller.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct NavConfig {
    pub high_throttle: u8,
    pub low_throttle: u8,
    pub turn_throttle: u8,
    pub brake_magnitude: u8,
    pub brake_time_ms: u32,
    pub gain: i32,
    pub ticks_per_degree_centi: u32,
    pub rebaseline: RebaselinePolicy,

    /// Maximum number of encoder polls per turn/drive phase (at least one). `None` waits
    /// forever.
    pub poll_budget: Option<u32>,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            high_throttle: HIGH_THROTTLE,
            low_throttle: LOW_THROTTLE,
            turn_throttle: TURN_THROTTLE,
            brake_magnitude: BRAKE_MAGNITUDE,
            brake_time_ms: BRAKE_TIME_MS,
            gain: CORRECTION_GAIN,
            ticks_per_degree_centi: TICKS_PER_DEGREE_CENTI,
            rebaseline: RebaselinePolicy::PreTurn,
            poll_budget: None,
        }
    }
}

impl NavConfig {
    /// Set the throttle band used by the drift correction.
    pub fn with_throttle_band(mut self, low: u8, high: u8) -> Self {
        self.low_throttle = low.min(high);
        self.high_throttle = high;
        self
    }

    /// Set the proportional gain of the drift correction.
    pub fn with_gain(mut self, gain: i32) -> Self {
        self.gain = gain;
        self
    }

    /// Set the turn calibration, in hundredths of a tick per degree.
    pub fn with_ticks_per_degree_centi(mut self, centi: u32) -> Self {
        self.ticks_per_degree_centi = centi;
        self
    }

    /// Set how the encoder baseline is restored after a turn.
    pub fn with_rebaseline(mut self, policy: RebaselinePolicy) -> Self {
        self.rebaseline = policy;
        self
    }

    /// Bound every turn/drive wait to `polls` encoder reads.
    pub fn with_poll_budget(mut self, polls: u32) -> Self {
        self.poll_budget = Some(polls);
        self
    }

    /// Set the brake magnitude and settle time.
    pub fn with_brake(mut self, magnitude: u8, time_ms: u32) -> Self {
        self.brake_magnitude = magnitude;
        self.brake_time_ms = time_ms;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_waits_forever() {
        let cfg = NavConfig::default();
        assert_eq!(cfg.poll_budget, None);
        assert_eq!(cfg.rebaseline, RebaselinePolicy::PreTurn);
        assert_eq!(cfg.high_throttle, 255);
        assert_eq!(cfg.low_throttle, 200);
    }

    #[test]
    fn throttle_band_keeps_low_below_high() {
        let cfg = NavConfig::default().with_throttle_band(240, 180);
        assert_eq!(cfg.low_throttle, 180);
        assert_eq!(cfg.high_throttle, 180);
    }
}
