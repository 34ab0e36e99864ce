// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Scanning servo that sweeps the range finder back and forth.
//!
//! The servo PWM runs at a 20 ms period. Every period the timer interrupt calls
//! [`ServoSweep::on_period`]; after a fixed number of periods the pulse flips between the start
//! and end positions.

use embedded_hal::PwmPin;

use crate::config::{SERVO_END, SERVO_PERIOD_COUNTS, SERVO_START, SERVO_TURN_PERIODS};

/// Period counter that alternates the servo pulse between two positions.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ServoSweep {
    start: u16,
    end: u16,
    turn_periods: u16,
    periods: u16,
    at_end: bool,
}

impl ServoSweep {
    /// Sweep between `start` and `end` (timer counts out of [`SERVO_PERIOD_COUNTS`]), switching
    /// every `turn_periods` periods. Starts at `start`.
    pub const fn new(start: u16, end: u16, turn_periods: u16) -> Self {
        Self {
            start,
            end,
            turn_periods,
            periods: 0,
            at_end: false,
        }
    }

    /// Pulse the servo should be driven with now.
    #[inline]
    pub fn pulse(&self) -> u16 {
        if self.at_end {
            self.end
        } else {
            self.start
        }
    }

    /// Count one period. Returns the new pulse when it is time to switch.
    pub fn on_period(&mut self) -> Option<u16> {
        self.periods += 1;
        if self.periods < self.turn_periods.max(1) {
            return None;
        }
        self.periods = 0;
        self.at_end = !self.at_end;
        Some(self.pulse())
    }
}

impl Default for ServoSweep {
    fn default() -> Self {
        Self::new(SERVO_START, SERVO_END, SERVO_TURN_PERIODS)
    }
}

/// Servo output on a PWM channel running at the servo period.
pub struct Servo<P> {
    pwm: P,
    sweep: ServoSweep,
}

impl<P: PwmPin<Duty = u16>> Servo<P> {
    pub fn new(mut pwm: P, sweep: ServoSweep) -> Self {
        let duty = pulse_to_duty(sweep.pulse(), pwm.get_max_duty());
        pwm.set_duty(duty);
        pwm.enable();
        Self { pwm, sweep }
    }

    /// Call once per servo period.
    pub fn tick(&mut self) {
        if let Some(pulse) = self.sweep.on_period() {
            let duty = pulse_to_duty(pulse, self.pwm.get_max_duty());
            self.pwm.set_duty(duty);
        }
    }

    pub fn sweep(&self) -> &ServoSweep {
        &self.sweep
    }
}

/// Convert a pulse in servo timer counts to a duty on a channel whose full scale is `max_duty`.
pub fn pulse_to_duty(pulse: u16, max_duty: u16) -> u16 {
    let pulse = pulse.min(SERVO_PERIOD_COUNTS);
    (pulse as u32 * max_duty as u32 / SERVO_PERIOD_COUNTS as u32) as u16
}
