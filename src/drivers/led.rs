// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Status LEDs.
//!
//! The master toggles one LED per encoder edge (left / right), so a spinning wheel shows as a
//! flicker. The red LED reports faults: [`Led::light_on_err`] leaves it lit when start-up fails,
//! [`Led::blink`] drives the pattern shown when navigation stops.

use embedded_hal::{blocking::delay::DelayMs, digital::v2::OutputPin};

/// Whether the LED is driven active-high or active-low on the board wiring.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ActiveLevel {
    High,
    Low,
}

/// LED abstraction that remembers its active level and last known state.
pub struct Led<PIN: OutputPin> {
    pin: PIN,
    active: ActiveLevel,
    is_on: bool,
}

impl<PIN: OutputPin> Led<PIN> {
    /// Create an LED wrapper, initializing it to OFF.
    pub fn new(pin: PIN, active: ActiveLevel) -> Self {
        let mut led = Self {
            pin,
            active,
            is_on: true,
        };
        led.off();
        led
    }

    pub fn active_high(pin: PIN) -> Self {
        Self::new(pin, ActiveLevel::High)
    }

    pub fn active_low(pin: PIN) -> Self {
        Self::new(pin, ActiveLevel::Low)
    }

    /// Drive the LED logically ON (true) or OFF (false).
    pub fn set(&mut self, on: bool) {
        let high = matches!(
            (self.active, on),
            (ActiveLevel::High, true) | (ActiveLevel::Low, false)
        );
        let _ = if high {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        self.is_on = on;
    }

    #[inline]
    pub fn on(&mut self) {
        self.set(true);
    }

    #[inline]
    pub fn off(&mut self) {
        self.set(false);
    }

    #[inline]
    pub fn toggle(&mut self) {
        self.set(!self.is_on);
    }

    #[inline]
    pub fn is_on(&self) -> bool {
        self.is_on
    }

    /// Flash `count` times: 50 ms on, 100 ms off.
    pub fn blink<D: DelayMs<u32>>(&mut self, delay: &mut D, count: u8) {
        for _ in 0..count {
            self.on();
            delay.delay_ms(50);
            self.off();
            delay.delay_ms(100);
        }
    }
}

impl<PIN: OutputPin> Led<PIN> {
    /// Turn the LED on if `result` is an error. Hands back the success value.
    pub fn light_on_err<T, E>(&mut self, result: Result<T, E>) -> Option<T> {
        match result {
            Ok(v) => Some(v),
            Err(_) => {
                self.on();
                None
            }
        }
    }
}
