// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Round-robin sensor multiplexer.
//!
//! A single ADC is shared by seven analog inputs: two range finders, the two compass axes and
//! three infrared sensors. Every conversion-complete interrupt records the value of the channel
//! that was just converted and selects the next one, wrapping from `Ir3` back to `Range1`.
//!
//! [`SensorMux::reset_compass`] takes the ADC away from the rotation for two forced conversions
//! around a compass set/reset pulse and hands it back afterwards.

use core::cell::Cell;

use critical_section::Mutex;
use embedded_hal::digital::v2::OutputPin;
use log::debug;
// std provides the inherent float methods in host tests
#[cfg_attr(test, allow(unused_imports))]
use micromath::F32Ext;

/// Trait for reading a single channel from an ADC peripheral.
pub trait AdcRead {
    /// Blocking conversion of `ch`.
    fn read_channel(&mut self, ch: u8) -> u16;
}

/// ADC that can also run the interrupt-driven rotation.
pub trait AdcRotation: AdcRead {
    /// Enable or disable the conversion-complete interrupt.
    fn set_auto(&mut self, enabled: bool);

    /// Block until no conversion is in progress.
    fn wait_idle(&mut self);

    /// Select `ch` and start a conversion that will raise the conversion-complete interrupt.
    fn start(&mut self, ch: u8);
}

/// Multiplexed analog inputs, in rotation order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Channel {
    Range1,
    Range2,
    Compass1,
    Compass2,
    Ir1,
    Ir2,
    Ir3,
}

impl Channel {
    pub const ROTATION: [Channel; 7] = [
        Channel::Range1,
        Channel::Range2,
        Channel::Compass1,
        Channel::Compass2,
        Channel::Ir1,
        Channel::Ir2,
        Channel::Ir3,
    ];

    /// ADC input number of this channel.
    #[inline]
    pub const fn mux(self) -> u8 {
        self as u8
    }

    /// Next channel in the rotation.
    pub const fn next(self) -> Channel {
        match self {
            Channel::Range1 => Channel::Range2,
            Channel::Range2 => Channel::Compass1,
            Channel::Compass1 => Channel::Compass2,
            Channel::Compass2 => Channel::Ir1,
            Channel::Ir1 => Channel::Ir2,
            Channel::Ir2 => Channel::Ir3,
            Channel::Ir3 => Channel::Range1,
        }
    }
}

/// Last value converted on each channel. No timestamps: a field holds whatever was written last.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SensorSnapshot {
    pub range1: u16,
    pub range2: u16,
    pub compass1: u16,
    pub compass2: u16,
    pub ir: [u16; 3],
}

impl SensorSnapshot {
    /// Value last recorded for `ch`.
    pub fn get(&self, ch: Channel) -> u16 {
        match ch {
            Channel::Range1 => self.range1,
            Channel::Range2 => self.range2,
            Channel::Compass1 => self.compass1,
            Channel::Compass2 => self.compass2,
            Channel::Ir1 => self.ir[0],
            Channel::Ir2 => self.ir[1],
            Channel::Ir3 => self.ir[2],
        }
    }

    fn set(&mut self, ch: Channel, value: u16) {
        match ch {
            Channel::Range1 => self.range1 = value,
            Channel::Range2 => self.range2 = value,
            Channel::Compass1 => self.compass1 = value,
            Channel::Compass2 => self.compass2 = value,
            Channel::Ir1 => self.ir[0] = value,
            Channel::Ir2 => self.ir[1] = value,
            Channel::Ir3 => self.ir[2] = value,
        }
    }

    /// Heading in degrees `[0, 360)` from the two compass axes, both centred on `offset`.
    pub fn compass_heading_deg(&self, offset: i16) -> f32 {
        let x = self.compass1 as f32 - offset as f32;
        let y = self.compass2 as f32 - offset as f32;
        let deg = y.atan2(x).to_degrees();
        if deg < 0.0 {
            deg + 360.0
        } else {
            deg
        }
    }
}

#[derive(Copy, Clone)]
struct Rotation {
    current: Channel,
    suspended: bool,
}

/// Shared state of the multiplexer: the rotation position and the latest readings.
///
/// Intended to live in a `static`; the ADC interrupt is the only writer of the readings.
pub struct SensorMux {
    rotation: Mutex<Cell<Rotation>>,
    readings: Mutex<Cell<SensorSnapshot>>,
    compass_offset: Mutex<Cell<i16>>,
}

impl SensorMux {
    pub const fn new() -> Self {
        Self {
            rotation: Mutex::new(Cell::new(Rotation {
                current: Channel::Range1,
                suspended: false,
            })),
            readings: Mutex::new(Cell::new(SensorSnapshot {
                range1: 0,
                range2: 0,
                compass1: 0,
                compass2: 0,
                ir: [0; 3],
            })),
            compass_offset: Mutex::new(Cell::new(0)),
        }
    }

    /// Kick off the rotation at the current channel.
    pub fn start<A: AdcRotation>(&self, adc: &mut A) {
        let ch = self.current_channel();
        adc.set_auto(true);
        adc.start(ch.mux());
    }

    /// Conversion-complete handler.
    ///
    /// Records `value` for the channel that was being converted and returns the channel to
    /// convert next, or `None` while the rotation is suspended.
    pub fn on_conversion_complete(&self, value: u16) -> Option<Channel> {
        critical_section::with(|cs| {
            let rotation = self.rotation.borrow(cs);
            let mut rot = rotation.get();
            if rot.suspended {
                return None;
            }

            let readings = self.readings.borrow(cs);
            let mut snap = readings.get();
            snap.set(rot.current, value);
            readings.set(snap);

            rot.current = rot.current.next();
            rotation.set(rot);
            Some(rot.current)
        })
    }

    /// Channel the rotation will record next.
    pub fn current_channel(&self) -> Channel {
        critical_section::with(|cs| self.rotation.borrow(cs).get().current)
    }

    pub fn is_suspended(&self) -> bool {
        critical_section::with(|cs| self.rotation.borrow(cs).get().suspended)
    }

    /// Latest readings of every channel.
    pub fn snapshot(&self) -> SensorSnapshot {
        critical_section::with(|cs| self.readings.borrow(cs).get())
    }

    /// Offset measured by the last [`reset_compass`](Self::reset_compass).
    pub fn compass_offset(&self) -> i16 {
        critical_section::with(|cs| self.compass_offset.borrow(cs).get())
    }

    /// Measure the compass offset.
    ///
    /// Suspends the rotation, converts the compass once with the set/reset line high and once
    /// with it low, and stores `second - first` as the offset. The rotation is resumed at the
    /// channel it was on, whether or not driving the line succeeded.
    ///
    /// Blocks for two conversions. Not reentrant.
    pub fn reset_compass<A, P>(&self, adc: &mut A, set_reset: &mut P) -> Result<i16, P::Error>
    where
        A: AdcRotation,
        P: OutputPin,
    {
        critical_section::with(|cs| {
            let rotation = self.rotation.borrow(cs);
            let mut rot = rotation.get();
            rot.suspended = true;
            rotation.set(rot);
        });
        adc.set_auto(false);
        adc.wait_idle();

        let measured = (|| {
            let ch = Channel::Compass1.mux();
            set_reset.set_high()?;
            let first = adc.read_channel(ch);
            set_reset.set_low()?;
            let second = adc.read_channel(ch);
            Ok((second as i32 - first as i32) as i16)
        })();

        if let Ok(offset) = measured {
            critical_section::with(|cs| self.compass_offset.borrow(cs).set(offset));
            debug!("compass offset={}", offset);
        }

        let resume = critical_section::with(|cs| {
            let rotation = self.rotation.borrow(cs);
            let mut rot = rotation.get();
            rot.suspended = false;
            rotation.set(rot);
            rot.current
        });
        adc.set_auto(true);
        adc.start(resume.mux());

        measured
    }
}

impl Default for SensorMux {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Pin {
        high: bool,
        history: Vec<bool>,
    }

    impl OutputPin for Pin {
        type Error = Infallible;

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.high = true;
            self.history.push(true);
            Ok(())
        }

        fn set_low(&mut self) -> Result<(), Infallible> {
            self.high = false;
            self.history.push(false);
            Ok(())
        }
    }

    /// ADC whose blocking reads fire a "stray" conversion-complete interrupt into the mux, as a
    /// free-running ADC would if the rotation were still live.
    struct FakeAdc<'a> {
        mux: &'a SensorMux,
        pin_high: &'a RefCell<bool>,
        auto: bool,
        reads: Vec<u8>,
        stray_results: Vec<Option<Channel>>,
        started: Vec<u8>,
    }

    impl AdcRead for FakeAdc<'_> {
        fn read_channel(&mut self, ch: u8) -> u16 {
            self.reads.push(ch);
            self.stray_results.push(self.mux.on_conversion_complete(0xDEAD));
            if *self.pin_high.borrow() {
                500
            } else {
                530
            }
        }
    }

    impl AdcRotation for FakeAdc<'_> {
        fn set_auto(&mut self, enabled: bool) {
            self.auto = enabled;
        }

        fn wait_idle(&mut self) {}

        fn start(&mut self, ch: u8) {
            self.started.push(ch);
        }
    }

    /// Pin wrapper that mirrors its level into a shared cell the fake ADC can see.
    struct SharedPin<'a> {
        inner: Pin,
        level: &'a RefCell<bool>,
    }

    impl OutputPin for SharedPin<'_> {
        type Error = Infallible;

        fn set_high(&mut self) -> Result<(), Infallible> {
            *self.level.borrow_mut() = true;
            self.inner.set_high()
        }

        fn set_low(&mut self) -> Result<(), Infallible> {
            *self.level.borrow_mut() = false;
            self.inner.set_low()
        }
    }

    #[test]
    fn seven_conversions_visit_every_channel_once() {
        let mux = SensorMux::new();
        let mut next = Vec::new();
        for value in 1..=7u16 {
            next.push(mux.on_conversion_complete(value * 10).unwrap());
        }

        let snap = mux.snapshot();
        assert_eq!(snap.range1, 10);
        assert_eq!(snap.range2, 20);
        assert_eq!(snap.compass1, 30);
        assert_eq!(snap.compass2, 40);
        assert_eq!(snap.ir, [50, 60, 70]);
        assert_eq!(mux.current_channel(), Channel::Range1);
        assert_eq!(
            next,
            vec![
                Channel::Range2,
                Channel::Compass1,
                Channel::Compass2,
                Channel::Ir1,
                Channel::Ir2,
                Channel::Ir3,
                Channel::Range1,
            ]
        );

        // Eighth conversion only touches Range1.
        mux.on_conversion_complete(99);
        let after = mux.snapshot();
        assert_eq!(after.range1, 99);
        assert_eq!(after.range2, 20);
    }

    #[test]
    fn rotation_order_matches_mux_numbers() {
        for (i, ch) in Channel::ROTATION.iter().enumerate() {
            assert_eq!(ch.mux() as usize, i);
            assert_eq!(ch.next(), Channel::ROTATION[(i + 1) % 7]);
        }
    }

    #[test]
    fn reset_compass_blocks_rotation_writes() {
        let mux = SensorMux::new();
        mux.on_conversion_complete(11);
        mux.on_conversion_complete(22);
        let before = mux.snapshot();
        let level = RefCell::new(false);

        let mut adc = FakeAdc {
            mux: &mux,
            pin_high: &level,
            auto: true,
            reads: Vec::new(),
            stray_results: Vec::new(),
            started: Vec::new(),
        };
        let mut pin = SharedPin {
            inner: Pin::default(),
            level: &level,
        };

        let offset = mux.reset_compass(&mut adc, &mut pin).unwrap();

        assert_eq!(offset, 30);
        assert_eq!(mux.compass_offset(), 30);
        assert_eq!(adc.reads, vec![Channel::Compass1.mux(); 2]);
        assert_eq!(adc.stray_results, vec![None, None]);
        assert_eq!(mux.snapshot(), before);
        assert_eq!(pin.inner.history, vec![true, false]);
        assert!(!pin.inner.high);

        // Rotation resumes where it stopped.
        assert!(adc.auto);
        assert!(!mux.is_suspended());
        assert_eq!(adc.started, vec![Channel::Compass1.mux()]);
        assert_eq!(mux.on_conversion_complete(33), Some(Channel::Compass2));
        assert_eq!(mux.snapshot().compass1, 33);
    }

    #[test]
    fn start_converts_current_channel() {
        let mux = SensorMux::new();
        for v in 0..3 {
            mux.on_conversion_complete(v);
        }
        let level = RefCell::new(false);
        let mut adc = FakeAdc {
            mux: &mux,
            pin_high: &level,
            auto: false,
            reads: Vec::new(),
            stray_results: Vec::new(),
            started: Vec::new(),
        };

        mux.start(&mut adc);
        assert!(adc.auto);
        assert_eq!(adc.started, vec![Channel::Compass2.mux()]);
    }

    #[test]
    fn heading_quadrants() {
        let mut snap = SensorSnapshot::default();
        snap.compass1 = 600;
        snap.compass2 = 512;
        assert!(snap.compass_heading_deg(512).abs() < 0.5);

        snap.compass1 = 512;
        snap.compass2 = 600;
        assert!((snap.compass_heading_deg(512) - 90.0).abs() < 0.5);

        snap.compass1 = 512;
        snap.compass2 = 400;
        assert!((snap.compass_heading_deg(512) - 270.0).abs() < 0.5);
    }
}
