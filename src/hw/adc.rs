// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! ADC1 support for STM32F7 using direct PAC register access.
//!
//! [`SensorAdc`] runs the sensor rotation: the end-of-conversion interrupt reads the result and
//! starts the next channel. It also offers blocking reads for [`SensorMux::reset_compass`], taken
//! with the interrupt masked.
//!
//! Rotation indices `0..7` are translated to physical ADC inputs through a channel table.
//!
//! [`SensorMux::reset_compass`]: crate::sensors::SensorMux::reset_compass

use stm32f7xx_hal::pac;

use crate::sensors::{AdcRead, AdcRotation};

/// ADC1 driving the multiplexed sensor inputs.
pub struct SensorAdc {
    adc: pac::ADC1,
    inputs: [u8; 7],
}

fn configure_common() {
    let common = unsafe { &*pac::ADC_COMMON::ptr() };

    // ADC prescaler: PCLK2 / 4
    common.ccr.modify(|_, w| w.adcpre().div4());
}

impl SensorAdc {
    /// Power up ADC1 in single-conversion mode. `inputs[i]` is the ADC channel behind rotation
    /// index `i`.
    pub fn new(adc: pac::ADC1, inputs: [u8; 7]) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb2enr.modify(|_, w| w.adc1en().set_bit());

        configure_common();

        adc.cr2.modify(|_, w| w.adon().clear_bit());

        // 12-bit, right-aligned, software trigger, one conversion per start
        adc.cr1.modify(|_, w| w.res().bits(0b00).eocie().clear_bit());
        adc.cr2.modify(|_, w| {
            w.cont().clear_bit();
            w.align().right();
            w.exten().disabled();
            w.eocs().set_bit();
            w
        });
        adc.sqr1.modify(|_, w| w.l().bits(0));

        // Long sample time on every channel the rotation uses
        for &ch in inputs.iter() {
            set_sample_time(&adc, ch);
        }

        adc.cr2.modify(|_, w| w.adon().set_bit());

        Self { adc, inputs }
    }

    #[inline]
    fn input(&self, index: u8) -> u8 {
        self.inputs[(index as usize) % self.inputs.len()]
    }

    fn select_and_start(&mut self, index: u8) {
        let ch = self.input(index);
        self.adc
            .sqr3
            .modify(|_, w| unsafe { w.sq1().bits(ch & 0x1F) });
        self.adc.cr2.modify(|_, w| w.swstart().set_bit());
    }

    /// Read the finished conversion. Clears the end-of-conversion flag.
    #[inline]
    pub fn take_result(&mut self) -> u16 {
        self.adc.dr.read().data().bits()
    }

    pub fn free(self) -> pac::ADC1 {
        self.adc
    }
}

fn set_sample_time(adc: &pac::adc1::RegisterBlock, channel: u8) {
    match channel {
        0 => adc.smpr2.modify(|_, w| w.smp0().bits(0b111)),
        1 => adc.smpr2.modify(|_, w| w.smp1().bits(0b111)),
        2 => adc.smpr2.modify(|_, w| w.smp2().bits(0b111)),
        3 => adc.smpr2.modify(|_, w| w.smp3().bits(0b111)),
        4 => adc.smpr2.modify(|_, w| w.smp4().bits(0b111)),
        5 => adc.smpr2.modify(|_, w| w.smp5().bits(0b111)),
        6 => adc.smpr2.modify(|_, w| w.smp6().bits(0b111)),
        7 => adc.smpr2.modify(|_, w| w.smp7().bits(0b111)),
        8 => adc.smpr2.modify(|_, w| w.smp8().bits(0b111)),
        9 => adc.smpr2.modify(|_, w| w.smp9().bits(0b111)),
        10 => adc.smpr1.modify(|_, w| w.smp10().bits(0b111)),
        11 => adc.smpr1.modify(|_, w| w.smp11().bits(0b111)),
        12 => adc.smpr1.modify(|_, w| w.smp12().bits(0b111)),
        13 => adc.smpr1.modify(|_, w| w.smp13().bits(0b111)),
        14 => adc.smpr1.modify(|_, w| w.smp14().bits(0b111)),
        15 => adc.smpr1.modify(|_, w| w.smp15().bits(0b111)),
        _ => {}
    }
}

impl AdcRead for SensorAdc {
    /// Blocking conversion of rotation index `ch`.
    fn read_channel(&mut self, ch: u8) -> u16 {
        self.select_and_start(ch);
        while self.adc.sr.read().eoc().bit_is_clear() {}
        self.take_result()
    }
}

impl AdcRotation for SensorAdc {
    fn set_auto(&mut self, enabled: bool) {
        self.adc.cr1.modify(|_, w| w.eocie().bit(enabled));
    }

    fn wait_idle(&mut self) {
        // STRT stays set from the software start until the conversion ends
        if self.adc.sr.read().strt().bit_is_set() {
            while self.adc.sr.read().eoc().bit_is_clear() {}
            let _ = self.take_result();
        }
        self.adc.sr.modify(|_, w| w.strt().clear_bit());
    }

    fn start(&mut self, ch: u8) {
        self.select_and_start(ch);
    }
}
