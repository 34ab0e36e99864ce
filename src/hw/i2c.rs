// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! I²C1 target (slave receiver) for the motor-driver board.
//!
//! Register-level, polled. The master only ever writes, so the target ACKs every byte and reports
//! bytes and transaction ends to the caller through [`I2cTarget::poll`].

use stm32f7xx_hal::pac;

// ISR / ICR bits
const ISR_RXNE: u32 = 1 << 2;
const ISR_ADDR: u32 = 1 << 3;
const ISR_STOPF: u32 = 1 << 5;
const ICR_ADDRCF: u32 = 1 << 3;
const ICR_STOPCF: u32 = 1 << 5;

/// Something that happened on the bus.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TargetEvent {
    /// One data byte received.
    Byte(u8),
    /// The current write transaction ended (STOP or repeated START).
    End,
}

pub struct I2cTarget {
    i2c: pac::I2C1,
    in_transaction: bool,
}

impl I2cTarget {
    /// Enable I2C1 as a target answering to 7-bit address `addr`.
    ///
    /// SCL/SDA must already be switched to their open-drain alternate function.
    pub fn new(i2c: pac::I2C1, addr: u8) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb1enr.modify(|_, w| w.i2c1en().set_bit());

        // Disable while configuring
        i2c.cr1.modify(|r, w| unsafe { w.bits(r.bits() & !1) });

        // Own address 1, 7-bit, enabled
        i2c.oar1.write(|w| unsafe { w.bits(0) });
        i2c.oar1
            .write(|w| unsafe { w.bits((1 << 15) | ((addr as u32 & 0x7F) << 1)) });

        // Clock stretching stays enabled, general call off; then PE
        i2c.cr1.modify(|r, w| unsafe { w.bits(r.bits() | 1) });

        Self {
            i2c,
            in_transaction: false,
        }
    }

    /// Service the peripheral once.
    ///
    /// Returns at most one event. Call in a loop until it returns `None`.
    pub fn poll(&mut self) -> Option<TargetEvent> {
        let isr = self.i2c.isr.read().bits();

        if isr & ISR_RXNE != 0 {
            let byte = self.i2c.rxdr.read().bits() as u8;
            return Some(TargetEvent::Byte(byte));
        }

        if isr & ISR_ADDR != 0 {
            // Address match: a repeated START closes the previous transaction first
            self.i2c.icr.write(|w| unsafe { w.bits(ICR_ADDRCF) });
            let ended = core::mem::replace(&mut self.in_transaction, true);
            return ended.then_some(TargetEvent::End);
        }

        if isr & ISR_STOPF != 0 {
            self.i2c.icr.write(|w| unsafe { w.bits(ICR_STOPCF) });
            if core::mem::replace(&mut self.in_transaction, false) {
                return Some(TargetEvent::End);
            }
        }

        None
    }

    pub fn free(self) -> pac::I2C1 {
        self.i2c
    }
}
