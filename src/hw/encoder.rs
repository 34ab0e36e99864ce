// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Wheel encoder edge inputs via the STM32F7 EXTI controller.
//!
//! Each wheel encoder produces one pulse per tick on its own GPIOA line. Lines 0 and 1 are
//! configured for rising-edge interrupts (EXTI0 and EXTI1); the handlers feed the tick counters.

use stm32f7xx_hal::pac;

/// EXTI line of the left encoder (PA0).
pub const LEFT_LINE: u8 = 0;
/// EXTI line of the right encoder (PA1).
pub const RIGHT_LINE: u8 = 1;

pub struct EncoderEdges {
    exti: pac::EXTI,
}

impl EncoderEdges {
    /// Route PA0/PA1 to EXTI0/EXTI1 and enable rising-edge interrupts on both lines.
    ///
    /// The pins must already be inputs. The NVIC lines are unmasked by the caller.
    pub fn new(exti: pac::EXTI, syscfg: &pac::SYSCFG) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb2enr.modify(|_, w| w.syscfgen().set_bit());

        // Port A on lines 0 and 1
        syscfg
            .exticr1
            .modify(|r, w| unsafe { w.bits(r.bits() & !0xFF) });

        let mask = (1 << LEFT_LINE) | (1 << RIGHT_LINE);
        exti.rtsr.modify(|r, w| unsafe { w.bits(r.bits() | mask) });
        exti.ftsr.modify(|r, w| unsafe { w.bits(r.bits() & !mask) });
        exti.pr.write(|w| unsafe { w.bits(mask) });
        exti.imr.modify(|r, w| unsafe { w.bits(r.bits() | mask) });

        Self { exti }
    }

    /// Acknowledge an edge on `line`. Call at the top of the line's handler.
    #[inline]
    pub fn clear(line: u8) {
        let exti = unsafe { &*pac::EXTI::ptr() };
        exti.pr.write(|w| unsafe { w.bits(1 << line) });
    }

    pub fn free(self) -> pac::EXTI {
        self.exti
    }
}
