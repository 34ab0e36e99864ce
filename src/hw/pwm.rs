// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Edge-aligned PWM on general-purpose timers TIM3/TIM4.
//!
//! [`Pwm::tim3`] / [`Pwm::tim4`] configure all four channels in PWM mode 1 and hand back one
//! [`PwmChannel`] per output. Channels implement `embedded_hal::PwmPin`, so the motor and servo
//! drivers stay hardware-agnostic.

use core::marker::PhantomData;

use embedded_hal::PwmPin;
use stm32f7xx_hal::pac;

/// Access to the register block of a timer without owning it.
pub trait TimerRegs {
    fn regs() -> &'static pac::tim3::RegisterBlock;
}

impl TimerRegs for pac::TIM3 {
    #[inline]
    fn regs() -> &'static pac::tim3::RegisterBlock {
        unsafe { &*pac::TIM3::ptr() }
    }
}

impl TimerRegs for pac::TIM4 {
    #[inline]
    fn regs() -> &'static pac::tim3::RegisterBlock {
        unsafe { &*pac::TIM4::ptr() }
    }
}

/// One output of a PWM timer. `C` is the channel number, 1 to 4.
pub struct PwmChannel<TIM, const C: u8> {
    _tim: PhantomData<TIM>,
}

/// The four channels of a configured timer.
pub struct Pwm<TIM> {
    pub ch1: PwmChannel<TIM, 1>,
    pub ch2: PwmChannel<TIM, 2>,
    pub ch3: PwmChannel<TIM, 3>,
    pub ch4: PwmChannel<TIM, 4>,
}

fn configure(tim: &pac::tim3::RegisterBlock, timer_clk_hz: u32, freq_hz: u32, period: u16) {
    // Disable counter while configuring
    tim.cr1.modify(|_, w| w.cen().clear_bit());

    let ticks = freq_hz.max(1) * (period.max(1) as u32);
    let psc = (timer_clk_hz / ticks).saturating_sub(1).min(0xFFFF);
    tim.psc.write(|w| unsafe { w.bits(psc) });
    tim.arr.write(|w| unsafe { w.bits(period.saturating_sub(1) as u32) });

    // PWM mode 1 with preload on all channels
    const OC_PWM1_PRELOAD: u32 = (0b110 << 4) | (1 << 3);
    let ccmr = OC_PWM1_PRELOAD | (OC_PWM1_PRELOAD << 8);
    tim.ccmr1_output().write(|w| unsafe { w.bits(ccmr) });
    tim.ccmr2_output().write(|w| unsafe { w.bits(ccmr) });

    tim.ccr1.write(|w| unsafe { w.bits(0) });
    tim.ccr2.write(|w| unsafe { w.bits(0) });
    tim.ccr3.write(|w| unsafe { w.bits(0) });
    tim.ccr4.write(|w| unsafe { w.bits(0) });

    // Auto-reload preload, latch everything, run
    tim.cr1.modify(|_, w| w.arpe().set_bit());
    tim.egr.write(|w| w.ug().set_bit());
    tim.cr1.modify(|_, w| w.cen().set_bit());
}

impl Pwm<pac::TIM3> {
    /// Run TIM3 at `freq_hz` with `period` duty steps per cycle.
    pub fn tim3(_tim: pac::TIM3, timer_clk_hz: u32, freq_hz: u32, period: u16) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb1enr.modify(|_, w| w.tim3en().set_bit());
        configure(pac::TIM3::regs(), timer_clk_hz, freq_hz, period);
        Self::split()
    }
}

impl Pwm<pac::TIM4> {
    /// Run TIM4 at `freq_hz` with `period` duty steps per cycle.
    pub fn tim4(_tim: pac::TIM4, timer_clk_hz: u32, freq_hz: u32, period: u16) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb1enr.modify(|_, w| w.tim4en().set_bit());
        configure(pac::TIM4::regs(), timer_clk_hz, freq_hz, period);
        Self::split()
    }
}

impl<TIM: TimerRegs> Pwm<TIM> {
    fn split() -> Self {
        Self {
            ch1: PwmChannel { _tim: PhantomData },
            ch2: PwmChannel { _tim: PhantomData },
            ch3: PwmChannel { _tim: PhantomData },
            ch4: PwmChannel { _tim: PhantomData },
        }
    }

    /// Enable or disable the update interrupt of this timer.
    pub fn listen_update(enabled: bool) {
        TIM::regs().dier.modify(|_, w| w.uie().bit(enabled));
    }

    /// Clear the update flag. Call from the timer's interrupt handler.
    #[inline]
    pub fn clear_update() {
        TIM::regs().sr.modify(|_, w| w.uif().clear_bit());
    }
}

impl<TIM: TimerRegs, const C: u8> PwmPin for PwmChannel<TIM, C> {
    type Duty = u16;

    fn disable(&mut self) {
        let bit = 1 << (4 * (C as u32 - 1));
        TIM::regs()
            .ccer
            .modify(|r, w| unsafe { w.bits(r.bits() & !bit) });
    }

    fn enable(&mut self) {
        let bit = 1 << (4 * (C as u32 - 1));
        TIM::regs()
            .ccer
            .modify(|r, w| unsafe { w.bits(r.bits() | bit) });
    }

    fn get_duty(&self) -> u16 {
        let tim = TIM::regs();
        let raw = match C {
            1 => tim.ccr1.read().bits(),
            2 => tim.ccr2.read().bits(),
            3 => tim.ccr3.read().bits(),
            _ => tim.ccr4.read().bits(),
        };
        raw as u16
    }

    fn get_max_duty(&self) -> u16 {
        (TIM::regs().arr.read().bits() as u16).saturating_add(1)
    }

    fn set_duty(&mut self, duty: u16) {
        let tim = TIM::regs();
        let duty = duty as u32;
        match C {
            1 => tim.ccr1.write(|w| unsafe { w.bits(duty) }),
            2 => tim.ccr2.write(|w| unsafe { w.bits(duty) }),
            3 => tim.ccr3.write(|w| unsafe { w.bits(duty) }),
            _ => tim.ccr4.write(|w| unsafe { w.bits(duty) }),
        }
    }
}
