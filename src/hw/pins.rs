// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Pin definitions for the STM32F777 rover boards.
//!
//! Both boards share the debug USART and the I²C command bus wiring. The master additionally
//! reads the encoders and analog sensors and drives the scanning servo; the slave drives the two
//! H-bridges.

use stm32f7xx_hal::{
    gpio::{
        gpioa, gpiob, gpioc, gpiod, gpioe, Alternate, Analog, Floating, Input, OpenDrain, Output,
        PushPull,
    },
    pac,
    prelude::*,
};

/// ADC1 input behind each rotation index (range1, range2, compass1, compass2, ir1, ir2, ir3).
pub const SENSOR_ADC_INPUTS: [u8; 7] = [3, 4, 5, 6, 10, 11, 12];

pub struct LedPins {
    pub red: gpiod::PD8<Output<PushPull>>,
    pub yellow: gpiod::PD9<Output<PushPull>>,
    pub green: gpiod::PD10<Output<PushPull>>,
}

pub struct Usart1Pins {
    pub tx: gpioa::PA9<Alternate<7>>,
    pub rx: gpioa::PA10<Alternate<7>>,
}

/// I2C1 command bus
pub struct I2c1Pins {
    pub scl: gpiob::PB8<Alternate<4, OpenDrain>>,
    pub sda: gpiob::PB9<Alternate<4, OpenDrain>>,
}

/// Wheel encoder pulse inputs (EXTI0/EXTI1)
pub struct EncoderPins {
    pub left: gpioa::PA0<Input<Floating>>,
    pub right: gpioa::PA1<Input<Floating>>,
}

/// Analog sensor inputs, in rotation order
pub struct SensorPins {
    pub range1: gpioa::PA3<Analog>,   // ADC1_IN3
    pub range2: gpioa::PA4<Analog>,   // ADC1_IN4
    pub compass1: gpioa::PA5<Analog>, // ADC1_IN5
    pub compass2: gpioa::PA6<Analog>, // ADC1_IN6
    pub ir1: gpioc::PC0<Analog>,      // ADC1_IN10
    pub ir2: gpioc::PC1<Analog>,      // ADC1_IN11
    pub ir3: gpioc::PC2<Analog>,      // ADC1_IN12
    pub compass_set: gpioe::PE4<Output<PushPull>>,
}

/// Master board pins. Construct once at startup.
pub struct MasterPins {
    pub leds: LedPins,
    pub usart1: Usart1Pins,
    pub i2c1: I2c1Pins,
    pub encoder: EncoderPins,
    pub sensors: SensorPins,
    pub servo: gpioc::PC6<Alternate<2>>, // TIM3_CH1
}

/// H-bridge inputs on TIM4 CH1..CH4
pub struct MotorPins {
    pub left1: gpiod::PD12<Alternate<2>>,
    pub left2: gpiod::PD13<Alternate<2>>,
    pub right1: gpiod::PD14<Alternate<2>>,
    pub right2: gpiod::PD15<Alternate<2>>,
}

/// Slave board pins. Construct once at startup.
pub struct SlavePins {
    pub leds: LedPins,
    pub usart1: Usart1Pins,
    pub i2c1: I2c1Pins,
    pub motors: MotorPins,
}

impl MasterPins {
    pub fn new(
        gpioa: pac::GPIOA,
        gpiob: pac::GPIOB,
        gpioc: pac::GPIOC,
        gpiod: pac::GPIOD,
        gpioe: pac::GPIOE,
    ) -> Self {
        let gpioa = gpioa.split();
        let gpiob = gpiob.split();
        let gpioc = gpioc.split();
        let gpiod = gpiod.split();
        let gpioe = gpioe.split();

        Self {
            leds: LedPins {
                red: gpiod.pd8.into_push_pull_output(),
                yellow: gpiod.pd9.into_push_pull_output(),
                green: gpiod.pd10.into_push_pull_output(),
            },

            usart1: Usart1Pins {
                tx: gpioa.pa9.into_alternate::<7>(),
                rx: gpioa.pa10.into_alternate::<7>(),
            },

            i2c1: I2c1Pins {
                scl: gpiob.pb8.into_alternate_open_drain::<4>(),
                sda: gpiob.pb9.into_alternate_open_drain::<4>(),
            },

            encoder: EncoderPins {
                left: gpioa.pa0.into_floating_input(),
                right: gpioa.pa1.into_floating_input(),
            },

            sensors: SensorPins {
                range1: gpioa.pa3.into_analog(),
                range2: gpioa.pa4.into_analog(),
                compass1: gpioa.pa5.into_analog(),
                compass2: gpioa.pa6.into_analog(),
                ir1: gpioc.pc0.into_analog(),
                ir2: gpioc.pc1.into_analog(),
                ir3: gpioc.pc2.into_analog(),
                compass_set: gpioe.pe4.into_push_pull_output(),
            },

            servo: gpioc.pc6.into_alternate::<2>(),
        }
    }
}

impl SlavePins {
    pub fn new(gpioa: pac::GPIOA, gpiob: pac::GPIOB, gpiod: pac::GPIOD) -> Self {
        let gpioa = gpioa.split();
        let gpiob = gpiob.split();
        let gpiod = gpiod.split();

        Self {
            leds: LedPins {
                red: gpiod.pd8.into_push_pull_output(),
                yellow: gpiod.pd9.into_push_pull_output(),
                green: gpiod.pd10.into_push_pull_output(),
            },

            usart1: Usart1Pins {
                tx: gpioa.pa9.into_alternate::<7>(),
                rx: gpioa.pa10.into_alternate::<7>(),
            },

            i2c1: I2c1Pins {
                scl: gpiob.pb8.into_alternate_open_drain::<4>(),
                sda: gpiob.pb9.into_alternate_open_drain::<4>(),
            },

            motors: MotorPins {
                left1: gpiod.pd12.into_alternate::<2>(),
                left2: gpiod.pd13.into_alternate::<2>(),
                right1: gpiod.pd14.into_alternate::<2>(),
                right2: gpiod.pd15.into_alternate::<2>(),
            },
        }
    }
}
