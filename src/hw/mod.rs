// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Board Support
//!
//! MCU-level wrappers for the STM32F777 boards. Only built with the `board` feature.
//!
//! - [`adc`] - ADC1 sensor rotation
//! - [`encoder`] - EXTI edge inputs for the wheel encoders
//! - [`i2c`] - I²C1 target for the motor-driver board
//! - [`logger`] - `log` backend on the debug USART
//! - [`pins`] - Pin assignments
//! - [`pwm`] - TIM3/TIM4 PWM outputs
//! - [`usart`] - Debug terminal

pub mod adc;
pub mod encoder;
pub mod i2c;
pub mod logger;
pub mod pins;
pub mod pwm;
pub mod usart;

pub use adc::SensorAdc;
pub use encoder::EncoderEdges;
pub use i2c::{I2cTarget, TargetEvent};
pub use pins::{MasterPins, SlavePins};
pub use pwm::{Pwm, PwmChannel};
pub use usart::Usart;
