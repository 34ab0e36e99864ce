// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Rover Firmware
//!
//! This crate contains the firmware for a two-wheeled rover built from two STM32F777 boards: a
//! **master** that navigates a pre-programmed track and a **slave** that drives the wheel motors.
//! The boards talk over I²C using two-byte command frames.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`config`] | Tunable constants and the navigator configuration |
//! | [`protocol`] | Command frames, the slave-side parser and the retrying master-side link |
//! | [`sensors`] | Interrupt-fed wheel encoder counters and the analog sensor multiplexer |
//! | [`control`] | Drift correction, encoder re-baselining and the checkpoint navigator |
//! | [`track`] | Checkpoints and the built-in tracks |
//! | [`drivers`] | H-bridge motor driver and scanning servo |
//! | `hw` | MCU-level wrappers around ADC, EXTI, I²C, timers, USART (`board` feature) |
//!
//! ## Getting Started
//!
//! Run the host tests:
//!
//! ```bash
//! cargo test
//! ```
//!
//! Flash the boards:
//!
//! ```bash
//! cargo run --release --features board --bin master
//! cargo run --release --features board --bin slave
//! ```
//!
//! The track is chosen at build time with one of the `square-track` (default), `zigzag-track`,
//! `straight-track` or `spin-track` features.
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//!
//! © 2025–2026 Christopher Liu

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod control;
pub mod drivers;
#[cfg(feature = "board")]
pub mod hw;
pub mod protocol;
pub mod sensors;
pub mod track;
