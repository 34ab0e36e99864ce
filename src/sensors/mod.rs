// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Sensor Acquisition
//!
//! Interrupt-fed sensor state shared with the navigation loop.
//!
//! - [`encoders`] - Left/right wheel tick counters.
//! - [`mux`] - Round-robin ADC multiplexer for range, compass and IR inputs.

pub mod encoders;
pub mod mux;

pub use encoders::{EncoderAccumulator, EncoderCounts, EncoderSource};
pub use mux::{AdcRead, AdcRotation, Channel, SensorMux, SensorSnapshot};
