// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Simulated rover for navigation tests.
//!
//! One shared plant stands in for the command bus, the motor-driver board, the wheels and their
//! encoders. Every accepted frame changes which wheels are powered; every encoder snapshot first
//! advances each powered wheel by its tick rate.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use embedded_hal::blocking::{delay::DelayMs, i2c::Write};
use rover::protocol::{Command, Frame};
use rover::sensors::{EncoderCounts, EncoderSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nack;

#[derive(Default)]
struct Plant {
    counts: EncoderCounts,
    left_on: bool,
    right_on: bool,
    /// Ticks per snapshot of a powered wheel.
    rate: u32,
    /// Every `n`th snapshot the left wheel gains one extra tick.
    left_slip_every: Option<u32>,
    snapshots: u32,
    /// Writes still to be NACKed; `u32::MAX` NACKs forever.
    nacks: u32,
    writes: u32,
    /// Accepted commands with the wheel counts at the moment they arrived.
    commands: Vec<(Command, u8, EncoderCounts)>,
    delayed_ms: u32,
}

/// Handle to the shared plant. Cheap to clone; every view sees the same rover.
#[derive(Clone)]
pub struct SimRover {
    plant: Rc<RefCell<Plant>>,
}

impl SimRover {
    /// Rover whose powered wheels each advance one tick per snapshot.
    pub fn new() -> Self {
        Self::with_rate(1)
    }

    pub fn with_rate(rate: u32) -> Self {
        Self {
            plant: Rc::new(RefCell::new(Plant {
                rate,
                ..Plant::default()
            })),
        }
    }

    /// Wheels that never turn, whatever the command.
    pub fn stalled() -> Self {
        Self::with_rate(0)
    }

    /// Make the left wheel run fast by one tick every `n` snapshots.
    pub fn left_slip_every(self, n: u32) -> Self {
        self.plant.borrow_mut().left_slip_every = Some(n);
        self
    }

    /// NACK the next `n` bus writes.
    pub fn nack_next(self, n: u32) -> Self {
        self.plant.borrow_mut().nacks = n;
        self
    }

    /// NACK every bus write.
    pub fn peer_absent(self) -> Self {
        self.nack_next(u32::MAX)
    }

    pub fn bus(&self) -> SimBus {
        SimBus(self.clone())
    }

    pub fn encoders(&self) -> SimEncoders {
        SimEncoders(self.clone())
    }

    pub fn delay(&self) -> SimDelay {
        SimDelay(self.clone())
    }

    /// Commands the motor-driver board accepted, in order.
    pub fn commands(&self) -> Vec<(Command, u8)> {
        self.command_log().into_iter().map(|(c, v, _)| (c, v)).collect()
    }

    /// Accepted commands with the wheel counts at the moment each arrived.
    pub fn command_log(&self) -> Vec<(Command, u8, EncoderCounts)> {
        self.plant.borrow().commands.clone()
    }

    /// Accepted commands without their throttle values.
    pub fn command_codes(&self) -> Vec<Command> {
        self.commands().into_iter().map(|(c, _)| c).collect()
    }

    pub fn counts(&self) -> EncoderCounts {
        self.plant.borrow().counts
    }

    pub fn writes(&self) -> u32 {
        self.plant.borrow().writes
    }

    pub fn delayed_ms(&self) -> u32 {
        self.plant.borrow().delayed_ms
    }

    pub fn snapshots(&self) -> u32 {
        self.plant.borrow().snapshots
    }
}

pub struct SimBus(SimRover);

impl Write for SimBus {
    type Error = Nack;

    fn write(&mut self, addr: u8, bytes: &[u8]) -> Result<(), Nack> {
        let mut p = self.0.plant.borrow_mut();
        p.writes += 1;

        if addr != rover::config::MOTOR_DRIVER_ADDR {
            return Err(Nack);
        }
        if p.nacks > 0 {
            if p.nacks != u32::MAX {
                p.nacks -= 1;
            }
            return Err(Nack);
        }

        let frame = Frame::from_bytes(bytes).map_err(|_| Nack)?;
        let on = frame.value > 0;
        match frame.command {
            Command::Forward | Command::Reverse | Command::TurnLeft | Command::TurnRight => {
                p.left_on = on;
                p.right_on = on;
            }
            Command::ForwardLeft | Command::ReverseLeft => p.left_on = on,
            Command::ForwardRight | Command::ReverseRight => p.right_on = on,
            Command::Brake => {
                p.left_on = false;
                p.right_on = false;
            }
        }
        let counts = p.counts;
        p.commands.push((frame.command, frame.value, counts));
        Ok(())
    }
}

pub struct SimEncoders(SimRover);

impl EncoderSource for SimEncoders {
    fn snapshot(&self) -> EncoderCounts {
        let mut p = self.0.plant.borrow_mut();
        p.snapshots += 1;

        let rate = p.rate;
        if p.left_on {
            p.counts.left += rate;
            if let Some(n) = p.left_slip_every {
                if p.snapshots % n == 0 {
                    p.counts.left += 1;
                }
            }
        }
        if p.right_on {
            p.counts.right += rate;
        }
        p.counts
    }
}

pub struct SimDelay(SimRover);

impl DelayMs<u32> for SimDelay {
    fn delay_ms(&mut self, ms: u32) {
        self.0.plant.borrow_mut().delayed_ms += ms;
    }
}
