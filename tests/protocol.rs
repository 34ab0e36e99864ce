// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Master-to-motor-board loopback.
//!
//! Frames leave through the master's [`CommandLink`], are reassembled byte by byte by the
//! motor-driver [`Parser`] and land on a [`MotorDriver`] with simulated PWM outputs.
//!
//! Run with: `cargo test --test protocol`

use embedded_hal::{blocking::i2c::Write, PwmPin};
use rover::config::MOTOR_DRIVER_ADDR;
use rover::drivers::{HBridge, MotorDriver};
use rover::protocol::{Command, CommandLink, LinkError, Parser, RetryPolicy};

// ============================================================================
// Simulated motor board
// ============================================================================

const MAX_DUTY: u16 = 800;

struct SimPwm {
    duty: u16,
}

impl PwmPin for SimPwm {
    type Duty = u16;

    fn disable(&mut self) {}

    fn enable(&mut self) {}

    fn get_duty(&self) -> u16 {
        self.duty
    }

    fn get_max_duty(&self) -> u16 {
        MAX_DUTY
    }

    fn set_duty(&mut self, duty: u16) {
        self.duty = duty;
    }
}

fn bridge() -> HBridge<SimPwm, SimPwm> {
    HBridge::new(SimPwm { duty: 0 }, SimPwm { duty: 0 })
}

#[derive(Debug, PartialEq)]
struct Nack;

/// I²C target at `addr` feeding a parser and motor driver, one byte at a time.
struct MotorBoard {
    addr: u8,
    parser: Parser,
    driver: MotorDriver<SimPwm, SimPwm, SimPwm, SimPwm>,
}

impl MotorBoard {
    fn new(addr: u8) -> Self {
        Self {
            addr,
            parser: Parser::new(),
            driver: MotorDriver::new(bridge(), bridge()),
        }
    }

    fn duties(&self) -> [(u16, u16); 2] {
        [self.driver.left().duties(), self.driver.right().duties()]
    }
}

impl Write for MotorBoard {
    type Error = Nack;

    fn write(&mut self, addr: u8, bytes: &[u8]) -> Result<(), Nack> {
        if addr != self.addr {
            return Err(Nack);
        }
        for &b in bytes {
            self.parser.push(b);
        }
        if let Some(frame) = self.parser.end_transaction() {
            self.driver.apply(frame);
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn commands_reach_the_bridges() {
    let mut link = CommandLink::new(MotorBoard::new(MOTOR_DRIVER_ADDR), MOTOR_DRIVER_ADDR);

    link.send(Command::Forward, 255).unwrap();
    assert_eq!(link.bus().duties(), [(800, 0), (800, 0)]);

    link.send(Command::ForwardLeft, 200).unwrap();
    link.send(Command::ForwardRight, 255).unwrap();
    assert_eq!(link.bus().duties(), [(627, 0), (800, 0)]);

    link.send(Command::TurnRight, 255).unwrap();
    assert_eq!(link.bus().duties(), [(800, 0), (0, 800)]);

    link.send(Command::Brake, 255).unwrap();
    assert_eq!(link.bus().duties(), [(800, 800), (800, 800)]);

    assert_eq!(link.bus().driver.applied(), 5);
    assert_eq!(link.bus().parser.dropped(), 0);
    assert_eq!(link.stats().sent, 5);
}

#[test]
fn malformed_transactions_leave_motors_alone() {
    let mut board = MotorBoard::new(MOTOR_DRIVER_ADDR);
    board.write(MOTOR_DRIVER_ADDR, &[6, 255]).unwrap();

    // Short, long and unknown-code payloads are all dropped.
    board.write(MOTOR_DRIVER_ADDR, &[3]).unwrap();
    board.write(MOTOR_DRIVER_ADDR, &[3, 255, 0]).unwrap();
    board.write(MOTOR_DRIVER_ADDR, &[0x42, 10]).unwrap();

    assert_eq!(board.parser.dropped(), 3);
    assert_eq!(board.driver.applied(), 1);
    assert_eq!(board.duties(), [(800, 0), (800, 0)]);

    // The next good frame still goes through.
    board.write(MOTOR_DRIVER_ADDR, &[9, 51]).unwrap();
    assert_eq!(board.duties(), [(0, 160), (0, 160)]);
}

#[test]
fn wrong_address_is_never_acknowledged() {
    let mut link = CommandLink::new(MotorBoard::new(0x22), MOTOR_DRIVER_ADDR)
        .with_policy(RetryPolicy::Bounded(4));

    match link.send(Command::Forward, 255) {
        Err(LinkError::Unacknowledged { attempts, last }) => {
            assert_eq!(attempts, 4);
            assert_eq!(last, Nack);
        }
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(link.bus().driver.applied(), 0);
    assert_eq!(link.stats().failed, 1);
}
