// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Master side of the command bus.
//!
//! [`CommandLink`] pushes two-byte frames to the motor-driver board over any bus implementing the
//! blocking `embedded-hal` I²C write trait. A write that is not acknowledged is retried, whole
//! frame at a time. By default it retries forever: an absent peer stalls the master rather than
//! letting it drive on without actuation.

use embedded_hal::blocking::i2c::Write;
use log::{debug, trace, warn};
use thiserror::Error;

use crate::protocol::messages::{Command, Frame};

/// How many times a frame is attempted before giving up.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RetryPolicy {
    /// Keep retrying until the peer acknowledges.
    Forever,
    /// Give up after this many attempts (at least one is always made).
    Bounded(u32),
}

/// A frame that could not be delivered under [`RetryPolicy::Bounded`].
#[derive(Debug, Error)]
pub enum LinkError<E: core::fmt::Debug> {
    #[error("peer did not acknowledge after {attempts} attempts")]
    Unacknowledged { attempts: u32, last: E },
}

/// Delivery counters, for telemetry.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LinkStats {
    /// Frames acknowledged by the peer.
    pub sent: u32,
    /// Extra attempts spent on frames that were not acknowledged first time.
    pub retries: u32,
    /// Frames abandoned under a bounded policy.
    pub failed: u32,
}

pub struct CommandLink<B> {
    bus: B,
    addr: u8,
    policy: RetryPolicy,
    stats: LinkStats,
}

impl<B, E> CommandLink<B>
where
    B: Write<Error = E>,
    E: core::fmt::Debug,
{
    /// Create a link to the peer at 7-bit address `addr`, retrying forever.
    pub fn new(bus: B, addr: u8) -> Self {
        Self {
            bus,
            addr,
            policy: RetryPolicy::Forever,
            stats: LinkStats::default(),
        }
    }

    /// Replace the retry policy.
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Send `cmd` with throttle `value`, blocking until the peer acknowledges.
    ///
    /// Under [`RetryPolicy::Forever`] this only returns `Ok`.
    pub fn send(&mut self, cmd: Command, value: u8) -> Result<(), LinkError<E>> {
        let bytes = Frame::new(cmd, value).to_bytes();
        let mut attempts: u32 = 0;

        loop {
            attempts = attempts.saturating_add(1);

            match self.bus.write(self.addr, &bytes) {
                Ok(()) => {
                    self.stats.sent = self.stats.sent.wrapping_add(1);
                    debug!("cmd {:?} value={} attempts={}", cmd, value, attempts);
                    return Ok(());
                }
                Err(e) => {
                    trace!("cmd {:?} not acknowledged: {:?}", cmd, e);

                    if let RetryPolicy::Bounded(max) = self.policy {
                        if attempts >= max.max(1) {
                            self.stats.failed = self.stats.failed.wrapping_add(1);
                            warn!("cmd {:?} dropped after {} attempts", cmd, attempts);
                            return Err(LinkError::Unacknowledged { attempts, last: e });
                        }
                    }

                    self.stats.retries = self.stats.retries.wrapping_add(1);
                }
            }
        }
    }

    #[inline]
    pub fn stats(&self) -> LinkStats {
        self.stats
    }

    #[inline]
    pub fn addr(&self) -> u8 {
        self.addr
    }

    /// Access the underlying bus.
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Consume the link and return the bus.
    pub fn free(self) -> B {
        self.bus
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Nack;

    /// Bus that NACKs the first `failures` writes and records what it sends.
    struct FlakyBus {
        failures: u32,
        writes: u32,
        delivered: Vec<(u8, [u8; 2])>,
    }

    impl FlakyBus {
        fn new(failures: u32) -> Self {
            Self {
                failures,
                writes: 0,
                delivered: Vec::new(),
            }
        }
    }

    impl Write for FlakyBus {
        type Error = Nack;

        fn write(&mut self, addr: u8, bytes: &[u8]) -> Result<(), Nack> {
            self.writes += 1;
            if self.failures > 0 {
                self.failures -= 1;
                return Err(Nack);
            }
            self.delivered.push((addr, [bytes[0], bytes[1]]));
            Ok(())
        }
    }

    #[test]
    fn delivers_code_and_value_to_peer() {
        let mut link = CommandLink::new(FlakyBus::new(0), 0x5A);
        link.send(Command::ForwardLeft, 0xFF).unwrap();

        assert_eq!(link.bus().delivered, vec![(0x5A, [0x01, 0xFF])]);
        assert_eq!(link.stats().sent, 1);
        assert_eq!(link.stats().retries, 0);
    }

    #[test]
    fn retries_until_acknowledged() {
        let mut link = CommandLink::new(FlakyBus::new(25), 0x5A);
        link.send(Command::Brake, 255).unwrap();

        let bus = link.bus();
        assert_eq!(bus.writes, 26);
        assert_eq!(bus.delivered, vec![(0x5A, [0x03, 0xFF])]);
        assert_eq!(link.stats().retries, 25);
    }

    #[test]
    fn bounded_policy_reports_unacknowledged() {
        let mut link =
            CommandLink::new(FlakyBus::new(10), 0x5A).with_policy(RetryPolicy::Bounded(3));

        match link.send(Command::Forward, 200) {
            Err(LinkError::Unacknowledged { attempts, last }) => {
                assert_eq!(attempts, 3);
                assert_eq!(last, Nack);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(link.stats().failed, 1);
        assert!(link.bus().delivered.is_empty());
    }

    #[test]
    fn bounded_policy_still_delivers_within_budget() {
        let mut link =
            CommandLink::new(FlakyBus::new(2), 0x5A).with_policy(RetryPolicy::Bounded(3));
        link.send(Command::TurnLeft, 128).unwrap();
        assert_eq!(link.bus().delivered, vec![(0x5A, [0x08, 128])]);
    }
}
