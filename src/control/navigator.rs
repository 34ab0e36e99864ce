// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Checkpoint navigation state machine.
//!
//! The navigator walks a [`Track`] one leg at a time. Each leg is an in-place turn, a straight
//! drive and a brake:
//!
//! ```text
//!  Turning ──► Driving ──► Braking ──► Turning (next leg)
//!                                 └──► Done    (sentinel)
//! ```
//!
//! Every wait polls encoder snapshots in a tight loop. Commands reach the motor-driver board
//! through the [`CommandLink`]. With the default [`NavConfig`] neither the link nor the waits ever
//! give up, so a dead peer or a stalled wheel hangs the navigator where it stands.
//!
//! ```ignore
//! let mut nav = Navigator::new(Track::new(ACTIVE), link, &ENCODERS, delay, NavConfig::default());
//! nav.run()?;
//! ```

use core::fmt::Debug;

use embedded_hal::blocking::{delay::DelayMs, i2c::Write};
use log::{debug, info, trace, warn};
use thiserror::Error;

use crate::config::NavConfig;
use crate::control::differential::Differential;
use crate::protocol::{Command, CommandLink, LinkError};
use crate::sensors::{EncoderCounts, EncoderSource};
use crate::track::{Checkpoint, Track};

/// Phase of the current leg.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Turning,
    Driving,
    Braking,
    Done,
}

/// Everything the navigator remembers between steps.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct NavigationState {
    /// Index of the checkpoint being executed.
    pub cursor: usize,
    /// Baseline subtracted from raw encoder snapshots.
    pub offset: EncoderCounts,
    /// Effective combined count when the current phase started.
    pub start_sum: u32,
    pub phase: Phase,
}

#[derive(Debug, Error)]
pub enum NavError<E: Debug> {
    #[error("command link failed: {0}")]
    Link(#[from] LinkError<E>),

    #[error("stalled in {phase:?} at checkpoint {cursor} after {polls} polls")]
    Stalled {
        cursor: usize,
        phase: Phase,
        polls: u32,
    },
}

/// Encoder ticks (both wheels combined) needed to turn `angle` degrees in place, rounded up.
///
/// Saturates at `u32::MAX` for calibrations too large to represent.
pub fn turn_ticks(angle: i16, ticks_per_degree_centi: u32) -> u32 {
    let scaled = 2 * angle.unsigned_abs() as u64 * ticks_per_degree_centi as u64;
    u32::try_from(scaled.div_ceil(100)).unwrap_or(u32::MAX)
}

pub struct Navigator<'t, B, S, D> {
    track: Track<'t>,
    link: CommandLink<B>,
    encoders: S,
    delay: D,
    config: NavConfig,
    differential: Differential,
    state: NavigationState,
}

impl<'t, B, E, S, D> Navigator<'t, B, S, D>
where
    B: Write<Error = E>,
    E: Debug,
    S: EncoderSource,
    D: DelayMs<u32>,
{
    pub fn new(
        track: Track<'t>,
        link: CommandLink<B>,
        encoders: S,
        delay: D,
        config: NavConfig,
    ) -> Self {
        let phase = if track.get(0).is_sentinel() {
            Phase::Done
        } else {
            Phase::Turning
        };

        Self {
            track,
            link,
            encoders,
            delay,
            differential: Differential::new(
                config.gain,
                config.low_throttle,
                config.high_throttle,
            ),
            config,
            state: NavigationState {
                cursor: 0,
                offset: EncoderCounts::ZERO,
                start_sum: 0,
                phase,
            },
        }
    }

    #[inline]
    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn link(&self) -> &CommandLink<B> {
        &self.link
    }

    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    /// Encoder counts with the current baseline applied.
    pub fn effective_counts(&self) -> EncoderCounts {
        self.encoders.snapshot().since(self.state.offset)
    }

    /// Run the whole track.
    pub fn run(&mut self) -> Result<(), NavError<E>> {
        while self.step()? != Phase::Done {}
        info!("track complete after {} legs", self.state.cursor);
        Ok(())
    }

    /// Carry out the current phase to completion and move to the next one.
    ///
    /// Returns the phase the navigator is in afterwards. Stepping in `Done` does nothing.
    pub fn step(&mut self) -> Result<Phase, NavError<E>> {
        let checkpoint = self.track.get(self.state.cursor);

        let next = match self.state.phase {
            Phase::Done => Phase::Done,
            Phase::Turning if checkpoint.is_sentinel() => Phase::Done,
            Phase::Turning => {
                info!(
                    "checkpoint {}: distance={} angle={}",
                    self.state.cursor, checkpoint.distance, checkpoint.angle
                );
                self.turn(&checkpoint)?;
                Phase::Driving
            }
            Phase::Driving => {
                self.drive(&checkpoint)?;
                Phase::Braking
            }
            Phase::Braking => {
                self.brake()?;
                self.state.cursor += 1;
                if self.track.get(self.state.cursor).is_sentinel() {
                    Phase::Done
                } else {
                    Phase::Turning
                }
            }
        };

        self.state.phase = next;
        Ok(next)
    }

    fn turn(&mut self, cp: &Checkpoint) -> Result<(), NavError<E>> {
        if cp.angle == 0 {
            return Ok(());
        }

        let cmd = if cp.angle > 0 {
            Command::TurnRight
        } else {
            Command::TurnLeft
        };
        let ticks = turn_ticks(cp.angle, self.config.ticks_per_degree_centi);
        self.state.start_sum = self.effective_counts().sum();
        debug!(
            "{:?} {} deg: start={} target={}",
            cmd,
            cp.angle,
            self.state.start_sum,
            self.state.start_sum.wrapping_add(ticks)
        );

        self.link.send(cmd, self.config.turn_throttle)?;
        self.wait_for_travel(ticks, Phase::Turning, |_, _| Ok(()))?;

        let raw = self.encoders.snapshot();
        self.state.offset = self
            .config
            .rebaseline
            .apply(raw, self.state.offset, self.state.start_sum);
        Ok(())
    }

    fn drive(&mut self, cp: &Checkpoint) -> Result<(), NavError<E>> {
        if cp.distance == 0 {
            return Ok(());
        }

        let ticks = 2 * cp.distance as u32;
        self.state.start_sum = self.effective_counts().sum();
        debug!(
            "driving {}: start={} target={}",
            cp.distance,
            self.state.start_sum,
            self.state.start_sum.wrapping_add(ticks)
        );

        self.link.send(Command::Forward, self.config.high_throttle)?;
        self.differential.reset();

        self.wait_for_travel(ticks, Phase::Driving, |nav, counts| {
            if let Some(c) = nav.differential.update(counts.diff()) {
                trace!("correction diff={} -> {:?}", counts.diff(), c);
                nav.link.send(Command::ForwardLeft, c.left)?;
                nav.link.send(Command::ForwardRight, c.right)?;
            }
            Ok(())
        })
    }

    fn brake(&mut self) -> Result<(), NavError<E>> {
        debug!("braking");
        self.link.send(Command::Brake, self.config.brake_magnitude)?;
        self.delay.delay_ms(self.config.brake_time_ms);
        Ok(())
    }

    /// Poll until the combined count has advanced `ticks` past `start_sum`, calling `on_poll`
    /// with every snapshot that falls short.
    fn wait_for_travel<F>(
        &mut self,
        ticks: u32,
        phase: Phase,
        mut on_poll: F,
    ) -> Result<(), NavError<E>>
    where
        F: FnMut(&mut Self, EncoderCounts) -> Result<(), NavError<E>>,
    {
        let mut polls: u32 = 0;

        loop {
            let counts = self.effective_counts();
            if counts.sum().wrapping_sub(self.state.start_sum) >= ticks {
                return Ok(());
            }

            polls = polls.saturating_add(1);
            if let Some(budget) = self.config.poll_budget {
                if polls >= budget.max(1) {
                    warn!(
                        "{:?} stalled at checkpoint {}: sum={} after {} polls",
                        phase,
                        self.state.cursor,
                        counts.sum(),
                        polls
                    );
                    return Err(NavError::Stalled {
                        cursor: self.state.cursor,
                        phase,
                        polls,
                    });
                }
            }

            on_poll(self, counts)?;
        }
    }

    /// Consume the navigator and hand back its resources.
    pub fn free(self) -> (CommandLink<B>, S, D) {
        (self.link, self.encoders, self.delay)
    }
}
