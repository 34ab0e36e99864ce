// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Checkpoint and track types.

/// Turn direction for [`Checkpoint::with_direction`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Direction {
    Straight = 0,
    Left = 1,
    Right = 2,
}

impl Direction {
    /// Decode the numeric direction used in track tables. Unknown values read as `Straight`.
    pub const fn from_u8(raw: u8) -> Self {
        match raw {
            1 => Direction::Left,
            2 => Direction::Right,
            _ => Direction::Straight,
        }
    }
}

/// One leg of a track: turn by `angle`, then drive `distance`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Checkpoint {
    /// Encoder ticks per wheel to drive after turning.
    pub distance: u16,
    /// Degrees to turn before driving. Positive turns right, negative turns left.
    pub angle: i16,
    /// Safe turning radius around the checkpoint. Carried, not used.
    pub radius: u8,
    /// Bitfield of sensors trusted near the checkpoint. Carried, not used.
    pub sensor_flags: u8,
}

impl Checkpoint {
    /// End-of-track marker.
    pub const SENTINEL: Checkpoint = Checkpoint::new(0, 0);

    pub const fn new(distance: u16, angle: i16) -> Self {
        Self {
            distance,
            angle,
            radius: 0,
            sensor_flags: 0,
        }
    }

    /// Build a checkpoint from an unsigned angle and an explicit direction.
    ///
    /// Angles beyond `i16::MAX` saturate. `Straight` discards the angle.
    pub const fn with_direction(distance: u16, angle: u16, direction: Direction) -> Self {
        let magnitude = if angle > i16::MAX as u16 {
            i16::MAX
        } else {
            angle as i16
        };
        let angle = match direction {
            Direction::Straight => 0,
            Direction::Left => -magnitude,
            Direction::Right => magnitude,
        };
        Self::new(distance, angle)
    }

    pub const fn with_radius(mut self, radius: u8) -> Self {
        self.radius = radius;
        self
    }

    pub const fn with_sensor_flags(mut self, flags: u8) -> Self {
        self.sensor_flags = flags;
        self
    }

    #[inline]
    pub const fn is_sentinel(&self) -> bool {
        self.distance == 0 && self.angle == 0
    }

    /// Direction of the turn at the start of this leg.
    pub const fn direction(&self) -> Direction {
        if self.angle > 0 {
            Direction::Right
        } else if self.angle < 0 {
            Direction::Left
        } else {
            Direction::Straight
        }
    }
}

/// Ordered checkpoint sequence, terminated by the first sentinel or the end of the slice.
#[derive(Copy, Clone, Debug)]
pub struct Track<'t> {
    checkpoints: &'t [Checkpoint],
}

impl<'t> Track<'t> {
    pub const fn new(checkpoints: &'t [Checkpoint]) -> Self {
        Self { checkpoints }
    }

    /// Checkpoint at `index`. Past the end this reads as the sentinel.
    pub fn get(&self, index: usize) -> Checkpoint {
        self.checkpoints
            .get(index)
            .copied()
            .unwrap_or(Checkpoint::SENTINEL)
    }

    /// Executable legs, up to the first sentinel.
    pub fn legs(&self) -> impl Iterator<Item = &'t Checkpoint> + 't {
        self.checkpoints.iter().take_while(|c| !c.is_sentinel())
    }

    /// Number of executable legs.
    pub fn len(&self) -> usize {
        self.legs().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
