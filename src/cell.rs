/*
cell.rs

Copyright 2025 Hervé Quatremain

This file is part of Pipenet.

Pipenet is free software: you can redistribute it and/or modify it under the
terms of the GNU General Public License as published by the Free Software
Foundation, either version 3 of the License, or (at your option) any later
version.

Pipenet is distributed in the hope that it will be useful, but WITHOUT ANY
WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
A PARTICULAR PURPOSE. See the GNU General Public License for more details.

You should have received a copy of the GNU General Public License along with
Pipenet. If not, see <https://www.gnu.org/licenses/>.

SPDX-License-Identifier: GPL-3.0-or-later
*/

//! Grid cells and their rotation animation.
//!
//! A rotation changes the [`Pipe`] of the cell immediately, but the cell stays in the
//! [`Rotation::Rotating`] state for [`ROTATION_TIME`] milliseconds so that the display can
//! animate the quarter turn.
//! While a cell is rotating, the tracer considers it disconnected.

use serde::{Deserialize, Serialize};

use crate::pipe::Pipe;

/// Duration of a quarter turn animation, in milliseconds.
pub const ROTATION_TIME: u64 = 300;

/// Object placed on a cell.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum CellObject {
    #[default]
    Empty,
    /// The power source. A level has exactly one sender.
    Sender,
    /// A cell that must be powered to solve the level.
    Receiver,
}

/// Rotation animation state.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum Rotation {
    #[default]
    Idle,
    Rotating {
        /// Time when the current quarter turn ends.
        ends_at: u64,
        /// Pipe before the current quarter turn started. The animation goes from this pipe to
        /// the live pipe of the cell.
        from: Pipe,
        /// Direction of the current quarter turn.
        clockwise: bool,
        /// Whether a second quarter turn in the same direction follows the current one.
        twice: bool,
    },
}

/// Result of [`Cell::update`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CellUpdate {
    /// No animation ended.
    Unchanged,
    /// A quarter turn ended and the queued one started.
    RotationInProgress,
    /// The animation ended.
    RotationComplete,
}

/// Cell of a level.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Cell {
    pub(crate) object: CellObject,
    pub(crate) active: bool,
    pub(crate) locked: bool,
    pub(crate) pipe: Pipe,
    pub(crate) rotation: Rotation,
}

impl Cell {
    /// Return the object on the cell.
    pub fn object(&self) -> CellObject {
        self.object
    }

    /// Whether the cell is powered by the sender.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether the player locked the cell.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Return the live pipe. During an animation, this is the pipe at the end of the quarter
    /// turn.
    pub fn pipe(&self) -> Pipe {
        self.pipe
    }

    /// Return the animation state.
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Whether an animation is pending.
    pub fn is_rotating(&self) -> bool {
        matches!(self.rotation, Rotation::Rotating { .. })
    }

    /// Toggle the lock.
    pub fn reverse_lock(&mut self) {
        self.locked = !self.locked;
    }

    /// Advance the animation to the given time.
    pub fn update(&mut self, now: u64) -> CellUpdate {
        let Rotation::Rotating {
            ends_at,
            clockwise,
            twice,
            ..
        } = self.rotation
        else {
            return CellUpdate::Unchanged;
        };

        if now < ends_at {
            return CellUpdate::Unchanged;
        }

        if twice {
            self.rotation = Rotation::Rotating {
                ends_at: now + ROTATION_TIME,
                from: self.pipe,
                clockwise,
                twice: false,
            };
            self.pipe.rotate(clockwise);
            CellUpdate::RotationInProgress
        } else {
            self.rotation = Rotation::Idle;
            CellUpdate::RotationComplete
        }
    }

    /// Start, extend, or reverse a quarter turn.
    ///
    /// - When the cell is idle, a quarter turn starts.
    /// - When the cell is already turning in the same direction, a second quarter turn is queued.
    /// - When the cell is turning in the other direction, the queued quarter turn is cancelled,
    ///   or, if there is none, the current quarter turn is reversed from the angle already
    ///   reached: the time left to go back equals the time already spent.
    ///
    /// Return `false` when the cell is locked, in which case nothing changes.
    pub fn rotate(&mut self, clockwise: bool, now: u64) -> bool {
        if self.locked {
            return false;
        }

        let Rotation::Rotating {
            ends_at,
            clockwise: current,
            twice,
            ..
        } = self.rotation
        else {
            self.rotation = Rotation::Rotating {
                ends_at: now + ROTATION_TIME,
                from: self.pipe,
                clockwise,
                twice: false,
            };
            self.pipe.rotate(clockwise);
            return true;
        };

        if current == clockwise {
            self.set_twice(true);
        } else if twice {
            self.set_twice(false);
        } else {
            let remaining: u64 = ends_at.saturating_sub(now).min(ROTATION_TIME);
            let elapsed: u64 = ROTATION_TIME - remaining;
            self.rotation = Rotation::Rotating {
                ends_at: now + elapsed,
                from: self.pipe,
                clockwise,
                twice: false,
            };
            self.pipe.rotate(clockwise);
        }
        true
    }

    fn set_twice(&mut self, value: bool) {
        if let Rotation::Rotating { twice, .. } = &mut self.rotation {
            *twice = value;
        }
    }

    /// Fraction of the current quarter turn already done, or [`None`] if the cell is idle.
    pub fn rotation_progress(&self, now: u64) -> Option<f32> {
        match self.rotation {
            Rotation::Idle => None,
            Rotation::Rotating { ends_at, .. } => {
                let remaining: u64 = ends_at.saturating_sub(now).min(ROTATION_TIME);
                Some(1.0 - remaining as f32 / ROTATION_TIME as f32)
            }
        }
    }

    /// On-screen angle of the pipe in degrees, in the range `0..360`.
    pub fn display_angle(&self, now: u64) -> f32 {
        match self.rotation {
            Rotation::Idle => self.pipe.angle() as f32,
            Rotation::Rotating {
                from, clockwise, ..
            } => {
                let progress: f32 = self.rotation_progress(now).unwrap_or(1.0);
                let delta: f32 = if clockwise { 90.0 } else { -90.0 };
                (from.angle() as f32 + delta * progress).rem_euclid(360.0)
            }
        }
    }
}
