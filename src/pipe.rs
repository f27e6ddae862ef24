/*
pipe.rs

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

//! Pipe shapes.
//!
//! A [`Pipe`] is the set of the cell sides that the pipe connects, stored as a 4-bit mask (bit 0
//! is [`Side::Top`], then clockwise).
//! The [`PipeType`] shape is derived from that mask and is always kept consistent with it.

use serde::{Deserialize, Serialize};
use strum_macros::FromRepr;

/// Cell side. The discriminant is the bit position in the [`Pipe`] mask.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash, FromRepr)]
#[repr(u8)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    /// All the sides, clockwise from the top.
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

    /// Mask of the side in a [`Pipe`] bitset.
    pub fn bit(self) -> u8 {
        1 << self as u8
    }

    /// Side facing this one in the adjacent cell.
    pub fn opposite(self) -> Side {
        Side::from_repr((self as u8 + 2) % 4).unwrap_or(self)
    }

    /// Next side when turning in the given direction.
    pub fn turn(self, clockwise: bool) -> Side {
        let step: u8 = if clockwise { 1 } else { 3 };
        Side::from_repr((self as u8 + step) % 4).unwrap_or(self)
    }
}

/// Pipe shape, derived from the number and the layout of the connected sides.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum PipeType {
    /// No connection (or a four-way cross, which the generator never produces).
    #[default]
    None,
    /// Dead end: one side.
    Half,
    /// Two adjacent sides.
    Bent,
    /// Two opposite sides.
    Straight,
    /// Three sides.
    Fork,
}

impl PipeType {
    /// Compute the type of the given side mask.
    fn from_sides(sides: u8) -> Self {
        match sides.count_ones() {
            1 => PipeType::Half,
            2 if sides == 0b0101 || sides == 0b1010 => PipeType::Straight,
            2 => PipeType::Bent,
            3 => PipeType::Fork,
            _ => PipeType::None,
        }
    }
}

/// Pipe in a cell.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Pipe {
    sides: u8,
    pipe_type: PipeType,
}

impl Pipe {
    /// Create a [`Pipe`] object from a side mask. Only the four lower bits are kept.
    pub fn from_bits(sides: u8) -> Self {
        let sides: u8 = sides & 0xF;
        Self {
            sides,
            pipe_type: PipeType::from_sides(sides),
        }
    }

    /// Return the side mask.
    pub fn sides(&self) -> u8 {
        self.sides
    }

    /// Return the shape of the pipe.
    pub fn pipe_type(&self) -> PipeType {
        self.pipe_type
    }

    /// Whether the pipe has no connection.
    pub fn is_empty(&self) -> bool {
        self.sides == 0
    }

    /// Whether the pipe connects the given side.
    pub fn has(&self, side: Side) -> bool {
        self.sides & side.bit() != 0
    }

    /// Iterate over the connected sides, clockwise from the top.
    pub fn connected(&self) -> impl Iterator<Item = Side> + '_ {
        Side::ALL.into_iter().filter(|s| self.has(*s))
    }

    /// Connect a side.
    pub fn set(&mut self, side: Side) {
        self.sides |= side.bit();
        self.pipe_type = PipeType::from_sides(self.sides);
    }

    /// Rotate the pipe by a quarter turn. The shape does not change.
    pub fn rotate(&mut self, clockwise: bool) {
        self.sides = if clockwise {
            ((self.sides << 1) | (self.sides >> 3)) & 0xF
        } else {
            ((self.sides >> 1) | (self.sides << 3)) & 0xF
        };
    }

    /// Orientation of the pipe in degrees, relative to the reference drawing of its shape.
    ///
    /// The reference drawings are: half pipe going up, straight pipe going from top to bottom,
    /// bent pipe from top to right, and fork with the top, right, and bottom sides.
    pub fn angle(&self) -> u16 {
        match (self.pipe_type, self.sides) {
            (PipeType::Half, 0b0010) => 90,
            (PipeType::Half, 0b0100) => 180,
            (PipeType::Half, 0b1000) => 270,
            (PipeType::Straight, 0b1010) => 90,
            (PipeType::Bent, 0b0110) => 90,
            (PipeType::Bent, 0b1100) => 180,
            (PipeType::Bent, 0b1001) => 270,
            (PipeType::Fork, 0b1110) => 90,
            (PipeType::Fork, 0b1101) => 180,
            (PipeType::Fork, 0b1011) => 270,
            _ => 0,
        }
    }

    /// Box-drawing character for text output.
    pub fn glyph(&self) -> char {
        const GLYPHS: [char; 16] = [
            ' ', '╵', '╶', '└', '╷', '│', '┌', '├', '╴', '┘', '─', '┴', '┐', '┤', '┬', '┼',
        ];
        GLYPHS[self.sides as usize]
    }
}
