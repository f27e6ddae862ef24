/*
level.rs

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

//! Level grid.
//!
//! A [`Level`] is a rectangular grid of [`Cell`] objects stored row by row.
//! The grid is optionally toroidal ("wrap" mode): in that mode, the cells on an edge are adjacent
//! to the cells on the opposite edge.
//!
//! The [`Level`] object is created empty by [`Level::new`], and then filled by
//! [`Level::generate`] (see [`crate::generator`]).
//! The player changes the pipes only through [`Level::rotate`] and [`Level::reset`], and each
//! change runs the connectivity tracer again (see [`crate::trace`]).

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::cell::{Cell, CellObject, Rotation};
use crate::pipe::{Pipe, Side};
use crate::prng::Prng;

/// Character for the dump code `0`.
const DUMP_BASE: u8 = b'A';

/// Bit of the lock flag in a dump code.
const DUMP_LOCK_BIT: u8 = 0x10;

/// Grid coordinates. Positions are ordered row by row.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Chebyshev (king move) distance, ignoring the wrap mode.
    pub fn chebyshev(&self, other: &Position) -> usize {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.y, self.x).cmp(&(other.y, other.x))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Level status flags, refreshed by each tracer run.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct LevelState {
    /// All the receivers are powered.
    pub level_complete: bool,

    /// At least one cell is still rotating.
    pub rotation_active: bool,

    /// At least one cell finished rotating during the last update.
    pub rotation_complete: bool,
}

/// Level object.
#[derive(Debug, Clone)]
pub struct Level {
    /// Level identifier, which is the PRNG seed used to generate the level.
    pub(crate) id: u64,

    pub(crate) width: usize,
    pub(crate) height: usize,

    /// Whether the grid wraps around its edges.
    pub(crate) wrap: bool,

    /// Position of the only sender.
    pub(crate) sender: Position,

    /// Cells, row by row.
    pub(crate) cells: Vec<Cell>,

    /// Positions of the receivers, in creation order.
    pub(crate) receivers: Vec<Position>,

    /// Status flags.
    pub state: LevelState,
}

impl Level {
    /// Create an empty [`Level`] object.
    ///
    /// # Panics
    ///
    /// The method panics if the width or the height is zero.
    pub fn new(id: u64, width: usize, height: usize, wrap: bool) -> Self {
        assert!(width > 0 && height > 0, "empty {width}x{height} grid");
        Self {
            id,
            width,
            height,
            wrap,
            sender: Position::default(),
            cells: vec![Cell::default(); width * height],
            receivers: Vec::new(),
            state: LevelState::default(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Change the identifier. The content is not regenerated.
    pub fn set_id(&mut self, id: u64) {
        self.id = id;
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn wrap(&self) -> bool {
        self.wrap
    }

    pub fn sender(&self) -> Position {
        self.sender
    }

    pub fn receivers(&self) -> &[Position] {
        &self.receivers
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Index of the given position in the cell vector.
    ///
    /// # Panics
    ///
    /// The method panics if the position is outside the grid.
    pub fn index(&self, pos: Position) -> usize {
        assert!(
            pos.x < self.width && pos.y < self.height,
            "position {pos} outside the {}x{} grid",
            self.width,
            self.height
        );
        pos.y * self.width + pos.x
    }

    pub fn get_cell(&self, pos: Position) -> &Cell {
        &self.cells[self.index(pos)]
    }

    pub fn get_cell_mut(&mut self, pos: Position) -> &mut Cell {
        let i: usize = self.index(pos);
        &mut self.cells[i]
    }

    /// Iterate over all the positions, row by row.
    pub fn positions(&self) -> impl Iterator<Item = Position> + use<> {
        let width: usize = self.width;
        (0..self.height).flat_map(move |y| (0..width).map(move |x| Position::new(x, y)))
    }

    /// Return the position next to `pos` in the direction of `side`.
    ///
    /// On an edge of the grid, the method returns the cell on the opposite edge in wrap mode,
    /// and `pos` itself otherwise. Callers must treat a returned value equal to `pos` as "no
    /// neighbor".
    pub fn neighbor(&self, pos: Position, side: Side) -> Position {
        let Position { x, y } = pos;
        match side {
            Side::Top if y > 0 => Position::new(x, y - 1),
            Side::Top if self.wrap => Position::new(x, self.height - 1),
            Side::Right if x + 1 < self.width => Position::new(x + 1, y),
            Side::Right if self.wrap => Position::new(0, y),
            Side::Bottom if y + 1 < self.height => Position::new(x, y + 1),
            Side::Bottom if self.wrap => Position::new(x, 0),
            Side::Left if x > 0 => Position::new(x - 1, y),
            Side::Left if self.wrap => Position::new(self.width - 1, y),
            _ => pos,
        }
    }

    /// Rotate the pipe of the given cell by a quarter turn and run the tracer.
    ///
    /// Return `false` if the cell is locked. In that case nothing changes.
    pub fn rotate(&mut self, pos: Position, clockwise: bool, now: u64) -> bool {
        if !self.get_cell_mut(pos).rotate(clockwise, now) {
            debug!("Cell {pos} is locked: rotation ignored");
            return false;
        }
        self.update(now);
        true
    }

    /// Randomly rotate all the unlocked pipes, without animation, and run the tracer.
    ///
    /// This scrambles a freshly generated level, and restarts a level in progress.
    pub fn reset(&mut self, rng: &mut Prng) {
        for cell in self
            .cells
            .iter_mut()
            .filter(|c| !c.locked && !c.pipe.is_empty())
        {
            let turns: usize = rng.range(0, 4);
            for _ in 0..turns {
                cell.pipe.rotate(true);
            }
            cell.rotation = Rotation::Idle;
        }
        self.trace();
    }

    /// Toggle the lock of the given cell.
    pub fn reverse_lock(&mut self, pos: Position) {
        self.get_cell_mut(pos).reverse_lock();
    }

    /// Whether the given cell is locked.
    pub fn locked(&self, pos: Position) -> bool {
        self.get_cell(pos).locked
    }

    /// Whether all the receivers are powered.
    pub fn is_complete(&self) -> bool {
        self.state.level_complete
    }

    /// Number of powered receivers.
    pub fn active_receivers(&self) -> usize {
        self.receivers
            .iter()
            .filter(|p| self.get_cell(**p).active)
            .count()
    }

    /// Encode the pipes and the locks as a string with one character per cell, row by row.
    pub fn save(&self) -> String {
        self.cells
            .iter()
            .map(|c| {
                let lock: u8 = if c.locked { DUMP_LOCK_BIT } else { 0 };
                (DUMP_BASE + (lock | c.pipe.sides())) as char
            })
            .collect()
    }

    /// Restore the pipes and the locks from a string produced by [`Level::save`], and run the
    /// tracer.
    ///
    /// The objects (sender and receivers) are not part of the dump: they come from generating the
    /// level with the same identifier first.
    ///
    /// Return `false` if the dump does not match the grid. In that case nothing changes.
    pub fn load(&mut self, dump: &str) -> bool {
        if dump.len() != self.cells.len() {
            warn!(
                "Dump length {} does not match the {}x{} grid",
                dump.len(),
                self.width,
                self.height
            );
            return false;
        }
        if let Some(c) = dump
            .bytes()
            .find(|b| !(DUMP_BASE..DUMP_BASE + 2 * DUMP_LOCK_BIT).contains(b))
        {
            warn!("Invalid dump character {:?}", c as char);
            return false;
        }

        for (cell, code) in self.cells.iter_mut().zip(dump.bytes()) {
            let code: u8 = code - DUMP_BASE;
            cell.locked = code & DUMP_LOCK_BIT != 0;
            cell.pipe = Pipe::from_bits(code);
            cell.rotation = Rotation::Idle;
        }
        self.trace();
        true
    }

    /// Remove everything from the grid.
    pub(crate) fn clear(&mut self) {
        self.cells.fill(Cell::default());
        self.receivers.clear();
        self.state = LevelState::default();
    }
}

/// Text representation: two characters per cell, the pipe and a marker.
///
/// The marker is `S` for the sender, `R` for a powered receiver and `r` for an unpowered one, `#`
/// for a locked cell, and `+` for a powered pipe.
impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.cells.chunks(self.width) {
            let line: String = row
                .iter()
                .flat_map(|c| {
                    let marker: char = match c.object {
                        CellObject::Sender => 'S',
                        CellObject::Receiver if c.active => 'R',
                        CellObject::Receiver => 'r',
                        CellObject::Empty if c.locked => '#',
                        CellObject::Empty if c.active => '+',
                        CellObject::Empty => ' ',
                    };
                    [c.pipe.glyph(), marker]
                })
                .collect();
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}
