/*
trace.rs

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

//! Connectivity tracer.
//!
//! The tracer floods "power" from the sender through the connected pipes.
//! Two adjacent cells are connected when both pipes connect their shared side.
//! Rotating cells are never entered: they are considered disconnected until their animation
//! ends, so the tracer only reads settled pipes.

use log::debug;

use crate::cell::CellUpdate;
use crate::level::{Level, Position};

impl Level {
    /// Advance the rotation animations to the given time, and then trace the power from the
    /// sender.
    ///
    /// This method must be called periodically (on each frame) while the level is displayed.
    pub fn update(&mut self, now: u64) {
        let sender: usize = self.index(self.sender);
        let mut rotation_complete: bool = false;
        let mut rotation_active: bool = false;

        for (i, cell) in self.cells.iter_mut().enumerate() {
            cell.active = i == sender;
            if cell.update(now) == CellUpdate::RotationComplete {
                rotation_complete = true;
            }
            rotation_active |= cell.is_rotating();
        }
        self.state.rotation_complete = rotation_complete;
        self.state.rotation_active = rotation_active;

        self.trace_from_sender();
    }

    /// Trace the power from the sender without advancing the animations.
    pub(crate) fn trace(&mut self) {
        let sender: usize = self.index(self.sender);
        for (i, cell) in self.cells.iter_mut().enumerate() {
            cell.active = i == sender;
        }
        self.trace_from_sender();
    }

    /// Trace from the sender. While the sender is rotating, nothing is traced and
    /// [`crate::level::LevelState::level_complete`] keeps its previous value.
    fn trace_from_sender(&mut self) {
        if !self.get_cell(self.sender).is_rotating() {
            self.trace_state(self.sender);
        }
    }

    /// Power the given cell and everything connected to it, and then refresh
    /// [`crate::level::LevelState::level_complete`].
    pub fn trace_state(&mut self, pos: Position) {
        self.propagate(pos);
        self.refresh_complete();
    }

    /// Follow the pipes from the given cell.
    ///
    /// Straight runs are followed in a loop. The extra branches of forks and crosses go on a work
    /// stack, so the depth does not grow with the size of the powered network. A branch is
    /// powered as soon as it is pushed, so other runs do not enter it again.
    fn propagate(&mut self, start: Position) {
        let mut pending: Vec<Position> = vec![start];

        while let Some(mut pos) = pending.pop() {
            loop {
                let i: usize = self.index(pos);
                self.cells[i].active = true;

                let next: Vec<Position> = self.cells[i]
                    .pipe
                    .connected()
                    .filter_map(|side| {
                        let n: Position = self.neighbor(pos, side);
                        let cell = self.get_cell(n);
                        (n != pos
                            && !cell.is_rotating()
                            && !cell.active
                            && cell.pipe.has(side.opposite()))
                        .then_some(n)
                    })
                    .collect();

                let Some((first, branches)) = next.split_first() else {
                    break;
                };
                for branch in branches {
                    let b: usize = self.index(*branch);
                    self.cells[b].active = true;
                    pending.push(*branch);
                }
                pos = *first;
            }
        }
    }

    fn refresh_complete(&mut self) {
        let complete: bool = self.receivers.iter().all(|p| self.get_cell(*p).active);
        if complete != self.state.level_complete {
            debug!(
                "Level {}: {}",
                self.id,
                if complete { "complete" } else { "no longer complete" }
            );
        }
        self.state.level_complete = complete;
    }
}

#[cfg(test)]
mod tests {
    use crate::cell::{CellObject, ROTATION_TIME};
    use crate::level::{Level, Position};
    use crate::pipe::Pipe;

    /// Build a 3x1 line: sender on the left, receiver on the right, straight pipe in between.
    fn line() -> Level {
        let mut level = Level::new(0, 3, 1, false);
        level.sender = Position::new(0, 0);
        level.get_cell_mut(Position::new(0, 0)).object = CellObject::Sender;
        level.get_cell_mut(Position::new(0, 0)).pipe = Pipe::from_bits(0b0010);
        level.get_cell_mut(Position::new(1, 0)).pipe = Pipe::from_bits(0b1010);
        level.get_cell_mut(Position::new(2, 0)).object = CellObject::Receiver;
        level.get_cell_mut(Position::new(2, 0)).pipe = Pipe::from_bits(0b1000);
        level.receivers.push(Position::new(2, 0));
        level
    }

    #[test]
    fn connected_line_is_complete() {
        let mut level = line();
        level.update(0);
        assert!(level.is_complete());
        assert!(level.cells().iter().all(|c| c.is_active()));
    }

    #[test]
    fn one_sided_connection_does_not_conduct() {
        let mut level = line();
        level.get_cell_mut(Position::new(1, 0)).pipe = Pipe::from_bits(0b0011);
        level.update(0);
        assert!(!level.is_complete());
        assert!(level.get_cell(Position::new(0, 0)).is_active());
        assert!(!level.get_cell(Position::new(1, 0)).is_active());
    }

    #[test]
    fn rotating_cell_blocks_power_until_settled() {
        let mut level = line();
        level.update(0);
        assert!(level.is_complete());

        // A half turn brings the straight pipe back to the same connections
        assert!(level.rotate(Position::new(1, 0), true, 1000));
        assert!(level.rotate(Position::new(1, 0), true, 1010));
        assert!(level.state.rotation_active);
        assert!(!level.is_complete());
        assert!(!level.get_cell(Position::new(2, 0)).is_active());

        level.update(1000 + ROTATION_TIME);
        assert!(level.state.rotation_active);
        assert!(!level.state.rotation_complete);
        assert!(!level.is_complete());

        level.update(1000 + 2 * ROTATION_TIME + 10);
        assert!(!level.state.rotation_active);
        assert!(level.state.rotation_complete);
        assert!(level.is_complete());

        // The completion flag only lasts one update
        level.update(5000);
        assert!(!level.state.rotation_complete);
    }

    #[test]
    fn rotating_sender_powers_nothing_else() {
        let mut level = line();
        level.rotate(Position::new(0, 0), true, 0);
        assert!(level.get_cell(Position::new(0, 0)).is_active());
        assert!(!level.get_cell(Position::new(1, 0)).is_active());
        assert!(!level.is_complete());
    }

    #[test]
    fn rotating_sender_keeps_the_completion_flag() {
        let mut level = line();
        level.update(0);
        assert!(level.is_complete());

        level.rotate(Position::new(0, 0), true, 1000);
        assert!(!level.get_cell(Position::new(2, 0)).is_active());
        assert!(level.is_complete(), "no trace runs while the sender turns");

        // The sender now points down, away from the line
        level.update(1000 + ROTATION_TIME);
        assert!(!level.is_complete());
    }

    #[test]
    fn large_grid_of_crosses_is_fully_powered() {
        let size: usize = 255;
        let mut level = Level::new(1, size, size, false);
        level.sender = Position::new(0, 0);
        level.get_cell_mut(Position::new(0, 0)).object = CellObject::Sender;
        let far = Position::new(size - 1, size - 1);
        level.get_cell_mut(far).object = CellObject::Receiver;
        level.receivers.push(far);

        // 'P' is a four-way cross
        assert!(level.load(&"P".repeat(size * size)));
        assert!(level.is_complete());
        assert!(level.cells().iter().all(|c| c.is_active()));
    }

    #[test]
    fn wrapped_grid_of_crosses_is_fully_powered() {
        let mut level = Level::new(1, 120, 90, true);
        level.sender = Position::new(60, 45);
        level.get_cell_mut(Position::new(60, 45)).object = CellObject::Sender;
        assert!(level.load(&"P".repeat(120 * 90)));
        assert!(level.cells().iter().all(|c| c.is_active()));
    }

    #[test]
    fn fork_powers_both_branches() {
        // S at the top middle, fork below, receivers on the left and right.
        let mut level = Level::new(0, 3, 2, false);
        level.sender = Position::new(1, 0);
        level.get_cell_mut(Position::new(1, 0)).object = CellObject::Sender;
        level.get_cell_mut(Position::new(1, 0)).pipe = Pipe::from_bits(0b0100);
        level.get_cell_mut(Position::new(1, 1)).pipe = Pipe::from_bits(0b1011);
        for x in [0, 2] {
            let pos = Position::new(x, 1);
            level.get_cell_mut(pos).object = CellObject::Receiver;
            level.receivers.push(pos);
        }
        level.get_cell_mut(Position::new(0, 1)).pipe = Pipe::from_bits(0b0010);
        level.get_cell_mut(Position::new(2, 1)).pipe = Pipe::from_bits(0b1000);
        level.update(0);
        assert!(level.is_complete());
        assert_eq!(level.active_receivers(), 2);
    }

    #[test]
    fn loops_terminate() {
        // A closed 2x2 ring of bent pipes
        let mut level = Level::new(0, 2, 2, false);
        level.sender = Position::new(0, 0);
        level.get_cell_mut(Position::new(0, 0)).object = CellObject::Sender;
        level.get_cell_mut(Position::new(0, 0)).pipe = Pipe::from_bits(0b0110);
        level.get_cell_mut(Position::new(1, 0)).pipe = Pipe::from_bits(0b1100);
        level.get_cell_mut(Position::new(1, 1)).pipe = Pipe::from_bits(0b1001);
        level.get_cell_mut(Position::new(0, 1)).pipe = Pipe::from_bits(0b0011);
        level.update(0);
        assert!(level.cells().iter().all(|c| c.is_active()));
    }

    #[test]
    fn wrap_mode_conducts_across_edges() {
        let mut level = Level::new(0, 3, 1, true);
        level.sender = Position::new(0, 0);
        level.get_cell_mut(Position::new(0, 0)).object = CellObject::Sender;
        level.get_cell_mut(Position::new(0, 0)).pipe = Pipe::from_bits(0b1000);
        level.get_cell_mut(Position::new(2, 0)).object = CellObject::Receiver;
        level.get_cell_mut(Position::new(2, 0)).pipe = Pipe::from_bits(0b0010);
        level.receivers.push(Position::new(2, 0));
        level.update(0);
        assert!(level.is_complete());

        level.wrap = false;
        level.update(0);
        assert!(!level.is_complete());
    }

    #[test]
    fn edge_pipe_without_wrap_does_not_power_itself() {
        let mut level = Level::new(0, 2, 1, false);
        level.sender = Position::new(0, 0);
        level.get_cell_mut(Position::new(0, 0)).pipe = Pipe::from_bits(0b1010);
        level.update(0);
        assert!(level.get_cell(Position::new(0, 0)).is_active());
        assert!(!level.get_cell(Position::new(1, 0)).is_active());
    }
}
