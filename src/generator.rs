/*
generator.rs

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

//! Generate random levels.
//!
//! [`Level::generate`] builds a complete, solved level from its identifier:
//!
//! * The PRNG is seeded with the level identifier, so that a given identifier always produces
//!   the same level.
//! * The sender is placed on a random cell.
//! * Receivers are added one by one. For each receiver, a [`random_path::RandomPath`] object
//!   searches a path to the sender, or to a pipe already connected to the sender, and the pipes
//!   are then connected along that path by [`random_path::apply_path`].
//!
//! Adding a receiver can fail when no path exists from the chosen cell. The receiver is then
//! skipped, so a level can have fewer receivers than requested.
//!
//! The generated level is solved. Use [`Level::reset`] to scramble it.

pub mod path;
pub mod random_path;

use log::{Level as LogLevel, debug, log_enabled};

use crate::cell::CellObject;
use crate::level::{Level, Position};
use crate::prng::Prng;

/// One receiver is requested for this number of cells.
const CELLS_PER_RECEIVER: usize = 5;

impl Level {
    /// Generate the level content from its identifier.
    pub fn generate(&mut self, prng: &mut Prng) {
        prng.seed(self.id);
        self.clear();

        let x: usize = prng.range(0, self.width);
        let y: usize = prng.range(0, self.height);
        self.sender = Position::new(x, y);
        self.get_cell_mut(self.sender).object = CellObject::Sender;

        let requested: usize = self.cells.len() / CELLS_PER_RECEIVER;
        for _ in 0..requested {
            self.add_receiver(prng);
        }
        debug!(
            "Level {} ({}x{}, wrap={}): sender at {}, {} receivers out of {}",
            self.id,
            self.width,
            self.height,
            self.wrap,
            self.sender,
            self.receivers.len(),
            requested
        );

        self.trace();

        if log_enabled!(LogLevel::Debug) {
            for line in self.to_string().lines() {
                debug!("{line}");
            }
        }
    }

    /// Place a receiver on a random free cell and connect it to the network.
    ///
    /// Return `false` when there is no free cell or when no path was found. In that case the
    /// level does not change.
    pub fn add_receiver(&mut self, prng: &mut Prng) -> bool {
        let candidates: Vec<Position> = self
            .positions()
            .filter(|p| {
                let cell = self.get_cell(*p);
                cell.object == CellObject::Empty
                    && cell.pipe.is_empty()
                    && p.chebyshev(&self.sender) > 1
            })
            .collect();
        if candidates.is_empty() {
            debug!("No free cell left for a receiver");
            return false;
        }

        let receiver: Position = candidates[prng.range(0, candidates.len())];
        let mut finder = random_path::RandomPath::new(self);
        let Some(path) = finder.find(receiver, prng) else {
            debug!("Receiver at {receiver} abandoned");
            return false;
        };
        debug!(
            "Receiver at {receiver}: path of {} steps, {} iterations",
            path.len(),
            finder.iteration
        );

        self.get_cell_mut(receiver).object = CellObject::Receiver;
        random_path::apply_path(self, receiver, &path);
        self.receivers.push(receiver);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipe::PipeType;

    #[test]
    fn generated_level_has_one_sender_and_is_solved() {
        let mut level = Level::new(1, 10, 10, false);
        level.generate(&mut Prng::default());

        let senders: usize = level
            .cells()
            .iter()
            .filter(|c| c.object() == CellObject::Sender)
            .count();
        assert_eq!(senders, 1);
        assert_eq!(
            level.get_cell(level.sender()).object(),
            CellObject::Sender
        );
        assert!(!level.receivers().is_empty());
        assert!(level.receivers().len() <= 20);
        assert!(level.is_complete());
    }

    #[test]
    fn receivers_are_dead_ends_away_from_the_sender() {
        let mut level = Level::new(8, 9, 7, true);
        level.generate(&mut Prng::default());
        for pos in level.receivers() {
            let cell = level.get_cell(*pos);
            assert_eq!(cell.object(), CellObject::Receiver);
            assert_eq!(cell.pipe().pipe_type(), PipeType::Half);
            assert!(pos.chebyshev(&level.sender()) > 1);
        }
        assert_eq!(
            level.get_cell(level.sender()).pipe().pipe_type(),
            PipeType::Half
        );
    }

    #[test]
    fn every_pipe_is_matched_by_its_neighbor() {
        let mut level = Level::new(77, 12, 8, false);
        level.generate(&mut Prng::default());
        for pos in level.positions() {
            for side in level.get_cell(pos).pipe().connected() {
                let next: Position = level.neighbor(pos, side);
                assert_ne!(next, pos, "pipe at {pos} points outside the grid");
                assert!(level.get_cell(next).pipe().has(side.opposite()));
            }
        }
    }

    #[test]
    fn generation_replaces_the_previous_content() {
        let mut prng = Prng::default();
        let mut level = Level::new(3, 6, 6, false);
        level.generate(&mut prng);
        let first: String = level.save();
        let receivers: Vec<Position> = level.receivers().to_vec();

        level.reset(&mut prng);
        level.reverse_lock(level.sender());
        level.generate(&mut prng);
        assert_eq!(level.save(), first);
        assert_eq!(level.receivers(), receivers.as_slice());
    }

    #[test]
    fn tiny_grid_gets_no_receiver() {
        let mut level = Level::new(5, 3, 3, false);
        level.generate(&mut Prng::default());
        // 9 cells ask for one receiver, but a 3x3 grid has no cell two steps from the sender
        // when the sender is in the middle.
        assert!(level.receivers().len() <= 1);
        assert!(level.is_complete());
    }
}
