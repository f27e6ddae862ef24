/*
random_path.rs

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

//! Search a path from a new receiver to the pipe network.
//!
//! The search is a depth-first search with backtracking, run on an explicit stack.
//! While the path is short, the directions are tried in a random order so that the pipes wander.
//! Once the number of visited cells reaches the smallest dimension of the grid, the directions
//! that get closer to the sender are tried first, and the path stops as soon as it touches an
//! existing pipe.
//!
//! The search only reads the level. The pipes are connected afterwards by [`apply_path`], so an
//! abandoned branch never leaves a stray connection.

use log::debug;

use super::path::Path;
use crate::cell::CellObject;
use crate::level::{Level, Position};
use crate::pipe::{PipeType, Side};
use crate::prng::Prng;

/// Search state for one cell of the path.
struct Frame {
    pos: Position,
    /// Directions to try, in order.
    directions: [Side; 4],
    /// Index of the next direction to try.
    next: usize,
}

/// Outcome of entering a cell.
enum Entry {
    /// The cell is next to a junction; the path ends there.
    Joined,
    /// The directions from the cell must be searched.
    Search(Frame),
}

/// Outcome of following one direction.
enum Step {
    /// The neighbor ends the path (sender or junction).
    Reached,
    /// The neighbor is a free cell to explore.
    Descend(Position),
    /// The neighbor cannot be used.
    Blocked,
}

/// [`RandomPath`] object.
pub struct RandomPath<'a> {
    level: &'a Level,

    /// Number of visited cells below which the directions are randomized.
    heuristic_threshold: usize,

    /// Number of cells entered during the last search.
    pub iteration: usize,
}

impl<'a> RandomPath<'a> {
    /// Create the object.
    pub fn new(level: &'a Level) -> Self {
        Self {
            level,
            heuristic_threshold: level.width().min(level.height()),
            iteration: 0,
        }
    }

    /// Search a path from `start` to the sender, or to a pipe already connected to it.
    ///
    /// Return [`None`] when all the directions have been exhausted.
    pub fn find(&mut self, start: Position, prng: &mut Prng) -> Option<Path> {
        self.iteration = 0;
        let mut path: Path = Path::new(start, self.level.cells().len());
        let mut stack: Vec<Frame> = Vec::new();

        match self.enter(start, &mut path, prng) {
            Entry::Joined => return Some(path),
            Entry::Search(frame) => stack.push(frame),
        }

        while let Some(frame) = stack.last_mut() {
            let Some(&side) = frame.directions.get(frame.next) else {
                // Dead end: go back to the previous cell
                stack.pop();
                if !stack.is_empty() {
                    path.pop();
                }
                continue;
            };
            frame.next += 1;
            let current: Position = frame.pos;

            match self.step(current, side, &path) {
                Step::Blocked => (),
                Step::Reached => {
                    path.push(side);
                    return Some(path);
                }
                Step::Descend(next) => {
                    path.visit(next);
                    path.push(side);
                    match self.enter(next, &mut path, prng) {
                        Entry::Joined => return Some(path),
                        Entry::Search(frame) => stack.push(frame),
                    }
                }
            }
        }
        debug!(
            "No path from {start} after {} iterations",
            self.iteration
        );
        None
    }

    /// Compute the order of the directions to try from the given cell.
    fn enter(&mut self, pos: Position, path: &mut Path, prng: &mut Prng) -> Entry {
        self.iteration += 1;

        if path.visited_len() < self.heuristic_threshold {
            return Entry::Search(Frame {
                pos,
                directions: Self::random_directions(prng),
                next: 0,
            });
        }

        let directions: [Side; 4] = self.ranked_directions(pos);
        if let Some(side) = directions
            .into_iter()
            .find(|s| self.is_junction(self.level.neighbor(pos, *s)))
        {
            path.push(side);
            return Entry::Joined;
        }
        Entry::Search(Frame {
            pos,
            directions,
            next: 0,
        })
    }

    /// Classify the neighbor of `current` in the direction of `side`.
    fn step(&self, current: Position, side: Side, path: &Path) -> Step {
        let next: Position = self.level.neighbor(current, side);
        if next == current {
            return Step::Blocked;
        }

        let cell = self.level.get_cell(next);
        if next == self.level.sender() && cell.pipe().is_empty() {
            return Step::Reached;
        }
        if path.contains(next) || cell.object() != CellObject::Empty {
            return Step::Blocked;
        }
        if cell.pipe().is_empty() {
            Step::Descend(next)
        } else if cell.pipe().pipe_type() != PipeType::Fork {
            Step::Reached
        } else {
            Step::Blocked
        }
    }

    /// Whether a path can end on the given cell: an empty cell with a pipe that is not already a
    /// fork.
    fn is_junction(&self, pos: Position) -> bool {
        let cell = self.level.get_cell(pos);
        cell.object() == CellObject::Empty
            && !cell.pipe().is_empty()
            && cell.pipe().pipe_type() != PipeType::Fork
    }

    /// Shuffle the directions with four random swaps.
    ///
    /// This is not a uniform shuffle, but the level layout for a given identifier depends on this
    /// exact sequence of draws.
    fn random_directions(prng: &mut Prng) -> [Side; 4] {
        let mut directions: [Side; 4] = Side::ALL;
        for _ in 0..4 {
            let a: usize = prng.range(0, 4);
            let b: usize = prng.range(0, 4);
            directions.swap(a, b);
        }
        directions
    }

    /// Order the directions by how much they get closer to the sender: first along the axis with
    /// the largest distance, then along the other axis, then away on the other axis, and last
    /// away on the main axis.
    fn ranked_directions(&self, pos: Position) -> [Side; 4] {
        let sender: Position = self.level.sender();
        let dx: isize = sender.x as isize - pos.x as isize;
        let dy: isize = sender.y as isize - pos.y as isize;
        let horizontal: Side = if dx < 0 { Side::Left } else { Side::Right };
        let vertical: Side = if dy < 0 { Side::Top } else { Side::Bottom };
        let (major, minor) = if dx.abs() >= dy.abs() {
            (horizontal, vertical)
        } else {
            (vertical, horizontal)
        };
        [major, minor, minor.opposite(), major.opposite()]
    }
}

/// Connect the pipes along the path, from `start` to the end of the path.
pub fn apply_path(level: &mut Level, start: Position, path: &Path) {
    let mut pos: Position = start;
    for side in path.get() {
        let next: Position = level.neighbor(pos, *side);
        level.get_cell_mut(pos).pipe.set(*side);
        level.get_cell_mut(next).pipe.set(side.opposite());
        pos = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipe::Pipe;

    fn level_with_sender(width: usize, height: usize, sender: Position) -> Level {
        let mut level = Level::new(0, width, height, false);
        level.sender = sender;
        level.get_cell_mut(sender).object = CellObject::Sender;
        level
    }

    /// Walk the path and return the cell where it ends.
    fn end_of(level: &Level, start: Position, path: &Path) -> Position {
        path.get()
            .iter()
            .fold(start, |pos, side| level.neighbor(pos, *side))
    }

    #[test]
    fn path_reaches_the_unconnected_sender() {
        let level = level_with_sender(5, 5, Position::new(2, 2));
        let mut prng = Prng::new(1);
        let start = Position::new(0, 0);
        let path: Path = RandomPath::new(&level)
            .find(start, &mut prng)
            .expect("an empty grid always has a path");
        assert_eq!(end_of(&level, start, &path), Position::new(2, 2));
    }

    #[test]
    fn search_does_not_touch_the_pipes() {
        let level = level_with_sender(6, 6, Position::new(5, 5));
        let before = level.save();
        let mut prng = Prng::new(9);
        RandomPath::new(&level).find(Position::new(0, 0), &mut prng);
        assert_eq!(level.save(), before);
    }

    #[test]
    fn path_joins_an_existing_pipe() {
        // The sender already has its pipe, so the path must end on the pipe next to it.
        let mut level = level_with_sender(5, 1, Position::new(0, 0));
        level.get_cell_mut(Position::new(0, 0)).pipe = Pipe::from_bits(0b0010);
        level.get_cell_mut(Position::new(1, 0)).pipe = Pipe::from_bits(0b1000);
        let mut prng = Prng::new(4);
        let start = Position::new(4, 0);
        let path: Path = RandomPath::new(&level).find(start, &mut prng).unwrap();
        assert_eq!(end_of(&level, start, &path), Position::new(1, 0));
        assert_eq!(path.len(), 3);

        apply_path(&mut level, start, &path);
        assert_eq!(
            level.get_cell(Position::new(1, 0)).pipe().pipe_type(),
            PipeType::Straight
        );
        assert_eq!(level.get_cell(start).pipe().sides(), Side::Left.bit());
    }

    #[test]
    fn forks_are_not_junctions() {
        let mut level = level_with_sender(3, 1, Position::new(0, 0));
        level.get_cell_mut(Position::new(0, 0)).pipe = Pipe::from_bits(0b0010);
        level.get_cell_mut(Position::new(1, 0)).pipe = Pipe::from_bits(0b1011);
        let mut prng = Prng::new(4);
        assert!(
            RandomPath::new(&level)
                .find(Position::new(2, 0), &mut prng)
                .is_none()
        );
    }

    #[test]
    fn walled_in_start_has_no_path() {
        // The start is in a corner and both neighbors are receivers
        let mut level = level_with_sender(4, 4, Position::new(3, 3));
        level.get_cell_mut(Position::new(1, 0)).object = CellObject::Receiver;
        level.get_cell_mut(Position::new(0, 1)).object = CellObject::Receiver;
        let mut prng = Prng::new(2);
        let mut finder = RandomPath::new(&level);
        assert!(finder.find(Position::new(0, 0), &mut prng).is_none());
        assert_eq!(finder.iteration, 1);
    }

    #[test]
    fn ranking_prefers_the_longest_axis() {
        let level = level_with_sender(10, 10, Position::new(8, 2));
        let finder = RandomPath::new(&level);
        assert_eq!(
            finder.ranked_directions(Position::new(1, 4)),
            [Side::Right, Side::Top, Side::Bottom, Side::Left]
        );
        assert_eq!(
            finder.ranked_directions(Position::new(7, 9)),
            [Side::Top, Side::Right, Side::Left, Side::Bottom]
        );
    }

    #[test]
    fn random_directions_is_a_permutation() {
        let mut prng = Prng::new(5);
        for _ in 0..50 {
            let mut directions = RandomPath::random_directions(&mut prng);
            directions.sort_by_key(|s| *s as u8);
            assert_eq!(directions, Side::ALL);
        }
    }
}
