/*
path.rs

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

//! Path carved by the generator.

use std::collections::HashSet;

use crate::level::Position;
use crate::pipe::Side;

/// Path object.
///
/// The path is the list of the directions taken from the starting cell. The last direction leads
/// to the cell where the path ends (the sender or a junction), which is not part of the visited
/// cells.
#[derive(Debug, Default, Clone)]
pub struct Path {
    /// Directions, in order.
    steps: Vec<Side>,

    /// Cells that the search entered, including the cells of abandoned branches.
    visited: HashSet<Position>,
}

impl PartialEq for Path {
    fn eq(&self, other: &Self) -> bool {
        self.steps == other.steps
    }
}

impl Path {
    /// Create a [`Path`] object that starts at the given cell.
    pub fn new(start: Position, capacity: usize) -> Self {
        let mut visited: HashSet<Position> = HashSet::with_capacity(capacity);
        visited.insert(start);
        Self {
            steps: Vec::with_capacity(capacity),
            visited,
        }
    }

    /// Add a direction to the path.
    pub fn push(&mut self, side: Side) {
        self.steps.push(side);
    }

    /// Remove the last direction. The cells stay visited.
    pub fn pop(&mut self) {
        self.steps.pop();
    }

    /// Mark a cell as visited.
    pub fn visit(&mut self, pos: Position) {
        self.visited.insert(pos);
    }

    /// Whether the cell has been visited.
    pub fn contains(&self, pos: Position) -> bool {
        self.visited.contains(&pos)
    }

    /// Number of directions in the path.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Number of visited cells.
    pub fn visited_len(&self) -> usize {
        self.visited.len()
    }

    /// Return the directions.
    pub fn get(&self) -> &[Side] {
        &self.steps
    }
}
