/*
highscores.rs

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

//! Manage high scores.
//!
//! The main object, [`HighScores`], maintains a list of the best solving times for each kind of
//! board (grid size and wrap mode).
//! See the [`crate::saver::highscores`] module that saves and restores the [`HighScores`] object.

use std::collections::HashMap;
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

/// Number of entries per scoreboard (number of top scores to keep).
const BOARD_SIZE: usize = 10;

/// Object that represent a score.
#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct Score {
    /// How long did it take for solving the puzzle.
    pub time: Duration,

    /// Number of quarter turns the player made.
    pub moves: usize,

    /// Completion timestamp.
    pub when: SystemTime,
}

/// Sorted list of the top scores for a board.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
struct BoardHighScores {
    /// Sorted list of the top scores, fastest first.
    top: Vec<Score>,
}

impl BoardHighScores {
    /// Add a score and return its position in the board, or None if the score does not make it
    /// to the board.
    ///
    /// The returned position starts at 1 (top score).
    fn add_score(&mut self, time: Duration, moves: usize) -> Option<usize> {
        let position: usize = self.top.partition_point(|s| s.time <= time);
        if position >= BOARD_SIZE {
            return None;
        }
        self.top.insert(
            position,
            Score {
                time,
                moves,
                when: SystemTime::now(),
            },
        );
        self.top.truncate(BOARD_SIZE);
        Some(position + 1)
    }
}

/// List of the scoreboards.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct HighScores {
    /// Scoreboards indexed by board kind.
    ///
    /// The index is a string in the format "<width>x<height>@@<wrap|nowrap>".
    board: HashMap<String, BoardHighScores>,
}

impl HighScores {
    /// Create a [`HighScores`] object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the string that is used as an index for the list of scoreboards.
    fn build_key(width: usize, height: usize, wrap: bool) -> String {
        format!(
            "{width}x{height}@@{}",
            if wrap { "wrap" } else { "nowrap" }
        )
    }

    /// Add a score to the scoreboard of the given board kind and return the position in the
    /// scoreboard, or None if the score does not make it to the board.
    ///
    /// The returned position starts at 1 (top score).
    pub fn add_score(
        &mut self,
        width: usize,
        height: usize,
        wrap: bool,
        time: Duration,
        moves: usize,
    ) -> Option<usize> {
        self.board
            .entry(Self::build_key(width, height, wrap))
            .or_default()
            .add_score(time, moves)
    }

    /// Return the list of [`Score`] for the given board kind.
    ///
    /// Return None when the scoreboard is empty.
    pub fn get_score(&self, width: usize, height: usize, wrap: bool) -> Option<&Vec<Score>> {
        self.board
            .get(&Self::build_key(width, height, wrap))
            .map(|b| &b.top)
    }

    /// Iterate over the scoreboards, sorted by key.
    pub fn boards(&self) -> Vec<(&str, &[Score])> {
        let mut boards: Vec<(&str, &[Score])> = self
            .board
            .iter()
            .map(|(k, b)| (k.as_str(), b.top.as_slice()))
            .collect();
        boards.sort_by_key(|b| b.0);
        boards
    }

    /// Return whether the list of scoreboard is empty.
    pub fn is_empty(&self) -> bool {
        self.board.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scores_are_sorted_and_ranked() {
        let mut scores = HighScores::new();
        assert!(scores.is_empty());
        assert_eq!(
            scores.add_score(5, 5, false, Duration::from_secs(30), 12),
            Some(1)
        );
        assert_eq!(
            scores.add_score(5, 5, false, Duration::from_secs(10), 8),
            Some(1)
        );
        assert_eq!(
            scores.add_score(5, 5, false, Duration::from_secs(20), 9),
            Some(2)
        );
        let board: Vec<u64> = scores
            .get_score(5, 5, false)
            .unwrap()
            .iter()
            .map(|s| s.time.as_secs())
            .collect();
        assert_eq!(board, vec![10, 20, 30]);
        assert!(scores.get_score(5, 5, true).is_none());
    }

    #[test]
    fn board_keeps_the_best_ten() {
        let mut scores = HighScores::new();
        for s in 1..=BOARD_SIZE as u64 {
            scores.add_score(7, 7, true, Duration::from_secs(s * 10), 1);
        }
        assert_eq!(
            scores.add_score(7, 7, true, Duration::from_secs(500), 1),
            None
        );
        assert_eq!(
            scores.add_score(7, 7, true, Duration::from_secs(5), 1),
            Some(1)
        );
        let board = scores.get_score(7, 7, true).unwrap();
        assert_eq!(board.len(), BOARD_SIZE);
        assert_eq!(board.last().unwrap().time, Duration::from_secs(90));
    }

    #[test]
    fn boards_are_listed_by_key() {
        let mut scores = HighScores::new();
        scores.add_score(9, 9, true, Duration::from_secs(1), 1);
        scores.add_score(5, 5, false, Duration::from_secs(1), 1);
        let keys: Vec<&str> = scores.boards().iter().map(|b| b.0).collect();
        assert_eq!(keys, vec!["5x5@@nowrap", "9x9@@wrap"]);
    }
}
