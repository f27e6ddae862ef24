/*
game.rs

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

//! Manage the status of a game in progress.
//!
//! The [`Game`] object wraps the [`Level`] being played, and adds what the player sees around it:
//! the move counter, the timer, and the solved status.
//! The display drives the game by calling [`Game::tick`] on each frame, and forwards the player
//! actions to [`Game::rotate`], [`Game::toggle_lock`], and [`Game::restart`].
//! Times are milliseconds from the monotonic clock of the display.

use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::highscores::HighScores;
use crate::level::{Level, LevelState, Position};
use crate::prng::Prng;
use crate::saver::game::elapsed_millis;

/// Manage the status of the game in progress.
#[derive(Serialize, Deserialize, Debug)]
pub struct Game {
    /// Level being played.
    pub level: Level,

    /// Generator used to build and to scramble the level. It is not saved: a restored game gets
    /// a default-seeded generator.
    #[serde(skip)]
    prng: Prng,

    /// Number of quarter turns the player made.
    pub moves: usize,

    /// Whether the player paused the game. In that case, the board is hidden.
    pub paused: bool,

    /// Whether the game has started.
    pub started: bool,

    /// Whether the puzzle is solved.
    pub solved: bool,

    /// Time when the game started. Used to compute game duration.
    #[serde(with = "elapsed_millis")]
    start_time: Instant,

    /// The elapsed time when the player paused the game.
    pause_duration: Option<Duration>,

    /// The elapsed time when the player solved the puzzle.
    solve_duration: Option<Duration>,
}

impl Game {
    /// Create a [`Game`] object for the given board kind. No level is generated yet.
    pub fn new(width: usize, height: usize, wrap: bool) -> Self {
        Self {
            level: Level::new(0, width, height, wrap),
            prng: Prng::default(),
            moves: 0,
            paused: false,
            started: false,
            solved: false,
            start_time: Instant::now(),
            pause_duration: None,
            solve_duration: None,
        }
    }

    /// Generate and scramble a new level. A random identifier is used when none is provided.
    pub fn new_game(&mut self, id: Option<u64>) {
        let id: u64 = id.unwrap_or_else(|| rand::rng().random());
        info!("New game: level {id}");
        self.level = Level::new(
            id,
            self.level.width(),
            self.level.height(),
            self.level.wrap(),
        );
        self.level.generate(&mut self.prng);
        self.level.reset(&mut self.prng);
        self.start();
    }

    /// Replace the level with a new one of another size or wrap mode.
    pub fn resize(&mut self, width: usize, height: usize, wrap: bool) {
        self.level = Level::new(0, width, height, wrap);
        self.new_game(None);
    }

    /// Scramble the current level again and restart the game status. Locked cells keep their
    /// pipe.
    pub fn restart(&mut self) {
        self.level.reset(&mut self.prng);
        if self.solved {
            self.start();
        } else {
            self.moves = 0;
            self.paused = false;
            self.started = true;
        }
    }

    fn start(&mut self) {
        self.moves = 0;
        self.paused = false;
        self.started = true;
        self.solved = false;
        self.start_time = Instant::now();
        self.pause_duration = None;
        self.solve_duration = None;
    }

    /// Rotate a pipe on behalf of the player.
    ///
    /// Return `false` when the move is refused: the game is paused or solved, or the cell is
    /// locked.
    pub fn rotate(&mut self, pos: Position, clockwise: bool, now: u64) -> bool {
        if self.paused || self.solved {
            return false;
        }
        if !self.level.rotate(pos, clockwise, now) {
            return false;
        }
        self.moves += 1;
        self.check_solved();
        true
    }

    /// Toggle the lock of a cell.
    pub fn toggle_lock(&mut self, pos: Position) {
        if !self.solved {
            self.level.reverse_lock(pos);
        }
    }

    /// Advance the animations and return the level status.
    pub fn tick(&mut self, now: u64) -> LevelState {
        self.level.update(now);
        self.check_solved();
        self.level.state
    }

    fn check_solved(&mut self) {
        if self.started && !self.solved && self.level.is_complete() {
            self.solved = true;
            self.solve_duration = Some(self.get_duration());
            debug!(
                "Level {} solved in {} moves",
                self.level.id(),
                self.moves
            );
        }
    }

    /// Whether the puzzle is solved.
    pub fn is_solved(&self) -> bool {
        self.solved
    }

    /// Add the score of a solved game to the high scores and return the position in the
    /// scoreboard.
    pub fn record_score(&self, highscores: &mut HighScores) -> Option<usize> {
        if !self.solved {
            return None;
        }
        highscores.add_score(
            self.level.width(),
            self.level.height(),
            self.level.wrap(),
            self.get_duration(),
            self.moves,
        )
    }

    /// Pause the game.
    pub fn pause(&mut self) {
        if self.paused || self.solved {
            return;
        }
        // Store the played time so far, so that the pause time can be deduced when the
        // player resumes the game.
        self.pause_duration = Some(self.start_time.elapsed());
        self.paused = true;
    }

    /// Resume the game.
    pub fn resume(&mut self) {
        // Refresh the game elapsed time by removing the pause time.
        if let Some(d) = self.pause_duration {
            self.start_time += self.start_time.elapsed() - d;
            self.pause_duration = None;
        }
        self.paused = false;
    }

    /// Return the game duration. The timer stops while the game is paused, and when the puzzle
    /// is solved.
    pub fn get_duration(&self) -> Duration {
        self.solve_duration
            .or(self.pause_duration)
            .unwrap_or_else(|| self.start_time.elapsed())
    }

    /// Return the game duration in hours, minutes, and seconds
    pub fn get_duration_hms(&self) -> (u64, u64, u64) {
        let duration: u64 = self.get_duration().as_secs();
        (
            duration / 3600,
            (duration % 3600) / 60,
            (duration % 3600) % 60,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::{CellObject, ROTATION_TIME};

    /// Rotate the receivers until the level is solved. Only works for levels where the receivers
    /// are the only scrambled cells.
    fn solve_by_receivers(game: &mut Game, mut now: u64) -> u64 {
        let receivers: Vec<Position> = game.level.receivers().to_vec();
        for pos in receivers {
            for _ in 0..4 {
                game.tick(now);
                if game.level.get_cell(pos).is_active() {
                    break;
                }
                game.rotate(pos, true, now);
                now += ROTATION_TIME;
            }
        }
        game.tick(now);
        now
    }

    #[test]
    fn new_game_is_generated_and_started() {
        let mut game = Game::new(6, 5, false);
        assert!(!game.started);
        game.new_game(Some(12));
        assert!(game.started);
        assert_eq!(game.level.id(), 12);
        assert_eq!(game.level.width(), 6);
        assert_eq!(game.level.height(), 5);
        assert_eq!(game.moves, 0);
        assert_eq!(
            game.level.get_cell(game.level.sender()).object(),
            CellObject::Sender
        );
    }

    #[test]
    fn moves_are_counted_except_on_locked_cells() {
        let mut game = Game::new(6, 6, false);
        game.new_game(Some(4));
        let pos: Position = game.level.sender();
        assert!(game.rotate(pos, true, 0));
        assert_eq!(game.moves, 1);

        game.toggle_lock(pos);
        assert!(!game.rotate(pos, true, 10));
        assert_eq!(game.moves, 1);
    }

    #[test]
    fn paused_game_refuses_moves() {
        let mut game = Game::new(6, 6, true);
        game.new_game(Some(5));
        game.pause();
        assert!(game.paused);
        assert!(!game.rotate(game.level.sender(), true, 0));
        game.resume();
        assert!(!game.paused);
        assert!(game.rotate(game.level.sender(), true, 0));
    }

    #[test]
    fn solving_latches_and_records_a_score() {
        let mut game = Game::new(8, 8, false);
        game.new_game(Some(21));

        // Restore the solution, then lock every pipe but the receivers, and scramble again
        game.level.generate(&mut Prng::default());
        let receivers: Vec<Position> = game.level.receivers().to_vec();
        for pos in game.level.positions().collect::<Vec<Position>>() {
            if !receivers.contains(&pos) {
                game.level.reverse_lock(pos);
            }
        }
        game.restart();

        let mut highscores = HighScores::new();
        assert_eq!(game.record_score(&mut highscores), None);

        solve_by_receivers(&mut game, 1000);
        assert!(game.is_solved());
        assert!(!game.rotate(receivers[0], true, 100_000));
        assert_eq!(game.record_score(&mut highscores), Some(1));
        assert!(highscores.get_score(8, 8, false).is_some());
    }

    #[test]
    fn resize_replaces_the_level() {
        let mut game = Game::new(6, 6, false);
        game.new_game(Some(1));
        game.resize(7, 4, true);
        assert_eq!(game.level.width(), 7);
        assert_eq!(game.level.height(), 4);
        assert!(game.level.wrap());
        assert_eq!(game.moves, 0);
    }

    #[test]
    fn duration_in_hms() {
        let game = Game::new(6, 6, false);
        let (h, m, s) = game.get_duration_hms();
        assert_eq!((h, m), (0, 0));
        assert!(s < 60);
    }
}
