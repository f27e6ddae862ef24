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


//! Save and restore the high scores.
//!
//! The scoreboards of all the board kinds are stored together in the `highscores.json` file.

use std::error::Error;
use std::path::Path;

use super::JsonFile;
use crate::config::HIGHSCORES_FILE;
use crate::game::Game;
use crate::highscores::HighScores;

/// High scores file.
pub struct SaverHighScores {
    file: JsonFile,
}

impl SaverHighScores {
    /// Create a [`SaverHighScores`] object for the given data directory.
    pub fn new(data_dir: &Path) -> Self {
        Self {
            file: JsonFile::new(data_dir, HIGHSCORES_FILE),
        }
    }

    /// Return the stored scoreboards, or [`None`] if no score was recorded yet.
    pub fn get_highscores(&self) -> Result<Option<HighScores>, Box<dyn Error>> {
        self.file.read()
    }

    /// Replace the stored scoreboards.
    pub fn save_highscores(&self, highscores: &HighScores) -> Result<(), Box<dyn Error>> {
        self.file.write(highscores)
    }

    /// Add the score of a solved game to the stored scoreboards.
    ///
    /// Return the position of the score in its scoreboard, starting at 1, or [`None`] when the
    /// game is not solved or the score does not make it to the board. The file is only written
    /// when the score is kept.
    pub fn record_game(&self, game: &Game) -> Result<Option<usize>, Box<dyn Error>> {
        let mut highscores: HighScores = self.get_highscores()?.unwrap_or_default();
        let position: Option<usize> = game.record_score(&mut highscores);
        if position.is_some() {
            self.save_highscores(&highscores)?;
        }
        Ok(position)
    }

    /// Delete the high scores file.
    pub fn delete_save(&self) -> Result<(), Box<dyn Error>> {
        self.file.remove()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prng::Prng;
    use std::path::PathBuf;
    use std::time::Duration;

    fn temp_data_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("pipenet-{name}-{}", std::process::id()))
    }

    #[test]
    fn highscores_survive_a_save_and_restore() {
        let dir: PathBuf = temp_data_dir("highscores");
        let saver = SaverHighScores::new(&dir);
        assert!(saver.get_highscores().unwrap().is_none());

        let mut highscores = HighScores::new();
        highscores.add_score(10, 10, false, Duration::from_millis(61_500), 42);
        saver.save_highscores(&highscores).unwrap();

        let restored: HighScores = saver.get_highscores().unwrap().unwrap();
        let board = restored.get_score(10, 10, false).unwrap();
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].moves, 42);
        assert_eq!(board[0].time, Duration::from_millis(61_500));

        saver.delete_save().unwrap();
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn only_solved_games_are_recorded() {
        let dir: PathBuf = temp_data_dir("record");
        let saver = SaverHighScores::new(&dir);
        let mut game = Game::new(6, 6, false);
        game.new_game(Some(17));
        assert_eq!(saver.record_game(&game).unwrap(), None);
        assert!(saver.get_highscores().unwrap().is_none());

        game.level.generate(&mut Prng::default());
        game.tick(0);
        assert!(game.is_solved());
        assert_eq!(saver.record_game(&game).unwrap(), Some(1));
        let stored: HighScores = saver.get_highscores().unwrap().unwrap();
        assert_eq!(stored.get_score(6, 6, false).unwrap().len(), 1);

        saver.delete_save().unwrap();
        let _ = std::fs::remove_dir_all(dir);
    }
}
