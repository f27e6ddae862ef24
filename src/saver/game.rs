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

//! Save and restore the game in progress.
//!
//! The game in progress is stored in the `savegame.json` file when the player leaves, and read
//! back on the next start. Only unsolved games are kept: saving a solved game removes the file.
//!
//! The level is not stored cell by cell. Its identifier, its size, and its dump (see
//! [`Level::save`]) are enough: the sender and the receivers come back from generating the level
//! again, and the dump then restores the pipes and the locks.
//! Times are stored as milliseconds of play, and turned back into [`std::time::Instant`] values
//! relative to the clock of the new process.

use log::info;
use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::error::Error;
use std::path::Path;

use super::JsonFile;
use crate::config::SAVE_GAME_FILE;
use crate::game::Game;
use crate::level::Level;
use crate::prng::Prng;

/// Store an [`std::time::Instant`] as the number of milliseconds elapsed since then.
pub mod elapsed_millis {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};
    use std::time::{Duration, Instant};

    pub fn serialize<S>(since: &Instant, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis: u64 = u64::try_from(since.elapsed().as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(millis)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Instant, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis: u64 = u64::deserialize(deserializer)?;
        Instant::now()
            .checked_sub(Duration::from_millis(millis))
            .ok_or_else(|| D::Error::custom(format!("{millis}ms of play is out of range")))
    }
}

/// Serialize a [`Level`] object.
impl Serialize for Level {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // `5` is the number of fields to serialize
        let mut state = serializer.serialize_struct("Level", 5)?;

        // The objects (sender and receivers) are not serialized. During deserialization, they
        // are generated again from the identifier.
        state.serialize_field("id", &self.id())?;
        state.serialize_field("width", &self.width())?;
        state.serialize_field("height", &self.height())?;
        state.serialize_field("wrap", &self.wrap())?;
        state.serialize_field("dump", &self.save())?;
        state.end()
    }
}

/// Saved form of a [`Level`] object.
#[derive(serde::Deserialize)]
#[serde(rename = "Level", deny_unknown_fields)]
struct SavedLevel {
    id: u64,
    width: usize,
    height: usize,
    wrap: bool,
    dump: String,
}

/// Deserialize a [`Level`] object.
impl<'de> Deserialize<'de> for Level {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let saved: SavedLevel = SavedLevel::deserialize(deserializer)?;
        if saved.width == 0 || saved.height == 0 {
            return Err(de::Error::custom(format!(
                "invalid level size {}x{}",
                saved.width, saved.height
            )));
        }

        let mut level: Level = Level::new(saved.id, saved.width, saved.height, saved.wrap);
        level.generate(&mut Prng::default());
        if !level.load(&saved.dump) {
            return Err(de::Error::invalid_value(
                de::Unexpected::Str(&saved.dump),
                &"a dump of one character per cell",
            ));
        }
        Ok(level)
    }
}

/// Save file of the game in progress.
pub struct SaverGame {
    file: JsonFile,
}

impl SaverGame {
    /// Create a [`SaverGame`] object for the given data directory.
    pub fn new(data_dir: &Path) -> Self {
        Self {
            file: JsonFile::new(data_dir, SAVE_GAME_FILE),
        }
    }

    /// Return the saved game, or [`None`] if there is no game in progress.
    pub fn get_game(&self) -> Result<Option<Game>, Box<dyn Error>> {
        let game: Option<Game> = self.file.read()?;
        if let Some(g) = &game {
            info!(
                "Resuming level {} ({}x{}) after {} moves",
                g.level.id(),
                g.level.width(),
                g.level.height(),
                g.moves
            );
        }
        Ok(game)
    }

    /// Save the game in progress. A solved game has nothing left to resume, so its save file is
    /// removed instead.
    pub fn save_game(&self, game: &Game) -> Result<(), Box<dyn Error>> {
        if game.is_solved() {
            self.delete_save()?;
            return Ok(());
        }
        self.file.write(game)
    }

    /// Delete the saved game.
    pub fn delete_save(&self) -> Result<(), Box<dyn Error>> {
        self.file.remove()?;
        Ok(())
    }
}
