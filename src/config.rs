/*
config.rs

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

//! Build-time settings and file locations.

use std::env;
use std::path::PathBuf;

pub const COPYRIGHT_NOTICE: &str = "Copyright 2025 Hervé Quatremain
License GPLv3+: GNU GPL version 3 or later <https://gnu.org/licenses/gpl.html>.
This is free software: you are free to change and redistribute it.
There is NO WARRANTY, to the extent permitted by law.";

/// Default grid size.
pub const DEFAULT_WIDTH: usize = 10;
pub const DEFAULT_HEIGHT: usize = 10;

/// Name of the file that stores the game in progress.
pub const SAVE_GAME_FILE: &str = "savegame.json";

/// Name of the file that stores the high scores.
pub const HIGHSCORES_FILE: &str = "highscores.json";

/// Environment variable that overrides the data directory.
pub const DATA_DIR_ENV: &str = "PIPENET_DATA_DIR";

/// Return the directory where the saved game and the high scores are stored.
///
/// The directory is, in order of preference, the provided directory, the directory from the
/// [`DATA_DIR_ENV`] environment variable, `$XDG_DATA_HOME/pipenet`, or
/// `$HOME/.local/share/pipenet`. The current directory is the last resort.
pub fn data_dir(requested: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = requested {
        return dir;
    }
    if let Some(dir) = env::var_os(DATA_DIR_ENV).filter(|d| !d.is_empty()) {
        return PathBuf::from(dir);
    }
    if let Some(dir) = env::var_os("XDG_DATA_HOME").filter(|d| !d.is_empty()) {
        return PathBuf::from(dir).join("pipenet");
    }
    match env::var_os("HOME").filter(|d| !d.is_empty()) {
        Some(home) => PathBuf::from(home).join(".local/share/pipenet"),
        None => PathBuf::from("."),
    }
}
