/*
saver.rs

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


//! Save and restore the game in progress and the high scores.
//!
//! Both files are JSON documents in the data directory (see [`crate::config::data_dir`]).
//! [`JsonFile`] does the file handling for both of them. A missing file reads as [`None`].
//! A write goes to a temporary file first, which is then renamed over the previous version, so
//! that an interrupted save never leaves a truncated document behind.

pub mod game;
pub mod highscores;

use log::{debug, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::error::Error;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

/// JSON document in the data directory.
#[derive(Debug, Clone)]
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    /// Create a [`JsonFile`] object for the file `name` in the `data_dir` directory.
    pub fn new(data_dir: &Path, name: &str) -> Self {
        let path: PathBuf = data_dir.join(name);
        debug!("JSON file: {path:?}");
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and decode the document. Return [`None`] if the file does not exist.
    pub fn read<T: DeserializeOwned>(&self) -> Result<Option<T>, Box<dyn Error>> {
        let file: File = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let value: T = serde_json::from_reader(BufReader::new(file))?;
        Ok(Some(value))
    }

    /// Encode and write the document. The directory is created when needed.
    pub fn write<T: Serialize>(&self, value: &T) -> Result<(), Box<dyn Error>> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let tmp: PathBuf = self.path.with_extension("json.tmp");
        if let Err(e) = Self::write_to(&tmp, value) {
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn write_to<T: Serialize>(path: &Path, value: &T) -> Result<(), Box<dyn Error>> {
        let mut writer: BufWriter<File> = BufWriter::new(File::create(path)?);
        serde_json::to_writer(&mut writer, value)?;
        writer.flush()?;
        Ok(())
    }

    /// Delete the document. A missing file is not an error.
    pub fn remove(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != ErrorKind::NotFound => {
                warn!("Cannot remove {:?}: {e}", self.path);
                Err(e)
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn temp_data_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("pipenet-json-{name}-{}", std::process::id()))
    }

    #[test]
    fn write_replaces_the_document_and_leaves_no_temporary_file() {
        let dir: PathBuf = temp_data_dir("replace");
        let file = JsonFile::new(&dir, "doc.json");
        assert!(file.read::<Vec<u32>>().unwrap().is_none());

        file.write(&vec![1_u32, 2, 3]).unwrap();
        file.write(&vec![4_u32]).unwrap();
        assert_eq!(file.read::<Vec<u32>>().unwrap(), Some(vec![4]));
        assert!(!dir.join("doc.json.tmp").exists());

        file.remove().unwrap();
        file.remove().unwrap();
        assert!(!file.path().exists());
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn undecodable_document_is_an_error() {
        let dir: PathBuf = temp_data_dir("garbage");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("doc.json"), "{not json").unwrap();
        let file = JsonFile::new(&dir, "doc.json");
        assert!(file.read::<BTreeMap<String, u32>>().is_err());
        let _ = fs::remove_dir_all(dir);
    }
}
