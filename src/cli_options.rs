/*
cli_options.rs

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

//! Process command-line options.
//!
//! These options are intended for developers tuning the level generator.
//! In command-line mode, Pipenet generates levels and prints them as text, as dumps, or as JSON.
//!
//! # Examples
//!
//! Generate the level 1 on a 6x4 grid, and print it with the pipes drawn as box characters.
//! `S` marks the sender, and `R` (powered) or `r` (not powered) the receivers:
//!
//! ```text
//! $ pipenet -W 6 -H 4 -i 1
//! ```
//!
//! Apply a dump (see `Level::save`) to the level 1 and report how many receivers are powered:
//!
//! ```text
//! $ pipenet -W 6 -H 4 -i 1 -l AEKMCAAFDFIAAAAEFFMAAAKI
//! ```
//!
//! Generate 100 wrapping levels and print some statistics:
//!
//! ```text
//! $ pipenet -w -c 100 -f dump -s
//! ```

use chrono::{DateTime, Local};
use clap::{Parser, ValueEnum};
use log::debug;
use rand::Rng;
use std::env;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::Instant;

use pipenet::config::{self, COPYRIGHT_NOTICE, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use pipenet::game::Game;
use pipenet::level::Level;
use pipenet::prng::Prng;
use pipenet::saver::game::SaverGame;
use pipenet::saver::highscores::SaverHighScores;

/// How to print the levels.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Pipes drawn with box characters
    Text,
    /// One character per cell
    Dump,
    /// Identifier, size, and dump as JSON
    Json,
}

/// Generate Pipenet levels for developers.
#[derive(Parser)]
#[command(about, long_about = None, version, long_version = COPYRIGHT_NOTICE)]
struct Args {
    /// Width of the grid
    #[arg(short = 'W', long, default_value_t = DEFAULT_WIDTH, value_parser = parse_dimension)]
    width: usize,

    /// Height of the grid
    #[arg(short = 'H', long, default_value_t = DEFAULT_HEIGHT, value_parser = parse_dimension)]
    height: usize,

    /// Connect the edges of the grid to the opposite edges
    #[arg(short, long, default_value_t = false)]
    wrap: bool,

    /// Identifier of the first level (random by default)
    #[arg(short, long)]
    id: Option<u64>,

    /// Number of levels to generate, with consecutive identifiers
    #[arg(short, long, default_value_t = 1)]
    count: usize,

    /// Scramble the pipes, as at the start of a game
    #[arg(long, default_value_t = false)]
    scramble: bool,

    /// Output format
    #[arg(value_enum, short, long, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Apply the given dump to the level and report whether it is solved
    #[arg(short, long, conflicts_with_all = ["count", "scramble", "save"])]
    load: Option<String>,

    /// Print some statistics after generating the levels
    #[arg(short, long, default_value_t = false)]
    summary: bool,

    /// Save the first level, scrambled, as the game in progress
    #[arg(long, default_value_t = false)]
    save: bool,

    /// Print the game in progress
    #[arg(long, default_value_t = false, conflicts_with_all = ["save", "load"])]
    resume: bool,

    /// List the high scores
    #[arg(long, default_value_t = false)]
    scores: bool,

    /// Directory of the saved game and of the high scores
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Enable debug messages
    #[arg(short, long, default_value_t = false)]
    debug: bool,
}

/// Accept grid dimensions from 1 to 255.
fn parse_dimension(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(v) if (1..=255).contains(&v) => Ok(v),
        Ok(v) => Err(format!("{v} is not in 1..=255")),
        Err(e) => Err(e.to_string()),
    }
}

/// Parse and process command-line options, and return the exit code.
pub fn parse() -> u8 {
    let args: Args = Args::parse();

    if args.debug {
        unsafe {
            env::set_var("RUST_LOG", "debug");
        }
    }
    env_logger::init();

    let data_dir: PathBuf = config::data_dir(args.data_dir.clone());
    debug!("Data directory: {data_dir:?}");

    let ret: Result<(), Box<dyn Error>> = if args.scores {
        print_scores(&data_dir)
    } else if args.resume {
        print_saved_game(&data_dir, args.format)
    } else if let Some(dump) = &args.load {
        load_level(&args, dump)
    } else {
        generate_levels(&args, &data_dir)
    };

    match ret {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {e}");
            1
        }
    }
}

/// Print a level in the requested format.
fn print_level(level: &Level, format: OutputFormat) -> Result<(), Box<dyn Error>> {
    match format {
        OutputFormat::Text => {
            println!(
                "Level {} ({}x{}{})",
                level.id(),
                level.width(),
                level.height(),
                if level.wrap() { ", wrap" } else { "" }
            );
            print!("{level}");
        }
        OutputFormat::Dump => println!("{}", level.save()),
        OutputFormat::Json => println!("{}", serde_json::to_string(level)?),
    }
    Ok(())
}

/// Generate the levels, print them, and optionally save the first one as the game in progress.
fn generate_levels(args: &Args, data_dir: &Path) -> Result<(), Box<dyn Error>> {
    let first_id: u64 = args.id.unwrap_or_else(|| rand::rng().random());
    let requested: usize = args.width * args.height / 5;
    let mut prng: Prng = Prng::default();

    let mut total: f32 = 0.0;
    let mut max: f32 = 0.0;
    let mut delivered: usize = 0;
    let mut fully_wired: usize = 0;
    let mut complete: usize = 0;

    for i in 0..args.count {
        let id: u64 = first_id.wrapping_add(i as u64);
        debug!("Iteration {i}: level {id}");

        let mut level: Level = Level::new(id, args.width, args.height, args.wrap);
        let start: Instant = Instant::now();
        level.generate(&mut prng);
        let duration: f32 = start.elapsed().as_secs_f32();

        total += duration;
        max = max.max(duration);
        delivered += level.receivers().len();
        if level.receivers().len() == requested {
            fully_wired += 1;
        }
        if level.is_complete() {
            complete += 1;
        }

        if args.scramble {
            level.reset(&mut prng);
        }
        print_level(&level, args.format)?;
    }

    if args.save {
        let mut game: Game = Game::new(args.width, args.height, args.wrap);
        game.new_game(Some(first_id));
        SaverGame::new(data_dir).save_game(&game)?;
        println!("Level {first_id} saved as the game in progress");
    }

    // Print some stats
    if args.summary {
        let count: usize = args.count.max(1);
        println!(
            "
           levels = {}
  receivers/level = {}
average receivers = {}
      fully wired = {}
    solved levels = {}
       total time = {}s
     average time = {}s
         max time = {}s",
            args.count,
            requested,
            delivered as f32 / count as f32,
            fully_wired,
            complete,
            total,
            total / count as f32,
            max
        );
    }
    Ok(())
}

/// Apply a dump to the level and report its status.
fn load_level(args: &Args, dump: &str) -> Result<(), Box<dyn Error>> {
    let Some(id) = args.id else {
        return Err("--load requires the identifier of the level (--id)".into());
    };
    let mut level: Level = Level::new(id, args.width, args.height, args.wrap);
    level.generate(&mut Prng::default());
    if !level.load(dump) {
        return Err(format!(
            "the dump does not fit a {}x{} grid",
            args.width, args.height
        )
        .into());
    }
    print_level(&level, args.format)?;
    println!(
        "Powered receivers: {}/{}{}",
        level.active_receivers(),
        level.receivers().len(),
        if level.is_complete() { " (solved)" } else { "" }
    );
    Ok(())
}

/// Print the game in progress.
fn print_saved_game(data_dir: &Path, format: OutputFormat) -> Result<(), Box<dyn Error>> {
    match SaverGame::new(data_dir).get_game()? {
        Some(game) => {
            print_level(&game.level, format)?;
            let (h, m, s) = game.get_duration_hms();
            println!("Moves: {}  Time: {h:02}:{m:02}:{s:02}", game.moves);
        }
        None => println!("No game in progress"),
    }
    Ok(())
}

/// Print the scoreboards.
fn print_scores(data_dir: &Path) -> Result<(), Box<dyn Error>> {
    let highscores = match SaverHighScores::new(data_dir).get_highscores()? {
        Some(h) if !h.is_empty() => h,
        _ => {
            println!("No high scores yet");
            return Ok(());
        }
    };
    for (board, scores) in highscores.boards() {
        println!("{board}");
        for (i, score) in scores.iter().enumerate() {
            let when: DateTime<Local> = DateTime::from(score.when);
            let secs: u64 = score.time.as_secs();
            println!(
                "{:>3}. {:02}:{:02}  {:>4} moves  {}",
                i + 1,
                secs / 60,
                secs % 60,
                score.moves,
                when.format("%Y-%m-%d %H:%M")
            );
        }
    }
    Ok(())
}
