/*
lib.rs

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

//! Pipe-connection puzzle engine.
//!
//! A level is a grid of cells holding pipe pieces. One cell is the sender (the power source),
//! and several cells are receivers. The player rotates the pipes until every receiver is powered
//! by the sender.
//!
//! * [`level::Level`] is the grid. It is filled by [`level::Level::generate`] (see
//!   [`generator`]), which always produces a solved level, and scrambled by
//!   [`level::Level::reset`].
//! * [`cell::Cell`] objects carry the pipe, the lock, the powered status, and the rotation
//!   animation.
//! * The tracer (see [`trace`]) floods the power from the sender after each change.
//! * [`game::Game`] wraps a level with the move counter and the timer, and [`saver`] saves the
//!   game in progress and the high scores.

pub mod cell;
pub mod config;
pub mod game;
pub mod generator;
pub mod highscores;
pub mod level;
pub mod pipe;
pub mod prng;
pub mod saver;
pub mod trace;
