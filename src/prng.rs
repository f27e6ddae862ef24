/*
prng.rs

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

//! Deterministic pseudo-random number generator.
//!
//! Level identifiers are PRNG seeds: the same identifier must always produce the same puzzle, on
//! any platform. [`Prng`] wraps a 64-bit Mersenne Twister (MT19937-64) so that the sequence is
//! fully specified, instead of relying on the unspecified algorithm behind [`rand::rngs::StdRng`].

use rand::RngCore;
use rand::rand_core::impls;
use rand_mt::Mt64;
use std::fmt;

/// Seed used by [`Prng::default`]. This is the reference seed of the MT19937-64 algorithm.
const DEFAULT_SEED: u64 = 5489;

/// Seedable MT19937-64 generator.
#[derive(Clone)]
pub struct Prng {
    inner: Mt64,
}

impl Default for Prng {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl fmt::Debug for Prng {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Prng").finish_non_exhaustive()
    }
}

impl Prng {
    /// Create a [`Prng`] object initialized with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            inner: Mt64::new(seed),
        }
    }

    /// Restart the sequence from the given seed.
    pub fn seed(&mut self, seed: u64) {
        self.inner = Mt64::new(seed);
    }

    /// Return the next 32-bit value (the upper half of the next 64-bit output).
    pub fn next_u32(&mut self) -> u32 {
        (self.inner.next_u64() >> 32) as u32
    }

    /// Return a value in the half-open range `min..max`.
    ///
    /// # Panics
    ///
    /// The method panics if `min >= max`.
    pub fn range(&mut self, min: usize, max: usize) -> usize {
        assert!(min < max, "empty PRNG range {min}..{max}");
        min + (self.next_u32() as usize) % (max - min)
    }
}

impl RngCore for Prng {
    fn next_u32(&mut self) -> u32 {
        Prng::next_u32(self)
    }

    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        impls::fill_bytes_via_next(self, dst);
    }
}
