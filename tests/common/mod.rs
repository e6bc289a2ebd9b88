// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use lineage_mark::{BlockQuant, Carrier, PixelParity, RobustQuant, Strategy, SubBand, SubbandLsb};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic mid-range test image: a diagonal gradient with per-pixel
/// noise, mildly tinted so chroma is non-zero.
pub fn textured_carrier(width: usize, height: usize, seed: u64) -> Carrier {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut pixels = Vec::with_capacity(width * height * 3);
    for y in 0..height {
        for x in 0..width {
            let base = 96 + ((x + y) * 64) / (width + height);
            let v = (base as i32 + rng.gen_range(-12..=12)) as u8;
            pixels.extend_from_slice(&[v.saturating_add(6), v, v.saturating_sub(8)]);
        }
    }
    Carrier::from_rgb(width, height, pixels).unwrap()
}

/// One instance of every strategy with default settings.
pub fn all_strategies() -> Vec<Strategy> {
    vec![
        Strategy::PixelParity(PixelParity),
        Strategy::SubbandLsb(SubbandLsb::new(SubBand::LH)),
        Strategy::BlockQuant(BlockQuant::default()),
        Strategy::RobustQuant(RobustQuant::default()),
    ]
}

/// Random 0/1 vector.
pub fn random_bits(n: usize, seed: u64) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n).map(|_| rng.gen_range(0..=1u8)).collect()
}

/// Route `tracing` output through the test harness.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}
