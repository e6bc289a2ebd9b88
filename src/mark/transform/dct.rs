// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Orthonormal 8×8 DCT-II and its inverse.
//!
//! Blocks are 64 samples in natural (row-major) order. Coefficient
//! `v * 8 + u` is vertical frequency `v`, horizontal frequency `u`.
//! Samples are level-shifted by 128 before the forward transform and
//! shifted back after the inverse, so a flat mid-grey block has a zero DC.

use std::sync::OnceLock;

/// Side length of a transform block.
pub const BLOCK: usize = 8;

/// `COSINE[u][x] = cos((2*x + 1) * u * PI / 16)`
static COSINE: OnceLock<[[f64; 8]; 8]> = OnceLock::new();

/// C(0) = 1/sqrt(8), C(u>0) = 1/2.
static NORM: OnceLock<[f64; 8]> = OnceLock::new();

fn cosine_table() -> &'static [[f64; 8]; 8] {
    COSINE.get_or_init(|| {
        let mut table = [[0.0f64; 8]; 8];
        for (u, row) in table.iter_mut().enumerate() {
            for (x, v) in row.iter_mut().enumerate() {
                *v = ((2 * x + 1) as f64 * u as f64 * std::f64::consts::PI / 16.0).cos();
            }
        }
        table
    })
}

fn norm_table() -> &'static [f64; 8] {
    NORM.get_or_init(|| {
        let mut n = [0.5f64; 8];
        n[0] = 1.0 / (8.0f64).sqrt();
        n
    })
}

/// Forward DCT of 64 pixel values (~0–255).
pub fn forward(pixels: &[f64; 64]) -> [f64; 64] {
    let cos = cosine_table();
    let c = norm_table();

    // Rows.
    let mut temp = [0.0f64; 64];
    for row in 0..BLOCK {
        for u in 0..BLOCK {
            let mut sum = 0.0;
            for x in 0..BLOCK {
                sum += (pixels[row * 8 + x] - 128.0) * cos[u][x];
            }
            temp[row * 8 + u] = c[u] * sum;
        }
    }

    // Columns.
    let mut coeffs = [0.0f64; 64];
    for col in 0..BLOCK {
        for v in 0..BLOCK {
            let mut sum = 0.0;
            for y in 0..BLOCK {
                sum += temp[y * 8 + col] * cos[v][y];
            }
            coeffs[v * 8 + col] = c[v] * sum;
        }
    }
    coeffs
}

/// Inverse DCT back to pixel values. Not rounded or clamped.
pub fn inverse(coeffs: &[f64; 64]) -> [f64; 64] {
    let cos = cosine_table();
    let c = norm_table();

    // Columns.
    let mut temp = [0.0f64; 64];
    for col in 0..BLOCK {
        for y in 0..BLOCK {
            let mut sum = 0.0;
            for v in 0..BLOCK {
                sum += c[v] * coeffs[v * 8 + col] * cos[v][y];
            }
            temp[y * 8 + col] = sum;
        }
    }

    // Rows.
    let mut pixels = [0.0f64; 64];
    for row in 0..BLOCK {
        for x in 0..BLOCK {
            let mut sum = 0.0;
            for u in 0..BLOCK {
                sum += c[u] * temp[row * 8 + u] * cos[u][x];
            }
            pixels[row * 8 + x] = sum + 128.0;
        }
    }
    pixels
}
