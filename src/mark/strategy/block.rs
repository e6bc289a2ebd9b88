// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! 8×8 block DCT quantization embedding.
//!
//! One bit per complete 8×8 luma block, blocks taken in row-major order.
//! A fixed mid-frequency coefficient is overwritten with `+threshold`
//! (bit 1) or `-threshold` (bit 0) whatever its original value; extraction
//! reads only its sign. Rounding the rebuilt block back to 8-bit samples
//! perturbs the coefficient by far less than the threshold, so the sign
//! survives exactly. Samples outside complete blocks are never touched.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use serde::{Deserialize, Serialize};

use crate::carrier::{Carrier, Plane};
use crate::mark::config::ConfigError;
use crate::mark::error::Result;
use crate::mark::strategy::{check_payload, sign_target, Embedder};
use crate::mark::transform::dct::{self, BLOCK};

/// Default quantization magnitude.
pub const DEFAULT_THRESHOLD: f64 = 30.0;

/// Default coefficient `(row, col)`: vertical and horizontal frequency 4.
pub const DEFAULT_COEFFICIENT: (usize, usize) = (4, 4);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BlockQuant {
    pub threshold: f64,
    pub coefficient: (usize, usize),
}

impl Default for BlockQuant {
    fn default() -> Self {
        Self { threshold: DEFAULT_THRESHOLD, coefficient: DEFAULT_COEFFICIENT }
    }
}

impl BlockQuant {
    /// Range-check the parameters. `embed` refuses an invalid instance and
    /// `capacity`/`extract` treat it as holding nothing.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if !(self.threshold.is_finite() && self.threshold > 0.0) {
            return Err(ConfigError::Invalid { field: "block_quant.threshold", reason: "must be positive" });
        }
        let (v, u) = self.coefficient;
        if v >= BLOCK || u >= BLOCK {
            return Err(ConfigError::Invalid { field: "block_quant.coefficient", reason: "must lie inside the 8x8 block" });
        }
        if (v, u) == (0, 0) {
            return Err(ConfigError::Invalid { field: "block_quant.coefficient", reason: "DC cannot carry a sign bit" });
        }
        Ok(())
    }

    /// Row-major index of the carrying coefficient; only valid after
    /// [`BlockQuant::validate`].
    fn coefficient_index(&self) -> usize {
        let (v, u) = self.coefficient;
        v * BLOCK + u
    }

    fn blocks_wide(carrier: &Carrier) -> usize {
        carrier.width() / BLOCK
    }
}

fn read_block(luma: &Plane<u8>, block_row: usize, block_col: usize) -> [f64; 64] {
    let mut out = [0.0f64; 64];
    for y in 0..BLOCK {
        for x in 0..BLOCK {
            out[y * BLOCK + x] = luma.get(block_row * BLOCK + y, block_col * BLOCK + x) as f64;
        }
    }
    out
}

fn write_block(luma: &mut Plane<u8>, block_row: usize, block_col: usize, pixels: &[f64; 64]) {
    for y in 0..BLOCK {
        for x in 0..BLOCK {
            let v = pixels[y * BLOCK + x].round().clamp(0.0, 255.0) as u8;
            luma.set(block_row * BLOCK + y, block_col * BLOCK + x, v);
        }
    }
}

impl Embedder for BlockQuant {
    fn name(&self) -> &'static str {
        "block_quant"
    }

    fn capacity(&self, carrier: &Carrier) -> usize {
        if self.validate().is_err() {
            return 0;
        }
        (carrier.width() / BLOCK) * (carrier.height() / BLOCK)
    }

    fn embed(&self, carrier: &Carrier, bits: &[u8]) -> Result<Carrier> {
        self.validate()?;
        check_payload(self.name(), bits, self.capacity(carrier))?;

        let mut luma = carrier.luma_plane();
        let bw = Self::blocks_wide(carrier);
        let idx = self.coefficient_index();

        let mark_block = |(k, &bit): (usize, &u8)| {
            let mut coeffs = dct::forward(&read_block(&luma, k / bw, k % bw));
            coeffs[idx] = sign_target(bit, self.threshold);
            (k, dct::inverse(&coeffs))
        };

        #[cfg(feature = "parallel")]
        let marked: Vec<(usize, [f64; 64])> = bits.par_iter().enumerate().map(mark_block).collect();
        #[cfg(not(feature = "parallel"))]
        let marked: Vec<(usize, [f64; 64])> = bits.iter().enumerate().map(mark_block).collect();

        for (k, pixels) in &marked {
            write_block(&mut luma, k / bw, k % bw, pixels);
        }
        Ok(carrier.with_luma(&luma))
    }

    fn extract(&self, carrier: &Carrier, count: usize) -> Vec<u8> {
        let n = count.min(self.capacity(carrier));
        if n == 0 {
            return Vec::new();
        }
        let luma = carrier.luma_plane();
        let bw = Self::blocks_wide(carrier);
        let idx = self.coefficient_index();

        let read_bit = |k: usize| (dct::forward(&read_block(&luma, k / bw, k % bw))[idx] > 0.0) as u8;

        #[cfg(feature = "parallel")]
        let bits = (0..n).into_par_iter().map(read_bit).collect();
        #[cfg(not(feature = "parallel"))]
        let bits = (0..n).map(read_bit).collect();

        bits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mark::error::WatermarkError;

    fn carrier(w: usize, h: usize) -> Carrier {
        let mut pixels = Vec::with_capacity(w * h * 3);
        for y in 0..h {
            for x in 0..w {
                let v = 80 + ((x * 31 + y * 17 + x * y) % 90);
                pixels.extend_from_slice(&[(v + 5) as u8, v as u8, (v + 12) as u8]);
            }
        }
        Carrier::from_rgb(w, h, pixels).unwrap()
    }

    #[test]
    fn roundtrip_all_blocks() {
        let c = carrier(40, 24);
        let s = BlockQuant::default();
        assert_eq!(s.capacity(&c), 15);
        let bits: Vec<u8> = (0..15).map(|i| (i % 3 != 1) as u8).collect();
        let marked = s.embed(&c, &bits).unwrap();
        assert_eq!(s.extract(&marked, 15), bits);
        assert_eq!((marked.width(), marked.height()), (40, 24));
    }

    #[test]
    fn partial_blocks_untouched() {
        let c = carrier(20, 12);
        let s = BlockQuant::default();
        assert_eq!(s.capacity(&c), 2);
        let marked = s.embed(&c, &[1, 0]).unwrap();
        let (before, after) = (c.luma_plane(), marked.luma_plane());
        for y in 0..12 {
            for x in 0..20 {
                if y >= 8 || x >= 16 {
                    assert_eq!(before.get(y, x), after.get(y, x), "({y},{x})");
                }
            }
        }
        assert_eq!(s.extract(&marked, 2), vec![1, 0]);
    }

    #[test]
    fn saturated_blocks_keep_sign() {
        let white = Carrier::from_rgb(16, 8, vec![255; 16 * 8 * 3]).unwrap();
        let black = Carrier::from_rgb(16, 8, vec![0; 16 * 8 * 3]).unwrap();
        let s = BlockQuant::default();
        for c in [white, black] {
            let marked = s.embed(&c, &[1, 0]).unwrap();
            assert_eq!(s.extract(&marked, 2), vec![1, 0]);
        }
    }

    #[test]
    fn capacity_enforced_and_extract_capped() {
        let c = carrier(16, 16);
        let s = BlockQuant::default();
        assert!(s.embed(&c, &[1; 4]).is_ok());
        assert_eq!(s.embed(&c, &[1; 5]), Err(WatermarkError::Capacity { required: 5, available: 4 }));
        assert_eq!(s.extract(&c, 99).len(), 4);
    }

    #[test]
    fn invalid_parameters_refused_without_panicking() {
        let c = carrier(32, 32);
        let bad = [
            BlockQuant { coefficient: (9, 9), ..BlockQuant::default() },
            BlockQuant { coefficient: (0, 0), ..BlockQuant::default() },
            BlockQuant { threshold: -30.0, ..BlockQuant::default() },
            BlockQuant { threshold: f64::NAN, ..BlockQuant::default() },
        ];
        for s in bad {
            assert!(matches!(s.embed(&c, &[1, 0]), Err(WatermarkError::Config(_))), "{s:?}");
            assert_eq!(s.capacity(&c), 0, "{s:?}");
            assert!(s.extract(&c, 16).is_empty(), "{s:?}");
        }
    }

    #[test]
    fn too_small_for_a_block() {
        let c = carrier(7, 30);
        let s = BlockQuant::default();
        assert_eq!(s.capacity(&c), 0);
        assert!(s.extract(&c, 8).is_empty());
    }
}
