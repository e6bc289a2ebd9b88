// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Multi-level wavelet quantization embedding.
//!
//! The luma plane is decomposed `levels` deep with the integer Haar
//! transform. Robust positions are every `stride`-th row and column of the
//! coarsest LH subband, then of the coarsest HL subband, row-major. Each
//! position is set to `±threshold` and read back by sign, the same
//! quantization rule as [`super::BlockQuant`]. Coarse coefficients spread
//! over `2^levels × 2^levels` pixels, which is what buys robustness.
//!
//! Capacity is the exact number of positions, capped at `max_bits`.

use serde::{Deserialize, Serialize};

use crate::carrier::Carrier;
use crate::mark::config::ConfigError;
use crate::mark::error::Result;
use crate::mark::strategy::{check_payload, clamp_to_luma, padded_luma, Embedder};
use crate::mark::transform::wavelet::{self, padded_len, SubBand};

/// Subbands carrying payload, in visiting order.
const ROBUST_BANDS: [SubBand; 2] = [SubBand::LH, SubBand::HL];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RobustQuant {
    pub levels: usize,
    pub stride: usize,
    pub threshold: i32,
    pub max_bits: usize,
}

impl Default for RobustQuant {
    fn default() -> Self {
        Self { levels: 2, stride: 4, threshold: 15, max_bits: 1000 }
    }
}

impl RobustQuant {
    /// Deepest supported decomposition.
    pub const MAX_LEVELS: usize = 8;

    /// Range-check the parameters. `embed` refuses an invalid instance and
    /// `capacity`/`extract` treat it as holding nothing.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.levels == 0 || self.levels > Self::MAX_LEVELS {
            return Err(ConfigError::Invalid { field: "robust_quant.levels", reason: "must be between 1 and 8" });
        }
        if self.stride == 0 {
            return Err(ConfigError::Invalid { field: "robust_quant.stride", reason: "must be at least 1" });
        }
        if self.threshold <= 0 {
            return Err(ConfigError::Invalid { field: "robust_quant.threshold", reason: "must be positive" });
        }
        Ok(())
    }

    /// Shape `(width, height)` of the coarsest subbands.
    fn coarse_shape(&self, carrier: &Carrier) -> (usize, usize) {
        let w = padded_len(carrier.width(), self.levels) >> self.levels;
        let h = padded_len(carrier.height(), self.levels) >> self.levels;
        (w, h)
    }

    /// Robust positions `(band, row, col)` in embedding order.
    pub fn positions(&self, carrier: &Carrier) -> Vec<(SubBand, usize, usize)> {
        if self.validate().is_err() {
            return Vec::new();
        }
        let (w, h) = self.coarse_shape(carrier);
        let stride = self.stride.max(1);
        let mut out = Vec::new();
        for band in ROBUST_BANDS {
            for i in (0..h).step_by(stride) {
                for j in (0..w).step_by(stride) {
                    out.push((band, i, j));
                }
            }
        }
        out
    }
}

impl Embedder for RobustQuant {
    fn name(&self) -> &'static str {
        "robust_quant"
    }

    fn capacity(&self, carrier: &Carrier) -> usize {
        if self.validate().is_err() {
            return 0;
        }
        let (w, h) = self.coarse_shape(carrier);
        let stride = self.stride.max(1);
        let exact = ROBUST_BANDS.len() * h.div_ceil(stride) * w.div_ceil(stride);
        exact.min(self.max_bits)
    }

    fn embed(&self, carrier: &Carrier, bits: &[u8]) -> Result<Carrier> {
        self.validate()?;
        check_payload(self.name(), bits, self.capacity(carrier))?;

        let mut dec = wavelet::forward(&padded_luma(carrier, self.levels), self.levels);
        let positions = self.positions(carrier);
        if let Some(coarse) = dec.coarsest_mut() {
            for (&(band, i, j), &bit) in positions.iter().zip(bits) {
                coarse.band_mut(band).set(i, j, if bit == 1 { self.threshold } else { -self.threshold });
            }
        }

        let luma = clamp_to_luma(&wavelet::inverse(&dec));
        Ok(carrier.with_luma(&luma))
    }

    fn extract(&self, carrier: &Carrier, count: usize) -> Vec<u8> {
        let n = count.min(self.capacity(carrier));
        if n == 0 {
            return Vec::new();
        }
        let dec = wavelet::forward(&padded_luma(carrier, self.levels), self.levels);
        let Some(coarse) = dec.coarsest() else {
            return Vec::new();
        };
        self.positions(carrier)
            .into_iter()
            .take(n)
            .map(|(band, i, j)| (coarse.band(band).get(i, j) > 0) as u8)
            .collect()
    }
}
