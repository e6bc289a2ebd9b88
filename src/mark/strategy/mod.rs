// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Coefficient embedding strategies.
//!
//! Every strategy works on the carrier's luma plane and shares one contract:
//!
//! - `embed(carrier, bits)` is deterministic and fails with
//!   [`WatermarkError::Capacity`] when `bits.len() > capacity(carrier)`.
//! - `extract(carrier', n)` on an unmodified output returns exactly the
//!   first `n` embedded bits.
//! - `extract` never fails; asking for more than `capacity` returns only
//!   the bits that exist.
//!
//! | strategy        | domain                     | capacity                      |
//! |-----------------|----------------------------|-------------------------------|
//! | [`PixelParity`] | luma samples               | pixel count                   |
//! | [`SubbandLsb`]  | one level-1 Haar subband   | subband coefficient count     |
//! | [`BlockQuant`]  | 8×8 DCT, one coefficient   | complete 8×8 blocks           |
//! | [`RobustQuant`] | coarsest Haar LH + HL      | strided positions, capped     |

pub mod block;
pub mod parity;
pub mod robust;
pub mod subband;

pub use block::BlockQuant;
pub use parity::PixelParity;
pub use robust::RobustQuant;
pub use subband::SubbandLsb;

use tracing::{debug, warn};

use crate::carrier::{Carrier, Plane};
use crate::mark::config::ConfigError;
use crate::mark::bits::check_binary;
use crate::mark::error::{Result, WatermarkError};
use crate::mark::transform::wavelet::padded_len;

/// Embed/extract/capacity contract shared by all strategies.
pub trait Embedder: Send + Sync {
    /// Stable identifier, reported as the algorithm name.
    fn name(&self) -> &'static str;

    /// Number of bits `carrier` can hold.
    fn capacity(&self, carrier: &Carrier) -> usize;

    /// Write `bits` into the first `bits.len()` positions.
    fn embed(&self, carrier: &Carrier, bits: &[u8]) -> Result<Carrier>;

    /// Read up to `count` bits.
    fn extract(&self, carrier: &Carrier, count: usize) -> Vec<u8>;
}

/// Closed set of the available strategies.
#[derive(Debug, Clone, PartialEq)]
pub enum Strategy {
    PixelParity(PixelParity),
    SubbandLsb(SubbandLsb),
    BlockQuant(BlockQuant),
    RobustQuant(RobustQuant),
}

impl Strategy {
    /// Range-check the wrapped strategy's parameters.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        match self {
            Self::PixelParity(_) | Self::SubbandLsb(_) => Ok(()),
            Self::BlockQuant(s) => s.validate(),
            Self::RobustQuant(s) => s.validate(),
        }
    }

    fn inner(&self) -> &dyn Embedder {
        match self {
            Self::PixelParity(s) => s,
            Self::SubbandLsb(s) => s,
            Self::BlockQuant(s) => s,
            Self::RobustQuant(s) => s,
        }
    }
}

impl Default for Strategy {
    fn default() -> Self {
        Self::RobustQuant(RobustQuant::default())
    }
}

impl Embedder for Strategy {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn capacity(&self, carrier: &Carrier) -> usize {
        self.inner().capacity(carrier)
    }

    fn embed(&self, carrier: &Carrier, bits: &[u8]) -> Result<Carrier> {
        self.inner().embed(carrier, bits)
    }

    fn extract(&self, carrier: &Carrier, count: usize) -> Vec<u8> {
        self.inner().extract(carrier, count)
    }
}

/// Validate a payload against a strategy's capacity.
pub(crate) fn check_payload(name: &str, bits: &[u8], available: usize) -> Result<()> {
    check_binary(bits)?;
    if bits.len() > available {
        warn!(strategy = name, required = bits.len(), available, "payload exceeds carrier capacity");
        return Err(WatermarkError::Capacity { required: bits.len(), available });
    }
    Ok(())
}

/// Sign-forcing quantization target: `+threshold` for 1, `-threshold` for 0.
#[inline]
pub(crate) fn sign_target(bit: u8, threshold: f64) -> f64 {
    if bit == 1 {
        threshold
    } else {
        -threshold
    }
}

/// Luma plane as `i32`, edge-extended so both sides are multiples of
/// `2^levels`.
pub(crate) fn padded_luma(carrier: &Carrier, levels: usize) -> Plane<i32> {
    let luma = carrier.luma_plane();
    let (w, h) = (padded_len(luma.width(), levels), padded_len(luma.height(), levels));
    luma.extend_edges(w, h).map(|v| v as i32)
}

/// Clamp a reconstructed plane to the 8-bit range.
pub(crate) fn clamp_to_luma(plane: &Plane<i32>) -> Plane<u8> {
    let clipped = plane.samples().iter().filter(|&&v| !(0..=255).contains(&v)).count();
    if clipped > 0 {
        debug!(clipped, "reconstructed luma clipped to 0..=255");
    }
    plane.map(|v| v.clamp(0, 255) as u8)
}
