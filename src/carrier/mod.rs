// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! In-memory RGB carrier images.
//!
//! A [`Carrier`] is a decoded 3-channel, 8-bit pixel buffer handed over by
//! an external image decoder. This crate never parses PNG/JPEG containers;
//! it reads and writes pixel buffers only.
//!
//! Strategies never touch RGB directly. They read the luma plane with
//! [`Carrier::luma_plane`] and write a modified plane back with
//! [`Carrier::with_luma`], which reconciles shapes and keeps chroma.

pub mod color;
pub mod error;
pub mod plane;
pub mod resample;

pub use error::CarrierError;
pub use plane::Plane;

use tracing::debug;

/// Number of interleaved channels per pixel (R, G, B).
pub const CHANNELS: usize = 3;

/// Decoded RGB image, row-major, channels interleaved as R, G, B.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Carrier {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl Carrier {
    /// Wrap a decoded RGB buffer.
    ///
    /// # Errors
    /// - [`CarrierError::Empty`] if the buffer or either dimension is zero.
    /// - [`CarrierError::BufferSize`] if `pixels.len() != width * height * 3`.
    pub fn from_rgb(width: usize, height: usize, pixels: Vec<u8>) -> Result<Self, CarrierError> {
        if width == 0 || height == 0 || pixels.is_empty() {
            return Err(CarrierError::Empty);
        }
        let expected = width
            .checked_mul(height)
            .and_then(|p| p.checked_mul(CHANNELS))
            .ok_or(CarrierError::BufferSize { expected: usize::MAX, got: pixels.len() })?;
        if pixels.len() != expected {
            return Err(CarrierError::BufferSize { expected, got: pixels.len() });
        }
        Ok(Self { width, height, pixels })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw interleaved RGB bytes.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// RGB triple at row `y`, column `x`.
    pub fn pixel(&self, y: usize, x: usize) -> [u8; 3] {
        let i = (y * self.width + x) * CHANNELS;
        [self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]]
    }

    /// Reject carriers smaller than `min` pixels on either side.
    pub fn ensure_min_dimension(&self, min: usize) -> Result<(), CarrierError> {
        if self.width < min || self.height < min {
            return Err(CarrierError::TooSmall {
                width: self.width,
                height: self.height,
                min,
            });
        }
        Ok(())
    }

    /// Extract the integer luma channel.
    pub fn luma_plane(&self) -> Plane<u8> {
        let samples = self
            .pixels
            .chunks_exact(CHANNELS)
            .map(|px| color::luma([px[0], px[1], px[2]]))
            .collect();
        Plane::from_vec(self.width, self.height, samples)
    }

    /// Build a new carrier whose luma channel equals `luma` exactly.
    ///
    /// If the plane's shape differs from the carrier's (a padded wavelet
    /// reconstruction), the chroma side is first resampled onto the plane's
    /// shape with [`resample::resample_edge_clamped`]. Pixels whose luma
    /// already matches are left untouched.
    pub fn with_luma(&self, luma: &Plane<u8>) -> Carrier {
        let (w, h) = (luma.width(), luma.height());
        let mut pixels = if (w, h) == (self.width, self.height) {
            self.pixels.clone()
        } else {
            debug!(
                from_w = self.width,
                from_h = self.height,
                to_w = w,
                to_h = h,
                "reconciling chroma to luma shape"
            );
            resample::resample_edge_clamped(&self.pixels, self.width, self.height, w, h)
        };

        for (px, &target) in pixels.chunks_exact_mut(CHANNELS).zip(luma.samples()) {
            let out = color::realize_luma([px[0], px[1], px[2]], target);
            px.copy_from_slice(&out);
        }

        Carrier { width: w, height: h, pixels }
    }
}
