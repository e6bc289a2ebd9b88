// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Luma parity embedding.
//!
//! Bit `i` becomes the parity of luma sample `i` (row-major):
//! `Y' = Y - (Y mod 2) + bit`. Each sample moves by at most 1. Any lossy
//! re-encoding destroys the payload.

use crate::carrier::Carrier;
use crate::mark::error::Result;
use crate::mark::strategy::{check_payload, Embedder};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PixelParity;

impl Embedder for PixelParity {
    fn name(&self) -> &'static str {
        "pixel_parity"
    }

    fn capacity(&self, carrier: &Carrier) -> usize {
        carrier.width() * carrier.height()
    }

    fn embed(&self, carrier: &Carrier, bits: &[u8]) -> Result<Carrier> {
        check_payload(self.name(), bits, self.capacity(carrier))?;
        let mut luma = carrier.luma_plane();
        for (y, &bit) in luma.samples_mut().iter_mut().zip(bits) {
            *y = *y - (*y % 2) + bit;
        }
        Ok(carrier.with_luma(&luma))
    }

    fn extract(&self, carrier: &Carrier, count: usize) -> Vec<u8> {
        carrier.luma_plane().samples().iter().take(count).map(|&y| y & 1).collect()
    }
}
