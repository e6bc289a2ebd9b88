// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Single-level wavelet subband LSB embedding.
//!
//! The luma plane gets one level of the integer Haar transform and bit `k`
//! is written as the least significant bit of coefficient `k` (row-major)
//! of the chosen detail subband. A coefficient with the wrong parity moves
//! by one, towards zero when that keeps its 2×2 pixel quad inside 0..=255.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::carrier::Carrier;
use crate::mark::error::Result;
use crate::mark::strategy::{check_payload, clamp_to_luma, padded_luma, Embedder};
use crate::mark::transform::wavelet::{self, inverse_quad, padded_len, SubBand};

const LEVELS: usize = 1;

/// Approximation offsets tried, in order, when fixing a coefficient's parity.
const LL_SHIFTS: [i32; 5] = [0, -1, 1, -2, 2];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SubbandLsb {
    pub subband: SubBand,
}

impl Default for SubbandLsb {
    fn default() -> Self {
        Self { subband: SubBand::LH }
    }
}

impl SubbandLsb {
    pub fn new(subband: SubBand) -> Self {
        Self { subband }
    }
}

#[inline]
fn lsb(c: i32) -> u8 {
    c.rem_euclid(2) as u8
}

fn quad_in_range(q: [i32; 4]) -> bool {
    q.iter().all(|v| (0..=255).contains(v))
}

impl Embedder for SubbandLsb {
    fn name(&self) -> &'static str {
        "subband_lsb"
    }

    fn capacity(&self, carrier: &Carrier) -> usize {
        let w = padded_len(carrier.width(), LEVELS) / 2;
        let h = padded_len(carrier.height(), LEVELS) / 2;
        w * h
    }

    fn embed(&self, carrier: &Carrier, bits: &[u8]) -> Result<Carrier> {
        check_payload(self.name(), bits, self.capacity(carrier))?;

        let mut dec = wavelet::forward(&padded_luma(carrier, LEVELS), LEVELS);
        let band_w = dec.approx.width();

        for (k, &bit) in bits.iter().enumerate() {
            let (i, j) = (k / band_w, k % band_w);
            let bands = &dec.details[0];
            let c = bands.band(self.subband).get(i, j);
            if lsb(c) == bit {
                continue;
            }

            let ll = dec.approx.get(i, j);
            let quad_with = |ll: i32, v: i32| {
                let (mut lh, mut hl, mut hh) = (bands.lh.get(i, j), bands.hl.get(i, j), bands.hh.get(i, j));
                match self.subband {
                    SubBand::LH => lh = v,
                    SubBand::HL => hl = v,
                    SubBand::HH => hh = v,
                }
                inverse_quad(ll, lh, hl, hh)
            };

            // Near saturation neither neighbour fits as is; the approximation
            // carries no payload, so it may shift to pull the quad back in.
            let candidates = if c > 0 { [c - 1, c + 1] } else { [c + 1, c - 1] };
            let fix = LL_SHIFTS
                .iter()
                .flat_map(|&dl| candidates.into_iter().map(move |v| (ll + dl, v)))
                .find(|&(l, v)| quad_in_range(quad_with(l, v)));
            let (new_ll, chosen) = match fix {
                Some(found) => found,
                None => {
                    warn!(row = i, col = j, "no in-range parity fix for coefficient, pixels will clip");
                    (ll, candidates[0])
                }
            };
            dec.approx.set(i, j, new_ll);
            dec.details[0].band_mut(self.subband).set(i, j, chosen);
        }

        let luma = clamp_to_luma(&wavelet::inverse(&dec));
        Ok(carrier.with_luma(&luma))
    }

    fn extract(&self, carrier: &Carrier, count: usize) -> Vec<u8> {
        let dec = wavelet::forward(&padded_luma(carrier, LEVELS), LEVELS);
        dec.details[0].band(self.subband).samples().iter().take(count).map(|&c| lsb(c)).collect()
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
                let v = 90 + ((x * 13 + y * 29) % 70);
                pixels.extend_from_slice(&[v as u8, (v + 10) as u8, (v - 20) as u8]);
            }
        }
        Carrier::from_rgb(w, h, pixels).unwrap()
    }

    fn pattern(n: usize) -> Vec<u8> {
        (0..n).map(|i| ((i * 7 + i / 3) % 2) as u8).collect()
    }

    #[test]
    fn roundtrip_every_subband() {
        let c = carrier(16, 12);
        for band in [SubBand::LH, SubBand::HL, SubBand::HH] {
            let s = SubbandLsb::new(band);
            assert_eq!(s.capacity(&c), 48);
            let bits = pattern(48);
            let marked = s.embed(&c, &bits).unwrap();
            assert_eq!(s.extract(&marked, 48), bits, "{band:?}");
        }
    }

    #[test]
    fn odd_dimensions_are_padded() {
        let c = carrier(9, 7);
        let s = SubbandLsb::default();
        assert_eq!(s.capacity(&c), 5 * 4);
        let bits = pattern(20);
        let marked = s.embed(&c, &bits).unwrap();
        assert_eq!((marked.width(), marked.height()), (10, 8));
        assert_eq!(s.extract(&marked, 20), bits);
    }

    #[test]
    fn capacity_enforced() {
        let c = carrier(8, 8);
        let s = SubbandLsb::default();
        assert!(s.embed(&c, &pattern(16)).is_ok());
        assert_eq!(
            s.embed(&c, &pattern(17)),
            Err(WatermarkError::Capacity { required: 17, available: 16 })
        );
    }

    #[test]
    fn saturated_quads_stay_exact() {
        let c = Carrier::from_rgb(4, 2, vec![255; 24]).unwrap();
        let s = SubbandLsb::default();
        let marked = s.embed(&c, &[1, 1]).unwrap();
        assert_eq!(s.extract(&marked, 2), vec![1, 1]);
    }
}
