// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Reversible integer Haar wavelet.
//!
//! Each level splits a plane into four half-size subbands using the
//! lifting form of the Haar filter on sample pairs:
//!
//! ```text
//! forward:  d = a - b          inverse:  b = s - floor(d / 2)
//!           s = b + floor(d/2)           a = d + b
//! ```
//!
//! Rows are lifted first, then columns. Subbands are named by the filter
//! applied horizontally then vertically, so `LH` is horizontal low-pass /
//! vertical high-pass. The transform maps integers to integers and inverts
//! exactly, which is what lets coefficient edits read back bit-for-bit.
//!
//! Level 1 of the Haar transform touches disjoint 2×2 pixel quads, so both
//! directions are written per quad ([`forward_quad`] / [`inverse_quad`]).

use serde::{Deserialize, Serialize};

use crate::carrier::Plane;

/// Detail subband selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubBand {
    LH,
    HL,
    HH,
}

/// The three detail subbands of one decomposition level.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailBands {
    pub lh: Plane<i32>,
    pub hl: Plane<i32>,
    pub hh: Plane<i32>,
}

impl DetailBands {
    pub fn band(&self, which: SubBand) -> &Plane<i32> {
        match which {
            SubBand::LH => &self.lh,
            SubBand::HL => &self.hl,
            SubBand::HH => &self.hh,
        }
    }

    pub fn band_mut(&mut self, which: SubBand) -> &mut Plane<i32> {
        match which {
            SubBand::LH => &mut self.lh,
            SubBand::HL => &mut self.hl,
            SubBand::HH => &mut self.hh,
        }
    }
}

/// Multi-level decomposition.
///
/// `details[0]` is the finest level (level 1); the last entry is the
/// coarsest and has the same shape as `approx`.
#[derive(Debug, Clone, PartialEq)]
pub struct Decomposition {
    pub approx: Plane<i32>,
    pub details: Vec<DetailBands>,
}

impl Decomposition {
    pub fn levels(&self) -> usize {
        self.details.len()
    }

    /// Deepest detail level; `None` for a zero-level decomposition.
    pub fn coarsest(&self) -> Option<&DetailBands> {
        self.details.last()
    }

    pub fn coarsest_mut(&mut self) -> Option<&mut DetailBands> {
        self.details.last_mut()
    }
}

#[inline]
fn lift(a: i32, b: i32) -> (i32, i32) {
    let d = a - b;
    (b + (d >> 1), d)
}

#[inline]
fn unlift(s: i32, d: i32) -> (i32, i32) {
    let b = s - (d >> 1);
    (d + b, b)
}

/// Transform one 2×2 quad `[top-left, top-right, bottom-left, bottom-right]`
/// into `(LL, LH, HL, HH)`.
#[inline]
pub fn forward_quad(q: [i32; 4]) -> (i32, i32, i32, i32) {
    let (s_top, d_top) = lift(q[0], q[1]);
    let (s_bot, d_bot) = lift(q[2], q[3]);
    let (ll, lh) = lift(s_top, s_bot);
    let (hl, hh) = lift(d_top, d_bot);
    (ll, lh, hl, hh)
}

/// Inverse of [`forward_quad`].
#[inline]
pub fn inverse_quad(ll: i32, lh: i32, hl: i32, hh: i32) -> [i32; 4] {
    let (s_top, s_bot) = unlift(ll, lh);
    let (d_top, d_bot) = unlift(hl, hh);
    let (p00, p01) = unlift(s_top, d_top);
    let (p10, p11) = unlift(s_bot, d_bot);
    [p00, p01, p10, p11]
}

/// Smallest multiple of `2^levels` that is `>= n`.
pub fn padded_len(n: usize, levels: usize) -> usize {
    let step = 1usize << levels;
    n.div_ceil(step) * step
}

/// One decomposition level. Both dimensions must be even.
pub fn forward_level(plane: &Plane<i32>) -> (Plane<i32>, DetailBands) {
    let (w, h) = (plane.width(), plane.height());
    debug_assert!(w % 2 == 0 && h % 2 == 0, "odd plane {w}x{h}");
    let (hw, hh_) = (w / 2, h / 2);

    let mut ll = Plane::new(hw, hh_);
    let mut bands = DetailBands {
        lh: Plane::new(hw, hh_),
        hl: Plane::new(hw, hh_),
        hh: Plane::new(hw, hh_),
    };

    for i in 0..hh_ {
        for j in 0..hw {
            let q = [
                plane.get(2 * i, 2 * j),
                plane.get(2 * i, 2 * j + 1),
                plane.get(2 * i + 1, 2 * j),
                plane.get(2 * i + 1, 2 * j + 1),
            ];
            let (a, lh, hl, hh) = forward_quad(q);
            ll.set(i, j, a);
            bands.lh.set(i, j, lh);
            bands.hl.set(i, j, hl);
            bands.hh.set(i, j, hh);
        }
    }

    (ll, bands)
}

/// Inverse of [`forward_level`].
pub fn inverse_level(ll: &Plane<i32>, bands: &DetailBands) -> Plane<i32> {
    let (hw, hh_) = (ll.width(), ll.height());
    let mut out = Plane::new(hw * 2, hh_ * 2);

    for i in 0..hh_ {
        for j in 0..hw {
            let q = inverse_quad(ll.get(i, j), bands.lh.get(i, j), bands.hl.get(i, j), bands.hh.get(i, j));
            out.set(2 * i, 2 * j, q[0]);
            out.set(2 * i, 2 * j + 1, q[1]);
            out.set(2 * i + 1, 2 * j, q[2]);
            out.set(2 * i + 1, 2 * j + 1, q[3]);
        }
    }

    out
}

/// `levels`-deep decomposition. Both dimensions must be multiples of
/// `2^levels` (see [`padded_len`]).
pub fn forward(plane: &Plane<i32>, levels: usize) -> Decomposition {
    let mut approx = plane.clone();
    let mut details = Vec::with_capacity(levels);
    for _ in 0..levels {
        let (ll, bands) = forward_level(&approx);
        details.push(bands);
        approx = ll;
    }
    Decomposition { approx, details }
}

/// Inverse of [`forward`].
pub fn inverse(dec: &Decomposition) -> Plane<i32> {
    let mut approx = dec.approx.clone();
    for bands in dec.details.iter().rev() {
        approx = inverse_level(&approx, bands);
    }
    approx
}

#[cfg(test)]
mod tests {
    use super::*;

    fn textured(w: usize, h: usize) -> Plane<i32> {
        let samples = (0..w * h).map(|i| ((i * 37 + i / w * 11) % 256) as i32).collect();
        Plane::from_vec(w, h, samples)
    }

    #[test]
    fn quad_inverts_exactly() {
        for q in [[0, 0, 0, 0], [255, 0, 0, 255], [17, 200, 3, 96], [255, 255, 255, 254]] {
            let (ll, lh, hl, hh) = forward_quad(q);
            assert_eq!(inverse_quad(ll, lh, hl, hh), q);
        }
    }

    #[test]
    fn flat_quad_has_no_detail() {
        assert_eq!(forward_quad([90, 90, 90, 90]), (90, 0, 0, 0));
    }

    #[test]
    fn multi_level_roundtrip() {
        let plane = textured(16, 12);
        let dec = forward(&plane, 2);
        assert_eq!(dec.levels(), 2);
        assert_eq!((dec.approx.width(), dec.approx.height()), (4, 3));
        assert_eq!((dec.details[0].lh.width(), dec.details[0].lh.height()), (8, 6));
        assert_eq!((dec.coarsest().unwrap().hl.width(), dec.coarsest().unwrap().hl.height()), (4, 3));
        assert_eq!(inverse(&dec), plane);
    }

    #[test]
    fn zero_levels_is_identity() {
        let plane = textured(6, 4);
        let dec = forward(&plane, 0);
        assert!(dec.coarsest().is_none());
        assert_eq!(inverse(&dec), plane);
    }

    #[test]
    fn coefficient_edit_reads_back() {
        let plane = textured(8, 8);
        let mut dec = forward(&plane, 2);
        dec.coarsest_mut().unwrap().lh.set(1, 1, -15);
        dec.details[0].band_mut(SubBand::HH).set(2, 3, 7);
        let rebuilt = inverse(&dec);
        let again = forward(&rebuilt, 2);
        assert_eq!(again.coarsest().unwrap().lh.get(1, 1), -15);
        assert_eq!(again.details[0].hh.get(2, 3), 7);
    }

    #[test]
    fn padded_len_rounds_up() {
        assert_eq!(padded_len(8, 2), 8);
        assert_eq!(padded_len(9, 2), 12);
        assert_eq!(padded_len(7, 1), 8);
        assert_eq!(padded_len(1, 3), 8);
    }
}
