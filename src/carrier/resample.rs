// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Shape reconciliation for the chroma side of a carrier.
//!
//! Wavelet strategies pad the luma plane up to a multiple of their
//! decomposition stride, so the reconstructed luma can be wider or taller
//! than the source image. Before the channels are recombined, the source
//! pixels (which carry the chroma) are resampled onto the luma's shape.
//!
//! The policy is nearest-neighbour with clamped source coordinates: every
//! existing pixel keeps its coordinates, added columns repeat the last
//! column and added rows repeat the last row. This is the same edge
//! extension the transforms use for padding, so chroma and luma stay
//! aligned sample for sample.

/// Resample an interleaved RGB buffer onto `dst_w × dst_h`.
///
/// Destination pixel `(x, y)` copies source pixel
/// `(min(x, src_w - 1), min(y, src_h - 1))`.
pub fn resample_edge_clamped(
    pixels: &[u8],
    src_w: usize,
    src_h: usize,
    dst_w: usize,
    dst_h: usize,
) -> Vec<u8> {
    debug_assert_eq!(pixels.len(), src_w * src_h * 3);
    debug_assert!(src_w > 0 && src_h > 0);

    let mut out = Vec::with_capacity(dst_w * dst_h * 3);
    for y in 0..dst_h {
        let sy = y.min(src_h - 1);
        for x in 0..dst_w {
            let sx = x.min(src_w - 1);
            let idx = (sy * src_w + sx) * 3;
            out.extend_from_slice(&pixels[idx..idx + 3]);
        }
    }
    out
}
