// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Luma/chroma split for RGB carriers.
//!
//! Strategies work on an integer luma channel derived with the reversible
//! color transform weights:
//!
//! ```text
//! Y  = floor((R + 2G + B) / 4)
//! Cb = B - G
//! Cr = R - G
//! ```
//!
//! Writing a modified luma back is done per pixel by [`realize_luma`], which
//! finds an RGB triple whose luma is exactly the requested value. When no
//! channel clips, the triple keeps `Cb` and `Cr` unchanged; near the gamut
//! edge the chroma drifts but the luma is always exact, so a value written
//! with `realize_luma` reads back bit-for-bit through [`luma`].

/// Integer luma of one RGB pixel.
#[inline]
pub fn luma(px: [u8; 3]) -> u8 {
    ((px[0] as u16 + 2 * px[1] as u16 + px[2] as u16) >> 2) as u8
}

/// Return the RGB pixel closest to `px` (in the chroma-preserving sense)
/// whose [`luma`] equals `target`.
pub fn realize_luma(px: [u8; 3], target: u8) -> [u8; 3] {
    let lo = 4 * target as i32;
    let hi = lo + 3;
    let mut c = [px[0] as i32, px[1] as i32, px[2] as i32];
    let weighted = |c: &[i32; 3]| c[0] + 2 * c[1] + c[2];

    let sum = weighted(&c);
    if (lo..=hi).contains(&sum) {
        return px;
    }

    // A common shift of all three channels moves the weighted sum by 4 per
    // step and leaves Cb/Cr untouched.
    let shift = if sum < lo {
        (lo - sum + 3) / 4
    } else {
        -((sum - hi + 3) / 4)
    };
    for ch in c.iter_mut() {
        *ch = (*ch + shift).clamp(0, 255);
    }

    // Clipped channels leave a residual; spend it on G first (weight 2),
    // then R, then B.
    for (ch, w) in [(1usize, 2i32), (0, 1), (2, 1)] {
        let sum = weighted(&c);
        if sum < lo {
            let step = ((lo - sum + w - 1) / w).min(255 - c[ch]);
            c[ch] += step;
        } else if sum > hi {
            let step = ((sum - hi + w - 1) / w).min(c[ch]);
            c[ch] -= step;
        }
    }

    debug_assert!((lo..=hi).contains(&weighted(&c)));
    [c[0] as u8, c[1] as u8, c[2] as u8]
}
