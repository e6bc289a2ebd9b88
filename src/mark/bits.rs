// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Bit/byte conversion.
//!
//! Bits are `u8` values holding 0 or 1, most significant bit first within
//! each byte and within each fixed-width integer field.

use crate::mark::error::{FormatError, Result, WatermarkError};

/// Expand the UTF-8 encoding of `s` to bits, MSB first.
pub fn string_to_bits(s: &str) -> Vec<u8> {
    bytes_to_bits(s.as_bytes())
}

/// Inverse of [`string_to_bits`].
///
/// # Errors
/// - [`FormatError::NotByteAligned`] if `bits.len() % 8 != 0`.
/// - [`FormatError::NonBinaryBit`] if an element is not 0/1.
/// - [`FormatError::InvalidUtf8`] if the bytes do not decode.
pub fn bits_to_string(bits: &[u8]) -> Result<String> {
    if bits.len() % 8 != 0 {
        return Err(FormatError::NotByteAligned(bits.len()).into());
    }
    check_binary(bits)?;
    String::from_utf8(bits_to_bytes(bits)).map_err(|_| FormatError::InvalidUtf8.into())
}

/// Encode `n` as a big-endian field of `width` bits.
///
/// # Errors
/// [`WatermarkError::Range`] if `n` is negative or `n >= 2^width`.
pub fn int_to_bits(n: i64, width: u32) -> Result<Vec<u8>> {
    debug_assert!(width >= 1 && width <= 63);
    if n < 0 || n >= (1i64 << width) {
        return Err(WatermarkError::Range { value: n, width });
    }
    Ok((0..width).rev().map(|pos| ((n >> pos) & 1) as u8).collect())
}

/// Decode a big-endian bit field.
///
/// # Errors
/// [`FormatError::NonBinaryBit`] if an element is not 0/1.
pub fn bits_to_int(bits: &[u8]) -> Result<u64> {
    check_binary(bits)?;
    Ok(bits.iter().fold(0u64, |acc, &b| (acc << 1) | b as u64))
}

/// Fail on the first element that is not 0 or 1.
pub fn check_binary(bits: &[u8]) -> Result<()> {
    match bits.iter().position(|&b| b > 1) {
        Some(index) => Err(FormatError::NonBinaryBit { index, value: bits[index] }.into()),
        None => Ok(()),
    }
}

/// Convert bytes to a bit vector (MSB first within each byte).
pub fn bytes_to_bits(bytes: &[u8]) -> Vec<u8> {
    let mut bits = Vec::with_capacity(bytes.len() * 8);
    for &byte in bytes {
        for bit_pos in (0..8).rev() {
            bits.push((byte >> bit_pos) & 1);
        }
    }
    bits
}

/// Convert a bit vector (MSB first) back to bytes.
/// Pads the last byte with zero bits if `bits.len()` is not a multiple of 8.
pub fn bits_to_bytes(bits: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity((bits.len() + 7) / 8);
    for chunk in bits.chunks(8) {
        let mut byte = 0u8;
        for (i, &bit) in chunk.iter().enumerate() {
            byte |= (bit & 1) << (7 - i);
        }
        bytes.push(byte);
    }
    bytes
}
