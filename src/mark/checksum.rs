// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! 16-bit payload checksum recorded alongside each ledger entry.

use crc::{Crc, CRC_16_ARC};

const PAYLOAD_CRC: Crc<u16> = Crc::<u16>::new(&CRC_16_ARC);

/// CRC-16/ARC over the UTF-8 concatenation of `messages`.
pub fn payload_crc<S: AsRef<str>>(messages: &[S]) -> u16 {
    let mut digest = PAYLOAD_CRC.digest();
    for msg in messages {
        digest.update(msg.as_ref().as_bytes());
    }
    digest.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_value() {
        // CRC-16/ARC check value.
        assert_eq!(payload_crc(&["123456789"]), 0xBB3D);
    }

    #[test]
    fn split_does_not_matter() {
        assert_eq!(payload_crc(&["1234", "56789"]), payload_crc(&["123456789"]));
    }

    #[test]
    fn empty_list() {
        assert_eq!(payload_crc::<&str>(&[]), 0);
    }

    #[test]
    fn single_bit_flip_detected() {
        let base = payload_crc(&["provenance"]);
        let bytes = b"provenance";
        for i in 0..bytes.len() {
            for bit in 0..8 {
                let mut flipped = bytes.to_vec();
                flipped[i] ^= 1 << bit;
                let s = String::from_utf8_lossy(&flipped).into_owned();
                if s.as_bytes() == flipped.as_slice() {
                    assert_ne!(payload_crc(&[s]), base, "flip at byte {i} bit {bit}");
                }
            }
        }
    }
}
