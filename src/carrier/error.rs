// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Error types for carrier ingress.

use std::fmt;

/// Errors raised when a pixel buffer cannot be used as a carrier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CarrierError {
    /// No pixel data, or a zero width/height.
    Empty,
    /// Buffer length does not match `width * height * 3`.
    BufferSize { expected: usize, got: usize },
    /// Width or height is below the configured minimum for embedding.
    TooSmall { width: usize, height: usize, min: usize },
}

impl fmt::Display for CarrierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "carrier is empty"),
            Self::BufferSize { expected, got } => {
                write!(f, "pixel buffer holds {got} bytes, expected {expected} (RGB, 8 bits per channel)")
            }
            Self::TooSmall { width, height, min } => {
                write!(f, "carrier {width}x{height} is below the minimum of {min}x{min} pixels")
            }
        }
    }
}

impl std::error::Error for CarrierError {}
