// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Error types for the watermark codec and embedding pipeline.
//!
//! [`WatermarkError`] covers every failure an explicit embed or extract can
//! surface: malformed bitstreams, out-of-range header values, payloads that
//! do not fit the carrier, unusable carriers, and out-of-range strategy
//! parameters.

use core::fmt;

use crate::carrier::CarrierError;
use crate::mark::config::ConfigError;

/// Ways a bitstream or message can be malformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// Bit count is not a multiple of 8.
    NotByteAligned(usize),
    /// An element of the bitstream is neither 0 nor 1.
    NonBinaryBit { index: usize, value: u8 },
    /// Reassembled bytes are not valid UTF-8.
    InvalidUtf8,
    /// The stream does not start with the legacy signature.
    BadSignature(u16),
    /// The stream is shorter than the fixed header it must carry.
    TooShort { needed: usize, got: usize },
    /// Empty messages cannot be framed (a zero length header ends a frame).
    EmptyMessage,
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotByteAligned(n) => write!(f, "bit length {n} is not a multiple of 8"),
            Self::NonBinaryBit { index, value } => write!(f, "bit {index} has non-binary value {value}"),
            Self::InvalidUtf8 => write!(f, "message bytes are not valid UTF-8"),
            Self::BadSignature(sig) => write!(f, "invalid or missing signature: 0x{sig:04X}"),
            Self::TooShort { needed, got } => write!(f, "bitstream too short: need {needed} bits, got {got}"),
            Self::EmptyMessage => write!(f, "message is empty"),
        }
    }
}

impl std::error::Error for FormatError {}

/// Errors that can occur during watermark embedding or extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatermarkError {
    /// Malformed bit header, undecodable UTF-8, missing signature, ...
    Format(FormatError),
    /// Integer does not fit the declared bit width.
    Range { value: i64, width: u32 },
    /// Payload exceeds the carrier's capacity for the active strategy.
    Capacity { required: usize, available: usize },
    /// Missing, empty, or undersized carrier.
    Carrier(CarrierError),
    /// Strategy parameters out of range.
    Config(ConfigError),
}

impl fmt::Display for WatermarkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Format(e) => write!(f, "format error: {e}"),
            Self::Range { value, width } => {
                write!(f, "integer {value} does not fit in {width} bits")
            }
            Self::Capacity { required, available } => {
                write!(f, "payload needs {required} bits but the carrier holds {available}")
            }
            Self::Carrier(e) => write!(f, "carrier error: {e}"),
            Self::Config(e) => write!(f, "strategy error: {e}"),
        }
    }
}

impl std::error::Error for WatermarkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Format(e) => Some(e),
            Self::Carrier(e) => Some(e),
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<FormatError> for WatermarkError {
    fn from(e: FormatError) -> Self {
        Self::Format(e)
    }
}

impl From<CarrierError> for WatermarkError {
    fn from(e: CarrierError) -> Self {
        Self::Carrier(e)
    }
}

impl From<ConfigError> for WatermarkError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

pub type Result<T> = std::result::Result<T, WatermarkError>;
