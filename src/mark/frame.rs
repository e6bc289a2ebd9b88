// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Watermark frame construction, parsing, and format detection.
//!
//! Two frame formats exist. Both are a header followed by zero or more
//! length-prefixed message blocks:
//!
//! ```text
//! legacy:     [16 bits ] signature 0xABCD
//!             [16 bits ] message bit length (BE)  ┐
//!             [N bits  ] UTF-8 message bits       ┘ repeated
//!
//! hash-based: [256 bits] SHA-256 content hash of the carrier
//!             [16 bits ] message bit length (BE)  ┐
//!             [N bits  ] UTF-8 message bits       ┘ repeated
//! ```
//!
//! Hash-based frames are the current format; legacy frames are still
//! recognised when reading. The stream extracted from a carrier is usually
//! longer than the frame, so block parsing soft-stops at the first header
//! that cannot belong to a real message.

use tracing::{debug, warn};

use crate::mark::bits::{bits_to_int, bits_to_string, int_to_bits, string_to_bits};
use crate::mark::chain::ContentHash;
use crate::mark::error::{FormatError, Result, WatermarkError};

/// Magic number introducing a legacy frame.
pub const SIGNATURE: u16 = 0xABCD;

/// Width of the signature field in bits.
pub const SIGNATURE_BITS: usize = 16;

/// Width of each message length header in bits.
pub const LENGTH_BITS: usize = 16;

/// Width of the content hash header in bits.
pub const HASH_BITS: usize = 256;

/// A zero length header. Written after a frame when capacity allows; every
/// parser soft-stops on it.
pub const END_MARKER: [u8; LENGTH_BITS] = [0; LENGTH_BITS];

/// Format tag of a detected frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameFormat {
    HashBased,
    Legacy,
    Unknown,
}

impl FrameFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HashBased => "hash_based",
            Self::Legacy => "legacy",
            Self::Unknown => "unknown",
        }
    }
}

/// Result of [`detect_format`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetectedFrame {
    HashBased { hash: ContentHash, messages: Vec<String> },
    Legacy { messages: Vec<String> },
    Unknown,
}

impl DetectedFrame {
    pub fn format(&self) -> FrameFormat {
        match self {
            Self::HashBased { .. } => FrameFormat::HashBased,
            Self::Legacy { .. } => FrameFormat::Legacy,
            Self::Unknown => FrameFormat::Unknown,
        }
    }

    /// Embedded content hash, if the frame carries one.
    pub fn hash(&self) -> Option<ContentHash> {
        match self {
            Self::HashBased { hash, .. } => Some(*hash),
            _ => None,
        }
    }

    pub fn messages(&self) -> &[String] {
        match self {
            Self::HashBased { messages, .. } | Self::Legacy { messages } => messages,
            Self::Unknown => &[],
        }
    }

    pub fn into_messages(self) -> Vec<String> {
        match self {
            Self::HashBased { messages, .. } | Self::Legacy { messages } => messages,
            Self::Unknown => Vec::new(),
        }
    }
}

/// Encode one message as `[16-bit bit length][message bits]`.
///
/// # Errors
/// - [`FormatError::EmptyMessage`] for `""`; a zero header would end the frame.
/// - [`WatermarkError::Range`] if the message is longer than 65535 bits.
pub fn message_block(message: &str) -> Result<Vec<u8>> {
    if message.is_empty() {
        return Err(FormatError::EmptyMessage.into());
    }
    let body = string_to_bits(message);
    let mut block = int_to_bits(body.len() as i64, LENGTH_BITS as u32)?;
    block.extend_from_slice(&body);
    Ok(block)
}

/// Build `[signature][block]...`.
pub fn build_legacy_frame<S: AsRef<str>>(messages: &[S]) -> Result<Vec<u8>> {
    let mut frame = int_to_bits(SIGNATURE as i64, SIGNATURE_BITS as u32)?;
    for msg in messages {
        frame.extend(message_block(msg.as_ref())?);
    }
    debug!(bits = frame.len(), messages = messages.len(), "built legacy frame");
    Ok(frame)
}

/// Build `[256-bit content hash][block]...`.
pub fn build_hash_frame<S: AsRef<str>>(hash: &ContentHash, messages: &[S]) -> Result<Vec<u8>> {
    let mut frame = hash.to_bits();
    for msg in messages {
        frame.extend(message_block(msg.as_ref())?);
    }
    debug!(bits = frame.len(), messages = messages.len(), "built hash frame");
    Ok(frame)
}

/// Parse a legacy frame.
///
/// # Errors
/// - [`FormatError::TooShort`] if the stream cannot hold a signature.
/// - [`FormatError::BadSignature`] if the first 16 bits are not [`SIGNATURE`].
pub fn parse_legacy_frame(bits: &[u8]) -> Result<Vec<String>> {
    if bits.len() < SIGNATURE_BITS {
        return Err(FormatError::TooShort { needed: SIGNATURE_BITS, got: bits.len() }.into());
    }
    let sig = bits_to_int(&bits[..SIGNATURE_BITS])? as u16;
    if sig != SIGNATURE {
        return Err(FormatError::BadSignature(sig).into());
    }
    parse_blocks(bits, SIGNATURE_BITS)
}

/// Parse a hash-based frame into its content hash and messages.
///
/// # Errors
/// [`FormatError::TooShort`] if the stream is shorter than 256 bits.
pub fn parse_hash_frame(bits: &[u8]) -> Result<(ContentHash, Vec<String>)> {
    if bits.len() < HASH_BITS {
        return Err(FormatError::TooShort { needed: HASH_BITS, got: bits.len() }.into());
    }
    let hash = ContentHash::from_bits(&bits[..HASH_BITS])?;
    let messages = parse_blocks(bits, HASH_BITS)?;
    Ok((hash, messages))
}

/// Read length-prefixed blocks from `start` until the soft-stop policy
/// fires or the stream ends.
///
/// A header stops parsing when it is zero, not a multiple of 8, or claims
/// more bits than remain. A well-formed block whose bytes are not UTF-8 is
/// skipped.
fn parse_blocks(bits: &[u8], start: usize) -> Result<Vec<String>> {
    let mut messages = Vec::new();
    let mut cursor = start;

    while cursor + LENGTH_BITS <= bits.len() {
        let len = bits_to_int(&bits[cursor..cursor + LENGTH_BITS])? as usize;
        if len == 0 || len % 8 != 0 {
            break;
        }
        cursor += LENGTH_BITS;
        if cursor + len > bits.len() {
            debug!(claimed = len, remaining = bits.len() - cursor, "incomplete block at end of stream");
            break;
        }
        match bits_to_string(&bits[cursor..cursor + len]) {
            Ok(msg) => messages.push(msg),
            Err(e) => warn!("skipping undecodable message block: {e}"),
        }
        cursor += len;
    }

    Ok(messages)
}

/// Work out which frame format `bits` carries and parse it.
///
/// Decision order:
/// 1. At least 256 bits and no legacy signature: parse as a hash frame.
///    Bits pulled from an unmarked carrier always satisfy the structural
///    check, so the frame is only accepted if it yields a message.
/// 2. Legacy signature present: parse as legacy. Should the signature be a
///    coincidental hash prefix (the legacy parse finds nothing while the
///    hash parse does), the hash frame wins.
/// 3. Otherwise [`DetectedFrame::Unknown`].
pub fn detect_format(bits: &[u8]) -> DetectedFrame {
    if bits.len() < SIGNATURE_BITS {
        return DetectedFrame::Unknown;
    }
    let has_signature = matches!(bits_to_int(&bits[..SIGNATURE_BITS]), Ok(v) if v == SIGNATURE as u64);

    if has_signature {
        if let Ok(messages) = parse_legacy_frame(bits) {
            if !messages.is_empty() {
                return DetectedFrame::Legacy { messages };
            }
            if let Some(found) = try_hash_frame(bits) {
                return found;
            }
            return DetectedFrame::Legacy { messages };
        }
    } else if let Some(found) = try_hash_frame(bits) {
        return found;
    }

    DetectedFrame::Unknown
}

fn try_hash_frame(bits: &[u8]) -> Option<DetectedFrame> {
    match parse_hash_frame(bits) {
        Ok((hash, messages)) if !messages.is_empty() => Some(DetectedFrame::HashBased { hash, messages }),
        Ok(_) => None,
        Err(WatermarkError::Format(FormatError::TooShort { .. })) => None,
        Err(e) => {
            debug!("hash frame parse failed: {e}");
            None
        }
    }
}
