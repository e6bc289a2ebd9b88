// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Provenance chain building.
//!
//! Every hash-based frame embeds the content hash of the carrier it was
//! written into. When a watermarked image is watermarked again, that hash
//! is read back out and becomes the parent of the new link:
//!
//! ```text
//! A (unmarked) --embed--> A' [frame: hash(A)]
//! A'           --embed--> B' [frame: hash(A'), messages of A' + new]
//!
//! link(A') = (hash(A),  0…0)      genesis
//! link(B') = (hash(A'), hash(A))
//! ```
//!
//! Nothing here is fatal: a carrier with no readable frame is simply a
//! genesis carrier.

use core::fmt;

use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::carrier::Carrier;
use crate::mark::bits::{bits_to_bytes, bytes_to_bits, check_binary};
use crate::mark::error::{FormatError, Result};
use crate::mark::frame::{self, DetectedFrame, HASH_BITS};
use crate::mark::strategy::Embedder;

/// Length in bytes of a content hash.
pub const HASH_LEN: usize = 32;

/// SHA-256 digest identifying a carrier's pixel content.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash([u8; HASH_LEN]);

impl ContentHash {
    /// The all-zero hash, used as the parent of genesis links.
    pub const ZERO: ContentHash = ContentHash([0u8; HASH_LEN]);

    pub fn from_bytes(bytes: [u8; HASH_LEN]) -> Self {
        Self(bytes)
    }

    pub fn to_bytes(self) -> [u8; HASH_LEN] {
        self.0
    }

    pub fn as_bytes(&self) -> &[u8; HASH_LEN] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; HASH_LEN]
    }

    /// 256 bits, MSB first.
    pub fn to_bits(&self) -> Vec<u8> {
        bytes_to_bits(&self.0)
    }

    /// Rebuild a hash from exactly 256 bits.
    pub fn from_bits(bits: &[u8]) -> Result<Self> {
        if bits.len() != HASH_BITS {
            return Err(FormatError::TooShort { needed: HASH_BITS, got: bits.len() }.into());
        }
        check_binary(bits)?;
        let mut bytes = [0u8; HASH_LEN];
        bytes.copy_from_slice(&bits_to_bytes(bits));
        Ok(Self(bytes))
    }

    /// Lowercase hex, 64 characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse 64 hex characters.
    pub fn from_hex(s: &str) -> Option<Self> {
        let mut bytes = [0u8; HASH_LEN];
        hex::decode_to_slice(s, &mut bytes).ok()?;
        Some(Self(bytes))
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({})", self.to_hex())
    }
}

/// One edge of the provenance chain.
///
/// `child` is the content hash embedded in the new frame (the carrier that
/// was watermarked); `parent` is the hash recovered from that carrier's own
/// frame, or [`ContentHash::ZERO`] for genesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainLink {
    pub child: ContentHash,
    pub parent: ContentHash,
}

impl ChainLink {
    pub fn is_genesis(&self) -> bool {
        self.parent.is_zero()
    }
}

/// Predecessor information read from a carrier before re-embedding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentInfo {
    /// Hash embedded by the previous watermark; `None` for legacy frames.
    pub hash: Option<ContentHash>,
    /// Messages already embedded, oldest first.
    pub messages: Vec<String>,
}

/// SHA-256 over the carrier's RGB bytes (row-major, R, G, B, 8 bits each).
pub fn content_hash(carrier: &Carrier) -> ContentHash {
    let digest = Sha256::digest(carrier.pixels());
    let mut bytes = [0u8; HASH_LEN];
    bytes.copy_from_slice(&digest);
    ContentHash(bytes)
}

/// Best-effort discovery of an existing watermark.
///
/// Runs the strategy's extractor over `probe_bits` positions and detects
/// the frame format. Returns `None` when nothing recognisable is embedded;
/// the carrier is then genesis.
pub fn extract_parent(strategy: &dyn Embedder, carrier: &Carrier, probe_bits: usize) -> Option<ParentInfo> {
    let raw = strategy.extract(carrier, probe_bits);
    debug!(bits = raw.len(), strategy = strategy.name(), "probing carrier for an existing watermark");

    match frame::detect_format(&raw) {
        DetectedFrame::HashBased { hash, messages } => {
            info!(parent = %hash, messages = messages.len(), "found parent watermark");
            Some(ParentInfo { hash: Some(hash), messages })
        }
        DetectedFrame::Legacy { messages } => {
            info!(messages = messages.len(), "found legacy watermark without hash");
            Some(ParentInfo { hash: None, messages })
        }
        DetectedFrame::Unknown => {
            info!("no watermark found, treating carrier as genesis");
            None
        }
    }
}

/// Compare the parent hash claimed by an embedded frame with the hash of the
/// uploaded carrier. A mismatch is logged, never raised.
pub fn verify_link(claimed_parent: &ContentHash, uploaded: &ContentHash) -> bool {
    let intact = claimed_parent == uploaded;
    if intact {
        info!("chain intact: parent hash matches uploaded carrier");
    } else {
        warn!(parent = %claimed_parent, uploaded = %uploaded, "chain broken: parent hash does not match uploaded carrier");
    }
    intact
}

/// Existing messages followed by the new one.
pub fn append(messages: &[String], new_message: &str) -> Vec<String> {
    let mut all = Vec::with_capacity(messages.len() + 1);
    all.extend_from_slice(messages);
    all.push(new_message.to_string());
    all
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_bits_roundtrip() {
        let mut bytes = [0u8; HASH_LEN];
        bytes[0] = 0x80;
        bytes[31] = 0x01;
        let h = ContentHash::from_bytes(bytes);
        let bits = h.to_bits();
        assert_eq!(bits.len(), 256);
        assert_eq!(bits[0], 1);
        assert_eq!(bits[255], 1);
        assert_eq!(ContentHash::from_bits(&bits).unwrap(), h);
    }

    #[test]
    fn hash_hex() {
        assert_eq!(ContentHash::ZERO.to_hex(), "0".repeat(64));
        let h = ContentHash::from_bytes([0xAB; HASH_LEN]);
        assert_eq!(ContentHash::from_hex(&h.to_string()), Some(h));
        assert_eq!(ContentHash::from_hex("abc"), None);
    }

    #[test]
    fn content_hash_is_deterministic() {
        let a = Carrier::from_rgb(2, 1, vec![1, 2, 3, 4, 5, 6]).unwrap();
        let b = Carrier::from_rgb(2, 1, vec![1, 2, 3, 4, 5, 6]).unwrap();
        let c = Carrier::from_rgb(2, 1, vec![1, 2, 3, 4, 5, 7]).unwrap();
        assert_eq!(content_hash(&a), content_hash(&b));
        assert_ne!(content_hash(&a), content_hash(&c));
        assert!(!content_hash(&a).is_zero());
    }

    #[test]
    fn append_keeps_order() {
        let existing = vec!["a".to_string(), "b".to_string()];
        assert_eq!(append(&existing, "c"), vec!["a", "b", "c"]);
        assert_eq!(append(&[], "only"), vec!["only"]);
    }

    #[test]
    fn verify_link_is_equality() {
        let a = ContentHash::from_bytes([1; HASH_LEN]);
        let b = ContentHash::from_bytes([2; HASH_LEN]);
        assert!(verify_link(&a, &a));
        assert!(!verify_link(&a, &b));
    }

    #[test]
    fn genesis_link() {
        let link = ChainLink { child: ContentHash::from_bytes([3; HASH_LEN]), parent: ContentHash::ZERO };
        assert!(link.is_genesis());
    }
}
