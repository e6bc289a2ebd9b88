// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Provenance ledger interface.
//!
//! The core never persists chain links itself. A [`Ledger`] implementation
//! (a chain file, a contract client, ...) is injected by the caller and
//! owns the ordering of concurrent writes. [`MemoryLedger`] is a
//! process-local implementation for tests and single-node use.

use core::fmt;
use std::collections::HashMap;
use std::sync::Mutex;

use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::mark::chain::{ContentHash, HASH_LEN};

/// Upper bound on parent links followed by [`lineage`].
pub const MAX_LINEAGE_DEPTH: usize = 100;

/// One watermarking event as handed to the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerRecord {
    /// Hash of the carrier that was watermarked; the lookup key.
    pub original_hash: ContentHash,
    /// Hash of the watermarked output.
    pub watermarked_hash: ContentHash,
    /// The message added by this event.
    pub payload: String,
    /// Hash recovered from the input's own frame, zero for genesis.
    pub parent_hash: ContentHash,
    /// [`crate::mark::checksum::payload_crc`] of every embedded message.
    pub crc: u16,
    /// Opaque storage references (content ids, URLs, ...).
    pub aux: Vec<u8>,
}

/// Identifier assigned to a stored record.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TxId([u8; HASH_LEN]);

impl TxId {
    pub fn as_bytes(&self) -> &[u8; HASH_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxId({})", self.to_hex())
    }
}

/// Ledger collaborator failures. Never fatal to an embed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// The ledger could not be reached or is in a broken state.
    Unavailable(String),
    /// The ledger refused the record.
    Rejected(String),
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(msg) => write!(f, "ledger unavailable: {msg}"),
            Self::Rejected(msg) => write!(f, "ledger rejected record: {msg}"),
        }
    }
}

impl std::error::Error for LedgerError {}

/// Append-only store of watermark records keyed by original hash.
pub trait Ledger: Send + Sync {
    fn store(&self, record: &LedgerRecord) -> Result<TxId, LedgerError>;

    fn fetch(&self, original_hash: &ContentHash) -> Result<Option<LedgerRecord>, LedgerError>;
}

#[derive(Default)]
struct MemoryState {
    records: HashMap<ContentHash, LedgerRecord>,
    nonce: u64,
}

/// In-memory [`Ledger`].
///
/// Writes are serialised by a mutex and numbered by a monotonic nonce; the
/// transaction id is a SHA-256 over the nonce and both record hashes.
/// Storing a second record for the same original hash replaces the first.
#[derive(Default)]
pub struct MemoryLedger {
    state: Mutex<MemoryState>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently stored.
    pub fn len(&self) -> usize {
        self.state.lock().map(|s| s.records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of successful writes so far.
    pub fn nonce(&self) -> u64 {
        self.state.lock().map(|s| s.nonce).unwrap_or(0)
    }
}

impl Ledger for MemoryLedger {
    fn store(&self, record: &LedgerRecord) -> Result<TxId, LedgerError> {
        if record.original_hash.is_zero() {
            return Err(LedgerError::Rejected("original hash is zero".into()));
        }
        let mut state = self
            .state
            .lock()
            .map_err(|_| LedgerError::Unavailable("ledger lock poisoned".into()))?;

        let nonce = state.nonce;
        let mut hasher = Sha256::new();
        hasher.update(nonce.to_be_bytes());
        hasher.update(record.original_hash.as_bytes());
        hasher.update(record.watermarked_hash.as_bytes());
        let mut tx = [0u8; HASH_LEN];
        tx.copy_from_slice(&hasher.finalize());

        if state.records.insert(record.original_hash, record.clone()).is_some() {
            debug!(original = %record.original_hash, "replacing existing ledger record");
        }
        state.nonce += 1;

        let tx = TxId(tx);
        debug!(nonce, %tx, "stored ledger record");
        Ok(tx)
    }

    fn fetch(&self, original_hash: &ContentHash) -> Result<Option<LedgerRecord>, LedgerError> {
        let state = self
            .state
            .lock()
            .map_err(|_| LedgerError::Unavailable("ledger lock poisoned".into()))?;
        Ok(state.records.get(original_hash).cloned())
    }
}

/// Follow parent links from `start` back towards genesis.
///
/// Returns `start` followed by each ancestor hash, stopping at a zero
/// parent, a hash the ledger does not know, a repeated hash, or after
/// `max_depth` links.
pub fn lineage(ledger: &dyn Ledger, start: &ContentHash, max_depth: usize) -> Result<Vec<ContentHash>, LedgerError> {
    let mut chain = vec![*start];
    let mut current = *start;

    while chain.len() <= max_depth {
        let Some(record) = ledger.fetch(&current)? else {
            break;
        };
        let parent = record.parent_hash;
        if parent.is_zero() {
            break;
        }
        if chain.contains(&parent) {
            warn!(%parent, "cycle in ledger lineage");
            break;
        }
        chain.push(parent);
        current = parent;
    }

    debug!(depth = chain.len() - 1, "walked ledger lineage");
    Ok(chain)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(b: u8) -> ContentHash {
        ContentHash::from_bytes([b; HASH_LEN])
    }

    fn record(original: u8, parent: u8) -> LedgerRecord {
        LedgerRecord {
            original_hash: h(original),
            watermarked_hash: h(original.wrapping_add(100)),
            payload: format!("event {original}"),
            parent_hash: if parent == 0 { ContentHash::ZERO } else { h(parent) },
            crc: 0x1234,
            aux: Vec::new(),
        }
    }

    #[test]
    fn store_and_fetch_roundtrip() {
        let ledger = MemoryLedger::new();
        assert!(ledger.is_empty());
        let tx = ledger.store(&record(1, 0)).unwrap();
        assert_eq!(tx.to_hex().len(), 66);
        assert_eq!(ledger.fetch(&h(1)).unwrap(), Some(record(1, 0)));
        assert_eq!(ledger.fetch(&h(2)).unwrap(), None);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn nonce_is_monotonic_and_ids_distinct() {
        let ledger = MemoryLedger::new();
        let a = ledger.store(&record(1, 0)).unwrap();
        let b = ledger.store(&record(1, 0)).unwrap();
        assert_ne!(a, b);
        assert_eq!(ledger.nonce(), 2);

        let mut hasher = Sha256::new();
        hasher.update(1u64.to_be_bytes());
        hasher.update(h(1).as_bytes());
        hasher.update(h(101).as_bytes());
        assert_eq!(b.as_bytes()[..], hasher.finalize()[..]);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn zero_original_rejected() {
        let ledger = MemoryLedger::new();
        let mut r = record(1, 0);
        r.original_hash = ContentHash::ZERO;
        assert!(matches!(ledger.store(&r), Err(LedgerError::Rejected(_))));
        assert_eq!(ledger.nonce(), 0);
    }

    #[test]
    fn lineage_walks_to_genesis() {
        let ledger = MemoryLedger::new();
        ledger.store(&record(1, 0)).unwrap();
        ledger.store(&record(2, 1)).unwrap();
        ledger.store(&record(3, 2)).unwrap();
        assert_eq!(lineage(&ledger, &h(3), MAX_LINEAGE_DEPTH).unwrap(), vec![h(3), h(2), h(1)]);
        assert_eq!(lineage(&ledger, &h(3), 1).unwrap(), vec![h(3), h(2)]);
        assert_eq!(lineage(&ledger, &h(9), MAX_LINEAGE_DEPTH).unwrap(), vec![h(9)]);
    }

    #[test]
    fn lineage_stops_on_cycle() {
        let ledger = MemoryLedger::new();
        ledger.store(&record(1, 2)).unwrap();
        ledger.store(&record(2, 1)).unwrap();
        assert_eq!(lineage(&ledger, &h(1), MAX_LINEAGE_DEPTH).unwrap(), vec![h(1), h(2)]);
    }

    #[test]
    fn concurrent_writers() {
        let ledger = std::sync::Arc::new(MemoryLedger::new());
        let handles: Vec<_> = (1..=8u8)
            .map(|i| {
                let ledger = ledger.clone();
                std::thread::spawn(move || ledger.store(&record(i, 0)).unwrap())
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(ledger.nonce(), 8);
        assert_eq!(ledger.len(), 8);
    }
}
