// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Embed and extract pipelines.
//!
//! Embedding runs these stages in order; only the ones marked `fatal` can
//! fail the call:
//!
//! 1. load: carrier validation, minimum dimension (fatal)
//! 2. extract parent: probe for an existing frame, genesis on any failure
//! 3. hash verify: compare the recovered parent with the uploaded carrier,
//!    logged only
//! 4. append: previous messages + the new one
//! 5. build frame: hash-based frame over the uploaded carrier's hash (fatal)
//! 6. capacity check (fatal)
//! 7. embed: frame, then an end marker when it fits (fatal)
//!
//! Recording the result in a [`Ledger`] happens afterwards and only ever
//! produces warnings.

use tracing::{debug, info, warn};

use crate::carrier::Carrier;
use crate::mark::chain::{self, ChainLink, ContentHash};
use crate::mark::checksum::payload_crc;
use crate::mark::config::{ConfigError, WatermarkConfig};
use crate::mark::error::{Result, WatermarkError};
use crate::mark::frame::{self, DetectedFrame, FrameFormat, END_MARKER};
use crate::mark::ledger::{self, Ledger, LedgerError, LedgerRecord, TxId, MAX_LINEAGE_DEPTH};
use crate::mark::strategy::{Embedder, Strategy};

/// Result of a successful embed.
#[derive(Debug, Clone)]
pub struct EmbedOutcome {
    /// The watermarked carrier.
    pub carrier: Carrier,
    /// Hash of the input carrier, also the hash written into the frame.
    pub original_hash: ContentHash,
    /// Hash of [`EmbedOutcome::carrier`].
    pub watermarked_hash: ContentHash,
    /// `child` = original hash, `parent` = recovered parent or zero.
    pub link: ChainLink,
    /// Whether the recovered parent matched the uploaded carrier. `None`
    /// when no parent hash was found.
    pub chain_intact: Option<bool>,
    /// Every message now embedded, oldest first.
    pub messages: Vec<String>,
    /// Name of the strategy that embedded the frame.
    pub algorithm: &'static str,
    /// [`payload_crc`] over `messages`.
    pub crc: u16,
    /// Frame length in bits, end marker excluded.
    pub frame_bits: usize,
    /// Ledger transaction, when recording succeeded.
    pub tx: Option<TxId>,
    /// Non-fatal problems (ledger failures).
    pub warnings: Vec<String>,
}

/// Result of an explicit extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractReport {
    pub frame: DetectedFrame,
    /// [`payload_crc`] over the recovered messages.
    pub crc: u16,
    /// Number of raw bits read from the carrier.
    pub bits_read: usize,
    /// Ledger entry for the embedded hash, if a ledger was consulted.
    pub record: Option<LedgerRecord>,
    /// Whether the ledger entry's CRC equals `crc`.
    pub crc_match: Option<bool>,
}

impl ExtractReport {
    pub fn format(&self) -> FrameFormat {
        self.frame.format()
    }

    pub fn messages(&self) -> &[String] {
        self.frame.messages()
    }

    pub fn hash(&self) -> Option<ContentHash> {
        self.frame.hash()
    }

    /// Embedded hash as hex, `None` for legacy or unmarked carriers.
    pub fn hash_hex(&self) -> Option<String> {
        self.frame.hash().map(|h| h.to_hex())
    }

    pub fn is_marked(&self) -> bool {
        self.frame.format() != FrameFormat::Unknown
    }
}

/// Configured embed/extract front end.
#[derive(Debug, Clone)]
pub struct Watermarker {
    strategy: Strategy,
    config: WatermarkConfig,
}

impl Default for Watermarker {
    fn default() -> Self {
        let config = WatermarkConfig::default();
        Self { strategy: config.build_strategy(), config }
    }
}

impl Watermarker {
    /// Validate `config` and build its strategy.
    pub fn new(config: WatermarkConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { strategy: config.build_strategy(), config })
    }

    /// Default settings with an explicit strategy, range-checked the same
    /// way a configured one is.
    pub fn with_strategy(strategy: Strategy) -> std::result::Result<Self, ConfigError> {
        strategy.validate()?;
        Ok(Self { strategy, config: WatermarkConfig::default() })
    }

    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    pub fn config(&self) -> &WatermarkConfig {
        &self.config
    }

    /// Bits the strategy can hold in `carrier`.
    pub fn capacity(&self, carrier: &Carrier) -> usize {
        self.strategy.capacity(carrier)
    }

    fn probe_bits(&self, carrier: &Carrier) -> usize {
        self.config.probe_bits.unwrap_or_else(|| self.strategy.capacity(carrier))
    }

    /// Append `message` to whatever `carrier` already carries and embed the
    /// resulting frame.
    ///
    /// # Errors
    /// - [`WatermarkError::Carrier`] if the carrier is below `min_dimension`.
    /// - [`WatermarkError::Format`] / [`WatermarkError::Range`] if a message
    ///   is empty or longer than 65535 bits.
    /// - [`WatermarkError::Capacity`] if the frame does not fit.
    pub fn embed(&self, carrier: &Carrier, message: &str) -> Result<EmbedOutcome> {
        // load
        if let Some(min) = self.config.min_dimension {
            carrier.ensure_min_dimension(min)?;
        }
        let algorithm = self.strategy.name();
        info!(algorithm, width = carrier.width(), height = carrier.height(), "embedding watermark");

        // extract parent
        let parent = chain::extract_parent(&self.strategy, carrier, self.probe_bits(carrier));
        let parent_hash = parent.as_ref().and_then(|p| p.hash);

        // hash verify
        let original_hash = chain::content_hash(carrier);
        let chain_intact = parent_hash.map(|claimed| chain::verify_link(&claimed, &original_hash));
        if parent_hash.is_none() {
            info!("no parent hash recovered, treating as genesis watermark");
        }

        // append
        let previous = parent.map(|p| p.messages).unwrap_or_default();
        let messages = chain::append(&previous, message);

        // build frame
        let mut bits = frame::build_hash_frame(&original_hash, &messages)?;
        let frame_bits = bits.len();

        // capacity check
        let available = self.strategy.capacity(carrier);
        if frame_bits > available {
            warn!(required = frame_bits, available, "frame exceeds carrier capacity");
            return Err(WatermarkError::Capacity { required: frame_bits, available });
        }

        // embed
        if frame_bits + END_MARKER.len() <= available {
            bits.extend_from_slice(&END_MARKER);
        }
        debug!(frame_bits, written = bits.len(), available, "writing frame");
        let marked = self.strategy.embed(carrier, &bits)?;

        let watermarked_hash = chain::content_hash(&marked);
        let link = ChainLink { child: original_hash, parent: parent_hash.unwrap_or(ContentHash::ZERO) };
        info!(
            original = %original_hash,
            watermarked = %watermarked_hash,
            parent = %link.parent,
            messages = messages.len(),
            "watermark embedded"
        );

        Ok(EmbedOutcome {
            carrier: marked,
            original_hash,
            watermarked_hash,
            link,
            chain_intact,
            crc: payload_crc(&messages),
            messages,
            algorithm,
            frame_bits,
            tx: None,
            warnings: Vec::new(),
        })
    }

    /// [`Watermarker::embed`], then store the event in `ledger`.
    ///
    /// Ledger failures are returned as warnings on the outcome.
    pub fn embed_and_record(
        &self,
        carrier: &Carrier,
        message: &str,
        ledger: &dyn Ledger,
        aux: &[u8],
    ) -> Result<EmbedOutcome> {
        let mut outcome = self.embed(carrier, message)?;
        let record = LedgerRecord {
            original_hash: outcome.original_hash,
            watermarked_hash: outcome.watermarked_hash,
            payload: message.to_string(),
            parent_hash: outcome.link.parent,
            crc: outcome.crc,
            aux: aux.to_vec(),
        };
        match ledger.store(&record) {
            Ok(tx) => {
                info!(%tx, "watermark recorded in ledger");
                outcome.tx = Some(tx);
            }
            Err(e) => {
                warn!("failed to record watermark in ledger: {e}");
                outcome.warnings.push(e.to_string());
            }
        }
        Ok(outcome)
    }

    /// Read and parse whatever frame `carrier` holds.
    ///
    /// Extraction cannot fail: an unmarked or damaged carrier yields a
    /// report with format [`FrameFormat::Unknown`] and no messages.
    pub fn extract(&self, carrier: &Carrier) -> ExtractReport {
        let raw = self.strategy.extract(carrier, self.probe_bits(carrier));
        let frame = frame::detect_format(&raw);
        info!(
            algorithm = self.strategy.name(),
            bits = raw.len(),
            format = frame.format().as_str(),
            messages = frame.messages().len(),
            "extracted watermark"
        );
        ExtractReport {
            crc: payload_crc(frame.messages()),
            bits_read: raw.len(),
            frame,
            record: None,
            crc_match: None,
        }
    }

    /// [`Watermarker::extract`], then look the embedded hash up in `ledger`
    /// and compare checksums. Ledger failures leave `record` empty.
    pub fn verify(&self, carrier: &Carrier, ledger: &dyn Ledger) -> ExtractReport {
        let mut report = self.extract(carrier);
        let Some(hash) = report.hash() else {
            return report;
        };
        match ledger.fetch(&hash) {
            Ok(Some(record)) => {
                let matches = record.crc == report.crc;
                if !matches {
                    warn!(ledger = record.crc, extracted = report.crc, "payload checksum mismatch");
                }
                report.crc_match = Some(matches);
                report.record = Some(record);
            }
            Ok(None) => debug!(%hash, "no ledger record for embedded hash"),
            Err(e) => warn!("ledger lookup failed: {e}"),
        }
        report
    }

    /// Hashes from the carrier's embedded hash back to genesis, as recorded
    /// in `ledger`. Empty when the carrier has no hash-based frame.
    pub fn lineage(&self, carrier: &Carrier, ledger: &dyn Ledger) -> std::result::Result<Vec<ContentHash>, LedgerError> {
        let raw = self.strategy.extract(carrier, self.probe_bits(carrier));
        match frame::detect_format(&raw).hash() {
            Some(hash) => ledger::lineage(ledger, &hash, MAX_LINEAGE_DEPTH),
            None => Ok(Vec::new()),
        }
    }
}
