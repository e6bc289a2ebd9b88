// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Watermark codec, embedding strategies, and provenance chain.
//!
//! Embedding flows bits → frame → strategy → chain link → ledger;
//! extraction flows strategy → format detection → hash lookup. The
//! [`Watermarker`] front end runs both flows under a [`WatermarkConfig`].

pub mod bits;
pub mod chain;
pub mod checksum;
pub mod config;
pub mod error;
pub mod frame;
pub mod ledger;
pub mod pipeline;
pub mod strategy;
pub mod transform;

pub use chain::{content_hash, ChainLink, ContentHash, ParentInfo};
pub use config::{ConfigError, StrategyKind, WatermarkConfig};
pub use error::{FormatError, Result, WatermarkError};
pub use frame::{detect_format, DetectedFrame, FrameFormat};
pub use ledger::{Ledger, LedgerError, LedgerRecord, MemoryLedger, TxId};
pub use pipeline::{EmbedOutcome, ExtractReport, Watermarker};
pub use strategy::{BlockQuant, Embedder, PixelParity, RobustQuant, Strategy, SubbandLsb};
pub use transform::SubBand;
