// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! # lineage-mark
//!
//! Text watermarks for raster images with hash-chained provenance.
//!
//! A watermark is a self-describing bit frame (content hash of the carrier
//! followed by length-prefixed UTF-8 messages) written into the luma
//! channel by one of four strategies:
//!
//! - **pixel parity**: luma sample LSBs. Highest capacity, no robustness.
//! - **subband LSB**: coefficient LSBs of one level-1 Haar subband.
//! - **block quantization**: sign of one mid-frequency 8×8 DCT coefficient.
//! - **robust quantization**: sign of strided coarse Haar coefficients.
//!
//! Re-watermarking an image appends to its messages and embeds the new
//! carrier's hash, so every output names the image it descends from.
//! Links can be recorded in an injected [`Ledger`] and walked back to the
//! genesis image.
//!
//! The crate works on decoded RGB pixel buffers ([`Carrier`]); image file
//! decoding and encoding belong to the caller.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use lineage_mark::{Carrier, Watermarker};
//!
//! let cover = Carrier::from_rgb(width, height, rgb_bytes)?;
//! let wm = Watermarker::default();
//! let first = wm.embed(&cover, "shot by A")?;
//! let second = wm.embed(&first.carrier, "edited by B")?;
//! assert_eq!(wm.extract(&second.carrier).messages(), ["shot by A", "edited by B"]);
//! assert_eq!(second.link.parent, first.original_hash);
//! ```

pub mod carrier;
pub mod mark;

pub use carrier::{Carrier, CarrierError, Plane};
pub use mark::{content_hash, detect_format, ChainLink, ContentHash, DetectedFrame, FrameFormat};
pub use mark::{BlockQuant, Embedder, PixelParity, RobustQuant, Strategy, SubBand, SubbandLsb};
pub use mark::{ConfigError, StrategyKind, WatermarkConfig};
pub use mark::{EmbedOutcome, ExtractReport, Watermarker};
pub use mark::{FormatError, Result, WatermarkError};
pub use mark::{Ledger, LedgerError, LedgerRecord, MemoryLedger, TxId};
