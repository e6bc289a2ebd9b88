// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Frequency-domain transforms used by the embedding strategies.

pub mod dct;
pub mod wavelet;

pub use wavelet::SubBand;
