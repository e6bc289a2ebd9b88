// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Watermarker configuration.
//!
//! Every field has a default, so an empty TOML document is a valid
//! configuration:
//!
//! ```toml
//! strategy = "block_quant"
//! min_dimension = 256
//!
//! [block_quant]
//! threshold = 40.0
//! coefficient = [3, 4]
//! ```

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::mark::strategy::{BlockQuant, PixelParity, RobustQuant, Strategy, SubbandLsb};

/// Which embedding strategy to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    PixelParity,
    SubbandLsb,
    BlockQuant,
    #[default]
    RobustQuant,
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WatermarkConfig {
    pub strategy: StrategyKind,
    pub subband_lsb: SubbandLsb,
    pub block_quant: BlockQuant,
    pub robust_quant: RobustQuant,
    /// Bits read when probing for an existing watermark. `None` reads the
    /// strategy's full capacity.
    pub probe_bits: Option<usize>,
    /// Carriers narrower or shorter than this are refused for embedding.
    pub min_dimension: Option<usize>,
}

/// Invalid configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The document is not valid TOML or does not match the schema.
    Parse(String),
    /// A value is outside its allowed range.
    Invalid { field: &'static str, reason: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "config parse error: {msg}"),
            Self::Invalid { field, reason } => write!(f, "invalid config value for {field}: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Parse(e.to_string())
    }
}

impl WatermarkConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Range-check every section, including the ones not selected.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.block_quant.validate()?;
        self.robust_quant.validate()?;
        if self.probe_bits == Some(0) {
            return Err(ConfigError::Invalid { field: "probe_bits", reason: "must be at least 1" });
        }
        Ok(())
    }

    /// Instantiate the selected strategy.
    pub fn build_strategy(&self) -> Strategy {
        match self.strategy {
            StrategyKind::PixelParity => Strategy::PixelParity(PixelParity),
            StrategyKind::SubbandLsb => Strategy::SubbandLsb(self.subband_lsb),
            StrategyKind::BlockQuant => Strategy::BlockQuant(self.block_quant),
            StrategyKind::RobustQuant => Strategy::RobustQuant(self.robust_quant),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mark::strategy::Embedder;
    use crate::mark::transform::SubBand;

    #[test]
    fn empty_document_is_default() {
        let config = WatermarkConfig::from_toml_str("").unwrap();
        assert_eq!(config, WatermarkConfig::default());
        assert_eq!(config.strategy, StrategyKind::RobustQuant);
        assert_eq!(config.robust_quant, RobustQuant { levels: 2, stride: 4, threshold: 15, max_bits: 1000 });
        assert_eq!(config.block_quant.threshold, 30.0);
        assert_eq!(config.block_quant.coefficient, (4, 4));
        assert_eq!(config.subband_lsb.subband, SubBand::LH);
        assert_eq!(config.probe_bits, None);
    }

    #[test]
    fn sections_override_defaults() {
        let config = WatermarkConfig::from_toml_str(
            r#"
            strategy = "subband_lsb"
            probe_bits = 4096
            min_dimension = 256

            [subband_lsb]
            subband = "HH"

            [robust_quant]
            stride = 2
            "#,
        )
        .unwrap();
        assert_eq!(config.strategy, StrategyKind::SubbandLsb);
        assert_eq!(config.subband_lsb.subband, SubBand::HH);
        assert_eq!(config.robust_quant.stride, 2);
        assert_eq!(config.robust_quant.levels, 2);
        assert_eq!(config.probe_bits, Some(4096));
        assert_eq!(config.min_dimension, Some(256));
        assert_eq!(config.build_strategy().name(), "subband_lsb");
    }

    #[test]
    fn every_kind_builds() {
        for (kind, name) in [
            ("pixel_parity", "pixel_parity"),
            ("subband_lsb", "subband_lsb"),
            ("block_quant", "block_quant"),
            ("robust_quant", "robust_quant"),
        ] {
            let config = WatermarkConfig::from_toml_str(&format!("strategy = \"{kind}\"")).unwrap();
            assert_eq!(config.build_strategy().name(), name);
        }
    }

    #[test]
    fn unknown_fields_and_values_rejected() {
        assert!(matches!(WatermarkConfig::from_toml_str("strategy = \"lsb\""), Err(ConfigError::Parse(_))));
        assert!(matches!(WatermarkConfig::from_toml_str("colour = 1"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn out_of_range_values_rejected() {
        assert_eq!(
            WatermarkConfig::from_toml_str("[robust_quant]\nstride = 0"),
            Err(ConfigError::Invalid { field: "robust_quant.stride", reason: "must be at least 1" })
        );
        assert!(matches!(
            WatermarkConfig::from_toml_str("[block_quant]\ncoefficient = [0, 0]"),
            Err(ConfigError::Invalid { field: "block_quant.coefficient", .. })
        ));
        assert!(matches!(
            WatermarkConfig::from_toml_str("[block_quant]\ncoefficient = [8, 1]"),
            Err(ConfigError::Invalid { field: "block_quant.coefficient", .. })
        ));
        assert!(matches!(
            WatermarkConfig::from_toml_str("[block_quant]\nthreshold = -1.0"),
            Err(ConfigError::Invalid { field: "block_quant.threshold", .. })
        ));
    }
}
