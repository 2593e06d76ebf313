//! Compression run configuration.
//!
//! ## Configuration Sources
//!
//! A [`CompressionConfig`] can come from three places, later ones overriding
//! earlier ones:
//!
//! 1. Built-in defaults (quality 0.8, jpeg, no target, no dimension caps)
//! 2. A TOML config file (`imgsqueeze compress --config imgsqueeze.toml`)
//! 3. Individual CLI flags
//!
//! ## Example
//!
//! ```toml
//! quality = 0.8
//! output_format = "jpeg"
//! target_size_kb = 200
//! max_width = 1920
//! max_height = 1080
//! ```
//!
//! Config files are sparse — set just the values you want. Unknown keys are
//! rejected to catch typos early.

use crate::encoding::{OutputFormat, Quality};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Edge cap applied per axis when that axis has no explicit limit.
const DEFAULT_MAX_DIMENSION: u32 = 1920;

/// Settings for one compression run. Immutable once the run starts; build a
/// new one between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompressionConfig {
    /// Encoder quality in (0, 1]. When a target size is set, this is the
    /// starting point of the search rather than the final value.
    pub quality: f32,
    /// Output container: jpeg, png, or webp.
    pub output_format: OutputFormat,
    /// Desired output size in kilobytes. Non-positive values are treated as
    /// absent — a zero or negative budget is meaningless.
    pub target_size_kb: Option<f64>,
    /// Width cap in pixels.
    pub max_width: Option<u32>,
    /// Height cap in pixels.
    pub max_height: Option<u32>,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            quality: 0.8,
            output_format: OutputFormat::Jpeg,
            target_size_kb: None,
            max_width: None,
            max_height: None,
        }
    }
}

impl CompressionConfig {
    /// Load from a TOML file and validate.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.quality > 0.0 && self.quality <= 1.0) {
            return Err(ConfigError::Validation(
                "quality must be in (0, 1]".into(),
            ));
        }
        if self.max_width == Some(0) || self.max_height == Some(0) {
            return Err(ConfigError::Validation(
                "max_width and max_height must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Clamped encoder quality.
    pub fn quality(&self) -> Quality {
        Quality::new(self.quality)
    }

    /// Target size in KB, if set and strictly positive.
    pub fn target_size_kb(&self) -> Option<f64> {
        self.target_size_kb.filter(|kb| *kb > 0.0)
    }

    /// The single edge cap passed to the encoder: the larger of the two axis
    /// limits, with 1920 standing in for an unset axis. The cap applies to
    /// the image's longer edge, not independently per axis.
    pub fn max_dimension(&self) -> u32 {
        self.max_width
            .unwrap_or(DEFAULT_MAX_DIMENSION)
            .max(self.max_height.unwrap_or(DEFAULT_MAX_DIMENSION))
    }
}

/// A documented stock config, suitable for `imgsqueeze gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# imgsqueeze configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# Encoder quality, a real number in (0, 1]. Higher = better fidelity,
# larger files. When target_size_kb is set this is only the starting
# point of the size search.
quality = 0.8

# Output format: "jpeg", "png", or "webp".
# PNG is lossless; the quality setting has no effect on it.
output_format = "jpeg"

# Desired output size in kilobytes. When set, imgsqueeze searches for the
# quality level that lands within 10% of this budget (at most 15 encodes).
# Omit to encode once at the configured quality.
#target_size_kb = 200

# Dimension caps in pixels. The larger of the two is applied to the
# image's longer edge; images within the cap are never upscaled.
# An unset axis defaults to 1920 when the other is set.
#max_width = 1920
#max_height = 1080
"##
}
