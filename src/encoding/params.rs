//! Parameter types for encode operations.
//!
//! These structs describe *what* to encode, not *how*. They are the interface
//! between the high-level [`compress`](crate::compress) module (which decides
//! which encodes to attempt) and the [`encoder`](super::encoder) (which does
//! the actual pixel work). This separation allows swapping encoders (e.g. for
//! testing with a deterministic mock) without changing search logic.
//!
//! ## Types
//!
//! - [`Quality`] — Lossy encoding quality in (0, 1], default 0.8. Clamped on construction.
//! - [`OutputFormat`] — Target container: jpeg, png, or webp.
//! - [`EncodeParams`] — Full specification for one encode: quality, edge cap, format.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Quality setting for lossy image encoding, as a real number in (0, 1].
///
/// Not linearly related to output byte size — for lossy encoders the
/// quality-to-size mapping is noisy and format-dependent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quality(f32);

impl Quality {
    /// Lowest representable quality. The open interval (0, 1] has no exact
    /// floating-point floor, so construction clamps here instead.
    pub const MIN: f32 = 0.01;

    pub fn new(value: f32) -> Self {
        Self(value.clamp(Self::MIN, 1.0))
    }

    pub fn value(self) -> f32 {
        self.0
    }

    /// Quality scaled to the 1-100 integer range most encoders take.
    pub fn as_percent(self) -> u8 {
        (self.0 * 100.0).round().clamp(1.0, 100.0) as u8
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(0.8)
    }
}

#[derive(Error, Debug)]
#[error("unknown output format: {0} (expected jpeg, png, or webp)")]
pub struct ParseFormatError(String);

/// Supported output containers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Jpeg,
    Png,
    WebP,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::WebP => "webp",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::WebP => "image/webp",
        }
    }

    /// Whether the quality parameter affects output size for this format.
    /// PNG is always lossless, so quality is accepted but ignored.
    pub fn is_lossy(self) -> bool {
        !matches!(self, Self::Png)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::WebP => "webp",
        };
        f.write_str(name)
    }
}

impl FromStr for OutputFormat {
    type Err = ParseFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            "webp" => Ok(Self::WebP),
            other => Err(ParseFormatError(other.to_string())),
        }
    }
}

/// Parameters for a single encode: quality, maximum edge length, format.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncodeParams {
    pub quality: Quality,
    /// Cap on the longer edge, in pixels. Images already within the cap are
    /// encoded at their original dimensions — never upscaled.
    pub max_dimension: u32,
    pub format: OutputFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_clamps_to_valid_range() {
        assert_eq!(Quality::new(0.0).value(), Quality::MIN);
        assert_eq!(Quality::new(-3.0).value(), Quality::MIN);
        assert_eq!(Quality::new(0.5).value(), 0.5);
        assert_eq!(Quality::new(1.7).value(), 1.0);
    }

    #[test]
    fn quality_default_is_point_eight() {
        assert_eq!(Quality::default().value(), 0.8);
    }

    #[test]
    fn quality_as_percent() {
        assert_eq!(Quality::new(0.8).as_percent(), 80);
        assert_eq!(Quality::new(1.0).as_percent(), 100);
        assert_eq!(Quality::new(0.0).as_percent(), 1);
    }

    #[test]
    fn format_from_str_accepts_synonyms() {
        assert_eq!("jpeg".parse::<OutputFormat>().unwrap(), OutputFormat::Jpeg);
        assert_eq!("JPG".parse::<OutputFormat>().unwrap(), OutputFormat::Jpeg);
        assert_eq!(" webp ".parse::<OutputFormat>().unwrap(), OutputFormat::WebP);
        assert!("gif".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn format_display_roundtrips_through_from_str() {
        for format in [OutputFormat::Jpeg, OutputFormat::Png, OutputFormat::WebP] {
            assert_eq!(format.to_string().parse::<OutputFormat>().unwrap(), format);
        }
    }

    #[test]
    fn png_is_not_lossy() {
        assert!(OutputFormat::Jpeg.is_lossy());
        assert!(OutputFormat::WebP.is_lossy());
        assert!(!OutputFormat::Png.is_lossy());
    }
}
