//! Image encoder trait and shared types.
//!
//! The [`ImageEncoder`] trait is the single seam between the size-targeting
//! search in [`compress`](crate::compress) and actual pixel work. The
//! production implementation is [`RustEncoder`](super::rust_encoder::RustEncoder);
//! tests drive the search with a deterministic mock instead, so search
//! behavior can be verified against a known quality-to-size curve.
//!
//! An encoder performs exactly one encode per call: no internal retry, no
//! shared mutable state. Retry policy belongs to the caller.

use super::params::{EncodeParams, OutputFormat};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to decode image: {0}")]
    Decode(String),
    #[error("encoding failed: {0}")]
    EncodingFailed(String),
}

/// Raw input image: content bytes plus the caller's declared MIME label.
///
/// The label is informational — arbitrary MIME types are accepted on input
/// and decoding sniffs the actual container from the bytes. The image is
/// immutable for the duration of a compression run.
#[derive(Debug, Clone)]
pub struct SourceImage {
    bytes: Vec<u8>,
    mime_type: String,
}

impl SourceImage {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    /// Read an image from disk, guessing the MIME label from the extension.
    pub fn from_path(path: &Path) -> Result<Self, EncodeError> {
        let bytes = std::fs::read(path)?;
        let mime = match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("png") => "image/png",
            Some("webp") => "image/webp",
            Some("gif") => "image/gif",
            _ => "application/octet-stream",
        };
        Ok(Self::new(bytes, mime))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Size in bytes, measured from the content.
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }
}

/// One encoded output: bytes in the requested container.
#[derive(Debug, Clone)]
pub struct EncodedImage {
    bytes: Vec<u8>,
    format: OutputFormat,
}

impl EncodedImage {
    pub fn new(bytes: Vec<u8>, format: OutputFormat) -> Self {
        Self { bytes, format }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Measured output size in bytes — never an estimate.
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }
}

/// Trait for image encoders.
///
/// `encode` is a single blocking step: decode, fit within the edge cap,
/// re-encode at the requested quality. Callers sequence their own calls —
/// the search in [`compress`](crate::compress) never has two encodes of the
/// same run in flight.
pub trait ImageEncoder {
    /// Encode one image at the given quality, edge cap, and format.
    fn encode(
        &self,
        image: &SourceImage,
        params: &EncodeParams,
    ) -> Result<EncodedImage, EncodeError>;

    /// Encode while reporting native progress in `0..=100`.
    ///
    /// The default implementation brackets [`encode`](Self::encode) with a
    /// single 0 and 100 report. Implementations may report finer-grained
    /// stages, but the sequence must be non-decreasing and end at 100 on
    /// success.
    fn encode_with_progress(
        &self,
        image: &SourceImage,
        params: &EncodeParams,
        report: &mut dyn FnMut(f32),
    ) -> Result<EncodedImage, EncodeError> {
        report(0.0);
        let encoded = self.encode(image, params)?;
        report(100.0);
        Ok(encoded)
    }
}
