//! Pure Rust encoder — zero external dependencies, statically linked.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, WebP, ...) | `image::load_from_memory` (format sniffed from bytes) |
//! | Downscale | `image::DynamicImage::resize` with `Lanczos3` filter |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` with quality |
//! | Encode → PNG | `image` crate (lossless, quality ignored) |
//! | Encode → WebP | `webp` crate (libwebp, lossy with quality) |
//!
//! The `image` crate's own WebP encoder only does lossless output, which
//! would make the quality parameter a no-op for the size-targeting search,
//! so WebP goes through libwebp instead.

use super::calculations::fit_within;
use super::encoder::{EncodeError, EncodedImage, ImageEncoder, SourceImage};
use super::params::{EncodeParams, OutputFormat};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

/// Production encoder built on the `image` and `webp` crates.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustEncoder;

impl RustEncoder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustEncoder {
    fn default() -> Self {
        Self::new()
    }
}

fn decode(image: &SourceImage) -> Result<DynamicImage, EncodeError> {
    image::load_from_memory(image.bytes())
        .map_err(|e| EncodeError::Decode(format!("{e} (declared {})", image.mime_type())))
}

/// Downscale to fit within the edge cap. Returns the input unchanged when
/// it already fits.
fn constrain(img: DynamicImage, max_dimension: u32) -> DynamicImage {
    let (w, h) = (img.width(), img.height());
    let (target_w, target_h) = fit_within(w, h, max_dimension);
    if (target_w, target_h) == (w, h) {
        img
    } else {
        img.resize(target_w, target_h, FilterType::Lanczos3)
    }
}

fn encode_buffer(img: &DynamicImage, params: &EncodeParams) -> Result<Vec<u8>, EncodeError> {
    match params.format {
        OutputFormat::Jpeg => {
            let mut buf = Cursor::new(Vec::new());
            let encoder = JpegEncoder::new_with_quality(&mut buf, params.quality.as_percent());
            img.to_rgb8()
                .write_with_encoder(encoder)
                .map_err(|e| EncodeError::EncodingFailed(format!("JPEG encode failed: {e}")))?;
            Ok(buf.into_inner())
        }
        OutputFormat::Png => {
            let mut buf = Cursor::new(Vec::new());
            img.write_to(&mut buf, ImageFormat::Png)
                .map_err(|e| EncodeError::EncodingFailed(format!("PNG encode failed: {e}")))?;
            Ok(buf.into_inner())
        }
        OutputFormat::WebP => {
            let rgba = img.to_rgba8();
            let encoder = webp::Encoder::from_rgba(&rgba, img.width(), img.height());
            let quality = params.quality.as_percent() as f32;
            Ok(encoder.encode(quality).to_vec())
        }
    }
}

impl ImageEncoder for RustEncoder {
    fn encode(
        &self,
        image: &SourceImage,
        params: &EncodeParams,
    ) -> Result<EncodedImage, EncodeError> {
        let decoded = decode(image)?;
        let constrained = constrain(decoded, params.max_dimension);
        let bytes = encode_buffer(&constrained, params)?;
        Ok(EncodedImage::new(bytes, params.format))
    }

    /// Reports coarse native stages: decode, downscale, encode.
    fn encode_with_progress(
        &self,
        image: &SourceImage,
        params: &EncodeParams,
        report: &mut dyn FnMut(f32),
    ) -> Result<EncodedImage, EncodeError> {
        report(0.0);
        let decoded = decode(image)?;
        report(35.0);
        let constrained = constrain(decoded, params.max_dimension);
        report(60.0);
        let bytes = encode_buffer(&constrained, params)?;
        report(100.0);
        Ok(EncodedImage::new(bytes, params.format))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::params::Quality;
    use image::RgbImage;

    /// Synthetic JPEG with enough texture that quality changes move the
    /// output size.
    fn test_jpeg(width: u32, height: u32) -> SourceImage {
        let img = RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([
                ((x * 37 + y * 17) % 256) as u8,
                ((x * 11 + y * 53) % 256) as u8,
                ((x + y) % 256) as u8,
            ])
        });
        let mut buf = Cursor::new(Vec::new());
        let encoder = JpegEncoder::new_with_quality(&mut buf, 95);
        img.write_with_encoder(encoder).unwrap();
        SourceImage::new(buf.into_inner(), "image/jpeg")
    }

    fn params(quality: f32, max_dimension: u32, format: OutputFormat) -> EncodeParams {
        EncodeParams {
            quality: Quality::new(quality),
            max_dimension,
            format,
        }
    }

    #[test]
    fn encodes_jpeg_with_magic_bytes() {
        let encoder = RustEncoder::new();
        let encoded = encoder
            .encode(&test_jpeg(64, 48), &params(0.8, 1920, OutputFormat::Jpeg))
            .unwrap();
        assert_eq!(&encoded.bytes()[0..2], &[0xFF, 0xD8]);
        assert_eq!(encoded.format(), OutputFormat::Jpeg);
    }

    #[test]
    fn encodes_png_with_magic_bytes() {
        let encoder = RustEncoder::new();
        let encoded = encoder
            .encode(&test_jpeg(32, 32), &params(0.8, 1920, OutputFormat::Png))
            .unwrap();
        assert_eq!(&encoded.bytes()[0..4], &[0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn encodes_webp_with_riff_header() {
        let encoder = RustEncoder::new();
        let encoded = encoder
            .encode(&test_jpeg(32, 32), &params(0.8, 1920, OutputFormat::WebP))
            .unwrap();
        assert_eq!(&encoded.bytes()[0..4], b"RIFF");
        assert_eq!(&encoded.bytes()[8..12], b"WEBP");
    }

    #[test]
    fn downscales_to_max_dimension() {
        let encoder = RustEncoder::new();
        let encoded = encoder
            .encode(&test_jpeg(400, 300), &params(0.8, 200, OutputFormat::Jpeg))
            .unwrap();
        let roundtrip = image::load_from_memory(encoded.bytes()).unwrap();
        assert_eq!((roundtrip.width(), roundtrip.height()), (200, 150));
    }

    #[test]
    fn small_image_is_not_upscaled() {
        let encoder = RustEncoder::new();
        let encoded = encoder
            .encode(&test_jpeg(100, 80), &params(0.8, 1920, OutputFormat::Jpeg))
            .unwrap();
        let roundtrip = image::load_from_memory(encoded.bytes()).unwrap();
        assert_eq!((roundtrip.width(), roundtrip.height()), (100, 80));
    }

    #[test]
    fn lower_quality_shrinks_jpeg() {
        let encoder = RustEncoder::new();
        let source = test_jpeg(256, 256);
        let high = encoder
            .encode(&source, &params(0.95, 1920, OutputFormat::Jpeg))
            .unwrap();
        let low = encoder
            .encode(&source, &params(0.1, 1920, OutputFormat::Jpeg))
            .unwrap();
        assert!(low.size() < high.size());
    }

    #[test]
    fn lower_quality_shrinks_webp() {
        let encoder = RustEncoder::new();
        let source = test_jpeg(256, 256);
        let high = encoder
            .encode(&source, &params(0.95, 1920, OutputFormat::WebP))
            .unwrap();
        let low = encoder
            .encode(&source, &params(0.1, 1920, OutputFormat::WebP))
            .unwrap();
        assert!(low.size() < high.size());
    }

    #[test]
    fn corrupt_input_is_a_decode_error() {
        let encoder = RustEncoder::new();
        let garbage = SourceImage::new(vec![0xDE, 0xAD, 0xBE, 0xEF], "image/jpeg");
        let result = encoder.encode(&garbage, &params(0.8, 1920, OutputFormat::Jpeg));
        assert!(matches!(result, Err(EncodeError::Decode(_))));
    }

    #[test]
    fn native_progress_is_monotone_and_ends_at_100() {
        let encoder = RustEncoder::new();
        let mut reports = Vec::new();
        encoder
            .encode_with_progress(
                &test_jpeg(64, 64),
                &params(0.8, 1920, OutputFormat::Jpeg),
                &mut |p| reports.push(p),
            )
            .unwrap();
        assert!(reports.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(reports.last().copied(), Some(100.0));
    }
}
