//! Compression entry point and the size-targeting controller.
//!
//! ## Two Paths
//!
//! [`compress`] routes every run through one of two paths:
//!
//! - **Standard**: no target size — a single encode at the configured
//!   quality, with the encoder's native progress mapped into the run's
//!   progress band.
//! - **Size-targeting**: a byte budget is set — [`compress_to_target_size`]
//!   drives the encoder through a bounded bisection search over quality
//!   until the output lands within tolerance of the budget.
//!
//! ## Why Bisection
//!
//! Interval halving converges logarithmically in attempt count, and the
//! explicit attempt cap bounds worst-case latency even when it never
//! converges. The 10% tolerance band absorbs encoder quantization noise —
//! quality is not a smoothly invertible function of output size for lossy
//! encoders. Acceptance is biased toward candidates at or under budget, so
//! the returned file never exceeds the stated ceiling by more than the
//! tolerance once any attempt has fit.
//!
//! ## Progress Protocol
//!
//! Each run owns its own event sequence: progress is non-decreasing, never
//! exceeds 100, and ends in exactly one [`Stage::Complete`] event at 100.
//! Events are purely observational and never affect control flow.

use crate::blob::{BlobError, BlobStore, BlobUrl};
use crate::config::CompressionConfig;
use crate::encoding::{
    EncodeError, EncodeParams, EncodedImage, ImageEncoder, Quality, SourceImage,
};
use serde::Serialize;
use thiserror::Error;

/// Opaque failure signal for a compression run. The underlying encoder
/// error stays reachable through `source()` but no granular codes are part
/// of the API.
#[derive(Error, Debug)]
#[error("image compression failed")]
pub struct CompressError(#[from] EncodeError);

/// Phase of a compression run, for caller-side display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Preparing,
    Compressing,
    Optimizing,
    Complete,
}

/// One observation of run progress. `progress` is a percentage in `0..=100`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressEvent {
    pub stage: Stage,
    pub progress: f32,
    pub message: String,
}

/// Per-run progress observer.
pub type ProgressSink<'a> = &'a mut dyn FnMut(ProgressEvent);

fn emit(sink: &mut Option<ProgressSink<'_>>, stage: Stage, progress: f32, message: &str) {
    if let Some(cb) = sink.as_mut() {
        cb(ProgressEvent {
            stage,
            progress,
            message: message.to_string(),
        });
    }
}

/// Compress one image according to `config`.
///
/// With a target size set, runs the bisection search; otherwise encodes once
/// at the configured quality. Progress events arrive on `on_progress` if
/// given. Any encoder failure aborts the whole run.
pub fn compress<E: ImageEncoder>(
    encoder: &E,
    image: &SourceImage,
    config: &CompressionConfig,
    mut on_progress: Option<ProgressSink<'_>>,
) -> Result<EncodedImage, CompressError> {
    emit(&mut on_progress, Stage::Preparing, 10.0, "preparing image");

    let encoded = if let Some(target_kb) = config.target_size_kb() {
        emit(
            &mut on_progress,
            Stage::Optimizing,
            30.0,
            "optimizing for target size",
        );
        let target_bytes = target_kb * 1024.0;
        let mut forward = |p: f32| {
            emit(
                &mut on_progress,
                Stage::Optimizing,
                30.0 + p * 0.6,
                "tuning quality toward size budget",
            );
        };
        compress_to_target_size(encoder, image, target_bytes, config, &mut forward)?
    } else {
        let params = EncodeParams {
            quality: config.quality(),
            max_dimension: config.max_dimension(),
            format: config.output_format,
        };
        let mut forward = |p: f32| {
            emit(
                &mut on_progress,
                Stage::Compressing,
                10.0 + p * 0.8,
                &format!("compressing... {}%", p.round()),
            );
        };
        encoder.encode_with_progress(image, &params, &mut forward)?
    };

    emit(
        &mut on_progress,
        Stage::Complete,
        100.0,
        "compression complete",
    );
    Ok(encoded)
}

/// Quality floor of the search interval.
const MIN_QUALITY: f32 = 0.1;
/// Quality ceiling of the search interval.
const MAX_QUALITY: f32 = 1.0;
/// Hard cap on encode calls per run.
const MAX_ATTEMPTS: u32 = 15;
/// Acceptance band around the target, as a fraction of the target.
const TOLERANCE_RATIO: f64 = 0.1;
/// Interval width below which the search cannot make progress.
const MIN_INTERVAL: f32 = 0.05;

/// Bisection search over quality toward `target_size_bytes`.
///
/// Starts from the caller-chosen quality. A candidate at or under
/// `target + 10%` is accepted; one within half the tolerance of the target
/// ends the search outright. The size at the current quality decides which
/// half of the interval survives. Stops on convergence, interval collapse
/// (width < 0.05), or the attempt cap.
///
/// Returns the best accepted candidate — under-budget candidates keep
/// replacing it, so the highest quality that still fits wins even when an
/// attempt lands far below budget. If nothing was ever accepted, returns
/// the last encoded candidate: missing the target is a best-effort outcome,
/// not a failure.
fn compress_to_target_size<E: ImageEncoder>(
    encoder: &E,
    image: &SourceImage,
    target_size_bytes: f64,
    config: &CompressionConfig,
    on_progress: &mut dyn FnMut(f32),
) -> Result<EncodedImage, EncodeError> {
    let mut min_quality = MIN_QUALITY;
    let mut max_quality = MAX_QUALITY;
    let mut current_quality = config.quality().value();
    let tolerance = target_size_bytes * TOLERANCE_RATIO;

    let mut best: Option<EncodedImage> = None;
    let mut last: Option<EncodedImage> = None;
    let mut attempts = 0u32;

    while attempts < MAX_ATTEMPTS {
        on_progress(attempts as f32 / MAX_ATTEMPTS as f32 * 100.0);

        let params = EncodeParams {
            quality: Quality::new(current_quality),
            max_dimension: config.max_dimension(),
            format: config.output_format,
        };
        let encoded = encoder.encode(image, &params)?;
        let size = encoded.size() as f64;

        if size <= target_size_bytes + tolerance {
            let converged = (size - target_size_bytes).abs() <= tolerance * 0.5;
            best = Some(encoded);
            if converged {
                break;
            }
        } else {
            last = Some(encoded);
        }

        if size > target_size_bytes {
            // Too large: tighten the ceiling, step toward the floor.
            max_quality = current_quality;
            current_quality = (min_quality + current_quality) / 2.0;
        } else {
            // Under budget: raise the floor, probe for higher quality.
            min_quality = current_quality;
            current_quality = (current_quality + max_quality) / 2.0;
        }

        if max_quality - min_quality < MIN_INTERVAL {
            break;
        }
        attempts += 1;
    }

    on_progress(100.0);
    best.or(last).ok_or_else(|| {
        // Unreachable: the loop always encodes at least once.
        EncodeError::EncodingFailed("no encode attempts were made".to_string())
    })
}

/// Final metrics of a run, plus handles to both byte buffers.
///
/// The handles are caller-owned: release each exactly once (via
/// [`release`](Self::release)) when the result is no longer displayed.
#[derive(Debug, Clone, Serialize)]
pub struct CompressionResult {
    pub original_size: u64,
    pub compressed_size: u64,
    /// `compressed_size / original_size` — below 1.0 means the output shrank.
    pub compression_ratio: f64,
    pub original_url: BlobUrl,
    pub compressed_url: BlobUrl,
}

impl CompressionResult {
    /// Register both byte buffers with `store` and derive the metrics.
    /// Sizes are measured from the actual buffers, never estimated.
    pub fn register(store: &BlobStore, original: &SourceImage, compressed: &EncodedImage) -> Self {
        let original_size = original.size();
        let compressed_size = compressed.size();
        let compression_ratio = if original_size == 0 {
            0.0
        } else {
            compressed_size as f64 / original_size as f64
        };
        Self {
            original_size,
            compressed_size,
            compression_ratio,
            original_url: store.create(original.bytes().to_vec()),
            compressed_url: store.create(compressed.bytes().to_vec()),
        }
    }

    /// Revoke both handles. Errors if either was already released.
    pub fn release(&self, store: &BlobStore) -> Result<(), BlobError> {
        store.revoke(&self.original_url)?;
        store.revoke(&self.compressed_url)
    }
}
