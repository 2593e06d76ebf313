//! # imgsqueeze
//!
//! Image compression with byte-budget targeting. Give it an image, quality
//! and dimension constraints, and optionally a target output size; it
//! returns a compressed file, searching quality levels until the output
//! lands within tolerance of the byte budget.
//!
//! # Architecture
//!
//! The interesting part is small and deliberately isolated:
//!
//! ```text
//! caller ──> compress() ──┬── target size set ──> bisection controller ──┐
//!                         │                                              ├──> ImageEncoder
//!                         └── no target ────────> single encode ─────────┘
//! ```
//!
//! - The **encoder** ([`encoding::ImageEncoder`]) is a leaf dependency with a
//!   pure contract: image in, encoded bytes out, no shared mutable state.
//!   The production implementation sits on the `image` and `webp` crates;
//!   tests substitute a deterministic mock with a known quality-to-size
//!   curve, so the search logic is verified against exact arithmetic.
//! - The **size-targeting controller** ([`compress`]) bisects quality within
//!   \[0.1, 1.0\]: at most 15 encodes, a ±10% tolerance band around the
//!   target, early exit on convergence or interval collapse. It always
//!   returns *some* valid encode — missing the target is best-effort, not an
//!   error.
//! - **Progress** is a lightweight observer: each run emits a non-decreasing
//!   sequence of events ending in exactly one `complete` at 100. Events
//!   never influence control flow.
//! - **Blob handles** ([`blob`]) mirror object-URL semantics: an allocator
//!   hands out scoped references to byte buffers that the caller releases
//!   exactly once, with an RAII guard for release-on-every-exit-path.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`compress`] | Entry point, size-targeting bisection, progress protocol, result metrics |
//! | [`encoding`] | Encoder trait, parameter types, dimension math, the `image`/`webp` implementation |
//! | [`config`] | `CompressionConfig` defaults, TOML loading, validation |
//! | [`blob`] | Scoped binary blob references with explicit create/release |
//! | [`formatters`] | Size formatting and free-form target-size parsing ("1.5MB" → KB) |
//! | [`output`] | CLI rendering — progress bars and result summaries |
//!
//! # Design Decisions
//!
//! ## Bisection Over Quality, Not Size
//!
//! Output size is not an invertible function of quality — lossy encoders
//! quantize, and two nearby qualities can produce identical files. So the
//! controller never tries to predict size: every measurement comes from a
//! real encode, the tolerance band absorbs the noise, and an attempt cap
//! bounds worst-case latency regardless of convergence.
//!
//! ## Under-Budget Candidates Keep Winning
//!
//! When an attempt lands under the budget — even far under — it replaces
//! the previously accepted candidate and the search probes upward. The
//! result is the highest quality that still fits, and the returned file
//! never silently exceeds the user's ceiling by more than the tolerance.
//!
//! ## One Encode In Flight
//!
//! Bisection is inherently sequential: each step depends on the previous
//! measurement. The encoder may do its work wherever it likes, but the
//! controller awaits each call before issuing the next, and a run has no
//! internal parallelism to reason about.

pub mod blob;
pub mod compress;
pub mod config;
pub mod encoding;
pub mod formatters;
pub mod output;
