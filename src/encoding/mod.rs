//! Image encoding — pure Rust, zero external dependencies.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::load_from_memory` (format sniffed) |
//! | **Downscale** | Lanczos3, longer edge capped |
//! | **JPEG / PNG** | `image` crate encoders |
//! | **WebP** | `webp` crate (lossy, quality-driven) |
//!
//! The module is split into:
//! - **Calculations**: pure functions for dimension math (unit testable)
//! - **Parameters**: data structures describing one encode
//! - **Encoder**: [`ImageEncoder`] trait + source/output types
//! - **RustEncoder**: the production implementation

pub mod encoder;
pub mod rust_encoder;

mod calculations;
mod params;

pub use encoder::{EncodeError, EncodedImage, ImageEncoder, SourceImage};
pub use params::{EncodeParams, OutputFormat, Quality};
pub use rust_encoder::RustEncoder;
