//! CLI output formatting.
//!
//! Each display has a `format_*` function (pure, returns strings, unit
//! tested) and a thin `print_*` wrapper that writes to stdout. No I/O
//! happens in the format functions.
//!
//! ## Output Format
//!
//! Progress, one line per event:
//!
//! ```text
//! [######------------------]  30% optimizing for target size
//! ```
//!
//! Result summary:
//!
//! ```text
//! Original:   1.91 MB
//! Compressed: 198.5 KB
//! Ratio:      10.2%
//! Savings:    saved 1.71 MB (89.8%)
//! ```

use crate::compress::{CompressionResult, ProgressEvent};
use crate::formatters::{format_compression_ratio, format_file_size, format_savings};

const BAR_WIDTH: usize = 24;

/// Render one progress event as a bar plus message line.
pub fn format_progress(event: &ProgressEvent) -> String {
    let ratio = (event.progress / 100.0).clamp(0.0, 1.0);
    let filled = (ratio * BAR_WIDTH as f32).round() as usize;
    format!(
        "[{}{}] {:>3}% {}",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        event.progress.round() as u32,
        event.message
    )
}

/// Render the result summary block.
pub fn format_result(result: &CompressionResult) -> Vec<String> {
    vec![
        format!("Original:   {}", format_file_size(result.original_size)),
        format!("Compressed: {}", format_file_size(result.compressed_size)),
        format!("Ratio:      {}", format_compression_ratio(result.compression_ratio)),
        format!(
            "Savings:    {}",
            format_savings(result.original_size, result.compressed_size)
        ),
    ]
}

pub fn print_progress(event: &ProgressEvent) {
    println!("{}", format_progress(event));
}

pub fn print_result(result: &CompressionResult) {
    for line in format_result(result) {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::BlobStore;
    use crate::compress::Stage;
    use crate::encoding::{EncodedImage, OutputFormat, SourceImage};

    fn event(progress: f32, message: &str) -> ProgressEvent {
        ProgressEvent {
            stage: Stage::Compressing,
            progress,
            message: message.to_string(),
        }
    }

    #[test]
    fn progress_bar_is_fixed_width() {
        let empty = format_progress(&event(0.0, "starting"));
        let full = format_progress(&event(100.0, "done"));
        assert!(empty.starts_with(&format!("[{}]", "-".repeat(24))));
        assert!(full.starts_with(&format!("[{}]", "#".repeat(24))));
    }

    #[test]
    fn progress_line_includes_percent_and_message() {
        let line = format_progress(&event(42.0, "compressing... 40%"));
        assert!(line.contains(" 42% "));
        assert!(line.ends_with("compressing... 40%"));
    }

    #[test]
    fn progress_over_100_is_clamped_in_bar() {
        // The protocol forbids >100 but the renderer should not panic on it.
        let line = format_progress(&event(140.0, "x"));
        assert!(line.starts_with(&format!("[{}]", "#".repeat(24))));
    }

    #[test]
    fn result_summary_lines() {
        let store = BlobStore::new();
        let result = CompressionResult::register(
            &store,
            &SourceImage::new(vec![0u8; 4096], "image/jpeg"),
            &EncodedImage::new(vec![0u8; 1024], OutputFormat::Jpeg),
        );

        let lines = format_result(&result);
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "Original:   4 KB");
        assert_eq!(lines[1], "Compressed: 1 KB");
        assert_eq!(lines[2], "Ratio:      25.0%");
        assert_eq!(lines[3], "Savings:    saved 3 KB (75.0%)");
    }
}
