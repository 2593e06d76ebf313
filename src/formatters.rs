//! Human-facing size formatting and target-size parsing.
//!
//! All units are binary (1024-based). `parse_target_size` is the inverse
//! direction: free-form user input like `"1.5MB"` or `"500 kb"` to a
//! kilobyte count.

const KIB: f64 = 1024.0;
const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Render a byte count using the largest binary unit where the value is at
/// least 1, with up to two decimal places and trailing zeros dropped.
///
/// `0` renders as `"0 B"` exactly.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }
    let exponent = ((bytes as f64).ln() / KIB.ln()).floor() as usize;
    let exponent = exponent.min(UNITS.len() - 1);
    let value = bytes as f64 / KIB.powi(exponent as i32);
    format!("{} {}", trim_decimal(value), UNITS[exponent])
}

/// Two decimal places with trailing zeros stripped: 1.50 → "1.5", 1.00 → "1".
fn trim_decimal(value: f64) -> String {
    let rendered = format!("{value:.2}");
    rendered
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// Render a compression ratio (compressed / original) as a percentage with
/// one decimal place.
pub fn format_compression_ratio(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

/// Render the absolute and relative space saved by a compression run.
pub fn format_savings(original_size: u64, compressed_size: u64) -> String {
    let savings = original_size.saturating_sub(compressed_size);
    let percentage = if original_size == 0 {
        0.0
    } else {
        savings as f64 / original_size as f64 * 100.0
    };
    format!("saved {} ({:.1}%)", format_file_size(savings), percentage)
}

/// Parse a free-form size string into kilobytes.
///
/// The numeric characters form the magnitude, the rest (trimmed,
/// case-insensitive) the unit. Recognized units: b/byte/bytes,
/// kb/kilobyte/kilobytes, mb/megabyte/megabytes, gb/gigabyte/gigabytes.
/// No unit or an unrecognized one means the value is already kilobytes.
///
/// Returns `None` when the numeric part is absent, zero, negative, or not a
/// number.
pub fn parse_target_size(input: &str) -> Option<f64> {
    let clean = input.trim().to_lowercase();
    let value: String = clean
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let unit = clean
        .chars()
        .filter(|c| !c.is_ascii_digit() && *c != '.')
        .collect::<String>()
        .trim()
        .to_string();

    let magnitude: f64 = value.parse().ok()?;
    if magnitude <= 0.0 {
        return None;
    }

    let kilobytes = match unit.as_str() {
        "b" | "byte" | "bytes" => magnitude / 1024.0,
        "kb" | "kilobyte" | "kilobytes" => magnitude,
        "mb" | "megabyte" | "megabytes" => magnitude * 1024.0,
        "gb" | "gigabyte" | "gigabytes" => magnitude * 1024.0 * 1024.0,
        _ => magnitude,
    };
    Some(kilobytes)
}
