//! Pure dimension math — no I/O, fully unit testable.

/// Compute output dimensions for an image constrained to `max_dimension`
/// on its longer edge, preserving aspect ratio. Never upscales.
///
/// The shorter edge is rounded to the nearest pixel with a floor of 1, so
/// extreme aspect ratios still produce a valid image.
pub fn fit_within(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    let longer = width.max(height);
    if longer <= max_dimension {
        return (width, height);
    }

    let scale = max_dimension as f64 / longer as f64;
    let scaled_w = ((width as f64 * scale).round() as u32).max(1);
    let scaled_h = ((height as f64 * scale).round() as u32).max(1);

    // The longer edge must land exactly on the cap; rounding the shorter
    // edge independently can otherwise drift by one pixel.
    if width >= height {
        (max_dimension, scaled_h)
    } else {
        (scaled_w, max_dimension)
    }
}
