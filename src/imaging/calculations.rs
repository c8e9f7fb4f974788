//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Calculate output dimensions that fit inside a bounding box.
///
/// Shrink-only: a source already within the box keeps its dimensions.
/// Aspect ratio is preserved; the limiting edge determines the scale.
/// Both output dimensions stay at least 1 even for extreme aspect ratios.
///
/// # Examples
/// ```
/// # use photopress::imaging::calculate_fit_dimensions;
/// // 1600x1200 into 800x600 → exact fit
/// assert_eq!(calculate_fit_dimensions((1600, 1200), (800, 600)), (800, 600));
///
/// // 640x480 into 800x600 → unchanged (no upscale)
/// assert_eq!(calculate_fit_dimensions((640, 480), (800, 600)), (640, 480));
/// ```
pub fn calculate_fit_dimensions(source: (u32, u32), bounds: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (max_w, max_h) = bounds;

    if src_w <= max_w && src_h <= max_h {
        return (src_w, src_h);
    }

    let scale = (max_w as f64 / src_w as f64).min(max_h as f64 / src_h as f64);
    let w = ((src_w as f64 * scale).round() as u32).max(1);
    let h = ((src_h as f64 * scale).round() as u32).max(1);
    (w.min(max_w), h.min(max_h))
}
