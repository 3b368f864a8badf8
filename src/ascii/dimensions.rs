//! Dimension calculation for aspect-ratio-correct ASCII rendering.

/// Default character-cell aspect correction.
///
/// A terminal or text-editor cell is roughly twice as tall as it is wide, so
/// a square block of pixels needs about half as many rows as columns. 0.55
/// matches the common monospace cell ratio (width/height ≈ 0.55) and gives
/// square-looking output for fonts like DejaVu Sans Mono and Menlo.
pub const DEFAULT_ASPECT_CORRECTION: f32 = 0.55;

/// Number of character rows needed to display an image at `columns` width.
///
/// `rows = round(img_height / img_width * columns * correction)`, never less
/// than one. Returns 0 only when the image or the column count is empty.
///
/// # Example
/// ```
/// use asciivision::ascii::calculate_rows;
/// // A 200x100 image at 50 columns with a 0.5 correction needs 13 rows.
/// assert_eq!(calculate_rows(200, 100, 50, 0.5), 13);
/// ```
pub fn calculate_rows(img_width: u32, img_height: u32, columns: usize, correction: f32) -> usize {
    if img_width == 0 || img_height == 0 || columns == 0 {
        return 0;
    }

    let ratio = img_height as f64 / img_width as f64;
    let rows = (ratio * columns as f64 * correction as f64).round();
    // Guard against NaN/inf from a bad correction value before the cast
    if rows.is_finite() && rows >= 1.0 {
        rows as usize
    } else {
        1
    }
}
