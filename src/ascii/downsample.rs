//! Block averaging from a pixel grid down (or up) to a character grid.

/// Pixel range `[start, end)` covered by cell `index` when `extent` pixels
/// are split into `cells` equal parts.
///
/// Bounds are fractional; every cell covers at least one pixel and never
/// runs past the edge. When there are more cells than pixels (up-sampling)
/// neighbouring cells share the same source pixel.
#[inline]
fn cell_span(index: usize, cells: usize, extent: u32) -> (u32, u32) {
    let size = extent as f64 / cells as f64;
    let start = ((index as f64 * size) as u32).min(extent - 1);
    let end = (((index + 1) as f64 * size) as u32).clamp(start + 1, extent);
    (start, end)
}

/// Downsample a grayscale image to a character grid.
///
/// Maps image pixels to character grid cells by averaging the brightness
/// of all pixels within each cell.
///
/// # Arguments
/// * `gray` - Grayscale pixel data (one byte per pixel, row-major order)
/// * `img_width` - Width of the source image in pixels
/// * `img_height` - Height of the source image in pixels
/// * `columns` - Output width in characters
/// * `rows` - Output height in characters
///
/// # Returns
/// A vector of brightness values (0-255), one per character cell, in row-major order.
/// The length is `columns * rows`, or zero when any input is empty.
///
/// # Example
/// ```
/// use asciivision::ascii::downsample;
/// // 4x2 image, left half black and right half white, to a 2x1 grid
/// let gray = [0, 0, 255, 255, 0, 0, 255, 255];
/// assert_eq!(downsample(&gray, 4, 2, 2, 1), vec![0, 255]);
/// ```
pub fn downsample(
    gray: &[u8],
    img_width: u32,
    img_height: u32,
    columns: usize,
    rows: usize,
) -> Vec<u8> {
    let mut result = Vec::new();
    downsample_into(gray, img_width, img_height, columns, rows, &mut result);
    result
}

/// Downsample a grayscale image into an existing buffer to avoid allocation.
///
/// # Returns
/// The number of brightness values written to the buffer.
pub fn downsample_into(
    gray: &[u8],
    img_width: u32,
    img_height: u32,
    columns: usize,
    rows: usize,
    buffer: &mut Vec<u8>,
) -> usize {
    buffer.clear();

    if columns == 0
        || rows == 0
        || img_width == 0
        || img_height == 0
        || gray.len() < img_width as usize * img_height as usize
    {
        return 0;
    }

    let Some(output_size) = columns.checked_mul(rows) else {
        return 0;
    };
    buffer.reserve(output_size);

    // Column spans are the same for every row
    let x_spans: Vec<(u32, u32)> = (0..columns)
        .map(|cx| cell_span(cx, columns, img_width))
        .collect();

    for cy in 0..rows {
        let (start_y, end_y) = cell_span(cy, rows, img_height);

        for &(start_x, end_x) in &x_spans {
            let mut sum = 0u64;
            let mut count = 0u64;

            for py in start_y..end_y {
                let row = py as usize * img_width as usize;
                for px in start_x..end_x {
                    sum += gray[row + px as usize] as u64;
                    count += 1;
                }
            }

            // count >= 1 because every span covers at least one pixel
            buffer.push((sum / count) as u8);
        }
    }

    output_size
}
