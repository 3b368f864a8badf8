//! RGB to grayscale conversion using ITU-R BT.601 luminance formula.

use crate::raster::RasterImage;

/// Luminance of one RGB pixel.
///
/// Y = 0.299*R + 0.587*G + 0.114*B, with coefficients scaled by 1000 so the
/// whole computation stays in integers.
#[inline]
pub fn luminance(r: u8, g: u8, b: u8) -> u8 {
    let luma = (299 * r as u32 + 587 * g as u32 + 114 * b as u32) / 1000;
    luma as u8
}

/// Convert an image to grayscale.
///
/// Alpha is ignored: a transparent pixel weighs the same as an opaque one
/// of the same color.
///
/// # Returns
/// A vector of grayscale values (0-255), one per pixel
pub fn to_grayscale(image: &RasterImage) -> Vec<u8> {
    let mut gray = Vec::new();
    to_grayscale_into(image, &mut gray);
    gray
}

/// Convert an image to grayscale, reusing an existing buffer.
///
/// # Returns
/// The number of pixels written to the buffer
pub fn to_grayscale_into(image: &RasterImage, buffer: &mut Vec<u8>) -> usize {
    let pixel_count = image.width() as usize * image.height() as usize;
    buffer.clear();
    buffer.reserve(pixel_count);

    for px in image.data().chunks_exact(image.bytes_per_pixel()) {
        buffer.push(luminance(px[0], px[1], px[2]));
    }

    pixel_count
}
