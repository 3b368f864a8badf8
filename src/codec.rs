//! Image file decoding and encoding.
//!
//! Thin wrapper over the `image` crate that converts to and from
//! [`RasterImage`]. The output format is picked from the file extension.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use imageproc::pixelops::interpolate;

use crate::raster::RasterImage;

/// Errors that can occur when reading or writing image files.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("unsupported output format '{0}' (use png, jpg, bmp or gif)")]
    UnsupportedFormat(String),
}

/// Output format for a path, from its extension.
pub fn format_for_path(path: &Path) -> Result<ImageFormat, CodecError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    match ext.as_str() {
        "png" => Ok(ImageFormat::Png),
        "jpg" | "jpeg" => Ok(ImageFormat::Jpeg),
        "bmp" => Ok(ImageFormat::Bmp),
        "gif" => Ok(ImageFormat::Gif),
        _ => Err(CodecError::UnsupportedFormat(ext)),
    }
}

/// MIME type for an encoded image, guessed from its leading bytes.
pub fn mime_type(bytes: &[u8]) -> &'static str {
    match image::guess_format(bytes) {
        Ok(ImageFormat::Jpeg) => "image/jpeg",
        Ok(ImageFormat::Gif) => "image/gif",
        Ok(ImageFormat::Bmp) => "image/bmp",
        Ok(ImageFormat::WebP) => "image/webp",
        _ => "image/png",
    }
}

/// Decode an image from memory.
///
/// Images with an alpha channel decode to RGBA, everything else to RGB.
pub fn decode(bytes: &[u8]) -> Result<RasterImage, CodecError> {
    let img = image::load_from_memory(bytes)?;
    Ok(from_dynamic(img))
}

/// Read and decode an image file.
pub fn load(path: &Path) -> Result<RasterImage, CodecError> {
    let bytes = std::fs::read(path).map_err(|source| CodecError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let img = decode(&bytes)?;
    log::debug!(
        "decoded {} as {}x{} {}",
        path.display(),
        img.width(),
        img.height(),
        img.model()
    );
    Ok(img)
}

/// Encode an image in `format`.
///
/// Formats without alpha support (JPEG, BMP) get translucent pixels
/// composited over white.
pub fn encode(image: &RasterImage, format: ImageFormat) -> Result<Vec<u8>, CodecError> {
    let mut dynamic = DynamicImage::from(image.clone());
    if matches!(format, ImageFormat::Jpeg | ImageFormat::Bmp) && dynamic.color().has_alpha() {
        dynamic = DynamicImage::ImageRgb8(flatten_onto_white(&dynamic.to_rgba8()));
    }

    let mut out = Cursor::new(Vec::new());
    dynamic.write_to(&mut out, format)?;
    Ok(out.into_inner())
}

/// Encode an image and write it to `path`, choosing the format from the
/// extension.
pub fn save(image: &RasterImage, path: &Path) -> Result<(), CodecError> {
    let format = format_for_path(path)?;
    let bytes = encode(image, format)?;
    std::fs::write(path, &bytes).map_err(|source| CodecError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

fn flatten_onto_white(image: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let Rgba([r, g, b, a]) = *image.get_pixel(x, y);
        interpolate(Rgb([r, g, b]), Rgb([255, 255, 255]), a as f32 / 255.0)
    })
}

fn from_dynamic(img: DynamicImage) -> RasterImage {
    if img.color().has_alpha() {
        RasterImage::from(img.into_rgba8())
    } else {
        RasterImage::from(img.into_rgb8())
    }
}
