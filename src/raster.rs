//! Raster image type shared by the rasterizer and the quantizer.

use std::fmt;

/// Pixel layout of a [`RasterImage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorModel {
    /// RGB format (3 bytes per pixel)
    Rgb,
    /// RGBA format (4 bytes per pixel)
    Rgba,
}

impl ColorModel {
    /// Get the number of bytes per pixel.
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            ColorModel::Rgb => 3,
            ColorModel::Rgba => 4,
        }
    }
}

impl fmt::Display for ColorModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorModel::Rgb => write!(f, "RGB"),
            ColorModel::Rgba => write!(f, "RGBA"),
        }
    }
}

/// A decoded image: row-major pixel bytes plus dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    data: Vec<u8>,
    width: u32,
    height: u32,
    model: ColorModel,
}

/// The pixel buffer does not match the declared dimensions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("pixel buffer has {actual} bytes, expected {expected} for {width}x{height} {model}")]
pub struct BufferSizeError {
    pub width: u32,
    pub height: u32,
    pub model: ColorModel,
    pub expected: usize,
    pub actual: usize,
}

impl RasterImage {
    /// Wrap a pixel buffer.
    ///
    /// The buffer must hold exactly `width * height * bytes_per_pixel` bytes.
    /// Zero-sized images are allowed here; the quantizer rejects them.
    pub fn new(
        width: u32,
        height: u32,
        model: ColorModel,
        data: Vec<u8>,
    ) -> Result<Self, BufferSizeError> {
        let expected = width as usize * height as usize * model.bytes_per_pixel();
        if data.len() != expected {
            return Err(BufferSizeError {
                width,
                height,
                model,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            model,
        })
    }

    /// Create an image filled with a single color.
    ///
    /// `pixel` must have `model.bytes_per_pixel()` components; extra
    /// components are ignored and missing ones are treated as 255.
    pub fn filled(width: u32, height: u32, model: ColorModel, pixel: &[u8]) -> Self {
        let bpp = model.bytes_per_pixel();
        let mut px = [255u8; 4];
        for (dst, src) in px.iter_mut().zip(pixel.iter()) {
            *dst = *src;
        }
        let count = width as usize * height as usize;
        let mut data = Vec::with_capacity(count * bpp);
        for _ in 0..count {
            data.extend_from_slice(&px[..bpp]);
        }
        Self {
            data,
            width,
            height,
            model,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn model(&self) -> ColorModel {
        self.model
    }

    /// Raw pixel bytes in row-major order.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Get the number of bytes per pixel.
    pub fn bytes_per_pixel(&self) -> usize {
        self.model.bytes_per_pixel()
    }

    /// True when either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// RGB(A) components of the pixel at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let bpp = self.bytes_per_pixel();
        let idx = (y as usize * self.width as usize + x as usize) * bpp;
        self.data.get(idx..idx + bpp)
    }
}

impl From<image::RgbImage> for RasterImage {
    fn from(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            data: img.into_raw(),
            width,
            height,
            model: ColorModel::Rgb,
        }
    }
}

impl From<image::RgbaImage> for RasterImage {
    fn from(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            data: img.into_raw(),
            width,
            height,
            model: ColorModel::Rgba,
        }
    }
}

impl From<RasterImage> for image::DynamicImage {
    fn from(img: RasterImage) -> Self {
        let RasterImage {
            data,
            width,
            height,
            model,
        } = img;
        // The constructors above guarantee the buffer length, so from_raw
        // only fails on an impossible mismatch; fall back to a blank image.
        match model {
            ColorModel::Rgb => image::RgbImage::from_raw(width, height, data)
                .map(image::DynamicImage::ImageRgb8)
                .unwrap_or_else(|| image::DynamicImage::new_rgb8(width, height)),
            ColorModel::Rgba => image::RgbaImage::from_raw(width, height, data)
                .map(image::DynamicImage::ImageRgba8)
                .unwrap_or_else(|| image::DynamicImage::new_rgba8(width, height)),
        }
    }
}
