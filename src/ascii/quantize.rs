//! Image to ASCII grid conversion.

use super::charset::LuminanceRamp;
use super::dimensions::{calculate_rows, DEFAULT_ASPECT_CORRECTION};
use super::downsample::downsample;
use super::error::SampleError;
use super::grayscale::to_grayscale;
use super::grid::AsciiGrid;
use super::mapping::map_to_chars;
use crate::raster::RasterImage;

/// Upper bound on characters in one grid (4096 x 4096).
pub const MAX_GRID_CELLS: usize = 1 << 24;

/// Samples images into character grids.
///
/// Holds the parameters that shape the output; the image and the column
/// count are supplied per call.
#[derive(Debug, Clone, PartialEq)]
pub struct Quantizer {
    ramp: LuminanceRamp,
    aspect_correction: f32,
    invert: bool,
}

impl Default for Quantizer {
    fn default() -> Self {
        Self {
            ramp: LuminanceRamp::default(),
            aspect_correction: DEFAULT_ASPECT_CORRECTION,
            invert: false,
        }
    }
}

impl Quantizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ramp(mut self, ramp: LuminanceRamp) -> Self {
        self.ramp = ramp;
        self
    }

    /// Character-cell aspect correction (cell width / cell height).
    pub fn with_aspect_correction(mut self, correction: f32) -> Result<Self, SampleError> {
        if !correction.is_finite() || correction <= 0.0 {
            return Err(SampleError::InvalidAspectCorrection(correction));
        }
        self.aspect_correction = correction;
        Ok(self)
    }

    /// Map bright pixels to heavy characters instead of light ones.
    pub fn with_invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    pub fn ramp(&self) -> &LuminanceRamp {
        &self.ramp
    }

    pub fn aspect_correction(&self) -> f32 {
        self.aspect_correction
    }

    pub fn invert(&self) -> bool {
        self.invert
    }

    /// Number of rows `quantize` will emit for an image at `columns` width.
    pub fn rows_for(&self, image: &RasterImage, columns: usize) -> usize {
        calculate_rows(image.width(), image.height(), columns, self.aspect_correction)
    }

    /// Sample `image` into a grid `columns` characters wide.
    ///
    /// # Errors
    /// `InvalidWidth` when `columns` is zero, `ZeroArea` when the image has
    /// no pixels, and `GridTooLarge` when the grid would exceed
    /// [`MAX_GRID_CELLS`].
    pub fn quantize(&self, image: &RasterImage, columns: usize) -> Result<AsciiGrid, SampleError> {
        if columns == 0 {
            return Err(SampleError::InvalidWidth);
        }
        if image.is_empty() {
            return Err(SampleError::ZeroArea {
                width: image.width(),
                height: image.height(),
            });
        }

        let rows = self.rows_for(image, columns);
        match columns.checked_mul(rows) {
            Some(cells) if cells <= MAX_GRID_CELLS => {}
            _ => return Err(SampleError::GridTooLarge { columns, rows }),
        }

        let gray = to_grayscale(image);
        let brightness = downsample(&gray, image.width(), image.height(), columns, rows);
        let cells = map_to_chars(&brightness, &self.ramp, self.invert);

        // RasterImage guarantees the buffer size, so downsample fills every cell
        Ok(AsciiGrid::from_sampled(cells, columns, rows))
    }
}

/// Sample `image` into a grid `columns` wide with the default ramp and
/// aspect correction.
pub fn quantize(image: &RasterImage, columns: usize) -> Result<AsciiGrid, SampleError> {
    Quantizer::default().quantize(image, columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::ColorModel;

    #[test]
    fn rejects_zero_columns() {
        let img = RasterImage::filled(4, 4, ColorModel::Rgb, &[0, 0, 0]);
        assert_eq!(quantize(&img, 0), Err(SampleError::InvalidWidth));
    }

    #[test]
    fn rejects_zero_area() {
        let img = RasterImage::new(0, 10, ColorModel::Rgb, Vec::new()).unwrap();
        assert_eq!(
            quantize(&img, 10),
            Err(SampleError::ZeroArea {
                width: 0,
                height: 10
            })
        );
    }

    #[test]
    fn rejects_bad_correction() {
        for bad in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            assert!(Quantizer::new().with_aspect_correction(bad).is_err());
        }
    }

    #[test]
    fn huge_width_is_an_error_not_a_panic() {
        let tall = RasterImage::filled(1, 4000, ColorModel::Rgb, &[0, 0, 0]);
        let columns = 1usize << 40;
        assert!(matches!(
            quantize(&tall, columns),
            Err(SampleError::GridTooLarge { columns: c, .. }) if c == columns
        ));
    }

    #[test]
    fn grid_over_cell_limit_is_rejected() {
        let dot = RasterImage::filled(1, 1, ColorModel::Rgb, &[0, 0, 0]);
        let q = Quantizer::new().with_aspect_correction(1.0).unwrap();
        assert_eq!(
            q.quantize(&dot, 5000),
            Err(SampleError::GridTooLarge {
                columns: 5000,
                rows: 5000
            })
        );
        // Exactly at the limit's edge on one axis is still fine
        assert_eq!(q.quantize(&dot, 16).unwrap().rows(), 16);
    }

    #[test]
    fn black_and_white_hit_ramp_ends() {
        let black = RasterImage::filled(8, 8, ColorModel::Rgb, &[0, 0, 0]);
        let white = RasterImage::filled(8, 8, ColorModel::Rgb, &[255, 255, 255]);
        let q = Quantizer::new().with_aspect_correction(1.0).unwrap();
        assert_eq!(q.quantize(&black, 2).unwrap().to_string(), "@@\n@@");
        assert_eq!(q.quantize(&white, 2).unwrap().to_string(), "  \n  ");
    }
}
