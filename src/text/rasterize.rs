//! Text to image rendering.

use std::collections::HashMap;

use image::{buffer::ConvertBuffer, Rgba, RgbaImage, RgbImage};
use imageproc::pixelops::interpolate;

use super::document::TextDocument;
use super::error::RenderError;
use super::font::{FontHandle, FontProvider, GlyphMask, GlyphMetrics};
use super::style::RenderStyle;
use crate::raster::RasterImage;

/// Upper bound on canvas pixels (16384 x 16384).
pub const MAX_CANVAS_PIXELS: u64 = 1 << 28;

/// Coverage at or above this is drawn as solid ink when antialiasing is off.
const ALIAS_THRESHOLD: f32 = 0.5;

/// Pixel layout of a render, computed before anything is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub advance: u32,
    pub line_height: u32,
    pub width: u32,
    pub height: u32,
}

impl Layout {
    /// Size the canvas for `document` (already wrapped) under `style`.
    pub fn compute(
        document: &TextDocument,
        style: &RenderStyle,
        metrics: GlyphMetrics,
    ) -> Result<Self, RenderError> {
        let line_height = ((metrics.line_height as f64 * style.line_spacing as f64).ceil() as u64)
            .max(1);
        let advance = metrics.advance as u64;
        let padding = style.padding as u64;

        let width = padding * 2 + document.max_line_chars() as u64 * advance;
        let height = padding * 2 + document.len() as u64 * line_height;

        if width == 0 || height == 0 {
            return Err(RenderError::EmptyCanvas);
        }
        if width > u32::MAX as u64
            || height > u32::MAX as u64
            || width.saturating_mul(height) > MAX_CANVAS_PIXELS
        {
            return Err(RenderError::CanvasTooLarge { width, height });
        }

        Ok(Self {
            advance: metrics.advance,
            line_height: line_height as u32,
            width: width as u32,
            height: height as u32,
        })
    }
}

/// Render `document` as an image using `style`, resolving the font through
/// `fonts`.
///
/// Lines are hard-wrapped to `style.wrap_width`, laid out on a monospaced
/// grid starting at `(padding, padding)`, and drawn over the background.
/// The result is RGB unless either color is translucent.
///
/// # Errors
/// `EmptyDocument` for a document with no lines, any error from
/// [`RenderStyle::validate`], font resolution errors from `fonts`, and
/// `EmptyCanvas`/`CanvasTooLarge` when the layout cannot be drawn.
pub fn rasterize(
    document: &TextDocument,
    style: &RenderStyle,
    fonts: &dyn FontProvider,
) -> Result<RasterImage, RenderError> {
    if document.is_empty() {
        return Err(RenderError::EmptyDocument);
    }
    style.validate()?;

    let wrapped = document.wrapped(style.wrap_width)?;
    let font = fonts.resolve(&style.font, style.font_size)?;
    let layout = Layout::compute(&wrapped, style, font.metrics())?;

    let canvas = draw(&wrapped, style, font.as_ref(), &layout);

    Ok(if style.needs_alpha() {
        RasterImage::from(canvas)
    } else {
        let rgb: RgbImage = canvas.convert();
        RasterImage::from(rgb)
    })
}

fn draw(
    document: &TextDocument,
    style: &RenderStyle,
    font: &dyn FontHandle,
    layout: &Layout,
) -> RgbaImage {
    let mut canvas = RgbaImage::from_pixel(layout.width, layout.height, style.background.into());
    let ink: Rgba<u8> = style.foreground.into();

    // Masks live for this render only
    let mut masks: HashMap<char, Option<GlyphMask>> = HashMap::new();

    for (row, line) in document.lines().iter().enumerate() {
        let y = style.padding as i64 + row as i64 * layout.line_height as i64;
        for (col, ch) in line.chars().enumerate() {
            if ch == ' ' {
                continue;
            }
            let x = style.padding as i64 + col as i64 * layout.advance as i64;
            let mask = masks.entry(ch).or_insert_with(|| font.glyph_mask(ch));
            if let Some(mask) = mask {
                blit(&mut canvas, mask, x, y, ink, style.antialias);
            }
        }
    }

    canvas
}

fn blit(canvas: &mut RgbaImage, mask: &GlyphMask, x: i64, y: i64, ink: Rgba<u8>, antialias: bool) {
    let (cw, ch) = (canvas.width() as i64, canvas.height() as i64);

    for my in 0..mask.height {
        let py = y + mask.top as i64 + my as i64;
        if py < 0 || py >= ch {
            continue;
        }
        for mx in 0..mask.width {
            let px = x + mask.left as i64 + mx as i64;
            if px < 0 || px >= cw {
                continue;
            }

            let mut coverage = mask.at(mx, my);
            if !antialias {
                coverage = if coverage >= ALIAS_THRESHOLD { 1.0 } else { 0.0 };
            }
            if coverage <= 0.0 {
                continue;
            }

            let dst = canvas.get_pixel_mut(px as u32, py as u32);
            *dst = interpolate(ink, *dst, coverage);
        }
    }
}
