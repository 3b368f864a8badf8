//! Shared fixtures for integration tests.

#![allow(dead_code)]

use asciivision::ascii::STANDARD_CHARSET;
use asciivision::text::{FontHandle, FontProvider, GlyphMask, GlyphMetrics, RenderError};

/// Deterministic monospaced font. Each glyph fills the top of its cell with
/// solid ink; the share of the cell inked follows the character's position
/// in the standard ramp (`@` fills the cell, `.` inks a sliver). Characters
/// outside the ramp fill the whole cell.
#[derive(Debug, Clone, Copy)]
pub struct BlockFont {
    pub advance: u32,
    pub line_height: u32,
}

impl BlockFont {
    pub fn new(advance: u32, line_height: u32) -> Self {
        Self {
            advance,
            line_height,
        }
    }

    fn inked_rows(&self, ch: char) -> u32 {
        let levels = STANDARD_CHARSET.len() as u32 - 1;
        match STANDARD_CHARSET.iter().position(|&c| c == ch) {
            Some(idx) => self.line_height * (levels - idx as u32) / levels,
            None => self.line_height,
        }
    }
}

impl FontHandle for BlockFont {
    fn metrics(&self) -> GlyphMetrics {
        GlyphMetrics {
            advance: self.advance,
            line_height: self.line_height,
        }
    }

    fn glyph_mask(&self, ch: char) -> Option<GlyphMask> {
        let rows = self.inked_rows(ch);
        if rows == 0 {
            return None;
        }
        Some(GlyphMask {
            left: 0,
            top: 0,
            width: self.advance,
            height: rows,
            coverage: vec![1.0; (self.advance * rows) as usize],
        })
    }
}

/// Provider that hands out a [`BlockFont`] for any name.
#[derive(Debug, Clone, Copy)]
pub struct BlockFonts(pub BlockFont);

impl FontProvider for BlockFonts {
    fn resolve(&self, _name: &str, _size: f32) -> Result<Box<dyn FontHandle>, RenderError> {
        Ok(Box::new(self.0))
    }
}

/// Provider that never finds a font.
pub struct NoFonts;

impl FontProvider for NoFonts {
    fn resolve(&self, name: &str, _size: f32) -> Result<Box<dyn FontHandle>, RenderError> {
        Err(RenderError::FontNotFound {
            name: name.to_string(),
        })
    }
}
