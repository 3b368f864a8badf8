//! Typography and layout settings for the rasterizer.

use std::fmt;
use std::str::FromStr;

use image::Rgba;

use super::error::RenderError;

/// An RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn is_opaque(&self) -> bool {
        self.a == 255
    }
}

impl From<Color> for Rgba<u8> {
    fn from(c: Color) -> Self {
        Rgba([c.r, c.g, c.b, c.a])
    }
}

/// Error returned when a color string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color '{0}' (use a name like 'white' or hex like '#f0f8ff')")]
pub struct ParseColorError(pub String);

impl FromStr for Color {
    type Err = ParseColorError;

    /// Parse a color name or `#rgb`, `#rrggbb`, `#rrggbbaa` hex.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let err = || ParseColorError(s.to_string());

        if let Some(hex) = trimmed.strip_prefix('#') {
            if !hex.is_ascii() {
                return Err(err());
            }
            let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
            return match hex.len() {
                3 => {
                    let nibble = |i: usize| {
                        u8::from_str_radix(&hex[i..i + 1], 16)
                            .map(|v| v * 17)
                            .map_err(|_| err())
                    };
                    Ok(Color::rgb(nibble(0)?, nibble(1)?, nibble(2)?))
                }
                6 => Ok(Color::rgb(byte(0)?, byte(2)?, byte(4)?)),
                8 => Ok(Color::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
                _ => Err(err()),
            };
        }

        let color = match trimmed.to_ascii_lowercase().as_str() {
            "black" => Color::BLACK,
            "white" => Color::WHITE,
            "red" => Color::rgb(255, 0, 0),
            "green" => Color::rgb(0, 128, 0),
            "blue" => Color::rgb(0, 0, 255),
            "gray" | "grey" => Color::rgb(128, 128, 128),
            "yellow" => Color::rgb(255, 255, 0),
            "cyan" => Color::rgb(0, 255, 255),
            "magenta" => Color::rgb(255, 0, 255),
            "orange" => Color::rgb(255, 165, 0),
            "transparent" => Color::TRANSPARENT,
            _ => return Err(err()),
        };
        Ok(color)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_opaque() {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

/// Default font looked up when none is configured: the system's
/// monospace family.
pub const DEFAULT_FONT: &str = "monospace";

/// Default font size in pixels.
pub const DEFAULT_FONT_SIZE: f32 = 14.0;

/// Default padding around the text block in pixels.
pub const DEFAULT_PADDING: u32 = 20;

/// Default wrap width in columns.
pub const DEFAULT_WRAP_WIDTH: usize = 80;

/// How a [`TextDocument`](super::TextDocument) is laid out and drawn.
///
/// Fields are plain values; [`RenderStyle::validate`] is called by the
/// rasterizer and rejects anything out of range.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderStyle {
    /// Font name or path to a font file
    pub font: String,
    /// Font size in pixels
    pub font_size: f32,
    pub foreground: Color,
    pub background: Color,
    /// Padding on all four sides in pixels
    pub padding: u32,
    /// Multiplier applied to the font's line height
    pub line_spacing: f32,
    pub antialias: bool,
    /// Maximum line length in characters before hard-wrapping
    pub wrap_width: usize,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            font: DEFAULT_FONT.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            foreground: Color::BLACK,
            background: Color::WHITE,
            padding: DEFAULT_PADDING,
            line_spacing: 1.0,
            antialias: true,
            wrap_width: DEFAULT_WRAP_WIDTH,
        }
    }
}

impl RenderStyle {
    /// Check every field is in range.
    pub fn validate(&self) -> Result<(), RenderError> {
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(RenderError::InvalidFontSize(self.font_size));
        }
        if !self.line_spacing.is_finite() || self.line_spacing <= 0.0 {
            return Err(RenderError::InvalidLineSpacing(self.line_spacing));
        }
        if self.wrap_width == 0 {
            return Err(RenderError::InvalidWrapWidth);
        }
        Ok(())
    }

    /// True when the output needs an alpha channel.
    pub fn needs_alpha(&self) -> bool {
        !self.foreground.is_opaque() || !self.background.is_opaque()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_named_colors() {
        assert_eq!("white".parse::<Color>(), Ok(Color::WHITE));
        assert_eq!(" Black ".parse::<Color>(), Ok(Color::BLACK));
        assert_eq!("grey".parse::<Color>(), "gray".parse::<Color>());
        assert!("chartreuse-ish".parse::<Color>().is_err());
    }

    #[test]
    fn parse_hex_colors() {
        assert_eq!("#f0f8ff".parse::<Color>(), Ok(Color::rgb(0xf0, 0xf8, 0xff)));
        assert_eq!("#fff".parse::<Color>(), Ok(Color::WHITE));
        assert_eq!(
            "#2c3e5080".parse::<Color>(),
            Ok(Color::rgba(0x2c, 0x3e, 0x50, 0x80))
        );
        assert!("#12345".parse::<Color>().is_err());
        assert!("#gggggg".parse::<Color>().is_err());
        assert!("#ééé".parse::<Color>().is_err());
    }

    #[test]
    fn display_roundtrips_through_parse() {
        for c in [Color::WHITE, Color::rgba(1, 2, 3, 4)] {
            assert_eq!(c.to_string().parse::<Color>(), Ok(c));
        }
    }

    #[test]
    fn default_style_is_valid() {
        assert_eq!(RenderStyle::default().validate(), Ok(()));
        assert!(!RenderStyle::default().needs_alpha());
    }

    #[test]
    fn validate_rejects_bad_values() {
        let style = RenderStyle {
            font_size: 0.0,
            ..RenderStyle::default()
        };
        assert_eq!(style.validate(), Err(RenderError::InvalidFontSize(0.0)));

        let style = RenderStyle {
            line_spacing: -1.0,
            ..RenderStyle::default()
        };
        assert_eq!(style.validate(), Err(RenderError::InvalidLineSpacing(-1.0)));

        let style = RenderStyle {
            wrap_width: 0,
            ..RenderStyle::default()
        };
        assert_eq!(style.validate(), Err(RenderError::InvalidWrapWidth));

        let style = RenderStyle {
            font_size: f32::NAN,
            ..RenderStyle::default()
        };
        assert!(matches!(style.validate(), Err(RenderError::InvalidFontSize(_))));
    }
}
