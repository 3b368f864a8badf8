//! Effective settings: command-line flags layered over the config file.

use crate::ascii::{CharSet, Quantizer, SampleError};
use crate::config::{AsciiConfig, RenderConfig};
use crate::text::{Color, ParseColorError, RenderStyle};

use super::args::Args;

/// Errors in flag or config values that only surface once they are combined.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error(transparent)]
    Color(#[from] ParseColorError),

    #[error("unknown charset '{0}' (use standard, blocks or minimal)")]
    UnknownCharset(String),

    #[error(transparent)]
    Sample(#[from] SampleError),
}

/// Build the render style for ASCII to image conversion.
pub fn render_style(args: &Args, config: &RenderConfig) -> Result<RenderStyle, SettingsError> {
    let foreground: Color = args.fg.as_deref().unwrap_or(&config.foreground).parse()?;
    let background: Color = args.bg.as_deref().unwrap_or(&config.background).parse()?;

    Ok(RenderStyle {
        font: args.font.clone().unwrap_or_else(|| config.font.clone()),
        font_size: args.font_size.unwrap_or(config.font_size),
        foreground,
        background,
        padding: args.padding.unwrap_or(config.padding),
        line_spacing: args.spacing.unwrap_or(config.line_spacing),
        antialias: args.antialias_override().unwrap_or(config.antialias),
        wrap_width: args.wrap.unwrap_or(config.wrap),
    })
}

/// Quantizer and output width for image to ASCII conversion.
#[derive(Debug, Clone)]
pub struct AsciiSettings {
    pub quantizer: Quantizer,
    pub columns: usize,
}

pub fn ascii_settings(args: &Args, config: &AsciiConfig) -> Result<AsciiSettings, SettingsError> {
    let charset = match args.charset {
        Some(c) => CharSet::from(c),
        None => CharSet::from_name(&config.charset)
            .ok_or_else(|| SettingsError::UnknownCharset(config.charset.clone()))?,
    };

    let quantizer = Quantizer::new()
        .with_ramp(charset.ramp())
        .with_aspect_correction(config.aspect_correction)?
        .with_invert(args.invert || config.invert);

    Ok(AsciiSettings {
        quantizer,
        columns: args.width.unwrap_or(config.width),
    })
}
