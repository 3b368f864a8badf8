//! Errors raised by the text rasterizer.

use std::path::PathBuf;

/// Errors that can occur when rendering text into an image.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RenderError {
    #[error("document has no lines to render")]
    EmptyDocument,

    #[error("font size must be a positive finite number of pixels, got {0}")]
    InvalidFontSize(f32),

    #[error("line spacing must be a positive finite multiplier, got {0}")]
    InvalidLineSpacing(f32),

    #[error("wrap width must be at least 1 column")]
    InvalidWrapWidth,

    #[error("font '{name}' not found")]
    FontNotFound { name: String },

    #[error("failed to load font '{}': {reason}", path.display())]
    FontLoad { path: PathBuf, reason: String },

    #[error("rendered canvas would have zero area")]
    EmptyCanvas,

    #[error("rendered canvas {width}x{height} exceeds the maximum size")]
    CanvasTooLarge { width: u64, height: u64 },
}
