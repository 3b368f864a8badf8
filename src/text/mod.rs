//! ASCII text to image rendering.
//!
//! [`rasterize`] takes a [`TextDocument`] and a [`RenderStyle`] and draws the
//! text on a monospaced grid. Fonts come from a [`FontProvider`]; the
//! default [`SystemFonts`] finds installed fonts by family name.

mod document;
mod error;
mod font;
mod rasterize;
mod style;

pub use document::TextDocument;
pub use error::RenderError;
pub use font::{
    normalize_font_name, FontHandle, FontProvider, GlyphMask, GlyphMetrics, OutlineFont,
    SystemFonts,
};
pub use rasterize::{rasterize, Layout, MAX_CANVAS_PIXELS};
pub use style::{
    Color, ParseColorError, RenderStyle, DEFAULT_FONT, DEFAULT_FONT_SIZE, DEFAULT_PADDING,
    DEFAULT_WRAP_WIDTH,
};
