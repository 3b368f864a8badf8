//! Image to ASCII conversion.
//!
//! The pipeline mirrors how the text is meant to be read back:
//!
//! 1. **Grayscale conversion** - RGB to luminance using BT.601
//! 2. **Row count** - image aspect ratio corrected for tall character cells
//! 3. **Downsampling** - block-average luminance per character cell
//! 4. **Character mapping** - luminance to a darkest-to-lightest ramp
//!
//! [`quantize`] runs the whole pipeline with default parameters;
//! [`Quantizer`] lets the ramp, aspect correction and inversion be swapped.

mod charset;
mod dimensions;
mod downsample;
mod error;
mod grayscale;
mod grid;
mod mapping;
mod quantize;

pub use charset::{CharSet, LuminanceRamp, BLOCKS_CHARSET, MINIMAL_CHARSET, STANDARD_CHARSET};
pub use dimensions::{calculate_rows, DEFAULT_ASPECT_CORRECTION};
pub use downsample::{downsample, downsample_into};
pub use error::SampleError;
pub use grayscale::{luminance, to_grayscale, to_grayscale_into};
pub use grid::AsciiGrid;
pub use mapping::{map_to_chars, map_to_chars_into, ramp_index};
pub use quantize::{quantize, Quantizer, MAX_GRID_CELLS};
