//! Errors raised by the image quantizer.

/// Errors that can occur when sampling an image into an ASCII grid.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SampleError {
    #[error("target width must be at least 1 column")]
    InvalidWidth,

    #[error("image has zero area ({width}x{height})")]
    ZeroArea { width: u32, height: u32 },

    #[error("luminance ramp must contain at least one character")]
    EmptyRamp,

    #[error("aspect correction must be a positive finite number, got {0}")]
    InvalidAspectCorrection(f32),

    #[error("character grid {columns}x{rows} exceeds the maximum size")]
    GridTooLarge { columns: usize, rows: usize },
}
