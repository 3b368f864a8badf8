//! asciivision library crate.
//!
//! Two pipelines share the [`raster::RasterImage`] type: [`text`] renders
//! ASCII art to an image, and [`ascii`] quantizes an image back to ASCII
//! art. The remaining modules are the command-line glue around them.

pub mod accessibility;
pub mod app;
pub mod ascii;
pub mod cli;
pub mod codec;
pub mod config;
pub mod describe;
pub mod raster;
pub mod text;
