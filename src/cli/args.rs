//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::enums::CharacterSet;

/// Convert ASCII art to images and images to ASCII art, with optional
/// spoken-word descriptions for screen reader users.
///
/// Flags left unset fall back to the config file, then to built-in defaults.
#[derive(Parser, Debug)]
#[command(name = "asciivision")]
#[command(version, about = "ASCII art to image and image to ASCII art converter", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Input file (ASCII text, or an image with --to-ascii)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output file (image, or text with --to-ascii; stdout if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Convert an image to ASCII art instead of ASCII art to an image
    #[arg(short = 'a', long)]
    pub to_ascii: bool,

    /// Font name or path to a font file
    #[arg(long)]
    pub font: Option<String>,

    /// Font size in pixels
    #[arg(long)]
    pub font_size: Option<f32>,

    /// Background color (name or #hex)
    #[arg(long)]
    pub bg: Option<String>,

    /// Foreground color (name or #hex)
    #[arg(long)]
    pub fg: Option<String>,

    /// Padding in pixels
    #[arg(long)]
    pub padding: Option<u32>,

    /// Line spacing multiplier
    #[arg(long)]
    pub spacing: Option<f32>,

    /// Force antialiased glyphs
    #[arg(long, conflicts_with = "no_antialias")]
    pub antialias: bool,

    /// Draw glyphs without antialiasing
    #[arg(long)]
    pub no_antialias: bool,

    /// Wrap width in characters
    #[arg(long)]
    pub wrap: Option<usize>,

    /// ASCII width in characters
    #[arg(short, long)]
    pub width: Option<usize>,

    /// ASCII character set
    #[arg(long)]
    pub charset: Option<CharacterSet>,

    /// Invert brightness (for light text on dark backgrounds)
    #[arg(long)]
    pub invert: bool,

    /// Describe the result even if auto-describe is off
    #[arg(short = 'd', long)]
    pub auto_describe: bool,

    /// Only describe the input image
    #[arg(short = 'D', long)]
    pub describe_only: bool,

    /// Model used for descriptions
    #[arg(short, long)]
    pub model: Option<String>,

    /// Config file path
    #[arg(long, short)]
    pub config: Option<PathBuf>,
}

impl Args {
    /// `Some(true/false)` when an antialias flag was given.
    pub fn antialias_override(&self) -> Option<bool> {
        if self.antialias {
            Some(true)
        } else if self.no_antialias {
            Some(false)
        } else {
            None
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Create default config file
    Init,
}
