//! Luminance ramps for ASCII rendering.

use std::sync::Arc;

use super::error::SampleError;

/// Standard ASCII density ramp (10 levels).
/// Characters ordered from darkest (@) to lightest (space).
/// Works well for dark-on-light output such as text files and paper.
pub const STANDARD_CHARSET: &[char] = &['@', '%', '#', '*', '+', '=', '-', ':', '.', ' '];

/// Block character set (5 levels).
/// Uses Unicode block characters for higher perceived resolution.
pub const BLOCKS_CHARSET: &[char] = &['█', '▓', '▒', '░', ' '];

/// Minimal character set (4 levels).
/// Clean, less noisy look.
pub const MINIMAL_CHARSET: &[char] = &['#', ':', '.', ' '];

/// Named ramp presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CharSet {
    /// Standard ASCII density ramp (10 levels)
    #[default]
    Standard,
    /// Block character set (5 levels) using Unicode blocks
    Blocks,
    /// Minimal character set (4 levels) for a clean look
    Minimal,
}

impl CharSet {
    /// Get the character slice for this charset.
    pub fn chars(&self) -> &'static [char] {
        match self {
            CharSet::Standard => STANDARD_CHARSET,
            CharSet::Blocks => BLOCKS_CHARSET,
            CharSet::Minimal => MINIMAL_CHARSET,
        }
    }

    /// Get a human-readable name for the charset.
    pub fn name(&self) -> &'static str {
        match self {
            CharSet::Standard => "standard",
            CharSet::Blocks => "blocks",
            CharSet::Minimal => "minimal",
        }
    }

    /// Look up a preset by name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "standard" => Some(CharSet::Standard),
            "blocks" => Some(CharSet::Blocks),
            "minimal" => Some(CharSet::Minimal),
            _ => None,
        }
    }

    pub fn ramp(&self) -> LuminanceRamp {
        LuminanceRamp::from(*self)
    }
}

/// An ordered, non-empty set of characters from darkest to lightest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LuminanceRamp {
    chars: Arc<[char]>,
}

impl LuminanceRamp {
    /// Build a ramp from characters ordered darkest to lightest.
    pub fn new(chars: impl Into<Vec<char>>) -> Result<Self, SampleError> {
        let chars: Vec<char> = chars.into();
        if chars.is_empty() {
            return Err(SampleError::EmptyRamp);
        }
        Ok(Self {
            chars: chars.into(),
        })
    }

    /// Build a ramp from a string, one character per level.
    pub fn from_str_chars(s: &str) -> Result<Self, SampleError> {
        Self::new(s.chars().collect::<Vec<_>>())
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Number of levels. Always at least 1.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Character for a ramp index. Indices past the end clamp to the lightest level.
    pub fn get(&self, index: usize) -> char {
        self.chars[index.min(self.chars.len() - 1)]
    }
}

impl Default for LuminanceRamp {
    fn default() -> Self {
        CharSet::Standard.ramp()
    }
}

impl From<CharSet> for LuminanceRamp {
    fn from(set: CharSet) -> Self {
        Self {
            chars: set.chars().into(),
        }
    }
}
