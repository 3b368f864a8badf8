//! Configuration file handling for asciivision.
//!
//! Loads configuration from `~/.config/asciivision/config.toml` or a custom path.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::ascii::DEFAULT_ASPECT_CORRECTION;
use crate::describe::DEFAULT_MODEL;
use crate::text::{DEFAULT_FONT, DEFAULT_FONT_SIZE, DEFAULT_PADDING, DEFAULT_WRAP_WIDTH};

/// Default ASCII output width in characters.
pub const DEFAULT_ASCII_WIDTH: usize = 100;

/// Configuration file structure for asciivision.
/// Loaded from ~/.config/asciivision/config.toml (or custom path via --config).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Describe every converted image without being asked
    #[serde(default)]
    pub auto_describe: bool,
    /// Screen reader seen on a previous run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen_reader: Option<String>,
    /// Model used for image descriptions
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub ascii: AsciiConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            auto_describe: false,
            screen_reader: None,
            model: default_model(),
            render: RenderConfig::default(),
            ascii: AsciiConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub font: String,
    pub font_size: f32,
    pub foreground: String,
    pub background: String,
    pub padding: u32,
    pub line_spacing: f32,
    pub antialias: bool,
    pub wrap: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            font: DEFAULT_FONT.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            foreground: "black".to_string(),
            background: "white".to_string(),
            padding: DEFAULT_PADDING,
            line_spacing: 1.0,
            antialias: true,
            wrap: DEFAULT_WRAP_WIDTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AsciiConfig {
    pub width: usize,
    pub charset: String,
    pub invert: bool,
    pub aspect_correction: f32,
}

impl Default for AsciiConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_ASCII_WIDTH,
            charset: "standard".to_string(),
            invert: false,
            aspect_correction: DEFAULT_ASPECT_CORRECTION,
        }
    }
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

impl Config {
    /// Load configuration from a file path.
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
                path: path.clone(),
                source: e,
            })?;
            let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.clone(),
                source: e,
            })?;
            log::debug!("loaded config from {}", path.display());
            Ok(config)
        } else {
            log::debug!("no config at {}, using defaults", path.display());
            Ok(Config::default())
        }
    }

    /// Write the configuration to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError {
            path: path.to_path_buf(),
            source: e,
        })?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        std::fs::write(path, content).map_err(|e| ConfigError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;
        log::info!("saved config to {}", path.display());
        Ok(())
    }
}

/// Errors that can occur when loading or saving configuration.
#[derive(Debug)]
pub enum ConfigError {
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    SerializeError {
        path: PathBuf,
        source: toml::ser::Error,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError { path, source } => {
                write!(
                    f,
                    "Failed to access config file '{}': {}",
                    path.display(),
                    source
                )
            }
            ConfigError::ParseError { path, source } => {
                write!(
                    f,
                    "Failed to parse config file '{}': {}",
                    path.display(),
                    source
                )
            }
            ConfigError::SerializeError { path, source } => {
                write!(
                    f,
                    "Failed to serialize config for '{}': {}",
                    path.display(),
                    source
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::IoError { source, .. } => Some(source),
            ConfigError::ParseError { source, .. } => Some(source),
            ConfigError::SerializeError { source, .. } => Some(source),
        }
    }
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("asciivision").join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/asciivision/config.toml")
        })
}
