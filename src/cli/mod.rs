//! Command-line interface definitions and helpers.
//!
//! This module contains argument parsing, value enums, the merge of flags
//! over the config file, and subcommand handlers.

mod args;
mod commands;
mod enums;
mod settings;

pub use args::{Args, Command, ConfigAction};
pub use commands::handle_config_action;
pub use enums::CharacterSet;
pub use settings::{ascii_settings, render_style, AsciiSettings, SettingsError};
