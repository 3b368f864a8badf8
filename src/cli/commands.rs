//! Subcommand handlers for config actions.

use std::path::Path;

use super::args::ConfigAction;
use crate::config::{default_path, Config};

/// Handle config subcommand actions.
///
/// `path` is the `--config` override, if any; `config` is what was loaded
/// from it.
pub fn handle_config_action(action: ConfigAction, path: Option<&Path>, config: &Config) {
    let config_path = path.map(Path::to_path_buf).unwrap_or_else(default_path);

    match action {
        ConfigAction::Show => {
            match toml::to_string_pretty(config) {
                Ok(text) => {
                    println!("Current configuration:");
                    println!();
                    println!("{}", text.trim_end());
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
            println!();

            if config_path.exists() {
                println!("Config file: {} (exists)", config_path.display());
            } else {
                println!("Config file: {} (not found)", config_path.display());
            }
        }
        ConfigAction::Init => {
            if config_path.exists() {
                eprintln!("Config file already exists: {}", config_path.display());
                eprintln!("Use 'asciivision config show' to view current settings.");
                std::process::exit(1);
            }

            if let Err(e) = Config::default().save(&config_path) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }

            println!("Created config file: {}", config_path.display());
        }
    }
}
