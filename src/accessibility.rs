//! Runtime environment and screen reader detection.
//!
//! Decides whether the program may prompt interactively and whether a
//! screen reader is running, so image descriptions can be offered.

use std::fmt;
use std::io::{BufRead, Write};
use std::path::Path;

/// Where the program is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Inside a container (`/.dockerenv` exists)
    Container,
    /// A CI job (`CI` or `GITHUB_ACTIONS` set)
    Ci,
    /// No X11 or Wayland display on a Linux or other Unix host
    Headless,
    /// An interactive desktop session
    Desktop,
}

impl Environment {
    /// Only desktop sessions get interactive prompts.
    pub fn is_interactive(&self) -> bool {
        matches!(self, Environment::Desktop)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Environment::Container => "container",
            Environment::Ci => "ci",
            Environment::Headless => "headless",
            Environment::Desktop => "desktop",
        };
        f.write_str(name)
    }
}

/// Detect the current environment from the filesystem and process env.
pub fn detect_environment() -> Environment {
    let env = classify_environment(
        Path::new("/.dockerenv").exists(),
        |name| std::env::var(name).ok(),
        HostOs::current(),
    );
    log::debug!("detected environment: {}", env);
    env
}

/// Pure environment classification. `var` looks up an environment variable;
/// empty values count as unset. Windows and macOS always have a display, so
/// only other hosts are checked for `DISPLAY`/`WAYLAND_DISPLAY`.
pub fn classify_environment<F>(dockerenv: bool, var: F, os: HostOs) -> Environment
where
    F: Fn(&str) -> Option<String>,
{
    let set = |name: &str| var(name).is_some_and(|v| !v.is_empty());

    if dockerenv {
        Environment::Container
    } else if set("CI") || set("GITHUB_ACTIONS") {
        Environment::Ci
    } else if os.uses_display_server() && !set("DISPLAY") && !set("WAYLAND_DISPLAY") {
        Environment::Headless
    } else {
        Environment::Desktop
    }
}

/// Host operating system family, as far as screen readers are concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostOs {
    Linux,
    MacOs,
    Windows,
    Other,
}

impl HostOs {
    pub fn current() -> Self {
        if cfg!(target_os = "linux") {
            HostOs::Linux
        } else if cfg!(target_os = "macos") {
            HostOs::MacOs
        } else if cfg!(windows) {
            HostOs::Windows
        } else {
            HostOs::Other
        }
    }

    /// Whether graphical sessions need an X11 or Wayland display.
    pub fn uses_display_server(&self) -> bool {
        matches!(self, HostOs::Linux | HostOs::Other)
    }
}

/// Name a running screen reader by scanning the process table.
pub fn detect_screen_reader() -> Option<String> {
    let mut system = sysinfo::System::new();
    system.refresh_processes();
    let names: Vec<String> = system
        .processes()
        .values()
        .map(|p| p.name().to_string())
        .collect();

    let found = match_screen_reader(HostOs::current(), names.iter().map(String::as_str));
    if let Some(name) = found {
        log::info!("screen reader detected: {}", name);
    }
    found.map(str::to_string)
}

/// Match process names against the known screen readers for `os`.
///
/// Linux: `orca` or `speech-dispatcher` anywhere in the name (Orca).
/// macOS: a process named exactly `VoiceOver`.
/// Windows: `nvda.exe` (NVDA), `jfw.exe` or `jaws.exe` (JAWS).
pub fn match_screen_reader<'a, I>(os: HostOs, process_names: I) -> Option<&'static str>
where
    I: IntoIterator<Item = &'a str>,
{
    for name in process_names {
        match os {
            HostOs::Linux => {
                let lower = name.to_lowercase();
                if lower.contains("orca") || lower.contains("speech-dispatcher") {
                    return Some("Orca");
                }
            }
            HostOs::MacOs => {
                if name == "VoiceOver" {
                    return Some("VoiceOver");
                }
            }
            HostOs::Windows => match name.to_lowercase().as_str() {
                "nvda.exe" => return Some("NVDA"),
                "jfw.exe" | "jaws.exe" => return Some("JAWS"),
                _ => {}
            },
            HostOs::Other => return None,
        }
    }
    None
}

/// Ask whether to turn on automatic descriptions. Anything other than
/// `y`/`yes` (or end of input) counts as no.
pub fn ask_for_auto_describe<R, W>(input: &mut R, output: &mut W, screen_reader: &str) -> bool
where
    R: BufRead,
    W: Write,
{
    if writeln!(
        output,
        "\nScreen reader detected ({}). Enable automatic image descriptions? [y/n]",
        screen_reader
    )
    .and_then(|_| output.flush())
    .is_err()
    {
        return false;
    }

    let mut answer = String::new();
    match input.read_line(&mut answer) {
        Ok(0) | Err(_) => false,
        Ok(_) => is_yes(&answer),
    }
}

/// `y` or `yes`, ignoring case and surrounding whitespace.
pub(crate) fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
