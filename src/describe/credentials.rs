//! API key lookup and first-run key setup.
//!
//! When no key is configured and the session is interactive, the user is
//! asked for one, shown the masked key to confirm, and the confirmed key is
//! written to a `.env` file for later runs.

use std::io::{self, BufRead, Write};
use std::path::Path;

use super::client::{mask_api_key, DescribeError, DescriptionClient, API_KEY_ENV};
use crate::accessibility::is_yes;

/// File the confirmed key is saved to, relative to the working directory.
pub const ENV_FILE: &str = ".env";

/// Where users can create a key.
pub const API_KEY_URL: &str = "https://platform.openai.com/api-keys";

/// Build a client from `existing` (the environment's key, if any), falling
/// back to asking for a key when `interactive`.
///
/// A confirmed key is saved to `env_file`; failing to save only logs a
/// warning. Returns `MissingApiKey` when there is no key and none was
/// entered.
pub fn setup_client<R, W>(
    existing: Option<String>,
    interactive: bool,
    env_file: &Path,
    input: &mut R,
    output: &mut W,
) -> Result<DescriptionClient, DescribeError>
where
    R: BufRead,
    W: Write,
{
    if let Some(key) = existing.filter(|k| !k.trim().is_empty()) {
        return DescriptionClient::with_api_key(key);
    }
    if !interactive {
        return Err(DescribeError::MissingApiKey);
    }

    let key = prompt_for_api_key(input, output).ok_or(DescribeError::MissingApiKey)?;
    match save_api_key(env_file, &key) {
        Ok(()) => {
            let _ = writeln!(output, "API key saved to {}", env_file.display());
        }
        Err(e) => log::warn!("could not save API key to {}: {}", env_file.display(), e),
    }
    DescriptionClient::with_api_key(key)
}

/// Ask for an API key and have the user confirm its masked form.
///
/// Returns `None` when nothing is entered, the key is not confirmed, or
/// input ends early.
pub fn prompt_for_api_key<R, W>(input: &mut R, output: &mut W) -> Option<String>
where
    R: BufRead,
    W: Write,
{
    match run_key_prompt(input, output) {
        Ok(key) => key,
        Err(e) => {
            log::warn!("API key prompt failed: {}", e);
            None
        }
    }
}

fn run_key_prompt<R, W>(input: &mut R, output: &mut W) -> io::Result<Option<String>>
where
    R: BufRead,
    W: Write,
{
    writeln!(output, "\nOpenAI API Key Setup")?;
    writeln!(output, "====================")?;
    writeln!(output, "Image descriptions need an OpenAI API key.")?;
    writeln!(output, "You can get one from: {}", API_KEY_URL)?;
    writeln!(output)?;
    write!(output, "Enter your OpenAI API key: ")?;
    output.flush()?;

    let Some(line) = read_answer(input)? else {
        writeln!(output, "\nAPI key setup cancelled.")?;
        return Ok(None);
    };
    let key = line.trim().to_string();
    if key.is_empty() {
        writeln!(output, "No API key provided. Skipping setup.")?;
        return Ok(None);
    }

    writeln!(output, "\nIs this your API key: {}? [y/n]", mask_api_key(&key))?;
    output.flush()?;

    match read_answer(input)? {
        None => {
            writeln!(output, "\nAPI key setup cancelled.")?;
            Ok(None)
        }
        Some(answer) if is_yes(&answer) => {
            writeln!(output, "API key confirmed.")?;
            Ok(Some(key))
        }
        Some(_) => {
            writeln!(output, "API key not confirmed. Skipping setup.")?;
            Ok(None)
        }
    }
}

fn read_answer<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        Ok(None)
    } else {
        Ok(Some(line))
    }
}

/// Write `OPENAI_API_KEY=<key>` to `path`, replacing any earlier key and
/// keeping every other line.
pub fn save_api_key(path: &Path, key: &str) -> io::Result<()> {
    let existing = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e),
    };

    let prefix = format!("{}=", API_KEY_ENV);
    let mut contents: String = existing
        .lines()
        .filter(|line| {
            let line = line.trim_start();
            let line = line.strip_prefix("export ").unwrap_or(line).trim_start();
            !line.starts_with(&prefix)
        })
        .map(|line| format!("{}\n", line))
        .collect();
    contents.push_str(&format!("{}{}\n", prefix, key));

    std::fs::write(path, contents)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    }

    log::info!("saved API key to {}", path.display());
    Ok(())
}
