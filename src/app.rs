//! Top-level conversion flows driven by the command line.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::accessibility::{
    ask_for_auto_describe, detect_environment, detect_screen_reader, Environment,
};
use crate::ascii::SampleError;
use crate::cli::{
    ascii_settings, handle_config_action, render_style, Args, AsciiSettings, Command,
    SettingsError,
};
use crate::codec::{self, CodecError};
use crate::config::{default_path, Config, ConfigError};
use crate::describe::{
    describe_cached, setup_client, DescribeError, DescriptionCache, DescriptionClient,
    API_KEY_ENV, ENV_FILE,
};
use crate::raster::RasterImage;
use crate::text::{rasterize, FontProvider, RenderError, RenderStyle, SystemFonts, TextDocument};

/// Anything that can stop a run.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Sample(#[from] SampleError),

    #[error(transparent)]
    Describe(#[from] DescribeError),

    #[error("failed to read '{}': {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write '{}': {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("Input file required for {0}")]
    MissingInput(&'static str),

    #[error("Output file required for ASCII to image conversion")]
    MissingOutput,

    #[error("failed to create async runtime: {0}")]
    Runtime(io::Error),
}

/// Render ASCII text to an image.
pub fn text_to_image(
    text: &str,
    style: &RenderStyle,
    fonts: &dyn FontProvider,
) -> Result<RasterImage, RenderError> {
    rasterize(&TextDocument::from_text(text), style, fonts)
}

/// Load an image file and quantize it to ASCII text (rows joined by `\n`).
pub fn image_to_ascii(path: &Path, settings: &AsciiSettings) -> Result<String, AppError> {
    let image = codec::load(path)?;
    let grid = settings.quantizer.quantize(&image, settings.columns)?;
    log::debug!("quantized to {}x{} characters", grid.columns(), grid.rows());
    Ok(grid.to_string())
}

/// Client for the key in the environment, asking for one on an
/// interactive desktop when none is set.
fn description_client() -> Result<DescriptionClient, AppError> {
    let stdin = io::stdin();
    let client = setup_client(
        std::env::var(API_KEY_ENV).ok(),
        detect_environment().is_interactive(),
        Path::new(ENV_FILE),
        &mut stdin.lock(),
        &mut io::stdout(),
    )?;
    Ok(client)
}

/// Describe an encoded image file with `model`, using the on-disk cache.
pub fn describe_file(path: &Path, model: &str) -> Result<String, AppError> {
    let bytes = std::fs::read(path).map_err(|source| AppError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let client = description_client()?.with_model(model);
    let cache = DescriptionCache::with_default_dir();

    let rt = tokio::runtime::Runtime::new().map_err(AppError::Runtime)?;
    Ok(rt.block_on(describe_cached(&client, &cache, &bytes))?)
}

fn print_description(description: &str) {
    println!("\nImage Description:\n{}", description);
}

/// Describe after a conversion. Failure here does not fail the conversion.
fn describe_after_conversion(path: &Path, model: &str) {
    match describe_file(path, model) {
        Ok(description) => print_description(&description),
        Err(e) => eprintln!("Warning: could not describe image: {}", e),
    }
}

/// On the first run with a screen reader, remember it and, in an
/// interactive session, offer to turn on automatic descriptions.
///
/// The reader is saved to `config_path` whatever the answer, so the
/// question is asked once. Does nothing when a reader is already
/// remembered or `screen_reader` is `None`.
pub fn offer_auto_describe<R, W>(
    config: &mut Config,
    config_path: &Path,
    screen_reader: Option<String>,
    environment: Environment,
    input: &mut R,
    output: &mut W,
) where
    R: BufRead,
    W: Write,
{
    if config.screen_reader.is_some() {
        return;
    }
    let Some(reader) = screen_reader else {
        return;
    };

    if environment.is_interactive() && ask_for_auto_describe(input, output, &reader) {
        config.auto_describe = true;
    }
    config.screen_reader = Some(reader);

    if let Err(e) = config.save(config_path) {
        log::warn!("could not save config: {}", e);
    }
}

fn first_run_accessibility(config: &mut Config, config_path: Option<&Path>) {
    if config.screen_reader.is_some() {
        return;
    }
    let path = config_path.map(Path::to_path_buf).unwrap_or_else(default_path);
    let stdin = io::stdin();
    offer_auto_describe(
        config,
        &path,
        detect_screen_reader(),
        detect_environment(),
        &mut stdin.lock(),
        &mut io::stdout(),
    );
}

/// Run the program for parsed arguments.
pub fn run(args: Args) -> Result<(), AppError> {
    let mut config = Config::load(args.config.as_deref())?;

    if let Some(Command::Config { action }) = &args.command {
        handle_config_action(action.clone(), args.config.as_deref(), &config);
        return Ok(());
    }

    let model = args.model.clone().unwrap_or_else(|| config.model.clone());

    if args.describe_only {
        let input = args
            .input
            .as_deref()
            .ok_or(AppError::MissingInput("describe-only mode"))?;
        print_description(&describe_file(input, &model)?);
        return Ok(());
    }

    if args.to_ascii {
        let input = args
            .input
            .as_deref()
            .ok_or(AppError::MissingInput("image to ASCII conversion"))?;
        let settings = ascii_settings(&args, &config.ascii)?;

        first_run_accessibility(&mut config, args.config.as_deref());

        let text = image_to_ascii(input, &settings)?;
        match args.output.as_deref() {
            Some(output) => {
                std::fs::write(output, format!("{}\n", text)).map_err(|source| {
                    AppError::Write {
                        path: output.to_path_buf(),
                        source,
                    }
                })?;
                println!("ASCII art saved to {}", output.display());
            }
            None => println!("{}", text),
        }

        if config.auto_describe || args.auto_describe {
            describe_after_conversion(input, &model);
        }
    } else {
        let input = args
            .input
            .as_deref()
            .ok_or(AppError::MissingInput("ASCII to image conversion"))?;
        let output = args.output.as_deref().ok_or(AppError::MissingOutput)?;
        codec::format_for_path(output)?;
        let style = render_style(&args, &config.render)?;

        first_run_accessibility(&mut config, args.config.as_deref());

        let text = std::fs::read_to_string(input).map_err(|source| AppError::Read {
            path: input.to_path_buf(),
            source,
        })?;
        let image = text_to_image(&text, &style, &SystemFonts::new())?;
        codec::save(&image, output)?;
        println!("Image saved to {}", output.display());

        if config.auto_describe || args.auto_describe {
            describe_after_conversion(output, &model);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ascii::Quantizer;
    use crate::raster::ColorModel;
    use clap::Parser;

    fn args(extra: &[&str], dir: &Path) -> Args {
        let config = dir.join("config.toml");
        let mut argv = vec!["asciivision", "-c", config.to_str().unwrap()];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn ascii_to_image_needs_output() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(args(&["-i", "art.txt"], dir.path())).unwrap_err();
        assert!(matches!(err, AppError::MissingOutput));
        assert_eq!(
            err.to_string(),
            "Output file required for ASCII to image conversion"
        );
    }

    #[test]
    fn every_mode_needs_input() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            run(args(&["-a"], dir.path())),
            Err(AppError::MissingInput("image to ASCII conversion"))
        ));
        assert!(matches!(
            run(args(&["-D"], dir.path())),
            Err(AppError::MissingInput("describe-only mode"))
        ));
        assert!(matches!(
            run(args(&["-o", "out.png"], dir.path())),
            Err(AppError::MissingInput(_))
        ));
    }

    #[test]
    fn unsupported_output_extension_fails_before_rendering() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(args(&["-i", "missing.txt", "-o", "out.svg"], dir.path())).unwrap_err();
        assert!(matches!(
            err,
            AppError::Codec(CodecError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn image_to_ascii_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("black.png");
        let image = RasterImage::filled(8, 8, ColorModel::Rgb, &[0, 0, 0]);
        codec::save(&image, &path).unwrap();

        let settings = AsciiSettings {
            quantizer: Quantizer::new().with_aspect_correction(1.0).unwrap(),
            columns: 4,
        };
        let text = image_to_ascii(&path, &settings).unwrap();
        assert_eq!(text, "@@@@\n@@@@\n@@@@\n@@@@");
    }

    fn offer(
        config: &mut Config,
        path: &Path,
        reader: Option<&str>,
        environment: Environment,
        answer: &str,
    ) -> String {
        let mut out = Vec::new();
        offer_auto_describe(
            config,
            path,
            reader.map(str::to_string),
            environment,
            &mut std::io::Cursor::new(answer.to_string()),
            &mut out,
        );
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn screen_reader_yes_enables_auto_describe() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::default();

        let out = offer(&mut config, &path, Some("Orca"), Environment::Desktop, "y\n");
        assert!(out.contains("Screen reader detected (Orca)"));
        assert!(config.auto_describe);

        let saved = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(saved.screen_reader.as_deref(), Some("Orca"));
        assert!(saved.auto_describe);
    }

    #[test]
    fn screen_reader_no_is_still_remembered() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::default();

        offer(&mut config, &path, Some("NVDA"), Environment::Desktop, "n\n");
        assert!(!config.auto_describe);

        let saved = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(saved.screen_reader.as_deref(), Some("NVDA"));
        assert!(!saved.auto_describe);
    }

    #[test]
    fn screen_reader_without_desktop_is_not_asked() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::default();

        let out = offer(&mut config, &path, Some("Orca"), Environment::Headless, "y\n");
        assert!(out.is_empty());
        assert!(!config.auto_describe);
        assert_eq!(
            Config::load(Some(path.as_path())).unwrap().screen_reader.as_deref(),
            Some("Orca")
        );
    }

    #[test]
    fn no_screen_reader_or_already_remembered_leaves_config_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        let out = offer(&mut config, &path, None, Environment::Desktop, "y\n");
        assert!(out.is_empty());
        assert_eq!(config, Config::default());
        assert!(!path.exists());

        let mut remembered = Config {
            screen_reader: Some("VoiceOver".to_string()),
            ..Config::default()
        };
        let out = offer(&mut remembered, &path, Some("Orca"), Environment::Desktop, "y\n");
        assert!(out.is_empty());
        assert_eq!(remembered.screen_reader.as_deref(), Some("VoiceOver"));
        assert!(!remembered.auto_describe);
        assert!(!path.exists());
    }

    #[test]
    fn run_to_ascii_writes_output_file() {
        let dir = tempfile::tempdir().unwrap();
        // A remembered reader skips first-run detection
        Config {
            screen_reader: Some("Orca".to_string()),
            ..Config::default()
        }
        .save(&dir.path().join("config.toml"))
        .unwrap();

        let input = dir.path().join("black.png");
        codec::save(&RasterImage::filled(8, 8, ColorModel::Rgb, &[0, 0, 0]), &input).unwrap();
        let output = dir.path().join("art.txt");

        run(args(
            &[
                "-a",
                "-i",
                input.to_str().unwrap(),
                "-o",
                output.to_str().unwrap(),
                "-w",
                "4",
            ],
            dir.path(),
        ))
        .unwrap();

        // 4 columns x round(4 * 0.55) rows, newline-terminated
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "@@@@\n@@@@\n");
    }

    #[test]
    fn describe_file_reports_missing_file() {
        let err = describe_file(Path::new("/definitely/missing.png"), "gpt-4o").unwrap_err();
        assert!(matches!(err, AppError::Read { .. }));
    }
}
