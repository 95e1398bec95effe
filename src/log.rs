//! Program logging.
//!
//! Messages go to the terminal (with colour if it is a TTY) and, for the `run` command, to a log
//! file in the output folder. Warnings and errors are written to stderr and everything else to
//! stdout.
use anyhow::{Context, Result, anyhow, bail};
use chrono::Local;
use fern::colors::{Color, ColoredLevelConfig};
use fern::{Dispatch, FormatCallback};
use log::{Level, LevelFilter, Record};
use std::env;
use std::fmt::Arguments;
use std::fs::OpenOptions;
use std::io::IsTerminal;
use std::path::Path;
use std::sync::OnceLock;

static LOGGER_INIT: OnceLock<()> = OnceLock::new();

/// The log level used if neither `QUANTESTATE_LOG_LEVEL` nor `settings.toml` gives one
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// The environment variable which overrides the log level
pub const LOG_LEVEL_ENV_VAR: &str = "QUANTESTATE_LOG_LEVEL";

/// The name of the log file written to the output folder
pub const LOG_FILE_NAME: &str = "quantestate.log";

/// Whether the program logger has been initialised
pub fn is_logger_initialised() -> bool {
    LOGGER_INIT.get().is_some()
}

/// Initialise the program logger.
///
/// The level is taken from `QUANTESTATE_LOG_LEVEL` if set, otherwise from the settings file. One of
/// `off`, `error`, `warn`, `info`, `debug` or `trace` (case-insensitive).
///
/// The log file, if any, always records at least `info` messages, so that a quiet terminal still
/// leaves a full record of the run.
///
/// # Arguments
///
/// * `log_level_from_settings`: The log level specified in `settings.toml`
/// * `output_path`: Folder in which to write the log file, if any
pub fn init(log_level_from_settings: &str, output_path: Option<&Path>) -> Result<()> {
    let log_level = select_log_level(
        env::var(LOG_LEVEL_ENV_VAR).ok().as_deref(),
        log_level_from_settings,
    )?;

    let mut dispatch = Dispatch::new().chain(terminal_dispatch(log_level));
    if let Some(output_path) = output_path {
        let file_path = output_path.join(LOG_FILE_NAME);
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&file_path)
            .with_context(|| format!("Could not create log file {}", file_path.display()))?;
        dispatch = dispatch.chain(
            Dispatch::new()
                .level(log_level.max(LevelFilter::Info))
                .format(|out, message, record| write_record(out, message, record, None))
                .chain(file),
        );
    }

    dispatch.apply().context("Logger already initialised")?;
    LOGGER_INIT
        .set(())
        .map_err(|()| anyhow!("Logger already initialised"))
}

/// Choose the log level, preferring the one from the environment
fn select_log_level(from_env: Option<&str>, from_settings: &str) -> Result<LevelFilter> {
    parse_log_level(from_env.unwrap_or(from_settings))
}

/// Convert a log level string to a [`LevelFilter`]
fn parse_log_level(log_level: &str) -> Result<LevelFilter> {
    let level = match log_level.to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        unknown => bail!("Unknown log level: {unknown}"),
    };

    Ok(level)
}

fn level_colours() -> ColoredLevelConfig {
    ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Blue)
        .trace(Color::Magenta)
}

/// Send warnings and errors to stderr and other messages to stdout
fn terminal_dispatch(log_level: LevelFilter) -> Dispatch {
    let stdout_colours = std::io::stdout().is_terminal().then(level_colours);
    let stderr_colours = std::io::stderr().is_terminal().then(level_colours);

    Dispatch::new()
        .level(log_level)
        .chain(
            Dispatch::new()
                .filter(|metadata| metadata.level() > Level::Warn)
                .format(move |out, message, record| {
                    write_record(out, message, record, stdout_colours.as_ref());
                })
                .chain(std::io::stdout()),
        )
        .chain(
            Dispatch::new()
                .filter(|metadata| metadata.level() <= Level::Warn)
                .format(move |out, message, record| {
                    write_record(out, message, record, stderr_colours.as_ref());
                })
                .chain(std::io::stderr()),
        )
}

/// Write one log line as `[HH:MM:SS LEVEL] message`, colouring the level if asked to
fn write_record(
    out: FormatCallback,
    message: &Arguments,
    record: &Record,
    colours: Option<&ColoredLevelConfig>,
) {
    let timestamp = Local::now().format("%H:%M:%S");
    match colours {
        Some(colours) => out.finish(format_args!(
            "[{timestamp} {}] {message}",
            colours.color(record.level())
        )),
        None => out.finish(format_args!("[{timestamp} {}] {message}", record.level())),
    }
}
