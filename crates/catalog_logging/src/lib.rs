#![deny(missing_docs)]
//! Logging for the catalog workspace.
//!
//! Every crate logs through the `catalog_*` macros, which forward to the
//! `log` facade. The terminal app installs the backends once at start with
//! [`initialize`]; tests use [`initialize_for_tests`].

use std::fs::{File, OpenOptions};
use std::io;
use std::path::PathBuf;

use log::{LevelFilter, SetLoggerError};
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use thiserror::Error;

/// Log file used when none is configured, relative to the working directory.
pub const DEFAULT_LOG_FILE: &str = "./catalog.log";

/// Trace-level message, for per-chunk and other high-volume detail.
#[macro_export]
macro_rules! catalog_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Debug-level message.
#[macro_export]
macro_rules! catalog_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Info-level message.
#[macro_export]
macro_rules! catalog_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Warn-level message.
#[macro_export]
macro_rules! catalog_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Error-level message.
#[macro_export]
macro_rules! catalog_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Where log records are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogDestination {
    /// Append to the configured log file only.
    File,
    /// Terminal only; warnings and errors go to stderr.
    Terminal,
    /// Terminal and log file.
    Both,
}

/// Logger setup chosen at start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// Backends to install.
    pub destination: LogDestination,
    /// Most verbose level that is recorded.
    pub level: LevelFilter,
    /// File used by [`LogDestination::File`] and [`LogDestination::Both`].
    pub file: PathBuf,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            destination: LogDestination::File,
            level: LevelFilter::Info,
            file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

/// Why the global logger could not be installed.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The log file could not be opened for appending.
    #[error("cannot open log file {}: {source}", .path.display())]
    OpenFile {
        /// The configured file.
        path: PathBuf,
        /// Underlying failure.
        source: io::Error,
    },
    /// Another logger was installed first.
    #[error("a logger is already installed")]
    AlreadyInstalled(#[from] SetLoggerError),
}

/// Installs the global logger described by `settings`.
///
/// Sessions append to the log file, so earlier runs stay readable. Nothing is
/// installed when the file cannot be opened.
pub fn initialize(settings: &LogSettings) -> Result<(), LoggingError> {
    let loggers = build_loggers(settings)?;
    CombinedLogger::init(loggers)?;
    Ok(())
}

fn build_loggers(settings: &LogSettings) -> Result<Vec<Box<dyn SharedLogger>>, LoggingError> {
    let config = record_config();
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();

    if matches!(
        settings.destination,
        LogDestination::Terminal | LogDestination::Both
    ) {
        loggers.push(TermLogger::new(
            settings.level,
            config.clone(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ));
    }
    if matches!(
        settings.destination,
        LogDestination::File | LogDestination::Both
    ) {
        let file = open_log_file(settings)?;
        loggers.push(WriteLogger::new(settings.level, config, file));
    }
    Ok(loggers)
}

fn open_log_file(settings: &LogSettings) -> Result<File, LoggingError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&settings.file)
        .map_err(|source| LoggingError::OpenFile {
            path: settings.file.clone(),
            source,
        })
}

fn record_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

/// Terminal logger for tests. Safe to call from every test; only the first
/// call installs anything.
pub fn initialize_for_tests() {
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
