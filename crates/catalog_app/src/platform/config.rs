//! Command-line configuration.
//!
//! Precedence: defaults → environment (`CATALOG_BASE_URL`) → CLI arguments.

use std::path::PathBuf;
use std::time::Duration;

use catalog_engine::{ClientSettings, DEFAULT_BASE_URL};
use catalog_logging::{LogDestination, LogSettings, DEFAULT_LOG_FILE};
use clap::{Parser, ValueEnum};
use log::LevelFilter;
use thiserror::Error;

/// Star Wars character search in the terminal
#[derive(Parser, Debug)]
#[command(name = "catalog")]
#[command(version)]
#[command(about = "Search the Star Wars character catalog from the terminal")]
pub struct Args {
    /// Base URL of the catalog API
    #[arg(long, env = "CATALOG_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Upper bound for a single page request, in seconds
    #[arg(long, default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Upper bound for establishing a connection, in seconds
    #[arg(long, default_value_t = 10)]
    pub connect_timeout_secs: u64,

    /// Largest accepted response body, in bytes
    #[arg(long, default_value_t = 5 * 1024 * 1024)]
    pub max_bytes: u64,

    /// Where log output goes
    #[arg(long, value_enum, default_value_t = LogTarget::File)]
    pub log: LogTarget,

    /// Log file, appended to across sessions
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,

    /// Search term submitted right after start
    #[arg(short, long)]
    pub search: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    File,
    Terminal,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::File => LogDestination::File,
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be greater than zero")]
    Zero { name: &'static str },

    #[error("base url must not be empty")]
    EmptyBaseUrl,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub client: ClientSettings,
    pub log: LogSettings,
    pub initial_search: Option<String>,
}

impl Args {
    pub fn into_config(self) -> Result<AppConfig, ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Zero {
                name: "request timeout",
            });
        }
        if self.connect_timeout_secs == 0 {
            return Err(ConfigError::Zero {
                name: "connect timeout",
            });
        }
        if self.max_bytes == 0 {
            return Err(ConfigError::Zero { name: "max bytes" });
        }

        let client = ClientSettings {
            base_url: self.base_url.trim().to_string(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            max_bytes: self.max_bytes,
            ..ClientSettings::default()
        };

        Ok(AppConfig {
            client,
            log: LogSettings {
                destination: self.log.into(),
                level: if self.verbose {
                    LevelFilter::Debug
                } else {
                    LevelFilter::Info
                },
                file: self.log_file,
            },
            initial_search: self.search,
        })
    }
}
