use crate::{env_parse_or, ConfigError, Environment, FromEnv};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, info, warn, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{prelude::*, EnvFilter};

/// Install color-eyre with a project-standard configuration.
///
/// Call this early in main() before any fallible operations. Safe to call
/// multiple times.
pub fn install_color_eyre() {
    let _ = color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install();
}

/// Console output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{other}' (expected pretty or json)")),
        }
    }
}

/// How often the log file rolls over.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogRotation {
    Minutely,
    Hourly,
    Daily,
    Never,
}

impl FromStr for LogRotation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "minutely" => Ok(LogRotation::Minutely),
            "hourly" => Ok(LogRotation::Hourly),
            "daily" => Ok(LogRotation::Daily),
            "never" => Ok(LogRotation::Never),
            other => Err(format!("unknown log rotation '{other}'")),
        }
    }
}

impl From<LogRotation> for Rotation {
    fn from(rotation: LogRotation) -> Self {
        match rotation {
            LogRotation::Minutely => Rotation::MINUTELY,
            LogRotation::Hourly => Rotation::HOURLY,
            LogRotation::Daily => Rotation::DAILY,
            LogRotation::Never => Rotation::NEVER,
        }
    }
}

/// Logger settings.
///
/// - `LOG_LEVEL`: trace | debug | info | warn | error (overridden by `RUST_LOG`)
/// - `LOG_FORMAT`: pretty | json (defaults by environment)
/// - `LOG_DIR`: enables a rolling JSON log file in this directory
/// - `LOG_ROTATION`: minutely | hourly | daily | never (default daily)
/// - `LOG_MAX_FILES`: rotated files to keep (default 7)
#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub format: Option<LogFormat>,
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
    pub rotation: LogRotation,
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: None,
            format: None,
            directory: None,
            file_prefix: "app".to_string(),
            rotation: LogRotation::Daily,
            max_files: 7,
        }
    }
}

impl LoggingConfig {
    pub fn with_file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.file_prefix = prefix.into();
        self
    }

    fn format_for(&self, environment: &Environment) -> LogFormat {
        self.format.unwrap_or(if environment.is_production() {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        })
    }
}

impl FromEnv for LoggingConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let non_empty = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());

        let format = match non_empty("LOG_FORMAT") {
            Some(raw) => Some(raw.parse().map_err(|e| ConfigError::parse("LOG_FORMAT", e))?),
            None => None,
        };

        Ok(Self {
            level: non_empty("LOG_LEVEL"),
            format,
            directory: non_empty("LOG_DIR").map(PathBuf::from),
            file_prefix: defaults.file_prefix,
            rotation: env_parse_or("LOG_ROTATION", defaults.rotation)?,
            max_files: env_parse_or("LOG_MAX_FILES", defaults.max_files)?,
        })
    }
}

/// Picks the filter directive: `RUST_LOG`, then `LOG_LEVEL`, then a default
/// for the environment. Returns the rejected `LOG_LEVEL` value, if any, so it
/// can be reported once the subscriber is installed.
fn resolve_filter(environment: &Environment, level: Option<&str>) -> (EnvFilter, Option<String>) {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return (filter, None);
    }

    match level {
        Some(raw) => match Level::from_str(raw.trim()) {
            Ok(level) => (EnvFilter::new(level.as_str().to_ascii_lowercase()), None),
            Err(_) => (EnvFilter::new("info"), Some(raw.to_string())),
        },
        None if environment.is_production() => (EnvFilter::new("info"), None),
        None => (EnvFilter::new("debug"), None),
    }
}

/// Initialize tracing with environment-aware configuration and error span capture.
///
/// - **Production**: JSON records, module targets hidden.
/// - **Development**: pretty, human-readable output.
///
/// When `LOG_DIR` is set, records are additionally written as JSON to a
/// rolling file. The returned guard flushes that file writer on drop and must
/// be held for the life of the process.
///
/// Safe to call multiple times; later calls leave the first subscriber in place.
pub fn init_tracing(environment: &Environment, config: &LoggingConfig) -> Option<WorkerGuard> {
    let (filter, rejected_level) = resolve_filter(environment, config.level.as_deref());

    let (file_writer, guard) = match file_appender(config) {
        Ok(Some(appender)) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(writer), Some(guard))
        }
        Ok(None) => (None, None),
        Err(e) => {
            eprintln!("Failed to open log directory, logging to stdout only: {e}");
            (None, None)
        }
    };
    let file_layer = file_writer.map(|writer| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_ansi(false)
            .with_writer(writer)
    });

    let result = match config.format_for(environment) {
        LogFormat::Json => tracing_subscriber::registry()
            .with(file_layer)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .with_current_span(true)
                    .flatten_event(true),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(file_layer)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_file(false)
                    .with_line_number(false)
                    .pretty(),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init(),
    };

    match result {
        Ok(_) => {
            info!(environment = environment.as_str(), "Logger has been initialized");
            if let Some(level) = rejected_level {
                warn!(log_level = %level, "Invalid LOG_LEVEL, falling back to info");
            }
        }
        Err(_) => {
            debug!("Tracing already initialized, skipping re-initialization");
        }
    }

    guard
}

fn file_appender(
    config: &LoggingConfig,
) -> Result<Option<RollingFileAppender>, tracing_appender::rolling::InitError> {
    let Some(directory) = config.directory.as_ref() else {
        return Ok(None);
    };

    RollingFileAppender::builder()
        .rotation(config.rotation.into())
        .filename_prefix(&config.file_prefix)
        .filename_suffix("log")
        .max_log_files(config.max_files.max(1))
        .build(directory)
        .map(Some)
}
