//! Logging configuration and initialization
//!
//! One logging setup for every binary in the workspace:
//!
//! - console, file, or combined output
//! - text or JSON formatting
//! - daily file rotation with a non-blocking writer
//! - configuration from `LOG_*` environment variables or a builder
//!
//! All diagnostics go through `tracing` macros; `println!`/`eprintln!` are
//! not used anywhere in the workspace. Handlers and long-running operations
//! attach structured fields (`info!(file = %name, succeeded, failed, ...)`)
//! so file-format logs stay machine-readable.
//!
//! # Example
//!
//! ```no_run
//! use dts_common::logging::{init_logging, LogConfig, LogLevel};
//!
//! let config = LogConfig::builder()
//!     .level(LogLevel::Debug)
//!     .file_prefix("dts-server")
//!     .build();
//! init_logging(&config).unwrap();
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

const DEFAULT_LOG_DIR: &str = "./logs";
const DEFAULT_FILE_PREFIX: &str = "dts";

/// Minimum severity for emitted records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    fn tracing_level(self) -> Level {
        match self {
            Self::Trace => Level::TRACE,
            Self::Debug => Level::DEBUG,
            Self::Info => Level::INFO,
            Self::Warn => Level::WARN,
            Self::Error => Level::ERROR,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => anyhow::bail!("Unknown log level {other:?}"),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where log records are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Console,
    File,
    Both,
}

impl LogOutput {
    fn to_console(self) -> bool {
        matches!(self, Self::Console | Self::Both)
    }

    fn to_file(self) -> bool {
        matches!(self, Self::File | Self::Both)
    }
}

impl std::str::FromStr for LogOutput {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "console" | "stdout" => Ok(Self::Console),
            "file" => Ok(Self::File),
            "both" | "all" => Ok(Self::Both),
            other => anyhow::bail!("Unknown log output {other:?}"),
        }
    }
}

/// Record formatting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => anyhow::bail!("Unknown log format {other:?}"),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Minimum severity to emit
    pub level: LogLevel,

    /// Where records go (console, file, or both)
    pub output: LogOutput,

    /// Text or JSON records
    pub format: LogFormat,

    /// Directory holding rotated log files
    pub log_dir: PathBuf,

    /// File name prefix ("dts-server" -> "dts-server.2024-01-18.log")
    pub file_prefix: String,

    /// Extra per-module directives ("sqlx=warn,tower_http=debug")
    pub filter_directives: Option<String>,

    /// Record the file and line of each event
    pub include_location: bool,

    /// Record thread IDs
    pub include_thread_ids: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            output: LogOutput::default(),
            format: LogFormat::default(),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
            filter_directives: None,
            include_location: false,
            include_thread_ids: false,
        }
    }
}

impl LogConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from the environment.
    ///
    /// Recognized variables: `LOG_LEVEL`, `LOG_OUTPUT`, `LOG_FORMAT`,
    /// `LOG_DIR`, `LOG_FILE_PREFIX`, `LOG_FILTER`, `LOG_INCLUDE_LOCATION`,
    /// `LOG_INCLUDE_THREAD_IDS`. Unset variables keep their defaults.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            level: env_parse("LOG_LEVEL")?.unwrap_or(defaults.level),
            output: env_parse("LOG_OUTPUT")?.unwrap_or(defaults.output),
            format: env_parse("LOG_FORMAT")?.unwrap_or(defaults.format),
            log_dir: std::env::var_os("LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_dir),
            file_prefix: std::env::var("LOG_FILE_PREFIX").unwrap_or(defaults.file_prefix),
            filter_directives: std::env::var("LOG_FILTER").ok(),
            include_location: env_flag("LOG_INCLUDE_LOCATION"),
            include_thread_ids: env_flag("LOG_INCLUDE_THREAD_IDS"),
        })
    }

    pub fn builder() -> LogConfigBuilder {
        LogConfigBuilder::default()
    }
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr<Err = anyhow::Error>,
{
    std::env::var(key).ok().map(|raw| raw.parse()).transpose()
}

fn env_flag(key: &str) -> bool {
    std::env::var(key)
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(false)
}

/// Builder for [`LogConfig`]
#[derive(Default)]
pub struct LogConfigBuilder {
    inner: LogConfig,
}

impl LogConfigBuilder {
    pub fn level(mut self, level: LogLevel) -> Self {
        self.inner.level = level;
        self
    }

    pub fn output(mut self, output: LogOutput) -> Self {
        self.inner.output = output;
        self
    }

    pub fn format(mut self, format: LogFormat) -> Self {
        self.inner.format = format;
        self
    }

    pub fn log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.inner.log_dir = dir.into();
        self
    }

    pub fn file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.inner.file_prefix = prefix.into();
        self
    }

    pub fn filter_directives(mut self, filter: impl Into<String>) -> Self {
        self.inner.filter_directives = Some(filter.into());
        self
    }

    pub fn include_location(mut self, include: bool) -> Self {
        self.inner.include_location = include;
        self
    }

    pub fn include_thread_ids(mut self, include: bool) -> Self {
        self.inner.include_thread_ids = include;
        self
    }

    pub fn build(self) -> LogConfig {
        self.inner
    }
}

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync>;

/// Install the global tracing subscriber. Call once at startup.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let console = config.output.to_console().then(|| console_layer(config));
    let file = config
        .output
        .to_file()
        .then(|| file_layer(config))
        .transpose()?;

    tracing_subscriber::registry()
        .with(env_filter(config)?)
        .with(console)
        .with(file)
        .try_init()
        .context("A global tracing subscriber is already installed")?;

    Ok(())
}

fn env_filter(config: &LogConfig) -> Result<EnvFilter> {
    let base = EnvFilter::from_default_env().add_directive(config.level.tracing_level().into());

    let Some(directives) = config.filter_directives.as_deref() else {
        return Ok(base);
    };

    directives
        .split(',')
        .map(str::trim)
        .filter(|directive| !directive.is_empty())
        .try_fold(base, |filter, directive| {
            let parsed = directive
                .parse()
                .with_context(|| format!("Bad log filter directive {directive:?}"))?;
            Ok(filter.add_directive(parsed))
        })
}

fn console_layer<S>(config: &LogConfig) -> BoxedLayer<S>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    format_layer(config, std::io::stdout, true)
}

fn file_layer<S>(config: &LogConfig) -> Result<BoxedLayer<S>>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    std::fs::create_dir_all(&config.log_dir).with_context(|| {
        format!("Failed to create log directory {}", config.log_dir.display())
    })?;

    let appender = tracing_appender::rolling::daily(&config.log_dir, &config.file_prefix);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    // The guard flushes on drop and must outlive the process; leak it.
    std::mem::forget(guard);

    Ok(format_layer(config, writer, false))
}

fn format_layer<S, W>(config: &LogConfig, writer: W, ansi: bool) -> BoxedLayer<S>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> fmt::MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi)
        .with_thread_ids(config.include_thread_ids)
        .with_file(config.include_location)
        .with_line_number(config.include_location)
        .with_span_events(FmtSpan::CLOSE);

    match config.format {
        LogFormat::Text => layer.boxed(),
        LogFormat::Json => layer.json().boxed(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use tracing_subscriber::Registry;

    #[test]
    fn test_level_aliases_and_case() {
        assert_eq!("TRACE".parse::<LogLevel>().unwrap(), LogLevel::Trace);
        assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!(" info ".parse::<LogLevel>().unwrap(), LogLevel::Info);
        assert!("verbose".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_level_display_round_trips() {
        for level in [
            LogLevel::Trace,
            LogLevel::Debug,
            LogLevel::Info,
            LogLevel::Warn,
            LogLevel::Error,
        ] {
            assert_eq!(level.to_string().parse::<LogLevel>().unwrap(), level);
        }
    }

    #[test]
    fn test_output_and_format_aliases() {
        assert_eq!("stdout".parse::<LogOutput>().unwrap(), LogOutput::Console);
        assert_eq!("ALL".parse::<LogOutput>().unwrap(), LogOutput::Both);
        assert!("syslog".parse::<LogOutput>().is_err());
        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_builder_overrides_defaults() {
        let config = LogConfig::builder()
            .level(LogLevel::Trace)
            .output(LogOutput::Both)
            .format(LogFormat::Json)
            .log_dir("/var/log/dts")
            .file_prefix("dts-worker")
            .filter_directives("sqlx=warn,tower_http=debug")
            .include_location(true)
            .build();

        assert_eq!(config.level, LogLevel::Trace);
        assert_eq!(config.output, LogOutput::Both);
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.log_dir, PathBuf::from("/var/log/dts"));
        assert_eq!(config.file_prefix, "dts-worker");
        assert!(config.include_location);
        assert!(!config.include_thread_ids);
    }

    #[test]
    fn test_bad_filter_directive_is_an_error() {
        let config = LogConfig::builder()
            .filter_directives("not a directive")
            .build();
        assert!(env_filter(&config).is_err());
    }

    #[test]
    fn test_empty_filter_segments_are_skipped() {
        let config = LogConfig::builder()
            .filter_directives("sqlx=warn,, tower_http=debug ,")
            .build();
        assert!(env_filter(&config).is_ok());
    }

    #[test]
    fn test_file_layer_creates_log_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("logs/server");
        let config = LogConfig::builder()
            .output(LogOutput::File)
            .log_dir(&nested)
            .file_prefix("test")
            .build();

        file_layer::<Registry>(&config).unwrap();
        assert!(nested.is_dir());
    }
}
