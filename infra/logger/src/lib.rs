//! # Logger
//!
//! Installs the process-wide `tracing` subscriber used by every Order Hub binary.
//!
//! * A compact ANSI console layer (on by default).
//! * An optional daily-rolling file layer written through a non-blocking worker.
//! * JSON output for both layers when structured logs are needed.
//! * Level and directive filtering, with `RUST_LOG` honored when no explicit filter is set.
//!
//! ## Example
//!
//! ```rust
//! # use ohub_logger::{Logger, LevelFilter};
//! let _logger = Logger::builder()
//!     .name("ohub-server")
//!     .level(LevelFilter::DEBUG)
//!     .init()
//!     .unwrap();
//! ```

mod error;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use private::Sealed;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const DEFAULT_MAX_FILES: usize = 10;
const LOG_FILE_SUFFIX: &str = "log";

/// Everything the subscriber needs besides the application name.
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub console: bool,
    pub directory: Option<PathBuf>,
    pub level: LevelFilter,
    pub rotation: Rotation,
    pub max_files: usize,
    pub json: bool,
    pub filter: Option<String>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            console: true,
            directory: None,
            level: LevelFilter::INFO,
            rotation: Rotation::DAILY,
            max_files: DEFAULT_MAX_FILES,
            json: false,
            filter: None,
        }
    }
}

#[derive(Debug)]
pub struct NoName;
#[derive(Debug)]
pub struct WithName(String);

mod private {
    pub trait Sealed {}
}
impl Sealed for NoName {}
impl Sealed for WithName {}

/// Configures the global subscriber. [`LoggerBuilder::init`] is only available once a name
/// has been set, since the name prefixes rolling log files.
#[derive(Debug)]
#[must_use = "The builder must be configured before it can be used to initialize the logger."]
pub struct LoggerBuilder<N: Sealed = NoName> {
    config: LoggerConfig,
    name: N,
}

impl LoggerBuilder<NoName> {
    pub fn name(self, name: impl Into<String>) -> LoggerBuilder<WithName> {
        LoggerBuilder { config: self.config, name: WithName(name.into()) }
    }
}

impl<N: Sealed> LoggerBuilder<N> {
    /// Replaces every setting at once, e.g. with values read from the application config.
    pub fn config(mut self, config: LoggerConfig) -> Self {
        self.config = config;
        self
    }

    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.config.level = level;
        self
    }

    /// Adds explicit directives (e.g. `ohub_orders=debug,tower_http=info`).
    ///
    /// When set, `RUST_LOG` is ignored and invalid directives fail [`LoggerBuilder::init`].
    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.config.filter = Some(filter.into());
        self
    }

    pub const fn console(mut self, enabled: bool) -> Self {
        self.config.console = enabled;
        self
    }

    /// Writes rolling log files into `directory`.
    pub fn directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.config.directory = Some(directory.into());
        self
    }

    pub const fn max_files(mut self, max: usize) -> Self {
        self.config.max_files = max;
        self
    }

    pub const fn rotation(mut self, rotation: Rotation) -> Self {
        self.config.rotation = rotation;
        self
    }

    pub const fn json(mut self, enabled: bool) -> Self {
        self.config.json = enabled;
        self
    }
}

impl LoggerBuilder<WithName> {
    /// Consumes the builder and installs the global tracing subscriber.
    ///
    /// The returned [`Logger`] owns the file writer's [`WorkerGuard`]; keep it alive for the
    /// lifetime of the process so buffered lines are flushed.
    ///
    /// # Errors
    /// * [`LoggerError::InvalidConfiguration`] for an empty name, `max_files == 0`, an invalid
    ///   filter, or when neither console nor file output is enabled.
    /// * [`LoggerError::Io`] if the log directory cannot be created.
    /// * [`LoggerError::Appender`] if the rolling appender cannot be built.
    /// * [`LoggerError::Subscriber`] if a global subscriber is already installed.
    pub fn init(self) -> Result<Logger, LoggerError> {
        let LoggerBuilder { config, name: WithName(name) } = self;
        validate_config(&config, &name)?;

        let env_filter = build_env_filter(&config)?;
        let mut layers = Vec::new();

        if config.console {
            let console = layer().with_ansi(true);
            layers.push(if config.json { console.json().boxed() } else { console.compact().boxed() });
        }

        let guard = if let Some(directory) = &config.directory {
            fs::create_dir_all(directory)
                .context(format!("Creating {}", directory.display()))?;

            let appender = RollingFileAppender::builder()
                .rotation(config.rotation.clone())
                .filename_prefix(&name)
                .filename_suffix(LOG_FILE_SUFFIX)
                .max_log_files(config.max_files)
                .build(directory)?;

            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file = layer().with_writer(writer).with_ansi(false);
            layers.push(if config.json { file.json().boxed() } else { file.boxed() });
            Some(guard)
        } else {
            None
        };

        tracing_subscriber::registry().with(env_filter).with(layers).try_init()?;

        Ok(Logger { guard })
    }
}

/// Handle to the installed subscriber. Drop it only at shutdown.
#[must_use = "Dropping this handle will stop background logging threads."]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder { config: LoggerConfig::default(), name: NoName }
    }

    /// `true` when file output is active.
    #[must_use]
    pub const fn writes_files(&self) -> bool {
        self.guard.is_some()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::info!("Logging system shutting down, flushing buffers...");
        }
    }
}

/// Parses a level name such as `info` or `DEBUG`.
///
/// # Errors
/// Returns [`LoggerError::InvalidConfiguration`] for unknown level names.
pub fn parse_level(level: &str) -> Result<LevelFilter, LoggerError> {
    LevelFilter::from_str(level.trim()).map_err(|e| LoggerError::InvalidConfiguration {
        message: format!("Invalid log level '{level}': {e}").into(),
        context: None,
    })
}

fn validate_config(config: &LoggerConfig, name: &str) -> Result<(), LoggerError> {
    let invalid = |message: &'static str| LoggerError::InvalidConfiguration {
        message: message.into(),
        context: None,
    };

    if name.trim().is_empty() {
        return Err(invalid("Logger name cannot be empty"));
    }
    if config.max_files == 0 {
        return Err(invalid("max_files must be greater than zero"));
    }
    if !config.console && config.directory.is_none() {
        return Err(invalid("No logging output enabled; enable console or set a directory"));
    }

    Ok(())
}

fn build_env_filter(config: &LoggerConfig) -> Result<EnvFilter, LoggerError> {
    let builder = EnvFilter::builder().with_default_directive(config.level.into());
    config.filter.as_ref().map_or_else(
        || Ok(builder.from_env_lossy()),
        |filter| {
            builder.parse(filter).map_err(|e| LoggerError::InvalidConfiguration {
                message: format!("Invalid filter '{filter}': {e}").into(),
                context: None,
            })
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::time::Duration;
    use tempfile::tempdir;

    #[test]
    fn builder_starts_with_console_defaults() {
        let builder = Logger::builder().name("ohub-test").filter("ohub_orders=debug");
        assert!(builder.config.console);
        assert!(!builder.config.json);
        assert_eq!(builder.config.level, LevelFilter::INFO);
        assert_eq!(builder.config.max_files, DEFAULT_MAX_FILES);
        assert_eq!(builder.config.filter.as_deref(), Some("ohub_orders=debug"));
        assert!(builder.config.directory.is_none());
    }

    #[test]
    fn config_replaces_all_settings() {
        let config = LoggerConfig {
            console: false,
            directory: Some("logs".into()),
            level: LevelFilter::WARN,
            max_files: 3,
            json: true,
            ..LoggerConfig::default()
        };
        let builder = Logger::builder().config(config).name("ohub-test");
        assert!(!builder.config.console);
        assert!(builder.config.json);
        assert_eq!(builder.config.level, LevelFilter::WARN);
        assert_eq!(builder.config.max_files, 3);
    }

    #[test]
    fn parse_level_accepts_any_case() {
        assert_eq!(parse_level("debug").unwrap(), LevelFilter::DEBUG);
        assert_eq!(parse_level(" WARN ").unwrap(), LevelFilter::WARN);
        assert!(matches!(parse_level("loud"), Err(LoggerError::InvalidConfiguration { .. })));
    }

    #[test]
    fn rejects_invalid_settings_before_installing() {
        let err = Logger::builder().name("  ").init().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));

        let err = Logger::builder().name("ohub-test").max_files(0).init().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));

        let err = Logger::builder().name("ohub-test").console(false).init().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));

        let err = Logger::builder().name("ohub-test").filter("ohub_orders=loud").init().unwrap_err();
        assert!(err.to_string().contains("Invalid filter"));
    }

    #[test]
    #[serial]
    fn file_output_creates_directory_and_file() -> Result<(), Box<dyn std::error::Error>> {
        let tmp_dir = tempdir()?;
        let log_dir = tmp_dir.path().join("logs");

        let logger = Logger::builder().name("ohub-test").console(false).directory(&log_dir).init()?;
        assert!(logger.writes_files());

        tracing::info!("hello world");
        std::thread::sleep(Duration::from_millis(20));
        drop(logger);

        let has_log = fs::read_dir(&log_dir)?
            .flatten()
            .any(|entry| entry.path().extension().and_then(|e| e.to_str()) == Some(LOG_FILE_SUFFIX));
        assert!(has_log, "at least one log file should be created");
        Ok(())
    }
}
