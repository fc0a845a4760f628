//! # Logging Configuration
//!
//! Configuration for the logging subsystem.
//! Supports environment variables and programmatic configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{Registry, filter::LevelFilter, fmt, prelude::*};

/// Boxed subscriber produced by [`LoggingConfig::build`].
pub type BoxedSubscriber = Box<dyn tracing::Subscriber + Send + Sync>;

/// Logging configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_level")]
    pub level: String,

    /// Output format (json, pretty, compact)
    #[serde(default = "default_format")]
    pub format: String,

    /// Optional log file path, rotated daily
    #[serde(default)]
    pub log_file: Option<String>,

    /// Environment (development, testing, production)
    #[serde(default = "default_environment")]
    pub environment: String,
}

fn default_level() -> String { "info".to_string() }

fn default_format() -> String { "compact".to_string() }

fn default_environment() -> String { "development".to_string() }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level:       default_level(),
            format:      default_format(),
            log_file:    None,
            environment: default_environment(),
        }
    }
}

impl LoggingConfig {
    /// Create configuration from environment variables, falling back to the given values.
    pub fn from_env(level: &str, format: &str, log_file: Option<&str>) -> Self {
        Self {
            level:       std::env::var("RUST_LOG").unwrap_or_else(|_| level.to_string()),
            format:      std::env::var("PULSE_LOG_FORMAT").unwrap_or_else(|_| format.to_string()),
            log_file:    std::env::var("PULSE_LOG_FILE")
                .ok()
                .or(log_file.map(|s| s.to_string())),
            environment: std::env::var("PULSE_ENV").unwrap_or_else(|_| default_environment()),
        }
    }

    /// Parsed level filter, `INFO` when the level string is not recognised.
    pub fn level_filter(&self) -> LevelFilter { self.level.parse().unwrap_or(LevelFilter::INFO) }

    /// Build the tracing subscriber from this configuration.
    ///
    /// The returned guard flushes the file writer on drop and must be held for
    /// as long as the subscriber is in use.
    pub fn build(&self) -> (BoxedSubscriber, Option<WorkerGuard>) {
        let level = self.level_filter();

        match self.format.as_str() {
            "pretty" => (self.build_pretty_subscriber(level), None),
            "compact" => (self.build_compact_subscriber(level), None),
            _ => self.build_json_subscriber(level),
        }
    }

    /// Build a JSON subscriber, teeing into a rolling file when configured.
    fn build_json_subscriber(&self, level: LevelFilter) -> (BoxedSubscriber, Option<WorkerGuard>) {
        let stdout_layer = fmt::layer()
            .json()
            .with_timer(fmt::time::UtcTime::rfc_3339());

        match self.log_file.as_deref() {
            Some(log_file) => {
                let path = Path::new(log_file);
                let directory = path.parent().unwrap_or_else(|| Path::new("."));
                let file_name = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "pulse.log".to_string());

                let file_appender = tracing_appender::rolling::daily(directory, file_name);
                let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
                let file_layer = fmt::layer().json().with_writer(non_blocking);
                let subscriber = Registry::default()
                    .with(level)
                    .with(stdout_layer)
                    .with(file_layer);
                (Box::new(subscriber), Some(guard))
            },
            None => (Box::new(Registry::default().with(level).with(stdout_layer)), None),
        }
    }

    /// Build a pretty subscriber for interactive use.
    fn build_pretty_subscriber(&self, level: LevelFilter) -> BoxedSubscriber {
        let layer = fmt::layer()
            .pretty()
            .with_timer(fmt::time::UtcTime::rfc_3339());
        Box::new(Registry::default().with(level).with(layer))
    }

    /// Build a compact subscriber for CI and tests.
    fn build_compact_subscriber(&self, level: LevelFilter) -> BoxedSubscriber {
        let layer = fmt::layer()
            .compact()
            .with_timer(fmt::time::UtcTime::rfc_3339());
        Box::new(Registry::default().with(level).with(layer))
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    #[test]
    #[serial]
    fn test_config_fallbacks() {
        let config = LoggingConfig::from_env("info", "json", None);
        assert_eq!(config.level, "info");
        assert_eq!(config.format, "json");
        assert_eq!(config.environment, "development");
    }

    #[test]
    #[serial]
    fn test_config_from_env() {
        // Safe in test context: serialised with the other env-reading tests
        unsafe {
            std::env::set_var("RUST_LOG", "debug");
            std::env::set_var("PULSE_LOG_FORMAT", "pretty");
        }

        let config = LoggingConfig::from_env("info", "json", None);
        assert_eq!(config.level, "debug");
        assert_eq!(config.format, "pretty");

        unsafe {
            std::env::remove_var("RUST_LOG");
            std::env::remove_var("PULSE_LOG_FORMAT");
        }
    }

    #[test]
    fn test_level_filter_fallback() {
        let config = LoggingConfig {
            level: "loud".to_string(),
            ..Default::default()
        };
        assert_eq!(config.level_filter(), LevelFilter::INFO);

        let config = LoggingConfig {
            level: "warn".to_string(),
            ..Default::default()
        };
        assert_eq!(config.level_filter(), LevelFilter::WARN);
    }

    #[test]
    fn test_build_json_subscriber() {
        let config = LoggingConfig {
            format: "json".to_string(),
            ..Default::default()
        };
        let (_subscriber, guard) = config.build();
        assert!(guard.is_none());
    }

    #[test]
    fn test_build_pretty_subscriber() {
        let config = LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
            ..Default::default()
        };
        let (_subscriber, guard) = config.build();
        assert!(guard.is_none());
    }
}
