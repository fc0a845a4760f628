//! # Pulse Logging Infrastructure
//!
//! Structured logging utilities for Pulse tooling.
//! Provides tracing integration with JSON output and environment-based configuration.

pub mod config;
pub mod macros;
pub mod run_id;

pub use config::LoggingConfig;
pub use run_id::RunId;
// Re-export tracing macros
pub use tracing::{debug, error, info, trace, warn};
pub use tracing_appender::non_blocking::WorkerGuard;

/// Initialize the logging system.
///
/// # Arguments
///
/// * `level` - Log level (debug, info, warn, error)
/// * `format` - Output format (json, pretty, compact)
/// * `log_file` - Optional path to log file
///
/// # Returns
///
/// The file writer guard, if a log file is configured. Keep it alive until exit.
pub fn init(
    level: &str,
    format: &str,
    log_file: Option<&str>,
) -> Result<Option<WorkerGuard>, tracing::subscriber::SetGlobalDefaultError> {
    init_with_config(LoggingConfig::from_env(level, format, log_file))
}

/// Initialize logging with a custom configuration.
pub fn init_with_config(
    config: LoggingConfig,
) -> Result<Option<WorkerGuard>, tracing::subscriber::SetGlobalDefaultError> {
    let (subscriber, guard) = config.build();
    tracing::subscriber::set_global_default(subscriber)?;
    info!(
        level = %config.level,
        format = %config.format,
        environment = %config.environment,
        "Logging initialized"
    );
    Ok(guard)
}
