//! # Logging Macros
//!
//! Convenience macros for structured logging of schema migrations.
//! Every macro logs under a fixed target so operators can filter a run with
//! `RUST_LOG=migrate=debug`.

/// Log the start or end of a numbered migration step.
///
/// # Example
///
/// ```rust
/// use logging::log_migration_step;
///
/// log_migration_step!("data_field_rooms_m2m", 2, "create junction table");
/// ```
#[macro_export]
macro_rules! log_migration_step {
    ($migration:expr, $step:expr, $description:expr) => {
        tracing::info!(
            target: "migrate",
            migration = %$migration,
            step = $step,
            "{}",
            $description
        )
    };
    ($migration:expr, $step:expr, $description:expr, $($k:ident = $v:expr),+ $(,)?) => {
        tracing::info!(
            target: "migrate",
            migration = %$migration,
            step = $step,
            $($k = $v),+,
            "{}",
            $description
        )
    };
}

/// Log a data field key rename performed by the conflict resolver.
#[macro_export]
macro_rules! log_key_rename {
    ($field_id:expr, $from:expr, $to:expr) => {
        tracing::info!(
            target: "migrate",
            field_id = %$field_id,
            from = %$from,
            to = %$to,
            "Renamed conflicting data field key"
        )
    };
}

/// Log a row that the migration skipped instead of aborting on.
#[macro_export]
macro_rules! log_migration_anomaly {
    ($kind:expr, $($arg:tt)*) => {
        tracing::warn!(target: "migrate", anomaly = %$kind, $($arg)*)
    };
}

/// Log a database query with duration and table name.
#[macro_export]
macro_rules! log_db_query {
    ($query:expr, $table:expr, $duration:expr) => {
        tracing::debug!(
            target: "database",
            query = %$query,
            table = %$table,
            duration_ms = %$duration,
            "Database query"
        )
    };
}

/// Measure and log the duration of a block of code.
///
/// # Example
///
/// ```rust
/// use logging::measure_duration;
///
/// let total: u32 = measure_duration!("migrate", "backfill", { (1 ..= 3).sum() });
/// assert_eq!(total, 6);
/// ```
#[macro_export]
macro_rules! measure_duration {
    ($target:expr, $context:expr, $block:block) => {{
        let start = std::time::Instant::now();
        let result = $block;
        let duration = start.elapsed();
        tracing::debug!(
            target: $target,
            context = %$context,
            duration_ms = duration.as_secs_f64() * 1000.0,
            "Operation completed"
        );
        result
    }};
}
