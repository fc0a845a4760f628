//! # CLI Migration Command
//!
//! Database migration handling for the Pulse CLI.

use error::{Result, ResultExt as _};
use migration::MigratorTrait as _;
use tracing::info;

use crate::{
    commands::{
        MigrateArgs,
        plan::{self, PlanState},
    },
    config,
};

/// Runs database migrations
///
/// # Arguments
///
/// * `args` - Migrate command arguments
///
/// # Returns
///
/// A `Result` indicating success or failure.
pub async fn migrate(args: &MigrateArgs) -> Result<()> {
    info!(
        target: "migrate",
        dry_run = %args.dry_run,
        rollback = %args.rollback,
        "Running database migrations..."
    );

    let config = config::from_env()?;
    let db = config.connect().await?;

    if args.dry_run {
        let pending = migration::Migrator::get_pending_migrations(&db).await?;

        info!(
            target: "migrate",
            pending_count = %pending.len(),
            "Pending migrations found"
        );

        for m in &pending {
            info!(target: "migrate", migration = %m.name(), "Would apply");
        }

        let state = plan::plan_state(&db).await?;
        if matches!(state, PlanState::Pending(_)) {
            for line in plan::render(&state) {
                println!("{}", line);
            }
        }

        return Ok(());
    }

    if args.rollback {
        info!(target: "migrate", "Rolling back the last migration...");

        migration::Migrator::down(&db, Some(1))
            .await
            .context("Failed to rollback migration")
            .log_error()?;

        info!(target: "migrate", "Rollback completed successfully");
        return Ok(());
    }

    logging::measure_duration!("migrate", "apply pending migrations", {
        migration::Migrator::up(&db, None)
            .await
            .context("Failed to run migrations")
            .log_error()
    })?;

    info!(target: "migrate", "Migrations completed successfully");
    Ok(())
}
