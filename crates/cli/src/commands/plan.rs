//! # CLI Plan Command
//!
//! Prints the key renames the room-assignment migration would perform,
//! without writing anything.

use error::Result;
use migration::{MigratorTrait as _, conflicts::ResolveReport};
use sea_orm::DatabaseConnection;
use tracing::info;

use crate::config;

/// Where the room-assignment migration stands on a database.
#[derive(Debug)]
pub enum PlanState {
    /// Baseline tables are not there yet, so there is no data to rename.
    BaselinePending,
    /// The migration has already been applied.
    AlreadyApplied,
    /// The migration is next; these are the renames it would make.
    Pending(ResolveReport),
}

/// Works out what the room-assignment migration would do on `db`.
///
/// # Errors
///
/// Returns an error if the migration table or the data fields cannot be read.
pub async fn plan_state(db: &DatabaseConnection) -> Result<PlanState> {
    let target = migration::data_field_rooms_migration_name();
    let pending = migration::Migrator::get_pending_migrations(db).await?;

    if !pending.iter().any(|m| m.name() == target) {
        return Ok(PlanState::AlreadyApplied);
    }
    if pending.iter().any(|m| m.name() != target) {
        return Ok(PlanState::BaselinePending);
    }

    let report = migration::conflicts::preview(db).await?;
    Ok(PlanState::Pending(report))
}

/// Human-readable lines for a plan, one per rename.
pub fn render(state: &PlanState) -> Vec<String> {
    match state {
        PlanState::BaselinePending => vec!["Baseline migrations are pending; no data fields to rename".to_string()],
        PlanState::AlreadyApplied => vec!["Room assignments are already migrated; nothing to plan".to_string()],
        PlanState::Pending(report) if report.renames.is_empty() => {
            vec![format!(
                "Scanned {} data fields; no key conflicts",
                report.scanned
            )]
        },
        PlanState::Pending(report) => {
            let mut lines = vec![format!(
                "Scanned {} data fields; {} would be renamed:",
                report.scanned,
                report.renames.len()
            )];
            lines.extend(report.renames.iter().map(|rename| {
                format!(
                    "  {} [org {}] {} -> {} | {} -> {}",
                    rename.id,
                    rename.org_id,
                    rename.old_variable_name,
                    rename.new_variable_name,
                    rename.old_name,
                    rename.new_name
                )
            }));
            lines
        },
    }
}

/// Runs the plan command
pub async fn plan() -> Result<()> {
    let db = config::from_env()?.connect().await?;
    let state = plan_state(&db).await?;

    if let PlanState::Pending(report) = &state {
        info!(target: "migrate", scanned = report.scanned, renames = report.renames.len(), "Conflict plan computed");
    }
    for line in render(&state) {
        println!("{}", line);
    }
    Ok(())
}
