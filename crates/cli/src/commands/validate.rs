//! # CLI Validate Command
//!
//! Configuration validation for the Pulse CLI.

use error::Result;
use migration::MigratorTrait as _;
use tracing::info;

use crate::{commands::ValidateArgs, config};

/// Validates the CLI configuration
///
/// Every `PULSE_DATABASE_*` variable that is set must parse. With
/// `--connect` the database must also be reachable.
///
/// # Returns
///
/// A `Result` indicating success or failure.
pub async fn validate(args: &ValidateArgs) -> Result<()> {
    let config = config::from_env()?;

    info!(
        target: "validate",
        host = %config.host,
        port = %config.port,
        database = %config.database,
        ssl_mode = %config.ssl_mode.as_str(),
        "Configuration is valid"
    );

    if args.connect {
        let db = config.connect().await?;
        let pending = migration::Migrator::get_pending_migrations(&db).await?;
        info!(target: "validate", pending = pending.len(), "Database is reachable");
    }

    Ok(())
}
