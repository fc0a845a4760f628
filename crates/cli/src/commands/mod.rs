//! # CLI Commands
//!
//! Implementation of CLI commands for the Pulse tooling.

pub mod completions;
pub mod migrate;
pub mod plan;
pub mod validate;

use clap::{Args, Subcommand};

/// Available commands for the Pulse CLI
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run database migrations
    Migrate(MigrateArgs),

    /// Show the data field renames the next migration would make
    Plan,

    /// Generate shell completions
    Completions(CompletionsArgs),

    /// Verify configuration
    Validate(ValidateArgs),
}

/// Arguments for the migrate command
#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// Show pending migrations and planned renames without applying them
    #[arg(long, conflicts_with = "rollback")]
    pub dry_run: bool,

    /// Rollback the last migration
    #[arg(long)]
    pub rollback: bool,
}

/// Arguments for the validate command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Also open a connection and report pending migrations
    #[arg(long)]
    pub connect: bool,
}

/// Arguments for the completions command
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
