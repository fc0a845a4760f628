//! # Pulse CLI
//!
//! Command-line interface for Pulse schema migrations.
//!
//! ## Usage
//!
//! ```bash
//! pulse migrate              # Apply pending migrations
//! pulse migrate --dry-run    # Show what would be applied, including key renames
//! pulse migrate --rollback   # Revert the last migration
//! pulse plan                 # Show the data field key renames
//! pulse --help               # Show help
//! ```

mod commands;
mod config;

use clap::{CommandFactory as _, Parser};
use commands::Commands;
use error::Result;
use tracing::Instrument as _;

/// Pulse - schema migration tooling for data fields and rooms
#[derive(Parser, Debug)]
#[command(name = "pulse")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (debug, info, warn, error)
    #[arg(short = 'L', long, env = "RUST_LOG", default_value = "info")]
    log_level: String,

    /// Output format (json, pretty, compact)
    #[arg(short, long, env = "PULSE_LOG_FORMAT", default_value = "compact")]
    log_format: String,

    /// Also write JSON logs to this file, rotated daily
    #[arg(long, env = "PULSE_LOG_FILE")]
    log_file: Option<String>,

    /// Correlation id for this run's log lines; generated when absent
    #[arg(long, env = "PULSE_RUN_ID")]
    run_id: Option<logging::RunId>,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let guard = match logging::init(&cli.log_level, &cli.log_format, cli.log_file.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            std::process::exit(1);
        },
    };

    let run_id = cli.run_id.clone().unwrap_or_default();
    let span = tracing::info_span!("run", run_id = %run_id);

    let result = run(cli).instrument(span).await;

    if let Err(err) = result {
        logging::error!(target: "app", code = err.code(), run_id = %run_id, "{}", err);
        drop(guard);
        std::process::exit(err.exit_code());
    }
}

async fn run(cli: Cli) -> Result<()> {
    logging::info!(target: "app", command = ?cli.command, "Pulse CLI starting...");

    match cli.command {
        Commands::Migrate(args) => commands::migrate::migrate(&args).await?,
        Commands::Plan => commands::plan::plan().await?,
        Commands::Completions(args) => {
            commands::completions::completions(args.shell, &mut Cli::command(), &mut std::io::stdout())?;
        },
        Commands::Validate(args) => commands::validate::validate(&args).await?,
    }

    logging::info!(target: "app", "Pulse CLI completed successfully");
    Ok(())
}
