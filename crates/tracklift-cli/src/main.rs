//! Tracklift CLI - move GitLab issues into Gogs.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tracklift_migrate::error::EXIT_FAILURE;
use tracklift_migrate::MigrationError;

mod commands;
mod select;

/// Tracklift - migrate GitLab milestones, issues, labels and comments to Gogs
#[derive(Parser, Debug)]
#[command(name = "tracklift")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the JSON configuration file
    #[arg(short, long, default_value = "config.json", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Simulate, confirm, then migrate a project
    Migrate {
        /// GitLab project ID (prompted for when omitted)
        #[arg(short, long)]
        source: Option<u64>,
        /// Gogs repository ID (prompted for when omitted)
        #[arg(short, long)]
        destination: Option<u64>,
        /// Stop after the simulated pass
        #[arg(long)]
        simulate_only: bool,
    },

    /// List projects and repositories visible to the configured tokens
    List,

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("tracklift={log_level},tracklift_migrate={log_level}").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let result = match cli.command {
        Commands::Migrate {
            source,
            destination,
            simulate_only,
        } => {
            commands::migrate(commands::MigrateOptions {
                config: &cli.config,
                source,
                destination,
                simulate_only,
            })
            .await
        }
        Commands::List => commands::list(&cli.config).await,
        Commands::Version => {
            println!("tracklift {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            let code = e
                .downcast_ref::<MigrationError>()
                .map_or(EXIT_FAILURE, MigrationError::exit_code);
            ExitCode::from(code)
        }
    }
}
