mod commands;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Exit status for a missing or invalid configuration. The run never starts.
const EXIT_CONFIG: u8 = 2;

#[derive(Debug, Parser)]
#[command(name = "followscope")]
#[command(about = "Track followers of a GitHub account over time", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch the current followers, record a snapshot and refresh stats.
    Run {
        /// Compute everything and print the result without writing any file.
        #[arg(long)]
        dry_run: bool,
        /// Override the number of snapshots kept in history.
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        history_limit: Option<u64>,
    },
    /// Recompute stats from the stored history without contacting GitHub.
    /// GITHUB_USERNAME and GITHUB_TOKEN must still be set, since the whole
    /// configuration is validated before any command runs.
    Stats {
        /// Overwrite the stored stats file with the recomputed values.
        #[arg(long)]
        write: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match followscope_core::load_app_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: configuration: {e}");
            return ExitCode::from(EXIT_CONFIG);
        }
    };
    if let Err(e) = init_tracing(&config.log_level) {
        eprintln!("error: configuration: invalid log filter: {e}");
        return ExitCode::from(EXIT_CONFIG);
    }

    let result = match cli.command {
        Commands::Run {
            dry_run,
            history_limit,
        } => {
            let history_limit = history_limit.map(|n| usize::try_from(n).unwrap_or(usize::MAX));
            commands::run(&config, dry_run, history_limit).await
        }
        Commands::Stats { write } => commands::stats(&config, write),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "followscope failed");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so stdout carries only the command's output.
fn init_tracing(log_level: &str) -> Result<(), tracing_subscriber::filter::ParseError> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}
