//! Subcommand handlers. Called from `main` once configuration and logging
//! are in place.

use anyhow::Context;
use chrono::Utc;

use followscope_core::AppConfig;
use followscope_github::{GitHubClient, GitHubSettings};
use followscope_pipeline::{recompute_stats, run_once, RunOptions, RunReport};
use followscope_store::FileStore;

/// Performs one monitoring run and prints a summary line followed by the
/// refreshed stats as JSON.
///
/// # Errors
///
/// Returns an error if the GitHub client cannot be built, the profile or
/// follower fetch fails, or an artifact cannot be written.
pub(crate) async fn run(
    config: &AppConfig,
    dry_run: bool,
    history_limit: Option<usize>,
) -> anyhow::Result<()> {
    let client = GitHubClient::new(&GitHubSettings::from_app_config(config))
        .context("failed to build GitHub client")?;
    let store = FileStore::new(&config.data_dir);
    let options = RunOptions {
        history_limit: history_limit.unwrap_or(config.history_limit),
        dry_run,
    };

    let report = run_once(&client, &store, &options, Utc::now()).await?;

    println!("{}", summary_line(&report, dry_run));
    println!("{}", serde_json::to_string_pretty(&report.stats)?);
    Ok(())
}

/// Re-aggregates stats from the stored history and prints them as JSON.
///
/// # Errors
///
/// Returns an error if there is no usable stored history or the stats file
/// cannot be written.
pub(crate) fn stats(config: &AppConfig, write: bool) -> anyhow::Result<()> {
    let store = FileStore::new(&config.data_dir);
    let stats = recompute_stats(&store, Utc::now(), write)
        .with_context(|| format!("no stats for {}", config.data_dir.display()))?;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

pub(crate) fn summary_line(report: &RunReport, dry_run: bool) -> String {
    let prefix = if dry_run { "dry-run: " } else { "" };
    let traffic = if report.traffic_available {
        "recorded"
    } else {
        "unavailable"
    };
    format!(
        "{prefix}{} followers at {} (+{} new, -{} unfollowed), traffic {traffic}",
        report.follower_count,
        report.timestamp.to_rfc3339(),
        report.new_followers,
        report.unfollowers,
    )
}
