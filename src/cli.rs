//! Command line arguments.
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

/// Publish yesterday's merged pull requests as a dated release.
///
/// Reads GITHUB_REPOSITORY (required), GITHUB_TOKEN (required to publish),
/// GITHUB_API_URL and GITHUB_SERVER_URL from the environment.
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(long, default_value = ".")]
    /// Root of the local git working copy.
    pub repo_path: PathBuf,

    #[arg(long, value_name = "YYYY-MM-DD")]
    /// Merge date to release. Defaults to yesterday.
    pub date: Option<NaiveDate>,

    #[arg(long)]
    /// Branch to push. Defaults to the checked out branch.
    pub branch: Option<String>,

    #[arg(long, default_value_t = false)]
    /// Render the release notes and stop before touching files or remotes.
    pub dry_run: bool,

    #[arg(long, default_value_t = false)]
    /// Enable debug logging.
    pub debug: bool,
}
