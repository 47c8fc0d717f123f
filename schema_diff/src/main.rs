//! Neon Schema Diff — GitHub Action.
//!
//! Compares the SQL schema of two Neon branches and keeps a single summary
//! comment on the pull request in sync with the result.
//!
//! Inputs come from the runner as `INPUT_*` environment variables (or flags
//! when run locally); outputs `diff` and `comment_url` go to `GITHUB_OUTPUT`.

mod action;
mod config;
mod error;
mod models;
mod outputs;
mod services;

#[cfg(test)]
mod testing;

use std::process::ExitCode;

use clap::Parser;

use crate::config::{ActionConfig, GitHubContext};
use crate::outputs::GitHubOutputFile;
use crate::services::github_service::GitHubClient;
use crate::services::neon_service::NeonClient;

#[derive(Parser, Debug)]
#[command(name = "schema-diff", version, about = "Neon branch schema diff for pull requests")]
pub struct Cli {
    /// Token used to manage the pull request comment
    #[arg(long = "github-token", env = "INPUT_GITHUB-TOKEN", hide_env_values = true)]
    pub github_token: String,

    /// Neon project id
    #[arg(long = "project-id", env = "INPUT_PROJECT_ID")]
    pub project_id: String,

    /// Branch to compare, by id or name
    #[arg(long = "compare-branch", env = "INPUT_COMPARE_BRANCH")]
    pub compare_branch: String,

    /// Branch to compare against; defaults to the compare branch's parent
    #[arg(long = "base-branch", env = "INPUT_BASE_BRANCH")]
    pub base_branch: Option<String>,

    /// Neon API key
    #[arg(long = "api-key", env = "INPUT_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Neon API base URL
    #[arg(
        long = "api-host",
        env = "INPUT_API_HOST",
        default_value = "https://console.neon.tech/api/v2"
    )]
    pub api_host: String,

    /// Database to diff
    #[arg(long, env = "INPUT_DATABASE", default_value = "neondb")]
    pub database: String,

    /// Role the schema is read as
    #[arg(long, env = "INPUT_USERNAME", default_value = "neondb_owner")]
    pub username: String,

    /// Read the compare branch as of this timestamp (ISO-8601)
    #[arg(long, env = "INPUT_TIMESTAMP")]
    pub timestamp: Option<String>,

    /// Read the compare branch as of this LSN
    #[arg(long, env = "INPUT_LSN")]
    pub lsn: Option<String>,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());

    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    if log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

async fn execute(cli: Cli) -> anyhow::Result<()> {
    let config = ActionConfig::from_cli(&cli)?;
    let context = GitHubContext::from_env()?;

    tracing::info!(
        project_id = %config.project_id,
        compare = %config.branches.compare.value,
        compare_kind = ?config.branches.compare.kind,
        base = ?config.branches.base.as_ref().map(|b| &b.value),
        database = %config.database,
        "Starting schema diff"
    );

    let neon = NeonClient::new(&config.api_host, &config.api_key)?;
    let github = GitHubClient::new(&context.api_url, &config.github_token)?;
    let mut outputs = GitHubOutputFile::from_env();

    let outcome = action::run(&config, &context.issue, &neon, &github, &mut outputs).await?;
    tracing::debug!(
        operation = %outcome.comment.operation,
        hash = %outcome.diff.hash,
        "Schema diff finished"
    );
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match execute(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Schema diff failed: {e:#}");
            outputs::report_failure(&e.to_string());
            ExitCode::FAILURE
        }
    }
}
