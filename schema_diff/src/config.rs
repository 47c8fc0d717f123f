//! Action configuration — inputs from the workflow, validated into an [`ActionConfig`].

use std::sync::LazyLock;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use regex::Regex;
use thiserror::Error;

use crate::models::branch::{BranchComparisonInput, BranchSelector, PointInTime};
use crate::models::comment::IssueRef;
use crate::Cli;

static URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)https?://[^\s/$.?#].[^\s]*").unwrap());
static LSN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-fA-F0-9]{1,8}/[a-fA-F0-9]{1,8}$").unwrap());
static HAIKU_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]+-[a-z]+-[a-z0-9]+$").unwrap());

const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("API host must be a valid URL")]
    InvalidApiHost,
    #[error("Database name cannot be empty")]
    EmptyDatabase,
    #[error("Database username/role cannot be empty")]
    EmptyUsername,
    #[error("Invalid timestamp")]
    InvalidTimestamp,
    #[error("Invalid LSN")]
    InvalidLsn,
    #[error("Invalid compare branch input")]
    InvalidCompareBranch,
    #[error("Input required and not supplied: {0}")]
    MissingInput(&'static str),
    #[error("Workflow context unavailable: {0}")]
    Context(String),
}

#[derive(Clone, Debug)]
pub struct ActionConfig {
    /// Token used for the PR comment calls.
    pub github_token: String,
    pub project_id: String,
    pub branches: BranchComparisonInput,
    /// Neon API key.
    pub api_key: String,
    pub api_host: String,
    pub database: String,
    /// Role the schema dump runs as.
    pub username: String,
    pub point_in_time: Option<PointInTime>,
}

fn trimmed(value: &str) -> &str {
    value.trim()
}

fn required(value: &str, name: &'static str) -> Result<String, ConfigError> {
    let value = trimmed(value);
    if value.is_empty() {
        return Err(ConfigError::MissingInput(name));
    }
    Ok(value.to_string())
}

fn optional(value: Option<&str>) -> Option<&str> {
    value.map(trimmed).filter(|v| !v.is_empty())
}

impl ActionConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let github_token = required(&cli.github_token, "github-token")?;
        let project_id = required(&cli.project_id, "project_id")?;
        let api_key = required(&cli.api_key, "api_key")?;

        let api_host = trimmed(&cli.api_host).to_string();
        if !URL_REGEX.is_match(&api_host) {
            return Err(ConfigError::InvalidApiHost);
        }

        let database = trimmed(&cli.database).to_string();
        if database.is_empty() {
            return Err(ConfigError::EmptyDatabase);
        }

        let username = trimmed(&cli.username).to_string();
        if username.is_empty() {
            return Err(ConfigError::EmptyUsername);
        }

        let point_in_time =
            parse_point_in_time(cli.timestamp.as_deref(), cli.lsn.as_deref())?;
        let branches = parse_branch_input(&cli.compare_branch, cli.base_branch.as_deref())?;

        Ok(Self {
            github_token,
            project_id,
            branches,
            api_key,
            api_host,
            database,
            username,
            point_in_time,
        })
    }
}

/// Timestamp takes precedence over LSN when both are set.
pub fn parse_point_in_time(
    timestamp: Option<&str>,
    lsn: Option<&str>,
) -> Result<Option<PointInTime>, ConfigError> {
    if let Some(timestamp) = optional(timestamp) {
        return parse_timestamp(timestamp).map(|ts| Some(PointInTime::Timestamp(ts)));
    }
    if let Some(lsn) = optional(lsn) {
        if !LSN_REGEX.is_match(lsn) {
            return Err(ConfigError::InvalidLsn);
        }
        return Ok(Some(PointInTime::Lsn(lsn.to_string())));
    }
    Ok(None)
}

/// Offset-less date-times, read as local time.
const LOCAL_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

fn parse_local(raw: &str) -> Option<DateTime<Utc>> {
    let naive = LOCAL_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Normalise to UTC with millisecond precision, e.g. `2023-10-14T12:30:00.000Z`.
///
/// Accepts RFC 3339, a local date-time without offset, or a bare date (midnight UTC).
fn parse_timestamp(raw: &str) -> Result<String, ConfigError> {
    let parsed = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| parse_local(raw))
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc())
        })
        .ok_or(ConfigError::InvalidTimestamp)?;

    Ok(parsed.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Branch ids look like `br-<adjective>-<noun>-<suffix>`.
fn is_branch_id(value: &str) -> bool {
    value
        .strip_prefix("br-")
        .is_some_and(|rest| HAIKU_REGEX.is_match(rest))
}

fn parse_selector(value: &str) -> Option<BranchSelector> {
    let value = trimmed(value);
    if value.is_empty() {
        return None;
    }
    if is_branch_id(value) {
        Some(BranchSelector::id(value))
    } else {
        Some(BranchSelector::name(value))
    }
}

pub fn parse_branch_input(
    compare: &str,
    base: Option<&str>,
) -> Result<BranchComparisonInput, ConfigError> {
    let compare = parse_selector(compare).ok_or(ConfigError::InvalidCompareBranch)?;
    let base = base.and_then(parse_selector);
    Ok(BranchComparisonInput { compare, base })
}

/// Where the run's comments live, from the runner's `GITHUB_*` environment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GitHubContext {
    pub api_url: String,
    pub issue: IssueRef,
}

impl GitHubContext {
    pub fn from_env() -> Result<Self, ConfigError> {
        let repository = std::env::var("GITHUB_REPOSITORY")
            .map_err(|_| ConfigError::Context("GITHUB_REPOSITORY is not set".into()))?;
        let event_path = std::env::var("GITHUB_EVENT_PATH")
            .map_err(|_| ConfigError::Context("GITHUB_EVENT_PATH is not set".into()))?;
        let api_url = std::env::var("GITHUB_API_URL")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_string());

        let raw = std::fs::read_to_string(&event_path).map_err(|e| {
            ConfigError::Context(format!("cannot read event payload {event_path}: {e}"))
        })?;
        let event: serde_json::Value = serde_json::from_str(&raw)
            .map_err(|e| ConfigError::Context(format!("invalid event payload: {e}")))?;

        Self::from_parts(api_url, &repository, &event)
    }

    pub fn from_parts(
        api_url: String,
        repository: &str,
        event: &serde_json::Value,
    ) -> Result<Self, ConfigError> {
        let (owner, repo) = repository
            .split_once('/')
            .filter(|(o, r)| !o.is_empty() && !r.is_empty())
            .ok_or_else(|| {
                ConfigError::Context(format!("GITHUB_REPOSITORY is not owner/repo: {repository}"))
            })?;

        let number = event["issue"]["number"]
            .as_u64()
            .or_else(|| event["pull_request"]["number"].as_u64())
            .or_else(|| event["number"].as_u64())
            .ok_or_else(|| {
                ConfigError::Context(
                    "no pull request or issue number in the workflow event".into(),
                )
            })?;

        Ok(Self {
            api_url,
            issue: IssueRef {
                owner: owner.to_string(),
                repo: repo.to_string(),
                number,
            },
        })
    }
}
