//! github.issue_comment — The PR comment the action keeps in sync.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A comment as returned by the GitHub issues API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueComment {
    pub id: u64,
    #[serde(default)]
    pub body: Option<String>,
    pub html_url: String,
}

impl IssueComment {
    pub fn body_contains(&self, needle: &str) -> bool {
        self.body.as_deref().is_some_and(|b| b.contains(needle))
    }
}

/// Repository and issue (or pull request) the run belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRef {
    pub owner: String,
    pub repo: String,
    pub number: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentOperation {
    Created,
    Updated,
    Noop,
    Deleted,
}

impl fmt::Display for CommentOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Noop => "noop",
            Self::Deleted => "deleted",
        };
        f.write_str(s)
    }
}

/// Outcome of comment reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryComment {
    pub url: Option<String>,
    pub operation: CommentOperation,
}
