//! A single action run: diff the branches, render the summary, reconcile the PR comment.

use crate::config::ActionConfig;
use crate::error::SchemaDiffResult;
use crate::models::comment::{CommentOperation, IssueRef, SummaryComment};
use crate::models::diff::BranchDiff;
use crate::outputs::ActionOutputs;
use crate::services::comment_service::upsert_comment;
use crate::services::diff_service::diff;
use crate::services::github_service::CommentApi;
use crate::services::neon_service::BranchApi;
use crate::services::summary_service::summary;

#[derive(Debug, Clone)]
pub struct ActionOutcome {
    pub diff: BranchDiff,
    pub comment: SummaryComment,
}

/// Run the action end to end. Stops at the first failure; nothing is retried.
pub async fn run(
    config: &ActionConfig,
    issue: &IssueRef,
    neon: &dyn BranchApi,
    github: &dyn CommentApi,
    outputs: &mut dyn ActionOutputs,
) -> SchemaDiffResult<ActionOutcome> {
    let branch_diff = diff(
        neon,
        &config.project_id,
        &config.branches,
        &config.username,
        &config.database,
        config.point_in_time.as_ref(),
    )
    .await?;

    let markdown = summary(&branch_diff, &config.project_id);
    outputs.set_output("diff", &branch_diff.sql)?;

    let comment = upsert_comment(github, issue, &markdown, &branch_diff.hash).await?;

    match comment.operation {
        CommentOperation::Noop => tracing::info!("No changes detected in the schema diff"),
        op => tracing::info!("Comment {op} successfully"),
    }

    let url = comment.url.as_deref().unwrap_or_default();
    outputs.set_output("comment_url", url)?;
    tracing::info!("Comment URL: {url}");

    Ok(ActionOutcome {
        diff: branch_diff,
        comment,
    })
}
