//! Markdown summary posted on the pull request.

use chrono::{Local, NaiveDateTime};

use super::neon_service::branch_url;
use crate::models::branch::Branch;
use crate::models::diff::BranchDiff;

/// Marks a comment as ours.
pub const DIFF_COMMENT_IDENTIFIER: &str = "<!--- [schema diff GitHub action comment identifier] -->";

const LOGO: &str = r#"<picture><source media="(prefers-color-scheme: dark)" srcset="https://raw.githubusercontent.com/neondatabase/schema-diff-action/refs/heads/main/docs/logos/logo-dark.svg"><img alt="Neon logo" src="https://raw.githubusercontent.com/neondatabase/schema-diff-action/refs/heads/main/docs/logos/logo-light.svg" width="24" height="24"></picture>"#;

/// Hidden marker embedding the diff fingerprint.
pub fn hash_marker(hash: &str) -> String {
    format!("<!--- [diff digest: {hash}] -->")
}

fn branch_line(label: &str, branch: &Branch, project_id: &str) -> String {
    let lock = if branch.protected { "🔒" } else { "" };
    format!(
        "- {label}: {} ([{}]({})) {lock}",
        branch.name,
        branch.id,
        branch_url(project_id, &branch.id)
    )
}

/// Render the comment body for `diff`, stamped with the current local time.
///
/// Returns an empty string when there is nothing to report.
pub fn summary(diff: &BranchDiff, project_id: &str) -> String {
    render_summary(diff, project_id, Local::now().naive_local())
}

pub fn render_summary(diff: &BranchDiff, project_id: &str, updated_at: NaiveDateTime) -> String {
    if diff.sql.trim().is_empty() {
        return String::new();
    }

    let compare = &diff.compare_branch;
    let base = &diff.base_branch;

    format!(
        "\n{DIFF_COMMENT_IDENTIFIER}\n{marker}\n\n\
         # {LOGO} Neon Schema Diff summary\n\n\
         Schema diff between the compare branch ([{compare_name}]({compare_url})) \
         and the base branch ([{base_name}]({base_url})).\n\n\
         {base_line}\n\
         {compare_line}\n\
         - Database: {database}\n\
         - Role: {role}\n\n\
         ```diff\n{sql}\n```\n\n\
         This comment was last updated at {date} {time}\n",
        marker = hash_marker(&diff.hash),
        compare_name = compare.name,
        compare_url = branch_url(project_id, &compare.id),
        base_name = base.name,
        base_url = branch_url(project_id, &base.id),
        base_line = branch_line("Base branch", base, project_id),
        compare_line = branch_line("Compare branch", compare, project_id),
        database = diff.database,
        role = diff.role,
        sql = diff.sql,
        date = updated_at.format("%-m/%-d/%Y"),
        time = updated_at.format("%-I:%M:%S %p"),
    )
}
