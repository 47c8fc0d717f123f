//! Schema diffing — unified patch text between two branch schemas and its fingerprint.

use std::fmt;
use std::ops::Range;

use sha2::{Digest, Sha256};
use similar::{Algorithm, ChangeTag, TextDiff};

use super::branch_service::resolve_branches;
use super::neon_service::BranchApi;
use super::schema_service::{fetch_base_schema, fetch_compare_schema, SchemaTarget};
use crate::error::{SchemaDiffError, SchemaDiffResult};
use crate::models::branch::{BranchComparisonInput, PointInTime};
use crate::models::diff::{BranchDiff, SchemaDiff};

/// Unchanged lines kept around each hunk.
const CONTEXT_LINES: usize = 4;
const SEPARATOR: &str = "===================================================================";
const NO_NEWLINE: &str = "\\ No newline at end of file";

/// File and revision labels written into the patch header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLabels {
    pub file_name: String,
    pub old_header: String,
    pub new_header: String,
}

impl DiffLabels {
    pub fn for_branches(database: &str, base_name: &str, compare_name: &str) -> Self {
        Self {
            file_name: format!("{database}-schema.sql"),
            old_header: format!("Branch {base_name}"),
            new_header: format!("Branch {compare_name}"),
        }
    }
}

/// `start,len` of a hunk side; an empty side points at the line before it.
struct HunkRange(Range<usize>);

impl fmt::Display for HunkRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let len = self.0.len();
        let start = if len == 0 { self.0.start } else { self.0.start + 1 };
        write!(f, "{start},{len}")
    }
}

/// Render a unified patch turning `old` into `new`.
pub fn unified_diff(labels: &DiffLabels, old: &str, new: &str) -> String {
    let diff = TextDiff::configure()
        .algorithm(Algorithm::Myers)
        .diff_lines(old, new);

    let mut out = format!(
        "Index: {file}\n{SEPARATOR}\n--- {file}\t{old_header}\n+++ {file}\t{new_header}\n",
        file = labels.file_name,
        old_header = labels.old_header,
        new_header = labels.new_header,
    );

    for group in diff.grouped_ops(CONTEXT_LINES) {
        let (Some(first), Some(last)) = (group.first(), group.last()) else {
            continue;
        };
        let old_range = first.old_range().start..last.old_range().end;
        let new_range = first.new_range().start..last.new_range().end;
        out.push_str(&format!(
            "@@ -{} +{} @@\n",
            HunkRange(old_range),
            HunkRange(new_range)
        ));

        for op in &group {
            for change in diff.iter_changes(op) {
                let sign = match change.tag() {
                    ChangeTag::Delete => '-',
                    ChangeTag::Insert => '+',
                    ChangeTag::Equal => ' ',
                };
                out.push(sign);
                out.push_str(change.value());
                if change.missing_newline() {
                    out.push('\n');
                    out.push_str(NO_NEWLINE);
                    out.push('\n');
                }
            }
        }
    }

    out
}

/// Lowercase hex SHA-256 of `text`.
pub fn fingerprint(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

/// Diff two schema dumps. Identical inputs short-circuit to an empty result.
pub fn compute_diff(labels: &DiffLabels, base_sql: &str, compare_sql: &str) -> SchemaDiff {
    if base_sql == compare_sql {
        return SchemaDiff::default();
    }

    let sql = unified_diff(labels, base_sql, compare_sql);
    let hash = fingerprint(&sql);
    SchemaDiff { sql, hash }
}

/// Resolve both branches of `input`, fetch their schemas and diff them.
pub async fn diff(
    api: &dyn BranchApi,
    project_id: &str,
    input: &BranchComparisonInput,
    role: &str,
    database: &str,
    point_in_time: Option<&PointInTime>,
) -> SchemaDiffResult<BranchDiff> {
    let listing = api.list_branches(project_id).await?;
    if !listing.is_success() {
        return Err(SchemaDiffError::BranchList {
            project_id: project_id.to_string(),
        });
    }
    let branches = listing.body.map(|l| l.branches).unwrap_or_default();

    let resolved = resolve_branches(&branches, input, project_id)?;
    let target = SchemaTarget {
        project_id,
        database,
        role,
    };

    let compare_sql = fetch_compare_schema(
        api,
        target,
        &resolved.compare,
        &input.compare.value,
        point_in_time,
    )
    .await?;

    let base_label = input
        .base
        .as_ref()
        .map_or(resolved.base.name.as_str(), |b| b.value.as_str());
    let base_sql = fetch_base_schema(api, target, &resolved.base, base_label).await?;

    let labels = DiffLabels::for_branches(database, &resolved.base.name, &resolved.compare.name);
    let SchemaDiff { sql, hash } = compute_diff(&labels, &base_sql, &compare_sql);

    if sql.is_empty() {
        tracing::info!("Schemas are identical");
    } else {
        tracing::info!(hash = %hash, lines = sql.lines().count(), "Schema diff computed");
    }

    Ok(BranchDiff {
        sql,
        hash,
        compare_branch: resolved.compare,
        base_branch: resolved.base,
        role: role.to_string(),
        database: database.to_string(),
    })
}
