//! Schema retrieval for resolved branches.
//!
//! Only the compare branch may be read at a point in time; the base branch is always
//! read at its current state.

use super::neon_service::{BranchApi, SchemaRequest};
use crate::error::{SchemaDiffError, SchemaDiffResult};
use crate::models::branch::{Branch, PointInTime};

/// Database and role the schema is dumped for.
#[derive(Debug, Clone, Copy)]
pub struct SchemaTarget<'a> {
    pub project_id: &'a str,
    pub database: &'a str,
    pub role: &'a str,
}

impl SchemaTarget<'_> {
    fn request(&self, branch: &Branch) -> SchemaRequest {
        SchemaRequest {
            project_id: self.project_id.to_string(),
            branch_id: branch.id.clone(),
            role: self.role.to_string(),
            database: self.database.to_string(),
            lsn: None,
            timestamp: None,
        }
    }
}

/// Schema of the compare branch, optionally as of `point_in_time`.
///
/// `label` is the value the user selected the branch with.
pub async fn fetch_compare_schema(
    api: &dyn BranchApi,
    target: SchemaTarget<'_>,
    branch: &Branch,
    label: &str,
    point_in_time: Option<&PointInTime>,
) -> SchemaDiffResult<String> {
    let mut request = target.request(branch);
    match point_in_time {
        Some(PointInTime::Lsn(lsn)) => request.lsn = Some(lsn.clone()),
        Some(PointInTime::Timestamp(ts)) => request.timestamp = Some(ts.clone()),
        None => {}
    }

    let resp = api.branch_schema(&request).await?;
    if !resp.is_success() {
        return Err(SchemaDiffError::CompareSchemaFetch {
            value: label.to_string(),
            project_id: target.project_id.to_string(),
        });
    }

    let sql = resp.body.map(|s| s.sql).unwrap_or_default();
    tracing::debug!(branch = %branch.name, bytes = sql.len(), "Fetched compare branch schema");
    Ok(sql)
}

/// Current schema of the base branch.
pub async fn fetch_base_schema(
    api: &dyn BranchApi,
    target: SchemaTarget<'_>,
    branch: &Branch,
    label: &str,
) -> SchemaDiffResult<String> {
    let resp = api.branch_schema(&target.request(branch)).await?;
    if !resp.is_success() {
        return Err(SchemaDiffError::BaseSchemaFetch {
            value: label.to_string(),
            project_id: target.project_id.to_string(),
        });
    }

    let sql = resp.body.map(|s| s.sql).unwrap_or_default();
    tracing::debug!(branch = %branch.name, bytes = sql.len(), "Fetched base branch schema");
    Ok(sql)
}
