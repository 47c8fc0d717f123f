//! Diff results produced by the diff engine.

use serde::Serialize;

use super::branch::Branch;

/// Unified diff text plus its SHA-256 fingerprint.
///
/// Both fields are empty when the schemas are identical.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SchemaDiff {
    pub sql: String,
    pub hash: String,
}

/// Diff between two resolved branches of a project.
#[derive(Debug, Clone, Serialize)]
pub struct BranchDiff {
    pub sql: String,
    pub hash: String,
    pub compare_branch: Branch,
    pub base_branch: Branch,
    pub role: String,
    pub database: String,
}
