//! Branch resolution — picks the compare and base branches out of a project's branch list.

use crate::error::{SchemaDiffError, SchemaDiffResult};
use crate::models::branch::{Branch, BranchComparisonInput};

/// The two branches a diff runs between.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedBranches {
    pub compare: Branch,
    pub base: Branch,
}

fn find<'a>(branches: &'a [Branch], value: &str) -> Option<&'a Branch> {
    branches.iter().find(|b| b.matches(value))
}

/// Resolve `input` against `branches`.
///
/// Without an explicit base the compare branch's parent is used. First match wins.
pub fn resolve_branches(
    branches: &[Branch],
    input: &BranchComparisonInput,
    project_id: &str,
) -> SchemaDiffResult<ResolvedBranches> {
    let compare_value = &input.compare.value;
    let compare = find(branches, compare_value).ok_or_else(|| SchemaDiffError::BranchNotFound {
        value: compare_value.clone(),
        project_id: project_id.to_string(),
    })?;

    let base = match &input.base {
        Some(selector) => {
            find(branches, &selector.value).ok_or_else(|| SchemaDiffError::BranchNotFound {
                value: selector.value.clone(),
                project_id: project_id.to_string(),
            })?
        }
        None => {
            let parent_id =
                compare
                    .parent_id
                    .as_deref()
                    .ok_or_else(|| SchemaDiffError::NoParent {
                        value: compare_value.clone(),
                    })?;
            branches
                .iter()
                .find(|b| b.id == parent_id)
                .ok_or_else(|| SchemaDiffError::ParentNotFound {
                    value: compare_value.clone(),
                })?
        }
    };

    tracing::info!(
        compare = %compare.name,
        compare_id = %compare.id,
        base = %base.name,
        base_id = %base.id,
        "Resolved branches"
    );

    Ok(ResolvedBranches {
        compare: compare.clone(),
        base: base.clone(),
    })
}
