//! Failure taxonomy for a schema diff run. Every variant is terminal.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaDiffError {
    #[error("Failed to list branches for project {project_id}")]
    BranchList { project_id: String },

    #[error("Branch {value} not found in project {project_id}")]
    BranchNotFound { value: String, project_id: String },

    #[error("Branch {value} has no parent to compare to, please provide a base branch")]
    NoParent { value: String },

    #[error("Parent branch for {value} not found")]
    ParentNotFound { value: String },

    #[error("Failed to get schema for branch {value} in project {project_id}")]
    CompareSchemaFetch { value: String, project_id: String },

    #[error("Failed to get schema for the base branch {value} in project {project_id}")]
    BaseSchemaFetch { value: String, project_id: String },

    #[error("Failed to create a comment")]
    CreateComment,

    #[error("Failed to update comment {id}")]
    UpdateComment { id: u64 },

    #[error("Failed to delete comment")]
    DeleteComment,

    /// Collaborator transport failures, surfaced as-is.
    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}

pub type SchemaDiffResult<T> = Result<T, SchemaDiffError>;
