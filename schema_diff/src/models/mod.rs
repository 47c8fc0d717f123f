//! Schema diff data models — branches, diffs, PR comments.

pub mod branch;
pub mod comment;
pub mod diff;
