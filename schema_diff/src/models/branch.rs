//! neon.branch — A database branch and the selectors used to pick one.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub protected: bool,
    /// Remaining API fields, carried through untouched.
    #[serde(flatten)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl Branch {
    /// Selector match: by id or by name, exact and case-sensitive.
    pub fn matches(&self, value: &str) -> bool {
        self.id == value || self.name == value
    }
}

#[cfg(test)]
impl Branch {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            parent_id: None,
            protected: false,
            metadata: serde_json::Map::new(),
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn protected(mut self, protected: bool) -> Self {
        self.protected = protected;
        self
    }
}

/// `GET /projects/{id}/branches` response body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BranchList {
    #[serde(default)]
    pub branches: Vec<Branch>,
}

/// `GET /projects/{id}/branches/{branch_id}/schema` response body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BranchSchema {
    #[serde(default)]
    pub sql: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectorKind {
    Id,
    Name,
}

/// How the user named a branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchSelector {
    pub kind: SelectorKind,
    pub value: String,
}

impl BranchSelector {
    pub fn id(value: impl Into<String>) -> Self {
        Self {
            kind: SelectorKind::Id,
            value: value.into(),
        }
    }

    pub fn name(value: impl Into<String>) -> Self {
        Self {
            kind: SelectorKind::Name,
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchComparisonInput {
    pub compare: BranchSelector,
    /// When absent the compare branch's parent is used.
    pub base: Option<BranchSelector>,
}

/// Historical coordinate for the compare branch schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointInTime {
    /// ISO-8601 UTC timestamp.
    Timestamp(String),
    /// Log sequence number, e.g. `0/1A2B3C4D`.
    Lsn(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn branch_keeps_unknown_fields() {
        let json = r#"{
            "id": "br-wispy-dew-123",
            "name": "main",
            "protected": true,
            "current_state": "ready",
            "default": true
        }"#;
        let branch: Branch = serde_json::from_str(json).unwrap();

        assert_eq!(branch.id, "br-wispy-dew-123");
        assert!(branch.protected);
        assert_eq!(branch.parent_id, None);
        assert_eq!(branch.metadata["current_state"], "ready");
    }

    #[test]
    fn matches_is_exact() {
        let branch = Branch::new("br-a-b-1", "Feature");
        assert!(branch.matches("br-a-b-1"));
        assert!(branch.matches("Feature"));
        assert!(!branch.matches("feature"));
        assert!(!branch.matches("br-a-b"));
    }
}
