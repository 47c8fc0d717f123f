//! In-memory collaborators for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::models::branch::{Branch, BranchList, BranchSchema};
use crate::models::comment::{IssueComment, IssueRef};
use crate::services::github_service::CommentApi;
use crate::services::neon_service::{BranchApi, SchemaRequest};
use crate::services::ApiResponse;

pub const CREATED_URL: &str = "http://example.com/new-comment";
pub const UPDATED_URL: &str = "http://example.com/updated-comment";

pub fn issue() -> IssueRef {
    IssueRef {
        owner: "test-owner".into(),
        repo: "test-repo".into(),
        number: 1,
    }
}

pub fn comment(id: u64, url: &str, body: &str) -> IssueComment {
    IssueComment {
        id,
        body: Some(body.to_string()),
        html_url: url.to_string(),
    }
}

/// Neon API double: fixed branch list, queued schema responses.
pub struct FakeNeon {
    branches: ApiResponse<BranchList>,
    schemas: Mutex<VecDeque<ApiResponse<BranchSchema>>>,
    requests: Mutex<Vec<SchemaRequest>>,
}

impl FakeNeon {
    pub fn new(branches: Vec<Branch>) -> Self {
        Self::with_list(ApiResponse::new(StatusCode::OK, BranchList { branches }))
    }

    pub fn failing_list(status: StatusCode) -> Self {
        Self::with_list(ApiResponse::status_only(status))
    }

    fn with_list(branches: ApiResponse<BranchList>) -> Self {
        Self {
            branches,
            schemas: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn schema(self, sql: &str) -> Self {
        self.schemas.lock().unwrap().push_back(ApiResponse::new(
            StatusCode::OK,
            BranchSchema {
                sql: sql.to_string(),
            },
        ));
        self
    }

    pub fn failing_schema(self, status: StatusCode) -> Self {
        self.schemas
            .lock()
            .unwrap()
            .push_back(ApiResponse::status_only(status));
        self
    }

    pub fn requests(&self) -> Vec<SchemaRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl BranchApi for FakeNeon {
    async fn list_branches(&self, _project_id: &str) -> anyhow::Result<ApiResponse<BranchList>> {
        Ok(self.branches.clone())
    }

    async fn branch_schema(
        &self,
        request: &SchemaRequest,
    ) -> anyhow::Result<ApiResponse<BranchSchema>> {
        self.requests.lock().unwrap().push(request.clone());
        self.schemas
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("unexpected schema request for {}", request.branch_id))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentCall {
    Create(String),
    Update(u64, String),
    Delete(u64),
}

/// GitHub double: fixed comment list, records every mutation.
pub struct FakeGitHub {
    comments: Vec<IssueComment>,
    mutation_status: Option<StatusCode>,
    calls: Mutex<Vec<CommentCall>>,
}

impl FakeGitHub {
    pub fn new(comments: Vec<IssueComment>) -> Self {
        Self {
            comments,
            mutation_status: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Make every create/update/delete answer with `status`.
    pub fn failing(mut self, status: StatusCode) -> Self {
        self.mutation_status = Some(status);
        self
    }

    pub fn calls(&self) -> Vec<CommentCall> {
        self.calls.lock().unwrap().clone()
    }

    fn respond(&self, ok: StatusCode, comment: IssueComment) -> ApiResponse<IssueComment> {
        match self.mutation_status {
            Some(status) => ApiResponse::status_only(status),
            None => ApiResponse::new(ok, comment),
        }
    }
}

#[async_trait]
impl CommentApi for FakeGitHub {
    async fn list_comments(&self, _issue: &IssueRef) -> anyhow::Result<Vec<IssueComment>> {
        Ok(self.comments.clone())
    }

    async fn create_comment(
        &self,
        _issue: &IssueRef,
        body: &str,
    ) -> anyhow::Result<ApiResponse<IssueComment>> {
        self.calls
            .lock()
            .unwrap()
            .push(CommentCall::Create(body.to_string()));
        Ok(self.respond(StatusCode::CREATED, comment(1000, CREATED_URL, body)))
    }

    async fn update_comment(
        &self,
        _issue: &IssueRef,
        comment_id: u64,
        body: &str,
    ) -> anyhow::Result<ApiResponse<IssueComment>> {
        self.calls
            .lock()
            .unwrap()
            .push(CommentCall::Update(comment_id, body.to_string()));
        Ok(self.respond(StatusCode::OK, comment(comment_id, UPDATED_URL, body)))
    }

    async fn delete_comment(
        &self,
        _issue: &IssueRef,
        comment_id: u64,
    ) -> anyhow::Result<ApiResponse<()>> {
        self.calls
            .lock()
            .unwrap()
            .push(CommentCall::Delete(comment_id));
        Ok(match self.mutation_status {
            Some(status) => ApiResponse::status_only(status),
            None => ApiResponse::status_only(StatusCode::NO_CONTENT),
        })
    }
}
