//! Schema diff services — collaborator clients and the diff/comment pipeline.

pub mod branch_service;
pub mod comment_service;
pub mod diff_service;
pub mod github_service;
pub mod neon_service;
pub mod schema_service;
pub mod summary_service;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;

/// Status plus decoded body of a collaborator call. Bodies are only decoded for 2xx.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    pub status: StatusCode,
    pub body: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn new(status: StatusCode, body: T) -> Self {
        Self {
            status,
            body: Some(body),
        }
    }

    pub fn status_only(status: StatusCode) -> Self {
        Self { status, body: None }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Turn an HTTP response into an [`ApiResponse`], logging the body of failures.
pub(crate) async fn read_response<T: DeserializeOwned>(
    resp: reqwest::Response,
) -> anyhow::Result<ApiResponse<T>> {
    let status = resp.status();
    if !status.is_success() {
        let url = resp.url().clone();
        let text = resp.text().await.unwrap_or_default();
        tracing::warn!(%status, %url, "API request failed: {}", text);
        return Ok(ApiResponse::status_only(status));
    }
    if status == StatusCode::NO_CONTENT {
        return Ok(ApiResponse::status_only(status));
    }

    let body = resp.json::<T>().await?;
    Ok(ApiResponse::new(status, body))
}
