//! GitHub integration — PR comment listing and create/update/delete.

use std::future::Future;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};

use super::neon_service::user_agent;
use super::{read_response, ApiResponse};
use crate::models::comment::{IssueComment, IssueRef};

const PER_PAGE: usize = 100;

/// Comment operations on the run's issue or pull request.
#[async_trait]
pub trait CommentApi: Send + Sync {
    /// All comments on the issue, in API order.
    async fn list_comments(&self, issue: &IssueRef) -> anyhow::Result<Vec<IssueComment>>;

    async fn create_comment(
        &self,
        issue: &IssueRef,
        body: &str,
    ) -> anyhow::Result<ApiResponse<IssueComment>>;

    async fn update_comment(
        &self,
        issue: &IssueRef,
        comment_id: u64,
        body: &str,
    ) -> anyhow::Result<ApiResponse<IssueComment>>;

    async fn delete_comment(
        &self,
        issue: &IssueRef,
        comment_id: u64,
    ) -> anyhow::Result<ApiResponse<()>>;
}

/// Fetch pages 1, 2, ... in order until one comes back shorter than `per_page`.
async fn collect_pages<T, F, Fut>(per_page: usize, mut fetch: F) -> anyhow::Result<Vec<T>>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = anyhow::Result<Vec<T>>>,
{
    let mut items = Vec::new();
    for page in 1.. {
        let batch = fetch(page).await?;
        let last_page = batch.len() < per_page;
        items.extend(batch);
        if last_page {
            break;
        }
    }
    Ok(items)
}

/// GitHub REST client authenticated with the workflow token.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    api_url: String,
}

impl GitHubClient {
    pub fn new(api_url: &str, token: &str) -> anyhow::Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "x-github-api-version",
            HeaderValue::from_static("2022-11-28"),
        );

        let http = reqwest::Client::builder()
            .user_agent(user_agent())
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    fn issue_comments_url(&self, issue: &IssueRef) -> String {
        format!(
            "{}/repos/{}/{}/issues/{}/comments",
            self.api_url, issue.owner, issue.repo, issue.number
        )
    }

    fn comment_url(&self, issue: &IssueRef, comment_id: u64) -> String {
        format!(
            "{}/repos/{}/{}/issues/comments/{comment_id}",
            self.api_url, issue.owner, issue.repo
        )
    }
}

#[async_trait]
impl CommentApi for GitHubClient {
    async fn list_comments(&self, issue: &IssueRef) -> anyhow::Result<Vec<IssueComment>> {
        let url = self.issue_comments_url(issue);
        let url = url.as_str();

        let comments = collect_pages(PER_PAGE, move |page| async move {
            let resp = self
                .http
                .get(url)
                .query(&[("per_page", PER_PAGE), ("page", page)])
                .send()
                .await?;

            let status = resp.status();
            if !status.is_success() {
                let text = resp.text().await.unwrap_or_default();
                anyhow::bail!(
                    "Failed to list comments for {}/{}#{}: {} {}",
                    issue.owner,
                    issue.repo,
                    issue.number,
                    status,
                    text
                );
            }

            anyhow::Ok(resp.json::<Vec<IssueComment>>().await?)
        })
        .await?;

        tracing::debug!(count = comments.len(), "Listed issue comments");
        Ok(comments)
    }

    async fn create_comment(
        &self,
        issue: &IssueRef,
        body: &str,
    ) -> anyhow::Result<ApiResponse<IssueComment>> {
        let payload = serde_json::json!({ "body": body });
        let resp = self
            .http
            .post(self.issue_comments_url(issue))
            .json(&payload)
            .send()
            .await?;
        read_response(resp).await
    }

    async fn update_comment(
        &self,
        issue: &IssueRef,
        comment_id: u64,
        body: &str,
    ) -> anyhow::Result<ApiResponse<IssueComment>> {
        let payload = serde_json::json!({ "body": body });
        let resp = self
            .http
            .patch(self.comment_url(issue, comment_id))
            .json(&payload)
            .send()
            .await?;
        read_response(resp).await
    }

    async fn delete_comment(
        &self,
        issue: &IssueRef,
        comment_id: u64,
    ) -> anyhow::Result<ApiResponse<()>> {
        let resp = self
            .http
            .delete(self.comment_url(issue, comment_id))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            tracing::warn!(%status, comment_id, "GitHub comment delete failed: {}", text);
        }
        Ok(ApiResponse::status_only(status))
    }
}
