//! Neon API integration — branch listing and branch schema retrieval.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};

use super::{read_response, ApiResponse};
use crate::models::branch::{BranchList, BranchSchema};

const CONSOLE_URL: &str = "https://console.neon.tech/app";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Parameters of a branch schema lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaRequest {
    pub project_id: String,
    pub branch_id: String,
    pub role: String,
    pub database: String,
    pub lsn: Option<String>,
    pub timestamp: Option<String>,
}

/// Branch operations the diff pipeline needs from the Neon API.
#[async_trait]
pub trait BranchApi: Send + Sync {
    async fn list_branches(&self, project_id: &str) -> anyhow::Result<ApiResponse<BranchList>>;

    async fn branch_schema(
        &self,
        request: &SchemaRequest,
    ) -> anyhow::Result<ApiResponse<BranchSchema>>;
}

/// Console link for a branch.
pub fn branch_url(project_id: &str, branch_id: &str) -> String {
    format!("{CONSOLE_URL}/projects/{project_id}/branches/{branch_id}")
}

pub fn user_agent() -> String {
    format!("neon-schema-diff-action v{}", env!("CARGO_PKG_VERSION"))
}

/// Neon API v2 client.
#[derive(Debug, Clone)]
pub struct NeonClient {
    http: reqwest::Client,
    base_url: String,
}

impl NeonClient {
    pub fn new(api_host: &str, api_key: &str) -> anyhow::Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {api_key}"))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .user_agent(user_agent())
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: api_host.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl BranchApi for NeonClient {
    async fn list_branches(&self, project_id: &str) -> anyhow::Result<ApiResponse<BranchList>> {
        let url = format!("{}/projects/{project_id}/branches", self.base_url);
        tracing::debug!(%url, "Listing project branches");

        let resp = self.http.get(&url).send().await?;
        read_response(resp).await
    }

    async fn branch_schema(
        &self,
        request: &SchemaRequest,
    ) -> anyhow::Result<ApiResponse<BranchSchema>> {
        let url = format!(
            "{}/projects/{}/branches/{}/schema",
            self.base_url, request.project_id, request.branch_id
        );
        tracing::debug!(%url, lsn = ?request.lsn, timestamp = ?request.timestamp, "Fetching branch schema");

        let mut req = self.http.get(&url).query(&[
            ("role", request.role.as_str()),
            ("db_name", request.database.as_str()),
        ]);
        if let Some(lsn) = &request.lsn {
            req = req.query(&[("lsn", lsn)]);
        }
        if let Some(timestamp) = &request.timestamp {
            req = req.query(&[("timestamp", timestamp)]);
        }

        let resp = req.send().await?;
        read_response(resp).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn branch_url_points_at_console() {
        assert_eq!(
            branch_url("proj-1", "br-a-b-1"),
            "https://console.neon.tech/app/projects/proj-1/branches/br-a-b-1"
        );
    }

    #[test]
    fn user_agent_carries_version() {
        assert_eq!(
            user_agent(),
            format!("neon-schema-diff-action v{}", env!("CARGO_PKG_VERSION"))
        );
    }

    #[test]
    fn client_trims_trailing_slash() {
        let client = NeonClient::new("https://console.neon.tech/api/v2/", "key").unwrap();
        assert_eq!(client.base_url, "https://console.neon.tech/api/v2");
    }
}
