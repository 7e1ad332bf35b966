//! HTTP provider for recent CI workflow runs.
//!
//! Talks to the GitHub Actions REST API directly, unauthenticated, so it is
//! subject to the provider's anonymous rate limit. Only the newest
//! [`WORKFLOW_DISPLAY_LIMIT`] runs are requested.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use tracing::debug;

use super::wire::WorkflowRunsResponse;
use super::{build_client, join_url, WorkflowProvider, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
use crate::data::{WorkflowRun, WORKFLOW_DISPLAY_LIMIT};
use crate::error::FetchError;

const GITHUB_JSON: &str = "application/vnd.github+json";

/// Workflow provider backed by the GitHub Actions API.
#[derive(Debug, Clone)]
pub struct HttpWorkflowProvider {
    client: Client,
    url: String,
    description: String,
}

impl HttpWorkflowProvider {
    /// Create a new builder for configuring the provider.
    pub fn builder() -> HttpWorkflowProviderBuilder {
        HttpWorkflowProviderBuilder::default()
    }

    /// The full endpoint URL, query string included.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl WorkflowProvider for HttpWorkflowProvider {
    async fn fetch_workflow_runs(&self) -> Result<Vec<WorkflowRun>, FetchError> {
        debug!(url = %self.url, "fetching workflow runs");

        let response = self
            .client
            .get(&self.url)
            .header(ACCEPT, GITHUB_JSON)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        let data: WorkflowRunsResponse = serde_json::from_slice(&body)?;

        let mut runs = data.workflow_runs;
        runs.truncate(WORKFLOW_DISPLAY_LIMIT);
        Ok(runs)
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Builder for HttpWorkflowProvider.
#[derive(Debug, Default)]
pub struct HttpWorkflowProviderBuilder {
    api_base: Option<String>,
    repository: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl HttpWorkflowProviderBuilder {
    /// Set the API origin (default: "https://api.github.com").
    pub fn api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    /// Set the repository as "owner/repo" (default: "HimanM/DevOps-Project-1").
    pub fn repository(mut self, repository: impl Into<String>) -> Self {
        self.repository = Some(repository.into());
        self
    }

    /// Set the request timeout (default: 10 seconds, zero disables it).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the `User-Agent` header. GitHub rejects requests without one.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build the provider.
    pub fn build(self) -> Result<HttpWorkflowProvider, FetchError> {
        let api_base = self
            .api_base
            .unwrap_or_else(|| "https://api.github.com".to_string());
        let repository = self
            .repository
            .unwrap_or_else(|| "HimanM/DevOps-Project-1".to_string());
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        let client = build_client(self.timeout.unwrap_or(DEFAULT_TIMEOUT), &user_agent)?;
        let url = format!(
            "{}?per_page={}",
            join_url(&api_base, &format!("repos/{}/actions/runs", repository)),
            WORKFLOW_DISPLAY_LIMIT
        );

        Ok(HttpWorkflowProvider {
            client,
            description: format!("ci: {}", repository),
            url,
        })
    }
}
