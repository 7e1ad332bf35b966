//! HTTP provider for the backend's record list.
//!
//! Queries `GET {base_url}/api/data`, which the deployment's reverse proxy
//! forwards to the backend service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::wire::DataResponse;
use super::{build_client, join_url, RecordProvider, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
use crate::data::Record;
use crate::error::FetchError;

/// Record provider backed by the backend HTTP API.
#[derive(Debug, Clone)]
pub struct HttpRecordProvider {
    client: Client,
    url: String,
    description: String,
}

impl HttpRecordProvider {
    /// Create a new builder for configuring the provider.
    pub fn builder() -> HttpRecordProviderBuilder {
        HttpRecordProviderBuilder::default()
    }

    /// The full endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RecordProvider for HttpRecordProvider {
    async fn fetch_records(&self) -> Result<Vec<Record>, FetchError> {
        debug!(url = %self.url, "fetching records");

        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        let data: DataResponse = serde_json::from_slice(&body)?;

        Ok(data.items)
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Builder for HttpRecordProvider.
#[derive(Debug, Default)]
pub struct HttpRecordProviderBuilder {
    base_url: Option<String>,
    path: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl HttpRecordProviderBuilder {
    /// Set the backend origin (default: "http://127.0.0.1:5000").
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the data path (default: "/api/data").
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Set the request timeout (default: 10 seconds, zero disables it).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build the provider.
    pub fn build(self) -> Result<HttpRecordProvider, FetchError> {
        let base_url = self
            .base_url
            .unwrap_or_else(|| "http://127.0.0.1:5000".to_string());
        let path = self.path.unwrap_or_else(|| "/api/data".to_string());
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        let client = build_client(self.timeout.unwrap_or(DEFAULT_TIMEOUT), &user_agent)?;
        let url = join_url(&base_url, &path);

        Ok(HttpRecordProvider {
            client,
            description: format!("backend: {}", url),
            url,
        })
    }
}
