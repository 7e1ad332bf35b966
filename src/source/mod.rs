//! Data provider abstraction.
//!
//! The dashboard has two independent inputs: the internal backend's record
//! list and the CI provider's recent workflow runs. Each sits behind its own
//! trait so either can be swapped (for instance, a server-side proxy in front
//! of the CI provider) without touching the state container.

mod records;
mod wire;
mod workflows;

pub use records::{HttpRecordProvider, HttpRecordProviderBuilder};
pub use wire::{DataResponse, WorkflowRunsResponse};
pub use workflows::{HttpWorkflowProvider, HttpWorkflowProviderBuilder};

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::data::{Record, WorkflowRun};
use crate::error::FetchError;

/// Default per-request timeout for the HTTP providers.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default `User-Agent` sent by the HTTP providers.
pub const DEFAULT_USER_AGENT: &str = concat!("opsboard/", env!("CARGO_PKG_VERSION"));

/// Source of the backend's record list.
///
/// # Example
///
/// ```no_run
/// use opsboard::{HttpRecordProvider, RecordProvider};
///
/// # tokio_test::block_on(async {
/// let provider = HttpRecordProvider::builder()
///     .base_url("http://127.0.0.1:5000")
///     .build()
///     .unwrap();
/// match provider.fetch_records().await {
///     Ok(records) => println!("{} records", records.len()),
///     Err(e) => println!("backend offline: {}", e),
/// }
/// # });
/// ```
#[async_trait]
pub trait RecordProvider: Send + Sync + Debug {
    /// Fetch the full record list.
    ///
    /// Any transport failure, non-success status or malformed body settles
    /// as an error.
    async fn fetch_records(&self) -> Result<Vec<Record>, FetchError>;

    /// Returns a human-readable description of the provider.
    fn description(&self) -> &str;
}

/// Source of recent CI workflow runs.
#[async_trait]
pub trait WorkflowProvider: Send + Sync + Debug {
    /// Fetch the most recent runs, newest first as the server orders them.
    async fn fetch_workflow_runs(&self) -> Result<Vec<WorkflowRun>, FetchError>;

    /// Returns a human-readable description of the provider.
    fn description(&self) -> &str;
}

/// Build the HTTP client shared by both providers.
///
/// A zero timeout disables the per-request deadline.
fn build_client(timeout: Duration, user_agent: &str) -> Result<Client, FetchError> {
    let mut builder = Client::builder().user_agent(user_agent.to_string());
    if !timeout.is_zero() {
        builder = builder.timeout(timeout);
    }
    builder.build().map_err(|e| FetchError::Transport(e.to_string()))
}

/// Join a base URL and a path with exactly one slash between them.
fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("http://a:5000", "/api/data"), "http://a:5000/api/data");
        assert_eq!(join_url("http://a:5000/", "/api/data"), "http://a:5000/api/data");
        assert_eq!(join_url("http://a:5000", "api/data"), "http://a:5000/api/data");
    }

    #[test]
    fn test_default_user_agent() {
        assert!(DEFAULT_USER_AGENT.starts_with("opsboard/"));
    }
}
