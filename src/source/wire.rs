//! Response bodies of the two endpoints.
//!
//! Only the fields the dashboard uses are declared; anything else the
//! servers send is ignored.

use serde::{Deserialize, Serialize};

use crate::data::{Record, WorkflowRun};

/// Body of `GET /api/data`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataResponse {
    pub items: Vec<Record>,
}

/// Body of `GET /repos/{owner}/{repo}/actions/runs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowRunsResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_count: Option<u64>,
    pub workflow_runs: Vec<WorkflowRun>,
}
