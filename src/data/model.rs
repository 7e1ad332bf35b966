//! Domain records shown by the dashboard.
//!
//! Both types double as the wire format: they deserialize straight from the
//! backend and CI provider JSON bodies.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// One backend-domain item (`/api/data` entry).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: i64,
    pub name: String,
    pub status: String,
}

impl Record {
    /// Create a record.
    pub fn new(id: i64, name: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            status: status.into(),
        }
    }

    /// Whether the record carries the `active` status.
    pub fn is_active(&self) -> bool {
        self.status == "active"
    }
}

/// Display classification of a workflow run's conclusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Success,
    Failure,
    /// No conclusion yet (queued, in progress) or one we don't single out.
    Pending,
}

impl RunOutcome {
    /// Returns a short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            RunOutcome::Success => "✔",
            RunOutcome::Failure => "✘",
            RunOutcome::Pending => "◷",
        }
    }
}

/// One CI pipeline execution summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowRun {
    pub id: u64,
    pub name: String,
    /// "queued", "in_progress", "completed", ...
    pub status: String,
    /// "success", "failure", ... or `None` while unresolved.
    pub conclusion: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl WorkflowRun {
    /// Classify the run for display.
    pub fn outcome(&self) -> RunOutcome {
        match self.conclusion.as_deref() {
            Some("success") => RunOutcome::Success,
            Some("failure") => RunOutcome::Failure,
            _ => RunOutcome::Pending,
        }
    }

    /// Creation time rendered in the local timezone.
    pub fn created_at_local(&self) -> String {
        self.created_at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
    }
}
