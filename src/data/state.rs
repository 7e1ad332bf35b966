//! Dashboard state and its mutation contract.
//!
//! Providers never touch the state directly. Their outcomes arrive as
//! [`StateUpdate`] events which the owning [`StateStore`] applies, one at a
//! time, on the thread that renders. Observers follow changes through
//! [`StateStore::subscribe`].

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, warn};

use super::model::{Record, WorkflowRun};
use super::status::ConnectivityStatus;
use crate::error::FetchError;

/// Monotonically increasing tag of a primary data request.
pub type RequestSeq = u64;

/// Maximum number of workflow runs kept and shown.
pub const WORKFLOW_DISPLAY_LIMIT: usize = 5;

/// How overlapping primary data requests are reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReconcilePolicy {
    /// Apply a response only if its sequence number is at least the last
    /// applied one. A slow response to an older request is dropped.
    #[default]
    LatestRequest,
    /// Apply every response in settlement order; the last to settle wins.
    LastSettled,
}

/// An update event produced by the refresh machinery.
#[derive(Debug, Clone, PartialEq)]
pub enum StateUpdate {
    /// A primary data request was issued.
    RecordsRequested { seq: RequestSeq },
    /// A primary data request settled.
    RecordsSettled {
        seq: RequestSeq,
        outcome: Result<Vec<Record>, FetchError>,
    },
    /// The workflow request settled.
    WorkflowsSettled {
        outcome: Result<Vec<WorkflowRun>, FetchError>,
    },
}

/// Everything the presentation layer renders.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardState {
    pub records: Vec<Record>,
    pub workflows: Vec<WorkflowRun>,
    pub connectivity: ConnectivityStatus,
    pub is_loading: bool,
    /// When the current records snapshot was applied.
    pub records_updated_at: Option<DateTime<Utc>>,
}

impl DashboardState {
    /// Placeholder rows are shown while the first load is outstanding.
    pub fn shows_placeholders(&self) -> bool {
        self.is_loading && self.records.is_empty()
    }

    /// The "no data" message is shown once loading finished with nothing.
    pub fn shows_empty_state(&self) -> bool {
        !self.is_loading && self.records.is_empty()
    }

    /// The workflow section is omitted entirely when there are no runs.
    pub fn shows_workflows(&self) -> bool {
        !self.workflows.is_empty()
    }

    /// Runs to display, never more than [`WORKFLOW_DISPLAY_LIMIT`].
    pub fn visible_workflows(&self) -> &[WorkflowRun] {
        let end = self.workflows.len().min(WORKFLOW_DISPLAY_LIMIT);
        &self.workflows[..end]
    }
}

/// Owned container for [`DashboardState`].
#[derive(Debug)]
pub struct StateStore {
    state: DashboardState,
    policy: ReconcilePolicy,
    outstanding: BTreeSet<RequestSeq>,
    last_applied: Option<RequestSeq>,
    notifier: watch::Sender<DashboardState>,
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new(ReconcilePolicy::default())
    }
}

impl StateStore {
    /// Create an empty store with the given reconcile policy.
    pub fn new(policy: ReconcilePolicy) -> Self {
        let (notifier, _) = watch::channel(DashboardState::default());
        Self {
            state: DashboardState::default(),
            policy,
            outstanding: BTreeSet::new(),
            last_applied: None,
            notifier,
        }
    }

    /// Current state.
    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn policy(&self) -> ReconcilePolicy {
        self.policy
    }

    /// Number of primary requests issued but not yet settled.
    pub fn outstanding(&self) -> usize {
        self.outstanding.len()
    }

    /// Subscribe to state changes. The receiver sees the state after every
    /// update that changed it.
    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.notifier.subscribe()
    }

    /// Apply an update event.
    ///
    /// Returns true if the visible state changed.
    pub fn apply(&mut self, update: StateUpdate) -> bool {
        let before = self.state.clone();

        match update {
            StateUpdate::RecordsRequested { seq } => {
                debug!(seq, "records requested");
                self.outstanding.insert(seq);
            }
            StateUpdate::RecordsSettled { seq, outcome } => {
                self.outstanding.remove(&seq);
                self.settle_records(seq, outcome);
            }
            StateUpdate::WorkflowsSettled { outcome } => match outcome {
                Ok(mut runs) => {
                    runs.truncate(WORKFLOW_DISPLAY_LIMIT);
                    debug!(count = runs.len(), "workflow runs applied");
                    self.state.workflows = runs;
                }
                Err(err) => {
                    warn!(kind = err.kind(), error = %err, "workflow fetch failed");
                }
            },
        }

        self.state.is_loading = !self.outstanding.is_empty();

        let changed = self.state != before;
        if changed {
            self.notifier.send_replace(self.state.clone());
        }
        changed
    }

    fn settle_records(&mut self, seq: RequestSeq, outcome: Result<Vec<Record>, FetchError>) {
        let stale = self.policy == ReconcilePolicy::LatestRequest
            && self.last_applied.is_some_and(|last| seq < last);
        if stale {
            debug!(seq, last_applied = ?self.last_applied, "dropping stale records response");
            return;
        }

        self.last_applied = Some(seq);
        self.state.connectivity = ConnectivityStatus::classify(Some(&outcome));

        match outcome {
            Ok(records) => {
                debug!(seq, count = records.len(), "records applied");
                self.state.records = records;
                self.state.records_updated_at = Some(Utc::now());
            }
            Err(err) => {
                warn!(seq, kind = err.kind(), error = %err, "records fetch failed");
            }
        }
    }
}
