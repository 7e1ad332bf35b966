//! Refresh trigger.
//!
//! [`Dashboard`] issues provider calls on the tokio runtime and delivers
//! their settlement back to the owner of the [`StateStore`] as
//! [`StateUpdate`] events over an mpsc channel. The store is only ever
//! mutated by the caller, on the caller's thread.
//!
//! ```text
//!   mount / 'r' ──▶ request_refresh() ──▶ RecordsRequested (applied now)
//!                          │
//!                          └──▶ spawn(fetch_records) ──▶ RecordsSettled ──┐
//!   mount ────────▶ spawn(fetch_workflow_runs) ──▶ WorkflowsSettled ──────┤
//!                                                                        ▼
//!                                                         poll() / apply_next()
//! ```

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::data::{DashboardState, ReconcilePolicy, RequestSeq, StateStore, StateUpdate};
use crate::source::{RecordProvider, WorkflowProvider};

/// Phase of the primary data refresh state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshPhase {
    /// No primary request outstanding.
    Idle,
    /// At least one primary request outstanding.
    Loading,
}

impl RefreshPhase {
    /// Phase implied by the store's outstanding requests.
    pub fn of(store: &StateStore) -> Self {
        if store.outstanding() > 0 {
            RefreshPhase::Loading
        } else {
            RefreshPhase::Idle
        }
    }
}

/// Drives both providers and feeds their outcomes to a [`StateStore`].
#[derive(Debug)]
pub struct Dashboard {
    records: Arc<dyn RecordProvider>,
    workflows: Arc<dyn WorkflowProvider>,
    runtime: Handle,
    updates_tx: mpsc::UnboundedSender<StateUpdate>,
    updates_rx: mpsc::UnboundedReceiver<StateUpdate>,
    next_seq: RequestSeq,
    mounted: bool,
    workflows_pending: bool,
}

impl Dashboard {
    /// Create a dashboard that spawns provider calls on `runtime`.
    pub fn new(
        records: Arc<dyn RecordProvider>,
        workflows: Arc<dyn WorkflowProvider>,
        runtime: Handle,
    ) -> Self {
        let (updates_tx, updates_rx) = mpsc::unbounded_channel();
        Self {
            records,
            workflows,
            runtime,
            updates_tx,
            updates_rx,
            next_seq: 0,
            mounted: false,
            workflows_pending: false,
        }
    }

    /// Description of the record provider.
    pub fn records_description(&self) -> &str {
        self.records.description()
    }

    /// Description of the workflow provider.
    pub fn workflows_description(&self) -> &str {
        self.workflows.description()
    }

    /// Initial load: one records request and the one-off workflow request,
    /// issued independently. Only the first call has any effect.
    pub fn mount(&mut self, store: &mut StateStore) {
        if self.mounted {
            debug!("dashboard already mounted");
            return;
        }
        self.mounted = true;

        info!(
            records = self.records.description(),
            workflows = self.workflows.description(),
            "mounting dashboard"
        );
        self.request_refresh(store);
        self.fetch_workflows();
    }

    /// Issue a primary data request.
    ///
    /// Never blocked by a request already in flight. The store enters the
    /// loading state before this returns.
    pub fn request_refresh(&mut self, store: &mut StateStore) -> RequestSeq {
        self.next_seq += 1;
        let seq = self.next_seq;

        store.apply(StateUpdate::RecordsRequested { seq });

        let provider = Arc::clone(&self.records);
        let tx = self.updates_tx.clone();
        self.runtime.spawn(async move {
            let outcome = provider.fetch_records().await;
            debug!(seq, ok = outcome.is_ok(), "records request settled");
            // Receiver gone means the view was torn down
            let _ = tx.send(StateUpdate::RecordsSettled { seq, outcome });
        });

        seq
    }

    fn fetch_workflows(&mut self) {
        self.workflows_pending = true;

        let provider = Arc::clone(&self.workflows);
        let tx = self.updates_tx.clone();
        self.runtime.spawn(async move {
            let outcome = provider.fetch_workflow_runs().await;
            debug!(ok = outcome.is_ok(), "workflow request settled");
            let _ = tx.send(StateUpdate::WorkflowsSettled { outcome });
        });
    }

    /// Whether any request (primary or workflow) is still in flight.
    pub fn is_settled(&self, store: &StateStore) -> bool {
        store.outstanding() == 0 && !self.workflows_pending
    }

    /// Apply every update that has arrived so far, without blocking.
    ///
    /// Returns true if the state changed.
    pub fn poll(&mut self, store: &mut StateStore) -> bool {
        let mut changed = false;
        while let Ok(update) = self.updates_rx.try_recv() {
            changed |= self.dispatch(store, update);
        }
        changed
    }

    /// Wait for the next update and apply it.
    ///
    /// Returns whether the state changed.
    pub async fn apply_next(&mut self, store: &mut StateStore) -> bool {
        match self.updates_rx.recv().await {
            Some(update) => self.dispatch(store, update),
            None => false,
        }
    }

    /// Apply updates until every issued request has settled.
    pub async fn run_until_settled(&mut self, store: &mut StateStore) {
        while !self.is_settled(store) {
            self.apply_next(store).await;
        }
    }

    fn dispatch(&mut self, store: &mut StateStore, update: StateUpdate) -> bool {
        if matches!(update, StateUpdate::WorkflowsSettled { .. }) {
            self.workflows_pending = false;
        }
        store.apply(update)
    }
}

/// Mount once, wait for both providers and return the resulting state.
///
/// Used for headless export. Must be called from within a tokio runtime.
pub async fn fetch_snapshot(
    records: Arc<dyn RecordProvider>,
    workflows: Arc<dyn WorkflowProvider>,
    policy: ReconcilePolicy,
) -> DashboardState {
    let mut store = StateStore::new(policy);
    let mut dashboard = Dashboard::new(records, workflows, Handle::current());

    dashboard.mount(&mut store);
    dashboard.run_until_settled(&mut store).await;

    store.state().clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tokio::sync::oneshot;

    use crate::data::{ConnectivityStatus, Record, WorkflowRun};
    use crate::error::FetchError;
    use crate::source::test_support::{FixedRecords, FixedWorkflows};

    type RecordsOutcome = Result<Vec<Record>, FetchError>;

    /// Each call waits on the next gate, in call order.
    #[derive(Debug)]
    struct GatedRecords {
        gates: Mutex<VecDeque<oneshot::Receiver<RecordsOutcome>>>,
    }

    impl GatedRecords {
        fn new(calls: usize) -> (Arc<Self>, Vec<oneshot::Sender<RecordsOutcome>>) {
            let mut senders = Vec::new();
            let mut gates = VecDeque::new();
            for _ in 0..calls {
                let (tx, rx) = oneshot::channel();
                senders.push(tx);
                gates.push_back(rx);
            }
            let provider = Arc::new(Self {
                gates: Mutex::new(gates),
            });
            (provider, senders)
        }
    }

    #[async_trait]
    impl RecordProvider for GatedRecords {
        async fn fetch_records(&self) -> Result<Vec<Record>, FetchError> {
            let gate = self.gates.lock().unwrap().pop_front();
            match gate {
                Some(rx) => rx
                    .await
                    .unwrap_or_else(|_| Err(FetchError::Transport("gate dropped".into()))),
                None => Err(FetchError::Transport("unexpected call".into())),
            }
        }

        fn description(&self) -> &str {
            "gated records"
        }
    }

    fn run(id: u64) -> WorkflowRun {
        WorkflowRun {
            id,
            name: format!("run-{}", id),
            status: "completed".to_string(),
            conclusion: Some("success".to_string()),
            created_at: "2024-05-01T10:00:00Z".parse().unwrap(),
        }
    }

    fn dashboard(
        records: Arc<dyn RecordProvider>,
        workflows: Arc<dyn WorkflowProvider>,
    ) -> Dashboard {
        Dashboard::new(records, workflows, Handle::current())
    }

    #[tokio::test]
    async fn test_mount_with_healthy_backend() {
        let records = FixedRecords::new(Ok(vec![Record::new(1, "svc-a", "active")]));
        let workflows = FixedWorkflows::new(Ok(vec![run(1)]));
        let mut store = StateStore::default();
        let mut dashboard = dashboard(records, workflows);

        dashboard.mount(&mut store);
        assert!(store.state().is_loading);
        assert_eq!(RefreshPhase::of(&store), RefreshPhase::Loading);

        dashboard.run_until_settled(&mut store).await;

        let state = store.state();
        assert_eq!(state.connectivity, ConnectivityStatus::Online);
        assert_eq!(state.records, vec![Record::new(1, "svc-a", "active")]);
        assert!(!state.is_loading);
        assert_eq!(state.workflows.len(), 1);
        assert_eq!(RefreshPhase::of(&store), RefreshPhase::Idle);
    }

    #[tokio::test]
    async fn test_mount_with_unavailable_backend() {
        let records = FixedRecords::new(Err(FetchError::Status(503)));
        let workflows = FixedWorkflows::new(Ok(vec![]));
        let mut store = StateStore::default();
        let mut dashboard = dashboard(records, workflows);

        dashboard.mount(&mut store);
        dashboard.run_until_settled(&mut store).await;

        let state = store.state();
        assert_eq!(state.connectivity, ConnectivityStatus::Offline);
        assert!(state.records.is_empty());
        assert!(state.shows_empty_state());
        assert!(!state.is_loading);
    }

    #[tokio::test]
    async fn test_workflow_network_error_is_silent() {
        let records = FixedRecords::new(Ok(vec![Record::new(1, "svc-a", "active")]));
        let workflows = FixedWorkflows::new(Err(FetchError::Transport("unreachable".into())));
        let mut store = StateStore::default();
        let mut dashboard = dashboard(records, workflows);

        dashboard.mount(&mut store);
        dashboard.run_until_settled(&mut store).await;

        let state = store.state();
        assert_eq!(state.connectivity, ConnectivityStatus::Online);
        assert!(state.workflows.is_empty());
        assert!(!state.shows_workflows());
    }

    #[tokio::test]
    async fn test_mount_fetches_workflows_once() {
        let records = FixedRecords::new(Ok(vec![]));
        let workflows = FixedWorkflows::new(Ok(vec![run(1)]));
        let mut store = StateStore::default();
        let mut dashboard = dashboard(records, workflows.clone());

        dashboard.mount(&mut store);
        dashboard.mount(&mut store);
        dashboard.request_refresh(&mut store);
        dashboard.run_until_settled(&mut store).await;

        assert_eq!(workflows.calls(), 1);
    }

    #[tokio::test]
    async fn test_refresh_while_loading_is_not_blocked() {
        let (records, gates) = GatedRecords::new(2);
        let workflows = FixedWorkflows::new(Ok(vec![]));
        let mut store = StateStore::default();
        let mut dashboard = dashboard(records, workflows);

        let first = dashboard.request_refresh(&mut store);
        let second = dashboard.request_refresh(&mut store);

        assert_eq!((first, second), (1, 2));
        assert_eq!(store.outstanding(), 2);
        assert!(store.state().is_loading);

        for gate in gates {
            gate.send(Ok(vec![])).unwrap();
        }
        dashboard.run_until_settled(&mut store).await;
        assert!(!store.state().is_loading);
    }

    async fn overlapping_refreshes(policy: ReconcilePolicy) -> DashboardState {
        let (records, mut gates) = GatedRecords::new(2);
        let workflows = FixedWorkflows::new(Ok(vec![]));
        let mut store = StateStore::new(policy);
        let mut dashboard = dashboard(records, workflows);

        dashboard.request_refresh(&mut store);
        dashboard.request_refresh(&mut store);
        // Let both calls pick up their gates in call order
        tokio::task::yield_now().await;

        let first_gate = gates.remove(0);
        let second_gate = gates.remove(0);

        second_gate.send(Ok(vec![Record::new(2, "second", "active")])).unwrap();
        while store.outstanding() > 1 {
            dashboard.apply_next(&mut store).await;
        }
        assert!(store.state().is_loading);

        first_gate.send(Ok(vec![Record::new(1, "first", "active")])).unwrap();
        dashboard.run_until_settled(&mut store).await;

        store.state().clone()
    }

    #[tokio::test]
    async fn test_overlapping_refreshes_latest_request_wins() {
        let state = overlapping_refreshes(ReconcilePolicy::LatestRequest).await;
        assert!(!state.is_loading);
        assert_eq!(state.records, vec![Record::new(2, "second", "active")]);
    }

    #[tokio::test]
    async fn test_overlapping_refreshes_last_settled_wins() {
        let state = overlapping_refreshes(ReconcilePolicy::LastSettled).await;
        assert!(!state.is_loading);
        assert_eq!(state.records, vec![Record::new(1, "first", "active")]);
    }

    #[tokio::test]
    async fn test_poll_applies_arrived_updates() {
        let records = FixedRecords::new(Ok(vec![Record::new(7, "svc", "active")]));
        let workflows = FixedWorkflows::new(Ok(vec![run(3)]));
        let mut store = StateStore::default();
        let mut dashboard = dashboard(records, workflows);

        dashboard.mount(&mut store);
        assert!(!dashboard.is_settled(&store));

        while !dashboard.is_settled(&store) {
            tokio::task::yield_now().await;
            dashboard.poll(&mut store);
        }

        assert_eq!(store.state().records.len(), 1);
        assert_eq!(store.state().workflows.len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_snapshot() {
        let records = FixedRecords::new(Ok(vec![Record::new(1, "svc-a", "active")]));
        let workflows = FixedWorkflows::new(Ok((0..8).map(run).collect()));

        let state = fetch_snapshot(records, workflows, ReconcilePolicy::default()).await;

        assert_eq!(state.connectivity, ConnectivityStatus::Online);
        assert_eq!(state.records.len(), 1);
        assert_eq!(state.workflows.len(), 5);
        assert!(!state.is_loading);
    }
}
