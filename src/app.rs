//! Application state and navigation logic.

use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::info;

use crate::data::{DashboardState, ReconcilePolicy, StateStore};
use crate::refresh::{Dashboard, RefreshPhase};
use crate::ui::Theme;

/// How long a status message stays in the status bar.
const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(3);

/// The current view/tab in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Status cards, recent workflow runs and the live record table.
    Dashboard,
    /// Deployment architecture and technology stack.
    Stack,
}

impl View {
    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Dashboard => View::Stack,
            View::Stack => View::Dashboard,
        }
    }

    /// Cycle to the previous view. With two views this is the same as next.
    pub fn prev(self) -> Self {
        self.next()
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::Stack => "Stack",
        }
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,

    dashboard: Dashboard,
    store: StateStore,

    // Navigation state
    pub selected_record_index: usize,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App driving the given dashboard.
    pub fn new(dashboard: Dashboard, policy: ReconcilePolicy) -> Self {
        Self::with_theme(dashboard, policy, Theme::auto_detect())
    }

    /// Create a new App with an explicit theme.
    pub fn with_theme(dashboard: Dashboard, policy: ReconcilePolicy, theme: Theme) -> Self {
        Self {
            running: true,
            current_view: View::Dashboard,
            show_help: false,
            dashboard,
            store: StateStore::new(policy),
            selected_record_index: 0,
            theme,
            status_message: None,
        }
    }

    /// The state the views render.
    pub fn state(&self) -> &DashboardState {
        self.store.state()
    }

    /// Current phase of the primary data refresh.
    pub fn phase(&self) -> RefreshPhase {
        RefreshPhase::of(&self.store)
    }

    /// Description of both providers, for the status line.
    pub fn source_description(&self) -> String {
        format!(
            "{} | {}",
            self.dashboard.records_description(),
            self.dashboard.workflows_description()
        )
    }

    /// Start the initial load. Only the first call has any effect.
    pub fn mount(&mut self) {
        self.dashboard.mount(&mut self.store);
    }

    /// Issue another primary data request.
    pub fn refresh(&mut self) {
        let seq = self.dashboard.request_refresh(&mut self.store);
        info!(seq, "manual refresh");
    }

    /// Apply every provider result that has arrived.
    ///
    /// Returns true if the state changed.
    pub fn poll_updates(&mut self) -> bool {
        let changed = self.dashboard.poll(&mut self.store);
        if changed {
            self.clamp_selection();
        }
        changed
    }

    fn clamp_selection(&mut self) {
        let max = self.state().records.len().saturating_sub(1);
        if self.selected_record_index > max {
            self.selected_record_index = max;
        }
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired.
    pub fn get_status_message(&self) -> Option<&str> {
        match &self.status_message {
            Some((msg, time)) if time.elapsed() < STATUS_MESSAGE_TTL => Some(msg),
            _ => None,
        }
    }

    /// Switch to the next view.
    pub fn next_view(&mut self) {
        self.current_view = self.current_view.next();
    }

    /// Switch to the previous view.
    pub fn prev_view(&mut self) {
        self.current_view = self.current_view.prev();
    }

    /// Switch to a specific view.
    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
    }

    /// Move selection down by one record.
    pub fn select_next(&mut self) {
        self.select_next_n(1);
    }

    /// Move selection up by one record.
    pub fn select_prev(&mut self) {
        self.select_prev_n(1);
    }

    /// Move selection down by n records.
    pub fn select_next_n(&mut self, n: usize) {
        if self.current_view != View::Dashboard {
            return;
        }
        let max = self.state().records.len().saturating_sub(1);
        self.selected_record_index = (self.selected_record_index + n).min(max);
    }

    /// Move selection up by n records.
    pub fn select_prev_n(&mut self, n: usize) {
        if self.current_view != View::Dashboard {
            return;
        }
        self.selected_record_index = self.selected_record_index.saturating_sub(n);
    }

    /// Jump to the first record.
    pub fn select_first(&mut self) {
        self.selected_record_index = 0;
    }

    /// Jump to the last record.
    pub fn select_last(&mut self) {
        self.selected_record_index = self.state().records.len().saturating_sub(1);
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export the current dashboard state to a JSON file.
    pub fn export_state(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self.state())?;
        let mut file = std::fs::File::create(path)?;
        file.write_all(json.as_bytes())?;

        info!(path = %path.display(), "exported dashboard state");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::runtime::Handle;

    use crate::data::{ConnectivityStatus, Record, StateUpdate};
    use crate::error::FetchError;
    use crate::source::test_support::{FixedRecords, FixedWorkflows};

    fn records(n: i64) -> Vec<Record> {
        (1..=n)
            .map(|i| Record::new(i, format!("svc-{}", i), "active"))
            .collect()
    }

    fn app(outcome: Result<Vec<Record>, FetchError>) -> App {
        let dashboard = Dashboard::new(
            FixedRecords::new(outcome),
            FixedWorkflows::new(Ok(vec![])),
            Handle::current(),
        );
        App::with_theme(dashboard, ReconcilePolicy::default(), Theme::dark())
    }

    async fn settle(app: &mut App) {
        while app.phase() == RefreshPhase::Loading {
            tokio::task::yield_now().await;
            app.poll_updates();
        }
    }

    #[test]
    fn test_view_cycle() {
        assert_eq!(View::Dashboard.next(), View::Stack);
        assert_eq!(View::Stack.next(), View::Dashboard);
        assert_eq!(View::Dashboard.prev(), View::Stack);
        assert_eq!(View::Stack.label(), "Stack");
    }

    #[tokio::test]
    async fn test_mount_loads_records() {
        let mut app = app(Ok(records(3)));
        assert_eq!(app.state().connectivity, ConnectivityStatus::Checking);

        app.mount();
        assert!(app.state().is_loading);

        settle(&mut app).await;
        assert_eq!(app.state().records.len(), 3);
        assert_eq!(app.state().connectivity, ConnectivityStatus::Online);
        assert!(!app.state().is_loading);
    }

    #[tokio::test]
    async fn test_navigation_is_clamped() {
        let mut app = app(Ok(records(4)));
        app.mount();
        settle(&mut app).await;

        app.select_prev();
        assert_eq!(app.selected_record_index, 0);

        app.select_next_n(10);
        assert_eq!(app.selected_record_index, 3);

        app.select_first();
        assert_eq!(app.selected_record_index, 0);

        app.select_last();
        assert_eq!(app.selected_record_index, 3);

        app.set_view(View::Stack);
        app.select_prev();
        assert_eq!(app.selected_record_index, 3);
    }

    #[tokio::test]
    async fn test_refresh_with_fewer_records_clamps_selection() {
        let mut app = app(Ok(records(2)));
        app.mount();
        settle(&mut app).await;
        app.select_last();
        assert_eq!(app.selected_record_index, 1);

        app.store.apply(StateUpdate::RecordsRequested { seq: 10 });
        app.store.apply(StateUpdate::RecordsSettled {
            seq: 10,
            outcome: Ok(records(1)),
        });
        app.clamp_selection();
        assert_eq!(app.selected_record_index, 0);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_records() {
        let mut app = app(Err(FetchError::Status(503)));
        app.mount();
        settle(&mut app).await;

        assert!(app.state().records.is_empty());
        assert_eq!(app.state().connectivity, ConnectivityStatus::Offline);
        assert!(app.state().shows_empty_state());
    }

    #[tokio::test]
    async fn test_export_state() {
        let mut app = app(Ok(records(2)));
        app.mount();
        settle(&mut app).await;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");
        app.export_state(&path).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["connectivity"], "online");
        assert_eq!(json["is_loading"], false);
        assert_eq!(json["records"].as_array().unwrap().len(), 2);
        assert_eq!(json["records"][0]["name"], "svc-1");
    }

    #[test]
    fn test_status_message() {
        let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let dashboard = Dashboard::new(
            FixedRecords::new(Ok(vec![])),
            FixedWorkflows::new(Ok(vec![])),
            rt.handle().clone(),
        );
        let mut app = App::with_theme(dashboard, ReconcilePolicy::default(), Theme::light());
        assert!(app.get_status_message().is_none());

        app.set_status_message("Exported".to_string());
        assert_eq!(app.get_status_message(), Some("Exported"));

        app.status_message = Some(("old".to_string(), Instant::now() - Duration::from_secs(5)));
        assert!(app.get_status_message().is_none());

        app.toggle_help();
        assert!(app.show_help);
        app.quit();
        assert!(!app.running);
    }
}
