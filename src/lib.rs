//! # opsboard
//!
//! A terminal status dashboard for a small web deployment: it polls the
//! backend's record list, tracks whether the backend is reachable, and shows
//! the CI provider's most recent workflow runs.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Application                          │
//! │  ┌─────────┐    ┌───────────┐    ┌─────────┐    ┌──────────┐ │
//! │  │  app    │───▶│ refresh   │───▶│  data   │───▶│   ui     │ │
//! │  │ (keys)  │    │(Dashboard)│    │ (store) │    │(ratatui) │ │
//! │  └─────────┘    └─────┬─────┘    └─────────┘    └──────────┘ │
//! │                       │                                      │
//! │                       ▼                                      │
//! │                 ┌──────────┐                                 │
//! │                 │  source  │◀── HttpRecordProvider           │
//! │                 │ (input)  │◀── HttpWorkflowProvider         │
//! │                 └──────────┘                                 │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`source`]**: the [`RecordProvider`] and [`WorkflowProvider`] traits and
//!   their HTTP implementations
//! - **[`data`]**: domain records, connectivity classification and the
//!   [`StateStore`] that reconciles provider outcomes into a [`DashboardState`]
//! - **[`refresh`]**: the [`Dashboard`] driver that issues requests and feeds
//!   their results back to the store
//! - **[`app`]** and **[`ui`]**: the interactive terminal front end
//!
//! ## Usage
//!
//! ```bash
//! # Watch a local backend
//! opsboard --backend-url http://127.0.0.1:5000
//!
//! # Fetch once and write the state as JSON
//! opsboard --export state.json
//! ```
//!
//! ### Headless fetch
//!
//! ```no_run
//! use std::sync::Arc;
//! use opsboard::{fetch_snapshot, HttpRecordProvider, HttpWorkflowProvider, ReconcilePolicy};
//!
//! # tokio_test::block_on(async {
//! let records = HttpRecordProvider::builder()
//!     .base_url("http://127.0.0.1:5000")
//!     .build()
//!     .unwrap();
//! let workflows = HttpWorkflowProvider::builder()
//!     .repository("octo/demo")
//!     .build()
//!     .unwrap();
//!
//! let state = fetch_snapshot(
//!     Arc::new(records),
//!     Arc::new(workflows),
//!     ReconcilePolicy::LatestRequest,
//! )
//! .await;
//! println!("{}: {} records", state.connectivity.label(), state.records.len());
//! # });
//! ```
//!
//! ### Following state changes
//!
//! ```
//! use opsboard::{StateStore, StateUpdate};
//!
//! let mut store = StateStore::default();
//! let rx = store.subscribe();
//!
//! store.apply(StateUpdate::RecordsRequested { seq: 1 });
//! assert!(rx.borrow().is_loading);
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod events;
pub mod refresh;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::App;
pub use config::{Overrides, Settings, SettingsError};
pub use data::{
    ConnectivityStatus, DashboardState, ReconcilePolicy, Record, RequestSeq, RunOutcome,
    StateStore, StateUpdate, WorkflowRun, WORKFLOW_DISPLAY_LIMIT,
};
pub use error::FetchError;
pub use refresh::{fetch_snapshot, Dashboard, RefreshPhase};
pub use source::{HttpRecordProvider, HttpWorkflowProvider, RecordProvider, WorkflowProvider};
