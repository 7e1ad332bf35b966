//! Data models and the dashboard state container.
//!
//! ## Submodules
//!
//! - [`model`]: Domain records ([`Record`], [`WorkflowRun`])
//! - [`status`]: The connectivity classifier ([`ConnectivityStatus`])
//! - [`state`]: [`DashboardState`], its update events and the owning [`StateStore`]
//!
//! ## Data Flow
//!
//! ```text
//! RecordProvider ──▶ StateUpdate::RecordsSettled ──┐
//!                                                  ├──▶ StateStore::apply() ──▶ DashboardState
//! WorkflowProvider ─▶ StateUpdate::WorkflowsSettled┘            │
//!                                                               └──▶ watch subscribers
//! ```

pub mod model;
pub mod state;
pub mod status;

pub use model::{Record, RunOutcome, WorkflowRun};
pub use state::{
    DashboardState, ReconcilePolicy, RequestSeq, StateStore, StateUpdate, WORKFLOW_DISPLAY_LIMIT,
};
pub use status::ConnectivityStatus;
