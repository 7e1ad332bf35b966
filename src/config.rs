//! Runtime settings.
//!
//! Loaded with the `config` crate, lowest precedence first:
//!
//! 1. built-in defaults
//! 2. `BACKEND_URL` (the variable the reverse proxy deployment already uses)
//! 3. an optional TOML file
//! 4. `OPSBOARD_*` environment variables (e.g. `OPSBOARD_REPOSITORY`)
//! 5. explicit overrides (command line flags)
//!
//! ```toml
//! backend_url = "http://127.0.0.1:5000"
//! repository = "HimanM/DevOps-Project-1"
//! request_timeout_secs = 10
//! reconcile_policy = "latest-request"
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;

use crate::data::ReconcilePolicy;
use crate::error::FetchError;
use crate::source::{
    HttpRecordProvider, HttpWorkflowProvider, RecordProvider, WorkflowProvider,
    DEFAULT_USER_AGENT,
};

/// Errors raised while loading or applying settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Repository must be \"owner/repo\", got \"{0}\"")]
    InvalidRepository(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] FetchError),
}

/// Values that outrank every other source (command line flags).
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub backend_url: Option<String>,
    pub ci_api_base: Option<String>,
    pub repository: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub log_file: Option<PathBuf>,
}

/// Resolved dashboard settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// Backend origin the record provider talks to.
    pub backend_url: String,
    /// Path of the record list endpoint.
    pub data_path: String,
    /// CI provider API origin.
    pub ci_api_base: String,
    /// CI repository as "owner/repo".
    pub repository: String,
    /// Per-request timeout in seconds, 0 disables it.
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub reconcile_policy: ReconcilePolicy,
    /// Where to write logs in interactive mode.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Settings {
    /// Load settings from the process environment and an optional file.
    pub fn load(file: Option<&Path>, overrides: &Overrides) -> Result<Self, SettingsError> {
        Self::from_sources(file, None, overrides)
    }

    /// Load settings with an explicit environment map instead of the process
    /// environment. `None` reads the real environment.
    pub fn from_sources(
        file: Option<&Path>,
        env: Option<HashMap<String, String>>,
        overrides: &Overrides,
    ) -> Result<Self, SettingsError> {
        let backend_url_env = match &env {
            Some(map) => map.get("BACKEND_URL").cloned(),
            None => std::env::var("BACKEND_URL").ok(),
        };

        let mut builder = Config::builder()
            .set_default("backend_url", "http://127.0.0.1:5000")?
            .set_default("data_path", "/api/data")?
            .set_default("ci_api_base", "https://api.github.com")?
            .set_default("repository", "HimanM/DevOps-Project-1")?
            .set_default("request_timeout_secs", 10)?
            .set_default("user_agent", DEFAULT_USER_AGENT)?
            .set_default("reconcile_policy", "latest-request")?;

        if let Some(url) = backend_url_env {
            builder = builder.set_default("backend_url", url)?;
        }

        if let Some(path) = file {
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(Environment::with_prefix("OPSBOARD").source(env));

        builder = builder
            .set_override_option("backend_url", overrides.backend_url.clone())?
            .set_override_option("ci_api_base", overrides.ci_api_base.clone())?
            .set_override_option("repository", overrides.repository.clone())?
            .set_override_option("request_timeout_secs", overrides.request_timeout_secs)?
            .set_override_option(
                "log_file",
                overrides
                    .log_file
                    .as_ref()
                    .map(|p| p.to_string_lossy().into_owned()),
            )?;

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        match self.repository.split_once('/') {
            Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
                Ok(())
            }
            _ => Err(SettingsError::InvalidRepository(self.repository.clone())),
        }
    }

    /// The per-request timeout (zero means none).
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Build the record provider described by these settings.
    pub fn record_provider(&self) -> Result<Arc<dyn RecordProvider>, SettingsError> {
        let provider = HttpRecordProvider::builder()
            .base_url(&self.backend_url)
            .path(&self.data_path)
            .timeout(self.request_timeout())
            .user_agent(&self.user_agent)
            .build()?;
        Ok(Arc::new(provider))
    }

    /// Build the workflow provider described by these settings.
    pub fn workflow_provider(&self) -> Result<Arc<dyn WorkflowProvider>, SettingsError> {
        let provider = HttpWorkflowProvider::builder()
            .api_base(&self.ci_api_base)
            .repository(&self.repository)
            .timeout(self.request_timeout())
            .user_agent(&self.user_agent)
            .build()?;
        Ok(Arc::new(provider))
    }
}
