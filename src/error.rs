//! Error types for the data providers.

use thiserror::Error;

/// Errors a provider call can settle with.
///
/// Every variant is recoverable: the primary provider turns any of them into
/// an offline status, the workflow provider swallows them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Connection refused, reset, DNS failure and the like.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The per-request timeout elapsed.
    #[error("Request timed out")]
    Timeout,

    /// The endpoint answered outside the 2xx range.
    #[error("Endpoint returned status {0}")]
    Status(u16),

    /// The body was not JSON, or lacked the expected field.
    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl FetchError {
    /// Short label used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Transport(_) => "transport",
            FetchError::Timeout => "timeout",
            FetchError::Status(_) => "status",
            FetchError::Malformed(_) => "malformed",
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_decode() {
            FetchError::Malformed(err.to_string())
        } else if let Some(status) = err.status() {
            FetchError::Status(status.as_u16())
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Malformed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(FetchError::Status(503).to_string(), "Endpoint returned status 503");
        assert_eq!(FetchError::Timeout.to_string(), "Request timed out");
        assert!(FetchError::Transport("refused".into()).to_string().contains("refused"));
    }

    #[test]
    fn test_from_serde_error_is_malformed() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let fetch: FetchError = err.into();
        assert_eq!(fetch.kind(), "malformed");
    }
}
