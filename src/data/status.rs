//! Backend connectivity classification.

use serde::Serialize;

/// Tri-state backend reachability flag.
///
/// Starts at [`ConnectivityStatus::Checking`] and only moves when a primary
/// data fetch settles. The workflow provider never touches it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectivityStatus {
    #[default]
    Checking,
    Online,
    Offline,
}

impl ConnectivityStatus {
    /// Classify the outcome of a primary data fetch.
    ///
    /// `None` means no fetch has settled yet.
    pub fn classify<T, E>(outcome: Option<&Result<T, E>>) -> Self {
        match outcome {
            None => ConnectivityStatus::Checking,
            Some(Ok(_)) => ConnectivityStatus::Online,
            Some(Err(_)) => ConnectivityStatus::Offline,
        }
    }

    /// Returns the display label.
    pub fn label(&self) -> &'static str {
        match self {
            ConnectivityStatus::Checking => "Checking",
            ConnectivityStatus::Online => "Online",
            ConnectivityStatus::Offline => "Offline",
        }
    }

    pub fn is_online(&self) -> bool {
        *self == ConnectivityStatus::Online
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;

    #[test]
    fn test_classify() {
        let ok: Result<Vec<u8>, FetchError> = Ok(vec![]);
        let status: Result<Vec<u8>, FetchError> = Err(FetchError::Status(500));
        let parse: Result<Vec<u8>, FetchError> = Err(FetchError::Malformed("eof".into()));
        let net: Result<Vec<u8>, FetchError> = Err(FetchError::Transport("refused".into()));

        assert_eq!(
            ConnectivityStatus::classify::<Vec<u8>, FetchError>(None),
            ConnectivityStatus::Checking
        );
        assert_eq!(ConnectivityStatus::classify(Some(&ok)), ConnectivityStatus::Online);
        assert_eq!(ConnectivityStatus::classify(Some(&status)), ConnectivityStatus::Offline);
        assert_eq!(ConnectivityStatus::classify(Some(&parse)), ConnectivityStatus::Offline);
        assert_eq!(ConnectivityStatus::classify(Some(&net)), ConnectivityStatus::Offline);
    }

    #[test]
    fn test_default_is_checking() {
        assert_eq!(ConnectivityStatus::default(), ConnectivityStatus::Checking);
        assert_eq!(ConnectivityStatus::default().label(), "Checking");
    }

    #[test]
    fn test_serializes_lowercase() {
        let json = serde_json::to_string(&ConnectivityStatus::Offline).unwrap();
        assert_eq!(json, "\"offline\"");
    }
}
