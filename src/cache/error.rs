//! Fetch error types.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors surfaced by [`RequestCache`](crate::cache::RequestCache) and the
/// underlying transport.
///
/// The type is `Clone` because a single failed request is delivered to every
/// caller that joined it while it was in flight.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The backend answered with a status outside the 2xx range.
    #[error("HTTP error! status: {status}")]
    Status { status: StatusCode, body: String },

    /// The request never produced a response (DNS, connect, timeout, ...).
    #[error("Request failed: {0}")]
    Transport(String),

    /// The response body was not the JSON shape the caller asked for.
    #[error("Invalid JSON response: {0}")]
    Decode(String),
}

impl FetchError {
    /// Status code carried by the error, if the backend responded at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        FetchError::Transport(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_carries_code() {
        let err = FetchError::Status {
            status: StatusCode::NOT_FOUND,
            body: String::new(),
        };
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(err.to_string(), "HTTP error! status: 404 Not Found");
    }

    #[test]
    fn test_transport_error_has_no_status() {
        let err = FetchError::Transport("connection refused".into());
        assert_eq!(err.status(), None);
    }
}
