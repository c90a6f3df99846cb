//! Auth error types.

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

use crate::cache::FetchError;

/// Errors returned by the auth backend and [`AuthStore`](crate::auth::AuthStore).
///
/// Backend rejections display exactly the backend's message so callers can
/// show it (or map it to localized copy) without unwrapping anything.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The backend refused the request (bad credentials, duplicate email,
    /// weak password, malformed email, ...).
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    /// HTTP 429. `retry_after` comes from the structured error payload or
    /// the `Retry-After` header.
    #[error("{message}")]
    RateLimited {
        message: String,
        retry_after: Option<Duration>,
    },

    /// The request never produced a response.
    #[error("Auth request failed: {0}")]
    Transport(String),

    /// The backend answered 2xx with a body that could not be understood.
    #[error("Invalid auth response: {0}")]
    InvalidResponse(String),
}

impl AuthError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            AuthError::Rejected { status, .. } => Some(*status),
            AuthError::RateLimited { .. } => Some(StatusCode::TOO_MANY_REQUESTS),
            _ => None,
        }
    }

    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            AuthError::RateLimited { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

impl From<FetchError> for AuthError {
    fn from(error: FetchError) -> Self {
        match error {
            FetchError::Status { status, body } => AuthError::Rejected {
                status,
                message: body,
            },
            FetchError::Transport(message) => AuthError::Transport(message),
            FetchError::Decode(message) => AuthError::InvalidResponse(message),
        }
    }
}
