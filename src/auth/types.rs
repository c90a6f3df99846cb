//! Identity types exchanged with the auth backend.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::Role;

/// Authenticated user as issued by the auth backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

/// Opaque session issued by the auth backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Expiry as unix seconds.
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: User,
}

impl Session {
    /// Whether the session has expired at `now`. Sessions without an expiry
    /// never expire locally.
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        self.expires_at
            .is_some_and(|expires_at| now.as_second() >= expires_at)
    }
}

/// Auth-state change notification from the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthEvent {
    SignedIn(Session),
    SignedOut,
    TokenRefreshed(Session),
    UserUpdated(Session),
}

impl AuthEvent {
    /// Session carried by the event, `None` when the user is signed out.
    pub fn session(&self) -> Option<&Session> {
        match self {
            AuthEvent::SignedIn(session)
            | AuthEvent::TokenRefreshed(session)
            | AuthEvent::UserUpdated(session) => Some(session),
            AuthEvent::SignedOut => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AuthEvent::SignedIn(_) => "signed_in",
            AuthEvent::SignedOut => "signed_out",
            AuthEvent::TokenRefreshed(_) => "token_refreshed",
            AuthEvent::UserUpdated(_) => "user_updated",
        }
    }
}

/// Outcome of a successful registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationResult {
    pub message: String,
    pub user: Option<User>,
    pub role: Option<Role>,
}

/// Outcome of a successful login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResult {
    pub message: String,
    pub user: Option<User>,
    pub session: Option<Session>,
    pub role: Option<Role>,
}

/// JSON envelope returned by the register/login/logout endpoints.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct AuthEnvelope {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub session: Option<Session>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    /// Seconds to wait before retrying a rate-limited request.
    #[serde(default)]
    pub retry_after: Option<u64>,
}

impl AuthEnvelope {
    /// Role field, ignoring values outside the known set.
    pub fn parsed_role(&self) -> Option<Role> {
        self.role.as_deref().and_then(|r| r.parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn session(expires_at: Option<i64>) -> Session {
        Session {
            access_token: "token".into(),
            refresh_token: None,
            expires_at,
            user: User {
                id: Uuid::nil(),
                email: None,
                created_at: None,
            },
        }
    }

    #[test]
    fn test_session_expiry() {
        let now = Timestamp::from_second(1_000).unwrap();
        assert!(!session(None).is_expired_at(now));
        assert!(!session(Some(1_001)).is_expired_at(now));
        assert!(session(Some(1_000)).is_expired_at(now));
    }

    #[test]
    fn test_event_session() {
        assert!(AuthEvent::SignedOut.session().is_none());
        assert!(AuthEvent::SignedIn(session(None)).session().is_some());
        assert_eq!(AuthEvent::TokenRefreshed(session(None)).name(), "token_refreshed");
    }

    #[test]
    fn test_envelope_parses_login_payload() {
        let envelope: AuthEnvelope = serde_json::from_value(json!({
            "message": "Login successful",
            "user": {
                "id": "8d3c1f5e-3f7a-4e55-9a55-2b7e9f0c1a11",
                "email": "a@test.com",
                "created_at": "2024-05-01T10:00:00Z"
            },
            "session": {
                "access_token": "jwt",
                "refresh_token": "refresh",
                "expires_at": 1714560000,
                "user": {"id": "8d3c1f5e-3f7a-4e55-9a55-2b7e9f0c1a11"}
            },
            "role": "influencer"
        }))
        .unwrap();

        assert_eq!(envelope.message.as_deref(), Some("Login successful"));
        assert_eq!(envelope.parsed_role(), Some(Role::Influencer));
        assert_eq!(envelope.session.unwrap().access_token, "jwt");
        assert!(envelope.user.unwrap().created_at.is_some());
    }

    #[test]
    fn test_envelope_ignores_unknown_role() {
        let envelope: AuthEnvelope =
            serde_json::from_value(json!({"role": "superuser"})).unwrap();
        assert_eq!(envelope.parsed_role(), None);
    }
}
