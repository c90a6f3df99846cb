//! [`AuthBackend`] over the marketplace's REST auth endpoints.
//!
//! - register: `POST <auth_url>`
//! - login: `PUT <auth_url>`
//! - logout: `DELETE <auth_url>`
//! - session check: `GET <session_url>` with the bearer token
//! - role lookup: `GET <roles_url>?user_id=eq.<id>&select=role`

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use jiff::Timestamp;
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::broadcast;
use tracing::{debug, info};
use uuid::Uuid;

use crate::auth::types::AuthEnvelope;
use crate::auth::{
    AuthBackend, AuthError, AuthEvent, LoginResult, RegistrationResult, Role, Session,
};
use crate::config::settings::BackendConfig;
use crate::external::{HttpTransport, RequestOptions, TransportResponse};

const EVENT_CAPACITY: usize = 16;

/// Absolute URLs of the auth endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthEndpoints {
    pub auth_url: String,
    pub session_url: String,
    pub roles_url: String,
}

impl AuthEndpoints {
    pub fn from_config(config: &BackendConfig) -> Self {
        Self {
            auth_url: config.url(&config.auth_path),
            session_url: config.url(&config.session_path),
            roles_url: config.url(&config.roles_path),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RoleRow {
    role: String,
}

/// REST implementation of [`AuthBackend`].
///
/// Holds the current session in memory and broadcasts an [`AuthEvent`] on
/// every successful sign-in or sign-out.
pub struct HttpAuthBackend {
    transport: Arc<dyn HttpTransport>,
    endpoints: AuthEndpoints,
    session: RwLock<Option<Session>>,
    events: broadcast::Sender<AuthEvent>,
}

impl HttpAuthBackend {
    pub fn new(transport: Arc<dyn HttpTransport>, endpoints: AuthEndpoints) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            transport,
            endpoints,
            session: RwLock::new(None),
            events,
        }
    }

    pub fn endpoints(&self) -> &AuthEndpoints {
        &self.endpoints
    }

    /// Seed a previously issued session. The next
    /// [`get_session`](AuthBackend::get_session) validates it remotely.
    pub fn restore_session(&self, session: Session) {
        self.store_session(Some(session));
    }

    pub fn current_session(&self) -> Option<Session> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn store_session(&self, session: Option<Session>) {
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = session;
    }

    fn emit(&self, event: AuthEvent) {
        let name = event.name();
        if self.events.send(event).is_err() {
            debug!(event = name, "auth event dropped, no subscribers");
        }
    }

    fn authorized(&self, options: RequestOptions) -> RequestOptions {
        match self.current_session() {
            Some(session) => options.bearer(&session.access_token),
            None => options,
        }
    }

    async fn send(&self, url: &str, options: RequestOptions) -> Result<TransportResponse, AuthError> {
        Ok(self.transport.execute(url, &options).await?)
    }

    fn parse_envelope(response: &TransportResponse) -> Result<AuthEnvelope, AuthError> {
        Ok(response.json::<Option<AuthEnvelope>>()?.unwrap_or_default())
    }

    /// Turn a non-2xx response into an error carrying the backend's message.
    fn rejection(response: &TransportResponse) -> AuthError {
        let envelope = response.json::<AuthEnvelope>().ok();
        let message = envelope
            .as_ref()
            .and_then(|e| e.error.clone().or_else(|| e.message.clone()))
            .or_else(|| {
                let body = response.body.trim();
                (envelope.is_none() && !body.is_empty()).then(|| body.to_string())
            })
            .unwrap_or_else(|| {
                response
                    .status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            });

        if response.status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = envelope
                .and_then(|e| e.retry_after)
                .or_else(|| retry_after_header(&response.headers))
                .map(Duration::from_secs);
            AuthError::RateLimited {
                message,
                retry_after,
            }
        } else {
            AuthError::Rejected {
                status: response.status,
                message,
            }
        }
    }
}

/// `Retry-After` in its delay-seconds form.
fn retry_after_header(headers: &HeaderMap) -> Option<u64> {
    headers.get(RETRY_AFTER)?.to_str().ok()?.trim().parse().ok()
}

#[async_trait]
impl AuthBackend for HttpAuthBackend {
    async fn get_session(&self) -> Result<Option<Session>, AuthError> {
        let Some(session) = self.current_session() else {
            return Ok(None);
        };
        if session.is_expired_at(Timestamp::now()) {
            debug!("stored session expired");
            self.store_session(None);
            return Ok(None);
        }

        let response = self
            .send(
                &self.endpoints.session_url,
                RequestOptions::get().bearer(&session.access_token),
            )
            .await?;

        if response.status == StatusCode::UNAUTHORIZED {
            debug!("stored session rejected by backend");
            self.store_session(None);
            return Ok(None);
        }
        if !response.is_success() {
            return Err(Self::rejection(&response));
        }

        let session = Self::parse_envelope(&response)?.session;
        self.store_session(session.clone());
        Ok(session)
    }

    async fn get_user_role(&self, user_id: Uuid) -> Result<Option<Role>, AuthError> {
        let url = format!(
            "{}?user_id=eq.{}&select=role",
            self.endpoints.roles_url, user_id
        );
        let response = self.send(&url, self.authorized(RequestOptions::get())).await?;
        if !response.is_success() {
            return Err(Self::rejection(&response));
        }

        let rows: Vec<RoleRow> = response.json::<Option<Vec<RoleRow>>>()?.unwrap_or_default();
        Ok(rows.first().and_then(|row| row.role.parse().ok()))
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<RegistrationResult, AuthError> {
        let body = json!({ "email": email, "password": password, "role": role });
        let response = self
            .send(&self.endpoints.auth_url, RequestOptions::post(body))
            .await?;
        if !response.is_success() {
            return Err(Self::rejection(&response));
        }

        let envelope = Self::parse_envelope(&response)?;
        let role = envelope.parsed_role();
        if let Some(session) = envelope.session {
            info!(user_id = %session.user.id, "registered and signed in");
            self.store_session(Some(session.clone()));
            self.emit(AuthEvent::SignedIn(session));
        }

        Ok(RegistrationResult {
            message: envelope
                .message
                .unwrap_or_else(|| "Registration successful".to_string()),
            user: envelope.user,
            role,
        })
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<LoginResult, AuthError> {
        let body = json!({ "email": email, "password": password });
        let response = self
            .send(&self.endpoints.auth_url, RequestOptions::put(body))
            .await?;
        if !response.is_success() {
            return Err(Self::rejection(&response));
        }

        let envelope = Self::parse_envelope(&response)?;
        let role = envelope.parsed_role();
        if let Some(session) = &envelope.session {
            info!(user_id = %session.user.id, "signed in");
            self.store_session(Some(session.clone()));
            self.emit(AuthEvent::SignedIn(session.clone()));
        }

        Ok(LoginResult {
            message: envelope
                .message
                .unwrap_or_else(|| "Login successful".to_string()),
            user: envelope.user,
            session: envelope.session,
            role,
        })
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let response = self
            .send(
                &self.endpoints.auth_url,
                self.authorized(RequestOptions::delete()),
            )
            .await?;
        if !response.is_success() {
            return Err(Self::rejection(&response));
        }

        info!("signed out");
        self.store_session(None);
        self.emit(AuthEvent::SignedOut);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }
}
