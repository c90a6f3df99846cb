//! AuthBackend trait definition.

use async_trait::async_trait;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::auth::{AuthError, AuthEvent, LoginResult, RegistrationResult, Role, Session};

/// Remote auth service as seen by [`AuthStore`](crate::auth::AuthStore).
///
/// Implementations own the session token and emit an [`AuthEvent`] whenever
/// it changes (sign-in, sign-out, refresh).
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Current session, `None` when nobody is signed in.
    async fn get_session(&self) -> Result<Option<Session>, AuthError>;

    /// Point lookup in the role table. `Ok(None)` when the user has no row.
    async fn get_user_role(&self, user_id: Uuid) -> Result<Option<Role>, AuthError>;

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<RegistrationResult, AuthError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<LoginResult, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Subscribe to auth-state change notifications.
    fn subscribe(&self) -> broadcast::Receiver<AuthEvent>;
}
