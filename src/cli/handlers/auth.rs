//! Register and login commands.

use serde_json::{Value, json};

use super::catalog::to_json;
use crate::auth::Role;
use crate::error::AppResult;
use crate::state::AppState;

/// Handler for account commands
pub struct AuthCommandHandler {
    state: AppState,
}

impl AuthCommandHandler {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub async fn register(&self, email: &str, password: &str, role: Role) -> AppResult<Value> {
        let result = self.state.auth.sign_up(email, password, Some(role)).await?;
        tracing::info!(role = %result.role.unwrap_or(role), "account registered");
        to_json(&result)
    }

    /// Sign in and report the user with their resolved role.
    ///
    /// The access token is not printed.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<Value> {
        let result = self.state.auth.sign_in(email, password).await?;

        let role = match (result.role, result.user.as_ref()) {
            (Some(role), _) => role,
            (None, Some(user)) => self.state.auth.get_user_role(user.id).await,
            (None, None) => Role::Guest,
        };

        Ok(json!({
            "message": result.message,
            "user": result.user,
            "role": role,
        }))
    }
}
