//! User account operations.
//!
//! Admin operations address any account; [`UserService::update_profile`]
//! edits the account of whoever is signed in.

use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthStore;
use crate::cache::RequestCache;
use crate::error::{AppError, AppResult};
use crate::models::{NewUser, UpdateProfile, UpdateUser, UserProfile};
use crate::services::resource::Resource;

/// User service for handling user-related operations.
#[derive(Clone)]
pub struct UserService {
    resource: Resource,
}

impl UserService {
    /// Creates a new UserService against the users endpoint at `url`.
    pub fn new(cache: RequestCache, url: String, auth: AuthStore) -> Self {
        Self {
            resource: Resource::new("user", cache, url, auth),
        }
    }

    /// Lists all users.
    pub async fn list(&self) -> AppResult<Vec<UserProfile>> {
        self.resource.list().await
    }

    /// Gets a user by their ID.
    ///
    /// # Returns
    /// The user if found, or `NotFound` error
    pub async fn get(&self, id: Uuid) -> AppResult<UserProfile> {
        self.resource.get(&id.to_string()).await
    }

    /// Creates a new user with the given role.
    pub async fn create(&self, new_user: NewUser) -> AppResult<UserProfile> {
        new_user.validate()?;
        self.resource.create(&new_user).await
    }

    /// Updates an existing user.
    ///
    /// # Arguments
    /// * `id` - The user's ID
    /// * `update` - Fields to change; `None` fields are left untouched
    pub async fn update(&self, id: Uuid, update: UpdateUser) -> AppResult<UserProfile> {
        update.validate()?;
        self.resource.update(&id.to_string(), &update).await
    }

    /// Deletes a user by their ID.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.resource.delete(&id.to_string()).await
    }

    /// Updates the signed-in user's own profile.
    ///
    /// # Returns
    /// The updated profile, or `Unauthorized` when nobody is signed in
    pub async fn update_profile(&self, update: UpdateProfile) -> AppResult<UserProfile> {
        update.validate()?;
        let user = self.resource.auth().user().ok_or_else(|| AppError::Unauthorized {
            message: "Sign in to edit your profile".to_string(),
        })?;
        self.resource.update(&user.id.to_string(), &update).await
    }
}
