//! Application state shared by every command.
//!
//! Owns the one HTTP transport, the one request cache and the one auth
//! store; services are thin handles over those.

use std::sync::Arc;

use crate::auth::{AuthEndpoints, AuthStore, HttpAuthBackend};
use crate::cache::RequestCache;
use crate::config::Settings;
use crate::error::AppResult;
use crate::external::{HttpTransport, ReqwestTransport, build_http_client, default_headers};
use crate::services::Services;

/// Application state containing all shared services and resources.
///
/// Cloning is cheap since every field is a shared handle.
#[derive(Clone)]
pub struct AppState {
    /// Settings the state was built from
    pub settings: Arc<Settings>,
    /// Shared request cache
    pub cache: RequestCache,
    /// Session and role of the current user
    pub auth: AuthStore,
    /// Catalog and user services
    pub services: Services,
}

impl AppState {
    /// Builds the state over a real HTTP client configured from `settings`.
    ///
    /// # Example
    /// ```ignore
    /// let state = AppState::new(settings)?;
    /// state.auth.initialize().await;
    /// ```
    pub fn new(settings: Settings) -> AppResult<Self> {
        let client = build_http_client(&settings.http)?;
        let transport =
            ReqwestTransport::new(client).with_default_headers(default_headers(&settings.backend)?);
        Ok(Self::with_transport(settings, Arc::new(transport)))
    }

    /// Builds the state over any transport.
    ///
    /// The auth store clears the shared cache whenever the signed-in user
    /// changes.
    pub fn with_transport(settings: Settings, transport: Arc<dyn HttpTransport>) -> Self {
        let cache = RequestCache::from_config(Arc::clone(&transport), &settings.cache);
        let backend = HttpAuthBackend::new(transport, AuthEndpoints::from_config(&settings.backend));
        let auth = AuthStore::with_cache(Arc::new(backend), cache.clone());
        let services = Services::new(cache.clone(), &settings.backend, auth.clone());

        Self {
            settings: Arc::new(settings),
            cache,
            auth,
            services,
        }
    }
}
