//! CRUD plumbing shared by the catalog and user services.

use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::auth::AuthStore;
use crate::cache::{FetchError, RequestCache};
use crate::error::{AppError, AppResult};
use crate::external::RequestOptions;

/// One backend collection, addressed as `url` and `url/{id}`.
#[derive(Clone)]
pub(crate) struct Resource {
    entity: &'static str,
    cache: RequestCache,
    url: String,
    auth: AuthStore,
}

impl Resource {
    pub fn new(entity: &'static str, cache: RequestCache, url: String, auth: AuthStore) -> Self {
        Self {
            entity,
            cache,
            url,
            auth,
        }
    }

    pub fn item_url(&self, id: impl std::fmt::Display) -> String {
        format!("{}/{}", self.url, id)
    }

    pub fn auth(&self) -> &AuthStore {
        &self.auth
    }

    fn authorized(&self, options: RequestOptions) -> RequestOptions {
        match self.auth.session() {
            Some(session) => options.bearer(&session.access_token),
            None => options,
        }
    }

    fn not_found(&self, id: &str) -> AppError {
        AppError::NotFound {
            entity: self.entity.to_string(),
            field: "id".to_string(),
            value: id.to_string(),
        }
    }

    fn map_error(&self, id: Option<&str>, error: FetchError) -> AppError {
        match (id, error.status()) {
            (Some(id), Some(StatusCode::NOT_FOUND)) => self.not_found(id),
            _ => AppError::Fetch(error),
        }
    }

    /// Whole collection, through the cache.
    pub async fn list<T: DeserializeOwned>(&self) -> AppResult<Vec<T>> {
        self.cache
            .fetch(&self.url, self.authorized(RequestOptions::get()))
            .await
            .map_err(|e| self.map_error(None, e))
    }

    pub async fn get<T: DeserializeOwned>(&self, id: &str) -> AppResult<T> {
        self.cache
            .fetch(&self.item_url(id), self.authorized(RequestOptions::get()))
            .await
            .map_err(|e| self.map_error(Some(id), e))
    }

    pub async fn create<B: Serialize, T: DeserializeOwned>(&self, body: &B) -> AppResult<T> {
        let options = self.authorized(RequestOptions::post(to_body(body)?));
        let created = self
            .cache
            .fetch(&self.url, options)
            .await
            .map_err(|e| self.map_error(None, e))?;
        debug!(entity = self.entity, "created");
        Ok(created)
    }

    /// `PUT url/{id}`; the collection listing is invalidated as well.
    pub async fn update<B: Serialize, T: DeserializeOwned>(&self, id: &str, body: &B) -> AppResult<T> {
        let options = self.authorized(RequestOptions::put(to_body(body)?));
        let result = self.cache.fetch(&self.item_url(id), options).await;
        self.cache.clear_url(&self.url, None);
        let updated = result.map_err(|e| self.map_error(Some(id), e))?;
        debug!(entity = self.entity, id, "updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let options = self.authorized(RequestOptions::delete());
        let result = self.cache.fetch_value(&self.item_url(id), options).await;
        self.cache.clear_url(&self.url, None);
        result.map_err(|e| self.map_error(Some(id), e))?;
        debug!(entity = self.entity, id, "deleted");
        Ok(())
    }
}

fn to_body<B: Serialize>(body: &B) -> AppResult<Value> {
    serde_json::to_value(body).map_err(|e| AppError::Internal { source: e.into() })
}
