//! Listing commands: influencers, packages and users.

use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::models::PaginationParams;
use crate::services::{InfluencerFilter, PackageFilter, paginate};
use crate::state::AppState;

/// Handler for the read-only catalog commands
pub struct CatalogCommandHandler {
    state: AppState,
}

impl CatalogCommandHandler {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// One page of influencers matching `filter`
    pub async fn influencers(
        &self,
        filter: &InfluencerFilter,
        params: PaginationParams,
    ) -> AppResult<Value> {
        let page = self.state.services.influencers.search(filter, params).await?;
        tracing::info!(
            total = page.pagination.total_items,
            page = page.pagination.page,
            "influencers listed"
        );
        to_json(&page)
    }

    /// One page of packages matching `filter`
    pub async fn packages(&self, filter: &PackageFilter, params: PaginationParams) -> AppResult<Value> {
        let page = self.state.services.packages.search(filter, params).await?;
        tracing::info!(total = page.pagination.total_items, "packages listed");
        to_json(&page)
    }

    /// One page of user accounts
    pub async fn users(&self, params: PaginationParams) -> AppResult<Value> {
        let users = self.state.services.users.list().await?;
        to_json(&paginate(users, params))
    }
}

pub(super) fn to_json<T: serde::Serialize>(value: &T) -> AppResult<Value> {
    serde_json::to_value(value).map_err(|e| AppError::Internal { source: e.into() })
}
