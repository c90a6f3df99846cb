//! Service layer over the backend REST endpoints.
//!
//! Every service reads through the one shared [`RequestCache`], so the same
//! collection requested from different places is fetched once per TTL.

mod filter;
mod influencer_service;
mod package_service;
mod resource;
mod user_service;

pub use filter::{InfluencerFilter, PackageFilter, paginate};
pub use influencer_service::InfluencerService;
pub use package_service::PackageService;
pub use user_service::UserService;

use crate::auth::AuthStore;
use crate::cache::RequestCache;
use crate::config::BackendConfig;

/// Aggregates all services for convenient access.
///
/// Cloning is cheap; the cache and auth store are shared handles.
#[derive(Clone)]
pub struct Services {
    pub influencers: InfluencerService,
    pub packages: PackageService,
    pub users: UserService,
}

impl Services {
    pub fn new(cache: RequestCache, backend: &BackendConfig, auth: AuthStore) -> Self {
        Self {
            influencers: InfluencerService::new(
                cache.clone(),
                backend.url(&backend.influencers_path),
                auth.clone(),
            ),
            packages: PackageService::new(
                cache.clone(),
                backend.url(&backend.packages_path),
                auth.clone(),
            ),
            users: UserService::new(cache, backend.url(&backend.users_path), auth),
        }
    }
}
