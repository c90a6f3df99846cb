use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthStore;
use crate::cache::RequestCache;
use crate::error::AppResult;
use crate::models::{NewPackage, Package, PagedResponse, PaginationParams, UpdatePackage};
use crate::services::filter::{PackageFilter, paginate};
use crate::services::resource::Resource;

/// Service packages offered to clients.
#[derive(Clone)]
pub struct PackageService {
    resource: Resource,
}

impl PackageService {
    pub fn new(cache: RequestCache, url: String, auth: AuthStore) -> Self {
        Self {
            resource: Resource::new("package", cache, url, auth),
        }
    }

    pub async fn list(&self) -> AppResult<Vec<Package>> {
        self.resource.list().await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Package> {
        self.resource.get(&id.to_string()).await
    }

    pub async fn search(
        &self,
        filter: &PackageFilter,
        params: PaginationParams,
    ) -> AppResult<PagedResponse<Package>> {
        let packages = self.list().await?;
        Ok(paginate(filter.apply(packages), params))
    }

    pub async fn create(&self, new_package: NewPackage) -> AppResult<Package> {
        new_package.validate()?;
        self.resource.create(&new_package).await
    }

    pub async fn update(&self, id: Uuid, update: UpdatePackage) -> AppResult<Package> {
        update.validate()?;
        self.resource.update(&id.to_string(), &update).await
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.resource.delete(&id.to_string()).await
    }
}
