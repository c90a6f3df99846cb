//! Influencer catalog operations.
//!
//! Reads go through the shared [`RequestCache`], so the listing page, the
//! detail view and the admin table asking for the same collection within
//! the TTL produce a single backend request.

use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthStore;
use crate::cache::RequestCache;
use crate::error::AppResult;
use crate::models::{Influencer, NewInfluencer, PagedResponse, PaginationParams, UpdateInfluencer};
use crate::services::filter::{InfluencerFilter, paginate};
use crate::services::resource::Resource;

/// Influencer service backed by the influencers endpoint.
#[derive(Clone)]
pub struct InfluencerService {
    resource: Resource,
}

impl InfluencerService {
    pub fn new(cache: RequestCache, url: String, auth: AuthStore) -> Self {
        Self {
            resource: Resource::new("influencer", cache, url, auth),
        }
    }

    /// Every influencer, in backend order.
    pub async fn list(&self) -> AppResult<Vec<Influencer>> {
        self.resource.list().await
    }

    /// Gets an influencer by id.
    ///
    /// # Returns
    /// The influencer, or `NotFound` when the backend answers 404
    pub async fn get(&self, id: Uuid) -> AppResult<Influencer> {
        self.resource.get(&id.to_string()).await
    }

    /// Filter the cached collection and return one page of it.
    pub async fn search(
        &self,
        filter: &InfluencerFilter,
        params: PaginationParams,
    ) -> AppResult<PagedResponse<Influencer>> {
        let influencers = self.list().await?;
        Ok(paginate(filter.apply(influencers), params))
    }

    pub async fn create(&self, new_influencer: NewInfluencer) -> AppResult<Influencer> {
        new_influencer.validate()?;
        self.resource.create(&new_influencer).await
    }

    pub async fn update(&self, id: Uuid, update: UpdateInfluencer) -> AppResult<Influencer> {
        update.validate()?;
        self.resource.update(&id.to_string(), &update).await
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.resource.delete(&id.to_string()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthEndpoints, HttpAuthBackend};
    use crate::cache::FetchError;
    use crate::error::AppError;
    use crate::external::testing::MockTransport;
    use reqwest::{Method, StatusCode};
    use serde_json::{Value, json};
    use std::sync::Arc;

    const URL: &str = "http://backend.test/api/influencers";

    fn influencer_json(name: &str, category: &str, price: u64) -> Value {
        json!({
            "id": Uuid::new_v4(),
            "name": name,
            "username": format!("@{}", name.to_lowercase().replace(' ', "")),
            "category": category,
            "platform": "Instagram",
            "followers": 50_000,
            "price": price,
        })
    }

    fn service(transport: Arc<MockTransport>) -> InfluencerService {
        let backend = HttpAuthBackend::new(
            transport.clone(),
            AuthEndpoints {
                auth_url: "http://backend.test/api/auth".to_string(),
                session_url: "http://backend.test/api/auth/session".to_string(),
                roles_url: "http://backend.test/rest/v1/user_roles".to_string(),
            },
        );
        let auth = AuthStore::new(Arc::new(backend));
        InfluencerService::new(RequestCache::new(transport), URL.to_string(), auth)
    }

    #[tokio::test]
    async fn test_repeated_reads_hit_backend_once() {
        let transport = Arc::new(MockTransport::new());
        transport.reply(
            Method::GET,
            URL,
            200,
            json!([influencer_json("Sari", "Food", 1_000_000)]),
        );
        let service = service(transport.clone());

        let first = service.list().await.unwrap();
        let second = service.list().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(transport.call_count(&Method::GET, URL), 1);
    }

    #[tokio::test]
    async fn test_search_filters_then_pages() {
        let transport = Arc::new(MockTransport::new());
        transport.reply(
            Method::GET,
            URL,
            200,
            json!([
                influencer_json("Sari", "Food", 1_000_000),
                influencer_json("Budi", "Technology", 2_000_000),
                influencer_json("Rina", "Food", 3_000_000),
            ]),
        );
        let service = service(transport);

        let filter = InfluencerFilter {
            category: Some("Food".to_string()),
            ..Default::default()
        };
        let page = service
            .search(&filter, PaginationParams::new(1, 1))
            .await
            .unwrap();

        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].name, "Sari");
        assert_eq!(page.pagination.total_items, 2);
        assert!(page.pagination.has_next);
    }

    #[tokio::test]
    async fn test_get_missing_maps_to_not_found() {
        let transport = Arc::new(MockTransport::new());
        let id = Uuid::new_v4();
        transport.fail(
            Method::GET,
            &format!("{URL}/{id}"),
            FetchError::Status {
                status: StatusCode::NOT_FOUND,
                body: String::new(),
            },
        );
        let service = service(transport);

        let err = service.get(id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { ref entity, .. } if entity == "influencer"));
    }

    #[tokio::test]
    async fn test_create_validates_before_sending() {
        let transport = Arc::new(MockTransport::new());
        let service = service(transport.clone());

        let err = service
            .create(NewInfluencer {
                name: String::new(),
                username: "@x".to_string(),
                category: "Food".to_string(),
                platform: "TikTok".to_string(),
                followers: 10,
                price: 0,
                avatar_url: None,
                bio: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ValidationErrors { .. }));
        assert_eq!(transport.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_create_invalidates_cached_listing() {
        let transport = Arc::new(MockTransport::new());
        transport.reply(Method::GET, URL, 200, json!([]));
        transport.reply(Method::POST, URL, 201, influencer_json("Sari", "Food", 1_000_000));
        let service = service(transport.clone());

        service.list().await.unwrap();
        service
            .create(NewInfluencer {
                name: "Sari".to_string(),
                username: "@sari".to_string(),
                category: "Food".to_string(),
                platform: "Instagram".to_string(),
                followers: 50_000,
                price: 1_000_000,
                avatar_url: None,
                bio: None,
            })
            .await
            .unwrap();
        service.list().await.unwrap();

        assert_eq!(transport.call_count(&Method::GET, URL), 2);
        assert_eq!(transport.call_count(&Method::POST, URL), 1);
    }

    #[tokio::test]
    async fn test_update_invalidates_item_and_collection() {
        let transport = Arc::new(MockTransport::new());
        let id = Uuid::new_v4();
        let item_url = format!("{URL}/{id}");
        let body = influencer_json("Sari", "Food", 1_000_000);
        transport.reply(Method::GET, URL, 200, json!([body.clone()]));
        transport.reply(Method::GET, &item_url, 200, body.clone());
        transport.reply(Method::PUT, &item_url, 200, body);
        let service = service(transport.clone());

        service.list().await.unwrap();
        service.get(id).await.unwrap();
        service
            .update(
                id,
                UpdateInfluencer {
                    price: Some(1_500_000),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        service.list().await.unwrap();
        service.get(id).await.unwrap();

        assert_eq!(transport.call_count(&Method::GET, URL), 2);
        assert_eq!(transport.call_count(&Method::GET, &item_url), 2);
    }

    #[tokio::test]
    async fn test_delete_sends_delete() {
        let transport = Arc::new(MockTransport::new());
        let id = Uuid::new_v4();
        let item_url = format!("{URL}/{id}");
        transport.reply(Method::DELETE, &item_url, 204, Value::Null);
        let service = service(transport.clone());

        service.delete(id).await.unwrap();
        assert_eq!(transport.call_count(&Method::DELETE, &item_url), 1);
    }
}
