//! Request cache for backend reads.
//!
//! Independent consumers (list pages, cards, admin tables) read the same
//! backend resources without coordinating with each other. The cache makes
//! those reads cheap:
//! - a fresh response is served from memory for the TTL (30 s by default)
//! - concurrent reads of the same `METHOD:url` share a single request
//! - mutations (`POST`/`PUT`/`DELETE`) bypass the cache and invalidate the
//!   `GET` entry for the same URL
//!
//! # Configuration
//!
//! ```toml
//! [cache]
//! ttl_seconds = 30
//! ```
//!
//! # Usage
//!
//! ```ignore
//! let cache = RequestCache::from_config(transport, &settings.cache);
//! let influencers: Vec<Influencer> = cache.get(&url).await?;
//! cache.fetch_value(&url, RequestOptions::post(body)).await?; // invalidates `url`
//! ```

mod error;
mod key;
mod request_cache;

pub use error::FetchError;
pub use key::cache_key;
pub use request_cache::{DEFAULT_TTL, RequestCache};

pub use crate::config::settings::CacheConfig;
