//! Request-deduplicating GET cache.
//!
//! Reads are keyed by `METHOD:url`. A fresh entry is served without touching
//! the network; a miss either joins the request already in flight for the
//! same key or starts exactly one new request. Entries expire lazily after
//! the TTL and are never swept in the background.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::cache::{FetchError, cache_key};
use crate::config::settings::CacheConfig;
use crate::external::{HttpTransport, RequestOptions};

/// Default time-to-live of a cached response.
pub const DEFAULT_TTL: Duration = Duration::from_secs(30);

type FetchResult = Result<Arc<Value>, FetchError>;
type SharedFetch = Shared<BoxFuture<'static, FetchResult>>;

struct CacheEntry {
    value: Arc<Value>,
    stored_at: Instant,
}

struct PendingRequest {
    /// Distinguishes this request from a later one registered under the same
    /// key after an invalidation.
    id: u64,
    future: SharedFetch,
}

struct Inner {
    transport: Arc<dyn HttpTransport>,
    ttl: Duration,
    entries: DashMap<String, CacheEntry>,
    pending: DashMap<String, PendingRequest>,
    next_id: AtomicU64,
}

impl Inner {
    async fn send(&self, url: &str, options: &RequestOptions) -> Result<Value, FetchError> {
        let response = self.transport.execute(url, options).await?;
        if !response.is_success() {
            return Err(FetchError::Status {
                status: response.status,
                body: response.body,
            });
        }
        response.json()
    }

    fn is_fresh(&self, entry: &CacheEntry) -> bool {
        entry.stored_at.elapsed() < self.ttl
    }

    /// Called once per request, from inside the shared future.
    ///
    /// Lock order is pending -> entries. A request that is no longer the
    /// registered one for its key was invalidated while in flight; its
    /// waiters still get the result but nothing is stored.
    fn settle(&self, key: &str, id: u64, result: &FetchResult) {
        let current = match self.pending.entry(key.to_string()) {
            Entry::Occupied(slot) if slot.get().id == id => {
                if let Ok(value) = result {
                    self.entries.insert(
                        key.to_string(),
                        CacheEntry {
                            value: Arc::clone(value),
                            stored_at: Instant::now(),
                        },
                    );
                }
                slot.remove();
                true
            }
            _ => false,
        };

        match result {
            Ok(_) if current => debug!(key, "response cached"),
            Ok(_) => debug!(key, "request invalidated while in flight, response not cached"),
            Err(error) => warn!(key, %error, "request failed, nothing cached"),
        }
    }

    fn invalidate(&self, key: &str) {
        let pending = self.pending.remove(key).is_some();
        let cached = self.entries.remove(key).is_some();
        if pending || cached {
            debug!(key, pending, cached, "cache key invalidated");
        }
    }
}

/// Deduplicating, short-lived cache for backend reads.
///
/// Cloning is cheap and every clone shares the same maps, so one instance
/// per application is passed around explicitly.
#[derive(Clone)]
pub struct RequestCache {
    inner: Arc<Inner>,
}

impl RequestCache {
    /// Create a cache with the default 30 second TTL.
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self::with_ttl(transport, DEFAULT_TTL)
    }

    pub fn with_ttl(transport: Arc<dyn HttpTransport>, ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                transport,
                ttl,
                entries: DashMap::new(),
                pending: DashMap::new(),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    pub fn from_config(transport: Arc<dyn HttpTransport>, config: &CacheConfig) -> Self {
        Self::with_ttl(transport, Duration::from_secs(config.ttl_seconds))
    }

    pub fn ttl(&self) -> Duration {
        self.inner.ttl
    }

    /// The transport this cache sends through.
    pub fn transport(&self) -> &Arc<dyn HttpTransport> {
        &self.inner.transport
    }

    /// `GET url` and decode the JSON body into `T`.
    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        self.fetch(url, RequestOptions::get()).await
    }

    /// Issue a request and decode the JSON body into `T`.
    ///
    /// See [`fetch_value`](Self::fetch_value) for caching semantics.
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        url: &str,
        options: RequestOptions,
    ) -> Result<T, FetchError> {
        let value = self.fetch_value(url, options).await?;
        T::deserialize(value.as_ref()).map_err(|e| FetchError::Decode(e.to_string()))
    }

    /// Issue a request and return the decoded JSON body.
    ///
    /// `GET` requests are served from a fresh entry, joined to the request
    /// already in flight for the same key, or sent once and cached on
    /// success. Every other method goes straight to the network and
    /// invalidates the `GET` entry for the same URL.
    pub async fn fetch_value(&self, url: &str, options: RequestOptions) -> FetchResult {
        if options.method != Method::GET {
            return self.mutate(url, options).await;
        }

        let key = cache_key(&Method::GET, url);
        if let Some(value) = self.lookup(&key) {
            debug!(key = %key, "cache hit");
            return Ok(value);
        }

        self.join_or_start(key, url, options).await
    }

    /// Drop every entry and forget every in-flight request.
    pub fn clear(&self) {
        // Pending first so a request settling concurrently cannot repopulate
        // an entry after it was cleared.
        self.inner.pending.clear();
        self.inner.entries.clear();
        debug!("request cache cleared");
    }

    /// Invalidate the key for `url` and `method` (`GET` when `None`).
    pub fn clear_url(&self, url: &str, method: Option<&Method>) {
        let key = cache_key(method.unwrap_or(&Method::GET), url);
        self.inner.invalidate(&key);
    }

    /// Number of stored entries, fresh or not yet lazily expired.
    pub fn entry_count(&self) -> usize {
        self.inner.entries.len()
    }

    /// Number of requests currently in flight.
    pub fn pending_count(&self) -> usize {
        self.inner.pending.len()
    }

    fn lookup(&self, key: &str) -> Option<Arc<Value>> {
        if let Some(entry) = self.inner.entries.get(key) {
            if self.inner.is_fresh(&entry) {
                return Some(Arc::clone(&entry.value));
            }
        } else {
            return None;
        }

        self.inner
            .entries
            .remove_if(key, |_, entry| !self.inner.is_fresh(entry));
        debug!(key, "cache entry expired");
        None
    }

    fn join_or_start(&self, key: String, url: &str, options: RequestOptions) -> SharedFetch {
        match self.inner.pending.entry(key) {
            Entry::Occupied(pending) => {
                debug!(key = %pending.key(), "joining in-flight request");
                pending.get().future.clone()
            }
            Entry::Vacant(slot) => {
                // A request may have settled between `lookup` and taking this
                // slot. `settle` stores under the same shard lock, so a fresh
                // entry here is already visible.
                if let Some(value) = self.lookup(slot.key()) {
                    debug!(key = %slot.key(), "cache filled before slot was taken");
                    return futures::future::ready(Ok(value)).boxed().shared();
                }

                let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
                let key = slot.key().clone();
                debug!(key = %key, "cache miss, sending request");

                let inner = Arc::clone(&self.inner);
                let url = url.to_string();
                let future = async move {
                    let result = inner.send(&url, &options).await.map(Arc::new);
                    inner.settle(&key, id, &result);
                    result
                }
                .boxed()
                .shared();

                slot.insert(PendingRequest {
                    id,
                    future: future.clone(),
                });
                future
            }
        }
    }

    async fn mutate(&self, url: &str, options: RequestOptions) -> FetchResult {
        let read_key = cache_key(&Method::GET, url);
        debug!(method = %options.method, url, "mutation bypasses cache");

        self.inner.invalidate(&read_key);
        let result = self.inner.send(url, &options).await.map(Arc::new);
        // Reads that started while the mutation was in flight may hold
        // pre-mutation data.
        self.inner.invalidate(&read_key);

        result
    }
}
