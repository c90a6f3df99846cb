use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};

use crate::config::settings::{BackendConfig, HttpConfig};
use crate::error::{AppError, AppResult};

/// User-Agent sent with every backend request.
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Build the HTTP client used for all backend traffic.
///
/// One client per application instance, shared through
/// [`ReqwestTransport`](super::ReqwestTransport):
/// - **Connection pooling** across the cache, auth and service layers
/// - **Timeouts** from `[http]` so a hung backend call cannot hang forever
/// - **Compression**: gzip, deflate, brotli, zstd
/// - **TLS** through rustls
pub fn build_http_client(config: &HttpConfig) -> AppResult<reqwest::Client> {
    reqwest::Client::builder()
        // Timeouts
        .timeout(Duration::from_secs(config.timeout_seconds))
        .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
        // Connection pooling
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(config.pool_idle_timeout_seconds))
        // Compression
        .gzip(true)
        .deflate(true)
        .brotli(true)
        .zstd(true)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| AppError::Configuration {
            key: "http".to_string(),
            source: e.into(),
        })
}

/// Headers attached to every backend request.
///
/// Hosted database backends expect the project key in an `apikey` header.
pub fn default_headers(config: &BackendConfig) -> AppResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    if let Some(api_key) = config.api_key.as_deref().filter(|k| !k.is_empty()) {
        let value = HeaderValue::from_str(api_key).map_err(|e| AppError::Configuration {
            key: "backend.api_key".to_string(),
            source: e.into(),
        })?;
        headers.insert("apikey", value);
    }
    Ok(headers)
}
