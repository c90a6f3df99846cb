//! Outbound HTTP plumbing shared by the cache, auth and service layers.

mod client;
mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{USER_AGENT, build_http_client, default_headers};
pub use transport::{HttpTransport, ReqwestTransport, RequestOptions, TransportResponse};
