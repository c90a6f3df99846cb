//! HTTP transport seam between the cache/auth layers and the network.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::cache::FetchError;

/// Per-request options: method, extra headers and an optional JSON body.
///
/// The default is a bodiless `GET`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post(body: Value) -> Self {
        Self::with_method(Method::POST).json(body)
    }

    pub fn put(body: Value) -> Self {
        Self::with_method(Method::PUT).json(body)
    }

    pub fn delete() -> Self {
        Self::with_method(Method::DELETE)
    }

    pub fn with_method(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// Set the JSON body.
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Add a header, replacing any previous value for the same name.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Add an `Authorization: Bearer <token>` header.
    ///
    /// Tokens that are not valid header values are ignored.
    pub fn bearer(self, token: &str) -> Self {
        match HeaderValue::from_str(&format!("Bearer {}", token)) {
            Ok(value) => self.header(AUTHORIZATION, value),
            Err(_) => self,
        }
    }
}

/// A fully-read HTTP response.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TransportResponse {
    /// Decode the body as JSON. An empty body decodes to `null`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, FetchError> {
        let body = if self.body.trim().is_empty() {
            "null"
        } else {
            self.body.as_str()
        };
        serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Sends a single HTTP request and reads the full response.
///
/// Implementations must not retry: one call is one network round-trip.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(
        &self,
        url: &str,
        options: &RequestOptions,
    ) -> Result<TransportResponse, FetchError>;
}

/// [`HttpTransport`] backed by a shared `reqwest::Client`.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    default_headers: HeaderMap,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            default_headers: HeaderMap::new(),
        }
    }

    /// Headers sent with every request unless the request overrides them.
    pub fn with_default_headers(mut self, headers: HeaderMap) -> Self {
        self.default_headers = headers;
        self
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(
        &self,
        url: &str,
        options: &RequestOptions,
    ) -> Result<TransportResponse, FetchError> {
        let mut headers = self.default_headers.clone();
        for (name, value) in options.headers.iter() {
            headers.insert(name.clone(), value.clone());
        }

        let mut request = self
            .client
            .request(options.method.clone(), url)
            .headers(headers);
        if let Some(body) = &options.body {
            request = request.json(body);
        }

        tracing::trace!(method = %options.method, url, "sending request");
        let response = request.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await?;

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_default_options_are_get() {
        let options = RequestOptions::default();
        assert_eq!(options.method, Method::GET);
        assert!(options.body.is_none());
        assert!(options.headers.is_empty());
    }

    #[test]
    fn test_bearer_sets_authorization() {
        let options = RequestOptions::get().bearer("abc");
        assert_eq!(
            options.headers.get(AUTHORIZATION).unwrap().to_str().unwrap(),
            "Bearer abc"
        );
    }

    #[test]
    fn test_empty_body_decodes_to_null() {
        let response = TransportResponse {
            status: StatusCode::NO_CONTENT,
            headers: HeaderMap::new(),
            body: String::new(),
        };
        let value: Value = response.json().unwrap();
        assert_eq!(value, Value::Null);
    }

    #[test]
    fn test_invalid_body_is_decode_error() {
        let response = TransportResponse {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: "<html>".into(),
        };
        let result: Result<Value, _> = response.json();
        assert!(matches!(result, Err(FetchError::Decode(_))));
    }

    #[tokio::test]
    async fn test_reqwest_transport_sends_method_headers_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/packages"))
            .and(header("apikey", "secret"))
            .and(body_json(json!({"name": "Starter"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 1})))
            .expect(1)
            .mount(&server)
            .await;

        let mut defaults = HeaderMap::new();
        defaults.insert("apikey", HeaderValue::from_static("secret"));
        let transport = ReqwestTransport::new(reqwest::Client::new()).with_default_headers(defaults);

        let response = transport
            .execute(
                &format!("{}/api/packages", server.uri()),
                &RequestOptions::post(json!({"name": "Starter"})),
            )
            .await
            .unwrap();

        assert_eq!(response.status, StatusCode::CREATED);
        let value: Value = response.json().unwrap();
        assert_eq!(value, json!({"id": 1}));
    }

    #[tokio::test]
    async fn test_reqwest_transport_returns_error_statuses() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "nope"})))
            .mount(&server)
            .await;

        let transport = ReqwestTransport::new(reqwest::Client::new());
        let response = transport
            .execute(&format!("{}/missing", server.uri()), &RequestOptions::get())
            .await
            .unwrap();

        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert!(!response.is_success());
    }
}
