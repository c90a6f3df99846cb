//! In-process transport double that counts network calls.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use serde_json::Value;

use crate::cache::{FetchError, cache_key};
use crate::external::{HttpTransport, RequestOptions, TransportResponse};

type Reply = Result<TransportResponse, FetchError>;

#[derive(Debug, Clone)]
pub(crate) struct RecordedCall {
    pub method: Method,
    pub url: String,
    pub options: RequestOptions,
}

/// Replies are queued per `METHOD:url`; the last queued reply is sticky.
#[derive(Default)]
pub(crate) struct MockTransport {
    replies: Mutex<HashMap<String, VecDeque<Reply>>>,
    calls: Mutex<Vec<RecordedCall>>,
    latency: Option<Duration>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn reply(&self, method: Method, url: &str, status: u16, body: Value) -> &Self {
        let response = TransportResponse {
            status: StatusCode::from_u16(status).unwrap(),
            headers: HeaderMap::new(),
            body: if body.is_null() {
                String::new()
            } else {
                body.to_string()
            },
        };
        self.push(method, url, Ok(response))
    }

    pub fn fail(&self, method: Method, url: &str, error: FetchError) -> &Self {
        self.push(method, url, Err(error))
    }

    fn push(&self, method: Method, url: &str, reply: Reply) -> &Self {
        self.replies
            .lock()
            .unwrap()
            .entry(cache_key(&method, url))
            .or_default()
            .push_back(reply);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, method: &Method, url: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| &c.method == method && c.url == url)
            .count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn execute(&self, url: &str, options: &RequestOptions) -> Reply {
        self.calls.lock().unwrap().push(RecordedCall {
            method: options.method.clone(),
            url: url.to_string(),
            options: options.clone(),
        });

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let key = cache_key(&options.method, url);
        let mut replies = self.replies.lock().unwrap();
        match replies.get_mut(&key) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) if !queue.is_empty() => queue[0].clone(),
            _ => Err(FetchError::Status {
                status: StatusCode::NOT_FOUND,
                body: format!("no mock reply for {}", key),
            }),
        }
    }
}
