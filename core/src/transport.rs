//! Async verbs over a pluggable transport.
//!
//! # Design
//! `Transport` is the only place a network round-trip happens. `Api` pairs a
//! transport with a `JsonClient` and exposes `get`, `post`, `put` and
//! `delete`: build, send, parse, suspending only while the transport runs.
//! The trait carries no `Send` bound so single-threaded hosts can implement it.

use serde_json::Value;
use tracing::debug;

use crate::client::JsonClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::types::Body;

/// Executes one HTTP exchange.
///
/// Implementations return non-200 responses as data; only a failed
/// round-trip is an `Err`, reported as `ApiError::Transport`.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).send(request).await
    }
}

/// The four JSON verbs bound to a transport.
#[derive(Debug, Clone)]
pub struct Api<T> {
    client: JsonClient,
    transport: T,
}

impl<T: Transport> Api<T> {
    pub fn new(client: JsonClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub async fn get(&self, url: &str) -> Result<Value, ApiError> {
        let request = self.client.build_get(url)?;
        self.execute(request).await
    }

    pub async fn post(&self, url: &str, body: Option<&Body>) -> Result<Value, ApiError> {
        let request = self.client.build_post(url, body)?;
        self.execute(request).await
    }

    pub async fn put(&self, url: &str, body: Option<&Body>) -> Result<Value, ApiError> {
        let request = self.client.build_put(url, body)?;
        self.execute(request).await
    }

    pub async fn delete(&self, url: &str, body: Option<&Body>) -> Result<Value, ApiError> {
        let request = self.client.build_delete(url, body)?;
        self.execute(request).await
    }

    async fn execute(&self, request: HttpRequest) -> Result<Value, ApiError> {
        debug!(method = %request.method, url = %request.url, "sending request");
        let response = self.transport.send(request).await?;
        debug!(status = response.status, bytes = response.body.len(), "response received");
        self.client.parse_response(response)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;
    use crate::http::HttpMethod;

    /// Answers every request with a fixed response and records what it saw.
    struct Canned {
        status: u16,
        body: &'static str,
        seen: Mutex<Vec<HttpRequest>>,
    }

    impl Canned {
        fn new(status: u16, body: &'static str) -> Self {
            Self {
                status,
                body,
                seen: Mutex::new(Vec::new()),
            }
        }

        fn last(&self) -> HttpRequest {
            self.seen.lock().unwrap().last().cloned().unwrap()
        }
    }

    impl Transport for Canned {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
            self.seen.lock().unwrap().push(request);
            Ok(HttpResponse::new(self.status, self.body))
        }
    }

    struct Offline;

    impl Transport for Offline {
        async fn send(&self, _request: HttpRequest) -> Result<HttpResponse, ApiError> {
            Err(ApiError::Transport("network unreachable".to_string()))
        }
    }

    fn api(transport: &Canned) -> Api<&Canned> {
        Api::new(JsonClient::with_base("http://localhost:3000").unwrap(), transport)
    }

    #[tokio::test]
    async fn get_returns_parsed_json() {
        let t = Canned::new(200, r#"{"a":1}"#);
        let value = api(&t).get("/api/client/1").await.unwrap();
        assert_eq!(value, json!({ "a": 1 }));

        let req = t.last();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3000/api/client/1");
        assert!(req.body.is_none());
    }

    #[tokio::test]
    async fn post_sends_normalized_body() {
        let t = Canned::new(200, "");
        let body: Body = [("name", "desk")].into_iter().collect();
        let value = api(&t).post("/api/client", Some(&body)).await.unwrap();
        assert_eq!(value, json!({}));

        let req = t.last();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.body.as_deref(), Some(r#"{"name":"desk"}"#));
    }

    #[tokio::test]
    async fn put_and_delete_use_their_methods() {
        let t = Canned::new(200, "{}");
        api(&t).put("/api/key/2", None).await.unwrap();
        assert_eq!(t.last().method, HttpMethod::Put);
        api(&t).delete("/api/key/2", None).await.unwrap();
        assert_eq!(t.last().method, HttpMethod::Delete);
    }

    #[tokio::test]
    async fn non_200_becomes_http_error() {
        let t = Canned::new(404, "not found");
        let err = api(&t).get("/api/client/9").await.unwrap_err();
        assert_eq!(err.to_string(), "404 - not found");
    }

    #[tokio::test]
    async fn created_is_not_success() {
        let t = Canned::new(201, r#"{"id":1}"#);
        let err = api(&t).post("/api/client", None).await.unwrap_err();
        assert!(matches!(err, ApiError::Http { status: 201, .. }));
    }

    #[tokio::test]
    async fn bad_json_is_parse_error_not_http_error() {
        let t = Canned::new(200, "not json");
        let err = api(&t).get("/raw").await.unwrap_err();
        assert!(matches!(err, ApiError::Parse(_)));
    }

    #[tokio::test]
    async fn unresolvable_url_never_reaches_the_transport() {
        let t = Canned::new(200, "{}");
        let err = api(&t).get("http://[::1").await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl(_)));
        assert!(t.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn protocol_relative_url_targets_its_own_host() {
        let t = Canned::new(200, "{}");
        api(&t).get("//cdn.example.org/config.json").await.unwrap();
        assert_eq!(t.last().url, "http://cdn.example.org/config.json");
    }

    #[tokio::test]
    async fn transport_failure_propagates() {
        let api = Api::new(JsonClient::new(), Offline);
        let err = api.get("/api/client/1").await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }
}
