//! Stateless request builder and response parser for JSON REST endpoints.
//!
//! # Design
//! `JsonClient` holds only an optional base URL. Each verb is split into a
//! `build_*` method that produces an `HttpRequest` and the shared
//! `parse_response` that consumes an `HttpResponse`. The round-trip itself
//! belongs to a `Transport` (see `transport`).

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use url::Url;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::Body;

pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Builds requests for the four verbs and interprets their responses.
#[derive(Debug, Clone, Default)]
pub struct JsonClient {
    base_url: Option<Url>,
}

impl JsonClient {
    /// A client that passes every URL through unchanged.
    pub fn new() -> Self {
        Self { base_url: None }
    }

    /// A client that resolves URLs against `base_url`, the way a page
    /// resolves them against its own address.
    pub fn with_base(base_url: &str) -> Result<Self, ApiError> {
        let url = Url::parse(base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;
        if url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(format!("{base_url}: not a base URL")));
        }
        Ok(Self { base_url: Some(url) })
    }

    pub fn resolve(&self, url: &str) -> Result<String, ApiError> {
        match &self.base_url {
            Some(base) => base
                .join(url)
                .map(String::from)
                .map_err(|e| ApiError::InvalidUrl(format!("{url}: {e}"))),
            None => Ok(url.to_string()),
        }
    }

    pub fn build_get(&self, url: &str) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Get,
            url: self.resolve(url)?,
            headers: Vec::new(),
            body: None,
        })
    }

    pub fn build_post(&self, url: &str, body: Option<&Body>) -> Result<HttpRequest, ApiError> {
        self.build_with_body(HttpMethod::Post, url, body)
    }

    pub fn build_put(&self, url: &str, body: Option<&Body>) -> Result<HttpRequest, ApiError> {
        self.build_with_body(HttpMethod::Put, url, body)
    }

    pub fn build_delete(&self, url: &str, body: Option<&Body>) -> Result<HttpRequest, ApiError> {
        self.build_with_body(HttpMethod::Delete, url, body)
    }

    fn build_with_body(
        &self,
        method: HttpMethod,
        url: &str,
        body: Option<&Body>,
    ) -> Result<HttpRequest, ApiError> {
        let body = body.map(Body::to_json).transpose()?;
        Ok(HttpRequest {
            method,
            url: self.resolve(url)?,
            headers: vec![("content-type".to_string(), CONTENT_TYPE_JSON.to_string())],
            body,
        })
    }

    /// Interpret a response: exactly 200 succeeds, an empty body reads as
    /// `{}`, anything else must be JSON.
    pub fn parse_response(&self, response: HttpResponse) -> Result<Value, ApiError> {
        if response.status != 200 {
            return Err(ApiError::Http {
                status: response.status,
                body: response.body,
            });
        }
        if response.body.is_empty() {
            return Ok(Value::Object(Map::new()));
        }
        serde_json::from_str(&response.body).map_err(ApiError::Parse)
    }

    /// `parse_response`, then deserialize the payload into `T`.
    pub fn parse_response_as<T: DeserializeOwned>(
        &self,
        response: HttpResponse,
    ) -> Result<T, ApiError> {
        let value = self.parse_response(response)?;
        serde_json::from_value(value).map_err(ApiError::Parse)
    }
}
