//! `Transport` over the browser's `fetch`.

use restglue_core::{ApiError, HttpRequest, HttpResponse, Transport};
use tracing::debug;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response};

/// Sends requests with `window.fetch`. Relative URLs resolve against the
/// page, so the client in front of it needs no base.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchTransport;

impl Transport for FetchTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let opts = RequestInit::new();
        opts.set_method(request.method.as_str());

        let headers = Headers::new().map_err(js_err)?;
        for (name, value) in &request.headers {
            headers.set(name, value).map_err(js_err)?;
        }
        opts.set_headers(&headers);

        if let Some(body) = &request.body {
            opts.set_body(&JsValue::from_str(body));
        }

        let req = Request::new_with_str_and_init(&request.url, &opts).map_err(js_err)?;
        let window = web_sys::window().ok_or_else(|| ApiError::Transport("no global window".into()))?;

        let resp_value = JsFuture::from(window.fetch_with_request(&req))
            .await
            .map_err(js_err)?;
        let resp: Response = resp_value
            .dyn_into()
            .map_err(|_| ApiError::Transport("fetch did not yield a Response".into()))?;

        let text = JsFuture::from(resp.text().map_err(js_err)?)
            .await
            .map_err(js_err)?;
        let status = resp.status();
        debug!(status, url = %request.url, "fetch completed");

        Ok(HttpResponse::new(status, text.as_string().unwrap_or_default()))
    }
}

/// Message of a JS exception, or its string form.
fn js_err(e: JsValue) -> ApiError {
    if let Some(err) = e.dyn_ref::<js_sys::Error>() {
        if let Some(message) = err.message().as_string() {
            return ApiError::Transport(message);
        }
    }
    ApiError::Transport(e.as_string().unwrap_or_else(|| "network error".to_string()))
}
