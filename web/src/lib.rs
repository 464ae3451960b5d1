//! Browser binding for the JSON verbs and page behaviors.
//!
//! # Overview
//! Built as a `cdylib` for `wasm32-unknown-unknown`. The exports keep the
//! names pages already call: `api_get`, `api_post`, `api_put`,
//! `api_delete`, `triggerToast`, plus the JSON glue `fromJsonString` and
//! `toJsonString`. Spoilers present at load are wired by the start hook.
//!
//! # Design
//! - Requests go through `restglue_core::Api` over `FetchTransport`.
//! - A failed verb rejects with the error's message as a plain string, so
//!   a 404 rejects with `"404 - <body>"`.
//! - Results cross into JS through one serializer that turns JSON objects
//!   into plain objects, not `Map`s.

pub mod dom;
pub mod transport;

use restglue_core::{register_spoilers, toast, Api, ApiError, Body, JsonClient, Toast};
use serde::Serialize;
use serde_json::Value;
use serde_wasm_bindgen::Serializer;
use tracing::debug;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

pub use dom::{WebDocument, WebElement};
pub use transport::FetchTransport;

static SERIALIZER: Serializer = Serializer::new()
    .serialize_large_number_types_as_bigints(true)
    .serialize_maps_as_objects(true)
    .serialize_bytes_as_arrays(true);

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn error(s: &str);
}

fn api() -> Api<FetchTransport> {
    Api::new(JsonClient::new(), FetchTransport)
}

#[wasm_bindgen]
pub async fn api_get(url: String) -> Result<JsValue, JsValue> {
    let value = api().get(&url).await.map_err(reject)?;
    to_js(&value)
}

#[wasm_bindgen]
pub async fn api_post(url: String, body: JsValue) -> Result<JsValue, JsValue> {
    let body = body_from_js(body).map_err(reject)?;
    let value = api().post(&url, body.as_ref()).await.map_err(reject)?;
    to_js(&value)
}

#[wasm_bindgen]
pub async fn api_put(url: String, body: JsValue) -> Result<JsValue, JsValue> {
    let body = body_from_js(body).map_err(reject)?;
    let value = api().put(&url, body.as_ref()).await.map_err(reject)?;
    to_js(&value)
}

#[wasm_bindgen]
pub async fn api_delete(url: String, body: JsValue) -> Result<JsValue, JsValue> {
    let body = body_from_js(body).map_err(reject)?;
    let value = api().delete(&url, body.as_ref()).await.map_err(reject)?;
    to_js(&value)
}

#[wasm_bindgen(js_name = triggerToast)]
pub fn trigger_toast(
    text: &str,
    success: Option<bool>,
    enable_html: Option<bool>,
) -> Result<(), JsValue> {
    let doc = WebDocument::current().ok_or_else(|| JsValue::from_str("no document"))?;
    toast::trigger_toast(&doc, &toast_from_args(text, success, enable_html))
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Wire every spoiler currently on the page.
#[wasm_bindgen(js_name = registerSpoilers)]
pub fn register_page_spoilers() -> usize {
    WebDocument::current().map_or(0, |doc| register_spoilers(&doc))
}

#[wasm_bindgen(start)]
pub fn start() {
    register_page_spoilers();
}

/// Parse JSON text into a plain JS value.
#[wasm_bindgen(js_name = fromJsonString)]
pub fn from_json(json_str: &str) -> Result<JsValue, JsValue> {
    let value: Value = serde_json::from_str(json_str).map_err(print_error)?;
    to_js(&value)
}

/// Serialize a JS value to JSON text.
#[wasm_bindgen(js_name = toJsonString)]
pub fn to_json(obj: JsValue) -> Result<String, JsValue> {
    let value: Value = serde_wasm_bindgen::from_value(obj).map_err(print_error)?;
    serde_json::to_string(&value).map_err(print_error)
}

fn print_error<E: std::fmt::Display>(err: E) -> JsValue {
    let message = format!("Error: {err}");
    error(&message);
    JsValue::from_str(&message)
}

fn to_js(value: &Value) -> Result<JsValue, JsValue> {
    value.serialize(&SERIALIZER).map_err(JsValue::from)
}

fn reject(err: ApiError) -> JsValue {
    debug!(error = %err, "request rejected");
    JsValue::from_str(&err.to_string())
}

/// `null` and `undefined` send no body; a `Map` is read as an object.
fn body_from_js(body: JsValue) -> Result<Option<Body>, ApiError> {
    if body.is_null() || body.is_undefined() {
        return Ok(None);
    }
    let body = match body.dyn_ref::<js_sys::Map>() {
        Some(map) => js_sys::Object::from_entries(map)
            .map_err(|e| ApiError::Serialization(format!("{e:?}")))?
            .into(),
        None => body,
    };
    let value: Value = serde_wasm_bindgen::from_value(body)
        .map_err(|e| ApiError::Serialization(e.to_string()))?;
    body_from_json(value)
}

fn body_from_json(value: Value) -> Result<Option<Body>, ApiError> {
    match value {
        Value::Null => Ok(None),
        Value::Object(map) => Ok(Some(Body::Object(map))),
        other => Body::from_serialize(&other).map(Some),
    }
}

fn toast_from_args(text: &str, success: Option<bool>, enable_html: Option<bool>) -> Toast {
    Toast::new(text)
        .success(success.unwrap_or(false))
        .allow_html(enable_html.unwrap_or(false))
}
