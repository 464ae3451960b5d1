//! JSON REST helpers and small page behaviors for server-rendered frontends.
//!
//! # Overview
//! Four verbs (`get`, `post`, `put`, `delete`) wrap an HTTP transport with
//! JSON encoding of request bodies and strict response handling: only a 200
//! succeeds, an empty body reads as `{}`, anything else must parse as JSON.
//! Alongside them, `trigger_toast` drives the page's toast widget and
//! `register_spoilers` wires click-to-reveal spoilers.
//!
//! # Design
//! - `JsonClient` is stateless; it holds only an optional base URL.
//! - Each verb is split into `build_*` (produces `HttpRequest`) and
//!   `parse_response` (consumes `HttpResponse`), so the I/O boundary is
//!   explicit. `Api` joins the two over a `Transport` as async functions.
//! - Page behaviors work against the `Document` trait; `MemoryDocument` is a
//!   headless implementation.

pub mod client;
pub mod dom;
pub mod error;
pub mod http;
pub mod spoiler;
pub mod toast;
pub mod transport;
pub mod types;

pub use client::JsonClient;
pub use dom::{Document, Element, MemoryDocument, MemoryElement};
pub use error::{ApiError, DomError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use spoiler::register_spoilers;
pub use toast::{trigger_toast, Toast};
pub use transport::{Api, Transport};
pub use types::Body;
