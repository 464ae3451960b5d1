//! Error types for the JSON client and the page behaviors.
//!
//! # Design
//! Only an exact 200 counts as success, so every other status lands in
//! `ApiError::Http` with the raw status and body text. Its display form is
//! `"<status> - <body>"`, the message page scripts show to users.

use thiserror::Error;

/// Errors returned by `JsonClient` and the `Api` verbs.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a status other than 200.
    #[error("{status} - {body}")]
    Http { status: u16, body: String },

    /// A non-empty 200 body was not valid JSON, or did not fit the requested type.
    #[error("invalid JSON response: {0}")]
    Parse(#[source] serde_json::Error),

    /// The request body could not be encoded as a JSON object.
    #[error("request body serialization failed: {0}")]
    Serialization(String),

    /// A base URL or request URL could not be parsed or resolved.
    #[error("invalid URL {0}")]
    InvalidUrl(String),

    /// The transport could not complete the round-trip.
    #[error("transport failed: {0}")]
    Transport(String),
}

impl ApiError {
    /// Status code of an `Http` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for an `Http` error carrying 404.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Errors raised by the toast behavior when the page is missing its markup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomError {
    #[error("element #{0} not found")]
    MissingElement(String),
}
