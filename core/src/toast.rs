//! Toast notifications on a page that carries the standard toast markup.

use tracing::debug;

use crate::dom::{Document, Element};
use crate::error::DomError;

/// Id of the toast container.
pub const TOAST_ID: &str = "liveToast";
/// Id of the element holding the toast message.
pub const TOAST_BODY_ID: &str = "toast_body";
pub const SUCCESS_CLASS: &str = "text-bg-success";
pub const DANGER_CLASS: &str = "text-bg-danger";

/// A message to display. Defaults to a danger-styled, plain-text toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    text: String,
    success: bool,
    allow_html: bool,
}

impl Toast {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            success: false,
            allow_html: false,
        }
    }

    pub fn success(mut self, success: bool) -> Self {
        self.success = success;
        self
    }

    /// Insert the text as markup instead of escaping it.
    pub fn allow_html(mut self, allow_html: bool) -> Self {
        self.allow_html = allow_html;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn is_html(&self) -> bool {
        self.allow_html
    }
}

/// Style the toast, fill in its message and ask the host to show it.
pub fn trigger_toast<D: Document>(doc: &D, toast: &Toast) -> Result<(), DomError> {
    let live = doc
        .element_by_id(TOAST_ID)
        .ok_or_else(|| DomError::MissingElement(TOAST_ID.to_string()))?;
    let body = doc
        .element_by_id(TOAST_BODY_ID)
        .ok_or_else(|| DomError::MissingElement(TOAST_BODY_ID.to_string()))?;

    if toast.success {
        live.remove_class(DANGER_CLASS);
        live.add_class(SUCCESS_CLASS);
    } else {
        live.add_class(DANGER_CLASS);
        live.remove_class(SUCCESS_CLASS);
    }

    if toast.allow_html {
        body.set_inner_html(&toast.text);
    } else {
        body.set_inner_text(&toast.text);
    }

    debug!(success = toast.success, html = toast.allow_html, "showing toast");
    doc.show_toast(&live);
    Ok(())
}
