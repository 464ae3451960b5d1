//! Click-to-reveal spoilers.
//!
//! Only elements present when `register_spoilers` runs are wired; elements
//! added later need another call.

use tracing::debug;

use crate::dom::{Document, Element};

pub const SPOILER_CLASS: &str = "spoiler";
pub const REVEALED_CLASS: &str = "revealed";

/// Attach a reveal handler to every spoiler on the page. Returns how many
/// elements were wired.
pub fn register_spoilers<D: Document>(doc: &D) -> usize {
    let spoilers = doc.elements_by_class(SPOILER_CLASS);
    for el in &spoilers {
        reveal_on_click(el);
    }
    debug!(count = spoilers.len(), "spoiler handlers registered");
    spoilers.len()
}

fn reveal_on_click<E: Element>(el: &E) {
    el.on_click(Box::new(|target: &E| target.add_class(REVEALED_CLASS)));
}
