//! `Document` and `Element` over live DOM nodes.
//!
//! # Design
//! `WebElement` wraps a `web_sys::Element` and `WebDocument` the page's
//! `web_sys::Document`. Class lists go through `classList`, plain text
//! through `innerText` where the node is an `HtmlElement`. The toast widget
//! is Bootstrap's, reached through `bootstrap.Toast` on the page.

use restglue_core::{Document, Element};
use tracing::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = bootstrap, js_name = Toast)]
    type BootstrapToast;

    #[wasm_bindgen(constructor, js_namespace = bootstrap, js_class = "Toast", catch)]
    fn new(element: &web_sys::Element) -> Result<BootstrapToast, JsValue>;

    #[wasm_bindgen(method)]
    fn show(this: &BootstrapToast);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebElement {
    inner: web_sys::Element,
}

impl WebElement {
    pub fn new(inner: web_sys::Element) -> Self {
        Self { inner }
    }

    pub fn as_element(&self) -> &web_sys::Element {
        &self.inner
    }
}

impl Element for WebElement {
    fn add_class(&self, class: &str) {
        if let Err(e) = self.inner.class_list().add_1(class) {
            warn!(class, error = ?e, "classList.add failed");
        }
    }

    fn remove_class(&self, class: &str) {
        if let Err(e) = self.inner.class_list().remove_1(class) {
            warn!(class, error = ?e, "classList.remove failed");
        }
    }

    fn has_class(&self, class: &str) -> bool {
        self.inner.class_list().contains(class)
    }

    fn set_inner_html(&self, html: &str) {
        self.inner.set_inner_html(html);
    }

    fn set_inner_text(&self, text: &str) {
        match self.inner.dyn_ref::<HtmlElement>() {
            Some(el) => el.set_inner_text(text),
            None => self.inner.set_text_content(Some(text)),
        }
    }

    fn on_click(&self, handler: Box<dyn Fn(&Self)>) {
        let target = self.clone();
        let closure = Closure::<dyn Fn(web_sys::Event)>::new(move |_: web_sys::Event| {
            handler(&target);
        });
        if let Err(e) = self
            .inner
            .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
        {
            warn!(error = ?e, "addEventListener failed");
        }
        // The listener lives as long as the page.
        closure.forget();
    }
}

/// The page a module runs in.
#[derive(Debug, Clone)]
pub struct WebDocument {
    inner: web_sys::Document,
}

impl WebDocument {
    pub fn new(inner: web_sys::Document) -> Self {
        Self { inner }
    }

    /// The document of the global window, if there is one.
    pub fn current() -> Option<Self> {
        web_sys::window()?.document().map(Self::new)
    }
}

impl Document for WebDocument {
    type Element = WebElement;

    fn element_by_id(&self, id: &str) -> Option<WebElement> {
        self.inner.get_element_by_id(id).map(WebElement::new)
    }

    fn elements_by_class(&self, class: &str) -> Vec<WebElement> {
        // The collection is live; snapshot it so later DOM changes don't leak in.
        let live = self.inner.get_elements_by_class_name(class);
        (0..live.length())
            .filter_map(|i| live.item(i))
            .map(WebElement::new)
            .collect()
    }

    fn show_toast(&self, toast: &WebElement) {
        match BootstrapToast::new(toast.as_element()) {
            Ok(widget) => widget.show(),
            Err(e) => warn!(error = ?e, "bootstrap.Toast unavailable"),
        }
    }
}
