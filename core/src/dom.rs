//! Page abstraction used by the toast and spoiler behaviors.
//!
//! # Design
//! `Document` and `Element` cover only what the behaviors touch: lookups,
//! class lists, content setters, click handlers and the host's toast widget.
//! `MemoryDocument` is a single-threaded in-memory page for headless hosts
//! and tests; a browser binding implements the same traits over real nodes.

use std::cell::RefCell;
use std::rc::Rc;

/// A handle to one page element. Clones refer to the same element.
pub trait Element: Clone + 'static {
    fn add_class(&self, class: &str);
    fn remove_class(&self, class: &str);
    fn has_class(&self, class: &str) -> bool;
    /// Replace the content with markup, unescaped.
    fn set_inner_html(&self, html: &str);
    /// Replace the content with plain text; markup characters stay literal.
    fn set_inner_text(&self, text: &str);
    /// Run `handler` with the clicked element on every click.
    fn on_click(&self, handler: Box<dyn Fn(&Self)>);
}

/// A page as seen at call time.
pub trait Document {
    type Element: Element;

    fn element_by_id(&self, id: &str) -> Option<Self::Element>;
    fn elements_by_class(&self, class: &str) -> Vec<Self::Element>;
    /// Hand the element to the host's toast widget, which owns display timing.
    fn show_toast(&self, toast: &Self::Element);
}

#[derive(Debug, Clone)]
enum Content {
    Text(String),
    Html(String),
}

struct Node {
    id: Option<String>,
    classes: Vec<String>,
    content: Content,
    handlers: Vec<Rc<dyn Fn(&MemoryElement)>>,
    toast_shows: usize,
}

/// Element of a `MemoryDocument`.
#[derive(Clone)]
pub struct MemoryElement {
    node: Rc<RefCell<Node>>,
}

impl std::fmt::Debug for MemoryElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let node = self.node.borrow();
        f.debug_struct("MemoryElement")
            .field("id", &node.id)
            .field("classes", &node.classes)
            .field("content", &node.content)
            .finish()
    }
}

impl MemoryElement {
    pub fn id(&self) -> Option<String> {
        self.node.borrow().id.clone()
    }

    pub fn classes(&self) -> Vec<String> {
        self.node.borrow().classes.clone()
    }

    /// Serialized content. Plain text comes back escaped.
    pub fn inner_html(&self) -> String {
        match &self.node.borrow().content {
            Content::Text(text) => escape_text(text),
            Content::Html(html) => html.clone(),
        }
    }

    /// Dispatch a click to every registered handler, in registration order.
    pub fn click(&self) {
        let handlers = self.node.borrow().handlers.clone();
        for handler in handlers {
            handler(self);
        }
    }

    /// How many times the host was asked to display this element as a toast.
    pub fn toast_shows(&self) -> usize {
        self.node.borrow().toast_shows
    }
}

impl Element for MemoryElement {
    fn add_class(&self, class: &str) {
        let mut node = self.node.borrow_mut();
        if !node.classes.iter().any(|c| c == class) {
            node.classes.push(class.to_string());
        }
    }

    fn remove_class(&self, class: &str) {
        self.node.borrow_mut().classes.retain(|c| c != class);
    }

    fn has_class(&self, class: &str) -> bool {
        self.node.borrow().classes.iter().any(|c| c == class)
    }

    fn set_inner_html(&self, html: &str) {
        self.node.borrow_mut().content = Content::Html(html.to_string());
    }

    fn set_inner_text(&self, text: &str) {
        self.node.borrow_mut().content = Content::Text(text.to_string());
    }

    fn on_click(&self, handler: Box<dyn Fn(&Self)>) {
        self.node.borrow_mut().handlers.push(Rc::from(handler));
    }
}

/// Single-threaded in-memory page.
#[derive(Clone, Default)]
pub struct MemoryDocument {
    elements: Rc<RefCell<Vec<MemoryElement>>>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element with an optional id and an initial class list.
    pub fn create_element(&self, id: Option<&str>, classes: &[&str]) -> MemoryElement {
        let element = MemoryElement {
            node: Rc::new(RefCell::new(Node {
                id: id.map(str::to_string),
                classes: Vec::new(),
                content: Content::Text(String::new()),
                handlers: Vec::new(),
                toast_shows: 0,
            })),
        };
        for class in classes {
            element.add_class(class);
        }
        self.elements.borrow_mut().push(element.clone());
        element
    }
}

impl Document for MemoryDocument {
    type Element = MemoryElement;

    fn element_by_id(&self, id: &str) -> Option<MemoryElement> {
        self.elements
            .borrow()
            .iter()
            .find(|el| el.node.borrow().id.as_deref() == Some(id))
            .cloned()
    }

    fn elements_by_class(&self, class: &str) -> Vec<MemoryElement> {
        self.elements
            .borrow()
            .iter()
            .filter(|el| el.has_class(class))
            .cloned()
            .collect()
    }

    fn show_toast(&self, toast: &MemoryElement) {
        toast.node.borrow_mut().toast_shows += 1;
    }
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}
