//! `web-sys` implementation of the DOM collaborator traits

use form_validator_core::{Document, Element};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, HtmlInputElement};

/// Handle to a live page element
#[derive(Clone)]
pub struct WebElement {
    element: web_sys::Element,
}

impl WebElement {
    pub fn new(element: web_sys::Element) -> Self {
        Self { element }
    }

    pub fn inner(&self) -> &web_sys::Element {
        &self.element
    }

    fn input(&self) -> Option<&HtmlInputElement> {
        self.element.dyn_ref::<HtmlInputElement>()
    }
}

impl Element for WebElement {
    fn class_name(&self) -> Option<String> {
        self.element.get_attribute("class")
    }

    fn set_class_name(&self, class_name: &str) {
        self.element.set_class_name(class_name);
    }

    fn value(&self) -> Option<String> {
        self.input().map(HtmlInputElement::value)
    }

    fn name(&self) -> String {
        match self.input() {
            Some(input) => input.name(),
            None => self.element.get_attribute("name").unwrap_or_default(),
        }
    }

    fn disabled(&self) -> bool {
        match self.input() {
            Some(input) => input.disabled(),
            None => self.element.has_attribute("disabled"),
        }
    }

    fn set_disabled(&self, disabled: bool) {
        if let Some(input) = self.input() {
            input.set_disabled(disabled);
            return;
        }

        let result = if disabled {
            self.element.set_attribute("disabled", "")
        } else {
            self.element.remove_attribute("disabled")
        };
        if let Err(err) = result {
            tracing::warn!("Failed to update disabled attribute: {:?}", err);
        }
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.element.get_attribute(name)
    }

    fn query_selector_all(&self, selector: &str) -> Vec<Self> {
        let nodes = match self.element.query_selector_all(selector) {
            Ok(nodes) => nodes,
            Err(err) => {
                tracing::warn!(selector, "Invalid selector: {:?}", err);
                return Vec::new();
            }
        };

        (0..nodes.length())
            .filter_map(|i| nodes.get(i))
            .filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
            .map(WebElement::new)
            .collect()
    }

    fn on_input(&self, handler: Box<dyn FnMut()>) {
        let Some(element) = self.element.dyn_ref::<HtmlElement>() else {
            tracing::warn!(name = %self.name(), "Element cannot receive input events");
            return;
        };

        // The handler stays bound for the rest of the page session.
        let closure = Closure::wrap(handler);
        element.set_oninput(Some(closure.as_ref().unchecked_ref()));
        closure.forget();
    }
}

/// The page's `document`
#[derive(Clone)]
pub struct WebDocument {
    document: web_sys::Document,
}

impl WebDocument {
    pub fn new(document: web_sys::Document) -> Self {
        Self { document }
    }

    /// Document of the current window, if running in a browser page
    pub fn current() -> Option<Self> {
        web_sys::window()
            .and_then(|window| window.document())
            .map(Self::new)
    }

    pub fn inner(&self) -> &web_sys::Document {
        &self.document
    }
}

impl Document for WebDocument {
    type Element = WebElement;

    fn element_by_id(&self, id: &str) -> Option<WebElement> {
        self.document.get_element_by_id(id).map(WebElement::new)
    }
}
