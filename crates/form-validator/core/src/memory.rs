//! In-memory DOM backend
//!
//! A small element tree implementing [`Document`] and [`Element`], for native
//! tests and headless use. Attributes (including `id`, `name` and `class`)
//! live in one ordered map; `value` and `disabled` are properties.
//!
//! Only simple selectors are supported: `tag`, `[attr="value"]` and
//! `tag[attr="value"]`.

use crate::dom::{Document, Element};
use indexmap::IndexMap;
use std::cell::RefCell;
use std::rc::Rc;

type InputHandler = Rc<RefCell<Box<dyn FnMut()>>>;

struct Node {
    tag: String,
    attributes: IndexMap<String, String>,
    value: Option<String>,
    disabled: bool,
    children: Vec<MemoryElement>,
    on_input: Option<InputHandler>,
    class_writes: usize,
    value_reads: usize,
}

/// Shared handle to an in-memory element
#[derive(Clone)]
pub struct MemoryElement {
    node: Rc<RefCell<Node>>,
}

impl MemoryElement {
    pub fn new(tag: &str) -> Self {
        Self {
            node: Rc::new(RefCell::new(Node {
                tag: tag.to_ascii_lowercase(),
                attributes: IndexMap::new(),
                value: None,
                disabled: false,
                children: Vec::new(),
                on_input: None,
                class_writes: 0,
                value_reads: 0,
            })),
        }
    }

    /// `<input type="text" name="...">`
    pub fn text_input(name: &str) -> Self {
        Self::new("input")
            .with_attribute("type", "text")
            .with_attribute("name", name)
    }

    /// `<input type="submit" name="...">`
    pub fn submit(name: &str) -> Self {
        Self::new("input")
            .with_attribute("type", "submit")
            .with_attribute("name", name)
    }

    pub fn with_id(self, id: &str) -> Self {
        self.with_attribute("id", id)
    }

    pub fn with_attribute(self, name: &str, value: &str) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn set_attribute(&self, name: &str, value: &str) {
        self.node
            .borrow_mut()
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    pub fn tag(&self) -> String {
        self.node.borrow().tag.clone()
    }

    pub fn append(&self, child: MemoryElement) {
        self.node.borrow_mut().children.push(child);
    }

    pub fn children(&self) -> Vec<MemoryElement> {
        self.node.borrow().children.clone()
    }

    /// Simulates user input: updates the value, then fires the input handler
    pub fn set_value(&self, value: &str) {
        let handler = {
            let mut node = self.node.borrow_mut();
            node.value = Some(value.to_string());
            node.on_input.clone()
        };

        if let Some(handler) = handler {
            (&mut *handler.borrow_mut())();
        }
    }

    /// Updates the value without firing the input handler
    pub fn set_value_silently(&self, value: &str) {
        self.node.borrow_mut().value = Some(value.to_string());
    }

    pub fn has_input_handler(&self) -> bool {
        self.node.borrow().on_input.is_some()
    }

    /// Number of class attribute writes so far
    pub fn class_writes(&self) -> usize {
        self.node.borrow().class_writes
    }

    /// Number of value reads so far
    pub fn value_reads(&self) -> usize {
        self.node.borrow().value_reads
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.node, &other.node)
    }

    fn find_by_id(&self, id: &str) -> Option<MemoryElement> {
        if self.attribute("id").as_deref() == Some(id) {
            return Some(self.clone());
        }
        self.children()
            .iter()
            .find_map(|child| child.find_by_id(id))
    }

    fn collect_matching(&self, selector: &Selector, found: &mut Vec<MemoryElement>) {
        for child in self.children() {
            if selector.matches(&child) {
                found.push(child.clone());
            }
            child.collect_matching(selector, found);
        }
    }
}

impl Element for MemoryElement {
    fn class_name(&self) -> Option<String> {
        self.attribute("class")
    }

    fn set_class_name(&self, class_name: &str) {
        let mut node = self.node.borrow_mut();
        node.attributes
            .insert("class".to_string(), class_name.to_string());
        node.class_writes += 1;
    }

    fn value(&self) -> Option<String> {
        let mut node = self.node.borrow_mut();
        node.value_reads += 1;
        node.value.clone()
    }

    fn name(&self) -> String {
        self.attribute("name").unwrap_or_default()
    }

    fn disabled(&self) -> bool {
        self.node.borrow().disabled
    }

    fn set_disabled(&self, disabled: bool) {
        self.node.borrow_mut().disabled = disabled;
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.node.borrow().attributes.get(name).cloned()
    }

    fn query_selector_all(&self, selector: &str) -> Vec<Self> {
        let mut found = Vec::new();
        match Selector::parse(selector) {
            Some(selector) => self.collect_matching(&selector, &mut found),
            None => tracing::warn!(selector, "unsupported selector"),
        }
        found
    }

    fn on_input(&self, handler: Box<dyn FnMut()>) {
        self.node.borrow_mut().on_input = Some(Rc::new(RefCell::new(handler)));
    }
}

/// Document whose element tree hangs off one root
#[derive(Clone)]
pub struct MemoryDocument {
    root: MemoryElement,
}

impl MemoryDocument {
    pub fn new(root: MemoryElement) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &MemoryElement {
        &self.root
    }
}

impl Document for MemoryDocument {
    type Element = MemoryElement;

    fn element_by_id(&self, id: &str) -> Option<MemoryElement> {
        self.root.find_by_id(id)
    }
}

#[derive(Debug, PartialEq, Eq)]
struct Selector {
    tag: Option<String>,
    attribute: Option<(String, String)>,
}

impl Selector {
    fn parse(selector: &str) -> Option<Self> {
        let selector = selector.trim();
        let (tag, rest) = match selector.find('[') {
            Some(start) => (&selector[..start], Some(&selector[start..])),
            None => (selector, None),
        };

        if !tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return None;
        }

        let attribute = match rest {
            Some(rest) => {
                let inner = rest.strip_prefix('[')?.strip_suffix(']')?;
                let (name, value) = inner.split_once('=')?;
                let value = value.trim();
                let value = value
                    .strip_prefix('"')
                    .and_then(|v| v.strip_suffix('"'))
                    .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
                    .unwrap_or(value);
                Some((name.trim().to_string(), value.to_string()))
            }
            None => None,
        };

        if tag.is_empty() && attribute.is_none() {
            return None;
        }

        Some(Self {
            tag: (!tag.is_empty()).then(|| tag.to_ascii_lowercase()),
            attribute,
        })
    }

    fn matches(&self, element: &MemoryElement) -> bool {
        if let Some(tag) = &self.tag {
            if element.tag() != *tag {
                return false;
            }
        }
        match &self.attribute {
            Some((name, value)) => element.attribute(name).as_deref() == Some(value.as_str()),
            None => true,
        }
    }
}
