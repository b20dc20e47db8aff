//! DOM collaborator contract
//!
//! The validator never talks to a browser directly. Everything it needs from the
//! host page goes through these traits, implemented over `web-sys` in the wasm
//! crate and by [`crate::memory`] for native use.

use crate::error::FormError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Selector for text inputs scanned by a form
pub const TEXT_INPUT_SELECTOR: &str = r#"input[type="text"]"#;

/// Selector for submit controls scanned by a form
pub const SUBMIT_SELECTOR: &str = r#"input[type="submit"]"#;

/// Attribute carrying JSON field rules on a text input
pub const RULES_ATTRIBUTE: &str = "data-validate";

/// Attribute carrying the enablement policy of a submit control
pub const POLICY_ATTRIBUTE: &str = "data-enabled";

/// Handle to one element of the host page.
///
/// Handles are cheap to clone and refer to the same underlying element, so all
/// setters take `&self`.
pub trait Element: Clone + 'static {
    /// Raw class attribute, `None` if unset
    fn class_name(&self) -> Option<String>;

    fn set_class_name(&self, class_name: &str);

    /// Current input content, `None` before the element has any value
    fn value(&self) -> Option<String>;

    /// The `name` attribute, empty if unset
    fn name(&self) -> String;

    fn disabled(&self) -> bool;

    fn set_disabled(&self, disabled: bool);

    fn attribute(&self, name: &str) -> Option<String>;

    /// Descendants matching `selector`, in document order
    fn query_selector_all(&self, selector: &str) -> Vec<Self>;

    /// Replaces the element's input handler slot
    fn on_input(&self, handler: Box<dyn FnMut()>);
}

/// Element lookup on the host page
pub trait Document {
    type Element: Element;

    fn element_by_id(&self, id: &str) -> Option<Self::Element>;
}

/// Document loading state, as reported by `document.readyState`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadyState {
    Loading,
    Interactive,
    Complete,
}

impl FromStr for ReadyState {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "loading" => Ok(ReadyState::Loading),
            "interactive" => Ok(ReadyState::Interactive),
            "complete" => Ok(ReadyState::Complete),
            other => Err(FormError::UnknownReadyState(other.to_string())),
        }
    }
}
