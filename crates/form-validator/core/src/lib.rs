//! Form Validator Core
//!
//! DOM-agnostic client-side form validation.
//! Text inputs are checked against length/required/pattern rules and marked with
//! `valid`/`invalid` classes; submit controls are enabled or disabled from the
//! aggregate validity of their form.
//!
//! ## Example
//!
//! With the `memory` feature:
//!
//! ```rust
//! use form_validator_core::memory::{MemoryDocument, MemoryElement};
//! use form_validator_core::{Form, ReadyState, ValidatorRegistry};
//!
//! let root = MemoryElement::new("form").with_id("signup");
//! root.append(MemoryElement::text_input("user"));
//! root.append(MemoryElement::submit("send"));
//! let document = MemoryDocument::new(root);
//!
//! let form = Form::new(&document, "signup");
//! form.field("user").unwrap().min_length(3);
//!
//! let mut registry = ValidatorRegistry::new();
//! registry.add_form(form.clone());
//! registry.handle_ready_state(ReadyState::Interactive);
//!
//! assert!(!form.is_valid());
//! ```

pub mod class_list;
pub mod config;
pub mod dom;
pub mod error;
pub mod field;
pub mod form;
#[cfg(any(test, feature = "memory"))]
pub mod memory;
pub mod registry;
pub mod submit;

pub use config::{FieldRules, FormConfig};
pub use dom::{Document, Element, ReadyState};
pub use error::{FormError, Result};
pub use field::{Field, FieldState};
pub use form::Form;
pub use registry::ValidatorRegistry;
pub use submit::{Submit, SubmitPolicy};

/// Class marking a valid field or an enabled submit control
pub const VALID_CLASS: &str = "valid";

/// Class marking an invalid field or a disabled submit control
pub const INVALID_CLASS: &str = "invalid";
