//! Page-wide collection of forms

use crate::dom::{Element, ReadyState};
use crate::form::Form;

/// Forms subject to bulk validation.
///
/// One registry per page is the usual setup; it is created by the embedding
/// code and passed where needed rather than living in a global.
pub struct ValidatorRegistry<E: Element> {
    forms: Vec<Form<E>>,
    initial_pass_done: bool,
}

impl<E: Element> ValidatorRegistry<E> {
    pub fn new() -> Self {
        Self {
            forms: Vec::new(),
            initial_pass_done: false,
        }
    }

    /// Registers a form. The same form may be registered more than once and
    /// is then validated once per registration.
    pub fn add_form(&mut self, form: Form<E>) {
        tracing::debug!(form = form.id(), "form registered");
        self.forms.push(form);
    }

    pub fn forms(&self) -> &[Form<E>] {
        &self.forms
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }

    /// Validates the fields, then the submits, of every form in registration order
    pub fn validate_all(&self) {
        tracing::debug!(forms = self.forms.len(), "validating all forms");
        for form in &self.forms {
            form.validate_fields();
            form.validate_submits();
        }
    }

    /// Whether the page-load validation pass has run
    pub fn initial_pass_done(&self) -> bool {
        self.initial_pass_done
    }

    /// Document readiness hook. Runs [`Self::validate_all`] once, on the first
    /// state past `loading`, and returns whether it did.
    ///
    /// Normally that is the `interactive` transition. A registry created after
    /// the page became interactive first sees `complete` (or reads the current
    /// state itself) and runs the pass then.
    pub fn handle_ready_state(&mut self, state: ReadyState) -> bool {
        if state == ReadyState::Loading || self.initial_pass_done {
            return false;
        }

        tracing::debug!(?state, "initial validation pass");
        self.initial_pass_done = true;
        self.validate_all();
        true
    }
}

impl<E: Element> Default for ValidatorRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}
