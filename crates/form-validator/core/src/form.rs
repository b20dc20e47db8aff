//! Form: the fields and submit controls found under one root element

use crate::config::{FieldRules, FormConfig};
use crate::dom::{
    Document, Element, POLICY_ATTRIBUTE, RULES_ATTRIBUTE, SUBMIT_SELECTOR, TEXT_INPUT_SELECTOR,
};
use crate::error::{FormError, Result};
use crate::field::Field;
use crate::submit::{Submit, SubmitPolicy};
use indexmap::IndexMap;
use std::cell::{RefCell, RefMut};
use std::rc::{Rc, Weak};

struct FormState<E: Element> {
    /// Every field ever created, including ones displaced by a later input
    /// with the same name; input handlers refer to their field by position.
    fields: Vec<Field<E>>,
    field_names: IndexMap<String, usize>,
    submits: IndexMap<String, Submit<E>>,
}

impl<E: Element> FormState<E> {
    fn is_valid(&self) -> bool {
        self.field_names
            .values()
            .all(|&index| self.fields[index].is_valid())
    }

    fn validate_fields(&mut self) {
        for &index in self.field_names.values() {
            self.fields[index].validate();
        }
    }

    fn validate_submits(&mut self) -> bool {
        let form_valid = self.is_valid();
        for submit in self.submits.values_mut() {
            submit.validate(form_valid);
        }
        form_valid
    }
}

/// Handle to a validated form.
///
/// Fields and submits are discovered once, when the form is created; inputs
/// added to the page later are not picked up. Clones share the same state.
///
/// Every named text input gets an input handler that re-validates the field
/// and then the form's submit controls.
pub struct Form<E: Element> {
    id: Rc<str>,
    state: Rc<RefCell<FormState<E>>>,
}

impl<E: Element> Clone for Form<E> {
    fn clone(&self) -> Self {
        Self {
            id: Rc::clone(&self.id),
            state: Rc::clone(&self.state),
        }
    }
}

impl<E: Element> Form<E> {
    /// Creates the form rooted at the element with the given id.
    ///
    /// If no such element exists, a warning is logged and the form has no
    /// fields or submits.
    pub fn new<D>(document: &D, id: &str) -> Self
    where
        D: Document<Element = E>,
    {
        Self::try_new(document, id).unwrap_or_else(|err| {
            tracing::warn!("{}", err);
            Self::empty(id)
        })
    }

    /// Like [`Form::new`], but reports a missing root element
    pub fn try_new<D>(document: &D, id: &str) -> Result<Self>
    where
        D: Document<Element = E>,
    {
        let root = document
            .element_by_id(id)
            .ok_or_else(|| FormError::FormNotFound(id.to_string()))?;
        Ok(Self::from_root(id, &root))
    }

    /// Scans `root` for named text inputs and submit controls
    pub fn from_root(id: &str, root: &E) -> Self {
        let form = Self::empty(id);
        let handle = Rc::downgrade(&form.state);

        {
            let mut state = form.state.borrow_mut();

            for element in root.query_selector_all(TEXT_INPUT_SELECTOR) {
                let name = element.name();
                if name.is_empty() {
                    continue;
                }

                let mut field = Field::new(element.clone());
                if let Some(json) = element.attribute(RULES_ATTRIBUTE) {
                    apply_markup_rules(&mut field, &name, &json);
                }

                let index = state.fields.len();
                state.fields.push(field);
                bind_input(&element, Weak::clone(&handle), index);
                state.field_names.insert(name, index);
            }

            for element in root.query_selector_all(SUBMIT_SELECTOR) {
                let name = element.name();
                if name.is_empty() {
                    continue;
                }

                let mut submit = Submit::new(element.clone());
                if let Some(policy) = element.attribute(POLICY_ATTRIBUTE) {
                    match policy.parse::<SubmitPolicy>() {
                        Ok(policy) => {
                            submit.set_policy(policy);
                        }
                        Err(err) => tracing::warn!(submit = %name, "{}", err),
                    }
                }
                state.submits.insert(name, submit);
            }

            tracing::debug!(
                form = id,
                fields = state.field_names.len(),
                submits = state.submits.len(),
                "form scanned"
            );
        }

        form
    }

    fn empty(id: &str) -> Self {
        Self {
            id: Rc::from(id),
            state: Rc::new(RefCell::new(FormState {
                fields: Vec::new(),
                field_names: IndexMap::new(),
                submits: IndexMap::new(),
            })),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether both handles refer to the same form
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }

    fn borrow_state(&self) -> Result<RefMut<'_, FormState<E>>> {
        self.state.try_borrow_mut().map_err(|_| {
            let err = FormError::FormBusy(self.id.to_string());
            tracing::warn!("{}", err);
            err
        })
    }

    /// Borrows the field with the given name.
    ///
    /// Fails with [`FormError::FormBusy`] while another field or submit
    /// handle of this form is alive.
    pub fn field(&self, name: &str) -> Result<RefMut<'_, Field<E>>> {
        RefMut::filter_map(self.borrow_state()?, |state| {
            let index = *state.field_names.get(name)?;
            state.fields.get_mut(index)
        })
        .map_err(|_| {
            let err = FormError::FieldNotFound(name.to_string());
            tracing::warn!("{}", err);
            err
        })
    }

    /// Borrows the submit control with the given name.
    ///
    /// Fails with [`FormError::FormBusy`] while another field or submit
    /// handle of this form is alive.
    pub fn submit(&self, name: &str) -> Result<RefMut<'_, Submit<E>>> {
        RefMut::filter_map(self.borrow_state()?, |state| state.submits.get_mut(name)).map_err(
            |_| {
                let err = FormError::SubmitNotFound(name.to_string());
                tracing::warn!("{}", err);
                err
            },
        )
    }

    pub fn field_names(&self) -> Vec<String> {
        self.state.borrow().field_names.keys().cloned().collect()
    }

    pub fn submit_names(&self) -> Vec<String> {
        self.state.borrow().submits.keys().cloned().collect()
    }

    /// Aggregate validity from the fields' current flags, without repainting
    pub fn is_valid(&self) -> bool {
        self.state.borrow().is_valid()
    }

    /// Validates and marks every field
    pub fn validate_fields(&self) {
        self.state.borrow_mut().validate_fields();
    }

    /// Enables or disables every submit control from the aggregate validity.
    ///
    /// Returns the aggregate validity.
    pub fn validate_submits(&self) -> bool {
        self.state.borrow_mut().validate_submits()
    }

    /// Full pass: fields first, then submits
    pub fn validate(&self) -> bool {
        let mut state = self.state.borrow_mut();
        state.validate_fields();
        state.validate_submits()
    }

    /// Applies rules and policies by name.
    ///
    /// Stops at the first unknown name or malformed pattern; entries before it
    /// stay applied.
    pub fn configure(&self, config: &FormConfig) -> Result<()> {
        for (name, rules) in &config.fields {
            self.field(name)?.apply(rules)?;
        }
        for (name, policy) in &config.submits {
            self.submit(name)?.set_policy(*policy);
        }
        Ok(())
    }
}

fn apply_markup_rules<E: Element>(field: &mut Field<E>, name: &str, json: &str) {
    let rules = match FieldRules::from_json(json) {
        Ok(rules) => rules,
        Err(source) => {
            let err = FormError::InvalidRules {
                name: name.to_string(),
                source,
            };
            tracing::warn!("{}", err);
            return;
        }
    };

    if let Err(err) = field.apply(&rules) {
        tracing::warn!(field = name, "{}", err);
    }
}

fn bind_input<E: Element>(element: &E, state: Weak<RefCell<FormState<E>>>, index: usize) {
    element.on_input(Box::new(move || {
        let Some(state) = state.upgrade() else {
            return;
        };
        let Ok(mut form) = state.try_borrow_mut() else {
            tracing::warn!(field = index, "form is borrowed, input ignored");
            return;
        };

        if let Some(field) = form.fields.get_mut(index) {
            field.validate();
        }
        form.validate_submits();
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class_list::has_class;
    use crate::memory::{MemoryDocument, MemoryElement};
    use crate::{INVALID_CLASS, VALID_CLASS};
    use pretty_assertions::assert_eq;

    fn document() -> MemoryDocument {
        let root = MemoryElement::new("form").with_id("signup");
        root.append(MemoryElement::text_input("user"));
        root.append(MemoryElement::text_input(""));
        root.append(MemoryElement::text_input("email"));
        root.append(MemoryElement::submit("send"));
        root.append(MemoryElement::submit(""));
        MemoryDocument::new(root)
    }

    #[test]
    fn test_scan_registers_named_inputs_only() {
        let form = Form::new(&document(), "signup");
        assert_eq!(form.id(), "signup");
        assert_eq!(form.field_names(), vec!["user", "email"]);
        assert_eq!(form.submit_names(), vec!["send"]);
    }

    #[test]
    fn test_missing_root_is_empty_form() {
        let form = Form::new(&document(), "nope");
        assert!(form.field_names().is_empty());
        assert!(form.submit_names().is_empty());
        assert!(form.is_valid());
        assert!(form.validate());

        assert!(matches!(
            Form::try_new(&document(), "nope"),
            Err(FormError::FormNotFound(id)) if id == "nope"
        ));
    }

    #[test]
    fn test_lookup_misses_are_errors() {
        let form = Form::new(&document(), "signup");
        assert!(matches!(
            form.field("missing"),
            Err(FormError::FieldNotFound(name)) if name == "missing"
        ));
        assert!(matches!(
            form.submit("missing"),
            Err(FormError::SubmitNotFound(_))
        ));
        assert!(form.field("user").is_ok());
    }

    #[test]
    fn test_later_name_collision_wins() {
        let root = MemoryElement::new("form").with_id("f");
        let first = MemoryElement::text_input("dup");
        let second = MemoryElement::text_input("dup");
        root.append(first);
        root.append(second.clone());

        let form = Form::new(&MemoryDocument::new(root), "f");
        assert_eq!(form.field_names(), vec!["dup"]);
        assert!(form.field("dup").unwrap().element().ptr_eq(&second));
    }

    #[test]
    fn test_displaced_field_marks_its_own_element() {
        let root = MemoryElement::new("form").with_id("f");
        let first = MemoryElement::text_input("dup");
        let second = MemoryElement::text_input("dup");
        let send = MemoryElement::submit("send");
        root.append(first.clone());
        root.append(second.clone());
        root.append(send.clone());
        let _form = Form::new(&MemoryDocument::new(root), "f");

        first.set_value("abc");
        assert!(has_class(&first, VALID_CLASS));
        assert_eq!(second.class_name(), None);
        assert!(send.disabled(), "only the surviving field counts");

        second.set_value("xyz");
        assert!(has_class(&second, VALID_CLASS));
        assert!(!send.disabled());

        first.set_value("");
        assert!(has_class(&first, INVALID_CLASS));
        assert!(!send.disabled());
    }

    #[test]
    fn test_overlapping_handles_report_busy() {
        let form = Form::new(&document(), "signup");
        let user = form.field("user").unwrap();

        assert!(matches!(
            form.field("email"),
            Err(FormError::FormBusy(id)) if id == "signup"
        ));
        assert!(matches!(form.submit("send"), Err(FormError::FormBusy(_))));

        drop(user);
        assert!(form.field("email").is_ok());
    }

    #[test]
    fn test_validate_submits_uses_current_flags() {
        let form = Form::new(&document(), "signup");
        assert!(!form.validate_submits());

        form.field("user").unwrap().optional();
        form.field("email").unwrap().optional();
        assert!(form.validate_submits());

        let submit = form.submit("send").unwrap();
        assert!(!submit.element().disabled());
        assert!(has_class(submit.element(), VALID_CLASS));
    }

    #[test]
    fn test_input_event_revalidates_field_and_submits() {
        let root = MemoryElement::new("form").with_id("f");
        let user = MemoryElement::text_input("user");
        let send = MemoryElement::submit("send");
        root.append(user.clone());
        root.append(send.clone());

        let form = Form::new(&MemoryDocument::new(root), "f");
        form.field("user").unwrap().min_length(3);
        form.validate();
        assert!(send.disabled());

        user.set_value("ab");
        assert!(has_class(&user, INVALID_CLASS));
        assert!(send.disabled());

        user.set_value("abc");
        assert!(has_class(&user, VALID_CLASS));
        assert!(!send.disabled());
        assert!(has_class(&send, VALID_CLASS));
    }

    #[test]
    fn test_input_after_form_dropped_is_ignored() {
        let root = MemoryElement::new("form").with_id("f");
        let user = MemoryElement::text_input("user");
        root.append(user.clone());

        drop(Form::new(&MemoryDocument::new(root), "f"));
        user.set_value("abc");
        assert_eq!(user.class_name(), None);
    }

    #[test]
    fn test_markup_rules_applied_at_scan() {
        let root = MemoryElement::new("form").with_id("f");
        root.append(
            MemoryElement::text_input("zip")
                .with_attribute(RULES_ATTRIBUTE, r#"{"regex":"\\d{5}","maxLength":5}"#),
        );
        root.append(MemoryElement::text_input("note").with_attribute(RULES_ATTRIBUTE, "{oops"));
        root.append(MemoryElement::submit("reset").with_attribute(POLICY_ATTRIBUTE, "if_invalid"));
        root.append(MemoryElement::submit("other").with_attribute(POLICY_ATTRIBUTE, "bogus"));

        let form = Form::new(&MemoryDocument::new(root), "f");
        assert_eq!(form.field("zip").unwrap().pattern(), Some(r"\d{5}"));
        assert_eq!(form.field("zip").unwrap().length_bounds(), (1, Some(5)));
        assert_eq!(form.field("note").unwrap().pattern(), None);
        assert_eq!(
            form.submit("reset").unwrap().policy(),
            SubmitPolicy::IfInvalid
        );
        assert_eq!(form.submit("other").unwrap().policy(), SubmitPolicy::IfValid);
    }

    #[test]
    fn test_configure() {
        let form = Form::new(&document(), "signup");
        let config: FormConfig = serde_json::from_str(
            r#"{"fields": {"user": {"minLength": 4}}, "submits": {"send": "always"}}"#,
        )
        .unwrap();

        form.configure(&config).unwrap();
        assert_eq!(form.field("user").unwrap().length_bounds(), (4, None));
        assert_eq!(form.submit("send").unwrap().policy(), SubmitPolicy::Always);

        let bad: FormConfig =
            serde_json::from_str(r#"{"fields": {"ghost": {"required": false}}}"#).unwrap();
        assert!(matches!(
            form.configure(&bad),
            Err(FormError::FieldNotFound(_))
        ));
    }

    #[test]
    fn test_clones_share_state() {
        let form = Form::new(&document(), "signup");
        let other = form.clone();
        other.field("user").unwrap().max_length(2);

        assert!(form.ptr_eq(&other));
        assert_eq!(form.field("user").unwrap().length_bounds(), (1, Some(2)));
    }
}
