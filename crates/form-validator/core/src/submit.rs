//! Submit control enablement

use crate::class_list::{add_class, remove_class};
use crate::dom::Element;
use crate::error::FormError;
use crate::{INVALID_CLASS, VALID_CLASS};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// When a submit control is enabled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitPolicy {
    Always,
    #[default]
    IfValid,
    IfInvalid,
}

impl SubmitPolicy {
    /// Whether a control under this policy is enabled for the given form validity
    pub fn is_enabled(self, form_valid: bool) -> bool {
        match self {
            SubmitPolicy::Always => true,
            SubmitPolicy::IfValid => form_valid,
            SubmitPolicy::IfInvalid => !form_valid,
        }
    }
}

impl FromStr for SubmitPolicy {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "always" => Ok(SubmitPolicy::Always),
            "if_valid" => Ok(SubmitPolicy::IfValid),
            "if_invalid" => Ok(SubmitPolicy::IfInvalid),
            other => Err(FormError::UnknownPolicy(other.to_string())),
        }
    }
}

/// Enablement policy of one submit control.
///
/// Changing the policy does not repaint the control; the next
/// [`Submit::validate`] call does.
pub struct Submit<E: Element> {
    element: E,
    policy: SubmitPolicy,
}

impl<E: Element> Submit<E> {
    pub fn new(element: E) -> Self {
        Self {
            element,
            policy: SubmitPolicy::default(),
        }
    }

    pub fn element(&self) -> &E {
        &self.element
    }

    pub fn policy(&self) -> SubmitPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: SubmitPolicy) -> &mut Self {
        self.policy = policy;
        self
    }

    pub fn enabled_always(&mut self) -> &mut Self {
        self.set_policy(SubmitPolicy::Always)
    }

    pub fn enabled_if_valid(&mut self) -> &mut Self {
        self.set_policy(SubmitPolicy::IfValid)
    }

    pub fn enabled_if_invalid(&mut self) -> &mut Self {
        self.set_policy(SubmitPolicy::IfInvalid)
    }

    /// Enables or disables the control for the given form validity.
    ///
    /// Returns whether the control ended up enabled.
    pub fn validate(&mut self, form_valid: bool) -> bool {
        let enabled = self.policy.is_enabled(form_valid);
        if enabled {
            self.make_enabled();
        } else {
            self.make_disabled();
        }
        enabled
    }

    pub fn make_enabled(&mut self) {
        remove_class(&self.element, INVALID_CLASS);
        add_class(&self.element, VALID_CLASS);
        self.element.set_disabled(false);
    }

    pub fn make_disabled(&mut self) {
        remove_class(&self.element, VALID_CLASS);
        add_class(&self.element, INVALID_CLASS);
        self.element.set_disabled(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class_list::has_class;
    use crate::memory::MemoryElement;
    use rstest::rstest;

    #[rstest]
    #[case(SubmitPolicy::Always, true, true)]
    #[case(SubmitPolicy::Always, false, true)]
    #[case(SubmitPolicy::IfValid, true, true)]
    #[case(SubmitPolicy::IfValid, false, false)]
    #[case(SubmitPolicy::IfInvalid, true, false)]
    #[case(SubmitPolicy::IfInvalid, false, true)]
    fn test_policy_outcomes(
        #[case] policy: SubmitPolicy,
        #[case] form_valid: bool,
        #[case] enabled: bool,
    ) {
        let mut submit = Submit::new(MemoryElement::submit("send"));
        submit.set_policy(policy);

        assert_eq!(submit.validate(form_valid), enabled);
        assert_eq!(submit.element().disabled(), !enabled);
        assert_eq!(has_class(submit.element(), VALID_CLASS), enabled);
        assert_eq!(has_class(submit.element(), INVALID_CLASS), !enabled);
    }

    #[test]
    fn test_default_policy_is_if_valid() {
        let submit = Submit::new(MemoryElement::submit("send"));
        assert_eq!(submit.policy(), SubmitPolicy::IfValid);
    }

    #[test]
    fn test_policy_change_does_not_repaint() {
        let mut submit = Submit::new(MemoryElement::submit("send"));
        submit.validate(false);
        assert!(submit.element().disabled());

        submit.enabled_always();
        assert!(submit.element().disabled());
        assert!(has_class(submit.element(), INVALID_CLASS));

        submit.validate(false);
        assert!(!submit.element().disabled());
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("always".parse::<SubmitPolicy>().unwrap(), SubmitPolicy::Always);
        assert_eq!(
            "if_invalid".parse::<SubmitPolicy>().unwrap(),
            SubmitPolicy::IfInvalid
        );
        assert!(matches!(
            "sometimes".parse::<SubmitPolicy>(),
            Err(FormError::UnknownPolicy(_))
        ));
    }
}
