//! Text field rules and state machine

use crate::class_list::{add_class, remove_class};
use crate::config::FieldRules;
use crate::dom::Element;
use crate::error::{FormError, Result};
use crate::{INVALID_CLASS, VALID_CLASS};
use fancy_regex::Regex;

/// Visual and logical state of a text field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldState {
    /// Marked `valid`
    Valid,
    /// Marked `invalid`
    Invalid,
    /// Unmarked but counted as valid (optional field left empty)
    Default,
}

impl FieldState {
    pub fn is_valid(self) -> bool {
        !matches!(self, FieldState::Invalid)
    }
}

/// Validation rules and state of one text input.
///
/// A new field requires at least one character, has no upper length limit
/// and no pattern. It starts out invalid until the first validation pass.
pub struct Field<E: Element> {
    element: E,
    min_length: usize,
    max_length: Option<usize>,
    regex: Option<Regex>,
    required: bool,
    is_valid: bool,
}

impl<E: Element> Field<E> {
    pub fn new(element: E) -> Self {
        Self {
            element,
            min_length: 1,
            max_length: None,
            regex: None,
            required: true,
            is_valid: false,
        }
    }

    pub fn element(&self) -> &E {
        &self.element
    }

    /// Validity computed by the last validation or requirement change
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Minimum and optional maximum length, in UTF-16 code units
    pub fn length_bounds(&self) -> (usize, Option<usize>) {
        (self.min_length, self.max_length)
    }

    pub fn pattern(&self) -> Option<&str> {
        self.regex.as_ref().map(Regex::as_str)
    }

    pub fn min_length(&mut self, length: usize) -> &mut Self {
        self.min_length = length;
        self
    }

    pub fn max_length(&mut self, length: usize) -> &mut Self {
        self.max_length = Some(length);
        self
    }

    /// Removes the upper length limit
    pub fn unbounded(&mut self) -> &mut Self {
        self.max_length = None;
        self
    }

    /// Sets the pattern the whole value must match.
    ///
    /// The pattern is compiled immediately; a malformed pattern leaves the
    /// field unchanged.
    pub fn regex(&mut self, pattern: &str) -> Result<&mut Self> {
        let regex = compile(pattern)?;
        Ok(self.with_regex(regex))
    }

    pub fn with_regex(&mut self, regex: Regex) -> &mut Self {
        self.regex = Some(regex);
        self
    }

    pub fn clear_regex(&mut self) -> &mut Self {
        self.regex = None;
        self
    }

    /// Marks the field as required. Validity is reset to false right away.
    pub fn required(&mut self) -> &mut Self {
        self.required = true;
        self.is_valid = false;
        self
    }

    /// Marks the field as optional. Validity is set to true right away.
    pub fn optional(&mut self) -> &mut Self {
        self.required = false;
        self.is_valid = true;
        self
    }

    /// Applies declarative rules. Nothing changes if the pattern is malformed.
    pub fn apply(&mut self, rules: &FieldRules) -> Result<&mut Self> {
        let regex = rules.regex.as_deref().map(compile).transpose()?;

        if let Some(min) = rules.min_length {
            self.min_length(min);
        }
        match rules.max_length {
            Some(max) if max >= 0 => {
                self.max_length = Some(max as usize);
            }
            Some(_) => {
                self.unbounded();
            }
            None => {}
        }
        if let Some(regex) = regex {
            self.with_regex(regex);
        }
        match rules.required {
            Some(true) => {
                self.required();
            }
            Some(false) => {
                self.optional();
            }
            None => {}
        }

        Ok(self)
    }

    /// Evaluates the rules against `value` without touching the element.
    ///
    /// Emptiness is checked first, then the length bounds, then the pattern.
    pub fn check(&self, value: Option<&str>) -> FieldState {
        let value = match value {
            Some(value) if !value.is_empty() => value,
            _ => {
                return if self.required {
                    FieldState::Invalid
                } else {
                    FieldState::Default
                };
            }
        };

        // Browsers measure input length in UTF-16 code units.
        let length = value.encode_utf16().count();
        if length < self.min_length {
            return FieldState::Invalid;
        }

        if let Some(max) = self.max_length {
            if length > max {
                return FieldState::Invalid;
            }
        }

        if let Some(regex) = &self.regex {
            let full_match = match regex.find(value) {
                Ok(found) => found.is_some_and(|m| m.start() == 0 && m.end() == value.len()),
                Err(err) => {
                    tracing::warn!(pattern = regex.as_str(), "Pattern match failed: {}", err);
                    false
                }
            };
            if !full_match {
                return FieldState::Invalid;
            }
        }

        FieldState::Valid
    }

    /// Validates the current input value and marks the element accordingly
    pub fn validate(&mut self) -> FieldState {
        let value = self.element.value();
        let state = self.check(value.as_deref());

        tracing::trace!(name = %self.element.name(), ?state, "field validated");

        match state {
            FieldState::Valid => self.make_valid(),
            FieldState::Invalid => self.make_invalid(),
            FieldState::Default => self.make_default(),
        }
        state
    }

    pub fn make_valid(&mut self) {
        remove_class(&self.element, INVALID_CLASS);
        add_class(&self.element, VALID_CLASS);
        self.is_valid = true;
    }

    pub fn make_invalid(&mut self) {
        remove_class(&self.element, VALID_CLASS);
        add_class(&self.element, INVALID_CLASS);
        self.is_valid = false;
    }

    /// Clears both markers; the field counts as valid
    pub fn make_default(&mut self) {
        remove_class(&self.element, VALID_CLASS);
        remove_class(&self.element, INVALID_CLASS);
        self.is_valid = true;
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| FormError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}
