//! Declarative validation configuration
//!
//! Rules can be given in markup (`data-validate` JSON on a text input), from
//! JavaScript, or built in Rust and applied with [`crate::Form::configure`].

use crate::submit::SubmitPolicy;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Validation rules for a single text field.
///
/// Unset entries leave the field's current rule untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldRules {
    #[serde(default)]
    pub min_length: Option<usize>,

    /// Negative values mean no upper limit
    #[serde(default)]
    pub max_length: Option<i64>,

    #[serde(default)]
    pub regex: Option<String>,

    #[serde(default)]
    pub required: Option<bool>,
}

impl FieldRules {
    /// Parse rules from a `data-validate` attribute value
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Rules for a whole form, keyed by input name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormConfig {
    #[serde(default)]
    pub fields: IndexMap<String, FieldRules>,

    #[serde(default)]
    pub submits: IndexMap<String, SubmitPolicy>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_field_rules_from_json() {
        let rules =
            FieldRules::from_json(r#"{"minLength":3,"maxLength":-1,"regex":"^\\d+$","required":false}"#)
                .unwrap();

        assert_eq!(
            rules,
            FieldRules {
                min_length: Some(3),
                max_length: Some(-1),
                regex: Some(r"^\d+$".to_string()),
                required: Some(false),
            }
        );
    }

    #[test]
    fn test_field_rules_defaults_to_untouched() {
        assert_eq!(FieldRules::from_json("{}").unwrap(), FieldRules::default());
        assert!(FieldRules::from_json("{\"minLength\":\"three\"}").is_err());
    }

    #[test]
    fn test_form_config_keeps_declaration_order() {
        let config: FormConfig = serde_json::from_str(
            r#"{
                "fields": {"zip": {"regex": "^\\d{5}$"}, "city": {"required": false}},
                "submits": {"send": "if_valid", "reset": "always"}
            }"#,
        )
        .unwrap();

        let fields: Vec<&str> = config.fields.keys().map(String::as_str).collect();
        assert_eq!(fields, vec!["zip", "city"]);
        assert_eq!(config.submits["reset"], SubmitPolicy::Always);
    }
}
