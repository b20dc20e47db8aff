//! Error type shared by all validator components

/// Failures reported by form construction, lookups and rule configuration.
///
/// None of these are fatal to the page: a form that cannot be resolved behaves
/// as if it has no fields or submits.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("No form with id '{0}' found.")]
    FormNotFound(String),

    #[error("No text input field named '{0}' found.")]
    FieldNotFound(String),

    #[error("No submit named '{0}' found.")]
    SubmitNotFound(String),

    #[error("Form '{0}' is busy; release other field or submit handles first.")]
    FormBusy(String),

    #[error("Invalid regular expression '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: fancy_regex::Error,
    },

    #[error("Invalid validation rules on '{name}': {source}")]
    InvalidRules {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unknown document ready state '{0}'")]
    UnknownReadyState(String),

    #[error("Unknown submit policy '{0}'")]
    UnknownPolicy(String),
}

pub type Result<T, E = FormError> = std::result::Result<T, E>;
