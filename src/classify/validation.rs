//! Field-level validation errors reported by forms.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            message: Some(message.into()),
        }
    }
}

/// One validation error or an ordered list of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValidationErrors {
    Single(FieldError),
    List(Vec<FieldError>),
}

impl ValidationErrors {
    pub fn as_slice(&self) -> &[FieldError] {
        match self {
            ValidationErrors::Single(error) => std::slice::from_ref(error),
            ValidationErrors::List(errors) => errors,
        }
    }

    /// The message of the first error, if it has one.
    pub fn first_message(&self) -> Option<&str> {
        self.as_slice()
            .first()
            .and_then(|error| error.message.as_deref())
            .filter(|message| !message.trim().is_empty())
    }
}

impl From<FieldError> for ValidationErrors {
    fn from(error: FieldError) -> Self {
        ValidationErrors::Single(error)
    }
}

impl From<Vec<FieldError>> for ValidationErrors {
    fn from(errors: Vec<FieldError>) -> Self {
        ValidationErrors::List(errors)
    }
}
