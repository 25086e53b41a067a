use std::collections::BTreeSet;

use thiserror::Error;

/// Misuse of a form by calling code, or a typed read of a value that is not
/// usable. Never produced by user input alone.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("unknown field `{0}`")]
    UnknownField(String),
    #[error("field `{0}` is defined more than once")]
    DuplicateField(String),
    #[error("field `{field}` has no value")]
    MissingValue { field: String },
    #[error("field `{field}` holds an unusable value: {reason}")]
    InvalidValue { field: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("form has {} invalid field(s)", .0.len())]
    Invalid(BTreeSet<String>),
    #[error("a submission is already in progress")]
    AlreadyActive,
}

/// Failure reported by a submission handler. The message is shown to the
/// user as a banner, so it should be phrased for them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct HandlerError {
    pub message: String,
}

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<FormError> for HandlerError {
    fn from(value: FormError) -> Self {
        Self::new(value.to_string())
    }
}
