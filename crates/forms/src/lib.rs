//! Validated form state and the single-flight submission lifecycle shared by
//! every portal screen.

pub mod controller;
pub mod error;
pub mod field;
pub mod schemas;
pub mod validators;
pub mod values;

pub use controller::{
    FieldView, FormSnapshot, FormSubmissionController, SubmissionResult, SubmitHandler,
};
pub use error::{FormError, HandlerError, SubmitError};
pub use field::{FieldDefinition, FieldKind, FormSchema, Rule};
pub use validators::{FieldError, Violation};
pub use values::FormValues;
