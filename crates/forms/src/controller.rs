//! Form state ownership and the submission lifecycle.
//!
//! A [`FormSubmissionController`] owns the values, touched flags and errors of
//! one form instance and drives `Idle -> InProgress -> Succeeded | Failed`.
//! State lives behind a mutex that is never held across an `.await`, so the
//! UI side can keep editing fields while a submission is in flight.

use std::{
    collections::{BTreeSet, HashMap, HashSet},
    sync::{Mutex, MutexGuard, PoisonError},
};

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::{
    error::{FormError, HandlerError, SubmitError},
    field::{FieldDefinition, FieldKind, FormSchema},
    validators::{validate_field, FieldError},
    values::FormValues,
};

/// Externally supplied asynchronous action run by [`FormSubmissionController::submit`].
#[async_trait]
pub trait SubmitHandler: Send + Sync {
    type Output: Send;

    async fn handle(&self, values: FormValues) -> Result<Self::Output, HandlerError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionResult<P> {
    Idle,
    InProgress,
    Succeeded(P),
    Failed(String),
}

impl<P> SubmissionResult<P> {
    pub fn is_in_progress(&self) -> bool {
        matches!(self, SubmissionResult::InProgress)
    }

    pub fn is_finished(&self) -> bool {
        matches!(
            self,
            SubmissionResult::Succeeded(_) | SubmissionResult::Failed(_)
        )
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            SubmissionResult::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn payload(&self) -> Option<&P> {
        match self {
            SubmissionResult::Succeeded(payload) => Some(payload),
            _ => None,
        }
    }
}

struct FormState<P> {
    values: HashMap<String, String>,
    touched: HashSet<String>,
    errors: HashMap<String, FieldError>,
    result: SubmissionResult<P>,
}

/// Read-only view of one field for a display surface.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldView {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub required: bool,
    pub value: String,
    pub touched: bool,
    pub dirty: bool,
    /// Present only when the field is invalid and has been touched.
    pub error: Option<FieldError>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormSnapshot<P> {
    pub form: String,
    pub fields: Vec<FieldView>,
    pub result: SubmissionResult<P>,
}

impl<P> FormSnapshot<P> {
    pub fn field(&self, name: &str) -> Option<&FieldView> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn visible_errors(&self) -> impl Iterator<Item = (&str, &FieldError)> {
        self.fields
            .iter()
            .filter_map(|field| field.error.as_ref().map(|err| (field.label.as_str(), err)))
    }
}

pub struct FormSubmissionController<P> {
    name: String,
    definitions: Vec<FieldDefinition>,
    index: HashMap<String, usize>,
    /// For each field, the fields whose rules read it.
    dependents: HashMap<String, Vec<usize>>,
    state: Mutex<FormState<P>>,
}

impl<P: Clone + Send> FormSubmissionController<P> {
    /// Mounts a form: every field starts at its initial value, untouched.
    pub fn new(schema: FormSchema) -> Result<Self, FormError> {
        let FormSchema { name, fields } = schema;

        let mut index = HashMap::with_capacity(fields.len());
        for (position, definition) in fields.iter().enumerate() {
            if index.insert(definition.name.clone(), position).is_some() {
                return Err(FormError::DuplicateField(definition.name.clone()));
            }
        }

        let mut dependents: HashMap<String, Vec<usize>> = HashMap::new();
        for (position, definition) in fields.iter().enumerate() {
            for dependency in definition.dependencies() {
                if !index.contains_key(dependency) {
                    return Err(FormError::UnknownField(dependency.to_string()));
                }
                dependents
                    .entry(dependency.to_string())
                    .or_default()
                    .push(position);
            }
        }

        let values = initial_values(&fields);
        debug!(form = %name, fields = fields.len(), "form: mounted");
        Ok(Self {
            name,
            definitions: fields,
            index,
            dependents,
            state: Mutex::new(FormState {
                values,
                touched: HashSet::new(),
                errors: HashMap::new(),
                result: SubmissionResult::Idle,
            }),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn definitions(&self) -> &[FieldDefinition] {
        &self.definitions
    }

    /// Stores `value`, marks the field touched and recomputes its error along
    /// with the errors of any touched field whose rules read it.
    pub fn set_field(&self, name: &str, value: impl Into<String>) -> Result<(), FormError> {
        let position = self.position(name)?;
        let mut state = self.lock();
        state.values.insert(name.to_string(), value.into());
        state.touched.insert(name.to_string());
        self.revalidate_field(&mut state, position);

        for &dependent in self.dependents.get(name).into_iter().flatten() {
            if state.touched.contains(&self.definitions[dependent].name) {
                self.revalidate_field(&mut state, dependent);
            }
        }
        debug!(form = %self.name, field = name, "form: field updated");
        Ok(())
    }

    /// Marks a field as interacted with, e.g. when focus leaves it.
    pub fn touch(&self, name: &str) -> Result<(), FormError> {
        let position = self.position(name)?;
        let mut state = self.lock();
        state.touched.insert(name.to_string());
        self.revalidate_field(&mut state, position);
        Ok(())
    }

    /// Re-evaluates every field and returns the names of the invalid ones.
    pub fn validate_all(&self) -> BTreeSet<String> {
        let mut state = self.lock();
        self.revalidate_all(&mut state)
    }

    /// Runs `handler` with a copy of the values if the form is valid.
    ///
    /// An invalid form marks every field touched and leaves the result
    /// untouched. A finished result (succeeded or failed) is reset to idle
    /// before the new attempt starts.
    pub async fn submit<H>(&self, handler: &H) -> Result<SubmissionResult<P>, SubmitError>
    where
        H: SubmitHandler<Output = P> + ?Sized,
    {
        let values = {
            let mut state = self.lock();
            if state.result.is_in_progress() {
                warn!(form = %self.name, "form: submit rejected, submission already active");
                return Err(SubmitError::AlreadyActive);
            }

            let invalid = self.revalidate_all(&mut state);
            if !invalid.is_empty() {
                let names = self.definitions.iter().map(|d| d.name.clone());
                state.touched.extend(names);
                info!(
                    form = %self.name,
                    invalid = ?invalid,
                    "form: submission blocked by validation"
                );
                return Err(SubmitError::Invalid(invalid));
            }

            if state.result.is_finished() {
                debug!(form = %self.name, "form: clearing previous result before resubmitting");
                state.result = SubmissionResult::Idle;
            }
            state.result = SubmissionResult::InProgress;
            state
                .values
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect::<FormValues>()
        };

        info!(form = %self.name, "form: submission started");
        let mut guard = InFlight {
            controller: self,
            settled: false,
        };
        let outcome = handler.handle(values).await;
        guard.settled = true;

        let mut state = self.lock();
        state.result = match outcome {
            Ok(payload) => {
                info!(form = %self.name, "form: submission succeeded");
                SubmissionResult::Succeeded(payload)
            }
            Err(err) => {
                warn!(form = %self.name, error = %err, "form: submission failed");
                SubmissionResult::Failed(err.message)
            }
        };
        Ok(state.result.clone())
    }

    /// Back to initial values with no touched fields or errors. A finished
    /// result returns to idle; an in-flight one is left to settle.
    pub fn reset(&self) {
        let mut state = self.lock();
        state.values = initial_values(&self.definitions);
        state.touched.clear();
        state.errors.clear();
        if state.result.is_finished() {
            state.result = SubmissionResult::Idle;
        }
        debug!(form = %self.name, "form: reset");
    }

    pub fn result(&self) -> SubmissionResult<P> {
        self.lock().result.clone()
    }

    pub fn value(&self, name: &str) -> Result<String, FormError> {
        self.position(name)?;
        Ok(self.lock().values.get(name).cloned().unwrap_or_default())
    }

    pub fn values(&self) -> FormValues {
        self.lock()
            .values
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Current error of a field, whether or not it has been touched.
    pub fn error(&self, name: &str) -> Result<Option<FieldError>, FormError> {
        self.position(name)?;
        Ok(self.lock().errors.get(name).cloned())
    }

    pub fn is_touched(&self, name: &str) -> Result<bool, FormError> {
        self.position(name)?;
        Ok(self.lock().touched.contains(name))
    }

    pub fn is_dirty(&self, name: &str) -> Result<bool, FormError> {
        let position = self.position(name)?;
        let state = self.lock();
        Ok(differs_from_initial(&self.definitions[position], &state.values))
    }

    pub fn snapshot(&self) -> FormSnapshot<P> {
        let state = self.lock();
        let fields = self
            .definitions
            .iter()
            .map(|definition| {
                let touched = state.touched.contains(&definition.name);
                FieldView {
                    name: definition.name.clone(),
                    label: definition.label.clone(),
                    kind: definition.kind.clone(),
                    required: definition.required,
                    value: state.values.get(&definition.name).cloned().unwrap_or_default(),
                    touched,
                    dirty: differs_from_initial(definition, &state.values),
                    error: touched
                        .then(|| state.errors.get(&definition.name).cloned())
                        .flatten(),
                }
            })
            .collect();
        FormSnapshot {
            form: self.name.clone(),
            fields,
            result: state.result.clone(),
        }
    }

    fn position(&self, name: &str) -> Result<usize, FormError> {
        self.index.get(name).copied().ok_or_else(|| {
            error!(form = %self.name, field = name, "form: access to unknown field");
            FormError::UnknownField(name.to_string())
        })
    }

    fn lock(&self) -> MutexGuard<'_, FormState<P>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn revalidate_field(&self, state: &mut FormState<P>, position: usize) {
        let definition = &self.definitions[position];
        match validate_field(definition, &state.values) {
            Some(err) => {
                state.errors.insert(definition.name.clone(), err);
            }
            None => {
                state.errors.remove(&definition.name);
            }
        }
    }

    fn revalidate_all(&self, state: &mut FormState<P>) -> BTreeSet<String> {
        for position in 0..self.definitions.len() {
            self.revalidate_field(state, position);
        }
        state.errors.keys().cloned().collect()
    }
}

/// Settles a submission whose future was dropped before the handler
/// returned, so the controller does not stay in progress forever.
struct InFlight<'a, P: Clone + Send> {
    controller: &'a FormSubmissionController<P>,
    settled: bool,
}

impl<P: Clone + Send> Drop for InFlight<'_, P> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut state = self.controller.lock();
        if state.result.is_in_progress() {
            warn!(form = %self.controller.name, "form: submission dropped before completion");
            state.result = SubmissionResult::Failed("Submission was interrupted. Please try again.".into());
        }
    }
}

fn initial_values(definitions: &[FieldDefinition]) -> HashMap<String, String> {
    definitions
        .iter()
        .map(|definition| (definition.name.clone(), definition.initial.clone()))
        .collect()
}

fn differs_from_initial(definition: &FieldDefinition, values: &HashMap<String, String>) -> bool {
    values
        .get(&definition.name)
        .is_some_and(|value| *value != definition.initial)
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
