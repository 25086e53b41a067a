use super::*;
use crate::schemas::{self, names};
use futures::poll;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{oneshot, Mutex as AsyncMutex};

const VALID_REGISTRATION: [(&str, &str); 7] = [
    (names::BUSINESS_NAME, "Acme"),
    (names::EMAIL, "a@b.com"),
    (names::PASSWORD, "password1"),
    (names::CONFIRM_PASSWORD, "password1"),
    (names::ADDRESS, "1 Main St"),
    (names::PHONE_NUMBER, "1234567890"),
    (names::BUSINESS_TYPE, "Retail"),
];

struct TestHandler {
    calls: AtomicUsize,
    fail_with: Option<String>,
}

impl TestHandler {
    fn ok() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_with: None,
        }
    }

    fn failing(message: impl Into<String>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_with: Some(message.into()),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SubmitHandler for TestHandler {
    type Output = String;

    async fn handle(&self, values: FormValues) -> Result<String, HandlerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.fail_with {
            return Err(HandlerError::new(message.clone()));
        }
        Ok(values.text(names::BUSINESS_NAME)?.to_string())
    }
}

/// Blocks inside the handler until the test releases it.
struct GatedHandler {
    calls: AtomicUsize,
    gate: AsyncMutex<Option<oneshot::Receiver<()>>>,
}

impl GatedHandler {
    fn new(gate: oneshot::Receiver<()>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            gate: AsyncMutex::new(Some(gate)),
        }
    }
}

#[async_trait]
impl SubmitHandler for GatedHandler {
    type Output = String;

    async fn handle(&self, _values: FormValues) -> Result<String, HandlerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.gate.lock().await.take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        Ok("done".to_string())
    }
}

fn registration_form() -> FormSubmissionController<String> {
    FormSubmissionController::new(schemas::registration()).expect("schema")
}

fn fill(controller: &FormSubmissionController<String>, pairs: &[(&str, &str)]) {
    for (name, value) in pairs {
        controller.set_field(name, *value).expect("known field");
    }
}

#[test]
fn valid_registration_has_no_errors() {
    let form = registration_form();
    fill(&form, &VALID_REGISTRATION);
    assert!(form.validate_all().is_empty());
}

#[tokio::test]
async fn each_empty_required_field_blocks_submit_on_that_field_only() {
    let required: Vec<String> = schemas::registration()
        .fields
        .into_iter()
        .filter(|definition| definition.required)
        .map(|definition| definition.name)
        .collect();
    assert_eq!(required.len(), VALID_REGISTRATION.len());

    for name in required {
        let form = registration_form();
        fill(&form, &VALID_REGISTRATION);
        form.set_field(&name, "").expect("known field");
        if name == names::PASSWORD {
            form.set_field(names::CONFIRM_PASSWORD, "").expect("known field");
        }

        let handler = TestHandler::ok();
        let err = form.submit(&handler).await.expect_err("form is invalid");
        let expected: BTreeSet<String> = if name == names::PASSWORD {
            [names::PASSWORD, names::CONFIRM_PASSWORD]
                .into_iter()
                .map(String::from)
                .collect()
        } else {
            BTreeSet::from([name.clone()])
        };
        assert_eq!(err, SubmitError::Invalid(expected), "field {name}");
        assert_eq!(
            form.error(&name).expect("known").map(|e| e.violation),
            Some(crate::Violation::Required)
        );
        assert_eq!(handler.calls(), 0, "handler must not run for {name}");
        assert_eq!(form.result(), SubmissionResult::Idle);
    }
}

#[test]
fn password_mismatch_is_reported_on_confirmation_only() {
    let form = registration_form();
    fill(&form, &VALID_REGISTRATION);
    form.set_field(names::PASSWORD, "abc1234X").expect("field");
    form.set_field(names::CONFIRM_PASSWORD, "different").expect("field");

    assert_eq!(
        form.validate_all(),
        BTreeSet::from([names::CONFIRM_PASSWORD.to_string()])
    );
    assert_eq!(form.error(names::PASSWORD).expect("known"), None);
    let err = form
        .error(names::CONFIRM_PASSWORD)
        .expect("known")
        .expect("mismatch");
    assert!(err.is_cross_field());
    assert_eq!(err.message, "Passwords must match");
}

#[test]
fn editing_password_refreshes_touched_confirmation() {
    let form = registration_form();
    form.set_field(names::PASSWORD, "password1").expect("field");
    form.set_field(names::CONFIRM_PASSWORD, "password2").expect("field");
    assert!(form.error(names::CONFIRM_PASSWORD).expect("known").is_some());

    form.set_field(names::PASSWORD, "password2").expect("field");
    assert_eq!(form.error(names::CONFIRM_PASSWORD).expect("known"), None);
}

#[test]
fn phone_number_reports_digits_before_length() {
    let form = registration_form();
    form.set_field(names::PHONE_NUMBER, "12a").expect("field");
    let err = form.error(names::PHONE_NUMBER).expect("known").expect("error");
    assert_eq!(err.violation, crate::Violation::DigitsOnly);
    assert_eq!(err.message, "Phone number must contain only digits");

    form.set_field(names::PHONE_NUMBER, "123").expect("field");
    let err = form.error(names::PHONE_NUMBER).expect("known").expect("error");
    assert_eq!(err.violation, crate::Violation::MinLength);
    assert_eq!(err.message, "Phone number must be at least 10 digits");
}

#[test]
fn unknown_field_is_reported() {
    let form = registration_form();
    assert_eq!(
        form.set_field("faxNumber", "1"),
        Err(FormError::UnknownField("faxNumber".into()))
    );
    assert!(form.touch("faxNumber").is_err());
    assert!(form.error("faxNumber").is_err());
}

#[tokio::test]
async fn successful_submit_carries_handler_payload() {
    let form = registration_form();
    fill(&form, &VALID_REGISTRATION);
    let handler = TestHandler::ok();

    let result = form.submit(&handler).await.expect("submitted");
    assert_eq!(result, SubmissionResult::Succeeded("Acme".into()));
    assert_eq!(form.result(), result);
    assert_eq!(handler.calls(), 1);
}

#[tokio::test]
async fn second_submit_while_in_flight_is_rejected() {
    let form = registration_form();
    fill(&form, &VALID_REGISTRATION);
    let (release, gate) = oneshot::channel();
    let handler = GatedHandler::new(gate);

    let mut first = Box::pin(form.submit(&handler));
    assert!(poll!(&mut first).is_pending());
    assert!(form.result().is_in_progress());

    assert_eq!(form.submit(&handler).await, Err(SubmitError::AlreadyActive));

    release.send(()).expect("handler waiting");
    let result = first.await.expect("first submission");
    assert_eq!(result, SubmissionResult::Succeeded("done".into()));
    assert_eq!(handler.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failed_submit_can_be_retried() {
    let form = registration_form();
    fill(&form, &VALID_REGISTRATION);

    let failing = TestHandler::failing("Registration failed. Please try again.");
    let result = form.submit(&failing).await.expect("submitted");
    assert_eq!(result.failure(), Some("Registration failed. Please try again."));
    assert_eq!(form.result(), result);

    let retry = TestHandler::ok();
    let result = form.submit(&retry).await.expect("retry is not blocked");
    assert_eq!(result, SubmissionResult::Succeeded("Acme".into()));
    assert_eq!(retry.calls(), 1);
}

#[tokio::test]
async fn resubmit_drops_the_previous_outcome_while_pending() {
    let form = registration_form();
    fill(&form, &VALID_REGISTRATION);
    let failing = TestHandler::failing("Registration failed. Please try again.");
    form.submit(&failing).await.expect("submitted");

    let (release, gate) = oneshot::channel();
    let handler = GatedHandler::new(gate);
    let mut retry = Box::pin(form.submit(&handler));
    assert!(poll!(&mut retry).is_pending());
    assert_eq!(form.result(), SubmissionResult::InProgress);
    assert_eq!(form.snapshot().result.failure(), None);

    release.send(()).expect("handler waiting");
    let result = retry.await.expect("retry");
    assert_eq!(result, SubmissionResult::Succeeded("done".into()));
}

#[tokio::test]
async fn invalid_submit_touches_every_field() {
    let form = registration_form();
    let handler = TestHandler::ok();
    assert!(form.submit(&handler).await.is_err());

    let snapshot = form.snapshot();
    assert!(snapshot.fields.iter().all(|field| field.touched));
    assert_eq!(snapshot.visible_errors().count(), VALID_REGISTRATION.len());
    assert_eq!(snapshot.result, SubmissionResult::Idle);
}

#[tokio::test]
async fn dropped_submission_settles_as_failed() {
    let form = registration_form();
    fill(&form, &VALID_REGISTRATION);
    let (_release, gate) = oneshot::channel();
    let handler = GatedHandler::new(gate);

    let mut pending = Box::pin(form.submit(&handler));
    assert!(poll!(&mut pending).is_pending());
    drop(pending);

    assert!(form.result().failure().is_some());
    assert!(form.submit(&TestHandler::ok()).await.is_ok());
}

#[test]
fn snapshot_hides_errors_of_untouched_fields() {
    let form = registration_form();
    form.set_field(names::EMAIL, "not-an-email").expect("field");
    let invalid = form.validate_all();
    assert!(invalid.contains(names::BUSINESS_NAME));

    let snapshot = form.snapshot();
    assert_eq!(snapshot.field(names::BUSINESS_NAME).expect("field").error, None);
    let email = snapshot.field(names::EMAIL).expect("field");
    assert_eq!(
        email.error.as_ref().map(|e| e.message.as_str()),
        Some("Enter a valid email")
    );
}

#[tokio::test]
async fn reset_restores_initial_state() {
    let form = registration_form();
    fill(&form, &VALID_REGISTRATION);
    assert!(form.is_dirty(names::EMAIL).expect("known"));
    form.submit(&TestHandler::ok()).await.expect("submitted");

    form.reset();
    assert_eq!(form.result(), SubmissionResult::Idle);
    assert!(!form.is_dirty(names::EMAIL).expect("known"));
    assert!(!form.is_touched(names::EMAIL).expect("known"));
    assert_eq!(form.value(names::EMAIL).expect("known"), "");
}

#[test]
fn duplicate_field_names_are_rejected() {
    let schema = FormSchema::new("broken")
        .field(FieldDefinition::new("a", "A", FieldKind::Text))
        .field(FieldDefinition::new("a", "A again", FieldKind::Text));
    let err = FormSubmissionController::<()>::new(schema).err();
    assert_eq!(err, Some(FormError::DuplicateField("a".into())));
}

#[test]
fn cross_field_rule_must_reference_known_field() {
    let schema = FormSchema::new("broken").field(
        FieldDefinition::new("confirm", "Confirm", FieldKind::Password)
            .rule(crate::Rule::matches_field("missing", "must match")),
    );
    let err = FormSubmissionController::<()>::new(schema).err();
    assert_eq!(err, Some(FormError::UnknownField("missing".into())));
}
