//! One controller per portal screen, each tying a form schema to the
//! backend call it submits through and the route it leads to.

mod account;
mod admin;
mod collection;

pub use account::{BusinessProfilePage, LoginPage, RegistrationPage};
pub use admin::{AdminDashboard, DashboardError, DEFAULT_ROWS_PER_PAGE, ROWS_PER_PAGE_OPTIONS};
pub use collection::{CollectionRequestPage, DEFAULT_REDIRECT_DELAY};

use forms::{schemas::names, FormError, FormValues, HandlerError};
use shared::{
    domain::EWasteCategory,
    error::ApiError,
    protocol::{BusinessProfile, CollectionRequestDraft, Credentials},
};
use tracing::warn;

fn business_profile_from(
    values: &FormValues,
    with_location: bool,
) -> Result<BusinessProfile, FormError> {
    let location = |name: &str| -> Result<Option<String>, FormError> {
        if with_location {
            values.text(name).map(|value| Some(value.to_string()))
        } else {
            Ok(None)
        }
    };
    Ok(BusinessProfile {
        business_name: values.text(names::BUSINESS_NAME)?.to_string(),
        email: values.text(names::EMAIL)?.to_string(),
        password: values.secret(names::PASSWORD)?.to_string(),
        address: values.text(names::ADDRESS)?.to_string(),
        phone_number: values.text(names::PHONE_NUMBER)?.to_string(),
        business_type: values.text(names::BUSINESS_TYPE)?.to_string(),
        city: location(names::CITY)?,
        province: location(names::PROVINCE)?,
        postal_code: location(names::POSTAL_CODE)?,
    })
}

fn credentials_from(values: &FormValues) -> Result<Credentials, FormError> {
    Ok(Credentials {
        email: values.text(names::EMAIL)?.to_string(),
        password: values.secret(names::PASSWORD)?.to_string(),
    })
}

fn collection_draft_from(values: &FormValues) -> Result<CollectionRequestDraft, FormError> {
    Ok(CollectionRequestDraft {
        category: values.parse::<EWasteCategory>(names::CATEGORY)?,
        quantity: values.parse::<u32>(names::QUANTITY)?,
        description: values.text(names::DESCRIPTION)?.to_string(),
        pickup_address: values.text(names::PICKUP_ADDRESS)?.to_string(),
        pickup_at: values.date_time(names::PICKUP_DATE_TIME)?,
        special_instructions: values
            .optional_text(names::SPECIAL_INSTRUCTIONS)
            .map(str::to_string),
    })
}

/// Logs the backend detail and hands the user the page's fixed wording.
fn service_failure(operation: &'static str, err: ApiError, message: &str) -> HandlerError {
    warn!(operation, error = %err, retryable = err.is_retryable(), "page: backend call failed");
    HandlerError::new(message)
}

#[cfg(test)]
#[path = "../tests/pages_tests.rs"]
mod tests;
