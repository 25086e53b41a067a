use super::*;
use crate::{FormSubmissionController, Violation};
use chrono::TimeZone;

const CATEGORIES: [&str; 3] = ["Computers and Laptops", "Mobile Phones", "Batteries"];

fn controller(schema: FormSchema) -> FormSubmissionController<()> {
    FormSubmissionController::new(schema).expect("schema")
}

#[test]
fn every_schema_mounts() {
    controller(registration());
    controller(business_profile());
    controller(login());
    controller(collection_request(CATEGORIES));
}

#[test]
fn business_profile_extends_registration() {
    let registration: Vec<String> = registration().fields.into_iter().map(|f| f.name).collect();
    let profile: Vec<String> = business_profile().fields.into_iter().map(|f| f.name).collect();
    assert!(registration.iter().all(|name| profile.contains(name)));
    for extra in [names::CITY, names::PROVINCE, names::POSTAL_CODE] {
        assert!(profile.iter().any(|name| name == extra));
    }
}

#[test]
fn short_password_reports_minimum_length() {
    let form = controller(registration());
    form.set_field(names::PASSWORD, "short").expect("field");
    let err = form.error(names::PASSWORD).expect("known").expect("error");
    assert_eq!(err.violation, Violation::MinLength);
    assert_eq!(err.message, "Password should be of minimum 8 characters length");
}

#[test]
fn login_requires_email_and_password() {
    let form = controller(login());
    let invalid = form.validate_all();
    assert_eq!(invalid.len(), 2);
    assert!(invalid.contains(names::EMAIL));
    assert!(invalid.contains(names::PASSWORD));
}

#[test]
fn collection_request_defaults_pickup_time_to_now() {
    let now = Utc.with_ymd_and_hms(2024, 3, 20, 14, 0, 0).unwrap();
    let form = controller(collection_request_at(CATEGORIES, now));
    assert_eq!(
        form.value(names::PICKUP_DATE_TIME).expect("known"),
        "2024-03-20 14:00"
    );
    assert!(!form.is_dirty(names::PICKUP_DATE_TIME).expect("known"));
}

#[test]
fn collection_request_validates_quantity_and_category() {
    let form = controller(collection_request(CATEGORIES));
    form.set_field(names::CATEGORY, "Toasters").expect("field");
    form.set_field(names::QUANTITY, "0").expect("field");

    let category = form.error(names::CATEGORY).expect("known").expect("error");
    assert_eq!(category.violation, Violation::Choice);
    let quantity = form.error(names::QUANTITY).expect("known").expect("error");
    assert_eq!(quantity.message, "Quantity must be at least 1");
}

#[test]
fn special_instructions_are_optional() {
    let form = controller(collection_request(CATEGORIES));
    for (name, value) in [
        (names::CATEGORY, "Batteries"),
        (names::QUANTITY, "4"),
        (names::DESCRIPTION, "Old UPS batteries"),
        (names::PICKUP_ADDRESS, "123 Tech Street, Manila"),
    ] {
        form.set_field(name, value).expect("field");
    }
    assert!(form.validate_all().is_empty());
}

#[test]
fn quantity_accepts_only_plain_whole_numbers_in_range() {
    let form = controller(collection_request(CATEGORIES));
    let check = |value: &str| {
        form.set_field(names::QUANTITY, value).expect("field");
        form.error(names::QUANTITY)
            .expect("known")
            .map(|err| err.violation)
    };

    assert_eq!(check("5.0"), Some(Violation::WholeNumber));
    assert_eq!(check("1e3"), Some(Violation::WholeNumber));
    assert_eq!(check("4294967296"), Some(Violation::MaxNumber));
    assert_eq!(check("-3"), Some(Violation::MinNumber));
    assert_eq!(check("4294967295"), None);
    assert_eq!(check(" 12 "), None);
}

#[test]
fn registration_and_profile_share_business_name_minimum() {
    for schema in [registration(), business_profile()] {
        let form = controller(schema);
        form.set_field(names::BUSINESS_NAME, "A").expect("field");
        let err = form.error(names::BUSINESS_NAME).expect("known").expect("error");
        assert_eq!(err.violation, Violation::MinLength);
        assert_eq!(err.message, "Business name should be at least 2 characters");

        form.set_field(names::BUSINESS_NAME, "Ab").expect("field");
        assert_eq!(form.error(names::BUSINESS_NAME).expect("known"), None);
    }
}
