//! Field tables for the portal's forms.

use chrono::{DateTime, Utc};

use crate::{
    field::{FieldDefinition, FieldKind, FormSchema, Rule},
    validators::format_date_time,
};

pub mod names {
    pub const BUSINESS_NAME: &str = "businessName";
    pub const EMAIL: &str = "email";
    pub const PASSWORD: &str = "password";
    pub const CONFIRM_PASSWORD: &str = "confirmPassword";
    pub const ADDRESS: &str = "address";
    pub const CITY: &str = "city";
    pub const PROVINCE: &str = "province";
    pub const POSTAL_CODE: &str = "postalCode";
    pub const PHONE_NUMBER: &str = "phoneNumber";
    pub const BUSINESS_TYPE: &str = "businessType";

    pub const CATEGORY: &str = "category";
    pub const QUANTITY: &str = "quantity";
    pub const DESCRIPTION: &str = "description";
    pub const PICKUP_ADDRESS: &str = "pickupAddress";
    pub const PICKUP_DATE_TIME: &str = "pickupDateTime";
    pub const SPECIAL_INSTRUCTIONS: &str = "specialInstructions";
}

const PASSWORD_MIN_LENGTH: usize = 8;
const PHONE_MIN_DIGITS: usize = 10;

pub fn registration() -> FormSchema {
    let schema = FormSchema::new("registration");
    account_fields(schema, "Business Address")
}

/// Registration fields plus the city, province and postal code lines.
pub fn business_profile() -> FormSchema {
    account_fields(FormSchema::new("business_profile"), "Address")
        .field(FieldDefinition::new(names::CITY, "City", FieldKind::Text).required("City is required"))
        .field(
            FieldDefinition::new(names::PROVINCE, "Province", FieldKind::Text)
                .required("Province is required"),
        )
        .field(
            FieldDefinition::new(names::POSTAL_CODE, "Postal Code", FieldKind::Text)
                .required("Postal code is required"),
        )
}

pub fn login() -> FormSchema {
    FormSchema::new("login")
        .field(email_field())
        .field(
            FieldDefinition::new(names::PASSWORD, "Password", FieldKind::Password)
                .required("Password is required"),
        )
}

pub fn collection_request<I, S>(categories: I) -> FormSchema
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    collection_request_at(categories, Utc::now())
}

/// Same as [`collection_request`] with an explicit default pickup time.
pub fn collection_request_at<I, S>(categories: I, now: DateTime<Utc>) -> FormSchema
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    FormSchema::new("collection_request")
        .field(
            FieldDefinition::new(names::CATEGORY, "E-Waste Category", FieldKind::choices(categories))
                .required("Category is required"),
        )
        .field(
            FieldDefinition::new(names::QUANTITY, "Quantity", FieldKind::Numeric)
                .required("Quantity is required")
                .rule(Rule::whole_number("Quantity must be a whole number"))
                .rule(Rule::min_number(1.0, "Quantity must be at least 1"))
                .rule(Rule::max_number(
                    f64::from(u32::MAX),
                    "Quantity is too large",
                )),
        )
        .field(
            FieldDefinition::new(names::DESCRIPTION, "Description", FieldKind::Multiline)
                .required("Description is required"),
        )
        .field(
            FieldDefinition::new(names::PICKUP_ADDRESS, "Pickup Address", FieldKind::Multiline)
                .required("Pickup address is required"),
        )
        .field(
            FieldDefinition::new(
                names::PICKUP_DATE_TIME,
                "Pickup Date and Time",
                FieldKind::DateTime,
            )
            .required("Pickup date and time is required")
            .initial(format_date_time(&now)),
        )
        .field(FieldDefinition::new(
            names::SPECIAL_INSTRUCTIONS,
            "Special Instructions (Optional)",
            FieldKind::Multiline,
        ))
}

fn account_fields(schema: FormSchema, address_label: &str) -> FormSchema {
    schema
        .field(
            FieldDefinition::new(names::BUSINESS_NAME, "Business Name", FieldKind::Text)
                .required("Business name is required")
                .rule(Rule::min_length(2, "Business name should be at least 2 characters")),
        )
        .field(email_field())
        .field(
            FieldDefinition::new(names::PASSWORD, "Password", FieldKind::Password)
                .required("Password is required")
                .rule(Rule::min_length(
                    PASSWORD_MIN_LENGTH,
                    "Password should be of minimum 8 characters length",
                )),
        )
        .field(
            FieldDefinition::new(names::CONFIRM_PASSWORD, "Confirm Password", FieldKind::Password)
                .required("Confirm password is required")
                .rule(Rule::matches_field(names::PASSWORD, "Passwords must match")),
        )
        .field(
            FieldDefinition::new(names::ADDRESS, address_label, FieldKind::Text)
                .required("Address is required"),
        )
        .field(
            FieldDefinition::new(names::PHONE_NUMBER, "Phone Number", FieldKind::Text)
                .required("Phone number is required")
                .rule(Rule::digits_only("Phone number must contain only digits"))
                .rule(Rule::min_length(
                    PHONE_MIN_DIGITS,
                    "Phone number must be at least 10 digits",
                )),
        )
        .field(
            FieldDefinition::new(names::BUSINESS_TYPE, "Business Type", FieldKind::Text)
                .required("Business type is required"),
        )
}

fn email_field() -> FieldDefinition {
    FieldDefinition::new(names::EMAIL, "Email", FieldKind::Email).required("Email is required")
}

#[cfg(test)]
#[path = "tests/schemas_tests.rs"]
mod tests;
