//! Rule evaluation for a single field against the current form values.

use std::{collections::HashMap, sync::LazyLock};

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;

use crate::field::{FieldDefinition, Rule};

// Local part, a single `@`, and a dotted domain with no whitespace.
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)+$")
        .expect("EMAIL_REGEX: invalid regex pattern")
});

static DIGITS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("DIGITS_REGEX: invalid regex pattern"));

// Plain integer literal: no fraction, exponent or sign other than `-`.
static INTEGER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[0-9]+$").expect("INTEGER_REGEX: invalid regex pattern"));

/// Formats accepted for date-time inputs besides RFC 3339. Interpreted as UTC.
const NAIVE_DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
];

/// Format used when the form itself produces a date-time value.
pub const DATE_TIME_INPUT_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    Required,
    MinLength,
    MaxLength,
    Email,
    DigitsOnly,
    Pattern,
    Numeric,
    WholeNumber,
    MinNumber,
    MaxNumber,
    Choice,
    DateTime,
    Mismatch,
}

/// Validation failure recorded against one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub violation: Violation,
    pub message: String,
}

impl FieldError {
    fn new(violation: Violation, message: &str) -> Self {
        Self {
            violation,
            message: message.to_string(),
        }
    }

    pub fn is_cross_field(&self) -> bool {
        self.violation == Violation::Mismatch
    }
}

pub fn parse_date_time(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    NAIVE_DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
}

pub fn format_date_time(value: &DateTime<Utc>) -> String {
    value.format(DATE_TIME_INPUT_FORMAT).to_string()
}

/// Runs the field's checks in order: required, the kind's implicit rule,
/// then the explicit rules. Empty optional fields are always valid.
pub fn validate_field(
    definition: &FieldDefinition,
    values: &HashMap<String, String>,
) -> Option<FieldError> {
    let value = values
        .get(&definition.name)
        .map(String::as_str)
        .unwrap_or_default();

    if value.trim().is_empty() {
        return definition
            .required
            .then(|| FieldError::new(Violation::Required, &definition.required_message));
    }

    let implicit = definition.kind.implicit_rule();
    implicit
        .iter()
        .chain(definition.rules.iter())
        .find_map(|rule| check_rule(rule, value, values))
}

fn check_rule(rule: &Rule, value: &str, values: &HashMap<String, String>) -> Option<FieldError> {
    match rule {
        Rule::MinLength { min, message } => {
            (value.chars().count() < *min).then(|| FieldError::new(Violation::MinLength, message))
        }
        Rule::MaxLength { max, message } => {
            (value.chars().count() > *max).then(|| FieldError::new(Violation::MaxLength, message))
        }
        Rule::Email { message } => (!EMAIL_REGEX.is_match(value.trim()))
            .then(|| FieldError::new(Violation::Email, message)),
        Rule::DigitsOnly { message } => {
            (!DIGITS_REGEX.is_match(value)).then(|| FieldError::new(Violation::DigitsOnly, message))
        }
        Rule::Pattern { regex, message } => {
            (!regex.is_match(value)).then(|| FieldError::new(Violation::Pattern, message))
        }
        Rule::Numeric { message } => parse_number(value)
            .is_none()
            .then(|| FieldError::new(Violation::Numeric, message)),
        Rule::WholeNumber { message } => (!INTEGER_REGEX.is_match(value.trim()))
            .then(|| FieldError::new(Violation::WholeNumber, message)),
        Rule::MinNumber { min, message } => (!parse_number(value).is_some_and(|n| n >= *min))
            .then(|| FieldError::new(Violation::MinNumber, message)),
        Rule::MaxNumber { max, message } => (!parse_number(value).is_some_and(|n| n <= *max))
            .then(|| FieldError::new(Violation::MaxNumber, message)),
        Rule::OneOf { choices, message } => (!choices.iter().any(|choice| choice == value.trim()))
            .then(|| FieldError::new(Violation::Choice, message)),
        Rule::DateTime { message } => parse_date_time(value)
            .is_none()
            .then(|| FieldError::new(Violation::DateTime, message)),
        Rule::MatchesField { field, message } => {
            let other = values.get(field).map(String::as_str).unwrap_or_default();
            (value != other).then(|| FieldError::new(Violation::Mismatch, message))
        }
    }
}

fn parse_number(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldKind;

    fn values(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn optional_empty_field_skips_rules() {
        let def = FieldDefinition::new("notes", "Notes", FieldKind::Multiline)
            .rule(Rule::min_length(5, "too short"));
        assert_eq!(validate_field(&def, &values(&[("notes", "")])), None);
    }

    #[test]
    fn whitespace_only_counts_as_missing() {
        let def = FieldDefinition::new("address", "Address", FieldKind::Text)
            .required("Address is required");
        let err = validate_field(&def, &values(&[("address", "   ")])).expect("error");
        assert_eq!(err.violation, Violation::Required);
        assert_eq!(err.message, "Address is required");
    }

    #[test]
    fn default_required_message_uses_label() {
        let def = FieldDefinition::new("city", "City", FieldKind::Text);
        assert_eq!(def.required_message, "City is required");
    }

    #[test]
    fn email_kind_rejects_malformed_addresses() {
        let def = FieldDefinition::new("email", "Email", FieldKind::Email).required("Email is required");
        for bad in ["plain", "a@b", "a b@c.com", "@b.com"] {
            let err = validate_field(&def, &values(&[("email", bad)])).expect(bad);
            assert_eq!(err.violation, Violation::Email, "{bad}");
        }
        assert_eq!(validate_field(&def, &values(&[("email", "a@b.com")])), None);
    }

    #[test]
    fn numeric_rules_apply_after_parse() {
        let def = FieldDefinition::new("quantity", "Quantity", FieldKind::Numeric)
            .required("Quantity is required")
            .rule(Rule::whole_number("whole"))
            .rule(Rule::min_number(1.0, "Quantity must be at least 1"));
        let check = |v: &str| validate_field(&def, &values(&[("quantity", v)])).map(|e| e.violation);
        assert_eq!(check("abc"), Some(Violation::Numeric));
        assert_eq!(check("2.5"), Some(Violation::WholeNumber));
        assert_eq!(check("5.0"), Some(Violation::WholeNumber));
        assert_eq!(check("1e3"), Some(Violation::WholeNumber));
        assert_eq!(check("0"), Some(Violation::MinNumber));
        assert_eq!(check("3"), None);
    }

    #[test]
    fn choice_kind_requires_listed_option() {
        let def = FieldDefinition::new("category", "Category", FieldKind::choices(["A", "B"]));
        let err = validate_field(&def, &values(&[("category", "C")])).expect("error");
        assert_eq!(err.violation, Violation::Choice);
        assert_eq!(validate_field(&def, &values(&[("category", "B")])), None);
    }

    #[test]
    fn date_time_accepts_rfc3339_and_plain_minutes() {
        assert!(parse_date_time("2024-03-20T14:00:00+08:00").is_some());
        assert!(parse_date_time("2024-03-20 14:00").is_some());
        assert!(parse_date_time("next tuesday").is_none());
    }

    #[test]
    fn date_time_round_trips_through_input_format() {
        let parsed = parse_date_time("2024-03-21 10:00").expect("parse");
        assert_eq!(format_date_time(&parsed), "2024-03-21 10:00");
    }

    #[test]
    fn matches_field_compares_with_other_value() {
        let def = FieldDefinition::new("confirm", "Confirm", FieldKind::Password)
            .rule(Rule::matches_field("password", "Passwords must match"));
        let err = validate_field(&def, &values(&[("password", "a"), ("confirm", "b")])).expect("error");
        assert!(err.is_cross_field());
        assert_eq!(validate_field(&def, &values(&[("password", "a"), ("confirm", "a")])), None);
    }
}
