use std::{collections::BTreeMap, fmt, str::FromStr};

use chrono::{DateTime, Utc};

use crate::{error::FormError, validators::parse_date_time};

/// Copy of a form's values handed to submission handlers.
///
/// `Debug` lists field names only, so values (passwords included) never end
/// up in logs.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct FormValues(BTreeMap<String, String>);

impl FormValues {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Trimmed, non-empty text value.
    pub fn text(&self, name: &str) -> Result<&str, FormError> {
        self.optional_text(name)
            .ok_or_else(|| FormError::MissingValue {
                field: name.to_string(),
            })
    }

    pub fn optional_text(&self, name: &str) -> Option<&str> {
        self.get(name).map(str::trim).filter(|value| !value.is_empty())
    }

    /// Raw value, untrimmed. Secrets are compared byte for byte.
    pub fn secret(&self, name: &str) -> Result<&str, FormError> {
        self.get(name)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| FormError::MissingValue {
                field: name.to_string(),
            })
    }

    pub fn parse<T>(&self, name: &str) -> Result<T, FormError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        self.text(name)?
            .parse::<T>()
            .map_err(|err| FormError::InvalidValue {
                field: name.to_string(),
                reason: err.to_string(),
            })
    }

    pub fn date_time(&self, name: &str) -> Result<DateTime<Utc>, FormError> {
        let raw = self.text(name)?;
        parse_date_time(raw).ok_or_else(|| FormError::InvalidValue {
            field: name.to_string(),
            reason: format!("`{raw}` is not a recognised date and time"),
        })
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for FormValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormValues")
            .field("fields", &self.0.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<K, V> FromIterator<(K, V)> for FormValues
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
