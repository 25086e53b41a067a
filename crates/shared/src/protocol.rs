use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{BusinessId, EWasteCategory, RequestId, RequestStatus};

const REDACTED: &str = "<redacted>";

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BusinessProfile {
    pub business_name: String,
    pub email: String,
    pub password: String,
    pub address: String,
    pub phone_number: String,
    pub business_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
}

impl fmt::Debug for BusinessProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BusinessProfile")
            .field("business_name", &self.business_name)
            .field("email", &self.email)
            .field("password", &REDACTED)
            .field("address", &self.address)
            .field("phone_number", &self.phone_number)
            .field("business_type", &self.business_type)
            .field("city", &self.city)
            .field("province", &self.province)
            .field("postal_code", &self.postal_code)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BusinessAccount {
    pub business_id: BusinessId,
    pub business_name: String,
    pub email: String,
    pub registered_at: DateTime<Utc>,
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &REDACTED)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_id: Option<BusinessId>,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CollectionRequestDraft {
    pub category: EWasteCategory,
    pub quantity: u32,
    pub description: String,
    pub pickup_address: String,
    pub pickup_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CollectionRequestRecord {
    pub id: RequestId,
    pub business_name: String,
    pub category: EWasteCategory,
    pub quantity: u32,
    pub description: String,
    pub pickup_address: String,
    pub pickup_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
    pub status: RequestStatus,
}

/// One zero-indexed slice of a larger listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
}

impl<T> Page<T> {
    pub fn empty(page: usize, page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            page,
            page_size,
            total: 0,
        }
    }

    /// Cuts `page` out of `all`; a page past the end yields no items.
    pub fn slice(all: &[T], page: usize, page_size: usize) -> Self
    where
        T: Clone,
    {
        let start = page.saturating_mul(page_size).min(all.len());
        let end = start.saturating_add(page_size).min(all.len());
        Self {
            items: all[start..end].to_vec(),
            page,
            page_size,
            total: all.len(),
        }
    }

    pub fn page_count(&self) -> usize {
        if self.page_size == 0 {
            return 0;
        }
        self.total.div_ceil(self.page_size)
    }

    /// Inclusive 1-based range shown in a pagination footer, e.g. `11-20 of 42`.
    pub fn display_range(&self) -> Option<(usize, usize)> {
        if self.items.is_empty() {
            return None;
        }
        let first = self.page * self.page_size + 1;
        Some((first, first + self.items.len() - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_past_the_end_is_empty_but_keeps_total() {
        let all: Vec<u32> = (1..=12).collect();
        let page = Page::slice(&all, 3, 5);
        assert!(page.items.is_empty());
        assert_eq!(page.total, 12);
        assert_eq!(page.display_range(), None);
    }

    #[test]
    fn slice_returns_partial_last_page() {
        let all: Vec<u32> = (1..=12).collect();
        let page = Page::slice(&all, 2, 5);
        assert_eq!(page.items, vec![11, 12]);
        assert_eq!(page.page_count(), 3);
        assert_eq!(page.display_range(), Some((11, 12)));
    }

    #[test]
    fn credentials_debug_hides_password() {
        let creds = Credentials {
            email: "a@b.com".into(),
            password: "hunter22".into(),
        };
        let rendered = format!("{creds:?}");
        assert!(!rendered.contains("hunter22"));
        assert!(rendered.contains("a@b.com"));
    }
}
