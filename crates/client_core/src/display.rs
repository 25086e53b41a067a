//! What a display surface is given to draw. Surfaces only read these values.

use forms::{validators::format_date_time, FieldView, FormSnapshot, SubmissionResult};
use shared::{
    domain::{RequestId, RequestStatus, StatusTone},
    protocol::{CollectionRequestRecord, Page},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerTone {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub tone: BannerTone,
    pub message: String,
}

impl Banner {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            tone: BannerTone::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            tone: BannerTone::Error,
            message: message.into(),
        }
    }
}

/// Fixed wording of one form screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageText {
    pub title: &'static str,
    pub submit_label: &'static str,
    pub submitting_label: &'static str,
    pub success_message: Option<&'static str>,
    pub failure_message: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormDisplay {
    pub title: &'static str,
    pub fields: Vec<FieldView>,
    /// Show a spinner and disable the submit control.
    pub submitting: bool,
    pub submit_label: &'static str,
    pub banner: Option<Banner>,
}

impl FormDisplay {
    pub fn from_snapshot<P>(text: &PageText, snapshot: FormSnapshot<P>) -> Self {
        let banner = match &snapshot.result {
            SubmissionResult::Failed(message) => Some(Banner::error(message.clone())),
            SubmissionResult::Succeeded(_) => text.success_message.map(Banner::success),
            SubmissionResult::Idle | SubmissionResult::InProgress => None,
        };
        let submitting = snapshot.result.is_in_progress();
        Self {
            title: text.title,
            fields: snapshot.fields,
            submitting,
            submit_label: if submitting {
                text.submitting_label
            } else {
                text.submit_label
            },
            banner,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldView> {
        self.fields.iter().find(|field| field.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestRow {
    pub id: RequestId,
    pub business_name: String,
    pub category: String,
    pub quantity: u32,
    pub pickup_address: String,
    pub pickup_at: String,
    pub status: RequestStatus,
    pub tone: StatusTone,
}

impl From<&CollectionRequestRecord> for RequestRow {
    fn from(record: &CollectionRequestRecord) -> Self {
        Self {
            id: record.id,
            business_name: record.business_name.clone(),
            category: record.category.to_string(),
            quantity: record.quantity,
            pickup_address: record.pickup_address.clone(),
            pickup_at: format_date_time(&record.pickup_at),
            status: record.status,
            tone: record.status.tone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTable {
    pub rows: Vec<RequestRow>,
    pub page: usize,
    pub rows_per_page: usize,
    pub rows_per_page_options: &'static [usize],
    pub total: usize,
    /// 1-based first and last row shown, `None` when the page is empty.
    pub range: Option<(usize, usize)>,
    pub banner: Option<Banner>,
}

impl RequestTable {
    pub fn from_page(
        page: &Page<CollectionRequestRecord>,
        rows_per_page_options: &'static [usize],
        banner: Option<Banner>,
    ) -> Self {
        Self {
            rows: page.items.iter().map(RequestRow::from).collect(),
            page: page.page,
            rows_per_page: page.page_size,
            rows_per_page_options,
            total: page.total,
            range: page.display_range(),
            banner,
        }
    }
}

pub trait DisplaySurface {
    fn show_form(&mut self, form: &FormDisplay);
    fn show_requests(&mut self, table: &RequestTable);
    fn show_request_details(&mut self, record: &CollectionRequestRecord);
}
