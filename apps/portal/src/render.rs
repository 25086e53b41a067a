//! Plain-text display surface for the terminal.

use std::fmt::Write as _;

use client_core::{
    Banner, BannerTone, DisplaySurface, FormDisplay, Navigator, RequestTable, Route,
};
use forms::{validators::format_date_time, FieldKind};
use shared::{domain::StatusTone, protocol::CollectionRequestRecord};
use tracing::info;

const SECRET_MASK: &str = "********";

#[derive(Debug, Default)]
pub struct TerminalSurface;

impl DisplaySurface for TerminalSurface {
    fn show_form(&mut self, form: &FormDisplay) {
        print!("{}", render_form(form));
    }

    fn show_requests(&mut self, table: &RequestTable) {
        print!("{}", render_table(table));
    }

    fn show_request_details(&mut self, record: &CollectionRequestRecord) {
        print!("{}", render_details(record));
    }
}

/// Announces the route change; a terminal has nowhere else to go.
#[derive(Debug, Default)]
pub struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn go_to(&self, route: Route) {
        info!(route = route.path(), "navigation: go to");
        println!("-> {route}");
    }
}

pub fn render_form(form: &FormDisplay) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} ==", form.title);
    for field in &form.fields {
        let marker = if field.required { "*" } else { "" };
        let value = if field.kind.is_secret() && !field.value.is_empty() {
            SECRET_MASK
        } else {
            field.value.as_str()
        };
        let _ = writeln!(out, "  {}{marker}: {value}", field.label);
        if let FieldKind::Choice(options) = &field.kind {
            if field.error.is_some() {
                let _ = writeln!(out, "      choose from: {}", options.join(", "));
            }
        }
        if let Some(error) = &field.error {
            let _ = writeln!(out, "    ! {}", error.message);
        }
    }
    if form.submitting {
        let _ = writeln!(out, "[{}] (please wait)", form.submit_label);
    } else {
        let _ = writeln!(out, "[{}]", form.submit_label);
    }
    if let Some(banner) = &form.banner {
        let _ = writeln!(out, "{}", render_banner(banner));
    }
    out
}

pub fn render_table(table: &RequestTable) -> String {
    let mut out = String::new();
    if let Some(banner) = &table.banner {
        let _ = writeln!(out, "{}", render_banner(banner));
    }
    if table.rows.is_empty() {
        let _ = writeln!(out, "No collection requests.");
    }
    for row in &table.rows {
        let _ = writeln!(
            out,
            "#{:<4} {:<24} {:<28} {:>4}  {}  {:<32} {}",
            row.id,
            row.business_name,
            row.category,
            row.quantity,
            row.pickup_at,
            row.pickup_address,
            status_badge(row.status.label(), row.tone),
        );
    }

    let range = match table.range {
        Some((first, last)) => format!("{first}-{last} of {}", table.total),
        None => format!("0 of {}", table.total),
    };
    let options = table
        .rows_per_page_options
        .iter()
        .map(usize::to_string)
        .collect::<Vec<_>>()
        .join("/");
    let _ = writeln!(
        out,
        "Rows per page: {} ({options})  {range}",
        table.rows_per_page
    );
    out
}

pub fn render_details(record: &CollectionRequestRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Request #{}", record.id);
    let _ = writeln!(out, "  Business: {}", record.business_name);
    let _ = writeln!(out, "  Category: {}", record.category);
    let _ = writeln!(out, "  Quantity: {}", record.quantity);
    let _ = writeln!(out, "  Description: {}", record.description);
    let _ = writeln!(out, "  Pickup address: {}", record.pickup_address);
    let _ = writeln!(out, "  Pickup at: {}", format_date_time(&record.pickup_at));
    if let Some(notes) = &record.special_instructions {
        let _ = writeln!(out, "  Special instructions: {notes}");
    }
    let _ = writeln!(
        out,
        "  Status: {}",
        status_badge(record.status.label(), record.status.tone())
    );
    out
}

fn render_banner(banner: &Banner) -> String {
    match banner.tone {
        BannerTone::Success => format!("OK: {}", banner.message),
        BannerTone::Error => format!("ERROR: {}", banner.message),
    }
}

fn status_badge(label: &str, tone: StatusTone) -> String {
    let tone = match tone {
        StatusTone::Warning => "warning",
        StatusTone::Success => "success",
        StatusTone::Error => "error",
        StatusTone::Info => "info",
    };
    format!("{label} ({tone})")
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use forms::{FieldError, FieldView, Violation};
    use shared::{
        domain::{EWasteCategory, RequestId, RequestStatus},
        protocol::Page,
    };

    use super::*;

    fn field(name: &str, kind: FieldKind, value: &str) -> FieldView {
        FieldView {
            name: name.to_string(),
            label: name.to_string(),
            kind,
            required: true,
            value: value.to_string(),
            touched: true,
            dirty: true,
            error: None,
        }
    }

    #[test]
    fn secrets_are_masked_and_errors_listed() {
        let mut email = field("Email", FieldKind::Email, "not-an-email");
        email.error = Some(FieldError {
            violation: Violation::Email,
            message: "Enter a valid email".to_string(),
        });
        let form = FormDisplay {
            title: "Business Login",
            fields: vec![email, field("Password", FieldKind::Password, "hunter22")],
            submitting: false,
            submit_label: "Login",
            banner: Some(Banner::error("Login failed.")),
        };

        let text = render_form(&form);
        assert!(!text.contains("hunter22"));
        assert!(text.contains("Password*: ********"));
        assert!(text.contains("! Enter a valid email"));
        assert!(text.contains("ERROR: Login failed."));
    }

    #[test]
    fn table_footer_shows_range_and_tones() {
        let record = CollectionRequestRecord {
            id: RequestId(11),
            business_name: "Tech Solutions Inc.".to_string(),
            category: EWasteCategory::Batteries,
            quantity: 4,
            description: "Cells".to_string(),
            pickup_address: "123 Tech Street".to_string(),
            pickup_at: Utc
                .with_ymd_and_hms(2024, 3, 20, 14, 0, 0)
                .single()
                .expect("valid time"),
            special_instructions: None,
            status: RequestStatus::Pending,
        };
        let page = Page {
            items: vec![record],
            page: 1,
            page_size: 10,
            total: 11,
        };
        let table = RequestTable::from_page(&page, &[5, 10, 25], None);

        let text = render_table(&table);
        assert!(text.contains("Pending (warning)"));
        assert!(text.contains("Rows per page: 10 (5/10/25)  11-11 of 11"));
    }

    #[test]
    fn page_far_past_the_end_renders_empty_footer() {
        let page = Page::<CollectionRequestRecord> {
            total: 2,
            ..Page::empty(usize::MAX / 2, 10)
        };
        let table = RequestTable::from_page(&page, &[5, 10, 25], None);

        let text = render_table(&table);
        assert!(text.contains("No collection requests."));
        assert!(text.contains("Rows per page: 10 (5/10/25)  0 of 2"));
    }
}
