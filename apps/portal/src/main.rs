mod config;
mod render;

use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{
    AdminDashboard, BusinessProfilePage, CollectionRequestPage, DisplaySurface, LoginPage,
    Navigator, PortalService, RegistrationPage, SimulatedPortalService,
};
use forms::{schemas::names, FormSubmissionController, SubmissionResult, SubmitError};
use shared::{
    domain::RequestId,
    error::{ApiError, ErrorCode},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::render::{TerminalNavigator, TerminalSurface};

#[derive(Parser, Debug)]
#[command(name = "portal", about = "E-waste pickup portal")]
struct Cli {
    #[arg(long, global = true, default_value = config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    /// Make every backend call fail.
    #[arg(long, global = true)]
    simulate_failure: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Register a business account.
    Register(AccountArgs),
    /// Create a business profile including its location.
    Profile(ProfileArgs),
    Login(LoginArgs),
    /// Request an e-waste pickup.
    Request(RequestArgs),
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Args, Debug)]
struct AccountArgs {
    #[arg(long)]
    business_name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    password: Option<String>,
    #[arg(long)]
    confirm_password: Option<String>,
    #[arg(long)]
    address: Option<String>,
    #[arg(long)]
    phone_number: Option<String>,
    #[arg(long)]
    business_type: Option<String>,
}

impl AccountArgs {
    fn fields(&self) -> Vec<(&'static str, &Option<String>)> {
        vec![
            (names::BUSINESS_NAME, &self.business_name),
            (names::EMAIL, &self.email),
            (names::PASSWORD, &self.password),
            (names::CONFIRM_PASSWORD, &self.confirm_password),
            (names::ADDRESS, &self.address),
            (names::PHONE_NUMBER, &self.phone_number),
            (names::BUSINESS_TYPE, &self.business_type),
        ]
    }
}

#[derive(Args, Debug)]
struct ProfileArgs {
    #[command(flatten)]
    account: AccountArgs,
    #[arg(long)]
    city: Option<String>,
    #[arg(long)]
    province: Option<String>,
    #[arg(long)]
    postal_code: Option<String>,
}

#[derive(Args, Debug)]
struct LoginArgs {
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    password: Option<String>,
}

#[derive(Args, Debug)]
struct RequestArgs {
    /// One of the e-waste category labels, e.g. "Mobile Phones".
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    quantity: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    pickup_address: Option<String>,
    /// `YYYY-MM-DD HH:MM` or RFC 3339. Defaults to now.
    #[arg(long)]
    pickup_at: Option<String>,
    #[arg(long)]
    special_instructions: Option<String>,
}

#[derive(Subcommand, Debug)]
enum AdminAction {
    /// Show one page of collection requests.
    List {
        /// 1-based page number.
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// 5, 10 or 25. Defaults to the configured value.
        #[arg(long)]
        rows: Option<usize>,
        #[arg(long)]
        json: bool,
    },
    Approve { id: i64 },
    Reject { id: i64 },
    Show { id: i64 },
}

/// Submits a page's form while drawing it, then draws the final state.
/// A submit that is still waiting on the backend after its first poll is
/// drawn once with its progress label.
macro_rules! submit_page {
    ($page:expr, $surface:expr) => {{
        let page = &$page;
        let surface = &mut $surface;
        let (outcome, ()) = tokio::join!(page.submit(), async {
            let display = page.display();
            if display.submitting {
                surface.show_form(&display);
            }
        });
        surface.show_form(&page.display());
        settle(outcome)
    }};
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = config::load_settings(&cli.config)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut service = SimulatedPortalService::seeded(settings.simulated_latency());
    if cli.simulate_failure {
        service = service.failing_with(ApiError::new(ErrorCode::Unavailable, "simulated outage"));
    }
    let service: Arc<dyn PortalService> = Arc::new(service);
    let navigator: Arc<dyn Navigator> = Arc::new(TerminalNavigator);
    let mut surface = TerminalSurface;

    match cli.command {
        Command::Register(args) => {
            let page = RegistrationPage::new(service, navigator)?;
            fill(page.form(), &args.fields())?;
            let account = submit_page!(page, surface)?;
            info!(business_id = account.business_id.0, "portal: registered");
        }
        Command::Profile(args) => {
            let page = BusinessProfilePage::new(service)?;
            let mut fields = args.account.fields();
            fields.extend([
                (names::CITY, &args.city),
                (names::PROVINCE, &args.province),
                (names::POSTAL_CODE, &args.postal_code),
            ]);
            fill(page.form(), &fields)?;
            submit_page!(page, surface)?;
        }
        Command::Login(args) => {
            let page = LoginPage::new(service, navigator)?;
            fill(
                page.form(),
                &[(names::EMAIL, &args.email), (names::PASSWORD, &args.password)],
            )?;
            submit_page!(page, surface)?;
        }
        Command::Request(args) => {
            let page = CollectionRequestPage::new(service, navigator, settings.redirect_delay())?;
            fill(
                page.form(),
                &[
                    (names::CATEGORY, &args.category),
                    (names::QUANTITY, &args.quantity),
                    (names::DESCRIPTION, &args.description),
                    (names::PICKUP_ADDRESS, &args.pickup_address),
                    (names::PICKUP_DATE_TIME, &args.pickup_at),
                    (names::SPECIAL_INSTRUCTIONS, &args.special_instructions),
                ],
            )?;
            let record = submit_page!(page, surface)?;
            info!(request_id = record.id.0, "portal: collection request created");
            page.follow_redirect().await;
        }
        Command::Admin { action } => {
            run_admin(action, service, settings.default_rows_per_page, &mut surface).await?;
        }
    }

    Ok(())
}

async fn run_admin(
    action: AdminAction,
    service: Arc<dyn PortalService>,
    default_rows: usize,
    surface: &mut TerminalSurface,
) -> Result<()> {
    match action {
        AdminAction::List { page, rows, json } => {
            let rows = rows.unwrap_or(default_rows);
            let dashboard = AdminDashboard::new(service, rows)
                .with_context(|| format!("cannot show {rows} rows per page"))?;
            let listing = dashboard.set_page(page.saturating_sub(1)).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&listing)?);
            } else {
                surface.show_requests(&dashboard.table());
            }
        }
        AdminAction::Approve { id } => {
            let dashboard = AdminDashboard::new(service, default_rows)?;
            dashboard.refresh().await?;
            let outcome = dashboard.approve(RequestId(id)).await;
            surface.show_requests(&dashboard.table());
            outcome?;
        }
        AdminAction::Reject { id } => {
            let dashboard = AdminDashboard::new(service, default_rows)?;
            dashboard.refresh().await?;
            let outcome = dashboard.reject(RequestId(id)).await;
            surface.show_requests(&dashboard.table());
            outcome?;
        }
        AdminAction::Show { id } => {
            let dashboard = AdminDashboard::new(service, default_rows)?;
            let record = dashboard.view_details(RequestId(id)).await?;
            surface.show_request_details(&record);
        }
    }
    Ok(())
}

/// Sets every field the user supplied; the rest keep their initial value.
fn fill<P: Clone + Send>(
    form: &FormSubmissionController<P>,
    fields: &[(&'static str, &Option<String>)],
) -> Result<()> {
    for (name, value) in fields {
        if let Some(value) = value {
            form.set_field(name, value.as_str())?;
        }
    }
    Ok(())
}

fn settle<P>(outcome: Result<SubmissionResult<P>, SubmitError>) -> Result<P> {
    match outcome {
        Ok(SubmissionResult::Succeeded(payload)) => Ok(payload),
        Ok(SubmissionResult::Failed(message)) => bail!("{message}"),
        Ok(SubmissionResult::Idle | SubmissionResult::InProgress) => {
            bail!("submission did not finish")
        }
        Err(SubmitError::Invalid(fields)) => {
            let fields = fields.into_iter().collect::<Vec<_>>().join(", ");
            bail!("fix the invalid fields: {fields}")
        }
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn admin_list_flags_parse() {
        let cli = Cli::try_parse_from(["portal", "admin", "list", "--page", "2", "--rows", "5", "--json"])
            .expect("parse");
        match cli.command {
            Command::Admin {
                action: AdminAction::List { page, rows, json },
            } => {
                assert_eq!(page, 2);
                assert_eq!(rows, Some(5));
                assert!(json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn invalid_submit_lists_fields() {
        let fields = BTreeSet::from([names::EMAIL.to_string(), names::PASSWORD.to_string()]);
        let err = settle::<()>(Err(SubmitError::Invalid(fields))).expect_err("invalid");
        assert_eq!(err.to_string(), "fix the invalid fields: email, password");
    }

    #[test]
    fn failed_submit_surfaces_banner_text() {
        let err = settle::<()>(Ok(SubmissionResult::Failed("Login failed.".into())))
            .expect_err("failed");
        assert_eq!(err.to_string(), "Login failed.");
    }
}
