//! In-memory [`PortalService`] with a fixed artificial delay.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use shared::{
    domain::{BusinessId, EWasteCategory, RequestId, RequestStatus},
    error::ApiError,
    protocol::{
        BusinessAccount, BusinessProfile, CollectionRequestDraft, CollectionRequestRecord,
        Credentials, Page, Session,
    },
};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::service::PortalService;

pub const DEFAULT_SIMULATED_LATENCY: Duration = Duration::from_millis(1000);
const GUEST_BUSINESS_NAME: &str = "Guest Business";

#[derive(Default)]
struct SimulatedState {
    next_business_id: i64,
    next_request_id: i64,
    next_session: u64,
    accounts: Vec<BusinessAccount>,
    active_business: Option<String>,
    requests: Vec<CollectionRequestRecord>,
}

pub struct SimulatedPortalService {
    latency: Duration,
    forced_failure: Option<ApiError>,
    inner: Mutex<SimulatedState>,
}

impl SimulatedPortalService {
    pub fn new(latency: Duration) -> Self {
        Self::with_requests(latency, Vec::new())
    }

    /// Starts with the two sample requests shown on a fresh admin dashboard.
    pub fn seeded(latency: Duration) -> Self {
        let requests = sample_requests()
            .into_iter()
            .zip(1..)
            .map(|((business_name, draft, status), id)| {
                record(RequestId(id), business_name, draft, status)
            })
            .collect();
        Self::with_requests(latency, requests)
    }

    fn with_requests(latency: Duration, requests: Vec<CollectionRequestRecord>) -> Self {
        Self {
            latency,
            forced_failure: None,
            inner: Mutex::new(SimulatedState {
                next_business_id: 1,
                next_request_id: requests.len() as i64 + 1,
                requests,
                ..SimulatedState::default()
            }),
        }
    }

    /// Every call fails with `error` after the usual delay.
    pub fn failing_with(mut self, error: ApiError) -> Self {
        self.forced_failure = Some(error);
        self
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    async fn simulate_call(&self, operation: &'static str) -> Result<(), ApiError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if let Some(err) = &self.forced_failure {
            warn!(operation, error = %err, "simulated: forced failure");
            return Err(err.clone());
        }
        Ok(())
    }
}

#[async_trait]
impl PortalService for SimulatedPortalService {
    async fn register(&self, profile: BusinessProfile) -> Result<BusinessAccount, ApiError> {
        self.simulate_call("register").await?;
        let mut state = self.inner.lock().await;
        let account = BusinessAccount {
            business_id: BusinessId(state.next_business_id),
            business_name: profile.business_name,
            email: profile.email,
            registered_at: Utc::now(),
        };
        state.next_business_id += 1;
        state.accounts.push(account.clone());
        info!(
            business_id = account.business_id.0,
            business_type = %profile.business_type,
            "simulated: business registered"
        );
        Ok(account)
    }

    async fn login(&self, credentials: Credentials) -> Result<Session, ApiError> {
        self.simulate_call("login").await?;
        let mut state = self.inner.lock().await;
        let account = state
            .accounts
            .iter()
            .find(|account| account.email.eq_ignore_ascii_case(&credentials.email))
            .cloned();
        state.next_session += 1;
        state.active_business = account.as_ref().map(|a| a.business_name.clone());
        let session = Session {
            email: credentials.email,
            business_id: account.map(|a| a.business_id),
            token: format!("simulated-session-{}", state.next_session),
        };
        info!(
            known_business = session.business_id.is_some(),
            "simulated: login accepted"
        );
        Ok(session)
    }

    async fn create_collection_request(
        &self,
        request: CollectionRequestDraft,
    ) -> Result<CollectionRequestRecord, ApiError> {
        self.simulate_call("create_collection_request").await?;
        let mut state = self.inner.lock().await;
        let id = RequestId(state.next_request_id);
        state.next_request_id += 1;
        let business_name = state
            .active_business
            .clone()
            .unwrap_or_else(|| GUEST_BUSINESS_NAME.to_string());
        let created = record(id, business_name, request, RequestStatus::Pending);
        state.requests.push(created.clone());
        info!(
            request_id = id.0,
            category = %created.category,
            quantity = created.quantity,
            "simulated: collection request created"
        );
        Ok(created)
    }

    async fn list_collection_requests(
        &self,
        page: usize,
        page_size: usize,
    ) -> Result<Page<CollectionRequestRecord>, ApiError> {
        if page_size == 0 {
            return Err(ApiError::validation("page size must be positive"));
        }
        self.simulate_call("list_collection_requests").await?;
        let state = self.inner.lock().await;
        Ok(Page::slice(&state.requests, page, page_size))
    }

    async fn update_request_status(
        &self,
        id: RequestId,
        status: RequestStatus,
    ) -> Result<CollectionRequestRecord, ApiError> {
        self.simulate_call("update_request_status").await?;
        let mut state = self.inner.lock().await;
        let request = state
            .requests
            .iter_mut()
            .find(|request| request.id == id)
            .ok_or_else(|| ApiError::not_found(format!("collection request {id}")))?;
        let previous = request.status;
        request.status = status;
        info!(
            request_id = id.0,
            from = %previous,
            to = %status,
            "simulated: request status updated"
        );
        Ok(request.clone())
    }
}

fn record(
    id: RequestId,
    business_name: String,
    draft: CollectionRequestDraft,
    status: RequestStatus,
) -> CollectionRequestRecord {
    CollectionRequestRecord {
        id,
        business_name,
        category: draft.category,
        quantity: draft.quantity,
        description: draft.description,
        pickup_address: draft.pickup_address,
        pickup_at: draft.pickup_at,
        special_instructions: draft.special_instructions,
        status,
    }
}

fn sample_requests() -> Vec<(String, CollectionRequestDraft, RequestStatus)> {
    vec![
        (
            "Tech Solutions Inc.".to_string(),
            CollectionRequestDraft {
                category: EWasteCategory::ComputersAndLaptops,
                quantity: 5,
                description: "Retired office workstations".to_string(),
                pickup_address: "123 Tech Street, Manila".to_string(),
                pickup_at: Utc.with_ymd_and_hms(2024, 3, 20, 14, 0, 0).single().unwrap_or_default(),
                special_instructions: None,
            },
            RequestStatus::Pending,
        ),
        (
            "Office Supplies Co.".to_string(),
            CollectionRequestDraft {
                category: EWasteCategory::PrintersAndScanners,
                quantity: 3,
                description: "Broken laser printers".to_string(),
                pickup_address: "456 Business Ave, Quezon City".to_string(),
                pickup_at: Utc.with_ymd_and_hms(2024, 3, 21, 10, 0, 0).single().unwrap_or_default(),
                special_instructions: None,
            },
            RequestStatus::Approved,
        ),
    ]
}
