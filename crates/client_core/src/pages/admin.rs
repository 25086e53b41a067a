use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use shared::{
    domain::{RequestId, RequestStatus},
    error::ApiError,
    protocol::{CollectionRequestRecord, Page},
};
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    display::{Banner, RequestTable},
    service::PortalService,
};

pub const ROWS_PER_PAGE_OPTIONS: [usize; 3] = [5, 10, 25];
pub const DEFAULT_ROWS_PER_PAGE: usize = 10;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("rows per page must be 5, 10 or 25, got {0}")]
    UnsupportedRowsPerPage(usize),
    #[error("collection request {0} not found")]
    NotFound(RequestId),
    #[error(transparent)]
    Api(#[from] ApiError),
}

struct DashboardState {
    page: usize,
    rows_per_page: usize,
    current: Option<Page<CollectionRequestRecord>>,
    banner: Option<Banner>,
}

/// Paginated table of collection requests with approve/reject actions.
pub struct AdminDashboard {
    service: Arc<dyn PortalService>,
    state: Mutex<DashboardState>,
}

impl AdminDashboard {
    pub fn new(
        service: Arc<dyn PortalService>,
        rows_per_page: usize,
    ) -> Result<Self, DashboardError> {
        ensure_supported(rows_per_page)?;
        Ok(Self {
            service,
            state: Mutex::new(DashboardState {
                page: 0,
                rows_per_page,
                current: None,
                banner: None,
            }),
        })
    }

    pub fn page(&self) -> usize {
        self.lock().page
    }

    pub fn rows_per_page(&self) -> usize {
        self.lock().rows_per_page
    }

    /// Reloads the current page from the service.
    pub async fn refresh(&self) -> Result<Page<CollectionRequestRecord>, DashboardError> {
        let (page, rows_per_page) = {
            let state = self.lock();
            (state.page, state.rows_per_page)
        };
        let loaded = self
            .service
            .list_collection_requests(page, rows_per_page)
            .await?;
        self.lock().current = Some(loaded.clone());
        Ok(loaded)
    }

    pub async fn set_page(&self, page: usize) -> Result<Page<CollectionRequestRecord>, DashboardError> {
        self.lock().page = page;
        self.refresh().await
    }

    /// Changing the page size always starts again from the first page.
    pub async fn set_rows_per_page(
        &self,
        rows_per_page: usize,
    ) -> Result<Page<CollectionRequestRecord>, DashboardError> {
        ensure_supported(rows_per_page)?;
        {
            let mut state = self.lock();
            state.rows_per_page = rows_per_page;
            state.page = 0;
        }
        self.refresh().await
    }

    pub async fn approve(&self, id: RequestId) -> Result<CollectionRequestRecord, DashboardError> {
        self.update_status(id, RequestStatus::Approved).await
    }

    pub async fn reject(&self, id: RequestId) -> Result<CollectionRequestRecord, DashboardError> {
        self.update_status(id, RequestStatus::Rejected).await
    }

    /// Looks on the loaded page first, then walks the listing.
    pub async fn view_details(
        &self,
        id: RequestId,
    ) -> Result<CollectionRequestRecord, DashboardError> {
        let cached = self.lock().current.as_ref().and_then(|page| {
            page.items.iter().find(|record| record.id == id).cloned()
        });
        if let Some(record) = cached {
            return Ok(record);
        }

        let page_size = ROWS_PER_PAGE_OPTIONS[ROWS_PER_PAGE_OPTIONS.len() - 1];
        let mut page = 0;
        loop {
            let listing = self.service.list_collection_requests(page, page_size).await?;
            if let Some(record) = listing.items.iter().find(|record| record.id == id) {
                return Ok(record.clone());
            }
            page += 1;
            if listing.items.is_empty() || page >= listing.page_count() {
                return Err(DashboardError::NotFound(id));
            }
        }
    }

    pub fn table(&self) -> RequestTable {
        let state = self.lock();
        let empty = Page::empty(state.page, state.rows_per_page);
        let page = state.current.as_ref().unwrap_or(&empty);
        RequestTable::from_page(page, &ROWS_PER_PAGE_OPTIONS, state.banner.clone())
    }

    async fn update_status(
        &self,
        id: RequestId,
        status: RequestStatus,
    ) -> Result<CollectionRequestRecord, DashboardError> {
        let updated = match self.service.update_request_status(id, status).await {
            Ok(updated) => updated,
            Err(err) => {
                warn!(request_id = id.0, %status, error = %err, "admin: status update failed");
                self.lock().banner = Some(Banner::error(format!(
                    "Could not mark request {id} as {status}."
                )));
                return Err(err.into());
            }
        };
        info!(request_id = id.0, %status, "admin: status updated");
        self.lock().banner = Some(Banner::success(format!("Request {id} marked as {status}.")));
        self.refresh().await?;
        Ok(updated)
    }

    fn lock(&self) -> MutexGuard<'_, DashboardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn ensure_supported(rows_per_page: usize) -> Result<(), DashboardError> {
    if ROWS_PER_PAGE_OPTIONS.contains(&rows_per_page) {
        Ok(())
    } else {
        Err(DashboardError::UnsupportedRowsPerPage(rows_per_page))
    }
}
