use async_trait::async_trait;
use shared::{
    domain::{RequestId, RequestStatus},
    error::{ApiError, ErrorCode},
    protocol::{
        BusinessAccount, BusinessProfile, CollectionRequestDraft, CollectionRequestRecord,
        Credentials, Page, Session,
    },
};

/// Backend operations the portal screens depend on.
#[async_trait]
pub trait PortalService: Send + Sync {
    async fn register(&self, profile: BusinessProfile) -> Result<BusinessAccount, ApiError>;
    async fn login(&self, credentials: Credentials) -> Result<Session, ApiError>;
    async fn create_collection_request(
        &self,
        request: CollectionRequestDraft,
    ) -> Result<CollectionRequestRecord, ApiError>;
    async fn list_collection_requests(
        &self,
        page: usize,
        page_size: usize,
    ) -> Result<Page<CollectionRequestRecord>, ApiError>;
    async fn update_request_status(
        &self,
        id: RequestId,
        status: RequestStatus,
    ) -> Result<CollectionRequestRecord, ApiError>;
}

/// Stand-in used when no backend has been configured.
pub struct MissingPortalService;

fn unavailable(operation: &str) -> ApiError {
    ApiError::new(
        ErrorCode::Unavailable,
        format!("portal backend unavailable for {operation}"),
    )
}

#[async_trait]
impl PortalService for MissingPortalService {
    async fn register(&self, _profile: BusinessProfile) -> Result<BusinessAccount, ApiError> {
        Err(unavailable("register"))
    }

    async fn login(&self, _credentials: Credentials) -> Result<Session, ApiError> {
        Err(unavailable("login"))
    }

    async fn create_collection_request(
        &self,
        _request: CollectionRequestDraft,
    ) -> Result<CollectionRequestRecord, ApiError> {
        Err(unavailable("create_collection_request"))
    }

    async fn list_collection_requests(
        &self,
        _page: usize,
        _page_size: usize,
    ) -> Result<Page<CollectionRequestRecord>, ApiError> {
        Err(unavailable("list_collection_requests"))
    }

    async fn update_request_status(
        &self,
        id: RequestId,
        _status: RequestStatus,
    ) -> Result<CollectionRequestRecord, ApiError> {
        Err(unavailable(&format!("update_request_status({id})")))
    }
}
