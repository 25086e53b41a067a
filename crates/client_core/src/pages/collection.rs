use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use forms::{
    schemas, FormError, FormSubmissionController, FormValues, HandlerError, SubmissionResult,
    SubmitError, SubmitHandler,
};
use shared::{domain::EWasteCategory, protocol::CollectionRequestRecord};
use tracing::info;

use super::{collection_draft_from, service_failure};
use crate::{
    display::{FormDisplay, PageText},
    navigation::{Navigator, Route},
    service::PortalService,
};

/// How long the success banner stays up before returning home.
pub const DEFAULT_REDIRECT_DELAY: Duration = Duration::from_secs(2);

struct CreateRequestHandler<'a> {
    service: &'a dyn PortalService,
}

#[async_trait]
impl SubmitHandler for CreateRequestHandler<'_> {
    type Output = CollectionRequestRecord;

    async fn handle(&self, values: FormValues) -> Result<CollectionRequestRecord, HandlerError> {
        let draft = collection_draft_from(&values)?;
        self.service
            .create_collection_request(draft)
            .await
            .map_err(|err| {
                service_failure(
                    "create_collection_request",
                    err,
                    CollectionRequestPage::TEXT.failure_message,
                )
            })
    }
}

pub struct CollectionRequestPage {
    form: FormSubmissionController<CollectionRequestRecord>,
    service: Arc<dyn PortalService>,
    navigator: Arc<dyn Navigator>,
    redirect_delay: Duration,
}

impl CollectionRequestPage {
    pub const TEXT: PageText = PageText {
        title: "Request E-Waste Collection",
        submit_label: "Submit Collection Request",
        submitting_label: "Submitting...",
        success_message: Some("Collection request submitted successfully!"),
        failure_message: "Failed to submit collection request. Please try again.",
    };

    pub fn new(
        service: Arc<dyn PortalService>,
        navigator: Arc<dyn Navigator>,
        redirect_delay: Duration,
    ) -> Result<Self, FormError> {
        let categories = EWasteCategory::ALL.iter().map(|category| category.label());
        Ok(Self {
            form: FormSubmissionController::new(schemas::collection_request(categories))?,
            service,
            navigator,
            redirect_delay,
        })
    }

    pub fn form(&self) -> &FormSubmissionController<CollectionRequestRecord> {
        &self.form
    }

    pub async fn submit(
        &self,
    ) -> Result<SubmissionResult<CollectionRequestRecord>, SubmitError> {
        let handler = CreateRequestHandler {
            service: self.service.as_ref(),
        };
        let result = self.form.submit(&handler).await?;
        if let SubmissionResult::Succeeded(record) = &result {
            info!(request_id = record.id.0, "collection request: submitted");
        }
        Ok(result)
    }

    /// After a successful submission, waits out the redirect delay so the
    /// success banner can be seen, then goes home. Does nothing otherwise.
    pub async fn follow_redirect(&self) -> Option<Route> {
        if self.form.result().payload().is_none() {
            return None;
        }
        if !self.redirect_delay.is_zero() {
            tokio::time::sleep(self.redirect_delay).await;
        }
        self.navigator.go_to(Route::Home);
        Some(Route::Home)
    }

    pub fn display(&self) -> FormDisplay {
        FormDisplay::from_snapshot(&Self::TEXT, self.form.snapshot())
    }
}
