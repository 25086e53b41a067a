use std::sync::Arc;

use async_trait::async_trait;
use forms::{
    schemas, FormError, FormSubmissionController, FormValues, HandlerError, SubmissionResult,
    SubmitError, SubmitHandler,
};
use shared::protocol::{BusinessAccount, Session};
use tracing::info;

use super::{business_profile_from, credentials_from, service_failure};
use crate::{
    display::{FormDisplay, PageText},
    navigation::{Navigator, Route},
    service::PortalService,
};

struct RegisterHandler<'a> {
    service: &'a dyn PortalService,
    with_location: bool,
    failure_message: &'static str,
}

#[async_trait]
impl SubmitHandler for RegisterHandler<'_> {
    type Output = BusinessAccount;

    async fn handle(&self, values: FormValues) -> Result<BusinessAccount, HandlerError> {
        let profile = business_profile_from(&values, self.with_location)?;
        self.service
            .register(profile)
            .await
            .map_err(|err| service_failure("register", err, self.failure_message))
    }
}

struct LoginHandler<'a> {
    service: &'a dyn PortalService,
}

#[async_trait]
impl SubmitHandler for LoginHandler<'_> {
    type Output = Session;

    async fn handle(&self, values: FormValues) -> Result<Session, HandlerError> {
        let credentials = credentials_from(&values)?;
        self.service
            .login(credentials)
            .await
            .map_err(|err| service_failure("login", err, LoginPage::TEXT.failure_message))
    }
}

/// Sign-up screen. A successful registration moves on to the login screen.
pub struct RegistrationPage {
    form: FormSubmissionController<BusinessAccount>,
    service: Arc<dyn PortalService>,
    navigator: Arc<dyn Navigator>,
}

impl RegistrationPage {
    pub const TEXT: PageText = PageText {
        title: "Business Registration",
        submit_label: "Register",
        submitting_label: "Registering...",
        success_message: None,
        failure_message: "Registration failed. Please try again.",
    };

    pub fn new(
        service: Arc<dyn PortalService>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, FormError> {
        Ok(Self {
            form: FormSubmissionController::new(schemas::registration())?,
            service,
            navigator,
        })
    }

    pub fn form(&self) -> &FormSubmissionController<BusinessAccount> {
        &self.form
    }

    pub async fn submit(&self) -> Result<SubmissionResult<BusinessAccount>, SubmitError> {
        let handler = RegisterHandler {
            service: self.service.as_ref(),
            with_location: false,
            failure_message: Self::TEXT.failure_message,
        };
        let result = self.form.submit(&handler).await?;
        if let SubmissionResult::Succeeded(account) = &result {
            info!(business_id = account.business_id.0, "registration: complete");
            self.navigator.go_to(Route::Login);
        }
        Ok(result)
    }

    pub fn display(&self) -> FormDisplay {
        FormDisplay::from_snapshot(&Self::TEXT, self.form.snapshot())
    }
}

/// Full business profile with address lines. Stays on the page afterwards.
pub struct BusinessProfilePage {
    form: FormSubmissionController<BusinessAccount>,
    service: Arc<dyn PortalService>,
}

impl BusinessProfilePage {
    pub const TEXT: PageText = PageText {
        title: "Create Business Profile",
        submit_label: "Create Business Profile",
        submitting_label: "Creating Profile...",
        success_message: Some("Business profile created successfully!"),
        failure_message: "Failed to create business profile. Please try again.",
    };

    pub fn new(service: Arc<dyn PortalService>) -> Result<Self, FormError> {
        Ok(Self {
            form: FormSubmissionController::new(schemas::business_profile())?,
            service,
        })
    }

    pub fn form(&self) -> &FormSubmissionController<BusinessAccount> {
        &self.form
    }

    pub async fn submit(&self) -> Result<SubmissionResult<BusinessAccount>, SubmitError> {
        let handler = RegisterHandler {
            service: self.service.as_ref(),
            with_location: true,
            failure_message: Self::TEXT.failure_message,
        };
        self.form.submit(&handler).await
    }

    pub fn display(&self) -> FormDisplay {
        FormDisplay::from_snapshot(&Self::TEXT, self.form.snapshot())
    }
}

pub struct LoginPage {
    form: FormSubmissionController<Session>,
    service: Arc<dyn PortalService>,
    navigator: Arc<dyn Navigator>,
}

impl LoginPage {
    pub const TEXT: PageText = PageText {
        title: "Business Login",
        submit_label: "Login",
        submitting_label: "Signing in...",
        success_message: None,
        failure_message: "Login failed. Please check your credentials and try again.",
    };

    pub fn new(
        service: Arc<dyn PortalService>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, FormError> {
        Ok(Self {
            form: FormSubmissionController::new(schemas::login())?,
            service,
            navigator,
        })
    }

    pub fn form(&self) -> &FormSubmissionController<Session> {
        &self.form
    }

    pub async fn submit(&self) -> Result<SubmissionResult<Session>, SubmitError> {
        let handler = LoginHandler {
            service: self.service.as_ref(),
        };
        let result = self.form.submit(&handler).await?;
        if result.payload().is_some() {
            self.navigator.go_to(Route::CollectionRequest);
        }
        Ok(result)
    }

    pub fn display(&self) -> FormDisplay {
        FormDisplay::from_snapshot(&Self::TEXT, self.form.snapshot())
    }
}
