//! Client side of the e-waste pickup portal: the backend boundary, the
//! simulated backend, navigation, and the per-screen page controllers.

pub mod display;
pub mod navigation;
pub mod pages;
pub mod service;
pub mod simulated;

pub use display::{Banner, BannerTone, DisplaySurface, FormDisplay, PageText, RequestRow, RequestTable};
pub use navigation::{Navigator, RecordingNavigator, Route};
pub use pages::{
    AdminDashboard, BusinessProfilePage, CollectionRequestPage, DashboardError, LoginPage,
    RegistrationPage, DEFAULT_REDIRECT_DELAY, DEFAULT_ROWS_PER_PAGE, ROWS_PER_PAGE_OPTIONS,
};
pub use service::{MissingPortalService, PortalService};
pub use simulated::{SimulatedPortalService, DEFAULT_SIMULATED_LATENCY};
