use std::{
    fmt,
    str::FromStr,
    sync::{Mutex, PoisonError},
};

use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Register,
    Login,
    CollectionRequest,
    Admin,
}

impl Route {
    pub const ALL: [Route; 5] = [
        Route::Home,
        Route::Register,
        Route::Login,
        Route::CollectionRequest,
        Route::Admin,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Register => "/register",
            Route::Login => "/login",
            Route::CollectionRequest => "/collection-request",
            Route::Admin => "/admin",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no route for path `{0}`")]
pub struct UnknownRoute(pub String);

impl FromStr for Route {
    type Err = UnknownRoute;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Route::ALL
            .into_iter()
            .find(|route| route.path() == s)
            .ok_or_else(|| UnknownRoute(s.to_string()))
    }
}

pub trait Navigator: Send + Sync {
    fn go_to(&self, route: Route);
}

/// Keeps every visited route; the last one is the current screen.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    history: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Route> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .copied()
    }

    pub fn history(&self) -> Vec<Route> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Navigator for RecordingNavigator {
    fn go_to(&self, route: Route) {
        info!(route = route.path(), "navigation: go to");
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(route);
    }
}
