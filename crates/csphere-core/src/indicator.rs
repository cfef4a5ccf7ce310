//! Login/logout control whose state follows the token cookie.
//!
//! The indicator only re-reads the cookie when told a navigation happened;
//! between navigations it shows what it saw last.

use tracing::{info, warn};

use crate::auth::SessionStore;
use crate::navigation::Route;

pub const LOGIN_LABEL: &str = "Login";
pub const LOGOUT_LABEL: &str = "Logout";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionIndicator {
    token: Option<String>,
    route: Option<Route>,
}

impl SessionIndicator {
    /// Create the indicator and take the initial reading
    pub fn mount(route: Route, store: &dyn SessionStore) -> Self {
        let mut indicator = Self::default();
        indicator.observe(route, store);
        indicator
    }

    /// Record a navigation and re-read the token cookie
    pub fn observe(&mut self, route: Route, store: &dyn SessionStore) {
        self.route = Some(route);
        self.token = match store.get() {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Failed to read token, treating as logged out");
                None
            }
        };
    }

    pub fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Route at the last observation
    pub fn route(&self) -> Option<Route> {
        self.route
    }

    pub fn label(&self) -> &'static str {
        if self.is_logged_in() {
            LOGOUT_LABEL
        } else {
            LOGIN_LABEL
        }
    }

    /// Press the control and return where to navigate.
    ///
    /// Logged in: clear the session and go to `/login`. A failure to clear is
    /// logged; navigation still happens. Logged out: go to `/login`.
    pub fn activate(&self, store: &dyn SessionStore) -> Route {
        if !self.is_logged_in() {
            return Route::Login;
        }
        if let Err(e) = store.clear() {
            warn!(error = %e, "Failed to fully clear session on logout");
        }
        info!("Logged out");
        Route::Login
    }
}
