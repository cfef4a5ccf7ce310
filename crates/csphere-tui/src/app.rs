//! Application state management for csphere.
//!
//! This module contains the core `App` struct holding the current route,
//! the login form, the session indicator and the channel that carries
//! submission results back from background tasks.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use csphere_core::auth::{Credentials, MAX_USERNAME_LENGTH};
use csphere_core::{
    ApiClient, Config, CredentialSubmitter, LoginSuccess, Notification, Route, Session,
    SessionIndicator, SubmitError,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the submission result channel.
const CHANNEL_BUFFER_SIZE: usize = 8;

/// How long a toast notification stays on screen.
const TOAST_DURATION: Duration = Duration::from_secs(5);

const LOGGED_OUT_MESSAGE: &str = "Logged out.";

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFocus {
    Username,
    Password,
    Submit,
    SignUp,
}

impl LoginFocus {
    pub fn next(&self) -> Self {
        match self {
            LoginFocus::Username => LoginFocus::Password,
            LoginFocus::Password => LoginFocus::Submit,
            LoginFocus::Submit => LoginFocus::SignUp,
            LoginFocus::SignUp => LoginFocus::Username,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            LoginFocus::Username => LoginFocus::SignUp,
            LoginFocus::Password => LoginFocus::Username,
            LoginFocus::Submit => LoginFocus::Password,
            LoginFocus::SignUp => LoginFocus::Submit,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub notification: Notification,
    shown_at: Instant,
}

impl Toast {
    fn new(notification: Notification) -> Self {
        Self {
            notification,
            shown_at: Instant::now(),
        }
    }

    fn is_expired(&self) -> bool {
        self.shown_at.elapsed() >= TOAST_DURATION
    }
}

/// Result of a background submission, sent back over the channel
struct SubmitMessage {
    username: String,
    result: Result<LoginSuccess, SubmitError>,
}

// ============================================================================
// App
// ============================================================================

pub struct App {
    pub config: Config,
    config_path: PathBuf,
    pub session: Session,
    submitter: Arc<CredentialSubmitter>,
    pub indicator: SessionIndicator,

    pub route: Route,
    pub state: AppState,

    // Login form state
    pub login_username: String,
    pub login_password: String,
    pub login_focus: LoginFocus,
    pub login_error: Option<String>,

    pub toast: Option<Toast>,

    // Submissions spawned and not yet reported back
    in_flight: usize,
    submit_rx: mpsc::Receiver<SubmitMessage>,
    submit_tx: mpsc::Sender<SubmitMessage>,
}

impl App {
    /// Create a new application instance. Fails when no API base URL is
    /// configured.
    pub fn new(config: Config, config_path: PathBuf, session: Session) -> Result<Self> {
        let api = ApiClient::new(config.base_url()?, config.request_timeout())?;
        debug!(url = %api.login_url(), "Login endpoint configured");

        let submitter = CredentialSubmitter::new(api, Arc::new(session.clone()))
            .require_token(config.require_token);

        let route = if session.is_authenticated() {
            Route::Home
        } else {
            Route::Login
        };
        let indicator = SessionIndicator::mount(route, &session);

        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        let login_username = config.last_username.clone().unwrap_or_default();
        let login_focus = if login_username.is_empty() {
            LoginFocus::Username
        } else {
            LoginFocus::Password
        };

        Ok(Self {
            config,
            config_path,
            session,
            submitter: Arc::new(submitter),
            indicator,

            route,
            state: AppState::Normal,

            login_username,
            login_password: String::new(),
            login_focus,
            login_error: None,

            toast: None,

            in_flight: 0,
            submit_rx: rx,
            submit_tx: tx,
        })
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Switch screens. The session indicator re-reads the cookie on every
    /// navigation.
    pub fn navigate(&mut self, route: Route) {
        debug!(from = %self.route, to = %route, "Navigating");
        if self.route == Route::Login && route != Route::Login {
            self.login_password.clear();
            self.login_error = None;
        }
        self.route = route;
        self.indicator.observe(route, &self.session);
    }

    /// Press the header login/logout button
    pub fn press_session_button(&mut self) {
        let was_logged_in = self.indicator.is_logged_in();
        let next = self.indicator.activate(&self.session);
        self.navigate(next);
        if was_logged_in {
            self.show_toast(Notification::info(LOGGED_OUT_MESSAGE));
        }
    }

    // =========================================================================
    // Login form
    // =========================================================================

    pub fn is_submitting(&self) -> bool {
        self.in_flight > 0
    }

    /// The form contents exactly as typed
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.login_username.clone(), self.login_password.clone())
    }

    /// Validate the form and hand it to a background task. Invalid input is
    /// shown under the username field and nothing is sent.
    pub fn start_submit(&mut self) {
        let credentials = self.credentials();
        if let Err(e) = credentials.validate() {
            self.login_error = Some(e.to_string());
            return;
        }
        self.login_error = None;

        let submitter = self.submitter.clone();
        let tx = self.submit_tx.clone();
        self.in_flight += 1;
        tokio::spawn(async move {
            let result = submitter.submit(&credentials).await;
            let message = SubmitMessage {
                username: credentials.username().to_string(),
                result,
            };
            if tx.send(message).await.is_err() {
                debug!("App closed before submission finished");
            }
        });
    }

    /// Drain finished submissions and expire old toasts
    pub fn check_background_tasks(&mut self) {
        while let Ok(message) = self.submit_rx.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            self.apply_submit_message(message);
        }

        if self.toast.as_ref().map(Toast::is_expired).unwrap_or(false) {
            self.toast = None;
        }
    }

    fn apply_submit_message(&mut self, message: SubmitMessage) {
        // The form may have been left while the request was running
        if self.route != Route::Login {
            debug!(route = %self.route, "Login form no longer shown, dropping submission result");
            return;
        }

        match message.result {
            Ok(success) => {
                self.login_password.clear();
                self.remember_username(message.username);
                if !success.token_stored {
                    warn!("Navigating without a stored token");
                }
                self.navigate(success.route);
            }
            Err(SubmitError::Busy) => {
                debug!("Submission ignored, another one is in progress");
            }
            Err(SubmitError::Invalid(e)) => {
                self.login_error = Some(e.to_string());
            }
            Err(e) => {
                if let Some(notification) = e.notification() {
                    self.show_toast(notification);
                }
            }
        }
    }

    fn remember_username(&mut self, username: String) {
        if self.config.last_username.as_deref() == Some(username.as_str()) {
            return;
        }
        self.config.last_username = Some(username);
        if let Err(e) = self.config.save_to(&self.config_path) {
            warn!(error = %e, "Failed to save config");
        } else {
            info!("Saved last username");
        }
    }

    pub fn show_toast(&mut self, notification: Notification) {
        self.toast = Some(Toast::new(notification));
    }
}

// ============================================================================
// Input Validation
// ============================================================================

/// Check if a character is valid for text input (printable, non-control)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

/// Check if a username character should be accepted
pub fn can_add_username_char(current_len: usize, c: char) -> bool {
    current_len < MAX_USERNAME_LENGTH && is_valid_input_char(c)
}

/// Check if a password character should be accepted. Passwords have no
/// length limit.
pub fn can_add_password_char(c: char) -> bool {
    is_valid_input_char(c)
}

// ============================================================================
// Tests
// ============================================================================
