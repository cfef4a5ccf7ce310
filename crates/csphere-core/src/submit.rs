//! Credential submission: validate, post, persist the token, pick a route.
//!
//! A submitter moves `Idle -> Submitting -> Idle`. While one submission is
//! in flight any further call returns `SubmitError::Busy` without touching
//! the network. Every path back out of `submit` restores `Idle`.

use std::sync::{Arc, Mutex};

use thiserror::Error;
use tracing::{error, info, warn};

use crate::api::{ApiClient, ApiError};
use crate::auth::{Credentials, SessionStore, ValidationError};
use crate::navigation::Route;
use crate::notify::{Notification, LOGIN_REJECTED_MESSAGE, SUBMIT_FAILED_MESSAGE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitState {
    Idle,
    Submitting,
}

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("Invalid credentials: {0}")]
    Invalid(#[from] ValidationError),

    #[error("A login request is already in progress")]
    Busy,

    #[error("Login rejected: {0}")]
    Rejected(ApiError),

    #[error("Login response did not include a token")]
    MissingToken,

    #[error("Login submission failed: {0:#}")]
    Exception(anyhow::Error),
}

impl SubmitError {
    /// The notification to show, if any. Validation problems are reported
    /// next to the form field and a busy submitter is silent.
    pub fn notification(&self) -> Option<Notification> {
        match self {
            SubmitError::Invalid(_) | SubmitError::Busy => None,
            SubmitError::Rejected(_) => Some(Notification::error(LOGIN_REJECTED_MESSAGE)),
            SubmitError::MissingToken | SubmitError::Exception(_) => {
                Some(Notification::error(SUBMIT_FAILED_MESSAGE))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginSuccess {
    pub route: Route,
    pub token_stored: bool,
}

pub struct CredentialSubmitter {
    api: ApiClient,
    session: Arc<dyn SessionStore>,
    require_token: bool,
    state: Mutex<SubmitState>,
}

/// Puts the submitter back to `Idle` when dropped
struct SubmittingGuard<'a> {
    state: &'a Mutex<SubmitState>,
}

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = SubmitState::Idle;
    }
}

impl CredentialSubmitter {
    pub fn new(api: ApiClient, session: Arc<dyn SessionStore>) -> Self {
        Self {
            api,
            session,
            require_token: false,
            state: Mutex::new(SubmitState::Idle),
        }
    }

    /// Fail a success response that carries no token instead of navigating
    pub fn require_token(mut self, require: bool) -> Self {
        self.require_token = require;
        self
    }

    pub fn state(&self) -> SubmitState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn begin(&self) -> Option<SubmittingGuard<'_>> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if *state == SubmitState::Submitting {
            return None;
        }
        *state = SubmitState::Submitting;
        Some(SubmittingGuard { state: &self.state })
    }

    /// Run one login attempt. No retries on any failure.
    pub async fn submit(&self, credentials: &Credentials) -> Result<LoginSuccess, SubmitError> {
        credentials.validate()?;

        let _guard = self.begin().ok_or(SubmitError::Busy)?;

        let response = match self.api.login(credentials).await {
            Ok(response) => response,
            Err(e) if e.is_rejection() => {
                warn!(error = %e, username = %credentials.username(), "Login rejected");
                return Err(SubmitError::Rejected(e));
            }
            Err(e) => {
                error!(error = %e, "Form submission error");
                return Err(SubmitError::Exception(e.into()));
            }
        };

        match response.token.filter(|t| !t.is_empty()) {
            Some(token) => {
                if let Err(e) = self.session.set(&token) {
                    error!(error = %e, "Failed to persist session token");
                    return Err(SubmitError::Exception(e));
                }
                info!(username = %credentials.username(), "Login successful");
                Ok(LoginSuccess {
                    route: Route::Home,
                    token_stored: true,
                })
            }
            None if self.require_token => {
                error!("Login succeeded without a token");
                Err(SubmitError::MissingToken)
            }
            None => {
                warn!("Login succeeded without a token, continuing unauthenticated");
                Ok(LoginSuccess {
                    route: Route::Home,
                    token_stored: false,
                })
            }
        }
    }
}
