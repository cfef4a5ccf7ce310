//! Core library for csphere.
//!
//! This crate holds everything below the user interface:
//!
//! - `api`: HTTP client for the `/api/login` endpoint
//! - `auth`: Credentials, the token cookie, the keychain slot and `Session`
//! - `config`: Persisted configuration and environment overrides
//! - `indicator`: The login/logout control driven by the token cookie
//! - `submit`: The credential submission flow
//! - `navigation`, `notify`: Routes and user-visible notifications

pub mod api;
pub mod auth;
pub mod config;
pub mod indicator;
pub mod navigation;
pub mod notify;
pub mod submit;

pub use api::{ApiClient, ApiError};
pub use auth::{Credentials, Session, SessionStore};
pub use config::Config;
pub use indicator::SessionIndicator;
pub use navigation::Route;
pub use notify::Notification;
pub use submit::{CredentialSubmitter, LoginSuccess, SubmitError, SubmitState};
