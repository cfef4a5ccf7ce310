//! REST API client module for the csphere backend.
//!
//! This module provides the `ApiClient` for posting login credentials to
//! `{base_url}/api/login` and mapping failed responses to `ApiError`.

pub mod client;
pub mod error;

pub use client::{ApiClient, LoginResponse};
pub use error::ApiError;
