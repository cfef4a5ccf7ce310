//! API client for the csphere login endpoint.
//!
//! This module provides the `ApiClient` struct which posts credentials as
//! JSON and returns the parsed login response.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::auth::Credentials;

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Path of the login endpoint, appended to the base URL
const LOGIN_PATH: &str = "/api/login";

/// Default HTTP request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// Successful login response body. Only `token` is interpreted; any other
/// fields the server sends are ignored.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
}

/// API client for the csphere backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client for the given base URL
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn login_url(&self) -> String {
        format!("{}{}", self.base_url, LOGIN_PATH)
    }

    /// Post credentials to the login endpoint.
    ///
    /// A non-success status becomes an `ApiError` built from the status and
    /// the (truncated) response body. A success body that is not valid JSON is
    /// `ApiError::InvalidResponse`.
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        let url = self.login_url();
        debug!(url = %url, username = %credentials.username(), "Sending login request");

        let response = self
            .client
            .post(&url)
            .json(&LoginRequest {
                username: credentials.username(),
                password: credentials.password(),
            })
            .send()
            .await?;

        debug!(status = %response.status(), headers = ?response.headers(), "Login response received");

        let response = Self::check_response(response).await?;
        let body = response.text().await?;

        let parsed: LoginResponse = serde_json::from_str(&body)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse login response: {}", e)))?;

        debug!(has_token = parsed.token.is_some(), "Login response parsed");
        Ok(parsed)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Login request rejected");
            Err(ApiError::from_status(status, &body))
        }
    }
}
