//! User-visible notifications raised by the login flow.

/// Shown when the server rejects the login request.
pub const LOGIN_REJECTED_MESSAGE: &str = "Login failed. Please check your credentials.";

/// Shown for every other submission failure.
pub const SUBMIT_FAILED_MESSAGE: &str = "Failed to submit the form. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}
