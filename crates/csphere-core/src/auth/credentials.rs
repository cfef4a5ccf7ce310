use std::fmt;

use thiserror::Error;

/// Minimum username length, in characters.
pub const MIN_USERNAME_LENGTH: usize = 5;

/// Maximum username length, in characters.
pub const MAX_USERNAME_LENGTH: usize = 50;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Username is required")]
    UsernameRequired,

    #[error("Username must be at least {} characters", MIN_USERNAME_LENGTH)]
    UsernameTooShort,

    #[error("Username must be at most {} characters", MAX_USERNAME_LENGTH)]
    UsernameTooLong,
}

/// A username/password pair held only for the duration of a submission.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// Check the local form rules. The password has no constraints.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_username(&self.username)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    let len = username.chars().count();
    if len == 0 {
        Err(ValidationError::UsernameRequired)
    } else if len < MIN_USERNAME_LENGTH {
        Err(ValidationError::UsernameTooShort)
    } else if len > MAX_USERNAME_LENGTH {
        Err(ValidationError::UsernameTooLong)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_length_bounds() {
        assert_eq!(validate_username(""), Err(ValidationError::UsernameRequired));
        assert_eq!(validate_username("abcd"), Err(ValidationError::UsernameTooShort));
        assert_eq!(validate_username("abcde"), Ok(()));
        assert_eq!(validate_username(&"a".repeat(50)), Ok(()));
        assert_eq!(validate_username(&"a".repeat(51)), Err(ValidationError::UsernameTooLong));
    }

    #[test]
    fn test_username_counts_characters_not_bytes() {
        // 5 characters, 10 bytes
        assert_eq!(validate_username("ééééé"), Ok(()));
        assert_eq!(validate_username(&"é".repeat(50)), Ok(()));
    }

    #[test]
    fn test_password_unconstrained() {
        assert!(Credentials::new("alice", "").validate().is_ok());
        assert!(Credentials::new("alice", "x".repeat(1000)).validate().is_ok());
    }

    #[test]
    fn test_debug_redacts_password() {
        let creds = Credentials::new("alice", "hunter2");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("alice"));
        assert!(!debug.contains("hunter2"));
    }
}
