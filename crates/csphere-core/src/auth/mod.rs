//! Authentication module for the client-side session.
//!
//! This module provides:
//! - `Credentials`: Transient username/password pair with form validation
//! - `CookieJar`: File-backed cookies; the session token lives in `token`
//! - `KeyringSlot`: Local key-value slot for the token in the OS keychain
//! - `Session`: The token store combining both behind `SessionStore`
//!
//! The token cookie expires one hour after login.

pub mod cookie;
pub mod credentials;
pub mod session;
pub mod slot;

pub use cookie::{Cookie, CookieJar, TOKEN_COOKIE, TOKEN_MAX_AGE_SECS};
pub use credentials::{Credentials, ValidationError, MAX_USERNAME_LENGTH, MIN_USERNAME_LENGTH};
pub use session::{MemoryStore, Session, SessionStore};
pub use slot::{KeyringSlot, TOKEN_SLOT_KEY};
