use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use tracing::{debug, warn};

use super::cookie::CookieJar;
use super::slot::KeyringSlot;

/// Storage for the session token with explicit get/set/clear.
pub trait SessionStore: Send + Sync {
    /// Read the stored token, `None` when absent or expired
    fn get(&self) -> Result<Option<String>>;

    /// Store a token, replacing any previous one
    fn set(&self, token: &str) -> Result<()>;

    /// Remove the token. Clearing an empty store is not an error.
    fn clear(&self) -> Result<()>;
}

/// In-process token store, used for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStore {
    token: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self) -> Result<Option<String>> {
        Ok(self.token.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn set(&self, token: &str) -> Result<()> {
        *self.token.lock().unwrap_or_else(|e| e.into_inner()) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.token.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}

/// The client session: the `token` cookie plus the local key-value slot.
///
/// Reads consult the cookie only, so an expired cookie means "logged out"
/// even if the slot still holds a value. Writes go to the slot first, then
/// the cookie. The two writes are not atomic: if the second fails the first
/// stays applied.
#[derive(Clone)]
pub struct Session {
    cookie: Arc<dyn SessionStore>,
    slot: Arc<dyn SessionStore>,
}

impl Session {
    pub fn new(cookie: Arc<dyn SessionStore>, slot: Arc<dyn SessionStore>) -> Self {
        Self { cookie, slot }
    }

    /// Cookie jar under `session_dir` and the keychain slot
    pub fn open(session_dir: &Path) -> Self {
        debug!(dir = ?session_dir, "Opening session store");
        Self::new(
            Arc::new(CookieJar::new(session_dir)),
            Arc::new(KeyringSlot::new()),
        )
    }

    /// Both halves in memory
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), Arc::new(MemoryStore::new()))
    }

    /// Current token from the cookie. A read failure is logged and treated
    /// as no token.
    pub fn token(&self) -> Option<String> {
        match self.cookie.get() {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Failed to read token cookie");
                None
            }
        }
    }

    /// Value held by the local slot, independent of the cookie
    pub fn slot_token(&self) -> Result<Option<String>> {
        self.slot.get()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }
}

impl SessionStore for Session {
    fn get(&self) -> Result<Option<String>> {
        self.cookie.get()
    }

    fn set(&self, token: &str) -> Result<()> {
        self.slot.set(token)?;
        self.cookie.set(token)?;
        Ok(())
    }

    /// Clears both halves even if the first fails; the first error is returned.
    fn clear(&self) -> Result<()> {
        let cookie_result = self.cookie.clear();
        let slot_result = self.slot.clear();
        if let Err(ref e) = cookie_result {
            warn!(error = %e, "Failed to clear token cookie");
        }
        if let Err(ref e) = slot_result {
            warn!(error = %e, "Failed to clear token slot");
        }
        cookie_result.and(slot_result)
    }
}
