use anyhow::{Context, Result};
use keyring::Entry;
use tracing::debug;

use super::session::SessionStore;

const SERVICE_NAME: &str = "csphere";

/// Key of the token slot. Login writes and logout clears this same key.
pub const TOKEN_SLOT_KEY: &str = "csphere_token";

/// Local key-value slot for the session token, kept in the OS keychain.
pub struct KeyringSlot {
    service: String,
    key: String,
}

impl KeyringSlot {
    pub fn new() -> Self {
        Self {
            service: SERVICE_NAME.to_string(),
            key: TOKEN_SLOT_KEY.to_string(),
        }
    }

    fn entry(&self) -> Result<Entry> {
        Entry::new(&self.service, &self.key).context("Failed to create keyring entry")
    }
}

impl Default for KeyringSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for KeyringSlot {
    fn get(&self) -> Result<Option<String>> {
        match self.entry()?.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e).context("Failed to read token from keychain"),
        }
    }

    fn set(&self, token: &str) -> Result<()> {
        debug!(key = %self.key, "Writing token slot");
        self.entry()?
            .set_password(token)
            .context("Failed to store token in keychain")
    }

    fn clear(&self) -> Result<()> {
        debug!(key = %self.key, "Clearing token slot");
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e).context("Failed to delete token from keychain"),
        }
    }
}
