//! File-backed cookie jar.
//!
//! Cookies carry a path and an absolute expiry derived from `Max-Age`. A
//! cookie whose expiry has passed reads as absent, and setting a cookie with
//! `Max-Age=0` removes it, matching browser semantics.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::session::SessionStore;

/// Cookie jar file name in the session directory
const COOKIE_FILE: &str = "cookies.json";

/// Scratch file the jar is written to before being renamed into place
const COOKIE_TMP_FILE: &str = "cookies.json.tmp";

/// Name of the session token cookie
pub const TOKEN_COOKIE: &str = "token";

/// Path the token cookie is scoped to
pub const TOKEN_COOKIE_PATH: &str = "/";

/// Token cookie lifetime in seconds (one hour).
pub const TOKEN_MAX_AGE_SECS: i64 = 3600;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub path: String,
    pub max_age: i64,
    pub expires_at: DateTime<Utc>,
}

impl Cookie {
    pub fn new(name: &str, value: &str, path: &str, max_age_secs: i64) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            path: path.to_string(),
            max_age: max_age_secs,
            expires_at: Utc::now() + Duration::seconds(max_age_secs),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.max_age <= 0 || Utc::now() >= self.expires_at
    }
}

/// Renders in `Set-Cookie` form, e.g. `token=abc; Path=/; Max-Age=3600`
impl fmt::Display for Cookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}; Path={}; Max-Age={}", self.name, self.value, self.path, self.max_age)
    }
}

pub struct CookieJar {
    path: PathBuf,
}

impl CookieJar {
    pub fn new(session_dir: &Path) -> Self {
        Self {
            path: session_dir.join(COOKIE_FILE),
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.path
    }

    /// Look up a live cookie by name. Expired cookies read as `None`.
    pub fn get(&self, name: &str) -> Result<Option<Cookie>> {
        let cookies = self.load()?;
        Ok(cookies.get(name).filter(|c| !c.is_expired()).cloned())
    }

    /// Store a cookie, replacing any with the same name. A cookie that is
    /// already expired (e.g. `Max-Age=0`) deletes the existing entry instead.
    ///
    /// An unreadable jar is discarded and rewritten from scratch.
    pub fn set(&self, cookie: Cookie) -> Result<()> {
        let mut cookies = self.load().unwrap_or_else(|e| {
            warn!(error = ?e, path = ?self.path, "Discarding unreadable cookie jar");
            BTreeMap::new()
        });
        debug!(cookie = %cookie.name, max_age = cookie.max_age, "Setting cookie");
        if cookie.is_expired() {
            cookies.remove(&cookie.name);
        } else {
            cookies.insert(cookie.name.clone(), cookie);
        }
        self.save(cookies)
    }

    /// Expire a cookie immediately
    pub fn remove(&self, name: &str) -> Result<()> {
        self.set(Cookie::new(name, "", TOKEN_COOKIE_PATH, 0))
    }

    fn load(&self) -> Result<BTreeMap<String, Cookie>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = std::fs::read_to_string(&self.path)
            .context("Failed to read cookie jar")?;
        serde_json::from_str(&contents).context("Failed to parse cookie jar")
    }

    fn save(&self, mut cookies: BTreeMap<String, Cookie>) -> Result<()> {
        cookies.retain(|_, c| !c.is_expired());

        if cookies.is_empty() {
            if self.path.exists() {
                std::fs::remove_file(&self.path).context("Failed to remove cookie jar")?;
            }
            return Ok(());
        }

        // Write then rename so a crash never leaves a half-written jar
        let tmp_path = self.path.with_file_name(COOKIE_TMP_FILE);
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(&cookies)?;
        std::fs::write(&tmp_path, contents).context("Failed to write cookie jar")?;
        std::fs::rename(&tmp_path, &self.path).context("Failed to replace cookie jar")?;
        Ok(())
    }
}

/// The jar acts as a session store through the `token` cookie.
impl SessionStore for CookieJar {
    fn get(&self) -> Result<Option<String>> {
        Ok(CookieJar::get(self, TOKEN_COOKIE)?.map(|c| c.value))
    }

    fn set(&self, token: &str) -> Result<()> {
        CookieJar::set(self, Cookie::new(TOKEN_COOKIE, token, TOKEN_COOKIE_PATH, TOKEN_MAX_AGE_SECS))
    }

    fn clear(&self) -> Result<()> {
        self.remove(TOKEN_COOKIE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_display() {
        let cookie = Cookie::new("token", "abc123", "/", 3600);
        assert_eq!(cookie.to_string(), "token=abc123; Path=/; Max-Age=3600");
    }

    #[test]
    fn test_cookie_expiry() {
        assert!(!Cookie::new("token", "abc", "/", 3600).is_expired());
        assert!(Cookie::new("token", "abc", "/", 0).is_expired());

        let mut old = Cookie::new("token", "abc", "/", 3600);
        old.expires_at = Utc::now() - Duration::seconds(1);
        assert!(old.is_expired());
    }

    #[test]
    fn test_jar_missing_file_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let jar = CookieJar::new(dir.path());
        assert_eq!(jar.get(TOKEN_COOKIE).unwrap(), None);
    }

    #[test]
    fn test_jar_set_get_remove() {
        let dir = tempfile::tempdir().unwrap();
        let jar = CookieJar::new(dir.path());

        CookieJar::set(&jar, Cookie::new("token", "abc123", "/", 3600)).unwrap();
        CookieJar::set(&jar, Cookie::new("theme", "dark", "/", 3600)).unwrap();
        assert_eq!(jar.get("token").unwrap().map(|c| c.value), Some("abc123".to_string()));

        jar.remove("token").unwrap();
        assert_eq!(jar.get("token").unwrap(), None);
        assert_eq!(jar.get("theme").unwrap().map(|c| c.value), Some("dark".to_string()));
    }

    #[test]
    fn test_jar_max_age_zero_deletes() {
        let dir = tempfile::tempdir().unwrap();
        let jar = CookieJar::new(dir.path());

        CookieJar::set(&jar, Cookie::new("token", "abc123", "/", 3600)).unwrap();
        CookieJar::set(&jar, Cookie::new("token", "", "/", 0)).unwrap();
        assert_eq!(jar.get("token").unwrap(), None);
        assert!(!jar.file_path().exists());
    }

    #[test]
    fn test_jar_expired_cookie_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let jar = CookieJar::new(dir.path());

        let mut stale = BTreeMap::new();
        let mut cookie = Cookie::new("token", "abc123", "/", 3600);
        cookie.expires_at = Utc::now() - Duration::minutes(1);
        stale.insert("token".to_string(), cookie);
        std::fs::write(jar.file_path(), serde_json::to_string(&stale).unwrap()).unwrap();

        assert_eq!(jar.get("token").unwrap(), None);
    }

    #[test]
    fn test_corrupt_jar_is_replaced_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let jar = CookieJar::new(dir.path());
        std::fs::write(jar.file_path(), "{truncated").unwrap();
        assert!(jar.get(TOKEN_COOKIE).is_err());

        CookieJar::set(&jar, Cookie::new("token", "abc123", "/", 3600)).unwrap();
        assert_eq!(jar.get("token").unwrap().map(|c| c.value), Some("abc123".to_string()));
        assert!(!dir.path().join(COOKIE_TMP_FILE).exists());
    }

    #[test]
    fn test_corrupt_jar_can_be_cleared() {
        let dir = tempfile::tempdir().unwrap();
        let jar = CookieJar::new(dir.path());
        std::fs::write(jar.file_path(), "not json").unwrap();

        jar.remove(TOKEN_COOKIE).unwrap();
        assert!(!jar.file_path().exists());
        assert_eq!(jar.get(TOKEN_COOKIE).unwrap(), None);
    }

    #[test]
    fn test_jar_as_session_store() {
        let dir = tempfile::tempdir().unwrap();
        let jar = CookieJar::new(dir.path());
        let store: &dyn SessionStore = &jar;

        store.set("abc123").unwrap();
        assert_eq!(store.get().unwrap(), Some("abc123".to_string()));
        let cookie = jar.get(TOKEN_COOKIE).unwrap().unwrap();
        assert_eq!(cookie.path, "/");
        assert_eq!(cookie.max_age, TOKEN_MAX_AGE_SECS);

        store.clear().unwrap();
        assert_eq!(store.get().unwrap(), None);
    }
}
