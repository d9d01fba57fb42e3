use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

use crate::constants::{STORAGE_KEY_COOKIE, STORAGE_KEY_USER_INFO};
use crate::storage::Storage;
use crate::utils::Result;

/// Session state that persists between runs: the session cookie captured
/// from the backend and the profile returned by the last successful login.
///
/// There is no expiry logic; a cookie is kept until the backend replaces it
/// or [`SessionStore::clear`] is called. Writes are last-write-wins.
pub struct SessionStore {
    storage: Arc<dyn Storage>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Get the stored session cookie
    pub fn cookie(&self) -> Option<String> {
        self.storage
            .get_string(STORAGE_KEY_COOKIE)
            .filter(|cookie| !cookie.is_empty())
    }

    /// Replace the stored session cookie
    pub fn set_cookie(&self, cookie: impl Into<String>) -> Result<()> {
        debug!("Storing session cookie");
        self.storage
            .set(STORAGE_KEY_COOKIE, Value::String(cookie.into()))
    }

    /// Get the cached user profile
    pub fn profile(&self) -> Option<Value> {
        self.storage
            .get(STORAGE_KEY_USER_INFO)
            .filter(|profile| !is_empty_profile(profile))
    }

    /// Replace the cached user profile
    pub fn set_profile(&self, profile: Value) -> Result<()> {
        self.storage.set(STORAGE_KEY_USER_INFO, profile)
    }

    /// Whether a previous login left a profile behind
    pub fn is_logged_in(&self) -> bool {
        self.profile().is_some()
    }

    /// Drop the cookie, the profile and every other persisted client value
    pub fn clear(&self) -> Result<()> {
        self.storage.clear()?;
        info!("Session cleared");
        Ok(())
    }
}

/// Values the mobile client treats as "no profile"
fn is_empty_profile(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}
