use parking_lot::RwLock;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

use crate::constants::STORAGE_KEY_SERVER_URL;
use crate::storage::Storage;
use crate::utils::Result;

/// Process-wide holder of the backend base address.
///
/// The value is resolved once at startup: a persisted `serverUrl` override
/// wins over the configured default. Reads hand out an owned copy, so a
/// concurrent [`ConfigStore::set_base_address`] is observed either fully or
/// not at all.
pub struct ConfigStore {
    storage: Arc<dyn Storage>,
    base_address: RwLock<String>,
}

impl ConfigStore {
    /// Resolve the base address from storage, falling back to `default_base`
    pub fn load(storage: Arc<dyn Storage>, default_base: impl Into<String>) -> Self {
        let base_address = match saved_override(storage.as_ref()) {
            Some(saved) => {
                debug!("Using saved server address {}", saved);
                saved
            }
            None => default_base.into(),
        };

        Self {
            storage,
            base_address: RwLock::new(base_address),
        }
    }

    /// Current base address
    pub fn base_address(&self) -> String {
        self.base_address.read().clone()
    }

    /// Persist a new base address and make it visible to subsequent calls.
    /// The value is not validated; a malformed address surfaces as a
    /// transport failure on the next call.
    pub fn set_base_address(&self, url: impl Into<String>) -> Result<()> {
        let url = url.into();
        self.storage
            .set(STORAGE_KEY_SERVER_URL, Value::String(url.clone()))?;
        info!("Server address set to {}", url);
        *self.base_address.write() = url;
        Ok(())
    }

    /// Whether a saved override exists in storage
    pub fn has_override(&self) -> bool {
        saved_override(self.storage.as_ref()).is_some()
    }
}

/// A non-empty `serverUrl` value, if one was saved
fn saved_override(storage: &dyn Storage) -> Option<String> {
    storage
        .get_string(STORAGE_KEY_SERVER_URL)
        .filter(|saved| !saved.is_empty())
}
