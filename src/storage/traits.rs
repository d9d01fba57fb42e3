use serde_json::Value;

use crate::utils::Result;

/// Persisted key/value store shared by every component of the client.
///
/// Reads are synchronous and infallible: implementations load their contents
/// up front and serve lookups from memory. Each mutation replaces a single
/// value and is persisted before the call returns.
#[cfg_attr(test, mockall::automock)]
pub trait Storage: Send + Sync {
    /// Get the value stored under `key`
    fn get(&self, key: &str) -> Option<Value>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: Value) -> Result<()>;

    /// Remove `key`; removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<()>;

    /// Remove every key in one operation
    fn clear(&self) -> Result<()>;

    /// Convenience accessor for string values
    fn get_string(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}
