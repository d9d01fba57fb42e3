use chrono::Utc;
use serde_json::Value;

use super::traits::Storage;
use crate::constants::STORAGE_KEY_LOGS;
use crate::utils::Result;

/// Prepend the current launch time (epoch millis) to the `logs` list
pub fn record_launch(storage: &dyn Storage) -> Result<()> {
    let mut logs = match storage.get(STORAGE_KEY_LOGS) {
        Some(Value::Array(entries)) => entries,
        _ => Vec::new(),
    };
    logs.insert(0, Value::from(Utc::now().timestamp_millis()));
    storage.set(STORAGE_KEY_LOGS, Value::Array(logs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use serde_json::json;

    #[test]
    fn test_launches_are_prepended() {
        let storage = MemoryStorage::new();
        storage.set(STORAGE_KEY_LOGS, json!([1])).unwrap();

        record_launch(&storage).unwrap();

        let logs = storage.get(STORAGE_KEY_LOGS).unwrap();
        let logs = logs.as_array().unwrap();
        assert_eq!(logs.len(), 2);
        assert!(logs[0].as_i64().unwrap() > 1);
        assert_eq!(logs[1], json!(1));
    }

    #[test]
    fn test_garbage_logs_value_is_replaced() {
        let storage = MemoryStorage::new();
        storage.set(STORAGE_KEY_LOGS, json!("oops")).unwrap();

        record_launch(&storage).unwrap();

        assert_eq!(storage.get(STORAGE_KEY_LOGS).unwrap().as_array().unwrap().len(), 1);
    }
}
