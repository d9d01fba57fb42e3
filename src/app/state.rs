use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::config::Config;
use super::config_store::ConfigStore;
use crate::api::{ApiClient, DormService};
use crate::session::{LoginGuard, Navigator, SessionStore};
use crate::storage::{record_launch, FileStorage, Storage};
use crate::utils::Result;

/// Global application state, wired once at startup
pub struct AppState {
    /// Loaded configuration
    pub config: Config,
    /// Persisted device storage
    pub storage: Arc<dyn Storage>,
    /// Backend base address
    pub config_store: Arc<ConfigStore>,
    /// Session cookie and profile
    pub session: Arc<SessionStore>,
    /// Typed backend calls
    pub service: DormService,
}

impl AppState {
    /// Open the configured storage file and wire every component
    pub fn bootstrap(config: Config) -> Result<Self> {
        let path = match &config.storage.path {
            Some(path) => path.clone(),
            None => FileStorage::default_path()?,
        };
        let storage = Arc::new(FileStorage::open(&path)?);
        debug!("Using storage file {}", storage.path().display());
        Self::with_storage(config, storage)
    }

    /// Wire every component on top of an existing storage
    pub fn with_storage(config: Config, storage: Arc<dyn Storage>) -> Result<Self> {
        if let Err(e) = record_launch(storage.as_ref()) {
            warn!("Failed to record launch: {}", e);
        }

        let config_store = Arc::new(ConfigStore::load(
            Arc::clone(&storage),
            config.server.base_url.clone(),
        ));
        let session = Arc::new(SessionStore::new(Arc::clone(&storage)));
        let client = ApiClient::with_timeout(
            Arc::clone(&config_store),
            Arc::clone(&session),
            config.server.timeout_secs.map(Duration::from_secs),
        )?;

        Ok(Self {
            config,
            storage,
            config_store,
            session,
            service: DormService::new(client),
        })
    }

    /// Login guard for protected commands
    pub fn guard<N: Navigator>(&self, navigator: N) -> LoginGuard<N> {
        LoginGuard::new(Arc::clone(&self.session), navigator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::config::StorageConfig;
    use crate::constants::{STORAGE_KEY_LOGS, STORAGE_KEY_SERVER_URL};
    use crate::storage::MemoryStorage;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_bootstrap_records_launch_and_uses_saved_server() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("storage.json");
        {
            let storage = FileStorage::open(&path).unwrap();
            storage
                .set(STORAGE_KEY_SERVER_URL, json!("http://10.1.1.1:5000/api"))
                .unwrap();
        }

        let config = Config {
            storage: StorageConfig {
                path: Some(path.clone()),
            },
            ..Config::default()
        };
        let state = AppState::bootstrap(config.clone()).unwrap();
        assert_eq!(state.config_store.base_address(), "http://10.1.1.1:5000/api");
        assert_eq!(
            state.service.client().url_for("/buildings"),
            "http://10.1.1.1:5000/api/buildings"
        );

        AppState::bootstrap(config).unwrap();
        let logs = FileStorage::open(&path).unwrap().get(STORAGE_KEY_LOGS).unwrap();
        assert_eq!(logs.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_configured_default_without_override() {
        let mut config = Config::default();
        config.server.base_url = "http://campus.example/api/".to_string();

        let state = AppState::with_storage(config, Arc::new(MemoryStorage::new())).unwrap();
        assert_eq!(
            state.service.client().url_for("repairs"),
            "http://campus.example/api/repairs"
        );
        assert!(!state.session.is_logged_in());
    }
}
