use directories::ProjectDirs;
use parking_lot::RwLock;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::traits::Storage;
use crate::constants::STORAGE_FILE_NAME;
use crate::utils::{DormError, Result};

/// Storage backed by a single JSON object file
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: RwLock<Map<String, Value>>,
}

impl FileStorage {
    /// Open (or lazily create) the storage file at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let entries = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| storage_error(&path, e))?;
            if content.trim().is_empty() {
                Map::new()
            } else {
                serde_json::from_str::<Map<String, Value>>(&content).map_err(|e| {
                    DormError::Storage(format!("corrupt storage file {}: {}", path.display(), e))
                })?
            }
        } else {
            Map::new()
        };

        debug!("Opened storage at {} ({} keys)", path.display(), entries.len());

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// Get the default storage location
    /// (~/.local/share/dormlink on Linux, ~/Library/Application Support/dormlink on macOS)
    pub fn default_path() -> Result<PathBuf> {
        if let Some(proj_dirs) = ProjectDirs::from("", "", "dormlink") {
            Ok(proj_dirs.data_dir().join(STORAGE_FILE_NAME))
        } else {
            // Fallback to ~/.local/share/dormlink
            let home = std::env::var("HOME")
                .or_else(|_| std::env::var("USERPROFILE"))
                .map_err(|_| DormError::Storage("could not determine home directory".into()))?;
            Ok(PathBuf::from(home)
                .join(".local")
                .join("share")
                .join("dormlink")
                .join(STORAGE_FILE_NAME))
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the whole map through a temp file so readers never see a torn file
    fn flush(&self, entries: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| storage_error(parent, e))?;
        }

        let tmp = self.path.with_extension("json.tmp");
        let json = serde_json::to_vec_pretty(entries)?;
        fs::write(&tmp, json).map_err(|e| storage_error(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| storage_error(&self.path, e))?;
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        let mut entries = self.entries.write();
        let mut updated = entries.clone();
        updated.insert(key.to_string(), value);
        self.flush(&updated)?;
        *entries = updated;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.write();
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut updated = entries.clone();
        updated.remove(key);
        self.flush(&updated)?;
        *entries = updated;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut entries = self.entries.write();
        self.flush(&Map::new())?;
        entries.clear();
        Ok(())
    }
}

fn storage_error(path: &Path, err: std::io::Error) -> DormError {
    DormError::Storage(format!("{}: {}", path.display(), err))
}
