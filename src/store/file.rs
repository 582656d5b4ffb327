//! JSON file-backed store.

use super::{KeyValueStore, StoreError, StoreResult};
use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name used for the persisted application state.
pub const DEFAULT_FILE_NAME: &str = ".previous.dat";

/// Backing store mirrored to a single JSON file.
///
/// The whole file is loaded on [`FileStore::open`]. Reads and writes only
/// touch the in-memory copy; [`KeyValueStore::save`] writes the complete map
/// back to disk.
///
/// # File Format
///
/// ```json
/// {
///   "input_format": "Json",
///   "input_text": "{ \"cool_app\": true }",
///   "output_format": "Toml"
/// }
/// ```
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, Value>>,
}

impl FileStore {
    /// Open the store at `path`, loading the file if it exists.
    ///
    /// A missing file yields an empty store; it is created on the first
    /// `save`. A file that is not a JSON object is an error.
    pub async fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let entries = Self::load(&path).await?;
        debug!(
            "Opened store {} with {} entries",
            path.display(),
            entries.len()
        );
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the file, discarding anything not yet saved.
    pub async fn reload(&self) -> StoreResult<()> {
        let entries = Self::load(&self.path).await?;
        *self.entries.write() = entries;
        debug!("Reloaded store {}", self.path.display());
        Ok(())
    }

    async fn load(path: &Path) -> StoreResult<BTreeMap<String, Value>> {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Store file {} does not exist yet", path.display());
                return Ok(BTreeMap::new());
            }
            Err(e) => return Err(StoreError::io(path, e)),
        };

        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        let map: Map<String, Value> =
            serde_json::from_str(&content).map_err(|source| StoreError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(map.into_iter().collect())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        Ok(self.entries.read().get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> StoreResult<()> {
        debug!("Store set '{key}'");
        self.entries.write().insert(key.to_string(), value);
        Ok(())
    }

    async fn save(&self) -> StoreResult<()> {
        let snapshot = self.entries.read().clone();
        let json = serde_json::to_string_pretty(&snapshot).map_err(|source| {
            StoreError::Serialization {
                key: String::new(),
                source,
            }
        })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::io(parent, e))?;
        }

        // Write a sibling file, then rename it over the target.
        let temp = self.temp_path();
        tokio::fs::write(&temp, json)
            .await
            .map_err(|e| StoreError::io(&temp, e))?;
        if let Err(e) = tokio::fs::rename(&temp, &self.path).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(StoreError::io(&self.path, e));
        }

        debug!(
            "Saved {} entries to {}",
            snapshot.len(),
            self.path.display()
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> StoreResult<bool> {
        Ok(self.entries.write().remove(key).is_some())
    }

    async fn keys(&self) -> StoreResult<Vec<String>> {
        Ok(self.entries.read().keys().cloned().collect())
    }

    async fn clear(&self) -> StoreResult<()> {
        self.entries.write().clear();
        Ok(())
    }

    async fn len(&self) -> StoreResult<usize> {
        Ok(self.entries.read().len())
    }
}
