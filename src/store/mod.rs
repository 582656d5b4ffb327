//! Backing stores for persisted cells.
//!
//! A backing store is a flat map from string keys to JSON values with an
//! explicit durable `save`. Writes land in memory first; nothing reaches
//! disk until `save` is called.
//!
//! Two implementations ship with the crate:
//! - [`MemoryStore`] keeps everything in process and only counts saves.
//! - [`FileStore`] mirrors a single JSON file on disk.
//!
//! Stores are shared as `Arc<dyn KeyValueStore>`:
//!
//! ```ignore
//! let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(".previous.dat").await?);
//! let state = AppState::open(store).await?;
//! ```

mod error;
mod file;
mod memory;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

pub use error::{StoreError, StoreResult};
pub use file::{FileStore, DEFAULT_FILE_NAME};
pub use memory::MemoryStore;

/// Keyed persistence shared by all persisted cells.
///
/// Implementations must be safe to share between tasks. `get` reports a
/// missing key as `Ok(None)`; errors are reserved for real failures.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    async fn get(&self, key: &str) -> StoreResult<Option<Value>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: Value) -> StoreResult<()>;

    /// Durably commit everything written so far.
    async fn save(&self) -> StoreResult<()>;

    async fn has(&self, key: &str) -> StoreResult<bool> {
        Ok(self.get(key).await?.is_some())
    }

    /// Remove `key`, returning whether it existed.
    async fn delete(&self, key: &str) -> StoreResult<bool>;

    /// All keys, sorted.
    async fn keys(&self) -> StoreResult<Vec<String>>;

    /// Remove every entry.
    async fn clear(&self) -> StoreResult<()>;

    async fn len(&self) -> StoreResult<usize> {
        Ok(self.keys().await?.len())
    }

    async fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len().await? == 0)
    }
}

/// Typed access on top of [`KeyValueStore`].
#[async_trait]
pub trait StoreExt: KeyValueStore {
    /// Read and deserialize `key`. A stored JSON `null` counts as absent.
    async fn get_json<T>(&self, key: &str) -> StoreResult<Option<T>>
    where
        T: DeserializeOwned + Send,
    {
        match self.get(key).await? {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|source| StoreError::Serialization {
                    key: key.to_string(),
                    source,
                }),
        }
    }

    /// Serialize `value` and store it under `key`.
    async fn set_json<T>(&self, key: &str, value: &T) -> StoreResult<()>
    where
        T: Serialize + Sync,
    {
        let value = serde_json::to_value(value).map_err(|source| StoreError::Serialization {
            key: key.to_string(),
            source,
        })?;
        self.set(key, value).await
    }
}

impl<S: KeyValueStore + ?Sized> StoreExt for S {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Window {
        width: u32,
        height: u32,
    }

    #[tokio::test]
    async fn json_helpers_roundtrip_structs() {
        let store = MemoryStore::new();
        store
            .set_json("window", &Window {
                width: 800,
                height: 600,
            })
            .await
            .unwrap();

        assert_eq!(
            store.get("window").await.unwrap(),
            Some(json!({ "width": 800, "height": 600 }))
        );
        let got: Option<Window> = store.get_json("window").await.unwrap();
        assert_eq!(
            got,
            Some(Window {
                width: 800,
                height: 600
            })
        );
    }

    #[tokio::test]
    async fn null_is_reported_as_absent() {
        let store = MemoryStore::new();
        store.set("input_text", Value::Null).await.unwrap();

        let got: Option<String> = store.get_json("input_text").await.unwrap();
        assert_eq!(got, None);
    }

    #[tokio::test]
    async fn wrong_type_is_a_serialization_error() {
        let store = MemoryStore::new();
        store.set("count", json!("not a number")).await.unwrap();

        let err = store.get_json::<u32>("count").await.unwrap_err();
        assert!(matches!(err, StoreError::Serialization { ref key, .. } if key == "count"));
    }

    #[tokio::test]
    async fn helpers_work_through_trait_objects() {
        let store: std::sync::Arc<dyn KeyValueStore> = std::sync::Arc::new(MemoryStore::new());
        store.set_json("output_format", &"Toml").await.unwrap();

        assert!(store.has("output_format").await.unwrap());
        assert_eq!(store.len().await.unwrap(), 1);
        assert!(!store.is_empty().await.unwrap());
        let got: Option<String> = store.get_json("output_format").await.unwrap();
        assert_eq!(got.as_deref(), Some("Toml"));
    }
}
