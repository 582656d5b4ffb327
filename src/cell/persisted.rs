use crate::store::{KeyValueStore, StoreExt, StoreResult};
use crate::writable::{Subscription, Writable};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Descriptor for a persisted cell: its store key and default value.
#[derive(Clone, Debug)]
pub struct CellDef<T> {
    key: String,
    default: T,
}

impl<T> CellDef<T>
where
    T: Clone + Send + Sync + Serialize + DeserializeOwned + 'static,
{
    pub fn new(key: impl Into<String>, default: T) -> Self {
        Self {
            key: key.into(),
            default,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Resolve the starting value from `store` and build the cell.
    ///
    /// Reads the key, falls back to the default if it is absent (or holds
    /// JSON `null`), and writes the resolved value straight back so the
    /// store holds the key from here on. A stored value that does not
    /// deserialize into `T` is an error.
    pub async fn init(self, store: Arc<dyn KeyValueStore>) -> StoreResult<PersistedCell<T>> {
        let resolved = match store.get_json::<T>(&self.key).await? {
            Some(stored) => {
                debug!("Restored '{}' from store", self.key);
                stored
            }
            None => {
                warn!("No stored value for '{}', seeding default", self.key);
                self.default.clone()
            }
        };

        store.set_json(&self.key, &resolved).await?;

        Ok(PersistedCell {
            key: self.key,
            default: self.default,
            value: Writable::new(resolved),
            store,
        })
    }
}

/// Create a cell bound to `key` in `store`, starting from the stored value
/// or `default`.
pub async fn create_shared_state<T>(
    default: T,
    key: impl Into<String>,
    store: Arc<dyn KeyValueStore>,
) -> StoreResult<PersistedCell<T>>
where
    T: Clone + Send + Sync + Serialize + DeserializeOwned + 'static,
{
    CellDef::new(key, default).init(store).await
}

/// An observable value mirrored to one key of a backing store.
///
/// `set`, `update` and `reset` only change memory. The value reaches the
/// store on [`PersistedCell::sync`], and disk only when the store itself is
/// saved; edits made after the last sync are lost if the process dies.
pub struct PersistedCell<T> {
    key: String,
    default: T,
    value: Writable<T>,
    store: Arc<dyn KeyValueStore>,
}

impl<T> PersistedCell<T>
where
    T: Clone + Send + Sync + Serialize + DeserializeOwned + 'static,
{
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn default_value(&self) -> &T {
        &self.default
    }

    pub fn get(&self) -> T {
        self.value.get()
    }

    /// The observable value, for binding to UI widgets.
    pub fn writable(&self) -> &Writable<T> {
        &self.value
    }

    /// See [`Writable::subscribe`].
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.value.subscribe(callback)
    }

    pub fn set(&self, new_value: T) {
        self.value.set(new_value);
    }

    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
    {
        self.value.update(f);
    }

    /// Restore the default value. No storage I/O.
    pub fn reset(&self) {
        self.value.set(self.default.clone());
    }

    /// Push the current value into the store under this cell's key.
    ///
    /// Does not call the store's `save`.
    pub async fn sync(&self) -> StoreResult<()> {
        let current = self.value.get();
        self.store.set_json(&self.key, &current).await?;
        debug!("Synced '{}'", self.key);
        Ok(())
    }
}

impl<T: fmt::Debug> fmt::Debug for PersistedCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistedCell")
            .field("key", &self.key)
            .field("default", &self.default)
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}
