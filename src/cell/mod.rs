//! Observable cells bound to a key in a backing store.
//!
//! Construction happens in two phases. A [`CellDef`] names the key and
//! default synchronously; [`CellDef::init`] then resolves the starting
//! value from the store:
//!
//! ```ignore
//! let input_format = CellDef::new("input_format", "Json".to_string())
//!     .init(store.clone())
//!     .await?;
//! input_format.set("Yaml".to_string()); // memory only
//! input_format.sync().await?;           // pushed to the store, not yet saved
//! ```

mod persisted;

pub use persisted::{create_shared_state, CellDef, PersistedCell};
