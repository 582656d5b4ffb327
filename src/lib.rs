//! # Shared State
//!
//! Observable state cells for a desktop format-converter UI, persisted to a
//! local key-value store across restarts.
//!
//! ## Cells
//!
//! - `Writable<T>` - An observable value; subscribers see every change
//!   synchronously, in order
//! - `PersistedCell<T>` - A `Writable` bound to a store key, restored on
//!   startup and written back only on `sync`
//!
//! ## Stores
//!
//! - `KeyValueStore` - Async key/value persistence with an explicit `save`
//! - `FileStore` - One JSON file on disk
//! - `MemoryStore` - In-process, for tests and previews
//!
//! ## Application state
//!
//! `AppState` owns the converter's cells (input text, input format, output
//! format, output text) and flushes the persisted ones with `AppState::sync`.
//! `AppState::convert` turns the input into the output format and publishes
//! it on the output text cell.
//!
//! ```ignore
//! let store: Arc<dyn KeyValueStore> = Arc::new(StateConfig::detect().open_store().await?);
//! let state = AppState::open(store).await?;
//!
//! let _guard = state.output_text().subscribe(|text| println!("{text}"));
//! state.input_format().set(Format::Yaml.to_string());
//! state.convert()?;
//!
//! state.sync().await?;
//! ```

pub mod cell;
pub mod config;
pub mod convert;
pub mod format;
pub mod state;
pub mod store;
pub mod writable;

// Re-export main types for convenience
pub use cell::{create_shared_state, CellDef, PersistedCell};
pub use config::StateConfig;
pub use convert::{convert, ConvertError};
pub use format::{Format, ParseFormatError};
pub use state::{AppState, Slot};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError, StoreExt, StoreResult};
pub use writable::{Subscription, Writable};
