//! The converter's shared application state.
//!
//! Three slots are persisted (see [`Slot`]); the converted output is kept in
//! memory only. [`AppState::sync`] is the single durable checkpoint: it
//! flushes every persisted slot into the store, then saves the store once.

mod slot;

pub use slot::{
    ParseSlotError, Slot, SlotDef, DEFAULT_INPUT_FORMAT, DEFAULT_INPUT_TEXT,
    DEFAULT_OUTPUT_FORMAT,
};

use crate::cell::{CellDef, PersistedCell};
use crate::convert::{self, ConvertError};
use crate::format::{Format, ParseFormatError};
use crate::store::{KeyValueStore, StoreResult};
use crate::writable::Writable;
use std::sync::Arc;
use tracing::{debug, info};

/// All cells the UI binds to, sharing one backing store.
///
/// Every persisted slot holds a string as the UI wrote it. Format slots are
/// parsed only when a [`Format`] is needed, so a stored `"json"` or `"yml"`
/// opens and resets like any other value.
pub struct AppState {
    store: Arc<dyn KeyValueStore>,
    // Indexed by `Slot`, in `Slot::ALL` order.
    cells: Vec<PersistedCell<String>>,
    output_text: Writable<String>,
}

impl AppState {
    /// Restore every persisted slot from `store`, one after another in
    /// [`Slot::ALL`] order.
    ///
    /// Each slot ends up written back into the store. Nothing is saved.
    pub async fn open(store: Arc<dyn KeyValueStore>) -> StoreResult<Self> {
        let mut cells = Vec::with_capacity(Slot::ALL.len());
        for slot in Slot::ALL {
            let SlotDef { key, default } = slot.def();
            let cell = CellDef::new(key, default.to_string())
                .init(Arc::clone(&store))
                .await?;
            cells.push(cell);
        }

        let state = Self {
            store,
            cells,
            output_text: Writable::new(String::new()),
        };
        info!(
            "State opened: {} -> {}, {} bytes of input",
            state.input_format().get(),
            state.output_format().get(),
            state.input_text().writable().with(String::len)
        );
        Ok(state)
    }

    /// The persisted cell behind `slot`.
    pub fn cell(&self, slot: Slot) -> &PersistedCell<String> {
        &self.cells[slot.index()]
    }

    pub fn input_text(&self) -> &PersistedCell<String> {
        self.cell(Slot::InputText)
    }

    pub fn input_format(&self) -> &PersistedCell<String> {
        self.cell(Slot::InputFormat)
    }

    pub fn output_format(&self) -> &PersistedCell<String> {
        self.cell(Slot::OutputFormat)
    }

    /// Converted output. Never persisted.
    pub fn output_text(&self) -> &Writable<String> {
        &self.output_text
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// The input and output formats, parsed leniently (`"json"`, `"YML"`...).
    pub fn formats(&self) -> Result<(Format, Format), ParseFormatError> {
        let input = self.input_format().get().parse::<Format>()?;
        let output = self.output_format().get().parse::<Format>()?;
        Ok((input, output))
    }

    /// Convert the input text into the output format and publish the result
    /// on [`AppState::output_text`].
    ///
    /// On failure `output_text` keeps its previous value. No storage I/O.
    pub fn convert(&self) -> Result<String, ConvertError> {
        let (from, to) = self.formats()?;
        let output = self
            .input_text()
            .writable()
            .with(|input| convert::convert(input, from, to))?;
        self.output_text.set(output.clone());
        debug!("Converted {from} -> {to}, {} bytes", output.len());
        Ok(output)
    }

    /// Flush every persisted slot into the store in [`Slot::ALL`] order,
    /// then save the store once.
    ///
    /// The first failing slot aborts the flush and the store is not saved.
    /// In-memory values are left as they are either way.
    pub async fn sync(&self) -> StoreResult<()> {
        for cell in &self.cells {
            cell.sync().await?;
        }
        self.store.save().await?;
        info!("State synced");
        Ok(())
    }

    /// Reset every slot to its default, including the output text. No I/O.
    pub fn reset_all(&self) {
        for cell in &self.cells {
            cell.reset();
        }
        self.output_text.set(String::new());
        debug!("All slots reset to defaults");
    }

    /// Final checkpoint before the application window closes.
    pub async fn close(self) -> StoreResult<()> {
        self.sync().await?;
        debug!("State closed");
        Ok(())
    }
}
