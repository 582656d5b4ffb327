//! Location of the persisted-state file.
//!
//! Resolution order:
//! 1. `SHARED_STATE_FILE` environment variable, if set and non-empty.
//! 2. `<data dir>/shared-state/.previous.dat` (`~/.local/share` on Linux,
//!    `%APPDATA%` on Windows, `~/Library/Application Support` on macOS).
//! 3. `./.previous.dat` when the platform reports no data directory.

use crate::store::{FileStore, StoreResult, DEFAULT_FILE_NAME};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory name used under the platform data directory.
const APP_DIR_NAME: &str = "shared-state";

/// Environment variable overriding the state file location.
pub const STATE_FILE_ENV: &str = "SHARED_STATE_FILE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateConfig {
    pub state_file: PathBuf,
}

impl StateConfig {
    /// Resolve the state file from the environment and platform directories.
    pub fn detect() -> Self {
        let from_env = std::env::var_os(STATE_FILE_ENV).map(PathBuf::from);
        let config = Self::resolve(from_env, dirs::data_dir());
        debug!("State file: {}", config.state_file.display());
        config
    }

    fn resolve(from_env: Option<PathBuf>, data_dir: Option<PathBuf>) -> Self {
        let state_file = match from_env.filter(|p| !p.as_os_str().is_empty()) {
            Some(path) => path,
            None => data_dir
                .map(|dir| dir.join(APP_DIR_NAME).join(DEFAULT_FILE_NAME))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_FILE_NAME)),
        };
        Self { state_file }
    }

    pub fn with_state_file(path: impl Into<PathBuf>) -> Self {
        Self {
            state_file: path.into(),
        }
    }

    pub fn state_file(&self) -> &Path {
        &self.state_file
    }

    /// Open the file store at the configured location.
    pub async fn open_store(&self) -> StoreResult<FileStore> {
        FileStore::open(&self.state_file).await
    }
}

impl Default for StateConfig {
    fn default() -> Self {
        Self::detect()
    }
}
