use std::fs;
use std::path::{Path, PathBuf};

use super::normalize::normalize_state;
use super::StoreError;
use crate::domain::PersistedState;
use crate::paths;

/// Backing store for the whole planner state
pub trait StateStore {
    /// Returns None when there is nothing usable to load
    fn load(&self) -> Option<PersistedState>;

    fn save(&self, state: &PersistedState) -> Result<(), StoreError>;

    fn load_or_default(&self) -> PersistedState {
        self.load().unwrap_or_default()
    }
}

/// State kept in a single pretty-printed JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the standard location inside `data_dir`
    pub fn in_data_dir(data_dir: &Path) -> Self {
        Self::new(paths::state_path(data_dir))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for JsonFileStore {
    fn load(&self) -> Option<PersistedState> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No state file at {}, using defaults", self.path.display());
                return None;
            }
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", self.path.display(), e);
                return None;
            }
        };

        match serde_json::from_str::<serde_json::Value>(&content) {
            Ok(value) => Some(normalize_state(&value)),
            Err(e) => {
                tracing::warn!("Corrupt state file {}: {}", self.path.display(), e);
                None
            }
        }
    }

    fn save(&self, state: &PersistedState) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }
        let json =
            serde_json::to_string_pretty(state).map_err(|e| StoreError::Serialize(e.to_string()))?;
        fs::write(&self.path, json).map_err(|e| StoreError::io(&self.path, e))?;

        tracing::debug!(
            "Saved state ({} mistakes) to {}",
            state.meta.mistakes.len(),
            self.path.display()
        );
        Ok(())
    }
}
