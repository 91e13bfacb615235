//! Persistence for the planner state and exported Markdown.
//!
//! Loading never fails: a missing or corrupt state file yields defaults, and
//! anything readable is passed through [`normalize::normalize_state`]. Writes
//! return [`StoreError`] so callers can report a non-fatal status.

pub mod export;
pub mod file;
pub mod normalize;

pub use export::{sanitize_markdown_file_name, DirExportSink, ExportSink};
pub use file::{JsonFileStore, StateStore};
pub use normalize::normalize_state;

/// Best-effort results: failures are logged and dropped
pub trait LogOnError<T> {
    /// Log a failure at warn level, prefixed with `context`, and return None
    fn log_warn(self, context: &str) -> Option<T>;
}

impl<T, E: std::fmt::Display> LogOnError<T> for Result<T, E> {
    fn log_warn(self, context: &str) -> Option<T> {
        self.map_err(|e| tracing::warn!("{}: {}", context, e)).ok()
    }
}

/// Storage errors.
#[derive(Debug)]
pub enum StoreError {
    /// Path and underlying message
    Io(String, String),
    Serialize(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(path, err) => write!(f, "IO error at {}: {}", path, err),
            StoreError::Serialize(err) => write!(f, "Failed to serialize state: {}", err),
        }
    }
}

impl StoreError {
    /// Returns a user-facing error message without exposing filesystem paths.
    pub fn user_message(&self) -> &'static str {
        match self {
            StoreError::Io(_, _) => "Failed to write to the data directory",
            StoreError::Serialize(_) => "Failed to serialize state",
        }
    }

    pub(crate) fn io(path: &std::path::Path, err: std::io::Error) -> Self {
        StoreError::Io(path.display().to_string(), err.to_string())
    }
}

impl std::error::Error for StoreError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_hides_path() {
        let err = StoreError::Io("/secret/dir/state.json".into(), "denied".into());
        assert!(err.to_string().contains("/secret/dir"));
        assert!(!err.user_message().contains("/secret"));
    }

    #[test]
    fn test_log_warn() {
        let ok: Result<i32, StoreError> = Ok(3);
        assert_eq!(ok.log_warn("ctx"), Some(3));

        let err: Result<i32, StoreError> = Err(StoreError::Serialize("bad".into()));
        assert_eq!(err.log_warn("ctx"), None);
    }
}
