//! Project path functions - single source of truth for all file paths.
//!
//! Every path is derived from the configured data directory:
//!
//! ```text
//! {data_dir}/
//! ├── state.json   # persisted planner state
//! └── exports/     # rendered Markdown written by the export sink
//! ```

use std::path::{Path, PathBuf};

use crate::config::{EXPORT_DIR_NAME, STATE_FILE_NAME};

/// Persisted state file path
pub fn state_path(data_dir: &Path) -> PathBuf {
    data_dir.join(STATE_FILE_NAME)
}

/// Directory that receives exported Markdown files
pub fn export_dir(data_dir: &Path) -> PathBuf {
    data_dir.join(EXPORT_DIR_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_path_format() {
        let path = state_path(Path::new("data"));
        assert!(path.ends_with("state.json"));
        assert!(path.starts_with("data"));
    }

    #[test]
    fn test_export_dir_format() {
        let path = export_dir(Path::new("/home/me/prep"));
        assert_eq!(path, PathBuf::from("/home/me/prep/exports"));
    }
}
