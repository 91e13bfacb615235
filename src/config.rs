//! Application configuration constants.
//!
//! This module centralizes the tunables of the planner: scheduling bounds,
//! per-domain task counts, the calendar offset and the runtime settings
//! loaded from `config.toml` / `.env`.

use serde::Deserialize;
use std::path::PathBuf;

// ==================== Runtime Configuration ====================

/// Configuration file structure for config.toml
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    storage: Option<StorageConfig>,
    reminders: Option<ReminderPollConfig>,
}

#[derive(Debug, Deserialize)]
struct StorageConfig {
    data_dir: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReminderPollConfig {
    poll_seconds: Option<u64>,
}

/// Resolved runtime settings for the runner binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub reminder_poll_seconds: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            reminder_poll_seconds: REMINDER_POLL_SECONDS,
        }
    }
}

impl AppConfig {
    /// Load settings with priority: config.toml > .env / environment > default
    pub fn load() -> Self {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let file = std::fs::read_to_string("config.toml")
            .ok()
            .and_then(|contents| match toml::from_str::<FileConfig>(&contents) {
                Ok(config) => Some(config),
                Err(e) => {
                    tracing::warn!("Ignoring malformed config.toml: {}", e);
                    None
                }
            })
            .unwrap_or_default();

        Self::resolve(
            file,
            std::env::var("DATA_DIR").ok(),
            std::env::var("REMINDER_POLL_SECONDS").ok(),
        )
    }

    fn resolve(file: FileConfig, env_data_dir: Option<String>, env_poll: Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(dir) = file.storage.and_then(|s| s.data_dir) {
            tracing::info!("Using data directory from config.toml: {}", dir);
            config.data_dir = PathBuf::from(dir);
        } else if let Some(dir) = env_data_dir {
            tracing::info!("Using data directory from DATA_DIR env: {}", dir);
            config.data_dir = PathBuf::from(dir);
        } else {
            tracing::info!("Using default data directory: {}", DEFAULT_DATA_DIR);
        }

        let poll = file
            .reminders
            .and_then(|r| r.poll_seconds)
            .or_else(|| env_poll.and_then(|v| v.trim().parse().ok()));
        if let Some(seconds) = poll.filter(|s| *s > 0) {
            config.reminder_poll_seconds = seconds;
        }

        config
    }
}

/// Default base directory for the state file and exports
pub const DEFAULT_DATA_DIR: &str = "data";

/// Seconds between reminder clock ticks
pub const REMINDER_POLL_SECONDS: u64 = 30;

// ==================== Calendar ====================

/// All date keys are computed in a single fixed offset (UTC+08:00)
pub const CALENDAR_OFFSET_SECONDS: i32 = 8 * 3600;

// ==================== Persistence ====================

/// Version stamped into freshly created state files
pub const STATE_VERSION: i64 = 2;

/// State file name inside the data directory
pub const STATE_FILE_NAME: &str = "state.json";

/// Export subdirectory inside the data directory
pub const EXPORT_DIR_NAME: &str = "exports";

// ==================== SRS Configuration ====================

/// Lower bound for the ease factor
pub const MIN_EASE: f64 = 1.3;

/// Upper bound for the ease factor
pub const MAX_EASE: f64 = 3.5;

/// Ease assigned to new mistake records
pub const INITIAL_EASE: f64 = 2.5;

/// Interval assigned to new mistake records
pub const INITIAL_INTERVAL_DAYS: i64 = 1;

/// Longest review interval; keeps due dates well inside the calendar range
pub const MAX_INTERVAL_DAYS: i64 = 36_500;

/// Upper bound for a stored review counter
pub const MAX_REVIEW_COUNT: i64 = 1_000_000;

/// Default severity when none is given
pub const DEFAULT_SEVERITY: u8 = 3;

/// Horizon for the "due soon" count on the dashboard
pub const REVIEW_PRESSURE_DAYS: i64 = 7;

// ==================== Weakness Profile ====================

/// Trailing window (inclusive of today) for weakness aggregation
pub const WEAKNESS_WINDOW_DAYS: i64 = 7;

/// Number of topics / error types reported
pub const WEAKNESS_TOP_N: usize = 3;

/// Topic used when a mistake has none
pub const UNCATEGORIZED_TOPIC: &str = "uncategorized";

// ==================== Daily Task Counts ====================

/// Problems drawn per day from a luogu problem list
pub const LUOGU_TASK_COUNT: usize = 5;

/// Problems drawn per day for a lanqiao topic plan
pub const LANQIAO_TOPIC_TASK_COUNT: usize = 3;

/// Problems drawn per day for a lanqiao daily plan
pub const LANQIAO_DAILY_TASK_COUNT: usize = 2;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_defaults() {
        let config = AppConfig::resolve(FileConfig::default(), None, None);
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_resolve_env_overrides_default() {
        let config = AppConfig::resolve(
            FileConfig::default(),
            Some("/tmp/prep".to_string()),
            Some("10".to_string()),
        );
        assert_eq!(config.data_dir, PathBuf::from("/tmp/prep"));
        assert_eq!(config.reminder_poll_seconds, 10);
    }

    #[test]
    fn test_resolve_file_beats_env() {
        let file: FileConfig = toml::from_str(
            r#"
            [storage]
            data_dir = "from-file"

            [reminders]
            poll_seconds = 5
            "#,
        )
        .unwrap();
        let config = AppConfig::resolve(file, Some("from-env".to_string()), Some("99".to_string()));
        assert_eq!(config.data_dir, PathBuf::from("from-file"));
        assert_eq!(config.reminder_poll_seconds, 5);
    }

    #[test]
    fn test_resolve_rejects_zero_poll() {
        let config = AppConfig::resolve(FileConfig::default(), None, Some("0".to_string()));
        assert_eq!(config.reminder_poll_seconds, REMINDER_POLL_SECONDS);
    }

    #[test]
    fn test_ease_bounds_are_ordered() {
        assert!(MIN_EASE < INITIAL_EASE && INITIAL_EASE < MAX_EASE);
        assert!(INITIAL_INTERVAL_DAYS < MAX_INTERVAL_DAYS);
    }
}
