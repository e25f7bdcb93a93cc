//! Browser configuration
//!
//! Only process-level paths and constants live here. User options are part
//! of the persisted state record.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Overrides the platform data directory
pub const DATA_DIR_ENV: &str = "NIMBUS_DATA_DIR";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the database
    pub data_dir: PathBuf,
    /// Path to the database file
    pub database_path: PathBuf,
    /// Default download directory
    pub download_dir: PathBuf,
    /// Seconds between memory scheduler cycles
    pub scheduler_interval_secs: u64,
    /// Page loaded into suspended tabs
    pub suspended_page_url: String,
    /// Start page when no homepage is configured
    pub default_url: String,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        let download_dir = dirs::download_dir().unwrap_or_else(|| data_dir.join("Downloads"));

        Self {
            database_path: data_dir.join("nimbus.db"),
            data_dir,
            download_dir,
            scheduler_interval_secs: 60,
            suspended_page_url: "about:blank#suspended".to_string(),
            default_url: "https://www.google.com".to_string(),
        }
    }

    pub fn data_dir() -> PathBuf {
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|d| !d.is_empty()) {
            return PathBuf::from(dir);
        }

        dirs::data_local_dir()
            .map(|d| d.join("Nimbus"))
            .unwrap_or_else(|| PathBuf::from(".nimbus"))
    }

    pub fn scheduler_interval(&self) -> Duration {
        Duration::from_secs(self.scheduler_interval_secs.max(1))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}

mod dirs {
    use std::path::PathBuf;

    fn home() -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        let var = "USERPROFILE";
        #[cfg(not(target_os = "windows"))]
        let var = "HOME";

        std::env::var_os(var).map(PathBuf::from)
    }

    pub fn data_local_dir() -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        {
            std::env::var_os("LOCALAPPDATA").map(PathBuf::from)
        }
        #[cfg(target_os = "macos")]
        {
            home().map(|h| h.join("Library/Application Support"))
        }
        #[cfg(target_os = "linux")]
        {
            std::env::var_os("XDG_DATA_HOME")
                .map(PathBuf::from)
                .or_else(|| home().map(|h| h.join(".local/share")))
        }
        #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
        {
            None
        }
    }

    pub fn download_dir() -> Option<PathBuf> {
        #[cfg(target_os = "linux")]
        if let Some(dir) = std::env::var_os("XDG_DOWNLOAD_DIR") {
            return Some(PathBuf::from(dir));
        }

        home().map(|h| h.join("Downloads"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_follow_data_dir() {
        let config = Config::new(PathBuf::from("/var/lib/nimbus"));
        assert_eq!(config.database_path, PathBuf::from("/var/lib/nimbus/nimbus.db"));
        assert_eq!(config.scheduler_interval(), Duration::from_secs(60));
        assert_eq!(config.suspended_page_url, "about:blank#suspended");
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let config = Config {
            scheduler_interval_secs: 0,
            ..Config::new(PathBuf::from("/tmp"))
        };
        assert_eq!(config.scheduler_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = Config::new(PathBuf::from("/tmp/nimbus"));
        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
