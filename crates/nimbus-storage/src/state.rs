//! Persisted state record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::settings::Settings;

pub const STATE_VERSION: &str = "1.0";

/// Maximum number of history entries kept, newest first
pub const HISTORY_LIMIT: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    /// Creation time in milliseconds, unique within the record
    pub id: i64,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub favicon: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub title: String,
    pub url: String,
    /// Visit time in milliseconds since the epoch
    pub timestamp: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadOutcome {
    Completed,
    Interrupted,
    Cancelled,
}

/// A finished download kept for display until the user dismisses it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadEntry {
    pub id: String,
    pub filename: String,
    pub outcome: DownloadOutcome,
    pub received_bytes: u64,
    pub total_bytes: u64,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    pub finished_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrowserState {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub bookmarks: Vec<Bookmark>,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub downloads: Vec<DownloadEntry>,
}

fn default_version() -> String {
    STATE_VERSION.to_string()
}

impl Default for BrowserState {
    fn default() -> Self {
        Self {
            version: default_version(),
            bookmarks: Vec::new(),
            history: Vec::new(),
            settings: Settings::default(),
            downloads: Vec::new(),
        }
    }
}

impl BrowserState {
    /// Insert a visit at the front, evicting the oldest beyond the cap
    pub fn push_history(&mut self, entry: HistoryEntry) {
        self.history.insert(0, entry);
        self.history.truncate(HISTORY_LIMIT);
    }

    /// Next free bookmark id at or after `candidate`
    pub fn next_bookmark_id(&self, candidate: i64) -> i64 {
        let mut id = candidate;
        while self.bookmarks.iter().any(|b| b.id == id) {
            id += 1;
        }
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(n: i64) -> HistoryEntry {
        HistoryEntry {
            title: format!("Page {n}"),
            url: format!("https://example.com/{n}"),
            timestamp: n,
        }
    }

    #[test]
    fn test_history_cap_evicts_oldest() {
        let mut state = BrowserState::default();
        for n in 0..=HISTORY_LIMIT as i64 {
            state.push_history(entry(n));
        }

        assert_eq!(state.history.len(), HISTORY_LIMIT);
        assert_eq!(state.history[0].timestamp, HISTORY_LIMIT as i64);
        // entry 0 was the oldest and is gone
        assert!(state.history.iter().all(|e| e.timestamp != 0));
        assert_eq!(state.history.last().map(|e| e.timestamp), Some(1));
    }

    #[test]
    fn test_partial_record_merges_onto_defaults() {
        let state: BrowserState =
            serde_json::from_str(r#"{ "history": [{"title":"a","url":"https://a.io","timestamp":1}] }"#)
                .unwrap();
        assert_eq!(state.version, STATE_VERSION);
        assert_eq!(state.history.len(), 1);
        assert!(state.bookmarks.is_empty());
        assert_eq!(state.settings, Settings::default());
    }

    #[test]
    fn test_next_bookmark_id_skips_taken() {
        let mut state = BrowserState::default();
        for id in [10, 11] {
            state.bookmarks.push(Bookmark {
                id,
                title: String::new(),
                url: String::new(),
                favicon: String::new(),
                created_at: Utc::now(),
            });
        }
        assert_eq!(state.next_bookmark_id(10), 12);
        assert_eq!(state.next_bookmark_id(5), 5);
    }
}
