//! History recording

use nimbus_storage::{HistoryEntry, StateStore};
use nimbus_tabs::Clock;
use std::sync::Arc;

use crate::Result;

/// Pages that are never written to history
#[derive(Debug, Clone)]
pub struct HistoryExclusions {
    pub default_url: String,
    pub placeholder_url: String,
}

#[derive(Clone)]
pub struct HistoryManager {
    store: StateStore,
    exclusions: HistoryExclusions,
    clock: Arc<dyn Clock>,
}

impl HistoryManager {
    pub fn new(store: StateStore, exclusions: HistoryExclusions, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            exclusions,
            clock,
        }
    }

    fn is_excluded(&self, url: &str) -> bool {
        url.is_empty()
            || url.starts_with("file://")
            || url == "about:blank"
            || url == self.exclusions.placeholder_url
            || url == self.exclusions.default_url
    }

    /// Record a visit, newest first. Returns false if the visit was skipped.
    pub fn record_visit(&self, title: &str, url: &str, incognito: bool) -> Result<bool> {
        if incognito || self.is_excluded(url) {
            return Ok(false);
        }

        let title = if title.trim().is_empty() { url } else { title };
        let entry = HistoryEntry {
            title: title.to_string(),
            url: url.to_string(),
            timestamp: self.clock.now().timestamp_millis(),
        };

        self.store.update(|state| state.push_history(entry))?;
        tracing::debug!(url = %url, "Recorded visit");
        Ok(true)
    }

    /// Up to `limit` entries, newest first
    pub fn recent(&self, limit: usize) -> Vec<HistoryEntry> {
        self.store
            .read(|state| state.history.iter().take(limit).cloned().collect())
    }

    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.store.read(|state| state.history.clone())
    }

    /// Case-insensitive match on title or URL
    pub fn search(&self, query: &str) -> Vec<HistoryEntry> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.entries();
        }

        self.store.read(|state| {
            state
                .history
                .iter()
                .filter(|entry| {
                    entry.title.to_lowercase().contains(&query)
                        || entry.url.to_lowercase().contains(&query)
                })
                .cloned()
                .collect()
        })
    }

    pub fn clear(&self) -> Result<()> {
        self.store.update(|state| state.history.clear())?;
        tracing::info!("Cleared history");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use nimbus_storage::HISTORY_LIMIT;
    use nimbus_tabs::ManualClock;

    fn manager_with_clock(clock: Arc<ManualClock>) -> HistoryManager {
        HistoryManager::new(
            StateStore::open_in_memory().unwrap(),
            HistoryExclusions {
                default_url: "https://www.google.com".to_string(),
                placeholder_url: "about:blank#suspended".to_string(),
            },
            clock,
        )
    }

    fn manager() -> HistoryManager {
        manager_with_clock(Arc::new(ManualClock::default()))
    }

    #[test]
    fn test_history_manager() {
        let manager = manager();

        assert!(manager.record_visit("Example", "https://example.com", false).unwrap());
        assert!(manager.record_visit("", "https://rust-lang.org", false).unwrap());

        let recent = manager.recent(10);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].url, "https://rust-lang.org");
        assert_eq!(recent[0].title, "https://rust-lang.org");

        assert_eq!(manager.search("EXAMPLE").len(), 1);
        assert_eq!(manager.search("rust").len(), 1);

        manager.clear().unwrap();
        assert!(manager.entries().is_empty());
    }

    #[test]
    fn test_visit_time_comes_from_clock() {
        let start = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let clock = Arc::new(ManualClock::new(start));
        let manager = manager_with_clock(Arc::clone(&clock));

        manager.record_visit("One", "https://one.example", false).unwrap();
        clock.advance(Duration::seconds(90));
        manager.record_visit("Two", "https://two.example", false).unwrap();

        let entries = manager.entries();
        assert_eq!(entries[0].timestamp, 1_700_000_090_000);
        assert_eq!(entries[1].timestamp, 1_700_000_000_000);
    }

    #[test]
    fn test_incognito_is_never_recorded() {
        let manager = manager();
        for url in ["https://example.com", "https://other.example/path"] {
            assert!(!manager.record_visit("x", url, true).unwrap());
        }
        assert!(manager.entries().is_empty());
    }

    #[test]
    fn test_excluded_pages() {
        let manager = manager();
        for url in [
            "",
            "file:///home/me/a.html",
            "about:blank",
            "about:blank#suspended",
            "https://www.google.com",
        ] {
            assert!(!manager.record_visit("x", url, false).unwrap());
        }
        assert!(manager.entries().is_empty());
    }

    #[test]
    fn test_history_is_capped() {
        let manager = manager();
        for i in 0..=HISTORY_LIMIT {
            manager
                .record_visit("page", &format!("https://example.com/{}", i), false)
                .unwrap();
        }

        let entries = manager.entries();
        assert_eq!(entries.len(), HISTORY_LIMIT);
        assert_eq!(entries[0].url, format!("https://example.com/{}", HISTORY_LIMIT));
        assert!(entries.iter().all(|e| e.url != "https://example.com/0"));
    }
}
