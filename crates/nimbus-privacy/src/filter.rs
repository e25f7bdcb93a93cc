//! Request filter
//!
//! Plain substring blocking: a request is cancelled when its lowercased URL
//! contains any lowercased filter. No wildcards, no rule syntax.

use std::sync::atomic::{AtomicU64, Ordering};

/// Built-in filters: ad networks, trackers and common ad paths
pub const DEFAULT_FILTERS: &[&str] = &[
    // Ad networks
    "doubleclick.net",
    "googlesyndication.com",
    "googleadservices.com",
    "google-analytics.com",
    "googletagmanager.com",
    "facebook.com/tr",
    "facebook.net",
    "scorecardresearch.com",
    "outbrain.com",
    "taboola.com",
    "ads.yahoo.com",
    "advertising.com",
    "adnxs.com",
    "adsystem.com",
    // Trackers
    "hotjar.com",
    "mouseflow.com",
    "crazyegg.com",
    "mixpanel.com",
    // Path patterns
    "/ads/",
    "/advert",
    "/banner",
    "/popup",
    "/tracking",
];

/// Answer given to the session network hook
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestDecision {
    Allow,
    Cancel,
}

impl RequestDecision {
    pub fn is_cancel(&self) -> bool {
        matches!(self, RequestDecision::Cancel)
    }
}

pub struct FilterEngine {
    /// Lowercased filter substrings
    filters: Vec<String>,
    enabled: bool,
    blocked: AtomicU64,
}

impl FilterEngine {
    pub fn new() -> Self {
        Self::with_filters(DEFAULT_FILTERS.iter().map(|f| f.to_string()))
    }

    pub fn with_filters<I>(filters: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut engine = Self {
            filters: Vec::new(),
            enabled: true,
            blocked: AtomicU64::new(0),
        };
        engine.set_filters(filters);
        engine
    }

    /// Enable or disable blocking. Takes effect for the next request checked.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        tracing::debug!(enabled, "Request filter toggled");
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Add a filter; empty and duplicate filters are ignored
    pub fn add_filter(&mut self, filter: &str) -> bool {
        let filter = filter.trim().to_lowercase();
        if filter.is_empty() || self.filters.contains(&filter) {
            return false;
        }
        self.filters.push(filter);
        true
    }

    pub fn set_filters<I>(&mut self, filters: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.filters.clear();
        for filter in filters {
            self.add_filter(&filter);
        }
    }

    pub fn filters(&self) -> &[String] {
        &self.filters
    }

    pub fn filter_count(&self) -> usize {
        self.filters.len()
    }

    /// Check if a URL should be blocked
    pub fn should_block(&self, url: &str) -> bool {
        if !self.enabled {
            return false;
        }

        let url = url.to_lowercase();
        self.filters.iter().any(|filter| url.contains(filter.as_str()))
    }

    /// Decide an outgoing request and count it when cancelled
    pub fn check_request(&self, url: &str) -> RequestDecision {
        if self.should_block(url) {
            self.blocked.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(url = %url, "Blocked request");
            RequestDecision::Cancel
        } else {
            RequestDecision::Allow
        }
    }

    pub fn blocked_count(&self) -> u64 {
        self.blocked.load(Ordering::Relaxed)
    }
}

impl Default for FilterEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocks_any_case() {
        let engine = FilterEngine::new();

        assert!(engine.should_block("https://stats.DoubleClick.NET/pixel.gif"));
        assert!(engine.should_block("https://example.com/Ads/banner.png"));
        assert!(engine.should_block("HTTPS://CONNECT.FACEBOOK.NET/sdk.js"));
        assert!(!engine.should_block("https://example.com/page"));
    }

    #[test]
    fn test_disabled_never_blocks() {
        let mut engine = FilterEngine::new();
        engine.set_enabled(false);

        assert!(!engine.should_block("https://doubleclick.net/"));
        assert_eq!(
            engine.check_request("https://doubleclick.net/"),
            RequestDecision::Allow
        );

        engine.set_enabled(true);
        assert!(engine.should_block("https://doubleclick.net/"));
    }

    #[test]
    fn test_uppercase_filters_are_normalized() {
        let mut engine = FilterEngine::with_filters(Vec::new());
        assert!(engine.add_filter("Tracker.Example"));
        assert!(!engine.add_filter("tracker.example"));
        assert!(!engine.add_filter("   "));

        assert!(engine.should_block("https://cdn.tracker.example/x.js"));
        assert_eq!(engine.filter_count(), 1);
    }

    #[test]
    fn test_filter_order_is_irrelevant() {
        let forward = FilterEngine::with_filters(vec!["/banner".into(), "mixpanel.com".into()]);
        let backward = FilterEngine::with_filters(vec!["mixpanel.com".into(), "/banner".into()]);

        for url in [
            "https://api.mixpanel.com/track",
            "https://example.com/banner/top.png",
            "https://example.com/",
        ] {
            assert_eq!(forward.should_block(url), backward.should_block(url));
        }
    }

    #[test]
    fn test_check_request_counts_blocks() {
        let engine = FilterEngine::new();
        assert!(engine.check_request("https://hotjar.com/x").is_cancel());
        assert!(!engine.check_request("https://rust-lang.org").is_cancel());
        assert!(engine.check_request("https://taboola.com/feed").is_cancel());

        assert_eq!(engine.blocked_count(), 2);
    }
}
