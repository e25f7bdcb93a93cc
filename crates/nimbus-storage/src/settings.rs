//! User settings
//!
//! Settings are a flat record of options. Loading never fails on a bad
//! field: every key is merged onto the defaults one at a time, and a value
//! that does not fit its option leaves the default in place.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const DEFAULT_HOMEPAGE: &str = "https://www.google.com";
pub const DEFAULT_SUSPEND_MINUTES: u64 = 5;

/// Longest idle threshold representable as a millisecond duration
pub const MAX_SUSPEND_MINUTES: u64 = i64::MAX as u64 / 60_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchEngine {
    Google,
    Bing,
    DuckDuckGo,
    /// User supplied template, see [`Settings::custom_search_url`]
    Custom,
}

impl SearchEngine {
    /// Query URL prefix for built-in engines. The encoded query is appended.
    pub fn query_prefix(&self) -> Option<&'static str> {
        match self {
            SearchEngine::Google => Some("https://www.google.com/search?q="),
            SearchEngine::Bing => Some("https://www.bing.com/search?q="),
            SearchEngine::DuckDuckGo => Some("https://duckduckgo.com/?q="),
            SearchEngine::Custom => None,
        }
    }

    /// Landing page used as homepage when the engine is selected
    pub fn home_page(&self) -> Option<&'static str> {
        match self {
            SearchEngine::Google => Some("https://www.google.com"),
            SearchEngine::Bing => Some("https://www.bing.com"),
            SearchEngine::DuckDuckGo => Some("https://duckduckgo.com"),
            SearchEngine::Custom => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    Light,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub homepage: String,
    pub search_engine: SearchEngine,
    pub custom_search_url: String,
    pub theme: Theme,
    pub ad_block_enabled: bool,
    pub proxy_enabled: bool,
    pub proxy_url: String,
    pub privacy_mode: bool,
    pub memory_saver: bool,
    pub smart_limit: bool,
    /// Idle minutes before a background tab is suspended
    pub suspend_time: u64,
    /// Process memory ceiling in megabytes, 0 disables the ceiling
    pub max_ram: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            homepage: DEFAULT_HOMEPAGE.to_string(),
            search_engine: SearchEngine::Google,
            custom_search_url: String::new(),
            theme: Theme::Dark,
            ad_block_enabled: true,
            proxy_enabled: false,
            proxy_url: String::new(),
            privacy_mode: false,
            memory_saver: true,
            smart_limit: true,
            suspend_time: DEFAULT_SUSPEND_MINUTES,
            max_ram: 0,
        }
    }
}

impl Settings {
    /// Return a copy with every known key of `patch` applied
    pub fn merged(&self, patch: &Value) -> Settings {
        let mut next = self.clone();

        let Some(fields) = patch.as_object() else {
            tracing::warn!("Ignoring settings patch that is not an object");
            return next;
        };

        for (key, value) in fields {
            match key.as_str() {
                "homepage" => assign(&mut next.homepage, key, value),
                "searchEngine" => assign(&mut next.search_engine, key, value),
                "customSearchUrl" => assign(&mut next.custom_search_url, key, value),
                "theme" => assign(&mut next.theme, key, value),
                "adBlockEnabled" => assign(&mut next.ad_block_enabled, key, value),
                "proxyEnabled" => assign(&mut next.proxy_enabled, key, value),
                "proxyUrl" => assign(&mut next.proxy_url, key, value),
                "privacyMode" => assign(&mut next.privacy_mode, key, value),
                "memorySaver" => assign(&mut next.memory_saver, key, value),
                "smartLimit" => assign(&mut next.smart_limit, key, value),
                "suspendTime" => {
                    next.suspend_time = parse_number(value).unwrap_or(DEFAULT_SUSPEND_MINUTES)
                }
                "maxRam" => next.max_ram = parse_number(value).unwrap_or(0),
                _ => tracing::debug!(key = %key, "Ignoring unknown setting"),
            }
        }

        next
    }

    /// Idle threshold in minutes, never zero and at most
    /// [`MAX_SUSPEND_MINUTES`]
    pub fn suspend_minutes(&self) -> u64 {
        if self.suspend_time == 0 {
            DEFAULT_SUSPEND_MINUTES
        } else {
            self.suspend_time.min(MAX_SUSPEND_MINUTES)
        }
    }

    pub fn max_ram_mb(&self) -> Option<u64> {
        (self.max_ram > 0).then_some(self.max_ram)
    }
}

impl<'de> Deserialize<'de> for Settings {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Settings::default().merged(&value))
    }
}

fn assign<T: DeserializeOwned>(slot: &mut T, key: &str, value: &Value) {
    match serde_json::from_value::<T>(value.clone()) {
        Ok(parsed) => *slot = parsed,
        Err(e) => tracing::warn!(key = %key, error = %e, "Keeping default for invalid setting"),
    }
}

/// Numbers were historically stored either as JSON numbers or numeric strings
fn parse_number(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
