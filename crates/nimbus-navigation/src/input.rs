//! Input resolution for the address bar
//!
//! Input without a dot and without a scheme is a search query. Anything
//! else is a URL, with `https://` added when no scheme is given.

use nimbus_storage::{SearchEngine, Settings};
use serde::Serialize;

/// Schemes that are navigated to as typed
const KNOWN_SCHEMES: &[&str] = &["http://", "https://", "file://", "about:", "data:"];

const FALLBACK_SEARCH: &str = "https://www.google.com/search?q=";

/// Result of resolving address bar input
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "url", rename_all = "lowercase")]
pub enum InputResolution {
    /// Navigate to a URL
    Navigate(String),
    /// Search results page for the query
    Search(String),
}

impl InputResolution {
    pub fn url(&self) -> &str {
        match self {
            InputResolution::Navigate(url) | InputResolution::Search(url) => url,
        }
    }

    pub fn into_url(self) -> String {
        match self {
            InputResolution::Navigate(url) | InputResolution::Search(url) => url,
        }
    }
}

#[derive(Debug, Clone)]
pub struct InputResolver {
    engine: SearchEngine,
    /// Used with [`SearchEngine::Custom`]; `%s` is replaced with the query
    custom_template: String,
}

impl InputResolver {
    pub fn new(engine: SearchEngine, custom_template: impl Into<String>) -> Self {
        Self {
            engine,
            custom_template: custom_template.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.search_engine, settings.custom_search_url.clone())
    }

    /// Resolve user input. Returns `None` for blank input.
    pub fn resolve(&self, input: &str) -> Option<InputResolution> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        if !input.contains('.') && !has_scheme(input) {
            return Some(InputResolution::Search(self.search_url(input)));
        }

        if has_scheme(input) {
            Some(InputResolution::Navigate(input.to_string()))
        } else {
            Some(InputResolution::Navigate(format!("https://{}", input)))
        }
    }

    /// Build the search URL for a query
    pub fn search_url(&self, query: &str) -> String {
        let encoded = urlencoding::encode(query);

        if let Some(prefix) = self.engine.query_prefix() {
            return format!("{}{}", prefix, encoded);
        }

        let template = self.custom_template.trim();
        if template.is_empty() {
            format!("{}{}", FALLBACK_SEARCH, encoded)
        } else if template.contains("%s") {
            template.replacen("%s", &encoded, 1)
        } else {
            format!("{}{}", template, encoded)
        }
    }
}

impl Default for InputResolver {
    fn default() -> Self {
        Self::new(SearchEngine::Google, String::new())
    }
}

fn has_scheme(input: &str) -> bool {
    let lower = input.to_ascii_lowercase();
    KNOWN_SCHEMES.iter().any(|s| lower.starts_with(s)) || lower.contains("://")
}

// Percent-encoding with the unreserved set of encodeURIComponent
mod urlencoding {
    pub fn encode(input: &str) -> String {
        let mut result = String::with_capacity(input.len() * 3);
        for byte in input.bytes() {
            match byte {
                b'A'..=b'Z'
                | b'a'..=b'z'
                | b'0'..=b'9'
                | b'-'
                | b'_'
                | b'.'
                | b'!'
                | b'~'
                | b'*'
                | b'\''
                | b'('
                | b')' => result.push(byte as char),
                _ => result.push_str(&format!("%{:02X}", byte)),
            }
        }
        result
    }
}
