//! Proxy configuration

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::PrivacyError;
use crate::Result;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyConfig {
    pub enabled: bool,
    #[serde(default)]
    pub proxy_url: String,
}

/// Routing applied to the default network session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyMode {
    Direct,
    /// All traffic goes through the given proxy rules
    FixedServers(String),
}

impl ProxyConfig {
    pub fn new(enabled: bool, proxy_url: impl Into<String>) -> Self {
        Self {
            enabled,
            proxy_url: proxy_url.into(),
        }
    }

    /// Enabled without a URL routes directly
    pub fn mode(&self) -> ProxyMode {
        let url = self.proxy_url.trim();
        if self.enabled && !url.is_empty() {
            ProxyMode::FixedServers(url.to_string())
        } else {
            ProxyMode::Direct
        }
    }

    /// Reject proxy URLs that cannot be parsed. Bare `host:port` is accepted.
    pub fn validate(&self) -> Result<()> {
        let ProxyMode::FixedServers(rules) = self.mode() else {
            return Ok(());
        };

        let candidate = if rules.contains("://") {
            rules.clone()
        } else {
            format!("http://{}", rules)
        };

        match Url::parse(&candidate) {
            Ok(parsed) if parsed.host_str().is_some() => Ok(()),
            _ => Err(PrivacyError::InvalidProxy(rules)),
        }
    }
}

/// Network-level controls owned by the embedding layer
pub trait NetworkConfigurator: Send + Sync {
    fn set_proxy(&self, mode: &ProxyMode);

    /// Drop cache and site storage of the persistent partition
    fn clear_browsing_data(&self);
}
