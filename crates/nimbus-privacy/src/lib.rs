//! Nimbus Privacy
//!
//! - Request filter: substring blocklist consulted for every outgoing request
//! - Proxy: direct or fixed-server routing for the browsing session

mod error;
mod filter;
mod proxy;

pub use error::PrivacyError;
pub use filter::{FilterEngine, RequestDecision, DEFAULT_FILTERS};
pub use proxy::{NetworkConfigurator, ProxyConfig, ProxyMode};

pub type Result<T> = std::result::Result<T, PrivacyError>;
