//! Nimbus Navigation
//!
//! Address bar input resolution:
//! 1. No dot and no scheme → search with the configured engine
//! 2. Anything else → URL, `https://` added when the scheme is missing
//!
//! Navigation actions act on the active tab of a registry and count as
//! activity for the memory scheduler. Committed navigations are recorded
//! in history unless the tab is incognito.

mod controller;
mod error;
mod history;
mod input;

pub use controller::NavigationController;
pub use error::NavigationError;
pub use history::{HistoryExclusions, HistoryManager};
pub use input::{InputResolution, InputResolver};

pub type Result<T> = std::result::Result<T, NavigationError>;
