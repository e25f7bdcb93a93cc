//! Nimbus Tab Management
//!
//! A window owns an ordered registry of tabs. Each tab owns one page view
//! bound to a storage partition, and moves through a small state machine:
//! exactly one tab per registry is active, background tabs may be suspended
//! to reclaim memory, and suspended tabs are restored when activated.

mod clock;
mod error;
mod registry;
mod state;
mod tab;
mod view;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::TabError;
pub use registry::{EventOutcome, RegistryConfig, TabOptions, TabRegistry, Visit};
pub use state::TabState;
pub use tab::{NavigationState, Tab, TabId, TabInfo};
pub use view::{PageEvent, PageView, PageViewFactory, Partition};

pub type Result<T> = std::result::Result<T, TabError>;
