//! Nimbus Window Sessions
//!
//! Each open browser window is a session holding:
//! - an incognito flag that every tab it creates inherits
//! - its own tab registry with exactly one active tab
//! - the toolbar state (address bar, back/forward) of the active tab
//!
//! Page events are routed through the owning session, which records
//! history for committed navigations outside incognito windows.

mod error;
mod manager;
mod session;

pub use error::SessionError;
pub use manager::{SessionManager, WindowViews};
pub use session::{Session, Toolbar, WindowId};

pub type Result<T> = std::result::Result<T, SessionError>;
