//! Session error types

use thiserror::Error;

use crate::session::WindowId;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Window not found: {0}")]
    NotFound(WindowId),

    #[error("Tab error: {0}")]
    Tab(#[from] nimbus_tabs::TabError),

    #[error("Navigation error: {0}")]
    Navigation(#[from] nimbus_navigation::NavigationError),
}
